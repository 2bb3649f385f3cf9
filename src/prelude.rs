//! Prelude module for convenient imports
//!
//! Re-exports the types needed to compose, resolve, validate and export a flow.
//!
//! ```rust,no_run
//! use flowlib::prelude::*;
//!
//! # fn run_example(yaml: &str) -> flowlib::Result<()> {
//! let mut flow = FlowDefinition::from_yaml(yaml)?;
//! flow.initialize(&ComponentSource::Directory("components".into()))?;
//! flow.resolve(&MapEnv::new().with("STAGE", "dev"))?;
//! flow.validate()?;
//! # Ok(())
//! # }
//! ```

// Composition
pub use crate::component::{Component, ComponentSource};
pub use crate::composer::{Composer, ComposerBuilder};
pub use crate::definition::{ComponentSpec, FlowSpec, NodeSpec};
pub use crate::model::{Element, ElementId, ElementKind, ElementType, FlowDefinition, FlowState};

// Resolution and validation
pub use crate::resolver::Resolver;
pub use crate::template::{EnvLookup, MapEnv, ProcessEnv, Value};
pub use crate::validator::StructuralValidator;

// Deployment
pub use crate::artifact::{Deployer, FlowArtifact, deploy_flow};
pub use crate::config::{ExportFormat, FlowLibConfig};

// Error types
pub use crate::error::{
    AssignmentError, ConfigurationError, DefinitionError, FlowError, ValidationError,
};
