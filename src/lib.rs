//! # flowlib - Flow Definition Composition Engine
//!
//! **flowlib** turns declarative flow definitions into fully expanded,
//! resolved and validated element trees ready to be deployed to a dataflow
//! engine. Flows are built from reusable *components*: named subgraphs that
//! declare the controllers and variables they need and are instantiated by
//! process groups.
//!
//! ## Core Workflow
//!
//! 1.  **Load**: Parse a flow file with [`FlowDefinition::from_yaml`](model::FlowDefinition::from_yaml).
//! 2.  **Compose**: Use [`Composer::builder`](composer::Composer::builder) with a component
//!     directory or a batch of pre-parsed components. Every process group is expanded
//!     into its component's elements and every component requirement is checked.
//! 3.  **Resolve**: Render global variables, controller and processor properties
//!     with the [`Resolver`](resolver::Resolver).
//! 4.  **Validate**: Check connection targets and process group ports.
//! 5.  **Deploy**: Snapshot the flow into a [`FlowArtifact`](artifact::FlowArtifact), or hand
//!     it to a [`Deployer`](artifact::Deployer) with [`deploy_flow`](artifact::deploy_flow).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowlib::prelude::*;
//!
//! fn main() -> Result<(), FlowError> {
//!     let yaml = std::fs::read_to_string("flow.yaml").map_err(|e| {
//!         FlowError::Definition(DefinitionError::FlowSource(e.to_string()))
//!     })?;
//!     let flow = FlowDefinition::from_yaml(&yaml)?;
//!
//!     let mut flow = Composer::builder(flow)
//!         .with_component_dir("components")
//!         .build()?
//!         .compose()?;
//!
//!     flow.resolve(&ProcessEnv)?;
//!     flow.validate()?;
//!
//!     let artifact = FlowArtifact::from_flow(&flow);
//!     println!("{}", artifact.to_json()?);
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod component;
pub mod composer;
pub mod config;
pub mod definition;
pub mod error;
pub mod model;
pub mod prelude;
pub mod resolver;
pub mod template;
pub mod validator;

pub use error::Result;
