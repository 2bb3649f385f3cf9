//! The composition engine: expands process groups into their components'
//! element trees and checks every component requirement along the way.

use crate::component::{ComponentLoader, ComponentSource};
use crate::definition::ComponentSpec;
use crate::error::{ConfigurationError, FlowError};
use crate::model::{FlowDefinition, FlowState};
use std::path::PathBuf;

mod builder;

use builder::TreeBuilder;

pub const TRACING_TARGET: &str = "flowlib::composer";

/// A configured composition of one flow.
pub struct Composer {
    flow: FlowDefinition,
    source: ComponentSource,
}

pub struct ComposerBuilder {
    flow: FlowDefinition,
    component_dir: Option<PathBuf>,
    components: Option<Vec<ComponentSpec>>,
}

impl ComposerBuilder {
    pub fn new(flow: FlowDefinition) -> Self {
        Self {
            flow,
            component_dir: None,
            components: None,
        }
    }

    /// Loads components on demand from files under `dir`.
    pub fn with_component_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.component_dir = Some(dir.into());
        self
    }

    /// Uses a batch of pre-parsed components.
    pub fn with_components(mut self, components: Vec<ComponentSpec>) -> Self {
        self.components = Some(components);
        self
    }

    pub fn build(self) -> Result<Composer, FlowError> {
        let source = match (self.component_dir, self.components) {
            (Some(_), Some(_)) => return Err(ConfigurationError::ConflictingComponentSources.into()),
            (Some(dir), None) => ComponentSource::Directory(dir),
            (None, Some(components)) => ComponentSource::Batch(components),
            (None, None) => ComponentSource::Unset,
        };
        Ok(Composer {
            flow: self.flow,
            source,
        })
    }
}

impl Composer {
    pub fn builder(flow: FlowDefinition) -> ComposerBuilder {
        ComposerBuilder::new(flow)
    }

    pub fn source(&self) -> &ComponentSource {
        &self.source
    }

    /// Composes the flow and hands it back.
    pub fn compose(mut self) -> Result<FlowDefinition, FlowError> {
        compose(&mut self.flow, &self.source)?;
        Ok(self.flow)
    }
}

/// Builds the element tree of a raw flow in place.
///
/// On failure the partial tree and the component cache are discarded and the
/// flow stays [`FlowState::Raw`].
pub(crate) fn compose(flow: &mut FlowDefinition, source: &ComponentSource) -> Result<(), FlowError> {
    if flow.state != FlowState::Raw {
        return Err(ConfigurationError::InvalidState {
            operation: "initialize",
            state: flow.state.to_string(),
        }
        .into());
    }

    tracing::info!(target: TRACING_TARGET, flow = %flow.name, "Initializing root flow");

    let FlowDefinition {
        name,
        canvas,
        controllers,
        components,
        arena,
        root,
        ..
    } = flow;

    let result = TreeBuilder::new(
        name,
        source,
        controllers,
        ComponentLoader::new(components),
        arena,
    )
    .build_canvas(canvas, root);

    if let Err(e) = result {
        arena.clear();
        root.clear();
        components.clear();
        return Err(e);
    }

    for unused in flow.unused_components() {
        tracing::warn!(
            target: TRACING_TARGET,
            component = %unused,
            "Component was loaded but never used"
        );
    }

    flow.state = FlowState::Composed;
    Ok(())
}
