//! Serializable snapshots of a flow, handed to deployers or written to disk.

use crate::error::FlowError;
use crate::model::{
    Connection, Controller, ElementId, ElementKind, FlowDefinition, PackageConfig, ReportingTask,
};
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

mod deployer;

pub use deployer::{Deployer, deploy_flow};

/// A controller or reporting task as the engine sees it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServiceArtifact {
    pub name: String,
    pub id: Option<String>,
    pub package_id: String,
    pub properties: IndexMap<String, String>,
}

impl ServiceArtifact {
    fn new(name: &str, id: Option<&String>, config: &PackageConfig) -> Self {
        Self {
            name: name.to_string(),
            id: id.cloned(),
            package_id: config.package_id.clone(),
            properties: config.properties.clone(),
        }
    }
}

impl From<&Controller> for ServiceArtifact {
    fn from(controller: &Controller) -> Self {
        Self::new(&controller.name, controller.id.get(), &controller.config)
    }
}

impl From<&ReportingTask> for ServiceArtifact {
    fn from(task: &ReportingTask) -> Self {
        Self::new(&task.name, task.id.get(), &task.config)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ElementArtifactKind {
    ProcessGroup {
        component_path: Option<String>,
        /// Required controller name mapped to the bound flow controller.
        controllers: IndexMap<String, String>,
        children: Vec<ElementArtifact>,
    },
    Processor {
        package_id: String,
        properties: IndexMap<String, String>,
    },
    InputPort,
    OutputPort,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ElementArtifact {
    pub name: String,
    pub id: Option<String>,
    pub parent_path: String,
    pub src_component_name: String,
    pub connections: Vec<Connection>,
    pub kind: ElementArtifactKind,
}

/// The nested, owned form of a flow's element tree and services.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FlowArtifact {
    pub name: String,
    pub version: Option<String>,
    pub flowlib_version: Option<String>,
    pub comments: Option<String>,
    /// Rendered global variables.
    pub global_vars: IndexMap<String, String>,
    pub controllers: Vec<ServiceArtifact>,
    pub reporting_tasks: Vec<ServiceArtifact>,
    pub canvas: Vec<ElementArtifact>,
}

impl FlowArtifact {
    /// Snapshots `flow`. A raw flow yields an empty canvas.
    pub fn from_flow(flow: &FlowDefinition) -> Self {
        Self {
            name: flow.name.clone(),
            version: flow.version.clone(),
            flowlib_version: flow.flowlib_version.clone(),
            comments: flow.comments.clone(),
            global_vars: flow
                .global_vars
                .iter()
                .map(|(k, v)| (k.clone(), v.to_string()))
                .collect(),
            controllers: flow.controllers.iter().map(ServiceArtifact::from).collect(),
            reporting_tasks: flow
                .reporting_tasks
                .iter()
                .map(ServiceArtifact::from)
                .collect(),
            canvas: flow
                .elements()
                .values()
                .filter_map(|id| snapshot_element(flow, *id))
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, FlowError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FlowError::Artifact(format!("JSON serialization failed: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, FlowError> {
        serde_yaml::to_string(self)
            .map_err(|e| FlowError::Artifact(format!("YAML serialization failed: {}", e)))
    }

    /// Saves the artifact to a file using the bincode format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FlowError> {
        let path = path.as_ref();
        let bytes = encode_to_vec(self, standard())
            .map_err(|e| FlowError::Artifact(format!("Serialization failed: {}", e)))?;
        fs::write(path, bytes).map_err(|e| {
            FlowError::Artifact(format!(
                "Could not write to file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Loads an artifact previously written by [`FlowArtifact::save`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FlowError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            FlowError::Artifact(format!("Could not open file '{}': {}", path.display(), e))
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FlowError> {
        decode_from_slice(bytes, standard())
            .map(|(artifact, _)| artifact)
            .map_err(|e| FlowError::Artifact(format!("Deserialization failed: {}", e)))
    }
}

fn snapshot_element(flow: &FlowDefinition, id: ElementId) -> Option<ElementArtifact> {
    let element = flow.element(id)?;
    let kind = match &element.kind {
        ElementKind::ProcessGroup(pg) => ElementArtifactKind::ProcessGroup {
            component_path: pg.component_path.clone(),
            controllers: pg.controllers.clone(),
            children: pg
                .children()
                .values()
                .filter_map(|child| snapshot_element(flow, *child))
                .collect(),
        },
        ElementKind::Processor(processor) => ElementArtifactKind::Processor {
            package_id: processor.config.package_id.clone(),
            properties: processor.config.properties.clone(),
        },
        ElementKind::InputPort => ElementArtifactKind::InputPort,
        ElementKind::OutputPort => ElementArtifactKind::OutputPort,
    };

    Some(ElementArtifact {
        name: element.name.clone(),
        id: element.id.get().cloned(),
        parent_path: element.parent_path.clone(),
        src_component_name: element.src_component_name.clone(),
        connections: element.connections.clone(),
        kind,
    })
}
