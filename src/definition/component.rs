use super::NodeSpec;
use crate::error::DefinitionError;
use crate::template::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A reusable component document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    #[serde(default)]
    pub name: Option<String>,
    /// Source identity used when the component is supplied as part of a batch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Required controller name mapped to the controller package it must have.
    #[serde(default)]
    pub required_controllers: IndexMap<String, String>,
    #[serde(default)]
    pub required_vars: Vec<String>,
    #[serde(default)]
    pub defaults: IndexMap<String, Value>,
    /// The child nodes instantiated inside every process group using this component.
    #[serde(default)]
    pub process_group: Vec<NodeSpec>,
}

impl ComponentSpec {
    pub fn from_yaml(locator: &str, yaml: &str) -> Result<Self, DefinitionError> {
        serde_yaml::from_str(yaml).map_err(|e| DefinitionError::ComponentSource {
            locator: locator.to_string(),
            message: e.to_string(),
        })
    }
}
