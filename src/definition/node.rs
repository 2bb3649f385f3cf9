use crate::template::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A raw canvas node, as found on the flow canvas or inside a component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// One of `process_group`, `processor`, `input_port`, `output_port`.
    #[serde(rename = "type", default)]
    pub element_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<ConnectionSpec>>,

    // process_group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_path: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub controllers: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub vars: IndexMap<String, Value>,

    // processor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<PackageConfigSpec>,
}

impl NodeSpec {
    pub fn new(element_type: &str, name: &str) -> Self {
        Self {
            element_type: Some(element_type.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }
}

/// An outgoing connection. `name` is the target element within the same scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Vec<String>>,
}

/// Engine-specific configuration shared by processors, controllers and reporting tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageConfigSpec {
    #[serde(default)]
    pub package_id: Option<String>,
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
}

/// A controller service or reporting task definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceSpec {
    pub name: String,
    #[serde(default)]
    pub config: PackageConfigSpec,
}
