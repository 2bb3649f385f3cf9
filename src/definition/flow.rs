use super::{NodeSpec, ServiceSpec};
use crate::error::DefinitionError;
use crate::template::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The top-level flow document.
///
/// ```yaml
/// name: s3-ingest
/// version: "1.0"
/// global_vars:
///   bucket: "{{ env('BUCKET', 'landing') }}"
/// controller_services:
///   - name: aws-credentials
///     config:
///       package_id: org.apache.nifi.processors.aws.credentials.provider.service.AWSCredentialsProviderControllerService
/// canvas:
///   - name: ingest
///     type: process_group
///     component_path: s3/ingest.yaml
///     controllers:
///       credentials: aws-credentials
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowSpec {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub flowlib_version: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub global_vars: IndexMap<String, Value>,
    #[serde(default, alias = "controllers")]
    pub controller_services: Vec<ServiceSpec>,
    #[serde(default)]
    pub reporting_tasks: Vec<ServiceSpec>,
    #[serde(default)]
    pub canvas: Vec<NodeSpec>,
}

impl FlowSpec {
    pub fn from_yaml(yaml: &str) -> Result<Self, DefinitionError> {
        serde_yaml::from_str(yaml).map_err(|e| DefinitionError::FlowSource(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        serde_json::from_str(json).map_err(|e| DefinitionError::FlowSource(e.to_string()))
    }
}
