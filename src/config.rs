//! File based configuration for tools driving the library.

use crate::error::{ConfigurationError, FlowError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Output format of an exported [`FlowArtifact`](crate::artifact::FlowArtifact).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Yaml,
    Bincode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowLibConfig {
    /// Directory that `component_path` locators are relative to.
    pub component_dir: PathBuf,
    pub flow_yaml: Option<PathBuf>,
    /// Where to write the resolved flow, if anywhere.
    pub export: Option<PathBuf>,
    pub export_format: ExportFormat,
}

impl Default for FlowLibConfig {
    fn default() -> Self {
        Self {
            component_dir: PathBuf::from("components"),
            flow_yaml: None,
            export: None,
            export_format: ExportFormat::default(),
        }
    }
}

impl FlowLibConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, FlowError> {
        parse(yaml, "<inline>")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FlowError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ConfigurationError::ConfigFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        parse(&raw, &path.display().to_string())
    }
}

fn parse(yaml: &str, path: &str) -> Result<FlowLibConfig, FlowError> {
    serde_yaml::from_str(yaml).map_err(|e| {
        ConfigurationError::ConfigFile {
            path: path.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}
