use super::naming::check_name;
use super::write_once::WriteOnce;
use crate::definition::{PackageConfigSpec, ServiceSpec};
use crate::error::{DefinitionError, FlowError};
use indexmap::IndexMap;

/// An engine package identifier plus its property templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageConfig {
    pub package_id: String,
    /// Property name mapped to a template string. Rendered in place during resolution.
    pub properties: IndexMap<String, String>,
}

impl PackageConfig {
    /// Returns `None` when no `package_id` was configured.
    pub fn from_spec(spec: &PackageConfigSpec) -> Option<Self> {
        let package_id = spec.package_id.as_deref().filter(|p| !p.is_empty())?;
        Some(Self {
            package_id: package_id.to_string(),
            properties: spec
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), v.to_string()))
                .collect(),
        })
    }
}

/// A shared controller service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controller {
    pub name: String,
    pub config: PackageConfig,
    pub id: WriteOnce<String>,
    pub parent_id: WriteOnce<String>,
}

impl Controller {
    pub fn from_spec(spec: &ServiceSpec) -> Result<Self, FlowError> {
        check_name(&spec.name)?;
        let config = PackageConfig::from_spec(&spec.config).ok_or_else(|| {
            DefinitionError::MissingServicePackageId {
                kind: "controller",
                name: spec.name.clone(),
            }
        })?;
        Ok(Self {
            name: spec.name.clone(),
            config,
            id: WriteOnce::unset("id"),
            parent_id: WriteOnce::unset("parent_id"),
        })
    }
}

/// A flow-wide reporting task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportingTask {
    pub name: String,
    pub config: PackageConfig,
    pub id: WriteOnce<String>,
}

impl ReportingTask {
    pub fn from_spec(spec: &ServiceSpec) -> Result<Self, FlowError> {
        check_name(&spec.name)?;
        let config = PackageConfig::from_spec(&spec.config).ok_or_else(|| {
            DefinitionError::MissingServicePackageId {
                kind: "reporting task",
                name: spec.name.clone(),
            }
        })?;
        Ok(Self {
            name: spec.name.clone(),
            config,
            id: WriteOnce::unset("id"),
        })
    }
}
