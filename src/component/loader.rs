use super::{Component, ComponentCache, ComponentId, TRACING_TARGET};
use crate::definition::ComponentSpec;
use crate::error::{DefinitionError, FlowError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where process groups get their components from.
///
/// Exactly one mode is active for a given initialization.
#[derive(Debug, Clone, Default)]
pub enum ComponentSource {
    /// No source configured. Any process group fails to compose.
    #[default]
    Unset,
    /// Components are read on demand from files relative to this directory.
    Directory(PathBuf),
    /// Components are supplied pre-parsed and loaded up front.
    Batch(Vec<ComponentSpec>),
}

/// Parses component definitions into a [`ComponentCache`].
///
/// Loading is idempotent: a locator that was already read, or a component whose
/// name is already cached, yields the cached component without re-parsing.
pub struct ComponentLoader<'a> {
    cache: &'a mut ComponentCache,
}

impl<'a> ComponentLoader<'a> {
    pub fn new(cache: &'a mut ComponentCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &ComponentCache {
        self.cache
    }

    pub(crate) fn mark_used(&mut self, id: ComponentId) {
        self.cache.mark_used(id);
    }

    /// Loads `locator` relative to `dir`.
    ///
    /// Returns `None` when no file exists at the locator, leaving the caller to
    /// report which process group referenced it. Unreadable or malformed files
    /// are definition errors.
    pub fn load_from_dir(
        &mut self,
        dir: &Path,
        locator: &str,
    ) -> Result<Option<ComponentId>, FlowError> {
        let source_file = normalize_locator(locator);
        if let Some(id) = self.cache.by_locator(&source_file) {
            return Ok(Some(id));
        }

        let path = dir.join(&source_file);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DefinitionError::ComponentSource {
                    locator: source_file,
                    message: format!("could not read '{}': {}", path.display(), e),
                }
                .into());
            }
        };
        let spec = ComponentSpec::from_yaml(&source_file, &raw)?;

        tracing::info!(
            target: TRACING_TARGET,
            source_file = %source_file,
            "Loading component from file"
        );
        let id = self.load_spec(spec, source_file.clone())?;
        // A skipped duplicate keeps the first component's identity, so only
        // remember locators that resolve to themselves.
        if self
            .cache
            .get(id)
            .is_some_and(|c| c.source_file == source_file)
        {
            self.cache.remember_locator(&source_file, id);
        }
        Ok(Some(id))
    }

    /// Loads every component of a batch. Source identity is `source_file`, or the name.
    pub fn load_batch(&mut self, specs: &[ComponentSpec]) -> Result<Vec<ComponentId>, FlowError> {
        specs
            .iter()
            .map(|spec| {
                let source_file = spec
                    .source_file
                    .as_deref()
                    .map(normalize_locator)
                    .or_else(|| spec.name.clone())
                    .unwrap_or_default();
                self.load_spec(spec.clone(), source_file)
            })
            .collect()
    }

    /// Validates and caches a parsed component.
    pub fn load_spec(
        &mut self,
        spec: ComponentSpec,
        source_file: String,
    ) -> Result<ComponentId, FlowError> {
        let component = Component::from_spec(spec, source_file)?;
        let name = component.name.clone();
        let (id, inserted) = self.cache.insert(component);
        if !inserted {
            tracing::info!(
                target: TRACING_TARGET,
                component = %name,
                "A component named {} is already defined, skipping...",
                name
            );
        }
        Ok(id)
    }
}

/// Canonical form of a component locator: forward slashes, no leading `./`.
pub(crate) fn normalize_locator(locator: &str) -> String {
    locator
        .replace('\\', "/")
        .trim_start_matches("./")
        .to_string()
}
