//! Reusable components and the loader that caches them.

use crate::definition::{ComponentSpec, NodeSpec};
use crate::error::{DefinitionError, FlowError, ValidationError};
use crate::model::check_name;
use crate::template::Value;
use ahash::AHashMap;
use indexmap::IndexMap;

mod loader;

pub use loader::{ComponentLoader, ComponentSource};
pub(crate) use loader::normalize_locator;

pub const TRACING_TARGET: &str = "flowlib::component";

/// Index of a component inside a [`ComponentCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) usize);

/// A named, reusable subgraph template.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub name: String,
    /// Canonical source identity, e.g. the path relative to the component directory.
    pub source_file: String,
    pub comments: Option<String>,
    pub required_controllers: IndexMap<String, String>,
    pub required_vars: Vec<String>,
    pub defaults: IndexMap<String, Value>,
    pub process_group: Vec<NodeSpec>,
    pub(crate) used: bool,
}

impl Component {
    pub fn from_spec(spec: ComponentSpec, source_file: String) -> Result<Self, FlowError> {
        let name = spec.name.ok_or_else(|| DefinitionError::MissingComponentName {
            locator: source_file.clone(),
        })?;
        check_name(&name)?;

        Ok(Self {
            name,
            source_file,
            comments: spec.comments,
            required_controllers: spec.required_controllers,
            required_vars: spec.required_vars,
            defaults: spec.defaults,
            process_group: spec.process_group,
            used: false,
        })
    }

    /// Whether any process group instantiated this component.
    pub fn is_used(&self) -> bool {
        self.used
    }
}

/// Components loaded while initializing one flow, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ComponentCache {
    components: Vec<Component>,
    by_name: AHashMap<String, ComponentId>,
    by_locator: AHashMap<String, ComponentId>,
}

impl ComponentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a component unless one with the same name exists.
    ///
    /// Returns the id of the cached component and whether it was newly inserted.
    pub fn insert(&mut self, component: Component) -> (ComponentId, bool) {
        if let Some(id) = self.by_name.get(&component.name) {
            return (*id, false);
        }
        let id = ComponentId(self.components.len());
        self.by_name.insert(component.name.clone(), id);
        self.components.push(component);
        (id, true)
    }

    pub(crate) fn remember_locator(&mut self, locator: &str, id: ComponentId) {
        self.by_locator.insert(locator.to_string(), id);
    }

    pub(crate) fn by_locator(&self, locator: &str) -> Option<ComponentId> {
        self.by_locator.get(locator).copied()
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0)
    }

    pub(crate) fn mark_used(&mut self, id: ComponentId) {
        if let Some(component) = self.components.get_mut(id.0) {
            component.used = true;
        }
    }

    pub fn find_by_name(&self, name: &str) -> Option<ComponentId> {
        self.by_name.get(name).copied()
    }

    /// Looks a component up by its source identity.
    pub fn find_by_path(&self, path: &str) -> Result<Option<ComponentId>, ValidationError> {
        let mut matches = self
            .components
            .iter()
            .enumerate()
            .filter(|(_, c)| c.source_file == path)
            .map(|(i, _)| ComponentId(i));

        let first = matches.next();
        if matches.next().is_some() {
            return Err(ValidationError::AmbiguousComponent(path.to_string()));
        }
        Ok(first)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ComponentId, &Component)> {
        self.components
            .iter()
            .enumerate()
            .map(|(i, c)| (ComponentId(i), c))
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn clear(&mut self) {
        self.components.clear();
        self.by_name.clear();
        self.by_locator.clear();
    }
}
