use super::element::{Element, ElementArena, ElementId};
use super::naming::{PG_NAME_DELIMITER, check_name};
use super::service::{Controller, ReportingTask};
use crate::component::{Component, ComponentCache, ComponentSource};
use crate::definition::{FlowSpec, NodeSpec, ServiceSpec};
use crate::error::{FlowError, Result, ValidationError};
use crate::template::{EnvLookup, Value};
use indexmap::IndexMap;
use itertools::Itertools;
use std::fmt;

/// Lifecycle of a [`FlowDefinition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowState {
    /// Constructed from a definition, no element tree yet.
    #[default]
    Raw,
    /// The element tree is built and every component requirement is satisfied.
    Composed,
    /// Global variables, controllers and reporting tasks are rendered.
    ServicesResolved,
    /// Every processor property is rendered.
    Resolved,
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlowState::Raw => "raw",
            FlowState::Composed => "composed",
            FlowState::ServicesResolved => "services-resolved",
            FlowState::Resolved => "resolved",
        };
        f.write_str(s)
    }
}

/// The root of a flow: its raw canvas, variables and services, and once
/// initialized, the composed element tree.
#[derive(Debug, Clone)]
pub struct FlowDefinition {
    pub name: String,
    pub version: Option<String>,
    pub flowlib_version: Option<String>,
    pub comments: Option<String>,
    pub canvas: Vec<NodeSpec>,
    pub global_vars: IndexMap<String, Value>,
    pub controllers: Vec<Controller>,
    pub reporting_tasks: Vec<ReportingTask>,
    pub(crate) components: ComponentCache,
    pub(crate) arena: ElementArena,
    pub(crate) root: IndexMap<String, ElementId>,
    pub(crate) state: FlowState,
}

impl FlowDefinition {
    pub fn from_spec(spec: FlowSpec) -> Result<Self> {
        check_name(&spec.name)?;
        let controllers = build_services(
            &spec.controller_services,
            "controllers",
            "Controller",
            Controller::from_spec,
        )?;
        let reporting_tasks = build_services(
            &spec.reporting_tasks,
            "reporting_tasks",
            "ReportingTask",
            ReportingTask::from_spec,
        )?;

        Ok(Self {
            name: spec.name,
            version: spec.version,
            flowlib_version: spec.flowlib_version,
            comments: spec.comments,
            canvas: spec.canvas,
            global_vars: spec.global_vars,
            controllers,
            reporting_tasks,
            components: ComponentCache::new(),
            arena: ElementArena::new(),
            root: IndexMap::new(),
            state: FlowState::Raw,
        })
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::from_spec(FlowSpec::from_yaml(yaml)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_spec(FlowSpec::from_json(json)?)
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state != FlowState::Raw
    }

    /// Composes the element tree. Runs once; on failure the flow stays raw.
    pub fn initialize(&mut self, source: &ComponentSource) -> Result<()> {
        crate::composer::compose(self, source)
    }

    /// Renders globals, services and processor properties in place.
    pub fn resolve(&mut self, env: &dyn EnvLookup) -> Result<()> {
        crate::resolver::Resolver::new(env).resolve(self)
    }

    /// Checks connection and port consistency of the composed tree.
    pub fn validate(&self) -> Result<()> {
        crate::validator::StructuralValidator::new().validate(self)
    }

    /// Root canvas elements, in declaration order.
    pub fn elements(&self) -> &IndexMap<String, ElementId> {
        &self.root
    }

    pub fn root_element(&self, name: &str) -> Option<ElementId> {
        self.root.get(name).copied()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.arena.get(id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.arena.get_mut(id)
    }

    pub fn arena(&self) -> &ElementArena {
        &self.arena
    }

    /// The elements in the same scope as `id`: its parent's children, or the root canvas.
    pub fn siblings(&self, id: ElementId) -> Option<&IndexMap<String, ElementId>> {
        match self.arena.get(id)?.parent() {
            Some(parent) => self
                .arena
                .get(parent)
                .and_then(|p| p.as_process_group())
                .map(|pg| pg.children()),
            None => Some(&self.root),
        }
    }

    /// The process group containing `id`, `None` for root canvas elements.
    pub fn get_parent_element(&self, id: ElementId) -> Option<ElementId> {
        self.arena.get(id).and_then(|e| e.parent())
    }

    /// Follows a breadcrumb such as `flow-name/group/debug`. The flow name prefix is optional.
    pub fn element_by_path(&self, path: &str) -> Option<ElementId> {
        let mut names = path.split(PG_NAME_DELIMITER).peekable();
        if names.peek() == Some(&self.name.as_str()) {
            names.next();
        }

        let mut current = self.root.get(names.next()?).copied()?;
        for name in names {
            current = self.arena.get(current)?.as_process_group()?.child(name)?;
        }
        Some(current)
    }

    pub fn components(&self) -> &ComponentCache {
        &self.components
    }

    pub fn find_component_by_path(&self, path: &str) -> Result<Option<&Component>> {
        Ok(self
            .components
            .find_by_path(path)?
            .and_then(|id| self.components.get(id)))
    }

    pub fn find_controller_by_name(&self, name: &str) -> Result<Option<&Controller>> {
        Ok(find_controller_index(&self.controllers, name)?.map(|i| &self.controllers[i]))
    }

    /// Records the engine identifier of a materialized controller.
    pub fn assign_controller_id(&mut self, name: &str, id: impl Into<String>) -> Result<()> {
        let index = find_controller_index(&self.controllers, name)?
            .ok_or_else(|| FlowError::Deployment(format!("No controller named {}", name)))?;
        self.controllers[index].id.assign(id.into())?;
        Ok(())
    }

    /// Names of loaded components that no process group instantiated.
    pub fn unused_components(&self) -> Vec<&str> {
        self.components
            .iter()
            .filter(|(_, c)| !c.is_used())
            .map(|(_, c)| c.name.as_str())
            .collect()
    }
}

pub(crate) fn find_controller_index(
    controllers: &[Controller],
    name: &str,
) -> std::result::Result<Option<usize>, ValidationError> {
    let matches: Vec<usize> = controllers
        .iter()
        .positions(|c| c.name == name)
        .collect();
    match matches.as_slice() {
        [] => Ok(None),
        [index] => Ok(Some(*index)),
        _ => Err(ValidationError::AmbiguousController(name.to_string())),
    }
}

fn build_services<T>(
    specs: &[ServiceSpec],
    kind: &'static str,
    label: &'static str,
    build: impl Fn(&ServiceSpec) -> Result<T>,
) -> Result<Vec<T>> {
    if let Some(duplicate) = specs.iter().map(|s| &s.name).duplicates().next() {
        return Err(ValidationError::DuplicateService {
            kind,
            label,
            name: duplicate.clone(),
        }
        .into());
    }
    specs.iter().map(build).collect()
}
