use super::naming::PG_NAME_DELIMITER;
use super::service::PackageConfig;
use super::write_once::WriteOnce;
use crate::component::ComponentId;
use crate::definition::{ConnectionSpec, NodeSpec};
use crate::error::DefinitionError;
use crate::template::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// Index of an element inside its flow's [`ElementArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The element type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    ProcessGroup,
    Processor,
    InputPort,
    OutputPort,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::ProcessGroup => "process_group",
            ElementType::Processor => "processor",
            ElementType::InputPort => "input_port",
            ElementType::OutputPort => "output_port",
        }
    }
}

impl FromStr for ElementType {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "process_group" => Ok(ElementType::ProcessGroup),
            "processor" => Ok(ElementType::Processor),
            "input_port" => Ok(ElementType::InputPort),
            "output_port" => Ok(ElementType::OutputPort),
            other => Err(DefinitionError::UnknownType(other.to_string())),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of a process group through composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositionState {
    #[default]
    Unresolved,
    Loading,
    Validated,
    Composed,
}

/// An outgoing connection from one element to a sibling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub name: String,
    pub from_port: Option<String>,
    pub to_port: Option<String>,
    pub relationships: Vec<String>,
}

impl From<&ConnectionSpec> for Connection {
    fn from(spec: &ConnectionSpec) -> Self {
        Self {
            name: spec.name.clone(),
            from_port: spec.from_port.clone(),
            to_port: spec.to_port.clone(),
            relationships: spec.relationships.clone().unwrap_or_default(),
        }
    }
}

/// The instantiation of a component.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessGroup {
    pub component_path: Option<String>,
    /// Required controller name mapped to the name of the flow controller bound to it.
    pub controllers: IndexMap<String, String>,
    /// Instance-level variable overrides.
    pub vars: IndexMap<String, Value>,
    pub state: CompositionState,
    pub(crate) component: Option<ComponentId>,
    /// Required controller name mapped to an index into the flow's controllers.
    pub(crate) bound_controllers: IndexMap<String, usize>,
    pub(crate) children: IndexMap<String, ElementId>,
}

impl ProcessGroup {
    pub fn component(&self) -> Option<ComponentId> {
        self.component
    }

    pub fn children(&self) -> &IndexMap<String, ElementId> {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<ElementId> {
        self.children.get(name).copied()
    }

    pub fn bound_controllers(&self) -> &IndexMap<String, usize> {
        &self.bound_controllers
    }
}

/// A leaf processor.
#[derive(Debug, Clone, PartialEq)]
pub struct Processor {
    pub config: PackageConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    ProcessGroup(ProcessGroup),
    Processor(Processor),
    InputPort,
    OutputPort,
}

/// Anything that can appear on a canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    /// Engine identifier, assigned by the deployer.
    pub id: WriteOnce<String>,
    /// Engine identifier of the containing process group.
    pub parent_id: WriteOnce<String>,
    /// Breadcrumb of the containing scope, e.g. `flow-name/group-name`.
    pub parent_path: String,
    /// Name of the component that declared this element, `root` for canvas elements.
    pub src_component_name: String,
    pub connections: Vec<Connection>,
    pub kind: ElementKind,
    pub(crate) parent: Option<ElementId>,
}

impl Element {
    /// Builds an element from a raw node spec.
    pub fn from_spec(spec: &NodeSpec, parent_path: &str) -> Result<Self, DefinitionError> {
        let type_name = spec
            .element_type
            .as_deref()
            .ok_or(DefinitionError::MissingType)?;

        let name = spec.name.as_deref().unwrap_or_default();
        if name.is_empty() {
            return Err(DefinitionError::EmptyName {
                parent_path: parent_path.to_string(),
            });
        }
        if name.contains(PG_NAME_DELIMITER) {
            return Err(DefinitionError::NameContainsDelimiter {
                name: name.to_string(),
                delimiter: PG_NAME_DELIMITER,
            });
        }

        let kind = match type_name.parse::<ElementType>()? {
            ElementType::ProcessGroup => ElementKind::ProcessGroup(ProcessGroup {
                component_path: spec.component_path.clone(),
                controllers: spec.controllers.clone(),
                vars: spec.vars.clone(),
                state: CompositionState::Unresolved,
                component: None,
                bound_controllers: IndexMap::new(),
                children: IndexMap::new(),
            }),
            ElementType::Processor => {
                let config = spec
                    .config
                    .as_ref()
                    .and_then(PackageConfig::from_spec)
                    .ok_or_else(|| DefinitionError::MissingPackageId {
                        name: name.to_string(),
                    })?;
                ElementKind::Processor(Processor { config })
            }
            ElementType::InputPort => ElementKind::InputPort,
            ElementType::OutputPort => ElementKind::OutputPort,
        };

        Ok(Self {
            name: name.to_string(),
            id: WriteOnce::unset("id"),
            parent_id: WriteOnce::unset("parent_id"),
            parent_path: parent_path.to_string(),
            src_component_name: String::new(),
            connections: spec
                .connections
                .iter()
                .flatten()
                .map(Connection::from)
                .collect(),
            kind,
            parent: None,
        })
    }

    pub fn element_type(&self) -> ElementType {
        match self.kind {
            ElementKind::ProcessGroup(_) => ElementType::ProcessGroup,
            ElementKind::Processor(_) => ElementType::Processor,
            ElementKind::InputPort => ElementType::InputPort,
            ElementKind::OutputPort => ElementType::OutputPort,
        }
    }

    /// The containing process group, `None` for elements on the root canvas.
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// The full breadcrumb of this element, e.g. `flow-name/group-name/debug`.
    pub fn path(&self) -> String {
        format!("{}{}{}", self.parent_path, PG_NAME_DELIMITER, self.name)
    }

    pub fn is_process_group(&self) -> bool {
        matches!(self.kind, ElementKind::ProcessGroup(_))
    }

    pub fn as_process_group(&self) -> Option<&ProcessGroup> {
        match &self.kind {
            ElementKind::ProcessGroup(pg) => Some(pg),
            _ => None,
        }
    }

    pub fn as_process_group_mut(&mut self) -> Option<&mut ProcessGroup> {
        match &mut self.kind {
            ElementKind::ProcessGroup(pg) => Some(pg),
            _ => None,
        }
    }

    pub fn as_processor(&self) -> Option<&Processor> {
        match &self.kind {
            ElementKind::Processor(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_processor_mut(&mut self) -> Option<&mut Processor> {
        match &mut self.kind {
            ElementKind::Processor(p) => Some(p),
            _ => None,
        }
    }
}

/// Owns every element of a flow. Process groups refer to their children by id.
#[derive(Debug, Clone, Default)]
pub struct ElementArena {
    elements: Vec<Element>,
}

impl ElementArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: Element) -> ElementId {
        self.elements.push(element);
        ElementId(self.elements.len() - 1)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Iterates in creation order, which is depth-first declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementId(i), e))
    }
}

impl Index<ElementId> for ElementArena {
    type Output = Element;

    fn index(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }
}

impl IndexMut<ElementId> for ElementArena {
    fn index_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.0]
    }
}
