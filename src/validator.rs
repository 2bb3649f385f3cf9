//! Structural validation of a composed element tree.

use crate::error::{FlowError, ValidationError};
use crate::model::{Connection, Element, ElementId, ElementKind, FlowDefinition, FlowState};
use itertools::Itertools;

pub const TRACING_TARGET: &str = "flowlib::validator";

/// Checks that every connection lands on a sibling, and that connections
/// crossing a process group boundary name one of its declared ports.
///
/// Validation is read-only and stops at the first violation.
#[derive(Debug, Default)]
pub struct StructuralValidator;

impl StructuralValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, flow: &FlowDefinition) -> Result<(), FlowError> {
        if flow.state() == FlowState::Raw {
            return Err(ValidationError::Uninitialized.into());
        }
        tracing::debug!(target: TRACING_TARGET, flow = %flow.name, "Validating flow");

        for (id, element) in flow.arena().iter() {
            for connection in &element.connections {
                self.validate_connection(flow, id, element, connection)?;
            }
        }
        Ok(())
    }

    fn validate_connection(
        &self,
        flow: &FlowDefinition,
        id: ElementId,
        source: &Element,
        connection: &Connection,
    ) -> Result<(), FlowError> {
        let target = flow
            .siblings(id)
            .and_then(|siblings| siblings.get(&connection.name))
            .and_then(|target| flow.element(*target))
            .ok_or_else(|| ValidationError::UnknownConnectionTarget {
                source_element: source.path(),
                target: connection.name.clone(),
                scope: source.parent_path.clone(),
            })?;

        if source.is_process_group() {
            let port = connection
                .from_port
                .as_deref()
                .ok_or_else(|| ValidationError::MissingPort {
                    group: source.path(),
                    port_field: "from_port",
                    direction: "to",
                    peer: target.name.clone(),
                })?;
            check_port(flow, source, port, "OutputPort", |kind| {
                matches!(kind, ElementKind::OutputPort)
            })?;
        }

        if target.is_process_group() {
            let port = connection
                .to_port
                .as_deref()
                .ok_or_else(|| ValidationError::MissingPort {
                    group: target.path(),
                    port_field: "to_port",
                    direction: "from",
                    peer: source.name.clone(),
                })?;
            check_port(flow, target, port, "InputPort", |kind| {
                matches!(kind, ElementKind::InputPort)
            })?;
        }
        Ok(())
    }
}

fn check_port(
    flow: &FlowDefinition,
    group: &Element,
    port: &str,
    port_kind: &'static str,
    is_kind: impl Fn(&ElementKind) -> bool,
) -> Result<(), ValidationError> {
    let ports: Vec<&str> = group
        .as_process_group()
        .map(|pg| {
            pg.children()
                .values()
                .filter_map(|child| flow.element(*child))
                .filter(|child| is_kind(&child.kind))
                .map(|child| child.name.as_str())
                .collect()
        })
        .unwrap_or_default();

    if ports.contains(&port) {
        return Ok(());
    }
    Err(ValidationError::UnknownPort {
        group: group.path(),
        port_kind,
        port: port.to_string(),
        valid: ports.iter().join(", "),
    })
}
