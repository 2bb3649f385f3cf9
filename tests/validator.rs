//! Tests for structural validation of connections and ports.
mod common;
use common::*;
use flowlib::prelude::*;

fn simple_group() -> NodeSpec {
    node(
        r#"
name: process-group
type: process_group
component_path: simple-component.yaml
"#,
    )
}

fn debug_processor() -> NodeSpec {
    node(
        r#"
name: debug
type: processor
config:
  package_id: org.apache.nifi.processors.standard.DebugFlow
"#,
    )
}

fn connect(mut spec: NodeSpec, yaml: &str) -> NodeSpec {
    spec.connections = Some(vec![serde_yaml::from_str(yaml).expect("connection")]);
    spec
}

fn validate(canvas: Vec<NodeSpec>) -> flowlib::Result<()> {
    let mut flow = flow_with_canvas(canvas);
    flow.initialize(&dir_source())?;
    flow.validate()
}

#[test]
fn test_test_flow_is_valid() {
    let flow = init_test_flow();
    flow.validate().expect("test flow is structurally valid");
}

#[test]
fn test_connection_from_group_requires_from_port() {
    let err = validate(vec![
        connect(simple_group(), "name: debug"),
        debug_processor(),
    ])
    .unwrap_err();
    assert!(matches!(
        err,
        FlowError::Validation(ValidationError::MissingPort { .. })
    ));
    let message = err.to_string();
    assert!(message.starts_with("ProcessGroup "));
    assert!(message.contains("does not define a from_port for connection"));
}

#[test]
fn test_connection_from_group_requires_known_output_port() {
    let err = validate(vec![
        connect(simple_group(), "{name: debug, from_port: not-real}"),
        debug_processor(),
    ])
    .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("does not define an OutputPort named not-real, must be one of: output"));
}

#[test]
fn test_connection_to_group_requires_to_port() {
    let err = validate(vec![
        connect(debug_processor(), "name: process-group"),
        simple_group(),
    ])
    .unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("ProcessGroup canvas-flow/process-group"));
    assert!(message.contains("does not define a to_port for connection"));
}

#[test]
fn test_connection_to_group_requires_known_input_port() {
    let err = validate(vec![
        connect(debug_processor(), "{name: process-group, to_port: not-real}"),
        simple_group(),
    ])
    .unwrap_err();
    match &err {
        FlowError::Validation(ValidationError::UnknownPort {
            port_kind, valid, ..
        }) => {
            assert_eq!(*port_kind, "InputPort");
            assert_eq!(valid, "input");
        }
        other => panic!("Expected UnknownPort, got {:?}", other),
    }
}

#[test]
fn test_valid_ports_pass() {
    validate(vec![
        connect(debug_processor(), "{name: process-group, to_port: input}"),
        connect(simple_group(), "{name: sink, from_port: output}"),
        NodeSpec::new("output_port", "sink"),
    ])
    .expect("ports match");
}

#[test]
fn test_connection_between_leaves_needs_no_ports() {
    validate(vec![
        connect(NodeSpec::new("input_port", "in"), "name: debug"),
        debug_processor(),
    ])
    .expect("no process groups involved");
}

#[test]
fn test_connection_to_unknown_element() {
    let err = validate(vec![connect(debug_processor(), "name: nowhere")]).unwrap_err();
    assert!(matches!(
        err,
        FlowError::Validation(ValidationError::UnknownConnectionTarget { .. })
    ));
    assert!(err.to_string().contains("nowhere"));
}

#[test]
fn test_connections_do_not_cross_scopes() {
    // `debug` lives inside the group, not next to the root processor.
    let err = validate(vec![
        simple_group(),
        connect(NodeSpec::new("input_port", "in"), "name: debug"),
    ])
    .unwrap_err();
    assert!(matches!(
        err,
        FlowError::Validation(ValidationError::UnknownConnectionTarget { .. })
    ));
}

#[test]
fn test_uninitialized_flow_cannot_be_validated() {
    let flow = load_test_flow();
    let err = flow.validate().unwrap_err();
    assert!(matches!(
        err,
        FlowError::Validation(ValidationError::Uninitialized)
    ));
    assert!(err.to_string().starts_with("Cannot validate an uninitialized flow"));
}

#[test]
fn test_validator_is_usable_directly() {
    let flow = init_test_flow();
    StructuralValidator::new().validate(&flow).expect("valid");
}
