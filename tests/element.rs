//! Tests for element construction, naming rules and flow definition parsing.
mod common;
use common::*;
use flowlib::model::{ElementArena, PG_NAME_DELIMITER, WriteOnce, check_name};
use flowlib::prelude::*;

#[test]
fn test_processor_from_spec() {
    let spec = node(
        r#"
name: debug
type: processor
config:
  package_id: org.apache.nifi.processors.standard.DebugFlow
  properties:
    Fail Count: 3
    Prefix: "{{ prefix }}"
connections:
  - name: log
    relationships: [success, failure]
"#,
    );
    let element = Element::from_spec(&spec, "my-flow").expect("valid processor");

    assert_eq!(element.name, "debug");
    assert_eq!(element.element_type(), ElementType::Processor);
    assert_eq!(element.parent_path, "my-flow");
    assert_eq!(element.path(), "my-flow/debug");
    assert!(element.parent().is_none());
    assert!(!element.id.is_set());

    let processor = element.as_processor().expect("is a processor");
    assert_eq!(processor.config.package_id, DEBUG_PACKAGE);
    assert_eq!(processor.config.properties["Fail Count"], "3");
    assert_eq!(processor.config.properties["Prefix"], "{{ prefix }}");

    assert_eq!(element.connections.len(), 1);
    assert_eq!(element.connections[0].name, "log");
    assert_eq!(element.connections[0].relationships, vec!["success", "failure"]);
}

#[test]
fn test_process_group_and_ports_from_spec() {
    let group = node(
        r#"
name: pg
type: process_group
component_path: simple-component.yaml
controllers:
  ssl: ssl-context
vars:
  region: eu
"#,
    );
    let element = Element::from_spec(&group, "my-flow").expect("valid process group");
    let pg = element.as_process_group().expect("is a process group");
    assert_eq!(pg.component_path.as_deref(), Some("simple-component.yaml"));
    assert_eq!(pg.controllers["ssl"], "ssl-context");
    assert_eq!(pg.vars["region"], Value::from("eu"));
    assert!(pg.children().is_empty());

    let input = Element::from_spec(&NodeSpec::new("input_port", "in"), "my-flow").expect("port");
    let output = Element::from_spec(&NodeSpec::new("output_port", "out"), "my-flow").expect("port");
    assert_eq!(input.element_type(), ElementType::InputPort);
    assert_eq!(output.element_type(), ElementType::OutputPort);
}

#[test]
fn test_element_requires_type() {
    let spec = node("name: debug");
    let result = Element::from_spec(&spec, "my-flow");
    assert!(matches!(result, Err(DefinitionError::MissingType)));
}

#[test]
fn test_element_rejects_unknown_type() {
    let result = Element::from_spec(&NodeSpec::new("funnel", "f"), "my-flow");
    match result {
        Err(DefinitionError::UnknownType(t)) => assert_eq!(t, "funnel"),
        other => panic!("Expected UnknownType, got {:?}", other),
    }
}

#[test]
fn test_element_requires_name() {
    let missing = node("type: input_port");
    let err = Element::from_spec(&missing, "my-flow/pg").unwrap_err();
    assert!(matches!(err, DefinitionError::EmptyName { .. }));
    assert!(err.to_string().contains("my-flow/pg"));

    let empty = NodeSpec::new("input_port", "");
    assert!(matches!(
        Element::from_spec(&empty, "my-flow"),
        Err(DefinitionError::EmptyName { .. })
    ));
}

#[test]
fn test_element_name_may_not_contain_delimiter() {
    let spec = NodeSpec::new("output_port", "a/b");
    let err = Element::from_spec(&spec, "my-flow").unwrap_err();
    assert!(matches!(
        err,
        DefinitionError::NameContainsDelimiter { delimiter, .. } if delimiter == PG_NAME_DELIMITER
    ));
    assert!(err.to_string().contains("may not contain '/'"));
}

#[test]
fn test_processor_requires_package_id() {
    let no_config = NodeSpec::new("processor", "debug");
    assert!(matches!(
        Element::from_spec(&no_config, "my-flow"),
        Err(DefinitionError::MissingPackageId { .. })
    ));

    let no_package = node(
        r#"
name: debug
type: processor
config:
  properties:
    a: b
"#,
    );
    let err = Element::from_spec(&no_package, "my-flow").unwrap_err();
    assert!(err.to_string().contains("config.package_id is a required field"));
}

#[test]
fn test_check_name() {
    assert!(check_name("valid-name").is_ok());
    assert!(check_name("").is_err());
    assert!(check_name("a/b").is_err());
    assert!(check_name("env").is_err());
    assert!(check_name("controller").is_err());
    assert!(check_name("environment").is_ok());
}

#[test]
fn test_write_once_rejects_second_assignment() {
    let mut id: WriteOnce<String> = WriteOnce::unset("id");
    assert!(!id.is_set());
    assert_eq!(id.as_deref(), None);

    id.assign("abc-123".to_string()).expect("first assignment");
    assert_eq!(id.as_deref(), Some("abc-123"));

    let err = id.assign("abc-123".to_string()).unwrap_err();
    assert!(matches!(err, AssignmentError::AlreadyAssigned("id")));
    assert_eq!(id.get().map(String::as_str), Some("abc-123"));
}

#[test]
fn test_arena_hands_out_sequential_ids() {
    let mut arena = ElementArena::new();
    let a = arena.push(Element::from_spec(&NodeSpec::new("input_port", "a"), "f").unwrap());
    let b = arena.push(Element::from_spec(&NodeSpec::new("output_port", "b"), "f").unwrap());
    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(arena[b].name, "b");
    assert_eq!(arena.iter().map(|(_, e)| e.name.as_str()).collect::<Vec<_>>(), ["a", "b"]);
}

#[test]
fn test_flow_definition_from_yaml() {
    let flow = load_test_flow();
    assert_eq!(flow.name, "test-flow");
    assert_eq!(flow.version.as_deref(), Some("1.0"));
    assert_eq!(flow.state(), FlowState::Raw);
    assert!(!flow.is_initialized());
    assert_eq!(flow.canvas.len(), 3);
    assert_eq!(flow.controllers.len(), 1);
    assert_eq!(flow.controllers[0].config.package_id, SSL_PACKAGE);
    assert_eq!(flow.reporting_tasks.len(), 1);
    assert!(flow.elements().is_empty());
}

#[test]
fn test_flow_accepts_controllers_alias() {
    let yaml = r#"
name: alias-flow
controllers:
  - name: ssl
    config:
      package_id: org.apache.nifi.ssl.StandardSSLContextService
"#;
    let flow = FlowDefinition::from_yaml(yaml).expect("alias should parse");
    assert_eq!(flow.controllers[0].name, "ssl");
    assert!(flow.controllers[0].config.properties.is_empty());
}

#[test]
fn test_flow_rejects_duplicate_controllers() {
    let yaml = r#"
name: dup-flow
controller_services:
  - name: ssl
    config:
      package_id: a.b.C
  - name: ssl
    config:
      package_id: a.b.D
"#;
    let err = FlowDefinition::from_yaml(yaml).unwrap_err();
    assert!(matches!(
        err,
        FlowError::Validation(ValidationError::DuplicateService { .. })
    ));
    assert!(err.to_string().starts_with("Duplicate controllers are defined"));
}

#[test]
fn test_flow_rejects_duplicate_reporting_tasks() {
    let yaml = r#"
name: dup-flow
reporting_tasks:
  - name: task
    config:
      package_id: a.b.C
  - name: task
    config:
      package_id: a.b.C
"#;
    let err = FlowDefinition::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().starts_with("Duplicate reporting_tasks are defined"));
}

#[test]
fn test_service_requires_package_id() {
    let yaml = r#"
name: flow
controller_services:
  - name: ssl
"#;
    let err = FlowDefinition::from_yaml(yaml).unwrap_err();
    assert!(matches!(
        err,
        FlowError::Definition(DefinitionError::MissingServicePackageId { kind: "controller", .. })
    ));
}

#[test]
fn test_flow_name_is_checked() {
    assert!(matches!(
        FlowDefinition::from_yaml("name: env"),
        Err(FlowError::Definition(DefinitionError::InvalidName { .. }))
    ));
    assert!(matches!(
        FlowDefinition::from_yaml("name: a/b"),
        Err(FlowError::Definition(DefinitionError::InvalidName { .. }))
    ));
}

#[test]
fn test_malformed_flow_yaml() {
    let result = FlowDefinition::from_yaml("name: [unterminated");
    assert!(matches!(
        result,
        Err(FlowError::Definition(DefinitionError::FlowSource(_)))
    ));
}
