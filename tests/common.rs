//! Common test utilities for building flow definitions and components.
use flowlib::definition::{PackageConfigSpec, ServiceSpec};
use flowlib::prelude::*;
use std::path::PathBuf;

/// A flow exercising globals, a controller, a reporting task, a component with
/// requirements and a nested component.
#[allow(dead_code)]
pub const TEST_FLOW: &str = r#"
name: test-flow
version: "1.0"
flowlib_version: "0.4.0"
comments: Flow used by the integration tests.
global_vars:
  global_var: g
  bucket: "{{ env('BUCKET', 'landing') }}"
controller_services:
  - name: ssl-context
    config:
      package_id: org.apache.nifi.ssl.StandardSSLContextService
      properties:
        Keystore Filename: "{{ env('KEYSTORE', '/etc/keystore.jks') }}"
        Bucket: "{{ bucket }}"
reporting_tasks:
  - name: site-to-site
    config:
      package_id: org.apache.nifi.reporting.SiteToSiteStatusReportingTask
      properties:
        SSL Context Service: "{{ controller('ssl-context') }}"
canvas:
  - name: generate
    type: processor
    config:
      package_id: org.apache.nifi.processors.standard.GenerateFlowFile
      properties:
        Custom Text: "{{ global_var }}-root"
        Batch Size: 1
    connections:
      - name: test-pg
        to_port: input
  - name: test-pg
    type: process_group
    component_path: test-component.yaml
    controllers:
      test_controller: ssl-context
    vars:
      required_var: req
      default_var2: y
    connections:
      - name: nested-pg
        from_port: output
        to_port: input
  - name: nested-pg
    type: process_group
    component_path: nested-component.yaml
"#;

#[allow(dead_code)]
pub const SSL_PACKAGE: &str = "org.apache.nifi.ssl.StandardSSLContextService";

#[allow(dead_code)]
pub const DEBUG_PACKAGE: &str = "org.apache.nifi.processors.standard.DebugFlow";

/// Directory holding the YAML component fixtures.
#[allow(dead_code)]
pub fn component_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/components")
}

#[allow(dead_code)]
pub fn dir_source() -> ComponentSource {
    ComponentSource::Directory(component_dir())
}

/// Parses the test flow without initializing it.
#[allow(dead_code)]
pub fn load_test_flow() -> FlowDefinition {
    FlowDefinition::from_yaml(TEST_FLOW).expect("test flow should parse")
}

/// Parses and composes the test flow against the fixture directory.
#[allow(dead_code)]
pub fn init_test_flow() -> FlowDefinition {
    let mut flow = load_test_flow();
    flow.initialize(&dir_source())
        .expect("test flow should compose");
    flow
}

/// A minimal flow with one SSL controller and the given canvas.
#[allow(dead_code)]
pub fn flow_with_canvas(canvas: Vec<NodeSpec>) -> FlowDefinition {
    let spec = FlowSpec {
        name: "canvas-flow".to_string(),
        controller_services: vec![ServiceSpec {
            name: "ssl-context".to_string(),
            config: PackageConfigSpec {
                package_id: Some(SSL_PACKAGE.to_string()),
                ..Default::default()
            },
        }],
        canvas,
        ..Default::default()
    };
    FlowDefinition::from_spec(spec).expect("canvas flow should build")
}

#[allow(dead_code)]
pub fn component_spec(yaml: &str) -> ComponentSpec {
    serde_yaml::from_str(yaml).expect("component spec should parse")
}

#[allow(dead_code)]
pub fn node(yaml: &str) -> NodeSpec {
    serde_yaml::from_str(yaml).expect("node spec should parse")
}

/// An environment with no variables set.
#[allow(dead_code)]
pub fn empty_env() -> MapEnv {
    MapEnv::new()
}
