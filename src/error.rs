use thiserror::Error;

/// Errors raised when a definition is malformed: missing discriminators,
/// illegal names, missing mandatory fields or unparseable sources.
#[derive(Error, Debug, Clone)]
pub enum DefinitionError {
    #[error(
        "Element definitions require a 'type' field, one of ['processor', 'process_group', 'input_port', 'output_port']"
    )]
    MissingType,

    #[error("Element 'type' field must be one of ['processor', 'process_group', 'input_port', 'output_port'], found '{0}'")]
    UnknownType(String),

    #[error("Element names may not be empty. Found invalid element with parent path: {parent_path}")]
    EmptyName { parent_path: String },

    #[error("Invalid element: '{name}'. Element names may not contain '{delimiter}' characters")]
    NameContainsDelimiter { name: String, delimiter: char },

    #[error("Invalid name: '{name}'. {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Invalid processor definition '{name}'. config.package_id is a required field")]
    MissingPackageId { name: String },

    #[error("Invalid {kind} definition '{name}'. config.package_id is a required field")]
    MissingServicePackageId { kind: &'static str, name: String },

    #[error("Component does not contain a 'name' field: {locator}")]
    MissingComponentName { locator: String },

    #[error("Failed to load component source '{locator}': {message}")]
    ComponentSource { locator: String, message: String },

    #[error("Failed to parse flow definition: {0}")]
    FlowSource(String),

    #[error("Invalid template '{template}': {message}")]
    Template { template: String, message: String },
}

/// Errors raised when a well-formed definition is semantically invalid.
#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("Root FlowElement named '{0}' is already defined.")]
    DuplicateRootElement(String),

    #[error("Found duplicate elements. A FlowElement named '{name}' is already defined in {component}")]
    DuplicateElement { name: String, component: String },

    #[error("Duplicate {kind} are defined. {label} names must be unique, found '{name}' more than once.")]
    DuplicateService {
        kind: &'static str,
        label: &'static str,
        name: String,
    },

    #[error("Found multiple loaded components with source_file {0}")]
    AmbiguousComponent(String),

    #[error("Found multiple controllers named {0}")]
    AmbiguousController(String),

    #[error("ProcessGroup {0} does not define a component_path")]
    MissingComponentPath(String),

    #[error("Component reference {component_path} not found for ProcessGroup {group} loaded from {origin}")]
    ComponentNotFound {
        component_path: String,
        group: String,
        origin: String,
    },

    #[error("Missing required_controllers. {key} is not provided but is required by {component}")]
    MissingRequiredController { key: String, component: String },

    #[error("Invalid controller reference. No controller named {controller} is defined for {key} required by {component}")]
    UnknownController {
        key: String,
        controller: String,
        component: String,
    },

    #[error("Invalid controller reference. A controller of type {provided} was provided, but {required} is required by {component}")]
    ControllerTypeMismatch {
        provided: String,
        required: String,
        component: String,
    },

    #[error("Missing required_vars. {var} is not provided but is required by {component}")]
    MissingRequiredVar { var: String, component: String },

    #[error("Recursive component reference found in {0}. A component cannot reference itself.")]
    SelfReference(String),

    #[error(
        "Circular component reference found in {component_path}. One of this components's ancestors is another instance of this component: {}",
        .chain.join(" -> ")
    )]
    CircularReference {
        component_path: String,
        chain: Vec<String>,
    },

    #[error("Connection from {source_element} references an unknown element {target} in {scope}")]
    UnknownConnectionTarget {
        source_element: String,
        target: String,
        scope: String,
    },

    #[error("ProcessGroup {group} does not define a {port_field} for connection {direction} {peer}")]
    MissingPort {
        group: String,
        port_field: &'static str,
        direction: &'static str,
        peer: String,
    },

    #[error("ProcessGroup {group} does not define an {port_kind} named {port}, must be one of: {valid}")]
    UnknownPort {
        group: String,
        port_kind: &'static str,
        port: String,
        valid: String,
    },

    #[error("Cannot validate an uninitialized flow. Call initialize() first.")]
    Uninitialized,
}

/// Errors raised when the engine is driven with an inconsistent setup.
#[derive(Error, Debug, Clone)]
pub enum ConfigurationError {
    #[error("Only one of component_dir or with_components should be provided")]
    ConflictingComponentSources,

    #[error("Attempted to load component {0} but no component_dir or components were specified")]
    NoComponentSource(String),

    #[error("Cannot {operation} flow in state {state}")]
    InvalidState {
        operation: &'static str,
        state: String,
    },

    #[error("Failed to read configuration '{path}': {message}")]
    ConfigFile { path: String, message: String },
}

/// Raised when a write-once field is assigned a second time.
#[derive(Error, Debug, Clone)]
pub enum AssignmentError {
    #[error("Attempted to change readonly attribute '{0}' after initialization")]
    AlreadyAssigned(&'static str),
}

/// Top-level error returned by every fallible public operation.
#[derive(Error, Debug, Clone)]
pub enum FlowError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("Deployment failed: {0}")]
    Deployment(String),
}

pub type Result<T> = std::result::Result<T, FlowError>;
