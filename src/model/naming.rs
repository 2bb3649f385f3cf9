use crate::error::DefinitionError;

/// Separates names in a breadcrumb path such as `flow-name/group-name`.
pub const PG_NAME_DELIMITER: char = '/';

/// Names reserved for the template helpers.
pub const RESERVED_WORDS: [&str; 2] = ["env", "controller"];

/// Checks that a flow, component, controller or reporting task name is legal.
pub fn check_name(name: &str) -> Result<(), DefinitionError> {
    let invalid = |reason: String| DefinitionError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("Names may not be empty".to_string()));
    }
    if name.contains(PG_NAME_DELIMITER) {
        return Err(invalid(format!(
            "Names may not contain '{}' characters",
            PG_NAME_DELIMITER
        )));
    }
    if RESERVED_WORDS.contains(&name) {
        return Err(invalid(format!(
            "'{}' is a reserved word, names may not be one of {:?}",
            name, RESERVED_WORDS
        )));
    }
    Ok(())
}
