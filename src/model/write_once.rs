use crate::error::AssignmentError;

/// A value that transitions exactly once from unset to set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOnce<T> {
    field: &'static str,
    value: Option<T>,
}

impl<T> WriteOnce<T> {
    pub const fn unset(field: &'static str) -> Self {
        Self { field, value: None }
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Sets the value. Any second assignment is rejected, even with an equal value.
    pub fn assign(&mut self, value: T) -> Result<(), AssignmentError> {
        if self.value.is_some() {
            return Err(AssignmentError::AlreadyAssigned(self.field));
        }
        self.value = Some(value);
        Ok(())
    }
}

impl WriteOnce<String> {
    pub fn as_deref(&self) -> Option<&str> {
        self.value.as_deref()
    }
}
