//! Validation errors for records about to be saved or exported.
//!
//! Errors carry the offending field, a message and a suggestion, so both the JSON API and a
//! human reading the message know what to fix.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    pub message: String,
    /// Suggestion for how to fix the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Create error for empty required field
    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} is required.", label)).with_suggestion(format!(
            "Fill in the {} before continuing",
            label.to_lowercase()
        ))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors with formatted output.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// One message listing every error, numbered.
    pub fn to_message(&self) -> String {
        match self.errors.as_slice() {
            [] => String::new(),
            [single] => single.message.clone(),
            many => many
                .iter()
                .enumerate()
                .map(|(i, e)| format!("{}. {}", i + 1, e))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Ok if no errors were collected.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_message())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate that a string is not empty after trimming
pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        let mut errors = ValidationErrors::new();
        validate_required("   ", "requestNumber", "PR Number", &mut errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.to_message(), "PR Number is required.");
    }

    #[test]
    fn test_required_accepts_text() {
        let mut errors = ValidationErrors::new();
        validate_required("PR-1", "requestNumber", "PR Number", &mut errors);
        assert!(errors.into_result().is_ok());
    }

    #[test]
    fn test_display_includes_field_and_suggestion() {
        let error = ValidationError::empty_field("requestNumber", "PR Number");
        let shown = error.to_string();
        assert!(shown.starts_with("[requestNumber] PR Number is required."));
        assert!(shown.contains("pr number"));
    }
}
