//! Field schemas and input validation
//!
//! Every entity declares its fields once as a `FieldSpec` slice. The slice
//! order is the wire order used by the SOAP writer, and the same slice drives
//! the required/length checks applied before anything reaches the database.

use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// What kind of value a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Store-assigned identity; never validated on input
    Identity,
    /// Free text
    Text,
    /// Embedded entity with its own schema
    Nested,
}

/// Declarative constraints for a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub max_length: Option<usize>,
}

impl FieldSpec {
    pub const fn identity(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Identity,
            required: false,
            max_length: None,
        }
    }

    pub const fn text(name: &'static str, required: bool, max_length: usize) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required,
            max_length: Some(max_length),
        }
    }

    pub const fn nested(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Nested,
            required: true,
            max_length: None,
        }
    }
}

/// A value whose text fields can be checked against a schema
pub trait Schema {
    const FIELDS: &'static [FieldSpec];

    /// Current value of a text field, `None` when absent
    fn text(&self, field: &str) -> Option<&str>;
}

/// Check every text field of `record` against its schema.
pub fn check<T: Schema>(record: &T) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    for spec in T::FIELDS.iter().filter(|f| f.kind == FieldKind::Text) {
        if let Some(error) = check_text(spec, record.text(spec.name)) {
            errors.add(spec.name, error);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_text(spec: &FieldSpec, value: Option<&str>) -> Option<ValidationError> {
    let value = match value {
        Some(v) if !v.trim().is_empty() => v,
        _ if spec.required => {
            return Some(field_error(
                "required",
                format!("{} must not be blank", spec.name),
            ))
        }
        _ => return None,
    };

    match spec.max_length {
        Some(max) if value.chars().count() > max => {
            let mut error = field_error(
                "length",
                format!("{} must be at most {} characters", spec.name, max),
            );
            error.add_param(Cow::from("max"), &max);
            Some(error)
        }
        _ => None,
    }
}

/// Build a field error with a human readable message
pub fn field_error(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::from(message));
    error
}

/// Attach the errors of an embedded entity under `field` of `parent`.
pub fn nest(parent: &mut ValidationErrors, field: &'static str, nested: ValidationErrors) {
    parent
        .errors_mut()
        .insert(field.into(), ValidationErrorsKind::Struct(Box::new(nested)));
}
