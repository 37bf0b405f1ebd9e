//! Error types for forms.

use std::collections::BTreeMap;

use reform_http::TransportError;
use thiserror::Error;

use crate::fields::FieldId;

/// Form-specific errors.
#[derive(Debug, Error)]
pub enum FormError {
    /// The merged configuration does not fit the option types.
    #[error("invalid options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    /// No field with this identity or name.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The select has no such option.
    #[error("field {field} has no option {value:?}")]
    UnknownOption { field: String, value: String },

    /// The operation does not apply to this kind of field.
    #[error("cannot {operation} field {field}")]
    UnsupportedOperation {
        field: String,
        operation: &'static str,
    },

    /// A submission is already pending for this form.
    #[error("a submission is already in flight for form {0}")]
    SubmissionInFlight(String),

    /// A form with this identity is already attached.
    #[error("form {0} is already attached")]
    AlreadyAttached(String),

    /// The field values could not be encoded into a payload.
    #[error("payload encoding failed: {0}")]
    Payload(#[from] TransportError),
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;

/// Why a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required field has no qualifying value.
    Required,
    /// A required group has no selected member.
    Group,
    /// A value does not match its validation type.
    Format,
}

impl ErrorKind {
    /// Returns whether this is a missing-value error (field or group).
    pub fn is_required(self) -> bool {
        matches!(self, Self::Required | Self::Group)
    }
}

/// A single field's validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Failure category.
    pub kind: ErrorKind,
    /// Human-readable message, if any.
    pub message: Option<String>,
}

impl FieldError {
    /// A required-field failure.
    pub fn required(message: Option<String>) -> Self {
        Self {
            kind: ErrorKind::Required,
            message,
        }
    }

    /// A group failure. Groups never carry text.
    pub fn group() -> Self {
        Self {
            kind: ErrorKind::Group,
            message: None,
        }
    }

    /// A format failure with its localized message.
    pub fn format(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Format,
            message: Some(message.into()),
        }
    }
}

/// Outcome of one validation pass, keyed by field identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: BTreeMap<FieldId, FieldError>,
}

impl ValidationResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error for a field. The first error recorded for a field wins.
    pub fn add(&mut self, field: FieldId, error: FieldError) {
        self.errors.entry(field).or_insert(error);
    }

    /// Returns whether no field failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of failing fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns whether no field failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the error for a field.
    pub fn get(&self, field: FieldId) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    /// Returns whether a field failed.
    pub fn contains(&self, field: FieldId) -> bool {
        self.errors.contains_key(&field)
    }

    /// Iterates failing fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &FieldError)> {
        self.errors.iter().map(|(id, error)| (*id, error))
    }

    /// Returns the message for a field, if it failed with one.
    pub fn message(&self, field: FieldId) -> Option<&str> {
        self.get(field).and_then(|e| e.message.as_deref())
    }
}

impl Extend<(FieldId, FieldError)> for ValidationResult {
    fn extend<I: IntoIterator<Item = (FieldId, FieldError)>>(&mut self, iter: I) {
        for (field, error) in iter {
            self.add(field, error);
        }
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (field, error) in &self.errors {
            match &error.message {
                Some(message) => writeln!(f, "{field}: {message}")?,
                None => writeln!(f, "{field}: {:?}", error.kind)?,
            }
        }
        Ok(())
    }
}
