//! Form field definitions.

mod group;
mod select;

pub use group::{Group, GroupDef};
pub use select::{SelectOption, SelectState, PLACEHOLDER_SENTINEL};

use crate::error::FieldError;

/// Identity of a field within its form (declaration order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(pub(crate) usize);

impl FieldId {
    /// Returns the position of the field in declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of input a field wraps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A single-line input with its native `type` attribute.
    Input { input_type: String },
    /// A multi-line text input.
    Textarea,
    /// A checkbox.
    Checkbox,
    /// A radio button.
    Radio,
    /// A dropdown select.
    Select(SelectState),
}

/// How a field declares pattern validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationDecl {
    /// Validate against the input's native type.
    Native,
    /// Validate against an explicitly named type.
    Explicit(String),
}

/// A named input unit of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name (used as the payload key).
    pub name: String,
    /// Input kind.
    pub kind: FieldKind,
    /// Current value. For checkboxes and radios this is the submitted value.
    pub value: String,
    /// Selection state of checkboxes and radios.
    pub checked: bool,
    /// Whether the field is required.
    pub required: bool,
    /// Declared pattern validation, if any.
    pub validation: Option<ValidationDecl>,
    /// Error annotation from the last validation pass.
    pub error: Option<FieldError>,
}

impl Field {
    fn new(name: impl Into<String>, kind: FieldKind, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            value: value.into(),
            checked: false,
            required: false,
            validation: None,
            error: None,
        }
    }

    /// Creates a text input.
    pub fn text(name: impl Into<String>) -> Self {
        Self::input(name, "text")
    }

    /// Creates an input with the given native type (`email`, `url`, ...).
    pub fn input(name: impl Into<String>, input_type: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Input {
                input_type: input_type.into(),
            },
            "",
        )
    }

    /// Creates a textarea.
    pub fn textarea(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Textarea, "")
    }

    /// Creates a checkbox submitting `value` when checked.
    pub fn checkbox(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Checkbox, value)
    }

    /// Creates a radio button submitting `value` when checked.
    pub fn radio(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Radio, value)
    }

    /// Creates a select from `(value, label)` pairs. The first option starts selected.
    pub fn select(name: impl Into<String>, choices: Vec<(&str, &str)>) -> Self {
        let state = SelectState::new(choices);
        let initial = state
            .options
            .first()
            .map(|option| option.value.clone())
            .unwrap_or_default();
        Self::new(name, FieldKind::Select(state), initial)
    }

    /// Makes the field required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Validates the field against its native input type.
    #[must_use]
    pub fn validate(mut self) -> Self {
        self.validation = Some(ValidationDecl::Native);
        self
    }

    /// Validates the field against an explicit type (`url`, `email`, `phone`, or a custom name).
    #[must_use]
    pub fn validate_as(mut self, validation_type: impl Into<String>) -> Self {
        self.validation = Some(ValidationDecl::Explicit(validation_type.into()));
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Starts the field checked.
    #[must_use]
    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }

    /// Sets a select placeholder. Ignored for other kinds.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        if let FieldKind::Select(state) = &mut self.kind {
            state.placeholder = Some(text.into());
        }
        self
    }

    /// Returns whether this is a checkbox or radio.
    pub fn is_checkable(&self) -> bool {
        matches!(self.kind, FieldKind::Checkbox | FieldKind::Radio)
    }

    /// Returns whether this is a select.
    pub fn is_select(&self) -> bool {
        matches!(self.kind, FieldKind::Select(_))
    }

    /// Returns whether this is a text input or textarea.
    pub fn is_text_like(&self) -> bool {
        matches!(self.kind, FieldKind::Input { .. } | FieldKind::Textarea)
    }

    /// Returns the select state, if this is a select.
    pub fn select_state(&self) -> Option<&SelectState> {
        match &self.kind {
            FieldKind::Select(state) => Some(state),
            _ => None,
        }
    }

    pub(crate) fn select_state_mut(&mut self) -> Option<&mut SelectState> {
        match &mut self.kind {
            FieldKind::Select(state) => Some(state),
            _ => None,
        }
    }

    /// Returns whether a select currently has no real selection.
    pub fn is_unset_select(&self) -> bool {
        self.is_select() && (self.value.is_empty() || self.value == PLACEHOLDER_SENTINEL)
    }

    /// Returns the input's native type attribute; empty for non-inputs.
    pub fn native_type(&self) -> &str {
        match &self.kind {
            FieldKind::Input { input_type } => input_type,
            _ => "",
        }
    }

    /// Returns the value this field contributes to a submission.
    ///
    /// Unchecked checkboxes and radios and unset selects contribute nothing.
    pub fn submitted_value(&self) -> Option<&str> {
        if self.is_checkable() && !self.checked {
            return None;
        }
        if self.is_unset_select() {
            return None;
        }
        Some(&self.value)
    }

    /// Returns whether the last validation pass flagged this field.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns the message attached by the last validation pass.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().and_then(|e| e.message.as_deref())
    }
}
