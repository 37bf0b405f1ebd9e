//! Select field state and the placeholder sentinel.

/// Reserved select value meaning "no real selection made".
pub const PLACEHOLDER_SENTINEL: &str = "rf-placeholder";

/// One option of a select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Submitted value.
    pub value: String,
    /// Display label.
    pub label: String,
}

/// Options and placeholder bookkeeping of a select.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectState {
    /// Available options in display order.
    pub options: Vec<SelectOption>,
    /// Placeholder text shown as a synthetic first option.
    pub placeholder: Option<String>,
    /// Set when a validation pass cleared the sentinel; restored after submission.
    pub reselect: bool,
}

impl SelectState {
    /// Creates select state from `(value, label)` pairs.
    pub fn new(choices: Vec<(&str, &str)>) -> Self {
        Self {
            options: choices
                .into_iter()
                .map(|(value, label)| SelectOption {
                    value: value.to_string(),
                    label: label.to_string(),
                })
                .collect(),
            placeholder: None,
            reselect: false,
        }
    }

    /// Returns whether `value` names one of the options.
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|option| option.value == value)
    }

    /// Returns the placeholder text when it is non-empty.
    pub fn active_placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref().filter(|text| !text.is_empty())
    }

    /// Prepends the sentinel option for the placeholder.
    ///
    /// Returns `false` when there is no placeholder or the option already exists.
    pub(crate) fn insert_placeholder_option(&mut self) -> bool {
        let Some(label) = self.active_placeholder().map(str::to_string) else {
            return false;
        };
        if self.has_option(PLACEHOLDER_SENTINEL) {
            return false;
        }
        self.options.insert(
            0,
            SelectOption {
                value: PLACEHOLDER_SENTINEL.to_string(),
                label,
            },
        );
        true
    }
}
