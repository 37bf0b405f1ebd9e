//! Form structure and interactive behaviors.

use crate::error::{FormError, Result};
use crate::fields::{Field, FieldId, FieldKind, Group, GroupDef, PLACEHOLDER_SENTINEL};

/// A bound form: its fields, groups and form-level attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    id: String,
    /// Native `action` attribute.
    pub action: Option<String>,
    /// Native `method` attribute.
    pub method: Option<String>,
    /// Explicit destination override; wins over `action`.
    pub url_override: Option<String>,
    /// Explicit method override; wins over `method`.
    pub method_override: Option<String>,
    fields: Vec<Field>,
    groups: Vec<Group>,
    initialized: bool,
}

impl Form {
    /// Returns the form identity.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the field with this identity.
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(id.0)
    }

    pub(crate) fn field_mut(&mut self, id: FieldId) -> Option<&mut Field> {
        self.fields.get_mut(id.0)
    }

    /// Returns the first field with this name.
    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.fields
            .iter()
            .position(|field| field.name == name)
            .map(FieldId)
    }

    /// Returns the checkbox or radio with this name and submitted value.
    pub fn choice_id(&self, name: &str, value: &str) -> Option<FieldId> {
        self.fields
            .iter()
            .position(|field| field.is_checkable() && field.name == name && field.value == value)
            .map(FieldId)
    }

    /// Iterates fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (FieldId, &Field)> {
        self.fields
            .iter()
            .enumerate()
            .map(|(index, field)| (FieldId(index), field))
    }

    /// Returns the declared groups.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Returns whether placeholder initialization already ran.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the name/value pairs this form would submit, in declaration order.
    pub fn submitted_pairs(&self) -> Vec<(&str, &str)> {
        self.fields
            .iter()
            .filter_map(|field| {
                field
                    .submitted_value()
                    .map(|value| (field.name.as_str(), value))
            })
            .collect()
    }

    fn lookup(&self, id: FieldId) -> Result<&Field> {
        self.field(id)
            .ok_or_else(|| FormError::UnknownField(id.to_string()))
    }

    /// Sets the value of a text input or textarea.
    pub fn set_value(&mut self, id: FieldId, value: impl Into<String>) -> Result<()> {
        let field = self.lookup(id)?;
        if !field.is_text_like() {
            return Err(FormError::UnsupportedOperation {
                field: field.name.clone(),
                operation: "set the value of",
            });
        }
        self.fields[id.0].value = value.into();
        Ok(())
    }

    /// Checks or unchecks a checkbox or radio.
    ///
    /// Checking a member of a single-selection group unchecks its siblings first.
    pub fn set_checked(&mut self, id: FieldId, checked: bool) -> Result<()> {
        let field = self.lookup(id)?;
        if !field.is_checkable() {
            return Err(FormError::UnsupportedOperation {
                field: field.name.clone(),
                operation: "check",
            });
        }

        if let Some(group) = self.groups.iter().find(|g| g.single && g.contains(id)) {
            for member in &group.members {
                self.fields[member.0].checked = false;
            }
        }
        self.fields[id.0].checked = checked;
        Ok(())
    }

    /// Selects an option of a select by value.
    pub fn select(&mut self, id: FieldId, value: &str) -> Result<()> {
        let field = self.lookup(id)?;
        let Some(state) = field.select_state() else {
            return Err(FormError::UnsupportedOperation {
                field: field.name.clone(),
                operation: "select an option of",
            });
        };
        if !state.has_option(value) {
            return Err(FormError::UnknownOption {
                field: field.name.clone(),
                value: value.to_string(),
            });
        }

        let field = &mut self.fields[id.0];
        field.value = value.to_string();
        if let Some(state) = field.select_state_mut() {
            state.reselect = false;
        }
        Ok(())
    }

    /// Inserts placeholder options into selects and selects them.
    ///
    /// Runs once per form; returns `false` on later calls.
    pub fn initialize(&mut self) -> bool {
        if self.initialized {
            return false;
        }
        self.initialized = true;

        for field in &mut self.fields {
            let inserted = field
                .select_state_mut()
                .is_some_and(|state| state.insert_placeholder_option());
            if inserted {
                field.value = PLACEHOLDER_SENTINEL.to_string();
            }
        }
        true
    }

    /// Clears the sentinel of an optional select before submission.
    pub(crate) fn mark_reselect(&mut self, id: FieldId) {
        if let Some(field) = self.field_mut(id) {
            field.value.clear();
            if let Some(state) = field.select_state_mut() {
                state.reselect = true;
            }
        }
    }

    /// Puts selects cleared by [`mark_reselect`](Self::mark_reselect) back on the sentinel.
    pub fn restore_placeholders(&mut self) {
        for field in &mut self.fields {
            if let FieldKind::Select(state) = &mut field.kind {
                if state.reselect {
                    state.reselect = false;
                    field.value = PLACEHOLDER_SENTINEL.to_string();
                }
            }
        }
    }

    /// Removes every error annotation.
    pub fn clear_errors(&mut self) {
        for field in &mut self.fields {
            field.error = None;
        }
    }

    /// Returns the fields currently annotated with an error.
    pub fn fields_with_errors(&self) -> Vec<FieldId> {
        self.fields()
            .filter(|(_, field)| field.has_error())
            .map(|(id, _)| id)
            .collect()
    }
}

/// Builds a [`Form`] from its declared structure.
#[derive(Debug, Default)]
pub struct FormBuilder {
    id: String,
    action: Option<String>,
    method: Option<String>,
    url_override: Option<String>,
    method_override: Option<String>,
    fields: Vec<Field>,
    groups: Vec<Group>,
}

impl FormBuilder {
    /// Creates a new form builder for the form with this identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets the native `action` attribute.
    #[must_use]
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Sets the native `method` attribute.
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets the explicit destination override.
    #[must_use]
    pub fn url_override(mut self, url: impl Into<String>) -> Self {
        self.url_override = Some(url.into());
        self
    }

    /// Sets the explicit method override.
    #[must_use]
    pub fn method_override(mut self, method: impl Into<String>) -> Self {
        self.method_override = Some(method.into());
        self
    }

    /// Adds a standalone field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a group; its members are appended to the field list.
    #[must_use]
    pub fn group(mut self, group: GroupDef) -> Self {
        let start = self.fields.len();
        self.fields.extend(group.fields);
        self.groups.push(Group {
            single: group.single,
            members: (start..self.fields.len()).map(FieldId).collect(),
        });
        self
    }

    /// Declares an extra group over already-added fields, by name.
    ///
    /// Unknown names are skipped.
    #[must_use]
    pub fn group_of(mut self, single: bool, names: &[&str]) -> Self {
        let members = names
            .iter()
            .filter_map(|name| self.fields.iter().position(|f| f.name == *name))
            .map(FieldId)
            .collect();
        self.groups.push(Group { single, members });
        self
    }

    /// Returns the form.
    pub fn build(self) -> Form {
        Form {
            id: self.id,
            action: self.action,
            method: self.method,
            url_override: self.url_override,
            method_override: self.method_override,
            fields: self.fields,
            groups: self.groups,
            initialized: false,
        }
    }
}
