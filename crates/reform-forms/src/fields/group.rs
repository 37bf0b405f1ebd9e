//! Groups of mutually exclusive inputs.

use super::{Field, FieldId};

/// A declared group as stored in a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Whether selecting one member deselects the others.
    pub single: bool,
    /// Member fields in declaration order.
    pub members: Vec<FieldId>,
}

impl Group {
    /// Returns whether `id` is declared in this group.
    pub fn contains(&self, id: FieldId) -> bool {
        self.members.contains(&id)
    }
}

/// Builder for a group of fields.
#[derive(Debug, Clone, Default)]
pub struct GroupDef {
    pub(crate) single: bool,
    pub(crate) fields: Vec<Field>,
}

impl GroupDef {
    /// Creates an empty group definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enforces single selection within the group.
    #[must_use]
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    /// Adds a member field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Marks every member added so far as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        for field in &mut self.fields {
            field.required = true;
        }
        self
    }
}
