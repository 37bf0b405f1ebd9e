//! Structural classification of fields into groups and standalone fields.

use std::collections::HashSet;

use crate::fields::FieldId;
use crate::form::Form;

/// How the members of a group are marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRequirement {
    /// Every member is required.
    Required,
    /// No member is required.
    Optional,
    /// Some members are required and some are not.
    Mixed,
    /// The group has no members.
    Empty,
}

/// A group as seen by one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedGroup {
    /// Position of the group in the form's declarations.
    pub index: usize,
    /// Members claimed by this group.
    pub members: Vec<FieldId>,
    /// Required marking of the members.
    pub requirement: GroupRequirement,
}

/// Groups and standalone fields of a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Groups in declaration order.
    pub groups: Vec<ClassifiedGroup>,
    /// Fields not claimed by any group, in declaration order.
    pub standalone: Vec<FieldId>,
}

/// Classifies the form's fields.
///
/// A field belongs to the first group that declares it; later groups do not
/// see it. Values and selection states play no part.
pub fn classify(form: &Form) -> Classification {
    let mut claimed = HashSet::new();
    let mut groups = Vec::with_capacity(form.groups().len());

    for (index, group) in form.groups().iter().enumerate() {
        let members: Vec<FieldId> = group
            .members
            .iter()
            .copied()
            .filter(|id| form.field(*id).is_some() && claimed.insert(*id))
            .collect();

        let required = members
            .iter()
            .filter(|id| form.field(**id).is_some_and(|f| f.required))
            .count();
        let requirement = match (members.len(), required) {
            (0, _) => GroupRequirement::Empty,
            (total, n) if n == total => GroupRequirement::Required,
            (_, 0) => GroupRequirement::Optional,
            _ => GroupRequirement::Mixed,
        };

        groups.push(ClassifiedGroup {
            index,
            members,
            requirement,
        });
    }

    let standalone = form
        .fields()
        .map(|(id, _)| id)
        .filter(|id| !claimed.contains(id))
        .collect();

    Classification { groups, standalone }
}
