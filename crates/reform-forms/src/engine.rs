//! Two-phase validation engine.
//!
//! A pass classifies the form, computes group verdicts and standalone
//! verdicts independently, merges them into one [`ValidationResult`] and only
//! then annotates the fields.

use tracing::{debug, warn};

use crate::classify::{classify, Classification, GroupRequirement};
use crate::config::FormOptions;
use crate::error::{ErrorKind, FieldError, ValidationResult};
use crate::fields::{Field, FieldId, PLACEHOLDER_SENTINEL};
use crate::form::Form;
use crate::hooks::{HookBus, HookContext, HookEvent};
use crate::validation::{MinLengthValidator, ValidationType, Validator};

/// Verdicts of the standalone phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandaloneVerdicts {
    /// Failing fields with their errors.
    pub errors: Vec<(FieldId, FieldError)>,
    /// Optional selects left on the placeholder; cleared before submission.
    pub reselect: Vec<FieldId>,
}

/// Runs validation passes with one set of options and hooks.
#[derive(Debug, Clone, Copy)]
pub struct ValidationEngine<'a> {
    options: &'a FormOptions,
    hooks: &'a HookBus,
}

impl<'a> ValidationEngine<'a> {
    /// Creates an engine.
    pub fn new(options: &'a FormOptions, hooks: &'a HookBus) -> Self {
        Self { options, hooks }
    }

    /// Runs one complete pass and annotates the form with its outcome.
    ///
    /// Every field is checked; the pass never stops at the first failure.
    /// Annotations from earlier passes are cleared first.
    pub fn validate(&self, form: &mut Form) -> ValidationResult {
        let classification = classify(form);

        let mut result = ValidationResult::new();
        result.extend(group_verdicts(form, &classification));
        let standalone = self.standalone_verdicts(form, &classification);
        result.extend(standalone.errors);

        self.annotate(form, &result, &standalone.reselect);

        debug!(
            form = form.id(),
            errors = result.len(),
            "Validation pass finished."
        );
        result
    }

    /// Computes the verdicts of every standalone field without touching the form.
    pub fn standalone_verdicts(
        &self,
        form: &Form,
        classification: &Classification,
    ) -> StandaloneVerdicts {
        let mut verdicts = StandaloneVerdicts::default();

        for &id in &classification.standalone {
            let Some(field) = form.field(id) else {
                continue;
            };

            if !field.required {
                if field.is_select() && field.value == PLACEHOLDER_SENTINEL {
                    verdicts.reselect.push(id);
                }
                continue;
            }

            if let Some(error) = self.check_required(form, field) {
                verdicts.errors.push((id, error));
            }
        }

        verdicts
    }

    fn check_required(&self, form: &Form, field: &Field) -> Option<FieldError> {
        if field.is_checkable() {
            return (!field.checked).then(|| FieldError::required(None));
        }
        if field.is_select() {
            return field
                .is_unset_select()
                .then(|| FieldError::required(None));
        }

        let policy = &self.options.validation;
        if !MinLengthValidator::new(policy.min_length).validate(&field.value) {
            let message = policy
                .display_require_error_info
                .then(|| self.options.label("errorMinLength"));
            return Some(FieldError::required(message));
        }

        let validation_type = ValidationType::resolve(field)?;
        if self.matches(form, field, &validation_type) {
            None
        } else {
            Some(FieldError::format(
                self.options.label(&validation_type.label_key()),
            ))
        }
    }

    fn matches(&self, form: &Form, field: &Field, validation_type: &ValidationType) -> bool {
        if let Some(validator) = validation_type.validator() {
            return validator.validate(&field.value);
        }
        match validation_type {
            ValidationType::Custom(name) => {
                let ctx = HookContext::new(
                    form,
                    HookEvent::ValidateCustom {
                        field,
                        value: &field.value,
                        validation_type: name,
                    },
                );
                !self.hooks.emit(&ctx).is_abort()
            }
            _ => true,
        }
    }

    fn annotate(&self, form: &mut Form, result: &ValidationResult, reselect: &[FieldId]) {
        form.clear_errors();
        for &id in reselect {
            form.mark_reselect(id);
        }

        let show_format = self.options.validation.display_validation_error_info;
        for (id, error) in result.iter() {
            let mut error = error.clone();
            if error.kind == ErrorKind::Format && !show_format {
                error.message = None;
            }
            if let Some(field) = form.field_mut(id) {
                field.error = Some(error);
            }
        }
    }
}

/// Computes group verdicts.
///
/// A required group passes with at least one selected member; otherwise
/// every member gets a message-less group error. Mixed and optional groups
/// are skipped.
pub fn group_verdicts(form: &Form, classification: &Classification) -> Vec<(FieldId, FieldError)> {
    let mut errors = Vec::new();

    for group in &classification.groups {
        match group.requirement {
            GroupRequirement::Required => {}
            GroupRequirement::Mixed => {
                warn!(
                    form = form.id(),
                    group = group.index,
                    "Group mixes required and optional fields; skipping it."
                );
                continue;
            }
            GroupRequirement::Optional => {
                debug!(form = form.id(), group = group.index, "Group is optional.");
                continue;
            }
            GroupRequirement::Empty => continue,
        }

        let selected = group
            .members
            .iter()
            .filter_map(|id| form.field(*id))
            .any(is_selected);
        if !selected {
            errors.extend(group.members.iter().map(|id| (*id, FieldError::group())));
        }
    }

    errors
}

fn is_selected(field: &Field) -> bool {
    if field.is_checkable() {
        field.checked
    } else if field.is_select() {
        !field.is_unset_select()
    } else {
        !field.value.trim().is_empty()
    }
}
