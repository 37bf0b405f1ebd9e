//! Named lifecycle hooks.
//!
//! Every pipeline stage emits exactly one hook and acts on the combined
//! [`HookOutcome`] of its handlers. Handlers are synchronous and receive the
//! form plus stage-specific data through a [`HookContext`].
//!
//! ```rust
//! use reform_forms::{Hook, HookBus, HookEvent, HookOutcome};
//!
//! let hooks = HookBus::new().with(Hook::ValidateCustom, |ctx| match &ctx.event {
//!     HookEvent::ValidateCustom { validation_type: "zip", value, .. } => {
//!         HookOutcome::from(value.len() == 5 && value.chars().all(|c| c.is_ascii_digit()))
//!     }
//!     _ => HookOutcome::Continue,
//! });
//!
//! assert!(hooks.has_handlers(Hook::ValidateCustom));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use reform_http::Response;
use tracing::debug;

use crate::config::ValidationPolicy;
use crate::error::ValidationResult;
use crate::fields::Field;
use crate::form::Form;

/// The hooks a form emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// The instance was attached to its form.
    Initialize,
    /// A submission was requested.
    SendBefore,
    /// Validation is about to run.
    ValidationBefore,
    /// Validation finished; handlers may force the outcome.
    ValidationAfter,
    /// The transport call completed (successfully or not).
    SendAfter,
    /// A field uses a validation type without a built-in validator.
    ValidateCustom,
}

impl Hook {
    /// Returns the hook name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::SendBefore => "send-before",
            Self::ValidationBefore => "validation-before",
            Self::ValidationAfter => "validation-after",
            Self::SendAfter => "send-after",
            Self::ValidateCustom => "validate-custom",
        }
    }
}

impl std::fmt::Display for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rf-{}", self.name())
    }
}

/// A handler's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookOutcome {
    /// No opinion; the stage proceeds with its computed result.
    #[default]
    Continue,
    /// Stop the stage, or force failure where the stage has a verdict.
    Abort,
    /// Force success where the stage has a verdict.
    Accept,
}

impl HookOutcome {
    /// Combines two outcomes. `Abort` wins over `Accept`, which wins over `Continue`.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Self::Abort, _) | (_, Self::Abort) => Self::Abort,
            (Self::Accept, _) | (_, Self::Accept) => Self::Accept,
            _ => Self::Continue,
        }
    }

    /// Returns whether this is [`HookOutcome::Abort`].
    pub fn is_abort(self) -> bool {
        self == Self::Abort
    }

    /// Applies this outcome to a computed verdict.
    pub fn decide(self, computed: bool) -> bool {
        match self {
            Self::Continue => computed,
            Self::Abort => false,
            Self::Accept => true,
        }
    }
}

impl From<bool> for HookOutcome {
    fn from(passed: bool) -> Self {
        if passed {
            Self::Accept
        } else {
            Self::Abort
        }
    }
}

/// Stage-specific data passed to handlers.
#[derive(Debug, Clone, Copy)]
pub enum HookEvent<'a> {
    /// See [`Hook::Initialize`].
    Initialize,
    /// See [`Hook::SendBefore`].
    SendBefore,
    /// See [`Hook::ValidationBefore`].
    ValidationBefore,
    /// See [`Hook::ValidationAfter`].
    ValidationAfter {
        /// The computed result of the pass.
        result: &'a ValidationResult,
    },
    /// See [`Hook::ValidateCustom`].
    ValidateCustom {
        /// The field being validated.
        field: &'a Field,
        /// Its current value.
        value: &'a str,
        /// The unrecognized validation type.
        validation_type: &'a str,
    },
    /// See [`Hook::SendAfter`]. `None` when the transport failed.
    SendAfter {
        /// The endpoint's response.
        response: Option<&'a Response>,
    },
}

impl HookEvent<'_> {
    /// Returns the hook this event belongs to.
    pub fn hook(&self) -> Hook {
        match self {
            Self::Initialize => Hook::Initialize,
            Self::SendBefore => Hook::SendBefore,
            Self::ValidationBefore => Hook::ValidationBefore,
            Self::ValidationAfter { .. } => Hook::ValidationAfter,
            Self::ValidateCustom { .. } => Hook::ValidateCustom,
            Self::SendAfter { .. } => Hook::SendAfter,
        }
    }
}

/// What a handler sees.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    /// The form the hook fired for.
    pub form: &'a Form,
    /// Stage-specific data.
    pub event: HookEvent<'a>,
}

impl<'a> HookContext<'a> {
    /// Creates a context.
    pub fn new(form: &'a Form, event: HookEvent<'a>) -> Self {
        Self { form, event }
    }
}

/// A boxed hook handler.
pub type HookHandler = Arc<dyn Fn(&HookContext<'_>) -> HookOutcome + Send + Sync>;

/// Registered hook handlers.
#[derive(Clone, Default)]
pub struct HookBus {
    handlers: HashMap<Hook, Vec<HookHandler>>,
}

impl std::fmt::Debug for HookBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .handlers
            .iter()
            .map(|(hook, handlers)| (hook.name(), handlers.len()))
            .collect();
        f.debug_struct("HookBus")
            .field("handlers", &counts)
            .finish()
    }
}

impl HookBus {
    /// Creates a bus without handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler.
    pub fn on<F>(&mut self, hook: Hook, handler: F)
    where
        F: Fn(&HookContext<'_>) -> HookOutcome + Send + Sync + 'static,
    {
        self.handlers
            .entry(hook)
            .or_default()
            .push(Arc::new(handler));
    }

    /// Registers a handler, builder style.
    #[must_use]
    pub fn with<F>(mut self, hook: Hook, handler: F) -> Self
    where
        F: Fn(&HookContext<'_>) -> HookOutcome + Send + Sync + 'static,
    {
        self.on(hook, handler);
        self
    }

    /// Returns whether any handler listens to `hook`.
    pub fn has_handlers(&self, hook: Hook) -> bool {
        self.handlers.get(&hook).is_some_and(|h| !h.is_empty())
    }

    /// Runs every handler of the context's hook in registration order.
    ///
    /// Returns the combined outcome; `Continue` when nobody listens.
    pub fn emit(&self, ctx: &HookContext<'_>) -> HookOutcome {
        let hook = ctx.event.hook();
        debug!(form = ctx.form.id(), "Calling trigger-event '{hook}'.");

        self.handlers
            .get(&hook)
            .map_or(HookOutcome::Continue, |handlers| {
                handlers
                    .iter()
                    .fold(HookOutcome::Continue, |outcome, handler| {
                        outcome.combine(handler(ctx))
                    })
            })
    }
}

/// A `validation-after` handler honouring the `submitOn*` policy flags.
///
/// Accepts a failed pass when every error is waived: required and group
/// errors by `submit_on_require_error`, format errors by
/// `submit_on_validation_error`.
pub fn submit_policy(
    policy: &ValidationPolicy,
) -> impl Fn(&HookContext<'_>) -> HookOutcome + Send + Sync + 'static {
    let waive_required = policy.submit_on_require_error;
    let waive_format = policy.submit_on_validation_error;

    move |ctx| {
        let HookEvent::ValidationAfter { result } = ctx.event else {
            return HookOutcome::Continue;
        };
        if result.is_valid() {
            return HookOutcome::Continue;
        }
        let waived = result.iter().all(|(_, error)| {
            if error.kind.is_required() {
                waive_required
            } else {
                waive_format
            }
        });
        if waived {
            HookOutcome::Accept
        } else {
            HookOutcome::Continue
        }
    }
}
