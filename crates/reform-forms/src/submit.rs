//! Submission pipeline and form instances.

use std::sync::Arc;

use parking_lot::Mutex;
use reform_http::{
    CancellationToken, Method, Payload, Response, Transport, TransportError, TransportRequest,
};
use tracing::{debug, error, info, warn};

use crate::config::{ConvertMode, FormOptions};
use crate::engine::ValidationEngine;
use crate::error::{FormError, Result, ValidationResult};
use crate::fields::FieldId;
use crate::form::Form;
use crate::hooks::{Hook, HookBus, HookContext, HookEvent, HookOutcome};

/// Resolves the destination URL.
///
/// Precedence: explicit override, native `action`, configured default, `.`.
pub fn resolve_url(form: &Form, options: &FormOptions) -> String {
    [
        form.url_override.as_deref(),
        form.action.as_deref(),
        options.url.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|url| !url.is_empty())
    .unwrap_or(".")
    .to_string()
}

/// Resolves the HTTP method.
///
/// Precedence: explicit override, native `method`, configured default, `GET`.
/// An unknown method is logged and replaced by `GET`.
pub fn resolve_method(form: &Form, options: &FormOptions) -> Method {
    let Some(name) = [
        form.method_override.as_deref(),
        form.method.as_deref(),
        Some(options.method.as_str()),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|name| !name.is_empty()) else {
        return Method::Get;
    };

    Method::parse(name).unwrap_or_else(|| {
        warn!(form = form.id(), method = name, "Unknown method '{name}', using GET.");
        Method::Get
    })
}

/// Builds the payload from the form's submitted values.
pub fn build_payload(form: &Form, mode: ConvertMode) -> reform_http::Result<Payload> {
    let pairs = form.submitted_pairs();
    match mode {
        ConvertMode::Serialize => Payload::form(pairs),
        ConvertMode::Json => Ok(Payload::json(pairs)),
    }
}

/// Builds the transport request, with the `ajax` settings layered on top.
pub fn build_request(form: &Form, options: &FormOptions) -> reform_http::Result<TransportRequest> {
    let payload = build_payload(form, options.convert)?;
    let request = TransportRequest::new(
        resolve_method(form, options),
        resolve_url(form, options),
        payload,
    );
    Ok(request.with_overrides(&options.ajax))
}

/// A submission that reached the transport.
#[derive(Debug)]
pub struct Submission {
    /// The request handed to the transport.
    pub request: TransportRequest,
    /// The transport's answer.
    pub result: std::result::Result<Response, TransportError>,
}

impl Submission {
    /// Returns the response, if the transport succeeded.
    pub fn response(&self) -> Option<&Response> {
        self.result.as_ref().ok()
    }

    /// Returns the transport failure, if any.
    pub fn failure(&self) -> Option<&TransportError> {
        self.result.as_ref().err()
    }
}

/// How a submit call ended.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// A hook aborted the pipeline before validation finished.
    Vetoed(Hook),
    /// Validation failed (or `validation-after` forced failure); nothing was sent.
    Invalid(ValidationResult),
    /// The transport was called.
    Sent(Submission),
}

impl SubmitOutcome {
    /// Returns the submission, if one was sent.
    pub fn submission(&self) -> Option<&Submission> {
        match self {
            Self::Sent(submission) => Some(submission),
            _ => None,
        }
    }

    /// Returns the response, if the transport succeeded.
    pub fn response(&self) -> Option<&Response> {
        self.submission().and_then(Submission::response)
    }
}

/// Releases the pending slot when a submission ends or its future is dropped.
///
/// While armed, dropping the guard also completes the after stage: the
/// placeholders are restored and `send-after` fires without a response.
struct PendingGuard<'a> {
    reform: &'a Reform,
    in_flight: bool,
}

impl PendingGuard<'_> {
    fn arm(&mut self) {
        self.in_flight = true;
    }

    fn disarm(&mut self) {
        self.in_flight = false;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.in_flight {
            warn!(form = %self.reform.id, "Submission dropped before the transport answered.");
            let mut form = self.reform.form.lock();
            form.restore_placeholders();
            self.reform
                .emit(&form, HookEvent::SendAfter { response: None });
        }
        self.reform.pending.lock().take();
    }
}

/// A form bound to its options, hooks and transport.
///
/// Hook handlers run while the form is locked and must not call back into
/// the same instance.
pub struct Reform {
    id: String,
    form: Mutex<Form>,
    options: FormOptions,
    hooks: HookBus,
    transport: Arc<dyn Transport>,
    pending: Mutex<Option<CancellationToken>>,
}

impl std::fmt::Debug for Reform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reform")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("hooks", &self.hooks)
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}

impl Reform {
    /// Binds a form. Initializes its placeholders and fires `initialize`.
    pub fn new<T>(mut form: Form, options: FormOptions, hooks: HookBus, transport: T) -> Self
    where
        T: Transport + 'static,
    {
        if form.initialize() {
            debug!(form = form.id(), "Placeholders initialized.");
        }
        hooks.emit(&HookContext::new(&form, HookEvent::Initialize));

        Self {
            id: form.id().to_string(),
            form: Mutex::new(form),
            options,
            hooks,
            transport: Arc::new(transport),
            pending: Mutex::new(None),
        }
    }

    /// Returns the form identity.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the resolved options.
    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    /// Returns a copy of the form's current state.
    pub fn snapshot(&self) -> Form {
        self.form.lock().clone()
    }

    /// Runs `f` with the form locked.
    pub fn with_form<R>(&self, f: impl FnOnce(&Form) -> R) -> R {
        f(&self.form.lock())
    }

    /// Looks up a field by name.
    pub fn field_id(&self, name: &str) -> Result<FieldId> {
        self.form
            .lock()
            .field_id(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    /// Looks up a checkbox or radio by name and value.
    pub fn choice_id(&self, name: &str, value: &str) -> Result<FieldId> {
        self.form
            .lock()
            .choice_id(name, value)
            .ok_or_else(|| FormError::UnknownField(format!("{name}={value}")))
    }

    /// Sets a text value.
    pub fn set_value(&self, id: FieldId, value: impl Into<String>) -> Result<()> {
        self.form.lock().set_value(id, value)
    }

    /// Checks or unchecks a checkbox or radio.
    pub fn set_checked(&self, id: FieldId, checked: bool) -> Result<()> {
        self.form.lock().set_checked(id, checked)
    }

    /// Selects a select option by value.
    pub fn select(&self, id: FieldId, value: &str) -> Result<()> {
        self.form.lock().select(id, value)
    }

    /// Runs a validation pass without submitting.
    pub fn validate(&self) -> ValidationResult {
        let mut form = self.form.lock();
        let result = ValidationEngine::new(&self.options, &self.hooks).validate(&mut form);
        form.restore_placeholders();
        result
    }

    /// Returns whether a submission is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.lock().is_some()
    }

    /// Cancels the in-flight transport call. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().as_ref() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Validates and submits the form.
    ///
    /// Stages: `send-before`, `validation-before`, the validation pass,
    /// `validation-after`, the transport call and `send-after`. A transport
    /// failure is logged and reported in the [`Submission`]; `send-after`
    /// then receives no response.
    ///
    /// # Errors
    ///
    /// [`FormError::SubmissionInFlight`] while another submission is pending,
    /// [`FormError::Payload`] when the values cannot be encoded.
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        let (mut guard, cancel) = self.claim()?;

        let request = {
            let mut form = self.form.lock();

            if self.emit(&form, HookEvent::SendBefore).is_abort() {
                self.note("Submission aborted by 'send-before'.");
                return Ok(SubmitOutcome::Vetoed(Hook::SendBefore));
            }
            if self.emit(&form, HookEvent::ValidationBefore).is_abort() {
                self.note("Validation aborted by 'validation-before'.");
                return Ok(SubmitOutcome::Vetoed(Hook::ValidationBefore));
            }

            let result = ValidationEngine::new(&self.options, &self.hooks).validate(&mut form);
            let verdict = self.emit(&form, HookEvent::ValidationAfter { result: &result });
            if !verdict.decide(result.is_valid()) {
                self.note("Validation failed; nothing sent.");
                form.restore_placeholders();
                return Ok(SubmitOutcome::Invalid(result));
            }

            match build_request(&form, &self.options) {
                Ok(request) => request,
                Err(err) => {
                    error!(form = %self.id, error = %err, "Can't encode the form values.");
                    form.restore_placeholders();
                    return Err(err.into());
                }
            }
        };

        self.note(&format!("Sending {} {}.", request.method, request.url));
        guard.arm();
        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(TransportError::Cancelled),
            result = self.transport.send(request.clone(), cancel.clone()) => result,
        };
        guard.disarm();

        match &result {
            Ok(response) => self.note(&format!("Received status {}.", response.status)),
            Err(err) => error!(form = %self.id, error = %err, "Submission failed."),
        }

        {
            let mut form = self.form.lock();
            form.restore_placeholders();
            self.emit(
                &form,
                HookEvent::SendAfter {
                    response: result.as_ref().ok(),
                },
            );
        }

        Ok(SubmitOutcome::Sent(Submission { request, result }))
    }

    fn claim(&self) -> Result<(PendingGuard<'_>, CancellationToken)> {
        let mut slot = self.pending.lock();
        if slot.is_some() {
            warn!(form = %self.id, "Submission requested while another is in flight.");
            return Err(FormError::SubmissionInFlight(self.id.clone()));
        }
        let token = CancellationToken::new();
        *slot = Some(token.clone());
        Ok((
            PendingGuard {
                reform: self,
                in_flight: false,
            },
            token,
        ))
    }

    fn emit(&self, form: &Form, event: HookEvent<'_>) -> HookOutcome {
        self.hooks.emit(&HookContext::new(form, event))
    }

    fn note(&self, message: &str) {
        if self.options.debug_mode {
            info!(form = %self.id, "{message}");
        } else {
            debug!(form = %self.id, "{message}");
        }
    }
}
