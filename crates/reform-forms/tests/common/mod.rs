#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use reform_forms::{
    Field, Form, FormBuilder, FormOptions, GroupDef, Hook, HookBus, HookOutcome, Reform,
    SubmitOutcome,
};
use reform_http::{
    CancellationToken, Payload, Response, Transport, TransportError, TransportRequest,
};
use serde_json::{json, Map, Value};

/// Answers like the reference echo endpoint: `{"get":[],"post":...}`,
/// with `[]` in place of an empty post body.
pub fn echo_body(request: &TransportRequest) -> Value {
    let post = match &request.payload {
        Payload::Form(encoded) => {
            let pairs: Vec<(String, String)> = serde_urlencoded::from_str(encoded)
                .unwrap_or_else(|e| panic!("Bad form body {encoded:?}: {e}"));
            Value::Object(
                pairs
                    .into_iter()
                    .map(|(name, value)| (name, Value::String(value)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Payload::Json(value) => value.clone(),
    };
    let post = match post {
        Value::Object(map) if map.is_empty() => json!([]),
        other => other,
    };
    json!({ "get": [], "post": post })
}

pub async fn echo(
    request: TransportRequest,
    _cancel: CancellationToken,
) -> Result<Response, TransportError> {
    Response::json(&echo_body(&request)).map_err(|e| TransportError::Network(e.to_string()))
}

/// An echo transport that counts its calls.
pub fn counting_echo() -> (impl Transport, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let transport = move |request: TransportRequest, cancel: CancellationToken| {
        counter.fetch_add(1, Ordering::SeqCst);
        echo(request, cancel)
    };
    (transport, calls)
}

/// A transport that never answers until cancelled.
pub async fn hang(
    _request: TransportRequest,
    cancel: CancellationToken,
) -> Result<Response, TransportError> {
    cancel.cancelled().await;
    Err(TransportError::Cancelled)
}

pub fn json_options() -> FormOptions {
    FormOptions::resolve(&json!({ "convert": "json" })).expect("options")
}

/// Registers a handler on every hook that records the hook names in order.
pub fn recording_hooks() -> (HookBus, Arc<Mutex<Vec<&'static str>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut hooks = HookBus::new();
    for hook in [
        Hook::Initialize,
        Hook::SendBefore,
        Hook::ValidationBefore,
        Hook::ValidationAfter,
        Hook::SendAfter,
        Hook::ValidateCustom,
    ] {
        let log = Arc::clone(&log);
        hooks.on(hook, move |ctx| {
            log.lock().push(ctx.event.hook().name());
            HookOutcome::Continue
        });
    }
    (hooks, log)
}

/// The contact form used by the end-to-end scenarios, filled with valid values.
pub fn contact_form() -> Form {
    FormBuilder::new("contact")
        .field(Field::text("name").required().value("test 1"))
        .field(Field::text("required").required().value("test 1"))
        .field(
            Field::input("email", "email")
                .required()
                .validate()
                .value("sample@test.com"),
        )
        .field(Field::text("ulr").required().validate_as("url").value("test.com"))
        .field(
            Field::text("phone")
                .required()
                .validate_as("phone")
                .value("+49 123 456"),
        )
        .build()
}

pub fn select_form() -> Form {
    FormBuilder::new("select")
        .field(
            Field::select(
                "select",
                vec![("option-1", "Option 1"), ("option-2", "Option 2")],
            )
            .placeholder("Please choose"),
        )
        .build()
}

pub fn grouped_form() -> Form {
    FormBuilder::new("grouped")
        .group(
            GroupDef::new()
                .single()
                .field(Field::checkbox("checkbox", "sample-1"))
                .field(Field::checkbox("checkbox", "sample-2"))
                .field(Field::checkbox("checkbox", "sample-3"))
                .required(),
        )
        .build()
}

pub fn reform(form: Form, options: FormOptions) -> Reform {
    Reform::new(form, options, HookBus::new(), echo)
}

/// Returns the response body of a sent submission.
pub fn body(outcome: &SubmitOutcome) -> String {
    outcome
        .response()
        .and_then(Response::body_string)
        .unwrap_or_else(|| panic!("Expected a response, got {outcome:?}"))
}
