//! End-to-end tests for the submission pipeline.

mod common;
use common::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reform_forms::{
    submit_policy, ErrorKind, FormError, FormOptions, FormRegistry, Hook, HookBus, HookEvent,
    HookOutcome, Reform, SubmitOutcome, PLACEHOLDER_SENTINEL,
};
use reform_http::{CancellationToken, Method, Payload, Response, TransportError, TransportRequest};
use serde_json::json;

#[tokio::test]
async fn test_contact_form_json_payload() {
    let reform = reform(contact_form(), json_options());
    let outcome = reform.submit().await.unwrap();
    assert_eq!(
        body(&outcome),
        r#"{"get":[],"post":{"name":"test 1","required":"test 1","email":"sample@test.com","ulr":"test.com","phone":"+49 123 456"}}"#
    );
}

#[tokio::test]
async fn test_contact_form_serialized_payload() {
    let reform = reform(contact_form(), FormOptions::default());
    let outcome = reform.submit().await.unwrap();

    let submission = outcome.submission().unwrap();
    assert_eq!(submission.request.method, Method::Post);
    assert_eq!(submission.request.url, ".");
    assert!(matches!(submission.request.payload, Payload::Form(_)));
    assert_eq!(
        body(&outcome),
        r#"{"get":[],"post":{"name":"test 1","required":"test 1","email":"sample@test.com","ulr":"test.com","phone":"+49 123 456"}}"#
    );
}

#[tokio::test]
async fn test_select_placeholder_round_trip() {
    let reform = reform(select_form(), json_options());
    let select = reform.field_id("select").unwrap();

    let outcome = reform.submit().await.unwrap();
    assert_eq!(body(&outcome), r#"{"get":[],"post":[]}"#);
    assert_eq!(reform.snapshot().field(select).unwrap().value, PLACEHOLDER_SENTINEL);

    reform.select(select, "option-1").unwrap();
    let outcome = reform.submit().await.unwrap();
    assert_eq!(body(&outcome), r#"{"get":[],"post":{"select":"option-1"}}"#);

    reform.select(select, PLACEHOLDER_SENTINEL).unwrap();
    let outcome = reform.submit().await.unwrap();
    assert_eq!(body(&outcome), r#"{"get":[],"post":[]}"#);
}

#[tokio::test]
async fn test_single_selection_group_submits_last_choice() {
    let reform = reform(grouped_form(), json_options());
    reform
        .set_checked(reform.choice_id("checkbox", "sample-1").unwrap(), true)
        .unwrap();
    reform
        .set_checked(reform.choice_id("checkbox", "sample-3").unwrap(), true)
        .unwrap();

    let outcome = reform.submit().await.unwrap();
    assert_eq!(body(&outcome), r#"{"get":[],"post":{"checkbox":"sample-3"}}"#);
}

#[tokio::test]
async fn test_required_group_blocks_submission() {
    let (transport, calls) = counting_echo();
    let reform = Reform::new(grouped_form(), json_options(), HookBus::new(), transport);

    let outcome = reform.submit().await.unwrap();
    let SubmitOutcome::Invalid(result) = outcome else {
        panic!("Expected an invalid outcome, got {outcome:?}");
    };
    assert_eq!(result.len(), 3);
    assert!(result.iter().all(|(_, e)| e.kind == ErrorKind::Group));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(reform.snapshot().fields_with_errors().len(), 3);
}

#[tokio::test]
async fn test_invalid_email_is_reported() {
    let mut form = contact_form();
    let email = form.field_id("email").unwrap();
    form.set_value(email, "test.com").unwrap();
    let reform = reform(form, json_options());

    let outcome = reform.submit().await.unwrap();
    let SubmitOutcome::Invalid(result) = outcome else {
        panic!("Expected an invalid outcome, got {outcome:?}");
    };
    assert_eq!(result.len(), 1);
    assert_eq!(result.message(email), Some("Email address not valid."));
}

#[tokio::test]
async fn test_hooks_fire_in_pipeline_order() {
    let (hooks, log) = recording_hooks();
    let reform = Reform::new(contact_form(), json_options(), hooks, echo);
    reform.submit().await.unwrap();

    assert_eq!(
        *log.lock(),
        vec![
            "initialize",
            "send-before",
            "validation-before",
            "validation-after",
            "send-after"
        ]
    );
}

#[tokio::test]
async fn test_send_before_veto_stops_everything() {
    let (transport, calls) = counting_echo();
    let fired = Arc::new(AtomicBool::new(false));
    let after = Arc::clone(&fired);
    let hooks = HookBus::new()
        .with(Hook::SendBefore, |_| HookOutcome::Abort)
        .with(Hook::SendAfter, move |_| {
            after.store(true, Ordering::SeqCst);
            HookOutcome::Continue
        });
    let reform = Reform::new(contact_form(), json_options(), hooks, transport);

    let outcome = reform.submit().await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Vetoed(Hook::SendBefore)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!fired.load(Ordering::SeqCst));
    assert!(!reform.is_pending());
}

#[tokio::test]
async fn test_validation_before_veto() {
    let hooks = HookBus::new().with(Hook::ValidationBefore, |_| HookOutcome::Abort);
    let reform = Reform::new(contact_form(), json_options(), hooks, echo);
    let outcome = reform.submit().await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Vetoed(Hook::ValidationBefore)));
}

#[tokio::test]
async fn test_validation_after_can_force_failure() {
    let hooks = HookBus::new().with(Hook::ValidationAfter, |_| HookOutcome::Abort);
    let reform = Reform::new(contact_form(), json_options(), hooks, echo);
    let outcome = reform.submit().await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Invalid(result) if result.is_valid()));
}

#[tokio::test]
async fn test_submit_policy_sends_despite_required_errors() {
    let options = FormOptions::resolve(&json!({
        "convert": "json",
        "validation": { "submitOnRequireError": true }
    }))
    .unwrap();
    let hooks = HookBus::new().with(Hook::ValidationAfter, submit_policy(&options.validation));

    let mut form = contact_form();
    let name = form.field_id("name").unwrap();
    form.set_value(name, "").unwrap();
    let reform = Reform::new(form, options, hooks, echo);

    let outcome = reform.submit().await.unwrap();
    assert_eq!(
        body(&outcome),
        r#"{"get":[],"post":{"name":"","required":"test 1","email":"sample@test.com","ulr":"test.com","phone":"+49 123 456"}}"#
    );
    assert!(reform.snapshot().field(name).unwrap().has_error());
}

#[tokio::test]
async fn test_transport_failure_reaches_send_after_without_response() {
    let saw_none = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&saw_none);
    let hooks = HookBus::new().with(Hook::SendAfter, move |ctx| {
        if let HookEvent::SendAfter { response } = ctx.event {
            flag.store(response.is_none(), Ordering::SeqCst);
        }
        HookOutcome::Continue
    });
    let transport = |_request: TransportRequest, _cancel: CancellationToken| async {
        Err::<Response, _>(TransportError::Network("connection refused".to_string()))
    };
    let reform = Reform::new(select_form(), json_options(), hooks, transport);

    let outcome = reform.submit().await.unwrap();
    let submission = outcome.submission().unwrap();
    assert!(matches!(
        submission.failure(),
        Some(TransportError::Network(message)) if message == "connection refused"
    ));
    assert!(saw_none.load(Ordering::SeqCst));

    let select = reform.field_id("select").unwrap();
    assert_eq!(reform.snapshot().field(select).unwrap().value, PLACEHOLDER_SENTINEL);
}

#[tokio::test]
async fn test_error_status_is_still_a_response() {
    let transport = |_request: TransportRequest, _cancel: CancellationToken| async {
        Ok::<_, TransportError>(Response::new(500))
    };
    let reform = Reform::new(contact_form(), json_options(), HookBus::new(), transport);
    let outcome = reform.submit().await.unwrap();
    assert_eq!(outcome.response().map(|r| r.is_success()), Some(false));
}

#[tokio::test]
async fn test_overlapping_submit_is_rejected() {
    let reform = Arc::new(Reform::new(
        contact_form(),
        json_options(),
        HookBus::new(),
        hang,
    ));

    let first = {
        let reform = Arc::clone(&reform);
        tokio::spawn(async move { reform.submit().await })
    };
    while !reform.is_pending() {
        tokio::task::yield_now().await;
    }

    assert!(matches!(
        reform.submit().await,
        Err(FormError::SubmissionInFlight(id)) if id == "contact"
    ));

    assert!(reform.cancel());
    let outcome = first.await.unwrap().unwrap();
    assert!(matches!(
        outcome.submission().and_then(|s| s.failure()),
        Some(TransportError::Cancelled)
    ));
    assert!(!reform.is_pending());
    assert!(!reform.cancel());
}

#[tokio::test]
async fn test_dropped_submission_completes_the_after_stage() {
    let after = Arc::new(AtomicBool::new(false));
    let saw_none = Arc::clone(&after);
    let hooks = HookBus::new().with(Hook::SendAfter, move |ctx| {
        if let HookEvent::SendAfter { response } = ctx.event {
            saw_none.store(response.is_none(), Ordering::SeqCst);
        }
        HookOutcome::Continue
    });
    let transport = |_request: TransportRequest, _cancel: CancellationToken| {
        std::future::pending::<Result<Response, TransportError>>()
    };
    let reform = Reform::new(select_form(), json_options(), hooks, transport);
    let select = reform.field_id("select").unwrap();

    let timed_out = tokio::time::timeout(Duration::from_millis(20), reform.submit()).await;
    assert!(timed_out.is_err());
    assert!(!reform.is_pending());
    assert!(after.load(Ordering::SeqCst));

    let form = reform.snapshot();
    let field = form.field(select).unwrap();
    assert_eq!(field.value, PLACEHOLDER_SENTINEL);
    assert!(!field.select_state().unwrap().reselect);
}

#[tokio::test]
async fn test_dropped_before_sending_fires_no_send_after() {
    let (hooks, log) = recording_hooks();
    let reform = Reform::new(select_form(), json_options(), hooks, echo);

    drop(reform.submit());
    assert!(!reform.is_pending());
    assert_eq!(*log.lock(), vec!["initialize"]);
}

#[tokio::test]
async fn test_destination_and_method_precedence() {
    let mut form = contact_form();
    form.action = Some("/action".to_string());
    form.method = Some("get".to_string());
    let options = FormOptions::resolve(&json!({ "url": "/default", "type": "put" })).unwrap();
    let outcome = reform(form.clone(), options.clone()).submit().await.unwrap();
    let request = &outcome.submission().unwrap().request;
    assert_eq!((request.method, request.url.as_str()), (Method::Get, "/action"));

    form.url_override = Some("/override".to_string());
    form.method_override = Some("DELETE".to_string());
    let outcome = reform(form, options).submit().await.unwrap();
    let request = &outcome.submission().unwrap().request;
    assert_eq!((request.method, request.url.as_str()), (Method::Delete, "/override"));
}

#[tokio::test]
async fn test_ajax_settings_override_and_pass_through() {
    let options = FormOptions::resolve(&json!({
        "convert": "json",
        "ajax": {
            "url": "/ajax",
            "data": { "fixed": "yes" },
            "headers": { "X-Requested-With": "XMLHttpRequest" }
        }
    }))
    .unwrap();
    let mut form = contact_form();
    form.action = Some("/action".to_string());

    let outcome = reform(form, options).submit().await.unwrap();
    let request = &outcome.submission().unwrap().request;
    assert_eq!(request.url, "/ajax");
    assert_eq!(
        request.settings.get("headers"),
        Some(&json!({ "X-Requested-With": "XMLHttpRequest" }))
    );
    assert_eq!(body(&outcome), r#"{"get":[],"post":{"fixed":"yes"}}"#);
}

#[tokio::test]
async fn test_registry_attached_instance_submits() {
    let mut registry = FormRegistry::new();
    registry
        .attach(reform(contact_form(), json_options()))
        .unwrap();

    let attached = registry.get("contact").unwrap();
    let outcome = attached.submit().await.unwrap();
    assert!(outcome.response().is_some());

    assert!(registry.detach("contact").is_some());
    assert!(registry.get("contact").is_none());
}
