//! # reform-forms
//!
//! Form validation and submission engine with lifecycle hooks.
//!
//! This crate provides:
//! - Field, group and select-placeholder modelling with a builder API
//! - A two-phase validation engine (groups, then standalone fields)
//! - URL, email and phone pattern validators plus custom types via hooks
//! - A submission pipeline that hands requests to an injected transport
//! - Named veto hooks around every pipeline stage
//!
//! ## Quick Start
//!
//! ```rust
//! use reform_forms::{Field, FormBuilder, FormOptions, HookBus, ValidationEngine};
//!
//! let mut form = FormBuilder::new("contact")
//!     .field(Field::text("name").required())
//!     .field(Field::input("email", "email").required().validate())
//!     .build();
//!
//! let options = FormOptions::default();
//! let hooks = HookBus::new();
//! let engine = ValidationEngine::new(&options, &hooks);
//!
//! let name = form.field_id("name").unwrap();
//! let email = form.field_id("email").unwrap();
//! form.set_value(name, "test 1").unwrap();
//! form.set_value(email, "test.com").unwrap();
//!
//! let result = engine.validate(&mut form);
//! assert_eq!(result.len(), 1);
//! assert_eq!(result.message(email), Some("Email address not valid."));
//! ```
//!
//! ## Submitting
//!
//! ```rust
//! use reform_forms::{Field, FormBuilder, FormOptions, HookBus, Reform, SubmitOutcome};
//! use reform_http::{CancellationToken, Response, TransportError, TransportRequest};
//!
//! let form = FormBuilder::new("newsletter")
//!     .action("/subscribe")
//!     .field(Field::input("email", "email").required().validate().value("a@b.de"))
//!     .build();
//!
//! let transport = |request: TransportRequest, _cancel: CancellationToken| async move {
//!     Ok::<_, TransportError>(Response::text(request.payload.body_string()))
//! };
//! let reform = Reform::new(form, FormOptions::default(), HookBus::new(), transport);
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let outcome = runtime.block_on(reform.submit()).unwrap();
//!
//! let SubmitOutcome::Sent(submission) = outcome else { panic!("not sent") };
//! assert_eq!(submission.request.url, "/subscribe");
//! assert_eq!(
//!     submission.response().and_then(Response::body_string),
//!     Some("email=a%40b.de".to_string())
//! );
//! ```

mod error;
mod form;
mod registry;
mod submit;

pub mod classify;
pub mod config;
pub mod engine;
pub mod fields;
pub mod hooks;
pub mod validation;

pub use config::{ConvertMode, FormOptions, ValidationPolicy};
pub use engine::ValidationEngine;
pub use error::{ErrorKind, FieldError, FormError, Result, ValidationResult};
pub use fields::{Field, FieldId, FieldKind, GroupDef, ValidationDecl, PLACEHOLDER_SENTINEL};
pub use form::{Form, FormBuilder};
pub use hooks::{submit_policy, Hook, HookBus, HookContext, HookEvent, HookOutcome};
pub use registry::FormRegistry;
pub use submit::{
    build_payload, build_request, resolve_method, resolve_url, Reform, SubmitOutcome, Submission,
};
