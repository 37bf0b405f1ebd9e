//! # reform-http
//!
//! Transport-facing types for form submissions.
//!
//! This crate provides:
//! - HTTP methods and submission payloads (form-encoded or JSON)
//! - The resolved [`TransportRequest`] with user override layering
//! - An opaque [`Response`] type
//! - The [`Transport`] trait the form engine delegates network calls to
//!
//! ## Quick Start
//!
//! ```rust
//! use reform_http::{Method, Payload, TransportRequest};
//!
//! let payload = Payload::json([("name", "test 1")]);
//! let request = TransportRequest::new(Method::Post, "/submit", payload);
//!
//! assert_eq!(request.payload.body_string(), r#"{"name":"test 1"}"#);
//! ```
//!
//! ## Overrides
//!
//! User-supplied transport settings win over computed values:
//!
//! ```rust
//! use reform_http::{Method, Payload, TransportRequest};
//!
//! let overrides = serde_json::json!({ "type": "put", "cache": false });
//! let request = TransportRequest::new(Method::Post, "/submit", Payload::json([]))
//!     .with_overrides(overrides.as_object().unwrap());
//!
//! assert_eq!(request.method, Method::Put);
//! assert_eq!(request.settings["cache"], serde_json::json!(false));
//! ```

mod error;
mod request;
mod response;
mod transport;

pub use error::{Result, TransportError};
pub use request::{Method, Payload, TransportRequest};
pub use response::Response;
pub use transport::Transport;

pub use tokio_util::sync::CancellationToken;
