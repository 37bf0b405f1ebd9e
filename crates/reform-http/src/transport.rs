//! The injected request executor.

use std::future::Future;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::request::TransportRequest;
use crate::response::Response;

/// Executes a submission request.
///
/// The form engine never talks to the network itself. It builds a
/// [`TransportRequest`] and hands it to an implementation of this trait
/// together with a [`CancellationToken`] that fires when the submission is
/// cancelled.
///
/// Any closure of the right shape is a transport:
///
/// ```rust
/// use reform_http::{CancellationToken, Method, Payload, Response, Transport, TransportRequest};
///
/// let transport = |req: TransportRequest, _cancel: CancellationToken| async move {
///     Ok::<_, reform_http::TransportError>(Response::text(req.payload.body_string()))
/// };
///
/// let request = TransportRequest::new(Method::Post, "/echo", Payload::json([("a", "1")]));
/// let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// let response = runtime
///     .block_on(transport.send(request, CancellationToken::new()))
///     .unwrap();
/// assert_eq!(response.body_string().as_deref(), Some(r#"{"a":"1"}"#));
/// ```
pub trait Transport: Send + Sync {
    /// Sends the request and resolves to the endpoint's response.
    fn send(
        &self,
        request: TransportRequest,
        cancel: CancellationToken,
    ) -> BoxFuture<'static, Result<Response>>;
}

impl<F, Fut> Transport for F
where
    F: Fn(TransportRequest, CancellationToken) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response>> + Send + 'static,
{
    fn send(
        &self,
        request: TransportRequest,
        cancel: CancellationToken,
    ) -> BoxFuture<'static, Result<Response>> {
        Box::pin(self(request, cancel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::request::{Method, Payload};

    #[tokio::test]
    async fn test_closure_transport() {
        let transport = |req: TransportRequest, _cancel: CancellationToken| async move {
            Ok::<_, TransportError>(Response::text(format!("{} {}", req.method, req.url)))
        };

        let request = TransportRequest::new(Method::Post, "/submit", Payload::json([]));
        let response = transport
            .send(request, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(response.body_string(), Some("POST /submit".to_string()));
    }

    #[tokio::test]
    async fn test_transport_observes_cancellation() {
        let transport = |_req: TransportRequest, cancel: CancellationToken| async move {
            cancel.cancelled().await;
            Err::<Response, _>(TransportError::Cancelled)
        };

        let token = CancellationToken::new();
        token.cancel();
        let request = TransportRequest::new(Method::Get, ".", Payload::Form(String::new()));
        let result = transport.send(request, token).await;
        assert!(matches!(result, Err(TransportError::Cancelled)));
    }
}
