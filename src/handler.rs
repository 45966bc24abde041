use ::axum::Router;
use ::axum::body::to_bytes;
use ::axum::extract::Request as AxumRequest;
use ::axum::response::IntoResponse;
use ::axum::response::Response as AxumResponse;
use ::bytes::Bytes;
use ::http::Request;
use ::http::StatusCode;
use ::std::sync::Arc;

use crate::ResponseRecorder;

///
/// A synchronous request handler.
///
/// It receives the request, with its body fully read,
/// and writes its response into the [`ResponseRecorder`].
///
/// This is implemented for any `Fn(&Request<Bytes>, &mut ResponseRecorder)`,
/// so plain functions and closures can be used directly.
///
/// ```rust
/// use ::bytes::Bytes;
/// use ::http::Request;
/// use ::http::StatusCode;
/// use ::http_easy_test::ResponseRecorder;
///
/// fn route_hello(_request: &Request<Bytes>, recorder: &mut ResponseRecorder) {
///     recorder.write_head(StatusCode::OK);
///     recorder.write_body("hello!");
/// }
/// ```
///
pub trait Handler {
    fn handle(&self, request: &Request<Bytes>, recorder: &mut ResponseRecorder);
}

impl<F> Handler for F
where
    F: Fn(&Request<Bytes>, &mut ResponseRecorder),
{
    fn handle(&self, request: &Request<Bytes>, recorder: &mut ResponseRecorder) {
        (self)(request, recorder)
    }
}

/// Wraps a synchronous [`Handler`] as an [`axum::Router`],
/// which answers every path and method.
///
/// This allows the same handler to be used with both
/// [`MockRequest::invoke()`](crate::MockRequest::invoke())
/// and [`MockServer`](crate::MockServer).
pub fn handler_router<H>(handler: H) -> Router
where
    H: Handler + Send + Sync + 'static,
{
    let handler = Arc::new(handler);

    Router::new().fallback(move |request: AxumRequest| {
        let handler = handler.clone();
        async move { call_handler(handler.as_ref(), request).await }
    })
}

async fn call_handler<H>(handler: &H, request: AxumRequest) -> AxumResponse
where
    H: Handler,
{
    let (parts, body) = request.into_parts();
    let body_bytes = match to_bytes(body, usize::MAX).await {
        Ok(body_bytes) => body_bytes,
        Err(err) => {
            ::tracing::warn!(?err, "Failed to read request body for handler");
            return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
        }
    };

    let request = Request::from_parts(parts, body_bytes);
    let mut recorder = ResponseRecorder::new();
    handler.handle(&request, &mut recorder);

    recorder.into_axum_response()
}

#[cfg(test)]
mod test_handle {
    use super::*;

    #[test]
    fn it_should_call_closures() {
        let handler = |request: &Request<Bytes>, recorder: &mut ResponseRecorder| {
            recorder.write_body(request.body());
        };

        let request = Request::new(Bytes::from_static(b"echo"));
        let mut recorder = ResponseRecorder::new();
        handler.handle(&request, &mut recorder);

        assert_eq!(recorder.body(), b"echo");
    }
}
