//! HTTP request/response tracing middleware.

use axum::body::Body;
use axum::extract::Request;
use axum::http::Response;
use std::time::Duration;
use tower_http::classify::{ServerErrorsAsFailures, ServerErrorsFailureClass, SharedClassifier};
use tower_http::trace::TraceLayer;
use tracing::Span;

type MakeSpan = fn(&Request) -> Span;
type OnResponse = fn(&Response<Body>, Duration, &Span);
type OnFailure = fn(ServerErrorsFailureClass, Duration, &Span);

/// Creates a tracing middleware for HTTP requests.
///
/// One `INFO` span per request carrying method and path (no query string).
/// Redirect responses log at `DEBUG`, other responses at `INFO`. 5xx
/// responses also log at `ERROR`.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=POST path=/link}: response status=201 latency_ms=4
/// ERROR request{method=GET path=/stat}: request failed class=Status code: 500 latency_ms=2
/// ```
pub fn layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    MakeSpan,
    tower_http::trace::DefaultOnRequest,
    OnResponse,
    tower_http::trace::DefaultOnBodyChunk,
    tower_http::trace::DefaultOnEos,
    OnFailure,
> {
    TraceLayer::new_for_http()
        .make_span_with(make_span as MakeSpan)
        .on_response(on_response as OnResponse)
        .on_failure(on_failure as OnFailure)
}

fn make_span(req: &Request) -> Span {
    tracing::info_span!(
        "request",
        method = %req.method(),
        path = %req.uri().path(),
    )
}

fn on_response(res: &Response<Body>, latency: Duration, _span: &Span) {
    let status = res.status();
    let latency_ms = latency.as_millis() as u64;

    if status.is_redirection() {
        tracing::debug!(status = status.as_u16(), latency_ms, "response");
    } else {
        tracing::info!(status = status.as_u16(), latency_ms, "response");
    }
}

fn on_failure(class: ServerErrorsFailureClass, latency: Duration, _span: &Span) {
    tracing::error!(
        class = %class,
        latency_ms = latency.as_millis() as u64,
        "request failed"
    );
}
