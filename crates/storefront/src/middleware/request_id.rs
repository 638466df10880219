//! Request correlation.
//!
//! `tower_http`'s request-id layers set `x-request-id` on the way in (keeping
//! an upstream value if a proxy supplied one) and copy it to the response.
//! This module builds the tracing span that carries it.

use axum::extract::Request;
use tracing::Span;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the per-request span for `TraceLayer`.
///
/// The request ID is also tagged on the Sentry scope so captured errors can
/// be matched to log lines.
pub fn make_request_span(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-");

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", request_id);
    });

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}
