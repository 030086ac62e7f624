//! Capture handlers.
//!
//! Both handlers answer straight away and move the decode and logging work
//! onto a spawned task, so the response never waits on (or reflects) the
//! outcome of decoding.

use axum::{
    body::Bytes,
    extract::{OriginalUri, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode, Uri},
};

use crate::capture::{get_report, post_report};
use crate::http::server::AppState;

/// Body sent back for every POST.
pub const POST_ACK: &str = "Data received";

const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Path and query exactly as the client sent them.
fn request_target(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path())
        .to_string()
}

/// POST: log raw values, then decoded values when a chain is configured.
pub async fn post_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> &'static str {
    let target = request_target(&uri);
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();

    tracing::debug!(
        path = %target,
        content_type = %content_type,
        bytes = body.len(),
        "Captured POST"
    );

    tokio::spawn(async move {
        let report = post_report(&state.config.decode.chain, &target, &content_type, &body);
        state.sink.emit(&report);
    });

    POST_ACK
}

/// GET: log the path and any decoded query values.
pub async fn get_handler(State(state): State<AppState>, OriginalUri(uri): OriginalUri) -> StatusCode {
    let target = request_target(&uri);

    tracing::debug!(path = %target, "Captured GET");

    tokio::spawn(async move {
        let report = get_report(&state.config.decode.chain, &target);
        state.sink.emit(&report);
    });

    StatusCode::OK
}

/// HEAD: refused, nothing is captured.
pub async fn head_handler() -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}
