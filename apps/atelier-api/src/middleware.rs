//! # Request Tracing
//!
//! Wraps every request in a `tracing` span keyed by a fresh request id.
//!
//! ```text
//! request ──► request_span ──► router ──► handler
//!                 │                          │
//!                 │  span: request{request_id, method, path}
//!                 │                          │
//! response ◄──────┴── x-request-id: <uuid> ◄─┘
//! ```

use std::time::Instant;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Response header echoing the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Middleware: assigns a request id, runs the rest of the stack inside a
/// span carrying it, and logs completion.
pub async fn request_span(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!(
        "request",
        %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    let started = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;

    span.in_scope(|| {
        info!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );
    });

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
