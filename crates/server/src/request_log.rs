use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::info;

use crate::state::CorrelationId;

/// Tags each request with a correlation id and logs its outcome.
pub async fn log_requests(mut request: Request, next: Next) -> Response {
    let correlation = CorrelationId::generate();
    request.extensions_mut().insert(correlation.clone());

    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    info!(
        event_name = "http.request",
        correlation_id = %correlation,
        method = %method,
        uri = %uri,
        status = status.as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        success = status.is_success(),
        "request completed"
    );
    response
}
