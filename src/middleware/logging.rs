//! Logging middleware
//!
//! Provides request logging functionality.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::{info, warn};
use std::time::Instant;

/// Log every request and the status it produced
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    info!("{} {} request received", method, path);

    let started = Instant::now();
    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        warn!(
            "{} {} failed with {} after {:?}",
            method,
            path,
            status,
            started.elapsed()
        );
    } else {
        info!(
            "{} {} -> {} in {:?}",
            method,
            path,
            status,
            started.elapsed()
        );
    }

    response
}
