//! Error handlers
//!
//! Logging and HTTP status mapping for server errors.

use axum::http::StatusCode;
use log::error;

use crate::error::types::{RegistryError, ServerError, TransferError};

/// Handle a server error
pub fn handle_error(err: &ServerError) {
    error!("Upload registry server error: {}", err);
}

/// Whether the error was already logged where it happened.
///
/// Stream failures are logged by the upload session together with the
/// client id.
pub fn is_logged_at_source(err: &ServerError) -> bool {
    matches!(err, ServerError::Transfer(TransferError::StreamFailed(_)))
}

/// Convert error to HTTP status code
pub fn error_to_status_code(err: &ServerError) -> StatusCode {
    match err {
        ServerError::Registry(_) | ServerError::Transfer(_) | ServerError::IoError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        // Startup path only; request handlers never produce it.
        ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Generic message shown to HTTP callers for each failure.
pub fn error_to_client_message(err: &ServerError) -> &'static str {
    match err {
        ServerError::Registry(RegistryError::Registration(_))
        | ServerError::Transfer(TransferError::Registry(RegistryError::Registration(_))) => {
            "Error saving client ID."
        }
        ServerError::Registry(RegistryError::Read(_)) => "Error reading client list.",
        ServerError::Transfer(TransferError::StreamFailed(_)) => "Error during stream.",
        ServerError::Transfer(TransferError::Registry(_)) => "Error processing stream end.",
        _ => "Internal server error.",
    }
}
