//! HTTP routes
//!
//! Maps `GET /clients` and `POST /upload` onto registry operations.

use axum::body::Body;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::{Router, middleware};
use std::sync::Arc;

use crate::client::ClientRegistry;
use crate::error::{RegistryError, ServerError, TransferError};
use crate::error::handlers::{
    error_to_client_message, error_to_status_code, handle_error, is_logged_at_source,
};
use crate::middleware::log_request;
use crate::server::responses::{ClientListResponse, ErrorResponse, UploadResponse};
use crate::storage::{FileStore, RegistryStore};
use crate::transfer::receive_upload;

/// Shared handler state.
pub type AppState<S = FileStore> = Arc<ClientRegistry<S>>;

/// Builds the application router around `registry`.
pub fn router<S: RegistryStore>(registry: AppState<S>) -> Router {
    Router::new()
        .route("/clients", get(list_clients::<S>))
        .route("/upload", post(upload::<S>))
        .layer(middleware::from_fn(log_request))
        .with_state(registry)
}

/// Error returned by handlers; rendered as a JSON `{ "error": ... }` body.
#[derive(Debug)]
pub struct ApiError(ServerError);

impl From<RegistryError> for ApiError {
    fn from(error: RegistryError) -> Self {
        ApiError(error.into())
    }
}

impl From<TransferError> for ApiError {
    fn from(error: TransferError) -> Self {
        ApiError(error.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if !is_logged_at_source(&self.0) {
            handle_error(&self.0);
        }
        let status = error_to_status_code(&self.0);
        let body = ErrorResponse {
            error: error_to_client_message(&self.0),
        };
        (status, Json(body)).into_response()
    }
}

/// `GET /clients`
pub async fn list_clients<S: RegistryStore>(
    State(registry): State<AppState<S>>,
) -> Result<Json<ClientListResponse>, ApiError> {
    let clients = registry.list_clients().await?;
    Ok(Json(ClientListResponse::new(clients)))
}

/// `POST /upload`
pub async fn upload<S: RegistryStore>(
    State(registry): State<AppState<S>>,
    body: Body,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let summary = receive_upload(&registry, body.into_data_stream()).await?;
    Ok((StatusCode::OK, Json(UploadResponse::from(summary))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn make_state(path: &Path) -> AppState {
        Arc::new(ClientRegistry::with_file(path.join("clients.txt")))
    }

    #[tokio::test]
    async fn list_clients_on_cold_start_is_empty() {
        let dir = tempdir().expect("tempdir");
        let Json(response) = list_clients(State(make_state(dir.path())))
            .await
            .unwrap_or_else(|_| panic!("list clients failed"));

        assert!(response.clients.is_empty());
        assert_eq!(response.count, 0);
    }

    #[tokio::test]
    async fn upload_reports_counts_and_clears_registry() {
        let dir = tempdir().expect("tempdir");
        let state = make_state(dir.path());

        let (status, Json(response)) = upload(State(state.clone()), Body::from("hello world"))
            .await
            .unwrap_or_else(|_| panic!("upload failed"));

        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.summary.total_bytes, 11);
        assert_eq!(response.summary.total_chunks, 1);
        assert!(response.summary.active_clients.is_empty());
        assert!(state.list_clients().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_lists_other_active_clients() {
        let dir = tempdir().expect("tempdir");
        let state = make_state(dir.path());
        let other = state.register_client_start().await.unwrap();

        let (_, Json(response)) = upload(State(state.clone()), Body::from("abc"))
            .await
            .unwrap_or_else(|_| panic!("upload failed"));

        assert_eq!(response.summary.active_clients, vec![other]);
    }

    #[tokio::test]
    async fn upload_fails_when_registration_fails() {
        let dir = tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let state: AppState = Arc::new(ClientRegistry::with_file(blocker.join("clients.txt")));

        let response = match upload(State(state), Body::from("abc")).await {
            Ok(_) => panic!("upload should fail"),
            Err(err) => err.into_response(),
        };

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let value: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(value["error"], "Error saving client ID.");
    }

    #[tokio::test]
    async fn list_clients_reflects_registrations() {
        let dir = tempdir().expect("tempdir");
        let state = make_state(dir.path());
        let first = state.register_client_start().await.unwrap();
        let second = state.register_client_start().await.unwrap();

        let Json(response) = list_clients(State(state))
            .await
            .unwrap_or_else(|_| panic!("list clients failed"));

        assert_eq!(response.clients, vec![first, second]);
        assert_eq!(response.count, 2);
    }
}
