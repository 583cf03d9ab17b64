//! HTTP response payloads
//!
//! JSON bodies returned by the front door.

use serde::Serialize;

use crate::client::ClientRecord;
use crate::transfer::UploadSummary;

pub const CLIENT_LIST_MESSAGE: &str = "List of clients from local temp file (non-persistent)";
pub const UPLOAD_COMPLETE_MESSAGE: &str = "Stream received successfully!";

/// Body of `GET /clients`
#[derive(Debug, Serialize)]
pub struct ClientListResponse {
    pub message: &'static str,
    pub clients: Vec<ClientRecord>,
    pub count: usize,
}

impl ClientListResponse {
    pub fn new(clients: Vec<ClientRecord>) -> Self {
        Self {
            message: CLIENT_LIST_MESSAGE,
            count: clients.len(),
            clients,
        }
    }
}

/// Body of a completed `POST /upload`
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub summary: UploadSummary,
}

impl From<UploadSummary> for UploadResponse {
    fn from(summary: UploadSummary) -> Self {
        Self {
            message: UPLOAD_COMPLETE_MESSAGE,
            summary,
        }
    }
}

/// Body of every failed request
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}
