//! Transfer result types
//!
//! Defines result structures returned by transfer operations.

use serde::Serialize;

use crate::client::ClientRecord;

/// Outcome of a stream that ended normally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub client_id: ClientRecord,
    pub total_chunks: u64,
    pub total_bytes: u64,
    /// Clients still registered after this one was removed.
    pub active_clients: Vec<ClientRecord>,
}
