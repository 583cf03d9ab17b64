//! Module `upload`
//!
//! Upload lifecycle glue between a byte stream and the client registry.
//! Bytes are counted, never stored.

use futures_util::{Stream, StreamExt};
use log::{debug, error, info, warn};
use std::fmt::Display;

use crate::client::{ClientRecord, ClientRegistry};
use crate::error::{RegistryError, TransferError};
use crate::storage::RegistryStore;
use crate::transfer::results::UploadSummary;

/// Per-request upload state. Counters are local to the request.
///
/// Created by [`UploadSession::start`], which registers the client; consumed
/// by exactly one of [`UploadSession::finish`] or [`UploadSession::fail`],
/// both of which deregister it.
#[derive(Debug)]
pub struct UploadSession<'a, S: RegistryStore> {
    registry: &'a ClientRegistry<S>,
    client_id: ClientRecord,
    total_chunks: u64,
    total_bytes: u64,
}

impl<'a, S: RegistryStore> UploadSession<'a, S> {
    /// Registers a new client. Failing to register aborts the upload before
    /// any byte is read.
    pub async fn start(registry: &'a ClientRegistry<S>) -> Result<Self, RegistryError> {
        let client_id = registry.register_client_start().await?;
        info!("Stream upload started from {}", client_id);

        Ok(Self {
            registry,
            client_id,
            total_chunks: 0,
            total_bytes: 0,
        })
    }

    pub fn client_id(&self) -> &ClientRecord {
        &self.client_id
    }

    pub fn total_chunks(&self) -> u64 {
        self.total_chunks
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Counts one received chunk.
    pub fn on_chunk(&mut self, chunk: &[u8]) {
        self.total_chunks += 1;
        self.total_bytes += chunk.len() as u64;
        debug!(
            "Received chunk #{} ({} bytes) from {}",
            self.total_chunks,
            chunk.len(),
            self.client_id
        );
    }

    /// Ends the stream normally.
    ///
    /// Deregistration is best-effort; if it fails, the active list is read
    /// back from the registry instead.
    pub async fn finish(self) -> Result<UploadSummary, TransferError> {
        let active_clients = match self.registry.register_client_end(&self.client_id).await {
            Some(remaining) => remaining,
            None => self.registry.list_clients().await?,
        };

        info!(
            "Stream from {} ended ({} chunks, {} bytes). Active clients: {}",
            self.client_id,
            self.total_chunks,
            self.total_bytes,
            active_clients.len()
        );

        Ok(UploadSummary {
            client_id: self.client_id,
            total_chunks: self.total_chunks,
            total_bytes: self.total_bytes,
            active_clients,
        })
    }

    /// Ends the stream after a transport failure, deregistering the client
    /// before the failure is handed back.
    pub async fn fail(self, cause: impl Display) -> TransferError {
        error!("Stream error from {}: {}", self.client_id, cause);
        if self.registry.register_client_end(&self.client_id).await.is_none() {
            warn!("Client {} may still be listed after failed stream", self.client_id);
        }
        TransferError::StreamFailed(cause.to_string())
    }
}

/// Consumes `body` as one upload stream against `registry`.
///
/// Empty chunks are counted like any other. A stream error stops reading and
/// fails the upload.
pub async fn receive_upload<S, B, D, E>(
    registry: &ClientRegistry<S>,
    body: B,
) -> Result<UploadSummary, TransferError>
where
    S: RegistryStore,
    B: Stream<Item = Result<D, E>>,
    D: AsRef<[u8]>,
    E: Display,
{
    let mut session = UploadSession::start(registry).await?;
    let mut body = std::pin::pin!(body);

    while let Some(chunk) = body.next().await {
        match chunk {
            Ok(data) => session.on_chunk(data.as_ref()),
            Err(e) => return Err(session.fail(e).await),
        }
    }

    session.finish().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use std::io;
    use tempfile::tempdir;

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = Result<&'static [u8], io::Error>> {
        let items: Vec<_> = parts.iter().map(|p| Ok::<_, io::Error>(p.as_bytes())).collect();
        stream::iter(items)
    }

    #[tokio::test]
    async fn counts_chunks_and_bytes() {
        let dir = tempdir().expect("tempdir");
        let registry = ClientRegistry::with_file(dir.path().join("clients.txt"));

        let summary = receive_upload(&registry, chunks(&["abc", "de", ""]))
            .await
            .unwrap();

        assert_eq!(summary.total_chunks, 3);
        assert_eq!(summary.total_bytes, 5);
        assert!(summary.active_clients.is_empty());
        assert!(registry.list_clients().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn client_is_listed_while_streaming() {
        let dir = tempdir().expect("tempdir");
        let registry = ClientRegistry::with_file(dir.path().join("clients.txt"));

        let mut session = UploadSession::start(&registry).await.unwrap();
        session.on_chunk(b"hello");
        assert_eq!(
            registry.list_clients().await.unwrap(),
            vec![session.client_id().clone()]
        );

        let summary = session.finish().await.unwrap();
        assert_eq!(summary.total_bytes, 5);
        assert!(registry.list_clients().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stream_error_deregisters_and_fails() {
        let dir = tempdir().expect("tempdir");
        let registry = ClientRegistry::with_file(dir.path().join("clients.txt"));
        let body = stream::iter(vec![
            Ok(&b"abc"[..]),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer reset")),
            Ok(&b"never read"[..]),
        ]);

        let result = receive_upload(&registry, body).await;

        assert!(matches!(result, Err(TransferError::StreamFailed(ref c)) if c == "peer reset"));
        assert!(registry.list_clients().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn registration_failure_reads_nothing() {
        let dir = tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let registry = ClientRegistry::with_file(blocker.join("clients.txt"));

        let result = receive_upload(&registry, chunks(&["abc"])).await;

        assert!(matches!(
            result,
            Err(TransferError::Registry(RegistryError::Registration(_)))
        ));
    }
}
