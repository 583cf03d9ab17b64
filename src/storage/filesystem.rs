//! Module `filesystem`
//!
//! Defines the `RegistryStore` seam and the `FileStore` implementation that
//! keeps the registry in a single text file.

use log::debug;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::client::ClientRecord;
use crate::storage::operations::{parse_records, serialize_records};

/// File name used under the system temp directory when no path is configured.
pub const REGISTRY_FILE_NAME: &str = "connected_clients.txt";

/// Returns `<system temp directory>/connected_clients.txt`.
pub fn default_registry_path() -> PathBuf {
    std::env::temp_dir().join(REGISTRY_FILE_NAME)
}

/// Storage backing a client registry.
///
/// `append` and `rewrite` must have reached durable storage before they
/// return `Ok`. Callers serialize the mutating methods; `read_all` may run
/// concurrently with them.
pub trait RegistryStore: Send + Sync + 'static {
    /// Reads every record in storage order. A store that has never been
    /// written to yields an empty list.
    fn read_all(&self) -> impl Future<Output = io::Result<Vec<ClientRecord>>> + Send;

    /// Adds one record after the existing ones.
    fn append(&self, record: &ClientRecord) -> impl Future<Output = io::Result<()>> + Send;

    /// Replaces the stored contents with `records`.
    fn rewrite(&self, records: &[ClientRecord]) -> impl Future<Output = io::Result<()>> + Send;

    /// Location of the backing storage, for diagnostics.
    fn location(&self) -> &Path;
}

/// Registry store backed by one local, newline-delimited file.
///
/// The file is process-local: another instance pointed at a different temp
/// directory sees its own (possibly empty) list.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn ensure_parent_dir(&self) -> io::Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent).await,
            _ => Ok(()),
        }
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(default_registry_path())
    }
}

impl RegistryStore for FileStore {
    async fn read_all(&self) -> io::Result<Vec<ClientRecord>> {
        match fs::read_to_string(&self.path).await {
            Ok(data) => Ok(parse_records(&data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn append(&self, record: &ClientRecord) -> io::Result<()> {
        self.ensure_parent_dir().await?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        // The handle is dropped (and closed) on every return path below.
        file.write_all(format!("{record}\n").as_bytes()).await?;
        file.flush().await?;
        file.sync_all().await?;

        debug!("Appended {} to {}", record, self.path.display());
        Ok(())
    }

    async fn rewrite(&self, records: &[ClientRecord]) -> io::Result<()> {
        self.ensure_parent_dir().await?;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .await?;

        file.write_all(serialize_records(records).as_bytes()).await?;
        file.flush().await?;
        file.sync_all().await?;

        debug!(
            "Rewrote {} with {} record(s)",
            self.path.display(),
            records.len()
        );
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn read_all_on_missing_file_is_empty() {
        let dir = tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().join("never_written.txt"));
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn read_all_propagates_non_missing_errors() {
        let dir = tempdir().expect("tempdir");
        // A directory cannot be read as a text file.
        let store = FileStore::new(dir.path());
        assert!(store.read_all().await.is_err());
    }

    #[tokio::test]
    async fn append_creates_file_and_parent_dirs() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested/registry/clients.txt");
        let store = FileStore::new(&path);

        store.append(&ClientRecord::new("client_1")).await.unwrap();
        store.append(&ClientRecord::new("client_2")).await.unwrap();

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk, "client_1\nclient_2\n");
    }

    #[tokio::test]
    async fn rewrite_to_empty_leaves_empty_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("clients.txt");
        let store = FileStore::new(&path);

        store.append(&ClientRecord::new("client_1")).await.unwrap();
        store.rewrite(&[]).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[test]
    fn location_is_configured_path() {
        let store = FileStore::new("/srv/uploads/clients.txt");
        assert_eq!(store.location(), Path::new("/srv/uploads/clients.txt"));
    }

    #[test]
    fn default_path_lives_in_temp_dir() {
        let path = default_registry_path();
        assert_eq!(path.parent(), Some(std::env::temp_dir().as_path()));
        assert!(path.ends_with(REGISTRY_FILE_NAME));
    }
}
