//! Storage operations
//!
//! Text format helpers and the read-modify-write removal shared by every
//! `RegistryStore`.

use std::io;

use crate::client::ClientRecord;
use crate::storage::filesystem::RegistryStore;

/// Splits registry text into records, dropping blank lines.
pub fn parse_records(data: &str) -> Vec<ClientRecord> {
    data.split('\n')
        .filter(|line| !line.is_empty())
        .map(ClientRecord::from)
        .collect()
}

/// Joins records one per line with a trailing newline; empty input gives an
/// empty string.
pub fn serialize_records(records: &[ClientRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(record.as_str());
        out.push('\n');
    }
    out
}

/// Removes every entry equal to `record` and rewrites the store.
///
/// Callers must hold the registry gate: the read and the rewrite must not
/// interleave with another mutation. Returns the remaining records.
pub async fn remove_one<S: RegistryStore>(
    store: &S,
    record: &ClientRecord,
) -> io::Result<Vec<ClientRecord>> {
    let mut records = store.read_all().await?;
    records.retain(|existing| existing != record);
    store.rewrite(&records).await?;
    Ok(records)
}
