//! Registry file storage
//!
//! Durable accessors for the newline-delimited registry file: read, append
//! with flush, and whole-file rewrite with flush.

pub mod filesystem;
pub mod operations;

pub use filesystem::{FileStore, RegistryStore, default_registry_path};
pub use operations::remove_one;
