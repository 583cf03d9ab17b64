//! Error types
//!
//! Defines domain-specific error types for each module of the server.

use std::fmt;
use std::io;

/// Client registry errors
#[derive(Debug)]
pub enum RegistryError {
    /// Recording a client's arrival failed; the request cannot proceed.
    Registration(io::Error),
    /// Removing a finished client failed.
    Deregistration(io::Error),
    /// Reading the registry file failed.
    Read(io::Error),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Registration(e) => write!(f, "Failed to register client: {}", e),
            RegistryError::Deregistration(e) => write!(f, "Failed to deregister client: {}", e),
            RegistryError::Read(e) => write!(f, "Failed to read client registry: {}", e),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::Registration(e)
            | RegistryError::Deregistration(e)
            | RegistryError::Read(e) => Some(e),
        }
    }
}

/// Upload transfer errors
#[derive(Debug)]
pub enum TransferError {
    /// The upload stream itself failed before signalling its end.
    StreamFailed(String),
    /// The registry could not be consulted while finishing the upload.
    Registry(RegistryError),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::StreamFailed(cause) => write!(f, "Upload stream failed: {}", cause),
            TransferError::Registry(e) => write!(f, "Registry error during upload: {}", e),
        }
    }
}

impl std::error::Error for TransferError {}

impl From<RegistryError> for TransferError {
    fn from(error: RegistryError) -> Self {
        TransferError::Registry(error)
    }
}

/// General server error that encompasses all error types
#[derive(Debug)]
pub enum ServerError {
    Registry(RegistryError),
    Transfer(TransferError),
    Config(config::ConfigError),
    IoError(io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Registry(e) => write!(f, "Registry error: {}", e),
            ServerError::Transfer(e) => write!(f, "Transfer error: {}", e),
            ServerError::Config(e) => write!(f, "Configuration error: {}", e),
            ServerError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<RegistryError> for ServerError {
    fn from(error: RegistryError) -> Self {
        ServerError::Registry(error)
    }
}

impl From<TransferError> for ServerError {
    fn from(error: TransferError) -> Self {
        ServerError::Transfer(error)
    }
}

impl From<config::ConfigError> for ServerError {
    fn from(error: config::ConfigError) -> Self {
        ServerError::Config(error)
    }
}

impl From<io::Error> for ServerError {
    fn from(error: io::Error) -> Self {
        ServerError::IoError(error)
    }
}
