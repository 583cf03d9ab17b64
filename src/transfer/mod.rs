//! Transfer module
//!
//! Drives a streamed upload: registers the client when the stream opens,
//! counts chunks and bytes, and deregisters once it ends or fails.

pub mod results;
pub mod upload;

pub use results::UploadSummary;
pub use upload::{UploadSession, receive_upload};
