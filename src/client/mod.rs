//! Client management system
//!
//! Tracks in-flight upload clients in a durable registry file, serializing
//! every mutation through a FIFO gate.

pub mod queue;
pub mod record;
pub mod registry;

pub use queue::ExclusiveQueue;
pub use record::{ClientRecord, IdClock};
pub use registry::ClientRegistry;
