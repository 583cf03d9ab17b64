//! Server core functionality
//!
//! HTTP front door for the client registry: router, handlers, response
//! payloads, and the listener loop.

pub mod core;
pub mod responses;
pub mod routes;

pub use core::Server;
pub use routes::{AppState, router};
