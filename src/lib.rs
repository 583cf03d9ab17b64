pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod server;
pub mod storage;
pub mod transfer;
pub mod utils;

pub use client::{ClientRecord, ClientRegistry};
pub use config::ServerConfig;
pub use server::Server;
