//! Upload Registry Server - Entry Point
//!
//! Accepts streamed uploads and tracks in-flight clients in a registry file.

use log::{error, info};
use std::process::ExitCode;

use upload_registry_server::error::ServerError;
use upload_registry_server::error::handlers::handle_error;
use upload_registry_server::utils::logging::setup_logging;
use upload_registry_server::{Server, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    setup_logging();

    info!("Launching upload registry server...");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            handle_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ServerError> {
    let config = ServerConfig::load().inspect_err(|e| error!("Invalid configuration: {}", e))?;
    let server = Server::new(config).await?;
    server.start().await
}
