use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::client::ClientRegistry;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::server::routes::{AppState, router};

pub struct Server {
    registry: AppState,
    listener: TcpListener,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Binds the listener and opens the registry named by `config`.
    pub async fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let config = Arc::new(config);
        let socket = config.listen_socket();

        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => {
                info!("Server bound to {}", socket);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(ServerError::IoError(e));
            }
        };

        let registry = Arc::new(ClientRegistry::with_file(config.registry_path()));

        Ok(Self {
            registry,
            listener,
            config,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves requests until the process is stopped.
    pub async fn start(self) -> Result<(), ServerError> {
        info!(
            "Server listening at http://{}",
            self.config.listen_socket()
        );
        info!("Client list stored at: {}", self.registry.path().display());

        axum::serve(self.listener, router(self.registry)).await?;
        Ok(())
    }
}
