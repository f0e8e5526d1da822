//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds to a socket and spawns a Connection task for each
//! incoming client. Binding failure is fatal; accept errors are logged and
//! the loop keeps serving. A session task's failure never reaches the
//! accept loop.

use crate::config::Config;
use crate::network::Connection;
use crate::state::Hub;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, instrument, warn};

/// The Gateway accepts incoming TCP connections and spawns sessions.
pub struct Gateway {
    listener: TcpListener,
    hub: Arc<Hub>,
    config: Arc<Config>,
}

impl Gateway {
    /// Bind the gateway to the configured address.
    pub async fn bind(config: Arc<Config>, hub: Arc<Hub>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(config.server.listen).await?;
        info!(addr = %config.server.listen, "Listener bound");

        Ok(Self {
            listener,
            hub,
            config,
        })
    }

    /// Run the gateway, accepting connections forever.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    info!(%addr, "Connection accepted");

                    let hub = Arc::clone(&self.hub);
                    let config = Arc::clone(&self.config);

                    tokio::spawn(async move {
                        let connection = Connection::new(stream, addr, hub, config);
                        if let Err(e) = connection.run().await {
                            warn!(%addr, error = %e, "Connection error");
                        }
                        info!(%addr, "Connection closed");
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}
