use crate::config::ConfigError;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("failed to bind UDP socket on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("socket receive failed: {0}")]
    Receive(#[source] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
