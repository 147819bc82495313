use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Cannot listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Feed generation failed: {0}")]
    Feed(#[from] podfeed::Error),

    #[error("Unknown log level: {0}")]
    InvalidLogLevel(String),

    #[error("Cannot change log level: {0}")]
    LogReload(#[from] tracing_subscriber::reload::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
