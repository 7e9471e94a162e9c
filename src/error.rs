//! Error type shared by the transport, config and logging layers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    /// A control-side mutator was handed a value the transport cannot hold
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
