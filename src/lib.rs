pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod midi;
pub mod state;
pub mod transport;
pub mod ui;

pub use config::TransportConfig;
pub use error::{Result, TransportError};
pub use state::TransportState;
pub use transport::{
    global_transport, TransportChangeSet, TransportEvent, TransportEventQueue, TransportListener,
    TransportSlot, TransportSnapshot, TransportSync,
};

use std::sync::Arc;

/// Shared handle given to control-side callers.
pub type SharedState = Arc<TransportState>;
