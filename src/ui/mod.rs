//! Console display of the transport
//!
//! Built on indicatif progress bars and driven entirely by drained
//! [`TransportEvent`](crate::transport::TransportEvent)s, so it runs on the
//! control side and never reads the audio thread's state directly.

mod inspector;
mod progress;

pub use inspector::TransportInspector;
pub use progress::{
    create_bar_progress, create_beat_progress, create_transport_spinner, BARS_PER_PHRASE,
};
