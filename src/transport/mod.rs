//! Transport synchronization
//!
//! This module carries the musical clock from the control side onto the
//! real-time audio thread:
//! - [`TransportSync`] runs once per processing block and freezes a
//!   [`TransportSnapshot`] for it
//! - [`TransportSlot`] selects the state a sync follows: its own when one is
//!   attached, otherwise the [`global_transport`]
//! - [`TransportChangeSet`] describes what moved since the previous block
//! - [`TransportEventQueue`] hands those changes back as [`TransportEvent`]s
//!
//! Beat time advances from host timestamps in milliseconds, at
//! [`BEATS_PER_MS_UNIT`] beats per millisecond per BPM.

mod events;
mod snapshot;
mod source;
mod sync;
pub mod timing;

pub use events::{
    TransportEvent, TransportEventQueue, TransportListener, DEFAULT_EVENT_CAPACITY,
};
pub use snapshot::{TransportChangeSet, TransportSnapshot};
pub use source::{global_transport, TransportSlot};
pub use sync::TransportSync;
pub use timing::{
    bar_position, beats_elapsed, block_time_ms, BEATS_PER_MS_UNIT, TICKS_PER_BEAT,
};
