use crate::state::TransportState;
use arc_swap::ArcSwapOption;
use log::info;
use std::sync::{Arc, OnceLock};

/// A swappable, possibly empty reference to a [`TransportState`].
///
/// The control side may attach, replace or detach the state at any time;
/// the audio thread reads it through `arc-swap` without locking, so a swap
/// never blocks a synchronization pass.
#[derive(Debug, Default)]
pub struct TransportSlot {
    state: ArcSwapOption<TransportState>,
}

impl TransportSlot {
    pub fn new(state: Option<Arc<TransportState>>) -> Self {
        Self {
            state: ArcSwapOption::new(state),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Replaces the held state and returns the previous one.
    pub fn set(&self, state: Option<Arc<TransportState>>) -> Option<Arc<TransportState>> {
        info!(
            "Transport source {}",
            if state.is_some() { "attached" } else { "detached" }
        );
        self.state.swap(state)
    }

    pub fn get(&self) -> Option<Arc<TransportState>> {
        self.state.load_full()
    }

    pub fn is_set(&self) -> bool {
        self.state.load().is_some()
    }

    pub(crate) fn load(&self) -> arc_swap::Guard<Option<Arc<TransportState>>> {
        self.state.load()
    }
}

/// Process-wide transport followed by every [`TransportSync`](super::TransportSync)
/// that has no state of its own attached.
pub fn global_transport() -> Arc<TransportSlot> {
    static GLOBAL: OnceLock<Arc<TransportSlot>> = OnceLock::new();
    GLOBAL.get_or_init(|| Arc::new(TransportSlot::empty())).clone()
}
