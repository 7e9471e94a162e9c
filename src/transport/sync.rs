use super::events::TransportEventQueue;
use super::snapshot::{TransportChangeSet, TransportSnapshot};
use super::source::{global_transport, TransportSlot};
use super::timing::beats_elapsed;
use crate::state::TransportState;
use std::sync::Arc;

/// Audio-thread side of the transport.
///
/// Owns everything only the real-time callback touches: the timestamp of the
/// last pass, the snapshot it produced and the one before it, which is what
/// change-sets are diffed against. Passes take `&mut self`, which pins the
/// protocol to a single audio thread, and never allocate, block or lock.
///
/// Each pass follows the instance slot when it holds a state and falls back
/// to the global slot otherwise. With neither attached the pass only records
/// its timestamp and the previous snapshot stays in force.
#[derive(Debug)]
pub struct TransportSync {
    instance: Arc<TransportSlot>,
    global: Arc<TransportSlot>,
    /// Address of the state followed by the last pass, compared only.
    followed: Option<usize>,
    last_update_ms: Option<f64>,
    current: TransportSnapshot,
    previous: Option<TransportSnapshot>,
}

impl TransportSync {
    /// Follows `state`, falling back to the [`global_transport`] if it is
    /// later detached from [`instance_slot`](Self::instance_slot).
    pub fn new(state: Arc<TransportState>) -> Self {
        Self::with_sources(
            Arc::new(TransportSlot::new(Some(state))),
            global_transport(),
        )
    }

    pub fn with_sources(instance: Arc<TransportSlot>, global: Arc<TransportSlot>) -> Self {
        let current = instance
            .get()
            .or_else(|| global.get())
            .map(|state| sample(&state, state.beat_time()))
            .unwrap_or_else(|| {
                let defaults = TransportState::new();
                sample(&defaults, defaults.beat_time())
            });
        Self {
            instance,
            global,
            followed: None,
            last_update_ms: None,
            current,
            previous: None,
        }
    }

    pub fn instance_slot(&self) -> &Arc<TransportSlot> {
        &self.instance
    }

    pub fn global_slot(&self) -> &Arc<TransportSlot> {
        &self.global
    }

    /// The state the next pass would follow, if any.
    pub fn resolve(&self) -> Option<Arc<TransportState>> {
        self.instance.get().or_else(|| self.global.get())
    }

    /// Host timestamp of the most recent pass, if any pass has run.
    pub fn last_update_ms(&self) -> Option<f64> {
        self.last_update_ms
    }

    /// Snapshot produced by the most recent pass.
    pub fn current(&self) -> TransportSnapshot {
        self.current
    }

    /// Synchronizes for the block starting at `now_ms` and returns the
    /// values the block must use.
    ///
    /// Calling again with the same timestamp returns the same snapshot
    /// without touching shared state.
    pub fn process(&mut self, now_ms: f64) -> TransportSnapshot {
        self.sync(now_ms);
        self.current
    }

    /// Like [`process`](Self::process), also reporting what changed since
    /// the previous pass. A repeated timestamp, or a pass with no state to
    /// follow, yields an empty change-set.
    pub fn process_with_changes(&mut self, now_ms: f64) -> (TransportSnapshot, TransportChangeSet) {
        if !self.sync(now_ms) {
            return (self.current, TransportChangeSet::unchanged(&self.current));
        }
        let changes = TransportChangeSet::between(self.previous.as_ref(), &self.current);
        (self.current, changes)
    }

    /// Runs a pass and publishes one event per changed field to `queue`,
    /// stamped with `now_ms`.
    pub fn process_and_publish(
        &mut self,
        now_ms: f64,
        queue: &TransportEventQueue,
    ) -> TransportSnapshot {
        let (snapshot, changes) = self.process_with_changes(now_ms);
        for event in changes.events(now_ms) {
            queue.publish(event);
        }
        snapshot
    }

    /// Returns `false` when `now_ms` repeats the last pass or there is no
    /// state to follow.
    fn sync(&mut self, now_ms: f64) -> bool {
        if self.last_update_ms == Some(now_ms) {
            return false;
        }
        let prev_ms = self.last_update_ms.replace(now_ms);

        let instance = self.instance.load();
        let global = self.global.load();
        let Some(state) = (*instance).as_ref().or((*global).as_ref()) else {
            return false;
        };

        // A newly followed state brings its own position with it.
        let address = Arc::as_ptr(state) as usize;
        let base = if self.followed == Some(address) {
            self.current.beat_time
        } else {
            state.beat_time()
        };
        self.followed = Some(address);

        // Independent loads; only the signature pair is read as one word.
        let tempo = state.tempo();
        let beat_time = match (state.take_pending_seek(), prev_ms) {
            (Some(seek), _) => seek,
            (None, Some(prev_ms)) => base + beats_elapsed(now_ms - prev_ms, tempo),
            (None, None) => base,
        };

        state.store_beat_time(beat_time);
        self.previous = prev_ms.map(|_| self.current);
        self.current = TransportSnapshot {
            tempo,
            ..sample(state, beat_time)
        };
        true
    }
}

fn sample(state: &TransportState, beat_time: f64) -> TransportSnapshot {
    let (time_sig_num, time_sig_denom) = state.time_signature();
    TransportSnapshot {
        running: state.running(),
        tempo: state.tempo(),
        beat_time,
        time_sig_num,
        time_sig_denom,
    }
}
