//! Notifications flowing from the audio thread back to the control side.

use super::snapshot::TransportChangeSet;
use crossbeam::queue::ArrayQueue;
use log::warn;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// A single transport change, stamped with the block time (ms) it was
/// observed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportEvent {
    Running { running: bool, time: f64 },
    Tempo { tempo: f64, time: f64 },
    BeatTime { beat_time: f64, time: f64 },
    TimeSignature { numerator: u16, denominator: u16, time: f64 },
}

impl TransportEvent {
    pub fn time(&self) -> f64 {
        match *self {
            TransportEvent::Running { time, .. }
            | TransportEvent::Tempo { time, .. }
            | TransportEvent::BeatTime { time, .. }
            | TransportEvent::TimeSignature { time, .. } => time,
        }
    }
}

impl TransportChangeSet {
    /// Events for every raised flag, in running, tempo, beat time,
    /// signature order. Allocation free.
    pub fn events(&self, time: f64) -> impl Iterator<Item = TransportEvent> {
        [
            self.running_changed.then_some(TransportEvent::Running {
                running: self.running,
                time,
            }),
            self.tempo_changed.then_some(TransportEvent::Tempo {
                tempo: self.tempo,
                time,
            }),
            self.beat_time_changed.then_some(TransportEvent::BeatTime {
                beat_time: self.beat_time,
                time,
            }),
            self.time_signature_changed
                .then_some(TransportEvent::TimeSignature {
                    numerator: self.time_sig_num,
                    denominator: self.time_sig_denom,
                    time,
                }),
        ]
        .into_iter()
        .flatten()
    }
}

/// Receives drained transport events on the control side. Every hook
/// defaults to doing nothing so listeners only implement what they need.
pub trait TransportListener {
    fn on_running(&mut self, _running: bool, _time: f64) {}
    fn on_tempo(&mut self, _tempo: f64, _time: f64) {}
    fn on_beat_time(&mut self, _beat_time: f64, _time: f64) {}
    fn on_time_signature(&mut self, _numerator: u16, _denominator: u16, _time: f64) {}
}

/// Bounded lock-free queue from the audio thread to whoever polls on the
/// control side. Any number of threads may publish or poll concurrently;
/// each event is delivered to exactly one poll, in per-producer order.
///
/// Storage is allocated up front. When the queue is full the audio thread
/// drops the event and bumps a counter rather than wait.
#[derive(Debug)]
pub struct TransportEventQueue {
    events: ArrayQueue<TransportEvent>,
    dropped: AtomicUsize,
    reported: AtomicUsize,
}

impl Default for TransportEventQueue {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl TransportEventQueue {
    /// # Panics
    /// When `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        Self {
            events: ArrayQueue::new(capacity),
            dropped: AtomicUsize::new(0),
            reported: AtomicUsize::new(0),
        }
    }

    /// Real-time safe. Returns `false` if the event had to be dropped.
    pub fn publish(&self, event: TransportEvent) -> bool {
        if self.events.push(event).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        true
    }

    pub fn pop(&self) -> Option<TransportEvent> {
        self.events.pop()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events lost to a full queue since creation.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Drains everything queued so far into `listener`, returning how many
    /// events were delivered.
    pub fn poll<L: TransportListener + ?Sized>(&self, listener: &mut L) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.events.pop() {
            match event {
                TransportEvent::Running { running, time } => listener.on_running(running, time),
                TransportEvent::Tempo { tempo, time } => listener.on_tempo(tempo, time),
                TransportEvent::BeatTime { beat_time, time } => {
                    listener.on_beat_time(beat_time, time)
                }
                TransportEvent::TimeSignature {
                    numerator,
                    denominator,
                    time,
                } => listener.on_time_signature(numerator, denominator, time),
            }
            delivered += 1;
        }

        let dropped = self.dropped();
        let reported = self.reported.swap(dropped, Ordering::Relaxed);
        if dropped > reported {
            warn!(
                "{} transport events dropped, event queue was full",
                dropped - reported
            );
        }
        delivered
    }
}
