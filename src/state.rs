use crate::config::TransportConfig;
use crate::error::{Result, TransportError};
use atomic_float::AtomicF64;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

pub const DEFAULT_TEMPO: f64 = 100.0;
pub const DEFAULT_TIME_SIGNATURE: (u16, u16) = (4, 4);

/// Marks an empty pending-seek slot. Never a valid position since
/// `seek_to` refuses non-finite input.
const NO_SEEK: f64 = f64::NAN;

#[inline]
fn pack_signature(numerator: u16, denominator: u16) -> u32 {
    (u32::from(numerator) << 16) | u32::from(denominator)
}

#[inline]
fn unpack_signature(word: u32) -> (u16, u16) {
    ((word >> 16) as u16, (word & 0xFFFF) as u16)
}

/// The shared musical clock.
///
/// Every field is an independent atomic cell, so control threads can write
/// while the audio thread reads without either side taking a lock. The two
/// halves of the time signature live in one packed word and are therefore
/// always observed as a pair. No ordering is promised between different
/// fields: a reader may see a fresh tempo next to a stale signature.
#[derive(Debug)]
pub struct TransportState {
    running: AtomicBool,
    tempo: AtomicF64,
    beat_time: AtomicF64,
    time_signature: AtomicU32,
    pending_seek: AtomicF64,
}

impl Default for TransportState {
    fn default() -> Self {
        let (num, den) = DEFAULT_TIME_SIGNATURE;
        Self {
            running: AtomicBool::new(true),
            tempo: AtomicF64::new(DEFAULT_TEMPO),
            beat_time: AtomicF64::new(0.0),
            time_signature: AtomicU32::new(pack_signature(num, den)),
            pending_seek: AtomicF64::new(NO_SEEK),
        }
    }
}

impl TransportState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a state seeded from a loaded configuration, validating it the
    /// same way the mutators do.
    pub fn from_config(config: &TransportConfig) -> Result<Self> {
        let state = Self::new();
        state.set_tempo(config.tempo)?;
        state.set_time_signature(config.time_sig_num, config.time_sig_denom)?;
        state.set_running(config.running);
        state
            .beat_time
            .store(config.beat_time.max(0.0), Ordering::Release);
        info!(
            "Transport initialised: running={}, tempo={}, beat_time={}, signature={}/{}",
            config.running,
            config.tempo,
            config.beat_time.max(0.0),
            config.time_sig_num,
            config.time_sig_denom
        );
        Ok(state)
    }

    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
        debug!("Transport running set to {}", running);
    }

    pub fn running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Sets the tempo in beats per minute. Anything that is not a finite,
    /// strictly positive number is rejected and the old tempo kept.
    pub fn set_tempo(&self, bpm: f64) -> Result<()> {
        if !(bpm.is_finite() && bpm > 0.0) {
            return Err(TransportError::InvalidArgument(format!(
                "tempo must be a positive number of beats per minute, got {}",
                bpm
            )));
        }
        self.tempo.store(bpm, Ordering::Release);
        debug!("Transport tempo set to {} BPM", bpm);
        Ok(())
    }

    pub fn tempo(&self) -> f64 {
        self.tempo.load(Ordering::Acquire)
    }

    pub fn set_time_signature(&self, numerator: u16, denominator: u16) -> Result<()> {
        if numerator == 0 || denominator == 0 {
            return Err(TransportError::InvalidArgument(format!(
                "time signature {}/{} has a zero component",
                numerator, denominator
            )));
        }
        self.time_signature
            .store(pack_signature(numerator, denominator), Ordering::Release);
        debug!("Transport time signature set to {}/{}", numerator, denominator);
        Ok(())
    }

    /// Returns `(numerator, denominator)` from a single atomic load.
    pub fn time_signature(&self) -> (u16, u16) {
        unpack_signature(self.time_signature.load(Ordering::Acquire))
    }

    /// Position written back by the most recent synchronization pass.
    pub fn beat_time(&self) -> f64 {
        self.beat_time.load(Ordering::Acquire)
    }

    /// Requests a jump to `beat` on the next synchronization pass.
    ///
    /// Negative positions clamp to zero. A request that has not been
    /// consumed yet is overwritten: the last writer wins, nothing queues.
    pub fn seek_to(&self, beat: f64) {
        if !beat.is_finite() {
            warn!("Ignoring seek to non-finite beat position {}", beat);
            return;
        }
        let beat = beat.max(0.0);
        self.pending_seek.store(beat, Ordering::Release);
        debug!("Transport seek requested to beat {}", beat);
    }

    pub fn has_pending_seek(&self) -> bool {
        !self.pending_seek.load(Ordering::Acquire).is_nan()
    }

    /// Takes the pending seek and leaves the slot empty, so each request is
    /// applied at most once.
    pub fn take_pending_seek(&self) -> Option<f64> {
        let seek = self.pending_seek.swap(NO_SEEK, Ordering::AcqRel);
        if seek.is_nan() {
            None
        } else {
            Some(seek)
        }
    }

    /// Audio-side write-back of the position computed for the current block.
    pub(crate) fn store_beat_time(&self, beat: f64) {
        self.beat_time.store(beat, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_packing() {
        for &(num, den) in &[(4u16, 4u16), (7, 8), (u16::MAX, 1), (1, u16::MAX)] {
            assert_eq!(unpack_signature(pack_signature(num, den)), (num, den));
        }
    }

    #[test]
    fn test_take_pending_seek_empties_slot() {
        let state = TransportState::new();
        assert_eq!(state.take_pending_seek(), None);

        state.seek_to(8.0);
        assert!(state.has_pending_seek());
        assert_eq!(state.take_pending_seek(), Some(8.0));
        assert!(!state.has_pending_seek());
        assert_eq!(state.take_pending_seek(), None);
    }

    #[test]
    fn test_non_finite_seek_is_ignored() {
        let state = TransportState::new();
        state.seek_to(f64::NAN);
        state.seek_to(f64::INFINITY);
        assert!(!state.has_pending_seek());
    }
}
