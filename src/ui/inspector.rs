use super::progress::{
    create_bar_progress, create_beat_progress, create_transport_spinner, BARS_PER_PHRASE,
};
use crate::state::{DEFAULT_TEMPO, DEFAULT_TIME_SIGNATURE};
use crate::transport::{bar_position, TransportListener};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};

/// Mirrors the transport from drained events and renders it.
pub struct TransportInspector {
    #[allow(dead_code)]
    multi_progress: MultiProgress,
    beat_pb: ProgressBar,
    bar_pb: ProgressBar,
    transport_pb: ProgressBar,

    running: bool,
    tempo: f64,
    beat_time: f64,
    time_signature: (u16, u16),
}

impl TransportInspector {
    pub fn new(draw_target: ProgressDrawTarget) -> Self {
        let multi_progress = MultiProgress::with_draw_target(draw_target);
        let (num, den) = DEFAULT_TIME_SIGNATURE;
        let beat_pb = create_beat_progress(&multi_progress, num);
        let bar_pb = create_bar_progress(&multi_progress);
        let transport_pb = create_transport_spinner(&multi_progress);

        TransportInspector {
            multi_progress,
            beat_pb,
            bar_pb,
            transport_pb,
            running: false,
            tempo: DEFAULT_TEMPO,
            beat_time: 0.0,
            time_signature: (num, den),
        }
    }

    pub fn stderr() -> Self {
        Self::new(ProgressDrawTarget::stderr())
    }

    pub fn hidden() -> Self {
        Self::new(ProgressDrawTarget::hidden())
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    pub fn beat_time(&self) -> f64 {
        self.beat_time
    }

    pub fn time_signature(&self) -> (u16, u16) {
        self.time_signature
    }

    /// One-based `(bar, beat)` of the last reported position.
    pub fn position(&self) -> (u64, u16) {
        let (num, den) = self.time_signature;
        bar_position(self.beat_time, num, den)
    }

    /// Redraws bars and the status line from the mirrored values.
    pub fn refresh(&self) {
        let (bar, beat) = self.position();
        self.beat_pb.set_length(u64::from(self.time_signature.0));
        self.beat_pb.set_position(u64::from(beat));
        self.bar_pb.set_position((bar - 1) % BARS_PER_PHRASE + 1);

        self.transport_pb.set_message(format!(
            "{} | {:.2} BPM | {}/{} | beat {:.3}",
            if self.running { "Running" } else { "Stopped" },
            self.tempo,
            self.time_signature.0,
            self.time_signature.1,
            self.beat_time
        ));
        self.transport_pb.tick();
    }

    pub fn beat_progress(&self) -> &ProgressBar {
        &self.beat_pb
    }

    pub fn bar_progress(&self) -> &ProgressBar {
        &self.bar_pb
    }
}

impl TransportListener for TransportInspector {
    fn on_running(&mut self, running: bool, _time: f64) {
        self.running = running;
    }

    fn on_tempo(&mut self, tempo: f64, _time: f64) {
        self.tempo = tempo;
    }

    fn on_beat_time(&mut self, beat_time: f64, _time: f64) {
        self.beat_time = beat_time;
    }

    fn on_time_signature(&mut self, numerator: u16, denominator: u16, _time: f64) {
        self.time_signature = (numerator, denominator);
    }
}
