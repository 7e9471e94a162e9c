use super::timing::bar_position;

/// Transport values frozen for the duration of one processing block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportSnapshot {
    pub running: bool,
    pub tempo: f64,
    pub beat_time: f64,
    pub time_sig_num: u16,
    pub time_sig_denom: u16,
}

impl TransportSnapshot {
    pub fn time_signature(&self) -> (u16, u16) {
        (self.time_sig_num, self.time_sig_denom)
    }

    /// One-based `(bar, beat)` at the start of the block.
    pub fn bar_position(&self) -> (u64, u16) {
        bar_position(self.beat_time, self.time_sig_num, self.time_sig_denom)
    }
}

/// Per-field difference between two consecutive snapshots. Each value is
/// the new one, meaningful only when its flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransportChangeSet {
    pub running_changed: bool,
    pub running: bool,
    pub tempo_changed: bool,
    pub tempo: f64,
    pub beat_time_changed: bool,
    pub beat_time: f64,
    pub time_signature_changed: bool,
    pub time_sig_num: u16,
    pub time_sig_denom: u16,
}

impl TransportChangeSet {
    /// Diffs `current` against `previous` with exact comparisons. Without a
    /// previous snapshot every field counts as changed.
    pub fn between(previous: Option<&TransportSnapshot>, current: &TransportSnapshot) -> Self {
        let changed = |differs: bool| previous.is_none() || differs;
        let prev = previous.copied().unwrap_or(*current);

        Self {
            running_changed: changed(prev.running != current.running),
            running: current.running,
            tempo_changed: changed(prev.tempo != current.tempo),
            tempo: current.tempo,
            beat_time_changed: changed(prev.beat_time != current.beat_time),
            beat_time: current.beat_time,
            time_signature_changed: changed(prev.time_signature() != current.time_signature()),
            time_sig_num: current.time_sig_num,
            time_sig_denom: current.time_sig_denom,
        }
    }

    /// A change-set with no flags raised, carrying `current`'s values.
    pub fn unchanged(current: &TransportSnapshot) -> Self {
        Self {
            running: current.running,
            tempo: current.tempo,
            beat_time: current.beat_time,
            time_sig_num: current.time_sig_num,
            time_sig_denom: current.time_sig_denom,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.running_changed
            || self.tempo_changed
            || self.beat_time_changed
            || self.time_signature_changed)
    }
}
