//! Clock arithmetic shared by the sync pass and the host glue.

/// Host tick resolution: ticks per quarter note.
pub const TICKS_PER_BEAT: f64 = 480.0;

/// Beats advanced per millisecond at one BPM, i.e. `1 / 60_000`, expressed
/// through the host's tick-duration convention.
pub const BEATS_PER_MS_UNIT: f64 = 0.008 / TICKS_PER_BEAT;

/// Beats covered by `elapsed_ms` at `tempo` BPM. Negative elapsed time
/// (a host clock that jumped backwards) advances nothing.
#[inline]
pub fn beats_elapsed(elapsed_ms: f64, tempo: f64) -> f64 {
    elapsed_ms.max(0.0) * tempo * BEATS_PER_MS_UNIT
}

/// Millisecond timestamp of a block starting at DSP sample `dsp_tick`.
#[inline]
pub fn block_time_ms(dsp_tick: u64, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        return 0.0;
    }
    1000.0 * (dsp_tick as f64 / f64::from(sample_rate))
}

/// One-based `(bar, beat)` of `beat_time` under the given signature.
///
/// `beat_time` counts quarter notes while the returned beat counts
/// denominator units, so 6/8 has six beats per bar of three quarters.
/// Positions past `u64::MAX` units pin to the last representable bar.
pub fn bar_position(beat_time: f64, numerator: u16, denominator: u16) -> (u64, u16) {
    if numerator == 0 || denominator == 0 {
        return (1, 1);
    }
    let unit = 4.0 / f64::from(denominator);
    let units = (beat_time.max(0.0) / unit).floor() as u64;
    let per_bar = u64::from(numerator);
    ((units / per_bar).saturating_add(1), (units % per_bar) as u16 + 1)
}
