use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Bars shown by the phrase indicator before it wraps.
pub const BARS_PER_PHRASE: u64 = 4;

pub fn create_beat_progress(multi_progress: &MultiProgress, beats_per_bar: u16) -> ProgressBar {
    let pb = multi_progress.add(ProgressBar::new(u64::from(beats_per_bar)));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{prefix:.bold} [{bar:40.cyan}] {pos}/{len}")
            .unwrap()
            .progress_chars("⣀⣤⣦⣶⣷⣿ "),
    );
    pb.set_prefix("Beat");
    pb
}

pub fn create_bar_progress(multi_progress: &MultiProgress) -> ProgressBar {
    let pb = multi_progress.add(ProgressBar::new(BARS_PER_PHRASE));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{prefix:.bold} [{bar:20.white/black}] {pos}/{len}")
            .unwrap()
            .progress_chars("█▊ "),
    );
    pb.set_prefix("Bar");
    pb
}

pub fn create_transport_spinner(multi_progress: &MultiProgress) -> ProgressBar {
    let pb = multi_progress.add(ProgressBar::new_spinner());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.dim} {spinner} {wide_msg}")
            .unwrap(),
    );
    pb.set_prefix("Transport");
    pb
}
