use indicatif::MultiProgress;
use indicatif::ProgressDrawTarget;
use std::sync::Arc;
use transportsync::ui::{
    create_bar_progress, create_beat_progress, create_transport_spinner, TransportInspector,
    BARS_PER_PHRASE,
};
use transportsync::{TransportEventQueue, TransportListener, TransportState, TransportSync};

#[test]
fn test_beat_progress_creation() {
    let multi = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
    let progress = create_beat_progress(&multi, 7);
    assert_eq!(progress.length().unwrap(), 7);
    assert_eq!(progress.position(), 0);
}

#[test]
fn test_bar_progress_creation() {
    let multi = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
    let progress = create_bar_progress(&multi);
    assert_eq!(progress.length().unwrap(), BARS_PER_PHRASE);
}

#[test]
fn test_transport_spinner_creation() {
    let multi = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
    let spinner = create_transport_spinner(&multi);
    assert!(spinner.length().is_none());
}

#[test]
fn test_inspector_follows_events() {
    let state = Arc::new(TransportState::new());
    let mut sync = TransportSync::new(state.clone());
    let queue = TransportEventQueue::new(64);
    let mut inspector = TransportInspector::hidden();

    state.set_tempo(120.0).unwrap();
    state.set_time_signature(3, 4).unwrap();
    state.seek_to(4.5);
    sync.process_and_publish(0.0, &queue);
    queue.poll(&mut inspector);
    inspector.refresh();

    assert!(inspector.running());
    assert_eq!(inspector.tempo(), 120.0);
    assert_eq!(inspector.time_signature(), (3, 4));
    assert_eq!(inspector.beat_time(), 4.5);
    assert_eq!(inspector.position(), (2, 2));
    assert_eq!(inspector.beat_progress().length(), Some(3));
    assert_eq!(inspector.beat_progress().position(), 2);
    assert_eq!(inspector.bar_progress().position(), 2);
}

#[test]
fn test_inspector_sees_stop() {
    let state = Arc::new(TransportState::new());
    let mut sync = TransportSync::new(state.clone());
    let queue = TransportEventQueue::new(64);
    let mut inspector = TransportInspector::hidden();

    sync.process_and_publish(0.0, &queue);
    state.set_running(false);
    sync.process_and_publish(20.0, &queue);
    queue.poll(&mut inspector);

    assert!(!inspector.running());
}

#[test]
fn test_inspector_refresh_at_far_position() {
    let mut inspector = TransportInspector::hidden();
    inspector.on_time_signature(1, 4, 0.0);
    inspector.on_beat_time(1e30, 0.0);
    inspector.refresh();

    assert_eq!(inspector.position(), (u64::MAX, 1));
    assert_eq!(inspector.beat_progress().position(), 1);
    assert_eq!(inspector.bar_progress().position(), (u64::MAX - 1) % BARS_PER_PHRASE + 1);
}
