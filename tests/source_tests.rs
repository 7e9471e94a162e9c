use approx::assert_relative_eq;
use std::sync::Arc;
use std::thread;
use transportsync::{global_transport, TransportConfig, TransportSlot, TransportState, TransportSync};

fn state_at(tempo: f64, beat_time: f64) -> Arc<TransportState> {
    let config = TransportConfig {
        tempo,
        beat_time,
        ..TransportConfig::default()
    };
    Arc::new(TransportState::from_config(&config).unwrap())
}

fn slots() -> (Arc<TransportSlot>, Arc<TransportSlot>) {
    (
        Arc::new(TransportSlot::empty()),
        Arc::new(TransportSlot::empty()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_instance_follows_global() {
        let (instance, global) = slots();
        let shared = state_at(120.0, 2.0);
        global.set(Some(shared.clone()));
        let mut sync = TransportSync::with_sources(instance, global);

        assert_eq!(sync.process(0.0).beat_time, 2.0);
        let snapshot = sync.process(500.0);
        assert_eq!(snapshot.tempo, 120.0);
        assert_relative_eq!(snapshot.beat_time, 3.0, epsilon = 1e-12);
        assert_eq!(shared.beat_time(), snapshot.beat_time);
    }

    #[test]
    fn test_instance_takes_precedence_over_global() {
        let (instance, global) = slots();
        let shared = state_at(120.0, 0.0);
        let own = state_at(60.0, 16.0);
        global.set(Some(shared.clone()));
        let mut sync = TransportSync::with_sources(instance.clone(), global);

        sync.process(0.0);
        instance.set(Some(own.clone()));
        let snapshot = sync.process(500.0);

        assert_eq!(snapshot.tempo, 60.0);
        assert_relative_eq!(snapshot.beat_time, 16.5, epsilon = 1e-12);
        assert_eq!(own.beat_time(), snapshot.beat_time);
        // The global state is left where the last pass put it
        assert_eq!(shared.beat_time(), 0.0);
    }

    #[test]
    fn test_swap_resumes_each_state_from_its_own_position() {
        let (instance, global) = slots();
        let first = state_at(120.0, 0.0);
        let second = state_at(60.0, 8.0);
        instance.set(Some(first.clone()));
        let mut sync = TransportSync::with_sources(instance.clone(), global);

        sync.process(0.0);
        assert_relative_eq!(sync.process(500.0).beat_time, 1.0, epsilon = 1e-12);

        instance.set(Some(second.clone()));
        assert_relative_eq!(sync.process(1000.0).beat_time, 8.5, epsilon = 1e-12);
        assert_eq!(first.beat_time(), 1.0);

        instance.set(Some(first.clone()));
        assert_relative_eq!(sync.process(1500.0).beat_time, 2.0, epsilon = 1e-12);
        assert_relative_eq!(second.beat_time(), 8.5, epsilon = 1e-12);
    }

    #[test]
    fn test_detaching_instance_falls_back_to_global() {
        let (instance, global) = slots();
        let own = state_at(120.0, 0.0);
        let shared = state_at(120.0, 32.0);
        instance.set(Some(own));
        global.set(Some(shared));
        let mut sync = TransportSync::with_sources(instance.clone(), global);

        assert_eq!(sync.process(0.0).beat_time, 0.0);
        instance.set(None);
        assert_relative_eq!(sync.process(500.0).beat_time, 33.0, epsilon = 1e-12);
    }

    #[test]
    fn test_switch_reports_changed_fields() {
        let (instance, global) = slots();
        let first = state_at(120.0, 0.0);
        let second = state_at(90.0, 0.0);
        second.set_time_signature(7, 8).unwrap();
        instance.set(Some(first));
        let mut sync = TransportSync::with_sources(instance.clone(), global);

        sync.process_with_changes(0.0);
        instance.set(Some(second));
        let (snapshot, changes) = sync.process_with_changes(10.0);

        assert_eq!(snapshot.time_signature(), (7, 8));
        assert!(changes.tempo_changed);
        assert_eq!(changes.tempo, 90.0);
        assert!(changes.time_signature_changed);
        assert!(!changes.running_changed);
    }

    #[test]
    fn test_pending_seek_on_new_state_wins() {
        let (instance, global) = slots();
        let first = state_at(120.0, 0.0);
        let second = state_at(120.0, 40.0);
        second.seek_to(4.0);
        instance.set(Some(first));
        let mut sync = TransportSync::with_sources(instance.clone(), global);

        sync.process(0.0);
        instance.set(Some(second.clone()));
        assert_eq!(sync.process(500.0).beat_time, 4.0);
        assert!(!second.has_pending_seek());
    }

    #[test]
    fn test_no_source_holds_until_attached() {
        let (instance, global) = slots();
        let mut sync = TransportSync::with_sources(instance.clone(), global);

        let idle = sync.process(0.0);
        assert_eq!(sync.process(250.0), idle);
        assert!(sync.resolve().is_none());

        let state = state_at(120.0, 12.0);
        instance.set(Some(state.clone()));
        // Advances by the time since the last pass, idle or not
        assert_relative_eq!(sync.process(500.0).beat_time, 12.5, epsilon = 1e-12);
        assert_eq!(state.beat_time(), sync.current().beat_time);
    }

    #[test]
    fn test_swaps_from_control_thread_during_passes() {
        let (instance, global) = slots();
        let first = state_at(120.0, 0.0);
        let second = state_at(60.0, 0.0);
        instance.set(Some(first.clone()));
        let mut sync = TransportSync::with_sources(instance.clone(), global);

        let control = {
            let instance = instance.clone();
            let first = first.clone();
            let second = second.clone();
            thread::spawn(move || {
                for i in 0..1_000 {
                    let next = if i % 2 == 0 { &second } else { &first };
                    instance.set(Some(next.clone()));
                }
            })
        };

        for block in 0..10_000 {
            let snapshot = sync.process(f64::from(block) * 10.0);
            assert!(snapshot.tempo == 120.0 || snapshot.tempo == 60.0);
            assert!(snapshot.beat_time.is_finite());
        }
        control.join().unwrap();

        instance.set(Some(first));
        assert_eq!(sync.process(100_000.0).tempo, 120.0);
    }

    // The only test in this binary that touches the process-wide slot.
    #[test]
    fn test_default_fallback_is_process_global() {
        let own = state_at(120.0, 0.0);
        let shared = state_at(60.0, 64.0);
        let mut sync = TransportSync::new(own);
        assert!(Arc::ptr_eq(sync.global_slot(), &global_transport()));

        global_transport().set(Some(shared.clone()));
        sync.process(0.0);
        sync.instance_slot().set(None);
        let snapshot = sync.process(500.0);
        global_transport().set(None);

        assert_eq!(snapshot.tempo, 60.0);
        assert_relative_eq!(snapshot.beat_time, 64.5, epsilon = 1e-12);
    }
}
