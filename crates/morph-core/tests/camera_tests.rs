// Host-side tests for camera retry, stream ownership and device selection.

use morph_core::camera::*;
use morph_core::{AppState, ShapeKind, CAMERA_RETRY_BASE_MS, MAX_CAMERA_RETRIES};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug)]
struct FakeStream {
    id: u32,
    log: Rc<RefCell<Vec<String>>>,
}

impl StopTracks for FakeStream {
    fn stop_tracks(&self) {
        self.log.borrow_mut().push(format!("stop {}", self.id));
    }
}

#[test]
fn retry_delays_grow_linearly_and_stop_at_budget() {
    let mut policy = RetryPolicy::default();
    assert_eq!(policy.max_retries, MAX_CAMERA_RETRIES);
    let base = CAMERA_RETRY_BASE_MS as u64;
    assert_eq!(policy.on_failure(), Some(Duration::from_millis(base)));
    assert_eq!(policy.on_failure(), Some(Duration::from_millis(base * 2)));
    assert_eq!(policy.on_failure(), Some(Duration::from_millis(base * 3)));
    assert_eq!(policy.on_failure(), None);
    assert_eq!(policy.on_failure(), None);
    assert_eq!(policy.attempts(), 3);
}

#[test]
fn retry_reset_restores_full_budget() {
    let mut policy = RetryPolicy::new(2, Duration::from_millis(10));
    policy.on_failure();
    policy.on_failure();
    assert_eq!(policy.on_failure(), None);
    policy.reset();
    assert_eq!(policy.attempts(), 0);
    assert_eq!(policy.on_failure(), Some(Duration::from_millis(10)));
}

#[test]
fn zero_retry_budget_never_schedules() {
    let mut policy = RetryPolicy::new(0, Duration::from_millis(10));
    assert_eq!(policy.on_failure(), None);
}

#[test]
fn stream_slot_stops_previous_before_attaching() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut slot = StreamSlot::default();
    assert!(!slot.is_active());

    slot.attach(FakeStream {
        id: 1,
        log: log.clone(),
    });
    assert!(log.borrow().is_empty());
    assert!(slot.is_active());

    let attached = slot.attach(FakeStream {
        id: 2,
        log: log.clone(),
    });
    assert_eq!(attached.id, 2);
    assert_eq!(*log.borrow(), vec!["stop 1".to_string()]);

    slot.stop();
    assert!(!slot.is_active());
    assert_eq!(*log.borrow(), vec!["stop 1".to_string(), "stop 2".to_string()]);

    // stopping an empty slot is a no-op
    slot.stop();
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn cascade_starts_with_preferred_device() {
    let list = constraint_cascade(Some("cam-42"));
    assert_eq!(list.len(), 4);
    assert_eq!(list[0], VideoConstraints::ExactDevice("cam-42".into()));
    assert!(matches!(list[1], VideoConstraints::FacingUser { .. }));
    assert!(matches!(list[2], VideoConstraints::Ideal { .. }));
    assert_eq!(list[3], VideoConstraints::Any);
}

#[test]
fn cascade_without_device_skips_exact() {
    for pref in [None, Some("")] {
        let list = constraint_cascade(pref);
        assert_eq!(list.len(), 3);
        assert_eq!(
            list[0],
            VideoConstraints::FacingUser {
                ideal_width: 1280,
                ideal_height: 720
            }
        );
    }
}

#[test]
fn device_selection_prefers_current_then_previous_then_first() {
    let devices = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    assert_eq!(select_device(&devices, Some("b"), Some("c")), Some("b"));
    assert_eq!(select_device(&devices, Some("gone"), Some("c")), Some("c"));
    assert_eq!(select_device(&devices, None, None), Some("a"));
    assert_eq!(select_device(&devices, Some(""), Some("")), Some("a"));
    assert_eq!(select_device(&[], None, None), None);
}

#[test]
fn unlabeled_devices_get_numbered_names() {
    assert_eq!(device_label("", 0), "Camera 1");
    assert_eq!(device_label("", 2), "Camera 3");
    assert_eq!(device_label("FaceTime HD", 0), "FaceTime HD");
}

#[test]
fn active_device_prefers_track_then_request_then_previous() {
    assert_eq!(resolve_active_device(Some("track"), "asked", "old"), "track");
    assert_eq!(resolve_active_device(Some(""), "asked", "old"), "asked");
    assert_eq!(resolve_active_device(None, "asked", "old"), "asked");
    assert_eq!(resolve_active_device(None, "", "old"), "old");
    assert_eq!(resolve_active_device(None, "", ""), "");
}

#[test]
fn app_state_keeps_the_live_device() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut app = AppState::new(64, ShapeKind::Heart, &mut rng);
    assert_eq!(app.active_device(), None);

    app.record_active_device(Some("cam-a"), "");
    assert_eq!(app.active_device(), Some("cam-a"));

    // a track without settings keeps what was requested
    app.record_active_device(None, "cam-b");
    assert_eq!(app.active_device(), Some("cam-b"));

    // nothing new to go on: the previous device stays
    app.record_active_device(None, "");
    assert_eq!(app.device_id, "cam-b");
}
