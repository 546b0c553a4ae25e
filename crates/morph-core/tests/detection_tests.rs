// Host-side tests for the detection source adapter using mock collaborators.

use morph_core::*;
use smallvec::smallvec;
use std::cell::RefCell;

#[derive(Clone, Copy, Debug)]
struct MockVideo {
    name: &'static str,
    ready_state: u16,
    width: u32,
    height: u32,
}

impl FrameSource for MockVideo {
    fn ready_state(&self) -> u16 {
        self.ready_state
    }
    fn frame_width(&self) -> u32 {
        self.width
    }
    fn frame_height(&self) -> u32 {
        self.height
    }
}

const PREVIEW_READY: MockVideo = MockVideo {
    name: "preview",
    ready_state: 4,
    width: 640,
    height: 480,
};
const CAPTURE_READY: MockVideo = MockVideo {
    name: "capture",
    ready_state: 2,
    width: 1280,
    height: 720,
};
const NOT_READY: MockVideo = MockVideo {
    name: "idle",
    ready_state: 1,
    width: 640,
    height: 480,
};
const ZERO_SIZED: MockVideo = MockVideo {
    name: "zero",
    ready_state: 4,
    width: 0,
    height: 480,
};

struct MockDetector {
    result: Result<usize, String>,
    seen: Vec<(&'static str, f64)>,
}

impl LandmarkDetector for MockDetector {
    type Source = MockVideo;

    fn detect(&mut self, source: &MockVideo, timestamp_ms: f64) -> Result<Hands, DetectError> {
        self.seen.push((source.name, timestamp_ms));
        match &self.result {
            Ok(n) => Ok((0..*n)
                .map(|_| [Landmark::default(); LANDMARKS_PER_HAND])
                .collect()),
            Err(e) => Err(DetectError(e.clone())),
        }
    }
}

#[test]
fn readiness_requires_state_and_dimensions() {
    assert!(PREVIEW_READY.is_ready());
    assert!(CAPTURE_READY.is_ready());
    assert!(!NOT_READY.is_ready());
    assert!(!ZERO_SIZED.is_ready());
}

#[test]
fn preview_is_preferred_over_capture() {
    let picked = select_ready_source(&[&PREVIEW_READY, &CAPTURE_READY]).map(|s| s.name);
    assert_eq!(picked, Some("preview"));
    let picked = select_ready_source(&[&NOT_READY, &CAPTURE_READY]).map(|s| s.name);
    assert_eq!(picked, Some("capture"));
    assert!(select_ready_source(&[&NOT_READY, &ZERO_SIZED]).is_none());
    assert!(select_ready_source::<MockVideo>(&[]).is_none());
}

#[test]
fn default_detector_options_match_streaming_setup() {
    let o = DetectorOptions::default();
    assert_eq!(o.running_mode, RunningMode::Video);
    assert_eq!(o.running_mode.as_str(), "VIDEO");
    assert_eq!(o.num_hands, 2);
    assert_eq!(o.min_detection_confidence, 0.4);
    assert_eq!(o.min_presence_confidence, 0.4);
    assert_eq!(o.min_tracking_confidence, 0.4);
    assert!(o.model_asset_path.ends_with("hand_landmarker.task"));
}

#[test]
fn detect_frame_without_detector_is_unavailable() {
    let mut ts = MonotonicTimestamps::default();
    let outcome = detect_frame::<MockDetector>(None, &[&PREVIEW_READY], &mut ts, 1.0);
    assert!(matches!(outcome, DetectionOutcome::Unavailable));
}

#[test]
fn detect_frame_without_ready_source_waits() {
    let mut det = MockDetector {
        result: Ok(1),
        seen: Vec::new(),
    };
    let mut ts = MonotonicTimestamps::default();
    let outcome = detect_frame(Some(&mut det), &[&NOT_READY, &ZERO_SIZED], &mut ts, 1.0);
    assert!(matches!(outcome, DetectionOutcome::NoSource));
    assert!(det.seen.is_empty());
}

#[test]
fn detect_frame_reports_hands_and_errors() {
    let mut det = MockDetector {
        result: Ok(2),
        seen: Vec::new(),
    };
    let mut ts = MonotonicTimestamps::default();
    let outcome = detect_frame(Some(&mut det), &[&NOT_READY, &CAPTURE_READY], &mut ts, 16.0);
    match outcome {
        DetectionOutcome::Hands(h) => assert_eq!(h.len(), 2),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(det.seen, vec![("capture", 16.0)]);

    det.result = Err("graph failed".into());
    let outcome = detect_frame(Some(&mut det), &[&PREVIEW_READY], &mut ts, 32.0);
    assert!(matches!(outcome, DetectionOutcome::Failed(DetectError(ref m)) if m == "graph failed"));
}

#[test]
fn timestamps_strictly_increase() {
    let mut ts = MonotonicTimestamps::default();
    let a = ts.next(100.0);
    let b = ts.next(100.0);
    let c = ts.next(50.0);
    let d = ts.next(200.0);
    assert_eq!(a, 100.0);
    assert!(b > a);
    assert!(c > b);
    assert_eq!(d, 200.0);
}

#[test]
fn fallback_first_success_wins() {
    let tried = RefCell::new(Vec::new());
    let result = pollster::block_on(load_with_fallback(&["a", "b", "c"], |loc| {
        tried.borrow_mut().push(loc.to_string());
        let loc = loc.to_string();
        async move {
            if loc == "b" {
                Ok(format!("model from {loc}"))
            } else {
                Err(format!("{loc} unreachable"))
            }
        }
    }));
    assert_eq!(result, Ok("model from b".to_string()));
    assert_eq!(*tried.borrow(), vec!["a", "b"]);
}

#[test]
fn fallback_surfaces_last_error() {
    let result: Result<(), _> = pollster::block_on(load_with_fallback(&["a", "b", "c"], |loc| {
        let loc = loc.to_string();
        async move { Err(format!("{loc} unreachable")) }
    }));
    let err = result.unwrap_err();
    assert_eq!(
        err,
        FallbackError::Exhausted {
            attempts: 3,
            last: "c unreachable".to_string()
        }
    );
    assert_eq!(err.into_last(), Some("c unreachable".to_string()));
}

#[test]
fn fallback_with_no_locations() {
    let locations: [&str; 0] = [];
    let result: Result<(), FallbackError<String>> =
        pollster::block_on(load_with_fallback(&locations, |_| async { Ok(()) }));
    assert_eq!(result, Err(FallbackError::NoLocations));
}

#[test]
fn wasm_locations_are_tried_pinned_first() {
    assert_eq!(VISION_WASM_LOCATIONS.len(), 3);
    assert!(VISION_WASM_LOCATIONS[2].contains("@latest"));
}

#[test]
fn full_pipeline_tracks_through_adapter() {
    let mut det = MockDetector {
        result: Ok(1),
        seen: Vec::new(),
    };
    let mut ts = MonotonicTimestamps::default();
    let mut control = ControlState::default();
    control.set_manual_value(0.3);
    // collapsed landmarks read as a closed hand
    for frame in 0..100 {
        let outcome = detect_frame(Some(&mut det), &[&PREVIEW_READY], &mut ts, frame as f64);
        control.update(&outcome);
    }
    assert_eq!(control.phase(), TrackingPhase::Tracking { hands: 1 });
    assert!(control.openness() < 1e-6);

    let hands: Hands = smallvec![[Landmark::default(); LANDMARKS_PER_HAND]];
    assert_eq!(compute_openness(&hands).normalized, 0.0);
}
