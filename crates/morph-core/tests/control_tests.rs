// Host-side tests for the control signal state machine and smoother.

use morph_core::*;
use smallvec::smallvec;

fn open_hand() -> HandLandmarks {
    let mut hand = [Landmark::default(); LANDMARKS_PER_HAND];
    for (f, &(tip, pip, mcp)) in FINGER_CHAINS.iter().enumerate() {
        let x = f as f32 * 0.05;
        hand[mcp] = Landmark::new(x, 0.0, 0.0);
        hand[pip] = Landmark::new(x, 0.1, 0.0);
        hand[tip] = Landmark::new(x, 0.2, 0.0);
    }
    hand
}

fn no_hands() -> DetectionOutcome {
    DetectionOutcome::Hands(Hands::new())
}

#[test]
fn smoother_approaches_constant_input_without_overshoot() {
    for alpha in [0.05_f32, 0.18, 0.5, 1.0] {
        let mut s = OpennessSmoother::new(SmootherConfig { alpha });
        let mut prev = s.value();
        for _ in 0..500 {
            let v = s.update(0.7);
            assert!(v >= prev - 1e-7, "alpha {alpha}: not monotone");
            assert!(v <= 0.7 + 1e-6, "alpha {alpha}: overshoot {v}");
            prev = v;
        }
        assert!((prev - 0.7).abs() < 1e-4);
    }
}

#[test]
fn smoother_decreases_monotonically_toward_lower_input() {
    let mut s = OpennessSmoother::new(SmootherConfig::default());
    for _ in 0..200 {
        s.update(1.0);
    }
    let mut prev = s.value();
    for _ in 0..200 {
        let v = s.update(0.2);
        assert!(v <= prev + 1e-7);
        assert!(v >= 0.2 - 1e-6);
        prev = v;
    }
}

#[test]
fn smoother_applies_configured_alpha() {
    let mut s = OpennessSmoother::new(SmootherConfig::default());
    assert_eq!(s.alpha(), OPEN_SMOOTH_ALPHA);
    let v = s.update(1.0);
    assert!((v - 0.18).abs() < 1e-6);
    let v = s.update(1.0);
    assert!((v - (0.18 * 0.82 + 0.18)).abs() < 1e-6);
}

#[test]
fn no_hands_for_100_frames_converges_to_manual() {
    let mut c = ControlState::default();
    c.set_manual_value(0.5);
    for _ in 0..100 {
        c.update(&no_hands());
    }
    assert!((c.openness() - 0.5).abs() < 1e-3, "openness {}", c.openness());
    assert_eq!(c.phase(), TrackingPhase::NoHands);
    assert_eq!(c.hands_detected(), 0);
}

#[test]
fn every_fallback_phase_uses_the_manual_value() {
    let outcomes = [
        (DetectionOutcome::Unavailable, TrackingPhase::NoModel),
        (DetectionOutcome::NoSource, TrackingPhase::WaitingForCamera),
        (
            DetectionOutcome::Failed(DetectError("boom".into())),
            TrackingPhase::DetectError,
        ),
        (no_hands(), TrackingPhase::NoHands),
    ];
    for (outcome, phase) in outcomes {
        let mut c = ControlState::default();
        c.set_manual_value(0.8);
        let v = c.update(&outcome);
        assert_eq!(c.phase(), phase);
        assert!((v - 0.8 * OPEN_SMOOTH_ALPHA).abs() < 1e-6);
        assert!(c.phase().manual_controls_visible());
    }
}

#[test]
fn detect_error_blends_previous_value_toward_manual() {
    let mut c = ControlState::default();
    c.set_manual_value(0.0);
    let hands: Hands = smallvec![open_hand()];
    for _ in 0..100 {
        c.update(&DetectionOutcome::Hands(hands.clone()));
    }
    let before = c.openness();
    assert!(before > 0.99);
    let after = c.update(&DetectionOutcome::Failed(DetectError("lost context".into())));
    assert!((after - before * (1.0 - OPEN_SMOOTH_ALPHA)).abs() < 1e-6);
    // next successful frame resumes tracking
    c.update(&DetectionOutcome::Hands(hands));
    assert_eq!(c.phase(), TrackingPhase::Tracking { hands: 1 });
}

#[test]
fn tracking_uses_estimator_and_hides_manual_controls() {
    let mut c = ControlState::default();
    c.set_manual_value(0.0);
    let hands: Hands = smallvec![open_hand(), open_hand()];
    for _ in 0..100 {
        c.update(&DetectionOutcome::Hands(hands.clone()));
    }
    assert!((c.openness() - 1.0).abs() < 1e-3);
    assert_eq!(c.hands_detected(), 2);
    assert_eq!(c.phase(), TrackingPhase::Tracking { hands: 2 });
    assert!(!c.phase().manual_controls_visible());
}

#[test]
fn manual_value_is_clamped() {
    let mut c = ControlState::default();
    c.set_manual_value(1.7);
    assert_eq!(c.manual_value(), 1.0);
    c.set_manual_value(-0.3);
    assert_eq!(c.manual_value(), 0.0);
    c.set_manual_value(f32::NAN);
    assert_eq!(c.manual_value(), 0.0);
}

#[test]
fn status_text_reflects_phase() {
    let mut c = ControlState::default();
    assert_eq!(c.status_text(), "Loading hand model...");
    c.set_manual_value(0.42);

    c.update(&DetectionOutcome::Unavailable);
    assert_eq!(c.status_text(), "Manual mode (no model). Spread: 42%");
    c.update(&DetectionOutcome::NoSource);
    assert_eq!(c.status_text(), "Waiting for camera... Manual: 42%");
    c.update(&DetectionOutcome::Failed(DetectError("x".into())));
    assert_eq!(c.status_text(), "Detect error. Manual: 42%");
    c.update(&no_hands());
    assert_eq!(c.status_text(), "No hands. Manual: 42%");

    let hands: Hands = smallvec![open_hand()];
    c.update(&DetectionOutcome::Hands(hands));
    assert!(c.status_text().starts_with("Hands: 1  Open: "));
}
