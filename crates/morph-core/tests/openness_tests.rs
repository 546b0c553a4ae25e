// Host-side tests for hand openness estimation.

use morph_core::*;
use smallvec::smallvec;

/// Straight fingers: every distal segment as long as its proximal one.
fn open_hand(scale: f32) -> HandLandmarks {
    let mut hand = [Landmark::default(); LANDMARKS_PER_HAND];
    for (f, &(tip, pip, mcp)) in FINGER_CHAINS.iter().enumerate() {
        let x = f as f32 * 0.05;
        hand[mcp] = Landmark::new(x * scale, 0.0, 0.0);
        hand[pip] = Landmark::new(x * scale, 0.1 * scale, 0.0);
        hand[tip] = Landmark::new(x * scale, 0.2 * scale, 0.0);
    }
    hand
}

/// Curled fingers: tips folded back onto the pip joint.
fn fist() -> HandLandmarks {
    let mut hand = open_hand(1.0);
    for &(tip, pip, _) in FINGER_CHAINS.iter() {
        hand[tip] = hand[pip];
    }
    hand
}

#[test]
fn no_hands_is_closed() {
    assert_eq!(compute_openness(&[]), Openness::default());
    assert_eq!(compute_openness(&[]).normalized, 0.0);
}

#[test]
fn open_hand_is_fully_open() {
    let o = compute_openness(&[open_hand(1.0)]);
    assert!((o.normalized - 1.0).abs() < 1e-5);
    assert!((o.average - 1.0).abs() < 1e-5);
}

#[test]
fn fist_is_closed() {
    let o = compute_openness(&[fist()]);
    assert!(o.normalized.abs() < 1e-6);
}

#[test]
fn openness_is_scale_independent() {
    let near = compute_openness(&[open_hand(3.0)]);
    let far = compute_openness(&[open_hand(0.2)]);
    assert!((near.normalized - far.normalized).abs() < 1e-4);
}

#[test]
fn half_curled_finger_contributes_its_ratio() {
    let mut hand = open_hand(1.0);
    // index distal segment halved -> ratio 0.5, others stay 1.0
    hand[INDEX_TIP] = Landmark::new(hand[INDEX_PIP].x, 0.15, 0.0);
    let o = compute_openness(&[hand]);
    assert!((o.average - 0.9).abs() < 1e-5, "avg {}", o.average);
}

#[test]
fn long_tip_segment_is_clamped_to_one() {
    let mut hand = open_hand(1.0);
    hand[MIDDLE_TIP] = Landmark::new(hand[MIDDLE_PIP].x, 5.0, 0.0);
    assert_eq!(finger_ratio(&hand, FINGER_CHAINS[1]), 1.0);
    let o = compute_openness(&[hand]);
    assert!(o.normalized <= 1.0);
}

#[test]
fn degenerate_pip_equal_mcp_never_divides_by_zero() {
    let mut hand = open_hand(1.0);
    for &(_, pip, mcp) in FINGER_CHAINS.iter() {
        hand[pip] = hand[mcp];
    }
    let o = compute_openness(&[hand]);
    assert!(o.normalized.is_finite());
    assert!((0.0..=1.0).contains(&o.normalized));

    let collapsed = [Landmark::default(); LANDMARKS_PER_HAND];
    let o = compute_openness(&[collapsed]);
    assert_eq!(o.normalized, 0.0);
}

#[test]
fn only_first_hand_is_used() {
    let hands: Hands = smallvec![fist(), open_hand(1.0)];
    let o = compute_openness(&hands);
    assert!(o.normalized.abs() < 1e-6);
}

#[test]
fn depth_counts_toward_segment_length() {
    let mut hand = fist();
    // push the index tip away in z only
    let pip = hand[INDEX_PIP];
    hand[INDEX_TIP] = Landmark::new(pip.x, pip.y, 0.1);
    assert!((finger_ratio(&hand, FINGER_CHAINS[0]) - 1.0).abs() < 1e-5);
}
