//! Hand openness from skeletal landmarks.
//!
//! Each finger contributes the ratio of its distal segment (tip→pip) to its
//! proximal segment (pip→mcp). A curled finger foreshortens the distal segment,
//! an extended one keeps it close to the proximal length. Using a ratio of
//! adjacent bones keeps the measure independent of hand size and distance to
//! the camera.

use crate::constants::BONE_LEN_EPSILON;
use glam::Vec3;
use smallvec::SmallVec;

pub const LANDMARKS_PER_HAND: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// (tip, pip, mcp) per finger. The thumb uses tip/ip/mcp as its analogous chain.
pub const FINGER_CHAINS: [(usize, usize, usize); 5] = [
    (INDEX_TIP, INDEX_PIP, INDEX_MCP),
    (MIDDLE_TIP, MIDDLE_PIP, MIDDLE_MCP),
    (RING_TIP, RING_PIP, RING_MCP),
    (PINKY_TIP, PINKY_PIP, PINKY_MCP),
    (THUMB_TIP, THUMB_IP, THUMB_MCP),
];

/// One detected landmark in normalized image space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn distance(self, other: Landmark) -> f32 {
        self.to_vec3().distance(other.to_vec3())
    }
}

pub type HandLandmarks = [Landmark; LANDMARKS_PER_HAND];

/// Detected hands for one frame. The detector is configured for at most two.
pub type Hands = SmallVec<[HandLandmarks; 2]>;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Openness {
    /// Average clamped to \[0, 1\]; this drives the control signal.
    pub normalized: f32,
    /// Raw average of the per-finger ratios.
    pub average: f32,
}

/// Clamped distal/proximal ratio for one finger chain.
#[inline]
pub fn finger_ratio(hand: &HandLandmarks, (tip, pip, mcp): (usize, usize, usize)) -> f32 {
    let tip_len = hand[tip].distance(hand[pip]);
    let base_len = hand[pip].distance(hand[mcp]).max(BONE_LEN_EPSILON);
    (tip_len / base_len).clamp(0.0, 1.0)
}

/// Openness of the first hand only; additional hands are ignored.
pub fn compute_openness(hands: &[HandLandmarks]) -> Openness {
    let Some(hand) = hands.first() else {
        return Openness::default();
    };
    let sum: f32 = FINGER_CHAINS.iter().map(|&c| finger_ratio(hand, c)).sum();
    let average = sum / FINGER_CHAINS.len() as f32;
    Openness {
        normalized: average.clamp(0.0, 1.0),
        average,
    }
}
