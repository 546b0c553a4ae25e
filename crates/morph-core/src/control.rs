//! Control signal: picks the raw openness source for the current tracking
//! phase and smooths it into the value that drives the animation.

use crate::constants::OPEN_SMOOTH_ALPHA;
use crate::error::DetectError;
use crate::openness::{compute_openness, Hands};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmootherConfig {
    pub alpha: f32,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            alpha: OPEN_SMOOTH_ALPHA,
        }
    }
}

/// Exponential smoothing: `value = value * (1 - α) + raw * α`.
///
/// For α in (0, 1] and a constant raw input the value approaches raw
/// monotonically and never crosses it.
#[derive(Clone, Debug)]
pub struct OpennessSmoother {
    value: f32,
    alpha: f32,
}

impl OpennessSmoother {
    pub fn new(config: SmootherConfig) -> Self {
        Self {
            value: 0.0,
            alpha: config.alpha.clamp(f32::EPSILON, 1.0),
        }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn update(&mut self, raw: f32) -> f32 {
        self.value = self.value * (1.0 - self.alpha) + raw * self.alpha;
        self.value
    }
}

/// Result of one frame's trip through the detection source adapter.
#[derive(Clone, Debug)]
pub enum DetectionOutcome {
    /// No landmark detector has been loaded.
    Unavailable,
    /// Detector loaded but no frame source is ready yet.
    NoSource,
    /// The detector threw for this frame.
    Failed(DetectError),
    /// Detection succeeded; may be empty.
    Hands(Hands),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrackingPhase {
    #[default]
    Loading,
    NoModel,
    WaitingForCamera,
    DetectError,
    NoHands,
    Tracking {
        hands: usize,
    },
}

impl TrackingPhase {
    /// The manual slider is only hidden while a hand drives the signal.
    pub fn manual_controls_visible(&self) -> bool {
        !matches!(self, TrackingPhase::Tracking { .. })
    }
}

#[derive(Clone, Debug)]
pub struct ControlState {
    smoother: OpennessSmoother,
    manual_value: f32,
    hands_detected: usize,
    phase: TrackingPhase,
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new(SmootherConfig::default(), 0.0)
    }
}

impl ControlState {
    pub fn new(config: SmootherConfig, manual_value: f32) -> Self {
        Self {
            smoother: OpennessSmoother::new(config),
            manual_value: manual_value.clamp(0.0, 1.0),
            hands_detected: 0,
            phase: TrackingPhase::Loading,
        }
    }

    #[inline]
    pub fn openness(&self) -> f32 {
        self.smoother.value()
    }

    #[inline]
    pub fn manual_value(&self) -> f32 {
        self.manual_value
    }

    pub fn set_manual_value(&mut self, v: f32) {
        self.manual_value = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
    }

    #[inline]
    pub fn hands_detected(&self) -> usize {
        self.hands_detected
    }

    #[inline]
    pub fn phase(&self) -> TrackingPhase {
        self.phase
    }

    /// Advance one frame. Never fails: detection errors are logged and the
    /// signal falls back toward the manual value for this frame only.
    pub fn update(&mut self, outcome: &DetectionOutcome) -> f32 {
        let raw = match outcome {
            DetectionOutcome::Unavailable => {
                self.phase = TrackingPhase::NoModel;
                self.manual_value
            }
            DetectionOutcome::NoSource => {
                self.phase = TrackingPhase::WaitingForCamera;
                self.manual_value
            }
            DetectionOutcome::Failed(e) => {
                log::warn!("[hands] {}, falling back to manual", e);
                self.phase = TrackingPhase::DetectError;
                self.manual_value
            }
            DetectionOutcome::Hands(hands) => {
                self.hands_detected = hands.len();
                if hands.is_empty() {
                    self.phase = TrackingPhase::NoHands;
                    self.manual_value
                } else {
                    self.phase = TrackingPhase::Tracking { hands: hands.len() };
                    compute_openness(hands).normalized
                }
            }
        };
        self.smoother.update(raw)
    }

    /// Human-readable status for the UI.
    pub fn status_text(&self) -> String {
        StatusLine {
            phase: self.phase,
            manual: self.manual_value,
            openness: self.openness(),
        }
        .to_string()
    }
}

struct StatusLine {
    phase: TrackingPhase,
    manual: f32,
    openness: f32,
}

#[inline]
fn percent(v: f32) -> f32 {
    (v * 100.0).round()
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let manual = percent(self.manual);
        match self.phase {
            TrackingPhase::Loading => write!(f, "Loading hand model..."),
            TrackingPhase::NoModel => write!(f, "Manual mode (no model). Spread: {:.0}%", manual),
            TrackingPhase::WaitingForCamera => {
                write!(f, "Waiting for camera... Manual: {:.0}%", manual)
            }
            TrackingPhase::DetectError => write!(f, "Detect error. Manual: {:.0}%", manual),
            TrackingPhase::NoHands => write!(f, "No hands. Manual: {:.0}%", manual),
            TrackingPhase::Tracking { hands } => {
                write!(f, "Hands: {}  Open: {:.0}%", hands, percent(self.openness))
            }
        }
    }
}
