//! Detection source adapter: frame source selection, detector options,
//! ordered model-load fallback and per-frame detection.

use crate::constants::{
    DETECTOR_MIN_CONFIDENCE, DETECTOR_NUM_HANDS, HAND_MODEL_URL, HAVE_CURRENT_DATA,
};
use crate::control::DetectionOutcome;
use crate::error::{DetectError, FallbackError};
use crate::openness::Hands;
use std::fmt::Display;
use std::future::Future;

/// Anything that can feed frames to the detector (a video element on web).
pub trait FrameSource {
    fn ready_state(&self) -> u16;
    fn frame_width(&self) -> u32;
    fn frame_height(&self) -> u32;

    fn is_ready(&self) -> bool {
        self.ready_state() >= HAVE_CURRENT_DATA && self.frame_width() > 0 && self.frame_height() > 0
    }
}

/// First ready source in preference order.
pub fn select_ready_source<'a, S: FrameSource + ?Sized>(candidates: &[&'a S]) -> Option<&'a S> {
    candidates.iter().copied().find(|s| s.is_ready())
}

pub trait LandmarkDetector {
    type Source: FrameSource + ?Sized;

    fn detect(&mut self, source: &Self::Source, timestamp_ms: f64) -> Result<Hands, DetectError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunningMode {
    Video,
}

impl RunningMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunningMode::Video => "VIDEO",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DetectorOptions {
    pub model_asset_path: String,
    pub running_mode: RunningMode,
    pub num_hands: u32,
    pub min_detection_confidence: f32,
    pub min_presence_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            model_asset_path: HAND_MODEL_URL.to_string(),
            running_mode: RunningMode::Video,
            num_hands: DETECTOR_NUM_HANDS,
            min_detection_confidence: DETECTOR_MIN_CONFIDENCE,
            min_presence_confidence: DETECTOR_MIN_CONFIDENCE,
            min_tracking_confidence: DETECTOR_MIN_CONFIDENCE,
        }
    }
}

/// Try each location in order and return the first successful load. Every
/// failure is logged; if all fail the last error is returned.
pub async fn load_with_fallback<L, T, E, F, Fut>(
    locations: &[L],
    mut load: F,
) -> Result<T, FallbackError<E>>
where
    L: Display,
    E: std::fmt::Debug,
    F: FnMut(&L) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut last = None;
    for loc in locations {
        log::info!("[hands] trying wasm from {}", loc);
        match load(loc).await {
            Ok(v) => return Ok(v),
            Err(e) => {
                log::error!("[hands] load failed at {}: {:?}", loc, e);
                last = Some(e);
            }
        }
    }
    match last {
        Some(last) => Err(FallbackError::Exhausted {
            attempts: locations.len(),
            last,
        }),
        None => Err(FallbackError::NoLocations),
    }
}

/// Detector timestamps must strictly increase even if the clock stalls.
#[derive(Clone, Debug, Default)]
pub struct MonotonicTimestamps {
    last: Option<f64>,
}

impl MonotonicTimestamps {
    const MIN_STEP_MS: f64 = 0.001;

    pub fn next(&mut self, now_ms: f64) -> f64 {
        let ts = match self.last {
            Some(prev) if now_ms <= prev => prev + Self::MIN_STEP_MS,
            _ => now_ms,
        };
        self.last = Some(ts);
        ts
    }
}

/// One frame of the adapter: no detector → `Unavailable`, no ready source →
/// `NoSource`, otherwise the detector's result.
pub fn detect_frame<D: LandmarkDetector>(
    detector: Option<&mut D>,
    candidates: &[&D::Source],
    timestamps: &mut MonotonicTimestamps,
    now_ms: f64,
) -> DetectionOutcome {
    let Some(detector) = detector else {
        return DetectionOutcome::Unavailable;
    };
    let Some(source) = select_ready_source(candidates) else {
        return DetectionOutcome::NoSource;
    };
    match detector.detect(source, timestamps.next(now_ms)) {
        Ok(hands) => DetectionOutcome::Hands(hands),
        Err(e) => DetectionOutcome::Failed(e),
    }
}
