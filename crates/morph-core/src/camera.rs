//! Camera acquisition bookkeeping: bounded retry, single-stream ownership,
//! the constraint cascade and device-list selection.

use crate::constants::{
    CAMERA_RETRY_BASE_MS, IDEAL_CAPTURE_HEIGHT, IDEAL_CAPTURE_WIDTH, MAX_CAMERA_RETRIES,
};
use std::time::Duration;

/// Bounded automatic retry with linearly increasing delay.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            MAX_CAMERA_RETRIES,
            Duration::from_millis(CAMERA_RETRY_BASE_MS as u64),
        )
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            attempts: 0,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Delay before the next automatic retry, or `None` once the budget is
    /// spent. Consumes one attempt when a delay is returned.
    pub fn on_failure(&mut self) -> Option<Duration> {
        if self.attempts >= self.max_retries {
            return None;
        }
        let delay = self.base_delay * (self.attempts + 1);
        self.attempts += 1;
        Some(delay)
    }

    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}

/// A live media stream that can release its device.
pub trait StopTracks {
    fn stop_tracks(&self);
}

/// Holds at most one active stream. Attaching a new one always stops the old
/// one first.
#[derive(Debug)]
pub struct StreamSlot<S: StopTracks> {
    active: Option<S>,
}

impl<S: StopTracks> Default for StreamSlot<S> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<S: StopTracks> StreamSlot<S> {
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn stop(&mut self) {
        if let Some(old) = self.active.take() {
            old.stop_tracks();
        }
    }

    pub fn attach(&mut self, stream: S) -> &S {
        self.stop();
        self.active.insert(stream)
    }
}

/// One entry in the `getUserMedia` constraint cascade.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VideoConstraints {
    ExactDevice(String),
    FacingUser { ideal_width: u32, ideal_height: u32 },
    Ideal { ideal_width: u32, ideal_height: u32 },
    Any,
}

/// Constraint sets to try in order; the preferred device comes first.
pub fn constraint_cascade(preferred_device: Option<&str>) -> Vec<VideoConstraints> {
    let mut list = Vec::with_capacity(4);
    if let Some(id) = preferred_device.filter(|id| !id.is_empty()) {
        list.push(VideoConstraints::ExactDevice(id.to_string()));
    }
    list.push(VideoConstraints::FacingUser {
        ideal_width: IDEAL_CAPTURE_WIDTH,
        ideal_height: IDEAL_CAPTURE_HEIGHT,
    });
    list.push(VideoConstraints::Ideal {
        ideal_width: IDEAL_CAPTURE_WIDTH,
        ideal_height: IDEAL_CAPTURE_HEIGHT,
    });
    list.push(VideoConstraints::Any);
    list
}

/// Which device id the camera selector should show after repopulating.
pub fn select_device<'a>(
    devices: &'a [String],
    current: Option<&str>,
    previous: Option<&'a str>,
) -> Option<&'a str> {
    if let Some(cur) = current.filter(|c| !c.is_empty()) {
        if let Some(d) = devices.iter().find(|d| d.as_str() == cur) {
            return Some(d.as_str());
        }
    }
    previous
        .filter(|p| !p.is_empty())
        .or_else(|| devices.first().map(String::as_str))
}

/// Device id to remember once a stream is live: what the track reports, else
/// the requested device, else the one that was active before.
pub fn resolve_active_device(track_device: Option<&str>, preferred: &str, previous: &str) -> String {
    track_device
        .filter(|id| !id.is_empty())
        .or(Some(preferred).filter(|p| !p.is_empty()))
        .unwrap_or(previous)
        .to_string()
}

/// Fallback label for devices that do not expose one before permission.
pub fn device_label(label: &str, index: usize) -> String {
    if label.is_empty() {
        format!("Camera {}", index + 1)
    } else {
        label.to_string()
    }
}
