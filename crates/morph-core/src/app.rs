//! Application state threaded through the per-frame update.
//!
//! Everything the frame loop mutates lives here rather than in globals, so the
//! whole detection → openness → smoothing → morph pipeline can be driven from
//! tests without a display or camera.

use crate::camera::resolve_active_device;
use crate::color::parse_hex_color;
use crate::constants::{DEFAULT_COLOR_HEX, PARTICLE_COUNT};
use crate::control::{ControlState, DetectionOutcome, SmootherConfig};
use crate::error::{ColorParseError, ParseShapeError};
use crate::particles::{GroupTransform, MorphParams, ParticleAnimator, ParticleSet};
use crate::shapes::ShapeKind;
use crate::state::Camera;
use rand::Rng;

/// Depth of the particle group in world space.
pub const GROUP_Z: f32 = 0.0;

pub struct AppState {
    pub particles: ParticleSet,
    pub animator: ParticleAnimator,
    pub control: ControlState,
    pub camera: Camera,
    pub color: [f32; 3],
    pub viewport_half: f32,
    /// Camera device the live stream runs on; empty until one starts.
    pub device_id: String,
    pub transform: GroupTransform,
}

impl AppState {
    pub fn new<R: Rng + ?Sized>(count: usize, shape: ShapeKind, rng: &mut R) -> Self {
        let camera = Camera::default();
        let viewport_half = camera.viewport_half(GROUP_Z);
        Self {
            particles: ParticleSet::with_shape(count, shape, rng),
            animator: ParticleAnimator::new(MorphParams::default()),
            control: ControlState::new(SmootherConfig::default(), 0.0),
            camera,
            color: parse_hex_color(DEFAULT_COLOR_HEX).unwrap_or([1.0, 0.0, 1.0 / 3.0]),
            viewport_half,
            device_id: String::new(),
            transform: GroupTransform::default(),
        }
    }

    pub fn with_defaults<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(PARTICLE_COUNT, ShapeKind::default(), rng)
    }

    #[inline]
    pub fn shape(&self) -> ShapeKind {
        self.particles.shape()
    }

    pub fn set_shape<R: Rng + ?Sized>(&mut self, shape: ShapeKind, rng: &mut R) {
        self.particles.set_shape(shape, rng);
    }

    pub fn set_shape_by_name<R: Rng + ?Sized>(
        &mut self,
        name: &str,
        rng: &mut R,
    ) -> Result<ShapeKind, ParseShapeError> {
        let shape: ShapeKind = name.parse()?;
        self.set_shape(shape, rng);
        Ok(shape)
    }

    pub fn set_color_hex(&mut self, hex: &str) -> Result<(), ColorParseError> {
        self.color = parse_hex_color(hex)?;
        Ok(())
    }

    /// Device to request when restarting: the active one, if any.
    pub fn active_device(&self) -> Option<&str> {
        Some(self.device_id.as_str()).filter(|id| !id.is_empty())
    }

    pub fn record_active_device(&mut self, track_device: Option<&str>, preferred: &str) {
        self.device_id = resolve_active_device(track_device, preferred, &self.device_id);
    }

    /// Recompute camera aspect and the frustum half-extent for a new surface size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport_size(width, height);
        self.viewport_half = self.camera.viewport_half(GROUP_Z);
    }

    /// Run one frame of the control pipeline and the morph. Never fails.
    pub fn frame(&mut self, outcome: &DetectionOutcome) -> GroupTransform {
        let openness = self.control.update(outcome);
        self.transform = self
            .animator
            .step(&mut self.particles, openness, self.viewport_half);
        self.transform
    }
}
