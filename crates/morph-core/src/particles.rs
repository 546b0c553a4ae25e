//! Particle set and the per-frame morph toward shape targets.

use crate::constants::{
    BASE_SCALE, INITIAL_JITTER, INITIAL_SHAPE_RADIUS, MIN_GROUP_SCALE, MORPH_SPEED,
    ROTATION_STEP, SCALE_MIN, SCALE_SPAN,
};
use crate::shapes::{fill_targets, random_unit_vector, ShapeKind};
use glam::Vec3;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MorphParams {
    /// Fraction of the remaining distance covered per frame, in (0, 1].
    pub morph_speed: f32,
    pub base_scale: f32,
    pub scale_min: f32,
    pub scale_span: f32,
    /// Radians about Y added to the group each frame.
    pub rotation_step: f32,
}

impl Default for MorphParams {
    fn default() -> Self {
        Self {
            morph_speed: MORPH_SPEED,
            base_scale: BASE_SCALE,
            scale_min: SCALE_MIN,
            scale_span: SCALE_SPAN,
            rotation_step: ROTATION_STEP,
        }
    }
}

/// Per-frame spread parameters derived from openness and the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpreadParams {
    /// Visual scale factor `s`, roughly 0.9..1.7.
    pub scale_factor: f32,
    /// Extra radial distance needed to reach the viewport edge.
    pub needed_spread: f32,
    /// Displacement applied along each noise direction this frame.
    pub spread: f32,
}

impl MorphParams {
    pub fn spread_params(&self, openness: f32, viewport_half: f32, shape_radius: f32) -> SpreadParams {
        let scale_factor = self.scale_min + openness * self.scale_span;
        let group_scale = (self.base_scale * scale_factor).max(MIN_GROUP_SCALE);
        let needed_spread = (viewport_half / group_scale - shape_radius).max(0.0);
        let spread = (openness * needed_spread).max(0.0);
        SpreadParams {
            scale_factor,
            needed_spread,
            spread,
        }
    }
}

/// Transform the renderer applies to the whole particle group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupTransform {
    pub scale: f32,
    pub rotation_y: f32,
}

impl Default for GroupTransform {
    fn default() -> Self {
        Self {
            scale: BASE_SCALE * SCALE_MIN,
            rotation_y: 0.0,
        }
    }
}

pub struct ParticleSet {
    pub positions: Vec<Vec3>,
    pub targets: Vec<Vec3>,
    pub noise_dirs: Vec<Vec3>,
    shape: ShapeKind,
    shape_radius: f32,
}

impl ParticleSet {
    /// Allocate `count` particles clustered near the origin with fixed random
    /// noise directions. Targets stay at the origin until a shape is set.
    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut noise_dirs = Vec::with_capacity(count);
        for _ in 0..count {
            positions.push(Vec3::new(
                (rng.gen::<f32>() - 0.5) * INITIAL_JITTER,
                (rng.gen::<f32>() - 0.5) * INITIAL_JITTER,
                (rng.gen::<f32>() - 0.5) * INITIAL_JITTER,
            ));
            noise_dirs.push(random_unit_vector(rng));
        }
        Self {
            positions,
            targets: vec![Vec3::ZERO; count],
            noise_dirs,
            shape: ShapeKind::default(),
            shape_radius: INITIAL_SHAPE_RADIUS,
        }
    }

    /// Like [`ParticleSet::new`], then fill `shape` and start every particle on
    /// its target so the shape is visible on the first frame.
    pub fn with_shape<R: Rng + ?Sized>(count: usize, shape: ShapeKind, rng: &mut R) -> Self {
        let mut set = Self::new(count, rng);
        set.set_shape(shape, rng);
        set.positions.copy_from_slice(&set.targets);
        set
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    #[inline]
    pub fn shape_radius(&self) -> f32 {
        self.shape_radius
    }

    /// Resample targets for `shape`. Positions are untouched and keep easing
    /// from where they are.
    pub fn set_shape<R: Rng + ?Sized>(&mut self, shape: ShapeKind, rng: &mut R) {
        self.shape_radius = fill_targets(shape, &mut self.targets, rng);
        self.shape = shape;
        log::info!("[shape] {} radius={:.3}", shape, self.shape_radius);
    }

    /// Ease every position toward `target + noise_dir * spread`.
    pub fn step_toward(&mut self, spread: f32, morph_speed: f32) {
        for ((pos, target), dir) in self
            .positions
            .iter_mut()
            .zip(&self.targets)
            .zip(&self.noise_dirs)
        {
            let desired = *target + *dir * spread;
            *pos += (desired - *pos) * morph_speed;
        }
    }

    /// Positions as a flat `x, y, z` float slice for GPU upload.
    pub fn position_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }
}

/// Drives a [`ParticleSet`] once per rendered frame.
#[derive(Clone, Debug, Default)]
pub struct ParticleAnimator {
    pub params: MorphParams,
    rotation_y: f32,
}

impl ParticleAnimator {
    pub fn new(params: MorphParams) -> Self {
        Self {
            params,
            rotation_y: 0.0,
        }
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    pub fn step(&mut self, particles: &mut ParticleSet, openness: f32, viewport_half: f32) -> GroupTransform {
        let sp = self
            .params
            .spread_params(openness, viewport_half, particles.shape_radius());
        particles.step_toward(sp.spread, self.params.morph_speed);
        self.rotation_y = (self.rotation_y + self.params.rotation_step) % std::f32::consts::TAU;
        GroupTransform {
            scale: self.params.base_scale * sp.scale_factor,
            rotation_y: self.rotation_y,
        }
    }
}
