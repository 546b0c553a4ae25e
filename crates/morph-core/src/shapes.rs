//! Parametric target shapes.
//!
//! Each sampler fills a buffer of target points with independent uniform
//! randomness per point. Every shape lands in a roughly unit-scale box so the
//! group scale applied by the animator does not depend on the shape.

use crate::constants::{FIREWORK_BURSTS, FLOWER_PETALS};
use crate::error::ParseShapeError;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ShapeKind {
    #[default]
    Heart,
    Flower,
    Saturn,
    Fireworks,
    Buddha,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Heart,
        ShapeKind::Flower,
        ShapeKind::Saturn,
        ShapeKind::Fireworks,
        ShapeKind::Buddha,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Heart => "heart",
            ShapeKind::Flower => "flower",
            ShapeKind::Saturn => "saturn",
            ShapeKind::Fireworks => "fireworks",
            ShapeKind::Buddha => "buddha",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = ParseShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseShapeError(s.to_string()))
    }
}

/// Overwrite every point of `targets` with a fresh sample of `shape` and return
/// the new shape radius.
pub fn fill_targets<R: Rng + ?Sized>(shape: ShapeKind, targets: &mut [Vec3], rng: &mut R) -> f32 {
    match shape {
        ShapeKind::Heart => sample_heart(targets, rng),
        ShapeKind::Flower => sample_flower(targets, FLOWER_PETALS, rng),
        ShapeKind::Saturn => sample_saturn(targets, rng),
        ShapeKind::Fireworks => sample_fireworks(targets, rng),
        ShapeKind::Buddha => sample_buddha(targets, rng),
    }
    planar_radius(targets)
}

/// Largest distance from the Z axis over all points.
pub fn planar_radius(points: &[Vec3]) -> f32 {
    points
        .iter()
        .map(|p| p.truncate().length())
        .fold(0.0_f32, f32::max)
}

/// Uniform direction on the unit sphere from a cube draw. A zero-length draw
/// falls back to +X so the result is always unit length.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let v = Vec3::new(
        rng.gen::<f32>() * 2.0 - 1.0,
        rng.gen::<f32>() * 2.0 - 1.0,
        rng.gen::<f32>() * 2.0 - 1.0,
    );
    v.try_normalize().unwrap_or(Vec3::X)
}

/// Split `total` into consecutive segment lengths by `fractions`; every segment
/// but the last uses floor, the last takes the remainder.
pub fn split_counts<const K: usize>(total: usize, fractions: [f64; K]) -> [usize; K] {
    let mut counts = [0usize; K];
    let mut used = 0usize;
    for (i, frac) in fractions.iter().enumerate().take(K.saturating_sub(1)) {
        let c = ((total as f64 * frac).floor() as usize).min(total - used);
        counts[i] = c;
        used += c;
    }
    if K > 0 {
        counts[K - 1] = total - used;
    }
    counts
}

#[inline]
fn centered<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen::<f32>() - 0.5
}

/// Point on a sphere of radius `r` via the inverse-trig method.
#[inline]
fn sphere_point<R: Rng + ?Sized>(r: f32, rng: &mut R) -> Vec3 {
    let phi = TAU * rng.gen::<f32>();
    let cos_theta = 2.0 * rng.gen::<f32>() - 1.0;
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    Vec3::new(
        r * sin_theta * phi.cos(),
        r * cos_theta,
        r * sin_theta * phi.sin(),
    )
}

fn sample_heart<R: Rng + ?Sized>(out: &mut [Vec3], rng: &mut R) {
    for p in out.iter_mut() {
        let t = (rng.gen::<f32>() * 2.0 - 1.0) * PI;
        let fill = rng.gen::<f32>().sqrt();
        let x = 16.0 * t.sin().powi(3);
        let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
        let k = fill / 18.0;
        *p = Vec3::new(x * k, y * k, centered(rng) * 0.15);
    }
}

fn sample_flower<R: Rng + ?Sized>(out: &mut [Vec3], petals: u32, rng: &mut R) {
    for p in out.iter_mut() {
        let theta = rng.gen::<f32>() * TAU;
        let base = 0.5 + 0.5 * (petals as f32 * theta).cos().max(0.0);
        let r = base.powf(0.7) * (0.6 + 0.4 * rng.gen::<f32>());
        *p = Vec3::new(r * theta.cos(), r * theta.sin(), centered(rng) * 0.2);
    }
}

fn sample_saturn<R: Rng + ?Sized>(out: &mut [Vec3], rng: &mut R) {
    const SPHERE_RADIUS: f32 = 0.6;
    const RING_RADIUS: f32 = 1.1;
    const RING_THICKNESS: f32 = 0.07;

    let [sphere_count, _ring_count] = split_counts(out.len(), [0.6, 0.4]);
    let (sphere, ring) = out.split_at_mut(sphere_count);
    for p in sphere.iter_mut() {
        *p = sphere_point(SPHERE_RADIUS, rng);
    }
    for p in ring.iter_mut() {
        let a = rng.gen::<f32>() * TAU;
        *p = Vec3::new(
            a.cos() * RING_RADIUS + centered(rng) * RING_THICKNESS,
            centered(rng) * RING_THICKNESS * 0.6,
            a.sin() * RING_RADIUS + centered(rng) * RING_THICKNESS,
        );
    }
}

fn sample_fireworks<R: Rng + ?Sized>(out: &mut [Vec3], rng: &mut R) {
    let dirs: [Vec3; FIREWORK_BURSTS] = std::array::from_fn(|_| random_unit_vector(rng));
    for (i, p) in out.iter_mut().enumerate() {
        let r = rng.gen::<f32>().powf(0.35);
        *p = dirs[i % FIREWORK_BURSTS] * r;
    }
}

/// Anisotropic sphere cloud used for the seated silhouette parts.
struct Blob {
    radius: f32,
    axis_scale: Vec3,
    offset: Vec3,
}

const BUDDHA_PARTS: [Blob; 3] = [
    // head
    Blob {
        radius: 0.25,
        axis_scale: Vec3::ONE,
        offset: Vec3::new(0.0, 0.5, 0.0),
    },
    // body, wider and slightly squashed
    Blob {
        radius: 0.4,
        axis_scale: Vec3::new(1.2, 0.9, 0.8),
        offset: Vec3::ZERO,
    },
    // crossed legs, flattened and moved down
    Blob {
        radius: 0.6,
        axis_scale: Vec3::new(1.5, 0.4, 1.5),
        offset: Vec3::new(0.0, -0.4, 0.0),
    },
];

fn sample_buddha<R: Rng + ?Sized>(out: &mut [Vec3], rng: &mut R) {
    let counts = split_counts(out.len(), [0.15, 0.35, 0.5]);
    let mut rest = out;
    for (blob, count) in BUDDHA_PARTS.iter().zip(counts) {
        let (part, tail) = std::mem::take(&mut rest).split_at_mut(count);
        for p in part.iter_mut() {
            let phi = TAU * rng.gen::<f32>();
            let theta = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
            let unit = Vec3::new(
                theta.sin() * phi.cos(),
                theta.sin() * phi.sin(),
                theta.cos(),
            );
            *p = unit * blob.radius * blob.axis_scale + blob.offset;
        }
        rest = tail;
    }
}
