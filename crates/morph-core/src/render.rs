//! GPU-facing layout shared by the web and native renderers. Only plain data
//! lives here; each frontend owns its own wgpu objects.

use crate::constants::{POINT_OPACITY, POINT_SIZE};
use crate::particles::GroupTransform;
use crate::state::Camera;
use glam::{Mat4, Vec3};

pub static PARTICLES_WGSL: &str = include_str!("../shaders/particles.wgsl");

/// Two triangles covering a unit sprite centered on the particle.
pub const QUAD_VERTICES: [f32; 12] = [
    -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
];

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub params: [f32; 4],
}

impl ParticleUniforms {
    pub fn new(camera: &Camera, transform: GroupTransform, color_rgb: [f32; 3]) -> Self {
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(transform.scale),
            glam::Quat::from_rotation_y(transform.rotation_y),
            Vec3::ZERO,
        );
        Self {
            view: camera.view_matrix().to_cols_array_2d(),
            proj: camera.projection_matrix().to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            color: [color_rgb[0], color_rgb[1], color_rgb[2], POINT_OPACITY],
            params: [POINT_SIZE, 0.0, 0.0, 0.0],
        }
    }
}
