//! Camera and viewport types shared with the frontends.
//!
//! These types intentionally avoid referencing platform-specific APIs and are
//! suitable for use on both native and web targets. The frontends consume them
//! to build view/projection matrices and to size the particle spread so it can
//! reach the edge of the screen.

use crate::constants::{camera_eye, CAMERA_FOV_DEG, CAMERA_ZFAR, CAMERA_ZNEAR};
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: camera_eye(),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Update the aspect ratio from a surface size in pixels.
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// Half-extent of the visible frustum at depth `group_z`: the larger of
    /// the half-width and half-height.
    pub fn viewport_half(&self, group_z: f32) -> f32 {
        let dist = (self.eye.z - group_z).max(0.0001);
        let half_h = (self.fovy_radians * 0.5).tan() * dist;
        let half_w = half_h * self.aspect;
        half_w.max(half_h)
    }
}
