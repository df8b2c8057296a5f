//! Perspective camera with the viewer's fixed pose.

use glam::{Mat4, Vec3};

/// Vertical field of view in degrees.
pub const FOV_Y_DEGREES: f32 = 75.0;

/// Near clip plane.
pub const Z_NEAR: f32 = 0.1;

/// Far clip plane.
pub const Z_FAR: f32 = 1000.0;

/// Fixed eye position.
pub const EYE: Vec3 = Vec3::new(0.0, 0.0, 5.0);

/// Perspective camera.
///
/// The pose never changes: the eye sits at [`EYE`] looking at the origin with
/// +Y up. Only the aspect ratio moves, tracking the viewport, and the
/// projection matrix is cached so per-frame access is a plain read.
#[derive(Debug, Clone)]
pub struct Camera {
    fov_y: f32,
    aspect: f32,
    znear: f32,
    zfar: f32,
    position: Vec3,
    projection: Mat4,
}

impl Camera {
    /// Creates the camera for a viewport of `width` x `height` pixels.
    ///
    /// Aspect is exactly `width / height`.
    pub fn perspective(width: f32, height: f32) -> Self {
        let mut camera = Self {
            fov_y: FOV_Y_DEGREES.to_radians(),
            aspect: width / height,
            znear: Z_NEAR,
            zfar: Z_FAR,
            position: EYE,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Recomputes the aspect ratio from a new viewport size and refreshes the
    /// cached projection.
    ///
    /// Zero dimensions are ignored (minimized window); the previous aspect
    /// stays in effect until a usable size arrives.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.aspect = width / height;
        self.update_projection();
    }

    fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh(self.fov_y, self.aspect, self.znear, self.zfar);
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// View matrix: eye at the fixed position, looking at the origin, +Y up.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view()
    }
}
