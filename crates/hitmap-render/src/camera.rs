//! Camera: a world transform plus a projection.
//!
//! The pick pass consumes exactly two matrices from the camera: the view
//! matrix (inverse of its world transform) and the view-projection
//! product.

use glam::{Mat4, Vec3};

/// A camera positioned by its world transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    world: Mat4,
    projection: Mat4,
}

impl Camera {
    /// Creates a camera at the origin with the given projection.
    #[must_use]
    pub fn new(projection: Mat4) -> Self {
        Self {
            world: Mat4::IDENTITY,
            projection,
        }
    }

    /// Creates a perspective camera. `fov_y` is in radians.
    #[must_use]
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::new(Mat4::perspective_rh(fov_y, aspect, near, far))
    }

    /// Creates an orthographic camera.
    #[must_use]
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Self::new(Mat4::orthographic_rh(left, right, bottom, top, near, far))
    }

    /// Positions the camera at `eye`, looking at `target`.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.world = Mat4::look_at_rh(eye, target, up).inverse();
    }

    /// Sets the camera's world transform directly.
    pub fn set_world(&mut self, world: Mat4) {
        self.world = world;
    }

    /// The camera's world transform.
    #[must_use]
    pub fn world(&self) -> Mat4 {
        self.world
    }

    /// The projection matrix.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// The view matrix: inverse of the world transform.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.world.inverse()
    }

    /// The view-projection product.
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_world_gives_identity_view() {
        let camera = Camera::new(Mat4::IDENTITY);
        assert_eq!(camera.view_matrix(), Mat4::IDENTITY);
        assert_eq!(camera.view_projection(), Mat4::IDENTITY);
    }

    #[test]
    fn view_undoes_world_transform() {
        let mut camera = Camera::new(Mat4::IDENTITY);
        camera.set_world(Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0)));
        let eye = camera.view_matrix() * Vec3::new(0.0, 0.0, 5.0).extend(1.0);
        assert!(eye.truncate().length() < 1e-5);
    }
}
