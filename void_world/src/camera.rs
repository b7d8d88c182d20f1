//! Perspective camera and picking rays.
//!
//! The camera sits on the +z axis looking toward −z with no roll, which is
//! all the gallery needs; targets fly in from negative z toward the lens.

use glam::Vec3;

pub const DEFAULT_FOV_DEG: f32 = 85.0;
pub const DEFAULT_CAMERA_Z: f32 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin:    Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    /// Signed distance along the ray to the point closest to `p`.
    pub fn forward_distance(&self, p: Vec3) -> f32 {
        (p - self.origin).dot(self.direction)
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Vertical field of view, degrees.
    pub fov_deg:  f32,
    /// Width / height.
    pub aspect:   f32,
    pub near:     f32,
    pub far:      f32,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            position: Vec3::new(0.0, 0.0, DEFAULT_CAMERA_Z),
            fov_deg:  DEFAULT_FOV_DEG,
            aspect:   16.0 / 9.0,
            near:     1.0,
            far:      1000.0,
        }
    }
}

impl Camera {
    fn half_tan(&self) -> f32 {
        (self.fov_deg.to_radians() * 0.5).tan()
    }

    /// Visible width and height of the plane at world depth `z`.
    pub fn view_extent_at(&self, z: f32) -> (f32, f32) {
        let h = 2.0 * self.half_tan() * (z - self.position.z).abs();
        (h * self.aspect, h)
    }

    /// Ray from the camera through a screen point; `(sx, sy)` are 0.0–1.0
    /// with y growing downward.
    pub fn ray_through(&self, sx: f32, sy: f32) -> Ray {
        let ndc_x = sx * 2.0 - 1.0;
        let ndc_y = 1.0 - sy * 2.0;
        let t = self.half_tan();
        let dir = Vec3::new(ndc_x * t * self.aspect, ndc_y * t, -1.0).normalize();
        Ray { origin: self.position, direction: dir }
    }

    /// Screen position (0.0–1.0, y down) and view depth of a world point,
    /// or `None` when it is behind the near plane.
    pub fn project(&self, p: Vec3) -> Option<(f32, f32, f32)> {
        let depth = self.position.z - p.z;
        if depth < self.near || depth > self.far {
            return None;
        }
        let t = self.half_tan();
        let ndc_x = (p.x - self.position.x) / (depth * t * self.aspect);
        let ndc_y = (p.y - self.position.y) / (depth * t);
        Some(((ndc_x + 1.0) * 0.5, (1.0 - ndc_y) * 0.5, depth))
    }

    /// On-screen height fraction covered by a world length at `depth`.
    pub fn screen_fraction(&self, length: f32, depth: f32) -> f32 {
        length / (2.0 * self.half_tan() * depth.max(self.near))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn centre_ray_points_down_axis() {
        let ray = Camera::default().ray_through(0.5, 0.5);
        assert_relative_eq!(ray.direction.z, -1.0, epsilon = 1e-6);
        assert_relative_eq!(ray.direction.x, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn top_of_screen_tilts_up() {
        let ray = Camera::default().ray_through(0.5, 0.0);
        assert!(ray.direction.y > 0.0);
        // Top edge sits at half the vertical FOV.
        let angle = ray.direction.y.atan2(-ray.direction.z).to_degrees();
        assert_relative_eq!(angle, DEFAULT_FOV_DEG / 2.0, epsilon = 1e-3);
    }

    #[test]
    fn project_inverts_ray() {
        let cam = Camera::default();
        let ray = cam.ray_through(0.3, 0.7);
        let p = ray.at(80.0);
        let (sx, sy, _) = cam.project(p).unwrap();
        assert_relative_eq!(sx, 0.3, epsilon = 1e-4);
        assert_relative_eq!(sy, 0.7, epsilon = 1e-4);
    }

    #[test]
    fn behind_camera_is_not_projected() {
        assert!(Camera::default().project(Vec3::new(0.0, 0.0, 60.0)).is_none());
    }

    #[test]
    fn extent_grows_with_distance() {
        let cam = Camera::default();
        let (w1, h1) = cam.view_extent_at(0.0);
        let (w2, h2) = cam.view_extent_at(-50.0);
        assert_relative_eq!(h2, h1 * 2.0, epsilon = 1e-3);
        assert_relative_eq!(w1 / h1, cam.aspect, epsilon = 1e-5);
        assert!(w2 > w1);
    }
}
