//! Arcball camera and view management.

use glam::{Mat4, Quat, UVec2, Vec2, Vec3, Vec4Swizzles};
use neuroscope_core::ViewPreset;

/// Snapshot of the navigable camera state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub orientation: Quat,
    pub center: Vec3,
    pub distance: f32,
    pub fov: f32,
}

/// An arcball camera orbiting a center point.
///
/// The eye sits at `center + orientation * (0, 0, distance)`, looking at
/// the center with `orientation * Y` as up.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Rotation applied to the default +Z viewing direction.
    pub orientation: Quat,
    /// Point the camera orbits and looks at.
    pub center: Vec3,
    /// Distance between eye and center.
    pub distance: f32,
    /// Field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    last_range: Option<(Vec3, Vec3)>,
}

impl Camera {
    /// Creates a new camera with default settings.
    #[must_use]
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            orientation: Quat::IDENTITY,
            center: Vec3::ZERO,
            distance: 3.0,
            fov: std::f32::consts::FRAC_PI_4, // 45 degrees
            aspect_ratio,
            near: 0.01,
            far: 1000.0,
            last_range: None,
        }
    }

    /// Sets the aspect ratio.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Eye position in world space.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.center + self.orientation * Vec3::new(0.0, 0.0, self.distance)
    }

    /// Up vector in world space.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.center, self.up())
    }

    /// Returns the perspective projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Returns the camera's forward direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Returns the camera's right direction.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    /// Maps a world point to canvas pixels (origin top-left, y down).
    ///
    /// Returns `None` for points behind the camera.
    #[must_use]
    pub fn project(&self, world: Vec3, viewport: UVec2) -> Option<Vec2> {
        let clip = self.view_projection_matrix() * world.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.xy() / clip.w;
        let size = viewport.as_vec2();
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * size.x,
            (1.0 - ndc.y) * 0.5 * size.y,
        ))
    }

    /// Orbits the camera around the center.
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.orientation = (self.orientation
            * Quat::from_rotation_y(-delta_x)
            * Quat::from_rotation_x(-delta_y))
        .normalize();
    }

    /// Pans the camera in the view plane.
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let offset = (self.right() * delta_x + self.up() * delta_y) * self.distance;
        self.center += offset;
    }

    /// Dollies the camera toward (positive `delta`) or away from the center.
    pub fn zoom(&mut self, delta: f32) {
        let zoom_factor = (1.0 - delta * 0.1).clamp(0.1, 10.0);
        self.distance = (self.distance * zoom_factor).max(1e-4);
    }

    /// Fits the camera to contain the given bounding box, keeping orientation.
    pub fn set_range(&mut self, min: Vec3, max: Vec3) {
        let center = (min + max) * 0.5;
        let radius = ((max - min).length() * 0.5).max(1e-3);

        self.center = center;
        self.distance = radius / (self.fov * 0.5).sin();
        self.near = self.distance * 1e-3;
        self.far = self.distance + radius * 10.0;
        self.last_range = Some((min, max));
    }

    /// Re-applies the last fitted range so a changed orientation takes effect.
    pub fn refresh_range(&mut self) {
        if let Some((min, max)) = self.last_range {
            self.set_range(min, max);
        }
    }

    /// Last range passed to [`Camera::set_range`].
    #[must_use]
    pub fn last_range(&self) -> Option<(Vec3, Vec3)> {
        self.last_range
    }

    /// Installs a named preset orientation and refreshes the range.
    pub fn set_view(&mut self, preset: ViewPreset) {
        self.orientation = preset.orientation();
        self.refresh_range();
    }

    /// Captures the navigable state.
    #[must_use]
    pub fn state(&self) -> CameraState {
        CameraState {
            orientation: self.orientation,
            center: self.center,
            distance: self.distance,
            fov: self.fov,
        }
    }

    /// Restores a previously captured state.
    pub fn set_state(&mut self, state: CameraState) {
        self.orientation = state.orientation;
        self.center = state.center;
        self.distance = state.distance;
        self.fov = state.fov;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_is_perspective() {
        let camera = Camera::new(1.0);
        let proj = camera.projection_matrix();
        // Perspective matrix has non-zero w division
        assert!(proj.w_axis.z != 0.0);
    }

    #[test]
    fn test_center_projects_to_viewport_center() {
        let mut camera = Camera::new(1.0);
        camera.set_range(Vec3::splat(-10.0), Vec3::splat(30.0));
        let p = camera.project(Vec3::splat(10.0), UVec2::new(200, 100)).unwrap();
        assert!((p - Vec2::new(100.0, 50.0)).length() < 1e-3);
    }

    #[test]
    fn test_set_range_contains_box() {
        let mut camera = Camera::new(1.0);
        let (min, max) = (Vec3::new(-5.0, 0.0, 2.0), Vec3::new(5.0, 8.0, 4.0));
        camera.set_range(min, max);
        let viewport = UVec2::new(100, 100);
        for corner in [min, max, Vec3::new(min.x, max.y, min.z)] {
            let p = camera.project(corner, viewport).unwrap();
            assert!(p.x >= 0.0 && p.x <= 100.0 && p.y >= 0.0 && p.y <= 100.0, "{p}");
        }
    }

    #[test]
    fn test_set_view_keeps_center_and_zoom() {
        let mut camera = Camera::new(1.0);
        camera.set_range(Vec3::ZERO, Vec3::new(100.0, 50.0, 20.0));
        camera.set_view(ViewPreset::Xy);
        let first = camera.state();
        camera.set_view(ViewPreset::NegXy);
        let second = camera.state();
        assert_ne!(first.orientation, second.orientation);
        assert_eq!(first.center, second.center);
        assert_eq!(first.distance, second.distance);
    }

    #[test]
    fn test_state_roundtrip() {
        let mut camera = Camera::new(1.0);
        let saved = camera.state();
        camera.orbit(0.3, -0.2);
        camera.zoom(2.0);
        camera.pan(0.1, 0.1);
        assert_ne!(camera.state(), saved);
        camera.set_state(saved);
        assert_eq!(camera.state(), saved);
    }

    #[test]
    fn test_zoom_perspective() {
        let mut camera = Camera::new(1.0);
        let initial_distance = camera.distance;
        camera.zoom(1.0);
        assert!(
            camera.distance < initial_distance,
            "Perspective zoom in should decrease distance"
        );
    }
}
