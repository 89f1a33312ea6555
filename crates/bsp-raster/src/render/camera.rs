//! Viewpoint and view matrix construction.

use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

/// A first-person camera: an eye position plus yaw and pitch.
///
/// The camera looks down its local `-z` axis with `+y` up. `yaw` turns
/// around the world `y` axis and `pitch` around the camera's `x` axis, both
/// in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Point3::new(0.0, 0.0, 5.0))
    }
}

impl Camera {
    /// Creates a camera at `position` looking down `-z`.
    pub fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    /// Rotation taking world directions into camera space.
    pub fn rotation(&self) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::x_axis(), self.pitch)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), self.yaw)
    }

    /// World-space direction the camera looks at.
    pub fn forward(&self) -> Vector3<f32> {
        self.rotation().inverse() * -Vector3::z()
    }

    /// World-space direction to the camera's right.
    pub fn right(&self) -> Vector3<f32> {
        self.rotation().inverse() * Vector3::x()
    }

    /// Matrix taking world points into camera space.
    pub fn world_to_camera(&self) -> Matrix4<f32> {
        self.rotation().to_homogeneous() * Matrix4::new_translation(&-self.position.coords)
    }

    /// Full view matrix for a `width` x `height` pixel surface:
    /// screen mapping, perspective, rotation and translation to the eye.
    ///
    /// A world point `p` lands on pixel `(h.x / h.w, h.y / h.w)` with
    /// `h = view * p.to_homogeneous()`.
    pub fn view_matrix(&self, width: usize, height: usize) -> Matrix4<f32> {
        screen_transform(width as f32, height as f32) * perspective() * self.world_to_camera()
    }
}

/// Perspective projection onto the `z = -1` plane: `w = -z`.
pub fn perspective() -> Matrix4<f32> {
    #[rustfmt::skip]
    let m = Matrix4::new(
        1.0, 0.0,  0.0, 0.0,
        0.0, 1.0,  0.0, 0.0,
        0.0, 0.0,  1.0, 0.0,
        0.0, 0.0, -1.0, 0.0,
    );
    m
}

/// Maps projected coordinates to pixels: the screen center is the origin,
/// `y` is flipped to grow downwards and one unit spans `width` pixels.
pub fn screen_transform(width: f32, height: f32) -> Matrix4<f32> {
    #[rustfmt::skip]
    let m = Matrix4::new(
        width,  0.0,    0.0, width * 0.5,
        0.0,   -width,  0.0, height * 0.5,
        0.0,    0.0,    1.0, 0.0,
        0.0,    0.0,    0.0, 1.0,
    );
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn project(view: &Matrix4<f32>, p: Point3<f32>) -> (f32, f32, f32) {
        let h = view * p.to_homogeneous();
        (h.x / h.w, h.y / h.w, h.w)
    }

    #[test]
    fn center_projects_to_screen_center() {
        let view = Camera::default().view_matrix(100, 80);
        let (x, y, w) = project(&view, Point3::origin());
        assert_relative_eq!(x, 50.0);
        assert_relative_eq!(y, 40.0);
        assert_relative_eq!(w, 5.0);
    }

    #[test]
    fn y_grows_downwards() {
        let view = Camera::default().view_matrix(100, 100);
        let (x, y, _) = project(&view, Point3::new(-1.0, -1.0, 0.0));
        assert_relative_eq!(x, 30.0);
        assert_relative_eq!(y, 70.0);

        let (x, y, _) = project(&view, Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(x, 50.0);
        assert_relative_eq!(y, 30.0);
    }

    #[test]
    fn points_behind_have_negative_w() {
        let view = Camera::default().view_matrix(100, 100);
        let (_, _, w) = project(&view, Point3::new(0.0, 0.0, 10.0));
        assert!(w < 0.0);
    }

    #[test]
    fn yaw_turns_forward() {
        let camera = Camera::new(Point3::origin());
        assert_relative_eq!(camera.forward(), -Vector3::z(), epsilon = 1e-6);

        let turned = camera.with_yaw(FRAC_PI_2);
        assert_relative_eq!(turned.forward(), Vector3::x(), epsilon = 1e-6);
        assert_relative_eq!(turned.right(), Vector3::z(), epsilon = 1e-6);

        // Looking along forward keeps a point on the screen center.
        let target = Point3::origin() + turned.forward() * 3.0;
        let (x, y, w) = project(&turned.view_matrix(100, 100), target);
        assert_relative_eq!(x, 50.0, epsilon = 1e-4);
        assert_relative_eq!(y, 50.0, epsilon = 1e-4);
        assert_relative_eq!(w, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn pitch_looks_up() {
        let camera = Camera::new(Point3::origin()).with_pitch(-FRAC_PI_2);
        assert_relative_eq!(camera.forward(), Vector3::y(), epsilon = 1e-6);
    }
}
