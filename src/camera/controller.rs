use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::camera::core::Camera;
use crate::options::ControlOptions;

/// Keeps the polar angle off the poles, where the view basis degenerates.
const POLE_EPSILON: f32 = 1e-6;
/// Pending motion below this is treated as settled.
const SETTLE_EPSILON: f32 = 1e-6;

/// Spherical coordinates of the eye relative to the target, Y-up.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    /// Azimuth about +Y, measured from +Z toward +X.
    theta: f32,
    /// Polar angle measured from +Y.
    phi: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return Self {
                radius: 0.0,
                theta: 0.0,
                phi: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn direction(self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
    }
}

/// Damped orbit/pan/zoom manipulator for a [`Camera`].
///
/// Gestures accumulate pending motion; [`update`](Self::update) applies a
/// `damping_factor` share of it each frame, so the camera glides to rest.
#[derive(Debug, Clone)]
pub struct OrbitController {
    options: ControlOptions,
    target: Vec3,
    spherical: Spherical,
    /// Pending (theta, phi) rotation in radians.
    rotate_pending: Vec2,
    /// Pending pan in pixels.
    pan_pending: Vec2,
    /// Pending radius multiplier.
    scale_pending: f32,
    surface: (u32, u32),
    home: (Vec3, Vec3),
    enabled: bool,
}

impl OrbitController {
    /// Bind a controller to the current pose of `camera`.
    #[must_use]
    pub fn new(
        camera: &Camera,
        options: ControlOptions,
        surface: (u32, u32),
    ) -> Self {
        Self {
            options,
            target: camera.target,
            spherical: Spherical::from_offset(camera.eye - camera.target),
            rotate_pending: Vec2::ZERO,
            pan_pending: Vec2::ZERO,
            scale_pending: 1.0,
            surface: (surface.0.max(1), surface.1.max(1)),
            home: (camera.eye, camera.target),
            enabled: true,
        }
    }

    /// Queue an orbit by a cursor delta in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        if !self.enabled {
            return;
        }
        let scale = TAU / self.surface.1 as f32 * self.options.rotate_speed;
        self.rotate_pending -= delta * scale;
    }

    /// Queue a pan by a cursor delta in pixels.
    pub fn pan(&mut self, delta: Vec2) {
        if !self.enabled {
            return;
        }
        self.pan_pending += delta * self.options.pan_speed;
    }

    /// Queue a dolly. Positive `delta` moves toward the target.
    pub fn zoom(&mut self, delta: f32) {
        if !self.enabled {
            return;
        }
        self.scale_pending *= 0.95_f32.powf(self.options.zoom_speed * delta);
    }

    /// Advance one damping step and write the pose into `camera`.
    ///
    /// Returns whether the eye or target moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        if !self.enabled {
            return false;
        }
        let damping = if self.options.damping_factor > 0.0 {
            self.options.damping_factor.min(1.0)
        } else {
            1.0
        };

        let step = self.rotate_pending * damping;
        self.spherical.theta += step.x;
        self.spherical.phi += step.y;
        let min_phi = self.options.min_polar_angle.max(POLE_EPSILON);
        let max_phi = self.options.max_polar_angle.min(PI - POLE_EPSILON);
        self.spherical.phi =
            self.spherical.phi.clamp(min_phi, max_phi.max(min_phi));

        let (near, far) = self.distance_bounds();
        self.spherical.radius =
            (self.spherical.radius * self.scale_pending).clamp(near, far);
        self.scale_pending = 1.0;

        self.target += self.pan_offset(self.pan_pending * damping, camera.fovy);

        let decay = 1.0 - damping;
        self.rotate_pending = settle(self.rotate_pending * decay);
        self.pan_pending = settle(self.pan_pending * decay);

        let eye =
            self.target + self.spherical.direction() * self.spherical.radius;
        let moved = !eye.abs_diff_eq(camera.eye, SETTLE_EPSILON)
            || !self.target.abs_diff_eq(camera.target, SETTLE_EPSILON);
        camera.eye = eye;
        camera.target = self.target;
        camera.up = Vec3::Y;
        moved
    }

    /// Distance range as `(near, far)`, tolerating swapped or NaN bounds
    /// from hand-edited presets.
    fn distance_bounds(&self) -> (f32, f32) {
        let min = self.options.min_distance;
        let max = self.options.max_distance;
        let min = if min.is_nan() { 0.0 } else { min.max(0.0) };
        let max = if max.is_nan() { f32::INFINITY } else { max.max(0.0) };
        (min.min(max), min.max(max))
    }

    /// World-space target translation for a pixel delta at the current
    /// radius.
    fn pan_offset(&self, pixels: Vec2, fovy_degrees: f32) -> Vec3 {
        if pixels == Vec2::ZERO {
            return Vec3::ZERO;
        }
        let direction = self.spherical.direction();
        let right = Vec3::Y.cross(direction).normalize_or(Vec3::X);
        let up = direction.cross(right);
        let half_fov = fovy_degrees.to_radians() / 2.0;
        let visible = self.spherical.radius * half_fov.tan();
        let per_pixel = 2.0 * visible / self.surface.1 as f32;
        -right * (pixels.x * per_pixel) + up * (pixels.y * per_pixel)
    }

    /// Track the surface size used to scale gestures.
    pub fn set_surface_size(&mut self, width: u32, height: u32) {
        self.surface = (width.max(1), height.max(1));
    }

    /// Replace the tuning. Pending motion is kept.
    pub fn set_options(&mut self, options: ControlOptions) {
        self.options = options;
    }

    /// Drop pending motion and return `camera` to its initial pose.
    pub fn reset(&mut self, camera: &mut Camera) {
        let (eye, target) = self.home;
        self.target = target;
        self.spherical = Spherical::from_offset(eye - target);
        self.rotate_pending = Vec2::ZERO;
        self.pan_pending = Vec2::ZERO;
        self.scale_pending = 1.0;
        camera.eye = eye;
        camera.target = target;
        camera.up = Vec3::Y;
    }

    /// Stop reacting to gestures and updates. Idempotent.
    pub fn release(&mut self) {
        self.enabled = false;
        self.rotate_pending = Vec2::ZERO;
        self.pan_pending = Vec2::ZERO;
        self.scale_pending = 1.0;
    }

    /// Whether the controller still drives the camera.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current polar angle in radians from +Y.
    #[must_use]
    pub fn polar_angle(&self) -> f32 {
        self.spherical.phi
    }

    /// Current eye-to-target distance.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.spherical.radius
    }
}

fn settle(v: Vec2) -> Vec2 {
    if v.length_squared() < SETTLE_EPSILON * SETTLE_EPSILON {
        Vec2::ZERO
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::options::CameraOptions;

    fn setup(damping: f32) -> (Camera, OrbitController) {
        let camera = Camera::new(&CameraOptions::default(), 800.0 / 600.0);
        let options = ControlOptions {
            damping_factor: damping,
            ..ControlOptions::default()
        };
        let controller = OrbitController::new(&camera, options, (800, 600));
        (camera, controller)
    }

    fn run(
        controller: &mut OrbitController,
        camera: &mut Camera,
        frames: usize,
    ) {
        for _ in 0..frames {
            let _ = controller.update(camera);
        }
    }

    #[test]
    fn idle_update_does_not_move() {
        let (mut camera, mut controller) = setup(0.05);
        assert!(!controller.update(&mut camera));
        assert!(camera.eye.abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), 1e-5));
    }

    #[test]
    fn polar_angle_never_exceeds_ceiling() {
        let (mut camera, mut controller) = setup(0.0);
        for i in 0..40 {
            let dy = if i % 3 == 0 { -250.0 } else { 400.0 };
            controller.rotate(Vec2::new(37.0, dy));
            let _ = controller.update(&mut camera);
            assert!(controller.polar_angle() <= FRAC_PI_2 + 1e-6);
            assert!(camera.eye.y >= -1e-4);
        }
    }

    #[test]
    fn horizontal_drag_orbits_at_constant_distance() {
        let (mut camera, mut controller) = setup(0.0);
        controller.rotate(Vec2::new(150.0, 0.0));
        assert!(controller.update(&mut camera));
        assert!((camera.eye.length() - 5.0).abs() < 1e-4);
        // A quarter-height drag is a quarter turn.
        assert!(camera.eye.x.abs() > 4.9);
    }

    #[test]
    fn damping_spreads_motion_over_frames() {
        let (mut damped_camera, mut damped) = setup(0.05);
        let (mut instant_camera, mut instant) = setup(0.0);
        damped.rotate(Vec2::new(60.0, 0.0));
        instant.rotate(Vec2::new(60.0, 0.0));
        let _ = damped.update(&mut damped_camera);
        let _ = instant.update(&mut instant_camera);
        assert!(damped_camera.eye.x.abs() < instant_camera.eye.x.abs());

        run(&mut damped, &mut damped_camera, 600);
        assert!(damped_camera.eye.abs_diff_eq(instant_camera.eye, 1e-3));
    }

    #[test]
    fn zoom_is_clamped_to_distance_range() {
        let (mut camera, mut controller) = setup(0.05);
        controller.zoom(10_000.0);
        let _ = controller.update(&mut camera);
        assert!((controller.distance() - 1.0).abs() < 1e-5);

        controller.zoom(-10_000.0);
        let _ = controller.update(&mut camera);
        assert!((controller.distance() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn swapped_or_nan_distance_bounds_do_not_panic() {
        let (mut camera, mut controller) = setup(0.0);
        controller.set_options(ControlOptions {
            min_distance: 10.0,
            max_distance: 5.0,
            ..ControlOptions::default()
        });
        controller.zoom(-10_000.0);
        let _ = controller.update(&mut camera);
        assert!((controller.distance() - 10.0).abs() < 1e-3);
        controller.zoom(10_000.0);
        let _ = controller.update(&mut camera);
        assert!((controller.distance() - 5.0).abs() < 1e-4);

        controller.set_options(ControlOptions {
            min_distance: f32::NAN,
            max_distance: f32::NAN,
            ..ControlOptions::default()
        });
        controller.zoom(1.0);
        let _ = controller.update(&mut camera);
        assert!(controller.distance().is_finite());
    }

    #[test]
    fn zoom_in_shrinks_distance() {
        let (mut camera, mut controller) = setup(0.05);
        controller.zoom(1.0);
        let _ = controller.update(&mut camera);
        assert!((controller.distance() - 5.0 * 0.95).abs() < 1e-4);
    }

    #[test]
    fn pan_moves_target_in_view_plane() {
        let (mut camera, mut controller) = setup(0.0);
        controller.pan(Vec2::new(100.0, 0.0));
        let _ = controller.update(&mut camera);
        // Dragging right moves the target left of the view.
        assert!(camera.target.x < 0.0);
        assert!(camera.target.y.abs() < 1e-5);
        assert!(camera.target.z.abs() < 1e-5);
        assert!(((camera.eye - camera.target).length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn reset_restores_initial_pose() {
        let (mut camera, mut controller) = setup(0.0);
        controller.rotate(Vec2::new(120.0, 80.0));
        controller.pan(Vec2::new(30.0, 30.0));
        controller.zoom(4.0);
        run(&mut controller, &mut camera, 3);
        controller.reset(&mut camera);
        assert!(camera.eye.abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), 1e-5));
        assert_eq!(camera.target, Vec3::ZERO);
        assert!(!controller.update(&mut camera));
    }

    #[test]
    fn released_controller_ignores_gestures() {
        let (mut camera, mut controller) = setup(0.0);
        controller.release();
        controller.release();
        controller.rotate(Vec2::new(100.0, 0.0));
        controller.zoom(5.0);
        assert!(!controller.update(&mut camera));
        assert!(!controller.is_enabled());
    }
}
