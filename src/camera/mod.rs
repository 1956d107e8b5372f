//! Camera system for 3D scene viewing.
//!
//! Provides a perspective camera and a damped orbit controller with
//! rotation, panning, and zoom.

/// Damped orbit/pan/zoom controller.
pub mod controller;
/// Core camera struct and GPU uniform types.
pub mod core;

pub use controller::OrbitController;
pub use self::core::{Camera, CameraUniform};
