//! Shared utilities for the rendering engine.

/// Frame pacing and FPS smoothing.
pub mod frame_timing;
