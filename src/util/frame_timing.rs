use web_time::{Duration, Instant};

/// Frame timing with FPS calculation and optional frame limiting
#[derive(Debug, Clone)]
pub struct FrameTiming {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Last frame timestamp
    last_frame: Instant,
    /// Duration of the last completed frame
    last_delta: Duration,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
    frames: u64,
}

impl FrameTiming {
    /// Create a new frame timer with the given FPS target (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        Self {
            target_fps,
            min_frame_duration: min_duration(target_fps),
            last_frame: Instant::now(),
            last_delta: Duration::ZERO,
            smoothed_fps: 60.0, // Start with reasonable default
            smoothing: 0.05,    // 5% new value, 95% old value
            frames: 0,
        }
    }

    /// Change the frame cap (0 = unlimited).
    pub fn set_target_fps(&mut self, target_fps: u32) {
        self.target_fps = target_fps;
        self.min_frame_duration = min_duration(target_fps);
    }

    /// Restart the clock, e.g. when a loop resumes after a stop.
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.last_delta = Duration::ZERO;
    }

    /// Returns true if enough time has passed to render.
    #[must_use]
    pub fn should_render(&self) -> bool {
        self.should_render_at(Instant::now())
    }

    /// [`should_render`](Self::should_render) against an explicit clock.
    #[must_use]
    pub fn should_render_at(&self, now: Instant) -> bool {
        if self.target_fps == 0 {
            return true;
        }
        let elapsed = now.saturating_duration_since(self.last_frame);
        elapsed >= self.min_frame_duration
    }

    /// Call after rendering to update timing.
    pub fn end_frame(&mut self) {
        self.end_frame_at(Instant::now());
    }

    /// [`end_frame`](Self::end_frame) against an explicit clock.
    pub fn end_frame_at(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.last_delta = elapsed;
        self.frames += 1;

        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            // Exponential moving average for smooth display
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Seconds between the last two rendered frames.
    #[must_use]
    pub fn delta_seconds(&self) -> f32 {
        self.last_delta.as_secs_f32()
    }

    /// Frames rendered since creation.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

fn min_duration(target_fps: u32) -> Duration {
    if target_fps > 0 {
        Duration::from_secs_f64(1.0 / f64::from(target_fps))
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_always_renders() {
        let timing = FrameTiming::new(0);
        assert!(timing.should_render_at(timing.last_frame));
    }

    #[test]
    fn cap_waits_for_min_duration() {
        let timing = FrameTiming::new(50);
        let start = timing.last_frame;
        assert!(!timing.should_render_at(start + Duration::from_millis(5)));
        assert!(timing.should_render_at(start + Duration::from_millis(20)));
    }

    #[test]
    fn end_frame_tracks_delta_and_smooths_fps() {
        let mut timing = FrameTiming::new(0);
        let start = timing.last_frame;
        timing.end_frame_at(start + Duration::from_millis(10));
        assert!((timing.delta_seconds() - 0.010).abs() < 1e-4);
        // 95% of 60 plus 5% of 100.
        assert!((timing.fps() - 62.0).abs() < 0.1);
        assert_eq!(timing.frame_count(), 1);
    }

    #[test]
    fn changing_target_applies_immediately() {
        let mut timing = FrameTiming::new(0);
        let start = timing.last_frame;
        timing.set_target_fps(10);
        assert!(!timing.should_render_at(start + Duration::from_millis(50)));
        timing.set_target_fps(0);
        assert!(timing.should_render_at(start));
    }
}
