//! Continuous frame scheduling on top of a host-provided "next frame"
//! primitive.
//!
//! The loop is an explicit state machine: [`RenderLoop::start`] asks the
//! [`FrameScheduler`] for a frame, every [`RenderLoop::tick`] renders and
//! asks for the next one, and [`RenderLoop::stop`] sets the cancellation
//! flag and cancels whatever is pending. Resize never goes through here.

use crate::gpu::backend::RenderBackend;
use crate::scene::Scene;
use crate::util::frame_timing::FrameTiming;
use crate::viewport::ViewportContext;

/// Token for one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// The host's "call me back on the next frame" primitive.
pub trait FrameScheduler {
    /// Schedule one callback. The host later passes the returned token to
    /// [`RenderLoop::tick`].
    fn request_frame(&mut self) -> FrameRequest;

    /// Withdraw a scheduled callback. Unknown tokens are ignored.
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Drives one viewport at the host's frame rate.
#[derive(Debug)]
pub struct RenderLoop {
    pending: Option<FrameRequest>,
    running: bool,
    cancelled: bool,
    timing: FrameTiming,
}

impl RenderLoop {
    /// A stopped loop capped at `target_fps` (0 = every callback).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        Self {
            pending: None,
            running: false,
            cancelled: false,
            timing: FrameTiming::new(target_fps),
        }
    }

    /// Clear the cancellation flag and request the first frame. No-op when
    /// already running.
    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) {
        if self.running {
            return;
        }
        self.cancelled = false;
        self.running = true;
        self.timing.reset();
        self.pending = Some(scheduler.request_frame());
        log::debug!("render loop started");
    }

    /// Handle the frame callback for `request`.
    ///
    /// Stale tokens and callbacks arriving after [`stop`](Self::stop) are
    /// ignored. Returns whether a frame was rendered.
    pub fn tick<B: RenderBackend>(
        &mut self,
        request: FrameRequest,
        scheduler: &mut impl FrameScheduler,
        viewport: &mut ViewportContext<B>,
        scene: &Scene,
    ) -> bool {
        if !self.running || self.pending != Some(request) {
            log::trace!("ignoring stale frame {request:?}");
            return false;
        }
        self.pending = None;

        let rendered = if self.timing.should_render() {
            let _ = viewport.update_controls();
            viewport.render_frame(scene);
            self.timing.end_frame();
            true
        } else {
            false
        };

        if self.cancelled || viewport.is_torn_down() {
            self.running = false;
            return rendered;
        }
        self.pending = Some(scheduler.request_frame());
        rendered
    }

    /// Set the cancellation flag and withdraw the pending request.
    /// Idempotent.
    pub fn stop(&mut self, scheduler: &mut impl FrameScheduler) {
        self.cancelled = true;
        self.running = false;
        if let Some(request) = self.pending.take() {
            scheduler.cancel_frame(request);
            log::debug!("render loop stopped");
        }
    }

    /// Whether frames are still being scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Token of the outstanding frame request, if any.
    #[must_use]
    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Change the frame cap.
    pub fn set_target_fps(&mut self, target_fps: u32) {
        self.timing.set_target_fps(target_fps);
    }

    /// Frame timing statistics.
    #[must_use]
    pub fn timing(&self) -> &FrameTiming {
        &self.timing
    }
}

/// Scheduler whose callbacks fire only when a test asks.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ManualScheduler {
    next: u64,
    pending: Vec<FrameRequest>,
    pub(crate) requested: usize,
    pub(crate) cancelled: usize,
}

#[cfg(test)]
impl ManualScheduler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Remove and return the oldest scheduled callback, as if it fired.
    pub(crate) fn fire(&mut self) -> Option<FrameRequest> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }
}

#[cfg(test)]
impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next);
        self.next += 1;
        self.requested += 1;
        self.pending.push(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let before = self.pending.len();
        self.pending.retain(|r| *r != request);
        if self.pending.len() < before {
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::testing::RecordingBackend;
    use crate::options::Options;
    use crate::viewport::SurfaceSize;

    fn viewport() -> ViewportContext<RecordingBackend> {
        ViewportContext::with_backend(
            RecordingBackend::new(),
            SurfaceSize::new(800, 600),
            &Options::default(),
        )
    }

    fn frames(viewport: &ViewportContext<RecordingBackend>) -> usize {
        viewport.backend().frames.len()
    }

    #[test]
    fn each_tick_renders_and_reschedules() {
        let mut scheduler = ManualScheduler::new();
        let mut viewport = viewport();
        let scene = Scene::new();
        let mut render_loop = RenderLoop::new(0);

        render_loop.start(&mut scheduler);
        for _ in 0..3 {
            let request = scheduler.fire().unwrap();
            assert!(render_loop.tick(
                request,
                &mut scheduler,
                &mut viewport,
                &scene,
            ));
        }
        assert_eq!(frames(&viewport), 3);
        assert_eq!(scheduler.pending_count(), 1);
        assert_eq!(render_loop.timing().frame_count(), 3);
    }

    #[test]
    fn start_twice_schedules_once() {
        let mut scheduler = ManualScheduler::new();
        let mut render_loop = RenderLoop::new(0);
        render_loop.start(&mut scheduler);
        render_loop.start(&mut scheduler);
        assert_eq!(scheduler.requested, 1);
    }

    #[test]
    fn stop_cancels_and_late_callbacks_are_ignored() {
        let mut scheduler = ManualScheduler::new();
        let mut viewport = viewport();
        let scene = Scene::new();
        let mut render_loop = RenderLoop::new(0);

        render_loop.start(&mut scheduler);
        let first = scheduler.fire().unwrap();
        let _ = render_loop.tick(first, &mut scheduler, &mut viewport, &scene);
        let in_flight = render_loop.pending().unwrap();

        render_loop.stop(&mut scheduler);
        render_loop.stop(&mut scheduler);
        assert_eq!(scheduler.pending_count(), 0);
        assert_eq!(scheduler.cancelled, 1);
        assert!(!render_loop.is_running());

        // A host that already dequeued the callback still delivers it.
        assert!(!render_loop.tick(
            in_flight,
            &mut scheduler,
            &mut viewport,
            &scene,
        ));
        assert_eq!(frames(&viewport), 1);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn stale_token_is_ignored() {
        let mut scheduler = ManualScheduler::new();
        let mut viewport = viewport();
        let scene = Scene::new();
        let mut render_loop = RenderLoop::new(0);

        render_loop.start(&mut scheduler);
        let request = scheduler.fire().unwrap();
        assert!(!render_loop.tick(
            FrameRequest(request.0 + 100),
            &mut scheduler,
            &mut viewport,
            &scene,
        ));
        assert!(render_loop.tick(
            request,
            &mut scheduler,
            &mut viewport,
            &scene,
        ));
        assert!(!render_loop.tick(
            request,
            &mut scheduler,
            &mut viewport,
            &scene,
        ));
    }

    #[test]
    fn resize_does_not_consume_pending_request() {
        let mut scheduler = ManualScheduler::new();
        let mut viewport = viewport();
        let mut render_loop = RenderLoop::new(0);

        render_loop.start(&mut scheduler);
        let pending = render_loop.pending();
        viewport.resize(1024, 768);
        assert_eq!(render_loop.pending(), pending);
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn torn_down_viewport_ends_loop() {
        let mut scheduler = ManualScheduler::new();
        let mut viewport = viewport();
        let scene = Scene::new();
        let mut render_loop = RenderLoop::new(0);

        render_loop.start(&mut scheduler);
        viewport.teardown();
        let request = scheduler.fire().unwrap();
        let _ = render_loop.tick(
            request,
            &mut scheduler,
            &mut viewport,
            &scene,
        );
        assert!(!render_loop.is_running());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn capped_loop_skips_early_callbacks_but_keeps_scheduling() {
        let mut scheduler = ManualScheduler::new();
        let mut viewport = viewport();
        let scene = Scene::new();
        let mut render_loop = RenderLoop::new(1);

        render_loop.start(&mut scheduler);
        let request = scheduler.fire().unwrap();
        assert!(!render_loop.tick(
            request,
            &mut scheduler,
            &mut viewport,
            &scene,
        ));
        assert_eq!(frames(&viewport), 0);
        assert_eq!(scheduler.pending_count(), 1);
    }
}
