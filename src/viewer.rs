//! Standalone visualization window backed by winit.
//!
//! ```no_run
//! # use helico::Viewer;
//! Viewer::builder()
//!     .with_structure("organoid")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    engine::HelicoEngine,
    error::HelicoError,
    gpu::wgpu_backend::WgpuBackend,
    options::Options,
    render_loop::{FrameRequest, FrameScheduler},
    viewport::SurfaceSize,
    InputEvent, MouseButton,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    structure: Option<String>,
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    /// Create a builder with sensible defaults (title "Helico", default
    /// options).
    fn new() -> Self {
        Self {
            structure: None,
            options: None,
            title: "Helico".into(),
        }
    }

    /// Structure selector shown at mount (`"dna"` or `"organoid"`),
    /// overriding `display.initial_structure`.
    #[must_use]
    pub fn with_structure(mut self, selector: impl Into<String>) -> Self {
        self.structure = Some(selector.into());
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        let mut options = self.options.unwrap_or_default();
        if let Some(structure) = self.structure {
            options.display.initial_structure = structure;
        }
        Viewer {
            options,
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays one procedural structure.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`HelicoError::Viewer`] if the event loop cannot be created
    /// or exits abnormally.
    pub fn run(self) -> Result<(), HelicoError> {
        let event_loop =
            EventLoop::new().map_err(|e| HelicoError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            scheduler: None,
            options: Some(self.options),
            title: self.title,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| HelicoError::Viewer(e.to_string()))
    }
}

// ── Frame scheduling ─────────────────────────────────────────────────────

/// [`FrameScheduler`] on top of `Window::request_redraw`.
///
/// winit coalesces redraw requests, so at most one frame is outstanding;
/// the next `RedrawRequested` event fires it.
struct RedrawScheduler {
    window: Arc<Window>,
    next: u64,
    pending: Option<FrameRequest>,
}

impl RedrawScheduler {
    fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next: 0,
            pending: None,
        }
    }

    /// Take the outstanding request, as the redraw callback fires.
    fn fire(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next);
        self.next += 1;
        self.pending = Some(request);
        self.window.request_redraw();
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<HelicoEngine<WgpuBackend>>,
    scheduler: Option<RedrawScheduler>,
    options: Option<Options>,
    title: String,
}

/// Logical size of a window's physical inner size.
fn logical_size(inner: PhysicalSize<u32>, scale: f64) -> SurfaceSize {
    let logical = inner.to_logical::<u32>(scale);
    #[allow(clippy::cast_possible_truncation)]
    let pixel_ratio = scale as f32;
    SurfaceSize::new(logical.width, logical.height)
        .with_pixel_ratio(pixel_ratio)
}

impl ViewerApp {
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let (Some(engine), Some(scheduler)) =
            (&mut self.engine, &mut self.scheduler)
        {
            engine.unmount(scheduler);
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = logical_size(window.inner_size(), window.scale_factor());
        let options = self.options.take().unwrap_or_default();
        let init = HelicoEngine::<WgpuBackend>::initialize(
            Some(window.clone()),
            size,
            options,
        );
        let mut engine = match pollster::block_on(init) {
            Ok(e) => e,
            Err(e) => {
                log::error!("Failed to initialize engine: {e}");
                event_loop.exit();
                return;
            }
        };

        let mut scheduler = RedrawScheduler::new(window.clone());
        engine.start(&mut scheduler);

        self.window = Some(window);
        self.engine = Some(engine);
        self.scheduler = Some(scheduler);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            self.shutdown(event_loop);
            return;
        }

        // Guard: window, engine and scheduler must be initialised.
        let (Some(window), Some(engine), Some(scheduler)) =
            (&self.window, &mut self.engine, &mut self.scheduler)
        else {
            return;
        };
        let scale = window.scale_factor();

        match event {
            WindowEvent::Resized(inner) => {
                let size = logical_size(inner, scale);
                engine.resize(size.width, size.height);
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                #[allow(clippy::cast_possible_truncation)]
                let pixel_ratio = scale_factor as f32;
                engine.set_pixel_ratio(pixel_ratio);
                let size = logical_size(window.inner_size(), scale_factor);
                engine.resize(size.width, size.height);
            }

            WindowEvent::RedrawRequested => {
                if let Some(request) = scheduler.fire() {
                    let _ = engine.on_frame(request, scheduler);
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                engine.handle_input(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(scale);
                engine.handle_input(InputEvent::CursorMoved {
                    x: logical.x,
                    y: logical.y,
                });
            }

            WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                engine.handle_input(InputEvent::PointerLost);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                #[allow(clippy::cast_possible_truncation)]
                let scroll_delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                engine.handle_input(InputEvent::Scroll {
                    delta: scroll_delta,
                });
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                engine.handle_input(InputEvent::ModifiersChanged {
                    shift: modifiers.state().shift_key(),
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                use winit::keyboard::PhysicalKey;
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };

                let key_str = format!("{code:?}");
                if let Some(action) = engine.handle_key(&key_str) {
                    log::debug!("{key_str} -> {action:?}");
                }
            }

            _ => (),
        }
    }
}
