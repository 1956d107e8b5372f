//! Per-mount viewport: camera, orbit controller, lighting template, and the
//! render backend bound to the host surface.

use glam::Vec2;

use crate::camera::{Camera, OrbitController};
use crate::error::HelicoError;
use crate::gpu::backend::{DrawItem, FrameInput, RenderBackend};
use crate::gpu::wgpu_backend::WgpuBackend;
use crate::input::{CameraGesture, InputEvent, InputProcessor};
use crate::options::Options;
use crate::scene::{LightingRig, LightingUniform, Scene};

/// Logical surface size plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    /// Width in logical pixels.
    pub width: u32,
    /// Height in logical pixels.
    pub height: u32,
    /// Physical pixels per logical pixel.
    pub pixel_ratio: f32,
}

impl SurfaceSize {
    /// Size at a pixel ratio of 1.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
        }
    }

    /// Same size at another pixel ratio.
    #[must_use]
    pub fn with_pixel_ratio(self, pixel_ratio: f32) -> Self {
        Self {
            pixel_ratio,
            ..self
        }
    }

    /// Width over height.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Size of the surface buffer in physical pixels, never zero.
    #[must_use]
    pub fn physical(&self) -> (u32, u32) {
        let scale =
            |v: u32| ((v as f32 * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

/// Camera, controller and backend for one mounted surface.
///
/// Created once per mount and torn down exactly once; every operation is
/// a no-op afterwards.
pub struct ViewportContext<B: RenderBackend> {
    backend: B,
    torn_down: bool,
    camera: Camera,
    controller: OrbitController,
    input: InputProcessor,
    lighting: LightingRig,
    size: SurfaceSize,
    background: [f32; 3],
}

impl ViewportContext<WgpuBackend> {
    /// Bind a wgpu backend to `surface` and build the viewport around it.
    ///
    /// # Errors
    ///
    /// Returns [`HelicoError::SurfaceUnavailable`] when `surface` is `None`
    /// or no rendering context can be created for it.
    pub async fn initialize<T>(
        surface: Option<T>,
        size: SurfaceSize,
        options: &Options,
    ) -> Result<Self, HelicoError>
    where
        T: Into<wgpu::SurfaceTarget<'static>>,
    {
        let size = clamp_size(size);
        let backend = WgpuBackend::new(surface, size.physical())
            .await
            .map_err(HelicoError::SurfaceUnavailable)?;
        Ok(Self::with_backend(backend, size, options))
    }
}

impl<B: RenderBackend> ViewportContext<B> {
    /// Build the camera, controller and lighting template around an
    /// existing backend. Zero dimensions clamp to 1.
    pub fn with_backend(
        mut backend: B,
        size: SurfaceSize,
        options: &Options,
    ) -> Self {
        let size = clamp_size(size);
        let camera = Camera::new(&options.camera, size.aspect());
        let controller = OrbitController::new(
            &camera,
            options.controls.clone(),
            (size.width, size.height),
        );
        let (w, h) = size.physical();
        backend.resize(w, h);
        log::debug!(
            "viewport {}x{} @{}x",
            size.width,
            size.height,
            size.pixel_ratio
        );

        Self {
            backend,
            torn_down: false,
            camera,
            controller,
            input: InputProcessor::new(),
            lighting: LightingRig::from_options(&options.lighting),
            size,
            background: options.display.background,
        }
    }

    /// Track a new logical surface size.
    ///
    /// No-op when either dimension is zero, the size is unchanged, or the
    /// viewport was torn down.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.torn_down || width == 0 || height == 0 {
            return;
        }
        if width == self.size.width && height == self.size.height {
            return;
        }

        self.size.width = width;
        self.size.height = height;
        self.camera.aspect = self.size.aspect();
        self.camera.update_projection();
        let (w, h) = self.size.physical();
        self.backend.resize(w, h);
        self.controller.set_surface_size(width, height);
    }

    /// Change the device pixel ratio and resize the surface buffer to match.
    /// Ignored when not finite or not positive.
    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        if self.torn_down || !pixel_ratio.is_finite() || pixel_ratio <= 0.0 {
            return;
        }
        if pixel_ratio == self.size.pixel_ratio {
            return;
        }
        self.size.pixel_ratio = pixel_ratio;
        let (w, h) = self.size.physical();
        self.backend.resize(w, h);
    }

    /// Re-apply camera, controller, lighting and background options.
    pub fn apply_options(&mut self, options: &Options) {
        self.camera.fovy = options.camera.fovy;
        self.camera.znear = options.camera.znear;
        self.camera.zfar = options.camera.zfar;
        self.camera.update_projection();
        self.controller.set_options(options.controls.clone());
        self.lighting = LightingRig::from_options(&options.lighting);
        self.background = options.display.background;
    }

    /// Draw `scene` once.
    ///
    /// A lost or outdated surface is reconfigured at the current size and
    /// the frame skipped; other failures are logged.
    pub fn render_frame(&mut self, scene: &Scene) {
        if self.torn_down {
            return;
        }

        let frame = FrameInput {
            camera: self.camera.uniform(),
            lighting: scene
                .lighting()
                .map_or_else(LightingUniform::unlit, LightingUniform::from),
            clear_color: self.background,
            items: scene
                .nodes()
                .iter()
                .map(|n| DrawItem {
                    geometry: n.geometry,
                    materials: n.material.handles(),
                    model: n.node.transform.matrix(),
                })
                .collect(),
        };

        match self.backend.render(&frame) {
            Ok(()) => {}
            Err(e) if e.needs_reconfigure() => {
                log::debug!("{e}; reconfiguring surface");
                self.backend.reconfigure();
            }
            Err(e) => log::error!("frame failed: {e}"),
        }
    }

    /// Advance the damped controller one step. Returns whether the camera
    /// moved.
    pub fn update_controls(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.controller.update(&mut self.camera)
    }

    /// Feed a pointer event to the controller.
    pub fn handle_input(&mut self, event: InputEvent) {
        if self.torn_down {
            return;
        }
        match self.input.handle_event(event) {
            Some(CameraGesture::Rotate { delta }) => {
                self.controller.rotate(delta);
            }
            Some(CameraGesture::Pan { delta }) => self.controller.pan(delta),
            Some(CameraGesture::Zoom { delta }) => self.controller.zoom(delta),
            None => {}
        }
    }

    /// Orbit by a pixel delta, bypassing pointer tracking.
    pub fn rotate_camera(&mut self, delta: Vec2) {
        self.controller.rotate(delta);
    }

    /// Restore the initial camera pose.
    pub fn reset_camera(&mut self) {
        self.controller.reset(&mut self.camera);
    }

    /// Release the controller and the backend's GPU resources, detaching
    /// the surface. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.controller.release();
        self.input.release_buttons();
        self.backend.release();
        log::debug!("viewport torn down");
    }

    /// Whether [`teardown`](Self::teardown) has run.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// The backend, for allocating and disposing scene resources. `None`
    /// after teardown.
    pub fn resources_mut(&mut self) -> Option<&mut B> {
        (!self.torn_down).then_some(&mut self.backend)
    }

    /// The backend, released or not.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Current camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Current camera aspect ratio.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.camera.aspect
    }

    /// Current logical size and pixel ratio.
    #[must_use]
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// The orbit controller.
    #[must_use]
    pub fn controller(&self) -> &OrbitController {
        &self.controller
    }

    /// Lighting rig installed into the scene on every content swap.
    #[must_use]
    pub fn lighting(&self) -> &LightingRig {
        &self.lighting
    }
}

fn clamp_size(size: SurfaceSize) -> SurfaceSize {
    let ratio = size.pixel_ratio;
    let pixel_ratio = if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    };
    SurfaceSize {
        width: size.width.max(1),
        height: size.height.max(1),
        pixel_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::backend::FrameError;
    use crate::gpu::render_context::RenderContextError;
    use crate::gpu::testing::RecordingBackend;
    use crate::input::MouseButton;
    use crate::scene::ContentManager;
    use crate::structure::{StructureParams, StructureType};

    fn viewport(width: u32, height: u32) -> ViewportContext<RecordingBackend> {
        ViewportContext::with_backend(
            RecordingBackend::new(),
            SurfaceSize::new(width, height),
            &Options::default(),
        )
    }

    fn backend(
        viewport: &ViewportContext<RecordingBackend>,
    ) -> &RecordingBackend {
        viewport.backend()
    }

    #[test]
    fn missing_surface_is_fatal_at_initialize() {
        let result = pollster::block_on(
            ViewportContext::<WgpuBackend>::initialize(
                None::<wgpu::SurfaceTarget<'static>>,
                SurfaceSize::new(800, 600),
                &Options::default(),
            ),
        );
        assert!(matches!(
            result,
            Err(HelicoError::SurfaceUnavailable(
                RenderContextError::MissingSurface
            ))
        ));
    }

    #[test]
    fn initial_camera_matches_options() {
        let viewport = viewport(1024, 512);
        let camera = viewport.camera();
        assert_eq!(camera.fovy, 75.0);
        assert_eq!(camera.znear, 0.1);
        assert_eq!(camera.zfar, 1000.0);
        assert_eq!(camera.eye, glam::Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(viewport.aspect(), 2.0);
        assert_eq!(backend(&viewport).size, Some((1024, 512)));
    }

    #[test]
    fn zero_initial_size_clamps_to_one() {
        let viewport = viewport(0, 0);
        assert_eq!(viewport.size().width, 1);
        assert_eq!(viewport.size().height, 1);
        assert_eq!(viewport.aspect(), 1.0);
    }

    #[test]
    fn resize_updates_aspect_and_surface() {
        let mut viewport = viewport(640, 480);
        viewport.resize(800, 600);
        assert!((viewport.aspect() - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(backend(&viewport).size, Some((800, 600)));

        let resizes = backend(&viewport).resizes;
        viewport.resize(0, 0);
        viewport.resize(800, 0);
        viewport.resize(800, 600);
        assert!((viewport.aspect() - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(backend(&viewport).resizes, resizes);
    }

    #[test]
    fn resize_recomputes_projection() {
        let mut viewport = viewport(600, 600);
        let before = viewport.camera().projection();
        viewport.resize(1200, 600);
        assert_ne!(viewport.camera().projection(), before);
    }

    #[test]
    fn pixel_ratio_scales_physical_size() {
        let mut viewport = viewport(400, 300);
        viewport.set_pixel_ratio(2.0);
        assert_eq!(backend(&viewport).size, Some((800, 600)));
        viewport.resize(500, 300);
        assert_eq!(backend(&viewport).size, Some((1000, 600)));
        // Aspect stays logical.
        assert!((viewport.aspect() - 500.0 / 300.0).abs() < 1e-6);

        let resizes = backend(&viewport).resizes;
        viewport.set_pixel_ratio(f32::NAN);
        viewport.set_pixel_ratio(-1.0);
        viewport.set_pixel_ratio(2.0);
        assert_eq!(backend(&viewport).resizes, resizes);
    }

    #[test]
    fn render_draws_every_node_with_scene_lighting() {
        let mut viewport = viewport(800, 600);
        let mut scene = Scene::new();
        viewport.render_frame(&scene);

        let mut content = ContentManager::new(*viewport.lighting());
        let Some(resources) = viewport.resources_mut() else {
            panic!("backend missing");
        };
        let _ = content.set_structure_type(
            &mut scene,
            resources,
            Some(StructureType::Organoid),
            &StructureParams::default(),
        );
        viewport.render_frame(&scene);

        let frames = &backend(&viewport).frames;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].items, 0);
        assert_eq!(frames[0].ambient_intensity, 0.0);
        assert_eq!(frames[1].items, 52);
        assert_eq!(frames[1].ambient_intensity, 0.4);
        assert_eq!(backend(&viewport).stale_draws, 0);
    }

    #[test]
    fn lost_surface_reconfigures_other_errors_do_not() {
        let mut viewport = viewport(800, 600);
        let scene = Scene::new();

        if let Some(b) = viewport.resources_mut() {
            b.fail_next = Some(FrameError::SurfaceLost);
        }
        viewport.render_frame(&scene);
        assert_eq!(backend(&viewport).reconfigures, 1);

        if let Some(b) = viewport.resources_mut() {
            b.fail_next = Some(FrameError::OutOfMemory);
        }
        viewport.render_frame(&scene);
        assert_eq!(backend(&viewport).reconfigures, 1);

        viewport.render_frame(&scene);
        assert_eq!(backend(&viewport).frames.len(), 1);
    }

    #[test]
    fn drag_then_update_moves_camera_and_reset_restores() {
        let mut viewport = viewport(800, 600);
        viewport.handle_input(InputEvent::CursorMoved { x: 10.0, y: 10.0 });
        viewport.handle_input(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        viewport.handle_input(InputEvent::CursorMoved { x: 60.0, y: 10.0 });
        assert!(viewport.update_controls());
        assert!(viewport.camera().eye.x.abs() > 0.0);

        viewport.reset_camera();
        assert!(viewport
            .camera()
            .eye
            .abs_diff_eq(glam::Vec3::new(0.0, 0.0, 5.0), 1e-5));
    }

    #[test]
    fn teardown_is_idempotent_and_final() {
        let mut viewport = viewport(800, 600);
        viewport.teardown();
        viewport.teardown();
        assert!(viewport.is_torn_down());
        assert!(viewport.resources_mut().is_none());
        assert_eq!(backend(&viewport).releases, 1);

        let aspect = viewport.aspect();
        viewport.resize(300, 100);
        assert_eq!(viewport.aspect(), aspect);
        viewport.rotate_camera(Vec2::new(100.0, 0.0));
        assert!(!viewport.update_controls());
        viewport.render_frame(&Scene::new());
    }
}
