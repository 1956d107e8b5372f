//! The mount handle a host receives.
//!
//! [`HelicoEngine`] ties a [`ViewportContext`], the [`Scene`] it draws, the
//! [`ContentManager`] that swaps structures in and out, and the
//! [`RenderLoop`] together. Teardown always runs in the same order: stop
//! the loop, dispose content, release the context.

use crate::error::HelicoError;
use crate::gpu::backend::RenderBackend;
use crate::gpu::wgpu_backend::WgpuBackend;
use crate::input::{InputEvent, KeyAction};
use crate::options::Options;
use crate::render_loop::{FrameRequest, FrameScheduler, RenderLoop};
use crate::scene::{ContentManager, ContentReport, Scene};
use crate::structure::{StructureParams, StructureType};
use crate::viewport::{SurfaceSize, ViewportContext};

/// A mounted structure viewer.
pub struct HelicoEngine<B: RenderBackend> {
    viewport: ViewportContext<B>,
    scene: Scene,
    content: ContentManager,
    render_loop: RenderLoop,
    options: Options,
    mounted: bool,
}

impl HelicoEngine<WgpuBackend> {
    /// Create a wgpu viewport on `surface` and mount onto it.
    ///
    /// # Errors
    ///
    /// Returns [`HelicoError::SurfaceUnavailable`] when the surface is
    /// missing or cannot be rendered to.
    pub async fn initialize<T>(
        surface: Option<T>,
        size: SurfaceSize,
        options: Options,
    ) -> Result<Self, HelicoError>
    where
        T: Into<wgpu::SurfaceTarget<'static>>,
    {
        let viewport =
            ViewportContext::<WgpuBackend>::initialize(surface, size, &options)
                .await?;
        Ok(Self::mount(viewport, options))
    }
}

impl<B: RenderBackend> HelicoEngine<B> {
    /// Install the lighting rig and show `display.initial_structure`.
    pub fn mount(viewport: ViewportContext<B>, mut options: Options) -> Self {
        options.keybindings.rebuild_reverse_map();
        let lighting = *viewport.lighting();
        let mut engine = Self {
            viewport,
            scene: Scene::new(),
            content: ContentManager::new(lighting),
            render_loop: RenderLoop::new(options.display.target_fps),
            options,
            mounted: true,
        };
        engine.scene.set_lighting(lighting);

        let initial = engine.options.display.initial_structure.clone();
        let _ = engine.set_structure_type(&initial);
        log::info!("mounted with {} nodes", engine.scene.node_count());
        engine
    }

    /// Show the structure named by `selector` (`"dna"` or `"organoid"`).
    ///
    /// Unknown selectors are logged and leave only the lighting rig.
    /// Returns `None` after unmount.
    pub fn set_structure_type(
        &mut self,
        selector: &str,
    ) -> Option<ContentReport> {
        let structure = match selector.parse::<StructureType>() {
            Ok(structure) => Some(structure),
            Err(e) => {
                log::warn!("{e}; showing lighting only");
                None
            }
        };
        self.set_structure(structure)
    }

    /// Replace the scene content with `structure` (`None` = nothing).
    /// Returns `None` after unmount.
    pub fn set_structure(
        &mut self,
        structure: Option<StructureType>,
    ) -> Option<ContentReport> {
        if !self.mounted {
            return None;
        }
        let resources = self.viewport.resources_mut()?;
        Some(self.content.set_structure_type(
            &mut self.scene,
            resources,
            structure,
            &self.options.structure,
        ))
    }

    /// Change the builder parameters and rebuild the current structure.
    pub fn set_params(
        &mut self,
        params: StructureParams,
    ) -> Option<ContentReport> {
        self.options.structure = params;
        self.set_structure(self.content.current())
    }

    /// Apply a full options set. Content is rebuilt only when the
    /// structure parameters changed.
    pub fn set_options(&mut self, mut options: Options) {
        if !self.mounted {
            return;
        }
        options.keybindings.rebuild_reverse_map();
        self.viewport.apply_options(&options);
        self.content
            .set_lighting(&mut self.scene, *self.viewport.lighting());
        self.render_loop.set_target_fps(options.display.target_fps);

        let rebuild = options.structure != self.options.structure;
        self.options = options;
        if rebuild {
            let _ = self.set_structure(self.content.current());
        }
    }

    /// Track a new logical surface size. Zero dimensions are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport.resize(width, height);
    }

    /// Track a new device pixel ratio.
    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        self.viewport.set_pixel_ratio(pixel_ratio);
    }

    /// Forward a pointer event to the camera controller.
    pub fn handle_input(&mut self, event: InputEvent) {
        self.viewport.handle_input(event);
    }

    /// Run the action bound to `key` (a `KeyCode` debug string such as
    /// `"Digit1"`). Returns the action, if any.
    pub fn handle_key(&mut self, key: &str) -> Option<KeyAction> {
        if !self.mounted {
            return None;
        }
        let action = self.options.keybindings.lookup(key)?;
        match action {
            KeyAction::ShowHelix => {
                let _ = self.set_structure(Some(StructureType::Helix));
            }
            KeyAction::ShowOrganoid => {
                let _ = self.set_structure(Some(StructureType::Organoid));
            }
            KeyAction::ClearStructure => {
                let _ = self.set_structure(None);
            }
            KeyAction::ResetCamera => self.viewport.reset_camera(),
        }
        Some(action)
    }

    /// Begin continuous rendering.
    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) {
        if self.mounted {
            self.render_loop.start(scheduler);
        }
    }

    /// Frame callback from the host. Returns whether a frame was drawn.
    pub fn on_frame(
        &mut self,
        request: FrameRequest,
        scheduler: &mut impl FrameScheduler,
    ) -> bool {
        self.render_loop
            .tick(request, scheduler, &mut self.viewport, &self.scene)
    }

    /// Stop scheduling frames. Idempotent.
    pub fn stop(&mut self, scheduler: &mut impl FrameScheduler) {
        self.render_loop.stop(scheduler);
    }

    /// Stop the loop, dispose all content, and release the viewport.
    /// Idempotent.
    pub fn unmount(&mut self, scheduler: &mut impl FrameScheduler) {
        if !self.mounted {
            return;
        }
        self.render_loop.stop(scheduler);
        let disposed = match self.viewport.resources_mut() {
            Some(resources) => {
                self.content.clear(&mut self.scene, resources).disposed
            }
            None => 0,
        };
        self.viewport.teardown();
        self.mounted = false;
        log::info!("unmounted, disposed {disposed} nodes");
    }

    /// Whether [`unmount`](Self::unmount) has not yet run.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Structure currently shown.
    #[must_use]
    pub fn current_structure(&self) -> Option<StructureType> {
        self.content.current()
    }

    /// The scene being drawn.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The viewport.
    #[must_use]
    pub fn viewport(&self) -> &ViewportContext<B> {
        &self.viewport
    }

    /// Active options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The render loop state.
    #[must_use]
    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }
}
