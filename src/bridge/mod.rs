//! Render-integration bridge
//!
//! [`Bridge`] owns one GUI context and keeps a single overlay pass registered
//! with the host for the bound camera. Lifecycle:
//!
//! ```text
//! new ──► Inactive ──activate──► Active ──deactivate──► Inactive ──destroy──► (dropped)
//!                                  │  ▲
//!                       set_camera │  │ reload at the next tick
//!                                  ▼  │
//!                          PendingCameraChange
//! ```
//!
//! Activation errors are returned to the caller. Problems found while ticking
//! are absorbed: the bridge deactivates itself and reports a
//! [`FrameStatus::Degraded`].

pub mod camera;
pub mod feature;
pub mod mode;
pub mod recorder;
pub mod registry;

pub use camera::{CameraBinding, CameraPolicy};
pub use feature::{OverlayFeature, OVERLAY_PASS_NAME};
pub use mode::{PipelineMode, PipelineModeDetector};
pub use recorder::{create_recorder, PassRecorder};
pub use registry::{BridgeRegistry, SessionId, SharedLayouts};

use std::sync::Arc;

use crate::error::{BridgeError, BridgeResult, Degradation};
use crate::gui::{ArcGuiLayout, DrawList, FontInitializer, GuiContext, TextureManager};
use crate::host::{CameraId, RenderHost};
use crate::platform::{create_platform, Platform, PlatformType};
use crate::renderer::{create_renderer, Renderer, RendererHandle, RendererType};
use crate::BridgeConfig;

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Inactive,
    Active,
}

/// Outcome of a camera change request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraChange {
    /// Takes effect at the next tick, or at the next activation when inactive
    Scheduled,
    /// Already bound to that camera
    Unchanged,
    /// The bridge follows the main camera and ignores explicit requests
    TracksMainCamera,
}

/// Result of one per-frame tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameStatus {
    /// Nothing ran
    Inactive,
    /// A GUI frame was laid out and handed to the recorder
    Rendered,
    /// The bridge hit a runtime problem and deactivated itself
    Degraded(Degradation),
}

/// Lifecycle manager for one GUI overlay.
pub struct Bridge {
    config: BridgeConfig,
    state: BridgeState,
    gui: GuiContext,
    layouts: Vec<ArcGuiLayout>,
    global_layouts: Option<SharedLayouts>,
    font_initializer: Option<FontInitializer>,
    renderer: RendererHandle,
    platform: Option<Box<dyn Platform>>,
    recorder: Option<Box<dyn PassRecorder>>,
    binding: CameraBinding,
    /// Explicit camera used on the next activation
    requested_camera: Option<CameraId>,
    pending_camera: Option<CameraId>,
    active_mode: Option<PipelineMode>,
}

impl Bridge {
    /// Create an inactive bridge with its own GUI context.
    pub fn new(config: BridgeConfig) -> Self {
        let requested_camera = config.camera;
        Self {
            config,
            state: BridgeState::Inactive,
            gui: GuiContext::new(),
            layouts: Vec::new(),
            global_layouts: None,
            font_initializer: None,
            renderer: RendererHandle::new(),
            platform: None,
            recorder: None,
            binding: CameraBinding::new(),
            requested_camera,
            pending_camera: None,
            active_mode: None,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == BridgeState::Active
    }

    /// Mode of the registered recorder
    pub fn mode(&self) -> Option<PipelineMode> {
        self.active_mode
    }

    pub fn camera(&self) -> Option<CameraId> {
        self.binding.get()
    }

    pub fn binding(&self) -> &CameraBinding {
        &self.binding
    }

    pub fn pending_camera(&self) -> Option<CameraId> {
        self.pending_camera
    }

    pub fn renderer(&self) -> &RendererHandle {
        &self.renderer
    }

    pub fn gui(&self) -> &GuiContext {
        &self.gui
    }

    pub fn gui_mut(&mut self) -> &mut GuiContext {
        &mut self.gui
    }

    pub fn textures(&self) -> &TextureManager {
        self.gui.textures()
    }

    /// Draw list of the current frame
    pub fn draw_data(&self) -> Option<Arc<DrawList>> {
        self.gui.draw_data().get()
    }

    pub fn is_registered(&self) -> bool {
        self.recorder.as_ref().is_some_and(|r| r.is_registered())
    }

    /// The active platform as its concrete type
    pub fn platform_mut<T: Platform + 'static>(&mut self) -> Option<&mut T> {
        self.platform
            .as_mut()
            .and_then(|p| p.as_any_mut().downcast_mut::<T>())
    }

    pub fn add_layout(&mut self, layout: ArcGuiLayout) {
        self.layouts.push(layout);
    }

    /// Hook run over the font definitions each time the atlas is built
    pub fn set_font_initializer(&mut self, initializer: FontInitializer) {
        self.font_initializer = Some(initializer);
    }

    pub(crate) fn attach_global_layouts(&mut self, layouts: SharedLayouts) {
        self.global_layouts = Some(layouts);
    }

    /// Bring the bridge up against `host`.
    ///
    /// On error the bridge is left inactive with nothing registered.
    pub fn activate(&mut self, host: &mut RenderHost) -> BridgeResult<()> {
        if self.is_active() {
            return Ok(());
        }

        match self.try_activate(host) {
            Ok(mode) => {
                self.state = BridgeState::Active;
                self.active_mode = Some(mode);
                log::info!(
                    "GUI bridge '{}' active ({} mode, camera {:?})",
                    self.config.name,
                    mode,
                    self.binding.get()
                );
                self.run_hooks(|layout, ctx| layout.on_initialize(ctx));
                Ok(())
            }
            Err(err) => {
                log::error!("GUI bridge '{}' failed to activate: {}", self.config.name, err);
                self.teardown(host);
                Err(err)
            }
        }
    }

    fn try_activate(&mut self, host: &mut RenderHost) -> BridgeResult<PipelineMode> {
        let camera = self.resolve_camera(host)?;

        let mode = match self.config.pipeline_mode {
            Some(mode) => mode,
            None => PipelineModeDetector::detect(host.settings())?,
        };
        let mut recorder = create_recorder(mode, &self.renderer, self.gui.draw_data());

        let mut platform = create_platform(self.config.platform).ok_or_else(|| {
            BridgeError::configuration(format!(
                "platform {:?} could not be created",
                self.config.platform
            ))
        })?;
        let mut renderer = create_renderer(self.config.renderer, &self.config.shaders)
            .ok_or_else(|| {
                BridgeError::configuration(format!(
                    "renderer {:?} could not be created",
                    self.config.renderer
                ))
            })?;

        self.gui.configure(&self.config.io, self.config.style.as_ref());
        let (ctx, io, textures) = self.gui.parts_mut();
        textures.build_font_atlas(
            ctx,
            io,
            &self.config.font_atlas,
            self.font_initializer.as_ref(),
        );

        platform.initialize(io, &self.config.io, &self.config.name);
        self.platform = Some(platform);

        renderer.initialize(io);
        textures.initialize(io);
        self.renderer.set(renderer);

        self.binding.set(camera);
        let registered = recorder.register(host, &self.binding);
        self.recorder = Some(recorder);
        registered?;

        Ok(mode)
    }

    fn resolve_camera(&self, host: &RenderHost) -> BridgeResult<CameraId> {
        match self.config.camera_policy {
            CameraPolicy::TrackMain => host
                .cameras()
                .main()
                .ok_or_else(|| BridgeError::configuration("no main camera to track")),
            CameraPolicy::Explicit => {
                let camera = self
                    .requested_camera
                    .ok_or_else(|| BridgeError::configuration("no camera configured"))?;
                if host.cameras().contains(camera) {
                    Ok(camera)
                } else {
                    Err(BridgeError::configuration(format!(
                        "configured camera {:?} does not exist",
                        camera
                    )))
                }
            }
        }
    }

    /// Tear down everything activation set up. Safe to call when inactive.
    pub fn deactivate(&mut self, host: &mut RenderHost) {
        if self.is_active() {
            self.run_hooks(|layout, ctx| layout.on_deinitialize(ctx));
            log::info!("GUI bridge '{}' deactivated", self.config.name);
        }
        self.teardown(host);
    }

    fn teardown(&mut self, host: &mut RenderHost) {
        let (ctx, io, textures) = self.gui.parts_mut();

        if let Some(mut renderer) = self.renderer.take() {
            renderer.shutdown(io);
        }
        if let Some(mut platform) = self.platform.take() {
            platform.shutdown(io);
        }
        textures.shutdown();
        textures.destroy_font_atlas(ctx);

        if let Some(mut recorder) = self.recorder.take() {
            recorder.unregister(host);
        }
        self.binding.clear();
        self.gui.reset_frame_state();

        self.active_mode = None;
        self.state = BridgeState::Inactive;
    }

    /// Deactivate and activate again.
    pub fn reload(&mut self, host: &mut RenderHost) -> BridgeResult<()> {
        self.deactivate(host);
        self.activate(host)
    }

    /// Request a different camera.
    ///
    /// The reload happens at the start of the next [`tick`](Self::tick), never
    /// in the middle of a frame.
    pub fn set_camera(&mut self, host: &RenderHost, camera: CameraId) -> BridgeResult<CameraChange> {
        if self.config.camera_policy == CameraPolicy::TrackMain {
            log::warn!(
                "GUI bridge '{}' tracks the main camera; ignoring request for {:?}",
                self.config.name,
                camera
            );
            return Ok(CameraChange::TracksMainCamera);
        }
        if !host.cameras().contains(camera) {
            return Err(BridgeError::configuration(format!(
                "camera {:?} does not exist",
                camera
            )));
        }

        let current = if self.is_active() {
            self.pending_camera.or(self.binding.get())
        } else {
            self.requested_camera
        };
        if current == Some(camera) {
            log::warn!(
                "GUI bridge '{}' is already bound to camera {:?}",
                self.config.name,
                camera
            );
            return Ok(CameraChange::Unchanged);
        }

        self.requested_camera = Some(camera);
        if self.is_active() {
            self.pending_camera = Some(camera);
        }
        Ok(CameraChange::Scheduled)
    }

    /// Run one frame: apply a pending camera change, check that the camera and
    /// pipeline are still usable, lay out the GUI and hand the draw list to the
    /// recorder. Call before the host renders the bound camera.
    pub fn tick(&mut self, host: &mut RenderHost, delta_time: f32) -> FrameStatus {
        crate::profile_scope!("bridge_tick");

        if !self.is_active() {
            return FrameStatus::Inactive;
        }

        if let Some(camera) = self.pending_camera.take() {
            log::info!(
                "GUI bridge '{}' switching to camera {:?}",
                self.config.name,
                camera
            );
            if let Err(err) = self.reload(host) {
                return self.degrade(host, Degradation::ReloadFailed(err.to_string()));
            }
        }

        if let Some(status) = self.resync(host) {
            return status;
        }

        let Some(camera) = self.binding.get().and_then(|id| host.cameras().get(id)) else {
            return self.degrade(host, Degradation::CameraLost);
        };
        let viewport = camera.pixel_rect;

        let layouts = self.frame_layouts();
        let Some(platform) = self.platform.as_deref_mut() else {
            return self.degrade(host, Degradation::PlatformLost);
        };
        let list = self.gui.run_frame(delta_time, viewport, platform, &layouts);

        if let Some(recorder) = self.recorder.as_mut() {
            recorder.prepare_frame(Some(list.as_ref()), &self.renderer);
        }
        FrameStatus::Rendered
    }

    /// Re-check camera and pipeline mode. Returns a status when the frame must
    /// not continue.
    fn resync(&mut self, host: &mut RenderHost) -> Option<FrameStatus> {
        let bound = self.binding.get();
        let camera_valid = bound.is_some_and(|id| host.cameras().contains(id));

        let needs_reload = match self.config.camera_policy {
            CameraPolicy::TrackMain => {
                let main = host.cameras().main();
                if main.is_none() {
                    return Some(self.degrade(host, Degradation::CameraLost));
                }
                main != bound
            }
            CameraPolicy::Explicit => {
                if !camera_valid {
                    return Some(self.degrade(host, Degradation::CameraLost));
                }
                false
            }
        };

        let mode_changed = match self.config.pipeline_mode {
            Some(_) => false,
            None => match PipelineModeDetector::detect(host.settings()) {
                Ok(mode) => Some(mode) != self.active_mode,
                Err(err) => {
                    return Some(
                        self.degrade(host, Degradation::PipelineUnavailable(err.to_string())),
                    )
                }
            },
        };

        if needs_reload || mode_changed {
            log::info!(
                "GUI bridge '{}' re-synchronizing (camera changed: {}, mode changed: {})",
                self.config.name,
                needs_reload,
                mode_changed
            );
            if let Err(err) = self.reload(host) {
                return Some(self.degrade(host, Degradation::ReloadFailed(err.to_string())));
            }
        }
        None
    }

    fn degrade(&mut self, host: &mut RenderHost, degradation: Degradation) -> FrameStatus {
        log::warn!(
            "GUI bridge '{}' deactivating: {}",
            self.config.name,
            degradation
        );
        self.deactivate(host);
        FrameStatus::Degraded(degradation)
    }

    /// Replace the active renderer. Every registered pass sees the new one
    /// from its next execution on.
    pub fn swap_renderer(&mut self, mut renderer: Box<dyn Renderer>) {
        let io = self.gui.io_mut();
        if let Some(mut previous) = self.renderer.take() {
            previous.shutdown(io);
        }
        renderer.initialize(io);
        log::info!("GUI bridge '{}' now renders with '{}'", self.config.name, renderer.name());
        self.renderer.set(renderer);
        self.refresh_recorded_frame();
    }

    /// Drop the current renderer. The overlay pass stays attached but draws nothing.
    pub fn clear_renderer(&mut self) {
        if let Some(mut previous) = self.renderer.take() {
            previous.shutdown(self.gui.io_mut());
            log::info!(
                "GUI bridge '{}' released renderer '{}'",
                self.config.name,
                previous.name()
            );
        }
        self.refresh_recorded_frame();
    }

    /// Re-record the last draw list with the current renderer, so a swap between
    /// `tick` and the host's render reaches this frame.
    fn refresh_recorded_frame(&mut self) {
        let list = self.gui.draw_data().get();
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.prepare_frame(list.as_deref(), &self.renderer);
        }
    }

    /// Switch to another built-in renderer. Also used on later activations.
    pub fn set_renderer(&mut self, renderer_type: RendererType) -> BridgeResult<()> {
        if self.is_active() {
            let renderer = create_renderer(renderer_type, &self.config.shaders).ok_or_else(|| {
                BridgeError::configuration(format!(
                    "renderer {:?} could not be created",
                    renderer_type
                ))
            })?;
            self.swap_renderer(renderer);
        }
        self.config.renderer = renderer_type;
        Ok(())
    }

    /// Switch to another platform. Also used on later activations.
    pub fn set_platform(&mut self, platform_type: PlatformType) -> BridgeResult<()> {
        if self.is_active() {
            let mut platform = create_platform(platform_type).ok_or_else(|| {
                BridgeError::configuration(format!(
                    "platform {:?} could not be created",
                    platform_type
                ))
            })?;
            let io = self.gui.io_mut();
            if let Some(mut previous) = self.platform.take() {
                previous.shutdown(io);
            }
            platform.initialize(io, &self.config.io, &self.config.name);
            self.platform = Some(platform);
        }
        self.config.platform = platform_type;
        Ok(())
    }

    /// Deactivate and drop the bridge with its GUI context.
    pub fn destroy(mut self, host: &mut RenderHost) {
        self.deactivate(host);
        log::debug!("GUI bridge '{}' destroyed", self.config.name);
    }

    fn frame_layouts(&self) -> Vec<ArcGuiLayout> {
        let mut layouts = self.layouts.clone();
        if self.config.do_global_events {
            if let Some(global) = &self.global_layouts {
                layouts.extend(global.read().iter().cloned());
            }
        }
        layouts
    }

    fn run_hooks(&self, hook: impl Fn(&mut dyn crate::gui::GuiLayout, &egui::Context)) {
        for layout in self.frame_layouts() {
            hook(&mut *layout.write(), self.gui.context());
        }
    }
}
