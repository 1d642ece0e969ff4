//! GUI Pipeline Bridge - draws an egui overlay inside a host render pipeline
//!
//! The bridge integrates with three kinds of host pipeline:
//! - **Legacy**: fixed-function camera events, overlay attached as a command buffer
//! - **Compatibility**: scriptable pipeline executing passes directly
//! - **FrameGraph**: scriptable pipeline recording passes into a frame graph
//!
//! # Features
//! - Automatic pipeline mode detection, re-evaluated every frame
//! - Camera-gated overlay pass, rendered by one camera only
//! - Hot-swappable mesh and procedural renderers
//! - Reloads on camera or pipeline change, with explicit degradation reporting
//! - One bridge per session through [`BridgeRegistry`]

pub mod bridge;
pub mod error;
pub mod gui;
pub mod host;
pub mod platform;
pub mod profiling;
pub mod renderer;

pub use bridge::{
    Bridge, BridgeRegistry, BridgeState, CameraBinding, CameraChange, CameraPolicy, FrameStatus,
    PipelineMode, PipelineModeDetector, SessionId,
};
pub use error::{BridgeError, BridgeResult, Degradation};
pub use gui::{FontAtlasConfig, GuiLayout, IoConfig};
pub use host::{CameraId, RenderHost};
pub use platform::PlatformType;
pub use renderer::{RendererType, ShaderResources};

/// Configuration for creating a GUI bridge
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Name used in logs and as the platform label
    pub name: String,
    /// Force a pipeline mode instead of detecting it
    pub pipeline_mode: Option<PipelineMode>,
    /// How the bound camera is chosen
    pub camera_policy: CameraPolicy,
    /// Camera to bind under [`CameraPolicy::Explicit`]
    pub camera: Option<CameraId>,
    /// Which renderer draws the GUI
    pub renderer: RendererType,
    /// Which platform feeds input
    pub platform: PlatformType,
    pub io: IoConfig,
    /// Style applied on activation; egui's default when `None`
    pub style: Option<egui::Style>,
    pub font_atlas: FontAtlasConfig,
    pub shaders: ShaderResources,
    /// Also run the registry's global layouts
    pub do_global_events: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            name: "GUI Bridge".to_string(),
            pipeline_mode: None,
            camera_policy: CameraPolicy::TrackMain,
            camera: None,
            renderer: RendererType::Mesh,
            platform: PlatformType::Winit,
            io: IoConfig::default(),
            style: None,
            font_atlas: FontAtlasConfig::default(),
            shaders: ShaderResources::default(),
            do_global_events: false,
        }
    }
}
