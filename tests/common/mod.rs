//! Shared fixtures for bridge integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use egui_pipeline_bridge::bridge::OverlayFeature;
use egui_pipeline_bridge::gui::ArcGuiLayout;
use egui_pipeline_bridge::host::{
    Camera, CameraId, CameraTarget, GraphicsSettings, PipelineAsset, RendererData, RenderHost,
};
use egui_pipeline_bridge::{BridgeConfig, CameraPolicy, PipelineMode, PlatformType};
use parking_lot::RwLock;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A host running `mode`, with the overlay feature installed when the mode
/// needs one. No cameras yet.
pub struct TestHost {
    pub host: RenderHost,
    pub feature: Option<Arc<OverlayFeature>>,
}

impl TestHost {
    pub fn new(mode: PipelineMode) -> Self {
        init_logging();

        let (settings, feature) = match mode {
            PipelineMode::Legacy => (GraphicsSettings::legacy(), None),
            PipelineMode::Compatibility | PipelineMode::FrameGraph => {
                let feature = OverlayFeature::new();
                let asset = PipelineAsset::scriptable(
                    "test pipeline",
                    mode == PipelineMode::Compatibility,
                )
                .with_renderer_data(RendererData::new("forward").with_feature(feature.clone()));
                (GraphicsSettings::with_pipeline(asset), Some(feature))
            }
        };

        Self {
            host: RenderHost::new(settings),
            feature,
        }
    }

    pub fn spawn_camera(&mut self, name: &str, main: bool, target: CameraTarget) -> CameraId {
        self.host
            .cameras_mut()
            .spawn(Camera::new(name, 640.0, 480.0).with_main(main).with_target(target))
    }

    pub fn spawn_main(&mut self) -> CameraId {
        self.spawn_camera("main", true, CameraTarget::Intermediate)
    }

    /// Whether the bridge's overlay pass is attached to the host in any mode.
    pub fn overlay_attached(&self, camera: CameraId) -> bool {
        match &self.feature {
            Some(feature) => feature.is_bound(),
            None => self
                .host
                .cameras()
                .get(camera)
                .is_some_and(|c| c.attachment_count() > 0),
        }
    }
}

pub fn headless_config() -> BridgeConfig {
    BridgeConfig {
        name: "test bridge".to_string(),
        platform: PlatformType::Headless,
        ..Default::default()
    }
}

pub fn explicit_config(camera: CameraId) -> BridgeConfig {
    BridgeConfig {
        camera_policy: CameraPolicy::Explicit,
        camera: Some(camera),
        ..headless_config()
    }
}

/// A layout that always produces geometry.
pub fn panel_layout() -> ArcGuiLayout {
    Arc::new(RwLock::new(|ctx: &egui::Context| {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label("overlay");
        });
    }))
}
