//! Bridge integration tests.
//!
//! Every lifecycle test runs against all three pipeline modes. The overlay is
//! always submitted under [`OVERLAY_PASS_NAME`], so a frame report tells
//! whether the GUI reached the device regardless of mode.
//!
//! # Test Categories
//!
//! - **Activation Tests**: registration, camera resolution, configuration errors
//! - **Camera Gate Tests**: only the bound camera draws the overlay
//! - **Camera Change Tests**: deferred reloads on camera change
//! - **Renderer Tests**: hot swapping and empty renderer handles
//! - **Degradation Tests**: runtime problems deactivate the bridge

mod common;

use rstest::rstest;

use common::{explicit_config, headless_config, panel_layout, TestHost};
use egui_pipeline_bridge::bridge::OVERLAY_PASS_NAME;
use egui_pipeline_bridge::gui::{DrawList, IoState};
use egui_pipeline_bridge::host::{
    CameraTarget, Command, CommandBuffer, GraphicsSettings, PipelineAsset, PipelineKind,
};
use egui_pipeline_bridge::renderer::Renderer;
use egui_pipeline_bridge::{
    Bridge, BridgeConfig, BridgeError, CameraChange, Degradation, FrameStatus, PipelineMode,
    RendererType,
};

const DT: f32 = 1.0 / 60.0;

/// Submits a fixed number of draws for every non-empty list.
struct FixedDrawRenderer {
    draws: u32,
}

impl Renderer for FixedDrawRenderer {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn initialize(&mut self, _io: &mut IoState) {}

    fn shutdown(&mut self, _io: &mut IoState) {}

    fn render_draw_lists(&mut self, cmd: &mut CommandBuffer, list: &DrawList) {
        if list.is_empty() {
            return;
        }
        for i in 0..self.draws {
            cmd.draw_indexed(i * 3, 3, 0);
        }
    }
}

fn active_bridge(test: &mut TestHost, config: BridgeConfig) -> Bridge {
    let mut bridge = Bridge::new(config);
    bridge.add_layout(panel_layout());
    bridge.activate(&mut test.host).unwrap();
    bridge
}

// ============================================================================
// Activation Tests
// ============================================================================

#[rstest]
#[case::legacy(PipelineMode::Legacy)]
#[case::compatibility(PipelineMode::Compatibility)]
#[case::frame_graph(PipelineMode::FrameGraph)]
fn test_activation_detects_mode_and_draws(#[case] mode: PipelineMode) {
    let mut test = TestHost::new(mode);
    let camera = test.spawn_main();

    let mut bridge = active_bridge(&mut test, headless_config());
    assert_eq!(bridge.mode(), Some(mode));
    assert_eq!(bridge.camera(), Some(camera));
    assert!(bridge.is_registered());
    assert!(test.overlay_attached(camera));
    assert_eq!(bridge.renderer().name(), Some("mesh"));

    assert_eq!(bridge.tick(&mut test.host, DT), FrameStatus::Rendered);
    let report = test.host.render_camera(camera).unwrap();
    assert!(report.draw_count_for(OVERLAY_PASS_NAME) > 0);
    if mode == PipelineMode::FrameGraph {
        assert!(report.was_recorded(OVERLAY_PASS_NAME));
    }
}

#[rstest]
#[case::legacy(PipelineMode::Legacy)]
#[case::compatibility(PipelineMode::Compatibility)]
#[case::frame_graph(PipelineMode::FrameGraph)]
fn test_activation_without_camera_fails_cleanly(#[case] mode: PipelineMode) {
    let mut test = TestHost::new(mode);
    test.spawn_camera("not main", false, CameraTarget::Intermediate);

    let mut bridge = Bridge::new(headless_config());
    let err = bridge.activate(&mut test.host).unwrap_err();
    assert!(matches!(err, BridgeError::Configuration(_)));

    assert!(!bridge.is_active());
    assert!(!bridge.is_registered());
    assert!(bridge.renderer().is_empty());
    assert_eq!(bridge.camera(), None);
    if let Some(feature) = &test.feature {
        assert!(!feature.is_bound());
    }
}

#[rstest]
#[case::legacy(PipelineMode::Legacy)]
#[case::compatibility(PipelineMode::Compatibility)]
#[case::frame_graph(PipelineMode::FrameGraph)]
fn test_deactivate_removes_overlay(#[case] mode: PipelineMode) {
    let mut test = TestHost::new(mode);
    let camera = test.spawn_main();
    let mut bridge = active_bridge(&mut test, headless_config());
    bridge.tick(&mut test.host, DT);

    bridge.deactivate(&mut test.host);
    bridge.deactivate(&mut test.host);
    assert!(!test.overlay_attached(camera));
    assert!(bridge.renderer().is_empty());
    assert!(!bridge.textures().is_atlas_built());

    assert_eq!(bridge.tick(&mut test.host, DT), FrameStatus::Inactive);
    let report = test.host.render_camera(camera).unwrap();
    assert_eq!(report.draw_count_for(OVERLAY_PASS_NAME), 0);
}

#[test]
fn test_scriptable_pipeline_without_feature_is_rejected() {
    let mut test = TestHost::new(PipelineMode::Legacy);
    *test.host.settings_mut() = GraphicsSettings::with_pipeline(PipelineAsset::scriptable("bare", true));
    test.spawn_main();

    let mut bridge = Bridge::new(headless_config());
    let err = bridge.activate(&mut test.host).unwrap_err();
    assert!(matches!(err, BridgeError::Resource(_)));
    assert!(!bridge.is_active());
}

// ============================================================================
// Camera Gate Tests
// ============================================================================

#[rstest]
#[case::legacy(PipelineMode::Legacy)]
#[case::compatibility(PipelineMode::Compatibility)]
#[case::frame_graph(PipelineMode::FrameGraph)]
fn test_only_bound_camera_draws_overlay(#[case] mode: PipelineMode) {
    let mut test = TestHost::new(mode);
    let main = test.spawn_main();
    let other = test.spawn_camera("minimap", false, CameraTarget::Intermediate);

    let mut bridge = active_bridge(&mut test, headless_config());
    bridge.tick(&mut test.host, DT);

    let report = test.host.render_camera(other).unwrap();
    assert_eq!(report.draw_count_for(OVERLAY_PASS_NAME), 0);
    assert!(!report.enqueued.iter().any(|p| p == OVERLAY_PASS_NAME));

    let report = test.host.render_camera(main).unwrap();
    assert!(report.draw_count_for(OVERLAY_PASS_NAME) > 0);
}

#[test]
fn test_frame_graph_skips_backbuffer_target() {
    let mut test = TestHost::new(PipelineMode::FrameGraph);
    let camera = test.spawn_camera("main", true, CameraTarget::Backbuffer);

    let mut bridge = active_bridge(&mut test, headless_config());
    assert_eq!(bridge.tick(&mut test.host, DT), FrameStatus::Rendered);

    let report = test.host.render_camera(camera).unwrap();
    assert!(report.enqueued.iter().any(|p| p == OVERLAY_PASS_NAME));
    assert!(!report.was_recorded(OVERLAY_PASS_NAME));
    assert_eq!(report.draw_count_for(OVERLAY_PASS_NAME), 0);
}

// ============================================================================
// Camera Change Tests
// ============================================================================

#[rstest]
#[case::legacy(PipelineMode::Legacy)]
#[case::compatibility(PipelineMode::Compatibility)]
#[case::frame_graph(PipelineMode::FrameGraph)]
fn test_same_camera_is_unchanged(#[case] mode: PipelineMode) {
    let mut test = TestHost::new(mode);
    let camera = test.spawn_main();
    let mut bridge = active_bridge(&mut test, explicit_config(camera));

    assert_eq!(
        bridge.set_camera(&test.host, camera).unwrap(),
        CameraChange::Unchanged
    );
    assert_eq!(bridge.pending_camera(), None);

    let generation = bridge.textures().atlas_generation();
    bridge.tick(&mut test.host, DT);
    assert_eq!(bridge.textures().atlas_generation(), generation);
}

#[rstest]
#[case::legacy(PipelineMode::Legacy)]
#[case::compatibility(PipelineMode::Compatibility)]
#[case::frame_graph(PipelineMode::FrameGraph)]
fn test_camera_change_reloads_once_at_next_tick(#[case] mode: PipelineMode) {
    let mut test = TestHost::new(mode);
    let first = test.spawn_main();
    let second = test.spawn_camera("second", false, CameraTarget::Intermediate);
    let mut bridge = active_bridge(&mut test, explicit_config(first));
    let generation = bridge.textures().atlas_generation();

    assert_eq!(
        bridge.set_camera(&test.host, second).unwrap(),
        CameraChange::Scheduled
    );
    // Nothing moves until the next tick.
    assert_eq!(bridge.camera(), Some(first));
    assert_eq!(bridge.pending_camera(), Some(second));

    assert_eq!(bridge.tick(&mut test.host, DT), FrameStatus::Rendered);
    assert_eq!(bridge.camera(), Some(second));
    assert_eq!(bridge.pending_camera(), None);
    assert!(!bridge.renderer().is_empty());
    assert_eq!(bridge.textures().atlas_generation(), generation + 1);

    if mode == PipelineMode::Legacy {
        let cameras = test.host.cameras();
        assert_eq!(cameras.get(first).unwrap().attachment_count(), 0);
        assert_eq!(cameras.get(second).unwrap().attachment_count(), 1);
    }
    let report = test.host.render_camera(first).unwrap();
    assert_eq!(report.draw_count_for(OVERLAY_PASS_NAME), 0);
    let report = test.host.render_camera(second).unwrap();
    assert!(report.draw_count_for(OVERLAY_PASS_NAME) > 0);

    bridge.tick(&mut test.host, DT);
    assert_eq!(bridge.textures().atlas_generation(), generation + 1);
}

#[test]
fn test_camera_request_while_inactive_applies_on_activation() {
    let mut test = TestHost::new(PipelineMode::Legacy);
    let first = test.spawn_main();
    let second = test.spawn_camera("second", false, CameraTarget::Intermediate);

    let mut bridge = Bridge::new(explicit_config(first));
    assert_eq!(
        bridge.set_camera(&test.host, second).unwrap(),
        CameraChange::Scheduled
    );
    assert_eq!(bridge.pending_camera(), None);

    bridge.activate(&mut test.host).unwrap();
    assert_eq!(bridge.camera(), Some(second));
}

#[test]
fn test_track_main_ignores_explicit_requests() {
    let mut test = TestHost::new(PipelineMode::Legacy);
    let main = test.spawn_main();
    let other = test.spawn_camera("other", false, CameraTarget::Intermediate);
    let mut bridge = active_bridge(&mut test, headless_config());

    assert_eq!(
        bridge.set_camera(&test.host, other).unwrap(),
        CameraChange::TracksMainCamera
    );
    bridge.tick(&mut test.host, DT);
    assert_eq!(bridge.camera(), Some(main));
}

// ============================================================================
// Renderer Tests
// ============================================================================

#[rstest]
#[case::legacy(PipelineMode::Legacy)]
#[case::compatibility(PipelineMode::Compatibility)]
#[case::frame_graph(PipelineMode::FrameGraph)]
fn test_swapped_renderer_is_used_next_frame(#[case] mode: PipelineMode) {
    let mut test = TestHost::new(mode);
    let camera = test.spawn_main();
    let mut bridge = active_bridge(&mut test, headless_config());

    bridge.swap_renderer(Box::new(FixedDrawRenderer { draws: 3 }));
    assert_eq!(bridge.renderer().name(), Some("fixed"));

    bridge.tick(&mut test.host, DT);
    let report = test.host.render_camera(camera).unwrap();
    assert_eq!(report.draw_count_for(OVERLAY_PASS_NAME), 3);
}

#[rstest]
#[case::legacy(PipelineMode::Legacy)]
#[case::compatibility(PipelineMode::Compatibility)]
#[case::frame_graph(PipelineMode::FrameGraph)]
fn test_empty_renderer_handle_draws_nothing(#[case] mode: PipelineMode) {
    let mut test = TestHost::new(mode);
    let camera = test.spawn_main();
    let mut bridge = active_bridge(&mut test, headless_config());

    bridge.clear_renderer();
    assert!(bridge.renderer().is_empty());
    assert_eq!(bridge.tick(&mut test.host, DT), FrameStatus::Rendered);

    let report = test.host.render_camera(camera).unwrap();
    assert_eq!(report.draw_count_for(OVERLAY_PASS_NAME), 0);
}

#[rstest]
#[case::legacy(PipelineMode::Legacy)]
#[case::compatibility(PipelineMode::Compatibility)]
#[case::frame_graph(PipelineMode::FrameGraph)]
fn test_renderer_swap_after_tick_reaches_host(#[case] mode: PipelineMode) {
    let mut test = TestHost::new(mode);
    let camera = test.spawn_main();
    let mut bridge = active_bridge(&mut test, headless_config());

    assert_eq!(bridge.tick(&mut test.host, DT), FrameStatus::Rendered);
    bridge.swap_renderer(Box::new(FixedDrawRenderer { draws: 3 }));
    let report = test.host.render_camera(camera).unwrap();
    assert_eq!(report.draw_count_for(OVERLAY_PASS_NAME), 3);

    assert_eq!(bridge.tick(&mut test.host, DT), FrameStatus::Rendered);
    bridge.clear_renderer();
    let report = test.host.render_camera(camera).unwrap();
    assert_eq!(report.draw_count_for(OVERLAY_PASS_NAME), 0);
}

#[test]
fn test_procedural_renderer_single_upload() {
    let mut test = TestHost::new(PipelineMode::Compatibility);
    let camera = test.spawn_main();
    let mut bridge = active_bridge(
        &mut test,
        BridgeConfig {
            renderer: RendererType::Procedural,
            ..headless_config()
        },
    );
    assert_eq!(bridge.renderer().name(), Some("procedural"));

    bridge.tick(&mut test.host, DT);
    let report = test.host.render_camera(camera).unwrap();
    let uploads: usize = report
        .context
        .submissions_named(OVERLAY_PASS_NAME)
        .map(|s| {
            s.commands
                .iter()
                .filter(|c| matches!(c, Command::UploadGeometry { .. }))
                .count()
        })
        .sum();
    assert_eq!(uploads, 1);
    assert!(report.draw_count_for(OVERLAY_PASS_NAME) > 0);
}

// ============================================================================
// Degradation Tests
// ============================================================================

#[rstest]
#[case::legacy(PipelineMode::Legacy)]
#[case::compatibility(PipelineMode::Compatibility)]
#[case::frame_graph(PipelineMode::FrameGraph)]
fn test_destroyed_camera_degrades(#[case] mode: PipelineMode) {
    let mut test = TestHost::new(mode);
    let camera = test.spawn_main();
    let mut bridge = active_bridge(&mut test, explicit_config(camera));
    bridge.tick(&mut test.host, DT);

    test.host.cameras_mut().destroy(camera);
    assert_eq!(
        bridge.tick(&mut test.host, DT),
        FrameStatus::Degraded(Degradation::CameraLost)
    );
    assert!(!bridge.is_active());
    assert!(!bridge.is_registered());
    if let Some(feature) = &test.feature {
        assert!(!feature.is_bound());
    }
    assert_eq!(bridge.tick(&mut test.host, DT), FrameStatus::Inactive);
}

#[test]
fn test_pipeline_switch_reloads_into_new_mode() {
    let mut test = TestHost::new(PipelineMode::Legacy);
    let camera = test.spawn_main();
    let mut bridge = active_bridge(&mut test, headless_config());
    assert_eq!(bridge.mode(), Some(PipelineMode::Legacy));

    let scriptable = TestHost::new(PipelineMode::Compatibility);
    *test.host.settings_mut() = scriptable.host.settings().clone();

    assert_eq!(bridge.tick(&mut test.host, DT), FrameStatus::Rendered);
    assert_eq!(bridge.mode(), Some(PipelineMode::Compatibility));
    assert_eq!(test.host.cameras().get(camera).unwrap().attachment_count(), 0);
    assert!(scriptable.feature.as_ref().unwrap().is_bound());

    let report = test.host.render_camera(camera).unwrap();
    assert!(report.draw_count_for(OVERLAY_PASS_NAME) > 0);
}

#[test]
fn test_unsupported_pipeline_degrades() {
    let mut test = TestHost::new(PipelineMode::Legacy);
    test.spawn_main();
    let mut bridge = active_bridge(&mut test, headless_config());

    let mut asset = PipelineAsset::scriptable("hdrp", false);
    asset.kind = PipelineKind::Custom("hd".to_string());
    *test.host.settings_mut() = GraphicsSettings::with_pipeline(asset);

    assert!(matches!(
        bridge.tick(&mut test.host, DT),
        FrameStatus::Degraded(Degradation::PipelineUnavailable(_))
    ));
    assert!(!bridge.is_active());
}
