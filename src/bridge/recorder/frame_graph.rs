//! Frame-graph recorder

use std::sync::Arc;

use super::{bound_camera, PassRecorder};
use crate::bridge::camera::CameraBinding;
use crate::bridge::feature::{OverlayFeature, OVERLAY_PASS_NAME};
use crate::bridge::mode::PipelineMode;
use crate::error::BridgeResult;
use crate::gui::{DrawDataSlot, DrawList};
use crate::host::{
    CameraData, CommandBuffer, ExecutionContext, FrameData, FrameGraph, RenderHost,
    ScriptableRenderPass,
};
use crate::renderer::RendererHandle;

/// Per-pass data. The render function captures everything it needs.
#[derive(Default)]
struct OverlayPassData;

/// Declares a write to the active color target and renders in the graph's
/// execution phase.
pub struct GraphOverlayPass {
    renderer: RendererHandle,
    draw_data: DrawDataSlot,
}

impl GraphOverlayPass {
    pub fn new(renderer: RendererHandle, draw_data: DrawDataSlot) -> Self {
        Self {
            renderer,
            draw_data,
        }
    }
}

impl ScriptableRenderPass for GraphOverlayPass {
    fn name(&self) -> &str {
        OVERLAY_PASS_NAME
    }

    fn execute(&self, context: &mut ExecutionContext, _camera: &CameraData) {
        let Some(list) = self.draw_data.get() else {
            return;
        };
        let mut cmd = CommandBuffer::new(OVERLAY_PASS_NAME);
        if self.renderer.render(&mut cmd, &list) && !cmd.is_empty() {
            context.execute_command_buffer(&cmd);
        }
    }

    fn record_render_graph(&self, graph: &mut FrameGraph, frame: &FrameData) {
        // Writing onto the final backbuffer would bypass later pipeline stages.
        if frame.resources.is_active_target_back_buffer() {
            log::trace!("Active target is the backbuffer; skipping GUI overlay");
            return;
        }

        let renderer = self.renderer.clone();
        let draw_data = self.draw_data.clone();
        graph.add_raster_pass::<OverlayPassData, _>(OVERLAY_PASS_NAME, |builder| {
            builder.set_render_attachment(frame.resources.active_color_texture, 0);
            builder.set_render_func(move |_, ctx| {
                let Some(list) = draw_data.get() else {
                    return;
                };
                renderer.render(ctx.cmd, &list);
            });
        });
    }
}

/// Binds a [`GraphOverlayPass`] to the pipeline's overlay feature.
pub struct FrameGraphRecorder {
    pass: Arc<GraphOverlayPass>,
    feature: Option<Arc<OverlayFeature>>,
}

impl FrameGraphRecorder {
    pub fn new(renderer: RendererHandle, draw_data: DrawDataSlot) -> Self {
        Self {
            pass: Arc::new(GraphOverlayPass::new(renderer, draw_data)),
            feature: None,
        }
    }
}

impl PassRecorder for FrameGraphRecorder {
    fn mode(&self) -> PipelineMode {
        PipelineMode::FrameGraph
    }

    fn register(&mut self, host: &mut RenderHost, camera: &CameraBinding) -> BridgeResult<()> {
        if self.feature.is_some() {
            return Ok(());
        }
        let id = bound_camera(host, camera)?;
        let renderer_index = host
            .cameras()
            .get(id)
            .map(|c| c.renderer_index)
            .unwrap_or_default();

        let feature = OverlayFeature::find(host.settings(), renderer_index)?;
        feature.bind(camera.clone(), self.pass.clone())?;
        self.feature = Some(feature);
        Ok(())
    }

    fn unregister(&mut self, _host: &mut RenderHost) {
        if let Some(feature) = self.feature.take() {
            feature.unbind();
        }
    }

    fn is_registered(&self) -> bool {
        self.feature.is_some()
    }

    /// Nothing to do: the pass reads the draw list when the graph executes.
    fn prepare_frame(&mut self, _list: Option<&DrawList>, _renderer: &RendererHandle) {}
}
