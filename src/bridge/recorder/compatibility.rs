//! Compatibility-mode recorder

use std::sync::Arc;

use super::{bound_camera, refill, PassRecorder};
use crate::bridge::camera::CameraBinding;
use crate::bridge::feature::{OverlayFeature, OVERLAY_PASS_NAME};
use crate::bridge::mode::PipelineMode;
use crate::error::BridgeResult;
use crate::gui::DrawList;
use crate::host::{
    CameraData, CommandBuffer, ExecutionContext, FrameData, FrameGraph, RenderHost,
    ScriptableRenderPass, SharedCommandBuffer,
};
use crate::renderer::RendererHandle;

/// Scriptable pass replaying an already populated command buffer.
pub struct CommandBufferPass {
    buffer: SharedCommandBuffer,
}

impl CommandBufferPass {
    pub fn new(buffer: SharedCommandBuffer) -> Self {
        Self { buffer }
    }
}

impl ScriptableRenderPass for CommandBufferPass {
    fn name(&self) -> &str {
        OVERLAY_PASS_NAME
    }

    fn execute(&self, context: &mut ExecutionContext, _camera: &CameraData) {
        let buffer = self.buffer.lock();
        if !buffer.is_empty() {
            context.execute_command_buffer(&buffer);
        }
    }

    fn record_render_graph(&self, graph: &mut FrameGraph, frame: &FrameData) {
        if frame.resources.is_active_target_back_buffer() {
            return;
        }
        let commands = self.buffer.lock().commands().to_vec();
        if commands.is_empty() {
            return;
        }
        graph.add_raster_pass::<(), _>(OVERLAY_PASS_NAME, |builder| {
            builder.set_render_attachment(frame.resources.active_color_texture, 0);
            builder.set_render_func(move |_, ctx| {
                for command in commands {
                    ctx.cmd.push(command);
                }
            });
        });
    }
}

/// Binds a [`CommandBufferPass`] to the pipeline's overlay feature and fills
/// its buffer after every layout pass.
pub struct CompatibilityRecorder {
    buffer: SharedCommandBuffer,
    pass: Arc<CommandBufferPass>,
    feature: Option<Arc<OverlayFeature>>,
}

impl CompatibilityRecorder {
    pub fn new() -> Self {
        let buffer = CommandBuffer::shared(OVERLAY_PASS_NAME);
        Self {
            pass: Arc::new(CommandBufferPass::new(buffer.clone())),
            buffer,
            feature: None,
        }
    }

    pub fn buffer(&self) -> &SharedCommandBuffer {
        &self.buffer
    }
}

impl Default for CompatibilityRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl PassRecorder for CompatibilityRecorder {
    fn mode(&self) -> PipelineMode {
        PipelineMode::Compatibility
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
        self.buffer.lock().clear();
    }

    fn is_registered(&self) -> bool {
        self.feature.is_some()
    }

    fn prepare_frame(&mut self, list: Option<&DrawList>, renderer: &RendererHandle) {
        refill(&mut self.buffer.lock(), list, renderer);
    }
}
