//! Scriptable pass model shared by the compatibility and frame-graph paths

use std::any::Any;
use std::sync::Arc;

use super::camera::{CameraId, CameraTarget, PixelRect};
use super::command::ExecutionContext;
use super::graph::{FrameGraph, FrameResources};

/// Where in the frame an enqueued pass runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RenderPassEvent {
    BeforeRendering,
    AfterRenderingOpaques,
    AfterRenderingTransparents,
    BeforeRenderingPostProcessing,
    #[default]
    AfterRenderingPostProcessing,
    AfterRendering,
}

/// Per-camera data handed to features and passes
#[derive(Debug, Clone, Copy)]
pub struct CameraData {
    pub camera: CameraId,
    pub pixel_rect: PixelRect,
    pub target: CameraTarget,
}

/// Per-frame data handed to passes while recording a frame graph
#[derive(Debug, Clone, Copy)]
pub struct FrameData {
    pub camera: CameraData,
    pub resources: FrameResources,
}

/// A pass that can run under either scriptable execution model
pub trait ScriptableRenderPass: Send + Sync {
    fn name(&self) -> &str;

    fn event(&self) -> RenderPassEvent {
        RenderPassEvent::default()
    }

    /// Compatibility model: execute immediately into the host's context.
    fn execute(&self, context: &mut ExecutionContext, camera: &CameraData);

    /// Frame-graph model: declare resources and defer the actual work.
    fn record_render_graph(&self, graph: &mut FrameGraph, frame: &FrameData);
}

/// Passes enqueued for one camera frame
#[derive(Default)]
pub struct PassQueue {
    passes: Vec<Arc<dyn ScriptableRenderPass>>,
}

impl PassQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue_pass(&mut self, pass: Arc<dyn ScriptableRenderPass>) {
        self.passes.push(pass);
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Passes sorted by event; enqueue order is kept within an event.
    pub fn into_sorted(mut self) -> Vec<Arc<dyn ScriptableRenderPass>> {
        self.passes.sort_by_key(|pass| pass.event());
        self.passes
    }
}

/// A feature installed in renderer data; asked every camera frame for passes
pub trait RendererFeature: Send + Sync {
    fn name(&self) -> &str;

    fn add_render_passes(&self, queue: &mut PassQueue, camera: &CameraData);

    /// Allow downcasting of shared features
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}
