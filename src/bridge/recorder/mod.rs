//! Pass recorders
//!
//! One strategy per pipeline mode, picked from the detected [`PipelineMode`].
//! Every recorder inserts a single recording unit into the host on
//! [`register`](PassRecorder::register) and removes it on
//! [`unregister`](PassRecorder::unregister). Draw submission always goes
//! through the [`RendererHandle`] current at that moment.

mod compatibility;
mod frame_graph;
mod legacy;

pub use compatibility::{CommandBufferPass, CompatibilityRecorder};
pub use frame_graph::{FrameGraphRecorder, GraphOverlayPass};
pub use legacy::LegacyRecorder;

use super::camera::CameraBinding;
use super::mode::PipelineMode;
use crate::error::{BridgeError, BridgeResult};
use crate::gui::{DrawDataSlot, DrawList};
use crate::host::{CameraId, CommandBuffer, RenderHost};
use crate::renderer::RendererHandle;

/// Records the GUI overlay into the host in one pipeline mode.
pub trait PassRecorder: Send {
    fn mode(&self) -> PipelineMode;

    /// Insert the recording unit for the camera held by `camera`.
    fn register(&mut self, host: &mut RenderHost, camera: &CameraBinding) -> BridgeResult<()>;

    /// Remove the recording unit. Safe to call when not registered.
    fn unregister(&mut self, host: &mut RenderHost);

    fn is_registered(&self) -> bool;

    /// Called every frame after layout, before the host renders the camera.
    fn prepare_frame(&mut self, list: Option<&DrawList>, renderer: &RendererHandle);
}

/// Build the recorder for `mode`.
pub fn create_recorder(
    mode: PipelineMode,
    renderer: &RendererHandle,
    draw_data: &DrawDataSlot,
) -> Box<dyn PassRecorder> {
    match mode {
        PipelineMode::Legacy => Box::new(LegacyRecorder::new()),
        PipelineMode::Compatibility => Box::new(CompatibilityRecorder::new()),
        PipelineMode::FrameGraph => {
            Box::new(FrameGraphRecorder::new(renderer.clone(), draw_data.clone()))
        }
    }
}

/// Bound camera, checked against the host.
fn bound_camera(host: &RenderHost, camera: &CameraBinding) -> BridgeResult<CameraId> {
    let id = camera
        .get()
        .ok_or_else(|| BridgeError::configuration("no camera bound"))?;
    if !host.cameras().contains(id) {
        return Err(BridgeError::configuration(format!(
            "bound camera {:?} does not exist",
            id
        )));
    }
    Ok(id)
}

/// Refill `buffer` with this frame's draw commands. An empty handle or a
/// missing draw list leaves it empty.
fn refill(buffer: &mut CommandBuffer, list: Option<&DrawList>, renderer: &RendererHandle) {
    buffer.clear();
    if let Some(list) = list {
        renderer.render(buffer, list);
    }
}
