//! Legacy camera command buffer recorder

use super::{bound_camera, refill, PassRecorder};
use crate::bridge::camera::CameraBinding;
use crate::bridge::feature::OVERLAY_PASS_NAME;
use crate::bridge::mode::PipelineMode;
use crate::error::{BridgeError, BridgeResult};
use crate::gui::DrawList;
use crate::host::{CameraEvent, CameraId, CommandBuffer, RenderHost, SharedCommandBuffer};
use crate::renderer::RendererHandle;

/// Camera event the overlay buffer is attached to
pub const LEGACY_CAMERA_EVENT: CameraEvent = CameraEvent::AfterEverything;

/// Attaches a named command buffer to the bound camera and refills it after
/// every layout pass.
///
/// Only the bound camera executes the buffer, so the camera gate holds by
/// construction.
pub struct LegacyRecorder {
    buffer: SharedCommandBuffer,
    attached: Option<CameraId>,
}

impl LegacyRecorder {
    pub fn new() -> Self {
        Self {
            buffer: CommandBuffer::shared(OVERLAY_PASS_NAME),
            attached: None,
        }
    }

    pub fn buffer(&self) -> &SharedCommandBuffer {
        &self.buffer
    }
}

impl Default for LegacyRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl PassRecorder for LegacyRecorder {
    fn mode(&self) -> PipelineMode {
        PipelineMode::Legacy
    }

    fn register(&mut self, host: &mut RenderHost, camera: &CameraBinding) -> BridgeResult<()> {
        if self.attached.is_some() {
            return Ok(());
        }
        let id = bound_camera(host, camera)?;
        if !host
            .cameras_mut()
            .add_command_buffer(id, LEGACY_CAMERA_EVENT, self.buffer.clone())
        {
            return Err(BridgeError::configuration(format!(
                "camera {:?} rejected the overlay command buffer",
                id
            )));
        }
        self.attached = Some(id);
        log::debug!("Attached '{}' to camera {:?}", OVERLAY_PASS_NAME, id);
        Ok(())
    }

    fn unregister(&mut self, host: &mut RenderHost) {
        let Some(id) = self.attached.take() else {
            return;
        };
        if !host
            .cameras_mut()
            .remove_command_buffer(id, LEGACY_CAMERA_EVENT, &self.buffer)
        {
            log::debug!("Camera {:?} no longer holds the overlay buffer", id);
        }
        self.buffer.lock().clear();
    }

    fn is_registered(&self) -> bool {
        self.attached.is_some()
    }

    fn prepare_frame(&mut self, list: Option<&DrawList>, renderer: &RendererHandle) {
        refill(&mut self.buffer.lock(), list, renderer);
    }
}
