//! Camera binding read by the per-frame gate

use std::sync::Arc;

use parking_lot::RwLock;

use crate::host::CameraId;

/// How the bridge picks its camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraPolicy {
    /// Always follow the host's main camera. Explicit camera requests are rejected.
    #[default]
    TrackMain,
    /// Use the configured camera, changed through `set_camera`
    Explicit,
}

/// Shared slot holding the bound camera.
///
/// Written by the bridge on activation and teardown, read by registered passes
/// every frame.
#[derive(Debug, Clone, Default)]
pub struct CameraBinding {
    camera: Arc<RwLock<Option<CameraId>>>,
}

impl CameraBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<CameraId> {
        *self.camera.read()
    }

    pub(crate) fn set(&self, camera: CameraId) {
        *self.camera.write() = Some(camera);
    }

    pub(crate) fn clear(&self) {
        self.camera.write().take();
    }

    /// The gate: whether a frame rendered by `camera` should get the overlay
    pub fn matches(&self, camera: CameraId) -> bool {
        self.get() == Some(camera)
    }
}
