//! Cameras and their per-event command buffer attachments

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec2;
use slotmap::{new_key_type, SlotMap};

use super::command::SharedCommandBuffer;

new_key_type! {
    /// Generational camera id. Stale after the camera is destroyed.
    pub struct CameraId;
}

/// Points in a legacy camera frame where command buffers can be attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraEvent {
    BeforeImageEffects,
    AfterImageEffects,
    AfterEverything,
}

impl CameraEvent {
    /// Execution order within a frame
    pub const ORDER: [CameraEvent; 3] = [
        CameraEvent::BeforeImageEffects,
        CameraEvent::AfterImageEffects,
        CameraEvent::AfterEverything,
    ];
}

/// Where a camera renders its color output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraTarget {
    /// Straight into the presentable backbuffer
    Backbuffer,
    /// Into an intermediate color texture that is blitted to the backbuffer last
    #[default]
    Intermediate,
}

/// Camera viewport in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Camera for viewing the scene
#[derive(Debug, Clone)]
pub struct Camera {
    pub name: String,
    pub pixel_rect: PixelRect,
    pub target: CameraTarget,
    /// Tagged as the main camera
    pub main: bool,
    /// Index into the pipeline's renderer data list
    pub renderer_index: usize,
    attachments: HashMap<CameraEvent, Vec<SharedCommandBuffer>>,
}

impl Camera {
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            pixel_rect: PixelRect::new(0.0, 0.0, width, height),
            target: CameraTarget::default(),
            main: false,
            renderer_index: 0,
            attachments: HashMap::new(),
        }
    }

    pub fn with_main(mut self, main: bool) -> Self {
        self.main = main;
        self
    }

    pub fn with_target(mut self, target: CameraTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_renderer_index(mut self, index: usize) -> Self {
        self.renderer_index = index;
        self
    }

    pub fn command_buffers(&self, event: CameraEvent) -> &[SharedCommandBuffer] {
        self.attachments
            .get(&event)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total attached command buffers over all events
    pub fn attachment_count(&self) -> usize {
        self.attachments.values().map(Vec::len).sum()
    }
}

/// All cameras known to the host
#[derive(Default)]
pub struct Cameras {
    cameras: SlotMap<CameraId, Camera>,
}

impl Cameras {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, camera: Camera) -> CameraId {
        self.cameras.insert(camera)
    }

    pub fn destroy(&mut self, id: CameraId) -> Option<Camera> {
        self.cameras.remove(id)
    }

    pub fn get(&self, id: CameraId) -> Option<&Camera> {
        self.cameras.get(id)
    }

    pub fn get_mut(&mut self, id: CameraId) -> Option<&mut Camera> {
        self.cameras.get_mut(id)
    }

    pub fn contains(&self, id: CameraId) -> bool {
        self.cameras.contains_key(id)
    }

    /// First camera tagged as main
    pub fn main(&self) -> Option<CameraId> {
        self.cameras
            .iter()
            .find(|(_, camera)| camera.main)
            .map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CameraId, &Camera)> {
        self.cameras.iter()
    }

    /// Attach a command buffer to a camera event. Returns `false` if the camera is gone.
    pub fn add_command_buffer(
        &mut self,
        id: CameraId,
        event: CameraEvent,
        buffer: SharedCommandBuffer,
    ) -> bool {
        match self.cameras.get_mut(id) {
            Some(camera) => {
                camera.attachments.entry(event).or_default().push(buffer);
                true
            }
            None => false,
        }
    }

    /// Detach a previously attached buffer (matched by identity).
    pub fn remove_command_buffer(
        &mut self,
        id: CameraId,
        event: CameraEvent,
        buffer: &SharedCommandBuffer,
    ) -> bool {
        let Some(list) = self
            .cameras
            .get_mut(id)
            .and_then(|camera| camera.attachments.get_mut(&event))
        else {
            return false;
        };

        let before = list.len();
        list.retain(|attached| !Arc::ptr_eq(attached, buffer));
        list.len() != before
    }
}
