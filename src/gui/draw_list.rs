//! Per-frame draw output of the GUI context.

use std::sync::Arc;

use egui::epaint::{Primitive, Vertex};
use egui::{ClippedPrimitive, TexturesDelta};
use glam::Vec2;
use parking_lot::RwLock;

/// Vertex format uploaded by renderers.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GuiVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl GuiVertex {
    pub const STRIDE: u32 = std::mem::size_of::<GuiVertex>() as u32;
}

impl From<&Vertex> for GuiVertex {
    fn from(v: &Vertex) -> Self {
        Self {
            pos: [v.pos.x, v.pos.y],
            uv: [v.uv.x, v.uv.y],
            color: [
                v.color.r() as f32 / 255.0,
                v.color.g() as f32 / 255.0,
                v.color.b() as f32 / 255.0,
                v.color.a() as f32 / 255.0,
            ],
        }
    }
}

/// Tessellated output of one GUI frame. Immutable once published.
#[derive(Debug)]
pub struct DrawList {
    pub frame: u64,
    pub pixels_per_point: f32,
    /// Target size in physical pixels
    pub screen_size_px: Vec2,
    pub primitives: Vec<ClippedPrimitive>,
    pub textures_delta: TexturesDelta,
}

impl DrawList {
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty() && self.textures_delta.is_empty()
    }

    /// Meshes with geometry; callbacks and empty meshes are not counted.
    pub fn mesh_count(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| match &p.primitive {
                Primitive::Mesh(mesh) => !mesh.indices.is_empty(),
                Primitive::Callback(_) => false,
            })
            .count()
    }

    pub fn vertex_count(&self) -> usize {
        self.primitives
            .iter()
            .map(|p| match &p.primitive {
                Primitive::Mesh(mesh) => mesh.vertices.len(),
                Primitive::Callback(_) => 0,
            })
            .sum()
    }
}

/// Holds the draw list of the current frame.
///
/// Cleared at the start of every frame, so a reader never sees a previous
/// frame's output.
#[derive(Clone, Default)]
pub struct DrawDataSlot {
    inner: Arc<RwLock<Option<Arc<DrawList>>>>,
}

impl DrawDataSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<DrawList>> {
        self.inner.read().clone()
    }

    pub fn publish(&self, list: DrawList) -> Arc<DrawList> {
        let list = Arc::new(list);
        *self.inner.write() = Some(list.clone());
        list
    }

    pub fn clear(&self) {
        self.inner.write().take();
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::epaint::Mesh;
    use egui::{Color32, Pos2, Rect};

    fn quad_list(frame: u64) -> DrawList {
        let mut mesh = Mesh::default();
        mesh.add_colored_rect(
            Rect::from_min_max(Pos2::ZERO, Pos2::new(10.0, 10.0)),
            Color32::WHITE,
        );
        DrawList {
            frame,
            pixels_per_point: 1.0,
            screen_size_px: Vec2::new(100.0, 100.0),
            primitives: vec![ClippedPrimitive {
                clip_rect: Rect::EVERYTHING,
                primitive: Primitive::Mesh(mesh),
            }],
            textures_delta: TexturesDelta::default(),
        }
    }

    #[test]
    fn test_vertex_conversion() {
        let v = Vertex {
            pos: Pos2::new(1.0, 2.0),
            uv: Pos2::new(0.5, 0.25),
            color: Color32::from_rgba_premultiplied(255, 0, 0, 255),
        };
        let gv = GuiVertex::from(&v);
        assert_eq!(gv.pos, [1.0, 2.0]);
        assert_eq!(gv.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(GuiVertex::STRIDE, 32);
    }

    #[test]
    fn test_slot_publish_and_clear() {
        let slot = DrawDataSlot::new();
        let reader = slot.clone();
        assert!(reader.get().is_none());

        slot.publish(quad_list(3));
        let list = reader.get().unwrap();
        assert_eq!(list.frame, 3);
        assert_eq!(list.mesh_count(), 1);
        assert_eq!(list.vertex_count(), 4);

        slot.clear();
        assert!(reader.is_empty());
    }
}
