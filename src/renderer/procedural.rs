//! Renderer uploading all geometry of a frame at once.

use egui::epaint::Primitive;

use super::common::{begin_draw_lists, clip_to_scissor, end_draw_lists, target_size, texture_key};
use super::Renderer;
use crate::gui::{BackendFlags, DrawList, GuiVertex, IoState};
use crate::host::{Command, CommandBuffer, ScissorRect, TextureKey};

struct Batch {
    texture: TextureKey,
    scissor: ScissorRect,
    first_index: u32,
    index_count: u32,
    base_vertex: i32,
}

/// Concatenates every mesh into one upload and draws each with index and
/// vertex offsets.
pub struct ProceduralRenderer {
    shader: String,
    initialized: bool,
    frames_rendered: u64,
}

impl ProceduralRenderer {
    pub fn new(shader: impl Into<String>) -> Self {
        Self {
            shader: shader.into(),
            initialized: false,
            frames_rendered: 0,
        }
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

impl Renderer for ProceduralRenderer {
    fn name(&self) -> &'static str {
        "procedural"
    }

    fn initialize(&mut self, io: &mut IoState) {
        io.backend_renderer_name = Some(format!("procedural ({})", self.shader));
        io.backend_flags |= BackendFlags::RENDERER_HAS_VTX_OFFSET;
        self.initialized = true;
    }

    fn shutdown(&mut self, io: &mut IoState) {
        io.backend_renderer_name = None;
        io.backend_flags.remove(BackendFlags::RENDERER_HAS_VTX_OFFSET);
        self.initialized = false;
    }

    fn render_draw_lists(&mut self, cmd: &mut CommandBuffer, list: &DrawList) {
        crate::profile_scope!("procedural_render_draw_lists");

        if !self.initialized {
            log::warn!("Procedural renderer used before initialization");
            return;
        }
        let Some(size) = target_size(list) else {
            return;
        };

        let mut vertices: Vec<GuiVertex> = Vec::with_capacity(list.vertex_count());
        let mut indices: Vec<u32> = Vec::new();
        let mut batches = Vec::new();

        for clipped in &list.primitives {
            let mesh = match &clipped.primitive {
                Primitive::Mesh(mesh) => mesh,
                Primitive::Callback(_) => {
                    log::trace!("Skipping paint callback");
                    continue;
                }
            };
            if mesh.vertices.is_empty() || mesh.indices.is_empty() {
                continue;
            }
            let Some(scissor) =
                clip_to_scissor(clipped.clip_rect, list.pixels_per_point, size.0, size.1)
            else {
                continue;
            };

            batches.push(Batch {
                texture: texture_key(mesh.texture_id),
                scissor,
                first_index: indices.len() as u32,
                index_count: mesh.indices.len() as u32,
                base_vertex: vertices.len() as i32,
            });
            vertices.extend(mesh.vertices.iter().map(GuiVertex::from));
            indices.extend_from_slice(&mesh.indices);
        }

        begin_draw_lists(cmd, list, &self.shader, size);
        if !batches.is_empty() {
            cmd.push(Command::UploadGeometry {
                vertex_stride: GuiVertex::STRIDE,
                vertices: bytemuck::cast_slice(&vertices).to_vec(),
                indices,
            });
        }
        for batch in batches {
            cmd.push(Command::BindTexture(batch.texture));
            cmd.set_scissor(batch.scissor);
            cmd.draw_indexed(batch.first_index, batch.index_count, batch.base_vertex);
        }
        end_draw_lists(cmd, list);

        self.frames_rendered += 1;
    }
}
