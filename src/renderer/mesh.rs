//! Renderer uploading every mesh separately.

use egui::epaint::Primitive;
use egui::ClippedPrimitive;

use super::common::{begin_draw_lists, clip_to_scissor, end_draw_lists, target_size, texture_key};
use super::Renderer;
use crate::gui::{DrawList, GuiVertex, IoState};
use crate::host::{Command, CommandBuffer};

/// One geometry upload and one indexed draw per clipped mesh.
pub struct MeshRenderer {
    shader: String,
    initialized: bool,
    frames_rendered: u64,
}

impl MeshRenderer {
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

impl Renderer for MeshRenderer {
    fn name(&self) -> &'static str {
        "mesh"
    }

    fn initialize(&mut self, io: &mut IoState) {
        io.backend_renderer_name = Some(format!("mesh ({})", self.shader));
        self.initialized = true;
    }

    fn shutdown(&mut self, io: &mut IoState) {
        io.backend_renderer_name = None;
        self.initialized = false;
    }

    fn render_draw_lists(&mut self, cmd: &mut CommandBuffer, list: &DrawList) {
        crate::profile_scope!("mesh_render_draw_lists");

        if !self.initialized {
            log::warn!("Mesh renderer used before initialization");
            return;
        }
        let Some(size) = target_size(list) else {
            return;
        };

        begin_draw_lists(cmd, list, &self.shader, size);

        for ClippedPrimitive {
            clip_rect,
            primitive,
        } in &list.primitives
        {
            match primitive {
                Primitive::Mesh(mesh) => {
                    if mesh.vertices.is_empty() || mesh.indices.is_empty() {
                        continue;
                    }
                    let Some(scissor) =
                        clip_to_scissor(*clip_rect, list.pixels_per_point, size.0, size.1)
                    else {
                        continue;
                    };

                    let vertices: Vec<GuiVertex> = mesh.vertices.iter().map(GuiVertex::from).collect();
                    cmd.push(Command::UploadGeometry {
                        vertex_stride: GuiVertex::STRIDE,
                        vertices: bytemuck::cast_slice(&vertices).to_vec(),
                        indices: mesh.indices.clone(),
                    });
                    cmd.push(Command::BindTexture(texture_key(mesh.texture_id)));
                    cmd.set_scissor(scissor);
                    cmd.draw_indexed(0, mesh.indices.len() as u32, 0);
                }
                Primitive::Callback(_) => {
                    log::trace!("Skipping paint callback");
                }
            }
        }

        end_draw_lists(cmd, list);
        self.frames_rendered += 1;
    }
}
