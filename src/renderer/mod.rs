//! GUI renderers
//!
//! A renderer turns a [`DrawList`] into host commands. The bridge reaches the
//! active renderer only through a [`RendererHandle`].

mod common;
mod handle;
mod mesh;
mod procedural;

pub use common::{clip_to_scissor, texture_key};
pub use handle::RendererHandle;
pub use mesh::MeshRenderer;
pub use procedural::ProceduralRenderer;

use crate::gui::{DrawList, IoState};
use crate::host::CommandBuffer;

/// Renderer selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RendererType {
    /// One upload and draw per mesh
    #[default]
    Mesh,
    /// Single upload per frame, draws with vertex offsets
    Procedural,
}

/// Shaders available to the built-in renderers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderResources {
    pub mesh: Option<String>,
    pub procedural: Option<String>,
}

impl Default for ShaderResources {
    fn default() -> Self {
        Self {
            mesh: Some("Hidden/GUI/Mesh".to_string()),
            procedural: Some("Hidden/GUI/Procedural".to_string()),
        }
    }
}

/// Consumer of a frame's draw list.
pub trait Renderer: Send + Sync {
    fn name(&self) -> &'static str;

    fn initialize(&mut self, io: &mut IoState);

    fn shutdown(&mut self, io: &mut IoState);

    /// Record draw commands for `list` into `cmd`.
    fn render_draw_lists(&mut self, cmd: &mut CommandBuffer, list: &DrawList);
}

/// Create a renderer of the given type. `None` if its shader is missing.
pub fn create_renderer(
    renderer_type: RendererType,
    shaders: &ShaderResources,
) -> Option<Box<dyn Renderer>> {
    match renderer_type {
        RendererType::Mesh => match &shaders.mesh {
            Some(shader) => Some(Box::new(MeshRenderer::new(shader.clone()))),
            None => {
                log::error!("Mesh renderer requires a mesh shader");
                None
            }
        },
        RendererType::Procedural => match &shaders.procedural {
            Some(shader) => Some(Box::new(ProceduralRenderer::new(shader.clone()))),
            None => {
                log::error!("Procedural renderer requires a procedural shader");
                None
            }
        },
    }
}
