//! Command buffers and the device-side execution context.

use std::sync::Arc;

use parking_lot::Mutex;

/// Host-side identifier of a texture referenced by commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureKey(pub u64);

/// Scissor rectangle in target pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScissorRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A single low-level command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetViewport {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    SetScissor(ScissorRect),
    /// Upload (or partially update) a texture.
    UpdateTexture {
        texture: TextureKey,
        size: [usize; 2],
        offset: Option<[usize; 2]>,
    },
    FreeTexture(TextureKey),
    /// Upload vertex and index data used by the following draws.
    UploadGeometry {
        vertex_stride: u32,
        vertices: Vec<u8>,
        indices: Vec<u32>,
    },
    BindShader(String),
    BindTexture(TextureKey),
    DrawIndexed {
        first_index: u32,
        index_count: u32,
        base_vertex: i32,
    },
    /// Clear the bound color target.
    ClearColor([f32; 4]),
}

/// An ordered list of commands.
#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    name: String,
    commands: Vec<Command>,
}

/// A command buffer shared between its recorder and the host.
pub type SharedCommandBuffer = Arc<Mutex<CommandBuffer>>;

impl CommandBuffer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    /// Create a named buffer wrapped for sharing.
    pub fn shared(name: impl Into<String>) -> SharedCommandBuffer {
        Arc::new(Mutex::new(Self::new(name)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn set_viewport(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.push(Command::SetViewport {
            x,
            y,
            width,
            height,
        });
    }

    pub fn set_scissor(&mut self, rect: ScissorRect) {
        self.push(Command::SetScissor(rect));
    }

    pub fn draw_indexed(&mut self, first_index: u32, index_count: u32, base_vertex: i32) {
        self.push(Command::DrawIndexed {
            first_index,
            index_count,
            base_vertex,
        });
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Number of indexed draws recorded.
    pub fn draw_count(&self) -> usize {
        count_draws(&self.commands)
    }
}

fn count_draws(commands: &[Command]) -> usize {
    commands
        .iter()
        .filter(|c| matches!(c, Command::DrawIndexed { .. }))
        .count()
}

/// A command buffer as it was handed to the device.
#[derive(Debug, Clone)]
pub struct Submission {
    pub label: String,
    pub commands: Vec<Command>,
}

impl Submission {
    pub fn draw_count(&self) -> usize {
        count_draws(&self.commands)
    }
}

/// Device-side sink for executed command buffers.
///
/// Buffers are replayed verbatim, in submission order.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    submissions: Vec<Submission>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn execute_command_buffer(&mut self, buffer: &CommandBuffer) {
        log::trace!(
            "Executing command buffer '{}' ({} commands)",
            buffer.name(),
            buffer.len()
        );
        self.submissions.push(Submission {
            label: buffer.name().to_string(),
            commands: buffer.commands().to_vec(),
        });
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// Submissions recorded under `label`.
    pub fn submissions_named<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Submission> {
        self.submissions.iter().filter(move |s| s.label == label)
    }

    /// Total indexed draws over all submissions.
    pub fn draw_count(&self) -> usize {
        self.submissions.iter().map(Submission::draw_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_keeps_name() {
        let mut buffer = CommandBuffer::new("overlay");
        buffer.draw_indexed(0, 6, 0);
        assert_eq!(buffer.draw_count(), 1);

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.name(), "overlay");
    }

    #[test]
    fn test_execution_replays_verbatim() {
        let mut buffer = CommandBuffer::new("overlay");
        buffer.set_viewport(0.0, 0.0, 640.0, 480.0);
        buffer.draw_indexed(0, 3, 0);
        buffer.draw_indexed(3, 3, 0);

        let mut ctx = ExecutionContext::new();
        ctx.execute_command_buffer(&buffer);

        assert_eq!(ctx.submissions().len(), 1);
        assert_eq!(ctx.submissions()[0].commands, buffer.commands());
        assert_eq!(ctx.draw_count(), 2);
        assert_eq!(ctx.submissions_named("overlay").count(), 1);
    }
}
