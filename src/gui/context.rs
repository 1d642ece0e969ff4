//! Per-bridge GUI context and its frame loop.

use std::sync::Arc;

use egui::{Context, Style};

use super::draw_list::{DrawDataSlot, DrawList};
use super::io::{IoConfig, IoState};
use super::textures::TextureManager;
use super::ArcGuiLayout;
use crate::host::PixelRect;
use crate::platform::Platform;

/// The egui context owned by one bridge.
///
/// Created with the bridge and dropped with it; never shared between bridges.
pub struct GuiContext {
    ctx: Context,
    io: IoState,
    textures: TextureManager,
    draw_data: DrawDataSlot,
    frame: u64,
    /// Whether egui wants keyboard input this frame.
    pub wants_keyboard_input: bool,
    /// Whether egui wants pointer input this frame.
    pub wants_pointer_input: bool,
}

impl GuiContext {
    pub fn new() -> Self {
        Self {
            ctx: Context::default(),
            io: IoState::default(),
            textures: TextureManager::new(),
            draw_data: DrawDataSlot::new(),
            frame: 0,
            wants_keyboard_input: false,
            wants_pointer_input: false,
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn io(&self) -> &IoState {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut IoState {
        &mut self.io
    }

    pub fn textures(&self) -> &TextureManager {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureManager {
        &mut self.textures
    }

    /// Split borrow for calls that need both the context and the texture manager.
    pub(crate) fn parts_mut(&mut self) -> (&Context, &mut IoState, &mut TextureManager) {
        (&self.ctx, &mut self.io, &mut self.textures)
    }

    /// Slot holding the current frame's draw list
    pub fn draw_data(&self) -> &DrawDataSlot {
        &self.draw_data
    }

    /// Frames run so far
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Apply initial IO configuration and, if given, a style.
    pub fn configure(&mut self, config: &IoConfig, style: Option<&Style>) {
        if let Some(style) = style {
            self.ctx.set_style(style.clone());
        }
        config.apply_to(&self.ctx);
        self.io.pixels_per_point = config.display_framebuffer_scale;
    }

    /// Run one GUI frame and publish its draw list.
    ///
    /// The slot is cleared first, so a failure mid-frame never leaves a stale
    /// list behind.
    pub fn run_frame(
        &mut self,
        delta_time: f32,
        viewport: PixelRect,
        platform: &mut dyn Platform,
        layouts: &[ArcGuiLayout],
    ) -> Arc<DrawList> {
        crate::profile_scope!("gui_frame");

        self.draw_data.clear();
        self.textures.prepare_frame(&self.io);
        platform.prepare_frame(&mut self.io, viewport);

        let raw_input = self.io.take_raw_input(delta_time);
        self.ctx.begin_pass(raw_input);
        {
            crate::profile_scope!("gui_layout");
            for layout in layouts {
                layout.write().layout(&self.ctx);
            }
        }
        let output = self.ctx.end_pass();

        self.wants_keyboard_input = self.ctx.wants_keyboard_input();
        self.wants_pointer_input = self.ctx.wants_pointer_input();
        self.textures.track_delta(&output.textures_delta);

        let primitives = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        self.frame += 1;

        let size = self.io.display_rect.size();
        let list = DrawList {
            frame: self.frame,
            pixels_per_point: output.pixels_per_point,
            screen_size_px: glam::Vec2::new(size.x, size.y),
            primitives,
            textures_delta: output.textures_delta,
        };
        log::trace!(
            "GUI frame {}: {} meshes, {} vertices",
            list.frame,
            list.mesh_count(),
            list.vertex_count()
        );
        self.draw_data.publish(list)
    }

    /// Forget the published draw list and any input queued for the next frame.
    pub fn reset_frame_state(&mut self) {
        self.draw_data.clear();
        self.io.events.clear();
        self.wants_keyboard_input = false;
        self.wants_pointer_input = false;
    }
}

impl Default for GuiContext {
    fn default() -> Self {
        Self::new()
    }
}
