//! Recording steps shared by the built-in renderers.

use egui::{Rect, TextureId};

use crate::gui::DrawList;
use crate::host::{Command, CommandBuffer, ScissorRect, TextureKey};

const USER_TEXTURE_BIT: u64 = 1 << 63;

/// Host texture key for an egui texture id.
pub fn texture_key(id: TextureId) -> TextureKey {
    match id {
        TextureId::Managed(n) => TextureKey(n & !USER_TEXTURE_BIT),
        TextureId::User(n) => TextureKey(n | USER_TEXTURE_BIT),
    }
}

/// Convert a clip rect in points to a scissor rect in pixels, clamped to the
/// target. `None` when nothing of it is visible.
pub fn clip_to_scissor(
    clip_rect: Rect,
    pixels_per_point: f32,
    target_width: u32,
    target_height: u32,
) -> Option<ScissorRect> {
    let clip_min_x = (clip_rect.min.x * pixels_per_point).round() as i32;
    let clip_min_y = (clip_rect.min.y * pixels_per_point).round() as i32;
    let clip_max_x = (clip_rect.max.x * pixels_per_point).round() as i32;
    let clip_max_y = (clip_rect.max.y * pixels_per_point).round() as i32;

    let x = clip_min_x.clamp(0, target_width as i32) as u32;
    let y = clip_min_y.clamp(0, target_height as i32) as u32;
    let max_x = clip_max_x.clamp(0, target_width as i32) as u32;
    let max_y = clip_max_y.clamp(0, target_height as i32) as u32;

    let width = max_x.saturating_sub(x);
    let height = max_y.saturating_sub(y);
    (width > 0 && height > 0).then_some(ScissorRect {
        x,
        y,
        width,
        height,
    })
}

/// Target size in whole pixels, or `None` for a degenerate target.
pub fn target_size(list: &DrawList) -> Option<(u32, u32)> {
    let width = list.screen_size_px.x.round();
    let height = list.screen_size_px.y.round();
    (width >= 1.0 && height >= 1.0).then_some((width as u32, height as u32))
}

/// Viewport, shader and texture uploads recorded before any draw.
pub fn begin_draw_lists(cmd: &mut CommandBuffer, list: &DrawList, shader: &str, size: (u32, u32)) {
    cmd.set_viewport(0.0, 0.0, size.0 as f32, size.1 as f32);
    cmd.push(Command::BindShader(shader.to_string()));
    for (id, delta) in &list.textures_delta.set {
        cmd.push(Command::UpdateTexture {
            texture: texture_key(*id),
            size: delta.image.size(),
            offset: delta.pos,
        });
    }
}

/// Texture frees recorded after every draw of the frame.
pub fn end_draw_lists(cmd: &mut CommandBuffer, list: &DrawList) {
    for id in &list.textures_delta.free {
        cmd.push(Command::FreeTexture(texture_key(*id)));
    }
}
