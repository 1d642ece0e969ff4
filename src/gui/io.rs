//! Input/output state shared between the GUI context and its backends.

use bitflags::bitflags;
use egui::{Modifiers, Pos2, RawInput, Rect, Vec2};

use crate::host::PixelRect;

bitflags! {
    /// Capabilities advertised by the active renderer and platform backends.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BackendFlags: u32 {
        /// Renderer honours per-draw base vertex offsets.
        const RENDERER_HAS_VTX_OFFSET = 1 << 0;
        /// Platform forwards text and key input.
        const PLATFORM_HAS_KEYBOARD = 1 << 1;
        /// Platform forwards pointer input.
        const PLATFORM_HAS_POINTER = 1 << 2;
    }
}

/// Initial GUI configuration applied on activation.
#[derive(Debug, Clone, PartialEq)]
pub struct IoConfig {
    /// Seconds between clicks that still count as a double click.
    pub double_click_time: f64,
    /// Maximum pointer travel (points) for a press to count as a click.
    pub double_click_max_dist: f32,
    /// Maximum press duration (seconds) for a click.
    pub click_max_duration: f64,
    /// Global zoom applied to all text and widgets.
    pub font_global_scale: f32,
    /// Allow ctrl +/- zooming.
    pub font_allow_user_scaling: bool,
    /// Framebuffer pixels per point.
    pub display_framebuffer_scale: f32,
    pub text_cursor_blink: bool,
    /// Allow resizing windows from any edge.
    pub resize_from_edges: bool,
    /// Only show tooltips once the pointer is still.
    pub tooltips_when_still: bool,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            double_click_time: 0.30,
            double_click_max_dist: 6.0,
            click_max_duration: 0.8,
            font_global_scale: 1.0,
            font_allow_user_scaling: false,
            display_framebuffer_scale: 1.0,
            text_cursor_blink: false,
            resize_from_edges: true,
            tooltips_when_still: true,
        }
    }
}

impl IoConfig {
    /// Apply to an egui context.
    pub fn apply_to(&self, ctx: &egui::Context) {
        ctx.set_zoom_factor(self.font_global_scale);
        ctx.options_mut(|options| {
            options.zoom_with_keyboard = self.font_allow_user_scaling;
            options.input_options.max_double_click_delay = self.double_click_time;
            options.input_options.max_click_dist = self.double_click_max_dist;
            options.input_options.max_click_duration = self.click_max_duration;
        });
        ctx.style_mut(|style| {
            style.visuals.text_cursor.blink = self.text_cursor_blink;
            style.interaction.show_tooltips_only_when_still = self.tooltips_when_still;
            if !self.resize_from_edges {
                style.interaction.resize_grab_radius_side = 0.0;
                style.interaction.resize_grab_radius_corner = 0.0;
            }
        });
    }
}

/// Per-context IO state that backends read and write.
#[derive(Debug, Clone)]
pub struct IoState {
    pub backend_renderer_name: Option<String>,
    pub backend_platform_name: Option<String>,
    pub backend_flags: BackendFlags,
    /// Display rectangle in pixels.
    pub display_rect: Rect,
    pub pixels_per_point: f32,
    /// Seconds since the context started.
    pub time: f64,
    pub delta_time: f32,
    pub modifiers: Modifiers,
    pub focused: bool,
    /// Input events queued for the next frame.
    pub events: Vec<egui::Event>,
}

impl Default for IoState {
    fn default() -> Self {
        Self {
            backend_renderer_name: None,
            backend_platform_name: None,
            backend_flags: BackendFlags::empty(),
            display_rect: Rect::from_min_size(Pos2::ZERO, Vec2::new(1280.0, 720.0)),
            pixels_per_point: 1.0,
            time: 0.0,
            delta_time: 1.0 / 60.0,
            modifiers: Modifiers::default(),
            focused: true,
            events: Vec::new(),
        }
    }
}

impl IoState {
    /// Take the display rect from a camera viewport.
    pub fn set_viewport(&mut self, viewport: PixelRect) {
        self.display_rect = Rect::from_min_size(
            Pos2::new(viewport.x, viewport.y),
            Vec2::new(viewport.width, viewport.height),
        );
    }

    /// Display size in points.
    pub fn screen_rect_points(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, self.display_rect.size() / self.pixels_per_point)
    }

    /// Advance time and drain queued events into egui's raw input.
    pub fn take_raw_input(&mut self, delta_time: f32) -> RawInput {
        self.delta_time = delta_time;
        self.time += f64::from(delta_time);

        let mut viewports = egui::viewport::ViewportIdMap::default();
        viewports.insert(
            egui::ViewportId::ROOT,
            egui::ViewportInfo {
                native_pixels_per_point: Some(self.pixels_per_point),
                focused: Some(self.focused),
                ..Default::default()
            },
        );

        RawInput {
            viewport_id: egui::ViewportId::ROOT,
            viewports,
            screen_rect: Some(self.screen_rect_points()),
            max_texture_side: Some(8192),
            time: Some(self.time),
            predicted_dt: delta_time,
            modifiers: self.modifiers,
            events: std::mem::take(&mut self.events),
            focused: self.focused,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_raw_input_drains_events() {
        let mut io = IoState {
            display_rect: Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
            pixels_per_point: 2.0,
            ..Default::default()
        };
        io.events.push(egui::Event::PointerGone);

        let raw = io.take_raw_input(0.5);
        assert_eq!(raw.events.len(), 1);
        assert_eq!(raw.screen_rect.unwrap().size(), Vec2::new(400.0, 300.0));
        assert_eq!(raw.time, Some(0.5));
        assert!(io.events.is_empty());
    }

    #[test]
    fn test_set_viewport() {
        let mut io = IoState::default();
        io.set_viewport(PixelRect::new(10.0, 20.0, 100.0, 50.0));
        assert_eq!(io.display_rect.min, Pos2::new(10.0, 20.0));
        assert_eq!(io.display_rect.max, Pos2::new(110.0, 70.0));
    }

    #[test]
    fn test_apply_config() {
        let ctx = egui::Context::default();
        let config = IoConfig {
            font_allow_user_scaling: true,
            double_click_time: 0.5,
            ..Default::default()
        };
        config.apply_to(&ctx);

        assert!(ctx.options(|o| o.zoom_with_keyboard));
        assert_eq!(ctx.options(|o| o.input_options.max_double_click_delay), 0.5);
    }
}
