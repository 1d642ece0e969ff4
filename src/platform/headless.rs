//! Platform without an input source.

use std::any::Any;

use super::Platform;
use crate::gui::{IoConfig, IoState};
use crate::host::PixelRect;

/// Follows the camera viewport and otherwise reports no input.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    frames_prepared: u64,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_prepared(&self) -> u64 {
        self.frames_prepared
    }
}

impl Platform for HeadlessPlatform {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn initialize(&mut self, io: &mut IoState, config: &IoConfig, label: &str) {
        io.backend_platform_name = Some(format!("headless ({label})"));
        io.pixels_per_point = config.display_framebuffer_scale;
        io.focused = true;
    }

    fn prepare_frame(&mut self, io: &mut IoState, viewport: PixelRect) {
        io.set_viewport(viewport);
        self.frames_prepared += 1;
    }

    fn shutdown(&mut self, io: &mut IoState) {
        io.backend_platform_name = None;
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
