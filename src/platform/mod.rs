//! Input platforms
//!
//! A platform feeds input and display metrics into the GUI context once per
//! frame, before layout runs.

mod headless;
mod input;

pub use headless::HeadlessPlatform;
pub use input::WinitPlatform;

use std::any::Any;

use crate::gui::{IoConfig, IoState};
use crate::host::PixelRect;

/// Platform type selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformType {
    /// Input translated from winit window events
    #[default]
    Winit,
    /// No input; display rect taken from the camera
    Headless,
}

/// Input/display backend of a GUI context.
pub trait Platform: Send {
    fn name(&self) -> &'static str;

    fn initialize(&mut self, io: &mut IoState, config: &IoConfig, label: &str);

    /// Update `io` for the coming frame. `viewport` is the bound camera's pixel rect.
    fn prepare_frame(&mut self, io: &mut IoState, viewport: PixelRect);

    fn shutdown(&mut self, io: &mut IoState);

    /// Downcast access, e.g. to feed window events into a [`WinitPlatform`].
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Create a platform for the given type.
pub fn create_platform(platform_type: PlatformType) -> Option<Box<dyn Platform>> {
    match platform_type {
        PlatformType::Winit => Some(Box::new(WinitPlatform::new())),
        PlatformType::Headless => Some(Box::new(HeadlessPlatform::new())),
    }
}
