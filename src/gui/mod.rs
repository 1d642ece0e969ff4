//! # GUI Context
//!
//! Owns the egui state a bridge renders from.
//!
//! - [`GuiLayout`] - Trait for UI code run every frame
//! - [`GuiContext`] - egui context, IO state, textures and the current draw list
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use parking_lot::RwLock;
//! use egui_pipeline_bridge::gui::{ArcGuiLayout, GuiLayout};
//!
//! struct Stats {
//!     frames: u64,
//! }
//!
//! impl GuiLayout for Stats {
//!     fn layout(&mut self, ctx: &egui::Context) {
//!         self.frames += 1;
//!         egui::Window::new("Stats").show(ctx, |ui| {
//!             ui.label(format!("Frames: {}", self.frames));
//!         });
//!     }
//! }
//!
//! let layout: ArcGuiLayout = Arc::new(RwLock::new(Stats { frames: 0 }));
//! bridge.add_layout(layout);
//! ```

mod context;
pub mod draw_list;
pub mod io;
pub mod textures;

pub use context::GuiContext;
pub use draw_list::{DrawDataSlot, DrawList, GuiVertex};
pub use io::{BackendFlags, IoConfig, IoState};
pub use textures::{FontAtlasConfig, FontInitializer, FontSource, TextureManager};

use std::sync::Arc;

use parking_lot::RwLock;

/// UI code run by a bridge every frame.
///
/// Closures `FnMut(&egui::Context)` implement this trait.
pub trait GuiLayout: Send + Sync {
    /// Build this frame's UI.
    fn layout(&mut self, ctx: &egui::Context);

    /// Called once the bridge finished activating.
    fn on_initialize(&mut self, _ctx: &egui::Context) {}

    /// Called while the bridge deactivates, before the context is torn down.
    fn on_deinitialize(&mut self, _ctx: &egui::Context) {}
}

impl<F> GuiLayout for F
where
    F: FnMut(&egui::Context) + Send + Sync,
{
    fn layout(&mut self, ctx: &egui::Context) {
        self(ctx)
    }
}

/// Shared layout with interior mutability.
pub type ArcGuiLayout = Arc<RwLock<dyn GuiLayout>>;
