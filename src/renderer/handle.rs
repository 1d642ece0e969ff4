//! Indirection slot between registered passes and the current renderer.

use std::sync::Arc;

use parking_lot::RwLock;

use super::Renderer;
use crate::gui::DrawList;
use crate::host::CommandBuffer;

/// Shared slot holding zero or one renderer.
///
/// Passes registered with the host keep a clone of the handle. Swapping the
/// renderer only replaces the slot's contents, so every clone observes the new
/// renderer without re-registering. The lock keeps a swap from being observed
/// half done by a pass running on another thread.
#[derive(Clone, Default)]
pub struct RendererHandle {
    slot: Arc<RwLock<Option<Box<dyn Renderer>>>>,
}

impl RendererHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `renderer` in the slot and return the previous one.
    pub(crate) fn set(&self, renderer: Box<dyn Renderer>) -> Option<Box<dyn Renderer>> {
        self.slot.write().replace(renderer)
    }

    pub(crate) fn take(&self) -> Option<Box<dyn Renderer>> {
        self.slot.write().take()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.read().is_none()
    }

    /// Name of the current renderer
    pub fn name(&self) -> Option<&'static str> {
        self.slot.read().as_ref().map(|r| r.name())
    }

    /// Run `f` on the current renderer, if any.
    pub fn with<R>(&self, f: impl FnOnce(&mut dyn Renderer) -> R) -> Option<R> {
        let mut slot = self.slot.write();
        let renderer = slot.as_mut()?;
        Some(f(renderer.as_mut()))
    }

    /// Forward a draw list to the current renderer. Returns `false` when the
    /// slot is empty and nothing was recorded.
    pub fn render(&self, cmd: &mut CommandBuffer, list: &DrawList) -> bool {
        self.with(|renderer| renderer.render_draw_lists(cmd, list))
            .is_some()
    }

    /// Whether both handles share one slot
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl std::fmt::Debug for RendererHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererHandle")
            .field("renderer", &self.name())
            .finish()
    }
}
