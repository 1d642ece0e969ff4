//! Bridges keyed by owning session

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{Bridge, FrameStatus};
use crate::error::{BridgeError, BridgeResult};
use crate::gui::ArcGuiLayout;
use crate::host::RenderHost;
use crate::BridgeConfig;

/// Identifier of the session owning a bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// Layouts shared by every bridge with `do_global_events` set
pub type SharedLayouts = Arc<RwLock<Vec<ArcGuiLayout>>>;

/// At most one bridge per session.
#[derive(Default)]
pub struct BridgeRegistry {
    bridges: BTreeMap<SessionId, Bridge>,
    global_layouts: SharedLayouts,
}

impl BridgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bridge` for `session`. A session already holding a bridge is rejected.
    pub fn insert(&mut self, session: SessionId, mut bridge: Bridge) -> BridgeResult<&mut Bridge> {
        if self.bridges.contains_key(&session) {
            return Err(BridgeError::configuration(format!(
                "session {:?} already has a GUI bridge",
                session
            )));
        }
        if bridge.config().do_global_events {
            bridge.attach_global_layouts(self.global_layouts.clone());
        }
        Ok(self.bridges.entry(session).or_insert(bridge))
    }

    /// Create and register a bridge for `session`.
    pub fn create(&mut self, session: SessionId, config: BridgeConfig) -> BridgeResult<&mut Bridge> {
        self.insert(session, Bridge::new(config))
    }

    pub fn get(&self, session: SessionId) -> Option<&Bridge> {
        self.bridges.get(&session)
    }

    pub fn get_mut(&mut self, session: SessionId) -> Option<&mut Bridge> {
        self.bridges.get_mut(&session)
    }

    pub fn contains(&self, session: SessionId) -> bool {
        self.bridges.contains_key(&session)
    }

    pub fn len(&self) -> usize {
        self.bridges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bridges.is_empty()
    }

    pub fn sessions(&self) -> impl Iterator<Item = SessionId> + '_ {
        self.bridges.keys().copied()
    }

    /// Add a layout run by every bridge configured for global events.
    pub fn add_global_layout(&mut self, layout: ArcGuiLayout) {
        self.global_layouts.write().push(layout);
    }

    /// Tick every bridge, in session order.
    pub fn tick_all(&mut self, host: &mut RenderHost, delta_time: f32) -> Vec<(SessionId, FrameStatus)> {
        self.bridges
            .iter_mut()
            .map(|(session, bridge)| (*session, bridge.tick(host, delta_time)))
            .collect()
    }

    /// Deactivate and unregister the bridge of `session`.
    pub fn remove(&mut self, session: SessionId, host: &mut RenderHost) -> Option<Bridge> {
        let mut bridge = self.bridges.remove(&session)?;
        bridge.deactivate(host);
        Some(bridge)
    }

    /// Destroy every bridge.
    pub fn clear(&mut self, host: &mut RenderHost) {
        for (_, bridge) in std::mem::take(&mut self.bridges) {
            bridge.destroy(host);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Camera, GraphicsSettings};
    use crate::platform::PlatformType;

    fn config(global: bool) -> BridgeConfig {
        BridgeConfig {
            platform: PlatformType::Headless,
            do_global_events: global,
            ..Default::default()
        }
    }

    #[test]
    fn test_one_bridge_per_session() {
        let mut registry = BridgeRegistry::new();
        registry.create(SessionId(1), config(false)).unwrap();
        assert!(matches!(
            registry.create(SessionId(1), config(false)),
            Err(BridgeError::Configuration(_))
        ));
        registry.create(SessionId(2), config(false)).unwrap();
        assert_eq!(registry.sessions().collect::<Vec<_>>(), [SessionId(1), SessionId(2)]);
    }

    #[test]
    fn test_global_layouts_only_for_opted_in_bridges() {
        let mut host = RenderHost::new(GraphicsSettings::legacy());
        host.cameras_mut()
            .spawn(Camera::new("main", 320.0, 240.0).with_main(true));

        let mut registry = BridgeRegistry::new();
        let calls = Arc::new(RwLock::new(0u32));
        let counter = calls.clone();
        registry.add_global_layout(Arc::new(RwLock::new(move |_: &egui::Context| {
            *counter.write() += 1;
        })));

        registry.create(SessionId(1), config(true)).unwrap();
        registry.create(SessionId(2), config(false)).unwrap();
        for session in [SessionId(1), SessionId(2)] {
            registry.get_mut(session).unwrap().activate(&mut host).unwrap();
        }

        let statuses = registry.tick_all(&mut host, 0.016);
        assert!(statuses.iter().all(|(_, s)| *s == FrameStatus::Rendered));
        assert_eq!(*calls.read(), 1);
    }

    #[test]
    fn test_remove_deactivates() {
        let mut host = RenderHost::new(GraphicsSettings::legacy());
        let camera = host
            .cameras_mut()
            .spawn(Camera::new("main", 320.0, 240.0).with_main(true));

        let mut registry = BridgeRegistry::new();
        registry
            .create(SessionId(7), config(false))
            .unwrap()
            .activate(&mut host)
            .unwrap();
        assert_eq!(host.cameras().get(camera).unwrap().attachment_count(), 1);

        let bridge = registry.remove(SessionId(7), &mut host).unwrap();
        assert!(!bridge.is_active());
        assert!(registry.is_empty());
        assert_eq!(host.cameras().get(camera).unwrap().attachment_count(), 0);
    }
}
