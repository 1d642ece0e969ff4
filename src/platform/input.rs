//! Winit input platform.
//!
//! Translates winit events into egui events and hands them to the GUI context
//! at the start of each frame.

use std::any::Any;

use egui::{Key, Modifiers, PointerButton, Pos2, Vec2};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use super::Platform;
use crate::gui::{BackendFlags, IoConfig, IoState};
use crate::host::PixelRect;

/// Points scrolled per wheel line.
const LINE_SCROLL_POINTS: f32 = 24.0;

/// Input platform fed from a winit event loop.
pub struct WinitPlatform {
    label: Option<String>,
    /// Pointer position in points.
    pub mouse_pos: Pos2,
    /// Scroll accumulated since the last frame.
    pub scroll_delta: Vec2,
    pub modifiers: Modifiers,
    pub pixels_per_point: f32,
    focused: bool,
    /// Events collected since the last frame.
    events: Vec<egui::Event>,
}

impl WinitPlatform {
    pub fn new() -> Self {
        Self {
            label: None,
            mouse_pos: Pos2::ZERO,
            scroll_delta: Vec2::ZERO,
            modifiers: Modifiers::default(),
            pixels_per_point: 1.0,
            focused: true,
            events: Vec::new(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Events waiting for the next frame.
    pub fn pending_events(&self) -> &[egui::Event] {
        &self.events
    }

    /// Feed a window event. Returns `true` if it was translated.
    pub fn on_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.on_mouse_move(position.x, position.y);
            }
            WindowEvent::CursorLeft { .. } => {
                self.events.push(egui::Event::PointerGone);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.on_mouse_button(*button, *state == ElementState::Pressed);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.on_mouse_scroll(*delta);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.on_modifiers_changed(modifiers.state());
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let pressed = event.state.is_pressed();
                self.on_key(event.physical_key, pressed, event.repeat);
                if pressed {
                    if let Some(text) = &event.text {
                        self.on_text_input(text.as_str());
                    }
                }
            }
            WindowEvent::Focused(focused) => {
                self.on_focus(*focused);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.pixels_per_point = *scale_factor as f32;
            }
            _ => return false,
        }
        true
    }

    /// `x`, `y` in physical pixels.
    pub fn on_mouse_move(&mut self, x: f64, y: f64) {
        let pos = Pos2::new(
            x as f32 / self.pixels_per_point,
            y as f32 / self.pixels_per_point,
        );
        self.mouse_pos = pos;
        self.events.push(egui::Event::PointerMoved(pos));
    }

    /// Buttons beyond back/forward are ignored.
    pub fn on_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        let egui_button = match button {
            MouseButton::Left => Some(PointerButton::Primary),
            MouseButton::Right => Some(PointerButton::Secondary),
            MouseButton::Middle => Some(PointerButton::Middle),
            MouseButton::Back => Some(PointerButton::Extra1),
            MouseButton::Forward => Some(PointerButton::Extra2),
            MouseButton::Other(_) => None,
        };

        if let Some(button) = egui_button {
            self.events.push(egui::Event::PointerButton {
                pos: self.mouse_pos,
                button,
                pressed,
                modifiers: self.modifiers,
            });
        }
    }

    pub fn on_mouse_scroll(&mut self, delta: MouseScrollDelta) {
        let delta = match delta {
            MouseScrollDelta::LineDelta(x, y) => {
                Vec2::new(x * LINE_SCROLL_POINTS, y * LINE_SCROLL_POINTS)
            }
            MouseScrollDelta::PixelDelta(pos) => Vec2::new(
                pos.x as f32 / self.pixels_per_point,
                pos.y as f32 / self.pixels_per_point,
            ),
        };

        self.scroll_delta += delta;
        self.events.push(egui::Event::MouseWheel {
            unit: egui::MouseWheelUnit::Point,
            delta,
            modifiers: self.modifiers,
        });
    }

    pub fn on_modifiers_changed(&mut self, state: ModifiersState) {
        self.modifiers = Modifiers {
            alt: state.alt_key(),
            ctrl: state.control_key(),
            shift: state.shift_key(),
            mac_cmd: cfg!(target_os = "macos") && state.super_key(),
            command: if cfg!(target_os = "macos") {
                state.super_key()
            } else {
                state.control_key()
            },
        };
    }

    /// Handle key event. Copy and cut shortcuts also emit their egui commands.
    pub fn on_key(&mut self, physical_key: PhysicalKey, pressed: bool, repeat: bool) {
        let PhysicalKey::Code(keycode) = physical_key else {
            return;
        };
        let Some(key) = translate_keycode(keycode) else {
            return;
        };

        self.events.push(egui::Event::Key {
            key,
            physical_key: Some(key),
            pressed,
            repeat,
            modifiers: self.modifiers,
        });

        if pressed && self.modifiers.command {
            match key {
                Key::C => self.events.push(egui::Event::Copy),
                Key::X => self.events.push(egui::Event::Cut),
                _ => {}
            }
        }
    }

    /// Handle text input. Control characters other than newline and tab are dropped.
    pub fn on_text_input(&mut self, text: &str) {
        let filtered: String = text
            .chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .collect();
        if !filtered.is_empty() {
            self.events.push(egui::Event::Text(filtered));
        }
    }

    pub fn on_focus(&mut self, focused: bool) {
        self.focused = focused;
        self.events.push(egui::Event::WindowFocused(focused));
    }
}

impl Default for WinitPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for WinitPlatform {
    fn name(&self) -> &'static str {
        "winit"
    }

    fn initialize(&mut self, io: &mut IoState, config: &IoConfig, label: &str) {
        self.label = Some(label.to_string());
        self.pixels_per_point = config.display_framebuffer_scale;
        io.backend_platform_name = Some(format!("winit ({label})"));
        io.backend_flags |= BackendFlags::PLATFORM_HAS_KEYBOARD | BackendFlags::PLATFORM_HAS_POINTER;
    }

    fn prepare_frame(&mut self, io: &mut IoState, viewport: PixelRect) {
        io.set_viewport(viewport);
        io.pixels_per_point = self.pixels_per_point;
        io.modifiers = self.modifiers;
        io.focused = self.focused;
        io.events.append(&mut self.events);
        self.scroll_delta = Vec2::ZERO;
    }

    fn shutdown(&mut self, io: &mut IoState) {
        io.backend_platform_name = None;
        io.backend_flags
            .remove(BackendFlags::PLATFORM_HAS_KEYBOARD | BackendFlags::PLATFORM_HAS_POINTER);
        self.events.clear();
        self.label = None;
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Keys egui has no name for map to `None`.
fn translate_keycode(keycode: KeyCode) -> Option<Key> {
    use KeyCode as K;

    let key = match keycode {
        K::ArrowDown => Key::ArrowDown,
        K::ArrowLeft => Key::ArrowLeft,
        K::ArrowRight => Key::ArrowRight,
        K::ArrowUp => Key::ArrowUp,
        K::Home => Key::Home,
        K::End => Key::End,
        K::PageUp => Key::PageUp,
        K::PageDown => Key::PageDown,

        K::Escape => Key::Escape,
        K::Tab => Key::Tab,
        K::Backspace => Key::Backspace,
        K::Enter | K::NumpadEnter => Key::Enter,
        K::Space => Key::Space,
        K::Insert => Key::Insert,
        K::Delete => Key::Delete,
        K::Minus | K::NumpadSubtract => Key::Minus,
        K::Equal => Key::Equals,
        K::NumpadAdd => Key::Plus,

        K::Digit0 | K::Numpad0 => Key::Num0,
        K::Digit1 | K::Numpad1 => Key::Num1,
        K::Digit2 | K::Numpad2 => Key::Num2,
        K::Digit3 | K::Numpad3 => Key::Num3,
        K::Digit4 | K::Numpad4 => Key::Num4,
        K::Digit5 | K::Numpad5 => Key::Num5,
        K::Digit6 | K::Numpad6 => Key::Num6,
        K::Digit7 | K::Numpad7 => Key::Num7,
        K::Digit8 | K::Numpad8 => Key::Num8,
        K::Digit9 | K::Numpad9 => Key::Num9,

        K::KeyA => Key::A,
        K::KeyB => Key::B,
        K::KeyC => Key::C,
        K::KeyD => Key::D,
        K::KeyE => Key::E,
        K::KeyF => Key::F,
        K::KeyG => Key::G,
        K::KeyH => Key::H,
        K::KeyI => Key::I,
        K::KeyJ => Key::J,
        K::KeyK => Key::K,
        K::KeyL => Key::L,
        K::KeyM => Key::M,
        K::KeyN => Key::N,
        K::KeyO => Key::O,
        K::KeyP => Key::P,
        K::KeyQ => Key::Q,
        K::KeyR => Key::R,
        K::KeyS => Key::S,
        K::KeyT => Key::T,
        K::KeyU => Key::U,
        K::KeyV => Key::V,
        K::KeyW => Key::W,
        K::KeyX => Key::X,
        K::KeyY => Key::Y,
        K::KeyZ => Key::Z,

        K::F1 => Key::F1,
        K::F2 => Key::F2,
        K::F3 => Key::F3,
        K::F4 => Key::F4,
        K::F5 => Key::F5,
        K::F6 => Key::F6,
        K::F7 => Key::F7,
        K::F8 => Key::F8,
        K::F9 => Key::F9,
        K::F10 => Key::F10,
        K::F11 => Key::F11,
        K::F12 => Key::F12,

        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_move_scales_to_points() {
        let mut platform = WinitPlatform::new();
        platform.pixels_per_point = 2.0;
        platform.on_mouse_move(100.0, 50.0);

        assert_eq!(platform.mouse_pos, Pos2::new(50.0, 25.0));
        assert!(matches!(
            platform.pending_events()[0],
            egui::Event::PointerMoved(pos) if pos == Pos2::new(50.0, 25.0)
        ));
    }

    #[test]
    fn test_copy_shortcut() {
        let mut platform = WinitPlatform::new();
        platform.on_modifiers_changed(if cfg!(target_os = "macos") {
            ModifiersState::SUPER
        } else {
            ModifiersState::CONTROL
        });
        platform.on_key(PhysicalKey::Code(KeyCode::KeyC), true, false);

        let events = platform.pending_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], egui::Event::Copy));
    }

    #[test]
    fn test_numpad_keys_share_main_row_keys() {
        assert_eq!(translate_keycode(KeyCode::NumpadEnter), Some(Key::Enter));
        assert_eq!(translate_keycode(KeyCode::Numpad7), Some(Key::Num7));
        assert_eq!(translate_keycode(KeyCode::NumpadAdd), Some(Key::Plus));
        assert_eq!(translate_keycode(KeyCode::F12), Some(Key::F12));
        assert_eq!(translate_keycode(KeyCode::NumLock), None);
    }

    #[test]
    fn test_unmapped_keys_and_control_text_are_dropped() {
        let mut platform = WinitPlatform::new();
        platform.on_key(PhysicalKey::Code(KeyCode::CapsLock), true, false);
        platform.on_text_input("\u{7f}");
        platform.on_mouse_button(MouseButton::Other(9), true);

        assert!(platform.pending_events().is_empty());
    }

    #[test]
    fn test_prepare_frame_moves_events_into_io() {
        let mut platform = WinitPlatform::new();
        let mut io = IoState::default();
        platform.initialize(&mut io, &IoConfig::default(), "game");
        platform.on_text_input("hi");
        platform.on_mouse_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));

        platform.prepare_frame(&mut io, PixelRect::new(0.0, 0.0, 320.0, 200.0));

        assert_eq!(io.events.len(), 2);
        assert!(platform.pending_events().is_empty());
        assert_eq!(platform.scroll_delta, Vec2::ZERO);
        assert!(io.backend_flags.contains(BackendFlags::PLATFORM_HAS_POINTER));

        platform.shutdown(&mut io);
        assert!(io.backend_platform_name.is_none());
        assert!(io.backend_flags.is_empty());
    }
}
