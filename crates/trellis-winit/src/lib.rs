//! Winit input adapter for trellis
//!
//! Converts winit window events into trellis' backend-agnostic [`FrameInput`].
//! Feed every [`WindowEvent`] through [`WinitInputExt::handle_winit_event`] and
//! hand the accumulated input to `UiContext::update_from_input` once per frame.

use trellis::{FrameInput, Key, Modifiers, NamedKey, Vec2};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::Key as WinitKey;

/// Extension trait for [`FrameInput`] to handle winit events
pub trait WinitInputExt {
    /// Process a winit WindowEvent and update the pending frame input
    fn handle_winit_event(&mut self, event: &WindowEvent);
}

impl WinitInputExt for FrameInput {
    fn handle_winit_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.set_cursor_position(Some(Vec2::new(position.x as f32, position.y as f32)));
            }
            WindowEvent::CursorLeft { .. } => {
                self.set_cursor_position(None);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.press_button(),
                ElementState::Released => self.release_button(),
            },
            WindowEvent::KeyboardInput { event, .. } => match event.state {
                ElementState::Pressed => {
                    if let Some(key) = convert_key(&event.logical_key) {
                        self.press_key(key);
                    }

                    // Ctrl+letter is a shortcut, not text
                    let text = event.text.as_deref().unwrap_or_default();
                    for ch in text.chars() {
                        let is_shortcut = self.modifiers.ctrl && ch.is_alphabetic();
                        if !ch.is_control() && !is_shortcut {
                            self.type_character(ch);
                        }
                    }
                }
                ElementState::Released => {
                    if let Some(key) = convert_key(&event.logical_key) {
                        self.release_key(key);
                    }
                }
            },
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = convert_modifiers(modifiers.state());
            }
            WindowEvent::Resized(size) => {
                self.resize(Vec2::new(size.width as f32, size.height as f32));
            }
            _ => {}
        }
    }
}

/// Convert a winit logical key, `None` for keys trellis has no use for
pub fn convert_key(key: &WinitKey) -> Option<Key> {
    match key {
        WinitKey::Named(named) => convert_named_key(named),
        WinitKey::Character(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) if ch.is_ascii_alphabetic() => Some(Key::letter(ch)),
                (Some(ch), None) => Some(Key::Code(ch as u32)),
                _ => None,
            }
        }
        _ => None,
    }
}

pub fn convert_named_key(key: &winit::keyboard::NamedKey) -> Option<Key> {
    use winit::keyboard::NamedKey as WN;

    let named = match key {
        WN::Backspace => NamedKey::Backspace,
        WN::Tab => NamedKey::Tab,
        WN::Enter => NamedKey::Enter,
        WN::Escape => NamedKey::Escape,
        WN::End => NamedKey::End,
        WN::Home => NamedKey::Home,
        WN::ArrowLeft => NamedKey::Left,
        WN::ArrowUp => NamedKey::Up,
        WN::ArrowRight => NamedKey::Right,
        WN::ArrowDown => NamedKey::Down,
        WN::Delete => NamedKey::Delete,
        WN::Shift => NamedKey::Shift,
        WN::Control => NamedKey::Control,
        WN::Space => return Some(Key::Code(' ' as u32)),
        _ => return None,
    };
    Some(Key::Named(named))
}

pub fn convert_modifiers(state: winit::keyboard::ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        ctrl: state.control_key(),
    }
}
