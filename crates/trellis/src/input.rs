//! Backend-agnostic frame input
//!
//! Windowing adapters push raw events into [`FrameInput`] between frames; the
//! context consumes one sample per frame from it.

use glam::Vec2;

/// Backend-agnostic named key representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Backspace,
    Tab,
    Enter,
    Escape,
    End,
    Home,
    Left,
    Up,
    Right,
    Down,
    Delete,
    /// Shift key (left or right)
    Shift,
    /// Control key (left or right)
    Control,
}

/// Key delivered to the focused control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Named(NamedKey),
    /// Any other virtual key code. Letters use their uppercase ASCII code.
    Code(u32),
}

impl Key {
    /// Map a virtual key code, naming the ones the core handles
    pub fn from_code(code: u32) -> Self {
        let named = match code {
            0x08 => NamedKey::Backspace,
            0x09 => NamedKey::Tab,
            0x0D => NamedKey::Enter,
            0x1B => NamedKey::Escape,
            0x23 => NamedKey::End,
            0x24 => NamedKey::Home,
            0x25 => NamedKey::Left,
            0x26 => NamedKey::Up,
            0x27 => NamedKey::Right,
            0x28 => NamedKey::Down,
            0x2E => NamedKey::Delete,
            0x10 => NamedKey::Shift,
            0x11 => NamedKey::Control,
            _ => return Key::Code(code),
        };
        Key::Named(named)
    }

    /// Key for a letter, matched case-insensitively
    pub fn letter(letter: char) -> Self {
        Key::Code(letter.to_ascii_uppercase() as u32)
    }
}

impl From<NamedKey> for Key {
    fn from(named: NamedKey) -> Self {
        Key::Named(named)
    }
}

/// Modifier keys held while a key was pressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

/// Input accumulated between two frames
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Current cursor position in window coordinates, if known
    pub cursor_position: Option<Vec2>,

    /// Whether the primary button is currently held down
    pub mouse_down: bool,

    /// Set when the button went down this frame, even if it was released again
    pub just_pressed: bool,

    /// Characters typed this frame, in arrival order
    pub characters: Vec<char>,

    /// Keys pressed this frame, in arrival order
    pub keys: Vec<Key>,

    pub modifiers: Modifiers,

    /// Latest surface size reported this frame
    pub resized: Option<Vec2>,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call after the context consumed the frame to clear per-frame state
    pub fn begin_frame(&mut self) {
        self.just_pressed = false;
        self.characters.clear();
        self.keys.clear();
        self.resized = None;
    }

    pub fn press_button(&mut self) {
        self.mouse_down = true;
        self.just_pressed = true;
    }

    pub fn release_button(&mut self) {
        self.mouse_down = false;
    }

    /// Button state to report for this frame.
    ///
    /// A press and release landing inside one frame still report one down frame.
    pub fn frame_mouse_down(&self) -> bool {
        self.mouse_down || self.just_pressed
    }

    pub fn press_key(&mut self, key: Key) {
        match key {
            Key::Named(NamedKey::Shift) => self.modifiers.shift = true,
            Key::Named(NamedKey::Control) => self.modifiers.ctrl = true,
            _ => {}
        }
        self.keys.push(key);
    }

    pub fn release_key(&mut self, key: Key) {
        match key {
            Key::Named(NamedKey::Shift) => self.modifiers.shift = false,
            Key::Named(NamedKey::Control) => self.modifiers.ctrl = false,
            _ => {}
        }
    }

    pub fn type_character(&mut self, ch: char) {
        self.characters.push(ch);
    }

    pub fn set_cursor_position(&mut self, position: Option<Vec2>) {
        self.cursor_position = position;
    }

    pub fn resize(&mut self, size: Vec2) {
        self.resized = Some(size);
    }
}
