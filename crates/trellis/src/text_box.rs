//! Single-line text editing state
//!
//! Offsets are byte offsets into the UTF-8 text and always sit on a char
//! boundary. Mouse placement goes through the caret solver registered for the
//! text box's style; keys and typed characters arrive from the focus owner.

use std::time::{Duration, Instant};

use crate::input::{Key, Modifiers, NamedKey};
use crate::property::{LoadProperties, PropertySet};

const DEFAULT_BLINK_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Clone, Debug)]
pub struct TextBox {
    text: String,
    cursor: usize,
    selection: Option<(usize, usize)>,
    /// Fixed end of the selection while extending it
    anchor: usize,
    is_selecting: bool,
    is_focused: bool,
    is_text_changed: bool,
    cursor_time: Instant,
    pub blink_interval: Duration,
    /// Only accept digits, `-` and `.`, and reformat the text on commit
    pub is_numerical: bool,
    pub decimal_precision: usize,
}

impl Default for TextBox {
    fn default() -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            selection: None,
            anchor: 0,
            is_selecting: false,
            is_focused: false,
            is_text_changed: false,
            cursor_time: Instant::now(),
            blink_interval: DEFAULT_BLINK_INTERVAL,
            is_numerical: false,
            decimal_precision: 0,
        }
    }
}

impl LoadProperties for TextBox {
    fn load_properties(&mut self, properties: &PropertySet) {
        if let Some(numerical) = properties.get("numerical") {
            self.is_numerical = numerical.as_bool();
        }
        if let Some(precision) = properties.get("decimalPrecision") {
            self.decimal_precision = precision.as_int().max(0) as usize;
        }
        if let Some(text) = properties.get("text") {
            self.set_text(text.as_str());
            if self.is_numerical {
                self.numerify();
            }
        }
    }
}

impl TextBox {
    pub fn new(text: impl Into<String>) -> Self {
        let mut text_box = Self::default();
        text_box.set_text(text);
        text_box
    }

    pub fn numerical(decimal_precision: usize) -> Self {
        Self {
            is_numerical: true,
            decimal_precision,
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text without marking it as edited
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.clamp(self.cursor);
        self.anchor = self.cursor;
        self.selection = None;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, pos: usize) {
        self.move_cursor(pos, false);
    }

    /// Selected byte range, start before end
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    pub fn selected_text(&self) -> &str {
        self.selection
            .and_then(|(start, end)| self.text.get(start..end))
            .unwrap_or("")
    }

    pub fn select_all(&mut self) {
        self.anchor = 0;
        self.cursor = self.text.len();
        self.selection = (!self.text.is_empty()).then_some((0, self.text.len()));
        self.touch();
    }

    pub fn is_focused(&self) -> bool {
        self.is_focused
    }

    /// A mouse drag selection is in progress
    pub fn is_selecting(&self) -> bool {
        self.is_selecting
    }

    /// Edited since the last commit
    pub fn is_text_changed(&self) -> bool {
        self.is_text_changed
    }

    pub fn float(&self) -> f32 {
        self.text.trim().parse().unwrap_or(0.0)
    }

    pub fn int(&self) -> i32 {
        let text = self.text.trim();
        text.parse()
            .unwrap_or_else(|_| text.parse::<f64>().map_or(0, |value| value as i32))
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.is_cursor_visible_at(Instant::now())
    }

    /// Blink phase at `now`, restarted whenever the cursor moves
    pub fn is_cursor_visible_at(&self, now: Instant) -> bool {
        if !self.is_focused {
            return false;
        }
        let elapsed = now.saturating_duration_since(self.cursor_time).as_millis();
        let interval = self.blink_interval.as_millis().max(1);
        (elapsed / interval) % 2 == 0
    }

    pub(crate) fn begin_selection(&mut self, pos: usize) {
        self.move_cursor(pos, false);
        self.is_selecting = true;
    }

    pub(crate) fn drag_selection(&mut self, pos: usize) {
        if self.is_selecting {
            self.move_cursor(pos, true);
        }
    }

    pub(crate) fn end_selection(&mut self) {
        self.is_selecting = false;
    }

    pub(crate) fn gain_focus(&mut self) {
        self.is_focused = true;
        self.touch();
    }

    /// Drop focus and commit, returning the committed text if it was edited
    pub(crate) fn lose_focus(&mut self) -> Option<String> {
        self.is_focused = false;
        self.is_selecting = false;
        self.selection = None;
        self.commit()
    }

    /// Clear focus without committing, for a control leaving the tree
    pub(crate) fn drop_focus(&mut self) {
        self.is_focused = false;
        self.is_selecting = false;
    }

    /// Finish an edit; returns the text if it changed since the last commit
    pub fn commit(&mut self) -> Option<String> {
        if self.is_numerical {
            self.numerify();
        }
        if !self.is_text_changed {
            return None;
        }
        self.is_text_changed = false;
        Some(self.text.clone())
    }

    /// Reformat as a number with `decimal_precision` digits, 0 if unparsable.
    ///
    /// Reformatting alone is not an edit and never marks the text as changed.
    fn numerify(&mut self) {
        let value = self
            .text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .unwrap_or(0.0);
        let formatted = format!("{value:.prec$}", prec = self.decimal_precision);
        if formatted != self.text {
            self.text = formatted;
            self.cursor = self.clamp(self.cursor);
            self.anchor = self.cursor;
            self.selection = None;
        }
    }

    /// Handle a key; returns true when the key asks to commit the text
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) -> bool {
        let extend = modifiers.shift;
        match key {
            Key::Named(NamedKey::Left) => {
                let to = match self.selection {
                    Some((start, _)) if !extend => start,
                    _ if modifiers.ctrl => prev_word_boundary(&self.text, self.cursor),
                    _ => prev_char_boundary(&self.text, self.cursor),
                };
                self.move_cursor(to, extend);
            }
            Key::Named(NamedKey::Right) => {
                let to = match self.selection {
                    Some((_, end)) if !extend => end,
                    _ if modifiers.ctrl => next_word_boundary(&self.text, self.cursor),
                    _ => next_char_boundary(&self.text, self.cursor),
                };
                self.move_cursor(to, extend);
            }
            Key::Named(NamedKey::Home | NamedKey::Up) => self.move_cursor(0, extend),
            Key::Named(NamedKey::End | NamedKey::Down) => self.move_cursor(self.text.len(), extend),
            Key::Named(NamedKey::Backspace) => self.backspace(modifiers.ctrl),
            Key::Named(NamedKey::Delete) => {
                if !self.delete_selection() && self.cursor < self.text.len() {
                    let end = if modifiers.ctrl {
                        next_word_boundary(&self.text, self.cursor)
                    } else {
                        next_char_boundary(&self.text, self.cursor)
                    };
                    self.text.replace_range(self.cursor..end, "");
                    self.edited();
                }
            }
            Key::Named(NamedKey::Enter) => return true,
            key if modifiers.ctrl && key == Key::letter('a') => self.select_all(),
            _ => {}
        }
        false
    }

    /// Insert a typed character, replacing the selection
    pub fn write(&mut self, ch: char) {
        if ch == '\u{8}' {
            self.backspace(false);
            return;
        }
        if ch.is_control() {
            return;
        }
        if self.is_numerical && !(ch.is_ascii_digit() || ch == '-' || ch == '.') {
            return;
        }

        self.delete_selection();
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
        self.edited();
    }

    fn backspace(&mut self, by_word: bool) {
        if self.delete_selection() || self.cursor == 0 {
            return;
        }
        let start = if by_word {
            prev_word_boundary(&self.text, self.cursor)
        } else {
            prev_char_boundary(&self.text, self.cursor)
        };
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
        self.edited();
    }

    fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selection.take() else {
            return false;
        };
        self.text.replace_range(start..end, "");
        self.cursor = start;
        self.edited();
        true
    }

    fn edited(&mut self) {
        self.is_text_changed = true;
        self.anchor = self.cursor;
        self.touch();
    }

    fn move_cursor(&mut self, to: usize, extend: bool) {
        let to = self.clamp(to);
        if extend {
            if self.selection.is_none() {
                self.anchor = self.cursor;
            }
            self.cursor = to;
            self.selection =
                (self.anchor != to).then(|| (self.anchor.min(to), self.anchor.max(to)));
        } else {
            self.cursor = to;
            self.anchor = to;
            self.selection = None;
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.cursor_time = Instant::now();
    }

    fn clamp(&self, pos: usize) -> usize {
        let mut pos = pos.min(self.text.len());
        while !self.text.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos].char_indices().next_back().map_or(0, |(index, _)| index)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len(), |ch| pos + ch.len_utf8())
}

/// Start of the word before `pos`, skipping whitespace first
fn prev_word_boundary(text: &str, pos: usize) -> usize {
    let before = &text[..pos];
    let trimmed = before.trim_end();
    trimmed
        .char_indices()
        .rev()
        .find(|(_, ch)| ch.is_whitespace())
        .map_or(0, |(index, ch)| index + ch.len_utf8())
}

/// Start of the next word after `pos`
fn next_word_boundary(text: &str, pos: usize) -> usize {
    let after = &text[pos..];
    let word_end = after.find(char::is_whitespace).unwrap_or(after.len());
    let rest = &after[word_end..];
    let next_word = rest.len() - rest.trim_start().len();
    pos + word_end + next_word
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
    };
    const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
    };
    const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
    };

    fn key(named: NamedKey) -> Key {
        Key::Named(named)
    }

    #[test]
    fn test_write_and_navigate() {
        let mut text_box = TextBox::default();
        for ch in "hllo".chars() {
            text_box.write(ch);
        }
        assert_eq!(text_box.cursor(), 4);

        text_box.key_down(key(NamedKey::Home), NONE);
        text_box.key_down(key(NamedKey::Right), NONE);
        text_box.write('e');
        assert_eq!(text_box.text(), "hello");
        assert_eq!(text_box.cursor(), 2);

        text_box.key_down(key(NamedKey::Down), NONE);
        assert_eq!(text_box.cursor(), 5);
        text_box.key_down(key(NamedKey::Up), NONE);
        assert_eq!(text_box.cursor(), 0);
    }

    #[test]
    fn test_shift_extends_selection() {
        let mut text_box = TextBox::new("hello world");
        text_box.set_cursor(5);

        text_box.key_down(key(NamedKey::Left), SHIFT);
        text_box.key_down(key(NamedKey::Left), SHIFT);
        assert_eq!(text_box.selection(), Some((3, 5)));
        assert_eq!(text_box.selected_text(), "lo");

        text_box.key_down(key(NamedKey::End), SHIFT);
        assert_eq!(text_box.selection(), Some((5, 11)));

        // Without shift the selection collapses towards the key's direction
        text_box.key_down(key(NamedKey::Left), NONE);
        assert_eq!(text_box.selection(), None);
        assert_eq!(text_box.cursor(), 5);
    }

    #[test]
    fn test_delete_and_backspace() {
        let mut text_box = TextBox::new("abcdef");
        text_box.set_cursor(3);

        text_box.key_down(key(NamedKey::Delete), NONE);
        assert_eq!(text_box.text(), "abcef");
        text_box.key_down(key(NamedKey::Backspace), NONE);
        assert_eq!(text_box.text(), "abef");
        text_box.write('\u{8}');
        assert_eq!(text_box.text(), "aef");
        assert_eq!(text_box.cursor(), 1);

        text_box.key_down(Key::letter('a'), CTRL);
        assert_eq!(text_box.selection(), Some((0, 3)));
        text_box.key_down(key(NamedKey::Delete), NONE);
        assert_eq!(text_box.text(), "");
        assert!(text_box.is_text_changed());
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut text_box = TextBox::new("one two");
        text_box.begin_selection(4);
        text_box.drag_selection(7);
        text_box.end_selection();
        assert_eq!(text_box.selected_text(), "two");

        text_box.write('2');
        assert_eq!(text_box.text(), "one 2");
        assert_eq!(text_box.selection(), None);
    }

    #[test]
    fn test_drag_selection_orders_range() {
        let mut text_box = TextBox::new("abcdef");
        text_box.begin_selection(4);
        assert!(text_box.is_selecting());
        text_box.drag_selection(1);
        assert_eq!(text_box.selection(), Some((1, 4)));
        assert_eq!(text_box.cursor(), 1);

        text_box.end_selection();
        text_box.drag_selection(6);
        assert_eq!(text_box.selection(), Some((1, 4)));
    }

    #[test]
    fn test_cursor_stays_on_char_boundary() {
        let mut text_box = TextBox::new("héllo");
        text_box.set_cursor(2);
        assert_eq!(text_box.cursor(), 1);

        text_box.key_down(key(NamedKey::Right), NONE);
        assert_eq!(text_box.cursor(), 3);
        text_box.key_down(key(NamedKey::Backspace), NONE);
        assert_eq!(text_box.text(), "hllo");
    }

    #[test]
    fn test_word_navigation() {
        let mut text_box = TextBox::new("alpha beta  gamma");
        text_box.set_cursor(17);
        text_box.key_down(key(NamedKey::Left), CTRL);
        assert_eq!(text_box.cursor(), 12);
        text_box.key_down(key(NamedKey::Left), CTRL);
        assert_eq!(text_box.cursor(), 6);

        text_box.key_down(key(NamedKey::Right), CTRL);
        assert_eq!(text_box.cursor(), 12);
    }

    #[test]
    fn test_numeric_filter_and_commit() {
        let mut text_box = TextBox::numerical(2);
        for ch in "1a2.5x".chars() {
            text_box.write(ch);
        }
        assert_eq!(text_box.text(), "12.5");

        assert_eq!(text_box.commit().as_deref(), Some("12.50"));
        assert_eq!(text_box.commit(), None);
        assert_eq!(text_box.float(), 12.5);
        assert_eq!(text_box.int(), 12);

        text_box.write('-');
        text_box.write('-');
        assert_eq!(text_box.lose_focus().as_deref(), Some("0.00"));
    }

    #[test]
    fn test_numeric_reformat_without_edit_is_silent() {
        let mut text_box = TextBox::numerical(2);
        text_box.gain_focus();
        assert_eq!(text_box.lose_focus(), None);
        assert_eq!(text_box.text(), "0.00");

        text_box.set_text("3.14159");
        assert_eq!(text_box.commit(), None);
        assert_eq!(text_box.text(), "3.14");
    }

    #[test]
    fn test_enter_requests_commit() {
        let mut text_box = TextBox::default();
        assert!(text_box.key_down(key(NamedKey::Enter), NONE));
        assert!(!text_box.key_down(key(NamedKey::Escape), NONE));
    }

    #[test]
    fn test_cursor_blink() {
        let mut text_box = TextBox::default();
        let start = Instant::now();
        assert!(!text_box.is_cursor_visible_at(start));

        text_box.gain_focus();
        let moved = text_box.cursor_time;
        assert!(text_box.is_cursor_visible_at(moved));
        assert!(!text_box.is_cursor_visible_at(moved + Duration::from_millis(600)));
        assert!(text_box.is_cursor_visible_at(moved + Duration::from_millis(1100)));
    }
}
