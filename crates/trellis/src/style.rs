//! Style registry
//!
//! Rendering is delegated to callbacks registered per control kind and style name.
//! Style names are hashed to 32 bits; the empty name hashes to `0` and acts as the
//! per-kind default.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use log::warn;

use crate::control::{Control, ControlKind, ControlState};
use crate::geometry::Rect;
use crate::tree_view::TreeViewItem;

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a hash of a style name, `0` for the empty name
pub fn style_hash(name: &str) -> u32 {
    style_hash_with_seed(name, FNV_OFFSET)
}

/// [`style_hash`] continuing from a previous hash value
pub fn style_hash_with_seed(name: &str, seed: u32) -> u32 {
    if name.is_empty() {
        return 0;
    }
    name.bytes()
        .fold(seed, |hash, byte| (hash ^ byte as u32).wrapping_mul(FNV_PRIME))
}

/// Named style reference carried by every control
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct StyleRef {
    pub name: String,
    pub hash: u32,
}

impl StyleRef {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let hash = style_hash(&name);
        Self { name, hash }
    }
}

/// Draws one control inside its resolved world rectangle
pub type StyleFn = Box<dyn FnMut(&Control, Rect, ControlState)>;

/// Maps a position local to a text control to a byte offset into its text
pub type CaretSolver = Box<dyn Fn(&Control, Vec2) -> usize>;

/// Draws one visible tree-view row
pub type ItemStyleFn = Box<dyn FnMut(&TreeViewItem, Rect)>;

/// Render and caret callbacks keyed by (kind, style hash)
#[derive(Default)]
pub struct StyleRegistry {
    styles: HashMap<(ControlKind, u32), StyleFn>,
    caret_solvers: HashMap<(ControlKind, u32), CaretSolver>,
    item_styles: HashMap<u32, ItemStyleFn>,
    reported_missing: HashSet<(ControlKind, u32)>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_style(
        &mut self,
        kind: ControlKind,
        name: &str,
        style: impl FnMut(&Control, Rect, ControlState) + 'static,
    ) {
        self.styles.insert((kind, style_hash(name)), Box::new(style));
    }

    pub fn add_caret_solver(
        &mut self,
        kind: ControlKind,
        name: &str,
        solver: impl Fn(&Control, Vec2) -> usize + 'static,
    ) {
        self.caret_solvers
            .insert((kind, style_hash(name)), Box::new(solver));
    }

    /// Register how rows of tree views using the style `name` are drawn
    pub fn add_item_style(&mut self, name: &str, style: impl FnMut(&TreeViewItem, Rect) + 'static) {
        self.item_styles.insert(style_hash(name), Box::new(style));
    }

    pub fn has_style(&self, kind: ControlKind, hash: u32) -> bool {
        self.styles.contains_key(&(kind, hash)) || self.styles.contains_key(&(kind, 0))
    }

    /// Style for the given kind and hash, falling back to the kind's default style
    pub fn style_mut(&mut self, kind: ControlKind, hash: u32) -> Option<&mut StyleFn> {
        let key = if self.styles.contains_key(&(kind, hash)) {
            (kind, hash)
        } else {
            (kind, 0)
        };

        if !self.styles.contains_key(&key) && self.reported_missing.insert((kind, hash)) {
            warn!("no style registered for {kind:?} (hash {hash:#010x}) and no default");
        }
        self.styles.get_mut(&key)
    }

    pub fn caret_solver(&self, kind: ControlKind, hash: u32) -> Option<&CaretSolver> {
        self.caret_solvers
            .get(&(kind, hash))
            .or_else(|| self.caret_solvers.get(&(kind, 0)))
    }

    pub fn item_style_mut(&mut self, hash: u32) -> Option<&mut ItemStyleFn> {
        let key = if self.item_styles.contains_key(&hash) { hash } else { 0 };
        self.item_styles.get_mut(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_style_hash() {
        assert_eq!(style_hash(""), 0);
        // Reference FNV-1a values
        assert_eq!(style_hash("a"), 0xe40c_292c);
        assert_eq!(style_hash("foobar"), 0xbf9c_f968);
        assert_ne!(style_hash("button"), style_hash("Button"));
        assert_eq!(StyleRef::new("panel").hash, style_hash("panel"));
    }

    #[test]
    fn test_style_falls_back_to_default() {
        let mut registry = StyleRegistry::new();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        registry.add_style(ControlKind::Button, "", move |_, _, _| {
            counter.set(counter.get() + 1);
        });

        let control = Control::new(ControlKind::Button);
        let style = registry
            .style_mut(ControlKind::Button, style_hash("fancy"))
            .expect("default style");
        style(&control, Rect::ZERO, ControlState::Normal);
        assert_eq!(hits.get(), 1);

        assert!(registry.style_mut(ControlKind::Label, 0).is_none());
        assert!(registry.caret_solver(ControlKind::TextBox, 0).is_none());
    }

    #[test]
    fn test_specific_style_wins() {
        let mut registry = StyleRegistry::new();
        registry.add_caret_solver(ControlKind::TextBox, "", |_, _| 1);
        registry.add_caret_solver(ControlKind::TextBox, "mono", |_, pos| (pos.x / 8.0) as usize);

        let control = Control::new(ControlKind::TextBox);
        let mono = registry
            .caret_solver(ControlKind::TextBox, style_hash("mono"))
            .expect("mono solver");
        assert_eq!(mono(&control, Vec2::new(17.0, 0.0)), 2);

        let fallback = registry
            .caret_solver(ControlKind::TextBox, style_hash("other"))
            .expect("default solver");
        assert_eq!(fallback(&control, Vec2::ZERO), 1);
    }
}
