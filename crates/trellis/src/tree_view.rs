//! Tree-view items, expansion and selection
//!
//! Items form their own hierarchy inside the tree view, independent of the
//! control tree. Only rows whose ancestors are all expanded are visible, and
//! visible rows are both what gets drawn and what a click can hit.

use std::any::Any;
use std::fmt;

use glam::Vec2;
use log::warn;
use slotmap::{new_key_type, SlotMap};
use trellis_macros::{LoadProperties, WithBuilders};

use crate::geometry::Rect;
use crate::property::{LoadProperties, PropertySet};

new_key_type! {
    /// Handle to an item owned by a [`TreeView`]
    pub struct ItemId;
}

/// Row layout of a tree view
#[derive(Clone, Copy, Debug, PartialEq, WithBuilders, LoadProperties)]
pub struct TreeViewMetrics {
    #[property("itemHeight")]
    pub item_height: f32,
    /// Indentation added per expanded nesting level
    #[property("expandedXOffset")]
    pub expanded_x_offset: f32,
    /// Leading width of a row that toggles expansion instead of selecting
    #[property("expandClickWidth")]
    pub expand_click_width: f32,
}

impl Default for TreeViewMetrics {
    fn default() -> Self {
        Self {
            item_height: 18.0,
            expanded_x_offset: 16.0,
            expand_click_width: 18.0,
        }
    }
}

#[derive(Default)]
pub struct TreeViewItem {
    pub text: String,
    expanded: bool,
    selected: bool,
    parent: Option<ItemId>,
    children: Vec<ItemId>,
    user_data: Option<Box<dyn Any>>,
}

impl TreeViewItem {
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    pub fn user_data<T: Any>(&self) -> Option<&T> {
        self.user_data.as_ref()?.downcast_ref()
    }

    pub fn set_user_data<T: Any>(&mut self, data: T) {
        self.user_data = Some(Box::new(data));
    }
}

// User data is a host back-reference and is not carried by copies
impl Clone for TreeViewItem {
    fn clone(&self) -> Self {
        Self {
            text: self.text.clone(),
            expanded: self.expanded,
            selected: self.selected,
            parent: self.parent,
            children: self.children.clone(),
            user_data: None,
        }
    }
}

impl fmt::Debug for TreeViewItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeViewItem")
            .field("text", &self.text)
            .field("expanded", &self.expanded)
            .field("selected", &self.selected)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// A visible row, as drawn and as hit-tested
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeViewRow {
    pub item: ItemId,
    pub depth: usize,
    pub rect: Rect,
}

/// What a position inside the tree view lands on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeViewHit {
    Item(ItemId),
    ExpandToggle(ItemId),
}

#[derive(Clone, Debug, Default)]
pub struct TreeView {
    pub metrics: TreeViewMetrics,
    items: SlotMap<ItemId, TreeViewItem>,
    roots: Vec<ItemId>,
    selection: Vec<ItemId>,
}

impl LoadProperties for TreeView {
    fn load_properties(&mut self, properties: &PropertySet) {
        self.metrics.load_properties(properties);
    }
}

impl TreeView {
    pub fn new(metrics: TreeViewMetrics) -> Self {
        Self {
            metrics,
            ..Default::default()
        }
    }

    /// Create a detached item; attach it with [`add_item`](Self::add_item) or
    /// [`add_child_item`](Self::add_child_item)
    pub fn create_item(&mut self, text: impl Into<String>) -> ItemId {
        self.items.insert(TreeViewItem {
            text: text.into(),
            ..Default::default()
        })
    }

    pub fn item(&self, id: ItemId) -> Option<&TreeViewItem> {
        self.items.get(id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut TreeViewItem> {
        self.items.get_mut(id)
    }

    pub fn roots(&self) -> &[ItemId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an item at the top level
    pub fn add_item(&mut self, item: ItemId) -> bool {
        if !self.items.contains_key(item) {
            warn!("add_item: unknown item {item:?}");
            return false;
        }
        self.detach(item);
        self.roots.push(item);
        true
    }

    /// Append `child` under `parent`, moving it if it was attached elsewhere
    pub fn add_child_item(&mut self, parent: ItemId, child: ItemId) -> bool {
        if !self.items.contains_key(parent) || !self.items.contains_key(child) {
            warn!("add_child_item: unknown item {parent:?} or {child:?}");
            return false;
        }
        if self.is_ancestor(child, parent) {
            warn!("add_child_item: {child:?} is {parent:?} or one of its ancestors");
            return false;
        }

        self.detach(child);
        if let Some(item) = self.items.get_mut(child) {
            item.parent = Some(parent);
        }
        if let Some(item) = self.items.get_mut(parent) {
            item.children.push(child);
        }
        true
    }

    /// Whether `ancestor` is `item` or one of its ancestors
    fn is_ancestor(&self, ancestor: ItemId, item: ItemId) -> bool {
        let mut current = Some(item);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.items.get(id).and_then(|item| item.parent);
        }
        false
    }

    fn detach(&mut self, item: ItemId) {
        let parent = self.items.get_mut(item).and_then(|item| item.parent.take());
        match parent {
            Some(parent) => {
                if let Some(parent) = self.items.get_mut(parent) {
                    parent.children.retain(|child| *child != item);
                }
            }
            None => self.roots.retain(|root| *root != item),
        }
    }

    /// Destroy an item and all of its descendants, removing them from the selection
    pub fn remove_item(&mut self, item: ItemId) {
        if !self.items.contains_key(item) {
            return;
        }
        self.detach(item);

        let mut pending = vec![item];
        while let Some(id) = pending.pop() {
            if let Some(removed) = self.items.remove(id) {
                pending.extend(removed.children);
            }
            self.selection.retain(|selected| *selected != id);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.roots.clear();
        self.selection.clear();
    }

    pub fn selected_items(&self) -> &[ItemId] {
        &self.selection
    }

    /// Add an item to the selection if it is not already part of it
    pub fn add_selected_item(&mut self, item: ItemId) {
        let Some(entry) = self.items.get_mut(item) else {
            return;
        };
        entry.selected = true;
        if !self.selection.contains(&item) {
            self.selection.push(item);
        }
    }

    pub fn unselect_item(&mut self, item: ItemId) {
        if let Some(entry) = self.items.get_mut(item) {
            entry.selected = false;
        }
        self.selection.retain(|selected| *selected != item);
    }

    pub fn unselect_all(&mut self) {
        for item in self.selection.drain(..) {
            if let Some(entry) = self.items.get_mut(item) {
                entry.selected = false;
            }
        }
    }

    pub fn set_expanded(&mut self, item: ItemId, expanded: bool) {
        if let Some(entry) = self.items.get_mut(item) {
            entry.expanded = expanded;
        }
    }

    /// Expand every ancestor of `item` so that it becomes visible
    pub fn expand_to(&mut self, item: ItemId) {
        let mut current = self.items.get(item).and_then(|entry| entry.parent);
        while let Some(id) = current {
            let Some(entry) = self.items.get_mut(id) else {
                break;
            };
            entry.expanded = true;
            current = entry.parent;
        }
    }

    /// Visible rows, top to bottom, laid out inside the tree view's world rect
    pub fn visible_rows(&self, rect: Rect) -> Vec<TreeViewRow> {
        let mut rows = Vec::new();
        let mut pending: Vec<(ItemId, usize)> = self.roots.iter().rev().map(|id| (*id, 0)).collect();

        while let Some((id, depth)) = pending.pop() {
            let Some(item) = self.items.get(id) else {
                continue;
            };

            let indent = depth as f32 * self.metrics.expanded_x_offset;
            let y = rect.position.y + rows.len() as f32 * self.metrics.item_height;
            rows.push(TreeViewRow {
                item: id,
                depth,
                rect: Rect::from_xywh(
                    rect.position.x + indent,
                    y,
                    (rect.size.x - indent).max(0.0),
                    self.metrics.item_height,
                ),
            });

            if item.expanded {
                pending.extend(item.children.iter().rev().map(|child| (*child, depth + 1)));
            }
        }
        rows
    }

    /// Row or expand toggle under `pos`, for a tree view laid out in `rect`
    pub fn hit(&self, rect: Rect, pos: Vec2) -> Option<TreeViewHit> {
        let row = self
            .visible_rows(rect)
            .into_iter()
            .find(|row| pos.y >= row.rect.position.y && pos.y < row.rect.max().y)?;

        // The leading strip toggles expansion on every row, leaves included
        let toggle_start = row.rect.position.x;
        if pos.x >= toggle_start && pos.x < toggle_start + self.metrics.expand_click_width {
            Some(TreeViewHit::ExpandToggle(row.item))
        } else {
            Some(TreeViewHit::Item(row.item))
        }
    }

    /// Apply a mouse press; returns whether the selection changed
    pub fn press(&mut self, rect: Rect, pos: Vec2, ctrl: bool) -> bool {
        let before = self.selection.clone();
        match self.hit(rect, pos) {
            Some(TreeViewHit::ExpandToggle(item)) => {
                let expanded = self.items.get(item).is_some_and(|entry| entry.expanded);
                self.set_expanded(item, !expanded);
            }
            Some(TreeViewHit::Item(item)) if ctrl => {
                if self.selection.contains(&item) {
                    self.unselect_item(item);
                } else {
                    self.add_selected_item(item);
                }
            }
            Some(TreeViewHit::Item(item)) => {
                self.unselect_all();
                self.add_selected_item(item);
            }
            None => self.unselect_all(),
        }
        self.selection != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::from_xywh(0.0, 0.0, 200.0, 300.0)
    }

    #[test]
    fn test_collapse_hides_rows_but_keeps_selection() {
        let mut view = TreeView::default();
        let y = view.create_item("Y");
        let x = view.create_item("X");
        view.add_item(y);
        view.add_child_item(y, x);
        view.set_expanded(y, true);
        view.add_selected_item(x);

        let rows: Vec<_> = view.visible_rows(rect()).iter().map(|row| row.item).collect();
        assert_eq!(rows, vec![y, x]);
        assert_eq!(view.hit(rect(), Vec2::new(100.0, 20.0)), Some(TreeViewHit::Item(x)));

        view.set_expanded(y, false);
        let rows: Vec<_> = view.visible_rows(rect()).iter().map(|row| row.item).collect();
        assert_eq!(rows, vec![y]);
        assert_eq!(view.hit(rect(), Vec2::new(100.0, 20.0)), None);
        assert_eq!(view.selected_items(), &[x]);
        assert!(view.item(x).unwrap().is_selected());
    }

    #[test]
    fn test_rows_are_indented() {
        let mut view = TreeView::default();
        let a = view.create_item("a");
        let b = view.create_item("b");
        let c = view.create_item("c");
        view.add_item(a);
        view.add_child_item(a, b);
        view.add_item(c);
        view.set_expanded(a, true);

        let rows = view.visible_rows(rect());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].rect, Rect::from_xywh(16.0, 18.0, 184.0, 18.0));
        assert_eq!(rows[2].item, c);
        assert_eq!(rows[2].rect.position, Vec2::new(0.0, 36.0));
    }

    #[test]
    fn test_press_toggles_and_selects() {
        let mut view = TreeView::default();
        let a = view.create_item("a");
        let b = view.create_item("b");
        let leaf = view.create_item("leaf");
        view.add_item(a);
        view.add_child_item(a, b);
        view.add_item(leaf);

        // Leading pixels of a row with children toggle expansion
        assert!(!view.press(rect(), Vec2::new(5.0, 5.0), false));
        assert!(view.item(a).unwrap().is_expanded());
        assert!(view.selected_items().is_empty());

        assert!(view.press(rect(), Vec2::new(50.0, 5.0), false));
        assert_eq!(view.selected_items(), &[a]);

        // The leading strip of a leaf row toggles rather than selects
        assert!(!view.press(rect(), Vec2::new(5.0, 40.0), true));
        assert_eq!(view.selected_items(), &[a]);
        assert_eq!(
            view.hit(rect(), Vec2::new(5.0, 40.0)),
            Some(TreeViewHit::ExpandToggle(leaf))
        );

        assert!(view.press(rect(), Vec2::new(50.0, 40.0), true));
        assert_eq!(view.selected_items(), &[a, leaf]);

        assert!(view.press(rect(), Vec2::new(50.0, 5.0), true));
        assert_eq!(view.selected_items(), &[leaf]);

        assert!(view.press(rect(), Vec2::new(50.0, 250.0), false));
        assert!(view.selected_items().is_empty());
    }

    #[test]
    fn test_expand_to() {
        let mut view = TreeView::default();
        let a = view.create_item("a");
        let b = view.create_item("b");
        let c = view.create_item("c");
        view.add_item(a);
        view.add_child_item(a, b);
        view.add_child_item(b, c);

        view.expand_to(c);
        assert!(view.item(a).unwrap().is_expanded());
        assert!(view.item(b).unwrap().is_expanded());
        assert!(!view.item(c).unwrap().is_expanded());
        assert_eq!(view.visible_rows(rect()).len(), 3);
    }

    #[test]
    fn test_remove_item_unselects_subtree() {
        let mut view = TreeView::default();
        let a = view.create_item("a");
        let b = view.create_item("b");
        let other = view.create_item("other");
        view.add_item(a);
        view.add_child_item(a, b);
        view.add_item(other);
        view.add_selected_item(b);
        view.add_selected_item(other);

        view.remove_item(a);
        assert!(view.item(a).is_none());
        assert!(view.item(b).is_none());
        assert_eq!(view.roots(), &[other]);
        assert_eq!(view.selected_items(), &[other]);
    }

    #[test]
    fn test_cycle_rejected() {
        let mut view = TreeView::default();
        let a = view.create_item("a");
        let b = view.create_item("b");
        view.add_item(a);
        view.add_child_item(a, b);

        assert!(!view.add_child_item(b, a));
        assert!(!view.add_child_item(a, a));
        assert_eq!(view.item(b).unwrap().parent(), Some(a));
    }
}
