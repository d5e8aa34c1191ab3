//! UI context: per-frame input, hover/down/focus tracking and event dispatch
//!
//! The context never owns controls. It refers to them by [`ControlId`] and drops
//! any reference to a control that leaves the tree, so a removed control never
//! receives another event.
//!
//! # Example
//!
//! ```ignore
//! let mut tree = ControlTree::new();
//! let mut ctx = UiContext::new(Vec2::new(800.0, 600.0));
//! let root = tree.create(ControlKind::Control);
//!
//! // Once per frame:
//! ctx.update_from_input(&mut tree, root, &mut input);
//! ctx.render(&tree, root);
//! ```

use glam::Vec2;
use log::{debug, trace};

use crate::control::{Control, ControlId, ControlKind, ControlState};
use crate::events::{
    Callbacks, CheckEvent, EventCx, FocusEvent, KeyEvent, MouseEvent, SelectionEvent, Slot,
    TextEvent, WriteEvent,
};
use crate::geometry::Rect;
use crate::input::{FrameInput, Key, Modifiers};
use crate::style::StyleRegistry;
use crate::tree::ControlTree;

pub struct UiContext {
    screen_size: Vec2,

    mouse_pos: Vec2,
    mouse_down: bool,
    last_mouse_pos: Vec2,
    last_mouse_down: bool,

    hover: Option<ControlId>,
    down: Option<ControlId>,
    focus: Option<ControlId>,
    last_hover: Option<ControlId>,
    last_down: Option<ControlId>,
    last_focus: Option<ControlId>,

    /// Characters typed since the last frame, for the focused control
    writes: Vec<char>,
    /// Keys pressed since the last frame, for the focused control
    keys: Vec<KeyEvent>,
    modifiers: Modifiers,

    styles: StyleRegistry,
}

impl UiContext {
    pub fn new(screen_size: Vec2) -> Self {
        Self {
            screen_size,
            mouse_pos: Vec2::ZERO,
            mouse_down: false,
            last_mouse_pos: Vec2::ZERO,
            last_mouse_down: false,
            hover: None,
            down: None,
            focus: None,
            last_hover: None,
            last_down: None,
            last_focus: None,
            writes: Vec::new(),
            keys: Vec::new(),
            modifiers: Modifiers::default(),
            styles: StyleRegistry::new(),
        }
    }

    // ========== Screen & Input ==========

    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    /// Rectangle that parentless controls resolve against
    pub fn screen_rect(&self) -> Rect {
        Rect::new(Vec2::ZERO, self.screen_size)
    }

    pub fn resize(&mut self, screen_size: Vec2) {
        self.screen_size = screen_size;
    }

    pub fn mouse_pos(&self) -> Vec2 {
        self.mouse_pos
    }

    pub fn last_mouse_pos(&self) -> Vec2 {
        self.last_mouse_pos
    }

    pub fn is_mouse_down(&self) -> bool {
        self.mouse_down
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Queue a typed character for the focused control
    pub fn write(&mut self, character: char) {
        self.writes.push(character);
    }

    /// Queue a key press for the focused control, with the current modifiers
    pub fn key_down(&mut self, key: Key) {
        self.keys.push(KeyEvent {
            key,
            modifiers: self.modifiers,
        });
    }

    // ========== Styles ==========

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut StyleRegistry {
        &mut self.styles
    }

    // ========== Pointers ==========

    pub fn hover_control(&self) -> Option<ControlId> {
        self.hover
    }

    pub fn down_control(&self) -> Option<ControlId> {
        self.down
    }

    pub fn focus_control(&self) -> Option<ControlId> {
        self.focus
    }

    pub fn last_hover_control(&self) -> Option<ControlId> {
        self.last_hover
    }

    pub fn last_down_control(&self) -> Option<ControlId> {
        self.last_down
    }

    pub fn last_focus_control(&self) -> Option<ControlId> {
        self.last_focus
    }

    pub fn has_focus(&self, id: ControlId) -> bool {
        self.focus == Some(id)
    }

    /// Interaction state of a control. Disabled wins, then down, then hover.
    pub fn state(&self, tree: &ControlTree, id: ControlId) -> ControlState {
        match tree.get(id) {
            Some(control) if !control.is_enabled() => ControlState::Disabled,
            None => ControlState::Disabled,
            Some(_) if self.down == Some(id) => ControlState::Down,
            Some(_) if self.hover == Some(id) => ControlState::Hover,
            Some(_) => ControlState::Normal,
        }
    }

    /// Forget every control that left the tree since the last sync
    pub fn sync(&mut self, tree: &mut ControlTree) {
        for id in tree.drain_detached() {
            if self.focus == Some(id) {
                if let Some(text_box) = tree.get_mut(id).and_then(Control::text_box_mut) {
                    text_box.drop_focus();
                }
            }

            for pointer in [
                &mut self.hover,
                &mut self.down,
                &mut self.focus,
                &mut self.last_hover,
                &mut self.last_down,
                &mut self.last_focus,
            ] {
                if *pointer == Some(id) {
                    *pointer = None;
                }
            }
        }
    }

    // ========== Frame ==========

    /// Consume one frame of host input and dispatch the resulting events
    pub fn update_from_input(&mut self, tree: &mut ControlTree, root: ControlId, input: &mut FrameInput) {
        if let Some(size) = input.resized {
            self.resize(size);
        }
        self.modifiers = input.modifiers;
        for character in input.characters.drain(..) {
            self.write(character);
        }
        for key in input.keys.drain(..) {
            self.key_down(key);
        }

        self.dispatch_frame(tree, root, input.cursor_position, input.frame_mouse_down());
        input.begin_frame();
    }

    /// Run one frame of event dispatch for the subtree of `root`
    pub fn update(&mut self, tree: &mut ControlTree, root: ControlId, mouse_pos: Vec2, mouse_down: bool) {
        self.dispatch_frame(tree, root, Some(mouse_pos), mouse_down);
    }

    fn dispatch_frame(
        &mut self,
        tree: &mut ControlTree,
        root: ControlId,
        mouse_pos: Option<Vec2>,
        mouse_down: bool,
    ) {
        self.sync(tree);

        self.last_hover = self.hover;
        self.last_down = self.down;
        self.last_focus = self.focus;
        self.last_mouse_pos = self.mouse_pos;
        self.last_mouse_down = self.mouse_down;

        if let Some(pos) = mouse_pos {
            self.mouse_pos = pos;
        }
        self.mouse_down = mouse_down;
        let moved = self.mouse_pos != self.last_mouse_pos;

        // A cursor outside the surface hovers nothing
        let parent_rect = tree.parent_rect(root, self.screen_rect());
        let hover = mouse_pos.and_then(|pos| tree.control_at(root, parent_rect, pos, true, true));

        if hover != self.hover {
            let previous = std::mem::replace(&mut self.hover, hover);
            if let Some(previous) = previous {
                let event = self.mouse_event(tree, previous);
                self.fire(tree, previous, Callbacks::mouse_leave, &event);
            }
            if let Some(next) = self.hover {
                let event = self.mouse_event(tree, next);
                self.fire(tree, next, Callbacks::mouse_enter, &event);
            }
        }

        match (self.last_mouse_down, mouse_down) {
            (false, true) => self.press(tree),
            (true, false) => self.release(tree),
            (true, true) if moved => {
                if let Some(down) = self.down {
                    let event = self.mouse_event(tree, down);
                    self.drag_internal(tree, down, &event);
                    self.fire(tree, down, Callbacks::mouse_move, &event);
                }
            }
            (false, false) if moved => {
                if let Some(hover) = self.hover {
                    let event = self.mouse_event(tree, hover);
                    self.fire(tree, hover, Callbacks::mouse_move, &event);
                }
            }
            _ => {}
        }

        self.dispatch_queued(tree);
    }

    fn press(&mut self, tree: &mut ControlTree) {
        let Some(target) = self.hover else {
            self.focus(tree, None);
            return;
        };

        self.down = Some(target);
        let event = self.mouse_event(tree, target);
        self.mouse_down_internal(tree, target, &event);
        self.fire(tree, target, Callbacks::mouse_down, &event);

        if tree.contains(target) && self.focus != Some(target) {
            self.focus(tree, Some(target));
        }
    }

    fn release(&mut self, tree: &mut ControlTree) {
        let Some(target) = self.down else {
            return;
        };

        let event = self.mouse_event(tree, target);
        if let Some(text_box) = tree.get_mut(target).and_then(Control::text_box_mut) {
            text_box.end_selection();
        }
        self.fire(tree, target, Callbacks::mouse_up, &event);

        // Only a release over the pressed control is a click
        if self.hover == Some(target) && self.down == Some(target) {
            self.click_internal(tree, target);
            self.fire(tree, target, Callbacks::click, &event);
        }
        self.down = None;
    }

    fn dispatch_queued(&mut self, tree: &mut ControlTree) {
        let writes = std::mem::take(&mut self.writes);
        for character in writes {
            let Some(focus) = self.focus else {
                trace!("no focus, dropping {character:?}");
                break;
            };
            if let Some(text_box) = tree.get_mut(focus).and_then(Control::text_box_mut) {
                text_box.write(character);
            }
            self.fire(tree, focus, Callbacks::write, &WriteEvent { character });
        }

        let keys = std::mem::take(&mut self.keys);
        for event in keys {
            let Some(focus) = self.focus else {
                trace!("no focus, dropping {:?}", event.key);
                break;
            };
            self.key_down_internal(tree, focus, &event);
            self.fire(tree, focus, Callbacks::key_down, &event);
        }
    }

    // ========== Focus ==========

    /// Move focus to `target`, firing lose-focus then gain-focus.
    ///
    /// Disabled or missing targets are ignored; `None` clears focus.
    pub fn focus(&mut self, tree: &mut ControlTree, target: Option<ControlId>) {
        self.sync(tree);
        if let Some(id) = target {
            if !tree.get(id).is_some_and(Control::is_enabled) {
                debug!("ignoring focus request for disabled or missing {id:?}");
                return;
            }
        }
        if target == self.focus {
            return;
        }

        let previous = std::mem::replace(&mut self.focus, target);
        debug!("focus {previous:?} -> {target:?}");

        if let Some(previous) = previous {
            let committed = tree
                .get_mut(previous)
                .and_then(Control::text_box_mut)
                .and_then(|text_box| text_box.lose_focus());
            self.fire(tree, previous, Callbacks::lose_focus, &FocusEvent);
            if let Some(text) = committed {
                self.fire(tree, previous, Callbacks::text_changed, &TextEvent { text });
            }
        }

        // A lose-focus callback may already have moved focus elsewhere
        if let Some(next) = target.filter(|next| self.focus == Some(*next)) {
            if let Some(text_box) = tree.get_mut(next).and_then(Control::text_box_mut) {
                text_box.gain_focus();
            }
            self.fire(tree, next, Callbacks::gain_focus, &FocusEvent);
        }
    }

    // ========== Rendering ==========

    /// Draw the subtree of `root` top-down, first child first
    pub fn render(&mut self, tree: &ControlTree, root: ControlId) {
        let parent_rect = tree.parent_rect(root, self.screen_rect());
        self.render_control(tree, root, parent_rect);
    }

    fn render_control(&mut self, tree: &ControlTree, id: ControlId, parent_rect: Rect) {
        let Some(control) = tree.get(id) else {
            return;
        };
        if !control.visible {
            return;
        }

        let rect = control.placement.resolve(parent_rect);
        let state = self.state(tree, id);
        if let Some(style) = self.styles.style_mut(control.kind(), control.style.hash) {
            style(control, rect, state);
        }

        if let Some(tree_view) = control.tree_view() {
            if let Some(item_style) = self.styles.item_style_mut(control.style.hash) {
                for row in tree_view.visible_rows(rect) {
                    if let Some(item) = tree_view.item(row.item) {
                        item_style(item, row.rect);
                    }
                }
            }
        }

        for child in control.children() {
            self.render_control(tree, *child, rect);
        }
    }

    // ========== Dispatch ==========

    fn mouse_event(&self, tree: &ControlTree, id: ControlId) -> MouseEvent {
        let origin = tree.world_rect(id, self.screen_rect()).position;
        MouseEvent {
            mouse_pos: self.mouse_pos,
            local_mouse_pos: self.mouse_pos - origin,
            is_mouse_down: self.mouse_down,
        }
    }

    /// Run a user callback with the callback temporarily taken out of its slot,
    /// then forget whatever the callback removed from the tree
    fn fire<E>(&mut self, tree: &mut ControlTree, id: ControlId, slot: Slot<E>, event: &E) {
        let Some(control) = tree.get_mut(id) else {
            return;
        };
        let Some(mut callback) = slot(&mut control.callbacks).take() else {
            return;
        };

        trace!("dispatching {} to {id:?}", std::any::type_name::<E>());
        callback(
            &mut EventCx {
                tree: &mut *tree,
                context: &mut *self,
                control: id,
            },
            event,
        );

        // The callback may have registered a replacement for itself
        if let Some(control) = tree.get_mut(id) {
            let slot = slot(&mut control.callbacks);
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
        self.sync(tree);
    }

    fn caret_at(&self, control: &Control, local: Vec2) -> Option<usize> {
        let solver = self.styles.caret_solver(control.kind(), control.style.hash);
        if solver.is_none() {
            debug!("no caret solver for text box {:?}", control.name);
        }
        solver.map(|solve| solve(control, local))
    }

    fn mouse_down_internal(&mut self, tree: &mut ControlTree, id: ControlId, event: &MouseEvent) {
        let Some(control) = tree.get(id) else {
            return;
        };

        match control.kind() {
            ControlKind::TextBox => {
                let caret = self.caret_at(control, event.local_mouse_pos);
                if let Some(text_box) = tree.get_mut(id).and_then(Control::text_box_mut) {
                    let pos = caret.unwrap_or(text_box.cursor());
                    text_box.begin_selection(pos);
                }
            }
            ControlKind::TreeView => {
                let rect = tree.world_rect(id, self.screen_rect());
                let ctrl = self.modifiers.ctrl;
                let Some(tree_view) = tree.get_mut(id).and_then(Control::tree_view_mut) else {
                    return;
                };
                if tree_view.press(rect, event.mouse_pos, ctrl) {
                    let selected_items = tree_view.selected_items().to_vec();
                    self.fire(
                        tree,
                        id,
                        Callbacks::selection_changed,
                        &SelectionEvent { selected_items },
                    );
                }
            }
            _ => {}
        }
    }

    fn drag_internal(&mut self, tree: &mut ControlTree, id: ControlId, event: &MouseEvent) {
        let Some(control) = tree.get(id) else {
            return;
        };
        if !control.text_box().is_some_and(|text_box| text_box.is_selecting()) {
            return;
        }

        if let Some(pos) = self.caret_at(control, event.local_mouse_pos) {
            if let Some(text_box) = tree.get_mut(id).and_then(Control::text_box_mut) {
                text_box.drag_selection(pos);
            }
        }
    }

    fn click_internal(&mut self, tree: &mut ControlTree, id: ControlId) {
        let Some(check_box) = tree.get(id).and_then(Control::check_box) else {
            return;
        };

        let target = check_box.clicked_state();
        let Ok(changed) = tree.set_checked(id, target) else {
            return;
        };
        for changed_id in changed {
            let is_checked = tree.is_checked(changed_id);
            self.fire(
                tree,
                changed_id,
                Callbacks::check_changed,
                &CheckEvent { is_checked },
            );
        }
    }

    fn key_down_internal(&mut self, tree: &mut ControlTree, id: ControlId, event: &KeyEvent) {
        let Some(text_box) = tree.get_mut(id).and_then(Control::text_box_mut) else {
            return;
        };
        if !text_box.key_down(event.key, event.modifiers) {
            return;
        }
        if let Some(text) = text_box.commit() {
            self.fire(tree, id, Callbacks::text_changed, &TextEvent { text });
        }
    }
}
