//! Arena-backed control tree
//!
//! Every control lives in one [`SlotMap`] and is addressed by a [`ControlId`].
//! A parent owns its children: freeing a control frees its children too, unless
//! a child is retained, in which case the child is orphaned and stays alive until
//! its last [`release`](ControlTree::release).
//!
//! Controls that leave the tree (detached or freed) are recorded so that the
//! [`UiContext`](crate::UiContext) can drop any hover/down/focus reference to them.

use glam::Vec2;
use log::{debug, warn};
use slotmap::SlotMap;

use crate::control::{Control, ControlId, ControlKind};
use crate::error::TreeError;
use crate::geometry::Rect;
use crate::property::{ControlDefinition, LoadProperties};

#[derive(Debug, Default)]
pub struct ControlTree {
    controls: SlotMap<ControlId, Control>,
    /// Controls that left the tree since the context last synced
    detached: Vec<ControlId>,
}

impl ControlTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parentless control of the given kind
    pub fn create(&mut self, kind: ControlKind) -> ControlId {
        self.insert(Control::new(kind))
    }

    /// Store a control built outside the tree. It starts without a parent.
    pub fn insert(&mut self, mut control: Control) -> ControlId {
        control.parent = None;
        control.children.clear();
        control.retain_count = 0;
        self.controls.insert(control)
    }

    pub fn get(&self, id: ControlId) -> Option<&Control> {
        self.controls.get(id)
    }

    pub fn get_mut(&mut self, id: ControlId) -> Option<&mut Control> {
        self.controls.get_mut(id)
    }

    pub fn contains(&self, id: ControlId) -> bool {
        self.controls.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn parent(&self, id: ControlId) -> Option<ControlId> {
        self.get(id)?.parent
    }

    pub fn children(&self, id: ControlId) -> &[ControlId] {
        match self.get(id) {
            Some(control) => &control.children,
            None => &[],
        }
    }

    /// Whether `ancestor` is `id` itself or one of its ancestors
    pub fn is_ancestor(&self, ancestor: ControlId, id: ControlId) -> bool {
        let mut current = Some(id);
        while let Some(next) = current {
            if next == ancestor {
                return true;
            }
            current = self.parent(next);
        }
        false
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// Fails without touching the tree when `child` is `parent` or one of its
    /// ancestors, or when `child` already has a parent.
    pub fn add(&mut self, parent: ControlId, child: ControlId) -> Result<(), TreeError> {
        let result = self.check_add(parent, child);
        if let Err(err) = &result {
            warn!("add: {err}");
            return result;
        }

        if let Some(control) = self.controls.get_mut(child) {
            control.parent = Some(parent);
        }
        if let Some(control) = self.controls.get_mut(parent) {
            control.children.push(child);
        }
        Ok(())
    }

    fn check_add(&self, parent: ControlId, child: ControlId) -> Result<(), TreeError> {
        if !self.contains(parent) {
            return Err(TreeError::Missing(parent));
        }
        let control = self.get(child).ok_or(TreeError::Missing(child))?;
        if parent == child {
            return Err(TreeError::SelfParent(child));
        }
        if let Some(current) = control.parent {
            return Err(TreeError::AlreadyParented {
                child,
                parent: current,
            });
        }
        if self.is_ancestor(child, parent) {
            return Err(TreeError::Cycle { parent, child });
        }
        Ok(())
    }

    /// Detach `child` from `parent`, freeing it right away unless it is retained
    pub fn remove(&mut self, parent: ControlId, child: ControlId) -> Result<(), TreeError> {
        if self.parent(child) != Some(parent) {
            let err = if self.contains(child) {
                TreeError::NotAChild { parent, child }
            } else {
                TreeError::Missing(child)
            };
            warn!("remove: {err}");
            return Err(err);
        }

        self.detach(child);
        if self.get(child).is_some_and(|control| control.retain_count == 0) {
            self.free(child);
        }
        Ok(())
    }

    /// Detach a control from its parent (if any) and free it unless retained
    pub fn destroy(&mut self, id: ControlId) {
        let Some(control) = self.get(id) else {
            return;
        };
        let retained = control.retain_count > 0;

        self.detach(id);
        if retained {
            debug!("{id:?} is retained, destruction deferred to its last release");
        } else {
            self.free(id);
        }
    }

    /// Add an external reference that keeps the control alive outside the tree
    pub fn retain(&mut self, id: ControlId) -> Result<u32, TreeError> {
        let control = self.get_mut(id).ok_or(TreeError::Missing(id))?;
        control.retain_count += 1;
        Ok(control.retain_count)
    }

    /// Drop an external reference.
    ///
    /// A control released to zero while it has no parent is freed.
    pub fn release(&mut self, id: ControlId) -> Result<u32, TreeError> {
        let Some(control) = self.get_mut(id) else {
            warn!("release: control {id:?} does not exist");
            return Err(TreeError::Missing(id));
        };
        if control.retain_count == 0 {
            warn!("release: control {id:?} is not retained");
            return Err(TreeError::NotRetained(id));
        }

        control.retain_count -= 1;
        let count = control.retain_count;
        if count == 0 && control.parent.is_none() {
            debug!("last release of detached {id:?}");
            self.free(id);
        }
        Ok(count)
    }

    fn detach(&mut self, id: ControlId) {
        let Some(parent) = self.get_mut(id).and_then(|control| control.parent.take()) else {
            return;
        };
        if let Some(parent) = self.get_mut(parent) {
            parent.children.retain(|child| *child != id);
        }
        let subtree = self.descendants(id);
        self.detached.push(id);
        self.detached.extend(subtree);
    }

    /// Remove a control from the arena along with every unretained descendant.
    /// Retained descendants are orphaned instead.
    fn free(&mut self, id: ControlId) {
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            let Some(control) = self.controls.remove(next) else {
                continue;
            };
            debug!("freed {next:?} ({:?} {:?})", control.kind(), control.name);
            self.detached.push(next);

            for child in control.children {
                match self.controls.get_mut(child) {
                    Some(orphan) if orphan.retain_count > 0 => {
                        orphan.parent = None;
                        let subtree = self.descendants(child);
                        self.detached.push(child);
                        self.detached.extend(subtree);
                    }
                    Some(_) => pending.push(child),
                    None => {}
                }
            }
        }
    }

    pub(crate) fn drain_detached(&mut self) -> Vec<ControlId> {
        std::mem::take(&mut self.detached)
    }

    /// Every descendant of `id`, depth first
    pub fn descendants(&self, id: ControlId) -> Vec<ControlId> {
        let mut result = Vec::new();
        let mut pending: Vec<ControlId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = pending.pop() {
            result.push(next);
            pending.extend(self.children(next).iter().rev().copied());
        }
        result
    }

    /// Find a descendant by name, checking direct children before descending
    pub fn find(&self, root: ControlId, name: &str, search_sub_children: bool) -> Option<ControlId> {
        let children = self.children(root);
        if let Some(found) = children
            .iter()
            .find(|child| self.get(**child).is_some_and(|control| control.name == name))
        {
            return Some(*found);
        }
        if !search_sub_children {
            return None;
        }
        children
            .iter()
            .find_map(|child| self.find(*child, name, true))
    }

    /// Rectangle `id` resolves against: its parent's world rect, or `screen`
    pub fn parent_rect(&self, id: ControlId, screen: Rect) -> Rect {
        match self.parent(id) {
            Some(parent) => self.world_rect(parent, screen),
            None => screen,
        }
    }

    /// World rectangle of a control, resolving every ancestor from the screen down
    pub fn world_rect(&self, id: ControlId, screen: Rect) -> Rect {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(next) = current {
            let Some(control) = self.get(next) else {
                break;
            };
            chain.push(control);
            current = control.parent;
        }

        chain
            .iter()
            .rev()
            .fold(screen, |parent, control| control.placement.resolve(parent))
    }

    /// Move and resize a control so that it lands on `world`
    pub fn set_world_rect(&mut self, id: ControlId, world: Rect, screen: Rect) {
        let parent = self.parent_rect(id, screen);
        if let Some(control) = self.get_mut(id) {
            control.placement.set_world_rect(world, parent);
        }
    }

    /// Topmost control under `pos` in the subtree of `root`.
    ///
    /// Invisible or disabled controls hide their whole subtree from input. Later
    /// children win over earlier ones
    /// and over their parent. With `search_sub_children` off, only `root` and its
    /// direct children are considered.
    pub fn control_at(
        &self,
        root: ControlId,
        parent_rect: Rect,
        pos: Vec2,
        search_sub_children: bool,
        ignore_click_through: bool,
    ) -> Option<ControlId> {
        self.hit_test(
            root,
            parent_rect,
            pos,
            true,
            search_sub_children,
            ignore_click_through,
        )
    }

    fn hit_test(
        &self,
        id: ControlId,
        parent_rect: Rect,
        pos: Vec2,
        descend: bool,
        search_sub_children: bool,
        ignore_click_through: bool,
    ) -> Option<ControlId> {
        let control = self.get(id)?;
        if !control.is_enabled() {
            return None;
        }

        let rect = control.placement.resolve(parent_rect);
        if descend {
            // Children may stick out of their parent, so they are tested regardless of `rect`
            for child in control.children.iter().rev() {
                let hit = self.hit_test(
                    *child,
                    rect,
                    pos,
                    search_sub_children,
                    search_sub_children,
                    ignore_click_through,
                );
                if hit.is_some() {
                    return hit;
                }
            }
        }

        let targetable = !(ignore_click_through && control.click_through);
        (targetable && rect.contains(pos)).then_some(id)
    }

    /// Build a subtree from a parsed definition
    pub fn load(&mut self, definition: &ControlDefinition) -> ControlId {
        let mut control = Control::new(definition.kind);
        control.load_properties(&definition.properties);
        let id = self.insert(control);

        for child_definition in &definition.children {
            let child = self.load(child_definition);
            if let Err(err) = self.add(id, child) {
                warn!("load: {err}");
            }
        }
        id
    }

    /// Deep copy of a subtree, without callbacks, user data or parent
    pub fn duplicate(&mut self, id: ControlId) -> Option<ControlId> {
        let copy = self.get(id)?.duplicate();
        let children = self.children(id).to_vec();
        let copy_id = self.insert(copy);

        for child in children {
            if let Some(child_copy) = self.duplicate(child) {
                if let Err(err) = self.add(copy_id, child_copy) {
                    warn!("duplicate: {err}");
                }
            }
        }
        Some(copy_id)
    }
}
