//! Event payloads and per-control callback slots
//!
//! Callbacks receive an [`EventCx`] giving mutable access to the tree and the
//! context, so handlers may restructure the tree or move focus while an event is
//! being dispatched.

use glam::Vec2;

use crate::context::UiContext;
use crate::control::{Control, ControlId};
use crate::input::{Key, Modifiers};
use crate::tree::ControlTree;
use crate::tree_view::ItemId;

/// Pointer sample delivered with mouse events
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    /// Position in world coordinates
    pub mouse_pos: Vec2,
    /// Position relative to the target's top-left corner
    pub local_mouse_pos: Vec2,
    pub is_mouse_down: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteEvent {
    pub character: char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckEvent {
    pub is_checked: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusEvent;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionEvent {
    pub selected_items: Vec<ItemId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEvent {
    pub text: String,
}

/// Everything a callback may touch while handling an event
pub struct EventCx<'a> {
    pub tree: &'a mut ControlTree,
    pub context: &'a mut UiContext,
    /// Control the event was dispatched to
    pub control: ControlId,
}

impl EventCx<'_> {
    /// Move focus, firing lose/gain focus callbacks
    pub fn focus(&mut self, target: Option<ControlId>) {
        self.context.focus(self.tree, target);
    }

    pub fn this(&self) -> Option<&Control> {
        self.tree.get(self.control)
    }

    pub fn this_mut(&mut self) -> Option<&mut Control> {
        self.tree.get_mut(self.control)
    }
}

pub type Callback<E> = Box<dyn FnMut(&mut EventCx<'_>, &E)>;

/// Accessor for one callback slot, used by the dispatcher to take and restore it
pub(crate) type Slot<E> = fn(&mut Callbacks) -> &mut Option<Callback<E>>;

macro_rules! callbacks {
    ($($field:ident / $slot:ident: $event:ty),* $(,)?) => {
        /// User callbacks registered on a control
        #[derive(Default)]
        pub struct Callbacks {
            $(pub(crate) $field: Option<Callback<$event>>,)*
        }

        impl Callbacks {
            $(
                pub(crate) fn $slot(&mut self) -> &mut Option<Callback<$event>> {
                    &mut self.$field
                }
            )*
        }

        impl Control {
            $(
                pub fn $field(
                    &mut self,
                    callback: impl FnMut(&mut EventCx<'_>, &$event) + 'static,
                ) -> &mut Self {
                    self.callbacks.$field = Some(Box::new(callback));
                    self
                }
            )*
        }
    };
}

callbacks! {
    on_click / click: MouseEvent,
    on_mouse_down / mouse_down: MouseEvent,
    on_mouse_up / mouse_up: MouseEvent,
    on_mouse_move / mouse_move: MouseEvent,
    on_mouse_enter / mouse_enter: MouseEvent,
    on_mouse_leave / mouse_leave: MouseEvent,
    on_gain_focus / gain_focus: FocusEvent,
    on_lose_focus / lose_focus: FocusEvent,
    on_key_down / key_down: KeyEvent,
    on_write / write: WriteEvent,
    on_check_changed / check_changed: CheckEvent,
    on_selection_changed / selection_changed: SelectionEvent,
    on_text_changed / text_changed: TextEvent,
}

impl Callbacks {
    /// Drop every registered callback
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
