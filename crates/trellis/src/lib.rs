//! # trellis
//!
//! Retained-mode UI core that stays out of the drawing business.
//!
//! Controls live in a [`ControlTree`] arena and are addressed by [`ControlId`].
//! Every frame the host feeds pointer and keyboard input into a [`UiContext`],
//! which hit-tests the tree, tracks hover/down/focus and dispatches callbacks.
//! Drawing is delegated to style functions registered per control kind in a
//! [`StyleRegistry`].
//!
//! ## Core Types
//!
//! - [`ControlTree`] - Owns every control and the parent/child structure
//! - [`Control`] - Common control data plus a kind-specific [`Widget`]
//! - [`UiContext`] - Per-frame input, interaction pointers and event dispatch
//!
//! ## Layout
//!
//! - [`Placement`] - Rectangle, anchor, alignment and measurement modes
//! - [`Rect`] - Axis-aligned rectangle in pixels
//!
//! ## Widgets
//!
//! - [`CheckBox`] - Toggle with normal, exclusive and optional group behavior
//! - [`TreeView`] - Hierarchical item list with selection and expansion
//! - [`TextBox`] - Single-line editable text with selection
//!
//! ## Input & Events
//!
//! - [`FrameInput`] - Host input accumulated over one frame
//! - [`EventCx`] - What a callback gets to touch while handling an event
//!
//! ## Definitions
//!
//! - [`ControlDefinition`] - Parsed property tree a subtree is loaded from
//! - [`LoadProperties`] - Applying properties onto controls and widgets

// Lets the derive macros refer to `::trellis` from inside this crate
extern crate self as trellis;

mod check_box;
mod color;
mod context;
mod control;
mod error;
mod events;
mod geometry;
mod input;
mod property;
mod style;
mod text_box;
mod tree;
mod tree_view;

// Core types
pub use context::*;
pub use control::*;
pub use error::*;
pub use tree::*;

// Layout & styling
pub use color::*;
pub use geometry::*;
pub use style::*;

// Widgets
pub use check_box::*;
pub use text_box::*;
pub use tree_view::*;

// Input & Events
pub use events::*;
pub use input::*;

// Definitions
pub use property::*;

pub use glam::Vec2;
pub use trellis_macros::{LoadProperties, WithBuilders};
