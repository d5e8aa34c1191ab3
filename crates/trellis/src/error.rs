use thiserror::Error;

use crate::control::ControlId;

/// Structural misuse of the control tree.
///
/// Every operation returning this leaves the tree unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("control {0:?} does not exist")]
    Missing(ControlId),
    #[error("cannot add control {0:?} as a child of itself")]
    SelfParent(ControlId),
    #[error("cannot add {child:?} under {parent:?}: {child:?} is one of its ancestors")]
    Cycle { parent: ControlId, child: ControlId },
    #[error("control {child:?} already has parent {parent:?}, remove it first")]
    AlreadyParented { child: ControlId, parent: ControlId },
    #[error("control {child:?} is not a child of {parent:?}")]
    NotAChild { parent: ControlId, child: ControlId },
    #[error("control {0:?} is not retained")]
    NotRetained(ControlId),
}

/// A declarative property that could not be interpreted
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("{value:?} is not a valid {expected}")]
    UnknownVariant { expected: &'static str, value: String },
    #[error("invalid color {0:?}")]
    InvalidColor(String),
}
