//! Check boxes and sibling group behavior

use log::warn;
use trellis_macros::{LoadProperties, WithBuilders};

use crate::control::ControlId;
use crate::error::TreeError;
use crate::property::property_enum;
use crate::tree::ControlTree;

/// How a check box interacts with sibling check boxes sharing the same behavior
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CheckBehavior {
    /// Independent toggle
    #[default]
    Normal,
    /// Radio button: exactly one sibling stays checked
    Exclusive,
    /// Radio button that may also be unchecked, leaving none checked
    Optional,
}

property_enum!(CheckBehavior, "check behavior", {
    "normal" => CheckBehavior::Normal,
    "exclusive" => CheckBehavior::Exclusive,
    "optional" => CheckBehavior::Optional,
});

#[derive(Clone, Debug, Default, PartialEq, WithBuilders, LoadProperties)]
pub struct CheckBox {
    #[property("caption")]
    pub caption: String,
    #[property("checked")]
    pub checked: bool,
    #[property("behavior")]
    pub behavior: CheckBehavior,
}

impl CheckBox {
    /// State a click asks for
    pub fn clicked_state(&self) -> bool {
        match self.behavior {
            CheckBehavior::Normal | CheckBehavior::Optional => !self.checked,
            CheckBehavior::Exclusive => true,
        }
    }
}

impl ControlTree {
    /// Check or uncheck a check box, applying its group behavior to siblings.
    ///
    /// Returns every check box whose state changed, the target first. No
    /// callbacks fire; the context fires `on_check_changed` for clicks.
    pub fn set_checked(&mut self, id: ControlId, checked: bool) -> Result<Vec<ControlId>, TreeError> {
        let control = self.get(id).ok_or(TreeError::Missing(id))?;
        let Some(check_box) = control.check_box() else {
            warn!("set_checked on {id:?}, which is a {:?}", control.kind());
            return Ok(Vec::new());
        };

        let behavior = check_box.behavior;
        if check_box.checked == checked {
            return Ok(Vec::new());
        }
        if !checked && behavior == CheckBehavior::Exclusive {
            return Ok(Vec::new());
        }

        let mut changed = vec![id];
        if checked && behavior != CheckBehavior::Normal {
            let siblings = control
                .parent()
                .and_then(|parent| self.get(parent))
                .map(|parent| parent.children().to_vec())
                .unwrap_or_default();

            for sibling in siblings.into_iter().filter(|sibling| *sibling != id) {
                let Some(other) = self.get_mut(sibling).and_then(|c| c.check_box_mut()) else {
                    continue;
                };
                if other.behavior == behavior && other.checked {
                    other.checked = false;
                    changed.push(sibling);
                }
            }
        }

        if let Some(check_box) = self.get_mut(id).and_then(|c| c.check_box_mut()) {
            check_box.checked = checked;
        }
        Ok(changed)
    }

    pub fn is_checked(&self, id: ControlId) -> bool {
        self.get(id)
            .and_then(|control| control.check_box())
            .is_some_and(|check_box| check_box.checked)
    }
}
