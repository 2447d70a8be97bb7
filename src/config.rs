//! Typed toggle configuration.
//!
//! Two inputs configure a toggle: the caller-supplied [`ToggleOptions`] and
//! the declarative attributes on the controlling element, which
//! [`ToggleConfig::from_element`] reads exactly once at construction.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::{MISSING_NAME, MODE_ATTR, NAME_ATTR, STATE_ATTR_PREFIX, STATE_CLASS_ATTR, TARGET_ATTR};
use crate::dom::{Document, ElementId};
use crate::persistence::PersistOptions;

/// Caller-supplied options. Deserializes from `{"saveState": true}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToggleOptions {
    /// Mirror enable/disable into the persistence adapter.
    pub save_state: bool,
    /// Options passed along with every persisted flag.
    pub persist: PersistOptions,
}

/// Transition policy applied to clicks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ToggleMode {
    /// `""`: every click flips the state.
    #[default]
    Free,
    /// `"on"`: clicks only switch an enabled toggle off.
    On,
    /// `"off"`: clicks only switch a disabled toggle on.
    Off,
    /// Any other value. Clicks never transition.
    Unrecognized(String),
}

impl ToggleMode {
    /// Parse the raw mode attribute. Absent and empty both mean [`ToggleMode::Free`].
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("") {
            "" => Self::Free,
            "on" => Self::On,
            "off" => Self::Off,
            other => Self::Unrecognized(other.to_owned()),
        }
    }

    /// Attribute spelling of the mode.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Free => "",
            Self::On => "on",
            Self::Off => "off",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Whether a click may transition a toggle currently in the given state.
    #[must_use]
    pub fn allows_click(&self, enabled: bool) -> bool {
        match self {
            Self::Free => true,
            Self::On => enabled,
            Self::Off => !enabled,
            Self::Unrecognized(_) => false,
        }
    }
}

/// Configuration read from the controlling element's attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleConfig {
    /// Selector locating the target element; `None` when absent or empty.
    pub target_selector: Option<String>,
    /// Class applied to the controlling element while enabled.
    pub state_class: Option<String>,
    pub mode: ToggleMode,
    /// Toggle name as written on the element, or `"null"` when absent.
    pub name: String,
    /// Derived state attribute, `"data-kt-" + name`.
    pub attribute: String,
}

impl ToggleConfig {
    /// Build a config from explicit values, deriving the state attribute.
    #[must_use]
    pub fn new(name: &str, target_selector: Option<&str>, state_class: Option<&str>, mode: ToggleMode) -> Self {
        Self {
            target_selector: non_empty(target_selector),
            state_class: non_empty(state_class),
            mode,
            name: name.to_owned(),
            attribute: format!("{STATE_ATTR_PREFIX}{name}"),
        }
    }

    /// Read the declarative toggle attributes from `element`.
    pub fn from_element(document: &dyn Document, element: ElementId) -> Self {
        let target = document.get_attribute(element, TARGET_ATTR);
        let state = document.get_attribute(element, STATE_CLASS_ATTR);
        let mode = ToggleMode::parse(document.get_attribute(element, MODE_ATTR).as_deref());
        let name = document.get_attribute(element, NAME_ATTR).unwrap_or_else(|| {
            warn!(element = element.index(), attr = NAME_ATTR, fallback = MISSING_NAME, "toggle has no name");
            MISSING_NAME.to_owned()
        });
        if let ToggleMode::Unrecognized(raw) = &mode {
            warn!(element = element.index(), mode = %raw, "unrecognized toggle mode; clicks are ignored");
        }
        Self::new(&name, target.as_deref(), state.as_deref(), mode)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_owned)
}
