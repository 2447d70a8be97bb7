//! Attribute names, selectors, and storage keys shared by the widget and stores.

/// Attribute marking an element as a toggle controller.
pub const TOGGLE_MARKER_ATTR: &str = "data-kt-toggle";

/// Selector used by `bootstrap` and `reinitialization`.
pub const TOGGLE_SELECTOR: &str = "[data-kt-toggle]";

/// Selector of the element whose attribute carries the toggle state.
pub const TARGET_ATTR: &str = "data-kt-toggle-target";

/// Class added to the controlling element while enabled.
pub const STATE_CLASS_ATTR: &str = "data-kt-toggle-state";

/// Transition policy: `""`, `"on"` or `"off"`.
pub const MODE_ATTR: &str = "data-kt-toggle-mode";

/// Name used to derive the state attribute written on the target.
pub const NAME_ATTR: &str = "data-kt-toggle-name";

/// Name used when `data-kt-toggle-name` is absent, giving `data-kt-null`.
pub const MISSING_NAME: &str = "null";

/// Prefix of the derived state attribute.
pub const STATE_ATTR_PREFIX: &str = "data-kt-";

/// Value of the derived state attribute while enabled.
pub const ENABLED_VALUE: &str = "on";

/// Attribute stamping a live element with its document handle.
pub const ELEMENT_REF_ATTR: &str = "data-kt-ref";

/// Registry key under which toggle instances are stored.
pub const INSTANCE_KEY: &str = "toggle";

/// Root attribute carrying the effective theme.
pub const THEME_ATTR: &str = "data-bs-theme";

/// Storage key of the selected theme mode.
pub const THEME_MODE_KEY: &str = "kt_theme_mode_value";

/// Storage key of the theme mode shown in the theme menu.
pub const THEME_MENU_MODE_KEY: &str = "kt_theme_mode_menu";

/// Demo name baked in at compile time; selects the layout config storage key.
pub const APP_DEMO: &str = match option_env!("KT_APP_DEMO") {
    Some(demo) => demo,
    None => "demo1",
};
