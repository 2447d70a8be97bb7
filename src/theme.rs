//! Theme mode store.
//!
//! The selected mode (`light`, `dark` or `system`) is persisted under two
//! storage keys: one read at startup and one mirrored for the theme menu.
//! Applying a mode writes the *effective* theme to `data-bs-theme` on the
//! document root, resolving `system` through a [`SystemTheme`] provider
//! (the `prefers-color-scheme` media query in the browser).

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::consts::{THEME_ATTR, THEME_MENU_MODE_KEY, THEME_MODE_KEY};
use crate::dom::Document;
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the operating system preference.
    System,
}

impl ThemeMode {
    pub const ALL: [Self; 3] = [Self::Light, Self::Dark, Self::System];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// The concrete theme to render. Never returns [`ThemeMode::System`].
    #[must_use]
    pub fn resolve(self, system: &dyn SystemTheme) -> Self {
        match self {
            Self::System if system.prefers_dark() => Self::Dark,
            Self::System => Self::Light,
            concrete => concrete,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme mode: {0}")]
pub struct UnknownThemeMode(pub String);

impl FromStr for ThemeMode {
    type Err = UnknownThemeMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownThemeMode(s.to_owned()))
    }
}

/// Source of the operating system colour-scheme preference.
pub trait SystemTheme {
    fn prefers_dark(&self) -> bool;
}

/// A [`SystemTheme`] with a fixed answer, for native builds and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedSystemTheme {
    pub dark: bool,
}

impl SystemTheme for FixedSystemTheme {
    fn prefers_dark(&self) -> bool {
        self.dark
    }
}

/// The selected theme mode, as last loaded or set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeStore {
    mode: Option<ThemeMode>,
}

impl ThemeStore {
    /// Read the selected mode from storage. Absent, unreadable, or unknown
    /// values leave the mode unset.
    #[must_use]
    pub fn load(storage: &dyn Storage) -> Self {
        Self { mode: read_mode(storage, THEME_MODE_KEY) }
    }

    #[must_use]
    pub fn mode(&self) -> Option<ThemeMode> {
        self.mode
    }

    /// Mode shown as selected in the theme menu.
    #[must_use]
    pub fn menu_mode(storage: &dyn Storage) -> Option<ThemeMode> {
        read_mode(storage, THEME_MENU_MODE_KEY)
    }

    /// Persist `mode`, remember it, and apply the effective theme to the root.
    ///
    /// Returns the effective theme written to `data-bs-theme`.
    pub fn set_theme_mode(
        &mut self,
        mode: ThemeMode,
        storage: &mut dyn Storage,
        document: &mut dyn Document,
        system: &dyn SystemTheme,
    ) -> ThemeMode {
        for key in [THEME_MODE_KEY, THEME_MENU_MODE_KEY] {
            if let Err(e) = storage.set_item(key, mode.as_str()) {
                warn!(key, mode = %mode, error = %e, "failed to persist theme mode");
            }
        }
        self.mode = Some(mode);
        apply_theme(mode, document, system)
    }

    /// Re-apply the loaded mode to the root, e.g. after page load.
    ///
    /// Returns `None` (and leaves the root alone) when no mode is selected.
    pub fn apply(&self, document: &mut dyn Document, system: &dyn SystemTheme) -> Option<ThemeMode> {
        self.mode.map(|mode| apply_theme(mode, document, system))
    }
}

fn apply_theme(mode: ThemeMode, document: &mut dyn Document, system: &dyn SystemTheme) -> ThemeMode {
    let effective = mode.resolve(system);
    let root = document.root();
    if let Err(e) = document.set_attribute(root, THEME_ATTR, effective.as_str()) {
        warn!(attr = THEME_ATTR, error = %e, "failed to apply theme to document root");
    }
    debug!(mode = %mode, effective = %effective, "theme applied");
    effective
}

fn read_mode(storage: &dyn Storage, key: &str) -> Option<ThemeMode> {
    let raw = match storage.get_item(key) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(key, error = %e, "failed to read theme mode");
            return None;
        }
    };
    match raw.parse::<ThemeMode>() {
        Ok(mode) => Some(mode),
        Err(e) => {
            warn!(key, error = %e, "ignoring stored theme mode");
            None
        }
    }
}
