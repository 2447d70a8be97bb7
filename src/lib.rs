//! Attribute-driven toggle widget for DOM-like documents.
//!
//! A controlling element (`data-kt-toggle`) flips a named boolean state on a
//! target element. The state lives on the target as `data-kt-<name>="on"` and
//! is re-read on every query, so whatever last wrote that attribute decides
//! the state. Transitions are gated by a mode, optionally persisted, and
//! announced through before/after events. Beside the widget sit two small
//! persisted stores: the layout configuration and the theme mode.
//!
//! The crate runs natively against [`dom::MemoryDocument`] (tests, demo
//! binary) and in the browser behind the `hydrate` feature, where
//! `browser` backs the same traits with web-sys.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`toggle`] | The [`toggle::Toggle`] state machine and the collaborators it drives |
//! | [`host`] | [`host::ToggleHost`]: bootstrap, instance registry, click routing |
//! | [`config`] | Typed options and attribute configuration |
//! | [`events`] | Lifecycle event names and the per-element event bus |
//! | [`dom`] | Element handles, the `Document` trait, in-memory document |
//! | [`selector`] | The CSS selector subset behind in-memory queries |
//! | [`registry`] | Per-element keyed instance registry |
//! | [`intern`] | Stamped handle table for live DOM nodes |
//! | [`persistence`] | Flag persistence used by `saveState` |
//! | [`storage`] | String key/value storage used by the stores |
//! | [`layout_config`] | Persisted layout configuration store |
//! | [`theme`] | Light/dark/system theme store |
//! | [`logging`] | Tracing subscriber setup |
//! | [`error`] | Error types |
//! | [`consts`] | Attribute names, selectors, storage keys |

pub mod config;
pub mod consts;
pub mod dom;
pub mod error;
pub mod events;
pub mod host;
pub mod intern;
pub mod layout_config;
pub mod logging;
pub mod persistence;
pub mod registry;
pub mod selector;
pub mod storage;
pub mod theme;
pub mod toggle;

#[cfg(feature = "hydrate")]
pub mod browser;
