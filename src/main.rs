//! Native walkthrough of the drawer toggle, the layout store, and the theme store.
//!
//! Run with `RUST_LOG=kt_toggle=debug` to see every transition.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;
use tracing::{error, info};

use kt_toggle::config::ToggleOptions;
use kt_toggle::dom::{Document, ElementId, MemoryDocument};
use kt_toggle::error::DomError;
use kt_toggle::events::ToggleEvent;
use kt_toggle::host::ToggleHost;
use kt_toggle::layout_config::LayoutConfigStore;
use kt_toggle::persistence::{MemoryPersistence, Persistence};
use kt_toggle::storage::MemoryStorage;
use kt_toggle::theme::{FixedSystemTheme, ThemeMode, ThemeStore};
use kt_toggle::toggle::ClickEvent;

fn drawer_page() -> Result<(MemoryDocument, ElementId), DomError> {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    let button = doc.create_element_with(
        body,
        "button",
        &[
            ("data-kt-toggle", "true"),
            ("data-kt-toggle-target", "#kt_drawer"),
            ("data-kt-toggle-state", "active"),
            ("data-kt-toggle-name", "drawer"),
        ],
    )?;
    doc.create_element_with(body, "div", &[("id", "kt_drawer")])?;
    Ok((doc, button))
}

fn run() -> Result<(), DomError> {
    let (doc, button) = drawer_page()?;
    let options = ToggleOptions { save_state: true, ..Default::default() };
    let mut host = ToggleHost::with_options(doc, MemoryPersistence::new(), options);
    host.bootstrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    for event in ToggleEvent::ALL {
        let seen = Rc::clone(&seen);
        host.events_mut()
            .on(button, event, move |args| seen.borrow_mut().push(args.event.name()));
    }

    for _ in 0..2 {
        host.click(button, &mut ClickEvent::new());
        let events = std::mem::take(&mut *seen.borrow_mut());
        info!(
            enabled = host.is_enabled(button),
            persisted = ?host.persistence().get("data-kt-drawer"),
            events = ?events,
            "drawer clicked"
        );
    }

    let mut storage = MemoryStorage::new();
    let mut layout = LayoutConfigStore::new(json!({ "aside": { "minimized": false } }));
    layout.override_from(&storage);
    if let Err(e) = layout.set("aside.minimized", json!(true), &mut storage) {
        error!(error = %e, "layout update rejected");
    }
    info!(key = layout.key(), config = %layout.config(), "layout config");

    let mut theme = ThemeStore::load(&storage);
    let effective =
        theme.set_theme_mode(ThemeMode::System, &mut storage, host.document_mut(), &FixedSystemTheme { dark: true });
    let root = host.document().root();
    info!(
        mode = ?theme.mode(),
        %effective,
        root = ?host.document().get_attribute(root, "data-bs-theme"),
        "theme applied"
    );
    Ok(())
}

fn main() {
    kt_toggle::logging::init();
    if let Err(e) = run() {
        error!(error = %e, "demo failed");
        std::process::exit(1);
    }
}
