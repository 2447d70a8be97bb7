//! End-to-end drawer scenario through the public API: bootstrap a page,
//! click the controller twice, and observe the target, the persisted flag,
//! and the event sequence.

use std::cell::RefCell;
use std::rc::Rc;

use kt_toggle::config::ToggleOptions;
use kt_toggle::consts::TOGGLE_MARKER_ATTR;
use kt_toggle::dom::{Document, ElementId, MemoryDocument};
use kt_toggle::events::ToggleEvent;
use kt_toggle::host::ToggleHost;
use kt_toggle::persistence::{MemoryPersistence, Persistence};
use kt_toggle::toggle::ClickEvent;

struct Page {
    host: ToggleHost<MemoryDocument, MemoryPersistence>,
    controller: ElementId,
    target: ElementId,
    seen: Rc<RefCell<Vec<String>>>,
}

impl Page {
    fn drawer() -> Self {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let controller = doc
            .create_element_with(
                body,
                "a",
                &[
                    (TOGGLE_MARKER_ATTR, ""),
                    ("data-kt-toggle-target", "#kt_drawer"),
                    ("data-kt-toggle-mode", ""),
                    ("data-kt-toggle-name", "drawer"),
                ],
            )
            .expect("controller");
        let target = doc.create_element_with(body, "div", &[("id", "kt_drawer")]).expect("target");

        let options = ToggleOptions { save_state: true, ..Default::default() };
        let mut host = ToggleHost::with_options(doc, MemoryPersistence::new(), options);
        assert_eq!(host.bootstrap(), 1);

        let seen = Rc::new(RefCell::new(Vec::new()));
        for event in ToggleEvent::ALL {
            let seen = Rc::clone(&seen);
            host.events_mut()
                .on(controller, event, move |args| seen.borrow_mut().push(args.event.to_string()));
        }
        Self { host, controller, target, seen }
    }

    fn click(&mut self) -> ClickEvent {
        let mut click = ClickEvent::new();
        assert_eq!(self.host.click(self.controller, &mut click), Some(true));
        click
    }

    fn events(&self) -> Vec<String> {
        std::mem::take(&mut *self.seen.borrow_mut())
    }

    fn target_state(&self) -> Option<String> {
        self.host.document().get_attribute(self.target, "data-kt-drawer")
    }
}

#[test]
fn drawer_click_enables_then_disables() {
    let mut page = Page::drawer();
    assert_eq!(page.target_state(), None);
    assert_eq!(page.host.is_enabled(page.controller), Some(false));

    let click = page.click();
    assert!(click.default_prevented());
    assert_eq!(page.target_state().as_deref(), Some("on"));
    assert_eq!(page.host.persistence().get("data-kt-drawer").as_deref(), Some("on"));
    assert_eq!(
        page.events(),
        ["toggle.change", "toggle.enable", "toggle.enabled", "toggle.changed"]
    );

    page.click();
    assert_eq!(page.target_state(), None);
    assert_eq!(page.host.persistence().get("data-kt-drawer"), None);
    assert_eq!(
        page.events(),
        ["toggle.change", "toggle.disable", "toggle.disabled", "toggle.changed"]
    );
}

#[test]
fn rebootstrap_does_not_duplicate_listeners_or_instances() {
    let mut page = Page::drawer();
    let uid = page.host.get_instance(page.controller).expect("toggle").uid().to_owned();

    assert_eq!(page.host.bootstrap(), 0);
    assert_eq!(page.host.reinitialization(), 0);
    assert_eq!(page.host.get_instance(page.controller).expect("toggle").uid(), uid);

    page.click();
    assert_eq!(page.events().len(), 4);
}

#[test]
fn external_attribute_write_is_the_source_of_truth() {
    let mut page = Page::drawer();
    let target = page.target;
    page.host
        .document_mut()
        .set_attribute(target, "data-kt-drawer", "On")
        .expect("external write");
    assert_eq!(page.host.is_enabled(page.controller), Some(true));

    page.click();
    assert_eq!(page.target_state(), None);
    assert_eq!(
        page.events(),
        ["toggle.change", "toggle.disable", "toggle.disabled", "toggle.changed"]
    );
}
