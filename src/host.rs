//! Page-level owner of the toggle collaborators and the instance registry.
//!
//! [`ToggleHost`] is the only place toggles are created. It scans the
//! descendants of `<body>` for controlling elements, creates at most one [`Toggle`] per
//! element (insert-if-absent under the `"toggle"` key), and routes clicks to
//! the instance bound to the clicked element. In the browser the host is
//! shared behind `Rc<RefCell<..>>` by `browser::mount`.

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use tracing::{debug, info, warn};

use crate::config::ToggleOptions;
use crate::consts::{INSTANCE_KEY, TOGGLE_SELECTOR};
use crate::dom::{Document, ElementId};
use crate::events::EventBus;
use crate::persistence::Persistence;
use crate::registry::InstanceRegistry;
use crate::toggle::{ClickEvent, Toggle, ToggleEnv};

/// Owns the document, event bus, persistence adapter and toggle registry.
#[derive(Debug)]
pub struct ToggleHost<D, P> {
    document: D,
    events: EventBus,
    persistence: P,
    instances: InstanceRegistry<Toggle>,
    default_options: ToggleOptions,
}

impl<D: Document, P: Persistence> ToggleHost<D, P> {
    /// Create a host whose bootstrapped toggles use default options.
    pub fn new(document: D, persistence: P) -> Self {
        Self::with_options(document, persistence, ToggleOptions::default())
    }

    /// Create a host whose bootstrapped toggles use `options`.
    pub fn with_options(document: D, persistence: P, options: ToggleOptions) -> Self {
        Self {
            document,
            events: EventBus::new(),
            persistence,
            instances: InstanceRegistry::new(),
            default_options: options,
        }
    }

    #[must_use]
    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    #[must_use]
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    #[must_use]
    pub fn default_options(&self) -> &ToggleOptions {
        &self.default_options
    }

    /// Borrow the registry and the collaborators at the same time.
    ///
    /// This is how callers drive a toggle directly:
    /// `let (toggles, mut env) = host.split();` then
    /// `toggles.get(el, "toggle").map(|t| t.enable(&mut env))`.
    pub fn split(&mut self) -> (&InstanceRegistry<Toggle>, ToggleEnv<'_>) {
        (
            &self.instances,
            ToggleEnv {
                document: &mut self.document,
                events: &mut self.events,
                persistence: &mut self.persistence,
            },
        )
    }

    /// The toggle bound to `element`, if any.
    #[must_use]
    pub fn get_instance(&self, element: ElementId) -> Option<&Toggle> {
        self.instances.get(element, INSTANCE_KEY)
    }

    /// Number of registered toggles.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.count(INSTANCE_KEY)
    }

    /// Controlling elements with a registered toggle, sorted by handle.
    #[must_use]
    pub fn elements(&self) -> Vec<ElementId> {
        self.instances.elements(INSTANCE_KEY)
    }

    /// Bind a toggle with explicit options to `element` unless one exists.
    ///
    /// Returns the toggle bound to the element either way.
    pub fn create_instance(&mut self, element: ElementId, options: ToggleOptions) -> Option<&Toggle> {
        let document = &mut self.document;
        self.instances
            .insert_if_absent(element, INSTANCE_KEY, || Toggle::new(document, element, options));
        self.instances.get(element, INSTANCE_KEY)
    }

    /// Create toggles for every `<body>` descendant matching `selector` that
    /// has none yet.
    ///
    /// Returns the number of toggles created by this call.
    pub fn create_instances(&mut self, selector: &str) -> usize {
        let elements = match self.document.query_body_selector_all(selector) {
            Ok(elements) => elements,
            Err(e) => {
                warn!(selector, error = %e, "invalid toggle selector; nothing bootstrapped");
                return 0;
            }
        };

        let document = &mut self.document;
        let options = &self.default_options;
        let mut created = 0;
        for element in elements {
            let inserted = self.instances.insert_if_absent(element, INSTANCE_KEY, || {
                Toggle::new(&mut *document, element, options.clone())
            });
            if inserted {
                created += 1;
            }
        }

        info!(selector, created, total = self.instance_count(), "toggles initialized");
        created
    }

    /// Scan for `[data-kt-toggle]` elements again after the document changed.
    pub fn reinitialization(&mut self) -> usize {
        self.create_instances(TOGGLE_SELECTOR)
    }

    /// Initial scan for `[data-kt-toggle]` elements.
    pub fn bootstrap(&mut self) -> usize {
        self.create_instances(TOGGLE_SELECTOR)
    }

    /// Route a click on `element` to its toggle.
    ///
    /// Returns `None` when no toggle is bound to the element (the click is
    /// left untouched), otherwise whether the click toggled.
    pub fn click(&mut self, element: ElementId, click: &mut ClickEvent) -> Option<bool> {
        let (instances, mut env) = self.split();
        let Some(toggle) = instances.get(element, INSTANCE_KEY) else {
            debug!(element = element.index(), "click on element without toggle");
            return None;
        };
        Some(toggle.handle_click(&mut env, click))
    }

    /// Current state of the toggle bound to `element`.
    #[must_use]
    pub fn is_enabled(&self, element: ElementId) -> Option<bool> {
        self.get_instance(element).map(|t| t.is_enabled(&self.document))
    }
}
