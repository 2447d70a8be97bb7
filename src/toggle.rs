//! The toggle state machine.
//!
//! A [`Toggle`] binds a controlling element to a target element. The state is
//! never stored: a toggle is enabled exactly when the target carries its
//! derived attribute with value `"on"` (ASCII case-insensitive), and every
//! query reads that attribute afresh. Toggles without a target are therefore
//! permanently disabled.
//!
//! Operations take a [`ToggleEnv`] holding the collaborators they mutate (the
//! document, the event bus, the persistence adapter). The host owns those
//! collaborators and the instance registry side by side, so a toggle borrowed
//! from the registry can drive them without aliasing.

#[cfg(test)]
#[path = "toggle_test.rs"]
mod toggle_test;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::{ToggleConfig, ToggleOptions};
use crate::consts::ENABLED_VALUE;
use crate::dom::{Document, ElementId};
use crate::events::{EventArgs, EventBus, HandlerId, ToggleEvent};
use crate::persistence::Persistence;

/// Collaborators a toggle operation acts on.
pub struct ToggleEnv<'a> {
    pub document: &'a mut dyn Document,
    pub events: &'a mut EventBus,
    pub persistence: &'a mut dyn Persistence,
}

/// A click delivered to a controlling element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickEvent {
    default_prevented: bool,
}

impl ClickEvent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress the browser's default action for this click.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Outcome of [`Toggle::enable`] and [`Toggle::disable`].
///
/// The two early exits are deliberately distinct values: `enable` on an
/// enabled toggle produces nothing ([`Transition::Noop`]) while `disable` on
/// a disabled toggle produces an explicit false sentinel
/// ([`Transition::Refused`]). Both are falsy.
#[derive(Debug, Clone, Copy)]
pub enum Transition<'t> {
    /// The state changed. Carries the toggle for chaining.
    Applied(&'t Toggle),
    /// `enable` on an already enabled toggle.
    Noop,
    /// `disable` on an already disabled toggle.
    Refused,
}

impl<'t> Transition<'t> {
    /// `true` only for [`Transition::Applied`].
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// The toggle, when the state changed.
    #[must_use]
    pub fn instance(&self) -> Option<&'t Toggle> {
        match *self {
            Self::Applied(toggle) => Some(toggle),
            Self::Noop | Self::Refused => None,
        }
    }
}

/// State machine for one controlling element.
#[derive(Debug, Clone)]
pub struct Toggle {
    uid: String,
    element: ElementId,
    target: Option<ElementId>,
    config: ToggleConfig,
    options: ToggleOptions,
}

impl Toggle {
    /// Read configuration from `element` and resolve its target.
    ///
    /// A missing, unmatched, or unparsable target selector leaves the toggle
    /// without a target; it is not an error.
    pub fn new(document: &mut dyn Document, element: ElementId, options: ToggleOptions) -> Self {
        let config = ToggleConfig::from_element(document, element);
        Self::with_config(document, element, config, options)
    }

    /// Build a toggle from an already parsed configuration.
    pub fn with_config(
        document: &mut dyn Document,
        element: ElementId,
        config: ToggleConfig,
        options: ToggleOptions,
    ) -> Self {
        let target = config
            .target_selector
            .as_deref()
            .and_then(|selector| match document.query_selector(selector) {
                Ok(found) => {
                    if found.is_none() {
                        debug!(element = element.index(), selector, "toggle target not found");
                    }
                    found
                }
                Err(e) => {
                    warn!(element = element.index(), selector, error = %e, "invalid toggle target selector");
                    None
                }
            });

        let uid = format!("toggle{}", Uuid::new_v4().simple());
        debug!(
            %uid,
            element = element.index(),
            target = target.map(ElementId::index),
            attribute = %config.attribute,
            mode = config.mode.as_str(),
            save_state = options.save_state,
            "toggle created"
        );
        Self { uid, element, target, config, options }
    }

    /// Unique instance id, prefixed with `toggle`.
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// The controlling element.
    #[must_use]
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// The element carrying the state attribute, if one was resolved.
    #[must_use]
    pub fn target(&self) -> Option<ElementId> {
        self.target
    }

    #[must_use]
    pub fn config(&self) -> &ToggleConfig {
        &self.config
    }

    #[must_use]
    pub fn options(&self) -> &ToggleOptions {
        &self.options
    }

    /// Whether the target's state attribute currently reads `"on"`.
    #[must_use]
    pub fn is_enabled(&self, document: &dyn Document) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        document
            .get_attribute(target, &self.config.attribute)
            .is_some_and(|value| value.eq_ignore_ascii_case(ENABLED_VALUE))
    }

    /// Handle a click on the controlling element.
    ///
    /// The default action is always suppressed. The mode then decides whether
    /// the click toggles; a refused click emits nothing. Returns `true` when
    /// the click toggled.
    pub fn handle_click(&self, env: &mut ToggleEnv<'_>, click: &mut ClickEvent) -> bool {
        click.prevent_default();

        let enabled = self.is_enabled(&*env.document);
        if !self.config.mode.allows_click(enabled) {
            debug!(uid = %self.uid, mode = self.config.mode.as_str(), enabled, "click ignored by mode");
            return false;
        }
        self.toggle(env);
        true
    }

    /// Flip the state, wrapped in `Change` / `Changed` events.
    pub fn toggle(&self, env: &mut ToggleEnv<'_>) -> &Self {
        self.emit(env, ToggleEvent::Change);
        if self.is_enabled(&*env.document) {
            self.disable(env);
        } else {
            self.enable(env);
        }
        self.emit(env, ToggleEvent::Changed);
        self
    }

    /// Switch the toggle on.
    pub fn enable(&self, env: &mut ToggleEnv<'_>) -> Transition<'_> {
        if self.is_enabled(&*env.document) {
            return Transition::Noop;
        }

        self.emit(env, ToggleEvent::Enable);

        if let Some(target) = self.target {
            if let Err(e) = env.document.set_attribute(target, &self.config.attribute, ENABLED_VALUE) {
                warn!(uid = %self.uid, attribute = %self.config.attribute, error = %e, "failed to set state attribute");
            }
        }
        if let Some(class) = &self.config.state_class {
            if let Err(e) = env.document.add_class(self.element, class) {
                warn!(uid = %self.uid, class = %class, error = %e, "failed to add state class");
            }
        }
        if self.options.save_state {
            if let Err(e) = env
                .persistence
                .set(&self.config.attribute, ENABLED_VALUE, &self.options.persist)
            {
                warn!(uid = %self.uid, key = %self.config.attribute, error = %e, "failed to persist toggle state");
            }
        }

        self.emit(env, ToggleEvent::Enabled);
        debug!(uid = %self.uid, attribute = %self.config.attribute, "toggle enabled");
        Transition::Applied(self)
    }

    /// Switch the toggle off.
    pub fn disable(&self, env: &mut ToggleEnv<'_>) -> Transition<'_> {
        if !self.is_enabled(&*env.document) {
            return Transition::Refused;
        }

        self.emit(env, ToggleEvent::Disable);

        if let Some(target) = self.target {
            if let Err(e) = env.document.remove_attribute(target, &self.config.attribute) {
                warn!(uid = %self.uid, attribute = %self.config.attribute, error = %e, "failed to remove state attribute");
            }
        }
        if let Some(class) = &self.config.state_class {
            if let Err(e) = env.document.remove_class(self.element, class) {
                warn!(uid = %self.uid, class = %class, error = %e, "failed to remove state class");
            }
        }
        if self.options.save_state {
            if let Err(e) = env.persistence.delete(&self.config.attribute) {
                warn!(uid = %self.uid, key = %self.config.attribute, error = %e, "failed to clear persisted toggle state");
            }
        }

        self.emit(env, ToggleEvent::Disabled);
        debug!(uid = %self.uid, attribute = %self.config.attribute, "toggle disabled");
        Transition::Applied(self)
    }

    // --- Event API, scoped to the controlling element ---

    pub fn on<F>(&self, events: &mut EventBus, event: ToggleEvent, handler: F) -> HandlerId
    where
        F: FnMut(&EventArgs) + 'static,
    {
        events.on(self.element, event, handler)
    }

    pub fn one<F>(&self, events: &mut EventBus, event: ToggleEvent, handler: F) -> HandlerId
    where
        F: FnMut(&EventArgs) + 'static,
    {
        events.one(self.element, event, handler)
    }

    pub fn off(&self, events: &mut EventBus, event: ToggleEvent, id: HandlerId) -> bool {
        events.off(self.element, event, id)
    }

    pub fn trigger(&self, events: &mut EventBus, event: ToggleEvent) -> usize {
        events.trigger(self.element, event)
    }

    fn emit(&self, env: &mut ToggleEnv<'_>, event: ToggleEvent) {
        env.events.trigger(self.element, event);
    }
}
