//! Toggle lifecycle events and the per-element synchronous event bus.
//!
//! Every transition emits a fixed sequence through the bus:
//!
//! | Transition | Sequence |
//! |------------|----------|
//! | enable  | `Change`, `Enable`, `Enabled`, `Changed` |
//! | disable | `Change`, `Disable`, `Disabled`, `Changed` |
//!
//! Handlers are keyed by `(element, event)` and run synchronously in
//! registration order. A handler registered with [`EventBus::one`] is removed
//! after its first invocation.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tracing::debug;
use uuid::Uuid;

use crate::dom::ElementId;

/// Lifecycle events emitted by a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleEvent {
    /// Before a toggle flips state.
    Change,
    /// Before the target is switched on.
    Enable,
    /// After the target was switched on.
    Enabled,
    /// Before the target is switched off.
    Disable,
    /// After the target was switched off.
    Disabled,
    /// After a toggle flipped state.
    Changed,
}

impl ToggleEvent {
    /// Every event, in no particular order.
    pub const ALL: [Self; 6] = [
        Self::Change,
        Self::Enable,
        Self::Enabled,
        Self::Disable,
        Self::Disabled,
        Self::Changed,
    ];

    /// Stable dotted name, e.g. `"toggle.enabled"`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Change => "toggle.change",
            Self::Enable => "toggle.enable",
            Self::Enabled => "toggle.enabled",
            Self::Disable => "toggle.disable",
            Self::Disabled => "toggle.disabled",
            Self::Changed => "toggle.changed",
        }
    }
}

impl fmt::Display for ToggleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned by [`ToggleEvent::from_str`] for names outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown toggle event: {0}")]
pub struct UnknownEvent(pub String);

impl FromStr for ToggleEvent {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.name() == s)
            .ok_or_else(|| UnknownEvent(s.to_owned()))
    }
}

/// Handle returned by [`EventBus::on`] and [`EventBus::one`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(Uuid);

impl HandlerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event_{}", self.0.simple())
    }
}

/// Payload handed to every handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventArgs {
    /// Element the event was triggered on (the controlling element).
    pub element: ElementId,
    /// Which lifecycle event fired.
    pub event: ToggleEvent,
}

type Handler = Box<dyn FnMut(&EventArgs)>;

struct Listener {
    id: HandlerId,
    once: bool,
    handler: Handler,
}

/// Per-element registry of event handlers with synchronous dispatch.
#[derive(Default)]
pub struct EventBus {
    listeners: HashMap<(ElementId, ToggleEvent), Vec<Listener>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("keys", &self.listeners.len())
            .field("listeners", &self.listeners.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler that runs on every trigger of `event` on `element`.
    pub fn on<F>(&mut self, element: ElementId, event: ToggleEvent, handler: F) -> HandlerId
    where
        F: FnMut(&EventArgs) + 'static,
    {
        self.register(element, event, false, Box::new(handler))
    }

    /// Register a handler that runs on the next trigger only.
    pub fn one<F>(&mut self, element: ElementId, event: ToggleEvent, handler: F) -> HandlerId
    where
        F: FnMut(&EventArgs) + 'static,
    {
        self.register(element, event, true, Box::new(handler))
    }

    /// Remove a handler. Returns `false` when no such handler is registered.
    pub fn off(&mut self, element: ElementId, event: ToggleEvent, id: HandlerId) -> bool {
        let Some(list) = self.listeners.get_mut(&(element, event)) else {
            return false;
        };
        let before = list.len();
        list.retain(|l| l.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.listeners.remove(&(element, event));
        }
        removed
    }

    /// Run every handler for `(element, event)` in registration order.
    ///
    /// Returns the number of handlers invoked.
    pub fn trigger(&mut self, element: ElementId, event: ToggleEvent) -> usize {
        let Some(list) = self.listeners.get_mut(&(element, event)) else {
            return 0;
        };
        let args = EventArgs { element, event };
        for listener in list.iter_mut() {
            (listener.handler)(&args);
        }
        let fired = list.len();
        list.retain(|l| !l.once);
        if list.is_empty() {
            self.listeners.remove(&(element, event));
        }
        debug!(element = element.index(), %event, fired, "event dispatched");
        fired
    }

    /// Number of handlers currently registered for `(element, event)`.
    #[must_use]
    pub fn listener_count(&self, element: ElementId, event: ToggleEvent) -> usize {
        self.listeners.get(&(element, event)).map_or(0, Vec::len)
    }

    fn register(&mut self, element: ElementId, event: ToggleEvent, once: bool, handler: Handler) -> HandlerId {
        let id = HandlerId::new();
        self.listeners
            .entry((element, event))
            .or_default()
            .push(Listener { id, once, handler });
        id
    }
}
