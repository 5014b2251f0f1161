//! Event system for engine lifecycle and tick notifications.
//!
//! Events are dispatched synchronously, in listener registration order,
//! from inside the engine's `pump`/setter call. A listener therefore always
//! observes `Launch`/`Change` caused by a mutation before the next `Tick`.

use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Discriminant of an [`EngineEvent`], used for listener filtering and for
/// name-based subscription from adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EventKind {
    /// `launched` was set to `true` (fires on every assignment, even no-ops)
    Launch,
    /// `launched` actually flipped value
    Change,
    /// First tick ever delivered by this instance (at most once)
    Start,
    /// A scheduling slot elapsed and the consumer should act
    Tick,
    /// A display surface was resized
    Resize,
}

impl EventKind {
    /// Get the name of this event kind
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Launch => "launch",
            Self::Change => "change",
            Self::Start => "start",
            Self::Tick => "tick",
            Self::Resize => "resize",
        }
    }
}

impl FromStr for EventKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "launch" => Ok(Self::Launch),
            "change" => Ok(Self::Change),
            "start" => Ok(Self::Start),
            "tick" => Ok(Self::Tick),
            "resize" => Ok(Self::Resize),
            other => Err(EngineError::UnknownEvent {
                name: other.to_string(),
            }),
        }
    }
}

/// Discrete lifecycle signals emitted by engines and displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EngineEvent {
    Launch,
    Change,
    Start,
    Tick,
    Resize { width: u32, height: u32 },
}

impl EngineEvent {
    /// The kind of this event (payload stripped).
    #[inline]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Launch => EventKind::Launch,
            Self::Change => EventKind::Change,
            Self::Start => EventKind::Start,
            Self::Tick => EventKind::Tick,
            Self::Resize { .. } => EventKind::Resize,
        }
    }
}

/// Listener trait for engine events.
///
/// Listeners are not required to be `Send`: the scheduling model is
/// single-threaded (the host calls back into engine code), and browser
/// adapters hold `js_sys::Function` handles that cannot cross threads.
pub trait EventListener {
    /// Handle an engine event
    fn on_event(&mut self, event: &EngineEvent);

    /// Event kinds this listener is interested in; empty means all.
    fn interested_events(&self) -> Vec<EventKind> {
        vec![]
    }

    /// Check if this listener is interested in a specific event kind
    fn is_interested_in(&self, kind: EventKind) -> bool {
        let interested = self.interested_events();
        interested.is_empty() || interested.contains(&kind)
    }
}

/// Registry of listeners with synchronous dispatch.
pub struct EventDispatcher {
    listeners: Vec<Box<dyn EventListener>>,
    enabled: bool,
}

impl EventDispatcher {
    /// Create a new event dispatcher
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            enabled: true,
        }
    }

    /// Add an event listener
    pub fn add_listener(&mut self, listener: Box<dyn EventListener>) {
        self.listeners.push(listener);
    }

    /// Remove all listeners
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Dispatch an event to all interested listeners, synchronously and in
    /// registration order.
    pub fn dispatch(&mut self, event: &EngineEvent) {
        if !self.enabled {
            return;
        }
        let kind = event.kind();
        for listener in &mut self.listeners {
            if listener.is_interested_in(kind) {
                listener.on_event(event);
            }
        }
    }

    /// Enable or disable event dispatching
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check if event dispatching is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get the number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapter that turns a closure into an [`EventListener`].
pub struct CallbackListener<F: FnMut(&EngineEvent)> {
    callback: F,
    interested_events: Vec<EventKind>,
}

impl<F: FnMut(&EngineEvent)> CallbackListener<F> {
    /// Listener calling `callback` for every event.
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            interested_events: vec![],
        }
    }

    /// Listener calling `callback` for the given event kinds only.
    pub fn for_events(events: Vec<EventKind>, callback: F) -> Self {
        Self {
            callback,
            interested_events: events,
        }
    }
}

impl<F: FnMut(&EngineEvent)> EventListener for CallbackListener<F> {
    fn on_event(&mut self, event: &EngineEvent) {
        (self.callback)(event);
    }

    fn interested_events(&self) -> Vec<EventKind> {
        self.interested_events.clone()
    }
}

/// Listener that logs events through the `log` facade.
pub struct LoggingListener {
    interested_events: Vec<EventKind>,
}

impl LoggingListener {
    /// Create a new logging listener
    pub fn new() -> Self {
        Self {
            interested_events: vec![],
        }
    }

    /// Create a logging listener for specific event kinds
    pub fn for_events(events: Vec<EventKind>) -> Self {
        Self {
            interested_events: events,
        }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

impl EventListener for LoggingListener {
    fn on_event(&mut self, event: &EngineEvent) {
        log::debug!("engine event: {}", event.kind().name());
    }

    fn interested_events(&self) -> Vec<EventKind> {
        self.interested_events.clone()
    }
}

/// Listener that collects events for testing.
///
/// Clones share one buffer, so a test can register a clone with the engine
/// and keep the original to inspect what was delivered.
#[derive(Clone, Default)]
pub struct CollectingListener {
    events: Rc<RefCell<Vec<EngineEvent>>>,
    interested_events: Vec<EventKind>,
}

impl CollectingListener {
    /// Create a new collecting listener
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collecting listener for specific event kinds
    pub fn for_events(events: Vec<EventKind>) -> Self {
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
            interested_events: events,
        }
    }

    /// Snapshot of all collected events
    pub fn snapshot(&self) -> Vec<EngineEvent> {
        self.events.borrow().clone()
    }

    /// Number of collected events
    pub fn count(&self) -> usize {
        self.events.borrow().len()
    }

    /// Number of collected events of one kind
    pub fn count_of(&self, kind: EventKind) -> usize {
        self.events.borrow().iter().filter(|e| e.kind() == kind).count()
    }

    /// Clear collected events
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl EventListener for CollectingListener {
    fn on_event(&mut self, event: &EngineEvent) {
        self.events.borrow_mut().push(event.clone());
    }

    fn interested_events(&self) -> Vec<EventKind> {
        self.interested_events.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_names_roundtrip() {
        for kind in [
            EventKind::Launch,
            EventKind::Change,
            EventKind::Start,
            EventKind::Tick,
            EventKind::Resize,
        ] {
            assert_eq!(kind.name().parse::<EventKind>().unwrap(), kind);
        }
        assert!(matches!(
            "bogus".parse::<EventKind>(),
            Err(EngineError::UnknownEvent { .. })
        ));
    }

    #[test]
    fn test_dispatch_is_synchronous_and_ordered() {
        let mut dispatcher = EventDispatcher::new();
        let collector = CollectingListener::new();
        dispatcher.add_listener(Box::new(collector.clone()));

        dispatcher.dispatch(&EngineEvent::Launch);
        dispatcher.dispatch(&EngineEvent::Tick);

        assert_eq!(
            collector.snapshot(),
            vec![EngineEvent::Launch, EngineEvent::Tick]
        );
    }

    #[test]
    fn test_listener_filtering() {
        let mut dispatcher = EventDispatcher::new();
        let ticks = CollectingListener::for_events(vec![EventKind::Tick]);
        dispatcher.add_listener(Box::new(ticks.clone()));

        dispatcher.dispatch(&EngineEvent::Launch);
        dispatcher.dispatch(&EngineEvent::Tick);
        dispatcher.dispatch(&EngineEvent::Change);

        assert_eq!(ticks.count(), 1);
        assert_eq!(ticks.count_of(EventKind::Tick), 1);
    }

    #[test]
    fn test_disabled_dispatcher_drops_events() {
        let mut dispatcher = EventDispatcher::new();
        let collector = CollectingListener::new();
        dispatcher.add_listener(Box::new(collector.clone()));

        dispatcher.set_enabled(false);
        dispatcher.dispatch(&EngineEvent::Tick);
        assert_eq!(collector.count(), 0);

        dispatcher.set_enabled(true);
        dispatcher.dispatch(&EngineEvent::Tick);
        assert_eq!(collector.count(), 1);
    }

    #[test]
    fn test_resize_payload_survives_serde() {
        let event = EngineEvent::Resize {
            width: 640,
            height: 480,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: EngineEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
