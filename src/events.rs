//! Core-to-UI event dispatch
//!
//! The core never references UI objects. Instead it raises a small set of
//! named events through a synchronous dispatcher; the UI layer subscribes and
//! repaints whatever the payload names. Dispatch happens on the caller's
//! thread, after the triggering mutation has already been persisted.

use tracing::debug;

/// Events raised by the core after a state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A group's item list changed (add, remove, reorder, check toggle)
    ItemsChanged {
        /// Name of the affected group
        group: String,
    },
    /// A group icon moved on the desktop
    PositionChanged {
        /// Name of the affected group
        group: String,
        /// New horizontal position
        x: i32,
        /// New vertical position
        y: i32,
    },
    /// The current profile changed
    ProfileSwitched {
        /// Name of the newly current profile
        name: String,
    },
    /// A settings category was modified
    SettingsChanged {
        /// Name of the affected category
        category: String,
    },
}

/// Subscriber callback
pub type Listener = Box<dyn Fn(&AppEvent)>;

/// Synchronous event dispatcher
///
/// Listeners run in subscription order on the dispatching thread. A listener
/// must not mutate core state re-entrantly; it observes, it does not drive.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<Listener>,
}

impl EventDispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for all events
    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    /// Deliver `event` to every listener, in subscription order
    pub fn dispatch(&self, event: &AppEvent) {
        debug!("Dispatching {:?}", event);
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
