//! Event delivery for the Sunset day-cycle engine.
//!
//! Ledgers and the day cycle never call the presentation layer directly.
//! They write [`GameEvent`] values into an [`EventSink`]; the composition
//! root passes its [`EventBus`] as that sink, and the bus hands each event
//! to every subscriber, in subscription order, before the emitting call
//! returns.
//!
//! # Ordering
//!
//! Delivery is synchronous and single-threaded. Events emitted during one
//! transition reach subscribers in exactly the order they were emitted, so
//! a subscriber that tracks "night began, then room discovered, then game
//! over" sees that sequence.
//!
//! # Reentrancy
//!
//! Subscribers receive `&GameEvent` and nothing else. The bus is owned by
//! the game session, which is mutably borrowed for the duration of any
//! transition, so a subscriber has no path back into the engine.
//!
//! A plain `Vec<GameEvent>` is also an [`EventSink`], which is what most
//! unit tests use.

use sunset_types::GameEvent;
use tracing::debug;

/// Anything that can receive engine events.
pub trait EventSink {
    /// Deliver one event.
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// A boxed subscriber callback.
type Handler = Box<dyn FnMut(&GameEvent)>;

/// Ordered, synchronous publish/subscribe bus.
#[derive(Default)]
pub struct EventBus {
    /// Subscribers in the order they registered.
    subscribers: Vec<(SubscriptionId, Handler)>,
    /// Next id to hand out.
    next_id: u64,
    /// Total events delivered since construction.
    delivered: u64,
}

impl EventBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber. It sees every event emitted after this call.
    pub fn subscribe(&mut self, handler: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.subscribers.push((id, Box::new(handler)));
        debug!(subscription = id.0, "Subscriber registered");
        id
    }

    /// Remove a subscriber. Returns `false` if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        before != self.subscribers.len()
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Number of events delivered so far.
    pub const fn delivered(&self) -> u64 {
        self.delivered
    }
}

impl EventSink for EventBus {
    fn emit(&mut self, event: GameEvent) {
        debug!(event = event.name(), subscribers = self.subscribers.len(), "Dispatching event");
        for (_, handler) in &mut self.subscribers {
            handler(&event);
        }
        self.delivered = self.delivered.saturating_add(1);
    }
}

impl core::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("delivered", &self.delivered)
            .finish()
    }
}
