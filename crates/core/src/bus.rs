//! # Event Bus
//!
//! Typed publish/subscribe for domain events.
//!
//! # Architecture
//!
//! Subscribers are keyed by the `TypeId` of the event they accept. Posting an
//! event looks up that key and calls every subscriber directly, in
//! subscription order. There is no reflection and no discovery: every parser
//! registers its callbacks when it is constructed.
//!
//! # Thread Safety
//!
//! The subscriber table sits behind a `RwLock`. The handler list is cloned
//! out before any handler runs, so a handler may post further events or
//! subscribe without deadlocking.
//!
//! # Example
//!
//! ```rust
//! use wynnparse_core::EventBus;
//!
//! #[derive(Debug)]
//! struct Ping(u32);
//!
//! let bus = EventBus::new();
//! bus.subscribe(|ping: &Ping| println!("ping {}", ping.0));
//! assert_eq!(bus.post(Ping(1)), 1);
//! ```

use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Type-erased subscriber
type Subscriber = Arc<dyn Fn(&dyn Any) + Send + Sync>;

/// Central typed event dispatcher
pub struct EventBus {
    /// Map from event type to its subscribers
    subscribers: RwLock<HashMap<TypeId, Vec<Subscriber>>>,
}

impl EventBus {
    /// Create an empty bus
    #[inline]
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a callback for events of type `E`
    ///
    /// # Arguments
    /// * `handler` - Called with every posted `E`
    pub fn subscribe<E, F>(&self, handler: F)
    where
        E: Any + Send + Sync,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let subscriber: Subscriber = Arc::new(move |event: &dyn Any| {
            if let Some(event) = event.downcast_ref::<E>() {
                handler(event);
            }
        });

        tracing::debug!("Subscribed to {}", std::any::type_name::<E>());
        self.subscribers
            .write()
            .entry(TypeId::of::<E>())
            .or_default()
            .push(subscriber);
    }

    /// Post an event to every subscriber of its type
    ///
    /// # Returns
    /// The number of subscribers that received the event
    pub fn post<E>(&self, event: E) -> usize
    where
        E: Any + Send + Sync + Debug,
    {
        let handlers = self
            .subscribers
            .read()
            .get(&TypeId::of::<E>())
            .cloned()
            .unwrap_or_default();

        tracing::trace!(?event, subscribers = handlers.len(), "Posting event");

        for handler in &handlers {
            handler(&event);
        }

        handlers.len()
    }

    /// Number of subscribers registered for `E`
    pub fn subscriber_count<E: Any>(&self) -> usize {
        self.subscribers
            .read()
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("event_types", &self.subscribers.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct Alpha(u32);

    #[derive(Debug)]
    struct Beta;

    #[test]
    fn test_post_without_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.post(Alpha(1)), 0);
    }

    #[test]
    fn test_typed_delivery() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.subscribe(move |event: &Alpha| sink.lock().push(event.0));

        assert_eq!(bus.post(Alpha(7)), 1);
        assert_eq!(bus.post(Beta), 0);
        assert_eq!(*seen.lock(), vec![7]);
        assert_eq!(bus.subscriber_count::<Alpha>(), 1);
        assert_eq!(bus.subscriber_count::<Beta>(), 0);
    }

    #[test]
    fn test_subscription_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = order.clone();
        bus.subscribe(move |_: &Beta| first.lock().push("first"));
        let second = order.clone();
        bus.subscribe(move |_: &Beta| second.lock().push("second"));

        assert_eq!(bus.post(Beta), 2);
        assert_eq!(*order.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_reentrant_post() {
        let bus = Arc::new(EventBus::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let inner = bus.clone();
        bus.subscribe(move |event: &Alpha| {
            if event.0 == 0 {
                inner.post(Beta);
            }
        });
        let sink = seen.clone();
        bus.subscribe(move |_: &Beta| sink.lock().push(()));

        bus.post(Alpha(0));
        assert_eq!(seen.lock().len(), 1);
    }
}
