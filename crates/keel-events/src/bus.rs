//! Prioritized event bus

use crate::event::Event;
use serde_json::Value;
use std::collections::HashMap;

/// Priority given to listeners registered without an explicit one
pub const DEFAULT_PRIORITY: i32 = 10;

/// Listener execution order relative to priority values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Lower priority values run first (default)
    LowToHigh,
    /// Higher priority values run first
    HighToLow,
}

type Handler<P> = Box<dyn FnMut(&mut Event, &P) -> Option<Value> + Send>;

struct Listener<P> {
    handler: Handler<P>,
    priority: i32,
}

/// Event bus with prioritized listeners.
///
/// Generic over the payload type `P` carried by every trigger. Listeners
/// for an event run sorted by priority (stable, so listeners sharing a
/// priority keep registration order) and may return a value; the collected
/// values of the last trigger per event id are retained and can be queried
/// afterwards.
pub struct EventBus<P> {
    order: SortOrder,
    listeners: HashMap<String, Vec<Listener<P>>>,
    completed: HashMap<String, (Event, Vec<Value>)>,
}

impl<P> std::fmt::Debug for EventBus<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("order", &self.order)
            .field("events", &self.listeners.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<P> EventBus<P> {
    /// Create a bus with the default low-to-high sort order
    pub fn new() -> Self {
        Self {
            order: SortOrder::LowToHigh,
            listeners: HashMap::new(),
            completed: HashMap::new(),
        }
    }

    /// Set the listener priority sort order
    pub fn set_sort_order(&mut self, order: SortOrder) -> &mut Self {
        self.order = order;
        self
    }

    /// Add a listener with the default priority
    pub fn on<F>(&mut self, event: impl Into<String>, handler: F) -> &mut Self
    where
        F: FnMut(&mut Event, &P) -> Option<Value> + Send + 'static,
    {
        self.on_with_priority(event, handler, DEFAULT_PRIORITY)
    }

    /// Add a listener with an explicit priority
    pub fn on_with_priority<F>(
        &mut self,
        event: impl Into<String>,
        handler: F,
        priority: i32,
    ) -> &mut Self
    where
        F: FnMut(&mut Event, &P) -> Option<Value> + Send + 'static,
    {
        self.listeners.entry(event.into()).or_default().push(Listener {
            handler: Box::new(handler),
            priority,
        });
        self
    }

    /// Whether any listener is registered for the event id
    pub fn has_listeners(&self, event: &str) -> bool {
        self.listeners.get(event).is_some_and(|l| !l.is_empty())
    }

    /// Trigger an event.
    ///
    /// Returns `None` when no listeners are registered for the id (not an
    /// error); otherwise the values returned by the listeners, in execution
    /// order. A listener stopping propagation short-circuits the rest.
    pub fn trigger(&mut self, event: &str, payload: &P) -> Option<Vec<Value>> {
        if !self.has_listeners(event) {
            tracing::trace!(event = %event, "No listeners registered");
            return None;
        }

        let mut evt = Event::new(event);
        let order = self.order;
        let listeners = self.listeners.get_mut(event)?;

        let mut indices: Vec<usize> = (0..listeners.len()).collect();
        match order {
            SortOrder::LowToHigh => indices.sort_by_key(|&i| listeners[i].priority),
            SortOrder::HighToLow => {
                indices.sort_by_key(|&i| std::cmp::Reverse(listeners[i].priority))
            }
        }

        let mut results = Vec::new();

        for index in indices {
            let listener = &mut listeners[index];

            if let Some(value) = (listener.handler)(&mut evt, payload) {
                results.push(value);
            }

            if evt.is_propagation_stopped() {
                tracing::debug!(event = %event, "Propagation stopped");
                break;
            }
        }

        tracing::debug!(event = %event, listeners = results.len(), "Event completed");

        self.completed
            .insert(event.to_string(), (evt, results.clone()));

        Some(results)
    }

    /// The completed [`Event`] object for an id, if it has been triggered
    pub fn event(&self, event: &str) -> Option<&Event> {
        self.completed.get(event).map(|(evt, _)| evt)
    }

    /// The values collected from the last trigger of an id
    pub fn result(&self, event: &str) -> Option<&[Value]> {
        self.completed.get(event).map(|(_, results)| results.as_slice())
    }
}

impl<P> Default for EventBus<P> {
    fn default() -> Self {
        Self::new()
    }
}
