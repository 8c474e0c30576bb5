//! Many-to-many publish/subscribe registry with deferred delivery.
//!
//! Producers [`post`](EventBus::post) typed events; the bus holds them in a
//! pending FIFO until an explicit [`send`](EventBus::send) flush point, then
//! delivers each to the listeners registered for its kind, in registration
//! order. The post/flush split is the only deferred ordering in the core:
//! it lets a caller batch several posts and deliver them at one controlled
//! point, preventing reentrant delivery while a prior delivery is still
//! executing.
//!
//! The registry is an explicit mapping from event-kind tag to listener
//! list. Listeners are closures with no natural equality, so removal is by
//! the identity token returned at registration, never by value.
//!
//! Side effects are strictly listener-side; the bus itself never mutates
//! domain state. Posting or delivering an event with no registered
//! listeners is a silent no-op, never an error.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use tracing::trace;

use crate::input::{Input, InputKind};

/// Identity token for a registered listener.
///
/// Returned by [`EventBus::register`]; pass it to [`EventBus::remove`] to
/// unregister. Tokens are unique for the lifetime of the bus.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A registered event consumer.
pub type Listener = Box<dyn FnMut(&Input)>;

/// The event bus.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use shalebreak_core::bus::EventBus;
/// use shalebreak_core::input::{Input, InputKind};
///
/// let mut bus = EventBus::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// bus.register(InputKind::GameWon, move |event| {
///     sink.borrow_mut().push(event.clone());
/// });
///
/// bus.post(Input::GameWon);
/// assert!(seen.borrow().is_empty()); // not delivered yet
/// bus.send();
/// assert_eq!(seen.borrow().len(), 1);
/// ```
#[derive(Default)]
pub struct EventBus {
    listeners: BTreeMap<InputKind, Vec<(ListenerId, Listener)>>,
    pending: VecDeque<Input>,
    next_listener: u64,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for one event kind.
    ///
    /// Listeners for a kind are invoked in registration order. The same
    /// closure logic may be registered any number of times; each
    /// registration is a distinct identity.
    pub fn register<F>(&mut self, kind: InputKind, listener: F) -> ListenerId
    where
        F: FnMut(&Input) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Removes a listener by identity.
    ///
    /// Returns `false` if the token no longer names a registration.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        for registered in self.listeners.values_mut() {
            if let Some(index) = registered.iter().position(|(rid, _)| *rid == id) {
                registered.remove(index);
                return true;
            }
        }
        false
    }

    /// Appends an event to the pending queue without delivering it.
    pub fn post(&mut self, event: Input) {
        trace!(kind = ?event.kind(), "bus post");
        self.pending.push_back(event);
    }

    /// Removes the oldest pending event and synchronously delivers it to
    /// every listener registered for its kind, in registration order.
    ///
    /// Returns the delivered event, or `None` if nothing was pending.
    /// Delivery to zero listeners still consumes the event.
    pub fn send(&mut self) -> Option<Input> {
        let event = self.pending.pop_front()?;
        if let Some(registered) = self.listeners.get_mut(&event.kind()) {
            for (_, listener) in registered.iter_mut() {
                listener(&event);
            }
        }
        Some(event)
    }

    /// Sends until the pending queue is empty. Returns how many events were
    /// delivered.
    pub fn flush(&mut self) -> usize {
        let mut delivered = 0;
        while self.send().is_some() {
            delivered += 1;
        }
        delivered
    }

    /// Number of events posted but not yet sent.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Clears all listeners and all pending events.
    pub fn reset(&mut self) {
        self.listeners.clear();
        self.pending.clear();
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Listeners are closures; show per-kind counts instead.
        let counts: Vec<(InputKind, usize)> = self
            .listeners
            .iter()
            .map(|(kind, registered)| (*kind, registered.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("listeners", &counts)
            .field("pending", &self.pending)
            .finish()
    }
}
