//! Change-notifying values and event emitters.
//!
//! The menu publishes its state (visibility, cursor, active item, placement)
//! through [`Observable`] values so renderers and derived computations can
//! react to changes. One-shot notifications such as selections go through an
//! [`Emitter`]. Both hand out [`Subscription`] guards: dropping the guard
//! unsubscribes, [`Subscription::detach`] keeps the callback alive for the
//! lifetime of the source.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`); callbacks run
//! synchronously inside the call that triggered them.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

// ============================================================================
// Subscription
// ============================================================================

/// Guard for a registered callback. Unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Create a subscription that runs `unsubscribe` when dropped.
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self { unsubscribe: Some(Box::new(unsubscribe)) }
    }

    /// Keep the callback registered for as long as its source lives.
    pub fn detach(mut self) {
        self.unsubscribe.take();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.unsubscribe.is_some()).finish()
    }
}

// ============================================================================
// Subscribers
// ============================================================================

struct Subscribers<T> {
    next_id: Cell<u64>,
    callbacks: RefCell<Vec<(u64, Callback<T>)>>,
}

impl<T: 'static> Subscribers<T> {
    fn new() -> Self {
        Self { next_id: Cell::new(0), callbacks: RefCell::new(Vec::new()) }
    }

    fn add(self: &Rc<Self>, callback: Callback<T>) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.callbacks.borrow_mut().push((id, callback));

        let weak: Weak<Self> = Rc::downgrade(self);
        Subscription::new(move || {
            if let Some(subscribers) = weak.upgrade() {
                subscribers.callbacks.borrow_mut().retain(|(cb_id, _)| *cb_id != id);
            }
        })
    }

    /// Copy of the current callbacks, so they may subscribe or unsubscribe
    /// while being called.
    fn snapshot(&self) -> Vec<Callback<T>> {
        self.callbacks.borrow().iter().map(|(_, cb)| cb.clone()).collect()
    }

    fn notify(&self, value: &T) {
        for callback in self.snapshot() {
            callback(value);
        }
    }

    fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }
}

// ============================================================================
// Observable
// ============================================================================

/// A shared value that notifies subscribers when it changes.
///
/// Cloning an `Observable` yields another handle to the same value.
pub struct Observable<T> {
    value: Rc<RefCell<T>>,
    subscribers: Rc<Subscribers<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self { value: self.value.clone(), subscribers: self.subscribers.clone() }
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create a new observable holding `value`.
    pub fn new(value: T) -> Self {
        Self { value: Rc::new(RefCell::new(value)), subscribers: Rc::new(Subscribers::new()) }
    }

    /// Get a copy of the current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Read the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Replace the value. Subscribers are notified only if it changed.
    ///
    /// Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value;
        }
        self.notify();
        true
    }

    /// Mutate the value in place. Subscribers are notified only if it changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let mut next = self.get();
        f(&mut next);
        self.set(next)
    }

    /// Register a callback invoked with the new value after every change.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.subscribers.add(Rc::new(callback))
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn notify(&self) {
        let snapshot = self.get();
        for callback in self.subscribers.snapshot() {
            // A callback set a newer value, which has already been delivered.
            if *self.value.borrow() != snapshot {
                break;
            }
            callback(&snapshot);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Observable").field(&*self.value.borrow()).finish()
    }
}

// ============================================================================
// Emitter
// ============================================================================

/// Broadcasts events to subscribers without retaining a value.
pub struct Emitter<T> {
    subscribers: Rc<Subscribers<T>>,
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self { subscribers: self.subscribers.clone() }
    }
}

impl<T: 'static> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Emitter<T> {
    /// Create an emitter with no subscribers.
    pub fn new() -> Self {
        Self { subscribers: Rc::new(Subscribers::new()) }
    }

    /// Deliver `event` to every subscriber.
    pub fn emit(&self, event: &T) {
        self.subscribers.notify(event);
    }

    /// Register a callback for future events.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.subscribers.add(Rc::new(callback))
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter").field("subscribers", &self.subscribers.callbacks.borrow().len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_notifies_only_on_change() {
        let value = Observable::new(1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = value.subscribe(move |v| sink.borrow_mut().push(*v));

        assert!(value.set(2));
        assert!(!value.set(2));
        assert!(value.update(|v| *v += 1));

        assert_eq!(*seen.borrow(), vec![2, 3]);
        assert_eq!(value.get(), 3);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let value = Observable::new(false);
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let sub = value.subscribe(move |_| counter.set(counter.get() + 1));
        assert_eq!(value.subscriber_count(), 1);

        value.set(true);
        drop(sub);
        value.set(false);

        assert_eq!(count.get(), 1);
        assert_eq!(value.subscriber_count(), 0);
    }

    #[test]
    fn test_detach_keeps_callback() {
        let emitter = Emitter::<u32>::new();
        let total = Rc::new(Cell::new(0));
        let sink = total.clone();
        emitter.subscribe(move |n| sink.set(sink.get() + n)).detach();

        emitter.emit(&2);
        emitter.emit(&5);
        assert_eq!(total.get(), 7);
        assert_eq!(emitter.subscriber_count(), 1);
    }

    #[test]
    fn test_callback_may_write_back() {
        let source = Observable::new(0);
        let mirror = Observable::new(0);
        let target = mirror.clone();
        let _sub = source.subscribe(move |v| {
            target.set(v * 10);
        });

        source.set(4);
        assert_eq!(mirror.get(), 40);
    }

    #[test]
    fn test_nested_set_is_not_followed_by_stale_value() {
        let value = Observable::new(false);
        let reset = value.clone();
        let _first = value.subscribe(move |v| {
            if *v {
                reset.set(false);
            }
        });
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _second = value.subscribe(move |v| sink.borrow_mut().push(*v));

        value.set(true);
        assert!(!value.get());
        assert_eq!(*seen.borrow(), vec![false]);
    }

    #[test]
    fn test_subscription_outliving_source_is_harmless() {
        let sub = {
            let value = Observable::new(0u8);
            value.subscribe(|_| {})
        };
        drop(sub);
    }
}
