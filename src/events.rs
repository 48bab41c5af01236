//! Page events and the listeners subscribed to them.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Something that happened to the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum PageEvent {
    /// The page was scrolled to this offset, in rows.
    Scrolled(f64),
    /// The pointer moved to this viewport cell.
    PointerMoved { column: u16, row: u16 },
    /// The viewport changed size.
    Resized { width: u16, height: u16 },
}

type Callback<E> = Box<dyn FnMut(&E)>;

struct Registry<E> {
    listeners: Vec<(u64, Callback<E>)>,
    /// Listeners unsubscribed while a publish was in flight.
    removed: Vec<u64>,
    next_id: u64,
}

/// A set of callbacks interested in events of type `E`.
pub(crate) struct Listeners<E> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E: 'static> Listeners<E> {
    pub(crate) fn new() -> Self {
        Self { registry: Rc::new(RefCell::new(Registry { listeners: Vec::new(), removed: Vec::new(), next_id: 0 })) }
    }

    /// Register a callback. It stays registered until the returned subscription is disposed of
    /// or dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub(crate) fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&E) + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Box::new(callback)));

        let weak: Weak<RefCell<Registry<E>>> = Rc::downgrade(&self.registry);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    let mut registry = registry.borrow_mut();
                    let before = registry.listeners.len();
                    registry.listeners.retain(|(listener, _)| *listener != id);
                    if registry.listeners.len() == before {
                        registry.removed.push(id);
                    }
                }
            })),
        }
    }

    /// Deliver an event to every live listener, in the order they subscribed.
    pub(crate) fn publish(&self, event: &E) {
        // listeners may subscribe or unsubscribe while being called, so call them detached
        let mut listeners = std::mem::take(&mut self.registry.borrow_mut().listeners);
        for (_, callback) in &mut listeners {
            callback(event);
        }
        let mut registry = self.registry.borrow_mut();
        let removed = std::mem::take(&mut registry.removed);
        listeners.retain(|(id, _)| !removed.contains(id));
        let added = std::mem::take(&mut registry.listeners);
        listeners.extend(added);
        registry.listeners = listeners;
    }

    pub(crate) fn len(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Keeps a listener registered; disposing of it removes exactly that listener.
pub(crate) struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn dispose(mut self) {
        self.unsubscribe();
    }

    fn unsubscribe(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(listeners: &Listeners<PageEvent>) -> (Rc<RefCell<Vec<PageEvent>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let subscription = listeners.subscribe(move |event| sink.borrow_mut().push(*event));
        (seen, subscription)
    }

    #[test]
    fn publishes_to_subscribers() {
        let listeners = Listeners::new();
        let (seen, _subscription) = recorder(&listeners);
        listeners.publish(&PageEvent::Scrolled(3.0));
        assert_eq!(*seen.borrow(), vec![PageEvent::Scrolled(3.0)]);
    }

    #[test]
    fn dispose_removes_only_its_listener() {
        let listeners = Listeners::new();
        let (first, first_subscription) = recorder(&listeners);
        let (second, _second_subscription) = recorder(&listeners);
        assert_eq!(listeners.len(), 2);

        first_subscription.dispose();
        assert_eq!(listeners.len(), 1);
        listeners.publish(&PageEvent::PointerMoved { column: 1, row: 2 });
        assert!(first.borrow().is_empty());
        assert_eq!(second.borrow().len(), 1);
    }

    #[test]
    fn dropping_unsubscribes() {
        let listeners = Listeners::new();
        {
            let (_seen, _subscription) = recorder(&listeners);
            assert_eq!(listeners.len(), 1);
        }
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn listener_can_unsubscribe_itself() {
        let listeners = Listeners::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let calls = Rc::new(RefCell::new(0));
        let subscription = {
            let slot = slot.clone();
            let calls = calls.clone();
            listeners.subscribe(move |_: &PageEvent| {
                *calls.borrow_mut() += 1;
                if let Some(subscription) = slot.borrow_mut().take() {
                    subscription.dispose();
                }
            })
        };
        *slot.borrow_mut() = Some(subscription);

        listeners.publish(&PageEvent::Scrolled(1.0));
        listeners.publish(&PageEvent::Scrolled(2.0));
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn subscription_outliving_listeners_is_harmless() {
        let listeners = Listeners::new();
        let (_seen, subscription) = recorder(&listeners);
        drop(listeners);
        subscription.dispose();
    }
}
