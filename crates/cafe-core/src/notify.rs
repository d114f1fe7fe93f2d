//! # Change Notification
//!
//! The cart reports every mutation to exactly one listener: whichever page
//! currently displays cart state. Pages install their listener on load and
//! remove it on close.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SingleSlot: last registrant wins                                       │
//! │                                                                         │
//! │   CartPage.load()  ──► set_listener(Some(render))   slot = render       │
//! │   cart.add_item()  ──► notify(items)                render(items)       │
//! │   CartPage.close() ──► set_listener(None)           slot = empty        │
//! │   cart.clear()     ──► notify([])                   (nobody called)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart only talks to the [`ChangeNotifier`] trait. A subscribe/dispose
//! style notifier with several listeners can be plugged in without touching
//! the cart, at the cost of changing the re-render order callers rely on
//! today.

use std::fmt;

/// Callback invoked with the post-mutation snapshot.
pub type Listener<T> = Box<dyn FnMut(&T)>;

/// Delivery side of a change listener.
pub trait ChangeNotifier<T: ?Sized> {
    /// Installs (`Some`) or removes (`None`) the listener. Installing does
    /// not fire it.
    fn set_listener(&mut self, listener: Option<Listener<T>>);

    /// Whether a listener is currently installed.
    fn has_listener(&self) -> bool;

    /// Fires the listener, if any, with `value`.
    fn notify(&mut self, value: &T);
}

/// One listener slot; installing replaces the previous listener wholesale.
pub struct SingleSlot<T: ?Sized> {
    listener: Option<Listener<T>>,
}

impl<T: ?Sized> SingleSlot<T> {
    pub fn new() -> Self {
        SingleSlot { listener: None }
    }
}

impl<T: ?Sized> Default for SingleSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for SingleSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleSlot")
            .field("installed", &self.listener.is_some())
            .finish()
    }
}

impl<T: ?Sized> ChangeNotifier<T> for SingleSlot<T> {
    fn set_listener(&mut self, listener: Option<Listener<T>>) {
        self.listener = listener;
    }

    fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    fn notify(&mut self, value: &T) {
        if let Some(listener) = self.listener.as_mut() {
            listener(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_last_registrant_wins() {
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        let mut slot: SingleSlot<str> = SingleSlot::new();

        let sink = first.clone();
        slot.set_listener(Some(Box::new(move |v: &str| sink.borrow_mut().push(v.to_string()))));
        slot.notify("a");

        let sink = second.clone();
        slot.set_listener(Some(Box::new(move |v: &str| sink.borrow_mut().push(v.to_string()))));
        slot.notify("b");

        assert_eq!(*first.borrow(), vec!["a"]);
        assert_eq!(*second.borrow(), vec!["b"]);
    }

    #[test]
    fn test_cleared_slot_is_silent() {
        let calls = Rc::new(RefCell::new(0));
        let mut slot: SingleSlot<[u8]> = SingleSlot::default();

        let counter = calls.clone();
        slot.set_listener(Some(Box::new(move |_: &[u8]| *counter.borrow_mut() += 1)));
        assert!(slot.has_listener());
        assert_eq!(*calls.borrow(), 0);

        slot.set_listener(None);
        slot.notify(&[1, 2]);
        assert!(!slot.has_listener());
        assert_eq!(*calls.borrow(), 0);
    }
}
