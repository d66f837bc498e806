//! Single-threaded publish/subscribe value cells.
//!
//! These are the shared state containers read by independent renderers and
//! written by whichever component owns a concern. Cloning an `Observable`
//! yields another handle to the same cell.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle returned by [`Observable::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    value: RefCell<T>,
    listeners: RefCell<Vec<(Subscription, Listener<T>)>>,
    next_id: Cell<u64>,
}

pub struct Observable<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.inner.value.borrow())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(value),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    #[inline]
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Store `value` and, if it differs from the current one, notify every
    /// listener synchronously in registration order. Returns whether the
    /// value changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut cur = self.inner.value.borrow_mut();
            if *cur == value {
                return false;
            }
            *cur = value.clone();
        }
        // Snapshot so listeners may subscribe, unsubscribe or read re-entrantly.
        let listeners: Vec<Listener<T>> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for l in listeners {
            l(&value);
        }
        true
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = Subscription(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: Subscription) -> bool {
        let mut ls = self.inner.listeners.borrow_mut();
        let before = ls.len();
        ls.retain(|(sid, _)| *sid != id);
        ls.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}
