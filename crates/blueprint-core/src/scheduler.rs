//! Cancelable timers behind a small trait so choreography can be driven by
//! `setTimeout` in the browser and by a virtual clock on the host.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type TimerId = u32;

pub trait Scheduler {
    /// Monotonic milliseconds.
    fn now(&self) -> f64;
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerId;
    /// Cancelling an unknown or already-fired id is a no-op.
    fn cancel(&self, id: TimerId);
}

/// Holds at most one pending timer. Arming again, clearing, or dropping the
/// slot cancels whatever was pending, so a stale callback can never fire
/// after a newer choreography has started.
pub struct TimerSlot {
    scheduler: Rc<dyn Scheduler>,
    pending: Cell<Option<TimerId>>,
}

impl TimerSlot {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            pending: Cell::new(None),
        }
    }

    pub fn arm(&self, delay_ms: u32, task: impl FnOnce() + 'static) {
        self.clear();
        let id = self.scheduler.schedule(delay_ms, Box::new(task));
        self.pending.set(Some(id));
    }

    pub fn clear(&self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel(id);
        }
    }

    pub fn scheduler(&self) -> &Rc<dyn Scheduler> {
        &self.scheduler
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.clear();
    }
}

struct Pending {
    id: TimerId,
    due: f64,
    task: Box<dyn FnOnce()>,
}

/// Deterministic virtual-time scheduler. Timers fire in due order (ties in
/// scheduling order) only when [`ManualScheduler::advance`] is called.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<f64>,
    next_id: Cell<TimerId>,
    queue: RefCell<Vec<Pending>>,
}

impl ManualScheduler {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Move the clock forward by `ms`, running every timer that falls due.
    /// Tasks may schedule or cancel further timers while running.
    pub fn advance(&self, ms: f64) {
        let target = self.now.get() + ms;
        loop {
            let next = {
                let mut q = self.queue.borrow_mut();
                let idx = q
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)))
                    .map(|(i, _)| i);
                idx.map(|i| q.remove(i))
            };
            match next {
                Some(p) => {
                    self.now.set(p.due);
                    (p.task)();
                }
                None => break,
            }
        }
        self.now.set(target);
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> f64 {
        self.now.get()
    }

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerId {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        self.queue.borrow_mut().push(Pending {
            id,
            due: self.now.get() + delay_ms as f64,
            task,
        });
        id
    }

    fn cancel(&self, id: TimerId) {
        self.queue.borrow_mut().retain(|p| p.id != id);
    }
}
