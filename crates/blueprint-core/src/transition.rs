//! Cross-page navigation choreography: `Idle → Exiting → Entering → Idle`.
//!
//! A request plays the exit animation, defers the real navigation until the
//! exit has finished, then waits for the new page to mount before revealing
//! it. Only one navigation may be in flight at a time.

use crate::constants::{EXIT_DURATION_MS, REVEAL_DELAY_MS};
use crate::observable::Observable;
use crate::scheduler::{Scheduler, TimerSlot};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    Exiting,
    Entering,
}

/// Why a navigation request was dropped. These are expected races between
/// fast input and animation timing, not failures.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NavigationRejected {
    #[error("navigation already in flight ({phase:?})")]
    Busy { phase: TransitionPhase },
    #[error("already at destination")]
    SameDestination,
}

/// How an accepted request will reach its destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationPlan {
    /// Navigation already happened (reduced motion).
    Immediate,
    /// Navigation happens after the exit animation.
    Deferred { delay_ms: u32 },
}

#[derive(Clone, Copy, Debug)]
pub struct TransitionTimings {
    pub exit_ms: u32,
    pub reveal_delay_ms: u32,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            exit_ms: EXIT_DURATION_MS,
            reveal_delay_ms: REVEAL_DELAY_MS,
        }
    }
}

/// Path part of a location or href, without query or hash. Destinations are
/// compared on this alone.
pub fn location_path(href: &str) -> &str {
    let end = href.find(['?', '#']).unwrap_or(href.len());
    &href[..end]
}

type Navigator = Rc<dyn Fn(&str)>;
type Reveal = Rc<dyn Fn()>;

pub struct TransitionCoordinator {
    phase: Observable<TransitionPhase>,
    target: RefCell<String>,
    origin: RefCell<String>,
    timings: TransitionTimings,
    exit_timer: TimerSlot,
    reveal_timer: TimerSlot,
    navigator: RefCell<Option<Navigator>>,
    reveal: RefCell<Option<Reveal>>,
}

impl TransitionCoordinator {
    pub fn new(scheduler: Rc<dyn Scheduler>, timings: TransitionTimings) -> Rc<Self> {
        Rc::new(Self {
            phase: Observable::new(TransitionPhase::Idle),
            target: RefCell::new(String::new()),
            origin: RefCell::new(String::new()),
            timings,
            exit_timer: TimerSlot::new(scheduler.clone()),
            reveal_timer: TimerSlot::new(scheduler),
            navigator: RefCell::new(None),
            reveal: RefCell::new(None),
        })
    }

    #[inline]
    pub fn phase(&self) -> TransitionPhase {
        self.phase.get()
    }

    pub fn observable(&self) -> &Observable<TransitionPhase> {
        &self.phase
    }

    /// Destination of the current (or last) accepted navigation.
    pub fn target(&self) -> String {
        self.target.borrow().clone()
    }

    /// Hook that performs the actual navigation.
    pub fn set_navigator(&self, f: impl Fn(&str) + 'static) {
        *self.navigator.borrow_mut() = Some(Rc::new(f));
    }

    /// Hook that plays the reveal animation on the entering page.
    pub fn set_reveal(&self, f: impl Fn() + 'static) {
        *self.reveal.borrow_mut() = Some(Rc::new(f));
    }

    pub fn request(
        self: &Rc<Self>,
        href: &str,
        current_location: &str,
        reduced_motion: bool,
    ) -> Result<NavigationPlan, NavigationRejected> {
        if location_path(href) == location_path(current_location) {
            return Err(NavigationRejected::SameDestination);
        }
        let phase = self.phase();
        if phase != TransitionPhase::Idle {
            return Err(NavigationRejected::Busy { phase });
        }

        *self.target.borrow_mut() = href.to_string();
        *self.origin.borrow_mut() = current_location.to_string();

        if reduced_motion {
            self.navigate(href);
            return Ok(NavigationPlan::Immediate);
        }

        log::debug!("[transition] exiting toward {}", href);
        self.phase.set(TransitionPhase::Exiting);
        let weak: Weak<Self> = Rc::downgrade(self);
        let dest = href.to_string();
        self.exit_timer.arm(self.timings.exit_ms, move || {
            if let Some(c) = weak.upgrade() {
                c.navigate(&dest);
            }
        });
        Ok(NavigationPlan::Deferred {
            delay_ms: self.timings.exit_ms,
        })
    }

    /// Called whenever the current-location identifier changes, i.e. when
    /// new content has mounted.
    pub fn location_changed(self: &Rc<Self>, location: &str) {
        if self.phase() != TransitionPhase::Exiting
            || location_path(&self.origin.borrow()) == location_path(location)
        {
            return;
        }
        // A navigation that lands early (back button) makes the exit timer moot.
        self.exit_timer.clear();
        log::debug!("[transition] entering {}", location);
        self.phase.set(TransitionPhase::Entering);
        let weak: Weak<Self> = Rc::downgrade(self);
        self.reveal_timer.arm(self.timings.reveal_delay_ms, move || {
            if let Some(c) = weak.upgrade() {
                c.finish_reveal();
            }
        });
    }

    /// Abandon any choreography in flight and return to `Idle`.
    pub fn cancel(&self) {
        self.exit_timer.clear();
        self.reveal_timer.clear();
        self.phase.set(TransitionPhase::Idle);
    }

    fn navigate(&self, href: &str) {
        let nav = self.navigator.borrow().clone();
        match nav {
            Some(f) => f(href),
            None => log::warn!("[transition] no navigator registered for {}", href),
        }
    }

    fn finish_reveal(&self) {
        let reveal = self.reveal.borrow().clone();
        if let Some(f) = reveal {
            f();
        }
        log::debug!("[transition] idle");
        self.phase.set(TransitionPhase::Idle);
    }
}
