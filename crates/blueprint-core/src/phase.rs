//! Visual lifecycle of the globe: `Loading → Transitioning → Ready`.

use crate::constants::{LOADER_INITIAL_DELAY_MS, MORPH_DURATION_MS};
use crate::easing::ease_out_expo;
use crate::observable::Observable;
use crate::scheduler::{Scheduler, TimerSlot};
use std::cell::Cell;
use std::rc::{Rc, Weak};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlobePhase {
    Loading,
    Transitioning,
    Ready,
}

/// Owns the current phase and the morph timing. Moves only forward; there is
/// no way back to `Loading` short of building a new machine.
pub struct PhaseMachine {
    phase: Observable<GlobePhase>,
    started_at: Cell<Option<f64>>,
    morph_ms: f64,
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new(MORPH_DURATION_MS)
    }
}

impl PhaseMachine {
    pub fn new(morph_ms: u32) -> Self {
        Self {
            phase: Observable::new(GlobePhase::Loading),
            started_at: Cell::new(None),
            morph_ms: morph_ms as f64,
        }
    }

    #[inline]
    pub fn phase(&self) -> GlobePhase {
        self.phase.get()
    }

    /// Observable handle for subscribers (loader overlay, content gate).
    pub fn observable(&self) -> &Observable<GlobePhase> {
        &self.phase
    }

    pub fn morph_ms(&self) -> f64 {
        self.morph_ms
    }

    /// Start the timed morph. Only valid from `Loading`; returns whether the
    /// phase moved.
    pub fn begin_transition(&self, now_ms: f64) -> bool {
        if self.phase() != GlobePhase::Loading {
            return false;
        }
        self.started_at.set(Some(now_ms));
        log::debug!("[phase] loading -> transitioning at {:.0}ms", now_ms);
        self.phase.set(GlobePhase::Transitioning);
        true
    }

    /// Per-frame check that completes the morph once its duration elapsed.
    pub fn evaluate(&self, now_ms: f64) -> GlobePhase {
        if self.phase() == GlobePhase::Transitioning && self.elapsed(now_ms) >= self.morph_ms {
            log::debug!("[phase] transitioning -> ready");
            self.phase.set(GlobePhase::Ready);
        }
        self.phase()
    }

    /// Complete a pending morph immediately. Used when no animation loop runs.
    pub fn settle(&self) -> GlobePhase {
        if self.phase() == GlobePhase::Transitioning {
            log::debug!("[phase] transitioning -> ready (settled)");
            self.phase.set(GlobePhase::Ready);
        }
        self.phase()
    }

    /// Eased morph progress in `[0, 1]`.
    pub fn progress(&self, now_ms: f64) -> f32 {
        match self.phase() {
            GlobePhase::Loading => 0.0,
            GlobePhase::Ready => 1.0,
            GlobePhase::Transitioning if self.morph_ms <= 0.0 => 1.0,
            GlobePhase::Transitioning => {
                let raw = (self.elapsed(now_ms) / self.morph_ms).clamp(0.0, 1.0);
                ease_out_expo(raw as f32)
            }
        }
    }

    fn elapsed(&self, now_ms: f64) -> f64 {
        self.started_at
            .get()
            .map(|s| (now_ms - s).max(0.0))
            .unwrap_or(0.0)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LoaderTimings {
    pub initial_delay_ms: u32,
}

impl Default for LoaderTimings {
    fn default() -> Self {
        Self {
            initial_delay_ms: LOADER_INITIAL_DELAY_MS,
        }
    }
}

/// Page-load choreography: after an initial delay, start the globe morph and
/// hide the loader once the morph has had time to finish.
pub struct PageLoader {
    phase: Rc<PhaseMachine>,
    timings: LoaderTimings,
    visible: Observable<bool>,
    start_timer: TimerSlot,
    dismiss_timer: TimerSlot,
}

impl PageLoader {
    pub fn new(
        phase: Rc<PhaseMachine>,
        scheduler: Rc<dyn Scheduler>,
        timings: LoaderTimings,
    ) -> Rc<Self> {
        Rc::new(Self {
            phase,
            timings,
            visible: Observable::new(true),
            start_timer: TimerSlot::new(scheduler.clone()),
            dismiss_timer: TimerSlot::new(scheduler),
        })
    }

    /// Whether the loader overlay should be on screen.
    pub fn visible(&self) -> &Observable<bool> {
        &self.visible
    }

    pub fn start(self: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(self);
        self.start_timer
            .arm(self.timings.initial_delay_ms, move || {
                if let Some(loader) = weak.upgrade() {
                    loader.on_initial_delay();
                }
            });
    }

    fn on_initial_delay(self: Rc<Self>) {
        let now = self.start_timer.scheduler().now();
        if !self.phase.begin_transition(now) {
            return;
        }
        let weak = Rc::downgrade(&self);
        self.dismiss_timer
            .arm(self.phase.morph_ms().round() as u32, move || {
                if let Some(loader) = weak.upgrade() {
                    loader.visible.set(false);
                }
            });
    }

    /// Cancel any pending step, e.g. on teardown.
    pub fn cancel(&self) {
        self.start_timer.clear();
        self.dismiss_timer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use std::cell::RefCell;

    #[test]
    fn evaluate_before_begin_stays_loading() {
        let m = PhaseMachine::new(1200);
        assert_eq!(m.evaluate(1e9), GlobePhase::Loading);
        assert_eq!(m.settle(), GlobePhase::Loading);
        assert_eq!(m.progress(1e9), 0.0);
    }

    #[test]
    fn zero_length_morph_is_already_complete() {
        let m = PhaseMachine::new(0);
        assert!(m.begin_transition(100.0));
        assert_eq!(m.phase(), GlobePhase::Transitioning);
        assert_eq!(m.progress(100.0), 1.0);
        assert_eq!(m.evaluate(100.0), GlobePhase::Ready);
    }

    #[test]
    fn begin_transition_is_one_shot() {
        let m = PhaseMachine::new(1200);
        assert!(m.begin_transition(0.0));
        assert!(!m.begin_transition(10.0));
        assert_eq!(m.evaluate(1199.0), GlobePhase::Transitioning);
        assert_eq!(m.evaluate(1200.0), GlobePhase::Ready);
        assert!(!m.begin_transition(5000.0));
        assert_eq!(m.phase(), GlobePhase::Ready);
    }

    #[test]
    fn observers_see_every_step_in_order() {
        let m = PhaseMachine::new(100);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        m.observable().subscribe(move |p| s.borrow_mut().push(*p));
        m.begin_transition(0.0);
        m.evaluate(50.0);
        m.evaluate(100.0);
        m.evaluate(200.0);
        assert_eq!(
            *seen.borrow(),
            vec![GlobePhase::Transitioning, GlobePhase::Ready]
        );
    }

    #[test]
    fn loader_runs_its_choreography() {
        let sched = ManualScheduler::new();
        let phase = Rc::new(PhaseMachine::new(1200));
        let loader = PageLoader::new(phase.clone(), sched.clone(), LoaderTimings::default());
        loader.start();

        sched.advance(1799.0);
        assert_eq!(phase.phase(), GlobePhase::Loading);
        sched.advance(1.0);
        assert_eq!(phase.phase(), GlobePhase::Transitioning);
        assert!(loader.visible().get());

        sched.advance(1200.0);
        assert!(!loader.visible().get());
        assert_eq!(phase.evaluate(sched.now()), GlobePhase::Ready);
    }

    #[test]
    fn cancelled_loader_never_starts_the_morph() {
        let sched = ManualScheduler::new();
        let phase = Rc::new(PhaseMachine::default());
        let loader = PageLoader::new(phase.clone(), sched.clone(), LoaderTimings::default());
        loader.start();
        sched.advance(500.0);
        loader.cancel();
        sched.advance(10_000.0);
        assert_eq!(phase.phase(), GlobePhase::Loading);
    }
}
