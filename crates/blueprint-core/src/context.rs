//! Shared globe state handed to every consumer on the page.

use crate::observable::Observable;
use crate::orbit::MarkerClickSlot;
use crate::phase::{GlobePhase, PhaseMachine};
use crate::scheduler::Scheduler;
use crate::slides::SlideTarget;
use crate::transition::{TransitionCoordinator, TransitionTimings};
use std::rc::Rc;

/// One explicitly-shared context: no module-level singletons. Cloning is
/// cheap and every clone observes the same state.
#[derive(Clone)]
pub struct GlobeContext {
    pub phase: Rc<PhaseMachine>,
    pub transition: Rc<TransitionCoordinator>,
    pub slide: Observable<SlideTarget>,
    pub show_markers: Observable<bool>,
    pub audio_playing: Observable<bool>,
    pub marker_click: MarkerClickSlot,
}

impl GlobeContext {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self::with_parts(
            Rc::new(PhaseMachine::default()),
            TransitionCoordinator::new(scheduler, TransitionTimings::default()),
        )
    }

    pub fn with_parts(phase: Rc<PhaseMachine>, transition: Rc<TransitionCoordinator>) -> Self {
        Self {
            phase,
            transition,
            slide: Observable::new(SlideTarget::Hero),
            show_markers: Observable::new(true),
            audio_playing: Observable::new(false),
            marker_click: MarkerClickSlot::default(),
        }
    }

    /// Orbit markers only show on the projects slide, and only when enabled.
    pub fn markers_wanted(&self) -> bool {
        self.slide.get() == SlideTarget::Projects && self.show_markers.get()
    }

    /// Page content is gated until the globe has finished its morph.
    pub fn content_revealed(&self) -> bool {
        self.phase.phase() == GlobePhase::Ready
    }
}
