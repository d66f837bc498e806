//! Slide targets, their screen anchors, and the slide deck navigation state.

use crate::constants::*;
use crate::observable::Observable;
use glam::Vec2;
use std::cell::Cell;

/// Region of the page the globe should migrate toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlideTarget {
    Hero,
    About,
    Experience,
    Projects,
    /// Secondary pages (blog, market, ...) where the globe idles in a corner.
    Ambient,
}

/// Center and radius expressed as fractions of the viewport. `radius` is a
/// fraction of `min(width, height)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
}

/// Where the loading dot sits before the morph.
pub const LOADING_ANCHOR: Anchor = Anchor {
    cx: 0.5,
    cy: 0.5,
    radius: 0.06,
};

/// Canvas size in device pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, dpr: f32) -> Self {
        Self {
            width,
            height,
            dpr: dpr.max(0.1),
        }
    }

    #[inline]
    pub fn css_width(&self) -> f32 {
        self.width / self.dpr
    }

    #[inline]
    pub fn is_narrow(&self) -> bool {
        self.css_width() < NARROW_VIEWPORT_CSS_PX
    }
}

impl Anchor {
    /// Resolve into a device-pixel center and radius.
    pub fn resolve(&self, vp: &Viewport) -> (Vec2, f32) {
        (
            Vec2::new(vp.width * self.cx, vp.height * self.cy),
            vp.width.min(vp.height) * self.radius,
        )
    }
}

impl SlideTarget {
    pub const DECK: [SlideTarget; 4] = [
        SlideTarget::Hero,
        SlideTarget::About,
        SlideTarget::Experience,
        SlideTarget::Projects,
    ];

    pub fn id(self) -> &'static str {
        match self {
            SlideTarget::Hero => "hero",
            SlideTarget::About => "about",
            SlideTarget::Experience => "experience",
            SlideTarget::Projects => "projects",
            SlideTarget::Ambient => "ambient",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SlideTarget::Hero => "Hero",
            SlideTarget::About => "About",
            SlideTarget::Experience => "Experience",
            SlideTarget::Projects => "Projects",
            SlideTarget::Ambient => "Ambient",
        }
    }

    /// Parse a URL hash (`#about`, `about`) into a deck slide.
    pub fn from_hash(hash: &str) -> Option<SlideTarget> {
        let id = hash.trim_start_matches('#');
        Self::DECK.into_iter().find(|s| s.id() == id)
    }

    pub fn deck_index(self) -> Option<usize> {
        Self::DECK.iter().position(|s| *s == self)
    }

    /// Screen anchor for this target. Narrow viewports stack the globe above
    /// the content instead of beside it.
    pub fn anchor(self, vp: &Viewport) -> Anchor {
        let (cx, cy, radius) = if vp.is_narrow() {
            match self {
                SlideTarget::Hero => (0.5, 0.36, 0.2),
                SlideTarget::About => (0.5, 0.2, 0.14),
                SlideTarget::Experience => (0.82, 0.12, 0.1),
                SlideTarget::Projects => (0.5, 0.3, 0.14),
                SlideTarget::Ambient => (0.85, 0.9, 0.08),
            }
        } else {
            match self {
                SlideTarget::Hero => (0.67, 0.5, 0.22),
                SlideTarget::About => (0.78, 0.38, 0.16),
                SlideTarget::Experience => (0.86, 0.72, 0.12),
                SlideTarget::Projects => (0.5, 0.5, 0.16),
                SlideTarget::Ambient => (0.86, 0.84, 0.1),
            }
        };
        Anchor { cx, cy, radius }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlideChange {
    pub from: usize,
    pub to: usize,
    pub direction: Direction,
}

/// Inputs that move the deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideCommand {
    Next,
    Previous,
    First,
    Last,
}

impl SlideCommand {
    pub fn from_key(key: &str) -> Option<SlideCommand> {
        match key {
            "ArrowRight" | "ArrowDown" => Some(SlideCommand::Next),
            "ArrowLeft" | "ArrowUp" => Some(SlideCommand::Previous),
            "Home" => Some(SlideCommand::First),
            "End" => Some(SlideCommand::Last),
            _ => None,
        }
    }
}

/// Classify a touch gesture as a horizontal swipe. Left swipes advance.
pub fn classify_swipe(dx: f32, dy: f32, dt_ms: f64) -> Option<SlideCommand> {
    if dx.abs() < dy.abs() * SWIPE_AXIS_RATIO || dx.abs() < SWIPE_MIN_DX_PX || dt_ms > SWIPE_MAX_MS
    {
        return None;
    }
    Some(if dx < 0.0 {
        SlideCommand::Next
    } else {
        SlideCommand::Previous
    })
}

/// Debounces wheel-driven navigation.
#[derive(Debug, Default)]
pub struct WheelGate {
    last_ms: Cell<Option<f64>>,
}

impl WheelGate {
    /// `at_top`/`at_bottom` describe the active slide's scroll position.
    pub fn command(
        &self,
        delta_y: f64,
        at_top: bool,
        at_bottom: bool,
        now_ms: f64,
    ) -> Option<SlideCommand> {
        if let Some(last) = self.last_ms.get() {
            if now_ms - last < WHEEL_DEBOUNCE_MS {
                return None;
            }
        }
        let cmd = if delta_y > 0.0 && at_bottom {
            SlideCommand::Next
        } else if delta_y < 0.0 && at_top {
            SlideCommand::Previous
        } else {
            return None;
        };
        self.last_ms.set(Some(now_ms));
        Some(cmd)
    }
}

/// Active slide plus an in-flight guard so overlapping slide animations
/// cannot start. Writes the globe's slide target as soon as a move begins.
pub struct SlideDeck {
    active: Cell<usize>,
    animating: Cell<bool>,
    target: Observable<SlideTarget>,
}

impl SlideDeck {
    pub fn new(target: Observable<SlideTarget>) -> Self {
        let active = target.get().deck_index().unwrap_or(0);
        Self {
            active: Cell::new(active),
            animating: Cell::new(false),
            target,
        }
    }

    #[inline]
    pub fn active(&self) -> usize {
        self.active.get()
    }

    pub fn active_slide(&self) -> SlideTarget {
        SlideTarget::DECK[self.active.get()]
    }

    pub fn is_animating(&self) -> bool {
        self.animating.get()
    }

    /// Jump without animation, e.g. from the initial URL hash.
    pub fn jump_to(&self, index: usize) {
        if index < SlideTarget::DECK.len() {
            self.active.set(index);
            self.target.set(SlideTarget::DECK[index]);
        }
    }

    pub fn navigate_to(&self, index: usize) -> Option<SlideChange> {
        let from = self.active.get();
        if self.animating.get() || index >= SlideTarget::DECK.len() || index == from {
            return None;
        }
        self.active.set(index);
        self.animating.set(true);
        self.target.set(SlideTarget::DECK[index]);
        Some(SlideChange {
            from,
            to: index,
            direction: if index > from {
                Direction::Forward
            } else {
                Direction::Backward
            },
        })
    }

    pub fn apply(&self, cmd: SlideCommand) -> Option<SlideChange> {
        let cur = self.active.get();
        let last = SlideTarget::DECK.len() - 1;
        let index = match cmd {
            SlideCommand::Next => cur + 1,
            SlideCommand::Previous => match cur.checked_sub(1) {
                Some(i) => i,
                None => return None,
            },
            SlideCommand::First => 0,
            SlideCommand::Last => last,
        };
        self.navigate_to(index)
    }

    /// Release the in-flight guard once the slide animation has completed.
    pub fn finish(&self) {
        self.animating.set(false);
    }
}
