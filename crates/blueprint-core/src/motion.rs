//! Where the globe sits on screen and how its clock advances.

use crate::constants::*;
use crate::easing::{approach, lerp};
use crate::phase::GlobePhase;
use crate::projection::tilt_at;
use crate::slides::{Anchor, Viewport, LOADING_ANCHOR};
use glam::Vec2;

/// Frame clock feeding rotation and deformation.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    pub time: f32,
    pub spin: f32,
}

impl FrameClock {
    /// Advance by `dt` seconds. Static frames pin time and spin so reduced
    /// motion always renders the same still image.
    pub fn tick(&mut self, dt: f32, static_frame: bool) {
        if static_frame {
            self.time = STATIC_TIME;
            self.spin = STATIC_SPIN;
            return;
        }
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.time += dt;
        self.spin += dt * SPIN_SPEED;
    }

    #[inline]
    pub fn tilt(&self) -> f32 {
        tilt_at(self.time)
    }
}

/// Smoothed center and radius in device pixels.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlobeMotion {
    center: Vec2,
    radius: f32,
    placed: bool,
}

impl GlobeMotion {
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// While loading or morphing, interpolate from the loading anchor by the
    /// eased progress. Once ready, chase the target anchor a fraction of the
    /// gap per frame. Static frames and the first placement snap.
    pub fn update(
        &mut self,
        phase: GlobePhase,
        progress: f32,
        target: &Anchor,
        vp: &Viewport,
        static_frame: bool,
    ) -> (Vec2, f32) {
        let (goal_c, goal_r) = target.resolve(vp);
        match phase {
            GlobePhase::Loading | GlobePhase::Transitioning => {
                let (from_c, from_r) = LOADING_ANCHOR.resolve(vp);
                let t = progress.clamp(0.0, 1.0);
                self.center = from_c.lerp(goal_c, t);
                self.radius = lerp(from_r, goal_r, t);
            }
            GlobePhase::Ready if static_frame || !self.placed => {
                self.center = goal_c;
                self.radius = goal_r;
            }
            GlobePhase::Ready => {
                self.center = Vec2::new(
                    approach(self.center.x, goal_c.x, MOTION_SMOOTHING),
                    approach(self.center.y, goal_c.y, MOTION_SMOOTHING),
                );
                self.radius = approach(self.radius, goal_r, MOTION_SMOOTHING);
            }
        }
        self.placed = true;
        (self.center, self.radius)
    }
}
