//! Marker spheres revolving around the globe on one tilted orbital plane,
//! plus pointer hit-testing against their live screen positions.

use crate::constants::*;
use crate::easing::approach;
use glam::Vec2;
use std::cell::RefCell;
use std::f32::consts::PI;
use std::rc::Rc;

/// Static parameters of one orbiting marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitConfig {
    /// Orbit radius as a multiple of the main sphere radius.
    pub radius_mult: f32,
    /// Angular speed in rad/s.
    pub speed: f32,
    pub start_angle: f32,
    /// Marker radius as a multiple of the main sphere radius.
    pub marker_scale: f32,
    /// Points in the marker's own dot sphere.
    pub point_count: usize,
}

pub const DEFAULT_ORBITS: [OrbitConfig; 3] = [
    OrbitConfig {
        radius_mult: 1.52,
        speed: 0.5,
        start_angle: 0.0,
        marker_scale: 0.1,
        point_count: 140,
    },
    OrbitConfig {
        radius_mult: 1.88,
        speed: 0.31,
        start_angle: PI * 0.7,
        marker_scale: 0.08,
        point_count: 80,
    },
    OrbitConfig {
        radius_mult: 2.25,
        speed: 0.19,
        start_angle: PI * 1.4,
        marker_scale: 0.065,
        point_count: 50,
    },
];

/// Where a marker is this frame, in device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerPlacement {
    pub index: usize,
    pub center: Vec2,
    pub radius: f32,
    /// Synthetic depth `z·sin(tilt)` remapped to `[0, 1]`; higher is brighter.
    pub depth: f32,
    /// Y rotation of the marker's own dot sphere.
    pub spin: f32,
}

/// Hit target in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerHit {
    pub index: usize,
    pub center: Vec2,
    pub radius: f32,
}

/// Ellipse traced by an orbit on screen, in device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitTrack {
    pub center: Vec2,
    pub rx: f32,
    pub ry: f32,
    pub alpha: f32,
}

/// Flat-circle orbit position projected through the shared system tilt.
/// Returns the screen offset from the globe center and the raw depth.
#[inline]
pub fn orbit_offset(angle: f32, orbit_r: f32, tilt: f32) -> (Vec2, f32) {
    let x = angle.cos() * orbit_r;
    let z = angle.sin() * orbit_r;
    (Vec2::new(x, -z * tilt.cos()), z * tilt.sin())
}

pub struct OrbitSystem {
    pub configs: Vec<OrbitConfig>,
    pub tilt: f32,
    opacity: f32,
    placements: Vec<MarkerPlacement>,
    tracks: Vec<OrbitTrack>,
    hits: Vec<MarkerHit>,
}

impl Default for OrbitSystem {
    fn default() -> Self {
        Self::new(DEFAULT_ORBITS.to_vec(), SYSTEM_TILT)
    }
}

impl OrbitSystem {
    pub fn new(configs: Vec<OrbitConfig>, tilt: f32) -> Self {
        Self {
            configs,
            tilt,
            opacity: 0.0,
            placements: Vec::new(),
            tracks: Vec::new(),
            hits: Vec::new(),
        }
    }

    /// Current layer opacity in `[0, 1]`.
    #[inline]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// The interactive overlay should only take pointer events once markers
    /// are clearly visible.
    #[inline]
    pub fn pointer_events_enabled(&self) -> bool {
        self.opacity > MARKER_POINTER_THRESHOLD
    }

    pub fn placements(&self) -> &[MarkerPlacement] {
        &self.placements
    }

    pub fn tracks(&self) -> &[OrbitTrack] {
        &self.tracks
    }

    pub fn hits(&self) -> &[MarkerHit] {
        &self.hits
    }

    /// Recompute placements, tracks and hit targets for this frame. A
    /// static frame snaps opacity instead of fading.
    pub fn update(
        &mut self,
        time: f32,
        center: Vec2,
        main_radius: f32,
        dpr: f32,
        wanted: bool,
        static_frame: bool,
    ) {
        let target = if wanted { 1.0 } else { 0.0 };
        self.opacity = if static_frame {
            target
        } else {
            approach(self.opacity, target, MARKER_FADE)
        };
        if !wanted && self.opacity < 1e-3 {
            self.opacity = 0.0;
        }

        self.placements.clear();
        self.tracks.clear();
        self.hits.clear();
        let sin_t = self.tilt.sin();
        let dpr = dpr.max(0.1);

        for (i, cfg) in self.configs.iter().enumerate() {
            let orbit_r = main_radius * cfg.radius_mult;
            let angle = cfg.start_angle + cfg.speed * time;
            let (offset, z_depth) = orbit_offset(angle, orbit_r, self.tilt);
            let depth = if orbit_r > 0.0 && sin_t.abs() > 1e-6 {
                ((z_depth / (orbit_r * sin_t)) + 1.0) * 0.5
            } else {
                0.5
            };
            let depth = depth.clamp(0.0, 1.0);
            // far side renders smaller
            let radius = cfg.marker_scale * main_radius * (0.8 + 0.4 * depth);
            let pos = center + offset;

            self.tracks.push(OrbitTrack {
                center,
                rx: orbit_r,
                ry: (orbit_r * self.tilt.cos()).abs(),
                alpha: 0.065 * self.opacity,
            });
            self.placements.push(MarkerPlacement {
                index: i,
                center: pos,
                radius,
                depth,
                spin: time * (MARKER_SPIN_BASE + i as f32 * MARKER_SPIN_STEP) + i as f32 * 2.1,
            });
            if self.opacity > 0.0 {
                self.hits.push(MarkerHit {
                    index: i,
                    center: pos / dpr,
                    radius: (radius / dpr * MARKER_HIT_SCALE).max(MIN_HIT_RADIUS_PX),
                });
            }
        }
    }

    /// Index of the marker under a CSS-pixel pointer position.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<usize> {
        let p = Vec2::new(x, y);
        self.hits
            .iter()
            .find(|h| (p - h.center).length_squared() <= h.radius * h.radius)
            .map(|h| h.index)
    }
}

type ClickHandler = Rc<dyn Fn(usize)>;

/// Single optional marker-click callback, owned by whichever page section
/// currently wants the notifications.
#[derive(Clone, Default)]
pub struct MarkerClickSlot {
    handler: Rc<RefCell<Option<ClickHandler>>>,
}

impl MarkerClickSlot {
    pub fn set(&self, f: impl Fn(usize) + 'static) {
        *self.handler.borrow_mut() = Some(Rc::new(f));
    }

    pub fn clear(&self) {
        *self.handler.borrow_mut() = None;
    }

    pub fn is_set(&self) -> bool {
        self.handler.borrow().is_some()
    }

    /// Invoke the callback if a marker lies under the pointer. Returns the
    /// hit index, if any.
    pub fn dispatch(&self, orbits: &OrbitSystem, x: f32, y: f32) -> Option<usize> {
        let idx = orbits.hit_test(x, y)?;
        let handler = self.handler.borrow().clone();
        if let Some(f) = handler {
            f(idx);
        }
        Some(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn visible_system(dpr: f32) -> OrbitSystem {
        let mut sys = OrbitSystem::default();
        sys.update(0.0, Vec2::new(500.0, 400.0), 100.0, dpr, true, true);
        sys
    }

    #[test]
    fn offset_foreshortens_by_tilt() {
        let tilt = 1.0_f32;
        let (o, d) = orbit_offset(PI / 2.0, 10.0, tilt);
        assert!(o.x.abs() < 1e-4);
        assert!((o.y + 10.0 * tilt.cos()).abs() < 1e-4);
        assert!((d - 10.0 * tilt.sin()).abs() < 1e-4);
    }

    #[test]
    fn opacity_fades_rather_than_pops() {
        let mut sys = OrbitSystem::default();
        sys.update(0.0, Vec2::ZERO, 100.0, 1.0, true, false);
        let first = sys.opacity();
        assert!(first > 0.0 && first < 0.2);
        for _ in 0..200 {
            sys.update(0.0, Vec2::ZERO, 100.0, 1.0, true, false);
        }
        assert!(sys.pointer_events_enabled());
        sys.update(0.0, Vec2::ZERO, 100.0, 1.0, false, false);
        assert!(sys.opacity() < 1.0 && sys.opacity() > 0.8);
    }

    #[test]
    fn hit_test_uses_css_pixels_and_min_radius() {
        let sys = visible_system(2.0);
        let first = sys.placements()[0];
        let css = first.center / 2.0;
        assert_eq!(sys.hit_test(css.x, css.y), Some(0));
        // just inside the minimum radius
        assert_eq!(sys.hit_test(css.x + MIN_HIT_RADIUS_PX - 0.5, css.y), Some(0));
        assert_eq!(sys.hit_test(-1000.0, -1000.0), None);
    }

    #[test]
    fn invisible_layer_has_no_hits() {
        let mut sys = OrbitSystem::default();
        sys.update(0.0, Vec2::new(500.0, 400.0), 100.0, 1.0, false, true);
        assert!(sys.hits().is_empty());
        let p = sys.placements()[0].center;
        assert_eq!(sys.hit_test(p.x, p.y), None);
    }

    #[test]
    fn click_slot_invokes_only_on_hit() {
        let sys = visible_system(1.0);
        let slot = MarkerClickSlot::default();
        let got = Rc::new(Cell::new(None));
        let g = got.clone();
        slot.set(move |i| g.set(Some(i)));

        assert_eq!(slot.dispatch(&sys, -500.0, -500.0), None);
        assert_eq!(got.get(), None);

        let p = sys.placements()[2].center;
        assert_eq!(slot.dispatch(&sys, p.x, p.y), Some(2));
        assert_eq!(got.get(), Some(2));
    }

    #[test]
    fn markers_are_staggered() {
        let sys = visible_system(1.0);
        let ps = sys.placements();
        assert_eq!(ps.len(), 3);
        for a in 0..ps.len() {
            for b in (a + 1)..ps.len() {
                assert!((ps[a].center - ps[b].center).length() > 10.0);
            }
        }
    }
}
