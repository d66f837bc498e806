//! Composes one frame of the globe into a flat draw list.

use crate::audio::FrequencyBands;
use crate::geometry::{GlobeGeometry, PointSet};
use crate::motion::{FrameClock, GlobeMotion};
use crate::orbit::{orbit_offset, OrbitSystem, OrbitTrack};
use crate::phase::GlobePhase;
use crate::projection::{project_set, Dot, FrameInputs, SetStyle, Tone};
use crate::slides::{SlideTarget, Viewport};
use crate::waves::{intensity_for, random_unit_vector, BeatWave, BeatWaves, OnsetDetector};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Everything the host knows about this frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameEnv {
    pub viewport: Viewport,
    pub phase: GlobePhase,
    /// Eased morph progress from the phase machine.
    pub progress: f32,
    pub slide: SlideTarget,
    /// `slide == Projects && show_markers`.
    pub markers_wanted: bool,
    pub bands: FrequencyBands,
    /// Seconds since the previous frame.
    pub dt: f32,
    pub static_frame: bool,
}

/// Paint order is tracks first, then dots in order.
#[derive(Debug, Default)]
pub struct DrawList {
    pub tracks: Vec<OrbitTrack>,
    pub dots: Vec<Dot>,
}

impl DrawList {
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.dots.clear();
    }

    pub fn len(&self) -> usize {
        self.dots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty() && self.tracks.is_empty()
    }
}

pub struct GlobeScene {
    geometry: GlobeGeometry,
    clock: FrameClock,
    motion: GlobeMotion,
    orbits: OrbitSystem,
    onset: OnsetDetector,
    waves: BeatWaves,
    rng: StdRng,
}

impl GlobeScene {
    pub fn new(seed: u64) -> Self {
        let orbits = OrbitSystem::default();
        Self {
            geometry: GlobeGeometry::new(&orbits.configs),
            clock: FrameClock::default(),
            motion: GlobeMotion::default(),
            orbits,
            onset: OnsetDetector::default(),
            waves: BeatWaves::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_geometry(geometry: GlobeGeometry, seed: u64) -> Self {
        Self {
            geometry,
            ..Self::new(seed)
        }
    }

    pub fn orbits(&self) -> &OrbitSystem {
        &self.orbits
    }

    pub fn waves(&self) -> &BeatWaves {
        &self.waves
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn motion(&self) -> &GlobeMotion {
        &self.motion
    }

    /// Advance all per-frame state and write the frame into `out`.
    pub fn frame(&mut self, env: &FrameEnv, out: &mut DrawList) {
        out.clear();
        self.clock.tick(env.dt, env.static_frame);
        let time = self.clock.time;

        if !env.static_frame {
            if self.onset.observe(env.bands.bass, time) {
                let origin = random_unit_vector(&mut self.rng);
                log::trace!("[scene] beat wave at t={:.2}", time);
                self.waves.spawn(BeatWave {
                    origin,
                    born_at: time,
                    intensity: intensity_for(env.bands.bass),
                });
            }
            self.waves.prune(time);
        }

        let anchor = env.slide.anchor(&env.viewport);
        let (center, radius) = self.motion.update(
            env.phase,
            env.progress,
            &anchor,
            &env.viewport,
            env.static_frame,
        );
        let dpr = env.viewport.dpr;
        self.orbits.update(
            time,
            center,
            radius,
            dpr,
            env.markers_wanted,
            env.static_frame,
        );

        let globe = FrameInputs {
            time,
            spin: self.clock.spin,
            tilt: self.clock.tilt(),
            progress: env.progress,
            center,
            radius,
            dpr,
            bands: env.bands,
            waves: Some(&self.waves),
            opacity_scale: 1.0,
        };

        let layer = self.orbits.opacity();
        if layer > 0.0 {
            out.tracks.extend_from_slice(self.orbits.tracks());
            self.emit_nodes(center, radius, dpr, layer, out);
        }
        self.emit_markers(&globe, layer, false, out);
        project_set(&self.geometry.latitudes, &SetStyle::WIREFRAME, &globe, &mut out.dots);
        project_set(&self.geometry.longitudes, &SetStyle::WIREFRAME, &globe, &mut out.dots);
        project_set(&self.geometry.sphere, &SetStyle::SPHERE, &globe, &mut out.dots);
        self.emit_markers(&globe, layer, true, out);
    }

    /// Small dots on each track, half an orbit away from the planet.
    fn emit_nodes(&self, center: Vec2, radius: f32, dpr: f32, layer: f32, out: &mut DrawList) {
        for (p, cfg) in self.orbits.placements().iter().zip(&self.orbits.configs) {
            let angle = cfg.start_angle + cfg.speed * self.clock.time + std::f32::consts::PI;
            let (offset, _) = orbit_offset(angle, radius * cfg.radius_mult, self.orbits.tilt);
            out.dots.push(Dot {
                x: center.x + offset.x,
                y: center.y + offset.y,
                size: (3.0 * dpr).round(),
                alpha: 0.25 * layer * (1.0 - 0.5 * p.depth),
                tone: Tone::Ink,
            });
        }
    }

    /// Marker spheres on one side of the main sphere.
    fn emit_markers(&self, globe: &FrameInputs<'_>, layer: f32, front: bool, out: &mut DrawList) {
        if layer <= 0.0 {
            return;
        }
        for p in self.orbits.placements() {
            if (p.depth >= 0.5) != front {
                continue;
            }
            let Some(set) = self.geometry.planets.get(p.index) else {
                continue;
            };
            let inputs = FrameInputs {
                spin: p.spin,
                progress: 1.0,
                center: p.center,
                radius: p.radius,
                waves: None,
                bands: FrequencyBands::SILENT,
                opacity_scale: layer * (0.45 + 0.55 * p.depth),
                ..*globe
            };
            project_marker(set, &inputs, out);
        }
    }
}

fn project_marker(set: &PointSet, inputs: &FrameInputs<'_>, out: &mut DrawList) {
    project_set(set, &SetStyle::PLANET, inputs, &mut out.dots);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SPHERE_POINT_COUNT;

    fn env(phase: GlobePhase, progress: f32) -> FrameEnv {
        FrameEnv {
            viewport: Viewport::new(1600.0, 900.0, 1.0),
            phase,
            progress,
            slide: SlideTarget::Hero,
            markers_wanted: false,
            bands: FrequencyBands::SILENT,
            dt: 1.0 / 60.0,
            static_frame: false,
        }
    }

    #[test]
    fn loading_frame_draws_only_the_sphere() {
        let mut scene = GlobeScene::new(1);
        let mut out = DrawList::default();
        scene.frame(&env(GlobePhase::Loading, 0.0), &mut out);
        assert!(out.tracks.is_empty());
        assert_eq!(out.len(), SPHERE_POINT_COUNT);
    }

    #[test]
    fn ready_frame_adds_wireframes() {
        let mut scene = GlobeScene::new(1);
        let mut out = DrawList::default();
        scene.frame(&env(GlobePhase::Ready, 1.0), &mut out);
        assert!(out.len() > SPHERE_POINT_COUNT);
        assert!(out.dots.iter().all(|d| d.tone == Tone::Ink));
    }

    #[test]
    fn projects_slide_brings_in_markers() {
        let mut scene = GlobeScene::new(1);
        let mut out = DrawList::default();
        let mut e = env(GlobePhase::Ready, 1.0);
        e.slide = SlideTarget::Projects;
        e.markers_wanted = true;
        e.static_frame = true;
        scene.frame(&e, &mut out);
        assert_eq!(out.tracks.len(), 3);
        assert!(out.dots.iter().any(|d| d.tone == Tone::Accent));
        assert!(scene.orbits().pointer_events_enabled());
    }

    #[test]
    fn bass_onset_spawns_a_wave() {
        let mut scene = GlobeScene::new(9);
        let mut out = DrawList::default();
        let mut e = env(GlobePhase::Ready, 1.0);
        scene.frame(&e, &mut out);
        assert!(scene.waves().is_empty());
        e.bands = FrequencyBands {
            bass: 0.8,
            mid: 0.0,
            treble: 0.0,
        };
        scene.frame(&e, &mut out);
        assert_eq!(scene.waves().len(), 1);
    }

    #[test]
    fn static_frames_are_repeatable() {
        let mut scene = GlobeScene::new(3);
        let mut a = DrawList::default();
        let mut b = DrawList::default();
        let mut e = env(GlobePhase::Ready, 1.0);
        e.static_frame = true;
        scene.frame(&e, &mut a);
        scene.frame(&e, &mut b);
        assert_eq!(a.dots, b.dots);
    }
}
