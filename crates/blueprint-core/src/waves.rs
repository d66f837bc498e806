//! Beat waves: expanding angular ripples spawned by bass onsets.

use crate::constants::*;
use glam::Vec3;
use rand::Rng;
use smallvec::SmallVec;
use std::f32::consts::TAU;

/// Edge-triggered bass onset detector with a cooldown.
#[derive(Clone, Debug)]
pub struct OnsetDetector {
    pub threshold: f32,
    pub cooldown: f32,
    prev: f32,
    last_fire: Option<f32>,
}

impl Default for OnsetDetector {
    fn default() -> Self {
        Self::new(ONSET_THRESHOLD, ONSET_COOLDOWN_SEC)
    }
}

impl OnsetDetector {
    pub fn new(threshold: f32, cooldown: f32) -> Self {
        Self {
            threshold,
            cooldown,
            prev: 0.0,
            last_fire: None,
        }
    }

    /// Feed one frame of bass energy; true on the frame a wave should spawn.
    pub fn observe(&mut self, bass: f32, now: f32) -> bool {
        let rising = self.prev < self.threshold && bass >= self.threshold;
        self.prev = bass;
        if !rising {
            return false;
        }
        if let Some(last) = self.last_fire {
            if now - last < self.cooldown {
                return false;
            }
        }
        self.last_fire = Some(now);
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeatWave {
    pub origin: Vec3,
    pub born_at: f32,
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct WaveParams {
    pub speed: f32,
    pub width: f32,
    pub lifetime: f32,
    pub amplitude: f32,
    pub max_waves: usize,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            speed: WAVE_SPEED,
            width: WAVE_WIDTH,
            lifetime: WAVE_LIFETIME_SEC,
            amplitude: WAVE_AMPLITUDE,
            max_waves: MAX_WAVES,
        }
    }
}

impl BeatWave {
    /// Radial displacement this wave adds to unit-sphere point `p` at `now`.
    pub fn contribution(&self, p: Vec3, now: f32, params: &WaveParams) -> f32 {
        let age = now - self.born_at;
        if age < 0.0 || age > params.lifetime {
            return 0.0;
        }
        let dist = p.dot(self.origin).clamp(-1.0, 1.0).acos();
        let front = age * params.speed;
        let off = dist - front;
        if off.abs() >= params.width {
            return 0.0;
        }
        let falloff = (-(off / (params.width * 0.5)).powi(2)).exp();
        let fade = 1.0 - age / params.lifetime;
        falloff * fade * self.intensity * params.amplitude
    }
}

/// Uniform point on the unit sphere by inverse sampling.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let theta: f32 = rng.gen_range(0.0..TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * theta.cos(), r * theta.sin(), z)
}

#[inline]
pub fn intensity_for(bass: f32) -> f32 {
    (bass * WAVE_INTENSITY_GAIN).clamp(WAVE_MIN_INTENSITY, 1.0)
}

/// Bounded set of live waves, oldest first.
#[derive(Clone, Debug, Default)]
pub struct BeatWaves {
    pub params: WaveParams,
    waves: SmallVec<[BeatWave; MAX_WAVES]>,
}

impl BeatWaves {
    pub fn new(params: WaveParams) -> Self {
        Self {
            params,
            waves: SmallVec::new(),
        }
    }

    pub fn spawn(&mut self, wave: BeatWave) {
        self.waves.push(wave);
        while self.waves.len() > self.params.max_waves.max(1) {
            self.waves.remove(0);
        }
    }

    /// Drop waves whose age exceeds their lifetime. Scans back to front so
    /// removals never shift an index still to be visited.
    pub fn prune(&mut self, now: f32) -> usize {
        let mut removed = 0;
        for i in (0..self.waves.len()).rev() {
            if now - self.waves[i].born_at > self.params.lifetime {
                self.waves.remove(i);
                removed += 1;
            }
        }
        removed
    }

    /// Summed displacement of all live waves at `p`.
    pub fn displacement(&self, p: Vec3, now: f32) -> f32 {
        self.waves
            .iter()
            .map(|w| w.contribution(p, now, &self.params))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BeatWave> {
        self.waves.iter()
    }
}
