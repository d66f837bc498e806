//! Per-frame 3D → 2D projection of the point sets.
//!
//! No 3D library and no depth buffer: points are deformed on the unit
//! sphere, rotated Y-then-X, projected orthographically, and shaded by depth
//! so the far side reads as faint.

use crate::audio::FrequencyBands;
use crate::constants::*;
use crate::geometry::PointSet;
use crate::waves::BeatWaves;
use glam::{Mat3, Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Ink,
    Accent,
}

/// A filled square to paint, in device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dot {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub alpha: f32,
    pub tone: Tone,
}

/// How a point set is shaded and whether it deforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SetStyle {
    pub base_opacity: f32,
    /// Size in CSS pixels; scaled by the device pixel ratio.
    pub size: f32,
    pub tone: Tone,
    /// Wobble, spikes, bass swell, beat waves, treble size.
    pub deforms: bool,
    /// Multiply opacity by morph progress (wireframes fade in with the morph).
    pub reveal_with_progress: bool,
}

impl SetStyle {
    pub const SPHERE: SetStyle = SetStyle {
        base_opacity: 0.3,
        size: 2.5,
        tone: Tone::Ink,
        deforms: true,
        reveal_with_progress: false,
    };
    pub const WIREFRAME: SetStyle = SetStyle {
        base_opacity: 0.14,
        size: 2.0,
        tone: Tone::Ink,
        deforms: false,
        reveal_with_progress: true,
    };
    pub const PLANET: SetStyle = SetStyle {
        base_opacity: 0.5,
        size: 2.2,
        tone: Tone::Accent,
        deforms: false,
        reveal_with_progress: false,
    };
}

/// Everything the projection needs for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameInputs<'a> {
    /// Frame clock in seconds.
    pub time: f32,
    /// Primary Y rotation.
    pub spin: f32,
    /// Secondary X tilt.
    pub tilt: f32,
    /// Eased morph progress in `[0, 1]`.
    pub progress: f32,
    pub center: Vec2,
    pub radius: f32,
    pub dpr: f32,
    pub bands: FrequencyBands,
    pub waves: Option<&'a BeatWaves>,
    /// Extra opacity multiplier for the whole set (marker fade, depth cue).
    pub opacity_scale: f32,
}

/// Rotation about Y by `spin`, then about X by `tilt`.
#[inline]
pub fn rotation(spin: f32, tilt: f32) -> Mat3 {
    Mat3::from_rotation_x(tilt) * Mat3::from_rotation_y(spin)
}

#[inline]
pub fn rotate(p: Vec3, spin: f32, tilt: f32) -> Vec3 {
    rotation(spin, tilt) * p
}

/// Secondary tilt as a slow sine of time.
#[inline]
pub fn tilt_at(time: f32) -> f32 {
    (time * TILT_FREQUENCY).sin() * TILT_AMPLITUDE
}

/// Continuous wobble: two phase-shifted sinusoids keyed by point index.
#[inline]
pub fn wobble(index: usize, time: f32, progress: f32) -> f32 {
    let i = index as f32;
    WOBBLE_AMPLITUDE
        * progress
        * (time * WOBBLE_FREQ_A + i * WOBBLE_INDEX_PHASE_A).sin()
        * (time * WOBBLE_FREQ_B + i * WOBBLE_INDEX_PHASE_B).cos()
}

/// Discrete extension for every `SPIKE_INTERVAL`th point.
#[inline]
pub fn spike(index: usize, time: f32, progress: f32, bass: f32) -> f32 {
    if index % SPIKE_INTERVAL != 0 {
        return 0.0;
    }
    let pulse = 0.5 + 0.5 * (time * 1.7 + index as f32 * 0.21).sin();
    SPIKE_AMPLITUDE * progress * pulse + SPIKE_BASS_GAIN * bass
}

/// Map rotated z from `[-extent, extent]` to `[0, 1]`.
#[inline]
pub fn depth_factor(z: f32, extent: f32) -> f32 {
    let extent = extent.max(1e-6);
    ((z / extent + 1.0) * 0.5).clamp(0.0, 1.0)
}

/// Blend between the floor opacity (back) and full intensity (front).
#[inline]
pub fn depth_blend(depth: f32) -> f32 {
    DEPTH_FLOOR + (1.0 - DEPTH_FLOOR) * depth.clamp(0.0, 1.0)
}

/// Final opacity, clamped to the ceiling so stacked boosts cannot blow out.
#[inline]
pub fn shade_opacity(base: f32, boost: f32, depth: f32, scalar: f32) -> f32 {
    ((base + boost) * depth_blend(depth) * scalar).clamp(0.0, OPACITY_CEILING)
}

/// Project every point of `set` and append a dot per point to `out`.
pub fn project_set(
    set: &PointSet,
    style: &SetStyle,
    frame: &FrameInputs<'_>,
    out: &mut Vec<Dot>,
) {
    let rot = rotation(frame.spin, frame.tilt);
    let dpr = frame.dpr.max(0.1);
    let base_size = (style.size * dpr).round().max(1.0);
    let extent = if style.deforms {
        1.0 + MAX_DISPLACEMENT
    } else {
        1.0
    };
    let scalar = frame.opacity_scale
        * if style.reveal_with_progress {
            frame.progress
        } else {
            1.0
        };
    if scalar <= 0.0 {
        return;
    }
    let bands = frame.bands;
    out.reserve(set.len());

    for (i, &p) in set.points.iter().enumerate() {
        let (displacement, wave) = if style.deforms {
            let wave = frame
                .waves
                .map(|w| w.displacement(p, frame.time))
                .unwrap_or(0.0);
            let d = wobble(i, frame.time, frame.progress)
                + spike(i, frame.time, frame.progress, bands.bass)
                + BASS_RADIUS_GAIN * bands.bass
                + wave;
            (d, wave)
        } else {
            (0.0, 0.0)
        };

        let r = rot * (p * (1.0 + displacement));
        let depth = depth_factor(r.z, extent);

        let (boost, size) = if style.deforms {
            (
                bands.mid * MID_OPACITY_BOOST + wave * WAVE_GLOW_GAIN,
                base_size + (bands.treble * TREBLE_SIZE_BOOST + wave * WAVE_SIZE_GAIN) * dpr,
            )
        } else {
            (0.0, base_size)
        };
        let alpha = shade_opacity(style.base_opacity, boost, depth, scalar);

        out.push(Dot {
            x: frame.center.x + r.x * frame.radius,
            y: frame.center.y - r.y * frame.radius,
            size,
            alpha,
            tone: style.tone,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rotation_is_identity() {
        for p in [Vec3::X, Vec3::new(0.3, -0.4, 0.866), Vec3::new(-1.0, 2.0, 3.0)] {
            let r = rotate(p, 0.0, 0.0);
            assert!((r - p).length() < 1e-6);
        }
    }

    #[test]
    fn rotation_order_is_y_then_x() {
        let p = Vec3::X;
        let spin = std::f32::consts::FRAC_PI_2;
        let tilt = std::f32::consts::FRAC_PI_2;
        // Y by 90°: X -> -Z ; then X by 90°: -Z -> +Y
        let r = rotate(p, spin, tilt);
        assert!((r - Vec3::Y).length() < 1e-5, "{r:?}");
        // the other order would leave X on the X axis
        let other = Mat3::from_rotation_y(spin) * Mat3::from_rotation_x(tilt) * p;
        assert!((other - r).length() > 0.5);
    }

    #[test]
    fn depth_shading_is_monotonic() {
        let mut prev = -1.0;
        for i in 0..=50 {
            let d = i as f32 / 50.0;
            let o = shade_opacity(0.3, 0.1, d, 1.0);
            assert!(o >= prev);
            prev = o;
        }
        assert!((depth_blend(0.0) - DEPTH_FLOOR).abs() < 1e-6);
        assert!((depth_blend(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn opacity_is_capped() {
        assert_eq!(shade_opacity(5.0, 5.0, 1.0, 1.0), OPACITY_CEILING);
    }

    #[test]
    fn depth_factor_clamps() {
        assert_eq!(depth_factor(-5.0, 1.0), 0.0);
        assert_eq!(depth_factor(5.0, 1.0), 1.0);
        assert!((depth_factor(0.0, 1.3) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn deformation_vanishes_at_zero_progress() {
        for i in 0..50 {
            assert_eq!(wobble(i, 3.0, 0.0), 0.0);
            assert_eq!(spike(i, 3.0, 0.0, 0.0), 0.0);
        }
        assert!(spike(0, 0.0, 1.0, 0.0) > 0.0);
        assert_eq!(spike(1, 0.0, 1.0, 1.0), 0.0);
    }

    #[test]
    fn wireframe_invisible_at_zero_progress() {
        let set = PointSet::new("lat", crate::geometry::latitude_rings(4, 8));
        let frame = FrameInputs {
            time: 0.0,
            spin: 0.0,
            tilt: 0.0,
            progress: 0.0,
            center: Vec2::ZERO,
            radius: 100.0,
            dpr: 1.0,
            bands: FrequencyBands::default(),
            waves: None,
            opacity_scale: 1.0,
        };
        let mut out = Vec::new();
        project_set(&set, &SetStyle::WIREFRAME, &frame, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn canvas_y_is_inverted() {
        let set = PointSet::new("pole", vec![Vec3::Y]);
        let frame = FrameInputs {
            time: 0.0,
            spin: 0.0,
            tilt: 0.0,
            progress: 1.0,
            center: Vec2::new(50.0, 50.0),
            radius: 10.0,
            dpr: 1.0,
            bands: FrequencyBands::default(),
            waves: None,
            opacity_scale: 1.0,
        };
        let mut out = Vec::new();
        project_set(&set, &SetStyle::WIREFRAME, &frame, &mut out);
        assert_eq!(out[0].y, 40.0);
    }
}
