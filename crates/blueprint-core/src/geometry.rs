//! Static point sets on the unit sphere.
//!
//! Everything here is a pure function of its integer arguments and is built
//! once at startup; the renderer only ever reads these sets.

use crate::constants::*;
use crate::orbit::OrbitConfig;
use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// A named, ordered collection of points. Index order is render order and
/// also seeds per-point phase offsets, so it must stay stable.
#[derive(Clone, Debug)]
pub struct PointSet {
    pub name: &'static str,
    pub points: Vec<Vec3>,
}

impl PointSet {
    pub fn new(name: &'static str, points: Vec<Vec3>) -> Self {
        Self { name, points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the point at `index` carries a spike.
    #[inline]
    pub fn is_spike(&self, index: usize) -> bool {
        index < self.points.len() && index % SPIKE_INTERVAL == 0
    }
}

/// Golden angle `π(3 − √5)` used as the azimuth increment.
#[inline]
pub fn golden_angle() -> f32 {
    PI * (3.0 - 5.0_f32.sqrt())
}

/// Near-uniform Fibonacci distribution of `count` points, running from the
/// north pole (`y = 1`) to the south pole (`y = -1`).
pub fn sphere_points(count: usize) -> Vec<Vec3> {
    match count {
        0 => Vec::new(),
        1 => vec![Vec3::Y],
        _ => {
            let ga = golden_angle();
            let last = (count - 1) as f32;
            (0..count)
                .map(|i| {
                    let y = 1.0 - (i as f32 / last) * 2.0;
                    let r = (1.0 - y * y).max(0.0).sqrt();
                    let theta = ga * i as f32;
                    Vec3::new(theta.cos() * r, y, theta.sin() * r)
                })
                .collect()
        }
    }
}

/// Latitude rings between the poles; the poles themselves are skipped, so
/// `rings` yields `rings - 1` circles.
pub fn latitude_rings(rings: usize, per_ring: usize) -> Vec<Vec3> {
    if rings < 2 || per_ring == 0 {
        return Vec::new();
    }
    let mut pts = Vec::with_capacity((rings - 1) * per_ring);
    for lat in 1..rings {
        let phi = PI * lat as f32 / rings as f32;
        let y = phi.cos();
        let ring_r = phi.sin();
        for i in 0..per_ring {
            let theta = TAU * i as f32 / per_ring as f32;
            pts.push(Vec3::new(theta.cos() * ring_r, y, theta.sin() * ring_r));
        }
    }
    pts
}

/// Meridians from pole to pole, both poles included on every meridian.
pub fn longitude_meridians(meridians: usize, per_meridian: usize) -> Vec<Vec3> {
    if meridians == 0 || per_meridian == 0 {
        return Vec::new();
    }
    let mut pts = Vec::with_capacity(meridians * (per_meridian + 1));
    for mer in 0..meridians {
        let theta = TAU * mer as f32 / meridians as f32;
        for i in 0..=per_meridian {
            let phi = PI * i as f32 / per_meridian as f32;
            let y = phi.cos();
            let ring_r = phi.sin();
            pts.push(Vec3::new(theta.cos() * ring_r, y, theta.sin() * ring_r));
        }
    }
    pts
}

/// All static sets the globe draws.
#[derive(Clone, Debug)]
pub struct GlobeGeometry {
    pub sphere: PointSet,
    pub latitudes: PointSet,
    pub longitudes: PointSet,
    pub planets: Vec<PointSet>,
}

impl GlobeGeometry {
    pub fn new(orbits: &[OrbitConfig]) -> Self {
        Self::with_sphere_count(SPHERE_POINT_COUNT, orbits)
    }

    pub fn with_sphere_count(sphere_count: usize, orbits: &[OrbitConfig]) -> Self {
        Self {
            sphere: PointSet::new("sphere", sphere_points(sphere_count)),
            latitudes: PointSet::new(
                "latitudes",
                latitude_rings(LATITUDE_RING_COUNT, POINTS_PER_RING),
            ),
            longitudes: PointSet::new(
                "longitudes",
                longitude_meridians(MERIDIAN_COUNT, POINTS_PER_MERIDIAN),
            ),
            planets: orbits
                .iter()
                .map(|o| PointSet::new("planet", sphere_points(o.point_count)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_points_are_unit_and_descend() {
        for n in [2usize, 3, 10, 137, 900] {
            let pts = sphere_points(n);
            assert_eq!(pts.len(), n);
            for p in &pts {
                assert!((p.length() - 1.0).abs() < 1e-5, "norm {} for n={n}", p.length());
            }
            for w in pts.windows(2) {
                assert!(w[1].y <= w[0].y, "y increased for n={n}");
            }
            assert!((pts[0].y - 1.0).abs() < 1e-6);
            assert!((pts[n - 1].y + 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn sphere_points_degenerate_counts() {
        assert!(sphere_points(0).is_empty());
        assert_eq!(sphere_points(1), vec![Vec3::Y]);
    }

    #[test]
    fn sphere_points_are_deterministic() {
        assert_eq!(sphere_points(321), sphere_points(321));
    }

    #[test]
    fn latitude_rings_skip_poles() {
        let pts = latitude_rings(8, 40);
        assert_eq!(pts.len(), 7 * 40);
        for p in &pts {
            assert!(p.y.abs() < 1.0 - 1e-3);
            assert!((p.length() - 1.0).abs() < 1e-5);
        }
        // first ring sits at a single polar angle
        let y0 = pts[0].y;
        assert!(pts[..40].iter().all(|p| (p.y - y0).abs() < 1e-6));
    }

    #[test]
    fn longitude_meridians_include_poles() {
        let pts = longitude_meridians(12, 30);
        assert_eq!(pts.len(), 12 * 31);
        assert!((pts[0].y - 1.0).abs() < 1e-6);
        assert!((pts[30].y + 1.0).abs() < 1e-6);
        for p in &pts {
            assert!((p.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn spike_membership_follows_interval() {
        let set = PointSet::new("s", sphere_points(40));
        assert!(set.is_spike(0));
        assert!(set.is_spike(SPIKE_INTERVAL));
        assert!(!set.is_spike(1));
        assert!(!set.is_spike(400));
    }
}
