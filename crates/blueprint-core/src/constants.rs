// Shared tuning constants for the globe and page choreography.
//
// Times are in seconds for anything sampled per frame and in milliseconds for
// anything driven by timers, matching the clocks that feed them.

use std::f32::consts::PI;

// Static point sets
pub const SPHERE_POINT_COUNT: usize = 650;
pub const LATITUDE_RING_COUNT: usize = 10;
pub const POINTS_PER_RING: usize = 56;
pub const MERIDIAN_COUNT: usize = 16;
pub const POINTS_PER_MERIDIAN: usize = 38;

// Frame clock (per second of wall time)
pub const SPIN_SPEED: f32 = 0.22; // rad/s around Y
pub const TILT_FREQUENCY: f32 = 0.055; // rad/s fed into sin() for the X tilt
pub const TILT_AMPLITUDE: f32 = 0.14; // max X tilt in radians
pub const STATIC_TIME: f32 = 0.0; // pinned time for reduced-motion frames
pub const STATIC_SPIN: f32 = 0.6; // pinned Y angle for reduced-motion frames
pub const MAX_FRAME_DT: f32 = 0.1; // clamp after a backgrounded tab resumes

// Per-point deformation
pub const WOBBLE_AMPLITUDE: f32 = 0.025;
pub const WOBBLE_FREQ_A: f32 = 1.2;
pub const WOBBLE_FREQ_B: f32 = 0.7;
pub const WOBBLE_INDEX_PHASE_A: f32 = 0.47;
pub const WOBBLE_INDEX_PHASE_B: f32 = 0.13;
pub const SPIKE_INTERVAL: usize = 9;
pub const SPIKE_AMPLITUDE: f32 = 0.06;
pub const SPIKE_BASS_GAIN: f32 = 0.18;
pub const BASS_RADIUS_GAIN: f32 = 0.08;

// Shading
pub const DEPTH_FLOOR: f32 = 0.15;
pub const OPACITY_CEILING: f32 = 0.6;
pub const MID_OPACITY_BOOST: f32 = 0.25;
pub const TREBLE_SIZE_BOOST: f32 = 2.0; // css px at full treble
pub const WAVE_GLOW_GAIN: f32 = 2.5;
pub const WAVE_SIZE_GAIN: f32 = 12.0; // css px per unit of wave displacement

// Largest radial displacement any deformation can add; sizes the depth range.
pub const MAX_DISPLACEMENT: f32 =
    WOBBLE_AMPLITUDE + SPIKE_AMPLITUDE + SPIKE_BASS_GAIN + BASS_RADIUS_GAIN + WAVE_AMPLITUDE;

// Beat waves
pub const ONSET_THRESHOLD: f32 = 0.35;
pub const ONSET_COOLDOWN_SEC: f32 = 0.25;
pub const WAVE_SPEED: f32 = 1.6; // rad/s of great-circle distance
pub const WAVE_WIDTH: f32 = 0.35; // rad either side of the front
pub const WAVE_LIFETIME_SEC: f32 = 1.8;
pub const WAVE_AMPLITUDE: f32 = 0.12;
pub const WAVE_INTENSITY_GAIN: f32 = 1.5;
pub const WAVE_MIN_INTENSITY: f32 = 0.3;
pub const MAX_WAVES: usize = 6;

// Interpolation
pub const MOTION_SMOOTHING: f32 = 0.06; // fraction of the remaining gap per frame
pub const NARROW_VIEWPORT_CSS_PX: f32 = 768.0;

// Orbits
pub const SYSTEM_TILT: f32 = 0.38 * PI;
pub const MARKER_FADE: f32 = 0.08;
pub const MARKER_POINTER_THRESHOLD: f32 = 0.5;
pub const MARKER_HIT_SCALE: f32 = 1.4;
pub const MIN_HIT_RADIUS_PX: f32 = 18.0;
pub const MARKER_SPIN_BASE: f32 = 0.9;
pub const MARKER_SPIN_STEP: f32 = 0.35;

// Ambient player
pub const DEFAULT_VOLUME: f32 = 0.5;

// Choreography timers (ms)
pub const LOADER_INITIAL_DELAY_MS: u32 = 1800;
pub const MORPH_DURATION_MS: u32 = 1200;
pub const EXIT_DURATION_MS: u32 = 600;
pub const REVEAL_DELAY_MS: u32 = 150;
pub const SLIDE_ANIMATION_MS: u32 = 900;
pub const WHEEL_DEBOUNCE_MS: f64 = 800.0;

// Swipe classification
pub const SWIPE_MIN_DX_PX: f32 = 50.0;
pub const SWIPE_MAX_MS: f64 = 300.0;
pub const SWIPE_AXIS_RATIO: f32 = 2.0;
