//! Frequency-band reduction for the audio-reactive globe.
//!
//! The browser analyser hands us byte magnitudes per FFT bin. The globe only
//! cares about three coarse energies, each normalised to `[0, 1]`.

use crate::constants::DEFAULT_VOLUME;

/// Normalised band energies. All zeros when nothing is playing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrequencyBands {
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
}

impl FrequencyBands {
    pub const SILENT: Self = Self {
        bass: 0.0,
        mid: 0.0,
        treble: 0.0,
    };
}

// Fractions of the bin range where the bass and mid bands end.
pub const BASS_END_FRACTION: f32 = 0.3;
pub const MID_END_FRACTION: f32 = 0.6;

/// Split byte magnitudes into bass / mid / treble averages.
pub fn reduce_bands(bins: &[u8]) -> FrequencyBands {
    let len = bins.len();
    let bass_end = (len as f32 * BASS_END_FRACTION).floor() as usize;
    let mid_end = (len as f32 * MID_END_FRACTION).floor() as usize;

    let band = |range: &[u8]| -> f32 {
        if range.is_empty() {
            return 0.0;
        }
        let sum: u32 = range.iter().map(|&b| b as u32).sum();
        sum as f32 / (range.len() as f32 * 255.0)
    };

    FrequencyBands {
        bass: band(&bins[..bass_end]),
        mid: band(&bins[bass_end..mid_end]),
        treble: band(&bins[mid_end..]),
    }
}

/// Anything that can report band energies once per frame.
pub trait BandSource {
    fn bands(&mut self) -> FrequencyBands;
}

/// Band source used when no audio graph exists.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silence;

impl BandSource for Silence {
    fn bands(&mut self) -> FrequencyBands {
        FrequencyBands::SILENT
    }
}

/// Volume, mute and stream-health state of the ambient player. The web layer
/// applies [`PlayerControls::output_volume`] to the media element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerControls {
    volume: f32,
    muted: bool,
    offline: bool,
}

impl Default for PlayerControls {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            muted: false,
            offline: false,
        }
    }
}

impl PlayerControls {
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Level the element should play at right now.
    pub fn output_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    /// Slider input. Dragging to zero mutes; any other level unmutes.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        let v = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            self.volume
        };
        self.volume = v;
        self.muted = v == 0.0;
        self.output_volume()
    }

    /// Unmuting from a zero slider restores the default level.
    pub fn toggle_mute(&mut self) -> f32 {
        if self.muted {
            self.muted = false;
            if self.volume == 0.0 {
                self.volume = DEFAULT_VOLUME;
            }
        } else {
            self.muted = true;
        }
        self.output_volume()
    }

    /// The stream failed to load or play.
    pub fn mark_offline(&mut self) {
        self.offline = true;
    }

    /// Start a play attempt. Returns true when the source must be reloaded
    /// because the previous attempt went offline.
    pub fn begin_play(&mut self) -> bool {
        std::mem::replace(&mut self.offline, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_start_at_half_volume() {
        let c = PlayerControls::default();
        assert_eq!(c.output_volume(), 0.5);
        assert!(!c.is_muted());
        assert!(!c.is_offline());
    }

    #[test]
    fn zero_volume_mutes_and_raising_unmutes() {
        let mut c = PlayerControls::default();
        assert_eq!(c.set_volume(0.0), 0.0);
        assert!(c.is_muted());
        assert_eq!(c.set_volume(0.3), 0.3);
        assert!(!c.is_muted());
        assert_eq!(c.set_volume(4.0), 1.0);
        assert_eq!(c.set_volume(f32::NAN), 1.0);
    }

    #[test]
    fn mute_toggle_keeps_the_slider_level() {
        let mut c = PlayerControls::default();
        c.set_volume(0.8);
        assert_eq!(c.toggle_mute(), 0.0);
        assert_eq!(c.volume(), 0.8);
        assert_eq!(c.toggle_mute(), 0.8);

        c.set_volume(0.0);
        assert_eq!(c.toggle_mute(), DEFAULT_VOLUME);
    }

    #[test]
    fn offline_forces_a_reload_on_next_play() {
        let mut c = PlayerControls::default();
        assert!(!c.begin_play());
        c.mark_offline();
        assert!(c.is_offline());
        assert!(c.begin_play());
        assert!(!c.is_offline());
        assert!(!c.begin_play());
    }

    #[test]
    fn empty_input_is_silent() {
        assert_eq!(reduce_bands(&[]), FrequencyBands::SILENT);
    }

    #[test]
    fn bands_split_at_thirty_and_sixty_percent() {
        // 10 bins: bass 0..3, mid 3..6, treble 6..10
        let mut bins = [0u8; 10];
        bins[..3].fill(255);
        bins[6..].fill(51);
        let b = reduce_bands(&bins);
        assert!((b.bass - 1.0).abs() < 1e-6);
        assert_eq!(b.mid, 0.0);
        assert!((b.treble - 0.2).abs() < 1e-6);
    }

    #[test]
    fn full_scale_is_one() {
        let b = reduce_bands(&[255u8; 128]);
        assert!((b.bass - 1.0).abs() < 1e-6);
        assert!((b.mid - 1.0).abs() < 1e-6);
        assert!((b.treble - 1.0).abs() < 1e-6);
    }

    #[test]
    fn tiny_input_leaves_empty_bands_at_zero() {
        // one bin: bass and mid ranges are empty
        let b = reduce_bands(&[200]);
        assert_eq!(b.bass, 0.0);
        assert_eq!(b.mid, 0.0);
        assert!(b.treble > 0.7);
    }

    #[test]
    fn silence_source_reports_zero() {
        assert_eq!(Silence.bands(), FrequencyBands::SILENT);
    }
}
