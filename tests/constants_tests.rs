// Host-side tests for web constants and their relationships.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
fn element_ids_are_distinct_and_non_empty() {
    let ids = [
        CANVAS_ID,
        MARKER_LAYER_ID,
        LOADER_ID,
        CONTENT_ID,
        SLIDES_ID,
        AUDIO_ID,
        AUDIO_TOGGLE_ID,
        AUDIO_MUTE_ID,
        AUDIO_VOLUME_ID,
        MARKERS_TOGGLE_ID,
    ];
    for (i, a) in ids.iter().enumerate() {
        assert!(!a.is_empty());
        assert!(!a.starts_with('#'), "{a} should be a bare id");
        for b in &ids[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn analyser_settings_are_valid() {
    // AnalyserNode requires a power of two in [32, 32768]
    assert!(ANALYSER_FFT_SIZE.is_power_of_two());
    assert!((32..=32768).contains(&ANALYSER_FFT_SIZE));
    assert!((0.0..1.0).contains(&ANALYSER_SMOOTHING));
    assert!(REDUCED_MOTION_POLL_MS > 0);
}

#[test]
fn css_rgb_formats_channels() {
    assert_eq!(css_rgb((0, 128, 255)), "rgb(0, 128, 255)");
    assert_ne!(css_rgb(INK_RGB), css_rgb(ACCENT_RGB));
}

#[test]
fn track_dash_is_visible() {
    assert!(TRACK_DASH_CSS.iter().all(|d| *d > 0.0));
    assert!(TRACK_LINE_WIDTH_CSS > 0.0);
    assert!(REDUCED_MOTION_QUERY.contains("reduce"));
    assert_eq!(HOME_PATH, "/");
}
