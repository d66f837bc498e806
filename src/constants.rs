// DOM hooks, colors and browser-side timing for the web front-end.
//
// Kept free of `web_sys` so host tests can `include!` it.

// Element ids the page is expected to provide
pub const CANVAS_ID: &str = "globe-canvas";
pub const MARKER_LAYER_ID: &str = "globe-markers";
pub const LOADER_ID: &str = "page-loader";
pub const CONTENT_ID: &str = "page-content";
pub const SLIDES_ID: &str = "slides";
pub const AUDIO_ID: &str = "ambient-audio";
pub const AUDIO_TOGGLE_ID: &str = "audio-toggle";
pub const AUDIO_MUTE_ID: &str = "audio-mute";
pub const AUDIO_VOLUME_ID: &str = "audio-volume";
pub const MARKERS_TOGGLE_ID: &str = "markers-toggle";

// Classes and attributes toggled on those elements
pub const HIDDEN_CLASS: &str = "hidden";
pub const REVEALED_CLASS: &str = "revealed";
pub const ACTIVE_SLIDE_CLASS: &str = "active";
pub const FOCUSED_CARD_CLASS: &str = "focused";
pub const PROJECT_CARD_SELECTOR: &str = "#projects .project-card";
pub const TRANSITION_ATTR: &str = "data-transition";
pub const DIRECTION_ATTR: &str = "data-direction";
pub const ROUTE_TEMPLATE_ATTR: &str = "data-route";
pub const OFFLINE_ATTR: &str = "data-offline";

pub const HOME_PATH: &str = "/";
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

// How often a reduced-motion page checks for a pending phase change (ms)
pub const REDUCED_MOTION_POLL_MS: u32 = 250;

// 256-point FFT gives 128 byte bins
pub const ANALYSER_FFT_SIZE: u32 = 256;
pub const ANALYSER_SMOOTHING: f64 = 0.8;

// Palette: blueprint ink on paper, warm accent for the orbit markers
pub const INK_RGB: (u8, u8, u8) = (28, 58, 112);
pub const ACCENT_RGB: (u8, u8, u8) = (214, 92, 58);
pub const TRACK_LINE_WIDTH_CSS: f64 = 1.0;
pub const TRACK_DASH_CSS: [f64; 2] = [4.0, 7.0];

/// `rgb(r, g, b)` string for a Canvas2D fill or stroke style.
pub fn css_rgb(rgb: (u8, u8, u8)) -> String {
    format!("rgb({}, {}, {})", rgb.0, rgb.1, rgb.2)
}
