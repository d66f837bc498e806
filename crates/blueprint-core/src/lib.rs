pub mod audio;
pub mod constants;
pub mod context;
pub mod easing;
pub mod geometry;
pub mod motion;
pub mod observable;
pub mod orbit;
pub mod phase;
pub mod projection;
pub mod scene;
pub mod scheduler;
pub mod slides;
pub mod transition;
pub mod waves;

pub use audio::*;
pub use context::*;
pub use geometry::*;
pub use motion::*;
pub use observable::*;
pub use orbit::*;
pub use phase::*;
pub use projection::*;
pub use scene::*;
pub use scheduler::*;
pub use slides::*;
pub use transition::*;
pub use waves::*;
