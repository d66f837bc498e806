pub mod gestures;
pub mod keyboard;
pub mod navigation;
pub mod pointer;
