//! Visualization layer: Bevy-based renderer for simulation environments.

pub mod demo;
pub mod plugin;
pub mod surface;

pub use demo::{build_post_office, DemoError, PostOfficeSettings, PostOfficeStats};
pub use plugin::{SimGraphPlugin, SimRuntime};
pub use surface::SpriteSurface;
