//! Container layout engine.
//!
//! A [`Container`] owns an insertion-ordered set of drawables and, every
//! time it is drawn, recomputes where each member goes. Rows and columns
//! place members along one axis, grids fill rows first and wrap. Members
//! are spaced by the largest member's size plus a fixed spacer but render
//! at their own size.
//!
//! # Modules
//!
//! - [`options`]: align, fill direction, overflow and container kind
//! - [`layout`]: the pure positioning function
//! - [`container`]: the stateful container drawable
//! - [`config`]: TOML container declarations

pub mod config;
pub mod container;
pub mod layout;
pub mod options;

pub use config::{default_container_toml, ConfigError, ContainerConfig};
pub use container::Container;
pub use layout::{compute_layout, LayoutParams, SPACER};
pub use options::{Align, ContainerKind, FillDirection, Overflow};
