//! Shared drawing types for the simulation overlay.
//!
//! This crate contains value types and leaf algorithms with no scheduling
//! logic: colors and the generated palette, shape descriptors, the
//! state-to-color registry, the [`Drawable`] capability and the [`Surface`]
//! it draws on. It is a dependency for all other crates in the workspace.
//!
//! # Example
//!
//! ```
//! use sim_draw::{StateColorMap, StateValue, Color};
//!
//! let states = StateColorMap::define([
//!     ("online", StateValue::hex("#fff")),
//!     ("offline", StateValue::Index(1)),
//! ])
//! .unwrap();
//!
//! assert_eq!(states.color("online"), Some(Color::WHITE));
//! assert_eq!(states.names().collect::<Vec<_>>(), vec!["online", "offline"]);
//! ```

pub mod color;
pub mod drawable;
pub mod error;
pub mod geometry;
pub mod recording;
pub mod shape;
pub mod states;
pub mod surface;
pub mod text;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

// Re-export color types
pub use color::{generate_palette, hex_to_rgb, is_valid_hex, Color};

// Re-export drawable types
pub use drawable::{share, Drawable, DrawableId, SharedDrawable};

// Re-export error types
pub use error::{ConflictError, Error, MembershipError, Result, ValidationError};

// Re-export geometry types
pub use geometry::{Point, Rect, Size};

// Re-export recording surface
pub use recording::{DrawCommand, RecordingSurface};

// Re-export shape types
pub use shape::{Shape, ShapeKind};

// Re-export state registry types
pub use states::{StateColorMap, StateEntry, StateSelection, StateValue};

// Re-export surface types
pub use surface::{draw_shape, Stroke, Surface};

pub use text::Text;
