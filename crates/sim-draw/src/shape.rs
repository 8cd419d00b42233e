//! Shape descriptors: geometry kind, size, border and fill color.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::color::Color;
use crate::error::ValidationError;
use crate::surface::Stroke;

/// Border value meaning "filled, no border".
pub const FILLED: i32 = -1;

/// Geometry used to render a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Square,
    Circle,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Square => write!(f, "square"),
            ShapeKind::Circle => write!(f, "circle"),
        }
    }
}

impl FromStr for ShapeKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "square" => Ok(ShapeKind::Square),
            "circle" => Ok(ShapeKind::Circle),
            _ => Err(ValidationError::UnknownVariant {
                kind: "shape kind",
                value: s.to_string(),
            }),
        }
    }
}

/// Immutable description of how a drawable looks.
///
/// `size` is the edge length of a square or the diameter of a circle.
/// `border_size` of `-1` fills the shape; positive values draw an outline of
/// that width. Consumers replace a shape wholesale rather than editing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    pub size: i32,
    #[serde(default = "default_border")]
    pub border_size: i32,
    #[serde(default)]
    pub color: Color,
}

fn default_border() -> i32 {
    FILLED
}

impl Shape {
    /// Creates a validated shape.
    pub fn new(
        kind: ShapeKind,
        size: i32,
        border_size: i32,
        color: Color,
    ) -> Result<Self, ValidationError> {
        let shape = Self {
            kind,
            size,
            border_size,
            color,
        };
        shape.validate()?;
        Ok(shape)
    }

    /// Creates a filled shape of the given kind and size.
    pub fn filled(kind: ShapeKind, size: i32, color: Color) -> Result<Self, ValidationError> {
        Self::new(kind, size, FILLED, color)
    }

    /// Default look of a simulated entity: a filled white circle of 10 pixels.
    pub fn entity_default() -> Self {
        Self {
            kind: ShapeKind::Circle,
            size: 10,
            border_size: FILLED,
            color: Color::WHITE,
        }
    }

    /// Default container panel: a white square outline two pixels wide.
    pub fn panel_default() -> Self {
        Self {
            kind: ShapeKind::Square,
            size: 10,
            border_size: 2,
            color: Color::WHITE,
        }
    }

    /// Re-checks a shape that was built by struct literal or deserialized.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.size <= 0 {
            return Err(ValidationError::InvalidShapeSize(self.size));
        }
        Ok(())
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_border(mut self, border_size: i32) -> Self {
        self.border_size = border_size;
        self
    }

    /// Copy with any border below `-1` raised to `-1`.
    pub fn clamped_border(mut self) -> Self {
        self.border_size = self.border_size.max(FILLED);
        self
    }

    /// Surface stroke for this shape's border.
    pub fn stroke(&self) -> Stroke {
        if self.border_size >= 1 {
            Stroke::Border(self.border_size as u32)
        } else {
            Stroke::Fill
        }
    }
}
