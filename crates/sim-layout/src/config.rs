//! Container declarations loaded from TOML.
//!
//! A scene file lists containers as tables; each one maps onto a
//! [`ContainerConfig`] and is turned into a live container with
//! [`Container::from_config`](crate::Container::from_config).

use serde::{Deserialize, Serialize};
use sim_draw::{Point, Shape, Size, ValidationError};
use thiserror::Error;

use crate::options::{Align, ContainerKind, FillDirection, Overflow};

/// Declarative description of one container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Row, column or grid
    pub kind: ContainerKind,
    /// Container extent in pixels
    pub size: Size,
    /// Top-left corner, or offset from the anchor when aligned
    pub position: Point,
    /// Background shape; the panel default when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
    pub align: Align,
    pub fill_direction: FillDirection,
    pub overflow: Overflow,
    /// Inner margin before the first slot
    pub padding: i32,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            kind: ContainerKind::Row,
            size: Size::new(100, 100),
            position: Point::ORIGIN,
            shape: None,
            align: Align::NoAlign,
            fill_direction: FillDirection::TopLeft,
            overflow: Overflow::Visible,
            padding: 0,
        }
    }
}

impl ContainerConfig {
    /// Parses a single container table.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Errors raised while loading container declarations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A commented sample container table.
pub fn default_container_toml() -> String {
    r##"# Container declaration

# row, column or grid
kind = "row"
size = { width = 300, height = 40 }
position = { x = 10, y = 10 }

# no_align, top, top_left, top_right, center, left, right,
# bottom, bottom_left, bottom_right
align = "no_align"

# grids need a corner; rows and columns reduce corners to left/right
fill_direction = "top_left"

# visible, hidden or clip
overflow = "hidden"
padding = 4

[shape]
kind = "square"
size = 10
border_size = 2
color = "#ffffff"
"##
    .to_string()
}
