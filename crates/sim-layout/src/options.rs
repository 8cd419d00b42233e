//! Container configuration enums.

use serde::{Deserialize, Serialize};
use sim_draw::ValidationError;
use std::fmt;
use std::str::FromStr;

/// Where a container anchors itself on the surface.
///
/// With [`Align::NoAlign`] the container sits at its configured position.
/// Any other value anchors it to the named edge or center of the surface
/// and treats the position as an offset from that anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    NoAlign,
    Top,
    TopLeft,
    TopRight,
    Center,
    Left,
    Right,
    Bottom,
    BottomLeft,
    BottomRight,
}

impl Align {
    pub fn as_str(&self) -> &'static str {
        match self {
            Align::NoAlign => "no_align",
            Align::Top => "top",
            Align::TopLeft => "top_left",
            Align::TopRight => "top_right",
            Align::Center => "center",
            Align::Left => "left",
            Align::Right => "right",
            Align::Bottom => "bottom",
            Align::BottomLeft => "bottom_left",
            Align::BottomRight => "bottom_right",
        }
    }

    /// Fraction of the free space placed before the container, per axis,
    /// in halves: 0 = start, 1 = center, 2 = end.
    pub(crate) fn anchor_halves(&self) -> Option<(i32, i32)> {
        match self {
            Align::NoAlign => None,
            Align::TopLeft => Some((0, 0)),
            Align::Top => Some((1, 0)),
            Align::TopRight => Some((2, 0)),
            Align::Left => Some((0, 1)),
            Align::Center => Some((1, 1)),
            Align::Right => Some((2, 1)),
            Align::BottomLeft => Some((0, 2)),
            Align::Bottom => Some((1, 2)),
            Align::BottomRight => Some((2, 2)),
        }
    }
}

/// Anchor corner or edge from which members are filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillDirection {
    #[default]
    TopLeft,
    TopRight,
    Left,
    Right,
    BottomLeft,
    BottomRight,
}

impl FillDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            FillDirection::TopLeft => "top_left",
            FillDirection::TopRight => "top_right",
            FillDirection::Left => "left",
            FillDirection::Right => "right",
            FillDirection::BottomLeft => "bottom_left",
            FillDirection::BottomRight => "bottom_right",
        }
    }

    /// True for the directions anchored at the right (or bottom) end.
    pub(crate) fn is_far_horizontal(&self) -> bool {
        matches!(
            self,
            FillDirection::TopRight | FillDirection::Right | FillDirection::BottomRight
        )
    }

    pub(crate) fn is_far_vertical(&self) -> bool {
        matches!(self, FillDirection::BottomLeft | FillDirection::BottomRight)
    }
}

/// What happens to members laid out beyond the container's extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overflow {
    /// Draw every member, even outside the container.
    #[default]
    Visible,
    /// Skip members whose slot starts at or beyond the far edge.
    Hidden,
    /// Clip drawing to the container bounds.
    Clip,
}

impl Overflow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Overflow::Visible => "visible",
            Overflow::Hidden => "hidden",
            Overflow::Clip => "clip",
        }
    }
}

/// Positioning algorithm of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    #[default]
    Row,
    Column,
    Grid,
}

impl ContainerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::Row => "row",
            ContainerKind::Column => "column",
            ContainerKind::Grid => "grid",
        }
    }

    /// Maps a requested fill direction onto the ones this kind supports.
    ///
    /// Rows and columns only distinguish `Left` and `Right`; corner values
    /// collapse onto their horizontal side. Grids need a corner and reject
    /// plain `Left` or `Right`.
    pub fn normalize_fill(
        &self,
        direction: FillDirection,
    ) -> Result<FillDirection, ValidationError> {
        match self {
            ContainerKind::Row | ContainerKind::Column => Ok(match direction {
                FillDirection::TopLeft | FillDirection::BottomLeft | FillDirection::Left => {
                    FillDirection::Left
                }
                FillDirection::TopRight | FillDirection::BottomRight | FillDirection::Right => {
                    FillDirection::Right
                }
            }),
            ContainerKind::Grid => match direction {
                FillDirection::Left | FillDirection::Right => {
                    Err(ValidationError::IllegalFillDirection {
                        container: self.as_str(),
                        direction: direction.as_str(),
                    })
                }
                corner => Ok(corner),
            },
        }
    }
}

macro_rules! impl_str_conversions {
    ($ty:ty, $kind:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.to_lowercase().replace('-', "_");
                [$($variant),+]
                    .into_iter()
                    .find(|v: &$ty| v.as_str() == wanted)
                    .ok_or_else(|| ValidationError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

impl_str_conversions!(
    Align,
    "align",
    [
        Align::NoAlign,
        Align::Top,
        Align::TopLeft,
        Align::TopRight,
        Align::Center,
        Align::Left,
        Align::Right,
        Align::Bottom,
        Align::BottomLeft,
        Align::BottomRight,
    ]
);

impl_str_conversions!(
    FillDirection,
    "fill direction",
    [
        FillDirection::TopLeft,
        FillDirection::TopRight,
        FillDirection::Left,
        FillDirection::Right,
        FillDirection::BottomLeft,
        FillDirection::BottomRight,
    ]
);

impl_str_conversions!(
    Overflow,
    "overflow",
    [Overflow::Visible, Overflow::Hidden, Overflow::Clip]
);

impl_str_conversions!(
    ContainerKind,
    "container kind",
    [ContainerKind::Row, ContainerKind::Column, ContainerKind::Grid]
);
