//! The render surface drawables draw on.
//!
//! A surface only needs filled or bordered rectangles and ellipses plus a
//! text blit. Clipping and presentation are optional.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::{Point, Rect, Size};
use crate::shape::{Shape, ShapeKind};

/// How a primitive is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stroke {
    /// Solid fill.
    Fill,
    /// Outline of the given width in pixels.
    Border(u32),
}

/// Primitive drawing target.
pub trait Surface {
    /// Drawable area in pixels.
    fn size(&self) -> Size;

    /// Fills the whole surface.
    fn clear(&mut self, color: Color);

    fn draw_rect(&mut self, rect: Rect, color: Color, stroke: Stroke);

    /// Draws the ellipse inscribed in `rect`.
    fn draw_ellipse(&mut self, rect: Rect, color: Color, stroke: Stroke);

    /// Renders `text` with its top-left corner at `at`.
    fn blit_text(&mut self, text: &str, at: Point, font_size: u32, color: Color);

    /// Restricts subsequent primitives to `clip`, or lifts the restriction.
    fn set_clip(&mut self, _clip: Option<Rect>) {}

    /// Shows everything drawn since the last clear.
    fn present(&mut self) {}
}

/// Draws `shape` with its top-left corner at `at`, painted in `color`.
pub fn draw_shape(surface: &mut dyn Surface, shape: &Shape, at: Point, color: Color) {
    let rect = Rect::square(at, shape.size);
    match shape.kind {
        ShapeKind::Square => surface.draw_rect(rect, color, shape.stroke()),
        ShapeKind::Circle => surface.draw_ellipse(rect, color, shape.stroke()),
    }
}
