//! Text labels.
//!
//! The string itself is rendered by the surface; this type only tracks
//! position, font size and color.

use crate::color::Color;
use crate::drawable::{Drawable, DrawableId};
use crate::error::ValidationError;
use crate::geometry::Point;
use crate::shape::{Shape, ShapeKind, FILLED};
use crate::surface::Surface;

/// Font size used when none is given.
pub const DEFAULT_FONT_SIZE: i32 = 20;

/// A text label drawn at a fixed position.
#[derive(Debug, Clone)]
pub struct Text {
    id: DrawableId,
    position: Point,
    text: String,
    size: i32,
    color: Color,
    shape: Shape,
}

impl Text {
    /// Creates a label. Missing text is empty, missing size is 20 and
    /// missing color is white.
    pub fn new(
        position: Point,
        text: Option<&str>,
        size: Option<i32>,
        color: Option<Color>,
    ) -> Result<Self, ValidationError> {
        let position = checked_position(position)?;
        let size = checked_font_size(size)?;
        let color = color.unwrap_or(Color::WHITE);
        Ok(Self {
            id: DrawableId::next(),
            position,
            text: text.unwrap_or_default().to_string(),
            size,
            color,
            shape: footprint(size, color),
        })
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) -> Result<(), ValidationError> {
        self.position = checked_position(position)?;
        Ok(())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: Option<&str>) {
        self.text = text.unwrap_or_default().to_string();
    }

    /// Font size in pixels.
    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn set_size(&mut self, size: Option<i32>) -> Result<(), ValidationError> {
        self.size = checked_font_size(size)?;
        self.shape = footprint(self.size, self.color);
        Ok(())
    }

    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color.unwrap_or(Color::WHITE);
        self.shape = footprint(self.size, self.color);
    }

    fn blit(&self, surface: &mut dyn Surface, at: Point) {
        if self.text.trim().is_empty() {
            return;
        }
        surface.blit_text(&self.text, at, self.size as u32, self.color);
    }
}

impl Drawable for Text {
    fn id(&self) -> DrawableId {
        self.id
    }

    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn set_shape(&mut self, shape: Shape) -> Result<(), ValidationError> {
        shape.validate()?;
        self.shape = shape;
        Ok(())
    }

    fn color(&self) -> Color {
        self.color
    }

    fn draw(&self, surface: &mut dyn Surface) {
        self.blit(surface, self.position);
    }

    fn draw_at(&self, surface: &mut dyn Surface, origin: Point) {
        self.blit(surface, origin);
    }
}

fn checked_position(position: Point) -> Result<Point, ValidationError> {
    if !position.is_non_negative() {
        return Err(ValidationError::NegativePosition {
            x: position.x,
            y: position.y,
        });
    }
    Ok(position)
}

fn checked_font_size(size: Option<i32>) -> Result<i32, ValidationError> {
    match size {
        None => Ok(DEFAULT_FONT_SIZE),
        Some(size) if size > 0 => Ok(size),
        Some(size) => Err(ValidationError::InvalidFontSize(size)),
    }
}

/// Layout footprint: a filled square as tall as the font.
fn footprint(size: i32, color: Color) -> Shape {
    Shape {
        kind: ShapeKind::Square,
        size,
        border_size: FILLED,
        color,
    }
}
