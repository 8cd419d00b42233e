//! Headless surface that records primitive draw calls.
//!
//! Used by tests and by headless runs that dump frames as JSON lines.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::{Point, Rect, Size};
use crate::surface::{Stroke, Surface};

/// A single primitive issued to a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        color: Color,
    },
    Rect {
        rect: Rect,
        color: Color,
        stroke: Stroke,
    },
    Ellipse {
        rect: Rect,
        color: Color,
        stroke: Stroke,
    },
    Text {
        text: String,
        at: Point,
        font_size: u32,
        color: Color,
    },
    Clip {
        rect: Option<Rect>,
    },
    Present,
}

impl DrawCommand {
    /// Bounding rect of a rectangle or ellipse command.
    pub fn shape_rect(&self) -> Option<Rect> {
        match self {
            DrawCommand::Rect { rect, .. } | DrawCommand::Ellipse { rect, .. } => Some(*rect),
            _ => None,
        }
    }
}

/// Surface that keeps every command it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: Size,
    clip: Option<Rect>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            clip: None,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of rectangle and ellipse commands.
    pub fn shape_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| c.shape_rect().is_some())
            .count()
    }

    /// Commands grouped into frames, each ending with a `Present`.
    ///
    /// Trailing commands after the last `Present` are not a frame yet.
    pub fn frames(&self) -> Vec<&[DrawCommand]> {
        let mut frames = Vec::new();
        let mut start = 0;
        for (i, command) in self.commands.iter().enumerate() {
            if matches!(command, DrawCommand::Present) {
                frames.push(&self.commands[start..=i]);
                start = i + 1;
            }
        }
        frames
    }

    /// Serializes the recorded commands, one JSON object per line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for command in &self.commands {
            out.push_str(&serde_json::to_string(command)?);
            out.push('\n');
        }
        Ok(out)
    }

    fn visible(&self, rect: &Rect) -> bool {
        match &self.clip {
            Some(clip) => clip.intersect(rect).is_some(),
            None => true,
        }
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear { color });
    }

    fn draw_rect(&mut self, rect: Rect, color: Color, stroke: Stroke) {
        if self.visible(&rect) {
            self.commands.push(DrawCommand::Rect {
                rect,
                color,
                stroke,
            });
        }
    }

    fn draw_ellipse(&mut self, rect: Rect, color: Color, stroke: Stroke) {
        if self.visible(&rect) {
            self.commands.push(DrawCommand::Ellipse {
                rect,
                color,
                stroke,
            });
        }
    }

    fn blit_text(&mut self, text: &str, at: Point, font_size: u32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            font_size,
            color,
        });
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
        self.commands.push(DrawCommand::Clip { rect: clip });
    }

    fn present(&mut self) {
        self.commands.push(DrawCommand::Present);
    }
}
