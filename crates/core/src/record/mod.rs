use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::{
    render::{Stroke, Surface},
    Result, ScenePlayError,
};

/// One primitive call made against a [`Surface`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    FillCircle {
        center: Point,
        radius: f64,
        color: String,
    },
    StrokeCircle {
        center: Point,
        radius: f64,
        color: String,
        width: f64,
    },
    FillRect {
        rect: Rect,
        color: String,
    },
    StrokeRect {
        rect: Rect,
        color: String,
        width: f64,
    },
    StrokeLine {
        from: Point,
        to: Point,
        color: String,
        width: f64,
    },
    FillText {
        text: String,
        origin: Point,
        font_size: f64,
        color: String,
    },
}

/// Headless surface that records every drawing call instead of rasterising.
///
/// Used by tests to compare frames and by the CLI to dump a frame as JSON.
/// A detached recorder behaves like a torn-down display and rejects draws.
#[derive(Debug)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    attached: bool,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            attached: true,
        }
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Returns the recorded commands and starts a fresh recording.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Simulates the host tearing the surface down.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    fn push(&mut self, command: DrawCommand) -> Result<()> {
        if !self.attached {
            return Err(ScenePlayError::surface("recording surface is detached"));
        }
        self.commands.push(command);
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn fill_circle(&mut self, center: Point, radius: f64, color: &str) -> Result<()> {
        self.push(DrawCommand::FillCircle {
            center,
            radius,
            color: color.to_string(),
        })
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: Stroke<'_>) -> Result<()> {
        self.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color: stroke.color.to_string(),
            width: stroke.width,
        })
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) -> Result<()> {
        self.push(DrawCommand::FillRect {
            rect,
            color: color.to_string(),
        })
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke<'_>) -> Result<()> {
        self.push(DrawCommand::StrokeRect {
            rect,
            color: stroke.color.to_string(),
            width: stroke.width,
        })
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke<'_>) -> Result<()> {
        self.push(DrawCommand::StrokeLine {
            from,
            to,
            color: stroke.color.to_string(),
            width: stroke.width,
        })
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: &str) -> Result<()> {
        self.push(DrawCommand::FillText {
            text: text.to_string(),
            origin,
            font_size,
            color: color.to_string(),
        })
    }
}
