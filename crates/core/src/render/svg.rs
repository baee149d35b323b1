use std::fmt::Write;

use kurbo::{Point, Rect};

use super::{Stroke, Surface};
use crate::{Result, ScenePlayError};

#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    body: String,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    /// Completed SVG document for everything drawn so far.
    pub fn document(&self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body,
        )
    }

    /// Returns the current document and starts an empty one.
    pub fn take_document(&mut self) -> String {
        let document = self.document();
        self.body.clear();
        document
    }

    fn element(&mut self, args: std::fmt::Arguments<'_>) -> Result<()> {
        self.body
            .write_fmt(args)
            .and_then(|_| self.body.write_char('\n'))
            .map_err(|err| ScenePlayError::surface(format!("svg write failed: {err}")))
    }
}

impl Surface for SvgSurface {
    fn fill_circle(&mut self, center: Point, radius: f64, color: &str) -> Result<()> {
        self.element(format_args!(
            "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>",
            center.x,
            center.y,
            radius,
            escape(color)
        ))
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: Stroke<'_>) -> Result<()> {
        self.element(format_args!(
            "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            center.x,
            center.y,
            radius,
            escape(stroke.color),
            stroke.width
        ))
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) -> Result<()> {
        self.element(format_args!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height(),
            escape(color)
        ))
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke<'_>) -> Result<()> {
        self.element(format_args!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height(),
            escape(stroke.color),
            stroke.width
        ))
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke<'_>) -> Result<()> {
        self.element(format_args!(
            "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            from.x,
            from.y,
            to.x,
            to.y,
            escape(stroke.color),
            stroke.width
        ))
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: &str) -> Result<()> {
        self.element(format_args!(
            "  <text x=\"{}\" y=\"{}\" font-family=\"Arial\" font-size=\"{}\" fill=\"{}\">{}</text>",
            origin.x,
            origin.y,
            font_size,
            escape(color),
            escape(text)
        ))
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}
