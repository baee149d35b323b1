pub mod svg;

use std::f64::consts::FRAC_PI_6;

use kurbo::{Point, Rect, Vec2};

use crate::{
    config::CanvasConfig,
    interp::{resolve, PropValue, PropertySet, DEFAULT_FILL, DEFAULT_RADIUS, DEFAULT_X, DEFAULT_Y},
    scene::{LayerKind, Scene},
    Result,
};

const DEFAULT_STROKE_WIDTH: f64 = 2.0;
const DEFAULT_RECT_SIZE: f64 = 40.0;
const DEFAULT_ARROW_DX: f64 = 50.0;
const DEFAULT_ARROW_DY: f64 = 0.0;
const DEFAULT_ARROW_COLOR: &str = "#e74c3c";
const DEFAULT_ARROW_HEAD: f64 = 10.0;
const ARROW_LINE_WIDTH: f64 = 3.0;
const DEFAULT_TEXT: &str = "Text";
const DEFAULT_FONT_SIZE: f64 = 16.0;
const ORBIT_PATH_COLOR: &str = "#666";
const ORBIT_PATH_WIDTH: f64 = 1.0;
const DEFAULT_ORBIT_CENTER: Point = Point::new(300.0, 200.0);
const DEFAULT_ORBIT_RADIUS: f64 = 100.0;
const IDLE_TEXT_COLOR: &str = "#888888";

/// Outline paint for the stroke primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke<'a> {
    pub color: &'a str,
    pub width: f64,
}

impl<'a> Stroke<'a> {
    pub fn new(color: &'a str, width: f64) -> Self {
        Self { color, width }
    }
}

/// The drawing capability the engine depends on.
///
/// Colours are CSS colour strings passed through untouched. Any method may
/// fail when the backing display has gone away; the error aborts the frame.
pub trait Surface {
    fn fill_circle(&mut self, center: Point, radius: f64, color: &str) -> Result<()>;
    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: Stroke<'_>) -> Result<()>;
    fn fill_rect(&mut self, rect: Rect, color: &str) -> Result<()>;
    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke<'_>) -> Result<()>;
    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke<'_>) -> Result<()>;
    /// Draws `text` with its baseline starting at `origin`. No wrapping.
    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: &str) -> Result<()>;
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn fill_circle(&mut self, center: Point, radius: f64, color: &str) -> Result<()> {
        (**self).fill_circle(center, radius, color)
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: Stroke<'_>) -> Result<()> {
        (**self).stroke_circle(center, radius, stroke)
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) -> Result<()> {
        (**self).fill_rect(rect, color)
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke<'_>) -> Result<()> {
        (**self).stroke_rect(rect, stroke)
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke<'_>) -> Result<()> {
        (**self).stroke_line(from, to, stroke)
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: &str) -> Result<()> {
        (**self).fill_text(text, origin, font_size, color)
    }
}

/// Frame-level settings: surface size and the colour it is cleared to.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStyle {
    pub width: f64,
    pub height: f64,
    pub background: String,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self::from(&CanvasConfig::default())
    }
}

impl From<&CanvasConfig> for FrameStyle {
    fn from(canvas: &CanvasConfig) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            background: canvas.background.clone(),
        }
    }
}

/// Paints one whole frame of `scene` at time `t`.
pub fn render_frame<S: Surface + ?Sized>(
    surface: &mut S,
    scene: &Scene,
    t: f64,
    style: &FrameStyle,
) -> Result<()> {
    clear(surface, style)?;
    for layer in &scene.layers {
        let props = resolve(layer, t);
        render_layer(surface, &props, &layer.kind)?;
    }
    Ok(())
}

/// Placeholder shown while no scene has been loaded.
pub fn render_idle<S: Surface + ?Sized>(surface: &mut S, style: &FrameStyle) -> Result<()> {
    clear(surface, style)?;
    let center_x = style.width / 2.0;
    let center_y = style.height / 2.0;
    surface.fill_text(
        "Visualizations will appear here",
        Point::new(center_x - 120.0, center_y - 10.0),
        DEFAULT_FONT_SIZE,
        IDLE_TEXT_COLOR,
    )?;
    surface.fill_text(
        "Load a scene to see it animate",
        Point::new(center_x - 110.0, center_y + 16.0),
        DEFAULT_FONT_SIZE - 2.0,
        IDLE_TEXT_COLOR,
    )
}

fn clear<S: Surface + ?Sized>(surface: &mut S, style: &FrameStyle) -> Result<()> {
    surface.fill_rect(
        Rect::new(0.0, 0.0, style.width, style.height),
        &style.background,
    )
}

/// Draws one resolved layer. Unknown kinds are drawn as circles.
pub fn render_layer<S: Surface + ?Sized>(
    surface: &mut S,
    props: &PropertySet,
    kind: &LayerKind,
) -> Result<()> {
    match kind {
        LayerKind::Circle => draw_circle(surface, props),
        LayerKind::Rectangle => draw_rectangle(surface, props),
        LayerKind::Arrow => draw_arrow(surface, props),
        LayerKind::Text => draw_text(surface, props),
        LayerKind::Orbit => draw_orbit(surface, props),
        LayerKind::Unknown(name) => {
            tracing::debug!(kind = %name, "unknown layer kind, drawing as circle");
            draw_circle(surface, props)
        }
    }
}

fn draw_circle<S: Surface + ?Sized>(surface: &mut S, props: &PropertySet) -> Result<()> {
    let center = position(props);
    let radius = number_or(props, "r", DEFAULT_RADIUS);
    surface.fill_circle(center, radius, paint(props, "fill", DEFAULT_FILL))?;
    if let Some(stroke) = outline(props) {
        surface.stroke_circle(center, radius, stroke)?;
    }
    Ok(())
}

fn draw_rectangle<S: Surface + ?Sized>(surface: &mut S, props: &PropertySet) -> Result<()> {
    let rect = Rect::from_origin_size(
        position(props),
        (
            number_or(props, "width", DEFAULT_RECT_SIZE),
            number_or(props, "height", DEFAULT_RECT_SIZE),
        ),
    );
    surface.fill_rect(rect, paint(props, "fill", DEFAULT_FILL))?;
    if let Some(stroke) = outline(props) {
        surface.stroke_rect(rect, stroke)?;
    }
    Ok(())
}

fn draw_arrow<S: Surface + ?Sized>(surface: &mut S, props: &PropertySet) -> Result<()> {
    let tail = position(props);
    let shaft = Vec2::new(
        number_or(props, "dx", DEFAULT_ARROW_DX),
        number_or(props, "dy", DEFAULT_ARROW_DY),
    );
    let head_length = number_or(props, "headLength", DEFAULT_ARROW_HEAD);
    let stroke = Stroke::new(paint(props, "color", DEFAULT_ARROW_COLOR), ARROW_LINE_WIDTH);

    let tip = tail + shaft;
    surface.stroke_line(tail, tip, stroke)?;

    // Wings sit 30 degrees either side of the shaft, pointing back from the tip.
    let angle = shaft.atan2();
    let left = tip - Vec2::from_angle(angle - FRAC_PI_6) * head_length;
    let right = tip - Vec2::from_angle(angle + FRAC_PI_6) * head_length;
    surface.stroke_line(tip, left, stroke)?;
    surface.stroke_line(left, right, stroke)?;
    surface.stroke_line(right, tip, stroke)
}

fn draw_text<S: Surface + ?Sized>(surface: &mut S, props: &PropertySet) -> Result<()> {
    let text = match props.get("text") {
        Some(PropValue::Text(text)) => text.clone(),
        Some(PropValue::Number(n)) => n.to_string(),
        None => DEFAULT_TEXT.to_string(),
    };
    surface.fill_text(
        &text,
        position(props),
        number_or(props, "fontSize", DEFAULT_FONT_SIZE),
        paint(props, "fill", DEFAULT_FILL),
    )
}

fn draw_orbit<S: Surface + ?Sized>(surface: &mut S, props: &PropertySet) -> Result<()> {
    let radius = number_or(props, "r", DEFAULT_RADIUS);
    surface.fill_circle(position(props), radius, paint(props, "fill", DEFAULT_FILL))?;

    let center = Point::new(
        number_or(props, "centerX", DEFAULT_ORBIT_CENTER.x),
        number_or(props, "centerY", DEFAULT_ORBIT_CENTER.y),
    );
    surface.stroke_circle(
        center,
        number_or(props, "radius", DEFAULT_ORBIT_RADIUS),
        Stroke::new(ORBIT_PATH_COLOR, ORBIT_PATH_WIDTH),
    )
}

fn position(props: &PropertySet) -> Point {
    Point::new(
        number_or(props, "x", DEFAULT_X),
        number_or(props, "y", DEFAULT_Y),
    )
}

fn number_or(props: &PropertySet, name: &str, default: f64) -> f64 {
    props.number(name).unwrap_or(default)
}

fn paint<'a>(props: &'a PropertySet, name: &str, default: &'a str) -> &'a str {
    props.text(name).unwrap_or(default)
}

fn outline(props: &PropertySet) -> Option<Stroke<'_>> {
    props.text("stroke").map(|color| {
        Stroke::new(
            color,
            number_or(props, "strokeWidth", DEFAULT_STROKE_WIDTH),
        )
    })
}
