mod presets;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    interp::{PropValue, PropertySet},
    Result, ScenePlayError,
};

/// Scene length used when the description omits a usable `duration`.
pub const DEFAULT_DURATION_MS: f64 = 4000.0;
/// Advisory frame rate used when the description omits `frameRate`.
pub const DEFAULT_FRAME_RATE: u32 = 30;

const DEFAULT_ANIMATION_END_MS: f64 = 3000.0;
const DEFAULT_ORBIT_CENTER_X: f64 = 300.0;
const DEFAULT_ORBIT_CENTER_Y: f64 = 200.0;
const DEFAULT_ORBIT_RADIUS: f64 = 100.0;
const DEFAULT_ORBIT_PERIOD_MS: f64 = 4000.0;

/// Wire shape of a scene as produced by the upstream generator.
///
/// Fields that may carry the wrong JSON type are kept as raw [`Value`]s so a
/// sloppy description still deserializes; [`Scene::from_description`] decides
/// what to keep.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub duration: Value,
    #[serde(default, rename = "frameRate", alias = "fps")]
    pub frame_rate: Value,
    #[serde(default)]
    pub layers: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerDescription {
    #[serde(default)]
    pub id: Value,
    #[serde(default, rename = "type", alias = "kind")]
    pub kind: Value,
    #[serde(default, alias = "baseProperties")]
    pub props: Value,
    #[serde(default)]
    pub animations: Value,
}

impl SceneDescription {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Unwraps whatever the upstream collaborator delivered into an optional
/// scene description.
///
/// Accepts a bare scene, `null` (no scene yet), an answer envelope carrying a
/// `visualization` field, or an `answer_created` event wrapping such an
/// envelope. Any other typed event yields `None`.
pub fn parse_payload(raw: &str) -> Result<Option<SceneDescription>> {
    let value: Value = serde_json::from_str(raw)?;
    unwrap_payload(value)
}

fn unwrap_payload(value: Value) -> Result<Option<SceneDescription>> {
    let mut map = match value {
        Value::Null => return Ok(None),
        Value::Object(map) => map,
        other => {
            return Err(ScenePlayError::msg(format!(
                "expected a scene object, found {}",
                json_type_name(&other)
            )))
        }
    };

    if map.contains_key("layers") {
        return Ok(Some(serde_json::from_value(Value::Object(map))?));
    }
    if let Some(answer) = map.remove("answer") {
        return unwrap_payload(answer);
    }
    if let Some(visualization) = map.remove("visualization") {
        return unwrap_payload(visualization);
    }
    if map.get("type").is_some_and(Value::is_string) {
        tracing::debug!(event = ?map.get("type"), "payload carries no scene");
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(Value::Object(map))?))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A validated scene. Never mutated once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub id: Option<String>,
    /// Total length in milliseconds, always positive.
    pub duration: f64,
    /// Advisory only; does not bound the tick rate.
    pub frame_rate: u32,
    /// Render order: later layers paint over earlier ones.
    pub layers: Vec<Layer>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            id: None,
            duration: DEFAULT_DURATION_MS,
            frame_rate: DEFAULT_FRAME_RATE,
            layers: Vec::new(),
        }
    }
}

impl Scene {
    pub fn new(duration: f64) -> Self {
        Self {
            duration: positive_or(Some(duration), DEFAULT_DURATION_MS),
            ..Self::default()
        }
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Built-in demo scenes (`basic`, `hydrogen`, `water`).
    pub fn preset(name: &str) -> Option<Self> {
        presets::by_name(name)
    }

    pub fn preset_names() -> &'static [&'static str] {
        presets::NAMES
    }

    pub fn from_description(description: SceneDescription) -> Self {
        let duration = positive_or(as_number(&description.duration), DEFAULT_DURATION_MS);
        if !description.duration.is_null() && as_number(&description.duration) != Some(duration) {
            tracing::warn!(duration = %description.duration, "unusable scene duration, using default");
        }

        let frame_rate = as_number(&description.frame_rate)
            .filter(|rate| *rate >= 1.0)
            .map(|rate| rate.round().min(u32::MAX as f64) as u32)
            .unwrap_or(DEFAULT_FRAME_RATE);

        let layers = match description.layers {
            Value::Array(entries) => entries
                .into_iter()
                .enumerate()
                .filter_map(|(index, entry)| layer_from_json(index, entry))
                .collect(),
            Value::Null => Vec::new(),
            other => {
                tracing::warn!(layers = %other, "scene layers are not an array, drawing nothing");
                Vec::new()
            }
        };

        Self {
            id: description.id.as_str().map(str::to_string),
            duration,
            frame_rate,
            layers,
        }
    }
}

/// Closed set of layer kinds the renderer knows how to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerKind {
    Circle,
    Rectangle,
    Arrow,
    Text,
    Orbit,
    /// Anything else; drawn as a circle.
    Unknown(String),
}

impl LayerKind {
    pub fn parse(name: &str) -> Self {
        match name {
            "circle" => Self::Circle,
            "rectangle" => Self::Rectangle,
            "arrow" => Self::Arrow,
            "text" => Self::Text,
            "orbit" => Self::Orbit,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Circle => "circle",
            Self::Rectangle => "rectangle",
            Self::Arrow => "arrow",
            Self::Text => "text",
            Self::Orbit => "orbit",
            Self::Unknown(name) => name,
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: String,
    pub kind: LayerKind,
    pub base_properties: PropertySet,
    pub animations: Vec<Animation>,
}

impl Layer {
    pub fn new(id: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id: id.into(),
            kind,
            base_properties: PropertySet::new(),
            animations: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: &str, value: impl Into<PropValue>) -> Self {
        self.base_properties.set(name, value);
        self
    }

    pub fn with_animation(mut self, animation: impl Into<Animation>) -> Self {
        self.animations.push(animation.into());
        self
    }

    fn from_description(index: usize, description: LayerDescription) -> Self {
        let id = match &description.id {
            Value::String(id) => id.clone(),
            Value::Number(n) => n.to_string(),
            _ => format!("layer-{index}"),
        };

        let kind = LayerKind::parse(description.kind.as_str().unwrap_or_default());
        if let LayerKind::Unknown(name) = &kind {
            tracing::warn!(layer = %id, kind = %name, "unknown layer kind, will render as circle");
        }

        let base_properties = match &description.props {
            Value::Object(props) => properties_from_json(&id, props),
            Value::Null => PropertySet::new(),
            other => {
                tracing::warn!(layer = %id, props = %other, "layer props are not an object, ignoring");
                PropertySet::new()
            }
        };

        let animations = match description.animations {
            Value::Array(entries) => entries
                .iter()
                .filter_map(|entry| Animation::from_json(&id, entry, &base_properties))
                .collect(),
            Value::Null => Vec::new(),
            other => {
                tracing::warn!(layer = %id, animations = %other, "animations are not an array, ignoring");
                Vec::new()
            }
        };

        Self {
            id,
            kind,
            base_properties,
            animations,
        }
    }
}

fn layer_from_json(index: usize, entry: Value) -> Option<Layer> {
    if !entry.is_object() {
        tracing::warn!(index, %entry, "layer entry is not an object, skipping");
        return None;
    }
    match serde_json::from_value(entry) {
        Ok(description) => Some(Layer::from_description(index, description)),
        Err(err) => {
            tracing::warn!(index, error = %err, "unreadable layer entry, skipping");
            None
        }
    }
}

fn properties_from_json(layer: &str, props: &Map<String, Value>) -> PropertySet {
    let mut set = PropertySet::new();
    for (name, value) in props {
        match PropValue::from_json(value) {
            Some(value) => set.set(name, value),
            None => tracing::warn!(layer, property = %name, %value, "skipping non-scalar property"),
        }
    }
    set
}

/// One time-keyed driver of a layer property.
#[derive(Debug, Clone, PartialEq)]
pub enum Animation {
    Linear(LinearAnimation),
    Orbit(OrbitAnimation),
}

/// Linear ramp of a single numeric property over `[start, end]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearAnimation {
    pub property: String,
    /// `None` starts from the property's current value (0 when absent).
    pub from: Option<f64>,
    /// `None` means `from + 100`.
    pub to: Option<f64>,
    pub start: f64,
    pub end: f64,
}

impl LinearAnimation {
    pub fn new(property: impl Into<String>, from: f64, to: f64, start: f64, end: f64) -> Self {
        Self {
            property: property.into(),
            from: Some(from),
            to: Some(to),
            start,
            end,
        }
    }
}

/// Circular motion of a layer's `x`/`y` around a fixed centre.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitAnimation {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    /// Time for one full revolution, in milliseconds.
    pub period: f64,
}

impl OrbitAnimation {
    pub fn new(center_x: f64, center_y: f64, radius: f64, period: f64) -> Self {
        Self {
            center_x,
            center_y,
            radius,
            period,
        }
    }
}

impl From<LinearAnimation> for Animation {
    fn from(value: LinearAnimation) -> Self {
        Self::Linear(value)
    }
}

impl From<OrbitAnimation> for Animation {
    fn from(value: OrbitAnimation) -> Self {
        Self::Orbit(value)
    }
}

impl Animation {
    fn from_json(layer: &str, entry: &Value, base: &PropertySet) -> Option<Self> {
        let Some(fields) = entry.as_object() else {
            tracing::warn!(layer, %entry, "animation entry is not an object, skipping");
            return None;
        };
        let Some(property) = fields.get("property").and_then(Value::as_str) else {
            tracing::warn!(layer, %entry, "animation has no property name, skipping");
            return None;
        };

        let number = |name: &str| -> Option<f64> {
            let value = fields.get(name)?;
            let parsed = as_number(value);
            if parsed.is_none() && !value.is_null() {
                tracing::warn!(layer, property, field = name, %value, "non-numeric animation field, treating as absent");
            }
            parsed
        };

        if property == "orbit" {
            let fallback = |name: &str, default: f64| base.number(name).unwrap_or(default);
            return Some(Self::Orbit(OrbitAnimation {
                center_x: number("centerX").unwrap_or_else(|| fallback("centerX", DEFAULT_ORBIT_CENTER_X)),
                center_y: number("centerY").unwrap_or_else(|| fallback("centerY", DEFAULT_ORBIT_CENTER_Y)),
                radius: number("radius").unwrap_or_else(|| fallback("radius", DEFAULT_ORBIT_RADIUS)),
                period: number("duration").unwrap_or(DEFAULT_ORBIT_PERIOD_MS),
            }));
        }

        Some(Self::Linear(LinearAnimation {
            property: property.to_string(),
            from: number("from"),
            to: number("to"),
            start: number("start").unwrap_or(0.0),
            end: number("end").unwrap_or(DEFAULT_ANIMATION_END_MS),
        }))
    }
}

fn as_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite())
}

fn positive_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_from(raw: &str) -> Scene {
        Scene::from_description(SceneDescription::from_json_str(raw).unwrap())
    }

    #[test]
    fn applies_documented_defaults() {
        let scene = scene_from(r#"{ "layers": [] }"#);
        assert_eq!(scene.duration, 4000.0);
        assert_eq!(scene.frame_rate, 30);
        assert!(scene.layers.is_empty());
    }

    #[test]
    fn reads_fps_alias_and_wire_field_names() {
        let scene = scene_from(
            r#"{
                "id": "vis_1",
                "duration": 5000,
                "fps": 24,
                "layers": [
                    { "id": "a", "type": "rectangle", "props": { "x": 10, "fill": "red" } }
                ]
            }"#,
        );
        assert_eq!(scene.id.as_deref(), Some("vis_1"));
        assert_eq!(scene.duration, 5000.0);
        assert_eq!(scene.frame_rate, 24);
        let layer = &scene.layers[0];
        assert_eq!(layer.kind, LayerKind::Rectangle);
        assert_eq!(layer.base_properties.number("x"), Some(10.0));
        assert_eq!(layer.base_properties.text("fill"), Some("red"));
        assert!(layer.animations.is_empty());
    }

    #[test]
    fn bad_duration_falls_back() {
        assert_eq!(scene_from(r#"{ "duration": -5 }"#).duration, 4000.0);
        assert_eq!(scene_from(r#"{ "duration": "long" }"#).duration, 4000.0);
        assert_eq!(scene_from(r#"{ "frameRate": 0 }"#).frame_rate, 30);
    }

    #[test]
    fn null_or_non_array_layers_load_as_empty_scene() {
        let null = parse_payload(r#"{ "duration": 2000, "layers": null }"#)
            .unwrap()
            .map(Scene::from_description)
            .unwrap();
        assert_eq!(null.duration, 2000.0);
        assert!(null.layers.is_empty());

        let text = scene_from(r#"{ "duration": 2000, "layers": "circle" }"#);
        assert_eq!(text.duration, 2000.0);
        assert!(text.layers.is_empty());

        let object = scene_from(r#"{ "layers": { "type": "circle" } }"#);
        assert!(object.layers.is_empty());
    }

    #[test]
    fn non_object_layer_entries_are_skipped() {
        let scene = scene_from(
            r#"{ "layers": [ { "id": "a", "type": "circle" }, 5, null, "b", { "type": "text" } ] }"#,
        );
        assert_eq!(scene.layers.len(), 2);
        assert_eq!(scene.layers[0].id, "a");
        assert_eq!(scene.layers[0].kind, LayerKind::Circle);
        assert_eq!(scene.layers[1].kind, LayerKind::Text);
        assert_eq!(scene.layers[1].id, "layer-4");
    }

    #[test]
    fn unknown_kind_is_kept_not_rejected() {
        let scene = scene_from(r#"{ "layers": [ { "type": "shape" }, {} ] }"#);
        assert_eq!(scene.layers[0].kind, LayerKind::Unknown("shape".into()));
        assert_eq!(scene.layers[1].kind, LayerKind::Unknown(String::new()));
        assert_eq!(scene.layers[1].id, "layer-1");
    }

    #[test]
    fn malformed_animation_fields_are_treated_as_absent() {
        let scene = scene_from(
            r#"{ "layers": [ { "type": "circle", "animations": [
                { "property": "x", "from": "left", "to": 300 },
                { "from": 1, "to": 2 },
                42
            ] } ] }"#,
        );
        let animations = &scene.layers[0].animations;
        assert_eq!(animations.len(), 1);
        let Animation::Linear(linear) = &animations[0] else {
            panic!("expected linear animation");
        };
        assert_eq!(linear.from, None);
        assert_eq!(linear.to, Some(300.0));
        assert_eq!(linear.start, 0.0);
        assert_eq!(linear.end, 3000.0);
    }

    #[test]
    fn orbit_reads_animation_then_layer_then_defaults() {
        let scene = scene_from(
            r#"{ "layers": [
                { "type": "circle", "animations": [
                    { "property": "orbit", "centerX": 300, "centerY": 200, "radius": 50, "duration": 3000 }
                ] },
                { "type": "orbit", "props": { "centerX": 10, "radius": 5 }, "animations": [
                    { "property": "orbit" }
                ] }
            ] }"#,
        );
        assert_eq!(
            scene.layers[0].animations[0],
            Animation::Orbit(OrbitAnimation::new(300.0, 200.0, 50.0, 3000.0))
        );
        assert_eq!(
            scene.layers[1].animations[0],
            Animation::Orbit(OrbitAnimation::new(10.0, 200.0, 5.0, 4000.0))
        );
    }

    #[test]
    fn non_scalar_props_are_skipped() {
        let scene = scene_from(
            r#"{ "layers": [ { "type": "text", "props": { "text": "hi", "nested": { "a": 1 }, "flag": true } } ] }"#,
        );
        let props = &scene.layers[0].base_properties;
        assert_eq!(props.len(), 1);
        assert_eq!(props.text("text"), Some("hi"));
    }

    #[test]
    fn payload_accepts_scene_null_and_envelopes() {
        assert!(parse_payload("null").unwrap().is_none());

        let bare = parse_payload(r#"{ "duration": 1000, "layers": [] }"#).unwrap();
        assert!(bare.is_some());

        let envelope = parse_payload(
            r#"{ "text": "Water is...", "visualization": { "duration": 5000, "layers": [ { "type": "circle" } ] } }"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(envelope.layers.as_array().map(Vec::len), Some(1));

        let event = parse_payload(
            r#"{ "type": "answer_created", "answer": { "text": "x", "visualization": { "layers": [] } } }"#,
        )
        .unwrap();
        assert!(event.is_some());

        let empty_answer =
            parse_payload(r#"{ "text": "no picture", "visualization": null }"#).unwrap();
        assert!(empty_answer.is_none());

        let connected =
            parse_payload(r#"{ "type": "connected", "message": "hello" }"#).unwrap();
        assert!(connected.is_none());
    }

    #[test]
    fn payload_rejects_non_objects() {
        assert!(parse_payload("[1, 2]").is_err());
        assert!(parse_payload("not json").is_err());
    }

    #[test]
    fn builders_match_parsed_layers() {
        let built = Layer::new("dot", LayerKind::Circle)
            .with_property("x", 10.0)
            .with_animation(LinearAnimation::new("x", 10.0, 20.0, 0.0, 100.0));
        let parsed = scene_from(
            r#"{ "layers": [ { "id": "dot", "type": "circle", "props": { "x": 10 },
                 "animations": [ { "property": "x", "from": 10, "to": 20, "start": 0, "end": 100 } ] } ] }"#,
        );
        assert_eq!(parsed.layers[0], built);
    }
}
