use std::collections::BTreeMap;
use std::f64::consts::TAU;

use kurbo::Point;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scene::{Animation, Layer, LinearAnimation, OrbitAnimation};

pub const DEFAULT_X: f64 = 100.0;
pub const DEFAULT_Y: f64 = 100.0;
pub const DEFAULT_RADIUS: f64 = 20.0;
pub const DEFAULT_FILL: &str = "#3498db";

/// Scalar value of a layer property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Number(f64),
    Text(String),
}

impl PropValue {
    /// Converts a JSON scalar. Booleans, arrays, objects and null are not
    /// property values.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().filter(|n| n.is_finite()).map(Self::Number),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Named property values of one layer at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySet {
    values: BTreeMap<String, PropValue>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.values.get(name)
    }

    pub fn set(&mut self, name: &str, value: impl Into<PropValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Numeric value of `name`; `None` when absent or textual.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(PropValue::as_number)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropValue::as_text)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    fn fill_default(&mut self, name: &str, value: impl Into<PropValue>) {
        if !self.contains(name) {
            self.set(name, value);
        }
    }
}

impl FromIterator<(String, PropValue)> for PropertySet {
    fn from_iter<I: IntoIterator<Item = (String, PropValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Resolves every property of `layer` at time `t` (milliseconds).
///
/// Animations apply in sequence order, so a later animation of the same
/// property overwrites an earlier one.
pub fn resolve(layer: &Layer, t: f64) -> PropertySet {
    let t = if t.is_finite() { t } else { 0.0 };

    let mut props = layer.base_properties.clone();
    props.fill_default("x", DEFAULT_X);
    props.fill_default("y", DEFAULT_Y);
    props.fill_default("r", DEFAULT_RADIUS);
    props.fill_default("fill", DEFAULT_FILL);

    for animation in &layer.animations {
        match animation {
            Animation::Linear(linear) => apply_linear(&mut props, linear, t),
            Animation::Orbit(orbit) => apply_orbit(&mut props, orbit, t),
        }
    }

    props
}

fn apply_linear(props: &mut PropertySet, animation: &LinearAnimation, t: f64) {
    let property = animation.property.as_str();
    let from = animation
        .from
        .unwrap_or_else(|| props.number(property).unwrap_or(0.0));
    let to = animation.to.unwrap_or(from + 100.0);

    let value = if t < animation.start {
        // Not started yet. Only make sure the property exists.
        if props.contains(property) {
            return;
        }
        from
    } else if t > animation.end || animation.end <= animation.start {
        to
    } else {
        let progress = (t - animation.start) / (animation.end - animation.start);
        from + (to - from) * progress
    };

    props.set(property, value);
}

fn apply_orbit(props: &mut PropertySet, orbit: &OrbitAnimation, t: f64) {
    let position = orbit_position(orbit, t);
    props.set("x", position.x);
    props.set("y", position.y);
    props.set("centerX", orbit.center_x);
    props.set("centerY", orbit.center_y);
    props.set("radius", orbit.radius);
}

/// Point on the orbit at time `t`; angle 0 lies to the right of the centre.
pub fn orbit_position(orbit: &OrbitAnimation, t: f64) -> Point {
    let angle = if orbit.period > 0.0 {
        TAU * (t / orbit.period)
    } else {
        0.0
    };
    Point::new(
        orbit.center_x + orbit.radius * angle.cos(),
        orbit.center_y + orbit.radius * angle.sin(),
    )
}
