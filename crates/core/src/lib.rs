//! Core library for the Sceneplay scene animation engine.

pub mod config;
pub mod error;
pub mod interp;
pub mod playback;
pub mod record;
pub mod render;
pub mod scene;
pub mod timeline;

pub use config::{AppConfig, CanvasConfig, PlaybackConfig};
pub use error::{Result, ScenePlayError};
pub use interp::{resolve, PropValue, PropertySet};
pub use playback::{PlaybackController, PlaybackState, TimeReadout};
pub use record::{DrawCommand, RecordingSurface};
pub use render::{render_frame, render_idle, render_layer, svg::SvgSurface, FrameStyle, Stroke, Surface};
pub use scene::{
    parse_payload, Animation, Layer, LayerKind, LinearAnimation, OrbitAnimation, Scene,
    SceneDescription,
};
pub use timeline::{Clock, FrameScheduler, ManualClock, QueueScheduler, SystemClock, TickToken};
