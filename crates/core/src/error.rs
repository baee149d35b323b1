/// Result alias that carries the custom [`ScenePlayError`] type.
pub type Result<T> = std::result::Result<T, ScenePlayError>;

/// Common error type for the core crate.
///
/// Malformed scene data never ends up here; it degrades at load or render
/// time instead. These variants cover failures of the host environment.
#[derive(Debug, thiserror::Error)]
pub enum ScenePlayError {
    /// Free-form failure reported by a collaborator.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// The payload was not valid JSON or not shaped like a scene.
    #[error("invalid scene payload: {0}")]
    Json(#[from] serde_json::Error),
    /// The requested operation is not allowed in the current playback state.
    #[error("invalid playback state: {0}")]
    InvalidState(&'static str),
    /// A drawing primitive failed, usually because the surface is gone.
    #[error("surface error: {0}")]
    Surface(String),
}

impl ScenePlayError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub fn surface<T: Into<String>>(msg: T) -> Self {
        Self::Surface(msg.into())
    }
}

impl From<&str> for ScenePlayError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for ScenePlayError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
