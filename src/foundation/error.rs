/// Convenience result type used across soulgem.
pub type GemResult<T> = Result<T, GemError>;

/// Top-level error taxonomy used by the animation engine.
#[derive(thiserror::Error, Debug)]
pub enum GemError {
    /// Invalid configuration (ranges, step counts, odds).
    #[error("validation error: {0}")]
    Validation(String),

    /// The pixel strip rejected a write or failed to present a frame.
    #[error("strip error: {0}")]
    Sink(String),

    /// Errors when parsing configuration files.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GemError {
    /// Build a [`GemError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GemError::Sink`] value.
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }

    /// Build a [`GemError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<std::io::Error> for GemError {
    fn from(err: std::io::Error) -> Self {
        Self::Sink(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
