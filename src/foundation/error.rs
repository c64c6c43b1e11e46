/// Convenience result type used across choreo.
pub type ChoreoResult<T> = Result<T, ChoreoError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ChoreoError {
    /// A scheduling or registration call referenced a target the surface does not hold.
    #[error("target not found: {0}")]
    TargetNotFound(String),

    /// A trigger region or container is malformed (reported at registration time).
    #[error("invalid region config: {0}")]
    InvalidRegionConfig(String),

    /// Invalid user-provided parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while building or controlling tweens and timelines.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors when deserializing a choreography document.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from callbacks or dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChoreoError {
    /// Build a [`ChoreoError::TargetNotFound`] value.
    pub fn target_not_found(msg: impl Into<String>) -> Self {
        Self::TargetNotFound(msg.into())
    }

    /// Build a [`ChoreoError::InvalidRegionConfig`] value.
    pub fn invalid_region(msg: impl Into<String>) -> Self {
        Self::InvalidRegionConfig(msg.into())
    }

    /// Build a [`ChoreoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ChoreoError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`ChoreoError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
