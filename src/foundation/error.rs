/// Convenience result type used across Scrollweave.
pub type WeaveResult<T> = Result<T, WeaveError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Absence of an optional page element or of the external animation
/// engine is *not* an error (those are silent-skip / degraded paths);
/// these variants cover genuine contract violations at the library seam.
#[derive(thiserror::Error, Debug)]
pub enum WeaveError {
    /// Invalid user-provided page or spec data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A tween/timeline spec or handle violated the engine contract.
    #[error("engine error: {0}")]
    Engine(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WeaveError {
    /// Build a [`WeaveError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WeaveError::Engine`] value.
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    /// Build a [`WeaveError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
