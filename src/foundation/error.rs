/// Convenience result type used across hifz.
pub type HifzResult<T> = Result<T, HifzError>;

/// Top-level error taxonomy used by the I/O and configuration edges of the crate.
///
/// The geometry engine and the layout parser never return these; they degrade to empty
/// results instead.
#[derive(thiserror::Error, Debug)]
pub enum HifzError {
    /// Invalid user-provided configuration or out-of-range arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// A layout document or verse-map artifact could not be loaded for a page.
    #[error("layout error: {0}")]
    Layout(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HifzError {
    /// Build a [`HifzError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`HifzError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`HifzError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for HifzError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
