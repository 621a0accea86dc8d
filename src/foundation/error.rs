/// Convenience result type used across Yogaflow load and configuration boundaries.
pub type FlowResult<T> = Result<T, FlowError>;

#[derive(thiserror::Error, Debug)]
/// Top-level error type for Yogaflow.
///
/// Sequencing, scoring, generation and timing operations are fail-soft and never
/// return this type; it is produced only while loading catalogs and configuration.
pub enum FlowError {
    /// Input model or configuration is invalid.
    #[error("validation error: {0}")]
    Validation(String),

    /// Pose catalog could not be assembled.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlowError {
    /// Build a [`FlowError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FlowError::Catalog`] value.
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Build a [`FlowError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for FlowError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
