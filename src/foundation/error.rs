/// Convenience result type used across procanim.
pub type ProcanimResult<T> = Result<T, ProcanimError>;

/// Top-level error taxonomy used by crate APIs.
///
/// Data-integrity faults during compilation are deliberately *not* routed
/// through this type: a bad move skips its own case and compilation
/// continues. `Data` is reserved for callers that need to surface such a
/// fault as an error in their own flow.
#[derive(thiserror::Error, Debug)]
pub enum ProcanimError {
    /// Invalid user-provided payload or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A record references graph structure that does not exist.
    #[error("data integrity error: {0}")]
    Data(String),

    /// Errors while constructing a value-to-visual scale.
    #[error("scale error: {0}")]
    Scale(String),

    /// Errors in the playback session lifecycle.
    #[error("playback error: {0}")]
    Playback(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProcanimError {
    /// Build a [`ProcanimError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ProcanimError::Data`] value.
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    /// Build a [`ProcanimError::Scale`] value.
    pub fn scale(msg: impl Into<String>) -> Self {
        Self::Scale(msg.into())
    }

    /// Build a [`ProcanimError::Playback`] value.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
