/// Convenience result type used across blockmosh.
pub type MoshResult<T> = Result<T, MoshError>;

/// Top-level error taxonomy used by the mosh pipeline and its collaborators.
#[derive(thiserror::Error, Debug)]
pub enum MoshError {
    /// Invalid mosh parameters. Raised before any frame is read.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The frame source produced no first frame.
    #[error("empty source: {0}")]
    EmptySource(String),

    /// Two frames that must share dimensions and channel layout do not.
    #[error("frame geometry error: {0}")]
    FrameGeometry(String),

    /// Failures while decoding source frames.
    #[error("decode error: {0}")]
    Decode(String),

    /// Failures while encoding or writing output frames.
    #[error("encode error: {0}")]
    Encode(String),

    /// Invalid values handed across an API boundary.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MoshError {
    /// Build a [`MoshError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`MoshError::EmptySource`] value.
    pub fn empty_source(msg: impl Into<String>) -> Self {
        Self::EmptySource(msg.into())
    }

    /// Build a [`MoshError::FrameGeometry`] value.
    pub fn frame_geometry(msg: impl Into<String>) -> Self {
        Self::FrameGeometry(msg.into())
    }

    /// Build a [`MoshError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`MoshError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`MoshError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
