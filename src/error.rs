/// Errors surfaced by [`ResponseIterator`](crate::ResponseIterator) and
/// [`ResponseStream`](crate::ResponseStream).
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The stream is not a single top-level array of objects.
    #[error("Can only parse array of JSON objects, instead got {fragment:?}")]
    Malformed { fragment: String },
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
    /// The source ended while the outer array was still open.
    #[error("Stream ended inside the array at depth {depth}")]
    Truncated { depth: usize },
    #[error("Object exceeds the maximum size of {limit} bytes")]
    ObjectTooLarge { limit: usize },
}

impl StreamError {
    /// Whether the stream can not produce further values after this error.
    ///
    /// Transport and decode failures are scoped to the call that returned
    /// them; everything else ends the stream.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, StreamError::Transport(_) | StreamError::Decode(_))
    }
}

/// Failure to turn one completed object into the caller's type.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] simd_json::Error),
    #[error("Schema validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[cfg(feature = "relaxed")]
    #[error("JSON5 parsing error: {0}")]
    Json5(#[from] json5::Error),
    #[error("{0}")]
    Custom(String),
}

impl DecodeError {
    pub fn custom(msg: impl std::fmt::Display) -> Self {
        DecodeError::Custom(msg.to_string())
    }
}
