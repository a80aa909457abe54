/// Failure to decode a raw row against its schema.
///
/// Both variants are contract violations between caller and service;
/// neither is worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("schema mismatch: schema has {expected} columns, row has {actual} values")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error("shape mismatch in column '{column}': expected {expected} value")]
    ShapeMismatch { column: String, expected: &'static str },
}

/// Failure reported by a [`PageFetcher`](crate::PageFetcher).
///
/// Retry policy, if any, belongs to the fetcher; callers see only the final outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("transport: {0}")]
    Transport(String),

    #[error("service ({code}): {message}")]
    Service { code: String, message: String },
}

impl FetchError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            code: code.into(),
            message: message.into(),
        }
    }
}
