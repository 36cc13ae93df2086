use thiserror::Error;

/// Errors raised while decoding a consumption model or reading from one.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A required key is absent, has the wrong shape, or holds a value of
    /// the wrong numeric kind.
    #[error("malformed document: field `{field}` {reason}")]
    MalformedDocument { field: String, reason: String },

    /// Pattern index outside `[0, bound)`.
    #[error("pattern index {index} out of range (pattern count is {bound})")]
    IndexOutOfRange { index: usize, bound: usize },

    /// `repeat_count * duration` no longer fits the duration type.
    #[error("total duration overflows while accumulating pattern {pattern}")]
    DurationOverflow { pattern: usize },

    #[error("unknown quantity `{0}` (expected active, reactive, p or q)")]
    UnknownQuantity(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    pub(crate) fn malformed(field: &str, reason: impl Into<String>) -> Self {
        ModelError::MalformedDocument {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
