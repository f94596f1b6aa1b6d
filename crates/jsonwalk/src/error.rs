use thiserror::Error;

/// Errors produced by the tokenizer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum JsonError {
    /// A byte that cannot begin or continue the expected production, a
    /// missing delimiter, or a bad escape sequence.
    #[error("invalid JSON input")]
    Invalid,
    /// The document ended at a position where more input could still
    /// complete it.
    #[error("unexpected end of input")]
    Incomplete,
}

/// Errors produced by the file helpers.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] JsonError),
}
