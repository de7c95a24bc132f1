//! Error types for syllabics recognition.

use thiserror::Error;

/// Invalid recognition parameter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("parameter {name} must be a positive finite number, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("normalized size must be at least 1")]
    ZeroNormalizedSize,
}

/// Primary error type for a recognition run.
///
/// Empty input and degenerate statistics are not errors; they resolve to
/// empty output. Only collaborator failures and broken stage preconditions
/// end up here.
#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("classifier failed: {0}")]
    Classifier(String),

    #[error("classifier returned an empty prediction")]
    EmptyPrediction,

    #[error("predicted class {index} is outside the label set of {len} labels")]
    LabelOutOfRange { index: usize, len: usize },

    #[error("invalid parameters: {0}")]
    Params(#[from] ParamsError),

    #[error("line positions must be strictly ascending (violated at index {index})")]
    UnorderedLines { index: usize },

    #[error("label set error: {0}")]
    Labels(#[from] serde_json::Error),
}

/// Convenience Result type alias for RecognitionError.
pub type Result<T> = std::result::Result<T, RecognitionError>;
