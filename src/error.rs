use std::error::Error;
use std::fmt;

/// Crate-wide error type. Every variant is unrecoverable for the current
/// run: the stage that hit it aborts and the error is surfaced to the
/// caller with enough context to fix the input or the configuration.
#[derive(Debug)]
pub enum PipelineError {
    /// Malformed or missing input data (absent column, unparseable cell).
    Data(String),
    /// A numeric feature with zero (or undefined) standard deviation
    /// cannot be standardized.
    DegenerateFeature { feature: String },
    /// `predict` was called before `fit`.
    UnfittedModel,
    /// A query carries a different feature schema than the one a model or
    /// scaler was fit on.
    SchemaMismatch(String),
    /// An operation that needs at least one row received none.
    EmptyInput(&'static str),
    /// An invalid configuration value (fraction, fold count, candidate k).
    Config(String),
    /// Two row-aligned sequences have different lengths.
    LengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineError::Data(msg) => write!(f, "data error: {}", msg),
            PipelineError::DegenerateFeature { feature } => {
                write!(
                    f,
                    "feature '{}' has zero variance and cannot be standardized",
                    feature
                )
            }
            PipelineError::UnfittedModel => write!(f, "model has not been fitted"),
            PipelineError::SchemaMismatch(msg) => write!(f, "feature schema mismatch: {}", msg),
            PipelineError::EmptyInput(what) => write!(f, "empty input: {}", what),
            PipelineError::Config(msg) => write!(f, "invalid configuration: {}", msg),
            PipelineError::LengthMismatch { expected, actual } => {
                write!(f, "length mismatch: expected {}, got {}", expected, actual)
            }
        }
    }
}

impl Error for PipelineError {}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::Data(err.to_string())
    }
}
