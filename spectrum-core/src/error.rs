//! Analysis error types

use thiserror::Error;

/// Result type for analysis calls
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Broad category of an [`AnalysisError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller broke a precondition of the call.
    InvalidArgument,
}

/// Rejected analysis requests. Nothing is written when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Block exponent above the supported maximum
    #[error("Block exponent {bits} exceeds the maximum of {max}")]
    InvalidBits { bits: u32, max: u32 },

    /// Zero channel stride
    #[error("Channel stride must be at least 1")]
    InvalidStride,

    /// Sample stream shorter than the strided block
    #[error("Not enough samples: need {needed}, got {available}")]
    InsufficientSamples { needed: usize, available: usize },

    /// Output array shorter than the number of bins
    #[error("Output array too small: need {needed} bins, got {available}")]
    OutputTooSmall { needed: usize, available: usize },
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::InvalidBits { .. }
            | AnalysisError::InvalidStride
            | AnalysisError::InsufficientSamples { .. }
            | AnalysisError::OutputTooSmall { .. } => ErrorKind::InvalidArgument,
        }
    }
}
