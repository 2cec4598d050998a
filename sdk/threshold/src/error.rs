//! Error taxonomy for share decoding and secret reconstruction.
use quorum_rational::RationalError;
use thiserror::Error;

/// Errors that can occur while decoding shares or reconstructing a secret
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThresholdError {
    /// A share record could not be decoded; reconstruction never starts
    #[error("malformed share '{key}': {reason}")]
    MalformedShare { key: String, reason: String },

    /// Threshold below the minimum of 2
    #[error("invalid threshold: k={k} (must be at least 2)")]
    InvalidThreshold { k: usize },

    /// Fewer decoded points than the threshold requires
    #[error("insufficient shares: got {got}, need {need}")]
    InsufficientShares { got: usize, need: usize },

    /// Two points of one subset share an x-coordinate
    #[error("duplicate x-coordinate {x} in subset")]
    DuplicateCoordinate { x: String },

    /// No subset interpolated to a whole number
    #[error("no combination produced an integer secret ({combinations} combinations tried)")]
    NoIntegerSecret { combinations: u64 },

    /// The combination space exceeds the configured limit
    #[error("too many combinations: C(n,k)={count} exceeds limit {limit}")]
    TooManyCombinations { count: String, limit: u64 },

    #[error(transparent)]
    Arithmetic(#[from] RationalError),
}

impl ThresholdError {
    pub(crate) fn malformed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedShare {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Fatal errors abort reconstruction; the rest only void a single subset.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::DuplicateCoordinate { .. } | Self::Arithmetic(RationalError::DivisionByZero)
        )
    }
}

/// Result type for threshold operations
pub type Result<T> = std::result::Result<T, ThresholdError>;
