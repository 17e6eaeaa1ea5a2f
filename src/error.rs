//! Error types for landmark registration.

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the estimators and the RANSAC engine.
///
/// Degenerate minimal samples are recovered inside the sampling loop and only
/// reach the caller through the direct least-squares entry points.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The correspondences cannot determine a unique transform
    /// (coincident or collinear points, rank-deficient covariance).
    #[error("degenerate sample: correspondences do not determine a unique transform")]
    DegenerateSample,

    /// No hypothesis reached the minimal support after all iterations.
    #[error(
        "estimation failed after {iterations} iterations: best support {best_support}, required {required}"
    )]
    EstimationFailure {
        /// Iterations actually run.
        iterations: usize,
        /// Inlier count of the best hypothesis seen (0 if none was fitted).
        best_support: usize,
        /// Minimal support needed to accept a model.
        required: usize,
    },

    /// Configuration rejected before any sampling started.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Input matrix has the wrong shape.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected shape description
        expected: String,
        /// Actual shape description
        actual: String,
    },

    /// Flat parameter vector cannot be turned into a transform.
    #[error("invalid parameter vector: {0}")]
    InvalidParameters(String),
}

impl Error {
    /// Shorthand used by the configuration validators.
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }
}
