use thiserror::Error;

/// Errors returned by the k-means routines in this crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A coordinate is NaN or infinite.
    #[error("non-finite value at point {point}, dimension {dim}")]
    NonFiniteValue {
        /// Index of the offending point.
        point: usize,
        /// Index of the offending coordinate.
        dim: usize,
    },

    /// Random-centroid seeding cannot give every cluster a member.
    #[error("cannot form {requested} non-empty clusters from {distinct} distinct points")]
    InsufficientDistinctPoints {
        /// Number of distinct points in the dataset.
        distinct: usize,
        /// Requested number of clusters.
        requested: usize,
    },

    /// A cluster has no members when its centroid is computed.
    #[error("cluster {cluster} is empty; its centroid is undefined")]
    DegenerateCluster {
        /// The empty cluster id.
        cluster: usize,
    },

    /// A cluster's mean overflowed while summing its members.
    #[error("centroid of cluster {cluster} is not finite")]
    NonFiniteCentroid {
        /// The overflowing cluster id.
        cluster: usize,
    },

    /// The configured iteration cap was reached before assignments settled.
    #[error("no convergence after {iterations} iterations")]
    NonConvergence {
        /// Iterations performed.
        iterations: usize,
    },

    /// The configured cap on random-centroid redraws was reached.
    #[error("initialization left a cluster empty after {attempts} attempts")]
    InitializationExhausted {
        /// Redraws performed.
        attempts: usize,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
