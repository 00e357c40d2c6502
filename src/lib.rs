//! K-means clustering with Lloyd iterations.
//!
//! `lloyd` partitions a set of dense `f64` points into `k` clusters by
//! alternating nearest-centroid assignment and centroid recomputation until no
//! point changes cluster.
//!
//! The primary public API is under [`cluster`], which provides:
//! - [`Kmeans`]: configuration (cluster count, initialization policy, seed, caps)
//! - [`KmeansFit`]: labels, centroids, and convergence history of one run
//! - [`Clustering`]: the one-label-per-point interface

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;

pub use cluster::{Clustering, EmptyClusterPolicy, InitPolicy, Kmeans, KmeansFit};
pub use error::{Error, Result};
