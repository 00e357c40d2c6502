//! K-means clustering for dense vectors.
//!
//! ## The Algorithm
//!
//! Lloyd's algorithm alternates two steps: update every centroid to the mean
//! of its points, then move every point to its nearest centroid. It stops as
//! soon as an assignment pass moves nothing.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! Distances are squared Euclidean throughout; the square root never changes
//! which centroid is nearest.
//!
//! **Assumptions**:
//! - Clusters are roughly spherical
//! - Clusters have similar sizes
//! - You know k in advance
//!
//! ## Initialization
//!
//! Two policies, fixed per [`Kmeans`] value:
//!
//! - [`InitPolicy::RandomCentroids`] (default): centroids drawn uniformly from
//!   the data's value range, redrawn until each attracts a point.
//! - [`InitPolicy::RandomClusters`]: a random cluster id per point, with empty
//!   ids filled from larger clusters.
//!
//! Either way, every cluster has a member before the first centroid update.
//!
//! ## Usage
//!
//! ```rust
//! use lloyd::cluster::{Clustering, InitPolicy, Kmeans};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.2],
//!     vec![10.0, 10.0],
//!     vec![10.3, 10.1],
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);  // First two together
//! assert_ne!(labels[0], labels[2]);  // Separate from last two
//!
//! // Full report, other initialization policy
//! let fit = Kmeans::new(2)
//!     .with_init(InitPolicy::RandomClusters)
//!     .with_seed(7)
//!     .fit(&data)
//!     .unwrap();
//! assert_eq!(fit.centroids.len(), 2);
//! assert!(fit.inertia_history.windows(2).all(|w| w[1] <= w[0] + 1e-9));
//! ```

mod init;
mod kmeans;
mod lloyd;
mod traits;
mod util;

pub use init::InitPolicy;
pub use kmeans::{EmptyClusterPolicy, Kmeans, KmeansFit};
pub use traits::Clustering;
