//! K-means clustering with Lloyd iterations.
//!
//! Partitions data into k clusters by minimizing the **within-cluster sum of
//! squares** (WCSS, also called inertia):
//!
//! ```text
//! WCSS = Σₖ Σᵢ∈Cₖ ||xᵢ - μₖ||²
//! ```
//!
//! # Lloyd's Algorithm
//!
//! 1. Initialize (see [`InitPolicy`]) so that every cluster has a member
//! 2. **Update**: each centroid becomes the mean of its assigned points
//! 3. **Assign**: each point moves to its nearest centroid
//! 4. Repeat 2–3 until an assignment pass moves no point
//!
//! Each step either lowers WCSS or leaves it unchanged, and there are finitely
//! many partitions, so the loop terminates. Ties keep a point in its current
//! cluster, which rules out cycling between equally good partitions.
//!
//! # Failure Modes
//!
//! - **Local optima**: Lloyd finds a local minimum only; different seeds can
//!   give different partitions.
//! - **Emptied clusters**: a cluster can lose all its points mid-run. By
//!   default this is reported as [`Error::DegenerateCluster`]; see
//!   [`EmptyClusterPolicy`].

use log::{debug, trace};
use rand::prelude::*;

use super::init::{self, InitPolicy};
use super::lloyd::{self, RunState};
use super::traits::Clustering;
use super::util;
use crate::error::{Error, Result};

/// What to do when a cluster has no members at a centroid update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyClusterPolicy {
    /// Report [`Error::DegenerateCluster`] naming the empty id.
    #[default]
    Fail,
    /// Move the point farthest from its own centroid into the empty cluster
    /// and recompute. Inertia stays non-increasing.
    Reseed,
}

/// K-means clustering algorithm.
///
/// The value is pure configuration: every call runs with its own assignment,
/// centroids and RNG, so one instance can be reused freely.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Initialization policy.
    init: InitPolicy,
    /// Random seed.
    seed: Option<u64>,
    /// Cap on Lloyd iterations; `None` runs to convergence.
    max_iter: Option<usize>,
    /// Cap on random-centroid redraws; `None` retries until success.
    max_init_attempts: Option<usize>,
    /// Handling of clusters that empty mid-run.
    empty_cluster_policy: EmptyClusterPolicy,
}

/// Everything a finished run knows.
#[derive(Debug, Clone)]
pub struct KmeansFit {
    /// Cluster id per input point.
    pub labels: Vec<usize>,
    /// Final centroids, `k x d`.
    pub centroids: Vec<Vec<f64>>,
    /// Lloyd iterations run after initialization.
    pub iterations: usize,
    /// Final within-cluster sum of squares.
    pub inertia: f64,
    /// Inertia after every centroid update, starting with the one that
    /// follows initialization. Non-increasing.
    pub inertia_history: Vec<f64>,
    /// Centroid draws made during initialization.
    pub init_attempts: usize,
}

impl Kmeans {
    /// Create a new K-means clusterer for `k` clusters.
    ///
    /// Defaults: [`InitPolicy::RandomCentroids`], entropy-seeded RNG, no
    /// iteration cap, [`EmptyClusterPolicy::Fail`].
    pub fn new(k: usize) -> Self {
        Self {
            k,
            init: InitPolicy::default(),
            seed: None,
            max_iter: None,
            max_init_attempts: None,
            empty_cluster_policy: EmptyClusterPolicy::default(),
        }
    }

    /// Set the initialization policy.
    pub fn with_init(mut self, init: InitPolicy) -> Self {
        self.init = init;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Stop with [`Error::NonConvergence`] after `max_iter` Lloyd iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = Some(max_iter);
        self
    }

    /// Stop with [`Error::InitializationExhausted`] after `attempts`
    /// random-centroid draws.
    pub fn with_max_init_attempts(mut self, attempts: usize) -> Self {
        self.max_init_attempts = Some(attempts);
        self
    }

    /// Set how clusters that empty mid-run are handled.
    pub fn with_empty_cluster_policy(mut self, policy: EmptyClusterPolicy) -> Self {
        self.empty_cluster_policy = policy;
        self
    }

    /// The configured initialization policy.
    pub fn init_policy(&self) -> InitPolicy {
        self.init
    }

    /// Cluster `data` into `k` groups and return one label per point.
    ///
    /// Equivalent to [`Clustering::fit_predict`].
    pub fn cluster(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        self.fit(data).map(|fit| fit.labels)
    }

    /// Run to convergence and return the full report.
    ///
    /// Uses a [`StdRng`] seeded from the configured seed, or the thread RNG
    /// when no seed is set.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<KmeansFit> {
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        self.fit_with_rng(data, &mut rng)
    }

    /// Run to convergence drawing initialization randomness from `rng`.
    ///
    /// The configured seed is ignored. The RNG is consulted only during
    /// initialization.
    pub fn fit_with_rng<R: Rng>(&self, data: &[Vec<f64>], rng: &mut R) -> Result<KmeansFit> {
        self.check_params()?;
        let d = util::validate(data, self.k)?;
        let k = self.k;
        debug!(
            "k-means: n={}, d={}, k={}, init={:?}",
            data.len(),
            d,
            k,
            self.init
        );

        let init::Seeded {
            mut state,
            attempts: init_attempts,
        } = init::initialize(self.init, data, k, d, self.max_init_attempts, rng)?;
        self.update_centroids(data, &mut state)?;

        let mut inertia_history = vec![lloyd::inertia(data, &state)];
        let mut iterations = 0;
        loop {
            if self.max_iter.is_some_and(|max| iterations >= max) {
                debug!("k-means: stopped after {iterations} iterations without converging");
                return Err(Error::NonConvergence { iterations });
            }
            iterations += 1;

            let changed = lloyd::reassign(data, &mut state);
            self.update_centroids(data, &mut state)?;

            let wcss = lloyd::inertia(data, &state);
            trace!("k-means iteration {iterations}: changed={changed}, inertia={wcss}");
            inertia_history.push(wcss);

            if !changed {
                break;
            }
        }

        let inertia = inertia_history.last().copied().unwrap_or_default();
        debug!("k-means: converged after {iterations} iterations, inertia={inertia}");

        let RunState {
            assignment,
            centroids,
        } = state;
        Ok(KmeansFit {
            labels: assignment,
            centroids,
            iterations,
            inertia,
            inertia_history,
            init_attempts,
        })
    }

    fn check_params(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }
        if self.max_iter == Some(0) {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        if self.max_init_attempts == Some(0) {
            return Err(Error::InvalidParameter {
                name: "max_init_attempts",
                message: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Centroid step, applying the empty-cluster policy.
    fn update_centroids(&self, data: &[Vec<f64>], state: &mut RunState) -> Result<()> {
        match lloyd::update_centroids(data, state) {
            Err(Error::DegenerateCluster { cluster })
                if self.empty_cluster_policy == EmptyClusterPolicy::Reseed =>
            {
                let moved = lloyd::reseed_empty(data, state);
                debug!("k-means: cluster {cluster} emptied; reseeded {moved} cluster(s)");
                lloyd::update_centroids(data, state)
            }
            other => other,
        }
    }
}

impl KmeansFit {
    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Member count per cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        lloyd::member_counts(&self.labels, self.k())
    }

    /// Label new points by their nearest centroid (lowest id on ties).
    pub fn predict(&self, points: &[Vec<f64>]) -> Result<Vec<usize>> {
        if points.is_empty() {
            return Ok(Vec::new());
        }
        let d = self.centroids.first().map_or(0, Vec::len);
        util::validate_points(points, Some(d))?;

        Ok(points
            .iter()
            .map(|p| {
                let mut best = 0;
                let mut best_dist = f64::INFINITY;
                for (c, centroid) in self.centroids.iter().enumerate() {
                    let dist = util::squared_euclidean(p, centroid);
                    if dist < best_dist {
                        best_dist = dist;
                        best = c;
                    }
                }
                best
            })
            .collect())
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        self.cluster(data)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}
