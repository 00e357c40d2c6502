//! Starting states for a k-means run.
//!
//! Both policies hand the driver a [`RunState`] in which every cluster id
//! `0..k` has at least one member, so the first centroid pass never divides
//! by zero.

use log::{debug, trace};
use rand::Rng;

use super::lloyd::{self, RunState};
use super::util;
use crate::error::{Error, Result};

/// How the first partition is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitPolicy {
    /// Draw a uniform cluster id per point, then repair empty clusters.
    ///
    /// Every starting centroid lands near the global mean, so on small data
    /// clusters empty out mid-run more often than with random centroids.
    RandomClusters,
    /// Draw centroid coordinates uniformly from the data's value range and
    /// redraw until every cluster receives a point.
    #[default]
    RandomCentroids,
}

/// Outcome of initialization.
#[derive(Debug)]
pub(crate) struct Seeded {
    pub(crate) state: RunState,
    /// Centroid draws made (always 1 for [`InitPolicy::RandomClusters`]).
    pub(crate) attempts: usize,
}

pub(crate) fn initialize<R: Rng>(
    policy: InitPolicy,
    data: &[Vec<f64>],
    k: usize,
    d: usize,
    max_attempts: Option<usize>,
    rng: &mut R,
) -> Result<Seeded> {
    match policy {
        InitPolicy::RandomClusters => {
            let assignment = random_clusters(data.len(), k, rng);
            Ok(Seeded {
                state: RunState::with_assignment(assignment, k, d),
                attempts: 1,
            })
        }
        InitPolicy::RandomCentroids => random_centroids(data, k, d, max_attempts, rng),
    }
}

/// Uniform random ids in `[0, k)`, with no cluster left empty.
///
/// Each empty id takes a random point from a cluster that has more than one
/// member. Requires `k <= n`.
pub(crate) fn random_clusters<R: Rng>(n: usize, k: usize, rng: &mut R) -> Vec<usize> {
    debug_assert!(k >= 1 && k <= n);

    let mut assignment: Vec<usize> = (0..n).map(|_| rng.random_range(0..k)).collect();
    let mut counts = lloyd::member_counts(&assignment, k);

    let mut repaired = 0;
    for empty in 0..k {
        if counts[empty] != 0 {
            continue;
        }
        let spare: Vec<usize> = (0..n).filter(|&i| counts[assignment[i]] > 1).collect();
        // Pigeonhole: some cluster holds two points while one is empty.
        if spare.is_empty() {
            break;
        }
        let i = spare[rng.random_range(0..spare.len())];
        counts[assignment[i]] -= 1;
        counts[empty] += 1;
        assignment[i] = empty;
        repaired += 1;
    }

    if repaired > 0 {
        debug!("random cluster ids left {repaired} cluster(s) empty; moved one point into each");
    }
    assignment
}

/// Random centroids inside the data's scalar value range `[lo, hi]`, redrawn until the
/// first nearest-centroid pass leaves no cluster empty.
///
/// The incumbent ids carried between attempts start at 0. Fails fast when the
/// data has fewer than `k` distinct points, since no draw can then succeed.
pub(crate) fn random_centroids<R: Rng>(
    data: &[Vec<f64>],
    k: usize,
    d: usize,
    max_attempts: Option<usize>,
    rng: &mut R,
) -> Result<Seeded> {
    let distinct = util::count_distinct(data);
    if distinct < k {
        return Err(Error::InsufficientDistinctPoints {
            distinct,
            requested: k,
        });
    }

    let (lo, hi) = util::value_range(data);
    let mut state = RunState::new(data.len(), k, d);
    let mut attempts = 0;

    loop {
        if max_attempts.is_some_and(|max| attempts >= max) {
            return Err(Error::InitializationExhausted { attempts });
        }
        attempts += 1;

        for centroid in state.centroids.iter_mut() {
            for x in centroid.iter_mut() {
                // Closed range: both `lo` and `hi` are reachable.
                let t: f64 = rng.random_range(0.0..=1.0);
                *x = lo * (1.0 - t) + hi * t;
            }
        }
        lloyd::reassign(data, &mut state);

        let counts = lloyd::member_counts(&state.assignment, k);
        if counts.iter().all(|&c| c > 0) {
            break;
        }
        trace!("centroid draw {attempts} left a cluster empty; redrawing");
    }

    debug!("random centroids covered all {k} clusters after {attempts} draw(s)");
    Ok(Seeded { state, attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.2, 0.1],
            vec![5.0, 5.0],
            vec![5.1, 4.9],
            vec![10.0, 0.0],
            vec![9.9, 0.2],
        ]
    }

    #[test]
    fn random_clusters_never_leaves_a_cluster_empty() {
        // k == n makes empty clusters after the raw draw almost certain.
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let assignment = random_clusters(8, 8, &mut rng);
            let mut sorted = assignment.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..8).collect::<Vec<_>>(), "seed {seed}");
        }
    }

    #[test]
    fn random_clusters_ids_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let assignment = random_clusters(100, 4, &mut rng);
        assert_eq!(assignment.len(), 100);
        assert!(assignment.iter().all(|&c| c < 4));
        assert!(lloyd::member_counts(&assignment, 4).iter().all(|&c| c > 0));
    }

    #[test]
    fn random_centroids_cover_every_cluster() {
        let data = blobs();
        let mut rng = StdRng::seed_from_u64(11);
        let seeded = random_centroids(&data, 3, 2, None, &mut rng).unwrap();

        assert!(seeded.attempts >= 1);
        let counts = lloyd::member_counts(&seeded.state.assignment, 3);
        assert!(counts.iter().all(|&c| c > 0));
    }

    #[test]
    fn random_centroids_stay_within_value_range() {
        let data = blobs();
        let mut rng = StdRng::seed_from_u64(5);
        let seeded = random_centroids(&data, 2, 2, None, &mut rng).unwrap();

        let (lo, hi) = util::value_range(&data);
        for centroid in &seeded.state.centroids {
            assert!(centroid.iter().all(|&x| (lo..=hi).contains(&x)));
        }
    }

    #[test]
    fn random_centroids_reject_too_few_distinct_points() {
        let data = vec![vec![1.0, 1.0]; 4];
        let mut rng = StdRng::seed_from_u64(0);
        let err = random_centroids(&data, 2, 2, None, &mut rng).unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientDistinctPoints {
                distinct: 1,
                requested: 2
            }
        );
    }

    #[test]
    fn random_centroids_respect_attempt_cap() {
        let data = blobs();
        let mut rng = StdRng::seed_from_u64(0);
        let err = random_centroids(&data, 3, 2, Some(0), &mut rng).unwrap_err();
        assert_eq!(err, Error::InitializationExhausted { attempts: 0 });
    }

    #[test]
    fn initialize_dispatches_on_policy() {
        let data = blobs();
        let mut rng = StdRng::seed_from_u64(9);

        let seeded = initialize(InitPolicy::RandomClusters, &data, 3, 2, None, &mut rng).unwrap();
        assert_eq!(seeded.attempts, 1);
        assert_eq!(seeded.state.assignment.len(), data.len());
        assert_eq!(seeded.state.k(), 3);

        let seeded =
            initialize(InitPolicy::RandomCentroids, &data, 3, 2, None, &mut rng).unwrap();
        assert!(lloyd::member_counts(&seeded.state.assignment, 3)
            .iter()
            .all(|&c| c > 0));
    }
}
