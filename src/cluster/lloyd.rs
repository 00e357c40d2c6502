//! The two alternating Lloyd steps and the state they share.
//!
//! A run owns one [`RunState`]; the driver in `kmeans.rs` hands it by
//! reference to each step, so no state outlives a single clustering call.

use super::util::squared_euclidean;
use crate::error::{Error, Result};

/// Working buffers of a single clustering run.
#[derive(Debug, Clone)]
pub(crate) struct RunState {
    /// `assignment[i]` is the cluster id of point `i`.
    pub(crate) assignment: Vec<usize>,
    /// One centroid per cluster, `k x d`.
    pub(crate) centroids: Vec<Vec<f64>>,
}

impl RunState {
    /// Fresh state: every point in cluster 0, every centroid at the origin.
    pub(crate) fn new(n: usize, k: usize, d: usize) -> Self {
        Self {
            assignment: vec![0; n],
            centroids: vec![vec![0.0; d]; k],
        }
    }

    pub(crate) fn with_assignment(assignment: Vec<usize>, k: usize, d: usize) -> Self {
        Self {
            assignment,
            centroids: vec![vec![0.0; d]; k],
        }
    }

    #[inline]
    pub(crate) fn k(&self) -> usize {
        self.centroids.len()
    }
}

/// Number of points per cluster.
pub(crate) fn member_counts(assignment: &[usize], k: usize) -> Vec<usize> {
    let mut counts = vec![0usize; k];
    for &c in assignment {
        counts[c] += 1;
    }
    counts
}

/// Recompute every centroid as the mean of its members.
///
/// Sums and counts are accumulated in one pass, then divided. Centroids are
/// only overwritten once every new mean is known to be well defined: the
/// first empty id is reported as [`Error::DegenerateCluster`], the first id
/// whose sum overflowed as [`Error::NonFiniteCentroid`], and in both cases the
/// previous centroids are left untouched.
pub(crate) fn update_centroids(data: &[Vec<f64>], state: &mut RunState) -> Result<()> {
    let k = state.k();
    let d = state.centroids.first().map_or(0, Vec::len);

    let mut means = vec![vec![0.0f64; d]; k];
    let mut counts = vec![0usize; k];
    for (point, &c) in data.iter().zip(state.assignment.iter()) {
        counts[c] += 1;
        for (s, x) in means[c].iter_mut().zip(point.iter()) {
            *s += x;
        }
    }

    if let Some(cluster) = counts.iter().position(|&c| c == 0) {
        return Err(Error::DegenerateCluster { cluster });
    }

    for (cluster, (mean, &count)) in means.iter_mut().zip(counts.iter()).enumerate() {
        let count = count as f64;
        for x in mean.iter_mut() {
            *x /= count;
        }
        if !mean.iter().all(|x| x.is_finite()) {
            return Err(Error::NonFiniteCentroid { cluster });
        }
    }

    state.centroids = means;
    Ok(())
}

/// Move every point to its nearest centroid.
///
/// The incumbent cluster is the starting best, and a later centroid only wins on
/// a strictly smaller distance, so ties never move a point. Returns whether any
/// point changed cluster.
pub(crate) fn reassign(data: &[Vec<f64>], state: &mut RunState) -> bool {
    let mut changed = false;
    for (point, label) in data.iter().zip(state.assignment.iter_mut()) {
        let prior = *label;
        let mut best = prior;
        let mut best_dist = squared_euclidean(point, &state.centroids[prior]);

        for (c, centroid) in state.centroids.iter().enumerate() {
            let dist = squared_euclidean(point, centroid);
            if dist < best_dist {
                best_dist = dist;
                best = c;
            }
        }

        if best != prior {
            *label = best;
            changed = true;
        }
    }
    changed
}

/// Within-cluster sum of squared distances to the current centroids.
pub(crate) fn inertia(data: &[Vec<f64>], state: &RunState) -> f64 {
    data.iter()
        .zip(state.assignment.iter())
        .map(|(point, &c)| squared_euclidean(point, &state.centroids[c]))
        .sum()
}

/// Give every empty cluster one point, taken from clusters that can spare it.
///
/// For each empty id, the point farthest from its current centroid among
/// clusters with more than one member moves over. Its own term drops to zero
/// once centroids are recomputed, so inertia does not grow. Returns the number
/// of points moved.
pub(crate) fn reseed_empty(data: &[Vec<f64>], state: &mut RunState) -> usize {
    let k = state.k();
    let mut counts = member_counts(&state.assignment, k);
    let mut moved = 0;

    for empty in 0..k {
        if counts[empty] != 0 {
            continue;
        }

        let mut donor: Option<(usize, f64)> = None;
        for (i, point) in data.iter().enumerate() {
            let c = state.assignment[i];
            if counts[c] < 2 {
                continue;
            }
            let dist = squared_euclidean(point, &state.centroids[c]);
            if donor.map_or(true, |(_, best)| dist > best) {
                donor = Some((i, dist));
            }
        }

        // k <= n guarantees a cluster with a spare member while one is empty.
        let Some((i, _)) = donor else { break };
        counts[state.assignment[i]] -= 1;
        counts[empty] += 1;
        state.assignment[i] = empty;
        moved += 1;
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Vec<Vec<f64>> {
        vec![vec![0.0], vec![1.0], vec![10.0], vec![11.0]]
    }

    #[test]
    fn centroids_are_member_means() {
        let data = line();
        let mut state = RunState::with_assignment(vec![0, 0, 1, 1], 2, 1);
        update_centroids(&data, &mut state).unwrap();
        assert_eq!(state.centroids, vec![vec![0.5], vec![10.5]]);
    }

    #[test]
    fn centroids_are_fully_recomputed() {
        let data = line();
        let mut state = RunState::with_assignment(vec![0, 1, 1, 1], 2, 1);
        state.centroids = vec![vec![100.0], vec![-100.0]];
        update_centroids(&data, &mut state).unwrap();
        assert_eq!(state.centroids[0], vec![0.0]);
        assert!((state.centroids[1][0] - 22.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_cluster_is_reported_not_divided() {
        let data = line();
        let mut state = RunState::with_assignment(vec![0, 0, 2, 2], 3, 1);
        state.centroids = vec![vec![7.0], vec![8.0], vec![9.0]];

        let err = update_centroids(&data, &mut state).unwrap_err();
        assert_eq!(err, Error::DegenerateCluster { cluster: 1 });
        // Nothing was overwritten.
        assert_eq!(state.centroids, vec![vec![7.0], vec![8.0], vec![9.0]]);
    }

    #[test]
    fn overflowing_sum_is_reported_not_stored() {
        let data = vec![vec![1.5e308], vec![1.5e308], vec![0.0]];
        let mut state = RunState::with_assignment(vec![0, 0, 1], 2, 1);
        state.centroids = vec![vec![1.0], vec![2.0]];

        let err = update_centroids(&data, &mut state).unwrap_err();
        assert_eq!(err, Error::NonFiniteCentroid { cluster: 0 });
        assert_eq!(state.centroids, vec![vec![1.0], vec![2.0]]);
    }

    #[test]
    fn reassign_moves_to_nearest() {
        let data = line();
        let mut state = RunState::with_assignment(vec![1, 1, 0, 0], 2, 1);
        state.centroids = vec![vec![0.5], vec![10.5]];

        assert!(reassign(&data, &mut state));
        assert_eq!(state.assignment, vec![0, 0, 1, 1]);
        assert!(!reassign(&data, &mut state));
    }

    #[test]
    fn reassign_ties_keep_incumbent() {
        // Point 0 sits exactly between both centroids.
        let data = vec![vec![5.0], vec![5.0]];
        let mut state = RunState::with_assignment(vec![1, 0], 2, 1);
        state.centroids = vec![vec![0.0], vec![10.0]];

        assert!(!reassign(&data, &mut state));
        assert_eq!(state.assignment, vec![1, 0]);
    }

    #[test]
    fn reassign_ties_between_challengers_pick_first() {
        let data = vec![vec![5.0]];
        let mut state = RunState::with_assignment(vec![2], 3, 1);
        state.centroids = vec![vec![4.0], vec![6.0], vec![100.0]];

        assert!(reassign(&data, &mut state));
        assert_eq!(state.assignment, vec![0]);
    }

    #[test]
    fn inertia_sums_squared_distances() {
        let data = line();
        let mut state = RunState::with_assignment(vec![0, 0, 1, 1], 2, 1);
        state.centroids = vec![vec![0.5], vec![10.5]];
        assert!((inertia(&data, &state) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reseed_fills_every_empty_cluster() {
        let data = vec![vec![0.0], vec![1.0], vec![2.0], vec![50.0]];
        let mut state = RunState::with_assignment(vec![0, 0, 0, 0], 3, 1);
        state.centroids = vec![vec![0.0], vec![0.0], vec![0.0]];

        let moved = reseed_empty(&data, &mut state);
        assert_eq!(moved, 2);
        // The farthest point goes first.
        assert_eq!(state.assignment[3], 1);
        assert_eq!(state.assignment[2], 2);
        assert!(member_counts(&state.assignment, 3).iter().all(|&c| c > 0));
        update_centroids(&data, &mut state).unwrap();
    }

    #[test]
    fn member_counts_tally() {
        assert_eq!(member_counts(&[0, 2, 2, 1, 2], 4), vec![1, 1, 3, 0]);
    }
}
