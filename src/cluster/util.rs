use std::collections::HashSet;

use crate::error::{Error, Result};

#[inline]
pub(crate) fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Check a dataset for a k-means run and return its dimensionality.
///
/// Rejects empty input, zero-dimensional or ragged points, non-finite
/// coordinates, `k` outside `[1, n]`, and data spread so wide that squared
/// distances or the total inertia would overflow.
pub(crate) fn validate(data: &[Vec<f64>], k: usize) -> Result<usize> {
    let n = data.len();
    if n == 0 {
        return Err(Error::EmptyInput);
    }
    if k == 0 || k > n {
        return Err(Error::InvalidClusterCount {
            requested: k,
            n_items: n,
        });
    }

    let d = validate_points(data, None)?;
    check_span(data, d)?;
    Ok(d)
}

/// Every squared distance between points in the data's bounding box, summed
/// over all points, must stay finite. Otherwise all distances compare equal as
/// `inf` and nearest-centroid assignment degenerates.
fn check_span(data: &[Vec<f64>], d: usize) -> Result<()> {
    let (lo, hi) = value_range(data);
    let span = hi - lo;
    if (span * span * d as f64 * data.len() as f64).is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name: "data",
            message: "coordinate span too large: squared distances overflow",
        })
    }
}

/// Check that every point has the same finite dimensionality.
///
/// With `expected = None` the first point fixes the dimension.
pub(crate) fn validate_points(data: &[Vec<f64>], expected: Option<usize>) -> Result<usize> {
    let d = match (expected, data.first()) {
        (Some(d), _) => d,
        (None, Some(first)) => first.len(),
        (None, None) => return Err(Error::EmptyInput),
    };
    if d == 0 {
        return Err(Error::InvalidParameter {
            name: "data",
            message: "points must have at least one dimension",
        });
    }

    for (i, point) in data.iter().enumerate() {
        if point.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: point.len(),
            });
        }
        if let Some(j) = point.iter().position(|x| !x.is_finite()) {
            return Err(Error::NonFiniteValue { point: i, dim: j });
        }
    }
    Ok(d)
}

/// Smallest and largest coordinate over every dimension of every point.
///
/// One scalar pair for the whole dataset, not per-dimension bounds.
pub(crate) fn value_range(data: &[Vec<f64>]) -> (f64, f64) {
    data.iter()
        .flat_map(|p| p.iter().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        })
}

/// Number of pairwise-distinct points (`-0.0` and `0.0` compare equal).
pub(crate) fn count_distinct(data: &[Vec<f64>]) -> usize {
    let mut seen: HashSet<Vec<u64>> = HashSet::with_capacity(data.len());
    for point in data {
        let key = point
            .iter()
            .map(|&x| if x == 0.0 { 0u64 } else { x.to_bits() })
            .collect();
        seen.insert(key);
    }
    seen.len()
}
