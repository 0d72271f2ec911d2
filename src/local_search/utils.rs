//! Move evaluation helpers shared by the local search and annealing moves.

use crate::problem::Problem;

/// Improvements smaller than this (km) are treated as noise.
pub const IMPROVEMENT_EPSILON: f64 = 1e-10;

/// Change in tour distance from reversing `tour[start..=end]`.
///
/// Only the two boundary edges change because distances are symmetric. On an
/// open path a boundary at either end of the tour has no edge; on a closed tour
/// the tour wraps around.
pub fn reversal_delta(problem: &Problem, tour: &[usize], start: usize, end: usize) -> f64 {
    let n = tour.len();
    if start >= end || end >= n {
        return 0.0;
    }
    if problem.closed && start == 0 && end == n - 1 {
        return 0.0;
    }

    let prev = if start > 0 {
        Some(tour[start - 1])
    } else if problem.closed {
        Some(tour[n - 1])
    } else {
        None
    };
    let next = if end + 1 < n {
        Some(tour[end + 1])
    } else if problem.closed {
        Some(tour[0])
    } else {
        None
    };

    let first = tour[start];
    let last = tour[end];
    let mut delta = 0.0;

    if let Some(p) = prev {
        delta += problem.get_distance(p, last) - problem.get_distance(p, first);
    }
    if let Some(q) = next {
        delta += problem.get_distance(first, q) - problem.get_distance(last, q);
    }

    delta
}

/// Reverse `tour[start..=end]` in place.
pub fn apply_reversal(tour: &mut [usize], start: usize, end: usize) {
    tour[start..=end].reverse();
}
