//! The 2-opt neighborhood: reversal of a contiguous segment.

use crate::problem::Problem;
use crate::solution::Route;

use super::utils::{apply_reversal, reversal_delta, IMPROVEMENT_EPSILON};
use super::LocalSearch;

impl LocalSearch {
    /// Scan every segment reversal once, applying each strictly improving
    /// move as soon as it is found. Returns the number of moves applied.
    ///
    /// On a closed tour the first stop stays in place; reversing a segment
    /// containing it is equivalent to reversing the complementary segment.
    pub fn two_opt_pass(&self, route: &mut Route, problem: &Problem) -> u64 {
        let n = route.tour.len();
        if n < 3 {
            return 0;
        }

        let first_start = if problem.closed { 1 } else { 0 };
        let mut moves = 0;

        for start in first_start..n - 1 {
            for end in start + 1..n {
                if start == 0 && end == n - 1 {
                    // Reversing a whole open path leaves its length unchanged.
                    continue;
                }

                let delta = reversal_delta(problem, &route.tour, start, end);
                if delta < -IMPROVEMENT_EPSILON {
                    apply_reversal(&mut route.tour, start, end);
                    route.distance += delta;
                    moves += 1;
                }
            }
        }

        moves
    }
}
