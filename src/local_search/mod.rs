//! 2-opt local search.

pub mod two_opt;
pub mod utils;

use crate::config::{Algorithm, TwoOptConfig};
use crate::metrics::AlgorithmDetails;
use crate::problem::Problem;
use crate::solution::Route;
use crate::solver::{Budget, RouteSolver, SearchRng, SearchStats, SolveOutcome};

/// Counters of one 2-opt run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TwoOptReport {
    /// Full scans over all segment reversals
    pub passes: u64,
    /// Reversals applied
    pub improving_moves: u64,
    /// Stopped at the pass cap or budget before reaching a local optimum
    pub truncated: bool,
}

/// Edge-exchange improvement to a 2-opt local optimum.
#[derive(Debug, Clone, Copy)]
pub struct LocalSearch {
    pub config: TwoOptConfig,
}

impl LocalSearch {
    pub fn new(config: TwoOptConfig) -> Self {
        LocalSearch { config }
    }

    /// Improve a route in place. The resulting distance is never larger than
    /// the starting distance.
    pub fn improve(&self, route: &mut Route, problem: &Problem, budget: &Budget) -> TwoOptReport {
        let mut report = TwoOptReport::default();

        if route.len() < 3 {
            return report;
        }

        let starting_distance = route.distance;
        loop {
            if report.passes as usize >= self.config.max_passes {
                report.truncated = true;
                break;
            }
            if budget.is_exhausted() {
                report.truncated = true;
                break;
            }

            report.passes += 1;
            let moves = self.two_opt_pass(route, problem);
            report.improving_moves += moves;

            if moves == 0 {
                break;
            }
        }

        if report.improving_moves > 0 {
            // Discard accumulated rounding from the incremental deltas.
            route.evaluate(problem);
        }

        log::trace!(
            "2-opt: {:.3} -> {:.3} km in {} passes, {} moves",
            starting_distance,
            route.distance,
            report.passes,
            report.improving_moves
        );

        report
    }
}

impl RouteSolver for LocalSearch {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Default
    }

    fn solve(
        &self,
        problem: &Problem,
        initial: &Route,
        _rng: &mut SearchRng,
        budget: &Budget,
    ) -> SolveOutcome {
        let mut route = initial.clone();
        let report = self.improve(&mut route, problem, budget);

        SolveOutcome {
            route,
            stats: SearchStats {
                iterations: report.passes,
                truncated: report.truncated && budget.is_exhausted(),
                details: Some(AlgorithmDetails::TwoOpt {
                    passes: report.passes,
                    improving_moves: report.improving_moves,
                }),
            },
        }
    }
}
