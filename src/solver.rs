//! The interface shared by every route optimizer.

use crate::annealing::SimulatedAnnealing;
use crate::config::{Algorithm, Config};
use crate::genetic::GeneticAlgorithm;
use crate::local_search::LocalSearch;
use crate::metrics::AlgorithmDetails;
use crate::pareto::MultiObjectiveSearch;
use crate::problem::Problem;
use crate::solution::Route;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};

/// The random number generator threaded through every search.
pub type SearchRng = ChaCha8Rng;

/// A cooperative wall-clock budget, checked only at safe loop boundaries.
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    deadline: Option<Instant>,
}

impl Budget {
    pub fn new(time_limit: Option<Duration>) -> Self {
        Budget {
            deadline: time_limit.and_then(|limit| Instant::now().checked_add(limit)),
        }
    }

    pub fn unlimited() -> Self {
        Budget { deadline: None }
    }

    pub fn is_exhausted(&self) -> bool {
        self.deadline.map_or(false, |deadline| Instant::now() >= deadline)
    }
}

/// Counters reported by one or more solver runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    /// Passes, generations or annealing iterations, depending on the solver
    pub iterations: u64,
    /// The run stopped because the budget expired
    pub truncated: bool,
    pub details: Option<AlgorithmDetails>,
}

impl SearchStats {
    /// Fold the counters of another run (e.g. another cluster) into these.
    pub fn merge(&mut self, other: SearchStats) {
        self.iterations += other.iterations;
        self.truncated |= other.truncated;
        self.details = match (self.details.take(), other.details) {
            (Some(mut mine), Some(theirs)) => {
                mine.absorb(theirs);
                Some(mine)
            }
            (mine, theirs) => mine.or(theirs),
        };
    }
}

/// The result of a single solver call.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub route: Route,
    pub stats: SearchStats,
}

/// An optimizer that reorders the stops of a problem.
///
/// Implementations must return a permutation of the problem's stops and stop
/// promptly once the budget is exhausted. Instances with fewer than three
/// stops are returned unchanged.
pub trait RouteSolver: Send + Sync {
    fn algorithm(&self) -> Algorithm;

    fn solve(
        &self,
        problem: &Problem,
        initial: &Route,
        rng: &mut SearchRng,
        budget: &Budget,
    ) -> SolveOutcome;
}

/// Build the solver selected by the configuration.
pub fn build_solver(config: &Config) -> Box<dyn RouteSolver> {
    let local_search = LocalSearch::new(config.two_opt);

    match config.algorithm {
        Algorithm::Default => Box::new(local_search),
        Algorithm::Genetic => Box::new(GeneticAlgorithm::new(
            config.genetic,
            config.evaluation,
            local_search,
        )),
        Algorithm::SimulatedAnnealing => {
            Box::new(SimulatedAnnealing::new(config.annealing, local_search))
        }
        Algorithm::MultiObjective => Box::new(MultiObjectiveSearch::new(
            config.multi_objective,
            config.schedule,
        )),
    }
}
