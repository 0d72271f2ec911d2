//! Simulated annealing over a single working route.

use crate::config::{Algorithm, AnnealingConfig, CoolingSchedule, NeighborhoodOperator};
use crate::local_search::LocalSearch;
use crate::metrics::{rate, AlgorithmDetails};
use crate::problem::Problem;
use crate::solution::Route;
use crate::solver::{Budget, RouteSolver, SearchRng, SearchStats, SolveOutcome};
use rand::Rng;

/// The outcome of a simulated annealing run.
#[derive(Debug, Clone)]
pub struct AnnealingReport {
    /// Best route ever visited, refined by 2-opt when enabled
    pub route: Route,
    pub iterations: u64,
    pub proposed_moves: u64,
    pub accepted_moves: u64,
    pub temperature_reductions: u64,
    pub reheats: u64,
    /// Iteration at which the best route was first reached
    pub convergence_iteration: u64,
    pub final_temperature: f64,
    pub truncated: bool,
}

impl AnnealingReport {
    pub fn acceptance_rate(&self) -> f64 {
        rate(self.accepted_moves, self.proposed_moves)
    }
}

/// Metropolis search with configurable cooling, neighborhoods and reheating.
pub struct SimulatedAnnealing {
    pub config: AnnealingConfig,
    pub local_search: LocalSearch,
}

impl SimulatedAnnealing {
    pub fn new(config: AnnealingConfig, local_search: LocalSearch) -> Self {
        SimulatedAnnealing {
            config,
            local_search,
        }
    }

    /// Anneal starting from `initial`.
    pub fn run(
        &self,
        problem: &Problem,
        initial: &Route,
        rng: &mut SearchRng,
        budget: &Budget,
    ) -> AnnealingReport {
        self.run_observed(problem, initial, rng, budget, |_| {})
    }

    /// Anneal starting from `initial`, reporting the distance of the working
    /// route to `observe` every time it changes (and once at the start).
    pub fn run_observed<F>(
        &self,
        problem: &Problem,
        initial: &Route,
        rng: &mut SearchRng,
        budget: &Budget,
        mut observe: F,
    ) -> AnnealingReport
    where
        F: FnMut(f64),
    {
        let config = &self.config;
        let n = initial.len();

        let mut current = initial.tour.clone();
        let mut current_distance = problem.tour_distance(&current);
        let mut best = current.clone();
        let mut best_distance = current_distance;
        let mut candidate = Vec::with_capacity(n);
        observe(current_distance);

        let mut report = AnnealingReport {
            route: initial.clone(),
            iterations: 0,
            proposed_moves: 0,
            accepted_moves: 0,
            temperature_reductions: 0,
            reheats: 0,
            convergence_iteration: 0,
            final_temperature: config.initial_temperature,
            truncated: false,
        };

        if n < 3 {
            report.route = Route::new(current, problem);
            return report;
        }

        let mut temperature = config.initial_temperature;
        let mut iteration = 0usize;
        let mut since_improvement = 0usize;

        while temperature > config.final_temperature && iteration < config.max_iterations {
            if budget.is_exhausted() {
                report.truncated = true;
                log::warn!("annealing: time budget expired at iteration {}", iteration);
                break;
            }

            let block_start = iteration;
            for _ in 0..config.iterations_per_temp {
                if iteration >= config.max_iterations {
                    break;
                }
                iteration += 1;

                candidate.clone_from(&current);
                self.apply_operator(&mut candidate, rng);
                let candidate_distance = problem.tour_distance(&candidate);
                let delta = candidate_distance - current_distance;
                report.proposed_moves += 1;

                let accept = delta < 0.0 || rng.gen::<f64>() < (-delta / temperature).exp();
                if accept {
                    std::mem::swap(&mut current, &mut candidate);
                    current_distance = candidate_distance;
                    report.accepted_moves += 1;
                    observe(current_distance);
                }

                if current_distance < best_distance {
                    best.clone_from(&current);
                    best_distance = current_distance;
                    report.convergence_iteration = iteration as u64;
                    since_improvement = 0;
                } else {
                    since_improvement += 1;
                    if since_improvement >= config.reheat_threshold {
                        temperature = (temperature * config.reheat_factor)
                            .min(config.initial_temperature);
                        report.reheats += 1;
                        since_improvement = 0;
                        log::debug!(
                            "annealing: reheated to {:.3} at iteration {}",
                            temperature,
                            iteration
                        );
                    }
                }
            }

            temperature = self.cool(temperature, block_start, iteration);
            report.temperature_reductions += 1;
        }

        report.iterations = iteration as u64;
        report.final_temperature = temperature;

        let mut route = Route {
            tour: best,
            distance: best_distance,
        };
        if config.refine {
            self.local_search.improve(&mut route, problem, budget);
        }
        report.route = route;

        log::debug!(
            "annealing: {} iterations, acceptance {:.3}, {} reheats, best {:.3} km",
            report.iterations,
            report.acceptance_rate(),
            report.reheats,
            report.route.distance
        );

        report
    }

    /// Temperature after the block of iterations `from..to`.
    ///
    /// The linear and logarithmic schedules scale the current temperature by
    /// the ratio of successive schedule values, which reproduces the
    /// closed-form schedule exactly unless a reheat intervened.
    pub fn cool(&self, temperature: f64, from: usize, to: usize) -> f64 {
        match self.config.cooling_schedule {
            CoolingSchedule::Exponential => temperature * self.config.cooling_rate,
            CoolingSchedule::Linear | CoolingSchedule::Logarithmic => {
                let previous = self.schedule_value(from);
                let next = self.schedule_value(to);
                if previous > 0.0 {
                    temperature * next / previous
                } else {
                    next
                }
            }
        }
    }

    /// Closed-form temperature of the configured schedule at `iteration`.
    pub fn schedule_value(&self, iteration: usize) -> f64 {
        let t0 = self.config.initial_temperature;
        let tf = self.config.final_temperature;
        let k = iteration as f64;

        match self.config.cooling_schedule {
            CoolingSchedule::Exponential => {
                let blocks = (iteration / self.config.iterations_per_temp) as i32;
                t0 * self.config.cooling_rate.powi(blocks)
            }
            CoolingSchedule::Linear => {
                let max = self.config.max_iterations as f64;
                (t0 - k * (t0 - tf) / max).max(tf)
            }
            CoolingSchedule::Logarithmic => t0 / (1.0 + (1.0 + k).ln()),
        }
    }

    fn apply_operator(&self, tour: &mut Vec<usize>, rng: &mut SearchRng) {
        let operator = match self.config.neighborhood_operator {
            NeighborhoodOperator::Mixed => match rng.gen_range(0..3) {
                0 => NeighborhoodOperator::Swap,
                1 => NeighborhoodOperator::Insert,
                _ => NeighborhoodOperator::Reverse,
            },
            operator => operator,
        };

        let n = tour.len();
        let (i, j) = distinct_positions(n, rng);

        match operator {
            NeighborhoodOperator::Swap => tour.swap(i, j),
            NeighborhoodOperator::Insert => {
                let stop = tour.remove(i);
                tour.insert(j, stop);
            }
            NeighborhoodOperator::Reverse | NeighborhoodOperator::Mixed => {
                let (start, end) = if i < j { (i, j) } else { (j, i) };
                tour[start..=end].reverse();
            }
        }
    }
}

/// Two different positions in `0..n`, `n >= 2`.
fn distinct_positions(n: usize, rng: &mut SearchRng) -> (usize, usize) {
    let i = rng.gen_range(0..n);
    let mut j = rng.gen_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    (i, j)
}

impl RouteSolver for SimulatedAnnealing {
    fn algorithm(&self) -> Algorithm {
        Algorithm::SimulatedAnnealing
    }

    fn solve(
        &self,
        problem: &Problem,
        initial: &Route,
        rng: &mut SearchRng,
        budget: &Budget,
    ) -> SolveOutcome {
        let report = self.run(problem, initial, rng, budget);

        SolveOutcome {
            stats: SearchStats {
                iterations: report.iterations,
                truncated: report.truncated,
                details: Some(AlgorithmDetails::SimulatedAnnealing {
                    proposed_moves: report.proposed_moves,
                    accepted_moves: report.accepted_moves,
                    acceptance_rate: report.acceptance_rate(),
                    temperature_reductions: report.temperature_reductions,
                    reheats: report.reheats,
                    convergence_iteration: report.convergence_iteration,
                    final_temperature: report.final_temperature,
                }),
            },
            route: report.route,
        }
    }
}
