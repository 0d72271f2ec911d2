//! # Route Optimizer
//!
//! A route optimization engine for field delivery and service planning. Given
//! a list of geographic stops it computes a visiting order that minimizes the
//! total haversine travel distance.
//!
//! Available algorithms:
//! - `default`: 2-opt local search from the input order
//! - `genetic`: tournament selection, order crossover, swap mutation, elitism
//! - `simulated_annealing`: Metropolis acceptance with cooling and reheating
//! - `multi_objective`: Pareto search over distance, priority and lateness
//!
//! Large instances can be decomposed by proximity clustering first. Every run
//! produces the same [`OptimizationMetrics`](metrics::OptimizationMetrics)
//! record so results of different algorithms compare directly. The engine is
//! a pure function of its input and seed and performs no I/O.

pub mod annealing;
pub mod clustering;
pub mod config;
pub mod constraints;
pub mod distance;
pub mod error;
pub mod genetic;
pub mod individual;
pub mod local_search;
pub mod metrics;
pub mod objectives;
pub mod pareto;
pub mod population;
pub mod problem;
pub mod solution;
pub mod solver;
pub mod utils;

pub use crate::config::{Algorithm, Config};
pub use crate::constraints::Constraints;
pub use crate::error::{Error, Result};
pub use crate::metrics::OptimizationMetrics;
pub use crate::problem::Stop;

use crate::clustering::Cluster;
use crate::objectives::RouteObjectives;
use crate::problem::Problem;
use crate::solution::Route;
use crate::solver::{build_solver, Budget, RouteSolver, SearchRng, SearchStats};
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// An optimization request as exchanged with callers and the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub stops: Vec<Stop>,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub config: Config,
}

/// The ordered route and the metrics of the run that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Located stops in optimized order, followed by unlocated stops in input order
    pub route: Vec<Stop>,
    pub metrics: OptimizationMetrics,
}

/// The main engine: validates its configuration once and can then be used for
/// any number of independent, possibly concurrent, optimization calls.
pub struct RouteOptimizer {
    config: Config,
    solver: Box<dyn RouteSolver>,
}

impl RouteOptimizer {
    /// Create an optimizer. Fails if any parameter of the selected algorithm
    /// is out of range.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let solver = build_solver(&config);
        Ok(RouteOptimizer { config, solver })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Order the stops.
    ///
    /// Constraints filter the stop list first. Stops without coordinates are
    /// excluded from optimization and appended in input order. Budget expiry is
    /// not an error: the best route known at that point is returned and the
    /// metrics are marked truncated.
    pub fn optimize(
        &self,
        stops: &[Stop],
        constraints: &Constraints,
    ) -> Result<OptimizationResult> {
        let start_time = Instant::now();

        let candidates = constraints.apply(stops)?;
        let filtered_stop_count = stops.len() - candidates.len();
        let (located, unlocated): (Vec<Stop>, Vec<Stop>) =
            candidates.into_iter().partition(Stop::has_coordinates);

        if !unlocated.is_empty() {
            log::warn!(
                "{} stops without coordinates are appended to the end of the route",
                unlocated.len()
            );
        }

        let problem = Problem::new(located, self.config.return_to_start)?;
        let initial = Route::identity(&problem);

        log::info!(
            "optimizing {} stops with {} (seed {})",
            problem.len(),
            self.solver.algorithm(),
            self.config.seed
        );

        let mut rng = SearchRng::seed_from_u64(self.config.seed);
        let budget = Budget::new(self.config.time_limit);

        let (mut route, stats, cluster_count) = if problem.len() <= 2 {
            // Any ordering of two or fewer stops is optimal.
            let cluster_count = usize::from(!problem.is_empty());
            (initial.clone(), SearchStats::default(), cluster_count)
        } else {
            match self.config.clustering {
                Some(clustering) if problem.len() > clustering.min_stops => {
                    self.solve_clustered(&problem, clustering.radius_km, &mut rng, &budget)
                }
                _ => {
                    let outcome = self.solver.solve(&problem, &initial, &mut rng, &budget);
                    (outcome.route, outcome.stats, 1)
                }
            }
        };

        route.validate(problem.len())?;
        if problem.closed && !route.is_empty() {
            route.rotate_to(0);
        }

        let objectives = RouteObjectives::evaluate(&problem, &route.tour, &self.config.schedule);
        let mut metrics =
            OptimizationMetrics::score(&self.config, initial.distance, route.distance);
        metrics.iterations = stats.iterations;
        metrics.truncated = stats.truncated;
        metrics.details = stats.details;
        metrics.stop_count = problem.len();
        metrics.unlocated_stop_count = unlocated.len();
        metrics.filtered_stop_count = filtered_stop_count;
        metrics.cluster_count = cluster_count;
        metrics.estimated_duration_minutes = objectives.duration_minutes;
        metrics.time_window_violations = objectives.violations;

        let mut ordered: Vec<Stop> = route
            .tour
            .iter()
            .map(|&i| problem.stops[i].clone())
            .collect();
        ordered.extend(unlocated);

        metrics.processing_time_seconds = start_time.elapsed().as_secs_f64();

        log::info!(
            "{}: {:.3} km -> {:.3} km ({:.1}% improvement) in {:.3}s",
            self.config.algorithm,
            metrics.initial_distance,
            metrics.final_distance,
            metrics.improvement_percent,
            metrics.processing_time_seconds
        );

        Ok(OptimizationResult {
            route: ordered,
            metrics,
        })
    }

    /// Optimize each proximity cluster separately, order the clusters by their
    /// centroids and concatenate the cluster paths.
    fn solve_clustered(
        &self,
        problem: &Problem,
        radius_km: f64,
        rng: &mut SearchRng,
        budget: &Budget,
    ) -> (Route, SearchStats, usize) {
        let clusters = clustering::cluster(&problem.stops, radius_km);
        let mut stats = SearchStats::default();

        if clusters.len() == 1 {
            let outcome = self
                .solver
                .solve(problem, &Route::identity(problem), rng, budget);
            return (outcome.route, outcome.stats, 1);
        }

        log::debug!("optimizing {} clusters separately", clusters.len());

        let mut segments: Vec<Vec<usize>> = Vec::with_capacity(clusters.len());
        for cluster in &clusters {
            segments.push(self.solve_cluster(problem, cluster, rng, budget, &mut stats));
        }

        let centroids = clusters
            .iter()
            .map(|cluster| {
                cluster
                    .centroid
                    .unwrap_or_else(|| problem.coordinates[cluster.members[0]])
            })
            .collect();
        let representatives = Problem::from_coordinates(centroids, problem.closed);
        let order = if representatives.len() <= 2 {
            Route::identity(&representatives)
        } else {
            let outcome = self.solver.solve(
                &representatives,
                &Route::identity(&representatives),
                rng,
                budget,
            );
            stats.merge(outcome.stats);
            outcome.route
        };

        let ordered_segments = order.tour.iter().map(|&c| &segments[c]);
        let tour = clustering::stitch_segments(problem, ordered_segments);
        (Route::new(tour, problem), stats, clusters.len())
    }

    fn solve_cluster(
        &self,
        problem: &Problem,
        cluster: &Cluster,
        rng: &mut SearchRng,
        budget: &Budget,
        stats: &mut SearchStats,
    ) -> Vec<usize> {
        if cluster.len() <= 2 {
            return cluster.members.clone();
        }

        let sub = problem.subproblem(&cluster.members);
        let outcome = self.solver.solve(&sub, &Route::identity(&sub), rng, budget);
        stats.merge(outcome.stats);
        outcome.route.map_indices(&cluster.members)
    }
}

/// Convenience wrapper: validate the configuration and run one optimization.
pub fn optimize(
    stops: &[Stop],
    constraints: &Constraints,
    config: Config,
) -> Result<OptimizationResult> {
    RouteOptimizer::new(config)?.optimize(stops, constraints)
}
