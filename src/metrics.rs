//! Scoring of optimizer output into a uniform, comparable metrics record.

use crate::config::{Algorithm, Config};
use serde::{Deserialize, Serialize};

/// Counters specific to one algorithm family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlgorithmDetails {
    TwoOpt {
        passes: u64,
        improving_moves: u64,
    },
    Genetic {
        generations: u64,
        /// Fitness (1 / km) of the best individual before refinement, the
        /// lowest over all clusters when the instance was decomposed
        best_fitness: f64,
        /// First generation at which the final best fitness was reached
        convergence_generation: u64,
        converged: bool,
    },
    SimulatedAnnealing {
        proposed_moves: u64,
        accepted_moves: u64,
        acceptance_rate: f64,
        temperature_reductions: u64,
        reheats: u64,
        convergence_iteration: u64,
        final_temperature: f64,
    },
    MultiObjective {
        generations: u64,
        /// Size of the first front of the last search run
        front_size: usize,
    },
}

impl AlgorithmDetails {
    /// Combine the counters of two runs of the same algorithm.
    ///
    /// Counts are summed and rates are recomputed from the summed counts.
    /// Final temperature and front size come from the last run.
    /// Details of a different algorithm family are ignored.
    pub fn absorb(&mut self, other: AlgorithmDetails) {
        match (self, other) {
            (
                AlgorithmDetails::TwoOpt {
                    passes,
                    improving_moves,
                },
                AlgorithmDetails::TwoOpt {
                    passes: p,
                    improving_moves: m,
                },
            ) => {
                *passes += p;
                *improving_moves += m;
            }
            (
                AlgorithmDetails::Genetic {
                    generations,
                    best_fitness,
                    convergence_generation,
                    converged,
                },
                AlgorithmDetails::Genetic {
                    generations: g,
                    best_fitness: f,
                    convergence_generation: c,
                    converged: done,
                },
            ) => {
                *generations += g;
                *best_fitness = best_fitness.min(f);
                *convergence_generation = (*convergence_generation).max(c);
                *converged &= done;
            }
            (
                AlgorithmDetails::SimulatedAnnealing {
                    proposed_moves,
                    accepted_moves,
                    acceptance_rate,
                    temperature_reductions,
                    reheats,
                    convergence_iteration,
                    final_temperature,
                },
                AlgorithmDetails::SimulatedAnnealing {
                    proposed_moves: p,
                    accepted_moves: a,
                    temperature_reductions: t,
                    reheats: r,
                    convergence_iteration: c,
                    final_temperature: f,
                    ..
                },
            ) => {
                *proposed_moves += p;
                *accepted_moves += a;
                *acceptance_rate = rate(*accepted_moves, *proposed_moves);
                *temperature_reductions += t;
                *reheats += r;
                *convergence_iteration = (*convergence_iteration).max(c);
                *final_temperature = f;
            }
            (
                AlgorithmDetails::MultiObjective {
                    generations,
                    front_size,
                },
                AlgorithmDetails::MultiObjective {
                    generations: g,
                    front_size: s,
                },
            ) => {
                *generations += g;
                *front_size = s;
            }
            _ => {}
        }
    }
}

/// Ratio of two counters, zero when nothing was proposed.
pub fn rate(accepted: u64, proposed: u64) -> f64 {
    if proposed == 0 {
        0.0
    } else {
        accepted as f64 / proposed as f64
    }
}

/// Relative distance reduction in percent, zero when there was nothing to reduce.
pub fn improvement_percent(initial_distance: f64, final_distance: f64) -> f64 {
    if initial_distance <= 0.0 {
        return 0.0;
    }
    (initial_distance - final_distance) / initial_distance * 100.0
}

/// The outcome record of one optimization call. Every algorithm fills the
/// same base fields, so records can be compared directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationMetrics {
    pub algorithm: Algorithm,
    pub initial_distance: f64,
    pub final_distance: f64,
    pub improvement_percent: f64,
    /// Passes, generations or annealing iterations, summed over clusters
    pub iterations: u64,
    pub processing_time_seconds: f64,
    /// Located stops that were optimized
    pub stop_count: usize,
    /// Stops without coordinates, appended after the optimized stops
    pub unlocated_stop_count: usize,
    /// Stops removed by constraints
    pub filtered_stop_count: usize,
    /// Clusters optimized separately, 1 when clustering was not applied
    pub cluster_count: usize,
    /// The time budget expired before the search finished
    pub truncated: bool,
    pub estimated_duration_minutes: f64,
    pub time_window_violations: usize,
    pub details: Option<AlgorithmDetails>,
    /// The configuration the run used
    pub config: Config,
}

impl OptimizationMetrics {
    /// Metrics for a run with no located stops.
    pub fn empty(config: &Config) -> Self {
        OptimizationMetrics {
            algorithm: config.algorithm,
            initial_distance: 0.0,
            final_distance: 0.0,
            improvement_percent: 0.0,
            iterations: 0,
            processing_time_seconds: 0.0,
            stop_count: 0,
            unlocated_stop_count: 0,
            filtered_stop_count: 0,
            cluster_count: 0,
            truncated: false,
            estimated_duration_minutes: 0.0,
            time_window_violations: 0,
            details: None,
            config: config.clone(),
        }
    }

    /// Score a run from its initial and final distances.
    pub fn score(config: &Config, initial_distance: f64, final_distance: f64) -> Self {
        OptimizationMetrics {
            initial_distance,
            final_distance,
            improvement_percent: improvement_percent(initial_distance, final_distance),
            ..OptimizationMetrics::empty(config)
        }
    }
}
