//! Configuration parameters for the route optimizers.
//!
//! Every struct deserializes with defaults for missing fields, so callers may
//! supply partial JSON. Ranges are checked by `validate` before any search
//! work begins; out-of-range values are rejected, never clamped.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// The optimizer used to order the stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// 2-opt local search from the input order.
    #[default]
    #[serde(alias = "two_opt")]
    Default,
    Genetic,
    SimulatedAnnealing,
    MultiObjective,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Default => "default",
            Algorithm::Genetic => "genetic",
            Algorithm::SimulatedAnnealing => "simulated_annealing",
            Algorithm::MultiObjective => "multi_objective",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "default" | "two_opt" | "2opt" | "2_opt" => Ok(Algorithm::Default),
            "genetic" | "ga" => Ok(Algorithm::Genetic),
            "simulated_annealing" | "sa" | "annealing" => Ok(Algorithm::SimulatedAnnealing),
            "multi_objective" | "nsga2" => Ok(Algorithm::MultiObjective),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Temperature update applied after each block of `iterations_per_temp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoolingSchedule {
    #[default]
    Exponential,
    Linear,
    Logarithmic,
}

/// Move used to generate simulated annealing neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborhoodOperator {
    /// Exchange two stops.
    Swap,
    /// Remove a stop and reinsert it elsewhere.
    Insert,
    /// Reverse a contiguous segment.
    Reverse,
    /// Pick one of the above uniformly at random per move.
    #[default]
    Mixed,
}

/// How a population's fitness values are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStrategy {
    #[default]
    Sequential,
    /// Evaluate individuals on the rayon worker pool.
    Parallel,
}

/// Settings for the 2-opt local search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwoOptConfig {
    /// Maximum number of full improvement passes.
    pub max_passes: usize,
}

impl Default for TwoOptConfig {
    fn default() -> Self {
        TwoOptConfig { max_passes: 1000 }
    }
}

impl TwoOptConfig {
    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes = passes;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_passes == 0 {
            return Err(Error::invalid_config("two_opt.max_passes must be at least 1"));
        }
        Ok(())
    }
}

/// Settings for the genetic algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    /// Number of individuals per generation
    pub population_size: usize,
    /// Upper bound on generations
    pub generations: usize,
    /// Probability of a swap mutation per individual
    pub mutation_rate: f64,
    /// Probability of order crossover per offspring
    pub crossover_rate: f64,
    /// Individuals copied unchanged into the next generation
    pub elite_size: usize,
    /// Individuals sampled per tournament
    pub tournament_size: usize,
    /// Generations without best-fitness improvement before stopping
    pub convergence_window: usize,
    /// Apply 2-opt to the best individual
    pub refine: bool,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        GeneticConfig {
            population_size: 100,
            generations: 500,
            mutation_rate: 0.02,
            crossover_rate: 0.8,
            elite_size: 20,
            tournament_size: 3,
            convergence_window: 20,
            refine: true,
        }
    }
}

impl GeneticConfig {
    pub fn new() -> Self {
        GeneticConfig::default()
    }

    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    pub fn with_elite_size(mut self, size: usize) -> Self {
        self.elite_size = size;
        self
    }

    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    pub fn with_convergence_window(mut self, window: usize) -> Self {
        self.convergence_window = window;
        self
    }

    pub fn with_refine(mut self, refine: bool) -> Self {
        self.refine = refine;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(Error::invalid_config(format!(
                "genetic.population_size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.generations == 0 {
            return Err(Error::invalid_config("genetic.generations must be at least 1"));
        }
        if !(self.mutation_rate > 0.0 && self.mutation_rate < 1.0) {
            return Err(Error::invalid_config(format!(
                "genetic.mutation_rate must be in (0, 1), got {}",
                self.mutation_rate
            )));
        }
        if !(self.crossover_rate > 0.0 && self.crossover_rate <= 1.0) {
            return Err(Error::invalid_config(format!(
                "genetic.crossover_rate must be in (0, 1], got {}",
                self.crossover_rate
            )));
        }
        if self.elite_size >= self.population_size {
            return Err(Error::invalid_config(format!(
                "genetic.elite_size ({}) must be smaller than population_size ({})",
                self.elite_size, self.population_size
            )));
        }
        if self.tournament_size < 2 || self.tournament_size > self.population_size {
            return Err(Error::invalid_config(format!(
                "genetic.tournament_size must be in [2, {}], got {}",
                self.population_size, self.tournament_size
            )));
        }
        if self.convergence_window == 0 {
            return Err(Error::invalid_config(
                "genetic.convergence_window must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Settings for simulated annealing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingConfig {
    pub initial_temperature: f64,
    pub final_temperature: f64,
    /// Multiplier for the exponential schedule
    pub cooling_rate: f64,
    pub max_iterations: usize,
    /// Inner iterations between temperature updates
    pub iterations_per_temp: usize,
    pub cooling_schedule: CoolingSchedule,
    pub neighborhood_operator: NeighborhoodOperator,
    /// Iterations without best improvement before reheating
    pub reheat_threshold: usize,
    /// Temperature multiplier applied on reheat
    pub reheat_factor: f64,
    /// Apply 2-opt to the best route found
    pub refine: bool,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        AnnealingConfig {
            initial_temperature: 1000.0,
            final_temperature: 0.1,
            cooling_rate: 0.95,
            max_iterations: 10000,
            iterations_per_temp: 100,
            cooling_schedule: CoolingSchedule::Exponential,
            neighborhood_operator: NeighborhoodOperator::Mixed,
            reheat_threshold: 1000,
            reheat_factor: 1.5,
            refine: true,
        }
    }
}

impl AnnealingConfig {
    pub fn new() -> Self {
        AnnealingConfig::default()
    }

    pub fn with_initial_temperature(mut self, temperature: f64) -> Self {
        self.initial_temperature = temperature;
        self
    }

    pub fn with_final_temperature(mut self, temperature: f64) -> Self {
        self.final_temperature = temperature;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    pub fn with_iterations_per_temp(mut self, iterations: usize) -> Self {
        self.iterations_per_temp = iterations;
        self
    }

    pub fn with_cooling_schedule(mut self, schedule: CoolingSchedule) -> Self {
        self.cooling_schedule = schedule;
        self
    }

    pub fn with_neighborhood_operator(mut self, operator: NeighborhoodOperator) -> Self {
        self.neighborhood_operator = operator;
        self
    }

    pub fn with_reheat_threshold(mut self, threshold: usize) -> Self {
        self.reheat_threshold = threshold;
        self
    }

    pub fn with_reheat_factor(mut self, factor: f64) -> Self {
        self.reheat_factor = factor;
        self
    }

    pub fn with_refine(mut self, refine: bool) -> Self {
        self.refine = refine;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.final_temperature > 0.0 && self.final_temperature.is_finite()) {
            return Err(Error::invalid_config(format!(
                "annealing.final_temperature must be positive, got {}",
                self.final_temperature
            )));
        }
        if !(self.initial_temperature > self.final_temperature
            && self.initial_temperature.is_finite())
        {
            return Err(Error::invalid_config(format!(
                "annealing.initial_temperature ({}) must exceed final_temperature ({})",
                self.initial_temperature, self.final_temperature
            )));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(Error::invalid_config(format!(
                "annealing.cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::invalid_config(
                "annealing.max_iterations must be at least 1",
            ));
        }
        if self.iterations_per_temp == 0 {
            return Err(Error::invalid_config(
                "annealing.iterations_per_temp must be at least 1",
            ));
        }
        if self.reheat_threshold == 0 {
            return Err(Error::invalid_config(
                "annealing.reheat_threshold must be at least 1",
            ));
        }
        if !(self.reheat_factor > 1.0 && self.reheat_factor.is_finite()) {
            return Err(Error::invalid_config(format!(
                "annealing.reheat_factor must be greater than 1, got {}",
                self.reheat_factor
            )));
        }
        Ok(())
    }
}

/// Settings for the Pareto-based multi-objective search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiObjectiveConfig {
    pub population_size: usize,
    pub generations: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
}

impl Default for MultiObjectiveConfig {
    fn default() -> Self {
        MultiObjectiveConfig {
            population_size: 60,
            generations: 200,
            crossover_rate: 0.9,
            mutation_rate: 0.1,
        }
    }
}

impl MultiObjectiveConfig {
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.population_size < 4 {
            return Err(Error::invalid_config(format!(
                "multi_objective.population_size must be at least 4, got {}",
                self.population_size
            )));
        }
        if self.generations == 0 {
            return Err(Error::invalid_config(
                "multi_objective.generations must be at least 1",
            ));
        }
        if !(self.crossover_rate > 0.0 && self.crossover_rate <= 1.0) {
            return Err(Error::invalid_config(format!(
                "multi_objective.crossover_rate must be in (0, 1], got {}",
                self.crossover_rate
            )));
        }
        if !(self.mutation_rate > 0.0 && self.mutation_rate < 1.0) {
            return Err(Error::invalid_config(format!(
                "multi_objective.mutation_rate must be in (0, 1), got {}",
                self.mutation_rate
            )));
        }
        Ok(())
    }
}

/// Settings for the proximity clustering preprocessor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Linking distance in kilometres. Non-positive values give singletons.
    pub radius_km: f64,
    /// Only decompose instances with more located stops than this.
    pub min_stops: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        ClusteringConfig {
            radius_km: 2.0,
            min_stops: 12,
        }
    }
}

impl ClusteringConfig {
    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn with_min_stops(mut self, min_stops: usize) -> Self {
        self.min_stops = min_stops;
        self
    }
}

/// Travel assumptions used to derive arrival times along a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub average_speed_kmh: f64,
    /// Time spent at each stop
    pub service_minutes: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            average_speed_kmh: 40.0,
            service_minutes: 5.0,
        }
    }
}

impl ScheduleConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.average_speed_kmh > 0.0 && self.average_speed_kmh.is_finite()) {
            return Err(Error::invalid_config(format!(
                "schedule.average_speed_kmh must be positive, got {}",
                self.average_speed_kmh
            )));
        }
        if !(self.service_minutes >= 0.0 && self.service_minutes.is_finite()) {
            return Err(Error::invalid_config(format!(
                "schedule.service_minutes must be non-negative, got {}",
                self.service_minutes
            )));
        }
        Ok(())
    }
}

/// Top-level configuration for one optimization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub algorithm: Algorithm,
    /// Seed for the random number generator threaded through the search
    pub seed: u64,
    /// Optional wall-clock budget, checked at generation/iteration boundaries
    pub time_limit: Option<Duration>,
    /// Include the leg from the last stop back to the first
    pub return_to_start: bool,
    /// Decompose large instances by proximity before optimizing
    pub clustering: Option<ClusteringConfig>,
    pub evaluation: EvaluationStrategy,
    pub two_opt: TwoOptConfig,
    pub genetic: GeneticConfig,
    pub annealing: AnnealingConfig,
    pub multi_objective: MultiObjectiveConfig,
    pub schedule: ScheduleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            algorithm: Algorithm::Default,
            seed: 42,
            time_limit: None,
            return_to_start: false,
            clustering: None,
            evaluation: EvaluationStrategy::Sequential,
            two_opt: TwoOptConfig::default(),
            genetic: GeneticConfig::default(),
            annealing: AnnealingConfig::default(),
            multi_objective: MultiObjectiveConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }

    pub fn with_return_to_start(mut self, return_to_start: bool) -> Self {
        self.return_to_start = return_to_start;
        self
    }

    pub fn with_clustering(mut self, clustering: ClusteringConfig) -> Self {
        self.clustering = Some(clustering);
        self
    }

    pub fn with_evaluation(mut self, evaluation: EvaluationStrategy) -> Self {
        self.evaluation = evaluation;
        self
    }

    pub fn with_two_opt(mut self, two_opt: TwoOptConfig) -> Self {
        self.two_opt = two_opt;
        self
    }

    pub fn with_genetic(mut self, genetic: GeneticConfig) -> Self {
        self.genetic = genetic;
        self
    }

    pub fn with_annealing(mut self, annealing: AnnealingConfig) -> Self {
        self.annealing = annealing;
        self
    }

    pub fn with_multi_objective(mut self, multi_objective: MultiObjectiveConfig) -> Self {
        self.multi_objective = multi_objective;
        self
    }

    pub fn with_schedule(mut self, schedule: ScheduleConfig) -> Self {
        self.schedule = schedule;
        self
    }

    /// Validate the settings of the selected algorithm and shared sections.
    ///
    /// 2-opt settings are always checked since every metaheuristic finishes
    /// with a 2-opt pass.
    pub fn validate(&self) -> Result<()> {
        self.two_opt.validate()?;
        self.schedule.validate()?;

        match self.algorithm {
            Algorithm::Default => {}
            Algorithm::Genetic => self.genetic.validate()?,
            Algorithm::SimulatedAnnealing => self.annealing.validate()?,
            Algorithm::MultiObjective => self.multi_objective.validate()?,
        }

        Ok(())
    }
}
