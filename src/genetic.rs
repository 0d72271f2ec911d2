//! Genetic algorithm: order crossover, swap mutation, tournament selection
//! and elitism over a population of tours.

use crate::config::{Algorithm, EvaluationStrategy, GeneticConfig};
use crate::individual::{fitness_of, Individual};
use crate::local_search::LocalSearch;
use crate::metrics::AlgorithmDetails;
use crate::population::{tournament_select, Population};
use crate::problem::Problem;
use crate::solution::Route;
use crate::solver::{Budget, RouteSolver, SearchRng, SearchStats, SolveOutcome};
use rand::Rng;

/// Permutation-preserving genetic operators.
pub struct Genetic;

impl Genetic {
    /// Perform order crossover (OX) between two parent tours.
    pub fn crossover<R: Rng + ?Sized>(
        &self,
        parent1: &[usize],
        parent2: &[usize],
        rng: &mut R,
    ) -> Vec<usize> {
        let mut child = Vec::with_capacity(parent1.len());
        self.crossover_into(parent1, parent2, &mut child, rng);
        child
    }

    /// Order crossover writing into an existing buffer.
    pub fn crossover_into<R: Rng + ?Sized>(
        &self,
        parent1: &[usize],
        parent2: &[usize],
        child: &mut Vec<usize>,
        rng: &mut R,
    ) {
        let size = parent1.len();
        if size < 2 {
            child.clear();
            child.extend_from_slice(parent1);
            return;
        }

        let cut1 = rng.gen_range(0..size);
        let cut2 = rng.gen_range(0..size);
        let (start, end) = if cut1 <= cut2 { (cut1, cut2) } else { (cut2, cut1) };

        self.crossover_with_cuts(parent1, parent2, start, end, child);
    }

    /// Order crossover with fixed cut points.
    ///
    /// `parent1[start..=end]` is copied to the same positions of the child.
    /// The remaining positions are filled, starting after `end` and wrapping
    /// around, with the stops of `parent2` in the order they appear after
    /// `end`, skipping stops already copied. Both parents must be
    /// permutations of `0..n`, and so is the child.
    pub fn crossover_with_cuts(
        &self,
        parent1: &[usize],
        parent2: &[usize],
        start: usize,
        end: usize,
        child: &mut Vec<usize>,
    ) {
        let size = parent1.len();
        child.clear();
        child.resize(size, 0);

        let mut used = vec![false; size];
        for i in start..=end {
            child[i] = parent1[i];
            used[parent1[i]] = true;
        }

        let mut position = (end + 1) % size;
        for offset in 0..size {
            let stop = parent2[(end + 1 + offset) % size];
            if used[stop] {
                continue;
            }
            child[position] = stop;
            used[stop] = true;
            position = (position + 1) % size;
        }
    }

    /// Swap two distinct, randomly chosen positions.
    pub fn mutate<R: Rng + ?Sized>(&self, tour: &mut [usize], rng: &mut R) {
        let size = tour.len();
        if size < 2 {
            return;
        }

        let i = rng.gen_range(0..size);
        let mut j = rng.gen_range(0..size - 1);
        if j >= i {
            j += 1;
        }
        tour.swap(i, j);
    }
}

/// The outcome of a genetic algorithm run.
#[derive(Debug, Clone)]
pub struct GeneticReport {
    /// Best route found, refined by 2-opt when enabled
    pub route: Route,
    /// Generations bred after the initial population
    pub generations: u64,
    /// Fitness of the best individual before refinement
    pub best_fitness: f64,
    /// First generation at which `best_fitness` was reached
    pub convergence_generation: u64,
    /// Stopped because the best fitness stagnated for the convergence window
    pub converged: bool,
    /// Stopped because the budget expired
    pub truncated: bool,
    /// Best fitness of each generation, starting with the initial population
    pub fitness_history: Vec<f64>,
}

/// Population-based search with tournament selection and elitism.
pub struct GeneticAlgorithm {
    pub config: GeneticConfig,
    pub evaluation: EvaluationStrategy,
    pub local_search: LocalSearch,
    genetic: Genetic,
}

impl GeneticAlgorithm {
    pub fn new(
        config: GeneticConfig,
        evaluation: EvaluationStrategy,
        local_search: LocalSearch,
    ) -> Self {
        GeneticAlgorithm {
            config,
            evaluation,
            local_search,
            genetic: Genetic,
        }
    }

    /// Run the genetic algorithm until the generation cap, convergence or
    /// budget expiry.
    pub fn run(&self, problem: &Problem, rng: &mut SearchRng, budget: &Budget) -> GeneticReport {
        let n = problem.len();

        // Every ordering of two or fewer stops is optimal.
        if n <= 2 {
            let route = Route::identity(problem);
            let best_fitness = fitness_of(route.distance);
            return GeneticReport {
                route,
                generations: 0,
                best_fitness,
                convergence_generation: 0,
                converged: true,
                truncated: false,
                fitness_history: Vec::new(),
            };
        }

        let mut population = Population::new(self.config.population_size, self.evaluation);
        population.initialize(problem, rng);
        population.evaluate(problem);

        let mut best = match population.best() {
            Some(individual) => individual.clone(),
            None => Individual::evaluated((0..n).collect(), problem),
        };
        let mut fitness_history = Vec::new();
        fitness_history.push(population.best_fitness());

        let mut generations = 0u64;
        let mut convergence_generation = 0u64;
        let mut stagnant = 0usize;
        let mut converged = false;
        let mut truncated = false;

        for generation in 1..=self.config.generations as u64 {
            if budget.is_exhausted() {
                truncated = true;
                log::warn!(
                    "genetic: time budget expired after {} generations",
                    generations
                );
                break;
            }

            self.next_generation(&mut population, rng);
            population.evaluate(problem);
            generations = generation;

            let current = population.best_fitness();
            fitness_history.push(current);
            log::trace!("genetic: generation {} best fitness {:.6}", generation, current);

            if current > best.fitness {
                if let Some(individual) = population.best() {
                    best.copy_from(individual);
                }
                convergence_generation = generation;
                stagnant = 0;
            } else {
                stagnant += 1;
                if stagnant >= self.config.convergence_window {
                    converged = true;
                    log::debug!(
                        "genetic: converged at generation {} (no improvement for {} generations)",
                        generation,
                        stagnant
                    );
                    break;
                }
            }
        }

        let best_fitness = best.fitness;
        let mut route = Route::new(best.tour, problem);
        if self.config.refine {
            self.local_search.improve(&mut route, problem, budget);
        }

        log::debug!(
            "genetic: {} generations, best {:.3} km, refined {:.3} km",
            generations,
            1.0 / best_fitness,
            route.distance
        );

        GeneticReport {
            route,
            generations,
            best_fitness,
            convergence_generation,
            converged,
            truncated,
            fitness_history,
        }
    }

    /// Breed the next generation: elites carried over, the rest produced by
    /// tournament selection, order crossover and swap mutation.
    fn next_generation(&self, population: &mut Population, rng: &mut SearchRng) {
        let config = self.config;
        let genetic = &self.genetic;

        population.breed(config.elite_size, |current, child| {
            let first = tournament_select(current, config.tournament_size, rng);
            let second = tournament_select(current, config.tournament_size, rng);

            if rng.gen::<f64>() < config.crossover_rate {
                genetic.crossover_into(
                    &current[first].tour,
                    &current[second].tour,
                    &mut child.tour,
                    rng,
                );
            } else {
                child.tour.clone_from(&current[first].tour);
            }

            if rng.gen::<f64>() < config.mutation_rate {
                genetic.mutate(&mut child.tour, rng);
            }
        });
    }
}

impl RouteSolver for GeneticAlgorithm {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Genetic
    }

    fn solve(
        &self,
        problem: &Problem,
        _initial: &Route,
        rng: &mut SearchRng,
        budget: &Budget,
    ) -> SolveOutcome {
        let report = self.run(problem, rng, budget);

        SolveOutcome {
            route: report.route,
            stats: SearchStats {
                iterations: report.generations,
                truncated: report.truncated,
                details: Some(AlgorithmDetails::Genetic {
                    generations: report.generations,
                    best_fitness: report.best_fitness,
                    convergence_generation: report.convergence_generation,
                    converged: report.converged,
                }),
            },
        }
    }
}
