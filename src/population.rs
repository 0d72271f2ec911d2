//! Population management for the genetic algorithm.
//!
//! The population is a fixed-capacity arena of individuals plus a second
//! buffer of the same size that receives the next generation. The buffers are
//! swapped each generation so tour allocations are reused.

use crate::config::EvaluationStrategy;
use crate::individual::Individual;
use crate::problem::Problem;
use rand::seq::{index, SliceRandom};
use rand::Rng;
use rayon::prelude::*;

/// Manages the individuals of the genetic algorithm.
pub struct Population {
    /// Current generation
    pub individuals: Vec<Individual>,
    /// Buffer reused for the next generation
    offspring: Vec<Individual>,
    /// Indices into `individuals`, fittest first; valid after `evaluate`
    ranking: Vec<usize>,
    capacity: usize,
    strategy: EvaluationStrategy,
}

impl Population {
    /// Create an empty population with room for `capacity` individuals.
    pub fn new(capacity: usize, strategy: EvaluationStrategy) -> Self {
        Population {
            individuals: Vec::with_capacity(capacity),
            offspring: Vec::with_capacity(capacity),
            ranking: Vec::with_capacity(capacity),
            capacity,
            strategy,
        }
    }

    /// Fill the population with random permutations of the problem's stops.
    pub fn initialize<R: Rng + ?Sized>(&mut self, problem: &Problem, rng: &mut R) {
        self.individuals.clear();
        self.ranking.clear();

        for _ in 0..self.capacity {
            let mut tour: Vec<usize> = (0..problem.len()).collect();
            tour.shuffle(rng);
            self.individuals.push(Individual::new(tour));
        }
    }

    /// Evaluate every stale individual and re-rank the population.
    ///
    /// All evaluations finish before ranking, whichever strategy is used.
    pub fn evaluate(&mut self, problem: &Problem) {
        match self.strategy {
            EvaluationStrategy::Sequential => self
                .individuals
                .iter_mut()
                .filter(|individual| !individual.evaluated)
                .for_each(|individual| individual.evaluate(problem)),
            EvaluationStrategy::Parallel => self
                .individuals
                .par_iter_mut()
                .filter(|individual| !individual.evaluated)
                .for_each(|individual| individual.evaluate(problem)),
        }

        self.update_ranking();
    }

    fn update_ranking(&mut self) {
        let individuals = &self.individuals;
        self.ranking.clear();
        self.ranking.extend(0..individuals.len());
        // Stable sort keeps lower indices first among equal fitness.
        self.ranking
            .sort_by(|&a, &b| individuals[a].cmp_fitness(&individuals[b]));
    }

    /// Number of individuals in the current generation.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// The fittest individual of the current generation.
    pub fn best(&self) -> Option<&Individual> {
        self.ranking.first().map(|&i| &self.individuals[i])
    }

    /// Fitness of the fittest individual, zero for an empty population.
    pub fn best_fitness(&self) -> f64 {
        self.best().map_or(0.0, |individual| individual.fitness)
    }

    /// The `count` fittest individuals, fittest first.
    pub fn elites(&self, count: usize) -> impl Iterator<Item = &Individual> {
        self.ranking
            .iter()
            .take(count)
            .map(move |&i| &self.individuals[i])
    }

    /// Replace the current generation.
    ///
    /// The `elite_size` fittest individuals are copied unchanged; every other
    /// slot is filled by `produce`, which sees the current generation and
    /// writes a new tour into the slot. The caller re-evaluates afterwards.
    pub fn breed<F>(&mut self, elite_size: usize, mut produce: F)
    where
        F: FnMut(&[Individual], &mut Individual),
    {
        let mut next = std::mem::take(&mut self.offspring);
        next.resize_with(self.capacity, || Individual::new(Vec::new()));

        for (slot, &ranked) in next.iter_mut().zip(self.ranking.iter()).take(elite_size) {
            slot.copy_from(&self.individuals[ranked]);
        }

        for slot in next.iter_mut().skip(elite_size) {
            produce(&self.individuals, slot);
            slot.invalidate();
        }

        self.offspring = std::mem::replace(&mut self.individuals, next);
        self.ranking.clear();
    }
}

/// Tournament selection: sample `size` distinct individuals uniformly and
/// return the index of the fittest. Earlier samples win ties.
pub fn tournament_select<R: Rng + ?Sized>(
    individuals: &[Individual],
    size: usize,
    rng: &mut R,
) -> usize {
    if individuals.is_empty() {
        return 0;
    }
    let size = size.clamp(1, individuals.len());

    index::sample(rng, individuals.len(), size)
        .iter()
        .reduce(|best, candidate| {
            if individuals[candidate].fitness > individuals[best].fitness {
                candidate
            } else {
                best
            }
        })
        .unwrap_or(0)
}
