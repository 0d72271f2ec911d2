//! Individual representation for the genetic algorithm population.

use crate::problem::Problem;
use std::cmp::Ordering;

/// Fitness of a route with the given distance: `1 / distance`, with a
/// zero-length route being maximally fit.
pub fn fitness_of(distance: f64) -> f64 {
    if distance <= 0.0 {
        f64::INFINITY
    } else {
        1.0 / distance
    }
}

/// A candidate tour with its cached evaluation.
#[derive(Debug, Clone)]
pub struct Individual {
    /// Stop indices in visiting order
    pub tour: Vec<usize>,
    /// Cached tour distance in kilometres
    pub distance: f64,
    /// Cached fitness, `1 / distance`
    pub fitness: f64,
    /// Whether the cached values match the tour
    pub evaluated: bool,
}

impl Individual {
    /// Create an individual whose evaluation is still pending.
    pub fn new(tour: Vec<usize>) -> Self {
        Individual {
            tour,
            distance: f64::INFINITY,
            fitness: 0.0,
            evaluated: false,
        }
    }

    /// Create an individual and evaluate it immediately.
    pub fn evaluated(tour: Vec<usize>, problem: &Problem) -> Self {
        let mut individual = Individual::new(tour);
        individual.evaluate(problem);
        individual
    }

    /// Recompute distance and fitness from the tour.
    pub fn evaluate(&mut self, problem: &Problem) {
        self.distance = problem.tour_distance(&self.tour);
        self.fitness = fitness_of(self.distance);
        self.evaluated = true;
    }

    /// Mark the cached evaluation stale after the tour changed.
    pub fn invalidate(&mut self) {
        self.evaluated = false;
    }

    /// Overwrite this individual with another, reusing the tour allocation.
    pub fn copy_from(&mut self, other: &Individual) {
        self.tour.clone_from(&other.tour);
        self.distance = other.distance;
        self.fitness = other.fitness;
        self.evaluated = other.evaluated;
    }

    /// Compare by fitness, fitter first.
    pub fn cmp_fitness(&self, other: &Individual) -> Ordering {
        other.fitness.total_cmp(&self.fitness)
    }
}
