//! Multi-objective search: an NSGA-II style genetic algorithm trading off
//! distance, visiting priority and time-window lateness.

use crate::config::{Algorithm, MultiObjectiveConfig, ScheduleConfig};
use crate::genetic::Genetic;
use crate::metrics::AlgorithmDetails;
use crate::objectives::RouteObjectives;
use crate::problem::Problem;
use crate::solution::Route;
use crate::solver::{Budget, RouteSolver, SearchRng, SearchStats, SolveOutcome};
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;

/// Sort objective vectors into non-dominated fronts.
///
/// Front 0 holds the points no other point dominates, front 1 those dominated
/// only by front 0, and so on. Indices within a front are ascending.
pub fn non_dominated_sort(objectives: &[RouteObjectives]) -> Vec<Vec<usize>> {
    let n = objectives.len();
    let mut dominated_by_count = vec![0usize; n];
    let mut dominates: Vec<Vec<usize>> = vec![Vec::new(); n];

    for p in 0..n {
        for q in (p + 1)..n {
            if objectives[p].dominates(&objectives[q]) {
                dominates[p].push(q);
                dominated_by_count[q] += 1;
            } else if objectives[q].dominates(&objectives[p]) {
                dominates[q].push(p);
                dominated_by_count[p] += 1;
            }
        }
    }

    let mut fronts = Vec::new();
    let mut current: Vec<usize> = (0..n).filter(|&p| dominated_by_count[p] == 0).collect();

    while !current.is_empty() {
        let mut next = Vec::new();
        for &p in &current {
            for &q in &dominates[p] {
                dominated_by_count[q] -= 1;
                if dominated_by_count[q] == 0 {
                    next.push(q);
                }
            }
        }
        next.sort_unstable();
        fronts.push(current);
        current = next;
    }

    fronts
}

/// Crowding distance of each member of a front, in the front's order.
///
/// The extreme points of every objective get an infinite distance; interior
/// points accumulate the normalised gap between their neighbours.
pub fn crowding_distance(objectives: &[RouteObjectives], front: &[usize]) -> Vec<f64> {
    let size = front.len();
    let mut distance = vec![0.0; size];
    if size <= 2 {
        return vec![f64::INFINITY; size];
    }

    for objective in 0..3 {
        let value = |slot: usize| objectives[front[slot]].as_vector()[objective];
        let mut order: Vec<usize> = (0..size).collect();
        order.sort_by(|&a, &b| value(a).total_cmp(&value(b)).then(front[a].cmp(&front[b])));

        let min = value(order[0]);
        let max = value(order[size - 1]);
        distance[order[0]] = f64::INFINITY;
        distance[order[size - 1]] = f64::INFINITY;

        if max - min <= 0.0 {
            continue;
        }

        for k in 1..size - 1 {
            let gap = value(order[k + 1]) - value(order[k - 1]);
            distance[order[k]] += gap / (max - min);
        }
    }

    distance
}

#[derive(Debug, Clone)]
struct Candidate {
    tour: Vec<usize>,
    objectives: RouteObjectives,
    rank: usize,
    crowding: f64,
}

impl Candidate {
    fn new(tour: Vec<usize>, problem: &Problem, schedule: &ScheduleConfig) -> Self {
        let objectives = RouteObjectives::evaluate(problem, &tour, schedule);
        Candidate {
            tour,
            objectives,
            rank: 0,
            crowding: 0.0,
        }
    }

    /// Lower rank wins, then larger crowding distance.
    fn crowded_cmp(&self, other: &Candidate) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then(other.crowding.total_cmp(&self.crowding))
    }
}

/// The outcome of a multi-objective run.
#[derive(Debug, Clone)]
pub struct ParetoReport {
    /// The first-front route with the lowest distance
    pub route: Route,
    /// Every member of the final first front
    pub front: Vec<(Vec<usize>, RouteObjectives)>,
    pub generations: u64,
    pub truncated: bool,
}

/// Pareto-based search; the route returned is the shortest one on the final
/// non-dominated front.
pub struct MultiObjectiveSearch {
    pub config: MultiObjectiveConfig,
    pub schedule: ScheduleConfig,
    genetic: Genetic,
}

impl MultiObjectiveSearch {
    pub fn new(config: MultiObjectiveConfig, schedule: ScheduleConfig) -> Self {
        MultiObjectiveSearch {
            config,
            schedule,
            genetic: Genetic,
        }
    }

    /// Run the search. The initial route seeds the population alongside
    /// random permutations.
    pub fn run(
        &self,
        problem: &Problem,
        initial: &Route,
        rng: &mut SearchRng,
        budget: &Budget,
    ) -> ParetoReport {
        let n = problem.len();
        if n < 3 {
            let route = initial.clone();
            let objectives = RouteObjectives::evaluate(problem, &route.tour, &self.schedule);
            return ParetoReport {
                front: vec![(route.tour.clone(), objectives)],
                route,
                generations: 0,
                truncated: false,
            };
        }

        let size = self.config.population_size;
        let mut population = Vec::with_capacity(size);
        population.push(Candidate::new(initial.tour.clone(), problem, &self.schedule));
        while population.len() < size {
            let mut tour: Vec<usize> = (0..n).collect();
            tour.shuffle(rng);
            population.push(Candidate::new(tour, problem, &self.schedule));
        }
        population = self.survivors(population, size);

        let mut generations = 0u64;
        let mut truncated = false;

        for generation in 1..=self.config.generations as u64 {
            if budget.is_exhausted() {
                truncated = true;
                log::warn!(
                    "multi-objective: time budget expired after {} generations",
                    generations
                );
                break;
            }

            let mut combined = population.clone();
            for _ in 0..size {
                let first = self.binary_tournament(&population, rng);
                let second = self.binary_tournament(&population, rng);

                let mut tour = if rng.gen::<f64>() < self.config.crossover_rate {
                    self.genetic
                        .crossover(&population[first].tour, &population[second].tour, rng)
                } else {
                    population[first].tour.clone()
                };
                if rng.gen::<f64>() < self.config.mutation_rate {
                    self.genetic.mutate(&mut tour, rng);
                }

                combined.push(Candidate::new(tour, problem, &self.schedule));
            }

            population = self.survivors(combined, size);
            generations = generation;
        }

        let front: Vec<&Candidate> = population.iter().filter(|c| c.rank == 0).collect();
        let chosen = front
            .iter()
            .min_by(|a, b| {
                let (x, y) = (a.objectives, b.objectives);
                x.distance
                    .total_cmp(&y.distance)
                    .then(x.priority_penalty.total_cmp(&y.priority_penalty))
                    .then(x.lateness_minutes.total_cmp(&y.lateness_minutes))
            })
            .map(|c| c.tour.clone())
            .unwrap_or_else(|| initial.tour.clone());

        log::debug!(
            "multi-objective: {} generations, front of {}",
            generations,
            front.len()
        );

        ParetoReport {
            route: Route::new(chosen, problem),
            front: front
                .iter()
                .map(|c| (c.tour.clone(), c.objectives))
                .collect(),
            generations,
            truncated,
        }
    }

    /// Elitist survival: fill by whole fronts, truncating the last front by
    /// crowding distance. Ranks and crowding distances are assigned on the
    /// returned candidates.
    fn survivors(&self, candidates: Vec<Candidate>, size: usize) -> Vec<Candidate> {
        let objectives: Vec<RouteObjectives> = candidates.iter().map(|c| c.objectives).collect();
        let fronts = non_dominated_sort(&objectives);
        let mut slots: Vec<Option<Candidate>> = candidates.into_iter().map(Some).collect();
        let mut survivors = Vec::with_capacity(size);

        for (rank, front) in fronts.iter().enumerate() {
            if survivors.len() >= size {
                break;
            }

            let crowding = crowding_distance(&objectives, front);
            let mut members: Vec<(usize, f64)> = front.iter().copied().zip(crowding).collect();
            if survivors.len() + members.len() > size {
                members.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
                members.truncate(size - survivors.len());
            }

            for (index, crowding) in members {
                if let Some(mut candidate) = slots[index].take() {
                    candidate.rank = rank;
                    candidate.crowding = crowding;
                    survivors.push(candidate);
                }
            }
        }

        survivors
    }

    /// Binary tournament on (rank, crowding), the lower index winning ties.
    fn binary_tournament(&self, population: &[Candidate], rng: &mut SearchRng) -> usize {
        let a = rng.gen_range(0..population.len());
        let b = rng.gen_range(0..population.len());

        match population[a].crowded_cmp(&population[b]) {
            Ordering::Less => a,
            Ordering::Greater => b,
            Ordering::Equal => a.min(b),
        }
    }
}

impl RouteSolver for MultiObjectiveSearch {
    fn algorithm(&self) -> Algorithm {
        Algorithm::MultiObjective
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
                iterations: report.generations,
                truncated: report.truncated,
                details: Some(AlgorithmDetails::MultiObjective {
                    generations: report.generations,
                    front_size: report.front.len(),
                }),
            },
            route: report.route,
        }
    }
}
