//! Unit tests for the genetic components.

use rand::SeedableRng;
use route_optimizer::config::{EvaluationStrategy, GeneticConfig, TwoOptConfig};
use route_optimizer::genetic::{Genetic, GeneticAlgorithm};
use route_optimizer::individual::{fitness_of, Individual};
use route_optimizer::local_search::LocalSearch;
use route_optimizer::population::{tournament_select, Population};
use route_optimizer::problem::{Problem, Stop};
use route_optimizer::solver::{Budget, SearchRng};

/// Creates eight stops on a small grid.
fn create_test_problem() -> Problem {
    let mut stops = Vec::new();
    for i in 0..2 {
        for j in 0..4 {
            let id = format!("s{}", i * 4 + j);
            stops.push(Stop::new(id, 45.0 + i as f64 * 0.01, 7.0 + j as f64 * 0.01));
        }
    }
    Problem::new(stops, false).unwrap()
}

fn create_test_config() -> GeneticConfig {
    GeneticConfig::new()
        .with_population_size(20)
        .with_generations(50)
        .with_elite_size(2)
        .with_tournament_size(3)
        .with_convergence_window(50)
}

fn create_algorithm(config: GeneticConfig, evaluation: EvaluationStrategy) -> GeneticAlgorithm {
    GeneticAlgorithm::new(
        config,
        evaluation,
        LocalSearch::new(TwoOptConfig::default()),
    )
}

fn assert_permutation(tour: &[usize], n: usize) {
    let mut present = vec![false; n];
    for &stop in tour {
        assert!(!present[stop], "stop {} present more than once", stop);
        present[stop] = true;
    }
    assert!(present.iter().all(|&p| p), "tour {:?} is missing stops", tour);
}

#[test]
fn test_order_crossover_with_fixed_cuts() {
    let genetic = Genetic;
    let parent1 = vec![0, 1, 2, 3, 4, 5, 6, 7, 8];
    let parent2 = vec![8, 7, 6, 5, 4, 3, 2, 1, 0];
    let mut child = Vec::new();

    genetic.crossover_with_cuts(&parent1, &parent2, 2, 4, &mut child);

    // The segment is inherited in place, the rest follows parent2's order
    // starting after the second cut.
    assert_eq!(child, vec![6, 5, 2, 3, 4, 1, 0, 8, 7]);
}

#[test]
fn test_order_crossover_produces_permutations() {
    let genetic = Genetic;
    let mut rng = SearchRng::seed_from_u64(11);
    let parent1: Vec<usize> = (0..12).collect();
    let parent2 = vec![5, 11, 0, 7, 3, 9, 1, 10, 2, 8, 4, 6];

    for _ in 0..200 {
        let child = genetic.crossover(&parent1, &parent2, &mut rng);
        assert_eq!(child.len(), 12);
        assert_permutation(&child, 12);
    }
}

#[test]
fn test_crossover_of_identical_parents() {
    let genetic = Genetic;
    let mut rng = SearchRng::seed_from_u64(5);
    let parent = vec![3, 1, 4, 0, 2];

    assert_eq!(genetic.crossover(&parent, &parent, &mut rng), parent);
}

#[test]
fn test_swap_mutation() {
    let genetic = Genetic;
    let mut rng = SearchRng::seed_from_u64(9);

    for _ in 0..100 {
        let original: Vec<usize> = (0..10).collect();
        let mut tour = original.clone();
        genetic.mutate(&mut tour, &mut rng);

        let changed = tour.iter().zip(&original).filter(|(a, b)| a != b).count();
        assert_eq!(changed, 2);
        assert_permutation(&tour, 10);
    }

    let mut single = vec![0];
    genetic.mutate(&mut single, &mut rng);
    assert_eq!(single, vec![0]);
}

#[test]
fn test_fitness_is_inverse_distance() {
    assert_eq!(fitness_of(4.0), 0.25);
    assert_eq!(fitness_of(0.0), f64::INFINITY);

    let problem = create_test_problem();
    let individual = Individual::evaluated((0..8).collect(), &problem);
    assert!(individual.evaluated);
    assert!((individual.fitness * individual.distance - 1.0).abs() < 1e-12);
}

#[test]
fn test_tournament_prefers_fitter_individuals() {
    let mut individuals: Vec<Individual> = (0..5).map(|_| Individual::new(vec![0])).collect();
    for (i, individual) in individuals.iter_mut().enumerate() {
        individual.fitness = i as f64;
    }
    let mut rng = SearchRng::seed_from_u64(2);

    // A tournament over everyone always picks the fittest.
    for _ in 0..20 {
        assert_eq!(tournament_select(&individuals, 5, &mut rng), 4);
    }
    // Any tournament of two avoids the least fit.
    for _ in 0..50 {
        assert_ne!(tournament_select(&individuals, 2, &mut rng), 0);
    }
}

#[test]
fn test_breeding_keeps_elites() {
    let problem = create_test_problem();
    let mut rng = SearchRng::seed_from_u64(4);
    let mut population = Population::new(10, EvaluationStrategy::Sequential);
    population.initialize(&problem, &mut rng);
    population.evaluate(&problem);

    let elites: Vec<Vec<usize>> = population.elites(2).map(|i| i.tour.clone()).collect();

    population.breed(2, |current, child| {
        child.tour.clone_from(&current[0].tour);
        child.tour.reverse();
    });

    assert_eq!(population.len(), 10);
    assert_eq!(population.individuals[0].tour, elites[0]);
    assert_eq!(population.individuals[1].tour, elites[1]);
    assert!(population.individuals[0].evaluated);
    assert!(!population.individuals[2].evaluated);
}

#[test]
fn test_parallel_evaluation_matches_sequential() {
    let problem = create_test_problem();
    let mut sequential = Population::new(30, EvaluationStrategy::Sequential);
    let mut parallel = Population::new(30, EvaluationStrategy::Parallel);
    sequential.initialize(&problem, &mut SearchRng::seed_from_u64(8));
    parallel.initialize(&problem, &mut SearchRng::seed_from_u64(8));

    sequential.evaluate(&problem);
    parallel.evaluate(&problem);

    for (a, b) in sequential.individuals.iter().zip(&parallel.individuals) {
        assert_eq!(a.tour, b.tour);
        assert_eq!(a.distance, b.distance);
    }
    assert_eq!(sequential.best_fitness(), parallel.best_fitness());
}

#[test]
fn test_best_fitness_never_decreases() {
    let problem = create_test_problem();
    let algorithm = create_algorithm(create_test_config(), EvaluationStrategy::Sequential);
    let mut rng = SearchRng::seed_from_u64(42);

    let report = algorithm.run(&problem, &mut rng, &Budget::unlimited());

    assert!(!report.fitness_history.is_empty());
    for pair in report.fitness_history.windows(2) {
        assert!(pair[1] >= pair[0], "history regressed: {:?}", pair);
    }
    assert_eq!(report.fitness_history.len() as u64, report.generations + 1);
    assert!(report.route.is_permutation_of(8));
}

#[test]
fn test_runs_are_reproducible() {
    let problem = create_test_problem();
    let algorithm = create_algorithm(create_test_config(), EvaluationStrategy::Sequential);

    let first = algorithm.run(&problem, &mut SearchRng::seed_from_u64(42), &Budget::unlimited());
    let second = algorithm.run(&problem, &mut SearchRng::seed_from_u64(42), &Budget::unlimited());

    assert_eq!(first.route.tour, second.route.tour);
    assert_eq!(first.fitness_history, second.fitness_history);

    let parallel = create_algorithm(create_test_config(), EvaluationStrategy::Parallel);
    let third = parallel.run(&problem, &mut SearchRng::seed_from_u64(42), &Budget::unlimited());
    assert_eq!(first.route.tour, third.route.tour);
}

#[test]
fn test_convergence_window_stops_early() {
    let problem = create_test_problem();
    let config = create_test_config()
        .with_generations(500)
        .with_convergence_window(5);
    let algorithm = create_algorithm(config, EvaluationStrategy::Sequential);

    let report = algorithm.run(&problem, &mut SearchRng::seed_from_u64(1), &Budget::unlimited());

    assert!(report.converged);
    assert!(report.generations < 500);
    assert!(report.convergence_generation <= report.generations);
}

#[test]
fn test_refinement_does_not_worsen_best() {
    let problem = create_test_problem();
    let algorithm = create_algorithm(create_test_config(), EvaluationStrategy::Sequential);

    let report = algorithm.run(&problem, &mut SearchRng::seed_from_u64(3), &Budget::unlimited());

    assert!(report.route.distance <= 1.0 / report.best_fitness + 1e-9);
}
