//! Unit tests for simulated annealing.

use rand::SeedableRng;
use route_optimizer::annealing::SimulatedAnnealing;
use route_optimizer::config::{
    AnnealingConfig, CoolingSchedule, NeighborhoodOperator, TwoOptConfig,
};
use route_optimizer::local_search::LocalSearch;
use route_optimizer::problem::{Problem, Stop};
use route_optimizer::solution::Route;
use route_optimizer::solver::{Budget, RouteSolver, SearchRng};
use std::time::Duration;

/// Eight stops on a line, listed in a zig-zag order that crosses itself at
/// every step.
fn create_adversarial_problem() -> Problem {
    let order = [0, 7, 1, 6, 2, 5, 3, 4];
    let stops = order
        .iter()
        .map(|&k| Stop::new(format!("s{}", k), 0.0, k as f64 * 0.01))
        .collect();
    Problem::new(stops, false).unwrap()
}

fn create_annealer(config: AnnealingConfig) -> SimulatedAnnealing {
    SimulatedAnnealing::new(config, LocalSearch::new(TwoOptConfig::default()))
}

fn create_test_config() -> AnnealingConfig {
    AnnealingConfig::new()
        .with_initial_temperature(2000.0)
        .with_cooling_rate(0.99)
        .with_max_iterations(10000)
}

#[test]
fn test_annealing_improves_adversarial_order() {
    let problem = create_adversarial_problem();
    let initial = Route::identity(&problem);
    let annealer = create_annealer(create_test_config().with_refine(false));

    let report = annealer.run(
        &problem,
        &initial,
        &mut SearchRng::seed_from_u64(42),
        &Budget::unlimited(),
    );

    assert!(report.route.distance < initial.distance);
    assert!(report.route.is_permutation_of(8));
}

#[test]
fn test_best_is_no_worse_than_any_visited_route() {
    let problem = create_adversarial_problem();
    let initial = Route::identity(&problem);
    let annealer = create_annealer(create_test_config().with_refine(false));
    let mut observed = Vec::new();

    let report = annealer.run_observed(
        &problem,
        &initial,
        &mut SearchRng::seed_from_u64(7),
        &Budget::unlimited(),
        |distance| observed.push(distance),
    );

    let lowest = observed.iter().copied().fold(f64::INFINITY, f64::min);
    assert_eq!(observed.len() as u64, report.accepted_moves + 1);
    assert!(report.route.distance <= lowest + 1e-9);
    assert!((report.route.distance - lowest).abs() < 1e-9);
}

#[test]
fn test_move_counters() {
    let problem = create_adversarial_problem();
    let annealer = create_annealer(create_test_config());

    let report = annealer.run(
        &problem,
        &Route::identity(&problem),
        &mut SearchRng::seed_from_u64(1),
        &Budget::unlimited(),
    );

    assert_eq!(report.proposed_moves, report.iterations);
    assert!(report.accepted_moves <= report.proposed_moves);
    let rate = report.acceptance_rate();
    assert!((0.0..=1.0).contains(&rate));
    assert!(report.iterations <= 10000);
    assert!(report.temperature_reductions > 0);
}

#[test]
fn test_every_neighborhood_keeps_permutations() {
    let problem = create_adversarial_problem();
    let operators = [
        NeighborhoodOperator::Swap,
        NeighborhoodOperator::Insert,
        NeighborhoodOperator::Reverse,
        NeighborhoodOperator::Mixed,
    ];

    for operator in operators {
        let config = create_test_config()
            .with_max_iterations(2000)
            .with_neighborhood_operator(operator)
            .with_refine(false);
        let report = create_annealer(config).run(
            &problem,
            &Route::identity(&problem),
            &mut SearchRng::seed_from_u64(3),
            &Budget::unlimited(),
        );

        assert!(report.route.is_permutation_of(8), "{:?}", operator);
        assert!(
            (report.route.distance - problem.tour_distance(&report.route.tour)).abs() < 1e-9
        );
    }
}

#[test]
fn test_cooling_schedules() {
    let exponential = create_annealer(create_test_config());
    assert!((exponential.cool(100.0, 0, 100) - 99.0).abs() < 1e-9);
    assert_eq!(exponential.schedule_value(0), 2000.0);

    let linear = create_annealer(
        create_test_config()
            .with_cooling_schedule(CoolingSchedule::Linear)
            .with_final_temperature(1.0),
    );
    assert_eq!(linear.schedule_value(0), 2000.0);
    assert!((linear.schedule_value(5000) - 1000.5).abs() < 1e-9);
    assert!((linear.schedule_value(10000) - 1.0).abs() < 1e-9);
    let cooled = linear.cool(2000.0, 0, 100);
    assert!((cooled - linear.schedule_value(100)).abs() < 1e-9);

    let logarithmic = create_annealer(
        create_test_config().with_cooling_schedule(CoolingSchedule::Logarithmic),
    );
    assert_eq!(logarithmic.schedule_value(0), 2000.0);
    assert!(logarithmic.schedule_value(100) < logarithmic.schedule_value(10));
}

#[test]
fn test_reheating_is_capped() {
    let problem = create_adversarial_problem();
    let config = create_test_config()
        .with_max_iterations(3000)
        .with_reheat_threshold(1)
        .with_reheat_factor(10.0);
    let annealer = create_annealer(config);

    let report = annealer.run(
        &problem,
        &Route::identity(&problem),
        &mut SearchRng::seed_from_u64(5),
        &Budget::unlimited(),
    );

    assert!(report.reheats > 0);
    assert!(report.final_temperature <= 2000.0);
}

#[test]
fn test_expired_budget_returns_initial_route() {
    let problem = create_adversarial_problem();
    let initial = Route::identity(&problem);
    let annealer = create_annealer(create_test_config());
    let budget = Budget::new(Some(Duration::ZERO));

    let outcome = annealer.solve(
        &problem,
        &initial,
        &mut SearchRng::seed_from_u64(1),
        &budget,
    );

    assert!(outcome.stats.truncated);
    assert_eq!(outcome.stats.iterations, 0);
    assert_eq!(outcome.route.tour, initial.tour);
}

#[test]
fn test_same_seed_same_route() {
    let problem = create_adversarial_problem();
    let initial = Route::identity(&problem);
    let annealer = create_annealer(create_test_config());

    let first = annealer.run(
        &problem,
        &initial,
        &mut SearchRng::seed_from_u64(99),
        &Budget::unlimited(),
    );
    let second = annealer.run(
        &problem,
        &initial,
        &mut SearchRng::seed_from_u64(99),
        &Budget::unlimited(),
    );

    assert_eq!(first.route.tour, second.route.tour);
    assert_eq!(first.accepted_moves, second.accepted_moves);
}
