//! Unit tests for route objectives and the multi-objective search.

use rand::SeedableRng;
use route_optimizer::config::{MultiObjectiveConfig, ScheduleConfig};
use route_optimizer::distance::KM_PER_DEGREE;
use route_optimizer::metrics::AlgorithmDetails;
use route_optimizer::objectives::RouteObjectives;
use route_optimizer::pareto::{crowding_distance, non_dominated_sort, MultiObjectiveSearch};
use route_optimizer::problem::{Problem, Stop};
use route_optimizer::solution::Route;
use route_optimizer::solver::{Budget, SearchRng};

fn objectives(distance: f64, priority_penalty: f64, lateness_minutes: f64) -> RouteObjectives {
    RouteObjectives {
        distance,
        priority_penalty,
        lateness_minutes,
        ..RouteObjectives::default()
    }
}

/// Ten stops with mixed priorities and a few tight windows.
fn create_prioritized_problem() -> Problem {
    let stops = (0..10)
        .map(|i| {
            let stop = Stop::new(
                format!("s{}", i),
                48.0 + ((i * 3) % 7) as f64 * 0.01,
                11.0 + ((i * 4) % 9) as f64 * 0.01,
            )
            .with_priority((i % 4) as i32);
            if i % 3 == 0 {
                stop.with_time_window(0.0, 30.0)
            } else {
                stop
            }
        })
        .collect();
    Problem::new(stops, false).unwrap()
}

#[test]
fn test_dominance() {
    let a = objectives(1.0, 1.0, 0.0);
    let b = objectives(2.0, 1.0, 0.0);
    let c = objectives(0.5, 3.0, 0.0);

    assert!(a.dominates(&b));
    assert!(!b.dominates(&a));
    assert!(!a.dominates(&c));
    assert!(!c.dominates(&a));
    assert!(!a.dominates(&a));
}

#[test]
fn test_non_dominated_sort() {
    let points = vec![
        objectives(1.0, 5.0, 0.0),
        objectives(2.0, 2.0, 0.0),
        objectives(3.0, 6.0, 0.0),
        objectives(2.0, 2.0, 0.0),
        objectives(4.0, 7.0, 1.0),
    ];

    let fronts = non_dominated_sort(&points);

    assert_eq!(fronts, vec![vec![0, 1, 3], vec![2], vec![4]]);
}

#[test]
fn test_crowding_distance() {
    let points = vec![
        objectives(1.0, 4.0, 0.0),
        objectives(2.0, 3.0, 0.0),
        objectives(3.0, 2.0, 0.0),
        objectives(4.0, 1.0, 0.0),
    ];

    let distances = crowding_distance(&points, &[0, 1, 2, 3]);

    assert_eq!(distances[0], f64::INFINITY);
    assert_eq!(distances[3], f64::INFINITY);
    assert!((distances[1] - 4.0 / 3.0).abs() < 1e-12);
    assert!((distances[2] - 4.0 / 3.0).abs() < 1e-12);

    let pair = crowding_distance(&points, &[1, 2]);
    assert!(pair.iter().all(|d| d.is_infinite()));
}

#[test]
fn test_lateness_and_waiting() {
    let stops = vec![
        Stop::new("depot", 0.0, 0.0),
        Stop::new("late", 0.0, 1.0).with_time_window(0.0, 60.0),
        Stop::new("early", 0.0, 1.0).with_time_window(500.0, 600.0),
    ];
    let problem = Problem::new(stops, false).unwrap();
    let schedule = ScheduleConfig::default();

    let result = RouteObjectives::evaluate(&problem, &[0, 1, 2], &schedule);

    let arrival = 5.0 + KM_PER_DEGREE * 60.0 / 40.0;
    assert_eq!(result.violations, 1);
    assert!((result.lateness_minutes - (arrival - 60.0)).abs() < 1e-6);
    // Waits for the third window to open, then serves.
    assert!((result.duration_minutes - 505.0).abs() < 1e-9);
}

#[test]
fn test_priority_penalty_rewards_early_visits() {
    let stops = vec![
        Stop::new("a", 0.0, 0.0),
        Stop::new("b", 0.0, 0.01),
        Stop::new("vip", 0.0, 0.02).with_priority(4),
        Stop::new("d", 0.0, 0.03),
    ];
    let problem = Problem::new(stops, false).unwrap();
    let schedule = ScheduleConfig::default();

    let late = RouteObjectives::evaluate(&problem, &[0, 1, 2, 3], &schedule);
    let early = RouteObjectives::evaluate(&problem, &[2, 0, 1, 3], &schedule);

    assert!((late.priority_penalty - 2.0).abs() < 1e-12);
    assert_eq!(early.priority_penalty, 0.0);
}

#[test]
fn test_search_returns_shortest_front_member() {
    let problem = create_prioritized_problem();
    let initial = Route::identity(&problem);
    let config = MultiObjectiveConfig::default()
        .with_population_size(30)
        .with_generations(40);
    let search = MultiObjectiveSearch::new(config, ScheduleConfig::default());

    let report = search.run(
        &problem,
        &initial,
        &mut SearchRng::seed_from_u64(42),
        &Budget::unlimited(),
    );

    assert!(report.route.is_permutation_of(10));
    assert!(report.route.distance <= initial.distance + 1e-9);
    assert!(!report.front.is_empty());
    assert_eq!(report.generations, 40);

    for (i, (tour, a)) in report.front.iter().enumerate() {
        assert_eq!(tour.len(), 10);
        assert!(report.route.distance <= a.distance + 1e-9);
        for (j, (_, b)) in report.front.iter().enumerate() {
            if i != j {
                assert!(!a.dominates(b), "front members must not dominate each other");
            }
        }
    }
}

#[test]
fn test_search_is_reproducible() {
    let problem = create_prioritized_problem();
    let initial = Route::identity(&problem);
    let config = MultiObjectiveConfig::default()
        .with_population_size(20)
        .with_generations(20);
    let search = MultiObjectiveSearch::new(config, ScheduleConfig::default());

    let first = search.run(
        &problem,
        &initial,
        &mut SearchRng::seed_from_u64(3),
        &Budget::unlimited(),
    );
    let second = search.run(
        &problem,
        &initial,
        &mut SearchRng::seed_from_u64(3),
        &Budget::unlimited(),
    );

    assert_eq!(first.route.tour, second.route.tour);
    assert_eq!(first.front.len(), second.front.len());
}

#[test]
fn test_combined_details_report_last_front() {
    let mut details = AlgorithmDetails::MultiObjective {
        generations: 30,
        front_size: 7,
    };

    details.absorb(AlgorithmDetails::MultiObjective {
        generations: 12,
        front_size: 3,
    });

    assert_eq!(
        details,
        AlgorithmDetails::MultiObjective {
            generations: 42,
            front_size: 3,
        }
    );
}
