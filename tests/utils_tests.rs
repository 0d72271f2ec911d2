//! Unit tests for the reporting and file helpers.

use route_optimizer::config::Algorithm;
use route_optimizer::problem::Stop;
use route_optimizer::utils::{
    format_duration, load_request, parse_time_limit, save_result, RunSummary,
};
use route_optimizer::{optimize, Config, Constraints, OptimizationResult};
use std::path::PathBuf;
use std::time::Duration;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("route_optimizer_{}_{}", std::process::id(), name))
}

fn create_result() -> OptimizationResult {
    let stops = vec![
        Stop::new("depot", 47.0, 8.0),
        Stop::new("bakery", 47.01, 8.02),
        Stop::new("school", 47.02, 8.0),
        Stop::unlocated("unknown"),
    ];
    let config = Config::new().with_algorithm(Algorithm::SimulatedAnnealing);
    optimize(&stops, &Constraints::default(), config).unwrap()
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(Duration::from_secs(0)), "0h 00m 00s");
    assert_eq!(format_duration(Duration::from_secs(3725)), "1h 02m 05s");
    assert_eq!(format_duration(Duration::from_millis(59_999)), "0h 00m 59s");
}

#[test]
fn test_parse_time_limit() {
    assert_eq!(parse_time_limit(1.5).unwrap(), Duration::from_millis(1500));
    assert_eq!(parse_time_limit(0.0).unwrap(), Duration::ZERO);

    for seconds in [-1.0, f64::NAN, f64::INFINITY, 1e30] {
        assert!(matches!(
            parse_time_limit(seconds),
            Err(route_optimizer::Error::InvalidConfig(_))
        ));
    }
}

#[test]
fn test_summary_mentions_key_figures() {
    let result = create_result();

    let text = RunSummary::new(&result).format();

    assert!(text.contains("Algorithm: simulated_annealing"));
    assert!(text.contains("1 unlocated"));
    assert!(text.contains("Annealing:"));
    assert!(text.ends_with("-> unknown"));
}

#[test]
fn test_result_round_trips_through_json_file() {
    let result = create_result();
    let path = temp_path("result.json");

    save_result(&result, &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let loaded: OptimizationResult = serde_json::from_str(&text).unwrap();
    std::fs::remove_file(&path).ok();

    let ids = |r: &OptimizationResult| -> Vec<String> {
        r.route.iter().map(|s| s.id.clone()).collect()
    };
    assert_eq!(ids(&loaded), ids(&result));
    assert_eq!(loaded.metrics.algorithm, Algorithm::SimulatedAnnealing);
    assert!((loaded.metrics.final_distance - result.metrics.final_distance).abs() < 1e-9);
}

#[test]
fn test_load_request() {
    let path = temp_path("request.json");
    let json = r#"{
        "stops": [
            { "id": "a", "latitude": 46.0, "longitude": 6.0, "priority": 2 },
            { "id": "b", "latitude": 46.1, "longitude": 6.1,
              "time_window": { "start": 0, "end": 120 } },
            { "id": "c" }
        ],
        "constraints": { "max_stops": 2 },
        "config": { "algorithm": "genetic" }
    }"#;
    std::fs::write(&path, json).unwrap();

    let request = load_request(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(request.stops.len(), 3);
    assert_eq!(request.stops[0].priority, 2);
    assert!(request.stops[1].time_window.is_some());
    assert!(!request.stops[2].has_coordinates());
    assert_eq!(request.constraints.max_stops, Some(2));
    assert_eq!(request.config.algorithm, Algorithm::Genetic);
    assert_eq!(request.config.seed, 42);
}

#[test]
fn test_load_request_reports_missing_file() {
    let result = load_request(temp_path("does-not-exist.json"));
    assert!(matches!(result, Err(route_optimizer::Error::Io(_))));
}
