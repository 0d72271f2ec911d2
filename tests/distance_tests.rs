//! Unit tests for great-circle distances.

use route_optimizer::distance::{haversine, Coordinate, EARTH_RADIUS_KM, KM_PER_DEGREE};

#[test]
fn test_identical_points_are_zero() {
    let point = Coordinate::new(52.52, 13.405);
    assert_eq!(haversine(point, point), 0.0);
}

#[test]
fn test_one_degree_along_equator() {
    let a = Coordinate::new(0.0, 0.0);
    let b = Coordinate::new(0.0, 1.0);

    assert!((haversine(a, b) - KM_PER_DEGREE).abs() < 1e-9);
}

#[test]
fn test_symmetry() {
    let paris = Coordinate::new(48.8566, 2.3522);
    let london = Coordinate::new(51.5074, -0.1278);

    assert_eq!(haversine(paris, london), haversine(london, paris));
    assert_eq!(paris.distance_to(&london), haversine(paris, london));
}

#[test]
fn test_known_city_distance() {
    let paris = Coordinate::new(48.8566, 2.3522);
    let london = Coordinate::new(51.5074, -0.1278);

    let d = haversine(paris, london);
    assert!(d > 340.0 && d < 347.0, "Paris-London was {} km", d);
}

#[test]
fn test_antipodal_points() {
    let a = Coordinate::new(0.0, 0.0);
    let b = Coordinate::new(0.0, 180.0);

    let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
    assert!((haversine(a, b) - half_circumference).abs() < 1e-6);
}

#[test]
fn test_centroid() {
    assert_eq!(Coordinate::centroid(std::iter::empty()), None);

    let points = [Coordinate::new(10.0, 20.0), Coordinate::new(20.0, 40.0)];
    let centroid = Coordinate::centroid(points.iter()).unwrap();
    assert!((centroid.latitude - 15.0).abs() < 1e-12);
    assert!((centroid.longitude - 30.0).abs() < 1e-12);
}
