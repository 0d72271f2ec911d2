//! Stops and the distance-matrix problem instance the optimizers work on.

use crate::distance::{haversine, Coordinate};
use crate::error::{Error, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A service window expressed in minutes after the route starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Self {
        TimeWindow { start, end }
    }

    /// Check whether two windows share at least one instant.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start <= self.end
    }
}

/// A point of interest to be visited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Higher is more important, zero is neutral.
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub time_window: Option<TimeWindow>,
}

impl Stop {
    /// Create a located stop with neutral priority.
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Stop {
            id: id.into(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            priority: 0,
            time_window: None,
        }
    }

    /// Create a stop whose location has not been resolved.
    pub fn unlocated(id: impl Into<String>) -> Self {
        Stop {
            id: id.into(),
            latitude: None,
            longitude: None,
            priority: 0,
            time_window: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_time_window(mut self, start: f64, end: f64) -> Self {
        self.time_window = Some(TimeWindow::new(start, end));
        self
    }

    /// The stop's location, if both latitude and longitude are present.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }

    pub fn has_coordinates(&self) -> bool {
        self.coordinate().is_some()
    }

    /// Reject coordinates and windows that would poison distance computations.
    ///
    /// Missing coordinates are not an error: such stops are routed last.
    pub fn validate(&self) -> Result<()> {
        if let Some(lat) = self.latitude {
            if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
                return Err(Error::invalid_stop(
                    &self.id,
                    format!("latitude {} is outside [-90, 90]", lat),
                ));
            }
        }

        if let Some(lon) = self.longitude {
            if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
                return Err(Error::invalid_stop(
                    &self.id,
                    format!("longitude {} is outside [-180, 180]", lon),
                ));
            }
        }

        if let Some(window) = &self.time_window {
            if !window.is_valid() {
                return Err(Error::invalid_stop(
                    &self.id,
                    format!("time window [{}, {}] is malformed", window.start, window.end),
                ));
            }
        }

        Ok(())
    }
}

/// A routing instance over located stops with a precomputed distance matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub stops: Vec<Stop>,
    pub coordinates: Vec<Coordinate>,
    /// Whether the route returns to its first stop.
    pub closed: bool,
    distance_matrix: Vec<Vec<f64>>,
}

impl Problem {
    /// Create a problem from located stops.
    pub fn new(stops: Vec<Stop>, closed: bool) -> Result<Self> {
        let mut coordinates = Vec::with_capacity(stops.len());

        for stop in &stops {
            stop.validate()?;
            let coordinate = stop
                .coordinate()
                .ok_or_else(|| Error::invalid_stop(&stop.id, "missing coordinates"))?;
            coordinates.push(coordinate);
        }

        let distance_matrix = Self::compute_distance_matrix(&coordinates);

        Ok(Problem {
            stops,
            coordinates,
            closed,
            distance_matrix,
        })
    }

    /// Create a problem from bare coordinates, e.g. cluster centroids.
    pub fn from_coordinates(coordinates: Vec<Coordinate>, closed: bool) -> Self {
        let stops = coordinates
            .iter()
            .enumerate()
            .map(|(i, c)| Stop::new(format!("point-{}", i), c.latitude, c.longitude))
            .collect();
        let distance_matrix = Self::compute_distance_matrix(&coordinates);

        Problem {
            stops,
            coordinates,
            closed,
            distance_matrix,
        }
    }

    /// Extract the open-path sub-problem over the given stop indices.
    ///
    /// Index `k` of the sub-problem refers to `indices[k]` of this problem.
    pub fn subproblem(&self, indices: &[usize]) -> Problem {
        let distance_matrix = indices
            .iter()
            .map(|&i| indices.iter().map(|&j| self.distance_matrix[i][j]).collect())
            .collect();

        Problem {
            stops: indices.iter().map(|&i| self.stops[i].clone()).collect(),
            coordinates: indices.iter().map(|&i| self.coordinates[i]).collect(),
            closed: false,
            distance_matrix,
        }
    }

    /// Distance in kilometres between two stop indices.
    #[inline]
    pub fn get_distance(&self, from: usize, to: usize) -> f64 {
        self.distance_matrix[from][to]
    }

    /// Number of stops in the instance.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Total distance of a tour over this problem, including the closing leg
    /// when the problem is closed.
    pub fn tour_distance(&self, tour: &[usize]) -> f64 {
        if tour.len() < 2 {
            return 0.0;
        }

        let mut total: f64 = tour
            .iter()
            .tuple_windows()
            .map(|(&a, &b)| self.get_distance(a, b))
            .sum();

        if self.closed {
            total += self.get_distance(tour[tour.len() - 1], tour[0]);
        }

        total
    }

    fn compute_distance_matrix(coordinates: &[Coordinate]) -> Vec<Vec<f64>> {
        let n = coordinates.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let d = haversine(coordinates[i], coordinates[j]);
                matrix[i][j] = d;
                matrix[j][i] = d;
            }
        }

        matrix
    }
}
