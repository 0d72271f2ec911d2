//! Route representation over a problem's stop indices.

use crate::error::{Error, Result};
use crate::problem::Problem;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered visit sequence over the stops of a [`Problem`].
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Stop indices in visiting order
    pub tour: Vec<usize>,
    /// Total distance in kilometres
    pub distance: f64,
}

impl Route {
    /// Create a route from a tour and compute its distance.
    pub fn new(tour: Vec<usize>, problem: &Problem) -> Self {
        let distance = problem.tour_distance(&tour);
        Route { tour, distance }
    }

    /// The route that visits stops in input order.
    pub fn identity(problem: &Problem) -> Self {
        Route::new((0..problem.len()).collect(), problem)
    }

    /// Recompute the distance after the tour was modified in place.
    pub fn evaluate(&mut self, problem: &Problem) {
        self.distance = problem.tour_distance(&self.tour);
    }

    pub fn len(&self) -> usize {
        self.tour.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tour.is_empty()
    }

    /// Check that the tour visits each of `0..n` exactly once.
    pub fn is_permutation_of(&self, n: usize) -> bool {
        if self.tour.len() != n {
            return false;
        }

        let mut seen = vec![false; n];
        for &stop in &self.tour {
            if stop >= n || seen[stop] {
                return false;
            }
            seen[stop] = true;
        }

        true
    }

    /// Fail with [`Error::InvalidRoute`] if the tour is not a permutation of `0..n`.
    pub fn validate(&self, n: usize) -> Result<()> {
        if self.is_permutation_of(n) {
            Ok(())
        } else {
            Err(Error::invalid_route(format!(
                "tour of length {} is not a permutation of {} stops",
                self.tour.len(),
                n
            )))
        }
    }

    /// Rotate a closed tour so that `stop` is visited first. The distance of a
    /// closed tour is unaffected.
    pub fn rotate_to(&mut self, stop: usize) {
        if let Some(position) = self.tour.iter().position(|&s| s == stop) {
            self.tour.rotate_left(position);
        }
    }

    /// Map the tour of a sub-problem back to the parent's stop indices.
    pub fn map_indices(&self, indices: &[usize]) -> Vec<usize> {
        self.tour.iter().map(|&i| indices[i]).collect()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Route({:.3} km: {:?})", self.distance, self.tour)
    }
}
