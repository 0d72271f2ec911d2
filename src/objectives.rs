//! Secondary route objectives: visiting priority and time-window lateness.

use crate::config::ScheduleConfig;
use crate::problem::Problem;

/// Objective values of a tour. All values are minimized.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteObjectives {
    /// Total distance in kilometres
    pub distance: f64,
    /// Positive priorities weighted by how late in the route they are visited
    pub priority_penalty: f64,
    /// Minutes of arrival past the end of time windows
    pub lateness_minutes: f64,
    /// Number of stops reached after their window closed
    pub violations: usize,
    /// Travel plus service plus waiting time
    pub duration_minutes: f64,
}

impl RouteObjectives {
    /// Evaluate a tour against the problem's priorities and time windows.
    ///
    /// Arrival before a window opens waits until the start; the closing leg of
    /// a closed problem counts towards distance and duration only.
    pub fn evaluate(problem: &Problem, tour: &[usize], schedule: &ScheduleConfig) -> Self {
        let n = tour.len();
        if n == 0 {
            return RouteObjectives::default();
        }

        let minutes_per_km = 60.0 / schedule.average_speed_kmh;
        let mut clock = 0.0;
        let mut objectives = RouteObjectives::default();

        for (position, &stop) in tour.iter().enumerate() {
            if position > 0 {
                clock += problem.get_distance(tour[position - 1], stop) * minutes_per_km;
            }

            let details = &problem.stops[stop];
            if let Some(window) = &details.time_window {
                if clock < window.start {
                    clock = window.start;
                } else if clock > window.end {
                    objectives.lateness_minutes += clock - window.end;
                    objectives.violations += 1;
                }
            }

            if details.priority > 0 {
                objectives.priority_penalty +=
                    details.priority as f64 * position as f64 / n as f64;
            }

            clock += schedule.service_minutes;
        }

        if problem.closed && n > 1 {
            clock += problem.get_distance(tour[n - 1], tour[0]) * minutes_per_km;
        }

        objectives.distance = problem.tour_distance(tour);
        objectives.duration_minutes = clock;
        objectives
    }

    /// The objective vector used for Pareto comparisons.
    pub fn as_vector(&self) -> [f64; 3] {
        [self.distance, self.priority_penalty, self.lateness_minutes]
    }

    /// Check whether `self` Pareto-dominates `other`: no worse in every
    /// objective and strictly better in at least one.
    pub fn dominates(&self, other: &RouteObjectives) -> bool {
        let mine = self.as_vector();
        let theirs = other.as_vector();
        let mut strictly_better = false;

        for (a, b) in mine.iter().zip(theirs.iter()) {
            if a > b {
                return false;
            }
            if a < b {
                strictly_better = true;
            }
        }

        strictly_better
    }
}
