//! Request-level constraints applied to the stop list before optimization.

use crate::error::{Error, Result};
use crate::problem::{Stop, TimeWindow};
use serde::{Deserialize, Serialize};

/// Pre-filters applied to the stop list. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    /// Keep at most this many stops, preferring higher priorities.
    pub max_stops: Option<usize>,
    /// Drop stops whose priority is below this value.
    pub min_priority: Option<i32>,
    /// Drop stops whose time window does not overlap the shift.
    pub shift: Option<TimeWindow>,
}

impl Constraints {
    pub fn new() -> Self {
        Constraints::default()
    }

    pub fn with_max_stops(mut self, max_stops: usize) -> Self {
        self.max_stops = Some(max_stops);
        self
    }

    pub fn with_min_priority(mut self, priority: i32) -> Self {
        self.min_priority = Some(priority);
        self
    }

    pub fn with_shift(mut self, start: f64, end: f64) -> Self {
        self.shift = Some(TimeWindow::new(start, end));
        self
    }

    /// Filter the stop list, preserving input order among the survivors.
    ///
    /// Every input stop is validated first so malformed data is reported even
    /// if the stop would have been filtered out.
    pub fn apply(&self, stops: &[Stop]) -> Result<Vec<Stop>> {
        if let Some(shift) = &self.shift {
            if !shift.is_valid() {
                return Err(Error::invalid_config(format!(
                    "shift [{}, {}] is malformed",
                    shift.start, shift.end
                )));
            }
        }

        for stop in stops {
            stop.validate()?;
        }

        let mut kept: Vec<(usize, &Stop)> = stops
            .iter()
            .enumerate()
            .filter(|(_, stop)| self.min_priority.map_or(true, |min| stop.priority >= min))
            .filter(|(_, stop)| match (&self.shift, &stop.time_window) {
                (Some(shift), Some(window)) => shift.overlaps(window),
                _ => true,
            })
            .collect();

        if let Some(max_stops) = self.max_stops {
            if kept.len() > max_stops {
                // Stable sort keeps input order among equal priorities.
                kept.sort_by(|a, b| b.1.priority.cmp(&a.1.priority));
                kept.truncate(max_stops);
                kept.sort_by_key(|(index, _)| *index);
            }
        }

        let filtered = stops.len() - kept.len();
        if filtered > 0 {
            log::debug!("constraints removed {} of {} stops", filtered, stops.len());
        }

        Ok(kept.into_iter().map(|(_, stop)| stop.clone()).collect())
    }
}
