//! Utility functions for loading requests and reporting results.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::metrics::{AlgorithmDetails, OptimizationMetrics};
use crate::{OptimizationRequest, OptimizationResult};

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Parse a time limit given in seconds. Negative, non-finite and
/// unrepresentably large values are rejected.
pub fn parse_time_limit(seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds).map_err(|_| {
        Error::invalid_config(format!(
            "time limit must be a non-negative number of seconds, got {}",
            seconds
        ))
    })
}

/// Load an optimization request from a JSON file.
pub fn load_request<P: AsRef<Path>>(path: P) -> Result<OptimizationRequest> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Save an optimization result to a JSON file.
pub fn save_result<P: AsRef<Path>>(result: &OptimizationResult, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, result)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Human-readable summary of an optimization run.
pub struct RunSummary<'a> {
    pub result: &'a OptimizationResult,
}

impl<'a> RunSummary<'a> {
    pub fn new(result: &'a OptimizationResult) -> Self {
        RunSummary { result }
    }

    /// Format the summary as a string.
    pub fn format(&self) -> String {
        let metrics: &OptimizationMetrics = &self.result.metrics;
        let runtime = Duration::from_secs_f64(metrics.processing_time_seconds.max(0.0));

        let mut text = format!(
            "Optimization Summary:
- Algorithm: {}
- Stops: {} routed, {} unlocated, {} filtered
- Clusters: {}
- Initial Distance: {:.3} km
- Final Distance: {:.3} km
- Improvement: {:.2}%
- Iterations: {}
- Runtime: {} ({:.3}s)
- Estimated Duration: {:.1} min
- Time Window Violations: {}
- Truncated: {}",
            metrics.algorithm,
            metrics.stop_count,
            metrics.unlocated_stop_count,
            metrics.filtered_stop_count,
            metrics.cluster_count,
            metrics.initial_distance,
            metrics.final_distance,
            metrics.improvement_percent,
            metrics.iterations,
            format_duration(runtime),
            metrics.processing_time_seconds,
            metrics.estimated_duration_minutes,
            metrics.time_window_violations,
            metrics.truncated
        );

        if let Some(details) = &metrics.details {
            text.push('\n');
            text.push_str(&format_details(details));
        }

        text.push_str("\n- Order: ");
        let ids: Vec<&str> = self.result.route.iter().map(|s| s.id.as_str()).collect();
        text.push_str(&ids.join(" -> "));

        text
    }
}

fn format_details(details: &AlgorithmDetails) -> String {
    match details {
        AlgorithmDetails::TwoOpt {
            passes,
            improving_moves,
        } => format!("- 2-opt: {} passes, {} improving moves", passes, improving_moves),
        AlgorithmDetails::Genetic {
            generations,
            best_fitness,
            convergence_generation,
            converged,
        } => format!(
            "- Genetic: {} generations, best fitness {:.6}, converged {} (at generation {})",
            generations, best_fitness, converged, convergence_generation
        ),
        AlgorithmDetails::SimulatedAnnealing {
            acceptance_rate,
            temperature_reductions,
            reheats,
            convergence_iteration,
            final_temperature,
            ..
        } => format!(
            "- Annealing: acceptance {:.3}, {} cooling steps, {} reheats, best at iteration {}, final temperature {:.4}",
            acceptance_rate, temperature_reductions, reheats, convergence_iteration, final_temperature
        ),
        AlgorithmDetails::MultiObjective {
            generations,
            front_size,
        } => format!(
            "- Multi-objective: {} generations, front of {}",
            generations, front_size
        ),
    }
}
