//! Diagnostics and statistics
//!
//! Per-generation snapshots of the population and totals for a whole run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::population::population::Population;

/// Statistics for a single generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number
    pub generation: usize,
    /// Total evaluator calls so far
    pub evaluations: usize,
    /// Rows surviving selection
    pub population_size: usize,
    /// Rows not dominated by any other row
    pub non_dominated: usize,
    /// Rows with zero constraint violation
    pub feasible: usize,
    /// Componentwise minimum fitness
    pub ideal: Vec<f64>,
    /// Componentwise maximum fitness over the non-dominated rows
    pub nadir: Vec<f64>,
    /// Hypervolume against the configured reference point, if any
    pub hypervolume: Option<f64>,
    /// Timing information
    pub timing: TimingStats,
}

/// Timing statistics
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TimingStats {
    /// Time spent on evaluation (ms)
    pub evaluation_ms: f64,
    /// Time spent on crossover and mutation (ms)
    pub mating_ms: f64,
    /// Time spent on APD selection (ms)
    pub selection_ms: f64,
    /// Total generation time (ms)
    pub total_ms: f64,
}

impl TimingStats {
    /// Create new timing stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Set evaluation time
    pub fn with_evaluation(mut self, duration: Duration) -> Self {
        self.evaluation_ms = duration.as_secs_f64() * 1000.0;
        self
    }

    /// Set mating time
    pub fn with_mating(mut self, duration: Duration) -> Self {
        self.mating_ms = duration.as_secs_f64() * 1000.0;
        self
    }

    /// Set selection time
    pub fn with_selection(mut self, duration: Duration) -> Self {
        self.selection_ms = duration.as_secs_f64() * 1000.0;
        self
    }

    /// Set total time
    pub fn with_total(mut self, duration: Duration) -> Self {
        self.total_ms = duration.as_secs_f64() * 1000.0;
        self
    }
}

impl GenerationStats {
    /// Compute statistics from the evaluated rows of a population
    pub fn from_population(population: &Population, generation: usize) -> Self {
        Self {
            generation,
            evaluations: population.evaluations(),
            population_size: population.evaluated_len(),
            non_dominated: population.non_dominated_indices().len(),
            feasible: population.feasible_count(),
            ideal: population.ideal_point().unwrap_or_default(),
            nadir: population.nadir_point().unwrap_or_default(),
            hypervolume: None,
            timing: TimingStats::default(),
        }
    }

    /// Set the hypervolume
    pub fn with_hypervolume(mut self, hypervolume: f64) -> Self {
        self.hypervolume = Some(hypervolume);
        self
    }

    /// Set timing information
    pub fn with_timing(mut self, timing: TimingStats) -> Self {
        self.timing = timing;
        self
    }
}

/// Statistics collector for an entire run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Statistics per generation
    pub generations: Vec<GenerationStats>,
    /// Interaction checkpoints reached
    pub interactions: usize,
    /// Preferences applied to the reference vectors
    pub preferences_applied: usize,
    /// Total runtime in milliseconds
    pub total_runtime_ms: f64,
    /// Reason for termination
    pub termination_reason: Option<String>,
}

impl RunStats {
    /// Create a new stats collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a generation's statistics
    pub fn record(&mut self, stats: GenerationStats) {
        self.generations.push(stats);
    }

    /// Get the number of generations recorded
    pub fn num_generations(&self) -> usize {
        self.generations.len()
    }

    /// Hypervolume per recorded generation, where measured
    pub fn hypervolume_history(&self) -> Vec<(usize, f64)> {
        self.generations
            .iter()
            .filter_map(|g| g.hypervolume.map(|hv| (g.generation, hv)))
            .collect()
    }

    /// Most recent generation's statistics
    pub fn last(&self) -> Option<&GenerationStats> {
        self.generations.last()
    }

    /// Set the total runtime
    pub fn set_runtime(&mut self, duration: Duration) {
        self.total_runtime_ms = duration.as_secs_f64() * 1000.0;
    }

    /// Set the termination reason
    pub fn set_termination_reason(&mut self, reason: &str) {
        self.termination_reason = Some(reason.to_string());
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Generations: {}\n", self.num_generations()));
        s.push_str(&format!("Interactions: {}\n", self.interactions));
        s.push_str(&format!("Preferences applied: {}\n", self.preferences_applied));
        if let Some(last) = self.last() {
            s.push_str(&format!("Evaluations: {}\n", last.evaluations));
            s.push_str(&format!("Final population: {}\n", last.population_size));
            s.push_str(&format!("Non-dominated: {}\n", last.non_dominated));
            if let Some(hv) = last.hypervolume {
                s.push_str(&format!("Hypervolume: {:.6}\n", hv));
            }
        }
        s.push_str(&format!("Runtime: {:.2}ms\n", self.total_runtime_ms));
        if let Some(reason) = &self.termination_reason {
            s.push_str(&format!("Termination: {}\n", reason));
        }
        s
    }
}

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{GenerationStats, RunStats, TimingStats};
}
