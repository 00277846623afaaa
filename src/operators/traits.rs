//! Operator traits
//!
//! Variation operators act on raw decision vectors and always receive the
//! decision-space bounds so offspring stay feasible with respect to limits.

use rand::Rng;

use crate::error::OperatorError;
use crate::genome::bounds::MultiBounds;

/// Crossover operator trait
///
/// Combines two parent decision vectors into two offspring.
pub trait CrossoverOperator: Send + Sync {
    /// Apply crossover to two parents and produce two offspring within `bounds`
    fn crossover<R: Rng>(
        &self,
        parent1: &[f64],
        parent2: &[f64],
        bounds: &MultiBounds,
        rng: &mut R,
    ) -> Result<(Vec<f64>, Vec<f64>), OperatorError>;

    /// Probability that a selected pair is recombined at all
    fn crossover_probability(&self) -> f64 {
        1.0
    }
}

/// Mutation operator trait
///
/// Perturbs a decision vector in place, keeping it within `bounds`.
pub trait MutationOperator: Send + Sync {
    /// Apply mutation to a decision vector
    fn mutate<R: Rng>(&self, decision: &mut [f64], bounds: &MultiBounds, rng: &mut R);

    /// Per-variable mutation probability for a vector of `dimension` variables
    fn mutation_probability(&self, dimension: usize) -> f64 {
        1.0 / dimension.max(1) as f64
    }
}
