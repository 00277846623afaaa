//! Crossover operators
//!
//! Simulated binary crossover for real-valued decision vectors.

use rand::Rng;

use crate::error::OperatorError;
use crate::genome::bounds::MultiBounds;
use crate::operators::traits::CrossoverOperator;

/// Simulated Binary Crossover (SBX)
///
/// SBX generates offspring from parents using a spread factor that
/// simulates single-point crossover for binary strings.
///
/// Reference: Deb, K., & Agrawal, R. B. (1995). Simulated Binary Crossover
/// for Continuous Search Space.
#[derive(Clone, Debug)]
pub struct SbxCrossover {
    /// Distribution index; higher values keep offspring closer to parents
    pub eta: f64,
    /// Probability that a pair is recombined
    pub probability: f64,
    /// Per-variable probability of exchanging material once a pair is recombined
    pub gene_probability: f64,
}

impl SbxCrossover {
    /// Create a new SBX crossover with the given distribution index
    pub fn new(eta: f64) -> Self {
        assert!(eta >= 0.0, "Distribution index must be non-negative");
        Self {
            eta,
            probability: 1.0,
            gene_probability: 0.5,
        }
    }

    /// Set the per-pair crossover probability
    pub fn with_probability(mut self, probability: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&probability),
            "Probability must be in [0, 1]"
        );
        self.probability = probability;
        self
    }

    /// Set the per-variable exchange probability
    pub fn with_gene_probability(mut self, probability: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&probability),
            "Probability must be in [0, 1]"
        );
        self.gene_probability = probability;
        self
    }

    /// Compute the spread factor β from a uniform random value
    fn spread_factor(&self, u: f64) -> f64 {
        if u <= 0.5 {
            (2.0 * u).powf(1.0 / (self.eta + 1.0))
        } else {
            (1.0 / (2.0 * (1.0 - u))).powf(1.0 / (self.eta + 1.0))
        }
    }
}

impl Default for SbxCrossover {
    fn default() -> Self {
        Self::new(30.0)
    }
}

impl CrossoverOperator for SbxCrossover {
    fn crossover<R: Rng>(
        &self,
        parent1: &[f64],
        parent2: &[f64],
        bounds: &MultiBounds,
        rng: &mut R,
    ) -> Result<(Vec<f64>, Vec<f64>), OperatorError> {
        if parent1.len() != parent2.len() {
            return Err(OperatorError::CrossoverFailed(format!(
                "parent lengths differ: {} vs {}",
                parent1.len(),
                parent2.len()
            )));
        }

        let mut child1 = parent1.to_vec();
        let mut child2 = parent2.to_vec();

        for i in 0..parent1.len() {
            if rng.gen::<f64>() >= self.gene_probability {
                continue;
            }
            let x1 = parent1[i];
            let x2 = parent2[i];

            // Identical parents produce identical children
            if (x1 - x2).abs() <= 1e-14 {
                continue;
            }

            let beta = self.spread_factor(rng.gen::<f64>());
            child1[i] = 0.5 * ((1.0 + beta) * x1 + (1.0 - beta) * x2);
            child2[i] = 0.5 * ((1.0 - beta) * x1 + (1.0 + beta) * x2);

            if let Some(bound) = bounds.get(i) {
                child1[i] = bound.clamp(child1[i]);
                child2[i] = bound.clamp(child2[i]);
            }
        }

        Ok((child1, child2))
    }

    fn crossover_probability(&self) -> f64 {
        self.probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::bounds::Bounds;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spread_factor_is_one_at_midpoint() {
        let sbx = SbxCrossover::new(20.0);
        assert_relative_eq!(sbx.spread_factor(0.5), 1.0);
        assert!(sbx.spread_factor(0.1) < 1.0);
        assert!(sbx.spread_factor(0.9) > 1.0);
    }

    #[test]
    fn test_sbx_preserves_midpoint() {
        let mut rng = StdRng::seed_from_u64(11);
        let bounds = MultiBounds::uniform(Bounds::new(-100.0, 100.0), 5);
        let sbx = SbxCrossover::new(15.0).with_gene_probability(1.0);
        let p1 = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let p2 = vec![2.0, 1.0, 5.0, 3.0, 0.0];

        let (c1, c2) = sbx.crossover(&p1, &p2, &bounds, &mut rng).unwrap();
        for i in 0..5 {
            assert_relative_eq!(c1[i] + c2[i], p1[i] + p2[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_sbx_respects_bounds() {
        let mut rng = StdRng::seed_from_u64(12);
        let bounds = MultiBounds::uniform(Bounds::unit(), 4);
        let sbx = SbxCrossover::new(1.0).with_gene_probability(1.0);

        for _ in 0..200 {
            let (c1, c2) = sbx
                .crossover(&[0.0, 1.0, 0.01, 0.99], &[1.0, 0.0, 0.02, 0.98], &bounds, &mut rng)
                .unwrap();
            assert!(bounds.contains_vec(&c1));
            assert!(bounds.contains_vec(&c2));
        }
    }

    #[test]
    fn test_sbx_identical_parents() {
        let mut rng = StdRng::seed_from_u64(13);
        let bounds = MultiBounds::uniform(Bounds::unit(), 3);
        let p = vec![0.2, 0.4, 0.6];
        let (c1, c2) = SbxCrossover::new(20.0)
            .with_gene_probability(1.0)
            .crossover(&p, &p, &bounds, &mut rng)
            .unwrap();
        assert_eq!(c1, p);
        assert_eq!(c2, p);
    }

    #[test]
    fn test_sbx_length_mismatch() {
        let mut rng = StdRng::seed_from_u64(14);
        let bounds = MultiBounds::uniform(Bounds::unit(), 3);
        let result = SbxCrossover::default().crossover(&[0.1, 0.2], &[0.1], &bounds, &mut rng);
        assert!(matches!(result, Err(OperatorError::CrossoverFailed(_))));
    }
}
