//! Mutation operators
//!
//! Bounded polynomial mutation for real-valued decision vectors.

use rand::Rng;

use crate::genome::bounds::MultiBounds;
use crate::operators::traits::MutationOperator;

/// Polynomial mutation
///
/// Perturbs each selected variable with a polynomial probability
/// distribution scaled to the variable's range, so the step shrinks as the
/// variable approaches a limit.
///
/// Reference: Deb, K., & Goyal, M. (1996). A Combined Genetic Adaptive
/// Search (GeneAS) for Engineering Design.
#[derive(Clone, Debug)]
pub struct PolynomialMutation {
    /// Distribution index (typically 20-100)
    /// Higher values = smaller mutations
    pub eta_m: f64,
    /// Per-variable mutation probability (default: 1/n)
    pub mutation_probability: Option<f64>,
}

impl PolynomialMutation {
    /// Create a new polynomial mutation with the given distribution index
    pub fn new(eta_m: f64) -> Self {
        assert!(eta_m >= 0.0, "Distribution index must be non-negative");
        Self {
            eta_m,
            mutation_probability: None,
        }
    }

    /// Set a fixed mutation probability per variable
    pub fn with_probability(mut self, probability: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&probability),
            "Probability must be in [0, 1]"
        );
        self.mutation_probability = Some(probability);
        self
    }

    /// Apply polynomial mutation to one variable
    fn mutate_gene<R: Rng>(&self, gene: f64, min: f64, max: f64, rng: &mut R) -> f64 {
        let range = max - min;
        if range <= 0.0 {
            return gene;
        }

        let delta1 = (gene - min) / range;
        let delta2 = (max - gene) / range;
        let exponent = 1.0 / (self.eta_m + 1.0);

        let u = rng.gen::<f64>();
        let delta_q = if u < 0.5 {
            let val = 2.0 * u + (1.0 - 2.0 * u) * (1.0 - delta1).powf(self.eta_m + 1.0);
            val.powf(exponent) - 1.0
        } else {
            let val = 2.0 * (1.0 - u) + 2.0 * (u - 0.5) * (1.0 - delta2).powf(self.eta_m + 1.0);
            1.0 - val.powf(exponent)
        };

        (gene + delta_q * range).clamp(min, max)
    }
}

impl Default for PolynomialMutation {
    fn default() -> Self {
        Self::new(20.0)
    }
}

impl MutationOperator for PolynomialMutation {
    fn mutate<R: Rng>(&self, decision: &mut [f64], bounds: &MultiBounds, rng: &mut R) {
        let prob = self.mutation_probability(decision.len());

        for (gene, bound) in decision.iter_mut().zip(bounds.bounds.iter()) {
            if rng.gen::<f64>() < prob {
                *gene = self.mutate_gene(*gene, bound.min, bound.max, rng);
            }
        }
    }

    fn mutation_probability(&self, dimension: usize) -> f64 {
        self.mutation_probability
            .unwrap_or(1.0 / dimension.max(1) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::bounds::Bounds;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_polynomial_mutation_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(21);
        let bounds = MultiBounds::new(vec![
            Bounds::new(0.0, 1.0),
            Bounds::new(-5.0, 5.0),
            Bounds::new(10.0, 10.5),
        ]);
        let mutation = PolynomialMutation::new(5.0).with_probability(1.0);

        for _ in 0..500 {
            let mut x = vec![0.0, 5.0, 10.25];
            mutation.mutate(&mut x, &bounds, &mut rng);
            for (i, &gene) in x.iter().enumerate() {
                let bound = bounds.get(i).unwrap();
                assert!(
                    bound.contains(gene),
                    "Gene {} out of bounds: {} not in [{}, {}]",
                    i,
                    gene,
                    bound.min,
                    bound.max
                );
            }
        }
    }

    #[test]
    fn test_polynomial_mutation_changes_values() {
        let mut rng = StdRng::seed_from_u64(22);
        let bounds = MultiBounds::uniform(Bounds::unit(), 10);
        let original = vec![0.5; 10];
        let mut x = original.clone();
        PolynomialMutation::new(20.0)
            .with_probability(1.0)
            .mutate(&mut x, &bounds, &mut rng);
        assert_ne!(x, original);
    }

    #[test]
    fn test_polynomial_mutation_zero_probability() {
        let mut rng = StdRng::seed_from_u64(23);
        let bounds = MultiBounds::uniform(Bounds::unit(), 4);
        let mut x = vec![0.1, 0.2, 0.3, 0.4];
        PolynomialMutation::new(20.0)
            .with_probability(0.0)
            .mutate(&mut x, &bounds, &mut rng);
        assert_eq!(x, vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_default_probability_is_one_over_n() {
        let mutation = PolynomialMutation::default();
        assert_eq!(mutation.mutation_probability(5), 0.2);
    }

    #[test]
    fn test_degenerate_range_is_untouched() {
        let mut rng = StdRng::seed_from_u64(24);
        let mutation = PolynomialMutation::new(20.0);
        assert_eq!(mutation.mutate_gene(3.0, 3.0, 3.0, &mut rng), 3.0);
    }
}
