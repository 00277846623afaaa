//! Synthetic test problems
//!
//! Standard multi-objective benchmarks with known Pareto fronts.

use std::f64::consts::FRAC_PI_2;

use super::traits::Problem;
use crate::error::EvaluationError;
use crate::genome::bounds::{Bounds, MultiBounds};

/// ZDT1: two objectives, convex front f2 = 1 - sqrt(f1)
///
/// Variables in [0, 1]; the front is reached when x[1..] = 0.
#[derive(Clone, Debug)]
pub struct Zdt1 {
    num_variables: usize,
}

impl Zdt1 {
    /// Create a new ZDT1 instance (at least 2 variables)
    pub fn new(num_variables: usize) -> Self {
        Self {
            num_variables: num_variables.max(2),
        }
    }
}

impl Problem for Zdt1 {
    fn name(&self) -> &str {
        "ZDT1"
    }

    fn num_variables(&self) -> usize {
        self.num_variables
    }

    fn num_objectives(&self) -> usize {
        2
    }

    fn bounds(&self) -> MultiBounds {
        MultiBounds::uniform(Bounds::unit(), self.num_variables)
    }

    fn objectives(&self, x: &[f64]) -> Result<Vec<f64>, EvaluationError> {
        let n = x.len() as f64;
        let f1 = x[0];
        let g = 1.0 + 9.0 * x[1..].iter().sum::<f64>() / (n - 1.0);
        let f2 = g * (1.0 - (f1 / g).sqrt());
        Ok(vec![f1, f2])
    }
}

/// DTLZ2: M objectives, spherical front Σ f_i² = 1
///
/// Variables in [0, 1]; distance variables x[M-1..] are optimal at 0.5.
#[derive(Clone, Debug)]
pub struct Dtlz2 {
    num_variables: usize,
    num_objectives: usize,
}

impl Dtlz2 {
    /// Create a DTLZ2 instance with the usual k = 10 distance variables
    pub fn new(num_objectives: usize) -> Self {
        Self::with_variables(num_objectives, num_objectives + 9)
    }

    /// Create a DTLZ2 instance with an explicit variable count
    pub fn with_variables(num_objectives: usize, num_variables: usize) -> Self {
        let num_objectives = num_objectives.max(2);
        Self {
            num_objectives,
            num_variables: num_variables.max(num_objectives),
        }
    }
}

impl Problem for Dtlz2 {
    fn name(&self) -> &str {
        "DTLZ2"
    }

    fn num_variables(&self) -> usize {
        self.num_variables
    }

    fn num_objectives(&self) -> usize {
        self.num_objectives
    }

    fn bounds(&self) -> MultiBounds {
        MultiBounds::uniform(Bounds::unit(), self.num_variables)
    }

    fn objectives(&self, x: &[f64]) -> Result<Vec<f64>, EvaluationError> {
        let m = self.num_objectives;
        let g: f64 = x[m - 1..].iter().map(|xi| (xi - 0.5).powi(2)).sum();

        let f = (0..m)
            .map(|i| {
                let mut value = 1.0 + g;
                for xj in &x[..m - 1 - i] {
                    value *= (xj * FRAC_PI_2).cos();
                }
                if i > 0 {
                    value *= (x[m - 1 - i] * FRAC_PI_2).sin();
                }
                value
            })
            .collect();
        Ok(f)
    }
}

/// Binh and Korn: two objectives, two inequality constraints
///
/// x in [0, 5], y in [0, 3].
#[derive(Clone, Debug, Default)]
pub struct BinhKorn;

impl BinhKorn {
    /// Create a new instance
    pub fn new() -> Self {
        Self
    }
}

impl Problem for BinhKorn {
    fn name(&self) -> &str {
        "Binh-Korn"
    }

    fn num_variables(&self) -> usize {
        2
    }

    fn num_objectives(&self) -> usize {
        2
    }

    fn bounds(&self) -> MultiBounds {
        MultiBounds::new(vec![Bounds::new(0.0, 5.0), Bounds::new(0.0, 3.0)])
    }

    fn objectives(&self, x: &[f64]) -> Result<Vec<f64>, EvaluationError> {
        let (a, b) = (x[0], x[1]);
        Ok(vec![
            4.0 * a * a + 4.0 * b * b,
            (a - 5.0).powi(2) + (b - 5.0).powi(2),
        ])
    }

    fn has_constraints(&self) -> bool {
        true
    }

    fn constraint_violation(&self, x: &[f64], _objectives: &[f64]) -> Result<f64, EvaluationError> {
        let (a, b) = (x[0], x[1]);
        // (x - 5)^2 + y^2 <= 25
        let g1 = ((a - 5.0).powi(2) + b * b - 25.0).max(0.0);
        // (x - 8)^2 + (y + 3)^2 >= 7.7
        let g2 = (7.7 - (a - 8.0).powi(2) - (b + 3.0).powi(2)).max(0.0);
        Ok(g1 + g2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zdt1_front() {
        let problem = Zdt1::new(5);
        let f = problem.objectives(&[0.25, 0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_relative_eq!(f[0], 0.25);
        assert_relative_eq!(f[1], 0.5);
    }

    #[test]
    fn test_zdt1_off_front() {
        let problem = Zdt1::new(3);
        let f = problem.objectives(&[0.0, 1.0, 1.0]).unwrap();
        assert_relative_eq!(f[1], 10.0);
    }

    #[test]
    fn test_dtlz2_on_front_has_unit_norm() {
        let problem = Dtlz2::new(3);
        let mut x = vec![0.5; problem.num_variables()];
        x[0] = 0.2;
        x[1] = 0.7;
        let f = problem.objectives(&x).unwrap();
        assert_eq!(f.len(), 3);
        let norm_sq: f64 = f.iter().map(|v| v * v).sum();
        assert_relative_eq!(norm_sq, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dtlz2_corner() {
        let problem = Dtlz2::with_variables(2, 4);
        let f = problem.objectives(&[0.0, 0.5, 0.5, 0.5]).unwrap();
        assert_relative_eq!(f[0], 1.0);
        assert_relative_eq!(f[1], 0.0);
    }

    #[test]
    fn test_binh_korn_constraints() {
        let problem = BinhKorn::new();
        assert!(problem.has_constraints());
        let feasible = problem.evaluate(&[1.0, 1.0]).unwrap();
        assert_eq!(feasible.violation, 0.0);
        assert_relative_eq!(feasible.objectives[0], 8.0);
        assert_relative_eq!(feasible.objectives[1], 32.0);

        // (0 - 5)^2 + 3^2 = 34 exceeds 25 by 9
        let infeasible = problem.evaluate(&[0.0, 3.0]).unwrap();
        assert_relative_eq!(infeasible.violation, 9.0);
        assert!(!infeasible.is_feasible());
    }
}
