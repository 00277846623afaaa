//! Problem capability traits
//!
//! A problem author supplies objectives and, optionally, constraint
//! violations and a per-chunk update hook. Every optional capability has a
//! default so the driver never probes for what a problem can do.

use serde::{Deserialize, Serialize};

use crate::error::EvaluationError;
use crate::genome::bounds::MultiBounds;
use crate::population::population::Population;

/// Whether an objective is minimized or maximized
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectiveDirection {
    /// Smaller values are better
    #[default]
    Minimize,
    /// Larger values are better
    Maximize,
}

impl ObjectiveDirection {
    /// Multiplier mapping an objective value into minimization space
    pub fn sign(&self) -> f64 {
        match self {
            Self::Minimize => 1.0,
            Self::Maximize => -1.0,
        }
    }
}

/// Result of evaluating one decision vector
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Objective values in the problem's own directions
    pub objectives: Vec<f64>,
    /// Total constraint violation, 0 when feasible
    pub violation: f64,
}

impl Evaluation {
    /// Create a feasible evaluation
    pub fn feasible(objectives: Vec<f64>) -> Self {
        Self {
            objectives,
            violation: 0.0,
        }
    }

    /// Whether all constraints are satisfied
    pub fn is_feasible(&self) -> bool {
        self.violation <= 0.0
    }
}

/// Optimization problem trait
///
/// Objectives are evaluated row by row unless [`Problem::evaluate_batch`] is
/// overridden. Implementations must be thread-safe so the population can fan
/// evaluation out across workers.
pub trait Problem: Send + Sync {
    /// Human-readable name
    fn name(&self) -> &str {
        "problem"
    }

    /// Number of decision variables
    fn num_variables(&self) -> usize;

    /// Number of objectives
    fn num_objectives(&self) -> usize;

    /// Decision-variable bounds
    fn bounds(&self) -> MultiBounds;

    /// Evaluate all objectives for one decision vector
    fn objectives(&self, decision: &[f64]) -> Result<Vec<f64>, EvaluationError>;

    /// Optimization direction of each objective (all minimized by default)
    fn directions(&self) -> Vec<ObjectiveDirection> {
        vec![ObjectiveDirection::Minimize; self.num_objectives()]
    }

    /// Whether [`Problem::constraint_violation`] is meaningful
    fn has_constraints(&self) -> bool {
        false
    }

    /// Total constraint violation for a decision vector, 0 when feasible
    fn constraint_violation(
        &self,
        _decision: &[f64],
        _objectives: &[f64],
    ) -> Result<f64, EvaluationError> {
        Ok(0.0)
    }

    /// Evaluate objectives and constraint violation together
    fn evaluate(&self, decision: &[f64]) -> Result<Evaluation, EvaluationError> {
        let objectives = self.objectives(decision)?;
        let violation = if self.has_constraints() {
            self.constraint_violation(decision, &objectives)?
        } else {
            0.0
        };
        Ok(Evaluation {
            objectives,
            violation,
        })
    }

    /// Evaluate many decision vectors, results in input order
    fn evaluate_batch(&self, decisions: &[Vec<f64>]) -> Vec<Result<Evaluation, EvaluationError>> {
        decisions.iter().map(|d| self.evaluate(d)).collect()
    }

    /// Hook invoked once per interaction chunk with the current population
    fn update(&mut self, _population: &Population) -> Result<(), EvaluationError> {
        Ok(())
    }
}

/// A problem built from closures
pub struct FnProblem<F>
where
    F: Fn(&[f64]) -> Vec<f64> + Send + Sync,
{
    name: String,
    bounds: MultiBounds,
    num_objectives: usize,
    objective_fn: F,
    constraint_fn: Option<Box<dyn Fn(&[f64], &[f64]) -> f64 + Send + Sync>>,
    directions: Option<Vec<ObjectiveDirection>>,
}

impl<F> FnProblem<F>
where
    F: Fn(&[f64]) -> Vec<f64> + Send + Sync,
{
    /// Create a problem from an objective closure
    pub fn new(
        name: impl Into<String>,
        bounds: MultiBounds,
        num_objectives: usize,
        objective_fn: F,
    ) -> Self {
        Self {
            name: name.into(),
            bounds,
            num_objectives,
            objective_fn,
            constraint_fn: None,
            directions: None,
        }
    }

    /// Attach a constraint-violation closure
    pub fn with_constraints<C>(mut self, constraint_fn: C) -> Self
    where
        C: Fn(&[f64], &[f64]) -> f64 + Send + Sync + 'static,
    {
        self.constraint_fn = Some(Box::new(constraint_fn));
        self
    }

    /// Override objective directions
    pub fn with_directions(mut self, directions: Vec<ObjectiveDirection>) -> Self {
        self.directions = Some(directions);
        self
    }
}

impl<F> Problem for FnProblem<F>
where
    F: Fn(&[f64]) -> Vec<f64> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn num_variables(&self) -> usize {
        self.bounds.dimension()
    }

    fn num_objectives(&self) -> usize {
        self.num_objectives
    }

    fn bounds(&self) -> MultiBounds {
        self.bounds.clone()
    }

    fn objectives(&self, decision: &[f64]) -> Result<Vec<f64>, EvaluationError> {
        Ok((self.objective_fn)(decision))
    }

    fn directions(&self) -> Vec<ObjectiveDirection> {
        self.directions
            .clone()
            .unwrap_or_else(|| vec![ObjectiveDirection::Minimize; self.num_objectives])
    }

    fn has_constraints(&self) -> bool {
        self.constraint_fn.is_some()
    }

    fn constraint_violation(
        &self,
        decision: &[f64],
        objectives: &[f64],
    ) -> Result<f64, EvaluationError> {
        Ok(self
            .constraint_fn
            .as_ref()
            .map_or(0.0, |c| c(decision, objectives)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::bounds::Bounds;

    fn square_problem() -> FnProblem<impl Fn(&[f64]) -> Vec<f64> + Send + Sync> {
        FnProblem::new(
            "squares",
            MultiBounds::uniform(Bounds::new(-1.0, 1.0), 2),
            2,
            |x: &[f64]| vec![x[0] * x[0], x[1] * x[1]],
        )
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(ObjectiveDirection::Minimize.sign(), 1.0);
        assert_eq!(ObjectiveDirection::Maximize.sign(), -1.0);
    }

    #[test]
    fn test_fn_problem_defaults() {
        let problem = square_problem();
        assert_eq!(problem.name(), "squares");
        assert_eq!(problem.num_variables(), 2);
        assert!(!problem.has_constraints());
        assert_eq!(problem.directions(), vec![ObjectiveDirection::Minimize; 2]);

        let eval = problem.evaluate(&[0.5, -1.0]).unwrap();
        assert_eq!(eval, Evaluation::feasible(vec![0.25, 1.0]));
    }

    #[test]
    fn test_fn_problem_with_constraints() {
        let problem = square_problem().with_constraints(|x, _| (x[0] + x[1] - 1.0).max(0.0));
        assert!(problem.has_constraints());

        let eval = problem.evaluate(&[1.0, 0.5]).unwrap();
        assert_eq!(eval.violation, 0.5);
        let eval = problem.evaluate(&[0.1, 0.1]).unwrap();
        assert_eq!(eval.violation, 0.0);
    }

    #[test]
    fn test_evaluate_batch_preserves_order() {
        let problem = square_problem();
        let results = problem.evaluate_batch(&[vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(results[0].as_ref().unwrap().objectives, vec![1.0, 0.0]);
        assert_eq!(results[1].as_ref().unwrap().objectives, vec![0.0, 1.0]);
    }
}
