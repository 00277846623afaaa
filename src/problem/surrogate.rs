//! Surrogate-backed problems
//!
//! Objectives come from a fitted model instead of the true evaluator. The
//! model is refitted from the population at every interaction chunk; how it
//! fits is entirely the model's business.

use tracing::debug;

use super::traits::Problem;
use crate::error::EvaluationError;
use crate::genome::bounds::MultiBounds;
use crate::population::population::Population;

/// A model that predicts objective vectors from decision vectors
pub trait SurrogateModel: Send + Sync {
    /// Predict objective values for one decision vector
    fn predict(&self, decision: &[f64]) -> Result<Vec<f64>, EvaluationError>;

    /// Refit the model on evaluated decision/objective pairs
    fn fit(&mut self, decisions: &[Vec<f64>], objectives: &[Vec<f64>])
        -> Result<(), EvaluationError>;
}

/// Problem whose objectives are predicted by a [`SurrogateModel`]
#[derive(Clone, Debug)]
pub struct SurrogateProblem<M: SurrogateModel> {
    name: String,
    bounds: MultiBounds,
    num_objectives: usize,
    model: M,
    refits: usize,
}

impl<M: SurrogateModel> SurrogateProblem<M> {
    /// Wrap a model
    pub fn new(name: impl Into<String>, bounds: MultiBounds, num_objectives: usize, model: M) -> Self {
        Self {
            name: name.into(),
            bounds,
            num_objectives,
            model,
            refits: 0,
        }
    }

    /// The wrapped model
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Number of times the model has been refitted
    pub fn refits(&self) -> usize {
        self.refits
    }
}

impl<M: SurrogateModel> Problem for SurrogateProblem<M> {
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
        self.model.predict(decision)
    }

    fn update(&mut self, population: &Population) -> Result<(), EvaluationError> {
        let evaluated = population.evaluated_len();
        self.model.fit(
            &population.decisions()[..evaluated],
            population.objectives(),
        )?;
        self.refits += 1;
        debug!(rows = evaluated, refits = self.refits, "refitted surrogate model");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::bounds::Bounds;

    // Predicts the mean of the training objectives
    #[derive(Default)]
    struct MeanModel {
        mean: Vec<f64>,
        seen: usize,
    }

    impl SurrogateModel for MeanModel {
        fn predict(&self, _decision: &[f64]) -> Result<Vec<f64>, EvaluationError> {
            if self.mean.is_empty() {
                return Ok(vec![0.0, 0.0]);
            }
            Ok(self.mean.clone())
        }

        fn fit(
            &mut self,
            decisions: &[Vec<f64>],
            objectives: &[Vec<f64>],
        ) -> Result<(), EvaluationError> {
            if decisions.len() != objectives.len() {
                return Err(EvaluationError::Failed("misaligned training data".into()));
            }
            let n = objectives.len().max(1) as f64;
            self.mean = (0..2)
                .map(|j| objectives.iter().map(|o| o[j]).sum::<f64>() / n)
                .collect();
            self.seen = objectives.len();
            Ok(())
        }
    }

    #[test]
    fn test_update_refits_model() {
        let bounds = MultiBounds::uniform(Bounds::unit(), 2);
        let mut problem = SurrogateProblem::new("mean", bounds.clone(), 2, MeanModel::default());

        let mut population =
            Population::from_decisions(vec![vec![0.0, 0.0], vec![1.0, 1.0]], bounds, 2).unwrap();
        let truth = crate::problem::benchmarks::Zdt1::new(2);
        population.evaluate(&truth, 0).unwrap();

        problem.update(&population).unwrap();
        assert_eq!(problem.refits(), 1);
        assert_eq!(problem.model().seen, 2);

        let predicted = problem.objectives(&[0.3, 0.3]).unwrap();
        let expected: Vec<f64> = (0..2)
            .map(|j| population.objectives().iter().map(|o| o[j]).sum::<f64>() / 2.0)
            .collect();
        assert_eq!(predicted, expected);
    }
}
