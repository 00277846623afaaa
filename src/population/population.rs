//! Population type
//!
//! Individuals are stored as aligned rows: decision vectors, objective
//! vectors, minimization-space fitness and constraint violations. Rows that
//! have been evaluated always form a prefix; rows appended by mating wait in
//! the suffix until the next call to [`Population::evaluate`].

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::archive::{Archive, ArchiveEntry};
use super::dominance;
use super::hypervolume::hypervolume;
use crate::error::{EvaluationError, EvoResult, EvolutionError};
use crate::genome::bounds::MultiBounds;
use crate::genome::design::{uniform_design, InitialDesign};
use crate::operators::traits::{CrossoverOperator, MutationOperator};
use crate::problem::traits::{Evaluation, ObjectiveDirection, Problem};

/// A population of decision vectors and their evaluations
#[derive(Clone, Debug)]
pub struct Population {
    bounds: MultiBounds,
    num_objectives: usize,
    directions: Vec<ObjectiveDirection>,
    decisions: Vec<Vec<f64>>,
    objectives: Vec<Vec<f64>>,
    fitness: Vec<Vec<f64>>,
    violations: Vec<f64>,
    running_ideal: Option<Vec<f64>>,
    running_worst: Option<Vec<f64>>,
    archive: Option<Archive>,
    evaluations: usize,
}

impl Population {
    /// Create an empty population
    pub fn new(bounds: MultiBounds, num_objectives: usize) -> EvoResult<Self> {
        bounds.validate(bounds.dimension())?;
        if num_objectives == 0 {
            return Err(EvolutionError::config("at least one objective is required"));
        }
        Ok(Self {
            bounds,
            num_objectives,
            directions: vec![ObjectiveDirection::Minimize; num_objectives],
            decisions: Vec::new(),
            objectives: Vec::new(),
            fitness: Vec::new(),
            violations: Vec::new(),
            running_ideal: None,
            running_worst: None,
            archive: None,
            evaluations: 0,
        })
    }

    /// Draw `count` decision vectors uniformly within the given limits
    pub fn initialize<R: Rng>(
        count: usize,
        lower: &[f64],
        upper: &[f64],
        num_objectives: usize,
        rng: &mut R,
    ) -> EvoResult<Self> {
        let bounds = MultiBounds::from_limits(lower, upper)?;
        let mut population = Self::new(bounds, num_objectives)?;
        let rows = uniform_design(count, &population.bounds, rng);
        population.push_decisions(rows)?;
        Ok(population)
    }

    /// Draw `count` decision vectors with an initial design
    pub fn with_design<R: Rng>(
        count: usize,
        bounds: MultiBounds,
        num_objectives: usize,
        design: InitialDesign,
        rng: &mut R,
    ) -> EvoResult<Self> {
        let mut population = Self::new(bounds, num_objectives)?;
        let rows = design.sample(count, &population.bounds, rng);
        population.push_decisions(rows)?;
        Ok(population)
    }

    /// Create a population from caller-supplied decision vectors
    ///
    /// Every vector must lie within `bounds`.
    pub fn from_decisions(
        decisions: Vec<Vec<f64>>,
        bounds: MultiBounds,
        num_objectives: usize,
    ) -> EvoResult<Self> {
        let mut population = Self::new(bounds, num_objectives)?;
        for (row, decision) in decisions.iter().enumerate() {
            if !population.bounds.contains_vec(decision) {
                return Err(EvolutionError::config(format!(
                    "decision vector {row} lies outside the bounds"
                )));
            }
        }
        population.push_decisions(decisions)?;
        Ok(population)
    }

    /// Set the optimization direction of each objective
    ///
    /// Must be called before any row is evaluated.
    pub fn with_directions(mut self, directions: Vec<ObjectiveDirection>) -> EvoResult<Self> {
        if directions.len() != self.num_objectives {
            return Err(EvolutionError::config(format!(
                "{} directions given for {} objectives",
                directions.len(),
                self.num_objectives
            )));
        }
        if !self.objectives.is_empty() {
            return Err(EvolutionError::config(
                "directions cannot change after evaluation",
            ));
        }
        self.directions = directions;
        Ok(self)
    }

    /// Record every evaluated row in an archive
    pub fn with_archive(mut self) -> Self {
        self.archive.get_or_insert_with(Archive::new);
        self
    }

    /// Append unevaluated decision vectors, clamped to the bounds
    pub fn push_decisions(&mut self, rows: Vec<Vec<f64>>) -> EvoResult<()> {
        let dimension = self.bounds.dimension();
        if let Some(bad) = rows.iter().find(|r| r.len() != dimension) {
            return Err(EvolutionError::config(format!(
                "decision vector has {} variables, expected {dimension}",
                bad.len()
            )));
        }
        for mut row in rows {
            self.bounds.clamp_vec(&mut row);
            self.decisions.push(row);
        }
        Ok(())
    }

    /// Number of rows, evaluated or not
    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    /// Check if the population has no rows
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    /// Number of evaluated rows
    pub fn evaluated_len(&self) -> usize {
        self.objectives.len()
    }

    /// Number of rows waiting for evaluation
    pub fn pending_len(&self) -> usize {
        self.decisions.len() - self.objectives.len()
    }

    /// Check if every row has objective values
    pub fn is_fully_evaluated(&self) -> bool {
        self.pending_len() == 0
    }

    /// Decision vectors of all rows
    pub fn decisions(&self) -> &[Vec<f64>] {
        &self.decisions
    }

    /// Objective vectors of the evaluated rows, in the problem's own directions
    pub fn objectives(&self) -> &[Vec<f64>] {
        &self.objectives
    }

    /// Objective vectors of the evaluated rows mapped to minimization space
    pub fn fitness(&self) -> &[Vec<f64>] {
        &self.fitness
    }

    /// Constraint violations of the evaluated rows
    pub fn violations(&self) -> &[f64] {
        &self.violations
    }

    /// Objective directions
    pub fn directions(&self) -> &[ObjectiveDirection] {
        &self.directions
    }

    /// Decision-variable bounds
    pub fn bounds(&self) -> &MultiBounds {
        &self.bounds
    }

    /// Number of objectives
    pub fn num_objectives(&self) -> usize {
        self.num_objectives
    }

    /// Number of decision variables
    pub fn num_variables(&self) -> usize {
        self.bounds.dimension()
    }

    /// Total evaluator calls made so far
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Evaluation archive, when enabled
    pub fn archive(&self) -> Option<&Archive> {
        self.archive.as_ref()
    }

    /// Best fitness seen in each objective over the whole run
    pub fn running_ideal(&self) -> Option<&[f64]> {
        self.running_ideal.as_deref()
    }

    /// Worst fitness seen in each objective over the whole run
    pub fn running_worst(&self) -> Option<&[f64]> {
        self.running_worst.as_deref()
    }

    /// Number of feasible evaluated rows
    pub fn feasible_count(&self) -> usize {
        self.violations.iter().filter(|&&v| v <= 0.0).count()
    }

    /// Map a point between objective space and minimization space
    ///
    /// The mapping is its own inverse.
    pub fn to_fitness(&self, point: &[f64]) -> Vec<f64> {
        point
            .iter()
            .zip(self.directions.iter())
            .map(|(x, d)| x * d.sign())
            .collect()
    }

    /// Evaluate every pending row (sequential)
    ///
    /// Returns the number of rows evaluated. Nothing is committed unless the
    /// whole batch is valid.
    pub fn evaluate<P: Problem + ?Sized>(&mut self, problem: &P, generation: usize) -> EvoResult<usize> {
        let start = self.objectives.len();
        if start == self.decisions.len() {
            return Ok(0);
        }
        let results = problem.evaluate_batch(&self.decisions[start..]);
        self.commit(start, results, generation)
    }

    /// Ideal point: componentwise minimum fitness over evaluated rows
    pub fn ideal_point(&self) -> Option<Vec<f64>> {
        componentwise(&self.fitness, f64::min)
    }

    /// Componentwise maximum fitness over evaluated rows
    pub fn fitness_max(&self) -> Option<Vec<f64>> {
        componentwise(&self.fitness, f64::max)
    }

    /// Nadir point: componentwise maximum fitness over the non-dominated rows
    pub fn nadir_point(&self) -> Option<Vec<f64>> {
        let front: Vec<Vec<f64>> = self
            .non_dominated_indices()
            .into_iter()
            .map(|i| self.fitness[i].clone())
            .collect();
        componentwise(&front, f64::max)
    }

    /// For each evaluated row, whether no other evaluated row dominates it
    pub fn non_dominated_mask(&self) -> Vec<bool> {
        dominance::non_dominated_mask(&self.fitness, &self.violations)
    }

    /// Indices of the non-dominated evaluated rows
    pub fn non_dominated_indices(&self) -> Vec<usize> {
        self.non_dominated_mask()
            .into_iter()
            .enumerate()
            .filter_map(|(i, nd)| nd.then_some(i))
            .collect()
    }

    /// Successive non-dominated fronts over the evaluated rows
    pub fn non_dominated_fronts(&self) -> Vec<Vec<usize>> {
        dominance::non_dominated_fronts(&self.fitness, &self.violations)
    }

    /// Produce `count` offspring and append them as pending rows
    ///
    /// Parents are paired at random without replacement, reshuffling whenever
    /// the pool runs out; an odd parent out is paired with a random partner.
    pub fn mate<C, M, R>(
        &mut self,
        count: usize,
        crossover: &C,
        mutation: &M,
        rng: &mut R,
    ) -> EvoResult<usize>
    where
        C: CrossoverOperator,
        M: MutationOperator,
        R: Rng,
    {
        let parents = self.decisions.len();
        if parents == 0 {
            return Err(EvolutionError::EmptyPopulation);
        }
        if count == 0 {
            return Ok(0);
        }

        let mut offspring: Vec<Vec<f64>> = Vec::with_capacity(count + 1);
        let mut order: Vec<usize> = (0..parents).collect();
        'mating: loop {
            order.shuffle(rng);
            for pair in order.chunks(2) {
                let (i, j) = match *pair {
                    [i, j] => (i, j),
                    [i] => (i, rng.gen_range(0..parents)),
                    _ => continue,
                };

                let (mut child1, mut child2) =
                    if rng.gen::<f64>() < crossover.crossover_probability() {
                        crossover.crossover(
                            &self.decisions[i],
                            &self.decisions[j],
                            &self.bounds,
                            rng,
                        )?
                    } else {
                        (self.decisions[i].clone(), self.decisions[j].clone())
                    };
                mutation.mutate(&mut child1, &self.bounds, rng);
                mutation.mutate(&mut child2, &self.bounds, rng);

                offspring.push(child1);
                if offspring.len() >= count {
                    break 'mating;
                }
                offspring.push(child2);
                if offspring.len() >= count {
                    break 'mating;
                }
            }
        }

        self.push_decisions(offspring)?;
        debug!(count, parents, "mated offspring");
        Ok(count)
    }

    /// Retain only the given rows, preserving their relative order
    ///
    /// Requires every row to be evaluated. Repeated indices are kept once.
    pub fn keep(&mut self, indices: &[usize]) -> EvoResult<()> {
        let selected = self.flag_rows(indices)?;
        self.retain_rows(&selected);
        Ok(())
    }

    /// Drop the given rows, preserving the order of the rest
    pub fn remove(&mut self, indices: &[usize]) -> EvoResult<()> {
        let selected: Vec<bool> = self.flag_rows(indices)?.into_iter().map(|f| !f).collect();
        self.retain_rows(&selected);
        Ok(())
    }

    /// Hypervolume of the feasible non-dominated rows
    ///
    /// `reference` is given in the problem's own objective directions.
    pub fn hypervolume(&self, reference: &[f64]) -> EvoResult<f64> {
        if reference.len() != self.num_objectives {
            return Err(EvolutionError::config(format!(
                "reference point has {} components, expected {}",
                reference.len(),
                self.num_objectives
            )));
        }
        let reference = self.to_fitness(reference);
        let front: Vec<Vec<f64>> = self
            .non_dominated_indices()
            .into_iter()
            .filter(|&i| self.violations[i] <= 0.0)
            .map(|i| self.fitness[i].clone())
            .collect();
        Ok(hypervolume(&front, &reference))
    }

    fn commit(
        &mut self,
        start: usize,
        results: Vec<Result<Evaluation, EvaluationError>>,
        generation: usize,
    ) -> EvoResult<usize> {
        let expected = self.decisions.len() - start;
        if results.len() != expected {
            return Err(EvolutionError::Evaluation {
                row: start + results.len().min(expected),
                source: EvaluationError::Failed(format!(
                    "batch returned {} results for {expected} rows",
                    results.len()
                )),
            });
        }

        let mut accepted = Vec::with_capacity(results.len());
        for (offset, result) in results.into_iter().enumerate() {
            let row = start + offset;
            let evaluation =
                result.map_err(|source| EvolutionError::Evaluation { row, source })?;
            if evaluation.objectives.len() != self.num_objectives {
                return Err(EvolutionError::ObjectiveLength {
                    row,
                    expected: self.num_objectives,
                    actual: evaluation.objectives.len(),
                });
            }
            if let Some(index) = evaluation.objectives.iter().position(|v| !v.is_finite()) {
                return Err(EvolutionError::Evaluation {
                    row,
                    source: EvaluationError::NonFinite { index },
                });
            }
            if evaluation.violation.is_nan() {
                return Err(EvolutionError::Evaluation {
                    row,
                    source: EvaluationError::Failed("constraint violation is NaN".to_string()),
                });
            }
            accepted.push(evaluation);
        }

        let count = accepted.len();
        for (offset, evaluation) in accepted.into_iter().enumerate() {
            let fitness = self.to_fitness(&evaluation.objectives);
            let violation = evaluation.violation.max(0.0);
            self.track_extremes(&fitness);
            if let Some(archive) = self.archive.as_mut() {
                archive.push(ArchiveEntry {
                    generation,
                    decision: self.decisions[start + offset].clone(),
                    objectives: evaluation.objectives.clone(),
                    violation,
                });
            }
            self.objectives.push(evaluation.objectives);
            self.fitness.push(fitness);
            self.violations.push(violation);
        }
        self.evaluations += count;
        debug!(rows = count, generation, "evaluated rows");
        Ok(count)
    }

    fn track_extremes(&mut self, fitness: &[f64]) {
        match (self.running_ideal.as_mut(), self.running_worst.as_mut()) {
            (Some(ideal), Some(worst)) => {
                for ((lo, hi), f) in ideal.iter_mut().zip(worst.iter_mut()).zip(fitness) {
                    *lo = lo.min(*f);
                    *hi = hi.max(*f);
                }
            }
            _ => {
                self.running_ideal = Some(fitness.to_vec());
                self.running_worst = Some(fitness.to_vec());
            }
        }
    }

    fn flag_rows(&self, indices: &[usize]) -> EvoResult<Vec<bool>> {
        let pending = self.pending_len();
        if pending > 0 {
            return Err(EvolutionError::Unevaluated { pending });
        }
        let len = self.len();
        let mut selected = vec![false; len];
        for &index in indices {
            if index >= len {
                return Err(EvolutionError::RowOutOfRange { index, len });
            }
            selected[index] = true;
        }
        Ok(selected)
    }

    fn retain_rows(&mut self, selected: &[bool]) {
        retain_flagged(&mut self.decisions, selected);
        retain_flagged(&mut self.objectives, selected);
        retain_flagged(&mut self.fitness, selected);
        retain_flagged(&mut self.violations, selected);
    }
}

/// Parallel evaluation support (requires `parallel` feature)
#[cfg(feature = "parallel")]
impl Population {
    /// Evaluate every pending row across the rayon thread pool
    ///
    /// Results are committed in row order.
    pub fn evaluate_parallel<P: Problem + ?Sized>(
        &mut self,
        problem: &P,
        generation: usize,
    ) -> EvoResult<usize> {
        let start = self.objectives.len();
        if start == self.decisions.len() {
            return Ok(0);
        }
        let results: Vec<_> = self.decisions[start..]
            .par_iter()
            .map(|decision| problem.evaluate(decision))
            .collect();
        self.commit(start, results, generation)
    }
}

/// Sequential fallback for parallel evaluation (when `parallel` feature is disabled)
#[cfg(not(feature = "parallel"))]
impl Population {
    /// Evaluate every pending row (sequential fallback)
    pub fn evaluate_parallel<P: Problem + ?Sized>(
        &mut self,
        problem: &P,
        generation: usize,
    ) -> EvoResult<usize> {
        self.evaluate(problem, generation)
    }
}

fn componentwise(rows: &[Vec<f64>], pick: fn(f64, f64) -> f64) -> Option<Vec<f64>> {
    let (first, rest) = rows.split_first()?;
    Some(rest.iter().fold(first.clone(), |mut acc, row| {
        for (a, x) in acc.iter_mut().zip(row) {
            *a = pick(*a, *x);
        }
        acc
    }))
}

fn retain_flagged<T>(rows: &mut Vec<T>, flags: &[bool]) {
    let mut index = 0;
    rows.retain(|_| {
        let keep = flags[index];
        index += 1;
        keep
    });
}
