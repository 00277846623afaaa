//! Reference vector guided evolutionary algorithm
//!
//! The driver owns one population and one reference vector set for the
//! length of a run. Generations are produced in chunks; at the end of each
//! chunk the problem may refit itself, an interaction checkpoint may steer
//! the reference vectors toward a preferred point, and the vectors are
//! always re-fitted to the current objective range.

use std::marker::PhantomData;
use std::time::Instant;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::apd::ApdSelector;
use crate::diagnostics::{GenerationStats, RunStats, TimingStats};
use crate::error::{EvoResult, EvolutionError};
use crate::genome::design::InitialDesign;
use crate::interactive::checkpoint::{Decision, InteractionCheckpoint};
use crate::operators::crossover::SbxCrossover;
use crate::operators::mutation::PolynomialMutation;
use crate::population::population::Population;
use crate::problem::traits::Problem;
use crate::reference::vectors::ReferenceVectorSet;

/// Configuration for RVEA
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RveaConfig {
    /// Initial population size and offspring produced per generation
    pub population_size: usize,
    /// Simplex-lattice resolution of the reference vectors
    pub lattice_resolution: usize,
    /// Number of objectives
    pub num_objectives: usize,
    /// Exponent α of the APD generation factor
    pub penalty_exponent: f64,
    /// Total generation budget
    pub max_generations: usize,
    /// Generations between interaction checkpoints
    pub generations_per_interaction: usize,
    /// Probability that a mating pair is recombined
    pub crossover_probability: f64,
    /// SBX distribution index
    pub crossover_eta: f64,
    /// Per-variable mutation probability (default: 1/n)
    pub mutation_probability: Option<f64>,
    /// Polynomial mutation distribution index
    pub mutation_eta: f64,
    /// Append the axis vectors to the lattice
    pub add_edge_vectors: bool,
    /// Translation strength used when a preference omits one
    pub preference_strength: f64,
    /// Sampling plan for the first population
    pub initial_design: InitialDesign,
    /// Reference point for per-generation hypervolume, in objective directions
    pub hypervolume_reference: Option<Vec<f64>>,
    /// Archive every evaluated individual
    pub keep_archive: bool,
    /// Whether to evaluate in parallel
    pub parallel_evaluation: bool,
}

impl Default for RveaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            lattice_resolution: 12,
            num_objectives: 3,
            penalty_exponent: 2.0,
            max_generations: 100,
            generations_per_interaction: 10,
            crossover_probability: 1.0,
            crossover_eta: 30.0,
            mutation_probability: None,
            mutation_eta: 20.0,
            add_edge_vectors: false,
            preference_strength: 0.5,
            initial_design: InitialDesign::LatinHypercube,
            hypervolume_reference: None,
            keep_archive: false,
            parallel_evaluation: true,
        }
    }
}

impl RveaConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> EvoResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EvolutionError::config(format!("invalid configuration JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every option before a run starts
    pub fn validate(&self) -> EvoResult<()> {
        if self.population_size == 0 {
            return Err(EvolutionError::config("population size must be at least 1"));
        }
        if self.num_objectives < 2 {
            return Err(EvolutionError::config(format!(
                "at least 2 objectives are required, got {}",
                self.num_objectives
            )));
        }
        if self.lattice_resolution == 0 {
            return Err(EvolutionError::config("lattice resolution must be at least 1"));
        }
        if self.generations_per_interaction == 0 {
            return Err(EvolutionError::config(
                "generations per interaction must be at least 1",
            ));
        }
        if !self.penalty_exponent.is_finite() || self.penalty_exponent < 0.0 {
            return Err(EvolutionError::config(format!(
                "penalty exponent must be a non-negative number, got {}",
                self.penalty_exponent
            )));
        }
        check_probability("crossover probability", self.crossover_probability)?;
        if let Some(p) = self.mutation_probability {
            check_probability("mutation probability", p)?;
        }
        check_probability("preference strength", self.preference_strength)?;
        check_eta("crossover distribution index", self.crossover_eta)?;
        check_eta("mutation distribution index", self.mutation_eta)?;
        if let Some(reference) = &self.hypervolume_reference {
            if reference.len() != self.num_objectives {
                return Err(EvolutionError::config(format!(
                    "hypervolume reference has {} components, expected {}",
                    reference.len(),
                    self.num_objectives
                )));
            }
        }
        Ok(())
    }

    /// SBX operator described by this configuration
    pub fn crossover(&self) -> SbxCrossover {
        SbxCrossover::new(self.crossover_eta).with_probability(self.crossover_probability)
    }

    /// Polynomial mutation described by this configuration
    pub fn mutation(&self) -> PolynomialMutation {
        let mutation = PolynomialMutation::new(self.mutation_eta);
        match self.mutation_probability {
            Some(p) => mutation.with_probability(p),
            None => mutation,
        }
    }
}

fn check_probability(name: &str, value: f64) -> EvoResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(EvolutionError::config(format!(
            "{name} must be in [0, 1], got {value}"
        )));
    }
    Ok(())
}

fn check_eta(name: &str, value: f64) -> EvoResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(EvolutionError::config(format!(
            "{name} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

/// Why a run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// The generation budget was used up
    BudgetExhausted,
    /// A checkpoint (or the caller) stopped the run
    Stopped,
}

impl TerminationReason {
    /// Human-readable description
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BudgetExhausted => "Maximum generations reached",
            Self::Stopped => "Stopped at interaction checkpoint",
        }
    }
}

/// Final state of a run
#[derive(Clone, Debug)]
pub struct RunResult {
    /// Final population
    pub population: Population,
    /// Final reference vectors
    pub reference_vectors: ReferenceVectorSet,
    /// Generations completed
    pub generations: usize,
    /// Total evaluator calls
    pub evaluations: usize,
    /// Why the run ended
    pub termination: TerminationReason,
    /// Run statistics
    pub stats: RunStats,
}

impl RunResult {
    /// Objective vectors of the non-dominated rows
    pub fn pareto_objectives(&self) -> Vec<Vec<f64>> {
        self.population
            .non_dominated_indices()
            .into_iter()
            .map(|i| self.population.objectives()[i].clone())
            .collect()
    }

    /// Decision vectors of the non-dominated rows
    pub fn pareto_decisions(&self) -> Vec<Vec<f64>> {
        self.population
            .non_dominated_indices()
            .into_iter()
            .map(|i| self.population.decisions()[i].clone())
            .collect()
    }
}

/// Builder for [`Rvea`]
///
/// Carries the problem type so that `Rvea::builder()...build(problem)`
/// infers it from the problem handed to [`build`](Self::build).
pub struct RveaBuilder<P> {
    config: RveaConfig,
    _problem: PhantomData<fn() -> P>,
}

impl<P> Default for RveaBuilder<P> {
    fn default() -> Self {
        Self {
            config: RveaConfig::default(),
            _problem: PhantomData,
        }
    }
}

impl<P> Clone for RveaBuilder<P> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            _problem: PhantomData,
        }
    }
}

impl<P> std::fmt::Debug for RveaBuilder<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RveaBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl<P: Problem> RveaBuilder<P> {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: RveaConfig) -> Self {
        Self {
            config,
            _problem: PhantomData,
        }
    }

    /// Set the population size
    pub fn population_size(mut self, size: usize) -> Self {
        self.config.population_size = size;
        self
    }

    /// Set the lattice resolution
    pub fn lattice_resolution(mut self, resolution: usize) -> Self {
        self.config.lattice_resolution = resolution;
        self
    }

    /// Set the number of objectives
    pub fn num_objectives(mut self, count: usize) -> Self {
        self.config.num_objectives = count;
        self
    }

    /// Set the APD penalty exponent
    pub fn penalty_exponent(mut self, alpha: f64) -> Self {
        self.config.penalty_exponent = alpha;
        self
    }

    /// Set the generation budget
    pub fn max_generations(mut self, max: usize) -> Self {
        self.config.max_generations = max;
        self
    }

    /// Set the chunk size between checkpoints
    pub fn generations_per_interaction(mut self, count: usize) -> Self {
        self.config.generations_per_interaction = count;
        self
    }

    /// Set the crossover probability
    pub fn crossover_probability(mut self, probability: f64) -> Self {
        self.config.crossover_probability = probability;
        self
    }

    /// Set the SBX distribution index
    pub fn crossover_eta(mut self, eta: f64) -> Self {
        self.config.crossover_eta = eta;
        self
    }

    /// Set a fixed per-variable mutation probability
    pub fn mutation_probability(mut self, probability: f64) -> Self {
        self.config.mutation_probability = Some(probability);
        self
    }

    /// Set the polynomial mutation distribution index
    pub fn mutation_eta(mut self, eta: f64) -> Self {
        self.config.mutation_eta = eta;
        self
    }

    /// Append axis vectors to the lattice
    pub fn add_edge_vectors(mut self, enabled: bool) -> Self {
        self.config.add_edge_vectors = enabled;
        self
    }

    /// Set the default preference strength
    pub fn preference_strength(mut self, strength: f64) -> Self {
        self.config.preference_strength = strength;
        self
    }

    /// Set the initial design
    pub fn initial_design(mut self, design: InitialDesign) -> Self {
        self.config.initial_design = design;
        self
    }

    /// Record hypervolume against `reference` every generation
    pub fn hypervolume_reference(mut self, reference: Vec<f64>) -> Self {
        self.config.hypervolume_reference = Some(reference);
        self
    }

    /// Archive every evaluated individual
    pub fn keep_archive(mut self, enabled: bool) -> Self {
        self.config.keep_archive = enabled;
        self
    }

    /// Enable or disable parallel evaluation
    pub fn parallel_evaluation(mut self, enabled: bool) -> Self {
        self.config.parallel_evaluation = enabled;
        self
    }

    /// Build the driver for `problem`
    pub fn build(self, problem: P) -> EvoResult<Rvea<P>> {
        Rvea::new(self.config, problem)
    }
}

/// RVEA driver
pub struct Rvea<P: Problem> {
    config: RveaConfig,
    problem: P,
    selector: ApdSelector,
    crossover: SbxCrossover,
    mutation: PolynomialMutation,
    population: Option<Population>,
    vectors: ReferenceVectorSet,
    generation: usize,
    termination: Option<TerminationReason>,
    stats: RunStats,
}

impl<P: Problem> Rvea<P> {
    /// Create a builder
    pub fn builder() -> RveaBuilder<P> {
        RveaBuilder::new()
    }

    /// Validate `config` against `problem` and set up the reference vectors
    pub fn new(config: RveaConfig, problem: P) -> EvoResult<Self> {
        config.validate()?;
        if problem.num_objectives() != config.num_objectives {
            return Err(EvolutionError::config(format!(
                "problem '{}' has {} objectives, configuration expects {}",
                problem.name(),
                problem.num_objectives(),
                config.num_objectives
            )));
        }
        problem.bounds().validate(problem.num_variables())?;
        if problem.directions().len() != config.num_objectives {
            return Err(EvolutionError::config(format!(
                "problem '{}' declares {} objective directions, expected {}",
                problem.name(),
                problem.directions().len(),
                config.num_objectives
            )));
        }

        let mut vectors =
            ReferenceVectorSet::initialize(config.num_objectives, config.lattice_resolution)?;
        if config.add_edge_vectors {
            vectors.add_edge_vectors();
        }

        Ok(Self {
            selector: ApdSelector::new(config.penalty_exponent),
            crossover: config.crossover(),
            mutation: config.mutation(),
            config,
            problem,
            population: None,
            vectors,
            generation: 0,
            termination: None,
            stats: RunStats::new(),
        })
    }

    /// Sample and evaluate the initial population
    pub fn initialize<R: Rng>(&mut self, rng: &mut R) -> EvoResult<()> {
        let population = Population::with_design(
            self.config.population_size,
            self.problem.bounds(),
            self.config.num_objectives,
            self.config.initial_design,
            rng,
        )?;
        self.start(population)
    }

    /// Start from caller-supplied decision vectors
    pub fn initialize_from(&mut self, decisions: Vec<Vec<f64>>) -> EvoResult<()> {
        let population = Population::from_decisions(
            decisions,
            self.problem.bounds(),
            self.config.num_objectives,
        )?;
        self.start(population)
    }

    fn start(&mut self, population: Population) -> EvoResult<()> {
        if population.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }
        let mut population = population.with_directions(self.problem.directions())?;
        if self.config.keep_archive {
            population = population.with_archive();
        }

        let eval_start = Instant::now();
        evaluate(&mut population, &self.problem, self.config.parallel_evaluation, 0)?;
        let timing = TimingStats::new().with_evaluation(eval_start.elapsed());

        self.generation = 0;
        self.termination = None;
        self.stats = RunStats::new();
        let stats = self.generation_stats(&population, 0, timing)?;
        self.stats.record(stats);
        info!(
            problem = self.problem.name(),
            population = population.len(),
            vectors = self.vectors.len(),
            max_generations = self.config.max_generations,
            "initialized RVEA"
        );
        self.population = Some(population);
        Ok(())
    }

    /// Produce one generation: mate, evaluate offspring, APD-select
    ///
    /// Initializes the population first if needed.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> EvoResult<&GenerationStats> {
        if self.population.is_none() {
            self.initialize(rng)?;
        }
        if self.is_finished() {
            return Err(EvolutionError::config("the run has already finished"));
        }
        let gen_start = Instant::now();
        let next_generation = self.generation + 1;

        let mut population = self.population.take().ok_or(EvolutionError::EmptyPopulation)?;
        let outcome = self.produce(&mut population, next_generation, rng);
        let stats = match outcome {
            Ok(timing) => self.generation_stats(
                &population,
                next_generation,
                timing.with_total(gen_start.elapsed()),
            ),
            Err(e) => Err(e),
        };
        self.population = Some(population);
        let stats = stats?;

        self.generation = next_generation;
        debug!(
            generation = self.generation,
            survivors = stats.population_size,
            non_dominated = stats.non_dominated,
            hypervolume = ?stats.hypervolume,
            "generation complete"
        );
        self.stats.record(stats);
        self.stats
            .last()
            .ok_or_else(|| EvolutionError::Numerical("no statistics recorded".to_string()))
    }

    fn produce<R: Rng>(
        &self,
        population: &mut Population,
        generation: usize,
        rng: &mut R,
    ) -> EvoResult<TimingStats> {
        let parallel = self.config.parallel_evaluation;
        let mut eval_time = Instant::now();
        evaluate(population, &self.problem, parallel, generation)?;
        let mut evaluation = eval_time.elapsed();

        let mate_start = Instant::now();
        population.mate(
            self.config.population_size,
            &self.crossover,
            &self.mutation,
            rng,
        )?;
        let mating = mate_start.elapsed();

        eval_time = Instant::now();
        evaluate(population, &self.problem, parallel, generation)?;
        evaluation += eval_time.elapsed();

        let select_start = Instant::now();
        let survivors = self.selector.select(
            population,
            &self.vectors,
            generation,
            self.config.max_generations,
        )?;
        population.keep(&survivors)?;
        let selection = select_start.elapsed();

        Ok(TimingStats::new()
            .with_evaluation(evaluation)
            .with_mating(mating)
            .with_selection(selection))
    }

    /// Whether the current generation closes an interaction chunk
    pub fn at_chunk_boundary(&self) -> bool {
        self.generation > 0
            && (self.generation % self.config.generations_per_interaction == 0
                || self.generation >= self.config.max_generations)
    }

    /// Close a chunk: refit the problem, apply `decision`, re-fit the vectors
    ///
    /// Returns the termination reason when the decision stops the run.
    pub fn end_chunk(&mut self, decision: Decision) -> EvoResult<Option<TerminationReason>> {
        {
            let population = self.population.as_ref().ok_or(EvolutionError::EmptyPopulation)?;
            self.problem
                .update(population)
                .map_err(EvolutionError::ProblemUpdate)?;
        }
        let outcome = self.apply_decision(decision)?;
        self.adapt()?;
        info!(generation = self.generation, "interaction chunk complete");
        Ok(outcome)
    }

    /// Apply a checkpoint decision to the reference vectors
    pub fn apply_decision(&mut self, decision: Decision) -> EvoResult<Option<TerminationReason>> {
        match decision {
            Decision::Continue => Ok(None),
            Decision::Stop => {
                info!(generation = self.generation, "run stopped at checkpoint");
                self.termination = Some(TerminationReason::Stopped);
                Ok(Some(TerminationReason::Stopped))
            }
            Decision::Preference { point, strength } => {
                let population = self.population.as_ref().ok_or(EvolutionError::EmptyPopulation)?;
                if point.len() != self.config.num_objectives {
                    return Err(EvolutionError::config(format!(
                        "preference point has {} components, expected {}",
                        point.len(),
                        self.config.num_objectives
                    )));
                }
                let strength = self.resolve_strength(strength);
                let ideal = population
                    .ideal_point()
                    .ok_or(EvolutionError::EmptyPopulation)?;
                let direction: Vec<f64> = population
                    .to_fitness(&point)
                    .iter()
                    .zip(ideal.iter())
                    .map(|(p, z)| p - z)
                    .collect();
                // Translate against the range of the current population
                self.adapt()?;
                self.vectors.translate_toward(&direction, strength)?;
                self.stats.preferences_applied += 1;
                info!(
                    generation = self.generation,
                    ?point,
                    strength,
                    "applied preference point"
                );
                Ok(None)
            }
        }
    }

    fn resolve_strength(&self, requested: Option<f64>) -> f64 {
        let default = self.config.preference_strength;
        match requested {
            None => default,
            Some(s) if (0.0..=1.0).contains(&s) => s,
            Some(s) if s.is_nan() => {
                warn!(default, "preference strength is NaN, using default");
                default
            }
            Some(s) => {
                let clamped = s.clamp(0.0, 1.0);
                warn!(requested = s, clamped, "preference strength outside [0, 1]");
                clamped
            }
        }
    }

    fn adapt(&mut self) -> EvoResult<()> {
        let population = self.population.as_ref().ok_or(EvolutionError::EmptyPopulation)?;
        let (min, max) = match (population.ideal_point(), population.fitness_max()) {
            (Some(min), Some(max)) => (min, max),
            _ => return Err(EvolutionError::EmptyPopulation),
        };
        self.vectors.adapt(&min, &max)
    }

    /// Run to completion, consulting `checkpoint` at every chunk boundary
    /// before the budget is exhausted
    pub fn run<C, R>(mut self, checkpoint: &mut C, rng: &mut R) -> EvoResult<RunResult>
    where
        C: InteractionCheckpoint + ?Sized,
        R: Rng,
    {
        let start_time = Instant::now();
        if self.population.is_none() {
            self.initialize(rng)?;
        }

        while !self.is_finished() {
            self.step(rng)?;
            if !self.at_chunk_boundary() {
                continue;
            }
            let decision = if self.generation < self.config.max_generations {
                self.stats.interactions += 1;
                let population = self.population.as_ref().ok_or(EvolutionError::EmptyPopulation)?;
                checkpoint.checkpoint(population, self.generation)
            } else {
                Decision::Continue
            };
            self.end_chunk(decision)?;
        }

        self.stats.set_runtime(start_time.elapsed());
        self.finish()
    }

    /// Whether the budget is used up or the run was stopped
    pub fn is_finished(&self) -> bool {
        self.termination.is_some() || self.generation >= self.config.max_generations
    }

    /// Consume the driver and return the final state
    ///
    /// A run finished early by the caller reports [`TerminationReason::Stopped`].
    pub fn finish(mut self) -> EvoResult<RunResult> {
        let termination = match self.termination {
            Some(reason) => reason,
            None if self.generation >= self.config.max_generations => {
                TerminationReason::BudgetExhausted
            }
            None => TerminationReason::Stopped,
        };
        let population = self.population.take().ok_or(EvolutionError::EmptyPopulation)?;
        self.stats.set_termination_reason(termination.as_str());
        info!(
            generations = self.generation,
            evaluations = population.evaluations(),
            reason = termination.as_str(),
            "RVEA finished"
        );
        Ok(RunResult {
            generations: self.generation,
            evaluations: population.evaluations(),
            population,
            reference_vectors: self.vectors,
            termination,
            stats: self.stats,
        })
    }

    fn generation_stats(
        &self,
        population: &Population,
        generation: usize,
        timing: TimingStats,
    ) -> EvoResult<GenerationStats> {
        let stats = GenerationStats::from_population(population, generation).with_timing(timing);
        match &self.config.hypervolume_reference {
            Some(reference) => Ok(stats.with_hypervolume(population.hypervolume(reference)?)),
            None => Ok(stats),
        }
    }

    /// Current population, once initialized
    pub fn population(&self) -> Option<&Population> {
        self.population.as_ref()
    }

    /// Current reference vectors
    pub fn reference_vectors(&self) -> &ReferenceVectorSet {
        &self.vectors
    }

    /// Generations completed
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Configuration
    pub fn config(&self) -> &RveaConfig {
        &self.config
    }

    /// The problem being solved
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Statistics collected so far
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }
}

fn evaluate<P: Problem + ?Sized>(
    population: &mut Population,
    problem: &P,
    parallel: bool,
    generation: usize,
) -> EvoResult<usize> {
    if parallel {
        population.evaluate_parallel(problem, generation)
    } else {
        population.evaluate(problem, generation)
    }
}
