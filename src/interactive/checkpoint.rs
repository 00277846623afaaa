//! Interaction checkpoints
//!
//! At the end of every chunk of generations the driver hands the current
//! population to a checkpoint and waits for a [`Decision`]. Console or
//! notebook interaction lives entirely behind this trait.

use serde::{Deserialize, Serialize};

use crate::population::population::Population;

/// Outcome of an interaction checkpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Decision {
    /// Keep going with the current reference vectors
    Continue,
    /// Bias the reference vectors toward a point in objective space
    Preference {
        /// Preferred objective vector, in the problem's own directions
        point: Vec<f64>,
        /// Translation strength in [0, 1]; the configured default when absent
        strength: Option<f64>,
    },
    /// End the run successfully with the current population
    Stop,
}

impl Decision {
    /// Preference with the configured default strength
    pub fn prefer(point: Vec<f64>) -> Self {
        Self::Preference {
            point,
            strength: None,
        }
    }

    /// Preference with an explicit strength
    pub fn prefer_with_strength(point: Vec<f64>, strength: f64) -> Self {
        Self::Preference {
            point,
            strength: Some(strength),
        }
    }
}

/// Called by the driver between chunks of generations
pub trait InteractionCheckpoint {
    /// Inspect the population after `generation` generations and decide how to proceed
    fn checkpoint(&mut self, population: &Population, generation: usize) -> Decision;
}

impl<F> InteractionCheckpoint for F
where
    F: FnMut(&Population, usize) -> Decision,
{
    fn checkpoint(&mut self, population: &Population, generation: usize) -> Decision {
        self(population, generation)
    }
}

/// Checkpoint that always continues
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInteraction;

impl InteractionCheckpoint for NoInteraction {
    fn checkpoint(&mut self, _population: &Population, _generation: usize) -> Decision {
        Decision::Continue
    }
}

/// Checkpoint that replays decisions fixed in advance
///
/// Each entry fires once, at the first checkpoint reached at or after its
/// generation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScheduledDecisions {
    /// (generation, decision) pairs, sorted by generation
    pub steps: Vec<(usize, Decision)>,
    next: usize,
}

impl ScheduledDecisions {
    /// Create a schedule
    pub fn new(steps: Vec<(usize, Decision)>) -> Self {
        let mut steps = steps;
        steps.sort_by_key(|(generation, _)| *generation);
        Self { steps, next: 0 }
    }

    /// Schedule with a single decision
    pub fn single(generation: usize, decision: Decision) -> Self {
        Self::new(vec![(generation, decision)])
    }

    /// Whether every scheduled decision has fired
    pub fn is_exhausted(&self) -> bool {
        self.next >= self.steps.len()
    }
}

impl InteractionCheckpoint for ScheduledDecisions {
    fn checkpoint(&mut self, _population: &Population, generation: usize) -> Decision {
        match self.steps.get(self.next) {
            Some((at, decision)) if *at <= generation => {
                self.next += 1;
                decision.clone()
            }
            _ => Decision::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::bounds::{Bounds, MultiBounds};

    fn empty_population() -> Population {
        Population::new(MultiBounds::uniform(Bounds::unit(), 2), 2).unwrap()
    }

    #[test]
    fn test_no_interaction() {
        let population = empty_population();
        assert_eq!(NoInteraction.checkpoint(&population, 10), Decision::Continue);
    }

    #[test]
    fn test_closure_checkpoint() {
        let population = empty_population();
        let mut calls = Vec::new();
        let mut checkpoint = |_: &Population, generation: usize| {
            calls.push(generation);
            if generation >= 20 {
                Decision::Stop
            } else {
                Decision::Continue
            }
        };
        assert_eq!(checkpoint.checkpoint(&population, 10), Decision::Continue);
        assert_eq!(checkpoint.checkpoint(&population, 20), Decision::Stop);
        assert_eq!(calls, vec![10, 20]);
    }

    #[test]
    fn test_scheduled_decisions_fire_once() {
        let population = empty_population();
        let mut schedule = ScheduledDecisions::new(vec![
            (25, Decision::prefer(vec![0.1, 0.9])),
            (10, Decision::Continue),
        ]);
        assert_eq!(schedule.steps[0].0, 10);

        assert_eq!(schedule.checkpoint(&population, 5), Decision::Continue);
        assert_eq!(schedule.checkpoint(&population, 10), Decision::Continue);
        assert_eq!(
            schedule.checkpoint(&population, 30),
            Decision::prefer(vec![0.1, 0.9])
        );
        assert!(schedule.is_exhausted());
        assert_eq!(schedule.checkpoint(&population, 40), Decision::Continue);
    }

    #[test]
    fn test_decision_serde() {
        let decision = Decision::prefer_with_strength(vec![1.0, 2.0], 0.3);
        let json = serde_json::to_string(&decision).unwrap();
        let back: Decision = serde_json::from_str(&json).unwrap();
        assert_eq!(back, decision);
    }
}
