//! Angle-penalized distance selection
//!
//! Environmental selection of RVEA (Cheng, Jin, Olhofer & Sendhoff 2016).
//! Each individual is assigned to the reference vector it is angularly
//! closest to, and every non-empty cluster keeps the member with the smallest
//! angle-penalized distance:
//!
//! ```text
//! APD = ||f - z|| * (1 + M * (g / G)^α * θ / θ_i)
//! ```
//!
//! where `z` is the ideal point, `θ` the angle to the assigned vector and
//! `θ_i` that vector's smallest angle to a neighbor. Early generations
//! reward convergence; the growing `(g / G)^α` factor shifts pressure toward
//! spread.

use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, EvolutionError};
use crate::population::population::Population;
use crate::reference::lattice::{dot, norm, NORM_EPSILON};
use crate::reference::vectors::ReferenceVectorSet;

/// Assignment of individuals to reference vectors
#[derive(Clone, Debug, PartialEq)]
pub struct Association {
    /// Index of the assigned reference vector per individual
    pub assignment: Vec<usize>,
    /// Angle to the assigned vector per individual
    pub angles: Vec<f64>,
    /// Distance to the ideal point per individual
    pub distances: Vec<f64>,
}

impl Association {
    /// Members of each cluster, in row order
    pub fn clusters(&self, num_vectors: usize) -> Vec<Vec<usize>> {
        let mut clusters = vec![Vec::new(); num_vectors];
        for (row, &vector) in self.assignment.iter().enumerate() {
            clusters[vector].push(row);
        }
        clusters
    }
}

/// APD environmental selection
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApdSelector {
    /// Exponent α of the generation ratio
    pub penalty_exponent: f64,
}

impl ApdSelector {
    /// Create a selector with the given penalty exponent
    pub fn new(penalty_exponent: f64) -> Self {
        Self { penalty_exponent }
    }

    /// Generation factor `(g / G)^α`, capped at 1
    pub fn penalty_scale(&self, generation: usize, max_generations: usize) -> f64 {
        if max_generations == 0 {
            return 1.0;
        }
        let ratio = (generation as f64 / max_generations as f64).min(1.0);
        ratio.powf(self.penalty_exponent)
    }

    /// Assign every fitness row to its angularly closest reference vector
    ///
    /// Ties go to the lowest vector index. A row sitting exactly on the ideal
    /// point has no direction; it is given angle 0 and vector 0.
    pub fn associate(
        &self,
        fitness: &[Vec<f64>],
        ideal: &[f64],
        vectors: &ReferenceVectorSet,
    ) -> Association {
        let mut assignment = Vec::with_capacity(fitness.len());
        let mut angles = Vec::with_capacity(fitness.len());
        let mut distances = Vec::with_capacity(fitness.len());

        for row in fitness {
            let translated: Vec<f64> = row.iter().zip(ideal).map(|(f, z)| f - z).collect();
            let distance = norm(&translated);
            distances.push(distance);

            if distance <= NORM_EPSILON {
                assignment.push(0);
                angles.push(0.0);
                continue;
            }

            let mut best = 0;
            let mut best_cosine = f64::NEG_INFINITY;
            for (index, v) in vectors.values().iter().enumerate() {
                let cosine = dot(&translated, v) / distance;
                if cosine > best_cosine {
                    best = index;
                    best_cosine = cosine;
                }
            }
            assignment.push(best);
            angles.push(best_cosine.clamp(-1.0, 1.0).acos());
        }

        Association {
            assignment,
            angles,
            distances,
        }
    }

    /// APD score per row, with infeasible rows pushed behind every feasible
    /// member of their cluster
    pub fn scores(
        &self,
        association: &Association,
        violations: &[f64],
        vectors: &ReferenceVectorSet,
        scale: f64,
    ) -> Vec<f64> {
        let m = vectors.num_objectives() as f64;
        let neighbor_angles = vectors.neighbor_angles();

        let mut scores: Vec<f64> = association
            .assignment
            .iter()
            .zip(&association.angles)
            .zip(&association.distances)
            .map(|((&vector, &angle), &distance)| {
                let gamma = neighbor_angles[vector];
                distance * (1.0 + m * scale * angle / gamma)
            })
            .collect();

        if violations.iter().all(|&cv| cv <= 0.0) {
            return scores;
        }

        let mut cluster_max = vec![f64::NEG_INFINITY; vectors.len()];
        for (&vector, &score) in association.assignment.iter().zip(&scores) {
            cluster_max[vector] = cluster_max[vector].max(score);
        }
        for ((score, &vector), &cv) in scores
            .iter_mut()
            .zip(&association.assignment)
            .zip(violations)
        {
            if cv > 0.0 {
                *score = cluster_max[vector] + *score * (1.0 + cv) + cv;
            }
        }
        scores
    }

    /// Survivor row indices, one per non-empty cluster, ascending
    ///
    /// `generation` is the generation being produced, counted from 1.
    pub fn select(
        &self,
        population: &Population,
        vectors: &ReferenceVectorSet,
        generation: usize,
        max_generations: usize,
    ) -> EvoResult<Vec<usize>> {
        if population.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }
        let pending = population.pending_len();
        if pending > 0 {
            return Err(EvolutionError::Unevaluated { pending });
        }
        if vectors.num_objectives() != population.num_objectives() {
            return Err(EvolutionError::config(format!(
                "reference vectors span {} objectives, population has {}",
                vectors.num_objectives(),
                population.num_objectives()
            )));
        }

        let ideal = population
            .ideal_point()
            .ok_or(EvolutionError::EmptyPopulation)?;
        let association = self.associate(population.fitness(), &ideal, vectors);
        let scale = self.penalty_scale(generation, max_generations);
        let scores = self.scores(&association, population.violations(), vectors, scale);

        let mut survivors: Vec<usize> = association
            .clusters(vectors.len())
            .into_iter()
            .filter_map(|members| {
                members
                    .into_iter()
                    .min_by(|&a, &b| scores[a].total_cmp(&scores[b]))
            })
            .collect();
        survivors.sort_unstable();
        Ok(survivors)
    }
}

impl Default for ApdSelector {
    fn default() -> Self {
        Self::new(2.0)
    }
}
