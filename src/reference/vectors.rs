//! Reference vector set
//!
//! The fan of unit directions that partitions objective space during
//! selection. Vectors are kept twice: a *template* (the lattice, reshaped
//! only by preference translation) and the *current* vectors, which are the
//! template rescaled to the observed objective range.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::lattice::{normalize, normalize_or, pairwise_min_angle, simplex_lattice};
use crate::error::{EvoResult, EvolutionError};

/// Floor applied to each axis range in [`ReferenceVectorSet::adapt`]
pub const RANGE_EPSILON: f64 = 1e-6;

/// Ordered set of unit-length direction vectors in objective space
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReferenceVectorSet {
    num_objectives: usize,
    lattice_resolution: usize,
    template: Vec<Vec<f64>>,
    range: Vec<f64>,
    values: Vec<Vec<f64>>,
    neighbor_angles: Vec<f64>,
}

impl ReferenceVectorSet {
    /// Build a normalized simplex-lattice fan
    pub fn initialize(num_objectives: usize, lattice_resolution: usize) -> EvoResult<Self> {
        if num_objectives < 2 {
            return Err(EvolutionError::config(format!(
                "at least 2 objectives are required, got {num_objectives}"
            )));
        }
        if lattice_resolution < 1 {
            return Err(EvolutionError::config(
                "lattice resolution must be at least 1",
            ));
        }

        let template = simplex_lattice(lattice_resolution, num_objectives)
            .iter()
            .map(|p| normalize(p))
            .collect::<EvoResult<Vec<_>>>()?;

        let mut set = Self {
            num_objectives,
            lattice_resolution,
            values: template.clone(),
            template,
            range: vec![1.0; num_objectives],
            neighbor_angles: Vec::new(),
        };
        set.refresh_angles();
        debug!(
            vectors = set.len(),
            num_objectives, lattice_resolution, "initialized reference vectors"
        );
        Ok(set)
    }

    /// Append the standard basis vectors
    ///
    /// The lattice already contains the axes, so this produces duplicates;
    /// selection resolves ties by the first vector found.
    pub fn add_edge_vectors(&mut self) {
        for axis in 0..self.num_objectives {
            let mut edge = vec![0.0; self.num_objectives];
            edge[axis] = 1.0;
            self.template.push(edge);
        }
        self.project();
    }

    /// Rescale the template elementwise by the objective range, then renormalize
    ///
    /// Axes whose range is below [`RANGE_EPSILON`] (or not finite) are floored.
    pub fn adapt(&mut self, objective_min: &[f64], objective_max: &[f64]) -> EvoResult<()> {
        self.check_len("objective_min", objective_min.len())?;
        self.check_len("objective_max", objective_max.len())?;

        let mut floored = Vec::new();
        self.range = objective_min
            .iter()
            .zip(objective_max.iter())
            .enumerate()
            .map(|(axis, (lo, hi))| {
                let r = hi - lo;
                if r.is_finite() && r > RANGE_EPSILON {
                    r
                } else {
                    floored.push(axis);
                    RANGE_EPSILON
                }
            })
            .collect();
        if !floored.is_empty() {
            warn!(?floored, floor = RANGE_EPSILON, "degenerate objective range floored");
        }

        self.project();
        debug!(range = ?self.range, "adapted reference vectors");
        Ok(())
    }

    /// Blend every vector toward `preference` with weight `strength`
    ///
    /// `preference` is a direction in objective space relative to the ideal
    /// point. The blend happens in template space, against the range of the
    /// last [`adapt`](Self::adapt), so that re-adapting to the same range
    /// keeps the vectors bent toward `preference` itself. Vectors that would
    /// cancel out keep their old direction.
    pub fn translate_toward(&mut self, preference: &[f64], strength: f64) -> EvoResult<()> {
        self.check_len("preference", preference.len())?;
        if !(0.0..=1.0).contains(&strength) {
            return Err(EvolutionError::config(format!(
                "translation strength must be in [0, 1], got {strength}"
            )));
        }

        let direction = match normalize(preference) {
            Ok(d) => d,
            Err(_) => {
                warn!("preference direction has zero length, vectors left unchanged");
                return Ok(());
            }
        };
        let unscaled: Vec<f64> = direction
            .iter()
            .zip(self.range.iter())
            .map(|(d, r)| d / r)
            .collect();
        let target = normalize_or(&unscaled, &direction);

        let mut cancelled = 0usize;
        let template: Vec<Vec<f64>> = self
            .template
            .iter()
            .map(|t| {
                let mixed: Vec<f64> = t
                    .iter()
                    .zip(target.iter())
                    .map(|(a, d)| (1.0 - strength) * a + strength * d)
                    .collect();
                normalize(&mixed).unwrap_or_else(|_| {
                    cancelled += 1;
                    t.clone()
                })
            })
            .collect();
        if cancelled > 0 {
            warn!(cancelled, "translated vectors cancelled out, previous directions kept");
        }
        self.template = template;

        self.project();
        debug!(strength, "translated reference vectors toward preference");
        Ok(())
    }

    /// Smallest angle from each vector to its nearest distinct neighbor
    pub fn neighbor_angles(&self) -> &[f64] {
        &self.neighbor_angles
    }

    /// Current unit vectors
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Template vectors before range adaptation
    pub fn template(&self) -> &[Vec<f64>] {
        &self.template
    }

    /// Per-axis range applied by the last adapt (all ones before the first)
    pub fn range(&self) -> &[f64] {
        &self.range
    }

    /// Number of vectors
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Objective-space dimension
    pub fn num_objectives(&self) -> usize {
        self.num_objectives
    }

    /// Lattice resolution the set was built from
    pub fn lattice_resolution(&self) -> usize {
        self.lattice_resolution
    }

    /// Normalized mean of the current vectors
    pub fn mean_direction(&self) -> Vec<f64> {
        let mut sum = vec![0.0; self.num_objectives];
        for v in &self.values {
            for (s, x) in sum.iter_mut().zip(v.iter()) {
                *s += x;
            }
        }
        normalize_or(&sum, &sum)
    }

    // Current vectors from the template and the stored range
    fn project(&mut self) {
        let mut fallbacks = 0usize;
        let values: Vec<Vec<f64>> = self
            .template
            .iter()
            .map(|t| {
                let scaled: Vec<f64> = t.iter().zip(self.range.iter()).map(|(a, r)| a * r).collect();
                normalize(&scaled).unwrap_or_else(|_| {
                    fallbacks += 1;
                    t.clone()
                })
            })
            .collect();
        if fallbacks > 0 {
            warn!(fallbacks, "rescaled vectors collapsed, template directions kept");
        }
        self.values = values;
        self.refresh_angles();
    }

    fn refresh_angles(&mut self) {
        self.neighbor_angles = pairwise_min_angle(&self.values);
    }

    fn check_len(&self, what: &str, len: usize) -> EvoResult<()> {
        if len != self.num_objectives {
            return Err(EvolutionError::config(format!(
                "{what} has {len} components, expected {}",
                self.num_objectives
            )));
        }
        Ok(())
    }
}
