//! Initial decision designs
//!
//! Sampling plans for the first population: plain uniform sampling and
//! Latin hypercube sampling.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bounds::MultiBounds;

/// How the initial decision vectors are drawn
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitialDesign {
    /// Independent uniform draws within bounds
    Random,
    /// One sample per stratum per variable, strata shuffled independently
    #[default]
    LatinHypercube,
}

impl InitialDesign {
    /// Draw `count` decision vectors within `bounds`
    pub fn sample<R: Rng>(&self, count: usize, bounds: &MultiBounds, rng: &mut R) -> Vec<Vec<f64>> {
        match self {
            Self::Random => uniform_design(count, bounds, rng),
            Self::LatinHypercube => latin_hypercube(count, bounds, rng),
        }
    }
}

/// Uniform random design
pub fn uniform_design<R: Rng>(count: usize, bounds: &MultiBounds, rng: &mut R) -> Vec<Vec<f64>> {
    (0..count)
        .map(|_| {
            bounds
                .bounds
                .iter()
                .map(|b| b.denormalize(rng.gen::<f64>()))
                .collect()
        })
        .collect()
}

/// Latin hypercube design
///
/// Every variable's range is cut into `count` equal strata and each stratum
/// is hit exactly once.
pub fn latin_hypercube<R: Rng>(count: usize, bounds: &MultiBounds, rng: &mut R) -> Vec<Vec<f64>> {
    let mut design = vec![Vec::with_capacity(bounds.dimension()); count];
    if count == 0 {
        return design;
    }

    let width = 1.0 / count as f64;
    let mut strata: Vec<usize> = (0..count).collect();
    for b in &bounds.bounds {
        strata.shuffle(rng);
        for (row, &stratum) in design.iter_mut().zip(strata.iter()) {
            let u = (stratum as f64 + rng.gen::<f64>()) * width;
            row.push(b.denormalize(u.min(1.0)));
        }
    }
    design
}
