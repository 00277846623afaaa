//! Geometry utilities for reference directions
//!
//! Unit-vector normalization, simplex-lattice designs and angular
//! neighborhoods over a set of directions in objective space.

use std::f64::consts::FRAC_PI_2;

use crate::error::{EvoResult, EvolutionError};

/// Smallest norm treated as non-zero
pub const NORM_EPSILON: f64 = 1e-12;

/// Angles below this are treated as the same direction
pub const DUPLICATE_ANGLE: f64 = 1e-10;

/// Dot product of two equal-length slices
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Euclidean norm
pub fn norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

/// Scale `v` to unit length
///
/// Fails with [`EvolutionError::Numerical`] when `v` has zero (or non-finite) length.
pub fn normalize(v: &[f64]) -> EvoResult<Vec<f64>> {
    let n = norm(v);
    if !n.is_finite() || n <= NORM_EPSILON {
        return Err(EvolutionError::Numerical(format!(
            "cannot normalize vector with norm {n}"
        )));
    }
    Ok(v.iter().map(|x| x / n).collect())
}

/// Scale `v` to unit length, or return `fallback` when `v` has no direction
pub fn normalize_or(v: &[f64], fallback: &[f64]) -> Vec<f64> {
    normalize(v).unwrap_or_else(|_| fallback.to_vec())
}

/// Angle in radians between two unit vectors
pub fn angle_between(a: &[f64], b: &[f64]) -> f64 {
    dot(a, b).clamp(-1.0, 1.0).acos()
}

/// Number of points in a simplex lattice: C(resolution + dimension - 1, dimension - 1)
pub fn lattice_size(resolution: usize, dimension: usize) -> usize {
    if dimension == 0 {
        return 0;
    }
    let n = resolution + dimension - 1;
    let k = (dimension - 1).min(resolution);
    // Each partial product is itself a binomial coefficient, so the division is exact.
    (0..k).fold(1usize, |acc, i| acc * (n - i) / (i + 1))
}

/// All non-negative integer compositions of `resolution` into `dimension`
/// parts, each divided by `resolution`
///
/// Points lie on the standard simplex (components sum to 1). Ordered with the
/// first component ascending, then the second, and so on.
pub fn simplex_lattice(resolution: usize, dimension: usize) -> Vec<Vec<f64>> {
    if resolution == 0 || dimension == 0 {
        return Vec::new();
    }

    let mut points = Vec::with_capacity(lattice_size(resolution, dimension));
    let mut current = Vec::with_capacity(dimension);
    compose(resolution, dimension, &mut current, &mut points);

    let scale = resolution as f64;
    points
        .into_iter()
        .map(|p| p.into_iter().map(|c| c as f64 / scale).collect())
        .collect()
}

fn compose(remaining: usize, parts: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
    if parts == 1 {
        current.push(remaining);
        out.push(current.clone());
        current.pop();
        return;
    }
    for first in 0..=remaining {
        current.push(first);
        compose(remaining - first, parts - 1, current, out);
        current.pop();
    }
}

/// For each unit vector, the smallest angle to any other vector in the set
///
/// Exact duplicates are skipped; a vector without a distinct neighbor gets π/2.
pub fn pairwise_min_angle(vectors: &[Vec<f64>]) -> Vec<f64> {
    vectors
        .iter()
        .enumerate()
        .map(|(i, v)| {
            vectors
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, w)| angle_between(v, w))
                .filter(|&angle| angle > DUPLICATE_ANGLE)
                .fold(None, |best: Option<f64>, angle| {
                    Some(best.map_or(angle, |b| b.min(angle)))
                })
                .unwrap_or(FRAC_PI_2)
        })
        .collect()
}
