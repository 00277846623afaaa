//! Decision-variable bounds
//!
//! Per-variable lower/upper limits for the decision space.

use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, EvolutionError};

/// Bounds for a single decision variable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower limit (inclusive)
    pub min: f64,
    /// Upper limit (inclusive)
    pub max: f64,
}

impl Bounds {
    /// Create new bounds
    ///
    /// # Panics
    /// Panics if min > max
    pub fn new(min: f64, max: f64) -> Self {
        assert!(
            min <= max,
            "Invalid bounds: min ({}) must be <= max ({})",
            min,
            max
        );
        Self { min, max }
    }

    /// Create bounds, reporting inverted or non-finite limits as a configuration error
    pub fn try_new(min: f64, max: f64) -> EvoResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(EvolutionError::config(format!(
                "bounds must be finite, got [{min}, {max}]"
            )));
        }
        if min > max {
            return Err(EvolutionError::config(format!(
                "inverted bounds: lower limit {min} exceeds upper limit {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Create unit bounds [0, 1]
    pub fn unit() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Get the range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Check if a value is within bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value to be within bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Map a value from [0, 1] onto these bounds
    pub fn denormalize(&self, value: f64) -> f64 {
        self.min + value * self.range()
    }
}

impl From<(f64, f64)> for Bounds {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

/// Bounds for every decision variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiBounds {
    /// Bounds for each variable
    pub bounds: Vec<Bounds>,
}

impl MultiBounds {
    /// Create new multi-dimensional bounds
    pub fn new(bounds: Vec<Bounds>) -> Self {
        Self { bounds }
    }

    /// Create uniform bounds for all variables
    pub fn uniform(bound: Bounds, dimension: usize) -> Self {
        Self {
            bounds: vec![bound; dimension],
        }
    }

    /// Build bounds from parallel lower and upper limit vectors
    ///
    /// Fails when the vectors are empty, differ in length, or any pair is inverted.
    pub fn from_limits(lower: &[f64], upper: &[f64]) -> EvoResult<Self> {
        if lower.is_empty() {
            return Err(EvolutionError::config("decision bounds are empty"));
        }
        if lower.len() != upper.len() {
            return Err(EvolutionError::config(format!(
                "{} lower limits but {} upper limits",
                lower.len(),
                upper.len()
            )));
        }
        lower
            .iter()
            .zip(upper.iter())
            .map(|(&lo, &hi)| Bounds::try_new(lo, hi))
            .collect::<EvoResult<Vec<_>>>()
            .map(Self::new)
    }

    /// Check the bounds describe a usable decision space of `dimension` variables
    pub fn validate(&self, dimension: usize) -> EvoResult<()> {
        if self.bounds.is_empty() {
            return Err(EvolutionError::config("decision bounds are empty"));
        }
        if self.bounds.len() != dimension {
            return Err(EvolutionError::config(format!(
                "{} bounds given for {} decision variables",
                self.bounds.len(),
                dimension
            )));
        }
        for b in &self.bounds {
            Bounds::try_new(b.min, b.max)?;
        }
        Ok(())
    }

    /// Get number of variables
    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    /// Get bounds for a specific variable
    pub fn get(&self, index: usize) -> Option<&Bounds> {
        self.bounds.get(index)
    }

    /// Lower limits
    pub fn lower(&self) -> Vec<f64> {
        self.bounds.iter().map(|b| b.min).collect()
    }

    /// Upper limits
    pub fn upper(&self) -> Vec<f64> {
        self.bounds.iter().map(|b| b.max).collect()
    }

    /// Clamp a vector to be within bounds
    pub fn clamp_vec(&self, values: &mut [f64]) {
        for (value, b) in values.iter_mut().zip(self.bounds.iter()) {
            *value = b.clamp(*value);
        }
    }

    /// Check if all values are within bounds
    pub fn contains_vec(&self, values: &[f64]) -> bool {
        values.len() == self.bounds.len()
            && values
                .iter()
                .zip(self.bounds.iter())
                .all(|(&v, b)| b.contains(v))
    }
}

impl FromIterator<(f64, f64)> for MultiBounds {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        Self {
            bounds: iter.into_iter().map(Bounds::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "Invalid bounds")]
    fn test_bounds_invalid() {
        Bounds::new(5.0, -5.0);
    }

    #[test]
    fn test_bounds_try_new() {
        assert!(Bounds::try_new(-1.0, 1.0).is_ok());
        assert!(Bounds::try_new(2.0, 2.0).is_ok());
        assert!(matches!(
            Bounds::try_new(1.0, -1.0),
            Err(EvolutionError::Configuration(_))
        ));
        assert!(Bounds::try_new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_bounds_clamp_and_contains() {
        let b = Bounds::new(-5.0, 5.0);
        assert_eq!(b.clamp(-10.0), -5.0);
        assert_eq!(b.clamp(10.0), 5.0);
        assert!(b.contains(5.0));
        assert!(!b.contains(5.1));
    }

    #[test]
    fn test_bounds_denormalize() {
        let b = Bounds::new(2.0, 12.0);
        assert_eq!(b.denormalize(0.0), 2.0);
        assert_eq!(b.denormalize(0.5), 7.0);
        assert_eq!(b.denormalize(1.0), 12.0);
    }

    #[test]
    fn test_from_limits() {
        let mb = MultiBounds::from_limits(&[0.0, -1.0], &[1.0, 1.0]).unwrap();
        assert_eq!(mb.dimension(), 2);
        assert_eq!(mb.lower(), vec![0.0, -1.0]);
        assert_eq!(mb.upper(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_from_limits_rejects_bad_input() {
        assert!(MultiBounds::from_limits(&[], &[]).is_err());
        assert!(MultiBounds::from_limits(&[0.0], &[1.0, 2.0]).is_err());
        assert!(MultiBounds::from_limits(&[0.0, 3.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_validate_dimension() {
        let mb = MultiBounds::uniform(Bounds::unit(), 3);
        assert!(mb.validate(3).is_ok());
        assert!(mb.validate(4).is_err());
        assert!(MultiBounds::new(vec![]).validate(0).is_err());
    }

    #[test]
    fn test_clamp_vec_and_contains_vec() {
        let mb: MultiBounds = vec![(0.0, 1.0), (-10.0, 10.0)].into_iter().collect();
        let mut values = vec![2.0, -20.0];
        mb.clamp_vec(&mut values);
        assert_eq!(values, vec![1.0, -10.0]);
        assert!(mb.contains_vec(&values));
        assert!(!mb.contains_vec(&[0.5]));
    }
}
