//! Variation operators
//!
//! Crossover and mutation applied to decision vectors during mating.

pub mod crossover;
pub mod mutation;
pub mod traits;

pub mod prelude {
    pub use super::crossover::*;
    pub use super::mutation::*;
    pub use super::traits::*;
}
