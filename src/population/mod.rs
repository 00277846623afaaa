//! Population management
//!
//! Aligned row storage for decision vectors and their evaluations, Pareto
//! dominance, the hypervolume indicator and an optional evaluation archive.

pub mod archive;
pub mod dominance;
pub mod hypervolume;
#[allow(clippy::module_inception)]
pub mod population;

pub mod prelude {
    pub use super::archive::*;
    pub use super::dominance::*;
    pub use super::hypervolume::*;
    pub use super::population::*;
}
