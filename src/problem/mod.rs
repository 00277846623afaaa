//! Problem definitions
//!
//! The [`Problem`](traits::Problem) trait, a closure-backed problem, surrogate
//! wrappers and a few standard benchmarks.

pub mod benchmarks;
pub mod surrogate;
pub mod traits;

pub mod prelude {
    pub use super::benchmarks::{BinhKorn, Dtlz2, Zdt1};
    pub use super::surrogate::{SurrogateModel, SurrogateProblem};
    pub use super::traits::{Evaluation, FnProblem, ObjectiveDirection, Problem};
}
