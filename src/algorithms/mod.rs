//! Evolutionary algorithms
//!
//! APD environmental selection and the RVEA driver built on it.

pub mod apd;
pub mod rvea;

pub mod prelude {
    pub use super::apd::*;
    pub use super::rvea::*;
}
