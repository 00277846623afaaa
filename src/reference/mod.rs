//! Reference directions
//!
//! Simplex-lattice geometry and the adaptive reference vector set that
//! guides environmental selection.

pub mod lattice;
pub mod vectors;

pub mod prelude {
    pub use super::lattice::*;
    pub use super::vectors::*;
}
