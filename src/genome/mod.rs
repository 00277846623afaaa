//! Decision space
//!
//! Variable bounds and initial sampling designs.

pub mod bounds;
pub mod design;

pub mod prelude {
    pub use super::bounds::*;
    pub use super::design::*;
}
