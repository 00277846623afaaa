//! # rvea
//!
//! Reference vector guided evolutionary algorithm for many-objective
//! optimization, with interactive preference articulation.
//!
//! ## Core Concepts
//!
//! - **Reference vectors**: a simplex-lattice fan of unit directions that
//!   partitions objective space and is re-fitted to the observed front
//! - **Angle-penalized distance**: per-vector survivor selection that shifts
//!   from convergence to spread as the generation budget is used up
//! - **Interaction checkpoints**: between chunks of generations a decision
//!   maker may bias the vectors toward a preferred point or stop the run
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rvea::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! let result = Rvea::builder()
//!     .population_size(100)
//!     .num_objectives(3)
//!     .lattice_resolution(12)
//!     .max_generations(200)
//!     .generations_per_interaction(20)
//!     .build(Dtlz2::new(3))?
//!     .run(&mut NoInteraction, &mut rng)?;
//!
//! println!("{}", result.stats.summary());
//! ```

pub mod algorithms;
pub mod diagnostics;
pub mod error;
pub mod genome;
pub mod interactive;
pub mod operators;
pub mod population;
pub mod problem;
pub mod reference;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::prelude::*;
    pub use crate::diagnostics::prelude::*;
    pub use crate::error::*;
    pub use crate::genome::prelude::*;
    pub use crate::interactive::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::population::prelude::*;
    pub use crate::problem::prelude::*;
    pub use crate::reference::prelude::*;
}
