//! Interactive preference articulation
//!
//! Checkpoints let a decision maker steer a run between chunks of
//! generations by supplying a preferred point in objective space or by
//! stopping early.

pub mod checkpoint;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::checkpoint::{Decision, InteractionCheckpoint, NoInteraction, ScheduledDecisions};
}
