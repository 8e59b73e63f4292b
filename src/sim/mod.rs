//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (spawn order, ids ascending)
//! - All mutation on the simulation tick; timers are tick counters owned by
//!   the actor that needs them
//! - No rendering or platform dependencies

pub mod assign;
pub mod state;
pub mod tick;

pub use assign::nearest_intact_crate;
pub use state::{
    Crate, EndReason, HealthTier, Isopod, IsopodPhase, RoundEvent, RoundPhase, RoundState,
};
pub use tick::{TickInput, end_round, force_end_round, tick};
