//! Isopod Panic - a click-to-squish arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (crate wall, isopod actors, round life-cycle)
//! - `game`: Orchestrating facade wiring input, fixed ticks, and collaborator boundaries
//! - `leaderboard`: Best-score service (LocalStorage on web)
//! - `profile`: Player nickname and device-scoped id
//! - `telemetry`: Diagnostics sink
//! - `tuning`: Data-driven game balance
//! - `view`: Read-only projections for HUD and sprite selection

pub mod game;
pub mod leaderboard;
pub mod profile;
pub mod sim;
pub mod telemetry;
pub mod tuning;
pub mod view;

pub use game::Game;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz physics-style tick)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Ticks between damage pulses while a crate is under attack (1 Hz)
    pub const DAMAGE_TICK_TICKS: u32 = 50;
    /// Delay before a squished isopod crawls back out (1 second)
    pub const RESPAWN_DELAY_TICKS: u32 = 50;
    /// How long falling isopods linger after a forced end before results show
    pub const FORCE_END_GRACE_TICKS: u32 = 100;
    /// Distance below spawn height at which a falling isopod despawns
    pub const DESPAWN_DROP: f32 = 10.0;
}
