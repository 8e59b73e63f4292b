//! Round state and core simulation types
//!
//! Everything the simulation mutates lives here. Cross-references between
//! actors (isopod -> target crate, crate -> attacker) are entity ids looked
//! up in the round's tables, never owning pointers, so teardown order is
//! irrelevant.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::assign::nearest_intact_crate;
use crate::consts::*;
use crate::tuning::Tuning;

/// Round damage up so any positive hit removes at least one point
#[inline]
pub(crate) fn ceil_damage(amount: f32) -> i32 {
    amount.ceil() as i32
}

/// Four-step health tier shared by crates and isopods.
///
/// The boundary at 66% is exclusive: 66/100 reads as `Medium`, 67/100 as
/// `High`. Sprite selection is a pure function of this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthTier {
    High,
    Medium,
    Low,
    Zero,
}

impl HealthTier {
    pub fn from_health(health: i32, max_health: i32) -> Self {
        let percentage = health as f32 / max_health as f32 * 100.0;
        if percentage > 66.0 {
            HealthTier::High
        } else if percentage > 33.0 {
            HealthTier::Medium
        } else if percentage > 0.0 {
            HealthTier::Low
        } else {
            HealthTier::Zero
        }
    }
}

/// A destructible crate in the wall grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crate {
    pub id: u32,
    pub row: u32,
    pub col: u32,
    pub pos: Vec2,
    pub max_health: i32,
    pub health: i32,
    /// Damage taken per pulse while under attack (one pulse per second)
    pub damage_per_second: i32,
    pub broken: bool,
    /// Isopod currently gnawing on this crate (at most one at a time)
    pub attacker: Option<u32>,
    /// Ticks until the next damage pulse; armed only while under attack
    #[serde(default)]
    pub damage_countdown: u32,
}

impl Crate {
    pub fn new(id: u32, row: u32, col: u32, pos: Vec2, max_health: i32, damage_per_second: i32) -> Self {
        Self {
            id,
            row,
            col,
            pos,
            max_health,
            health: max_health,
            damage_per_second,
            broken: false,
            attacker: None,
            damage_countdown: 0,
        }
    }

    /// Subtract `ceil(amount)` from health, clamping at zero.
    ///
    /// Returns true when this call broke the crate. A broken crate freezes:
    /// further damage is a no-op. The caller is responsible for delivering
    /// the broken notification to the attacker.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if self.broken {
            return false;
        }
        self.health = (self.health - ceil_damage(amount)).max(0);
        if self.health > 0 {
            return false;
        }
        self.broken = true;
        self.damage_countdown = 0;
        true
    }

    /// Record the attacker and arm the 1 Hz damage pulse.
    ///
    /// No-op if broken or already under attack (exclusive-attacker guard).
    pub fn start_attack(&mut self, isopod_id: u32) {
        if self.broken || self.attacker.is_some() {
            return;
        }
        self.attacker = Some(isopod_id);
        self.damage_countdown = DAMAGE_TICK_TICKS;
    }

    /// Cancel the damage pulse and clear the attacker. Idempotent; there is
    /// never a trailing pulse after this call.
    pub fn stop_attack(&mut self) {
        self.attacker = None;
        self.damage_countdown = 0;
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    pub fn health_tier(&self) -> HealthTier {
        HealthTier::from_health(self.health, self.max_health)
    }
}

/// Life-cycle phase of an isopod
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum IsopodPhase {
    /// Climbing toward (or gnawing on) its target crate
    Rising,
    /// Squished; crawls back out once the counter runs down
    Dead { respawn_ticks: u32 },
    /// Dropping out of the play-field
    Falling,
    /// Fell past the despawn line; inactive until the next round
    Despawned,
}

/// A player-damageable actor that climbs toward crates in its column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Isopod {
    pub id: u32,
    /// Grid column this isopod owns for its whole lifetime
    pub column: u32,
    pub pos: Vec2,
    pub spawn_pos: Vec2,
    pub up_speed: f32,
    pub fall_speed: f32,
    pub max_health: i32,
    pub health: i32,
    /// Damage one player click deals to this isopod
    pub damage_per_click: i32,
    pub phase: IsopodPhase,
    /// Set once the isopod has climbed level with its target
    pub reached_target: bool,
    /// Movement gate; cleared outside active play and while falling
    pub can_move: bool,
    /// Target crate id; a relation by id, never an owning reference
    pub target: Option<u32>,
}

impl Isopod {
    pub fn new(id: u32, column: u32, spawn_pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            id,
            column,
            pos: spawn_pos,
            spawn_pos,
            up_speed: tuning.up_speed,
            fall_speed: tuning.fall_speed,
            max_health: tuning.isopod_max_health,
            health: tuning.isopod_max_health,
            damage_per_click: tuning.damage_per_click,
            phase: IsopodPhase::Rising,
            reached_target: false,
            can_move: false,
            target: None,
        }
    }

    /// Falling isopods are still alive; dead and despawned ones are not.
    pub fn is_alive(&self) -> bool {
        matches!(self.phase, IsopodPhase::Rising | IsopodPhase::Falling)
    }

    /// Click damage. Returns true when this hit squished the isopod.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = (self.health - ceil_damage(amount)).max(0);
        if self.health > 0 {
            return false;
        }
        self.phase = IsopodPhase::Dead {
            respawn_ticks: RESPAWN_DELAY_TICKS,
        };
        true
    }

    pub fn health_tier(&self) -> HealthTier {
        HealthTier::from_health(self.health, self.max_health)
    }
}

/// Current phase of a play session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No round in progress
    Menu,
    /// Active gameplay
    Playing,
    /// Forced end requested; isopods fall out before results show
    Ending { grace_ticks: u32 },
    /// Round finished; final score frozen
    GameOver,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Every isopod fell out of the play-field
    AllDespawned,
    /// The player hit the end-round button
    Forced,
}

/// Typed notifications emitted by the simulation for external collaborators
/// (HUD, audio, telemetry). Delivered synchronously within the tick that
/// produced them; the facade drains the queue once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    IsopodHit { isopod_id: u32 },
    IsopodKilled { isopod_id: u32, kills: u32 },
    IsopodRespawned { isopod_id: u32 },
    IsopodDespawned { isopod_id: u32, remaining: u32 },
    CrateDamaged { crate_id: u32 },
    CrateBroken { crate_id: u32 },
    RoundEnded { score: u32, reason: EndReason },
}

/// Complete round state. All mutation happens on the simulation tick; the
/// round owns every crate and isopod, and actors refer to each other by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: RoundPhase,
    pub kill_count: u32,
    pub final_score: Option<u32>,
    /// Isopods still participating in the round (not yet despawned)
    pub active_isopods: u32,
    pub rows: u32,
    pub columns: u32,
    /// Crate wall in row-major order (`index = row * columns + col`)
    pub crates: Vec<Crate>,
    /// One isopod per column, spawned at round start
    pub isopods: Vec<Isopod>,
    /// Hit-test radius around an isopod's center for clicks
    #[serde(default)]
    pub click_radius: f32,
    /// Simulation tick counter, reset each round
    pub time_ticks: u64,
    /// Notifications for external collaborators, drained once per tick
    #[serde(skip)]
    pub events: Vec<RoundEvent>,
    next_id: u32,
}

impl RoundState {
    pub fn new() -> Self {
        Self {
            phase: RoundPhase::Menu,
            kill_count: 0,
            final_score: None,
            active_isopods: 0,
            rows: 0,
            columns: 0,
            crates: Vec::new(),
            isopods: Vec::new(),
            click_radius: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Build the crate wall and the swarm, then open play.
    ///
    /// The grid is centered on the origin: crate `(row, col)` sits at
    /// `(start_x + col * spacing_x, start_y - row * spacing_y)`. Each column
    /// gets exactly one isopod, spawned at the column's x below the wall and
    /// aimed at the nearest intact crate in that column.
    pub fn start_round(&mut self, tuning: &Tuning) {
        self.crates.clear();
        self.isopods.clear();
        self.events.clear();
        self.next_id = 1;
        self.rows = tuning.rows;
        self.columns = tuning.columns;
        self.click_radius = tuning.click_radius;
        self.kill_count = 0;
        self.final_score = None;
        self.time_ticks = 0;

        let start_x = -((tuning.columns - 1) as f32) * tuning.spacing_x / 2.0;
        let start_y = ((tuning.rows - 1) as f32) * tuning.spacing_y / 2.0;

        for row in 0..tuning.rows {
            for col in 0..tuning.columns {
                let id = self.next_entity_id();
                let pos = Vec2::new(
                    start_x + col as f32 * tuning.spacing_x,
                    start_y - row as f32 * tuning.spacing_y,
                );
                self.crates.push(Crate::new(
                    id,
                    row,
                    col,
                    pos,
                    tuning.crate_max_health,
                    tuning.crate_damage_per_second,
                ));
            }
        }

        for col in 0..tuning.columns {
            let id = self.next_entity_id();
            let spawn = Vec2::new(start_x + col as f32 * tuning.spacing_x, tuning.spawn_y);
            let mut isopod = Isopod::new(id, col, spawn, tuning);
            isopod.target = nearest_intact_crate(&self.crates, self.columns, col, spawn);
            isopod.can_move = true;
            self.isopods.push(isopod);
        }

        self.active_isopods = tuning.columns;
        self.phase = RoundPhase::Playing;
        log::info!(
            "round started: {}x{} crates, {} isopods",
            tuning.rows,
            tuning.columns,
            tuning.columns
        );
    }

    /// Tear down the wall and the swarm regardless of how the round went.
    pub fn return_to_menu(&mut self) {
        self.crates.clear();
        self.isopods.clear();
        self.events.clear();
        self.active_isopods = 0;
        self.phase = RoundPhase::Menu;
    }

    /// Count a squished isopod. Display updates are projections, not state.
    pub fn add_kill(&mut self) {
        self.kill_count += 1;
    }

    /// Playing or in the forced-end grace window
    pub fn is_live(&self) -> bool {
        matches!(self.phase, RoundPhase::Playing | RoundPhase::Ending { .. })
    }

    /// Hand the tick's notifications to the caller, emptying the queue.
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: RoundEvent) {
        self.events.push(event);
    }

    pub fn crate_by_id(&self, id: u32) -> Option<&Crate> {
        self.crates.iter().find(|c| c.id == id)
    }

    pub(crate) fn crate_mut(&mut self, id: u32) -> Option<&mut Crate> {
        self.crates.iter_mut().find(|c| c.id == id)
    }

    pub fn isopod_by_id(&self, id: u32) -> Option<&Isopod> {
        self.isopods.iter().find(|i| i.id == id)
    }

    pub(crate) fn isopod_index(&self, id: u32) -> Option<usize> {
        self.isopods.iter().position(|i| i.id == id)
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}
