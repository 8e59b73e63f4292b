//! Fixed timestep round tick
//!
//! Advances every actor by one simulation step. Ordering within a tick:
//! clicks, then isopod motion/respawn/fall, then crate damage pulses (a
//! crate that breaks notifies its attacker before the next crate is
//! processed), then the forced-end grace countdown.

use glam::Vec2;

use super::assign::nearest_intact_crate;
use super::state::{EndReason, IsopodPhase, RoundEvent, RoundPhase, RoundState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// World-space click/tap position this tick, if any
    pub click: Option<Vec2>,
    /// Player pressed the end-round button
    pub force_end: bool,
}

/// Advance the round by one fixed timestep
pub fn tick(state: &mut RoundState, input: &TickInput, dt: f32) {
    match state.phase {
        RoundPhase::Menu | RoundPhase::GameOver => return,
        _ => {}
    }
    state.time_ticks += 1;

    if let Some(pos) = input.click {
        handle_click(state, pos);
    }
    if input.force_end {
        force_end_round(state);
    }

    advance_isopods(state, dt);
    tick_crate_damage(state);
    tick_grace(state);
}

/// Broadcast forced-fall to every active isopod and start the grace window.
/// No-op unless the round is in open play.
pub fn force_end_round(state: &mut RoundState) {
    if state.phase != RoundPhase::Playing {
        return;
    }
    for i in 0..state.isopods.len() {
        start_falling(state, i);
    }
    state.phase = RoundPhase::Ending {
        grace_ticks: FORCE_END_GRACE_TICKS,
    };
    log::info!("round force-ended by player");
}

/// Close out the round: freeze movement, record the final score, and emit a
/// single `RoundEnded`. Idempotent - a second call does nothing.
pub fn end_round(state: &mut RoundState, reason: EndReason) {
    match state.phase {
        RoundPhase::Playing | RoundPhase::Ending { .. } => {}
        _ => return,
    }
    // GameOver stops the tick loop, which also freezes every pending
    // respawn and damage countdown.
    state.phase = RoundPhase::GameOver;
    state.final_score = Some(state.kill_count);
    for isopod in &mut state.isopods {
        isopod.can_move = false;
    }
    let score = state.kill_count;
    state.push_event(RoundEvent::RoundEnded { score, reason });
    log::info!("round ended: score {score} ({reason:?})");
}

/// Squish at most one isopod: the nearest movable one within click radius
fn handle_click(state: &mut RoundState, pos: Vec2) {
    let mut hit: Option<(usize, f32)> = None;
    for (i, isopod) in state.isopods.iter().enumerate() {
        if !isopod.can_move || !isopod.is_alive() {
            continue;
        }
        let distance = isopod.pos.distance(pos);
        if distance <= state.click_radius && hit.is_none_or(|(_, best)| distance < best) {
            hit = Some((i, distance));
        }
    }
    let Some((index, _)) = hit else { return };

    let id = state.isopods[index].id;
    let damage = state.isopods[index].damage_per_click as f32;
    let died = state.isopods[index].apply_damage(damage);
    state.push_event(RoundEvent::IsopodHit { isopod_id: id });
    if died {
        // Entering Dead stops the attack on whatever was being gnawed and
        // reports the kill immediately; the respawn counter is already armed.
        release_target(state, index);
        state.add_kill();
        let kills = state.kill_count;
        state.push_event(RoundEvent::IsopodKilled { isopod_id: id, kills });
    }
}

fn advance_isopods(state: &mut RoundState, dt: f32) {
    for i in 0..state.isopods.len() {
        match state.isopods[i].phase {
            IsopodPhase::Rising => advance_rising(state, i, dt),
            IsopodPhase::Dead { .. } => tick_respawn(state, i),
            IsopodPhase::Falling => advance_falling(state, i, dt),
            IsopodPhase::Despawned => {}
        }
    }
}

fn advance_rising(state: &mut RoundState, index: usize, dt: f32) {
    let isopod = &state.isopods[index];
    if !isopod.can_move || isopod.reached_target {
        return;
    }
    // A movable isopod without a target skips the tick instead of crashing;
    // the column policy hands out targets, not this loop.
    let Some(target_id) = isopod.target else {
        log::warn!("isopod {} is movable with no target crate", isopod.id);
        return;
    };
    let Some(target_y) = state.crate_by_id(target_id).map(|c| c.pos.y) else {
        log::warn!("isopod {} targets unknown crate {target_id}", isopod.id);
        return;
    };

    let isopod = &mut state.isopods[index];
    isopod.pos.y += isopod.up_speed * dt;
    if isopod.pos.y >= target_y {
        isopod.reached_target = true;
        let id = isopod.id;
        if let Some(c) = state.crate_mut(target_id) {
            c.start_attack(id);
        }
    }
}

fn tick_respawn(state: &mut RoundState, index: usize) {
    let IsopodPhase::Dead { respawn_ticks } = state.isopods[index].phase else {
        return;
    };
    if respawn_ticks > 0 {
        state.isopods[index].phase = IsopodPhase::Dead {
            respawn_ticks: respawn_ticks - 1,
        };
        return;
    }

    // Crawl back out: full health, back at spawn, climbing again - but only
    // movable while the round is still live.
    let live = state.is_live();
    let isopod = &mut state.isopods[index];
    isopod.health = isopod.max_health;
    isopod.pos = isopod.spawn_pos;
    isopod.phase = IsopodPhase::Rising;
    isopod.reached_target = false;
    isopod.can_move = live;
    let id = isopod.id;
    state.push_event(RoundEvent::IsopodRespawned { isopod_id: id });
    retarget(state, index);
}

fn advance_falling(state: &mut RoundState, index: usize, dt: f32) {
    let isopod = &mut state.isopods[index];
    isopod.pos.y -= isopod.fall_speed * dt;
    if isopod.pos.y < isopod.spawn_pos.y - DESPAWN_DROP {
        despawn(state, index);
    }
}

fn despawn(state: &mut RoundState, index: usize) {
    let isopod = &mut state.isopods[index];
    isopod.phase = IsopodPhase::Despawned;
    isopod.can_move = false;
    let id = isopod.id;
    if !state.is_live() {
        return;
    }

    state.active_isopods = state.active_isopods.saturating_sub(1);
    let remaining = state.active_isopods;
    state.push_event(RoundEvent::IsopodDespawned {
        isopod_id: id,
        remaining,
    });
    log::info!("isopod {id} despawned, {remaining} active");

    // End-of-round check runs only after the despawn notification above.
    if remaining == 0 {
        let reason = match state.phase {
            RoundPhase::Ending { .. } => EndReason::Forced,
            _ => EndReason::AllDespawned,
        };
        end_round(state, reason);
    }
}

/// Ask the column policy for a fresh target; an empty column means falling.
fn retarget(state: &mut RoundState, index: usize) {
    let isopod = &state.isopods[index];
    let found = nearest_intact_crate(&state.crates, state.columns, isopod.column, isopod.pos);
    match found {
        Some(crate_id) => {
            let isopod = &mut state.isopods[index];
            isopod.target = Some(crate_id);
            isopod.reached_target = false;
        }
        None => start_falling(state, index),
    }
}

/// Stop attacking, drop the target, and fall. Covers both the natural "no
/// crates left" transition and the forced-end broadcast; cancels a pending
/// respawn. Idempotent for isopods already falling or despawned.
fn start_falling(state: &mut RoundState, index: usize) {
    match state.isopods[index].phase {
        IsopodPhase::Falling | IsopodPhase::Despawned => return,
        _ => {}
    }
    release_target(state, index);
    let isopod = &mut state.isopods[index];
    isopod.phase = IsopodPhase::Falling;
    isopod.can_move = false;
    isopod.target = None;
}

/// Clear the isopod->crate relation from both sides
fn release_target(state: &mut RoundState, index: usize) {
    if let Some(crate_id) = state.isopods[index].target.take() {
        if let Some(c) = state.crate_mut(crate_id) {
            c.stop_attack();
        }
    }
    state.isopods[index].reached_target = false;
}

/// Run each crate's 1 Hz damage pulse. A crate that breaks notifies its
/// attacker synchronously, before the next crate is processed, so
/// reassignment always observes a consistent wall.
fn tick_crate_damage(state: &mut RoundState) {
    for ci in 0..state.crates.len() {
        {
            let c = &mut state.crates[ci];
            if c.broken || c.attacker.is_none() {
                continue;
            }
            c.damage_countdown = c.damage_countdown.saturating_sub(1);
            if c.damage_countdown > 0 {
                continue;
            }
            c.damage_countdown = DAMAGE_TICK_TICKS;
        }

        let amount = state.crates[ci].damage_per_second as f32;
        let broke = state.crates[ci].apply_damage(amount);
        let crate_id = state.crates[ci].id;
        if !broke {
            state.push_event(RoundEvent::CrateDamaged { crate_id });
            continue;
        }

        let attacker = state.crates[ci].attacker;
        state.crates[ci].stop_attack();
        state.push_event(RoundEvent::CrateBroken { crate_id });
        log::info!("crate {crate_id} broken");
        if let Some(isopod_id) = attacker {
            if let Some(index) = state.isopod_index(isopod_id) {
                state.isopods[index].target = None;
                state.isopods[index].reached_target = false;
                retarget(state, index);
            }
        }
    }
}

fn tick_grace(state: &mut RoundState) {
    let RoundPhase::Ending { grace_ticks } = state.phase else {
        return;
    };
    if grace_ticks > 1 {
        state.phase = RoundPhase::Ending {
            grace_ticks: grace_ticks - 1,
        };
    } else {
        end_round(state, EndReason::Forced);
    }
}
