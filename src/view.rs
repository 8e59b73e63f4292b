//! Read-only display projections
//!
//! Everything a renderer or HUD needs, recomputed from round state on
//! demand. The view owns no state and never feeds back into the simulation.

use serde::Serialize;

use crate::sim::{HealthTier, IsopodPhase, RoundPhase, RoundState};

/// Sprite-selection data for one crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrateView {
    pub id: u32,
    pub tier: HealthTier,
    pub broken: bool,
}

/// Sprite-selection data for one isopod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IsopodView {
    pub id: u32,
    pub tier: HealthTier,
    pub dead: bool,
}

/// Counter and phase data for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HudView {
    pub kills: u32,
    /// Present once the round has ended
    pub final_score: Option<u32>,
    pub game_over: bool,
}

pub fn crates(state: &RoundState) -> Vec<CrateView> {
    state
        .crates
        .iter()
        .map(|c| CrateView {
            id: c.id,
            tier: c.health_tier(),
            broken: c.is_broken(),
        })
        .collect()
}

pub fn isopods(state: &RoundState) -> Vec<IsopodView> {
    state
        .isopods
        .iter()
        .map(|i| IsopodView {
            id: i.id,
            tier: i.health_tier(),
            dead: matches!(i.phase, IsopodPhase::Dead { .. }),
        })
        .collect()
}

pub fn hud(state: &RoundState) -> HudView {
    HudView {
        kills: state.kill_count,
        final_score: state.final_score,
        game_over: state.phase == RoundPhase::GameOver,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_views_track_state() {
        let mut state = RoundState::new();
        state.start_round(&Tuning::default());

        let crate_views = crates(&state);
        assert_eq!(crate_views.len(), state.crates.len());
        assert!(crate_views.iter().all(|v| v.tier == HealthTier::High && !v.broken));

        state.crates[0].apply_damage(40.0);
        assert_eq!(crates(&state)[0].tier, HealthTier::Medium);

        state.crates[0].apply_damage(1000.0);
        let v = crates(&state)[0];
        assert!(v.broken);
        assert_eq!(v.tier, HealthTier::Zero);
    }

    #[test]
    fn test_hud_projection() {
        let mut state = RoundState::new();
        state.start_round(&Tuning::default());
        state.add_kill();
        state.add_kill();

        let hud = hud(&state);
        assert_eq!(hud.kills, 2);
        assert_eq!(hud.final_score, None);
        assert!(!hud.game_over);
    }

    #[test]
    fn test_isopod_view_marks_dead() {
        let mut state = RoundState::new();
        state.start_round(&Tuning::default());
        state.isopods[0].apply_damage(1000.0);

        let views = isopods(&state);
        assert!(views[0].dead);
        assert_eq!(views[0].tier, HealthTier::Zero);
        assert!(!views[1].dead);
    }
}
