//! Orchestrating facade over the simulation
//!
//! Owns the round state plus the injected collaborator boundaries (score
//! service, telemetry) and converts variable frame time into fixed
//! simulation ticks. External shells feed it input and read projections;
//! nothing here mutates the simulation outside `tick`.

use glam::Vec2;

use crate::consts::*;
use crate::leaderboard::ScoreService;
use crate::profile::PlayerProfile;
use crate::sim::{RoundEvent, RoundPhase, RoundState, TickInput, tick};
use crate::telemetry::TelemetrySink;
use crate::tuning::Tuning;
use crate::view::{self, HudView};

/// Game instance wiring the simulation to its collaborators
pub struct Game {
    pub state: RoundState,
    tuning: Tuning,
    profile: PlayerProfile,
    scores: Box<dyn ScoreService>,
    telemetry: Box<dyn TelemetrySink>,
    input: TickInput,
    accumulator: f32,
    /// Events produced by the most recent `update`, for UI/audio shells
    frame_events: Vec<RoundEvent>,
}

impl Game {
    pub fn new(
        tuning: Tuning,
        profile: PlayerProfile,
        scores: Box<dyn ScoreService>,
        telemetry: Box<dyn TelemetrySink>,
    ) -> Self {
        Self {
            state: RoundState::new(),
            tuning,
            profile,
            scores,
            telemetry,
            input: TickInput::default(),
            accumulator: 0.0,
            frame_events: Vec::new(),
        }
    }

    /// Build the wall, spawn the swarm, open play
    pub fn start_round(&mut self) {
        self.state.start_round(&self.tuning);
        self.input = TickInput::default();
        self.accumulator = 0.0;
        self.frame_events.clear();
        self.telemetry.round_started();
    }

    /// Queue a world-space click for the next tick
    pub fn click(&mut self, pos: Vec2) {
        self.input.click = Some(pos);
    }

    /// Player pressed the end-round button
    pub fn request_end_round(&mut self) {
        if self.state.phase == RoundPhase::Playing {
            self.input.force_end = true;
            self.telemetry.forced_end();
        }
    }

    /// Leave the results screen (or abandon a round) for the menu
    pub fn return_to_menu(&mut self) {
        self.state.return_to_menu();
    }

    /// Advance by one frame of wall-clock time, running as many fixed ticks
    /// as the accumulator allows and draining events after each.
    pub fn update(&mut self, frame_dt: f32) {
        self.frame_events.clear();
        let dt = frame_dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.click = None;
            self.input.force_end = false;

            self.dispatch_events();
        }
    }

    /// Events from the most recent `update`, in emission order
    pub fn events(&self) -> &[RoundEvent] {
        &self.frame_events
    }

    pub fn hud(&self) -> HudView {
        view::hud(&self.state)
    }

    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut PlayerProfile {
        &mut self.profile
    }

    pub fn scores(&self) -> &dyn ScoreService {
        self.scores.as_ref()
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match &event {
                RoundEvent::IsopodKilled { isopod_id, kills } => {
                    self.telemetry.kill(*isopod_id, *kills);
                }
                RoundEvent::CrateBroken { crate_id } => {
                    self.telemetry.crate_broken(*crate_id);
                }
                RoundEvent::RoundEnded { score, reason } => {
                    self.telemetry.round_ended(*score, *reason);
                    // Fire-and-forget: a failed write never disturbs play.
                    self.scores
                        .submit(self.profile.device_id(), self.profile.nickname(), *score);
                }
                _ => {}
            }
            self.frame_events.push(event);
        }
    }
}
