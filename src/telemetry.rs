//! Diagnostics sink
//!
//! Session events the facade forwards out of the simulation. The sim itself
//! never logs gameplay; it emits typed events and this boundary decides what
//! to do with them.

use crate::sim::EndReason;

/// Receiver for gameplay diagnostics, injected into [`crate::Game`]
pub trait TelemetrySink {
    fn round_started(&mut self);
    fn kill(&mut self, isopod_id: u32, total_kills: u32);
    fn crate_broken(&mut self, crate_id: u32);
    fn forced_end(&mut self);
    fn round_ended(&mut self, score: u32, reason: EndReason);
}

/// Sink that writes through the `log` facade
#[derive(Debug, Default)]
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn round_started(&mut self) {
        log::info!("game session started");
    }

    fn kill(&mut self, isopod_id: u32, total_kills: u32) {
        log::info!("isopod killed: id={isopod_id}, total={total_kills}");
    }

    fn crate_broken(&mut self, crate_id: u32) {
        log::info!("crate destroyed: id={crate_id}");
    }

    fn forced_end(&mut self) {
        log::info!("player forced game end");
    }

    fn round_ended(&mut self, score: u32, reason: EndReason) {
        log::info!("game ended: score={score}, reason={reason:?}");
    }
}
