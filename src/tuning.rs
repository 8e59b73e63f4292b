//! Data-driven game balance
//!
//! Every number a designer iterates on lives here, persisted separately from
//! scores so a tweak survives a reload during playtesting.

use serde::{Deserialize, Serialize};

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    // === Crate wall layout ===
    pub rows: u32,
    pub columns: u32,
    /// Horizontal gap between crate centers
    pub spacing_x: f32,
    /// Vertical gap between crate centers
    pub spacing_y: f32,

    // === Crates ===
    pub crate_max_health: i32,
    /// Damage a crate takes per second while under attack
    pub crate_damage_per_second: i32,

    // === Isopods ===
    pub isopod_max_health: i32,
    /// Damage one player click deals
    pub damage_per_click: i32,
    /// Climb speed, units per second
    pub up_speed: f32,
    /// Drop speed once falling, units per second
    pub fall_speed: f32,
    /// Spawn height below the wall
    pub spawn_y: f32,
    /// Hit-test radius around an isopod's center for clicks
    pub click_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            rows: 5,
            columns: 4,
            spacing_x: 2.0,
            spacing_y: 1.5,

            crate_max_health: 100,
            crate_damage_per_second: 10,

            isopod_max_health: 100,
            damage_per_click: 34,
            up_speed: 0.5,
            fall_speed: 2.0,
            spawn_y: -7.2,
            click_radius: 0.45,
        }
    }
}

impl Tuning {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "isopod_panic_tuning";

    /// Load tuning overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(tuning) = serde_json::from_str(&json) {
                    log::info!("loaded tuning overrides");
                    return tuning;
                }
            }
        }

        log::info!("using default tuning");
        Self::default()
    }

    /// Save tuning to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("tuning saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_json() {
        let tuning = Tuning {
            rows: 7,
            up_speed: 1.25,
            ..Tuning::default()
        };
        let json = serde_json::to_string(&tuning).unwrap();
        let back: Tuning = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tuning);
    }
}
