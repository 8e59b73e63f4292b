//! Score service boundary
//!
//! Device-scoped best-score table: one entry per player id, replaced only by
//! a strictly better score. Persisted to LocalStorage on wasm, in-memory on
//! native. Failures stay inside this module - submission is fire-and-forget
//! from the game's perspective.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// How many entries the results screen shows
pub const TOP_N: usize = 10;

/// A single stored score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player_name: String,
    pub score: u32,
    /// Sortable `yyyymmddhhmmssmmm` stamp assigned at write time
    pub timestamp: String,
}

/// Boundary consumed by the game facade
pub trait ScoreService {
    /// Record `score` for `player_id` if it beats their stored best
    fn submit(&mut self, player_id: &str, player_name: &str, score: u32);
    /// Best scores across all players, descending, at most `n`
    fn top(&self, n: usize) -> Vec<ScoreEntry>;
}

/// LocalStorage-backed score table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalScores {
    entries: HashMap<String, ScoreEntry>,
}

impl LocalScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "isopod_panic_scores";

    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn best_for(&self, player_id: &str) -> u32 {
        self.entries.get(player_id).map(|e| e.score).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load the table from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<LocalScores>(&json) {
                    log::info!("loaded {} score entries", scores.entries.len());
                    return scores;
                }
            }
        }

        log::info!("no stored scores, starting fresh");
        Self::new()
    }

    /// Save the table to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
            }
        } else {
            log::warn!("score save skipped: no storage available");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save(&self) {
        // No-op for native
    }
}

impl ScoreService for LocalScores {
    fn submit(&mut self, player_id: &str, player_name: &str, score: u32) {
        let best = self.best_for(player_id);
        if score <= best {
            log::info!("score {score} not saved (best is {best})");
            return;
        }
        let entry = ScoreEntry {
            player_name: player_name.to_string(),
            score,
            timestamp: now_stamp(),
        };
        let _ = self.entries.insert(player_id.to_string(), entry);
        log::info!("new best score saved: {player_name} - {score} (was {best})");
        self.save();
    }

    fn top(&self, n: usize) -> Vec<ScoreEntry> {
        let mut all: Vec<ScoreEntry> = self.entries.values().cloned().collect();
        all.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.timestamp.cmp(&b.timestamp)));
        all.truncate(n);
        all
    }
}

/// Format a leaderboard row the way the results screen shows it
pub fn format_entry(rank: usize, entry: &ScoreEntry) -> String {
    format!("{}. {} - {}", rank, entry.player_name, entry.score)
}

/// Sortable timestamp for new entries
#[cfg(target_arch = "wasm32")]
fn now_stamp() -> String {
    let d = js_sys::Date::new_0();
    format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}{:03}",
        d.get_utc_full_year(),
        d.get_utc_month() + 1,
        d.get_utc_date(),
        d.get_utc_hours(),
        d.get_utc_minutes(),
        d.get_utc_seconds(),
        d.get_utc_milliseconds(),
    )
}

#[cfg(not(target_arch = "wasm32"))]
fn now_stamp() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("{ms:017}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_only_if_strictly_better() {
        let mut scores = LocalScores::new();
        scores.submit("dev-1", "Ana", 40);
        assert_eq!(scores.best_for("dev-1"), 40);

        // 35 < 40: no write
        scores.submit("dev-1", "Ana", 35);
        assert_eq!(scores.best_for("dev-1"), 40);

        // Equal is not better
        scores.submit("dev-1", "Ana", 40);
        let kept = scores.top(1);
        assert_eq!(kept[0].score, 40);

        // 41 replaces the old entry
        scores.submit("dev-1", "Ana the Great", 41);
        assert_eq!(scores.best_for("dev-1"), 41);
        let top = scores.top(10);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].player_name, "Ana the Great");
        assert!(!top[0].timestamp.is_empty());
    }

    #[test]
    fn test_top_is_descending_and_bounded() {
        let mut scores = LocalScores::new();
        for (i, s) in [12u32, 3, 40, 25].iter().enumerate() {
            scores.submit(&format!("dev-{i}"), &format!("P{i}"), *s);
        }
        let top = scores.top(3);
        let values: Vec<u32> = top.iter().map(|e| e.score).collect();
        assert_eq!(values, vec![40, 25, 12]);
    }

    #[test]
    fn test_one_entry_per_player() {
        let mut scores = LocalScores::new();
        scores.submit("dev-1", "Ana", 10);
        scores.submit("dev-1", "Ana", 20);
        scores.submit("dev-2", "Bo", 15);
        assert_eq!(scores.top(10).len(), 2);
    }

    #[test]
    fn test_format_entry() {
        let entry = ScoreEntry {
            player_name: "Ana".to_string(),
            score: 41,
            timestamp: "20260807120000000".to_string(),
        };
        assert_eq!(format_entry(1, &entry), "1. Ana - 41");
    }
}
