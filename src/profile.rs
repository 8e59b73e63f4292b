//! Player identity
//!
//! Nickname plus a device-scoped player id, persisted across sessions so a
//! returning player keeps one leaderboard entry.

use serde::{Deserialize, Serialize};

/// Name used for score submission until the player picks one
pub const DEFAULT_NICKNAME: &str = "Player";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfile {
    nickname: String,
    device_id: String,
}

impl PlayerProfile {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "isopod_panic_profile";

    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            nickname: String::new(),
            device_id: device_id.into(),
        }
    }

    /// The submission name; falls back to [`DEFAULT_NICKNAME`] when unset
    pub fn nickname(&self) -> &str {
        if self.nickname.is_empty() {
            DEFAULT_NICKNAME
        } else {
            &self.nickname
        }
    }

    /// Whether the player has picked a name (drives the name-input panel)
    pub fn has_nickname(&self) -> bool {
        !self.nickname.is_empty()
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Accept a trimmed, non-empty nickname; a rejected name keeps the
    /// previous one. Returns whether the name was accepted.
    pub fn set_nickname(&mut self, raw: &str) -> bool {
        let name = raw.trim();
        if name.is_empty() {
            log::warn!("player name rejected: empty after trim");
            return false;
        }
        self.nickname = name.to_string();
        self.save();
        true
    }

    /// Load the profile from LocalStorage (WASM only); generates a fresh
    /// device id on first run.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = &storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(profile) = serde_json::from_str::<PlayerProfile>(&json) {
                    log::info!("loaded player profile: {}", profile.nickname());
                    return profile;
                }
            }
        }

        let profile = Self::new(generate_device_id());
        profile.save();
        profile
    }

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
            log::warn!("profile save skipped: no storage available");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new(generate_device_id())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save(&self) {
        // No-op for native
    }
}

/// One-time device id; uniqueness only needs to hold per install
#[cfg(target_arch = "wasm32")]
fn generate_device_id() -> String {
    let millis = js_sys::Date::now() as u64;
    let salt = (js_sys::Math::random() * 65536.0) as u32;
    format!("dev-{millis:x}-{salt:04x}")
}

#[cfg(not(target_arch = "wasm32"))]
fn generate_device_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("dev-{nanos:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_nickname_until_set() {
        let mut profile = PlayerProfile::new("dev-1");
        assert!(!profile.has_nickname());
        assert_eq!(profile.nickname(), DEFAULT_NICKNAME);

        assert!(profile.set_nickname("  Sowbug Sam  "));
        assert_eq!(profile.nickname(), "Sowbug Sam");
        assert!(profile.has_nickname());
    }

    #[test]
    fn test_empty_name_rejected_keeps_previous() {
        let mut profile = PlayerProfile::new("dev-1");
        profile.set_nickname("Ana");
        assert!(!profile.set_nickname("   "));
        assert_eq!(profile.nickname(), "Ana");
    }

    #[test]
    fn test_load_generates_device_id() {
        let profile = PlayerProfile::load();
        assert!(profile.device_id().starts_with("dev-"));
    }
}
