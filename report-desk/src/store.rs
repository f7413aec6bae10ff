//! Persisted per-instance state (JSON on disk).
//!
//! Collections are rebuilt from upstream after a restart, so only the
//! event signatures and the read counter survive.
//!
//! Key (stable across restarts): SHA256(instance_id)
//! Layout: {state_dir}/<instance_sanitized>-<hash12>.json

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::errors::DeskResult;

/// State that survives restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Identity of the last traffic report an event fired for.
    pub last_traffic_signature: Option<String>,
    /// Identity of the last important notice an event fired for.
    pub last_notice_signature: Option<String>,
    /// Read counter snapshot for display.
    pub read_count: usize,
}

/// Filesystem-safe replacement for instance names (separators → underscores).
fn sanitize(s: &str) -> String {
    s.replace(['/', '\\'], "_")
}

/// Deterministic state path for one desk instance.
fn key_path(state_dir: &str, instance_id: &str) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(instance_id.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    PathBuf::from(state_dir).join(format!("{}-{}.json", sanitize(instance_id), &digest[..12]))
}

/// JSON-on-disk store for [`PersistedState`].
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(state_dir: &str, instance_id: &str) -> Self {
        Self {
            path: key_path(state_dir, instance_id),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted state; a missing file is the default state.
    pub async fn load(&self) -> DeskResult<PersistedState> {
        if !self.path.exists() {
            return Ok(PersistedState::default());
        }
        let data = fs::read(&self.path).await?;
        let state: PersistedState = serde_json::from_slice(&data)?;
        Ok(state)
    }

    /// Writes the state, creating parent directories on first use.
    pub async fn save(&self, state: &PersistedState) -> DeskResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).await?;
        }
        let json = serde_json::to_vec_pretty(state)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Deletes the state file. A missing file is not an error.
    pub async fn remove(&self) -> DeskResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_state_dir(tag: &str) -> String {
        std::env::temp_dir()
            .join(format!("trafik-store-{tag}-{}", std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn key_path_is_deterministic_and_sanitized() {
        let a = key_path("state", "home/assistant");
        let b = key_path("state", "home/assistant");
        assert_eq!(a, b);

        let name = a.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("home_assistant-"));
        assert!(name.ends_with(".json"));
        // 12 hex chars between the dash and the extension.
        let digest = name
            .trim_start_matches("home_assistant-")
            .trim_end_matches(".json");
        assert_eq!(digest.len(), 12);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));

        assert_ne!(a, key_path("state", "other"));
    }

    #[tokio::test]
    async fn missing_file_loads_the_default_state() {
        let store = SettingsStore::new(&temp_state_dir("missing"), "nobody");
        let state = store.load().await.unwrap();
        assert_eq!(state, PersistedState::default());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = temp_state_dir("roundtrip");
        let store = SettingsStore::new(&dir, "default");

        let state = PersistedState {
            last_traffic_signature: Some("r42".to_string()),
            last_notice_signature: Some("n1:2026-02-10T09:45:00+01:00".to_string()),
            read_count: 7,
        };
        store.save(&state).await.unwrap();
        assert_eq!(store.load().await.unwrap(), state);

        store.remove().await.unwrap();
        // Second removal hits the missing-file path.
        store.remove().await.unwrap();
        assert_eq!(store.load().await.unwrap(), PersistedState::default());

        let _ = fs::remove_dir_all(&dir).await;
    }
}
