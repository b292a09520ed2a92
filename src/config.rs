use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};
use tokio::sync::watch;

use crate::engine::state::Mode;

/// User-tunable thresholds governing idle/distraction sensitivity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SensitivityProfile {
    pub idle_timeout_secs: u32,
    pub distraction_threshold: u32,
    pub focus_tab_limit: u32,
}

impl Default for SensitivityProfile {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 10,
            distraction_threshold: 5,
            focus_tab_limit: 3,
        }
    }
}

/// When active, the mode passed to the music refresh bypasses the
/// classifier's label. The classifier still runs every cycle so clearing
/// the override resumes automatic mode immediately.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ManualOverride {
    pub active: bool,
    pub mode: Option<Mode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub sensitivity: SensitivityProfile,
    pub manual_override: ManualOverride,
    /// Opt-in: feed page host/title/snippet into context and prompts.
    pub allow_page_context: bool,
    /// Opt-in: extract mood/sleep cues from typed text.
    pub allow_typed_cues: bool,
    pub use_voice_coach: bool,
    pub instrumental_only: bool,
    pub allow_lyric_hook: bool,
    pub default_duration_secs: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sensitivity: SensitivityProfile::default(),
            manual_override: ManualOverride::default(),
            allow_page_context: true,
            allow_typed_cues: true,
            use_voice_coach: true,
            instrumental_only: true,
            allow_lyric_hook: true,
            default_duration_secs: 30,
        }
    }
}

/// Persisted-configuration collaborator. The engine reloads on every
/// change signal and requests an immediate tick.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn load(&self) -> Result<EngineConfig>;

    /// Receiver that observes a new value whenever the stored config
    /// changes. The value itself is just a change counter.
    fn changes(&self) -> watch::Receiver<u64>;
}

/// JSON-file backed store. Reads once at startup, persists on update,
/// and signals watchers through a change counter.
pub struct FileConfigStore {
    path: PathBuf,
    data: RwLock<EngineConfig>,
    change_tx: watch::Sender<u64>,
}

impl FileConfigStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            EngineConfig::default()
        };

        let (change_tx, _) = watch::channel(0);
        Ok(Self {
            path,
            data: RwLock::new(data),
            change_tx,
        })
    }

    pub fn get(&self) -> EngineConfig {
        self.data.read().unwrap().clone()
    }

    pub fn update(&self, apply: impl FnOnce(&mut EngineConfig)) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            apply(&mut guard);
            self.persist(&guard)?;
        }
        self.change_tx.send_modify(|version| *version += 1);
        Ok(())
    }

    fn persist(&self, data: &EngineConfig) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write config to {}", self.path.display()))
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load(&self) -> Result<EngineConfig> {
        Ok(self.get())
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.change_tx.subscribe()
    }
}

/// In-memory store for tests and embedding hosts that manage persistence
/// themselves.
pub struct MemoryConfigStore {
    data: RwLock<EngineConfig>,
    change_tx: watch::Sender<u64>,
}

impl MemoryConfigStore {
    pub fn new(config: EngineConfig) -> Self {
        let (change_tx, _) = watch::channel(0);
        Self {
            data: RwLock::new(config),
            change_tx,
        }
    }

    pub fn update(&self, apply: impl FnOnce(&mut EngineConfig)) {
        {
            let mut guard = self.data.write().unwrap();
            apply(&mut guard);
        }
        self.change_tx.send_modify(|version| *version += 1);
    }
}

impl Default for MemoryConfigStore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn load(&self) -> Result<EngineConfig> {
        Ok(self.data.read().unwrap().clone())
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.change_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_shipped_profile() {
        let config = EngineConfig::default();
        assert_eq!(config.sensitivity.idle_timeout_secs, 10);
        assert_eq!(config.sensitivity.distraction_threshold, 5);
        assert_eq!(config.sensitivity.focus_tab_limit, 3);
        assert!(config.allow_page_context);
        assert!(config.allow_typed_cues);
        assert!(config.use_voice_coach);
        assert!(config.instrumental_only);
        assert_eq!(config.default_duration_secs, 30);
        assert!(!config.manual_override.active);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"sensitivity":{"idleTimeoutSecs":20}}"#).unwrap();
        assert_eq!(config.sensitivity.idle_timeout_secs, 20);
        assert_eq!(config.sensitivity.distraction_threshold, 5);
        assert!(config.allow_typed_cues);
    }

    #[tokio::test]
    async fn file_store_round_trips_and_signals_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let store = FileConfigStore::new(path.clone()).unwrap();
        let mut changes = store.changes();

        store
            .update(|config| config.sensitivity.distraction_threshold = 9)
            .unwrap();
        assert!(changes.has_changed().unwrap());
        changes.mark_unchanged();

        let reloaded = FileConfigStore::new(path).unwrap();
        assert_eq!(reloaded.load().await.unwrap().sensitivity.distraction_threshold, 9);
    }
}
