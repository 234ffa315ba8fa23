use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{BoardError, BoardResult};

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "TASKBOARD_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub drag: DragConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Activation thresholds for drag gestures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Pointer drags start once the pointer has moved this far.
    pub pointer_distance_px: f64,
    /// Touch drags start once the finger has been held this long.
    pub touch_delay_ms: u64,
    /// Touch movement allowed before the delay elapses.
    pub touch_tolerance_px: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            pointer_distance_px: 8.0,
            touch_delay_ms: 200,
            touch_tolerance_px: 8.0,
        }
    }
}

/// Outbox retry behaviour for background persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub max_backoff_ms: u64,
    /// Write back column ids inferred from legacy status on load.
    pub persist_backfill: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 100,
            backoff_multiplier: 2.0,
            max_backoff_ms: 2_000,
            persist_backfill: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    /// Base URL used to build task links in notifications.
    pub app_url: Option<String>,
    pub due_soon_hours: u32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            app_url: None,
            due_soon_hours: 24,
        }
    }
}

impl NotificationConfig {
    pub fn task_url(&self, task_id: &str) -> Option<String> {
        self.app_url
            .as_deref()
            .map(|base| format!("{}/tasks/{}", base.trim_end_matches('/'), task_id))
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(explicit));
        }
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/taskboard/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("taskboard/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("taskboard\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    /// Load from the default location, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                if let Ok(config) = Self::load_from(&config_path) {
                    return config;
                }
            }
        }
        Self::default()
    }

    pub fn load_from(path: &Path) -> BoardResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> BoardResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| BoardError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> BoardResult<()> {
        if self.sync.max_attempts == 0 {
            return Err(BoardError::Validation(
                "sync.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.sync.backoff_multiplier < 1.0 {
            return Err(BoardError::Validation(
                "sync.backoff_multiplier must be >= 1.0".to_string(),
            ));
        }
        if self.drag.pointer_distance_px < 0.0 || self.drag.touch_tolerance_px < 0.0 {
            return Err(BoardError::Validation(
                "drag distances must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.drag.pointer_distance_px, 8.0);
        assert_eq!(config.drag.touch_delay_ms, 200);
        assert_eq!(config.sync.max_attempts, 3);
        assert!(config.sync.persist_backfill);
        assert!(config.notifications.enabled);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [sync]
            max_attempts = 1

            [notifications]
            app_url = "https://board.example.com/"
            "#,
        )
        .unwrap();

        assert_eq!(config.sync.max_attempts, 1);
        assert_eq!(config.sync.initial_backoff_ms, 100);
        assert_eq!(config.drag.touch_delay_ms, 200);
        assert_eq!(
            config.notifications.task_url("t1").as_deref(),
            Some("https://board.example.com/tasks/t1")
        );
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let err = AppConfig::from_toml_str("[sync]\nmax_attempts = 0\n").unwrap_err();
        assert!(matches!(err, BoardError::Validation(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[drag]\npointer_distance_px = 12.5\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.drag.pointer_distance_px, 12.5);
    }

    #[test]
    fn test_task_url_absent_without_base() {
        assert!(NotificationConfig::default().task_url("t1").is_none());
    }
}
