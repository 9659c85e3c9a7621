//! Configuration system for the Modelibr navigation core.
//!
//! This crate provides configuration loading, saving, and default values
//! for the multi-window navigation layer. It includes:
//!
//! - Liveness and garbage-collection intervals
//! - Default tab seeding for fresh windows
//! - Registry storage location overrides

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Tabs seeded into a window that has no persisted record.
fn default_tabs() -> Vec<String> {
    vec!["modelList".to_string()]
}

fn default_stale_threshold_hours() -> u64 {
    24
}

fn default_gc_interval_secs() -> u64 {
    600
}

fn default_touch_interval_secs() -> u64 {
    180
}

/// Navigation core configuration.
///
/// Every field carries a serde default so a partial (or missing) config file
/// yields a fully usable configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavConfig {
    /// Wire names of the tabs seeded into a brand-new window.
    /// Unknown names are skipped by the consumer with a warning.
    pub default_tabs: Vec<String>,
    /// Window records untouched for longer than this are collected.
    pub stale_threshold_hours: u64,
    /// How often each open window runs a stale-window sweep.
    pub gc_interval_secs: u64,
    /// How often each open window refreshes its liveness timestamp.
    pub touch_interval_secs: u64,
    /// Override for the shared window-registry directory.
    /// `None` uses `<config_dir>/modelibr/windows`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_dir: Option<PathBuf>,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            default_tabs: default_tabs(),
            stale_threshold_hours: default_stale_threshold_hours(),
            gc_interval_secs: default_gc_interval_secs(),
            touch_interval_secs: default_touch_interval_secs(),
            registry_dir: None,
        }
    }
}

impl NavConfig {
    /// Load configuration from the default location, or defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific file.
    ///
    /// A missing or empty file yields the defaults; a present but corrupt
    /// file is an error (silently reverting a user's edits would be worse).
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("Nav config not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read nav config from {:?}", path))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml_ng::from_str(&contents)
            .with_context(|| format!("Failed to parse nav config from {:?}", path))?;
        Ok(config)
    }

    /// Save configuration to a specific file, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        let contents = serde_yaml_ng::to_string(self).context("Failed to serialize nav config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write nav config to {:?}", path))?;
        Ok(())
    }

    /// Path to the navigation config file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("modelibr")
            .join("nav.yaml")
    }

    /// Resolved directory holding the shared window registry.
    pub fn registry_dir(&self) -> PathBuf {
        self.registry_dir.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("modelibr")
                .join("windows")
        })
    }

    /// Threshold beyond which an untouched window record is stale.
    pub fn stale_threshold(&self) -> Duration {
        Duration::from_secs(self.stale_threshold_hours * 3600)
    }

    /// Interval between stale-window sweeps.
    pub fn gc_interval(&self) -> Duration {
        Duration::from_secs(self.gc_interval_secs)
    }

    /// Interval between liveness touches.
    pub fn touch_interval(&self) -> Duration {
        Duration::from_secs(self.touch_interval_secs)
    }
}
