//! Persisted settings: the last played rule set and the best-score table.
//!
//! Stored as a single JSON file. Lookup order for the path:
//! `RINGLINE_CONFIG` env var, `$HOME/.config/ringline/config.json`, then
//! `./ringline-config.json` as a last resort. A missing or unreadable file
//! falls back to defaults so a fresh install starts clean.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::types::Rules;

/// Best score per rule variant, keyed by [`Rules::mode_string`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Records(BTreeMap<String, u32>);

impl Records {
    /// Best score recorded for a variant; 0 when never played.
    pub fn get(&self, mode: &str) -> u32 {
        self.0.get(mode).copied().unwrap_or(0)
    }

    /// Store `score` if it beats the current record. Zero is never
    /// recorded, so an untouched board leaves no entry behind.
    pub fn submit(&mut self, mode: &str, score: u32) -> bool {
        if score == 0 || score <= self.get(mode) {
            return false;
        }
        self.0.insert(mode.to_owned(), score);
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rules: Rules,
    pub records: Records,
}

impl Config {
    /// Load from disk, falling back to defaults when the file does not
    /// exist yet. Rules are clamped so a hand-edited file cannot smuggle
    /// illegal values into the board.
    pub fn load() -> Self {
        let path = config_path();
        let mut config = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<Config>(&text) {
                Ok(config) => config,
                Err(err) => {
                    warn!("ignoring malformed config {}: {err}", path.display());
                    Config::default()
                }
            },
            Err(_) => {
                info!("no config at {}, using defaults", path.display());
                Config::default()
            }
        };
        config.rules = config.rules.clamped();
        config
    }

    pub fn save(&self) -> Result<()> {
        let path = config_path();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating config dir {}", dir.display()))?;
        }
        let text = serde_json::to_string_pretty(self).context("serializing config")?;
        fs::write(&path, text).with_context(|| format!("writing config {}", path.display()))?;
        info!("saved config to {}", path.display());
        Ok(())
    }
}

fn config_path() -> PathBuf {
    if let Ok(path) = env::var("RINGLINE_CONFIG") {
        return PathBuf::from(path);
    }
    if let Ok(home) = env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join("ringline")
            .join("config.json");
    }
    PathBuf::from("ringline-config.json")
}
