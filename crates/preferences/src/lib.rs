//! Durable local preferences.
//!
//! One JSON blob on disk, read as a whole and rewritten as a whole after
//! every mutation. A missing or unreadable blob never fails a load; it
//! resolves to defaults so the settings page always has something to show.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use models::{SecuritySettings, StoredPreferences};

/// Basename of the blob, kept in sync with the web client's storage key.
pub const STORAGE_KEY: &str = "sgkb-settings-preferences";

#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    /// Uses `KONTOBLICK_DATA_DIR` as the blob directory, defaulting to the
    /// working directory.
    pub fn from_env() -> Self {
        let dir = std::env::var("KONTOBLICK_DATA_DIR").unwrap_or_else(|_| ".".to_string());
        Self::new(dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the blob. Missing file or unparseable content both resolve to
    /// defaults; only the latter is worth a warning.
    pub fn load(&self) -> StoredPreferences {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                if err.kind() != ErrorKind::NotFound {
                    warn!(path = %self.path.display(), %err, "could not read preferences");
                }
                return StoredPreferences::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(preferences) => preferences,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "stored preferences were unreadable, falling back to defaults");
                StoredPreferences::default()
            }
        }
    }

    /// Rewrites the whole blob.
    pub fn save(&self, preferences: &StoredPreferences) -> Result<()> {
        let raw = serde_json::to_string(preferences)
            .context("Failed to serialize preferences")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write preferences to {}", self.path.display()))?;
        Ok(())
    }

    pub fn set_account_notification(
        &self,
        account: &str,
        enabled: bool,
    ) -> Result<StoredPreferences> {
        self.update(|preferences| {
            preferences
                .account_notifications
                .insert(account.to_string(), enabled);
        })
    }

    pub fn set_merchant_watch(&self, merchant: &str, watched: bool) -> Result<StoredPreferences> {
        self.update(|preferences| {
            preferences
                .merchant_watchlist
                .insert(merchant.to_string(), watched);
        })
    }

    pub fn set_daily_limit(&self, account: &str, limit: f64) -> Result<StoredPreferences> {
        self.update(|preferences| {
            preferences.daily_limits.insert(account.to_string(), limit);
        })
    }

    pub fn set_preferred_account(&self, account: &str) -> Result<StoredPreferences> {
        self.update(|preferences| {
            preferences.preferred_account = account.to_string();
        })
    }

    pub fn set_security_settings(&self, settings: SecuritySettings) -> Result<StoredPreferences> {
        self.update(|preferences| {
            preferences.security_settings = settings;
        })
    }

    fn update(&self, apply: impl FnOnce(&mut StoredPreferences)) -> Result<StoredPreferences> {
        let mut preferences = self.load();
        apply(&mut preferences);
        self.save(&preferences)?;
        Ok(preferences)
    }
}
