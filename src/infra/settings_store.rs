// ============================================================
// Layer 6 — Settings Store
// ============================================================
// Reads run settings from a TOML file on disk.
//
// Parsing only: constraint checks live with the settings
// type itself, after CLI overrides have been applied.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::application::settings::Settings;

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn read(&self) -> Result<Settings> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read settings file '{}'", self.path.display()))?;
        let settings: Settings = toml::from_str(&text)
            .with_context(|| format!("Invalid settings in '{}'", self.path.display()))?;

        tracing::info!(
            "Loaded settings from '{}' (mode={}, label={})",
            self.path.display(),
            settings.model.mode,
            settings.model.parameters.label,
        );
        Ok(settings)
    }
}
