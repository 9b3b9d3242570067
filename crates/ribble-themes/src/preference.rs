//! Persistence of the last selected theme

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    manager::{Subscription, ThemeContextManager},
};

/// Stored theme preference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePreference {
    pub current_theme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// JSON file holding a [`ThemePreference`]
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored preference; `None` when nothing was saved yet
    pub fn load(&self) -> Result<Option<ThemePreference>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Save `theme` as the current preference
    pub fn save(&self, theme: &str) -> Result<()> {
        let preference = ThemePreference {
            current_theme: theme.to_string(),
            last_updated: Some(chrono::Local::now().to_rfc3339()),
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&preference)?)?;
        tracing::debug!(theme, path = %self.path.display(), "Saved theme preference");
        Ok(())
    }

    /// Save the preference whenever `manager` switches theme
    pub fn attach(&self, manager: &ThemeContextManager) -> Result<Subscription> {
        let store = self.clone();
        manager.subscribe(move |theme| {
            store.save(&theme.name)?;
            Ok(())
        })
    }
}
