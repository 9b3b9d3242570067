//! Theme settings and composition of the application's theme context
//!
//! Settings come from an optional TOML file layered with `RIBBLE_THEME__*`
//! environment variables, e.g. `RIBBLE_THEME__INITIAL_THEME=dark`.
//!
//! `config` folds keys to lowercase, so the inline `[themes]` table of the
//! file is read with `toml` directly to keep theme and variable names intact.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::Result,
    loader::ThemeLoader,
    manager::ThemeContextManager,
    preference::PreferenceStore,
    registry::{ThemeRegistry, LIGHT_THEME},
    types::ThemePayload,
};

const ENV_PREFIX: &str = "RIBBLE_THEME";

/// The inline theme table of a settings file, keys as written
#[derive(Debug, Deserialize)]
struct InlineThemes {
    #[serde(default)]
    themes: BTreeMap<String, ThemePayload>,
}

fn default_initial_theme() -> String {
    LIGHT_THEME.to_string()
}

/// Theme settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeSettings {
    /// Theme active at startup unless a saved preference overrides it
    #[serde(default = "default_initial_theme")]
    pub initial_theme: String,
    /// Directory of theme files to register
    #[serde(default)]
    pub themes_dir: Option<PathBuf>,
    /// Where the selected theme is remembered
    #[serde(default)]
    pub preference_file: Option<PathBuf>,
    /// Inline theme definitions
    #[serde(default)]
    pub themes: BTreeMap<String, ThemePayload>,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            initial_theme: default_initial_theme(),
            themes_dir: None,
            preference_file: None,
            themes: BTreeMap::new(),
        }
    }
}

impl ThemeSettings {
    /// Load settings from `path` (optional file) and the environment
    pub fn load(path: &Path) -> Result<Self> {
        let mut settings: ThemeSettings = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        if path.is_file() {
            let inline: InlineThemes = toml::from_str(&fs::read_to_string(path)?)?;
            settings.merge_inline_themes(inline.themes);
        }
        debug!(path = %path.display(), initial = %settings.initial_theme, "Loaded theme settings");
        Ok(settings)
    }

    /// Replace the case-folded copies of file themes with the originals.
    /// Themes only the environment defined are kept as they are.
    fn merge_inline_themes(&mut self, file_themes: BTreeMap<String, ThemePayload>) {
        let folded: Vec<String> = file_themes.keys().map(|name| name.to_lowercase()).collect();
        self.themes.retain(|name, _| !folded.contains(name));
        self.themes.extend(file_themes);
    }

    /// Load settings from the default location
    pub fn load_default() -> Result<Self> {
        Self::load(&Self::default_config_path())
    }

    /// `<config_dir>/ribble/themes.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ribble")
            .join("themes.toml")
    }

    pub fn preference_store(&self) -> Option<PreferenceStore> {
        self.preference_file.as_ref().map(PreferenceStore::new)
    }

    /// Compose the registry: built-ins, then the themes directory, then
    /// inline themes, each layer replacing same-named themes of the last
    pub fn build_registry(&self) -> Result<ThemeRegistry> {
        let mut registry = ThemeRegistry::with_defaults();
        if let Some(dir) = &self.themes_dir {
            registry.extend(ThemeLoader::load_registry(dir)?);
        }
        for (name, payload) in &self.themes {
            let theme = ThemeLoader::validate(name.clone(), payload.clone())?;
            registry.register(theme.name, theme.payload);
        }
        Ok(registry)
    }

    /// Build the manager for the composition root.
    ///
    /// A saved preference naming a registered theme wins over `initial_theme`.
    pub fn build_manager(&self) -> Result<ThemeContextManager> {
        let registry = self.build_registry()?;
        let initial = self
            .restored_theme(&registry)
            .unwrap_or_else(|| self.initial_theme.clone());
        ThemeContextManager::new(registry, &initial)
    }

    fn restored_theme(&self, registry: &ThemeRegistry) -> Option<String> {
        let store = self.preference_store()?;
        match store.load() {
            Ok(Some(preference)) if registry.contains(&preference.current_theme) => {
                debug!(theme = %preference.current_theme, "Restoring saved theme");
                Some(preference.current_theme)
            }
            Ok(Some(preference)) => {
                warn!(theme = %preference.current_theme, "Saved theme is no longer registered");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(path = %store.path().display(), "Failed to read theme preference: {}", e);
                None
            }
        }
    }
}
