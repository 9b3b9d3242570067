//! Theme loading from YAML, JSON and TOML files
//!
//! A theme file holds either a flat mapping of variables, named after the
//! file stem:
//!
//! ```yaml
//! bg: "#1b2430"
//! text: white
//! radius: 4
//! ```
//!
//! or a named document:
//!
//! ```yaml
//! name: pastel
//! variables:
//!   bg: "#453c67"
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, ThemeError},
    registry::ThemeRegistry,
    types::ThemePayload,
};

/// Supported theme file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeFormat {
    Yaml,
    Json,
    Toml,
}

impl ThemeFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(ThemeFormat::Yaml),
            "json" => Some(ThemeFormat::Json),
            "toml" => Some(ThemeFormat::Toml),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ThemeDocument {
    Named {
        name: String,
        variables: ThemePayload,
    },
    Flat(ThemePayload),
}

#[derive(Serialize)]
struct NamedDocument<'a> {
    name: &'a str,
    variables: &'a ThemePayload,
}

/// A theme read from a file
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTheme {
    pub name: String,
    pub payload: ThemePayload,
}

/// Theme file loader
pub struct ThemeLoader;

impl ThemeLoader {
    /// Parse a theme from a string. `fallback_name` names flat documents.
    pub fn load_from_str(
        content: &str,
        format: ThemeFormat,
        fallback_name: &str,
    ) -> Result<LoadedTheme> {
        let document: ThemeDocument = match format {
            ThemeFormat::Yaml => serde_yaml::from_str(content)?,
            ThemeFormat::Json => serde_json::from_str(content)?,
            ThemeFormat::Toml => toml::from_str(content)?,
        };

        let (name, payload) = match document {
            ThemeDocument::Named { name, variables } => (name, variables),
            ThemeDocument::Flat(variables) => (fallback_name.to_string(), variables),
        };

        Self::validate(name, payload)
    }

    /// Load a theme from a file
    pub fn load_from_file(path: &Path) -> Result<LoadedTheme> {
        if !path.exists() {
            return Err(ThemeError::Validation(format!(
                "Theme file not found: {}",
                path.display()
            )));
        }

        let format = ThemeFormat::from_path(path).ok_or_else(|| {
            ThemeError::Validation(format!(
                "Unsupported theme file (expected .yaml, .yml, .json or .toml): {}",
                path.display()
            ))
        })?;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let content = fs::read_to_string(path)?;
        Self::load_from_str(&content, format, &stem)
    }

    /// Load all themes from a directory, sorted by name.
    ///
    /// Files that fail to load are skipped with a warning.
    pub fn load_from_directory(dir: &Path) -> Result<Vec<LoadedTheme>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        if !dir.is_dir() {
            return Err(ThemeError::Validation(format!(
                "Path is not a directory: {}",
                dir.display()
            )));
        }

        let mut themes = Vec::new();

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || ThemeFormat::from_path(&path).is_none() {
                continue;
            }

            match Self::load_from_file(&path) {
                Ok(theme) => themes.push(theme),
                Err(e) => {
                    tracing::warn!("Failed to load theme from {}: {}", path.display(), e);
                }
            }
        }

        themes.sort_by(|a, b| a.name.cmp(&b.name));
        tracing::debug!("Loaded {} themes from {}", themes.len(), dir.display());
        Ok(themes)
    }

    /// Load a directory straight into a registry
    pub fn load_registry(dir: &Path) -> Result<ThemeRegistry> {
        Ok(Self::load_from_directory(dir)?
            .into_iter()
            .map(|theme| (theme.name, theme.payload))
            .collect())
    }

    /// Save a theme as a named document; the format follows the extension
    pub fn save_to_file(name: &str, payload: &ThemePayload, path: &Path) -> Result<()> {
        let format = ThemeFormat::from_path(path).ok_or_else(|| {
            ThemeError::Validation(format!("Unsupported theme file: {}", path.display()))
        })?;

        let document = NamedDocument {
            name,
            variables: payload,
        };
        let content = match format {
            ThemeFormat::Yaml => serde_yaml::to_string(&document)?,
            ThemeFormat::Json => serde_json::to_string_pretty(&document)?,
            ThemeFormat::Toml => toml::to_string_pretty(&document)
                .map_err(|e| ThemeError::Parse(e.to_string()))?,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Default directory for user themes
    pub fn themes_directory() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ThemeError::Validation("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("ribble").join("themes"))
    }

    /// Check the name and keys, stripping any leading `--` from keys
    pub(crate) fn validate(name: String, payload: ThemePayload) -> Result<LoadedTheme> {
        if name.trim().is_empty() {
            return Err(ThemeError::Validation("Theme name cannot be empty".to_string()));
        }

        let mut normalized = ThemePayload::new();
        for (key, value) in payload.iter() {
            let bare = key.strip_prefix("--").unwrap_or(key);
            if bare.is_empty() || bare.chars().any(char::is_whitespace) {
                return Err(ThemeError::Validation(format!(
                    "Invalid variable name '{}' in theme '{}'",
                    key, name
                )));
            }
            normalized.insert(bare, value.clone());
        }

        Ok(LoadedTheme {
            name,
            payload: normalized,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ThemeValue;

    #[test]
    fn test_flat_yaml_uses_fallback_name() {
        let theme = ThemeLoader::load_from_str(
            "bg: \"#1b2430\"\ntext: white\nradius: 4\n",
            ThemeFormat::Yaml,
            "midnight",
        )
        .unwrap();

        assert_eq!(theme.name, "midnight");
        assert_eq!(theme.payload.get("radius"), Some(&ThemeValue::Number(4.0)));
        assert_eq!(theme.payload.get("text"), Some(&ThemeValue::String("white".into())));
    }

    #[test]
    fn test_named_json_document() {
        let theme = ThemeLoader::load_from_str(
            r##"{"name": "pastel", "variables": {"--bg": "#453c67"}}"##,
            ThemeFormat::Json,
            "ignored",
        )
        .unwrap();

        assert_eq!(theme.name, "pastel");
        assert_eq!(theme.payload.get("bg"), Some(&ThemeValue::String("#453c67".into())));
    }

    #[test]
    fn test_toml_document() {
        let theme = ThemeLoader::load_from_str(
            "name = \"brand\"\n[variables]\nprimary = \"#e11d48\"\nscale = 1.25\n",
            ThemeFormat::Toml,
            "ignored",
        )
        .unwrap();

        assert_eq!(theme.name, "brand");
        assert_eq!(theme.payload.get("scale"), Some(&ThemeValue::Number(1.25)));
    }

    #[test]
    fn test_invalid_variable_name() {
        let err = ThemeLoader::load_from_str("\"bad key\": red\n", ThemeFormat::Yaml, "x")
            .unwrap_err();
        assert!(matches!(err, ThemeError::Validation(_)));
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = ThemeLoader::load_from_str(
            r#"{"name": " ", "variables": {}}"#,
            ThemeFormat::Json,
            "x",
        )
        .unwrap_err();
        assert!(matches!(err, ThemeError::Validation(_)));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ThemeFormat::from_path(Path::new("a.yml")), Some(ThemeFormat::Yaml));
        assert_eq!(ThemeFormat::from_path(Path::new("a.toml")), Some(ThemeFormat::Toml));
        assert_eq!(ThemeFormat::from_path(Path::new("a.css")), None);
        assert_eq!(ThemeFormat::from_path(Path::new("noext")), None);
    }
}
