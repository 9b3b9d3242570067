//! Theme registry mapping theme names to payloads
//!
//! The registry is a plain value. A [`ThemeContextManager`](crate::ThemeContextManager)
//! takes exclusive ownership of one and is the only thing that mutates it afterwards.

use std::{collections::HashMap, sync::Arc};

use crate::types::{ThemePayload, ThemeSnapshot};

/// Name of the built-in light theme
pub const LIGHT_THEME: &str = "light";
/// Name of the built-in dark theme
pub const DARK_THEME: &str = "dark";

/// Theme registry for storing themes by name
#[derive(Debug, Clone, Default)]
pub struct ThemeRegistry {
    themes: HashMap<String, Arc<ThemePayload>>,
}

impl ThemeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in `light` and `dark` themes
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(LIGHT_THEME, Self::light());
        registry.register(DARK_THEME, Self::dark());
        registry
    }

    /// Built-in light payload
    pub fn light() -> ThemePayload {
        ThemePayload::new()
            .with("bg", "#ffffff")
            .with("surface", "#f4f4f5")
            .with("text", "#18181b")
            .with("primary", "#2563eb")
            .with("border", "#d4d4d8")
            .with("radius", 6i64)
    }

    /// Built-in dark payload
    pub fn dark() -> ThemePayload {
        ThemePayload::new()
            .with("bg", "#18181b")
            .with("surface", "#27272a")
            .with("text", "#fafafa")
            .with("primary", "#60a5fa")
            .with("border", "#3f3f46")
            .with("radius", 6i64)
    }

    /// Register a theme, replacing any previous payload under the same name.
    /// Returns the replaced payload.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        payload: ThemePayload,
    ) -> Option<Arc<ThemePayload>> {
        self.themes.insert(name.into(), Arc::new(payload))
    }

    /// Remove a theme, returning its payload
    pub fn unregister(&mut self, name: &str) -> Option<Arc<ThemePayload>> {
        self.themes.remove(name)
    }

    /// Get a theme payload by name
    pub fn get(&self, name: &str) -> Option<Arc<ThemePayload>> {
        self.themes.get(name).cloned()
    }

    /// Get a snapshot of a theme by name
    pub fn snapshot(&self, name: &str) -> Option<ThemeSnapshot> {
        self.get(name).map(|payload| ThemeSnapshot::new(name, payload))
    }

    /// Check if a theme exists
    pub fn contains(&self, name: &str) -> bool {
        self.themes.contains_key(name)
    }

    /// List all theme names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.themes.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// Merge every theme of `other` into this registry (last writer wins)
    pub fn extend(&mut self, other: ThemeRegistry) {
        self.themes.extend(other.themes);
    }
}

impl<K: Into<String>> FromIterator<(K, ThemePayload)> for ThemeRegistry {
    fn from_iter<I: IntoIterator<Item = (K, ThemePayload)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (name, payload) in iter {
            registry.register(name, payload);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_defaults() {
        let registry = ThemeRegistry::with_defaults();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["dark".to_string(), "light".to_string()]);
        assert!(registry.get(LIGHT_THEME).is_some());
    }

    #[test]
    fn test_get_nonexistent_theme() {
        let registry = ThemeRegistry::with_defaults();
        assert!(registry.get("nonexistent-theme-xyz").is_none());
        assert!(registry.snapshot("nonexistent-theme-xyz").is_none());
    }

    #[test]
    fn test_register_replaces_last_writer_wins() {
        let mut registry = ThemeRegistry::new();
        assert!(registry.register("brand", ThemePayload::new().with("bg", "#111")).is_none());

        let previous = registry.register("brand", ThemePayload::new().with("bg", "#222"));
        assert_eq!(previous.unwrap().get("bg").unwrap().to_string(), "#111");
        assert_eq!(registry.get("brand").unwrap().get("bg").unwrap().to_string(), "#222");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister() {
        let mut registry = ThemeRegistry::with_defaults();
        assert!(registry.unregister(DARK_THEME).is_some());
        assert!(registry.unregister(DARK_THEME).is_none());
        assert!(!registry.contains(DARK_THEME));
    }

    #[test]
    fn test_extend_overrides() {
        let mut registry = ThemeRegistry::with_defaults();
        let overrides: ThemeRegistry = vec![
            ("dark", ThemePayload::new().with("bg", "#000")),
            ("sepia", ThemePayload::new().with("bg", "#f4ecd8")),
        ]
        .into_iter()
        .collect();

        registry.extend(overrides);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("dark").unwrap().len(), 1);
    }
}
