//! Core theme types and data structures

use std::{collections::BTreeMap, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

/// A single theme value, either a string (`"#fff"`, `"1rem"`) or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeValue {
    Number(f64),
    String(String),
}

impl fmt::Display for ThemeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeValue::String(s) => f.write_str(s),
            ThemeValue::Number(n) if n.fract() == 0.0 && n.abs() < 2f64.powi(53) => {
                write!(f, "{}", *n as i64)
            }
            ThemeValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for ThemeValue {
    fn from(s: &str) -> Self {
        ThemeValue::String(s.to_string())
    }
}

impl From<String> for ThemeValue {
    fn from(s: String) -> Self {
        ThemeValue::String(s)
    }
}

impl From<f64> for ThemeValue {
    fn from(n: f64) -> Self {
        ThemeValue::Number(n)
    }
}

impl From<i64> for ThemeValue {
    fn from(n: i64) -> Self {
        ThemeValue::Number(n as f64)
    }
}

/// Styling variables of one theme, keyed by CSS custom property name
/// without the leading `--`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemePayload {
    variables: BTreeMap<String, ThemeValue>,
}

impl ThemePayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ThemeValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a variable, returning the previous value if any
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ThemeValue>,
    ) -> Option<ThemeValue> {
        self.variables.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&ThemeValue> {
        self.variables.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ThemeValue)> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Render the payload as a block of CSS custom properties
    ///
    /// ```
    /// use ribble_themes::ThemePayload;
    ///
    /// let payload = ThemePayload::new().with("bg", "#fff").with("radius", 4i64);
    /// assert_eq!(
    ///     payload.to_css_variables(":root"),
    ///     ":root {\n  --bg: #fff;\n  --radius: 4;\n}\n"
    /// );
    /// ```
    pub fn to_css_variables(&self, selector: &str) -> String {
        let mut css = format!("{} {{\n", selector);
        for (key, value) in &self.variables {
            css.push_str(&format!("  --{}: {};\n", key, value));
        }
        css.push_str("}\n");
        css
    }
}

impl<K, V> FromIterator<(K, V)> for ThemePayload
where
    K: Into<String>,
    V: Into<ThemeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            variables: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Immutable view of a theme: its name and a shared payload
#[derive(Debug, Clone)]
pub struct ThemeSnapshot {
    pub name: String,
    pub payload: Arc<ThemePayload>,
}

impl ThemeSnapshot {
    pub fn new(name: impl Into<String>, payload: Arc<ThemePayload>) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Whether both snapshots point at the same name and payload instance
    pub fn same_as(&self, other: &ThemeSnapshot) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.payload, &other.payload)
    }
}

impl PartialEq for ThemeSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.payload == other.payload
    }
}
