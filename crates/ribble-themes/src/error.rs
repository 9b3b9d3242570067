//! Error types for the themes crate

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("Initial theme is not registered: {0}")]
    InvalidTheme(String),

    #[error("Theme not found: {0}")]
    UnknownTheme(String),

    #[error("Theme context has been disposed")]
    Disposed,

    #[error("{} subscriber(s) failed during theme notification: {}", .0.len(), FailureList(.0))]
    AggregateSubscriber(Vec<SubscriberFailure>),

    #[error("Theme is currently in use: {0}")]
    ThemeInUse(String),

    #[error("Theme validation failed: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ThemeError {
    /// Subscriber failures carried by an aggregate error, empty otherwise
    pub fn subscriber_failures(&self) -> &[SubscriberFailure] {
        match self {
            ThemeError::AggregateSubscriber(failures) => failures,
            _ => &[],
        }
    }
}

impl From<serde_yaml::Error> for ThemeError {
    fn from(e: serde_yaml::Error) -> Self {
        ThemeError::Parse(e.to_string())
    }
}

impl From<serde_json::Error> for ThemeError {
    fn from(e: serde_json::Error) -> Self {
        ThemeError::Parse(e.to_string())
    }
}

impl From<toml::de::Error> for ThemeError {
    fn from(e: toml::de::Error) -> Self {
        ThemeError::Parse(e.to_string())
    }
}

/// One subscriber callback that failed while a theme change was delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberFailure {
    /// Id of the subscription whose callback failed
    pub subscription_id: u64,
    /// Theme that was being delivered
    pub theme: String,
    /// Error or panic message
    pub message: String,
}

impl fmt::Display for SubscriberFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "subscriber #{} on '{}': {}",
            self.subscription_id, self.theme, self.message
        )
    }
}

struct FailureList<'a>(&'a [SubscriberFailure]);

impl fmt::Display for FailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", failure)?;
        }
        Ok(())
    }
}

pub type Result<T> = std::result::Result<T, ThemeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_message_lists_failures() {
        let err = ThemeError::AggregateSubscriber(vec![
            SubscriberFailure {
                subscription_id: 1,
                theme: "dark".to_string(),
                message: "boom".to_string(),
            },
            SubscriberFailure {
                subscription_id: 3,
                theme: "dark".to_string(),
                message: "bang".to_string(),
            },
        ]);

        let msg = err.to_string();
        assert!(msg.starts_with("2 subscriber(s) failed"));
        assert!(msg.contains("subscriber #1 on 'dark': boom; subscriber #3 on 'dark': bang"));
        assert_eq!(err.subscriber_failures().len(), 2);
    }

    #[test]
    fn test_non_aggregate_has_no_failures() {
        let err = ThemeError::UnknownTheme("sepia".to_string());
        assert!(err.subscriber_failures().is_empty());
        assert_eq!(err.to_string(), "Theme not found: sepia");
    }
}
