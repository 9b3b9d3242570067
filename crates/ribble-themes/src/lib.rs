//! Ribble UI theme context management
//!
//! This crate holds the framework-neutral core that every Ribble UI adapter
//! binds to: a theme registry, the [`ThemeContextManager`] that tracks the
//! active theme of a scope and notifies subscribers, provide/inject scoping,
//! an async watch bridge, theme file loading and settings.
//!
//! ```
//! use ribble_themes::{ThemeContextManager, ThemePayload, ThemeRegistry};
//!
//! let registry: ThemeRegistry = vec![
//!     ("light", ThemePayload::new().with("bg", "#fff")),
//!     ("dark", ThemePayload::new().with("bg", "#000")),
//! ]
//! .into_iter()
//! .collect();
//!
//! let manager = ThemeContextManager::new(registry, "light").unwrap();
//! let subscription = manager
//!     .on_theme_changed(|theme| println!("now using {}", theme.name))
//!     .unwrap();
//!
//! manager.set_theme("dark").unwrap();
//! assert_eq!(manager.get_theme().name, "dark");
//!
//! manager.unsubscribe(&subscription);
//! manager.dispose();
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod loader;
pub mod manager;
pub mod preference;
pub mod registry;
pub mod types;
pub mod watch;

pub use self::config::ThemeSettings;
pub use context::ThemeScope;
pub use error::{Result, SubscriberFailure, ThemeError};
pub use loader::{LoadedTheme, ThemeFormat, ThemeLoader};
pub use manager::{Subscription, ThemeContextManager};
pub use preference::{PreferenceStore, ThemePreference};
pub use registry::{ThemeRegistry, DARK_THEME, LIGHT_THEME};
pub use types::{ThemePayload, ThemeSnapshot, ThemeValue};
pub use watch::ThemeWatch;
