// Command-line parsing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ribble_themes::{ThemeContextManager, ThemeLoader, ThemeSettings};

use crate::error::{CliError, CliResult};

/// Ribble UI theme tool
#[derive(Parser, Debug)]
#[command(name = "ribble-theme")]
#[command(about = "Inspect, render and switch Ribble UI themes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (default: <config dir>/ribble/themes.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimize output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// List registered themes, marking the active one
    List,

    /// Print the variables of a theme
    Show {
        /// Theme name (default: active theme)
        name: Option<String>,
    },

    /// Render a theme as CSS custom properties
    Css {
        /// Theme name (default: active theme)
        name: Option<String>,

        /// Selector the variables are declared on
        #[arg(long, default_value = ":root")]
        selector: String,
    },

    /// Switch the active theme and remember it
    Use {
        name: String,
    },

    /// Write a theme to a YAML, JSON or TOML file
    Export {
        name: String,

        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

impl Cli {
    /// Settings from `--config` or the default location
    pub fn settings(&self) -> CliResult<ThemeSettings> {
        let settings = match &self.config {
            Some(path) => ThemeSettings::load(path)?,
            None => ThemeSettings::load_default()?,
        };
        Ok(settings)
    }
}

/// Run `command` against the manager built from `settings` and return its output
pub fn execute(command: &Commands, settings: &ThemeSettings) -> CliResult<String> {
    let manager = settings.build_manager()?;
    execute_on(command, settings, &manager)
}

/// Run `command` and tear the manager down whatever the outcome
fn execute_on(
    command: &Commands,
    settings: &ThemeSettings,
    manager: &ThemeContextManager,
) -> CliResult<String> {
    let result = dispatch(command, settings, manager);
    manager.dispose();
    result
}

fn dispatch(
    command: &Commands,
    settings: &ThemeSettings,
    manager: &ThemeContextManager,
) -> CliResult<String> {
    let output = match command {
        Commands::List => list(manager),
        Commands::Show { name } => show(manager, name.as_deref())?,
        Commands::Css { name, selector } => {
            if selector.trim().is_empty() {
                return Err(CliError::InvalidArgument {
                    message: "selector cannot be empty".to_string(),
                });
            }
            let theme = resolve(manager, name.as_deref())?;
            theme.payload.to_css_variables(selector)
        }
        Commands::Use { name } => {
            let subscription = match settings.preference_store() {
                Some(store) => Some(store.attach(manager)?),
                None => {
                    tracing::warn!("No preference_file configured; the selection will not be remembered");
                    None
                }
            };
            let previous = manager.current_name();
            manager.set_theme(name)?;
            if let Some(subscription) = subscription {
                manager.unsubscribe(&subscription);
            }
            if previous == *name {
                format!("Theme '{}' is already active\n", name)
            } else {
                format!("Switched theme: {} -> {}\n", previous, name)
            }
        }
        Commands::Export { name, path } => {
            let theme = manager.preview_theme(name)?;
            ThemeLoader::save_to_file(&theme.name, &theme.payload, path)?;
            format!("Exported '{}' to {}\n", theme.name, path.display())
        }
    };
    Ok(output)
}

fn resolve(
    manager: &ThemeContextManager,
    name: Option<&str>,
) -> CliResult<ribble_themes::ThemeSnapshot> {
    Ok(match name {
        Some(name) => manager.preview_theme(name)?,
        None => manager.get_theme(),
    })
}

fn list(manager: &ThemeContextManager) -> String {
    let current = manager.current_name();
    manager
        .theme_names()
        .into_iter()
        .map(|name| {
            let marker = if name == current { "*" } else { " " };
            format!("{} {}\n", marker, name)
        })
        .collect()
}

fn show(manager: &ThemeContextManager, name: Option<&str>) -> CliResult<String> {
    let theme = resolve(manager, name)?;
    let mut output = format!("{}\n", theme.name);
    for (key, value) in theme.payload.iter() {
        output.push_str(&format!("  {} = {}\n", key, value));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_css_defaults() {
        let cli = Cli::try_parse_from(["ribble-theme", "css", "dark"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Css {
                name: Some("dark".to_string()),
                selector: ":root".to_string()
            }
        );
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["ribble-theme", "list", "--config", "t.toml", "-q"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("t.toml")));
        assert!(cli.quiet);
    }

    #[test]
    fn test_list_marks_active_theme() {
        let output = execute(&Commands::List, &ThemeSettings::default()).unwrap();
        assert_eq!(output, "  dark\n* light\n");
    }

    #[test]
    fn test_empty_selector_rejected() {
        let command = Commands::Css {
            name: None,
            selector: " ".to_string(),
        };
        assert!(matches!(
            execute(&command, &ThemeSettings::default()),
            Err(CliError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_failed_switch_still_disposes_manager() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ThemeSettings {
            preference_file: Some(dir.path().join("pref.json")),
            ..ThemeSettings::default()
        };
        let manager = settings.build_manager().unwrap();
        let command = Commands::Use {
            name: "neon".to_string(),
        };

        let result = execute_on(&command, &settings, &manager);
        assert!(matches!(
            result,
            Err(CliError::Theme(ribble_themes::ThemeError::UnknownTheme(_)))
        ));
        assert!(manager.is_disposed());
        assert_eq!(manager.subscriber_count(), 0);
    }
}
