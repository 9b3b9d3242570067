use ribble_themes::ThemeError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error(transparent)]
    Theme(#[from] ThemeError),
}

impl CliError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!(
                    "Invalid argument: {}\n\nRun 'ribble-theme --help' for usage information.",
                    message
                )
            }
            CliError::Theme(ThemeError::UnknownTheme(name))
            | CliError::Theme(ThemeError::InvalidTheme(name)) => {
                format!(
                    "Theme '{}' is not registered.\n\nRun 'ribble-theme list' for available themes.",
                    name
                )
            }
            CliError::Theme(ThemeError::Config(e)) => {
                format!("Configuration error: {}\n\nCheck your themes.toml.", e)
            }
            CliError::Theme(e) => e.to_string(),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
