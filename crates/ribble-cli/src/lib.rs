//! Command-line front end for Ribble UI themes

pub mod error;
pub mod logging;
pub mod router;

pub use error::{CliError, CliResult};
pub use router::{execute, Cli, Commands};
