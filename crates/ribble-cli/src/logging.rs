// Logging and verbosity control

use tracing::Level;

/// Level selected by the verbosity flags
pub fn level_for(verbose: bool, quiet: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Install the stderr subscriber
pub fn init_logging(verbose: bool, quiet: bool) {
    tracing_subscriber::fmt()
        .with_max_level(level_for(verbose, quiet))
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}
