// Ribble theme CLI entry point

use std::io::Write;

use clap::Parser;
use ribble_cli::{execute, logging, Cli};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    let result = cli
        .settings()
        .and_then(|settings| execute(&cli.command, &settings));

    match result {
        Ok(output) => {
            if let Err(e) = std::io::stdout().write_all(output.as_bytes()) {
                tracing::error!("Failed to write output: {}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::debug!("{:?}", e);
            eprintln!("✗ {}", e.user_message());
            std::process::exit(1);
        }
    }
}
