//! Lode Forge Application Library
//!
//! Configuration, logging, model setup, output and visualization for the
//! `lode-forge` level generator.

pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod setup;
pub mod visualization;

use anyhow::Result;
use clap::Parser;

pub use config::AppConfig;
pub use error::AppError;

/// Parses the command line, sets up logging and runs the selected mode.
pub fn main() -> Result<()> {
    let config = AppConfig::parse();
    logging::init_logger(config.log_level);
    run(&config)
}

/// Runs one invocation: validation of an existing level when `--validate` was
/// given, generation otherwise.
pub fn run(config: &AppConfig) -> Result<()> {
    log::info!("Lode Forge starting");
    log::debug!("Command line: {:?}", config);

    let settings = config.resolve()?;
    log::debug!("Resolved settings: {:?}", settings);

    if let Some(path) = &settings.validate {
        return setup::execution::run_validation(path);
    }
    setup::execution::run_generation(&settings).map(|_| ())
}
