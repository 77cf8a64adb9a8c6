//! Logging setup for the application.

use crate::config::LogLevel;
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the logger.
///
/// `level` sets the global filter. `RUST_LOG` is still honoured on top of it,
/// so individual modules (e.g. `lode_core::solver=trace`) can be opened up
/// without raising everything else.
pub fn init_logger(level: LogLevel) {
    let global_level: LevelFilter = level.into();

    let mut builder = Builder::new();
    builder.filter_level(global_level);
    builder.parse_env(Env::default());
    builder.format_timestamp(None);

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized; keeping existing configuration");
        return;
    }

    log::debug!("Logger initialized with global log level: {:?}", level);
}
