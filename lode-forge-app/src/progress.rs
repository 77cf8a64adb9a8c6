// lode-forge-app/src/progress.rs

use lode_core::{AttemptCallback, AttemptInfo, GenerationError};
use std::sync::Arc;

/// Trait for reporting generation progress.
///
/// Reporters are shared with parallel batch runs, so they must be `Send + Sync`.
pub trait ProgressReporter: Send + Sync {
    /// Called after every generation attempt.
    fn report(&self, info: &AttemptInfo) -> Result<(), GenerationError>;
}

/// Logs each attempt through the `log` facade.
#[derive(Debug, Default)]
pub struct LogProgressReporter;

impl ProgressReporter for LogProgressReporter {
    fn report(&self, info: &AttemptInfo) -> Result<(), GenerationError> {
        if info.valid {
            log::info!(
                "Attempt {}/{}: valid (score {}, fully solvable: {})",
                info.attempt,
                info.max_attempts,
                info.score,
                info.fully_solvable
            );
        } else {
            log::debug!(
                "Attempt {}/{}: rejected (score {})",
                info.attempt,
                info.max_attempts,
                info.score
            );
        }
        Ok(())
    }
}

/// Wraps a reporter as the orchestrator's per-attempt callback.
pub fn into_callback(reporter: Arc<dyn ProgressReporter>) -> AttemptCallback {
    Box::new(move |info: &AttemptInfo| reporter.report(info))
}
