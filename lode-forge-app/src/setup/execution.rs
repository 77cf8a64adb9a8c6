//! Handles the execution logic for the generate and validate modes.

use crate::{
    config::{Settings, VisualizationMode},
    error::AppError,
    output,
    progress::{into_callback, LogProgressReporter},
    setup::model::prepare_table,
    visualization::create_visualizer,
};
use anyhow::{Context, Result};
use lode_core::{
    can_solve_validated, generate_batch, run, validate_level, GenerationConfig, GenerationOutcome,
    SearchLimits,
};
use lode_rules::loader::load_level_from_file;
use log::{info, warn};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Builds the orchestrator configuration, with progress logged per attempt.
pub fn generation_config(settings: &Settings) -> Result<GenerationConfig, AppError> {
    let mut builder = GenerationConfig::builder()
        .dimensions(settings.width, settings.height)
        .gold_count(settings.gold)
        .enemy_count(settings.enemies)
        .max_attempts(settings.max_attempts)
        .require_full_solve(settings.require_full_solve)
        .attempt_callback(into_callback(Arc::new(LogProgressReporter)));
    if let Some(seed) = settings.seed {
        builder = builder.seed(seed);
    }
    Ok(builder.build()?)
}

/// Generates `settings.count` levels, then displays and saves them.
///
/// Levels that fail validation are still emitted, with a warning.
pub fn run_generation(settings: &Settings) -> Result<Vec<GenerationOutcome>> {
    let table = prepare_table(settings)?;
    let config = generation_config(settings)?;
    info!(
        "Generating {} level(s) of {}x{} with {} gold and {} enemies",
        settings.count, settings.width, settings.height, settings.gold, settings.enemies
    );

    let start_time = Instant::now();
    let outcomes = if settings.count == 1 {
        vec![run(&table, &config).map_err(AppError::from)?]
    } else {
        generate_batch(&table, &config, settings.count).map_err(AppError::from)?
    };
    info!("Generation finished in {:.2?}", start_time.elapsed());

    for (index, outcome) in outcomes.iter().enumerate() {
        if !outcome.is_success(&config) {
            warn!(
                "Level {} is a best-effort result after {} attempts: valid={}, fully solvable={}, issues: {}",
                index + 1,
                outcome.attempts,
                outcome.validation.valid,
                outcome.fully_solvable,
                outcome.validation.issues.join("; ")
            );
        }
    }

    if let Some(mut visualizer) = create_visualizer(settings.visualization_mode) {
        for (index, outcome) in outcomes.iter().enumerate() {
            visualizer
                .display_outcome(index, outcome)
                .map_err(|e| AppError::Visualization(e.to_string()))?;
        }
    }

    let levels: Vec<_> = outcomes.iter().map(|o| o.level.clone()).collect();
    match &settings.output_path {
        Some(path) => output::save_levels_to_file(&levels, path)?,
        None if settings.visualization_mode == VisualizationMode::None => {
            println!("{}", output::format_levels(&levels));
        }
        None => {}
    }
    Ok(outcomes)
}

#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    validation: &'a lode_core::ValidationResult,
    solve: &'a lode_core::SolveResult,
}

/// Validates a single level file, printing a JSON report.
///
/// Fails when the level does not pass basic validation.
pub fn run_validation(path: &Path) -> Result<()> {
    let level = load_level_from_file(path).map_err(AppError::from)?;
    info!(
        "Validating {}x{} level from {:?}",
        level.width, level.height, path
    );
    let validation = validate_level(&level);
    let solve = can_solve_validated(&level, &validation, &SearchLimits::default());

    let report = serde_json::to_string_pretty(&ValidationReport {
        validation: &validation,
        solve: &solve,
    })
    .context("Failed to serialize validation report")?;
    println!("{report}");

    if !validation.valid {
        return Err(AppError::ValidationFailed(validation.issues.join("; ")).into());
    }
    if solve.solvable {
        info!("Level is valid and fully solvable");
    } else {
        warn!(
            "Level is valid but not fully solvable: {}",
            solve.reason.as_deref().unwrap_or("unknown reason")
        );
    }
    Ok(())
}
