use crate::placement::place_entities_with_limits;
use crate::reachability::{validate_level_with_limits, SearchLimits, ValidationResult};
use crate::repair::repair;
use crate::solver::can_solve_validated;
use crate::structure::generate_structure;
use crate::GenerationError;
use lode_rules::{LevelGrid, TransitionTable};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::Serialize;

/// Bonus added to the score of a fully solvable candidate.
pub const FULL_SOLVE_BONUS: i64 = 50;
/// Penalty per unreachable gold piece.
pub const UNREACHABLE_GOLD_PENALTY: i64 = 10;

/// Summary of one finished generation attempt, handed to the attempt callback.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AttemptInfo {
    /// 1-based attempt number.
    pub attempt: usize,
    pub max_attempts: usize,
    pub score: i64,
    pub valid: bool,
    pub fully_solvable: bool,
}

/// Called after every attempt. Returning an error aborts generation with it.
pub type AttemptCallback = Box<dyn Fn(&AttemptInfo) -> Result<(), GenerationError> + Send + Sync>;

/// Configuration options for the generation orchestrator.
pub struct GenerationConfig {
    pub width: usize,
    pub height: usize,
    pub gold_count: usize,
    pub enemy_count: usize,
    pub max_attempts: usize,
    /// Only accept candidates that can be completed and escaped, not merely
    /// ones with all gold reachable.
    pub require_full_solve: bool,
    pub seed: Option<u64>,
    pub limits: SearchLimits,
    pub attempt_callback: Option<AttemptCallback>,
}

impl GenerationConfig {
    /// Creates a new builder for `GenerationConfig`.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder::default()
    }

    /// Rejects configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.width < 1 {
            return Err(GenerationError::ConfigurationError(
                "width must be at least 1".to_string(),
            ));
        }
        if self.height < 2 {
            return Err(GenerationError::ConfigurationError(format!(
                "height must be at least 2 (got {})",
                self.height
            )));
        }
        if self.max_attempts < 1 {
            return Err(GenerationError::ConfigurationError(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: lode_rules::LEVEL_WIDTH,
            height: lode_rules::LEVEL_HEIGHT,
            gold_count: 5,
            enemy_count: 2,
            max_attempts: 50,
            require_full_solve: false,
            seed: None,
            limits: SearchLimits::default(),
            attempt_callback: None,
        }
    }
}

impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("gold_count", &self.gold_count)
            .field("enemy_count", &self.enemy_count)
            .field("max_attempts", &self.max_attempts)
            .field("require_full_solve", &self.require_full_solve)
            .field("seed", &self.seed)
            .field("limits", &self.limits)
            .field("attempt_callback", &self.attempt_callback.is_some())
            .finish()
    }
}

/// Builder for `GenerationConfig`.
#[derive(Default)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    /// Sets the level size in cells.
    pub fn dimensions(mut self, width: usize, height: usize) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Sets how many gold pieces to place.
    pub fn gold_count(mut self, count: usize) -> Self {
        self.config.gold_count = count;
        self
    }

    /// Sets how many enemies to place.
    pub fn enemy_count(mut self, count: usize) -> Self {
        self.config.enemy_count = count;
        self
    }

    /// Sets the retry budget.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    /// Requires every returned level to be fully solvable, not just valid.
    pub fn require_full_solve(mut self, required: bool) -> Self {
        self.config.require_full_solve = required;
        self
    }

    /// Sets the seed for the random number generator.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Sets the search iteration caps.
    pub fn limits(mut self, limits: SearchLimits) -> Self {
        self.config.limits = limits;
        self
    }

    /// Sets the per-attempt callback.
    pub fn attempt_callback(mut self, callback: AttemptCallback) -> Self {
        self.config.attempt_callback = Some(callback);
        self
    }

    /// Builds the `GenerationConfig`, rejecting unusable settings.
    pub fn build(self) -> Result<GenerationConfig, GenerationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// The level returned by the orchestrator, with its verdicts.
///
/// When no attempt met the success criterion this is the best-scored
/// candidate, so callers must check `validation.valid` and `fully_solvable`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GenerationOutcome {
    pub level: LevelGrid,
    pub validation: ValidationResult,
    /// Attempts consumed, including the returned one.
    pub attempts: usize,
    pub fully_solvable: bool,
    pub score: i64,
}

impl GenerationOutcome {
    /// Whether this outcome meets the success criterion of `config`.
    pub fn is_success(&self, config: &GenerationConfig) -> bool {
        self.validation.valid && (!config.require_full_solve || self.fully_solvable)
    }
}

/// Scores a candidate: reachable gold counts up, unreachable gold and issues
/// count down, and full solvability earns a flat bonus.
pub fn score(validation: &ValidationResult, fully_solvable: bool) -> i64 {
    let reachable = validation.reachable_gold.len() as i64;
    let unreachable = validation.unreachable_gold.len() as i64;
    let issues = validation.issues.len() as i64;
    let bonus = if fully_solvable { FULL_SOLVE_BONUS } else { 0 };
    reachable - UNREACHABLE_GOLD_PENALTY * unreachable - issues + bonus
}

/// Runs the generate, repair, place and validate pipeline until a candidate
/// succeeds or `max_attempts` is spent.
///
/// Full solvability is only searched for candidates that pass basic
/// validation, since a failing candidate can never be fully solvable. When no
/// attempt succeeds the highest-scoring candidate is returned; ties keep the
/// earliest.
///
/// # Errors
///
/// Returns `GenerationError::ConfigurationError` for an unusable config, or
/// whatever error the attempt callback returns.
pub fn generate<R: Rng + ?Sized>(
    table: &TransitionTable,
    config: &GenerationConfig,
    rng: &mut R,
) -> Result<GenerationOutcome, GenerationError> {
    config.validate()?;
    let mut best: Option<GenerationOutcome> = None;

    for attempt in 1..=config.max_attempts {
        let mut level = generate_structure(table, config.width, config.height, rng);
        let report = repair(&mut level, rng);
        let level = place_entities_with_limits(
            &level,
            config.gold_count,
            config.enemy_count,
            rng,
            &config.limits,
        );

        let validation = validate_level_with_limits(&level, &config.limits);
        let fully_solvable = validation.valid
            && can_solve_validated(&level, &validation, &config.limits).solvable;
        let candidate_score = score(&validation, fully_solvable);
        debug!(
            "Attempt {attempt}/{}: valid={}, fully_solvable={fully_solvable}, score={candidate_score}, repaired={report:?}",
            config.max_attempts, validation.valid
        );

        if let Some(callback) = &config.attempt_callback {
            callback(&AttemptInfo {
                attempt,
                max_attempts: config.max_attempts,
                score: candidate_score,
                valid: validation.valid,
                fully_solvable,
            })?;
        }

        let candidate = GenerationOutcome {
            level,
            validation,
            attempts: attempt,
            fully_solvable,
            score: candidate_score,
        };
        if candidate.is_success(config) {
            info!("Generated a level in {attempt} attempt(s) (score {candidate_score})");
            return Ok(candidate);
        }
        if best.as_ref().map_or(true, |b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }

    let mut best = best.ok_or_else(|| {
        GenerationError::InternalError("No candidate produced despite max_attempts >= 1".into())
    })?;
    best.attempts = config.max_attempts;
    warn!(
        "No attempt succeeded within {} attempts; returning best candidate (score {}, {} issue(s))",
        config.max_attempts,
        best.score,
        best.validation.issues.len()
    );
    Ok(best)
}

/// Runs [`generate`] with an RNG seeded from `config.seed`, or from entropy
/// when no seed is set.
pub fn run(
    table: &TransitionTable,
    config: &GenerationConfig,
) -> Result<GenerationOutcome, GenerationError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    generate(table, config, &mut rng)
}

/// Generates `count` levels in parallel.
///
/// Run `i` is seeded with `seed + i` (wrapping), so a seeded batch is
/// reproducible regardless of scheduling. Without a seed, a random base is
/// drawn once. Results are returned in run order.
pub fn generate_batch(
    table: &TransitionTable,
    config: &GenerationConfig,
    count: usize,
) -> Result<Vec<GenerationOutcome>, GenerationError> {
    config.validate()?;
    let base = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("Generating {count} level(s) in parallel from base seed {base}");
    (0..count)
        .into_par_iter()
        .map(|i| {
            let mut rng = StdRng::seed_from_u64(base.wrapping_add(i as u64));
            generate(table, config, &mut rng)
        })
        .collect()
}
