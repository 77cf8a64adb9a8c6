//! Core library for procedural level generation.
//! Samples terrain from a trained [`TransitionTable`], repairs it, places
//! entities, and checks the result against the movement model.
//!
//! [`TransitionTable`]: lode_rules::TransitionTable

use thiserror::Error;

/// The movement model: ground support, falling, and legal moves under a dig history.
pub mod movement;
/// Spawn, gold and enemy placement.
pub mod placement;
/// Reachability search and basic level validation.
pub mod reachability;
/// Randomized clean-up of sampled terrain.
pub mod repair;
/// The generation orchestrator.
pub mod runner;
/// Collect-all-gold-and-escape search.
pub mod solver;
/// Context-driven terrain sampling.
pub mod structure;

pub use crate::movement::{successor_dug, DugSet, Move, MoveKind, Terrain};
pub use crate::placement::{place_entities, place_entities_with_limits, valid_positions};
pub use crate::reachability::{
    explore, get_reachable_positions, validate_level, validate_level_with_limits, Reachability,
    SearchLimits, ValidationResult,
};
pub use crate::repair::{repair, RepairReport};
pub use crate::runner::{
    generate, generate_batch, run, AttemptCallback, AttemptInfo, GenerationConfig,
    GenerationConfigBuilder, GenerationOutcome,
};
pub use crate::solver::{
    can_solve_level, can_solve_level_with_limits, can_solve_validated, escape_positions,
    is_fully_solvable, validate_level_extended, ExtendedValidation, SolveMethod, SolveResult,
};
pub use crate::structure::generate_structure;

/// Errors that can occur while setting up or driving generation.
///
/// Validation and solvability failures are not errors; they are reported in
/// [`ValidationResult`] and [`SolveResult`].
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Invalid configuration (e.g., zero attempts, a grid too small for a floor).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// An unexpected internal error occurred.
    #[error("Internal error: {0}")]
    InternalError(String),
    /// Generation was stopped by the attempt callback.
    #[error("Generation interrupted: {0}")]
    Interrupted(String),
}
