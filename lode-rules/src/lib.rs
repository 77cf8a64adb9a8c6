//! Tile model, level text format, corpus loading and the trained structure
//! model for the level generator.

use thiserror::Error;

pub mod formats;
pub mod grid;
pub mod loader;
pub mod model;
pub mod samples;
pub mod training;
pub mod types;

pub use grid::{Grid, GridParseError, LevelGrid, LEVEL_HEIGHT, LEVEL_WIDTH};
pub use model::{ContextKey, Distribution, TransitionTable, FALLBACK_DISTRIBUTION};
pub use samples::sample_corpus;
pub use training::{train, TrainingOptions};
pub use types::{Pos, Tile, TileCaps};

/// Errors that can occur while loading corpora or persisted models.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse file format (e.g., RON/JSON): {0}")]
    ParseError(String),
    #[error("Invalid level #{index} in corpus: {source}")]
    InvalidLevel {
        index: usize,
        #[source]
        source: GridParseError,
    },
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Required feature not enabled: {0}")]
    FeatureNotEnabled(String),
}
