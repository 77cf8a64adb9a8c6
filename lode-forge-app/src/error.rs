use lode_core::GenerationError;
use lode_rules::LoadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Configuration File Error: {0}")]
    ConfigFile(#[from] figment::Error),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Load Error: {0}")]
    Load(#[from] LoadError),

    #[error("Generation Error: {0}")]
    Generation(#[from] GenerationError),

    /// A level checked with `--validate` did not pass.
    #[error("Level failed validation: {0}")]
    ValidationFailed(String),

    #[error("Visualization Error: {0}")]
    Visualization(String),
}
