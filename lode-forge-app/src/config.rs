use crate::error::AppError;
use clap::{Parser, ValueEnum};
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use log::LevelFilter;
use serde::Deserialize;
use std::path::PathBuf;

/// Prefix of environment variables read as configuration (e.g. `LODE_FORGE_GOLD`).
pub const ENV_PREFIX: &str = "LODE_FORGE_";

pub const DEFAULT_GOLD: usize = 6;
pub const DEFAULT_ENEMIES: usize = 3;

/// Represents the different visualization modes available.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisualizationMode {
    #[default]
    None,
    /// Colored tiles printed to the terminal.
    Terminal,
}

/// Global log filter, overridden per module by `RUST_LOG`.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

/// Command line for the lode-forge level generator.
///
/// Generation settings left unset fall back to the optional TOML config file,
/// then to `LODE_FORGE_*` environment variables, then to built-in defaults.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// TOML file with generation settings.
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Training corpus (plain text or RON). Uses the built-in samples if omitted.
    #[arg(long, value_name = "FILE")]
    pub corpus: Option<PathBuf>,

    /// Load a trained model instead of training on a corpus.
    #[arg(long, value_name = "FILE", conflicts_with = "corpus")]
    pub model: Option<PathBuf>,

    /// Save the trained model (RON, or JSON for `.json` paths).
    #[arg(long, value_name = "FILE")]
    pub save_model: Option<PathBuf>,

    /// Do not augment the corpus with mirrored levels.
    #[arg(long, default_value_t = false)]
    pub no_mirror: bool,

    /// Width of the generated level.
    #[arg(long)]
    pub width: Option<usize>,

    /// Height of the generated level.
    #[arg(long)]
    pub height: Option<usize>,

    /// Number of gold pieces to place.
    #[arg(long)]
    pub gold: Option<usize>,

    /// Number of enemies to place.
    #[arg(long)]
    pub enemies: Option<usize>,

    /// Generation attempts before settling for the best candidate.
    #[arg(long)]
    pub max_attempts: Option<usize>,

    /// Only accept levels whose gold can all be collected before escaping.
    #[arg(long, default_value_t = false)]
    pub require_full_solve: bool,

    /// Optional seed for the random number generator.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of levels to generate.
    #[arg(long)]
    pub count: Option<usize>,

    /// Validate an existing level file instead of generating.
    #[arg(long, value_name = "FILE")]
    pub validate: Option<PathBuf>,

    /// Path to save the generated levels.
    #[arg(short, long, value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Choose the visualization mode.
    #[arg(long, value_enum, default_value_t = VisualizationMode::None)]
    pub visualization_mode: VisualizationMode,

    /// Global log level.
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

/// Settings read from the config file and environment.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct FileConfig {
    pub corpus: Option<PathBuf>,
    pub model: Option<PathBuf>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub gold: Option<usize>,
    pub enemies: Option<usize>,
    pub max_attempts: Option<usize>,
    pub require_full_solve: Option<bool>,
    pub seed: Option<u64>,
    pub count: Option<usize>,
    pub output_path: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub corpus: Option<PathBuf>,
    pub model: Option<PathBuf>,
    pub save_model: Option<PathBuf>,
    pub mirror: bool,
    pub width: usize,
    pub height: usize,
    pub gold: usize,
    pub enemies: usize,
    pub max_attempts: usize,
    pub require_full_solve: bool,
    pub seed: Option<u64>,
    pub count: usize,
    pub validate: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub visualization_mode: VisualizationMode,
}

impl AppConfig {
    /// Reads the config file (if any) and `LODE_FORGE_*` variables.
    pub fn load_file_config(&self) -> Result<FileConfig, AppError> {
        let mut figment = Figment::new();
        if let Some(path) = &self.config_file {
            if !path.is_file() {
                return Err(AppError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)).extract()?)
    }

    /// Merges command line, file and environment settings. Flags given on the
    /// command line win.
    pub fn resolve(&self) -> Result<Settings, AppError> {
        let file = self.load_file_config()?;
        let defaults = lode_core::GenerationConfig::default();

        let settings = Settings {
            corpus: self.corpus.clone().or(file.corpus),
            model: self.model.clone().or(file.model),
            save_model: self.save_model.clone(),
            mirror: !self.no_mirror,
            width: self.width.or(file.width).unwrap_or(defaults.width),
            height: self.height.or(file.height).unwrap_or(defaults.height),
            gold: self.gold.or(file.gold).unwrap_or(DEFAULT_GOLD),
            enemies: self.enemies.or(file.enemies).unwrap_or(DEFAULT_ENEMIES),
            max_attempts: self
                .max_attempts
                .or(file.max_attempts)
                .unwrap_or(defaults.max_attempts),
            require_full_solve: self.require_full_solve
                || file.require_full_solve.unwrap_or(false),
            seed: self.seed.or(file.seed),
            count: self.count.or(file.count).unwrap_or(1),
            validate: self.validate.clone(),
            output_path: self.output_path.clone().or(file.output_path),
            visualization_mode: self.visualization_mode,
        };

        if settings.corpus.is_some() && settings.model.is_some() {
            return Err(AppError::Config(
                "A corpus and a model were both configured; choose one".to_string(),
            ));
        }
        if settings.count == 0 {
            return Err(AppError::Config("count must be at least 1".to_string()));
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn parse(args: &[&str]) -> AppConfig {
        let mut full = vec!["lode-forge"];
        full.extend_from_slice(args);
        AppConfig::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_jail| {
            let settings = parse(&[]).resolve().map_err(|e| e.to_string())?;
            assert_eq!((settings.width, settings.height), (28, 16));
            assert_eq!((settings.gold, settings.enemies), (6, 3));
            assert_eq!(settings.max_attempts, 50);
            assert_eq!(settings.count, 1);
            assert!(settings.mirror);
            assert!(!settings.require_full_solve);
            assert_eq!(settings.visualization_mode, VisualizationMode::None);
            Ok(())
        });
    }

    #[test]
    fn test_basic_args() {
        let config = parse(&[
            "--width",
            "20",
            "--gold",
            "4",
            "--seed",
            "7",
            "--no-mirror",
            "--output-path",
            "out.txt",
        ]);
        assert_eq!(config.width, Some(20));
        assert_eq!(config.gold, Some(4));
        assert_eq!(config.seed, Some(7));
        assert!(config.no_mirror);
        assert_eq!(config.output_path, Some(PathBuf::from("out.txt")));
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_visualization_mode() {
        let config = parse(&["--visualization-mode", "terminal"]);
        assert_eq!(config.visualization_mode, VisualizationMode::Terminal);
        assert!(
            AppConfig::try_parse_from(["lode-forge", "--visualization-mode", "invalid-mode"])
                .is_err()
        );
    }

    #[test]
    fn test_corpus_conflicts_with_model() {
        let args = ["lode-forge", "--corpus", "a.txt", "--model", "m.ron"];
        assert!(AppConfig::try_parse_from(args).is_err());
    }

    #[test]
    fn test_file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "lode.toml",
                r#"
                    width = 20
                    gold = 8
                    max_attempts = 5
                    require_full_solve = true
                "#,
            )?;
            jail.set_env("LODE_FORGE_GOLD", "9");
            jail.set_env("LODE_FORGE_ENEMIES", "1");

            let settings = parse(&["--config-file", "lode.toml", "--max-attempts", "12"])
                .resolve()
                .map_err(|e| e.to_string())?;
            assert_eq!(settings.width, 20);
            // The environment overrides the file, flags override both.
            assert_eq!(settings.gold, 9);
            assert_eq!(settings.enemies, 1);
            assert_eq!(settings.max_attempts, 12);
            assert!(settings.require_full_solve);
            assert_eq!(settings.height, 16);
            Ok(())
        });
    }

    #[test]
    fn test_missing_config_file() {
        Jail::expect_with(|_jail| {
            let result = parse(&["--config-file", "nope.toml"]).resolve();
            assert!(matches!(result, Err(AppError::Config(_))));
            Ok(())
        });
    }

    #[test]
    fn test_zero_count_rejected() {
        Jail::expect_with(|_jail| {
            assert!(parse(&["--count", "0"]).resolve().is_err());
            Ok(())
        });
    }
}
