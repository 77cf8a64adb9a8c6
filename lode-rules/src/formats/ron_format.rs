use crate::formats::FormatParser;
use crate::grid::LevelGrid;
use crate::LoadError;
#[cfg(feature = "serde")]
use serde::Deserialize;

/// A parser for corpora stored in RON (Rusty Object Notation).
///
/// ```ron
/// (
///     levels: [
///         ["..M", "BBB"],
///     ],
/// )
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct RonCorpusParser;

impl RonCorpusParser {
    /// Creates a new RON corpus parser
    pub fn new() -> Self {
        Self
    }
}

/// Top-level structure of a RON corpus file. Each level is a list of rows.
#[cfg(feature = "serde")]
#[derive(Debug, Deserialize)]
struct RonCorpusFile {
    levels: Vec<Vec<String>>,
}

impl FormatParser for RonCorpusParser {
    fn format_name(&self) -> &'static str {
        "Rusty Object Notation (RON)"
    }

    #[cfg(feature = "serde")]
    fn parse(&self, content: &str) -> Result<Vec<LevelGrid>, LoadError> {
        let file: RonCorpusFile = ron::from_str(content)
            .map_err(|e| LoadError::ParseError(format!("RON deserialization failed: {e}")))?;
        if file.levels.is_empty() {
            return Err(LoadError::InvalidData(
                "Corpus contains no levels.".to_owned(),
            ));
        }
        file.levels
            .iter()
            .enumerate()
            .map(|(index, rows)| {
                rows.join("\n")
                    .parse::<LevelGrid>()
                    .map_err(|source| LoadError::InvalidLevel { index, source })
            })
            .collect()
    }

    /// Stub implementation when the `serde` feature is not enabled.
    #[cfg(not(feature = "serde"))]
    fn parse(&self, _content: &str) -> Result<Vec<LevelGrid>, LoadError> {
        Err(LoadError::FeatureNotEnabled(
            "serde (required for RON parsing)".to_string(),
        ))
    }
}
