//! Defines the common trait for corpus format parsers.

use crate::grid::LevelGrid;
use crate::LoadError;

/// A parser that turns the contents of a corpus file into training levels.
///
/// Implementations only deal with the textual format; reading the file and
/// choosing a parser is the job of [`crate::loader`].
pub trait FormatParser {
    /// Human-readable name of the format, used in log messages.
    fn format_name(&self) -> &'static str;

    /// Parses every level contained in `content`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidLevel` when a level is malformed (ragged rows,
    /// unknown symbols) and `LoadError::ParseError` when the container format
    /// itself cannot be read.
    fn parse(&self, content: &str) -> Result<Vec<LevelGrid>, LoadError>;
}
