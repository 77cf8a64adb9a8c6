use crate::formats::{FormatParser, RonCorpusParser, TextCorpusParser};
use crate::grid::LevelGrid;
#[cfg(feature = "serde")]
use crate::model::TransitionTable;
use crate::LoadError;
use log::info;
use std::path::Path;

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Picks a corpus parser from the file extension: `.ron` is RON, anything
/// else is treated as plain text.
pub fn parser_for_path(path: &Path) -> Box<dyn FormatParser> {
    if has_extension(path, "ron") {
        Box::new(RonCorpusParser::new())
    } else {
        Box::new(TextCorpusParser::new())
    }
}

/// Loads a training corpus from a file.
///
/// # Arguments
///
/// * `path` - The path to the corpus file (plain text or `.ron`).
///
/// # Returns
///
/// The parsed levels on success, or a `LoadError` when the file cannot be
/// read or any level is malformed.
pub fn load_corpus_from_file(path: &Path) -> Result<Vec<LevelGrid>, LoadError> {
    let parser = parser_for_path(path);
    let content = std::fs::read_to_string(path)?;
    let levels = parser.parse(&content)?;
    info!(
        "Loaded {} levels from {:?} ({})",
        levels.len(),
        path,
        parser.format_name()
    );
    Ok(levels)
}

/// Reads a single level (no blank-line separators) from a file.
pub fn load_level_from_file(path: &Path) -> Result<LevelGrid, LoadError> {
    let content = std::fs::read_to_string(path)?;
    content
        .parse()
        .map_err(|source| LoadError::InvalidLevel { index: 0, source })
}

#[cfg(feature = "serde")]
/// Loads a persisted [`TransitionTable`]. `.json` files are read as JSON,
/// anything else as RON.
pub fn load_model_from_file(path: &Path) -> Result<TransitionTable, LoadError> {
    let content = std::fs::read_to_string(path)?;
    let table = if has_extension(path, "json") {
        TransitionTable::from_json(&content)?
    } else {
        TransitionTable::from_ron(&content)?
    };
    info!("Loaded model with {} contexts from {:?}", table.len(), path);
    Ok(table)
}

#[cfg(feature = "serde")]
/// Writes a [`TransitionTable`] to disk, choosing JSON or RON like
/// [`load_model_from_file`].
pub fn save_model_to_file(table: &TransitionTable, path: &Path) -> Result<(), LoadError> {
    let content = if has_extension(path, "json") {
        table.to_json()?
    } else {
        table.to_ron()?
    };
    std::fs::write(path, content)?;
    info!("Saved model with {} contexts to {:?}", table.len(), path);
    Ok(())
}
