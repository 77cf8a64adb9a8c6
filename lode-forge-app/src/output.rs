use anyhow::{Context, Result};
use lode_rules::LevelGrid;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Renders levels in the corpus text format: one symbol per tile, one line
/// per row, a blank line between levels.
///
/// The result can be read back with the text corpus loader.
pub fn format_levels(levels: &[LevelGrid]) -> String {
    levels
        .iter()
        .map(|level| level.to_string())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Saves generated levels to a file in the corpus text format.
pub fn save_levels_to_file(levels: &[LevelGrid], output_path: &Path) -> Result<()> {
    log::info!("Saving {} level(s) to {:?}...", levels.len(), output_path);

    let file = File::create(output_path)
        .with_context(|| format!("Failed to create output file: {:?}", output_path))?;
    let mut writer = io::BufWriter::new(file);
    writeln!(writer, "{}", format_levels(levels))
        .with_context(|| format!("Failed to write levels to {:?}", output_path))?;
    writer
        .flush()
        .context("Failed to flush writer for output file")?;

    log::info!("Successfully saved levels to {:?}", output_path);
    Ok(())
}
