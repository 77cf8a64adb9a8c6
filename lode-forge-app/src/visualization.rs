use crate::config::VisualizationMode;
use colored::{ColoredString, Colorize};
use lode_core::GenerationOutcome;
use lode_rules::{LevelGrid, Tile};

/// Trait for types that can present a generated level to the user.
pub trait Visualizer {
    /// Displays one generation outcome.
    fn display_outcome(&mut self, index: usize, outcome: &GenerationOutcome)
        -> Result<(), anyhow::Error>;
}

/// Creates the visualizer for `mode`, or `None` when visualization is off.
pub fn create_visualizer(mode: VisualizationMode) -> Option<Box<dyn Visualizer>> {
    match mode {
        VisualizationMode::None => None,
        VisualizationMode::Terminal => Some(Box::new(TerminalVisualizer::new())),
    }
}

fn paint(tile: Tile) -> ColoredString {
    let symbol = tile.symbol().to_string();
    match tile {
        Tile::Empty => symbol.dimmed(),
        Tile::Brick => symbol.red(),
        Tile::Solid => symbol.bright_black().bold(),
        Tile::Ladder => symbol.yellow(),
        Tile::Rope => symbol.cyan(),
        Tile::Gold => symbol.bright_yellow().bold(),
        Tile::Enemy => symbol.magenta().bold(),
        Tile::Spawn => symbol.green().bold(),
    }
}

/// Renders `level` with one colored symbol per tile.
pub fn render_level(level: &LevelGrid) -> String {
    let mut out = String::with_capacity(level.len() * 4);
    for y in 0..level.height {
        if y > 0 {
            out.push('\n');
        }
        for &tile in level.row(y) {
            out.push_str(&paint(tile).to_string());
        }
    }
    out
}

/// Prints each level in color followed by a one-line verdict.
#[derive(Debug, Default)]
pub struct TerminalVisualizer;

impl TerminalVisualizer {
    pub fn new() -> Self {
        Self
    }
}

impl Visualizer for TerminalVisualizer {
    fn display_outcome(
        &mut self,
        index: usize,
        outcome: &GenerationOutcome,
    ) -> Result<(), anyhow::Error> {
        println!("--- Level {} ---", index + 1);
        println!("{}", render_level(&outcome.level));
        let verdict = if outcome.validation.valid {
            "valid".green()
        } else {
            "INVALID".red().bold()
        };
        println!(
            "{verdict} | gold {}/{} reachable | fully solvable: {} | attempts: {} | score: {}",
            outcome.validation.reachable_gold.len(),
            outcome.validation.reachable_gold.len() + outcome.validation.unreachable_gold.len(),
            outcome.fully_solvable,
            outcome.attempts,
            outcome.score
        );
        for issue in &outcome.validation.issues {
            println!("  {} {}", "!".yellow(), issue);
        }
        Ok(())
    }
}
