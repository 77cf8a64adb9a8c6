use crate::grid::LevelGrid;
use crate::model::{ContextKey, TransitionTable};
use log::debug;
use std::collections::HashMap;

/// Options controlling how a corpus is turned into a [`TransitionTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingOptions {
    /// Also count a left-right mirrored copy of every level.
    pub mirror: bool,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self { mirror: true }
    }
}

/// Learns context → tile frequencies from a corpus of levels.
///
/// Entities are stripped before counting, so the table only ever describes
/// terrain. Every cell of every level contributes one observation keyed by its
/// [`ContextKey`]. An empty corpus yields an empty table, which makes
/// generation fall back to the fixed prior everywhere.
pub fn train(corpus: &[LevelGrid], options: &TrainingOptions) -> TransitionTable {
    let mut counts: HashMap<ContextKey, [u64; 5]> = HashMap::new();
    let mut observed = 0usize;

    for level in corpus {
        let structure = level.strip_entities();
        observed += count_level(&structure, &mut counts);
        if options.mirror {
            observed += count_level(&structure.mirrored(), &mut counts);
        }
    }

    let table = TransitionTable::from_counts(counts);
    debug!(
        "Trained transition table from {} levels (mirror={}): {} observations, {} contexts",
        corpus.len(),
        options.mirror,
        observed,
        table.len()
    );
    table
}

fn count_level(structure: &LevelGrid, counts: &mut HashMap<ContextKey, [u64; 5]>) -> usize {
    let mut observed = 0;
    for y in 0..structure.height {
        for x in 0..structure.width {
            let Some(index) = structure.tile(x, y).and_then(|t| t.structure_index()) else {
                continue;
            };
            let key = ContextKey::at(structure, x, y);
            counts.entry(key).or_insert([0; 5])[index] += 1;
            observed += 1;
        }
    }
    observed
}
