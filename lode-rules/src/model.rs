//! The trained structure model: context keys and their tile distributions.

use crate::grid::LevelGrid;
use crate::types::Tile;
#[cfg(feature = "serde")]
use crate::LoadError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Version tag written into persisted models.
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// How far a persisted distribution may sum away from 1.
#[cfg(feature = "serde")]
const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Prior used whenever a context was never observed during training.
///
/// Iteration order matters: sampling walks this slice cumulatively.
pub const FALLBACK_DISTRIBUTION: [(Tile, f64); 5] = [
    (Tile::Empty, 0.60),
    (Tile::Brick, 0.20),
    (Tile::Ladder, 0.10),
    (Tile::Solid, 0.05),
    (Tile::Rope, 0.05),
];

/// The already-decided neighbours of a cell: above, left and above-left.
///
/// `None` marks a neighbour outside the grid, which is a distinct context
/// rather than a missing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContextKey {
    /// The tile directly above.
    pub above: Option<Tile>,
    /// The tile directly to the left.
    pub left: Option<Tile>,
    /// The tile diagonally above and to the left.
    pub above_left: Option<Tile>,
}

impl ContextKey {
    pub const fn new(above: Option<Tile>, left: Option<Tile>, above_left: Option<Tile>) -> Self {
        Self {
            above,
            left,
            above_left,
        }
    }

    /// Reads the context of cell `(x, y)` from `grid`.
    pub fn at(grid: &LevelGrid, x: usize, y: usize) -> Self {
        let above = y.checked_sub(1).and_then(|ay| grid.tile(x, ay));
        let left = x.checked_sub(1).and_then(|lx| grid.tile(lx, y));
        let above_left = x
            .checked_sub(1)
            .zip(y.checked_sub(1))
            .and_then(|(lx, ay)| grid.tile(lx, ay));
        Self::new(above, left, above_left)
    }
}

/// A probability distribution over structure tiles, in sampling order.
pub type Distribution = Vec<(Tile, f64)>;

/// Maps each observed [`ContextKey`] to the distribution of the tile that followed it.
///
/// Read-only once trained; share it freely between generation calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionTable {
    entries: HashMap<ContextKey, Distribution>,
}

impl TransitionTable {
    /// An empty table; every lookup falls back to [`FALLBACK_DISTRIBUTION`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from raw per-context counts indexed like [`Tile::STRUCTURE`].
    ///
    /// Contexts whose counts sum to zero are skipped.
    pub fn from_counts(counts: HashMap<ContextKey, [u64; 5]>) -> Self {
        let entries = counts
            .into_iter()
            .filter_map(|(key, row)| {
                let total: u64 = row.iter().sum();
                if total == 0 {
                    return None;
                }
                let distribution = Tile::STRUCTURE
                    .iter()
                    .zip(row)
                    .filter(|(_, count)| *count > 0)
                    .map(|(&tile, count)| (tile, count as f64 / total as f64))
                    .collect();
                Some((key, distribution))
            })
            .collect();
        Self { entries }
    }

    /// The learned distribution for `key`, if that context was observed.
    pub fn distribution(&self, key: &ContextKey) -> Option<&[(Tile, f64)]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// The learned distribution for `key`, or [`FALLBACK_DISTRIBUTION`].
    pub fn distribution_or_fallback(&self, key: &ContextKey) -> &[(Tile, f64)] {
        self.distribution(key).unwrap_or(&FALLBACK_DISTRIBUTION)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all entries, sorted by context key.
    pub fn sorted_entries(&self) -> Vec<(&ContextKey, &Distribution)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by_key(|(key, _)| **key);
        entries
    }
}

// --- Persistence ---

#[cfg(feature = "serde")]
#[derive(Debug, Serialize, Deserialize)]
struct PersistedEntry {
    key: ContextKey,
    distribution: Distribution,
}

/// On-disk form of a table. Map keys are structs, so entries are stored as a
/// list to stay representable in JSON.
#[cfg(feature = "serde")]
#[derive(Debug, Serialize, Deserialize)]
struct PersistedModel {
    version: u32,
    entries: Vec<PersistedEntry>,
}

#[cfg(feature = "serde")]
impl TransitionTable {
    fn to_persisted(&self) -> PersistedModel {
        PersistedModel {
            version: MODEL_FORMAT_VERSION,
            entries: self
                .sorted_entries()
                .into_iter()
                .map(|(key, distribution)| PersistedEntry {
                    key: *key,
                    distribution: distribution.clone(),
                })
                .collect(),
        }
    }

    fn from_persisted(model: PersistedModel) -> Result<Self, LoadError> {
        if model.version != MODEL_FORMAT_VERSION {
            return Err(LoadError::InvalidData(format!(
                "Unsupported model version {} (expected {MODEL_FORMAT_VERSION})",
                model.version
            )));
        }
        let mut entries = HashMap::with_capacity(model.entries.len());
        for entry in model.entries {
            if entry.distribution.is_empty() {
                return Err(LoadError::InvalidData(format!(
                    "Empty distribution for context key {:?}",
                    entry.key
                )));
            }
            for &(tile, probability) in &entry.distribution {
                if tile.structure_index().is_none() {
                    return Err(LoadError::InvalidData(format!(
                        "Entity tile '{tile}' cannot appear in a structure distribution"
                    )));
                }
                if !probability.is_finite() || probability < 0.0 {
                    return Err(LoadError::InvalidData(format!(
                        "Invalid probability {probability} for tile '{tile}'"
                    )));
                }
            }
            let total: f64 = entry.distribution.iter().map(|(_, p)| p).sum();
            if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
                return Err(LoadError::InvalidData(format!(
                    "Distribution for context key {:?} sums to {total}, expected 1",
                    entry.key
                )));
            }
            if entries.insert(entry.key, entry.distribution).is_some() {
                return Err(LoadError::InvalidData(format!(
                    "Duplicate context key: {:?}",
                    entry.key
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Serializes the table as pretty RON.
    pub fn to_ron(&self) -> Result<String, LoadError> {
        ron::ser::to_string_pretty(&self.to_persisted(), ron::ser::PrettyConfig::default())
            .map_err(|e| LoadError::ParseError(format!("RON serialization failed: {e}")))
    }

    /// Restores a table written by [`TransitionTable::to_ron`].
    pub fn from_ron(content: &str) -> Result<Self, LoadError> {
        let model: PersistedModel = ron::from_str(content)
            .map_err(|e| LoadError::ParseError(format!("RON deserialization failed: {e}")))?;
        Self::from_persisted(model)
    }

    /// Serializes the table as pretty JSON.
    pub fn to_json(&self) -> Result<String, LoadError> {
        serde_json::to_string_pretty(&self.to_persisted())
            .map_err(|e| LoadError::ParseError(format!("JSON serialization failed: {e}")))
    }

    /// Restores a table written by [`TransitionTable::to_json`].
    pub fn from_json(content: &str) -> Result<Self, LoadError> {
        let model: PersistedModel = serde_json::from_str(content)
            .map_err(|e| LoadError::ParseError(format!("JSON deserialization failed: {e}")))?;
        Self::from_persisted(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_key_uses_out_of_bounds_sentinel() {
        let grid: LevelGrid = "#b\n-B".parse().unwrap();
        assert_eq!(ContextKey::at(&grid, 0, 0), ContextKey::new(None, None, None));
        assert_eq!(
            ContextKey::at(&grid, 1, 0),
            ContextKey::new(None, Some(Tile::Ladder), None)
        );
        assert_eq!(
            ContextKey::at(&grid, 1, 1),
            ContextKey::new(Some(Tile::Brick), Some(Tile::Rope), Some(Tile::Ladder))
        );
    }

    #[test]
    fn from_counts_normalizes_in_structure_order() {
        let key = ContextKey::new(None, None, None);
        let mut counts = HashMap::new();
        counts.insert(key, [1, 0, 3, 0, 0]);
        counts.insert(ContextKey::new(Some(Tile::Rope), None, None), [0; 5]);
        let table = TransitionTable::from_counts(counts);

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.distribution(&key).unwrap(),
            &[(Tile::Empty, 0.25), (Tile::Solid, 0.75)]
        );
    }

    #[test]
    fn unseen_context_uses_fallback() {
        let table = TransitionTable::new();
        let key = ContextKey::new(Some(Tile::Brick), None, None);
        assert_eq!(table.distribution_or_fallback(&key), &FALLBACK_DISTRIBUTION);
        let total: f64 = FALLBACK_DISTRIBUTION.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn persisted_forms_restore_the_table() {
        let mut counts = HashMap::new();
        counts.insert(ContextKey::new(None, None, None), [2, 1, 0, 1, 0]);
        counts.insert(
            ContextKey::new(Some(Tile::Ladder), Some(Tile::Empty), None),
            [0, 0, 0, 4, 0],
        );
        let table = TransitionTable::from_counts(counts);

        let ron_text = table.to_ron().unwrap();
        assert_eq!(TransitionTable::from_ron(&ron_text).unwrap(), table);
        let json_text = table.to_json().unwrap();
        assert_eq!(TransitionTable::from_json(&json_text).unwrap(), table);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn rejects_empty_or_unnormalized_distributions() {
        let key = r#"{"above": null, "left": null, "above_left": null}"#;
        let empty = format!(r#"{{"version": 1, "entries": [{{"key": {key}, "distribution": []}}]}}"#);
        match TransitionTable::from_json(&empty).unwrap_err() {
            LoadError::InvalidData(msg) => assert!(msg.contains("Empty distribution")),
            other => panic!("Expected InvalidData, got {other:?}"),
        }

        let skewed = format!(
            r#"{{"version": 1, "entries": [{{"key": {key}, "distribution": [["Empty", 0.5], ["Brick", 0.25]]}}]}}"#
        );
        match TransitionTable::from_json(&skewed).unwrap_err() {
            LoadError::InvalidData(msg) => assert!(msg.contains("sums to 0.75")),
            other => panic!("Expected InvalidData, got {other:?}"),
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn rejects_wrong_model_version() {
        let err = TransitionTable::from_json(r#"{"version": 99, "entries": []}"#).unwrap_err();
        match err {
            LoadError::InvalidData(msg) => assert!(msg.contains("Unsupported model version 99")),
            other => panic!("Expected InvalidData, got {other:?}"),
        }
    }
}
