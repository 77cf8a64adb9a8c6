//! Terrain sampling from a trained [`TransitionTable`].

use lode_rules::{ContextKey, LevelGrid, Pos, Tile, TransitionTable};
use log::trace;
use rand::Rng;

/// Walks `distribution` cumulatively and returns the first tile whose running
/// probability reaches `r`.
///
/// When rounding leaves the total just short of `r`, the last tile is used.
/// An empty distribution yields Empty.
pub fn sample_tile(distribution: &[(Tile, f64)], r: f64) -> Tile {
    let mut cumulative = 0.0;
    for &(tile, probability) in distribution {
        cumulative += probability;
        if cumulative >= r {
            return tile;
        }
    }
    distribution.last().map_or(Tile::Empty, |&(tile, _)| tile)
}

/// Samples a new terrain grid.
///
/// The bottom row is always Solid. The remaining cells are drawn row by row,
/// left to right, each from the distribution of its already-decided context;
/// contexts the table has never seen use the fixed fallback prior.
pub fn generate_structure<R: Rng + ?Sized>(
    table: &TransitionTable,
    width: usize,
    height: usize,
    rng: &mut R,
) -> LevelGrid {
    let mut grid = LevelGrid::new(width, height);
    let Some(floor) = height.checked_sub(1) else {
        return grid;
    };
    for x in 0..width {
        grid.set(Pos::new(x, floor), Tile::Solid);
    }

    let mut unseen = 0usize;
    for y in 0..floor {
        for x in 0..width {
            let key = ContextKey::at(&grid, x, y);
            if table.distribution(&key).is_none() {
                unseen += 1;
            }
            let tile = sample_tile(table.distribution_or_fallback(&key), rng.gen::<f64>());
            grid.set(Pos::new(x, y), tile);
        }
    }
    trace!(
        "Generated {}x{} structure ({} cells from fallback prior)",
        width,
        height,
        unseen
    );
    grid
}
