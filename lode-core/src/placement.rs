//! Spawn, gold and enemy placement on a repaired structure.

use crate::reachability::{explore, SearchLimits};
use lode_rules::{LevelGrid, Pos, Tile};
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

/// How many of the lowest candidates the spawn is drawn from.
const SPAWN_CANDIDATES: usize = 5;

/// Cells a player could plausibly occupy: Empty, Ladder or Rope cells that sit
/// on a brick, block or ladder, plus every ladder cell.
pub fn valid_positions(structure: &LevelGrid) -> Vec<Pos> {
    structure
        .cells()
        .filter(|(pos, &tile)| {
            let below = structure.tile(pos.x, pos.y + 1);
            matches!(tile, Tile::Empty | Tile::Ladder | Tile::Rope)
                && (matches!(below, Some(Tile::Brick | Tile::Solid | Tile::Ladder))
                    || tile == Tile::Ladder)
        })
        .map(|(pos, _)| pos)
        .collect()
}

/// Picks the spawn cell among `candidates`, biased toward the floor.
///
/// Candidates in the lower half are sorted bottom row first and the spawn is
/// drawn uniformly from the lowest few. Without such a candidate, the first
/// Empty cell of the second-to-last row is used.
pub fn choose_spawn<R: Rng + ?Sized>(
    structure: &LevelGrid,
    candidates: &[Pos],
    rng: &mut R,
) -> Option<Pos> {
    let half = structure.height / 2;
    let mut lower: Vec<Pos> = candidates.iter().copied().filter(|p| p.y >= half).collect();
    lower.sort_by(|a, b| b.y.cmp(&a.y).then(a.x.cmp(&b.x)));
    lower.truncate(SPAWN_CANDIDATES);
    if !lower.is_empty() {
        return Some(lower[rng.gen_range(0..lower.len())]);
    }

    let row = structure.height.checked_sub(2)?;
    (0..structure.width)
        .map(|x| Pos::new(x, row))
        .find(|p| structure.tile_at(*p) == Some(Tile::Empty))
}

/// [`place_entities_with_limits`] with the default search budget.
pub fn place_entities<R: Rng + ?Sized>(
    structure: &LevelGrid,
    gold_count: usize,
    enemy_count: usize,
    rng: &mut R,
) -> LevelGrid {
    place_entities_with_limits(structure, gold_count, enemy_count, rng, &SearchLimits::default())
}

/// Places the spawn, then gold and enemies on cells reachable from it.
///
/// Entities only ever replace Empty cells, so placing them never changes how
/// the level can be traversed and every placed gold piece stays reachable.
/// When fewer reachable cells exist than requested, fewer entities are placed.
pub fn place_entities_with_limits<R: Rng + ?Sized>(
    structure: &LevelGrid,
    gold_count: usize,
    enemy_count: usize,
    rng: &mut R,
    limits: &SearchLimits,
) -> LevelGrid {
    let mut level = structure.clone();
    let candidates: Vec<Pos> = valid_positions(structure)
        .into_iter()
        .filter(|p| structure.tile_at(*p) == Some(Tile::Empty))
        .collect();

    let Some(spawn) = choose_spawn(structure, &candidates, rng) else {
        warn!("No spawn position available; level left without entities");
        return level;
    };
    level.set(spawn, Tile::Spawn);

    let reach = explore(&level, spawn, limits.reachability_iterations);
    let mut open: Vec<Pos> = candidates
        .into_iter()
        .filter(|p| *p != spawn && reach.contains(p))
        .collect();
    open.shuffle(rng);

    let mut remaining = open.into_iter();
    let gold: Vec<Pos> = remaining.by_ref().take(gold_count).collect();
    let enemies: Vec<Pos> = remaining.take(enemy_count).collect();
    for &pos in &gold {
        level.set(pos, Tile::Gold);
    }
    for &pos in &enemies {
        level.set(pos, Tile::Enemy);
    }

    if gold.len() < gold_count || enemies.len() < enemy_count {
        debug!(
            "Placed {}/{} gold and {}/{} enemies: not enough reachable positions",
            gold.len(),
            gold_count,
            enemies.len(),
            enemy_count
        );
    }
    level
}
