use crate::movement::{empty_dug_set, successor_dug, DugSet, Terrain};
use lode_rules::{LevelGrid, Pos, Tile};
use log::{debug, trace};
#[cfg(feature = "serde")]
use serde::Serialize;
use std::collections::{HashSet, VecDeque};

/// Default cap on states expanded by a reachability search.
pub const DEFAULT_REACHABILITY_ITERATIONS: usize = 50_000;
/// Default cap on states expanded by the full-solvability search.
pub const DEFAULT_SOLVER_ITERATIONS: usize = 100_000;

/// Iteration budgets for the searches. They are a safety valve, not a
/// correctness mechanism: hitting one is reported, never hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SearchLimits {
    pub reachability_iterations: usize,
    pub solver_iterations: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            reachability_iterations: DEFAULT_REACHABILITY_ITERATIONS,
            solver_iterations: DEFAULT_SOLVER_ITERATIONS,
        }
    }
}

/// Outcome of a reachability search.
#[derive(Debug, Clone, Default)]
pub struct Reachability {
    /// Every position reached under some dig history.
    pub positions: HashSet<Pos>,
    /// States expanded.
    pub iterations: usize,
    /// True when the iteration cap stopped the search with states still queued.
    pub exhausted: bool,
}

impl Reachability {
    pub fn contains(&self, pos: &Pos) -> bool {
        self.positions.contains(pos)
    }
}

/// Breadth-first exploration over (position, dug-set) states from `start`.
///
/// The same cell reached with different sets of open holes is explored once
/// per set, since each set unlocks different moves. Holes refill once the
/// explorer moves away from them (see [`successor_dug`]). Returns an empty
/// result when `start` lies outside the grid.
pub fn explore(grid: &LevelGrid, start: Pos, limit: usize) -> Reachability {
    let mut result = Reachability::default();
    if grid.index(start.x, start.y).is_none() {
        return result;
    }

    let mut visited: HashSet<(Pos, DugSet)> = HashSet::new();
    let mut queue: VecDeque<(Pos, DugSet)> = VecDeque::new();
    let initial = (start, empty_dug_set(grid));
    visited.insert(initial.clone());
    queue.push_back(initial);
    result.positions.insert(start);

    while let Some((pos, dug)) = queue.pop_front() {
        if result.iterations >= limit {
            result.exhausted = true;
            break;
        }
        result.iterations += 1;

        let terrain = Terrain::new(grid, &dug);
        for mv in terrain.legal_moves(pos) {
            let state = (mv.to, successor_dug(grid, &dug, &mv));
            if visited.contains(&state) {
                continue;
            }
            result.positions.insert(mv.to);
            visited.insert(state.clone());
            queue.push_back(state);
        }
    }

    trace!(
        "Reachability from {start}: {} positions, {} states, {} iterations{}",
        result.positions.len(),
        visited.len(),
        result.iterations,
        if result.exhausted { " (exhausted)" } else { "" }
    );
    result
}

/// All positions reachable from `(start_x, start_y)` using the default budget.
pub fn get_reachable_positions(grid: &LevelGrid, start_x: usize, start_y: usize) -> HashSet<Pos> {
    explore(
        grid,
        Pos::new(start_x, start_y),
        DEFAULT_REACHABILITY_ITERATIONS,
    )
    .positions
}

/// Result of checking that every gold piece can be reached from the spawn.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ValidationResult {
    pub reachable_gold: Vec<Pos>,
    pub unreachable_gold: Vec<Pos>,
    pub spawn: Option<Pos>,
    /// Human-readable problems found.
    pub issues: Vec<String>,
    /// No unreachable gold and no issues.
    pub valid: bool,
}

/// [`validate_level_with_limits`] with the default budget.
pub fn validate_level(grid: &LevelGrid) -> ValidationResult {
    validate_level_with_limits(grid, &SearchLimits::default())
}

/// Checks that every gold piece is reachable from the spawn point.
///
/// A missing spawn fails immediately without searching, with every gold piece
/// listed as unreachable. A spawn without ground support, or more than one
/// spawn, is recorded as an issue.
pub fn validate_level_with_limits(grid: &LevelGrid, limits: &SearchLimits) -> ValidationResult {
    validate_with_reach(grid, limits).0
}

/// Validation plus the reachable set it was computed from, so callers that
/// need both search only once. The set is `None` when there is no spawn.
pub(crate) fn validate_with_reach(
    grid: &LevelGrid,
    limits: &SearchLimits,
) -> (ValidationResult, Option<Reachability>) {
    let gold = grid.positions_of(Tile::Gold);
    let spawns = grid.positions_of(Tile::Spawn);

    let Some(&spawn) = spawns.first() else {
        let result = ValidationResult {
            reachable_gold: Vec::new(),
            unreachable_gold: gold,
            spawn: None,
            issues: vec!["No spawn point (M) found".to_owned()],
            valid: false,
        };
        return (result, None);
    };

    let mut issues = Vec::new();
    if spawns.len() > 1 {
        issues.push(format!(
            "Found {} spawn points; using the first at {spawn}",
            spawns.len()
        ));
    }

    let dug = empty_dug_set(grid);
    if !Terrain::new(grid, &dug).has_ground_support(spawn) {
        issues.push(format!("Spawn at {spawn} has no ground support"));
    }

    let reach = explore(grid, spawn, limits.reachability_iterations);
    let (reachable_gold, unreachable_gold): (Vec<Pos>, Vec<Pos>) =
        gold.into_iter().partition(|g| reach.contains(g));

    for g in &unreachable_gold {
        issues.push(format!("Gold at {g} is unreachable from spawn"));
    }
    if reach.exhausted && !unreachable_gold.is_empty() {
        issues.push(format!(
            "Reachability search stopped after {} iterations; unreachable gold may be a false negative",
            reach.iterations
        ));
    }

    let valid = unreachable_gold.is_empty() && issues.is_empty();
    debug!(
        "Validated level: {} reachable gold, {} unreachable, {} issues",
        reachable_gold.len(),
        unreachable_gold.len(),
        issues.len()
    );
    let result = ValidationResult {
        reachable_gold,
        unreachable_gold,
        spawn: Some(spawn),
        issues,
        valid,
    };
    (result, Some(reach))
}
