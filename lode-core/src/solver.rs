//! Full solvability: can every gold piece be collected and the top row reached?

use crate::movement::{empty_dug_set, successor_dug, DugSet, Terrain};
use crate::reachability::{
    validate_level_with_limits, validate_with_reach, SearchLimits, ValidationResult,
};
use lode_rules::{LevelGrid, Pos, Tile};
use log::debug;
#[cfg(feature = "serde")]
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Largest gold count searched with a collected-gold bitmask. Levels with
/// more gold are judged by reachability validation alone.
pub const MAX_FULL_SOLVE_GOLD: usize = 16;

/// How a [`SolveResult`] was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum SolveMethod {
    /// Rejected before any search (missing spawn, gold or escape, or failed validation).
    Precondition,
    /// Decided by the collect-and-escape state search.
    Search,
    /// Too much gold for the bitmask search; decided by reachability validation.
    ReachabilityFallback,
}

/// Verdict of [`can_solve_level`]. Failures carry a reason instead of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SolveResult {
    pub solvable: bool,
    pub reason: Option<String>,
    pub method: SolveMethod,
    /// States expanded by the search (0 when no search ran).
    pub iterations: usize,
}

impl SolveResult {
    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            solvable: false,
            reason: Some(reason.into()),
            method: SolveMethod::Precondition,
            iterations: 0,
        }
    }
}

/// A [`ValidationResult`] extended with escape information.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ExtendedValidation {
    pub validation: ValidationResult,
    /// Some escape position is reachable from the spawn.
    pub can_escape: bool,
    pub escape_positions: Vec<Pos>,
}

/// Top-row cells that count as exits.
///
/// A top-row ladder, or a top-row empty cell with a ladder below it. When the
/// level has neither, any top-row empty, rope or ladder cell is accepted.
pub fn escape_positions(grid: &LevelGrid) -> Vec<Pos> {
    if grid.height == 0 {
        return Vec::new();
    }
    let ladder_exits: Vec<Pos> = (0..grid.width)
        .filter(|&x| match grid.tile(x, 0) {
            Some(Tile::Ladder) => true,
            Some(Tile::Empty) => grid.tile(x, 1) == Some(Tile::Ladder),
            _ => false,
        })
        .map(|x| Pos::new(x, 0))
        .collect();
    if !ladder_exits.is_empty() {
        return ladder_exits;
    }
    (0..grid.width)
        .filter(|&x| {
            matches!(
                grid.tile(x, 0),
                Some(Tile::Empty | Tile::Rope | Tile::Ladder)
            )
        })
        .map(|x| Pos::new(x, 0))
        .collect()
}

/// Basic validation plus whether any escape position is reachable from the spawn.
pub fn validate_level_extended(grid: &LevelGrid, limits: &SearchLimits) -> ExtendedValidation {
    let (validation, reach) = validate_with_reach(grid, limits);
    let escapes = escape_positions(grid);
    let can_escape = reach.is_some_and(|reach| escapes.iter().any(|e| reach.contains(e)));
    ExtendedValidation {
        validation,
        can_escape,
        escape_positions: escapes,
    }
}

/// [`can_solve_level_with_limits`] with the default budgets.
pub fn can_solve_level(grid: &LevelGrid) -> SolveResult {
    can_solve_level_with_limits(grid, &SearchLimits::default())
}

pub fn is_fully_solvable(grid: &LevelGrid) -> bool {
    can_solve_level(grid).solvable
}

/// Decides whether all gold can be collected and an escape position reached
/// afterwards, starting from the spawn.
///
/// Runs basic validation first, then [`can_solve_validated`].
pub fn can_solve_level_with_limits(grid: &LevelGrid, limits: &SearchLimits) -> SolveResult {
    let validation = validate_level_with_limits(grid, limits);
    can_solve_validated(grid, &validation, limits)
}

/// Full solvability for a level whose basic validation is already known.
///
/// `validation` must be the result of validating `grid` with `limits`; it
/// replaces a second reachability search. The search runs over (position,
/// open holes, collected gold) states and is ordered by an admissible
/// distance heuristic. Levels with more than [`MAX_FULL_SOLVE_GOLD`] gold
/// pieces are decided by the validation alone. A level that fails basic
/// validation is never reported solvable.
pub fn can_solve_validated(
    grid: &LevelGrid,
    validation: &ValidationResult,
    limits: &SearchLimits,
) -> SolveResult {
    let Some(spawn) = validation.spawn else {
        return SolveResult::rejected("No spawn point (M) found");
    };
    let gold = grid.positions_of(Tile::Gold);
    if gold.is_empty() {
        return SolveResult::rejected("Level has no gold to collect");
    }

    if gold.len() > MAX_FULL_SOLVE_GOLD {
        let reason = format!(
            "{} gold pieces exceed the full-solve limit of {MAX_FULL_SOLVE_GOLD}; decided by reachability validation{}",
            gold.len(),
            if validation.valid {
                String::new()
            } else {
                format!(": {}", validation.issues.join("; "))
            }
        );
        return SolveResult {
            solvable: validation.valid,
            reason: Some(reason),
            method: SolveMethod::ReachabilityFallback,
            iterations: 0,
        };
    }

    let escapes = escape_positions(grid);
    if escapes.is_empty() {
        return SolveResult::rejected("No escape positions on the top row");
    }

    if !validation.valid {
        return SolveResult::rejected(format!(
            "Reachability validation failed: {}",
            validation.issues.join("; ")
        ));
    }

    let result = search(grid, spawn, &gold, &escapes, limits.solver_iterations);
    debug!(
        "Full solve from {spawn}: solvable={} after {} iterations",
        result.solvable, result.iterations
    );
    result
}

#[derive(Debug, Clone)]
struct SearchState {
    pos: Pos,
    dug: DugSet,
    collected: u32,
}

/// Precomputed distance data for the heuristic.
struct Heuristic<'a> {
    gold: &'a [Pos],
    escapes: &'a [Pos],
    /// For each gold piece, its distance to the nearest escape.
    gold_to_escape: Vec<usize>,
}

impl<'a> Heuristic<'a> {
    fn new(gold: &'a [Pos], escapes: &'a [Pos]) -> Self {
        let gold_to_escape = gold
            .iter()
            .map(|g| nearest(*g, escapes))
            .collect();
        Self {
            gold,
            escapes,
            gold_to_escape,
        }
    }

    /// Distance to the nearest remaining gold plus the shortest remaining
    /// gold-to-exit distance, or the distance to the nearest exit once all
    /// gold is collected.
    fn estimate(&self, pos: Pos, collected: u32) -> usize {
        let mut to_gold = usize::MAX;
        let mut gold_exit = usize::MAX;
        for (i, g) in self.gold.iter().enumerate() {
            if collected & (1 << i) == 0 {
                to_gold = to_gold.min(pos.manhattan(*g));
                gold_exit = gold_exit.min(self.gold_to_escape[i]);
            }
        }
        if to_gold == usize::MAX {
            nearest(pos, self.escapes)
        } else {
            to_gold.saturating_add(gold_exit)
        }
    }
}

fn nearest(from: Pos, targets: &[Pos]) -> usize {
    targets
        .iter()
        .map(|t| from.manhattan(*t))
        .min()
        .unwrap_or(usize::MAX)
}

fn search(
    grid: &LevelGrid,
    spawn: Pos,
    gold: &[Pos],
    escapes: &[Pos],
    limit: usize,
) -> SolveResult {
    let all_collected: u32 = (1u32 << gold.len()) - 1;
    let gold_bits: HashMap<Pos, u32> = gold
        .iter()
        .enumerate()
        .map(|(i, g)| (*g, 1u32 << i))
        .collect();
    let escape_set: HashSet<Pos> = escapes.iter().copied().collect();
    let heuristic = Heuristic::new(gold, escapes);

    let bit_at = |pos: Pos| gold_bits.get(&pos).copied().unwrap_or(0);

    let start = SearchState {
        pos: spawn,
        dug: empty_dug_set(grid),
        collected: bit_at(spawn),
    };

    // Heap entries are (f, g, node index); nodes own the states.
    let mut nodes: Vec<SearchState> = Vec::new();
    let mut open: BinaryHeap<Reverse<(usize, usize, usize)>> = BinaryHeap::new();
    // Gold masks already queued per (position, holes). A state is skipped when
    // an earlier one at the same place already held every piece it holds.
    let mut seen: HashMap<(Pos, DugSet), Vec<u32>> = HashMap::new();

    seen.insert((start.pos, start.dug.clone()), vec![start.collected]);
    open.push(Reverse((
        heuristic.estimate(start.pos, start.collected),
        0,
        nodes.len(),
    )));
    nodes.push(start);

    let mut iterations = 0;
    while let Some(Reverse((_, cost, index))) = open.pop() {
        if iterations >= limit {
            return SolveResult {
                solvable: false,
                reason: Some(format!(
                    "Search exhausted its budget of {limit} iterations before finding a solution"
                )),
                method: SolveMethod::Search,
                iterations,
            };
        }
        iterations += 1;

        let state = nodes[index].clone();
        if state.collected == all_collected && escape_set.contains(&state.pos) {
            return SolveResult {
                solvable: true,
                reason: None,
                method: SolveMethod::Search,
                iterations,
            };
        }

        let terrain = Terrain::new(grid, &state.dug);
        for mv in terrain.legal_moves(state.pos) {
            let next = SearchState {
                pos: mv.to,
                dug: successor_dug(grid, &state.dug, &mv),
                collected: state.collected | bit_at(mv.to),
            };
            let masks = seen.entry((next.pos, next.dug.clone())).or_default();
            if masks.iter().any(|&m| m & next.collected == next.collected) {
                continue;
            }
            masks.retain(|&m| m & next.collected != m);
            masks.push(next.collected);
            let g = cost + 1;
            open.push(Reverse((
                g.saturating_add(heuristic.estimate(next.pos, next.collected)),
                g,
                nodes.len(),
            )));
            nodes.push(next);
        }
    }

    SolveResult {
        solvable: false,
        reason: Some("No sequence of moves collects all gold and then reaches an escape".to_owned()),
        method: SolveMethod::Search,
        iterations,
    }
}
