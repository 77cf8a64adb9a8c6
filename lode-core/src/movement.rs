//! The movement model shared by every search in this crate.
//!
//! A search state is a position plus the set of bricks dug along the path
//! that reached it. A dug brick stays open while the digger is within one
//! cell of it and refills once the digger moves further away, so a state
//! never carries more than the holes around its own position.

use bitvec::prelude::*;
use lode_rules::{LevelGrid, Pos, Tile};

/// Bricks dug out along one search path, indexed by `y * width + x`.
///
/// A bitset gives one canonical value per set of dug cells regardless of the
/// order they were dug in.
pub type DugSet = BitVec;

/// An all-clear dug set sized for `grid`.
pub fn empty_dug_set(grid: &LevelGrid) -> DugSet {
    bitvec![0; grid.width * grid.height]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Drop straight down to the landing cell.
    Fall,
    /// Step one cell left.
    Left,
    /// Step one cell right.
    Right,
    /// Climb one row up.
    Up,
    /// Climb or drop one row down.
    Down,
    /// Dig the brick below and to the left.
    DigLeft,
    /// Dig the brick below and to the right.
    DigRight,
}

/// One legal transition out of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub kind: MoveKind,
    pub to: Pos,
    /// The brick opened by this move, for dig moves.
    pub dig: Option<Pos>,
}

impl Move {
    fn step(kind: MoveKind, to: Pos) -> Self {
        Self {
            kind,
            to,
            dig: None,
        }
    }
}

/// A level viewed under one particular dig history.
#[derive(Debug, Clone, Copy)]
pub struct Terrain<'a> {
    grid: &'a LevelGrid,
    dug: &'a BitSlice,
}

impl<'a> Terrain<'a> {
    pub fn new(grid: &'a LevelGrid, dug: &'a BitSlice) -> Self {
        Self { grid, dug }
    }

    pub fn tile(&self, x: usize, y: usize) -> Option<Tile> {
        self.grid.tile(x, y)
    }

    pub fn is_dug(&self, x: usize, y: usize) -> bool {
        self.grid
            .index(x, y)
            .and_then(|i| self.dug.get(i).map(|bit| *bit))
            .unwrap_or(false)
    }

    /// Occupiable: a passable tile or a dug brick. Out of bounds is never passable.
    pub fn is_passable(&self, x: usize, y: usize) -> bool {
        match self.tile(x, y) {
            Some(tile) => tile.is_passable() || self.is_dug(x, y),
            None => false,
        }
    }

    fn is_hold(&self, x: usize, y: usize) -> bool {
        matches!(self.tile(x, y), Some(Tile::Ladder | Tile::Rope))
    }

    /// Whether an entity at `pos` stays put: it holds a ladder or rope, stands
    /// on ground, or is on the bottom edge. Ropes below are not ground, and a
    /// dug brick below is a hole.
    pub fn has_ground_support(&self, pos: Pos) -> bool {
        if self.is_hold(pos.x, pos.y) {
            return true;
        }
        let below = pos.y + 1;
        if below >= self.grid.height {
            return true;
        }
        self.tile(pos.x, below)
            .is_some_and(|t| t.is_ground() && !self.is_dug(pos.x, below))
    }

    /// Where a falling entity starting at `pos` comes to rest: one row above
    /// the first non-passable cell, or on the first ladder or rope it meets.
    pub fn landing(&self, pos: Pos) -> Pos {
        let mut y = pos.y;
        while y + 1 < self.grid.height {
            let next = y + 1;
            if !self.is_passable(pos.x, next) {
                break;
            }
            y = next;
            if self.is_hold(pos.x, y) {
                break;
            }
        }
        Pos::new(pos.x, y)
    }

    /// Every legal move out of `pos`.
    ///
    /// A falling entity may only continue its fall. Otherwise it may walk
    /// sideways, climb, descend onto ladders or into dug holes, and dig the
    /// bricks diagonally below it. Digging keeps the entity where it is and
    /// only records the opened brick.
    pub fn legal_moves(&self, pos: Pos) -> Vec<Move> {
        let here = self.tile(pos.x, pos.y);
        if here.is_none() {
            return Vec::new();
        }

        if !self.has_ground_support(pos) {
            let landing = self.landing(pos);
            return if landing == pos {
                Vec::new()
            } else {
                vec![Move::step(MoveKind::Fall, landing)]
            };
        }

        let mut moves = Vec::with_capacity(6);
        let on_ladder = here == Some(Tile::Ladder);

        if pos.x > 0 && self.is_passable(pos.x - 1, pos.y) {
            moves.push(Move::step(MoveKind::Left, Pos::new(pos.x - 1, pos.y)));
        }
        if self.is_passable(pos.x + 1, pos.y) {
            moves.push(Move::step(MoveKind::Right, Pos::new(pos.x + 1, pos.y)));
        }

        // Climbing needs a ladder here, or one directly overhead to grab.
        if pos.y > 0 && self.is_passable(pos.x, pos.y - 1) {
            let ladder_above = self.tile(pos.x, pos.y - 1) == Some(Tile::Ladder);
            if on_ladder || ladder_above {
                moves.push(Move::step(MoveKind::Up, Pos::new(pos.x, pos.y - 1)));
            }
        }

        let below = pos.y + 1;
        if below < self.grid.height && self.is_passable(pos.x, below) {
            let ladder_below = self.tile(pos.x, below) == Some(Tile::Ladder);
            if ladder_below || self.is_dug(pos.x, below) || on_ladder {
                moves.push(Move::step(MoveKind::Down, Pos::new(pos.x, below)));
            }
        }

        if below < self.grid.height {
            let sides = [
                (pos.x.checked_sub(1), MoveKind::DigLeft),
                (Some(pos.x + 1), MoveKind::DigRight),
            ];
            for (side_x, kind) in sides {
                let Some(tx) = side_x else { continue };
                if self.tile(tx, below) == Some(Tile::Brick) && !self.is_dug(tx, below) {
                    moves.push(Move {
                        kind,
                        to: pos,
                        dig: Some(Pos::new(tx, below)),
                    });
                }
            }
        }

        moves
    }
}

/// Applies a move's dig to `dug`, returning the dug set of the successor state.
pub fn apply_dig(grid: &LevelGrid, dug: &DugSet, mv: &Move) -> DugSet {
    let mut next = dug.clone();
    if let Some(idx) = mv.dig.and_then(|p| grid.index(p.x, p.y)) {
        next.set(idx, true);
    }
    next
}

/// Clears every dug cell more than one row or column away from `pos`.
pub fn refill_distant_holes(grid: &LevelGrid, dug: &mut DugSet, pos: Pos) {
    let width = grid.width.max(1);
    let distant: Vec<usize> = dug
        .iter_ones()
        .filter(|&i| pos.x.abs_diff(i % width) > 1 || pos.y.abs_diff(i / width) > 1)
        .collect();
    for i in distant {
        dug.set(i, false);
    }
}

/// The dug set after taking `mv` from a state holding `dug`: the move's dig is
/// recorded and holes left behind refill.
///
/// Two paths that differ only in holes far behind them map to the same
/// successor, which keeps the number of states per cell small.
pub fn successor_dug(grid: &LevelGrid, dug: &DugSet, mv: &Move) -> DugSet {
    let mut next = apply_dig(grid, dug, mv);
    refill_distant_holes(grid, &mut next, mv.to);
    next
}
