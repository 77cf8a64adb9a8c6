#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Static movement capabilities of a tile kind.
///
/// These flags never change per cell; they are looked up from [`Tile::caps`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCaps {
    /// Blocks horizontal and vertical passage.
    pub solid: bool,
    /// Can be occupied by the player.
    pub passable: bool,
    /// Holds the player in place while occupied (ladders and ropes).
    pub climbable: bool,
    /// Can be dug out into a temporary passage.
    pub diggable: bool,
    /// Offers standing support to the cell above it.
    pub ground: bool,
}

impl TileCaps {
    const fn new(solid: bool, passable: bool, climbable: bool, diggable: bool, ground: bool) -> Self {
        Self {
            solid,
            passable,
            climbable,
            diggable,
            ground,
        }
    }
}

/// A single cell symbol of a level.
///
/// The first five variants are terrain ("structure") tiles, the last three are
/// entities placed on top of a generated structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Tile {
    /// `.` open space.
    #[default]
    Empty,
    /// `b` diggable brick.
    Brick,
    /// `B` indestructible block.
    Solid,
    /// `#` ladder.
    Ladder,
    /// `-` hand-over-hand rope.
    Rope,
    /// `G` gold piece.
    Gold,
    /// `E` enemy spawn.
    Enemy,
    /// `M` player spawn.
    Spawn,
}

impl Tile {
    /// Every tile kind, in declaration order.
    pub const ALL: [Tile; 8] = [
        Tile::Empty,
        Tile::Brick,
        Tile::Solid,
        Tile::Ladder,
        Tile::Rope,
        Tile::Gold,
        Tile::Enemy,
        Tile::Spawn,
    ];

    /// The terrain kinds a structure grid is built from.
    ///
    /// This order is also the iteration order of trained distributions.
    pub const STRUCTURE: [Tile; 5] = [
        Tile::Empty,
        Tile::Brick,
        Tile::Solid,
        Tile::Ladder,
        Tile::Rope,
    ];

    /// Returns the capability flags of this tile kind.
    /// The movement capabilities of this tile kind.
    pub const fn caps(self) -> TileCaps {
        match self {
            Tile::Empty | Tile::Gold | Tile::Enemy | Tile::Spawn => {
                TileCaps::new(false, true, false, false, false)
            }
            Tile::Brick => TileCaps::new(true, false, false, true, true),
            Tile::Solid => TileCaps::new(true, false, false, false, true),
            Tile::Ladder => TileCaps::new(false, true, true, false, true),
            Tile::Rope => TileCaps::new(false, true, true, false, false),
        }
    }

    /// Blocks passage.
    pub const fn is_solid(self) -> bool {
        self.caps().solid
    }

    /// Can be occupied.
    pub const fn is_passable(self) -> bool {
        self.caps().passable
    }

    /// Ladder or rope.
    pub const fn is_climbable(self) -> bool {
        self.caps().climbable
    }

    /// Only bricks can be dug.
    pub const fn is_diggable(self) -> bool {
        self.caps().diggable
    }

    /// Supports whatever stands on top of it. Ropes do not.
    pub const fn is_ground(self) -> bool {
        self.caps().ground
    }

    /// True for Gold, Enemy and Spawn.
    pub const fn is_entity(self) -> bool {
        matches!(self, Tile::Gold | Tile::Enemy | Tile::Spawn)
    }

    /// Maps entities back to the terrain underneath them (always Empty).
    pub const fn to_structure(self) -> Tile {
        if self.is_entity() {
            Tile::Empty
        } else {
            self
        }
    }

    /// Position of this tile within [`Tile::STRUCTURE`], if it is a terrain tile.
    pub fn structure_index(self) -> Option<usize> {
        Self::STRUCTURE.iter().position(|&t| t == self)
    }

    /// The one-character wire symbol for this tile.
    pub const fn symbol(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Brick => 'b',
            Tile::Solid => 'B',
            Tile::Ladder => '#',
            Tile::Rope => '-',
            Tile::Gold => 'G',
            Tile::Enemy => 'E',
            Tile::Spawn => 'M',
        }
    }

    /// Parses a wire symbol. Returns `None` for characters outside the alphabet.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.symbol() == symbol)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A cell coordinate, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pos {
    /// Column, counted from the left edge.
    pub x: usize,
    /// Row, counted from the top edge.
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two cells.
    pub const fn manhattan(self, other: Pos) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
