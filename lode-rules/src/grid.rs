use crate::types::{Pos, Tile};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Canonical level width in tiles.
pub const LEVEL_WIDTH: usize = 28;
/// Canonical level height in tiles.
pub const LEVEL_HEIGHT: usize = 16;

/// Errors raised while parsing a level from its text form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridParseError {
    /// The input contained no rows.
    #[error("Level text is empty")]
    Empty,
    /// A character outside the tile alphabet was found.
    #[error("Unknown tile symbol '{symbol}' at line {line}, column {column}")]
    UnknownSymbol {
        symbol: char,
        line: usize,
        column: usize,
    },
    /// A row's length differs from the first row.
    #[error("Row at line {line} has {found} tiles, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// A rectangular row-major 2D grid, origin top-left.
///
/// `data` always holds exactly `width * height` cells; deserialization
/// rejects input that does not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGrid<T>"))]
pub struct Grid<T> {
    pub width: usize,
    pub height: usize,
    pub(crate) data: Vec<T>,
}

/// Unchecked serialized form of a [`Grid`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawGrid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

#[cfg(feature = "serde")]
impl<T> TryFrom<RawGrid<T>> for Grid<T> {
    type Error = String;

    fn try_from(raw: RawGrid<T>) -> Result<Self, Self::Error> {
        let expected = raw.width.checked_mul(raw.height);
        if expected != Some(raw.data.len()) {
            return Err(format!(
                "grid of {}x{} cannot hold {} cells",
                raw.width,
                raw.height,
                raw.data.len()
            ));
        }
        Ok(Self {
            width: raw.width,
            height: raw.height,
            data: raw.data,
        })
    }
}

impl<T: Clone + Default> Grid<T> {
    /// Creates a new grid with the given dimensions, initialized with default values.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, T::default())
    }
}

impl<T: Clone> Grid<T> {
    /// Creates a grid where every cell holds `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Returns an immutable reference to the element at the given coordinates,
    /// or None if the coordinates are out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.index(x, y).and_then(|idx| self.data.get(idx))
    }

    /// Returns a mutable reference to the element at the given coordinates,
    /// or None if the coordinates are out of bounds.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        self.index(x, y).and_then(move |idx| self.data.get_mut(idx))
    }

    /// Calculates the 1D index for the given coordinates.
    /// Returns None if the coordinates are out of bounds.
    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Number of cells, `width * height`.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterates over every cell with its position, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (Pos, &T)> + '_ {
        let width = self.width.max(1);
        self.data
            .iter()
            .enumerate()
            .map(move |(i, value)| (Pos::new(i % width, i / width), value))
    }

    /// The cells of row `y`, or an empty slice when out of bounds.
    pub fn row(&self, y: usize) -> &[T] {
        if y < self.height {
            &self.data[y * self.width..(y + 1) * self.width]
        } else {
            &[]
        }
    }
}

/// A level: a grid of tile symbols.
pub type LevelGrid = Grid<Tile>;

impl Grid<Tile> {
    /// Builds a level from rows of tiles, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, GridParseError> {
        let width = rows.first().map(Vec::len).ok_or(GridParseError::Empty)?;
        if width == 0 {
            return Err(GridParseError::Empty);
        }
        let height = rows.len();
        let mut data = Vec::with_capacity(width * height);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(GridParseError::RaggedRow {
                    line: i + 1,
                    expected: width,
                    found: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// The tile at `(x, y)`, or `None` outside the grid.
    pub fn tile(&self, x: usize, y: usize) -> Option<Tile> {
        self.get(x, y).copied()
    }

    /// The tile at `pos`, or `None` outside the grid.
    pub fn tile_at(&self, pos: Pos) -> Option<Tile> {
        self.tile(pos.x, pos.y)
    }

    /// Overwrites the tile at `pos`. Returns false if `pos` is out of bounds.
    pub fn set(&mut self, pos: Pos, tile: Tile) -> bool {
        match self.get_mut(pos.x, pos.y) {
            Some(cell) => {
                *cell = tile;
                true
            }
            None => false,
        }
    }

    /// All positions holding `tile`, in row-major order.
    pub fn positions_of(&self, tile: Tile) -> Vec<Pos> {
        self.cells()
            .filter(|(_, &t)| t == tile)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// The first position holding `tile`, in row-major order.
    pub fn find_first(&self, tile: Tile) -> Option<Pos> {
        self.cells().find(|(_, &t)| t == tile).map(|(pos, _)| pos)
    }

    /// How many cells hold `tile`.
    pub fn count(&self, tile: Tile) -> usize {
        self.data.iter().filter(|&&t| t == tile).count()
    }

    /// Copy of the level with every entity replaced by the terrain underneath.
    pub fn strip_entities(&self) -> LevelGrid {
        Self {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|t| t.to_structure()).collect(),
        }
    }

    /// Copy of the level mirrored left-to-right.
    pub fn mirrored(&self) -> LevelGrid {
        let mut data = Vec::with_capacity(self.data.len());
        for y in 0..self.height {
            data.extend(self.row(y).iter().rev().copied());
        }
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

impl FromStr for Grid<Tile> {
    type Err = GridParseError;

    /// Parses rows of tile symbols. Surrounding blank lines and trailing
    /// whitespace on each row are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();
        for (line_idx, line) in s.trim_matches(|c| c == '\n' || c == '\r').lines().enumerate() {
            let mut row = Vec::with_capacity(line.len());
            for (col_idx, symbol) in line.trim_end().chars().enumerate() {
                let tile = Tile::from_symbol(symbol).ok_or(GridParseError::UnknownSymbol {
                    symbol,
                    line: line_idx + 1,
                    column: col_idx + 1,
                })?;
                row.push(tile);
            }
            rows.push(row);
        }
        Self::from_rows(rows)
    }
}

impl fmt::Display for Grid<Tile> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            if y > 0 {
                writeln!(f)?;
            }
            for tile in self.row(y) {
                write!(f, "{}", tile.symbol())?;
            }
        }
        Ok(())
    }
}
