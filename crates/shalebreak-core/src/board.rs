//! Board module: coordinates, cardinal directions, and the tile grid.
//!
//! The board is a square, row-major grid of [`Tile`] values indexed by
//! [`Coordinate`]. Every in-range coordinate maps to exactly one tile; the
//! grid is never partially populated. Out-of-range access is a defensive
//! no-op (`None`), never a panic.
//!
//! # Determinism
//!
//! All scans ([`Board::coords`], [`Board::iter`], [`Board::player`],
//! [`Board::monsters`]) run in row-major order, so any "first match wins"
//! logic built on top of them is deterministic across platforms.
//!
//! # Example
//!
//! ```
//! use shalebreak_core::board::{Board, Coordinate};
//! use shalebreak_core::tile::Tile;
//!
//! let board = Board::from_text(
//!     "d d d
//!      d P d
//!      d M E",
//! ).unwrap();
//!
//! assert_eq!(board.side(), 3);
//! assert_eq!(board.player().unwrap().0, Coordinate::new(1, 1));
//! assert_eq!(board.exit(), Some(Coordinate::new(2, 2)));
//! assert!(matches!(board.get(Coordinate::new(0, 0)), Some(Tile::Rock(_))));
//! ```

use std::collections::{HashSet, VecDeque};
use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tile::Tile;

// =============================================================================
// Coordinate
// =============================================================================

/// An integer (row, column) pair identifying one board cell.
///
/// Immutable value type; equality, hashing and ordering are by component
/// (row first), which matches row-major scan order.
///
/// # Example
///
/// ```
/// use shalebreak_core::board::{Coordinate, Direction};
///
/// let at = Coordinate::new(1, 1);
/// assert_eq!(at.step(Direction::South), Coordinate::new(2, 1));
/// assert!(Coordinate::new(0, 5) < Coordinate::new(1, 0));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    row: i32,
    col: i32,
}

impl Coordinate {
    /// Creates a coordinate from a row and column.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns the row component.
    #[must_use]
    pub const fn row(self) -> i32 {
        self.row
    }

    /// Returns the column component.
    #[must_use]
    pub const fn col(self) -> i32 {
        self.col
    }

    /// Returns the coordinate one step in the given direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dr, dc) = direction.delta();
        Self::new(self.row + dr, self.col + dc)
    }

    /// Returns the four cardinal neighbors, in north/south/east/west order.
    ///
    /// Adjacency is strictly cardinal, never diagonal. Neighbors may be out
    /// of board bounds; callers filter with [`Board::in_bounds`].
    #[must_use]
    pub const fn neighbors(self) -> [Self; 4] {
        [
            self.step(Direction::North),
            self.step(Direction::South),
            self.step(Direction::East),
            self.step(Direction::West),
        ]
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.row, self.col)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

// =============================================================================
// Directions
// =============================================================================

/// One of the four cardinal directions.
///
/// Row 0 is the top of the board; `South` points toward larger rows (the
/// direction of the exit in standard levels).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward row 0.
    North,
    /// Toward the last row.
    South,
    /// Toward the last column.
    East,
    /// Toward column 0.
    West,
}

impl Direction {
    /// All cardinal directions, in scan order.
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Returns the (row, column) delta of one step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (-1, 0),
            Self::South => (1, 0),
            Self::East => (0, 1),
            Self::West => (0, -1),
        }
    }

    /// Returns the single-bit flag for this direction.
    #[must_use]
    pub const fn flag(self) -> Directions {
        match self {
            Self::North => Directions::NORTH,
            Self::South => Directions::SOUTH,
            Self::East => Directions::EAST,
            Self::West => Directions::WEST,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::North => write!(f, "north"),
            Self::South => write!(f, "south"),
            Self::East => write!(f, "east"),
            Self::West => write!(f, "west"),
        }
    }
}

bitflags! {
    /// A set of cardinal directions, used for weapon attack arcs.
    ///
    /// A weapon's direction set is never empty; constructors enforce this.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Directions: u8 {
        /// Toward row 0.
        const NORTH = 1 << 0;
        /// Toward the last row.
        const SOUTH = 1 << 1;
        /// Toward the last column.
        const EAST = 1 << 2;
        /// Toward column 0.
        const WEST = 1 << 3;
    }
}

impl Directions {
    /// Iterates the contained directions in scan order.
    pub fn iter_directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |d| self.contains(d.flag()))
    }
}

// =============================================================================
// Board
// =============================================================================

/// Errors raised while constructing a board.
///
/// These are configuration-time failures; once a board exists, every
/// operation on it is total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The grid was not square.
    #[error("board must be square: {rows} rows but row {row} has {cols} columns")]
    NotSquare {
        /// Total number of rows supplied.
        rows: usize,
        /// Index of the offending row.
        row: usize,
        /// Number of columns in the offending row.
        cols: usize,
    },
    /// No rows were supplied.
    #[error("board must not be empty")]
    Empty,
    /// The requested side length does not fit the coordinate range.
    #[error("board side {0} is out of range")]
    SideOutOfRange(usize),
    /// A fixture string contained an unknown tile glyph.
    #[error("unknown tile glyph '{0}'")]
    UnknownGlyph(char),
}

/// A square, row-major grid of tiles.
///
/// # Invariants
///
/// - `tiles.len() == side * side` — every coordinate in range maps to
///   exactly one tile, and the grid is never partially populated.
/// - `side >= 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    side: i32,
    tiles: Vec<Tile>,
}

impl Board {
    /// Creates a board of the given side length, filled with [`Tile::Empty`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Empty`] for a zero side and
    /// [`BoardError::SideOutOfRange`] for a side that does not fit `i32`.
    pub fn new(side: usize) -> Result<Self, BoardError> {
        if side == 0 {
            return Err(BoardError::Empty);
        }
        let side_i32 = i32::try_from(side).map_err(|_| BoardError::SideOutOfRange(side))?;
        Ok(Self {
            side: side_i32,
            tiles: vec![Tile::Empty; side * side],
        })
    }

    /// Builds a board from rows of tiles.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotSquare`] if any row's length differs from
    /// the row count, and [`BoardError::Empty`] for an empty input.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, BoardError> {
        if rows.is_empty() {
            return Err(BoardError::Empty);
        }
        let expected = rows.len();
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != expected {
                return Err(BoardError::NotSquare {
                    rows: expected,
                    row,
                    cols: cells.len(),
                });
            }
        }
        let side = i32::try_from(expected).map_err(|_| BoardError::SideOutOfRange(expected))?;
        Ok(Self {
            side,
            tiles: rows.into_iter().flatten().collect(),
        })
    }

    /// Parses a board from an ASCII fixture string.
    ///
    /// One line per row; whitespace between glyphs is ignored, as are blank
    /// lines. Glyphs are those of [`Tile::from_glyph`]: `.` empty, `d`/`s`/
    /// `y`/`o` rock kinds, `P` player, `M` monster, `g` gem, `$` coin, `E`
    /// exit.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownGlyph`] for an unrecognized character,
    /// or a shape error if the rows do not form a square.
    pub fn from_text(text: &str) -> Result<Self, BoardError> {
        let mut rows = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut cells = Vec::new();
            for glyph in line.chars().filter(|c| !c.is_whitespace()) {
                let tile = Tile::from_glyph(glyph).ok_or(BoardError::UnknownGlyph(glyph))?;
                cells.push(tile);
            }
            rows.push(cells);
        }
        Self::from_rows(rows)
    }

    /// Returns the side length of the square grid.
    #[must_use]
    pub const fn side(&self) -> i32 {
        self.side
    }

    /// Returns `true` if the coordinate lies within the grid.
    #[must_use]
    pub const fn in_bounds(&self, at: Coordinate) -> bool {
        at.row() >= 0 && at.col() >= 0 && at.row() < self.side && at.col() < self.side
    }

    fn index(&self, at: Coordinate) -> Option<usize> {
        if !self.in_bounds(at) {
            return None;
        }
        usize::try_from(at.row() * self.side + at.col()).ok()
    }

    /// Returns the tile at a coordinate, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, at: Coordinate) -> Option<&Tile> {
        self.index(at).map(|i| &self.tiles[i])
    }

    /// Returns a mutable reference to the tile at a coordinate.
    #[must_use]
    pub fn get_mut(&mut self, at: Coordinate) -> Option<&mut Tile> {
        self.index(at).map(move |i| &mut self.tiles[i])
    }

    /// Replaces the tile at a coordinate.
    ///
    /// Returns `false` (and changes nothing) when the coordinate is out of
    /// bounds.
    pub fn set(&mut self, at: Coordinate, tile: Tile) -> bool {
        match self.index(at) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Iterates all coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coordinate> {
        let side = self.side;
        (0..side).flat_map(move |row| (0..side).map(move |col| Coordinate::new(row, col)))
    }

    /// Iterates all (coordinate, tile) pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, &Tile)> {
        self.coords().zip(self.tiles.iter())
    }

    /// Returns the player's coordinate and combat data.
    ///
    /// Boards hold at most one player; if several exist, the first in
    /// row-major order wins.
    #[must_use]
    pub fn player(&self) -> Option<(Coordinate, &crate::tile::Combatant)> {
        self.iter()
            .find_map(|(at, tile)| tile.as_player().map(|p| (at, p)))
    }

    /// Returns the exit's coordinate, if the board has one.
    #[must_use]
    pub fn exit(&self) -> Option<Coordinate> {
        self.iter()
            .find_map(|(at, tile)| tile.is_exit().then_some(at))
    }

    /// Iterates all monsters in row-major order.
    pub fn monsters(&self) -> impl Iterator<Item = (Coordinate, &crate::tile::Combatant)> {
        self.iter()
            .filter_map(|(at, tile)| tile.as_monster().map(|m| (at, m)))
    }

    /// Returns the size of the 4-connected cluster of same-kind rock at the
    /// given coordinate, or 0 if the tile there is not rock.
    ///
    /// Flood fill is strictly cardinal and clipped to grid bounds.
    #[must_use]
    pub fn cluster_size(&self, at: Coordinate) -> usize {
        let Some(kind) = self.get(at).and_then(Tile::rock_kind) else {
            return 0;
        };
        let mut seen = HashSet::new();
        let mut frontier = VecDeque::new();
        seen.insert(at);
        frontier.push_back(at);
        while let Some(current) = frontier.pop_front() {
            for neighbor in current.neighbors() {
                if seen.contains(&neighbor) {
                    continue;
                }
                if self.get(neighbor).and_then(Tile::rock_kind) == Some(kind) {
                    seen.insert(neighbor);
                    frontier.push_back(neighbor);
                }
            }
        }
        seen.len()
    }

    /// Turn-boundary bookkeeping: resets every combatant's per-turn attack
    /// counter and accumulates one step of weapon charge.
    pub fn begin_turn(&mut self) {
        for tile in &mut self.tiles {
            if let Some(combatant) = tile.as_combatant_mut() {
                combatant.attacks_made = 0;
                combatant.weapon.tick_charge();
            }
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.side {
            for col in 0..self.side {
                let glyph = self
                    .get(Coordinate::new(row, col))
                    .map_or('?', Tile::glyph);
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
