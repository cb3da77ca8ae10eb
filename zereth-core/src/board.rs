//! Board model: coordinates, squares, adjacency, freezing and trap support.
//!
//! # Board Layout
//!
//! ```text
//! Squares are addressed (x, y) with both in 1..=8.
//! Storage index = (x - 1) * 8 + (y - 1)
//!
//!   x=8  s s s s s s s s   <- Silver home rows (7, 8), Gold goal row
//!   x=7  s s s s s s s s
//!   x=6  . . X . . X . .   <- traps at (6,3) and (6,6)
//!   x=5  . . . . . . . .
//!   x=4  . . . . . . . .
//!   x=3  . . X . . X . .   <- traps at (3,3) and (3,6)
//!   x=2  g g g g g g g g
//!   x=1  g g g g g g g g   <- Gold home rows (1, 2), Silver goal row
//!        y=1           y=8
//! ```
//!
//! A `Board` is a plain value: every update returns a new board and leaves
//! the original untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, RuleError};
use crate::piece::{Color, Piece, PieceKind};

/// Board side length.
pub const BOARD_SIZE: u8 = 8;

/// Number of squares on the board.
pub const SQUARE_COUNT: usize = 64;

/// The four trap squares.
pub const TRAP_SQUARES: [Coord; 4] = [
    Coord { x: 3, y: 3 },
    Coord { x: 3, y: 6 },
    Coord { x: 6, y: 3 },
    Coord { x: 6, y: 6 },
];

/// A square address. Always within the 8x8 grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct Coord {
    x: u8,
    y: u8,
}

impl Coord {
    /// Create a coordinate, or `None` if either axis is outside 1..=8.
    #[inline]
    pub const fn new(x: u8, y: u8) -> Option<Coord> {
        if x >= 1 && x <= BOARD_SIZE && y >= 1 && y <= BOARD_SIZE {
            Some(Coord { x, y })
        } else {
            None
        }
    }

    #[inline]
    pub const fn x(self) -> u8 {
        self.x
    }

    #[inline]
    pub const fn y(self) -> u8 {
        self.y
    }

    /// Storage index (0-63).
    #[inline]
    pub const fn index(self) -> usize {
        (self.x as usize - 1) * BOARD_SIZE as usize + (self.y as usize - 1)
    }

    /// Inverse of `index`.
    #[inline]
    pub fn from_index(idx: usize) -> Coord {
        debug_assert!(idx < SQUARE_COUNT);
        Coord {
            x: (idx / BOARD_SIZE as usize) as u8 + 1,
            y: (idx % BOARD_SIZE as usize) as u8 + 1,
        }
    }

    /// Iterate over all 64 coordinates in storage order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..SQUARE_COUNT).map(Coord::from_index)
    }

    /// Shift by a signed delta, `None` if the result leaves the grid.
    #[inline]
    pub fn offset(self, dx: i8, dy: i8) -> Option<Coord> {
        let x = self.x as i8 + dx;
        let y = self.y as i8 + dy;
        if x < 1 || y < 1 {
            return None;
        }
        Coord::new(x as u8, y as u8)
    }

    /// Orthogonal neighbours that lie on the board (2 to 4 of them).
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .into_iter()
            .filter_map(move |(dx, dy)| self.offset(dx, dy))
    }

    /// Check if `other` is exactly one orthogonal step away.
    #[inline]
    pub fn is_adjacent(self, other: Coord) -> bool {
        self.manhattan(other) == 1
    }

    /// Taxicab distance.
    #[inline]
    pub fn manhattan(self, other: Coord) -> u8 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    #[inline]
    pub fn is_trap(self) -> bool {
        TRAP_SQUARES.contains(&self)
    }
}

impl TryFrom<(u8, u8)> for Coord {
    type Error = String;

    fn try_from((x, y): (u8, u8)) -> Result<Self, Self::Error> {
        Coord::new(x, y).ok_or_else(|| format!("coordinate ({}, {}) is off the board", x, y))
    }
}

impl From<Coord> for (u8, u8) {
    fn from(coord: Coord) -> Self {
        (coord.x, coord.y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// One square of the board and its occupant, if any.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Square {
    pub coord: Coord,
    pub occupant: Option<Piece>,
}

impl Square {
    #[inline]
    pub fn new(coord: Coord, occupant: Option<Piece>) -> Square {
        Square { coord, occupant }
    }

    #[inline]
    pub fn empty(coord: Coord) -> Square {
        Square { coord, occupant: None }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }
}

/// The 64 squares, indexed by `Coord::index`.
///
/// Serializes as the ordered list of squares.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Square>", into = "Vec<Square>")]
pub struct Board {
    cells: [Option<Piece>; SQUARE_COUNT],
}

impl Board {
    /// An empty board.
    #[inline]
    pub fn empty() -> Board {
        Board { cells: [None; SQUARE_COUNT] }
    }

    /// The fully placed default setup.
    ///
    /// ```text
    ///   x=8  h d c e m c d h
    ///   x=7  r r r r r r r r
    ///   x=2  R R R R R R R R
    ///   x=1  H D C E M C D H
    /// ```
    pub fn standard() -> Board {
        const BACK_RANK: [(PieceKind, u8); 8] = [
            (PieceKind::Horse, 1),
            (PieceKind::Dog, 1),
            (PieceKind::Cat, 1),
            (PieceKind::Elephant, 1),
            (PieceKind::Camel, 1),
            (PieceKind::Cat, 2),
            (PieceKind::Dog, 2),
            (PieceKind::Horse, 2),
        ];

        let mut board = Board::empty();
        for color in Color::all() {
            let [back, front] = match color {
                Color::Gold => [1, 2],
                Color::Silver => [8, 7],
            };
            for y in 1..=BOARD_SIZE {
                let (kind, id) = BACK_RANK[y as usize - 1];
                board.cells[Coord { x: back, y }.index()] = Some(Piece::new(kind, color, id));
                board.cells[Coord { x: front, y }.index()] =
                    Some(Piece::new(PieceKind::Rabbit, color, y));
            }
        }
        board
    }

    /// Build a board holding exactly the given pieces.
    pub fn with_pieces(pieces: impl IntoIterator<Item = (Coord, Piece)>) -> Board {
        let mut board = Board::empty();
        for (coord, piece) in pieces {
            board.cells[coord.index()] = Some(piece);
        }
        board
    }

    /// Get the occupant of a square.
    #[inline]
    pub fn occupant(&self, coord: Coord) -> Option<Piece> {
        self.cells[coord.index()]
    }

    #[inline]
    pub fn is_empty(&self, coord: Coord) -> bool {
        self.cells[coord.index()].is_none()
    }

    /// Get the square at a coordinate.
    #[inline]
    pub fn retrieve(&self, coord: Coord) -> Square {
        Square::new(coord, self.occupant(coord))
    }

    /// Find the coordinate currently holding exactly this piece.
    pub fn locate(&self, piece: &Piece) -> Option<Coord> {
        self.cells
            .iter()
            .position(|cell| cell.as_ref() == Some(piece))
            .map(Coord::from_index)
    }

    /// Get the square holding exactly this piece.
    pub fn retrieve_by_piece(&self, piece: &Piece) -> Result<Square, RuleError> {
        self.locate(piece)
            .map(|coord| Square::new(coord, Some(*piece)))
            .ok_or(RuleError::PieceNotPresent(*piece))
    }

    /// Return a new board where each given square replaces the square with
    /// the same coordinate. Later entries win over earlier ones.
    pub fn replace(&self, squares: &[Square]) -> Board {
        let mut next = *self;
        for square in squares {
            next.cells[square.coord.index()] = square.occupant;
        }
        next
    }

    /// Return a new board with the occupant of `from` slid onto `to`.
    pub fn with_move(&self, from: Coord, to: Coord) -> Board {
        self.replace(&[Square::empty(from), Square::new(to, self.occupant(from))])
    }

    /// Iterate over all squares in storage order.
    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| Square::new(Coord::from_index(idx), *cell))
    }

    /// Iterate over occupied squares.
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(idx, cell)| cell.map(|piece| (Coord::from_index(idx), piece)))
    }

    /// Count the pieces of one color.
    pub fn count(&self, color: Color) -> usize {
        self.pieces().filter(|(_, piece)| piece.color == color).count()
    }

    /// Check that both home rows of a color are fully occupied.
    pub fn home_rows_filled(&self, color: Color) -> bool {
        Coord::all()
            .filter(|coord| color.home_rows().contains(&coord.x()))
            .all(|coord| !self.is_empty(coord))
    }

    /// True while any home-row square of either color is empty.
    pub fn is_positioning(&self) -> bool {
        !Color::all().all(|color| self.home_rows_filled(color))
    }

    // ========== Adjacency & Freezing ==========

    /// Pieces on the orthogonal neighbours of a square. Empty neighbours are
    /// skipped.
    pub fn adjacent_pieces(&self, coord: Coord) -> Vec<Piece> {
        coord.neighbors().filter_map(|n| self.occupant(n)).collect()
    }

    /// Check if `piece` standing on `coord` would be frozen: at least one
    /// strictly stronger enemy next to it and no ally next to it.
    ///
    /// Whatever occupies `coord` itself is ignored, and a neighbour holding
    /// `piece` counts as an ally.
    pub fn is_frozen(&self, piece: &Piece, coord: Coord) -> bool {
        let neighbors = self.adjacent_pieces(coord);
        let has_ally = neighbors.iter().any(|p| p.is_ally_of(piece));
        let has_stronger_enemy = neighbors
            .iter()
            .any(|p| !p.is_ally_of(piece) && p.is_stronger_than(piece));
        has_stronger_enemy && !has_ally
    }

    /// Check if the occupant of `coord` is captured: the square is a trap,
    /// it is occupied, and no ally stands next to it. Enemies are irrelevant.
    pub fn is_captured(&self, coord: Coord) -> bool {
        if !coord.is_trap() {
            return false;
        }
        match self.occupant(coord) {
            None => false,
            Some(piece) => !self.adjacent_pieces(coord).iter().any(|p| p.is_ally_of(&piece)),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Board> for Vec<Square> {
    fn from(board: Board) -> Self {
        board.squares().collect()
    }
}

impl TryFrom<Vec<Square>> for Board {
    type Error = BoardError;

    fn try_from(squares: Vec<Square>) -> Result<Self, Self::Error> {
        if squares.len() != SQUARE_COUNT {
            return Err(BoardError::WrongSquareCount(squares.len()));
        }
        let mut seen = [false; SQUARE_COUNT];
        let mut board = Board::empty();
        for square in squares {
            let idx = square.coord.index();
            if seen[idx] {
                return Err(BoardError::DuplicateSquare(square.coord));
            }
            seen[idx] = true;
            board.cells[idx] = square.occupant;
        }
        Ok(board)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.pieces().map(|(coord, piece)| (coord, piece.notation())))
            .finish()
    }
}

/// Text diagram, Silver side on top.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for x in (1..=BOARD_SIZE).rev() {
            write!(f, "{} |", x)?;
            for y in 1..=BOARD_SIZE {
                let coord = Coord { x, y };
                match self.occupant(coord) {
                    Some(piece) => {
                        let letter = piece.kind.letter();
                        let letter = match piece.color {
                            Color::Gold => letter,
                            Color::Silver => letter.to_ascii_lowercase(),
                        };
                        write!(f, " {}", letter)?;
                    }
                    None if coord.is_trap() => f.write_str(" x")?,
                    None => f.write_str(" .")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "   +----------------")?;
        write!(f, "    ")?;
        for y in 1..=BOARD_SIZE {
            write!(f, " {}", y)?;
        }
        writeln!(f)
    }
}
