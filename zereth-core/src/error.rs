//! Typed failures returned by the engine.

use thiserror::Error;

use crate::board::Coord;
use crate::piece::{Color, Piece};

/// A rule violation. Every variant leaves the game unchanged; the caller
/// decides whether to show it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum RuleError {
    #[error("square {0} is already occupied")]
    SquareOccupied(Coord),

    #[error("{color} pieces can only be placed on rows {rows:?}, not {coord}")]
    WrongHomeRow { color: Color, coord: Coord, rows: [u8; 2] },

    #[error("no piece at source square {0}")]
    NoPieceAtSource(Coord),

    #[error("target square {0} is already occupied")]
    TargetOccupied(Coord),

    #[error("square {0} is not reachable with the remaining moves")]
    NotReachable(Coord),

    #[error("action needs {required} moves but only {remaining} remain")]
    InsufficientMoves { required: u8, remaining: u8 },

    #[error("both pieces are {0}")]
    SameColor(Color),

    #[error("{strong} is not stronger than {weak}")]
    NotStronger { strong: Piece, weak: Piece },

    #[error("{from} and {to} are not adjacent")]
    NotAdjacent { from: Coord, to: Coord },

    #[error("a turn has to produce a net change on the board")]
    NoNetChange,

    #[error("the game is over")]
    GameOver,

    #[error("{0} is not on the board")]
    PieceNotPresent(Piece),

    #[error("{0} is frozen")]
    Frozen(Piece),

    #[error("{piece} cannot move from {from} back to {to}")]
    RabbitBackwards { piece: Piece, from: Coord, to: Coord },

    #[error("{piece} cannot act during {current}'s turn")]
    NotYourTurn { piece: Piece, current: Color },

    #[error("the positioning phase is over")]
    NotPositioning,

    #[error("pieces cannot move until both players have placed every piece")]
    StillPositioning,

    #[error("{0} is already placed or not part of the set")]
    PieceUnavailable(Piece),

    #[error("no action of the current turn left to undo")]
    NothingToUndo,

    #[error("no safe step-by-step path leads to {0}")]
    NoPath(Coord),
}

/// Failure to rebuild a board from a list of squares.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum BoardError {
    #[error("a board has 64 squares, got {0}")]
    WrongSquareCount(usize),

    #[error("square {0} appears more than once")]
    DuplicateSquare(Coord),
}
