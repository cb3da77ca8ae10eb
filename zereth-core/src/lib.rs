//! Rules engine for an Arimaa-style two-player game on an 8x8 board.
//!
//! Each player owns sixteen pieces (elephant, camel, two horses, two dogs,
//! two cats, eight rabbits). After both sides fill their two home rows, turns
//! alternate with a budget of four moves: orthogonal slides cost one move per
//! step, pushing or pulling a weaker enemy costs two. Pieces next to a
//! stronger enemy and no friend are frozen. Unsupported pieces on the four
//! trap squares are captured. A rabbit reaching the far row, or taking every
//! enemy piece off the board, wins.
//!
//! # Coordinates
//!
//! ```text
//! (x, y), both 1..=8
//! x = row: Gold home rows 1-2, Silver home rows 7-8
//! y = column
//! traps: (3,3) (3,6) (6,3) (6,6)
//! ```
//!
//! # Usage
//!
//! ```
//! use zereth_core::{Color, Coord, Game, Piece, PieceKind};
//!
//! let game = Game::standard();
//! let rabbit = Piece::new(PieceKind::Rabbit, Color::Gold, 4);
//! let game = game.move_piece(rabbit, Coord::new(4, 4).unwrap()).unwrap();
//! assert_eq!(game.remaining_moves(), 2);
//! ```

pub mod board;
pub mod error;
pub mod game;
pub mod history;
pub mod path;
pub mod piece;
pub mod reach;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use board::{Board, Coord, Square, TRAP_SQUARES};
pub use error::{BoardError, RuleError};
pub use game::{Game, MOVES_PER_TURN};
pub use history::{MoveRecord, RepositionKind};
pub use piece::{Color, Piece, PieceKind};
pub use reach::DestinationTag;
