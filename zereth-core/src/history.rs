//! History records and how each one is reverted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Coord, Square};
use crate::piece::Piece;

/// How a stronger piece displaced a weaker enemy.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum RepositionKind {
    /// The strong piece steps to the target, the weak piece follows into the
    /// square it left.
    Pull,
    /// The weak piece is shoved to the target, the strong piece takes the
    /// square it left.
    Push,
}

/// One entry of the game log.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum MoveRecord {
    /// A single orthogonal slide.
    Move { source: Coord, target: Coord },
    /// A push or pull; `strong_source` and `weak_source` are where the two
    /// pieces stood before it.
    Reposition {
        strong_source: Coord,
        weak_source: Coord,
        target: Coord,
        kind: RepositionKind,
    },
    /// A piece removed from a trap after the preceding action.
    Capture { piece: Piece, trap: Coord },
}

impl MoveRecord {
    /// Budget consumed by this record.
    #[inline]
    pub fn cost(&self) -> u8 {
        match self {
            MoveRecord::Move { .. } => 1,
            MoveRecord::Reposition { .. } => 2,
            MoveRecord::Capture { .. } => 0,
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        matches!(self, MoveRecord::Capture { .. })
    }

    /// Board as it was before this record was applied.
    ///
    /// # Panics
    ///
    /// Panics if `board` does not hold the pieces the record says it moved,
    /// which means the record was not the last one applied to `board`.
    pub fn revert(&self, board: &Board) -> Board {
        match *self {
            MoveRecord::Move { source, target } => {
                let piece = board
                    .occupant(target)
                    .unwrap_or_else(|| panic!("undo of {} -> {}: target is empty", source, target));
                board.replace(&[Square::new(source, Some(piece)), Square::empty(target)])
            }
            MoveRecord::Reposition { strong_source, weak_source, target, kind } => {
                // Pull leaves the strong piece on the target and the weak one
                // on the strong source; push leaves the strong piece on the
                // weak source and the weak one on the target.
                let (strong_at, weak_at) = match kind {
                    RepositionKind::Pull => (target, strong_source),
                    RepositionKind::Push => (weak_source, target),
                };
                let strong = board.occupant(strong_at).unwrap_or_else(|| {
                    panic!("undo of {:?}: no strong piece on {}", kind, strong_at)
                });
                let weak = board
                    .occupant(weak_at)
                    .unwrap_or_else(|| panic!("undo of {:?}: no weak piece on {}", kind, weak_at));
                board.replace(&[
                    Square::empty(target),
                    Square::new(strong_source, Some(strong)),
                    Square::new(weak_source, Some(weak)),
                ])
            }
            MoveRecord::Capture { piece, trap } => board.replace(&[Square::new(trap, Some(piece))]),
        }
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRecord::Move { source, target } => write!(f, "{} -> {}", source, target),
            MoveRecord::Reposition { strong_source, weak_source, target, kind } => {
                write!(f, "{:?} {} / {} -> {}", kind, strong_source, weak_source, target)
            }
            MoveRecord::Capture { piece, trap } => write!(f, "{} captured on {}", piece, trap),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Color, PieceKind};

    fn c(x: u8, y: u8) -> Coord {
        Coord::new(x, y).unwrap()
    }

    #[test]
    fn test_costs() {
        assert_eq!(MoveRecord::Move { source: c(1, 1), target: c(1, 2) }.cost(), 1);
        let rep = MoveRecord::Reposition {
            strong_source: c(4, 4),
            weak_source: c(4, 5),
            target: c(4, 6),
            kind: RepositionKind::Push,
        };
        assert_eq!(rep.cost(), 2);
        let cap = MoveRecord::Capture {
            piece: Piece::new(PieceKind::Cat, Color::Gold, 1),
            trap: c(3, 3),
        };
        assert_eq!(cap.cost(), 0);
        assert!(cap.is_capture());
    }

    #[test]
    fn test_revert_move() {
        let horse = Piece::new(PieceKind::Horse, Color::Silver, 2);
        let before = Board::with_pieces([(c(5, 5), horse)]);
        let after = before.with_move(c(5, 5), c(5, 6));
        let record = MoveRecord::Move { source: c(5, 5), target: c(5, 6) };
        assert_eq!(record.revert(&after), before);
    }

    #[test]
    fn test_revert_pull() {
        let elephant = Piece::new(PieceKind::Elephant, Color::Gold, 1);
        let rabbit = Piece::new(PieceKind::Rabbit, Color::Silver, 1);
        let before = Board::with_pieces([(c(4, 4), elephant), (c(4, 5), rabbit)]);
        // Elephant steps to (4,3), rabbit follows to (4,4)
        let after = Board::with_pieces([(c(4, 3), elephant), (c(4, 4), rabbit)]);
        let record = MoveRecord::Reposition {
            strong_source: c(4, 4),
            weak_source: c(4, 5),
            target: c(4, 3),
            kind: RepositionKind::Pull,
        };
        assert_eq!(record.revert(&after), before);
    }

    #[test]
    fn test_revert_push() {
        let elephant = Piece::new(PieceKind::Elephant, Color::Gold, 1);
        let rabbit = Piece::new(PieceKind::Rabbit, Color::Silver, 1);
        let before = Board::with_pieces([(c(4, 4), elephant), (c(4, 5), rabbit)]);
        // Rabbit shoved to (5,5), elephant takes (4,5)
        let after = Board::with_pieces([(c(4, 5), elephant), (c(5, 5), rabbit)]);
        let record = MoveRecord::Reposition {
            strong_source: c(4, 4),
            weak_source: c(4, 5),
            target: c(5, 5),
            kind: RepositionKind::Push,
        };
        assert_eq!(record.revert(&after), before);
    }

    #[test]
    fn test_revert_capture() {
        let cat = Piece::new(PieceKind::Cat, Color::Gold, 1);
        let record = MoveRecord::Capture { piece: cat, trap: c(6, 3) };
        let restored = record.revert(&Board::empty());
        assert_eq!(restored.occupant(c(6, 3)), Some(cat));
    }

    #[test]
    #[should_panic(expected = "target is empty")]
    fn test_revert_move_on_wrong_board() {
        MoveRecord::Move { source: c(1, 1), target: c(1, 2) }.revert(&Board::empty());
    }
}
