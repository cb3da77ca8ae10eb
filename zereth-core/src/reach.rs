//! Reachability search: which squares a piece can slide to with the moves
//! left in the turn.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::board::{Board, Coord, Square};
use crate::error::RuleError;
use crate::piece::{Color, Piece};

/// Annotation on a reachable destination.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize, Deserialize)]
pub enum DestinationTag {
    /// The piece survives on arrival.
    GoodToGo,
    /// Arriving there gets the piece captured on a trap.
    Danger,
}

/// Check if a single step takes a rabbit toward its own home side. Gold
/// rabbits may never decrease x, Silver rabbits may never increase it.
#[inline]
pub fn is_rabbit_moving_backwards(piece: &Piece, from: Coord, to: Coord) -> bool {
    if !piece.is_rabbit() {
        return false;
    }
    match piece.color {
        Color::Gold => to.x() < from.x(),
        Color::Silver => to.x() > from.x(),
    }
}

/// Every square `piece` can reach from `source` in 1..=`remaining_moves`
/// orthogonal steps, each tagged with whether arriving there is a capture.
///
/// Breadth-first with a visited set seeded with `source`, so each square is
/// reported once and the source never is. A step onto a neighbour is pruned
/// if the neighbour is occupied, the piece would be frozen there, or the step
/// is a backwards rabbit step.
///
/// Freezing is judged against `board` as given, not a board updated with the
/// piece's intermediate positions. In particular the piece still standing on
/// `source` counts as its own ally for the first step.
///
/// The tag simulates a direct jump from `source` to the destination on
/// `board`; the path taken does not matter.
pub fn reachable(
    board: &Board,
    remaining_moves: u8,
    source: Coord,
    piece: &Piece,
) -> Vec<(Coord, DestinationTag)> {
    let mut visited = [false; crate::board::SQUARE_COUNT];
    visited[source.index()] = true;

    let mut found = Vec::new();
    let mut queue = VecDeque::from([(source, 0u8)]);

    while let Some((from, depth)) = queue.pop_front() {
        if depth == remaining_moves {
            continue;
        }
        for to in from.neighbors() {
            if visited[to.index()] {
                continue;
            }
            if !board.is_empty(to)
                || board.is_frozen(piece, to)
                || is_rabbit_moving_backwards(piece, from, to)
            {
                continue;
            }
            visited[to.index()] = true;
            found.push(to);
            queue.push_back((to, depth + 1));
        }
    }

    trace!(%piece, %source, remaining_moves, count = found.len(), "reachable squares");

    found
        .into_iter()
        .map(|to| {
            let simulated = board.replace(&[Square::empty(source), Square::new(to, Some(*piece))]);
            let tag = if simulated.is_captured(to) {
                DestinationTag::Danger
            } else {
                DestinationTag::GoodToGo
            };
            (to, tag)
        })
        .collect()
}

/// Check that the occupant of `source` may slide to `target` this turn.
pub fn is_movement_legal(
    board: &Board,
    remaining_moves: u8,
    source: Coord,
    target: Coord,
) -> Result<(), RuleError> {
    let piece = board.occupant(source).ok_or(RuleError::NoPieceAtSource(source))?;
    if !board.is_empty(target) {
        return Err(RuleError::TargetOccupied(target));
    }
    if reachable(board, remaining_moves, source, &piece).iter().any(|(coord, _)| *coord == target) {
        Ok(())
    } else {
        Err(RuleError::NotReachable(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceKind;

    fn c(x: u8, y: u8) -> Coord {
        Coord::new(x, y).unwrap()
    }

    fn coords(found: &[(Coord, DestinationTag)]) -> Vec<Coord> {
        let mut out: Vec<Coord> = found.iter().map(|(coord, _)| *coord).collect();
        out.sort();
        out
    }

    #[test]
    fn test_lone_elephant_one_step() {
        let elephant = Piece::new(PieceKind::Elephant, Color::Gold, 1);
        let board = Board::with_pieces([(c(4, 4), elephant)]);
        let found = reachable(&board, 1, c(4, 4), &elephant);

        assert_eq!(coords(&found), vec![c(3, 4), c(4, 3), c(4, 5), c(5, 4)]);
        assert!(found.iter().all(|(_, tag)| *tag == DestinationTag::GoodToGo));
    }

    #[test]
    fn test_zero_budget_reaches_nothing() {
        let elephant = Piece::new(PieceKind::Elephant, Color::Gold, 1);
        let board = Board::with_pieces([(c(4, 4), elephant)]);
        assert!(reachable(&board, 0, c(4, 4), &elephant).is_empty());
    }

    #[test]
    fn test_collects_every_depth() {
        let elephant = Piece::new(PieceKind::Elephant, Color::Gold, 1);
        let board = Board::with_pieces([(c(4, 4), elephant)]);
        // Diamond of radius 2 minus the centre: 4 + 8 squares
        let found = reachable(&board, 2, c(4, 4), &elephant);
        assert_eq!(found.len(), 12);
        assert!(found.iter().all(|(coord, _)| coord.manhattan(c(4, 4)) <= 2));
    }

    #[test]
    fn test_no_duplicates_and_no_source() {
        let dog = Piece::new(PieceKind::Dog, Color::Silver, 1);
        let board = Board::with_pieces([(c(5, 5), dog)]);
        let found = reachable(&board, 4, c(5, 5), &dog);
        let unique = coords(&found);
        let mut deduped = unique.clone();
        deduped.dedup();
        assert_eq!(unique, deduped);
        assert!(!unique.contains(&c(5, 5)));
    }

    #[test]
    fn test_occupied_squares_block() {
        let horse = Piece::new(PieceKind::Horse, Color::Gold, 1);
        let board = Board::with_pieces([
            (c(4, 4), horse),
            (c(4, 5), Piece::new(PieceKind::Rabbit, Color::Gold, 1)),
        ]);
        let found = coords(&reachable(&board, 1, c(4, 4), &horse));
        assert!(!found.contains(&c(4, 5)));
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_gold_rabbit_never_backwards() {
        let rabbit = Piece::new(PieceKind::Rabbit, Color::Gold, 1);
        let board = Board::with_pieces([(c(4, 4), rabbit)]);
        let found = reachable(&board, 4, c(4, 4), &rabbit);
        assert!(!found.is_empty());
        assert!(found.iter().all(|(coord, _)| coord.x() >= 4));
    }

    #[test]
    fn test_silver_rabbit_never_backwards() {
        let rabbit = Piece::new(PieceKind::Rabbit, Color::Silver, 1);
        let board = Board::with_pieces([(c(5, 4), rabbit)]);
        let found = reachable(&board, 3, c(5, 4), &rabbit);
        assert!(found.iter().all(|(coord, _)| coord.x() <= 5));
        assert!(found.iter().any(|(coord, _)| *coord == c(2, 4)));
    }

    #[test]
    fn test_frozen_squares_pruned() {
        let cat = Piece::new(PieceKind::Cat, Color::Gold, 1);
        let camel = Piece::new(PieceKind::Camel, Color::Silver, 1);
        // Camel at (6,4): the cat would be frozen at (5,4) after two steps
        // up from (3,4) since nothing of its own color is next to (5,4).
        let board = Board::with_pieces([(c(3, 4), cat), (c(6, 4), camel)]);
        let found = coords(&reachable(&board, 3, c(3, 4), &cat));
        assert!(found.contains(&c(4, 4)));
        assert!(!found.contains(&c(5, 4)));
        assert!(!found.contains(&c(6, 4)));
    }

    #[test]
    fn test_first_step_supported_by_source() {
        // Next to the source, the original board still shows the piece
        // itself, which counts as an ally.
        let cat = Piece::new(PieceKind::Cat, Color::Gold, 1);
        let camel = Piece::new(PieceKind::Camel, Color::Silver, 1);
        let board = Board::with_pieces([(c(4, 4), cat), (c(5, 5), camel)]);
        let found = coords(&reachable(&board, 1, c(4, 4), &cat));
        assert!(found.contains(&c(4, 5)));
        assert!(found.contains(&c(5, 4)));
    }

    #[test]
    fn test_trap_tagged_danger() {
        let dog = Piece::new(PieceKind::Dog, Color::Gold, 1);
        let board = Board::with_pieces([(c(3, 2), dog)]);
        let found = reachable(&board, 1, c(3, 2), &dog);
        let trap = found.iter().find(|(coord, _)| *coord == c(3, 3)).unwrap();
        assert_eq!(trap.1, DestinationTag::Danger);
        let other = found.iter().find(|(coord, _)| *coord == c(4, 2)).unwrap();
        assert_eq!(other.1, DestinationTag::GoodToGo);
    }

    #[test]
    fn test_supported_trap_is_safe() {
        let dog = Piece::new(PieceKind::Dog, Color::Gold, 1);
        let board = Board::with_pieces([
            (c(3, 2), dog),
            (c(3, 4), Piece::new(PieceKind::Cat, Color::Gold, 1)),
        ]);
        let found = reachable(&board, 1, c(3, 2), &dog);
        assert!(found.contains(&(c(3, 3), DestinationTag::GoodToGo)));
    }

    #[test]
    fn test_movement_legal_errors() {
        let horse = Piece::new(PieceKind::Horse, Color::Gold, 1);
        let board = Board::with_pieces([
            (c(4, 4), horse),
            (c(4, 5), Piece::new(PieceKind::Cat, Color::Gold, 1)),
        ]);

        assert_eq!(
            is_movement_legal(&board, 4, c(2, 2), c(2, 3)),
            Err(RuleError::NoPieceAtSource(c(2, 2)))
        );
        assert_eq!(
            is_movement_legal(&board, 4, c(4, 4), c(4, 5)),
            Err(RuleError::TargetOccupied(c(4, 5)))
        );
        assert_eq!(
            is_movement_legal(&board, 1, c(4, 4), c(6, 4)),
            Err(RuleError::NotReachable(c(6, 4)))
        );
        assert_eq!(is_movement_legal(&board, 2, c(4, 4), c(6, 4)), Ok(()));
    }

    #[test]
    fn test_movement_legal_rabbit_backwards() {
        let rabbit = Piece::new(PieceKind::Rabbit, Color::Gold, 1);
        let board = Board::with_pieces([(c(4, 4), rabbit)]);
        assert_eq!(
            is_movement_legal(&board, 4, c(4, 4), c(3, 4)),
            Err(RuleError::NotReachable(c(3, 4)))
        );
        assert_eq!(is_movement_legal(&board, 4, c(4, 4), c(5, 4)), Ok(()));
    }
}
