//! Path reconstruction: turn a validated (source, target) pair into the
//! single-square steps that realise it.
//!
//! Destinations come from `reach::reachable`, which only says *that* a square
//! can be reached. History needs the concrete steps, so each destination
//! shape has a small set of candidate paths:
//!
//! ```text
//! straight line      one path along the line
//! (1,1) diagonal     X Y        | Y X
//! (2,2) diagonal     X Y X Y    | Y X Y X
//! (2,1) L            X X Y      | Y X X
//! (1,2) L            Y Y X      | X Y Y
//! (3,1) L            X X X Y    | Y X X X
//! (1,3) L            Y Y Y X    | X Y Y Y
//! ```
//!
//! where X is a unit step along x toward the target and Y along y. With a
//! budget of at most 4 moves, every reachable destination has one of these
//! shapes.

use tracing::trace;

use crate::board::{Board, Coord};
use crate::error::RuleError;

/// Unit step along one axis.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Axis {
    X,
    Y,
}

use Axis::{X, Y};

/// Candidate step orders per (|dx|, |dy|) shape, first candidate first.
static DETOURS: [((u8, u8), [&[Axis]; 2]); 6] = [
    ((1, 1), [&[X, Y], &[Y, X]]),
    ((2, 2), [&[X, Y, X, Y], &[Y, X, Y, X]]),
    ((2, 1), [&[X, X, Y], &[Y, X, X]]),
    ((1, 2), [&[Y, Y, X], &[X, Y, Y]]),
    ((3, 1), [&[X, X, X, Y], &[Y, X, X, X]]),
    ((1, 3), [&[Y, Y, Y, X], &[X, Y, Y, Y]]),
];

fn detours(adx: u8, ady: u8) -> Option<&'static [&'static [Axis]; 2]> {
    DETOURS
        .iter()
        .find(|(shape, _)| *shape == (adx, ady))
        .map(|(_, orders)| orders)
}

/// Walk a step order from `source`. `None` if a step leaves the board.
fn walk(source: Coord, order: &[Axis], x_dir: i8, y_dir: i8) -> Option<Vec<Coord>> {
    let mut at = source;
    let mut squares = Vec::with_capacity(order.len());
    for axis in order {
        at = match axis {
            X => at.offset(x_dir, 0)?,
            Y => at.offset(0, y_dir)?,
        };
        squares.push(at);
    }
    Some(squares)
}

/// All candidate paths from `source` to `target`. Each path lists the
/// squares visited after `source`, ending with `target`.
///
/// # Panics
///
/// Panics if the shape of the move has no generator (for example a
/// diagonal of length 3). Such a destination is never produced by
/// `reachable` with a budget of at most 4 moves.
pub fn candidate_paths(source: Coord, target: Coord) -> Vec<Vec<Coord>> {
    let adx = source.x().abs_diff(target.x());
    let ady = source.y().abs_diff(target.y());
    let x_dir: i8 = if target.x() > source.x() { 1 } else { -1 };
    let y_dir: i8 = if target.y() > source.y() { 1 } else { -1 };

    if adx == 0 && ady == 0 {
        panic!("path requested from {} to itself", source);
    }

    if adx == 0 || ady == 0 {
        let axis = if adx == 0 { Y } else { X };
        let order = vec![axis; (adx + ady) as usize];
        return walk(source, &order, x_dir, y_dir).into_iter().collect();
    }

    match detours(adx, ady) {
        Some(orders) => orders
            .iter()
            .filter_map(|order| walk(source, order, x_dir, y_dir))
            .collect(),
        None => panic!(
            "no path generator for a ({}, {}) move from {} to {}",
            adx, ady, source, target
        ),
    }
}

/// Check a candidate path on a running copy of the board. Every square
/// before the destination must be empty, and the piece must be neither
/// captured nor frozen after stepping onto it. The destination itself is
/// not checked.
pub fn is_path_valid(board: &Board, source: Coord, path: &[Coord]) -> bool {
    let Some(piece) = board.occupant(source) else {
        return false;
    };
    let Some((_, intermediate)) = path.split_last() else {
        return false;
    };

    let mut running = *board;
    let mut at = source;
    for &next in intermediate {
        if !running.is_empty(next) {
            return false;
        }
        running = running.with_move(at, next);
        if running.is_captured(next) || running.is_frozen(&piece, next) {
            return false;
        }
        at = next;
    }
    true
}

/// Check that every square of a path before the destination is empty.
pub fn is_path_clear(board: &Board, path: &[Coord]) -> bool {
    match path.split_last() {
        Some((_, intermediate)) => intermediate.iter().all(|&k| board.is_empty(k)),
        None => false,
    }
}

/// Pick the concrete path for a move from `source` to `target`.
///
/// A straight line has a single path, which only has to be clear: passing
/// over a trap or next to a stronger enemy does not stop it. Detours are
/// checked with [`is_path_valid`], tried in table order, and the first
/// valid one wins; which one is picked when several are valid is not part
/// of the contract.
///
/// # Panics
///
/// See [`candidate_paths`].
pub fn reconstruct(board: &Board, source: Coord, target: Coord) -> Result<Vec<Coord>, RuleError> {
    if board.is_empty(source) {
        return Err(RuleError::NoPieceAtSource(source));
    }
    let straight = source.x() == target.x() || source.y() == target.y();
    let path = candidate_paths(source, target)
        .into_iter()
        .find(|path| {
            if straight {
                is_path_clear(board, path)
            } else {
                is_path_valid(board, source, path)
            }
        })
        .ok_or(RuleError::NoPath(target))?;
    trace!(%source, %target, steps = path.len(), "reconstructed path");
    Ok(path)
}
