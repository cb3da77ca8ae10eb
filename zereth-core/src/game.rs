//! Game state and the commands that advance it.
//!
//! A `Game` is a value. Every command borrows the current state and returns
//! either the next state or a [`RuleError`]; a rejected command leaves the
//! caller's state exactly as it was.
//!
//! # Turn Structure
//!
//! ```text
//! positioning  place* ................ until rows 1,2,7,8 are all occupied
//! main phase   (move | reposition | undo)* pass   per turn, budget 4
//!              move        costs 1 per step
//!              reposition  costs 2
//!              capture     free, runs after every move or reposition
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::{Board, Coord, Square, TRAP_SQUARES};
use crate::error::RuleError;
use crate::history::{MoveRecord, RepositionKind};
use crate::path;
use crate::piece::{self, Color, Piece};
use crate::reach::{self, DestinationTag};

/// Moves each player gets per turn.
pub const MOVES_PER_TURN: u8 = 4;

/// Check that `piece` may be set down on `target` during positioning.
pub fn is_placement_legal(board: &Board, piece: &Piece, target: Coord) -> Result<(), RuleError> {
    if !board.is_empty(target) {
        return Err(RuleError::SquareOccupied(target));
    }
    let rows = piece.color.home_rows();
    if !rows.contains(&target.x()) {
        return Err(RuleError::WrongHomeRow { color: piece.color, coord: target, rows });
    }
    Ok(())
}

/// Check one sub-step of a push or pull: `source` holds a piece, `target` is
/// empty and the two are orthogonal neighbours.
pub fn is_reposition_legal(board: &Board, source: Coord, target: Coord) -> Result<(), RuleError> {
    if board.is_empty(source) {
        return Err(RuleError::NoPieceAtSource(source));
    }
    if !board.is_empty(target) {
        return Err(RuleError::TargetOccupied(target));
    }
    if !source.is_adjacent(target) {
        return Err(RuleError::NotAdjacent { from: source, to: target });
    }
    Ok(())
}

/// Complete state of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    previous_board: Option<Board>,
    /// Oldest first; exposed most-recent-first.
    history: Vec<MoveRecord>,
    current_player: Color,
    remaining_moves: u8,
    positioning: bool,
    winner: Option<Color>,
}

impl Game {
    /// A fresh game: empty board, positioning phase, Gold to place.
    pub fn new() -> Game {
        Game {
            board: Board::empty(),
            previous_board: None,
            history: Vec::new(),
            current_player: Color::Gold,
            remaining_moves: 0,
            positioning: true,
            winner: None,
        }
    }

    /// The default setup with both sides placed, Gold to move.
    pub fn standard() -> Game {
        Game::from_board(Board::standard(), Color::Gold)
    }

    /// Start the main phase from an arbitrary position with `current` to
    /// move and a full budget. Positioning is skipped even if the home rows
    /// are not filled.
    pub fn from_board(board: Board, current: Color) -> Game {
        Game {
            board,
            previous_board: None,
            history: Vec::new(),
            current_player: current,
            remaining_moves: MOVES_PER_TURN,
            positioning: false,
            winner: None,
        }
    }

    // ========== Accessors ==========

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Board as it stood when the previous turn ended.
    #[inline]
    pub fn previous_board(&self) -> Option<&Board> {
        self.previous_board.as_ref()
    }

    /// History records, most recent first.
    pub fn history(&self) -> impl Iterator<Item = &MoveRecord> + '_ {
        self.history.iter().rev()
    }

    #[inline]
    pub fn current_player(&self) -> Color {
        self.current_player
    }

    #[inline]
    pub fn remaining_moves(&self) -> u8 {
        self.remaining_moves
    }

    #[inline]
    pub fn is_positioning(&self) -> bool {
        self.positioning
    }

    #[inline]
    pub fn win(&self) -> bool {
        self.winner.is_some()
    }

    #[inline]
    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    /// Check if `undo` would succeed.
    pub fn can_undo(&self) -> bool {
        self.winner.is_none()
            && !self.positioning
            && self.remaining_moves < MOVES_PER_TURN
            && !self.history.is_empty()
    }

    // ========== Queries ==========

    /// Tagged destinations for `piece` with the current budget. Empty if the
    /// piece is not on the board.
    pub fn destinations(&self, piece: &Piece) -> Vec<(Coord, DestinationTag)> {
        match self.board.locate(piece) {
            Some(source) => reach::reachable(&self.board, self.remaining_moves, source, piece),
            None => Vec::new(),
        }
    }

    pub fn is_piece_frozen(&self, piece: &Piece) -> Result<bool, RuleError> {
        let square = self.board.retrieve_by_piece(piece)?;
        Ok(self.board.is_frozen(piece, square.coord))
    }

    /// Select `piece` as the active piece and list where it can go.
    ///
    /// Only the current player's pieces can be selected, and during the main
    /// phase a frozen piece cannot. While positioning nothing is reachable,
    /// so the list is empty.
    pub fn select(&self, piece: &Piece) -> Result<Vec<(Coord, DestinationTag)>, RuleError> {
        if self.winner.is_some() {
            return Err(RuleError::GameOver);
        }
        if piece.color != self.current_player {
            return Err(RuleError::NotYourTurn { piece: *piece, current: self.current_player });
        }
        if self.positioning {
            return Ok(Vec::new());
        }
        if self.is_piece_frozen(piece)? {
            return Err(RuleError::Frozen(*piece));
        }
        Ok(self.destinations(piece))
    }

    /// Catalog pieces of `color` not yet on the board, in catalog order.
    pub fn available_pieces(&self, color: Color) -> Vec<Piece> {
        piece::catalog(color).filter(|p| self.board.locate(p).is_none()).collect()
    }

    // ========== Placement ==========

    /// Place `piece` on `target`. With a `source`, the piece already standing
    /// there is moved instead, and both squares change together.
    pub fn place(
        &self,
        target: Coord,
        piece: Piece,
        source: Option<Coord>,
    ) -> Result<Game, RuleError> {
        self.try_place(target, piece, source)
            .inspect_err(|err| debug!(%piece, %target, %err, "placement rejected"))
    }

    fn try_place(
        &self,
        target: Coord,
        piece: Piece,
        source: Option<Coord>,
    ) -> Result<Game, RuleError> {
        if self.winner.is_some() {
            return Err(RuleError::GameOver);
        }
        if !self.positioning {
            return Err(RuleError::NotPositioning);
        }
        if piece.color != self.current_player {
            return Err(RuleError::NotYourTurn { piece, current: self.current_player });
        }
        is_placement_legal(&self.board, &piece, target)?;

        let board = match source {
            Some(from) => {
                if self.board.occupant(from) != Some(piece) {
                    return Err(RuleError::PieceNotPresent(piece));
                }
                self.board.replace(&[Square::empty(from), Square::new(target, Some(piece))])
            }
            None => {
                if !piece.in_catalog() || self.board.locate(&piece).is_some() {
                    return Err(RuleError::PieceUnavailable(piece));
                }
                self.board.replace(&[Square::new(target, Some(piece))])
            }
        };

        let mut next = self.clone();
        next.board = board;
        next.positioning = board.is_positioning();
        next.current_player = if board.home_rows_filled(Color::Gold)
            && !board.home_rows_filled(Color::Silver)
        {
            Color::Silver
        } else {
            Color::Gold
        };
        next.remaining_moves = if next.positioning { 0 } else { MOVES_PER_TURN };

        debug!(%piece, %target, positioning = next.positioning, "placed");
        if !next.positioning {
            info!("positioning complete, {} to move", next.current_player);
        }
        Ok(next)
    }

    // ========== Movement ==========

    /// Slide `piece` to `target` through one or more orthogonal steps.
    pub fn move_piece(&self, piece: Piece, target: Coord) -> Result<Game, RuleError> {
        self.try_move(piece, target)
            .inspect_err(|err| debug!(%piece, %target, %err, "move rejected"))
    }

    fn try_move(&self, piece: Piece, target: Coord) -> Result<Game, RuleError> {
        self.check_main_phase(&piece)?;
        if self.remaining_moves == 0 {
            return Err(RuleError::InsufficientMoves { required: 1, remaining: 0 });
        }

        let source = self.board.retrieve_by_piece(&piece)?.coord;
        if self.board.is_frozen(&piece, source) {
            return Err(RuleError::Frozen(piece));
        }
        if reach::is_rabbit_moving_backwards(&piece, source, target) {
            return Err(RuleError::RabbitBackwards { piece, from: source, to: target });
        }
        reach::is_movement_legal(&self.board, self.remaining_moves, source, target)?;
        let length = source.manhattan(target);

        let steps = path::reconstruct(&self.board, source, target)?;
        let moved = self.board.with_move(source, target);
        self.check_net_change(length, &moved)?;

        let mut next = self.clone();
        next.board = moved;
        let mut from = source;
        for &to in &steps {
            next.history.push(MoveRecord::Move { source: from, target: to });
            from = to;
        }
        next.remaining_moves -= length;
        debug!(%piece, %source, %target, cost = length, remaining = next.remaining_moves, "moved");

        next.perform_captures();
        next.check_win();
        Ok(next)
    }

    /// Have `strong` push or pull the adjacent weaker enemy `weak`, ending
    /// with `target` occupied.
    ///
    /// If `target` is next to the strong piece the weak piece is pulled,
    /// otherwise it is pushed onto `target`.
    pub fn reposition(&self, strong: Piece, weak: Piece, target: Coord) -> Result<Game, RuleError> {
        self.try_reposition(strong, weak, target)
            .inspect_err(|err| debug!(%strong, %weak, %target, %err, "reposition rejected"))
    }

    fn try_reposition(&self, strong: Piece, weak: Piece, target: Coord) -> Result<Game, RuleError> {
        self.check_main_phase(&strong)?;
        if self.remaining_moves < 2 {
            return Err(RuleError::InsufficientMoves {
                required: 2,
                remaining: self.remaining_moves,
            });
        }
        if strong.is_ally_of(&weak) {
            return Err(RuleError::SameColor(strong.color));
        }
        if !strong.is_stronger_than(&weak) {
            return Err(RuleError::NotStronger { strong, weak });
        }

        let strong_source = self.board.retrieve_by_piece(&strong)?.coord;
        let weak_source = self.board.retrieve_by_piece(&weak)?.coord;
        if self.board.is_frozen(&strong, strong_source) {
            return Err(RuleError::Frozen(strong));
        }

        let kind = if target.is_adjacent(strong_source) {
            RepositionKind::Pull
        } else {
            RepositionKind::Push
        };
        let (first, second) = match kind {
            RepositionKind::Pull => ((strong_source, target), (weak_source, strong_source)),
            RepositionKind::Push => ((weak_source, target), (strong_source, weak_source)),
        };
        is_reposition_legal(&self.board, first.0, first.1)?;
        let halfway = self.board.with_move(first.0, first.1);
        is_reposition_legal(&halfway, second.0, second.1)?;
        let moved = halfway.with_move(second.0, second.1);
        self.check_net_change(2, &moved)?;

        let mut next = self.clone();
        next.board = moved;
        next.history.push(MoveRecord::Reposition { strong_source, weak_source, target, kind });
        next.remaining_moves -= 2;
        debug!(%strong, %weak, %target, ?kind, remaining = next.remaining_moves, "repositioned");

        next.perform_captures();
        next.check_win();
        Ok(next)
    }

    // ========== Turn & Undo ==========

    /// End the turn once the budget is spent. Does nothing while moves
    /// remain or during positioning.
    pub fn pass_turn(&self) -> Result<Game, RuleError> {
        if self.winner.is_some() {
            return Err(RuleError::GameOver);
        }
        if self.positioning || self.remaining_moves != 0 {
            return Ok(self.clone());
        }
        let mut next = self.clone();
        next.previous_board = Some(self.board);
        next.current_player = self.current_player.opponent();
        next.remaining_moves = MOVES_PER_TURN;
        debug!(player = %next.current_player, "turn passed");
        Ok(next)
    }

    /// Take back the last move step or reposition of the current turn,
    /// restoring any pieces it captured.
    ///
    /// A multi-step move is logged one step at a time, so it takes one undo
    /// per step to fully revert it. The first undo after a capturing move
    /// restores the captured piece and the last step only.
    ///
    /// # Panics
    ///
    /// Panics if the budget says something was spent this turn but the
    /// history is empty. Use [`Game::can_undo`] to check first.
    pub fn undo(&self) -> Result<Game, RuleError> {
        if self.winner.is_some() {
            return Err(RuleError::GameOver);
        }
        if self.positioning || self.remaining_moves >= MOVES_PER_TURN {
            return Err(RuleError::NothingToUndo);
        }

        let mut next = self.clone();
        loop {
            let record = next
                .history
                .pop()
                .unwrap_or_else(|| panic!("undo with an empty history"));
            next.board = record.revert(&next.board);
            next.remaining_moves += record.cost();
            if !record.is_capture() {
                debug!(%record, remaining = next.remaining_moves, "undone");
                break;
            }
        }
        Ok(next)
    }

    // ========== Internals ==========

    fn check_main_phase(&self, actor: &Piece) -> Result<(), RuleError> {
        if self.winner.is_some() {
            return Err(RuleError::GameOver);
        }
        if self.positioning {
            return Err(RuleError::StillPositioning);
        }
        if actor.color != self.current_player {
            return Err(RuleError::NotYourTurn { piece: *actor, current: self.current_player });
        }
        Ok(())
    }

    /// Reject a turn-ending action that recreates the previous board.
    /// Compared before captures are resolved.
    fn check_net_change(&self, cost: u8, moved: &Board) -> Result<(), RuleError> {
        if cost == self.remaining_moves && self.previous_board.as_ref() == Some(moved) {
            return Err(RuleError::NoNetChange);
        }
        Ok(())
    }

    /// Remove every unsupported piece standing on a trap. Traps are scanned
    /// last to first, so the capture on (3,3) ends up most recent.
    fn perform_captures(&mut self) {
        for trap in TRAP_SQUARES.into_iter().rev() {
            if !self.board.is_captured(trap) {
                continue;
            }
            if let Some(piece) = self.board.occupant(trap) {
                self.board = self.board.replace(&[Square::empty(trap)]);
                self.history.push(MoveRecord::Capture { piece, trap });
                info!(%piece, %trap, "captured");
            }
        }
    }

    /// Decide the winner after an action by the current player, who wins if
    /// both sides qualify.
    fn check_win(&mut self) {
        let acting = self.current_player;
        self.winner = [acting, acting.opponent()]
            .into_iter()
            .find(|&color| has_won(&self.board, color));
        if let Some(winner) = self.winner {
            info!(%winner, "game over");
        }
    }
}

/// A rabbit of `color` stands on its goal row, or the opponent has nothing
/// left on the board.
fn has_won(board: &Board, color: Color) -> bool {
    let rabbit_home = board.pieces().any(|(coord, piece)| {
        piece.color == color && piece.is_rabbit() && coord.x() == color.goal_row()
    });
    rabbit_home || board.count(color.opponent()) == 0
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Board diagram followed by a status line.
impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        match self.winner {
            Some(winner) => writeln!(f, "{} wins", winner),
            None if self.positioning => {
                writeln!(f, "positioning, {} to place", self.current_player)
            }
            None => {
                writeln!(f, "{} to move, {} moves left", self.current_player, self.remaining_moves)
            }
        }
    }
}
