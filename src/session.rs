//! A single game: the board, whose turn it is and how the game ended.
//!
//! [`GameSession`] is the interface presentation layers use: they query cells
//! for rendering, validate and apply human moves and ask for the automated
//! player's move. Every operation takes the session explicitly, so any number
//! of independent games can be played side by side.

use std::fmt;

use anyhow::bail;
use rand::Rng;

use crate::rules::board::Board;
use crate::rules::core::{Move, OutOfRange, Piece, PieceKind, Player};
use crate::rules::legality;
use crate::search;

/// Reason the game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The loser's General was captured.
    GeneralCaptured,
    /// The loser was to move and had no legal move.
    NoLegalMoves,
}

/// Final result of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    #[allow(missing_docs)]
    pub winner: Player,
    #[allow(missing_docs)]
    pub termination: Termination,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.termination {
            Termination::GeneralCaptured => "general captured",
            Termination::NoLegalMoves => "no legal moves",
        };
        write!(f, "{} wins ({reason})", self.winner.name())
    }
}

/// State of a game in progress: owns the [`Board`] for its whole lifetime.
///
/// Once the game is over ([`GameSession::is_over`] never goes back to
/// `false`), no move is considered valid and nothing can be applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSession {
    board: Board,
    side_to_move: Player,
    outcome: Option<Outcome>,
}

impl GameSession {
    /// Starts a game from the traditional layout with Red to move.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            side_to_move: Player::Red,
            outcome: None,
        }
    }

    /// Parses a position: piece placement (see [`Board::from_fen`]) followed by
    /// an optional side to move (`w`/`r` or `b`, Red by default). Any further
    /// fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the placement or the side to move is malformed, or
    /// if a side has no General: a game can not start without one.
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.split_whitespace();
        let Some(placement) = parts.next() else {
            bail!("position should not be empty");
        };
        let board = Board::from_fen(placement)?;
        for owner in [Player::Red, Player::Black] {
            if board.general(owner).is_none() {
                bail!("{} general is missing", owner.name());
            }
        }
        let side_to_move = match parts.next() {
            Some(side) => Player::try_from(side)?,
            None => Player::Red,
        };
        Ok(Self {
            board,
            side_to_move,
            outcome: None,
        })
    }

    /// Serializes the position in the format accepted by
    /// [`GameSession::from_fen`].
    #[must_use]
    pub fn fen(&self) -> String {
        format!("{} {}", self.board.fen(), self.side_to_move)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// How the game ended, `None` while it is in progress.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Returns the piece at the given cell for rendering.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] if the coordinates are outside of the board.
    pub fn piece_at(&self, row: i32, col: i32) -> Result<Option<Piece>, OutOfRange> {
        self.board.get(row, col)
    }

    /// Checks a candidate move given in raw coordinates. Never fails:
    /// out-of-range coordinates and finished games are reported as `false`.
    #[must_use]
    pub fn is_valid_move(&self, from_row: i32, from_col: i32, to_row: i32, to_col: i32) -> bool {
        !self.is_over()
            && Move::from_coords(from_row, from_col, to_row, to_col)
                .is_ok_and(|mv| legality::is_valid_move(&self.board, mv))
    }

    /// Validates and applies a move given in raw coordinates, see
    /// [`GameSession::play`].
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] (wrapped in [`anyhow::Error`]) for coordinates
    /// outside of the board, and the errors of [`GameSession::play`].
    pub fn apply_move(
        &mut self,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    ) -> anyhow::Result<Option<Piece>> {
        self.play(Move::from_coords(from_row, from_col, to_row, to_col)?)
    }

    /// Validates and applies a move of the side to move. Returns the captured
    /// piece, if any.
    ///
    /// # Errors
    ///
    /// Returns an error without touching the position if the game is over,
    /// the origin does not hold a piece of the side to move or the move is not
    /// legal.
    pub fn play(&mut self, mv: Move) -> anyhow::Result<Option<Piece>> {
        if let Some(outcome) = self.outcome {
            bail!("the game is over: {outcome}");
        }
        match self.board.at(mv.from) {
            None => bail!("there is no piece on {}", mv.from),
            Some(piece) if piece.owner != self.side_to_move => bail!(
                "the piece on {} belongs to {}, but {} is to move",
                mv.from,
                piece.owner.name(),
                self.side_to_move.name()
            ),
            Some(_) => {},
        }
        if !legality::is_valid_move(&self.board, mv) {
            bail!("{mv} is not a legal move");
        }
        Ok(self.make_move(mv))
    }

    /// Applies a move without checking its legality: relocates the piece,
    /// removes the captured one and either ends the game or passes the turn.
    /// Returns the captured piece, if any. Moving from an empty cell does
    /// nothing. The turn passes to the opponent of the moved piece's owner,
    /// whoever was to move before.
    ///
    /// The game ends when a General is captured (the capturing side wins) or
    /// when the side that receives the turn has no legal move (it loses).
    pub fn make_move(&mut self, mv: Move) -> Option<Piece> {
        let piece = self.board.remove(mv.from)?;
        let captured = self.board.place(mv.to, piece);
        if captured.is_some_and(|captured| captured.kind == PieceKind::General) {
            self.outcome = Some(Outcome {
                winner: piece.owner,
                termination: Termination::GeneralCaptured,
            });
            return captured;
        }
        self.side_to_move = piece.owner.opponent();
        let _ = self.adjudicate();
        captured
    }

    /// Ends the game if the side to move has no legal move, declaring the
    /// other side the winner. Returns the outcome of the game, if it is over.
    pub fn adjudicate(&mut self) -> Option<Outcome> {
        if self.outcome.is_none() && legality::legal_moves(&self.board, self.side_to_move).is_empty() {
            self.outcome = Some(Outcome {
                winner: self.side_to_move.opponent(),
                termination: Termination::NoLegalMoves,
            });
        }
        self.outcome
    }

    /// Legal moves of the side to move; empty once the game is over.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            return Vec::new();
        }
        legality::legal_moves(&self.board, self.side_to_move)
    }

    /// Picks the automated player's move for the side to move, see
    /// [`search::choose_move`]. Returns `None` if the game is over or there is
    /// no legal move; declaring the result is up to the caller (see
    /// [`GameSession::adjudicate`]).
    pub fn choose_automated_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Move> {
        if self.is_over() {
            return None;
        }
        search::choose_move(&self.board, self.side_to_move, rng)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        match self.outcome {
            Some(outcome) => writeln!(f, "Game over: {outcome}"),
            None => writeln!(f, "Turn: {}", self.side_to_move.name()),
        }
    }
}
