//! Fixed piece valuations used to rank captures.
//!
//! The General's value dwarfs everything else so that capturing it is always
//! preferred; the remaining values follow the traditional ordering of Rook,
//! Cannon, Horse, then Elephant and Advisor, then Soldier.

use crate::evaluation::Value;
use crate::rules::board::Board;
use crate::rules::core::{Move, PieceKind, Player};

const GENERAL_VALUE: Value = 10_000;
const ROOK_VALUE: Value = 100;
const CANNON_VALUE: Value = 50;
const HORSE_VALUE: Value = 45;
const ELEPHANT_VALUE: Value = 20;
const ADVISOR_VALUE: Value = 20;
const SOLDIER_VALUE: Value = 10;

#[allow(missing_docs)]
#[must_use]
pub const fn piece_value(kind: PieceKind) -> Value {
    match kind {
        PieceKind::General => GENERAL_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Cannon => CANNON_VALUE,
        PieceKind::Horse => HORSE_VALUE,
        PieceKind::Elephant => ELEPHANT_VALUE,
        PieceKind::Advisor => ADVISOR_VALUE,
        PieceKind::Soldier => SOLDIER_VALUE,
    }
}

/// Value of the piece `mv` would capture, 0 for quiet moves.
#[must_use]
pub fn capture_value(board: &Board, mv: Move) -> Value {
    board.at(mv.to).map_or(0, |piece| piece_value(piece.kind))
}

/// Material of `side` minus the material of its opponent.
#[must_use]
pub fn material_balance(board: &Board, side: Player) -> Value {
    board
        .pieces()
        .map(|(_, piece)| {
            let value = piece_value(piece.kind);
            if piece.owner == side {
                value
            } else {
                -value
            }
        })
        .sum()
}
