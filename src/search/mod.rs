//! Automated move selection.
//!
//! The automated player is a one-ply greedy evaluator: every legal move is
//! scored by the value of the piece it captures and one of the best-scoring
//! moves is picked at random. Opponent replies are never considered.
//!
//! The random source is injected by the caller, so seeding it makes the
//! choice reproducible.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::evaluation::material::capture_value;
use crate::evaluation::Value;
use crate::rules::board::Board;
use crate::rules::core::{Move, Player};
use crate::rules::legality::legal_moves;

/// Legal moves sharing the highest capture value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidates {
    /// Value of the piece each of the moves captures, 0 for quiet moves.
    pub value: Value,
    /// Never empty.
    pub moves: Vec<Move>,
}

/// Ranks `side`'s legal moves by capture value. Ties accumulate, a strictly
/// higher value replaces the candidates collected so far.
///
/// Returns `None` when `side` has no legal move.
#[must_use]
pub fn best_captures(board: &Board, side: Player) -> Option<Candidates> {
    let mut best: Option<Candidates> = None;
    for mv in legal_moves(board, side) {
        let value = capture_value(board, mv);
        match best.as_mut() {
            Some(current) if value < current.value => {},
            Some(current) if value == current.value => current.moves.push(mv),
            _ => {
                best = Some(Candidates {
                    value,
                    moves: vec![mv],
                });
            },
        }
    }
    best
}

/// Picks one of the best capturing moves for `side` uniformly at random.
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use xiangqi::rules::board::Board;
/// use xiangqi::rules::core::Player;
/// use xiangqi::search::choose_move;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
/// assert!(choose_move(&Board::new(), Player::Red, &mut rng).is_some());
/// ```
pub fn choose_move<R: Rng + ?Sized>(board: &Board, side: Player, rng: &mut R) -> Option<Move> {
    best_captures(board, side)?.moves.choose(rng).copied()
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn opening_captures() {
        // Both cannons can take a horse over their own screens.
        let candidates = best_captures(&Board::new(), Player::Red).unwrap();
        assert_eq!(candidates.value, 45);
        assert_eq!(
            candidates.moves,
            vec![
                Move::from_iccs("b2b9").unwrap(),
                Move::from_iccs("h2h9").unwrap()
            ]
        );
    }

    #[test]
    fn general_capture_wins_over_everything() {
        let board = Board::from_fen("4k4/9/9/9/9/8R/9/9/9/3K4r").unwrap();
        let candidates = best_captures(&board, Player::Black).unwrap();
        assert_eq!(candidates.value, 10_000);
        assert_eq!(candidates.moves, vec![Move::from_coords(9, 8, 9, 3).unwrap()]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            choose_move(&board, Player::Black, &mut rng),
            Move::from_coords(9, 8, 9, 3).ok()
        );
    }

    #[test]
    fn quiet_position() {
        let board = Board::from_fen("3k5/9/9/9/9/9/9/9/9/4K4").unwrap();
        let candidates = best_captures(&board, Player::Red).unwrap();
        assert_eq!(candidates.value, 0);
        // Stepping onto file 3 would face the black general.
        assert_eq!(
            candidates.moves,
            vec![
                Move::from_coords(9, 4, 8, 4).unwrap(),
                Move::from_coords(9, 4, 9, 5).unwrap()
            ]
        );
    }

    #[test]
    fn no_moves() {
        let board = Board::from_fen("3kr4/9/9/9/9/9/9/9/9/3K5").unwrap();
        assert_eq!(best_captures(&board, Player::Black), None);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(choose_move(&board, Player::Black, &mut rng), None);
    }
}
