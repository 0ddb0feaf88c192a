//! Decides whether a move is legal: per-kind movement shapes, screening
//! rules and the "flying generals" rule, which forbids leaving both Generals
//! on the same file with nothing between them.
//!
//! Everything here is a pure function of a [`Board`] snapshot. Legality is
//! total: empty origins, captures of own pieces and malformed moves are all
//! simply `false`. Whose turn it is and whether the game has ended is tracked
//! by [`crate::session::GameSession`].

use arrayvec::ArrayVec;

use crate::rules::board::Board;
use crate::rules::core::{Move, Piece, PieceKind, Player, Square, BOARD_HEIGHT, BOARD_WIDTH};

/// Upper bound of shape-compatible destinations of a single piece: a Rook or
/// a Cannon reaches every other cell of its rank and file.
const MAX_TARGETS: usize = (BOARD_WIDTH - 1) as usize + (BOARD_HEIGHT - 1) as usize;

const ORTHOGONAL_STEPS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL_STEPS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ELEPHANT_STEPS: [(i32, i32); 4] = [(-2, -2), (-2, 2), (2, -2), (2, 2)];
const HORSE_STEPS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (2, -1),
    (2, 1),
    (-1, -2),
    (1, -2),
    (-1, 2),
    (1, 2),
];

/// Checks whether `mv` is legal for the owner of the piece standing on its
/// origin.
///
/// ```
/// use xiangqi::rules::board::Board;
/// use xiangqi::rules::core::Move;
/// use xiangqi::rules::legality::is_valid_move;
///
/// let board = Board::new();
/// // Central cannon opening.
/// assert!(is_valid_move(&board, Move::from_iccs("h2e2").unwrap()));
/// // Rooks can not jump over the soldier in front of them.
/// assert!(!is_valid_move(&board, Move::from_iccs("a0a5").unwrap()));
/// ```
#[must_use]
pub fn is_valid_move(board: &Board, mv: Move) -> bool {
    let Some(piece) = board.at(mv.from) else {
        return false;
    };
    if mv.from == mv.to {
        return false;
    }
    let target = board.at(mv.to);
    if target.is_some_and(|target| target.owner == piece.owner) {
        return false;
    }
    follows_movement_rules(board, piece, mv, target.is_some()) && !leaves_generals_facing(board, mv)
}

fn follows_movement_rules(board: &Board, piece: Piece, mv: Move, capture: bool) -> bool {
    let (row_delta, col_delta) = (mv.row_delta(), mv.col_delta());
    let (rows, cols) = (row_delta.abs(), col_delta.abs());
    match piece.kind {
        PieceKind::General => rows + cols == 1 && mv.to.in_palace(piece.owner),
        PieceKind::Advisor => rows == 1 && cols == 1 && mv.to.in_palace(piece.owner),
        PieceKind::Elephant => {
            rows == 2
                && cols == 2
                && mv.to.on_own_side(piece.owner)
                && is_vacant(board, mv.from.offset(row_delta / 2, col_delta / 2))
        },
        PieceKind::Horse => match (rows, cols) {
            (2, 1) => is_vacant(board, mv.from.offset(row_delta / 2, 0)),
            (1, 2) => is_vacant(board, mv.from.offset(0, col_delta / 2)),
            _ => false,
        },
        PieceKind::Rook => shares_line(mv) && count_between(board, mv.from, mv.to) == 0,
        PieceKind::Cannon => {
            // Captures jump over exactly one screen, quiet moves need a clear
            // path.
            shares_line(mv) && count_between(board, mv.from, mv.to) == usize::from(capture)
        },
        PieceKind::Soldier => {
            let forward = row_delta == piece.owner.forward() && col_delta == 0;
            let crossed_river = !mv.from.on_own_side(piece.owner);
            forward || (crossed_river && row_delta == 0 && cols == 1)
        },
    }
}

fn is_vacant(board: &Board, square: Option<Square>) -> bool {
    square.is_some_and(|square| board.at(square).is_none())
}

const fn shares_line(mv: Move) -> bool {
    mv.from.row() == mv.to.row() || mv.from.col() == mv.to.col()
}

/// Counts occupied cells strictly between two squares sharing a rank or a
/// file.
#[must_use]
pub fn count_between(board: &Board, a: Square, b: Square) -> usize {
    debug_assert!(
        a.row() == b.row() || a.col() == b.col(),
        "{a} and {b} do not share a rank or a file"
    );
    let between = |x: u8, y: u8| (x.min(y) + 1)..x.max(y);
    if a.row() == b.row() {
        between(a.col(), b.col())
            .filter(|&col| board.at(Square::from_parts(a.row(), col)).is_some())
            .count()
    } else {
        between(a.row(), b.row())
            .filter(|&row| board.at(Square::from_parts(row, a.col())).is_some())
            .count()
    }
}

/// Whether both Generals are on the board, on the same file and with no
/// piece between them.
#[must_use]
pub fn generals_facing(board: &Board) -> bool {
    match (board.general(Player::Red), board.general(Player::Black)) {
        (Some(red), Some(black)) => red.col() == black.col() && count_between(board, red, black) == 0,
        _ => false,
    }
}

/// Plays the move on a scratch copy of the board. The copy never escapes this
/// function.
fn leaves_generals_facing(board: &Board, mv: Move) -> bool {
    let mut scratch = *board;
    if let Some(piece) = scratch.remove(mv.from) {
        let _ = scratch.place(mv.to, piece);
    }
    generals_facing(&scratch)
}

/// Squares a piece could reach judging by its movement shape alone. Every
/// legal destination is among them.
fn candidate_targets(piece: Piece, from: Square) -> ArrayVec<Square, MAX_TARGETS> {
    let steps: &[(i32, i32)] = match piece.kind {
        PieceKind::General | PieceKind::Soldier => &ORTHOGONAL_STEPS,
        PieceKind::Advisor => &DIAGONAL_STEPS,
        PieceKind::Elephant => &ELEPHANT_STEPS,
        PieceKind::Horse => &HORSE_STEPS,
        PieceKind::Rook | PieceKind::Cannon => {
            return Square::iter()
                .filter(|square| (square.row() == from.row()) != (square.col() == from.col()))
                .collect();
        },
    };
    steps
        .iter()
        .filter_map(|&(row_delta, col_delta)| from.offset(row_delta, col_delta))
        .collect()
}

/// Calculates all legal moves of `side`'s pieces, ordered by origin square
/// (row-major) and then by the piece's movement pattern.
#[must_use]
pub fn legal_moves(board: &Board, side: Player) -> Vec<Move> {
    board
        .pieces()
        .filter(|&(_, piece)| piece.owner == side)
        .flat_map(|(from, piece)| {
            candidate_targets(piece, from)
                .into_iter()
                .map(move |to| Move::new(from, to))
        })
        .filter(|&mv| is_valid_move(board, mv))
        .collect()
}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use super::*;

    fn legal(board: &Board, from: (i32, i32), to: (i32, i32)) -> bool {
        is_valid_move(board, Move::from_coords(from.0, from.1, to.0, to.1).unwrap())
    }

    #[test]
    fn between() {
        let board = Board::new();
        let square = |row, col| Square::new(row, col).unwrap();
        // Black horse and cannon's file.
        assert_eq!(count_between(&board, square(0, 1), square(9, 1)), 2);
        assert_eq!(count_between(&board, square(9, 1), square(0, 1)), 2);
        assert_eq!(count_between(&board, square(0, 0), square(0, 8)), 7);
        assert_eq!(count_between(&board, square(0, 0), square(0, 1)), 0);
        assert_eq!(count_between(&board, square(4, 0), square(4, 8)), 0);
    }

    #[test]
    fn generals() {
        let board = Board::new();
        // Own advisor on the side, empty cell in front.
        assert!(!legal(&board, (0, 4), (0, 3)));
        assert!(legal(&board, (0, 4), (1, 4)));

        let board = Board::from_fen("5k3/9/9/9/9/9/9/3K5/9/9").unwrap();
        assert!(legal(&board, (7, 3), (8, 3)));
        assert!(legal(&board, (7, 3), (7, 4)));
        // Out of the palace.
        assert!(!legal(&board, (7, 3), (6, 3)));
        assert!(!legal(&board, (7, 3), (7, 2)));
        // Not a single orthogonal step.
        assert!(!legal(&board, (7, 3), (8, 4)));
        assert!(!legal(&board, (7, 3), (9, 3)));
    }

    #[test]
    fn advisors() {
        let board = Board::new();
        assert!(legal(&board, (9, 3), (8, 4)));
        assert!(!legal(&board, (9, 3), (8, 2)));
        assert!(!legal(&board, (9, 3), (8, 3)));
        assert!(legal(&board, (0, 5), (1, 4)));
        assert!(!legal(&board, (0, 5), (1, 6)));
    }

    #[test]
    fn elephants() {
        let mut board = Board::from_fen("3k5/9/9/9/9/9/9/9/9/2B1K4").unwrap();
        assert!(legal(&board, (9, 2), (7, 0)));
        assert!(legal(&board, (9, 2), (7, 4)));
        assert!(!legal(&board, (9, 2), (8, 3)));
        // Blocked "eye".
        let _ = board.place(
            Square::new(8, 3).unwrap(),
            Piece::new(Player::Red, PieceKind::Soldier),
        );
        assert!(!legal(&board, (9, 2), (7, 4)));
        assert!(legal(&board, (9, 2), (7, 0)));

        // Elephants never cross the river.
        let board = Board::from_fen("3k5/9/9/9/9/6B2/9/9/9/4K4").unwrap();
        assert!(!legal(&board, (5, 6), (3, 4)));
        assert!(legal(&board, (5, 6), (7, 4)));
        let board = Board::from_fen("3k5/9/9/9/2b6/9/9/9/9/4K4").unwrap();
        assert!(!legal(&board, (4, 2), (6, 4)));
        assert!(legal(&board, (4, 2), (2, 0)));
    }

    #[test]
    fn horses() {
        let mut board = Board::from_fen("3k5/9/9/9/9/5N3/9/9/9/4K4").unwrap();
        assert!(legal(&board, (5, 5), (3, 4)));
        assert!(legal(&board, (5, 5), (3, 6)));
        assert!(legal(&board, (5, 5), (4, 7)));
        assert!(!legal(&board, (5, 5), (3, 3)));
        assert!(!legal(&board, (5, 5), (4, 5)));
        // Hobbling the horse's leg blocks both moves in that direction.
        let _ = board.place(
            Square::new(4, 5).unwrap(),
            Piece::new(Player::Black, PieceKind::Soldier),
        );
        assert!(!legal(&board, (5, 5), (3, 4)));
        assert!(!legal(&board, (5, 5), (3, 6)));
        assert!(legal(&board, (5, 5), (4, 7)));
        assert!(legal(&board, (5, 5), (7, 4)));
    }

    #[test]
    fn soldiers() {
        let board = Board::from_fen("3k5/9/9/9/4P4/9/4P4/9/9/5K3").unwrap();
        // Before crossing the river: forward only.
        assert!(legal(&board, (6, 4), (5, 4)));
        assert!(!legal(&board, (6, 4), (6, 3)));
        assert!(!legal(&board, (6, 4), (7, 4)));
        // After crossing: sideways too, never backwards.
        assert!(legal(&board, (4, 4), (3, 4)));
        assert!(legal(&board, (4, 4), (4, 3)));
        assert!(legal(&board, (4, 4), (4, 5)));
        assert!(!legal(&board, (4, 4), (5, 4)));
        assert!(!legal(&board, (4, 4), (3, 3)));

        let board = Board::from_fen("3k5/9/9/9/p8/8p/9/9/9/5K3").unwrap();
        assert!(legal(&board, (4, 0), (5, 0)));
        assert!(!legal(&board, (4, 0), (4, 1)));
        assert!(legal(&board, (5, 8), (5, 7)));
        assert!(legal(&board, (5, 8), (6, 8)));
        assert!(!legal(&board, (5, 8), (4, 8)));
    }

    #[test]
    fn own_pieces() {
        let board = Board::new();
        assert!(!legal(&board, (9, 0), (9, 1)));
        assert!(!legal(&board, (9, 0), (6, 0)));
        // Nothing to move.
        assert!(!legal(&board, (5, 5), (4, 5)));
        // Staying in place.
        assert!(!legal(&board, (6, 0), (6, 0)));
    }

    #[test]
    fn facing_generals() {
        assert!(generals_facing(&Board::from_fen("4k4/9/9/9/9/9/9/9/9/4K4").unwrap()));
        assert!(!generals_facing(&Board::new()));
        assert!(!generals_facing(&Board::from_fen("3k5/9/9/9/9/9/9/9/9/4K4").unwrap()));
        assert!(!generals_facing(&Board::from_fen("9/9/9/9/9/9/9/9/9/4K4").unwrap()));
    }

    #[test]
    fn legal_moves_match_all_pairs() {
        for fen in [
            "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR",
            "r1bakab1r/9/1cn3nc1/p1p1p1p1p/9/9/P1P1P1P1P/1CN3NC1/9/R1BAKAB1R",
            "3k5/4P4/9/2c6/9/9/4R4/9/4A4/3K5",
            "4k4/9/9/9/9/4R4/9/9/9/4K4",
        ] {
            let board = Board::from_fen(fen).unwrap();
            for side in [Player::Red, Player::Black] {
                let brute_force = Square::iter()
                    .cartesian_product(Square::iter().collect_vec())
                    .map(|(from, to)| Move::new(from, to))
                    .filter(|&mv| board.at(mv.from).is_some_and(|piece| piece.owner == side))
                    .filter(|&mv| is_valid_move(&board, mv))
                    .sorted_by_key(|mv| (mv.from, mv.to))
                    .collect_vec();
                let generated = legal_moves(&board, side)
                    .into_iter()
                    .sorted_by_key(|mv| (mv.from, mv.to))
                    .collect_vec();
                assert_eq!(generated, brute_force, "{fen} {side}");
            }
        }
    }

    #[test]
    fn starting_moves() {
        // Rooks 4, horses 4, elephants 4, advisors 2, general 1, cannons 24
        // (including two captures over a screen) and soldiers 5.
        assert_eq!(legal_moves(&Board::new(), Player::Red).len(), 44);
        assert_eq!(legal_moves(&Board::new(), Player::Black).len(), 44);
    }
}
