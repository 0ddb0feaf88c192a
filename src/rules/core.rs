//! Xiangqi primitives commonly used within [`crate::rules`].

use std::fmt::{self, Write};
use std::ops::Not;

use anyhow::bail;
use itertools::iproduct;

/// Number of files (columns) on the board.
pub const BOARD_WIDTH: u8 = 9;
/// Number of ranks (rows) on the board.
pub const BOARD_HEIGHT: u8 = 10;

/// Coordinates that do not address a cell of the board.
///
/// This is the only failure that is signalled as a distinct error instead of
/// a boolean outcome: it indicates a caller bug, not a game-rule outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutOfRange {
    #[allow(missing_docs)]
    pub row: i32,
    #[allow(missing_docs)]
    pub col: i32,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "square (row {}, column {}) is out of range: rows are 0..{BOARD_HEIGHT} and columns are 0..{BOARD_WIDTH}",
            self.row, self.col
        )
    }
}

impl std::error::Error for OutOfRange {}

/// An intersection of the board. Row 0 is Black's back rank and row 9 is
/// Red's back rank; columns go from 0 to 8 left to right as seen by Red.
///
/// In text form squares use ICCS coordinates: a file letter `a`..=`i` followed
/// by a rank digit counted from Red's side (row 9 is rank `0`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Creates a square from zero-based coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] if `row` is not in `0..10` or `col` is not in
    /// `0..9`.
    pub fn new(row: i32, col: i32) -> Result<Self, OutOfRange> {
        match (u8::try_from(row), u8::try_from(col)) {
            (Ok(r), Ok(c)) if r < BOARD_HEIGHT && c < BOARD_WIDTH => Ok(Self { row: r, col: c }),
            _ => Err(OutOfRange { row, col }),
        }
    }

    pub(crate) const fn from_parts(row: u8, col: u8) -> Self {
        debug_assert!(row < BOARD_HEIGHT && col < BOARD_WIDTH);
        Self { row, col }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Returns the square shifted by the given deltas or `None` if it would
    /// leave the board.
    #[must_use]
    pub fn offset(self, row_delta: i32, col_delta: i32) -> Option<Self> {
        Self::new(
            i32::from(self.row) + row_delta,
            i32::from(self.col) + col_delta,
        )
        .ok()
    }

    /// Iterates over all squares in row-major order, starting from Black's
    /// back rank.
    pub fn iter() -> impl Iterator<Item = Self> {
        iproduct!(0..BOARD_HEIGHT, 0..BOARD_WIDTH).map(|(row, col)| Self { row, col })
    }

    /// Whether the square is on `player`'s side of the river (rows 5..=9 for
    /// Red, 0..=4 for Black).
    #[must_use]
    pub const fn on_own_side(self, player: Player) -> bool {
        match player {
            Player::Red => self.row >= 5,
            Player::Black => self.row <= 4,
        }
    }

    /// Whether the square is inside `player`'s palace: files 3..=5 and the
    /// three ranks closest to the player.
    #[must_use]
    pub const fn in_palace(self, player: Player) -> bool {
        let file_inside = self.col >= 3 && self.col <= 5;
        file_inside
            && match player {
                Player::Red => self.row >= 7,
                Player::Black => self.row <= 2,
            }
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let mut chars = square.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("square should be two characters (file and rank), got \"{square}\"");
        };
        let col = match file {
            'a'..='i' => file as u8 - b'a',
            _ => bail!("file should be within 'a'..='i', got '{file}'"),
        };
        let rank = match rank {
            '0'..='9' => rank as u8 - b'0',
            _ => bail!("rank should be within '0'..='9', got '{rank}'"),
        };
        Ok(Self {
            row: BOARD_HEIGHT - 1 - rank,
            col,
        })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + self.col) as char)?;
        write!(f, "{}", BOARD_HEIGHT - 1 - self.row)
    }
}

/// Xiangqi is played between Red (moving first, from rows 5..=9) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    Red,
    Black,
}

impl Player {
    /// "Flips" the side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }

    /// Row delta of a single step forward: Red advances toward row 0, Black
    /// toward row 9.
    #[must_use]
    pub const fn forward(self) -> i32 {
        match self {
            Self::Red => -1,
            Self::Black => 1,
        }
    }

    /// Human-readable name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Black => "black",
        }
    }
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" | "r" => Ok(Self::Red),
            "b" => Ok(Self::Black),
            _ => bail!("player should be 'w', 'r' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    /// Serializes the side the way position notation does: `w` for Red and
    /// `b` for Black.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self {
            Self::Red => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [Xiangqi pieces].
///
/// [Xiangqi pieces]: https://en.wikipedia.org/wiki/Xiangqi#Pieces
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    General,
    Advisor,
    Elephant,
    Horse,
    Rook,
    Cannon,
    Soldier,
}

impl PieceKind {
    #[allow(missing_docs)]
    pub const ALL: [Self; 7] = [
        Self::General,
        Self::Advisor,
        Self::Elephant,
        Self::Horse,
        Self::Rook,
        Self::Cannon,
        Self::Soldier,
    ];
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self {
            Self::General => 'k',
            Self::Advisor => 'a',
            Self::Elephant => 'b',
            Self::Horse => 'n',
            Self::Rook => 'r',
            Self::Cannon => 'c',
            Self::Soldier => 'p',
        })
    }
}

/// A piece owned by a player. Pieces have no identity beyond their kind and
/// owner: two pieces of the same kind and owner are interchangeable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl Piece {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(owner: Player, kind: PieceKind) -> Self {
        Self { owner, kind }
    }

    /// Traditional character for the piece. Red and Black use disjoint
    /// character sets, so the glyph alone identifies both kind and owner.
    #[must_use]
    pub const fn glyph(self) -> char {
        match (self.owner, self.kind) {
            (Player::Red, PieceKind::General) => '帥',
            (Player::Red, PieceKind::Advisor) => '仕',
            (Player::Red, PieceKind::Elephant) => '相',
            (Player::Red, PieceKind::Horse) => '傌',
            (Player::Red, PieceKind::Rook) => '俥',
            (Player::Red, PieceKind::Cannon) => '炮',
            (Player::Red, PieceKind::Soldier) => '兵',
            (Player::Black, PieceKind::General) => '將',
            (Player::Black, PieceKind::Advisor) => '士',
            (Player::Black, PieceKind::Elephant) => '象',
            (Player::Black, PieceKind::Horse) => '馬',
            (Player::Black, PieceKind::Rook) => '車',
            (Player::Black, PieceKind::Cannon) => '砲',
            (Player::Black, PieceKind::Soldier) => '卒',
        }
    }

    /// Inverse of [`Piece::glyph`]; `None` for characters outside both sets.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        let (owner, kind) = match glyph {
            '帥' => (Player::Red, PieceKind::General),
            '仕' => (Player::Red, PieceKind::Advisor),
            '相' => (Player::Red, PieceKind::Elephant),
            '傌' => (Player::Red, PieceKind::Horse),
            '俥' => (Player::Red, PieceKind::Rook),
            '炮' => (Player::Red, PieceKind::Cannon),
            '兵' => (Player::Red, PieceKind::Soldier),
            '將' => (Player::Black, PieceKind::General),
            '士' => (Player::Black, PieceKind::Advisor),
            '象' => (Player::Black, PieceKind::Elephant),
            '馬' => (Player::Black, PieceKind::Horse),
            '車' => (Player::Black, PieceKind::Rook),
            '砲' => (Player::Black, PieceKind::Cannon),
            '卒' => (Player::Black, PieceKind::Soldier),
            _ => return None,
        };
        Some(Self::new(owner, kind))
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    /// Parses a position notation letter: uppercase for Red, lowercase for
    /// Black.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let owner = if symbol.is_ascii_uppercase() {
            Player::Red
        } else {
            Player::Black
        };
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::General,
            'a' => PieceKind::Advisor,
            'b' => PieceKind::Elephant,
            'n' => PieceKind::Horse,
            'r' => PieceKind::Rook,
            'c' => PieceKind::Cannon,
            'p' => PieceKind::Soldier,
            _ => bail!("piece symbol should be within \"KABNRCPkabnrcp\", got '{symbol}'"),
        };
        Ok(Self::new(owner, kind))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner {
            Player::Red => write!(f, "{}", self.kind.to_string().to_ascii_uppercase()),
            Player::Black => write!(f, "{}", self.kind),
        }
    }
}

/// Relocation of a piece from one square to another. Whether it is legal
/// depends on the board it is played on, see
/// [`crate::rules::legality::is_valid_move`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    #[allow(missing_docs)]
    pub from: Square,
    #[allow(missing_docs)]
    pub to: Square,
}

impl Move {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// Creates a move from raw zero-based coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] for the first coordinate pair that does not
    /// address a cell.
    pub fn from_coords(
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    ) -> Result<Self, OutOfRange> {
        Ok(Self::new(
            Square::new(from_row, from_col)?,
            Square::new(to_row, to_col)?,
        ))
    }

    /// Parses a move in ICCS coordinates, e.g. `h2e2`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not two valid squares.
    pub fn from_iccs(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        if !input.is_ascii() || input.len() != 4 {
            bail!("move should be four characters like \"h2e2\", got \"{input}\"");
        }
        Ok(Self::new(
            Square::try_from(&input[..2])?,
            Square::try_from(&input[2..])?,
        ))
    }

    /// Signed row distance travelled (`to.row - from.row`).
    #[must_use]
    pub fn row_delta(self) -> i32 {
        i32::from(self.to.row()) - i32::from(self.from.row())
    }

    /// Signed column distance travelled (`to.col - from.col`).
    #[must_use]
    pub fn col_delta(self) -> i32 {
        i32::from(self.to.col()) - i32::from(self.from.col())
    }
}

impl fmt::Display for Move {
    /// Serializes a move in ICCS coordinates.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn glyphs_round_trip() {
        let mut glyphs = Vec::new();
        for owner in [Player::Red, Player::Black] {
            for kind in PieceKind::ALL {
                let piece = Piece::new(owner, kind);
                assert_eq!(Piece::from_glyph(piece.glyph()), Some(piece));
                glyphs.push(piece.glyph());
            }
        }
        glyphs.sort_unstable();
        glyphs.dedup();
        assert_eq!(glyphs.len(), 14);
        assert_eq!(Piece::from_glyph('x'), None);
    }

    #[test]
    fn symbols() {
        assert_eq!(
            "KABNRCPkabnrcp"
                .chars()
                .map(|symbol| Piece::try_from(symbol).unwrap().to_string())
                .collect::<String>(),
            "KABNRCPkabnrcp"
        );
        assert_eq!(
            Piece::try_from('N').unwrap(),
            Piece::new(Player::Red, PieceKind::Horse)
        );
    }

    #[test]
    #[should_panic(expected = "piece symbol should be within \"KABNRCPkabnrcp\", got 'q'")]
    fn unknown_symbol() {
        let _ = Piece::try_from('q').unwrap();
    }

    #[test]
    fn square_bounds() {
        assert!(Square::new(0, 0).is_ok());
        assert!(Square::new(9, 8).is_ok());
        assert_eq!(Square::new(10, 0), Err(OutOfRange { row: 10, col: 0 }));
        assert_eq!(Square::new(0, 9), Err(OutOfRange { row: 0, col: 9 }));
        assert_eq!(Square::new(-1, 3), Err(OutOfRange { row: -1, col: 3 }));
        assert_eq!(Square::iter().count(), 90);
    }

    #[test]
    fn square_notation() {
        let square = Square::new(7, 7).unwrap();
        assert_eq!(square.to_string(), "h2");
        assert_eq!(Square::try_from("h2").unwrap(), square);
        assert_eq!(Square::try_from("a9").unwrap(), Square::new(0, 0).unwrap());
        assert_eq!(Square::try_from("i0").unwrap(), Square::new(9, 8).unwrap());
    }

    #[test]
    #[should_panic(expected = "file should be within 'a'..='i', got 'j'")]
    fn square_from_incorrect_file() {
        let _ = Square::try_from("j3").unwrap();
    }

    #[test]
    fn offsets() {
        let square = Square::new(0, 0).unwrap();
        assert_eq!(square.offset(1, 2), Square::new(1, 2).ok());
        assert_eq!(square.offset(-1, 0), None);
        assert_eq!(square.offset(0, 9), None);
    }

    #[test]
    fn palace_and_river() {
        assert!(Square::new(9, 4).unwrap().in_palace(Player::Red));
        assert!(!Square::new(9, 4).unwrap().in_palace(Player::Black));
        assert!(!Square::new(8, 6).unwrap().in_palace(Player::Red));
        assert!(Square::new(2, 3).unwrap().in_palace(Player::Black));
        assert!(Square::new(5, 0).unwrap().on_own_side(Player::Red));
        assert!(!Square::new(4, 0).unwrap().on_own_side(Player::Red));
        assert!(Square::new(4, 0).unwrap().on_own_side(Player::Black));
    }

    #[test]
    fn moves() {
        let mv = Move::from_iccs("h2e2").unwrap();
        assert_eq!(mv, Move::from_coords(7, 7, 7, 4).unwrap());
        assert_eq!(mv.to_string(), "h2e2");
        assert_eq!((mv.row_delta(), mv.col_delta()), (0, -3));
        assert_eq!(
            Move::from_coords(0, 0, 0, 12),
            Err(OutOfRange { row: 0, col: 12 })
        );
    }

    #[test]
    #[should_panic(expected = "move should be four characters like \"h2e2\", got \"h2e\"")]
    fn short_move() {
        let _ = Move::from_iccs("h2e").unwrap();
    }

    #[test]
    fn players() {
        assert_eq!(!Player::Red, Player::Black);
        assert_eq!(Player::try_from("r").unwrap(), Player::Red);
        assert_eq!(Player::try_from("w").unwrap(), Player::Red);
        assert_eq!(Player::try_from("b").unwrap(), Player::Black);
        assert!(Player::try_from("x").is_err());
        assert_eq!(Player::Black.to_string(), "b");
    }

    #[test]
    fn out_of_range_message() {
        assert_eq!(
            OutOfRange { row: 10, col: 2 }.to_string(),
            "square (row 10, column 2) is out of range: rows are 0..10 and columns are 0..9"
        );
    }
}
