//! The 10×9 grid of cells a Xiangqi game is played on.
//!
//! [`Board`] only stores pieces: it knows nothing about the side to move or
//! whether the game is over (see [`crate::session::GameSession`]) and does
//! not validate the moves applied to it (see [`crate::rules::legality`]).

use std::fmt;

use anyhow::{bail, Context};
use itertools::Itertools;

use crate::rules::core::{OutOfRange, Piece, PieceKind, Player, Square, BOARD_HEIGHT, BOARD_WIDTH};

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// Traditional starting layout, Black's back rank first. Side attribution of
/// every piece comes from its glyph; `.` marks an empty cell.
const STARTING_LAYOUT: [&str; HEIGHT] = [
    "車馬象士將士象馬車",
    ".........",
    ".砲.....砲.",
    "卒.卒.卒.卒.卒",
    ".........",
    ".........",
    "兵.兵.兵.兵.兵",
    ".炮.....炮.",
    ".........",
    "俥傌相仕帥仕相傌俥",
];

/// Piece placement on the board: at most one piece per cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Piece>; WIDTH]; HEIGHT],
}

impl Board {
    /// Creates the board with the starting layout.
    ///
    /// ```
    /// use xiangqi::rules::board::Board;
    ///
    /// let board = Board::new();
    /// assert_eq!(board.pieces().count(), 32);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup();
        board
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            cells: [[None; WIDTH]; HEIGHT],
        }
    }

    /// Clears the board and places the 32 pieces of the starting layout.
    pub fn setup(&mut self) {
        *self = Self::empty();
        let glyphs = STARTING_LAYOUT.iter().flat_map(|rank| rank.chars());
        for (square, glyph) in Square::iter().zip(glyphs) {
            *self.cell_mut(square) = Piece::from_glyph(glyph);
        }
    }

    /// Returns the piece at the given coordinates, if any.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] if the coordinates are outside of the board.
    pub fn get(&self, row: i32, col: i32) -> Result<Option<Piece>, OutOfRange> {
        Ok(self.at(Square::new(row, col)?))
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn at(&self, square: Square) -> Option<Piece> {
        self.cells[square.row() as usize][square.col() as usize]
    }

    /// Puts `piece` on `square` and returns the piece it replaced.
    pub fn place(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        self.cell_mut(square).replace(piece)
    }

    /// Clears `square` and returns the piece that was there.
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        self.cell_mut(square).take()
    }

    fn cell_mut(&mut self, square: Square) -> &mut Option<Piece> {
        &mut self.cells[usize::from(square.row())][usize::from(square.col())]
    }

    /// Iterates over occupied squares in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.at(square).map(|piece| (square, piece)))
    }

    /// Location of `owner`'s General, `None` once it has been captured.
    #[must_use]
    pub fn general(&self, owner: Player) -> Option<Square> {
        let general = Piece::new(owner, PieceKind::General);
        self.pieces()
            .find(|&(_, piece)| piece == general)
            .map(|(square, _)| square)
    }

    /// Parses the piece placement part of a position: ranks from Black's back
    /// rank to Red's separated by `/`, digits for runs of empty cells,
    /// uppercase letters for Red pieces and lowercase for Black.
    ///
    /// # Errors
    ///
    /// Returns an error if the placement is malformed, a side has more than
    /// one General or a General stands outside of its palace.
    pub fn from_fen(placement: &str) -> anyhow::Result<Self> {
        let ranks = placement.trim().split('/').collect_vec();
        if ranks.len() != HEIGHT {
            bail!("expected {HEIGHT} ranks, got {}", ranks.len());
        }
        let mut board = Self::empty();
        for (row, rank) in ranks.iter().enumerate() {
            let mut col = 0;
            for symbol in rank.chars() {
                if let Some(run) = symbol.to_digit(10) {
                    col += run as usize;
                    continue;
                }
                if col >= WIDTH {
                    bail!("rank {row} describes more than {WIDTH} files: \"{rank}\"");
                }
                board.cells[row][col] = Some(
                    Piece::try_from(symbol).with_context(|| format!("rank {row}: \"{rank}\""))?,
                );
                col += 1;
            }
            if col != WIDTH {
                bail!("rank {row} should describe {WIDTH} files, got {col}: \"{rank}\"");
            }
        }
        board.validate()?;
        Ok(board)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for owner in [Player::Red, Player::Black] {
            let generals = self
                .pieces()
                .filter(|&(_, piece)| piece == Piece::new(owner, PieceKind::General))
                .map(|(square, _)| square)
                .collect_vec();
            if generals.len() > 1 {
                bail!(
                    "expected at most 1 {} general, got {}",
                    owner.name(),
                    generals.len()
                );
            }
            if let Some(square) = generals.first() {
                if !square.in_palace(owner) {
                    bail!("{} general should be inside its palace, got {square}", owner.name());
                }
            }
        }
        Ok(())
    }

    /// Serializes the piece placement in the format accepted by
    /// [`Board::from_fen`].
    #[must_use]
    pub fn fen(&self) -> String {
        self.cells
            .iter()
            .map(|rank| {
                rank.iter()
                    .chunk_by(|cell| cell.is_some())
                    .into_iter()
                    .map(|(occupied, cells)| {
                        if occupied {
                            cells.flatten().map(ToString::to_string).collect::<String>()
                        } else {
                            cells.count().to_string()
                        }
                    })
                    .collect::<String>()
            })
            .join("/")
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    /// Renders the board with glyphs, row indices on the left and column
    /// indices on top. Empty cells are shown as `.`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  {}", (0..WIDTH).map(|col| format!("{col} ")).join(" "))?;
        for (row, rank) in self.cells.iter().enumerate() {
            let cells = rank
                .iter()
                .map(|cell| match cell {
                    Some(piece) => piece.glyph().to_string(),
                    None => ". ".to_string(),
                })
                .join(" ");
            writeln!(f, "{row} {cells}")?;
        }
        Ok(())
    }
}
