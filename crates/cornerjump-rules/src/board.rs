//! The 8×8 grid.
//!
//! `Board` is pure data: it answers questions about squares and offers
//! two crate-private mutators that only the move applier calls. Rules
//! about which moves are legal live in [`crate::validate`].

use cornerjump_protocol::{BOARD_SIZE, BoardCodes, ProtocolError, Side};

use crate::{Piece, PieceKind, Square};

/// Back-row order, from column 0 to column 7, for both sides.
const BACK_ROW: [PieceKind; BOARD_SIZE] = [
    PieceKind::OrthogonalSlider,
    PieceKind::OrthogonalSlider,
    PieceKind::DiagonalSlider,
    PieceKind::OmniSlider,
    PieceKind::OmniSlider,
    PieceKind::DiagonalSlider,
    PieceKind::OrthogonalSlider,
    PieceKind::OrthogonalSlider,
];

/// Defender-row columns that hold a Blocker in the blocker variant.
const BLOCKER_COLUMNS: [usize; 2] = [2, 5];

/// An 8×8 grid of optional pieces. At most one piece per square holds by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// The starting layout.
    ///
    /// Second holds rows 0 (back) and 1 (Defenders); First holds rows 7
    /// (back) and 6 (Defenders). With `blockers_enabled`, two Defender
    /// slots per side become Blockers.
    pub fn standard(blockers_enabled: bool) -> Self {
        let mut board = Self::empty();
        for (side, back, front) in [(Side::Second, 0, 1), (Side::First, 7, 6)] {
            for (col, kind) in BACK_ROW.iter().enumerate() {
                board.cells[back][col] = Some(Piece::new(*kind, side));
                let front_kind = if blockers_enabled && BLOCKER_COLUMNS.contains(&col) {
                    PieceKind::Blocker
                } else {
                    PieceKind::Defender
                };
                board.cells[front][col] = Some(Piece::new(front_kind, side));
            }
        }
        board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells[square.row()][square.col()]
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    /// Number of attacker pieces (sliders) `side` still has.
    pub fn attacker_count(&self, side: Side) -> usize {
        self.pieces()
            .filter(|(_, piece)| piece.side == side && piece.kind.is_attacker())
            .count()
    }

    /// Every occupied square with its piece, row-major.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().enumerate().filter_map(move |(col, cell)| {
                let piece = (*cell)?;
                let square = Square::new(row as i32, col as i32)?;
                Some((square, piece))
            })
        })
    }

    /// Puts `piece` on `square`, returning whatever was there.
    pub(crate) fn place(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        self.cells[square.row()][square.col()].replace(piece)
    }

    /// Empties `square`, returning whatever was there.
    pub(crate) fn take(&mut self, square: Square) -> Option<Piece> {
        self.cells[square.row()][square.col()].take()
    }

    /// Wire encoding: one optional letter per square.
    pub fn to_codes(&self) -> BoardCodes {
        let mut codes = [[None; BOARD_SIZE]; BOARD_SIZE];
        for (square, piece) in self.pieces() {
            codes[square.row()][square.col()] = Some(piece.code());
        }
        codes
    }

    /// Parses the wire encoding.
    ///
    /// # Errors
    /// `ProtocolError::InvalidMessage` if any letter is not a piece code.
    pub fn from_codes(codes: &BoardCodes) -> Result<Self, ProtocolError> {
        let mut board = Self::empty();
        for (row, cells) in codes.iter().enumerate() {
            for (col, code) in cells.iter().enumerate() {
                if let Some(code) = code {
                    let piece = Piece::from_code(*code).ok_or_else(|| {
                        ProtocolError::InvalidMessage(format!(
                            "unknown piece code {code:?} at ({row}, {col})"
                        ))
                    })?;
                    board.cells[row][col] = Some(piece);
                }
            }
        }
        Ok(board)
    }

    /// Builds a board from eight text rows, `.` for an empty square.
    ///
    /// Handy for setting up positions:
    ///
    /// ```rust
    /// use cornerjump_rules::Board;
    ///
    /// let board = Board::from_rows([
    ///     "r.......",
    ///     "........",
    ///     "........",
    ///     "........",
    ///     "........",
    ///     "........",
    ///     "........",
    ///     ".......R",
    /// ])
    /// .unwrap();
    /// assert_eq!(board.pieces().count(), 2);
    /// ```
    ///
    /// # Errors
    /// `ProtocolError::InvalidMessage` on a row of the wrong length or an
    /// unknown letter.
    pub fn from_rows(rows: [&str; BOARD_SIZE]) -> Result<Self, ProtocolError> {
        let mut codes: BoardCodes = [[None; BOARD_SIZE]; BOARD_SIZE];
        for (row, text) in rows.iter().enumerate() {
            let chars: Vec<char> = text.chars().collect();
            if chars.len() != BOARD_SIZE {
                return Err(ProtocolError::InvalidMessage(format!(
                    "row {row} has {} squares, expected {BOARD_SIZE}",
                    chars.len()
                )));
            }
            for (col, ch) in chars.into_iter().enumerate() {
                codes[row][col] = (ch != '.').then_some(ch);
            }
        }
        Self::from_codes(&codes)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}
