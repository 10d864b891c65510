//! Directional scanning: the one primitive both capture validation and
//! chain detection are built on.

use cornerjump_protocol::BOARD_SIZE;

use crate::square::Direction;
use crate::{Board, PieceKind, Square};

/// What a slider sees looking outward along one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Only empty squares until the edge of the board.
    NoTarget,
    /// The first occupied square holds a friendly piece or a Blocker.
    Blocked { at: Square },
    /// The first occupied square holds a capturable enemy piece.
    ///
    /// `landing` is where the capturer would end up: `mid` itself when
    /// `mid` is a corner, otherwise the square one step beyond, and
    /// `None` when that square is off the board or occupied.
    EnemyFound { mid: Square, landing: Option<Square> },
}

/// A capture available to the piece on some origin square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    /// The captured piece's square.
    pub mid: Square,
    /// Where the capturer lands. Equal to `mid` for a corner capture.
    pub landing: Square,
}

impl Capture {
    pub fn is_corner(&self) -> bool {
        self.mid.is_corner()
    }
}

/// Scans from `from` along `dir` on behalf of the piece standing on
/// `from`. Returns `NoTarget` for an empty origin.
pub fn scan(board: &Board, from: Square, dir: Direction) -> ScanOutcome {
    let Some(mover) = board.piece_at(from) else {
        return ScanOutcome::NoTarget;
    };

    for steps in 1..BOARD_SIZE as i32 {
        let Some(square) = from.step(dir, steps) else {
            break;
        };
        let Some(occupant) = board.piece_at(square) else {
            continue;
        };

        if occupant.side == mover.side || occupant.kind == PieceKind::Blocker {
            return ScanOutcome::Blocked { at: square };
        }

        let landing = if square.is_corner() {
            Some(square)
        } else {
            square
                .step(dir, 1)
                .filter(|beyond| board.is_empty(*beyond))
        };
        return ScanOutcome::EnemyFound {
            mid: square,
            landing,
        };
    }

    ScanOutcome::NoTarget
}

/// Every capture the piece on `from` can make, in the order of its
/// direction table.
pub fn captures_from(board: &Board, from: Square) -> Vec<Capture> {
    let Some(mover) = board.piece_at(from) else {
        return Vec::new();
    };

    mover
        .kind
        .capture_directions()
        .iter()
        .filter_map(|dir| match scan(board, from, *dir) {
            ScanOutcome::EnemyFound {
                mid,
                landing: Some(landing),
            } => Some(Capture { mid, landing }),
            _ => None,
        })
        .collect()
}

/// `true` if the piece on `from` has at least one capture.
pub fn has_capture(board: &Board, from: Square) -> bool {
    !captures_from(board, from).is_empty()
}
