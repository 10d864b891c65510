//! Why a move was refused.

use cornerjump_protocol::{Coord, ErrorCode, Side};

use crate::Square;

/// A rejected move. The game state is untouched whenever one of these
/// is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("the game has already ended")]
    GameEnded,

    #[error("square {0} is off the board")]
    OutOfBounds(Coord),

    #[error("no piece on {0}")]
    PieceNotFound(Square),

    #[error("the piece on {0} belongs to the other side")]
    NotYourPiece(Square),

    /// Carries the side whose turn it actually is.
    #[error("it is {0}'s turn")]
    NotYourTurn(Side),

    /// A capture chain is active and must continue from the anchor.
    #[error("the capture chain must continue from {0}")]
    ChainRequired(Square),

    #[error("a capture chain is active; this move must capture")]
    CaptureRequired,

    #[error("destination {0} is occupied")]
    DestOccupied(Square),

    #[error("the piece on {from} cannot move to {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("no capture from {from} lands on {to}")]
    IllegalCapture { from: Square, to: Square },

    #[error("claimed capture on {claimed}, but this move captures {actual}")]
    CaptureMismatch { claimed: Coord, actual: Square },
}

impl Rejection {
    /// The wire code for this rejection.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::GameEnded => ErrorCode::GameEnded,
            Self::OutOfBounds(_) => ErrorCode::OutOfBounds,
            Self::PieceNotFound(_) => ErrorCode::PieceNotFound,
            Self::NotYourPiece(_) => ErrorCode::NotYourPiece,
            Self::NotYourTurn(_) => ErrorCode::NotYourTurn,
            Self::ChainRequired(_) => ErrorCode::ChainRequired,
            Self::CaptureRequired => ErrorCode::CaptureRequired,
            Self::DestOccupied(_) => ErrorCode::DestOccupied,
            Self::IllegalMove { .. } => ErrorCode::IllegalMove,
            Self::IllegalCapture { .. } => ErrorCode::IllegalCapture,
            Self::CaptureMismatch { .. } => ErrorCode::CaptureMismatch,
        }
    }
}
