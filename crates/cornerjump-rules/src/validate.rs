//! Move validation: a pure decision on a proposed move.
//!
//! [`validate`] never mutates anything. It either returns a
//! [`LegalMove`] describing exactly what applying the move will do, or a
//! [`Rejection`] naming the first rule the move broke.

use cornerjump_protocol::{Coord, Side};

use crate::scan::captures_from;
use crate::square::{ALL_DIRECTIONS, Direction, ORTHOGONAL};
use crate::{Board, GameState, PieceKind, Rejection, Square};

/// Knight-like offsets a Blocker may jump to, ignoring anything in
/// between.
const BLOCKER_JUMPS: [Direction; 16] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
    (3, 1),
    (3, -1),
    (-3, 1),
    (-3, -1),
    (1, 3),
    (1, -3),
    (-1, 3),
    (-1, -3),
];

/// Longest straight slide a Blocker may make.
const BLOCKER_MAX_SLIDE: i32 = 3;

/// A move as proposed by a client, coordinates still unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveAttempt {
    pub from: Coord,
    pub to: Coord,
    /// The square the client believes it captures, if any. Only ever
    /// cross-checked against the engine's own computation.
    pub claimed_capture: Option<Coord>,
}

impl MoveAttempt {
    pub fn new(from: Coord, to: Coord) -> Self {
        Self {
            from,
            to,
            claimed_capture: None,
        }
    }

    pub fn capturing(from: Coord, to: Coord, claimed: Coord) -> Self {
        Self {
            from,
            to,
            claimed_capture: Some(claimed),
        }
    }
}

/// A move that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegalMove {
    pub from: Square,
    pub to: Square,
    /// The square of the captured piece, as computed by the engine.
    pub captured: Option<Square>,
    /// The captured piece sat on a corner, so `to == captured`.
    pub corner_capture: bool,
}

impl LegalMove {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

/// Validates `attempt` by `side` against `state`.
///
/// Checks run in a fixed order and the first failure wins: game over,
/// bounds, ownership, turn, chain anchor, capture resolution, then
/// plain movement.
///
/// # Errors
/// The [`Rejection`] for the first rule broken.
pub fn validate(
    state: &GameState,
    side: Side,
    attempt: &MoveAttempt,
) -> Result<LegalMove, Rejection> {
    if state.is_ended() {
        return Err(Rejection::GameEnded);
    }

    let from = Square::try_from(attempt.from).map_err(Rejection::OutOfBounds)?;
    let to = Square::try_from(attempt.to).map_err(Rejection::OutOfBounds)?;

    let board = state.board();
    let piece = board.piece_at(from).ok_or(Rejection::PieceNotFound(from))?;
    if piece.side != side {
        return Err(Rejection::NotYourPiece(from));
    }
    if state.turn() != side {
        return Err(Rejection::NotYourTurn(state.turn()));
    }
    if let Some(anchor) = state.chain() {
        if from != anchor {
            return Err(Rejection::ChainRequired(anchor));
        }
    }

    if let Some(capture) = captures_from(board, from)
        .into_iter()
        .find(|capture| capture.landing == to)
    {
        if let Some(claimed) = attempt.claimed_capture {
            if claimed != Coord::from(capture.mid) {
                return Err(Rejection::CaptureMismatch {
                    claimed,
                    actual: capture.mid,
                });
            }
        }
        return Ok(LegalMove {
            from,
            to,
            captured: Some(capture.mid),
            corner_capture: capture.is_corner(),
        });
    }

    if state.chain().is_some() {
        return Err(Rejection::CaptureRequired);
    }
    if attempt.claimed_capture.is_some() {
        return Err(Rejection::IllegalCapture { from, to });
    }
    if from == to {
        return Err(Rejection::IllegalMove { from, to });
    }
    if !board.is_empty(to) {
        return Err(Rejection::DestOccupied(to));
    }

    let reachable = match piece.kind {
        PieceKind::Defender => is_single_orthogonal_step(from, to),
        PieceKind::Blocker => blocker_can_reach(board, from, to),
        slider => slides_to(board, from, to, slider.capture_directions(), None),
    };
    if !reachable {
        return Err(Rejection::IllegalMove { from, to });
    }

    Ok(LegalMove {
        from,
        to,
        captured: None,
        corner_capture: false,
    })
}

fn is_single_orthogonal_step(from: Square, to: Square) -> bool {
    ORTHOGONAL.iter().any(|dir| from.step(*dir, 1) == Some(to))
}

/// `true` if `to` is reachable from `from` along one of `directions`
/// through empty squares only, optionally capped at `max_steps`.
fn slides_to(
    board: &Board,
    from: Square,
    to: Square,
    directions: &[Direction],
    max_steps: Option<i32>,
) -> bool {
    directions.iter().any(|dir| {
        let mut steps = 1;
        while let Some(square) = from.step(*dir, steps) {
            if max_steps.is_some_and(|max| steps > max) || !board.is_empty(square) {
                return false;
            }
            if square == to {
                return true;
            }
            steps += 1;
        }
        false
    })
}

fn blocker_can_reach(board: &Board, from: Square, to: Square) -> bool {
    slides_to(board, from, to, &ALL_DIRECTIONS, Some(BLOCKER_MAX_SLIDE))
        || BLOCKER_JUMPS
            .iter()
            .any(|jump| from.step(*jump, 1) == Some(to) && board.is_empty(to))
}
