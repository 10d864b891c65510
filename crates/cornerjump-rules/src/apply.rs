//! The state-machine transition: turning a validated move into a new
//! [`GameState`], and the terminal forfeit transition.

use cornerjump_protocol::{Coord, MoveApplied, MoveId, Outcome, Side};

use crate::scan::has_capture;
use crate::validate::{LegalMove, MoveAttempt, validate};
use crate::{GameState, Piece, PieceKind, Rejection, Square};

/// What happened when a move was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The move was applied.
    Moved(MoveReport),
    /// The move id was already seen. Nothing changed and nothing should
    /// be broadcast.
    Duplicate,
}

/// The effect of one applied move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub mover: Side,
    pub legal: LegalMove,
    /// The piece removed from the board, if the move captured.
    pub captured_piece: Option<Piece>,
    pub resulting_turn: Side,
    /// Set when the mover must capture again from this square.
    pub chain_anchor: Option<Square>,
    /// Set when this move ended the game.
    pub outcome: Option<Outcome>,
}

impl MoveReport {
    /// The canonical broadcast event for this move.
    pub fn to_event(&self) -> MoveApplied {
        MoveApplied {
            mover: self.mover,
            from: self.legal.from.into(),
            to: self.legal.to.into(),
            captured_squares: self.legal.captured.map(Coord::from).into_iter().collect(),
            corner_capture: self.legal.corner_capture,
            resulting_turn: self.resulting_turn,
            chain_active: self.chain_anchor.is_some(),
            chain_anchor: self.chain_anchor.map(Coord::from),
            ended: self.outcome.is_some(),
            winner: self.outcome,
        }
    }
}

impl GameState {
    /// Validates and applies a move by `side`.
    ///
    /// A finished game rejects everything with `GameEnded`, even a
    /// retransmission. Otherwise a move id that was already applied
    /// returns [`Applied::Duplicate`] without touching the state. A
    /// rejected move does not consume its id.
    ///
    /// # Errors
    /// The [`Rejection`] from validation. The state is unchanged.
    pub fn apply_move(
        &mut self,
        side: Side,
        move_id: &MoveId,
        attempt: &MoveAttempt,
    ) -> Result<Applied, Rejection> {
        if self.is_ended() {
            return Err(Rejection::GameEnded);
        }
        if self.seen_move_ids.contains(move_id) {
            tracing::debug!(%move_id, ?side, "duplicate move id, ignoring");
            return Ok(Applied::Duplicate);
        }

        let legal = validate(self, side, attempt)?;
        self.seen_move_ids.insert(move_id.clone());
        Ok(Applied::Moved(self.commit(side, legal)))
    }

    /// Ends the game in favour of `loser`'s opponent.
    ///
    /// # Errors
    /// `GameEnded` if the game is already over; forfeit is terminal and
    /// happens at most once.
    pub fn forfeit(&mut self, loser: Side) -> Result<Outcome, Rejection> {
        if self.is_ended() {
            return Err(Rejection::GameEnded);
        }
        let outcome = Outcome::win_for(loser.opponent());
        self.chain = None;
        self.outcome = Some(outcome);
        Ok(outcome)
    }

    fn commit(&mut self, mover: Side, legal: LegalMove) -> MoveReport {
        // For a corner capture `to == captured`, so the captured piece
        // must come off before the mover lands.
        let captured_piece = legal.captured.and_then(|square| self.board.take(square));
        if let Some(piece) = captured_piece {
            if piece.kind != PieceKind::Blocker {
                match mover {
                    Side::First => self.captured_by_first.push(piece),
                    Side::Second => self.captured_by_second.push(piece),
                }
            }
        }

        if let Some(piece) = self.board.take(legal.from) {
            self.board.place(legal.to, piece);
        }

        let continues = legal.is_capture() && has_capture(&self.board, legal.to);
        self.outcome = self.elimination_outcome();

        if self.outcome.is_some() {
            self.chain = None;
        } else if continues {
            tracing::trace!(?mover, anchor = %legal.to, "capture chain continues");
            self.chain = Some(legal.to);
        } else {
            self.chain = None;
            self.turn = mover.opponent();
        }

        MoveReport {
            mover,
            legal,
            captured_piece,
            resulting_turn: self.turn,
            chain_anchor: self.chain,
            outcome: self.outcome,
        }
    }
}
