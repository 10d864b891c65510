//! Per-match game state: the board plus everything needed to decide
//! whose move it is and whether the game is over.

use std::collections::HashSet;

use cornerjump_protocol::{MoveId, Outcome, Side};
use serde::{Deserialize, Serialize};

use crate::{Board, Piece, Square};

/// Rule variants chosen at match creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Swap two Defenders per side for Blockers.
    pub blockers_enabled: bool,
}

/// Where the state machine is.
///
/// ```text
///                 non-capture, or capture with nothing further
///           ┌──────────────────────────────────────────────┐
///           ▼                                              │
///   AwaitingMove(side) ──capture, more available──→ ChainCapture(side, anchor)
///           │                                              │
///           └──────────── side eliminated / forfeit ───────┴──→ GameOver(outcome)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    AwaitingMove(Side),
    ChainCapture { side: Side, anchor: Square },
    GameOver(Outcome),
}

/// The full rules-level state of one match.
///
/// Fields are crate-visible only: outside this crate the only way to
/// change a `GameState` is through [`GameState::apply_move`] and
/// [`GameState::forfeit`], which never leave it in an illegal configuration.
///
/// ```rust
/// use cornerjump_protocol::{Coord, Outcome, Side};
/// use cornerjump_rules::{GameState, MoveAttempt, Rejection, Variant};
///
/// let mut state = GameState::new(Variant::default(), Side::First);
/// assert_eq!(state.forfeit(Side::Second), Ok(Outcome::First));
///
/// let attempt = MoveAttempt::new(Coord::new(6, 0), Coord::new(5, 0));
/// let late = state.apply_move(Side::First, &"m1".into(), &attempt);
/// assert_eq!(late, Err(Rejection::GameEnded));
/// ```
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) turn: Side,
    pub(crate) captured_by_first: Vec<Piece>,
    pub(crate) captured_by_second: Vec<Piece>,
    /// Anchor of an in-progress capture chain. The side to move is
    /// `turn` and it must capture again from here.
    pub(crate) chain: Option<Square>,
    pub(crate) outcome: Option<Outcome>,
    pub(crate) seen_move_ids: HashSet<MoveId>,
    pub(crate) variant: Variant,
}

impl GameState {
    /// A fresh game in the standard layout.
    pub fn new(variant: Variant, starting_side: Side) -> Self {
        Self::from_position(Board::standard(variant.blockers_enabled), starting_side, variant)
    }

    /// A game starting from an arbitrary position.
    pub fn from_position(board: Board, turn: Side, variant: Variant) -> Self {
        Self {
            board,
            turn,
            captured_by_first: Vec::new(),
            captured_by_second: Vec::new(),
            chain: None,
            outcome: None,
            seen_move_ids: HashSet::new(),
            variant,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    pub fn attacker_count(&self, side: Side) -> usize {
        self.board.attacker_count(side)
    }

    /// The side to move. Frozen once the game is over, so after the
    /// final move it is still the side that made it.
    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn chain(&self) -> Option<Square> {
        self.chain
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Trophies collected by `side`. Captured Blockers never appear here.
    pub fn captured_by(&self, side: Side) -> &[Piece] {
        match side {
            Side::First => &self.captured_by_first,
            Side::Second => &self.captured_by_second,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn has_seen(&self, move_id: &MoveId) -> bool {
        self.seen_move_ids.contains(move_id)
    }

    pub fn phase(&self) -> Phase {
        match (self.outcome, self.chain) {
            (Some(outcome), _) => Phase::GameOver(outcome),
            (None, Some(anchor)) => Phase::ChainCapture {
                side: self.turn,
                anchor,
            },
            (None, None) => Phase::AwaitingMove(self.turn),
        }
    }

    /// Decides the game from the attacker counts alone. `None` while
    /// both sides still have attackers.
    pub(crate) fn elimination_outcome(&self) -> Option<Outcome> {
        let first = self.board.attacker_count(Side::First);
        let second = self.board.attacker_count(Side::Second);
        match (first, second) {
            (0, 0) => Some(Outcome::Draw),
            (0, _) => Some(Outcome::win_for(Side::Second)),
            (_, 0) => Some(Outcome::win_for(Side::First)),
            _ => None,
        }
    }
}
