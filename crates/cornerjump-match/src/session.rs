//! The per-match record owned by a match actor.

use cornerjump_protocol::{
    ConclusionReason, Coord, MatchConcluded, MatchId, PlayerId, Side, Snapshot, SubmitMove,
};
use cornerjump_rules::{GameState, MoveAttempt, Variant};
use tokio::time::Instant;

use crate::MatchError;

/// One match: two participants and their game.
///
/// Only the match actor holds a `MatchSession`, so every mutation is
/// already serialized by the actor's mailbox.
#[derive(Debug, Clone)]
pub struct MatchSession {
    match_id: MatchId,
    /// Index 0 plays [`Side::First`], index 1 plays [`Side::Second`].
    players: [PlayerId; 2],
    state: GameState,
    last_activity: Instant,
    ended_at: Option<Instant>,
}

impl MatchSession {
    /// A new match in the standard layout.
    pub fn new(
        match_id: MatchId,
        first: PlayerId,
        second: PlayerId,
        variant: Variant,
        starting_side: Side,
    ) -> Self {
        Self::with_state(match_id, [first, second], GameState::new(variant, starting_side))
    }

    /// A match around an existing game state.
    pub fn with_state(match_id: MatchId, players: [PlayerId; 2], state: GameState) -> Self {
        let ended_at = state.is_ended().then(Instant::now);
        Self {
            match_id,
            players,
            state,
            last_activity: Instant::now(),
            ended_at,
        }
    }

    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    pub fn players(&self) -> [PlayerId; 2] {
        self.players
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// The side `player` plays, or `None` for outsiders.
    pub fn side_of(&self, player: PlayerId) -> Option<Side> {
        if player == self.players[0] {
            Some(Side::First)
        } else if player == self.players[1] {
            Some(Side::Second)
        } else {
            None
        }
    }

    pub fn player_of(&self, side: Side) -> PlayerId {
        match side {
            Side::First => self.players[0],
            Side::Second => self.players[1],
        }
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub fn ended_at(&self) -> Option<Instant> {
        self.ended_at
    }

    pub(crate) fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Records the terminal transition and builds the outcome event.
    ///
    /// Returns `None` if the game is not actually over.
    pub(crate) fn conclude(&mut self, reason: ConclusionReason) -> Option<MatchConcluded> {
        let winner = self.state.outcome()?;
        self.ended_at = Some(Instant::now());
        Some(MatchConcluded {
            match_id: self.match_id,
            winner,
            participants: self.players,
            reason,
        })
    }

    /// The public view. Seen move ids and disconnect deadlines stay
    /// private.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            match_id: self.match_id,
            first_player_id: self.players[0],
            second_player_id: self.players[1],
            blockers_enabled: self.state.variant().blockers_enabled,
            pieces: self.state.board().to_codes(),
            turn: self.state.turn(),
            captured_by_first: self.trophy_codes(Side::First),
            captured_by_second: self.trophy_codes(Side::Second),
            chain_active: self.state.chain().is_some(),
            chain_anchor: self.state.chain().map(Coord::from),
            ended: self.state.is_ended(),
            winner: self.state.outcome(),
        }
    }

    fn trophy_codes(&self, side: Side) -> Vec<char> {
        self.state
            .captured_by(side)
            .iter()
            .map(|piece| piece.code())
            .collect()
    }
}

/// Turns a wire move into a rules-level attempt.
///
/// # Errors
/// `BadPayload` when `is_capture` disagrees with `captured_squares`:
/// a capture must name exactly one square and a plain move none.
pub fn attempt_from_request(request: &SubmitMove) -> Result<MoveAttempt, MatchError> {
    let claimed_capture = match (request.is_capture, request.captured_squares.as_slice()) {
        (true, [square]) => Some(*square),
        (false, []) => None,
        (true, squares) => {
            return Err(MatchError::BadPayload(format!(
                "a capture must name exactly one captured square, got {}",
                squares.len()
            )));
        }
        (false, _) => {
            return Err(MatchError::BadPayload(
                "captured_squares given for a non-capture move".into(),
            ));
        }
    };
    Ok(MoveAttempt {
        from: request.from,
        to: request.to,
        claimed_capture,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cornerjump_protocol::{MoveId, Outcome};

    fn session() -> MatchSession {
        MatchSession::new(
            MatchId(1),
            PlayerId(10),
            PlayerId(20),
            Variant::default(),
            Side::First,
        )
    }

    fn request(is_capture: bool, captured: Vec<Coord>) -> SubmitMove {
        SubmitMove {
            match_id: MatchId(1),
            participant_id: PlayerId(10),
            move_id: MoveId::from("m"),
            from: Coord::new(6, 0),
            to: Coord::new(5, 0),
            is_capture,
            captured_squares: captured,
        }
    }

    #[test]
    fn test_side_of_maps_participants_only() {
        let s = session();
        assert_eq!(s.side_of(PlayerId(10)), Some(Side::First));
        assert_eq!(s.side_of(PlayerId(20)), Some(Side::Second));
        assert_eq!(s.side_of(PlayerId(30)), None);
        assert_eq!(s.player_of(Side::Second), PlayerId(20));
    }

    #[test]
    fn test_snapshot_reflects_opening() {
        let snap = session().snapshot();
        assert_eq!(snap.turn, Side::First);
        assert!(!snap.ended);
        assert!(!snap.chain_active);
        assert_eq!(snap.pieces[7][3], Some('Q'));
        assert_eq!(snap.pieces[1][0], Some('d'));
        assert!(snap.captured_by_first.is_empty());
    }

    #[tokio::test]
    async fn test_conclude_only_when_over() {
        let mut s = session();
        assert!(s.conclude(ConclusionReason::Forfeit).is_none());
        s.state_mut().forfeit(Side::First).unwrap();
        let concluded = s.conclude(ConclusionReason::Forfeit).unwrap();
        assert_eq!(concluded.winner, Outcome::Second);
        assert_eq!(concluded.participants, [PlayerId(10), PlayerId(20)]);
        assert!(s.ended_at().is_some());
    }

    #[test]
    fn test_attempt_from_request_shapes() {
        assert_eq!(
            attempt_from_request(&request(false, vec![])).unwrap().claimed_capture,
            None
        );
        assert_eq!(
            attempt_from_request(&request(true, vec![Coord::new(4, 4)]))
                .unwrap()
                .claimed_capture,
            Some(Coord::new(4, 4))
        );
        assert!(matches!(
            attempt_from_request(&request(true, vec![])),
            Err(MatchError::BadPayload(_))
        ));
        assert!(matches!(
            attempt_from_request(&request(false, vec![Coord::new(1, 1)])),
            Err(MatchError::BadPayload(_))
        ));
    }
}
