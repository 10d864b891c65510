//! Error types for the match layer.

use cornerjump_protocol::{ErrorCode, MatchId, PlayerId};
use cornerjump_rules::Rejection;

/// Errors that can occur during match operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// No match with this id is registered.
    #[error("match {0} not found")]
    NotFound(MatchId),

    /// A caller-chosen match id is already taken.
    #[error("match {0} already exists")]
    AlreadyExists(MatchId),

    /// Both participant slots were given the same identity.
    #[error("a match needs two distinct participants, got {0} twice")]
    SameParticipant(PlayerId),

    /// The caller is not one of the two registered participants.
    #[error("player {0} is not a participant of match {1}")]
    NotAPlayer(PlayerId, MatchId),

    /// The request decoded but its fields contradict each other.
    #[error("bad payload: {0}")]
    BadPayload(String),

    /// The rules refused the move.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// The match actor stopped while a request was in flight.
    #[error("match {0} is unavailable")]
    Unavailable(MatchId),
}

impl MatchError {
    /// The wire code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) | Self::Unavailable(_) => ErrorCode::MatchNotFound,
            Self::AlreadyExists(_) | Self::SameParticipant(_) | Self::BadPayload(_) => {
                ErrorCode::BadPayload
            }
            Self::NotAPlayer(..) => ErrorCode::NotAPlayer,
            Self::Rejected(rejection) => rejection.code(),
        }
    }
}
