//! Core protocol types for Cornerjump's wire format.
//!
//! Every type in this module travels "on the wire": it is what the
//! transport layer decodes from a client and what it encodes back.
//! Game rules live elsewhere; these are only shapes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width and height of the board.
pub const BOARD_SIZE: usize = 8;

/// The wire encoding of a board: one optional letter per square.
///
/// The letter names the piece kind and its case names the side
/// (uppercase = [`Side::First`]). `None` is an empty square.
pub type BoardCodes = [[Option<char>; BOARD_SIZE]; BOARD_SIZE];

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A participant identity, supplied by the matchmaking collaborator.
///
/// Newtype wrapper so a `PlayerId` can never be passed where a
/// [`MatchId`] is expected. `#[serde(transparent)]` keeps it a bare
/// number on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Identifies one match (one game between two participants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub u64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M-{}", self.0)
    }
}

/// Caller-supplied move identifier used to make move submission
/// idempotent under retransmission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveId(pub String);

impl From<&str> for MoveId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for MoveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Game-level values
// ---------------------------------------------------------------------------

/// One of the two sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

impl Side {
    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("First"),
            Self::Second => f.write_str("Second"),
        }
    }
}

/// How a finished match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    First,
    Second,
    Draw,
}

impl Outcome {
    /// The outcome in which `side` wins.
    pub fn win_for(side: Side) -> Self {
        match side {
            Side::First => Self::First,
            Side::Second => Self::Second,
        }
    }

    /// The winning side, or `None` for a draw.
    pub fn winner(self) -> Option<Side> {
        match self {
            Self::First => Some(Side::First),
            Self::Second => Some(Side::Second),
            Self::Draw => None,
        }
    }
}

/// A square as the client names it.
///
/// Signed and unbounded on purpose: a coordinate off the board must
/// decode fine so the engine can answer `OUT_OF_BOUNDS` rather than
/// `BAD_PAYLOAD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ---------------------------------------------------------------------------
// Errors on the wire
// ---------------------------------------------------------------------------

/// Machine-readable rejection codes.
///
/// `SCREAMING_SNAKE_CASE` on the wire: `ErrorCode::NotYourTurn` is
/// `"NOT_YOUR_TURN"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unauthenticated,
    BadPayload,
    MatchNotFound,
    NotAPlayer,
    NotYourPiece,
    NotYourTurn,
    ChainRequired,
    CaptureRequired,
    DestOccupied,
    IllegalMove,
    IllegalCapture,
    CaptureMismatch,
    OutOfBounds,
    PieceNotFound,
    GameEnded,
}

impl ErrorCode {
    /// The wire spelling of this code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::BadPayload => "BAD_PAYLOAD",
            Self::MatchNotFound => "MATCH_NOT_FOUND",
            Self::NotAPlayer => "NOT_A_PLAYER",
            Self::NotYourPiece => "NOT_YOUR_PIECE",
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::ChainRequired => "CHAIN_REQUIRED",
            Self::CaptureRequired => "CAPTURE_REQUIRED",
            Self::DestOccupied => "DEST_OCCUPIED",
            Self::IllegalMove => "ILLEGAL_MOVE",
            Self::IllegalCapture => "ILLEGAL_CAPTURE",
            Self::CaptureMismatch => "CAPTURE_MISMATCH",
            Self::OutOfBounds => "OUT_OF_BOUNDS",
            Self::PieceNotFound => "PIECE_NOT_FOUND",
            Self::GameEnded => "GAME_ENDED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The structured rejection sent only to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub error_code: ErrorCode,
    pub message: String,
}

impl ErrorReply {
    pub fn new(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error_code,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Requests (client → engine)
// ---------------------------------------------------------------------------

/// Sent by the matchmaking/challenge collaborator to open a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMatch {
    /// Optional caller-chosen id; the engine assigns one when absent.
    #[serde(default)]
    pub match_id: Option<MatchId>,
    pub first_player_id: PlayerId,
    pub second_player_id: PlayerId,
    #[serde(default)]
    pub blockers_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinMatch {
    pub match_id: MatchId,
    pub participant_id: PlayerId,
}

/// A proposed move.
///
/// `is_capture` and `captured_squares` are the client's *claim*. The
/// engine computes the capture itself and only cross-checks the claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitMove {
    pub match_id: MatchId,
    pub participant_id: PlayerId,
    pub move_id: MoveId,
    pub from: Coord,
    pub to: Coord,
    #[serde(default)]
    pub is_capture: bool,
    #[serde(default)]
    pub captured_squares: Vec<Coord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForfeitMatch {
    pub match_id: MatchId,
    pub participant_id: PlayerId,
}

/// Every request the engine understands.
///
/// `#[serde(tag = "type")]` produces `{ "type": "Join", "match_id": 1, ... }`
/// instead of an externally tagged wrapper object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientRequest {
    Create(CreateMatch),
    Join(JoinMatch),
    SubmitMove(SubmitMove),
    Forfeit(ForfeitMatch),
}

// ---------------------------------------------------------------------------
// Replies and events (engine → clients)
// ---------------------------------------------------------------------------

/// The public view of a match.
///
/// Deliberately excludes internal bookkeeping: no seen move ids, no
/// disconnect deadlines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub match_id: MatchId,
    pub first_player_id: PlayerId,
    pub second_player_id: PlayerId,
    pub blockers_enabled: bool,
    pub pieces: BoardCodes,
    pub turn: Side,
    pub captured_by_first: Vec<char>,
    pub captured_by_second: Vec<char>,
    pub chain_active: bool,
    pub chain_anchor: Option<Coord>,
    pub ended: bool,
    pub winner: Option<Outcome>,
}

/// Broadcast to every subscriber of a match after an accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveApplied {
    pub mover: Side,
    pub from: Coord,
    pub to: Coord,
    pub captured_squares: Vec<Coord>,
    pub corner_capture: bool,
    pub resulting_turn: Side,
    pub chain_active: bool,
    pub chain_anchor: Option<Coord>,
    pub ended: bool,
    pub winner: Option<Outcome>,
}

/// Why a match reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConclusionReason {
    /// A side ran out of attacker pieces (or both did).
    Elimination,
    /// A participant forfeited explicitly.
    Forfeit,
    /// A participant's reconnection grace period expired.
    Disconnect,
}

/// The terminal outcome, emitted exactly once per match for the
/// economy/persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConcluded {
    pub match_id: MatchId,
    pub winner: Outcome,
    pub participants: [PlayerId; 2],
    pub reason: ConclusionReason,
}

/// Every reply the engine sends back to a requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerReply {
    /// Answer to `Create`, `Join`, and `Forfeit`.
    Snapshot(Snapshot),
    /// Answer to `SubmitMove`. `event` is `None` when the move id was
    /// already seen and nothing changed.
    MoveAccepted {
        snapshot: Snapshot,
        event: Option<MoveApplied>,
    },
    Error(ErrorReply),
}
