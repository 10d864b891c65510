//! # Cornerjump
//!
//! Authoritative server-side session engine for Cornerjump, a two-player
//! checkers variant with sliding attackers, corner captures, capture
//! chains, and an optional Blocker piece.
//!
//! The engine owns every match's state. Clients propose moves; the engine
//! validates them against its own board, applies them one at a time per
//! match, and hands back a public snapshot plus a move event for
//! broadcast. Rejections go only to the submitter.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cornerjump::{CreateMatch, MatchService, PlayerId};
//!
//! # async fn demo() -> Result<(), cornerjump::EngineError> {
//! let service = MatchService::builder().build();
//! let snapshot = service
//!     .create_match(CreateMatch {
//!         match_id: None,
//!         first_player_id: PlayerId(1),
//!         second_player_id: PlayerId(2),
//!         blockers_enabled: false,
//!     })
//!     .await?;
//! let again = service.join(snapshot.match_id, PlayerId(1)).await?;
//! assert_eq!(snapshot, again);
//! # Ok(())
//! # }
//! ```

mod dispatch;
mod error;
mod service;

pub use error::EngineError;
pub use service::{MatchService, MatchServiceBuilder};

pub use cornerjump_match::{
    MatchConfig, MatchError, MatchInfo, MatchOutbound, MoveAccepted, OutcomeSink, PlayerFeed,
};
pub use cornerjump_protocol::{
    ClientRequest, Codec, ConclusionReason, Coord, CreateMatch, ErrorCode, ErrorReply,
    ForfeitMatch, JoinMatch, JsonCodec, MatchConcluded, MatchId, MoveApplied, MoveId, Outcome,
    PlayerId, ServerReply, Side, Snapshot, SubmitMove,
};
pub use cornerjump_rules::Rejection;
