//! Wire protocol for Cornerjump.
//!
//! This crate defines the vocabulary shared by every layer of the engine
//! and by the transport that sits in front of it:
//!
//! - **Identity** ([`PlayerId`], [`MatchId`], [`MoveId`]) and game-level
//!   values ([`Side`], [`Outcome`], [`Coord`]).
//! - **Messages** ([`ClientRequest`], [`ServerReply`], [`Snapshot`],
//!   [`MoveApplied`], [`MatchConcluded`]): what travels on the wire.
//! - **Errors** ([`ErrorCode`], [`ErrorReply`]): the structured
//!   rejection sent back to a submitter.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages are
//!   turned into bytes and back.
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (ClientRequest) → Match actor → Rules
//! ```
//!
//! The protocol layer knows nothing about rules or actors. It only knows
//! the shapes of the messages.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    BOARD_SIZE, BoardCodes, ClientRequest, ConclusionReason, Coord,
    CreateMatch, ErrorCode, ErrorReply, ForfeitMatch, JoinMatch,
    MatchConcluded, MatchId, MoveApplied, MoveId, Outcome, PlayerId,
    ServerReply, Side, Snapshot, SubmitMove,
};
