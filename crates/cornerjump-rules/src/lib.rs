//! Game rules for Cornerjump.
//!
//! Everything in this crate is synchronous and pure: no I/O, no clocks,
//! no randomness. The match layer owns a [`GameState`] per match and
//! feeds it moves one at a time.
//!
//! # Key types
//!
//! - [`Board`] — the 8×8 grid of [`Piece`]s
//! - [`GameState`] — board plus turn, trophies, chain anchor, outcome,
//!   and seen move ids
//! - [`validate`] — decides whether a [`MoveAttempt`] is legal
//! - [`GameState::apply_move`] — the state-machine transition
//! - [`scan`] — the directional scan both of the above are built on

mod apply;
mod board;
mod error;
mod piece;
pub mod scan;
pub mod square;
mod state;
mod validate;

pub use apply::{Applied, MoveReport};
pub use board::Board;
pub use error::Rejection;
pub use piece::{Piece, PieceKind};
pub use square::Square;
pub use state::{GameState, Phase, Variant};
pub use validate::{LegalMove, MoveAttempt, validate};
