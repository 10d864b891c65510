//! Match lifecycle for Cornerjump.
//!
//! Each match runs as an isolated Tokio task (actor model) that owns its
//! [`GameState`](cornerjump_rules::GameState), its subscribers, and its
//! disconnect grace deadlines. Moves for one match are processed strictly
//! in order; different matches never block each other.
//!
//! # Key types
//!
//! - [`MatchRegistry`] — creates matches and looks them up by id
//! - [`MatchHandle`] — send commands to a running match actor
//! - [`MatchSession`] — the per-match record the actor owns
//! - [`MatchConfig`] — grace, retention, and mailbox settings

mod actor;
mod config;
mod error;
mod registry;
mod session;

pub use actor::{MatchHandle, MatchInfo, MatchOutbound, MoveAccepted, OutcomeSink, PlayerFeed};
pub use config::MatchConfig;
pub use error::MatchError;
pub use registry::MatchRegistry;
pub use session::{MatchSession, attempt_from_request};
