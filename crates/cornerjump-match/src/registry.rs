//! Match registry: creates, tracks, and looks up match actors.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use cornerjump_protocol::{CreateMatch, MatchId, Side, Snapshot};
use cornerjump_rules::Variant;
use rand::Rng;

use crate::actor::spawn_match;
use crate::{MatchConfig, MatchError, MatchHandle, MatchSession, OutcomeSink};

/// Counter for generating match ids.
static NEXT_MATCH_ID: AtomicU64 = AtomicU64::new(1);

/// Every live match, keyed by id.
///
/// The registry only holds handles. All game state lives in the actors,
/// so a lookup never contends with a move in progress.
pub struct MatchRegistry {
    matches: HashMap<MatchId, MatchHandle>,
    config: MatchConfig,
    outcomes: Option<OutcomeSink>,
}

impl MatchRegistry {
    /// Out-of-range config values are clamped, see [`MatchConfig::validated`].
    pub fn new(config: MatchConfig) -> Self {
        Self {
            matches: HashMap::new(),
            config: config.validated(),
            outcomes: None,
        }
    }

    /// Routes every match's terminal event to `sink`.
    pub fn with_outcome_sink(mut self, sink: OutcomeSink) -> Self {
        self.outcomes = Some(sink);
        self
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Creates a match with a randomly chosen starting side.
    ///
    /// Returns the actor handle and the initial snapshot.
    pub fn create(&mut self, request: CreateMatch) -> Result<(MatchHandle, Snapshot), MatchError> {
        let starting_side = if rand::rng().random_bool(0.5) {
            Side::First
        } else {
            Side::Second
        };
        self.create_with_starting_side(request, starting_side)
    }

    /// Creates a match where `starting_side` moves first.
    pub fn create_with_starting_side(
        &mut self,
        request: CreateMatch,
        starting_side: Side,
    ) -> Result<(MatchHandle, Snapshot), MatchError> {
        if request.first_player_id == request.second_player_id {
            return Err(MatchError::SameParticipant(request.first_player_id));
        }
        let match_id = match request.match_id {
            Some(id) if self.matches.contains_key(&id) => {
                return Err(MatchError::AlreadyExists(id));
            }
            Some(id) => id,
            None => self.next_free_id(),
        };

        let session = MatchSession::new(
            match_id,
            request.first_player_id,
            request.second_player_id,
            Variant {
                blockers_enabled: request.blockers_enabled,
            },
            starting_side,
        );
        let snapshot = session.snapshot();
        let handle = spawn_match(session, self.outcomes.clone(), self.config.channel_size);
        self.matches.insert(match_id, handle.clone());

        tracing::info!(
            %match_id,
            first = %request.first_player_id,
            second = %request.second_player_id,
            blockers = request.blockers_enabled,
            ?starting_side,
            "match created"
        );
        Ok((handle, snapshot))
    }

    fn next_free_id(&self) -> MatchId {
        loop {
            let id = MatchId(NEXT_MATCH_ID.fetch_add(1, Ordering::Relaxed));
            if !self.matches.contains_key(&id) {
                return id;
            }
        }
    }

    pub fn lookup(&self, match_id: MatchId) -> Result<MatchHandle, MatchError> {
        self.matches
            .get(&match_id)
            .cloned()
            .ok_or(MatchError::NotFound(match_id))
    }

    /// Returns cloned handles to every match.
    ///
    /// Callers use these to talk to actors without holding the registry
    /// lock.
    pub fn handles(&self) -> Vec<MatchHandle> {
        self.matches.values().cloned().collect()
    }

    /// Forgets a match. The actor stops once its last handle is dropped.
    pub fn remove(&mut self, match_id: MatchId) -> Option<MatchHandle> {
        let handle = self.matches.remove(&match_id);
        if handle.is_some() {
            tracing::debug!(%match_id, "match removed from registry");
        }
        handle
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }
}

impl Default for MatchRegistry {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}
