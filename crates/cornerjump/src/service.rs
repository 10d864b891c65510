//! `MatchService` builder and the engine's public operations.
//!
//! This is the entry point for the transport in front of the engine. It
//! ties the layers together: protocol → registry → match actor → rules.

use std::sync::{Arc, Weak};
use std::time::Duration;

use cornerjump_match::{
    MatchConfig, MatchError, MatchHandle, MatchInfo, MatchRegistry, MoveAccepted, OutcomeSink,
    PlayerFeed,
};
use cornerjump_protocol::{Codec, CreateMatch, JsonCodec, MatchId, PlayerId, Snapshot, SubmitMove};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::EngineError;

/// Builder for configuring a [`MatchService`].
///
/// # Example
///
/// ```rust
/// use cornerjump::{MatchConfig, MatchService};
/// use tokio::sync::mpsc;
///
/// let (outcomes, _rx) = mpsc::unbounded_channel();
/// let service = MatchService::builder()
///     .config(MatchConfig::default())
///     .outcome_sink(outcomes)
///     .build();
/// assert_eq!(service.config().channel_size, 64);
/// ```
pub struct MatchServiceBuilder {
    config: MatchConfig,
    outcomes: Option<OutcomeSink>,
}

impl MatchServiceBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: MatchConfig::default(),
            outcomes: None,
        }
    }

    /// Sets the grace, retention, and mailbox configuration.
    pub fn config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets where terminal outcomes are delivered.
    pub fn outcome_sink(mut self, sink: OutcomeSink) -> Self {
        self.outcomes = Some(sink);
        self
    }

    /// Builds the service with [`JsonCodec`] for frames.
    pub fn build(self) -> MatchService<JsonCodec> {
        self.build_with_codec(JsonCodec)
    }

    /// Builds the service with a custom frame codec.
    pub fn build_with_codec<C: Codec>(self, codec: C) -> MatchService<C> {
        let config = self.config.validated();
        let mut registry = MatchRegistry::new(config.clone());
        if let Some(sink) = self.outcomes {
            registry = registry.with_outcome_sink(sink);
        }
        MatchService {
            registry: Mutex::new(registry),
            config,
            codec,
        }
    }
}

impl Default for MatchServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The authoritative match engine.
///
/// Holds the registry behind a Tokio mutex that is only ever held for
/// map operations. Work on a match happens on a cloned
/// [`MatchHandle`] after the lock is released, so matches never wait on
/// each other.
pub struct MatchService<C: Codec = JsonCodec> {
    registry: Mutex<MatchRegistry>,
    config: MatchConfig,
    pub(crate) codec: C,
}

impl MatchService<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> MatchServiceBuilder {
        MatchServiceBuilder::new()
    }
}

impl<C: Codec> MatchService<C> {
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Opens a match and returns its initial snapshot.
    pub async fn create_match(&self, request: CreateMatch) -> Result<Snapshot, EngineError> {
        let (_, snapshot) = self.registry.lock().await.create(request)?;
        Ok(snapshot)
    }

    /// Authorizes a participant and returns the current snapshot.
    pub async fn join(&self, match_id: MatchId, player_id: PlayerId) -> Result<Snapshot, EngineError> {
        let handle = self.handle(match_id).await?;
        Ok(handle.join(player_id, None).await?)
    }

    /// Like [`join`](Self::join), and subscribes `feed` to the match's
    /// broadcasts.
    pub async fn join_with_feed(
        &self,
        match_id: MatchId,
        player_id: PlayerId,
        feed: PlayerFeed,
    ) -> Result<Snapshot, EngineError> {
        let handle = self.handle(match_id).await?;
        Ok(handle.join(player_id, Some(feed)).await?)
    }

    /// Submits a move through the match's serialized path.
    pub async fn submit_move(&self, request: SubmitMove) -> Result<MoveAccepted, EngineError> {
        let handle = self.handle(request.match_id).await?;
        Ok(handle.submit_move(request).await?)
    }

    /// Ends the match in favour of `player_id`'s opponent.
    pub async fn forfeit(&self, match_id: MatchId, player_id: PlayerId) -> Result<Snapshot, EngineError> {
        let handle = self.handle(match_id).await?;
        Ok(handle.forfeit(player_id).await?)
    }

    /// Starts a grace deadline for `player_id`; `None` uses the configured
    /// `reconnect_grace`.
    pub async fn mark_disconnected(
        &self,
        match_id: MatchId,
        player_id: PlayerId,
        grace: Option<Duration>,
    ) -> Result<(), EngineError> {
        let handle = self.handle(match_id).await?;
        let grace = grace.unwrap_or(self.config.reconnect_grace);
        Ok(handle.mark_disconnected(player_id, grace).await?)
    }

    /// Cancels any pending grace deadline for `player_id`.
    pub async fn mark_connected(&self, match_id: MatchId, player_id: PlayerId) -> Result<(), EngineError> {
        let handle = self.handle(match_id).await?;
        Ok(handle.mark_connected(player_id).await?)
    }

    /// Purges finished and idle matches. Returns the purged ids.
    ///
    /// Each match decides for itself inside its actor, so a purge never
    /// races a move and never touches a match that isn't due.
    pub async fn purge_idle(&self) -> Vec<MatchId> {
        let handles = self.registry.lock().await.handles();

        let mut purged = Vec::new();
        for handle in handles {
            match handle.retire_if_idle(&self.config).await {
                Ok(true) => purged.push(handle.match_id()),
                Ok(false) => {}
                // Already stopped; drop the stale entry.
                Err(MatchError::Unavailable(match_id)) => purged.push(match_id),
                Err(e) => {
                    tracing::error!(match_id = %handle.match_id(), error = %e, "purge check failed");
                }
            }
        }

        if !purged.is_empty() {
            let mut registry = self.registry.lock().await;
            for match_id in &purged {
                registry.remove(*match_id);
            }
            tracing::info!(count = purged.len(), remaining = registry.match_count(), "purged matches");
        }
        purged
    }

    /// Phase and age of one match.
    pub async fn match_info(&self, match_id: MatchId) -> Result<MatchInfo, EngineError> {
        let handle = self.handle(match_id).await?;
        Ok(handle.get_info().await?)
    }

    /// Number of registered matches.
    pub async fn match_count(&self) -> usize {
        self.registry.lock().await.match_count()
    }

    async fn handle(&self, match_id: MatchId) -> Result<MatchHandle, EngineError> {
        Ok(self.registry.lock().await.lookup(match_id)?)
    }

    /// Runs [`purge_idle`](Self::purge_idle) every `sweep_interval`.
    ///
    /// The task holds a weak reference and exits once the service is
    /// dropped.
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let service: Weak<Self> = Arc::downgrade(self);
        let period = self.config.sweep_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(service) = service.upgrade() else {
                    tracing::debug!("service dropped, sweeper exiting");
                    break;
                };
                service.purge_idle().await;
            }
        })
    }
}
