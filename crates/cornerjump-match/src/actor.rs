//! Match actor: an isolated Tokio task that owns one match.
//!
//! Each match runs in its own task and is reached only through an mpsc
//! mailbox. That mailbox is the match's critical section: commands are
//! processed one at a time, so turn and chain invariants hold under any
//! number of concurrent submitters, and matches never wait on each other.
//!
//! Disconnect grace deadlines live inside the actor too. The actor loop
//! `select!`s between its mailbox and the earliest deadline, so a
//! reconnection and an expiring deadline are ordered by the same loop
//! that orders moves.

use std::collections::HashMap;
use std::future;
use std::time::Duration;

use cornerjump_protocol::{
    ConclusionReason, MatchConcluded, MatchId, MoveApplied, PlayerId, Side, Snapshot, SubmitMove,
};
use cornerjump_rules::{Applied, Phase, Rejection};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant};

use crate::session::attempt_from_request;
use crate::{MatchConfig, MatchError, MatchSession};

/// An outbound message from the match actor to a subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutbound {
    /// A move was accepted.
    Moved {
        snapshot: Snapshot,
        event: MoveApplied,
    },
    /// The match reached its terminal state.
    Concluded(MatchConcluded),
}

/// Channel for delivering broadcasts to one participant's connection.
pub type PlayerFeed = mpsc::UnboundedSender<MatchOutbound>;

/// Channel on which terminal outcomes are handed to the persistence
/// collaborator. Receives exactly one message per concluded match.
pub type OutcomeSink = mpsc::UnboundedSender<MatchConcluded>;

/// The reply to an accepted (or already-seen) move.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveAccepted {
    pub snapshot: Snapshot,
    /// `None` when the move id was already seen: nothing changed and
    /// nothing was broadcast.
    pub event: Option<MoveApplied>,
}

/// Match metadata, for the registry and for introspection.
#[derive(Debug, Clone)]
pub struct MatchInfo {
    pub match_id: MatchId,
    pub phase: Phase,
    /// Time since the last accepted move (or creation).
    pub idle_for: Duration,
    /// Time since the terminal transition, if the match is over.
    pub ended_for: Option<Duration>,
}

impl MatchInfo {
    pub fn is_ended(&self) -> bool {
        self.ended_for.is_some()
    }
}

/// Commands sent to a match actor.
///
/// The `oneshot::Sender` in each variant is the reply channel: the
/// caller sends the command, then waits on the paired receiver.
pub(crate) enum MatchCommand {
    Join {
        player_id: PlayerId,
        feed: Option<PlayerFeed>,
        reply: oneshot::Sender<Result<Snapshot, MatchError>>,
    },
    SubmitMove {
        request: SubmitMove,
        reply: oneshot::Sender<Result<MoveAccepted, MatchError>>,
    },
    Forfeit {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<Snapshot, MatchError>>,
    },
    MarkDisconnected {
        player_id: PlayerId,
        grace: Duration,
        reply: oneshot::Sender<Result<(), MatchError>>,
    },
    MarkConnected {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), MatchError>>,
    },
    GetInfo {
        reply: oneshot::Sender<MatchInfo>,
    },
    /// Stop the actor if the match is purgeable. Replies whether it
    /// stopped.
    RetireIfIdle {
        config: MatchConfig,
        reply: oneshot::Sender<bool>,
    },
    Shutdown,
}

/// Handle to a running match actor. Cheap to clone: it's just the
/// mailbox sender.
#[derive(Debug, Clone)]
pub struct MatchHandle {
    match_id: MatchId,
    sender: mpsc::Sender<MatchCommand>,
}

impl MatchHandle {
    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    /// Authorizes `player_id`, optionally subscribes `feed` to broadcasts,
    /// cancels any pending disconnect grace, and returns the snapshot.
    pub async fn join(
        &self,
        player_id: PlayerId,
        feed: Option<PlayerFeed>,
    ) -> Result<Snapshot, MatchError> {
        self.request(|reply| MatchCommand::Join {
            player_id,
            feed,
            reply,
        })
        .await?
    }

    /// Submits a move. Rejections come back only to the caller.
    pub async fn submit_move(&self, request: SubmitMove) -> Result<MoveAccepted, MatchError> {
        self.request(|reply| MatchCommand::SubmitMove { request, reply })
            .await?
    }

    /// Ends the match in favour of `player_id`'s opponent.
    pub async fn forfeit(&self, player_id: PlayerId) -> Result<Snapshot, MatchError> {
        self.request(|reply| MatchCommand::Forfeit { player_id, reply })
            .await?
    }

    /// Starts a grace deadline for `player_id`. If it expires before
    /// [`mark_connected`](Self::mark_connected), the player forfeits.
    pub async fn mark_disconnected(
        &self,
        player_id: PlayerId,
        grace: Duration,
    ) -> Result<(), MatchError> {
        self.request(|reply| MatchCommand::MarkDisconnected {
            player_id,
            grace,
            reply,
        })
        .await?
    }

    /// Cancels any pending grace deadline for `player_id`.
    pub async fn mark_connected(&self, player_id: PlayerId) -> Result<(), MatchError> {
        self.request(|reply| MatchCommand::MarkConnected { player_id, reply })
            .await?
    }

    pub async fn get_info(&self) -> Result<MatchInfo, MatchError> {
        self.request(|reply| MatchCommand::GetInfo { reply }).await
    }

    /// Asks the actor to stop if `config` says the match is purgeable.
    /// The decision is made inside the actor, so it can't race a move.
    pub async fn retire_if_idle(&self, config: &MatchConfig) -> Result<bool, MatchError> {
        let config = config.clone();
        self.request(|reply| MatchCommand::RetireIfIdle { config, reply })
            .await
    }

    /// Tells the actor to stop.
    pub async fn shutdown(&self) -> Result<(), MatchError> {
        self.sender
            .send(MatchCommand::Shutdown)
            .await
            .map_err(|_| MatchError::Unavailable(self.match_id))
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> MatchCommand,
    ) -> Result<T, MatchError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    fn unavailable(&self) -> MatchError {
        tracing::error!(match_id = %self.match_id, "match actor vanished mid-request");
        MatchError::Unavailable(self.match_id)
    }
}

/// Whether the actor loop keeps running after a command.
enum Flow {
    Continue,
    Stop,
}

/// The internal actor state. Runs inside a Tokio task.
struct MatchActor {
    session: MatchSession,
    feeds: HashMap<PlayerId, PlayerFeed>,
    /// Pending grace deadlines, keyed by participant.
    deadlines: HashMap<PlayerId, Instant>,
    outcomes: Option<OutcomeSink>,
}

impl MatchActor {
    async fn run(mut self, mut receiver: mpsc::Receiver<MatchCommand>) {
        let match_id = self.session.match_id();
        tracing::info!(%match_id, "match actor started");

        loop {
            let deadline = self.deadlines.values().min().copied();
            tokio::select! {
                // Queued commands first: a reconnection already in the
                // mailbox beats a deadline that fires at the same time.
                biased;

                cmd = receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    if let Flow::Stop = self.handle(cmd) {
                        break;
                    }
                }
                () = sleep_until(deadline) => self.expire_deadlines(),
            }
        }

        tracing::info!(%match_id, "match actor stopped");
    }

    fn handle(&mut self, cmd: MatchCommand) -> Flow {
        match cmd {
            MatchCommand::Join {
                player_id,
                feed,
                reply,
            } => {
                let _ = reply.send(self.handle_join(player_id, feed));
            }
            MatchCommand::SubmitMove { request, reply } => {
                let _ = reply.send(self.handle_move(request));
            }
            MatchCommand::Forfeit { player_id, reply } => {
                let result = self.forfeit(player_id, ConclusionReason::Forfeit);
                let _ = reply.send(result.map(|()| self.session.snapshot()));
            }
            MatchCommand::MarkDisconnected {
                player_id,
                grace,
                reply,
            } => {
                let result = self.authorize(player_id).and_then(|_| {
                    if self.session.state().is_ended() {
                        return Ok(());
                    }
                    let deadline = Instant::now().checked_add(grace).ok_or_else(|| {
                        MatchError::BadPayload(format!("grace period {grace:?} is out of range"))
                    })?;
                    self.deadlines.insert(player_id, deadline);
                    tracing::info!(
                        match_id = %self.session.match_id(),
                        %player_id,
                        grace_secs = grace.as_secs_f64(),
                        "participant disconnected, grace period started"
                    );
                    Ok(())
                });
                let _ = reply.send(result);
            }
            MatchCommand::MarkConnected { player_id, reply } => {
                let result = self.authorize(player_id).map(|_| self.reconnect(player_id));
                let _ = reply.send(result);
            }
            MatchCommand::GetInfo { reply } => {
                let _ = reply.send(self.info());
            }
            MatchCommand::RetireIfIdle { config, reply } => {
                let info = self.info();
                let retire = config.is_purgeable(info.idle_for, info.ended_for);
                let _ = reply.send(retire);
                if retire {
                    if !info.is_ended() {
                        tracing::warn!(
                            match_id = %info.match_id,
                            idle_secs = info.idle_for.as_secs(),
                            "purging abandoned match without an outcome"
                        );
                    }
                    return Flow::Stop;
                }
            }
            MatchCommand::Shutdown => {
                tracing::info!(match_id = %self.session.match_id(), "match shutting down");
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    fn authorize(&self, player_id: PlayerId) -> Result<Side, MatchError> {
        self.session.side_of(player_id).ok_or_else(|| {
            tracing::warn!(
                match_id = %self.session.match_id(),
                %player_id,
                "request from non-participant"
            );
            MatchError::NotAPlayer(player_id, self.session.match_id())
        })
    }

    fn handle_join(
        &mut self,
        player_id: PlayerId,
        feed: Option<PlayerFeed>,
    ) -> Result<Snapshot, MatchError> {
        self.authorize(player_id)?;
        self.reconnect(player_id);
        if let Some(feed) = feed {
            self.feeds.insert(player_id, feed);
        }
        tracing::info!(match_id = %self.session.match_id(), %player_id, "participant joined");
        Ok(self.session.snapshot())
    }

    fn handle_move(&mut self, request: SubmitMove) -> Result<MoveAccepted, MatchError> {
        let match_id = self.session.match_id();
        let player_id = request.participant_id;
        let side = self.authorize(player_id)?;

        // Finished games answer GAME_ENDED before the payload is even
        // looked at.
        if self.session.state().is_ended() {
            return Err(Rejection::GameEnded.into());
        }
        let attempt = attempt_from_request(&request)?;

        let applied = self
            .session
            .state_mut()
            .apply_move(side, &request.move_id, &attempt)
            .inspect_err(|rejection| {
                tracing::debug!(
                    %match_id,
                    %player_id,
                    move_id = %request.move_id,
                    code = %rejection.code(),
                    %rejection,
                    "move rejected"
                );
            })?;

        let report = match applied {
            Applied::Duplicate => {
                return Ok(MoveAccepted {
                    snapshot: self.session.snapshot(),
                    event: None,
                });
            }
            Applied::Moved(report) => report,
        };

        self.session.touch();
        let event = report.to_event();
        let snapshot = self.session.snapshot();
        tracing::debug!(
            %match_id,
            %player_id,
            from = %event.from,
            to = %event.to,
            chain = event.chain_active,
            "move applied"
        );

        self.broadcast(MatchOutbound::Moved {
            snapshot: snapshot.clone(),
            event: event.clone(),
        });
        if report.outcome.is_some() {
            self.finish(ConclusionReason::Elimination);
        }

        Ok(MoveAccepted {
            snapshot,
            event: Some(event),
        })
    }

    /// Forfeits on behalf of `player_id`.
    fn forfeit(&mut self, player_id: PlayerId, reason: ConclusionReason) -> Result<(), MatchError> {
        let side = self.authorize(player_id)?;
        self.session.state_mut().forfeit(side)?;
        tracing::info!(
            match_id = %self.session.match_id(),
            %player_id,
            ?reason,
            "participant forfeited"
        );
        self.finish(reason);
        Ok(())
    }

    fn reconnect(&mut self, player_id: PlayerId) {
        if self.deadlines.remove(&player_id).is_some() {
            tracing::info!(
                match_id = %self.session.match_id(),
                %player_id,
                "participant reconnected, grace cancelled"
            );
        }
    }

    fn expire_deadlines(&mut self) {
        let now = Instant::now();
        let expired: Vec<PlayerId> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(player_id, _)| *player_id)
            .collect();

        for player_id in expired {
            self.deadlines.remove(&player_id);
            if self.session.state().is_ended() {
                continue;
            }
            tracing::info!(
                match_id = %self.session.match_id(),
                %player_id,
                "grace period expired"
            );
            if let Err(e) = self.forfeit(player_id, ConclusionReason::Disconnect) {
                tracing::error!(
                    match_id = %self.session.match_id(),
                    %player_id,
                    error = %e,
                    "grace forfeit failed"
                );
            }
        }
    }

    /// Emits the terminal event exactly once, at the transition.
    fn finish(&mut self, reason: ConclusionReason) {
        self.deadlines.clear();
        let Some(concluded) = self.session.conclude(reason) else {
            tracing::error!(
                match_id = %self.session.match_id(),
                "finish called on a game that is not over"
            );
            return;
        };
        tracing::info!(
            match_id = %concluded.match_id,
            winner = ?concluded.winner,
            ?reason,
            "game over"
        );

        if let Some(outcomes) = &self.outcomes {
            if outcomes.send(concluded.clone()).is_err() {
                tracing::error!(
                    match_id = %concluded.match_id,
                    "outcome sink closed, terminal event lost"
                );
            }
        }
        self.broadcast(MatchOutbound::Concluded(concluded));
    }

    /// Sends to every subscribed participant. A closed feed just means
    /// the connection went away.
    fn broadcast(&self, msg: MatchOutbound) {
        for feed in self.feeds.values() {
            let _ = feed.send(msg.clone());
        }
    }

    fn info(&self) -> MatchInfo {
        let now = Instant::now();
        MatchInfo {
            match_id: self.session.match_id(),
            phase: self.session.state().phase(),
            idle_for: now.saturating_duration_since(self.session.last_activity()),
            ended_for: self
                .session
                .ended_at()
                .map(|ended_at| now.saturating_duration_since(ended_at)),
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}

/// Spawns a match actor and returns a handle to it.
pub(crate) fn spawn_match(
    session: MatchSession,
    outcomes: Option<OutcomeSink>,
    channel_size: usize,
) -> MatchHandle {
    let (tx, rx) = mpsc::channel(channel_size);
    let match_id = session.match_id();

    let actor = MatchActor {
        session,
        feeds: HashMap::new(),
        deadlines: HashMap::new(),
        outcomes,
    };

    tokio::spawn(actor.run(rx));

    MatchHandle {
        match_id,
        sender: tx,
    }
}
