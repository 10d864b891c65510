//! Frame dispatch: bytes in, bytes out.
//!
//! The transport in front of the engine authenticates the connection and
//! hands each inbound frame here together with the caller's identity.
//! The flow is:
//!   1. Decode a `ClientRequest` → `BAD_PAYLOAD` on failure
//!   2. Check the caller speaks for itself → `UNAUTHENTICATED` otherwise
//!   3. Route to the service and encode the `ServerReply`

use cornerjump_protocol::{ClientRequest, Codec, PlayerId, ServerReply};

use crate::{EngineError, MatchService};

impl<C: Codec> MatchService<C> {
    /// Handles one inbound frame from `caller`.
    ///
    /// Every failure is turned into a [`ServerReply::Error`] for the
    /// caller alone.
    ///
    /// # Errors
    /// Only if the reply itself cannot be encoded.
    pub async fn handle_frame(
        &self,
        caller: Option<PlayerId>,
        frame: &[u8],
    ) -> Result<Vec<u8>, EngineError> {
        let reply = match self.dispatch(caller, frame).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::debug!(caller = ?caller, code = %e.code(), error = %e, "request rejected");
                ServerReply::Error(e.to_reply())
            }
        };
        Ok(self.codec.encode(&reply)?)
    }

    async fn dispatch(&self, caller: Option<PlayerId>, frame: &[u8]) -> Result<ServerReply, EngineError> {
        let caller =
            caller.ok_or_else(|| EngineError::Unauthenticated("no caller identity".into()))?;
        let request: ClientRequest = self.codec.decode(frame)?;

        match request {
            ClientRequest::Create(create) => {
                if caller != create.first_player_id && caller != create.second_player_id {
                    return Err(impersonation(caller, None));
                }
                Ok(ServerReply::Snapshot(self.create_match(create).await?))
            }
            ClientRequest::Join(join) => {
                authorize(caller, join.participant_id)?;
                Ok(ServerReply::Snapshot(
                    self.join(join.match_id, join.participant_id).await?,
                ))
            }
            ClientRequest::SubmitMove(submit) => {
                authorize(caller, submit.participant_id)?;
                let accepted = self.submit_move(submit).await?;
                Ok(ServerReply::MoveAccepted {
                    snapshot: accepted.snapshot,
                    event: accepted.event,
                })
            }
            ClientRequest::Forfeit(forfeit) => {
                authorize(caller, forfeit.participant_id)?;
                Ok(ServerReply::Snapshot(
                    self.forfeit(forfeit.match_id, forfeit.participant_id).await?,
                ))
            }
        }
    }
}

fn authorize(caller: PlayerId, claimed: PlayerId) -> Result<(), EngineError> {
    if caller == claimed {
        Ok(())
    } else {
        Err(impersonation(caller, Some(claimed)))
    }
}

fn impersonation(caller: PlayerId, claimed: Option<PlayerId>) -> EngineError {
    tracing::warn!(%caller, ?claimed, "caller acting for another participant");
    match claimed {
        Some(claimed) => EngineError::Unauthenticated(format!("{caller} cannot act for {claimed}")),
        None => EngineError::Unauthenticated(format!("{caller} is not a participant of the new match")),
    }
}
