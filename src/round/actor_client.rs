use tokio::sync::broadcast;
use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot::error::RecvError;
use tokio::sync::oneshot::{self, Receiver as OneshotReceiver, Sender as OneshotSender};

use crate::error::Error;
use crate::round::actor::{RoundCommand, RoundEvent, RoundWideEvent};

/// Handle to a live round actor. Cheap to clone; every presentation-side
/// component can hold its own.
#[derive(Clone, Debug)]
pub struct RoundClient {
    pub(super) round_tx: Sender<RoundCommand>,
}

impl RoundClient {
    pub async fn mark_correct(&self) -> Result<(), Error> {
        let (tx, rx): (OneshotSender<RoundEvent>, OneshotReceiver<RoundEvent>) =
            oneshot::channel();

        self.send_command(
            RoundCommand::MarkCorrect { response_tx: tx },
            "The Round is not alive. Can't mark the current item correct",
        )
        .await?;

        match rx.await {
            Ok(RoundEvent::Ok) => Ok(()),
            error => Err(RoundClient::handle_event_error(error)),
        }
    }

    pub async fn skip(&self) -> Result<(), Error> {
        let (tx, rx): (OneshotSender<RoundEvent>, OneshotReceiver<RoundEvent>) =
            oneshot::channel();

        self.send_command(
            RoundCommand::Skip { response_tx: tx },
            "The Round is not alive. Can't skip the current item",
        )
        .await?;

        match rx.await {
            Ok(RoundEvent::Ok) => Ok(()),
            error => Err(RoundClient::handle_event_error(error)),
        }
    }

    pub async fn acknowledge_cue(&self) -> Result<(), Error> {
        let (tx, rx): (OneshotSender<RoundEvent>, OneshotReceiver<RoundEvent>) =
            oneshot::channel();

        self.send_command(
            RoundCommand::AcknowledgeCue { response_tx: tx },
            "The Round is not alive. Can't acknowledge the cue",
        )
        .await?;

        match rx.await {
            Ok(RoundEvent::Ok) => Ok(()),
            error => Err(RoundClient::handle_event_error(error)),
        }
    }

    pub async fn acknowledge_finish(&self) -> Result<(), Error> {
        let (tx, rx): (OneshotSender<RoundEvent>, OneshotReceiver<RoundEvent>) =
            oneshot::channel();

        self.send_command(
            RoundCommand::AcknowledgeFinish { response_tx: tx },
            "The Round is not alive. Can't acknowledge the finish",
        )
        .await?;

        match rx.await {
            Ok(RoundEvent::Ok) => Ok(()),
            error => Err(RoundClient::handle_event_error(error)),
        }
    }

    /// Subscribes to the stream of round state snapshots. The actor answers
    /// with a fresh snapshot right away, so a new subscriber never renders
    /// from nothing.
    pub async fn subscribe(&self) -> Result<RoundStateReceiver, Error> {
        let (tx, rx): (OneshotSender<RoundEvent>, OneshotReceiver<RoundEvent>) =
            oneshot::channel();

        self.send_command(
            RoundCommand::Subscribe { response_tx: tx },
            "The Round is not alive. Can't subscribe to it",
        )
        .await?;

        match rx.await {
            Ok(RoundEvent::Subscribed { broadcast_rx }) => {
                Ok(RoundStateReceiver { broadcast_rx })
            }
            error => Err(RoundClient::handle_event_error(error)),
        }
    }

    /// Tears the round down. Stopping an already-stopped round is fine:
    /// cancellation is idempotent at this boundary, so a closed actor channel
    /// is treated as success.
    pub async fn cancel(&self) -> Result<(), Error> {
        let (tx, rx): (OneshotSender<RoundEvent>, OneshotReceiver<RoundEvent>) =
            oneshot::channel();

        if self
            .round_tx
            .send(RoundCommand::Cancel { response_tx: tx })
            .await
            .is_err()
        {
            return Ok(());
        }

        match rx.await {
            Ok(RoundEvent::Ok) => Ok(()),
            Err(_) => Ok(()),
            Ok(RoundEvent::Error { error }) => Err(error),
            Ok(unexpected_event) => Err(Error::log_and_create_internal(&format!(
                "Received an unexpected RoundEvent while cancelling. RoundEvent: '{unexpected_event}'."
            ))),
        }
    }

    async fn send_command(&self, command: RoundCommand, error_message: &str) -> Result<(), Error> {
        self.round_tx.send(command).await.map_err(|error| {
            Error::log_and_create_internal(&format!("{error_message}. Error: '{error}'."))
        })
    }

    fn handle_event_error(error: Result<RoundEvent, RecvError>) -> Error {
        match error {
            Ok(RoundEvent::Error { error }) => error,
            Ok(unexpected_event) => Error::log_and_create_internal(&format!(
                "Received an unexpected RoundEvent. RoundEvent: '{unexpected_event}'."
            )),
            _ => Error::log_and_create_internal(
                "Sent a command to the Round actor, but the actor channel died.",
            ),
        }
    }
}

pub struct RoundStateReceiver {
    broadcast_rx: broadcast::Receiver<RoundWideEvent>,
}

impl RoundStateReceiver {
    pub async fn next(&mut self) -> Result<RoundWideEvent, Error> {
        self.broadcast_rx.recv().await.map_err(|error| {
            Error::log_and_create_internal(&format!(
                "The broadcast channel with the Round has been closed. Error: {error}."
            ))
        })
    }
}
