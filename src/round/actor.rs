use std::fmt::{Display, Formatter};
use std::time::Duration;
use tokio::sync::broadcast::error::SendError;
use tokio::sync::oneshot::Sender as OneshotSender;
use tokio::sync::{
    broadcast, mpsc,
    mpsc::{Receiver, Sender},
};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::RoundSettings;
use crate::error::Error;
use crate::metrics::ACTIVE_ROUNDS;
use crate::round::actor_client::RoundClient;
use crate::round::{Round, RoundState};

/// Owns a live `Round` and serializes every mutation of it: presentation
/// commands arrive over the actor channel and countdown ticks come from the
/// interval polled in the same loop, so a tick can never race a score update.
pub struct RoundActor {
    round: Round,
    round_rx: Receiver<RoundCommand>,
    broadcast_tx: broadcast::Sender<RoundWideEvent>,
    tick_interval: Duration,
}

impl RoundActor {
    /// Builds the round synchronously, so configuration errors (an empty word
    /// list, zero-valued settings) surface to the caller before any task is
    /// spawned, then starts the actor loop.
    pub fn spawn(words: Vec<String>, settings: &RoundSettings) -> Result<RoundClient, Error> {
        let round = Round::new(words, settings)?;
        let (round_tx, round_rx): (Sender<RoundCommand>, Receiver<RoundCommand>) =
            mpsc::channel(128);
        let (broadcast_tx, _): (
            broadcast::Sender<RoundWideEvent>,
            broadcast::Receiver<RoundWideEvent>,
        ) = broadcast::channel(32);

        tokio::spawn(
            RoundActor {
                round,
                round_rx,
                broadcast_tx,
                tick_interval: settings.tick_interval(),
            }
            .start(),
        );

        Ok(RoundClient { round_tx })
    }

    async fn start(mut self) {
        ACTIVE_ROUNDS.inc();

        // The first tick is due one full interval after the round starts.
        let mut ticker = time::interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick(), if self.round.is_running() => {
                    self.round.tick();
                    let _ = self.send_round_state();
                }
                command = self.round_rx.recv() => match command {
                    None => {
                        log::info!("Round channel has been dropped. Stopping round actor.");
                        break;
                    }
                    Some(command) => {
                        let (result, response_tx, stop) = match command {
                            RoundCommand::MarkCorrect { response_tx } => (
                                self.round.mark_correct().map(|_| RoundEvent::Ok),
                                response_tx,
                                false,
                            ),
                            RoundCommand::Skip { response_tx } => {
                                (self.round.skip().map(|_| RoundEvent::Ok), response_tx, false)
                            }
                            RoundCommand::AcknowledgeCue { response_tx } => {
                                self.round.acknowledge_cue();
                                (Ok(RoundEvent::Ok), response_tx, false)
                            }
                            RoundCommand::AcknowledgeFinish { response_tx } => {
                                self.round.acknowledge_finish();
                                (Ok(RoundEvent::Ok), response_tx, false)
                            }
                            RoundCommand::Subscribe { response_tx } => (
                                Ok(RoundEvent::Subscribed {
                                    broadcast_rx: self.broadcast_tx.subscribe(),
                                }),
                                response_tx,
                                false,
                            ),
                            RoundCommand::Cancel { response_tx } => {
                                self.round.cancel();
                                (Ok(RoundEvent::Ok), response_tx, true)
                            }
                        };
                        let event = match result {
                            Ok(event) => event,
                            Err(error) => RoundEvent::Error { error },
                        };
                        if let Err(event) = response_tx.send(event) {
                            log::error!("Sent a RoundEvent but the response channel is closed. RoundEvent: '{event}'.");
                        }
                        let _ = self.send_round_state();
                        if stop {
                            log::info!("Round has been cancelled. Stopping round actor.");
                            break;
                        }
                    }
                }
            }
        }

        // The loop has ended, no further tick can be applied to this round.
        self.round.cancel();
        ACTIVE_ROUNDS.dec();
    }

    fn send_round_state(&self) -> Result<usize, SendError<RoundWideEvent>> {
        self.broadcast_tx.send(RoundWideEvent::RoundState {
            state: self.round.snapshot(),
        })
    }
}

pub(crate) enum RoundCommand {
    MarkCorrect {
        response_tx: OneshotSender<RoundEvent>,
    },
    Skip {
        response_tx: OneshotSender<RoundEvent>,
    },
    AcknowledgeCue {
        response_tx: OneshotSender<RoundEvent>,
    },
    AcknowledgeFinish {
        response_tx: OneshotSender<RoundEvent>,
    },
    Subscribe {
        response_tx: OneshotSender<RoundEvent>,
    },
    Cancel {
        response_tx: OneshotSender<RoundEvent>,
    },
}

#[derive(Debug)]
pub(crate) enum RoundEvent {
    Ok,
    Subscribed {
        broadcast_rx: broadcast::Receiver<RoundWideEvent>,
    },
    Error {
        error: Error,
    },
}

impl Display for RoundEvent {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                RoundEvent::Ok => "RoundEvent::Ok".to_string(),
                RoundEvent::Subscribed { .. } => "RoundEvent::Subscribed".to_string(),
                RoundEvent::Error { error } => format!("Error '{error}'"),
            }
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RoundWideEvent {
    RoundState { state: RoundState },
}
