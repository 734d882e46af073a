pub mod actor;
pub mod actor_client;
pub mod timer;
pub mod timer_fsm;

use serde::Serialize;

use crate::config::RoundSettings;
use crate::deck::Deck;
use crate::error::domain_error::DomainError;
use crate::error::Error;
use crate::round::timer::{CountdownTimer, Tick};

/// A pending haptic/audio notification for the presentation layer. The slot
/// holds at most one cue and the last write wins: a cue set before the
/// previous one was acknowledged silently overwrites it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum Cue {
    Correct,
    Panic,
    Expired,
}

/// The observable aggregate of a round, a plain value the presentation layer
/// can diff against its last render.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoundState {
    pub current_item: String,
    pub score: i64,
    pub remaining_seconds: u64,
    pub finished: bool,
    pub pending_cue: Option<Cue>,
}

/// One timed play session: a deck of items, a countdown, a score and the
/// single-slot notification ledger. All operations are O(1) in-memory
/// updates; scheduling of the countdown ticks belongs to the caller (the
/// round actor, in this crate).
#[derive(Debug)]
pub struct Round {
    deck: Deck,
    timer: CountdownTimer,
    current_item: String,
    score: i64,
    finished: bool,
    pending_cue: Option<Cue>,
}

impl Round {
    /// Creates a round over the given source list and starts its countdown.
    /// An empty list or zero-valued countdown settings are rejected here,
    /// before anything is running.
    pub fn new(words: Vec<String>, settings: &RoundSettings) -> Result<Self, Error> {
        let mut deck = Deck::new(words)?;
        let timer = CountdownTimer::start(settings)?;
        let current_item = deck.draw();

        Ok(Round {
            deck,
            timer,
            current_item,
            score: 0,
            finished: false,
            pending_cue: None,
        })
    }

    /// The player guessed the current item: one point up, next item, and a
    /// Correct cue for the presentation layer.
    pub fn mark_correct(&mut self) -> Result<(), Error> {
        self.ensure_active()?;
        self.score += 1;
        self.current_item = self.deck.draw();
        self.pending_cue = Some(Cue::Correct);
        Ok(())
    }

    /// The player passed on the current item: one point down and the next
    /// item. Skips are silent, the cue slot is left as it was.
    pub fn skip(&mut self) -> Result<(), Error> {
        self.ensure_active()?;
        self.score -= 1;
        self.current_item = self.deck.draw();
        Ok(())
    }

    /// Applies one elapsed countdown tick. Inside the panic window every tick
    /// writes a Panic cue, overwriting whatever was in the slot; the tick
    /// that reaches zero marks the round finished and writes the Expired cue.
    pub fn tick(&mut self) {
        match self.timer.tick() {
            Some(Tick::Running { panic: true, .. }) => {
                self.pending_cue = Some(Cue::Panic);
            }
            Some(Tick::Running { .. }) => {}
            Some(Tick::Expired) => {
                self.finished = true;
                self.pending_cue = Some(Cue::Expired);
                log::info!("Round finished. Score: '{}'.", self.score);
            }
            None => {}
        }
    }

    /// Clears the finish flag once the presentation layer has reacted to it,
    /// so repeated polling does not re-trigger navigation. Idempotent.
    pub fn acknowledge_finish(&mut self) {
        self.finished = false;
    }

    /// Clears the cue slot once the presentation layer has emitted the
    /// corresponding effect. Idempotent.
    pub fn acknowledge_cue(&mut self) {
        self.pending_cue = None;
    }

    /// Stops the countdown. Idempotent; no tick is applied afterwards.
    pub fn cancel(&mut self) {
        self.timer.cancel();
    }

    pub fn current_item(&self) -> &str {
        &self.current_item
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.timer.remaining_seconds()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn pending_cue(&self) -> Option<Cue> {
        self.pending_cue
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn snapshot(&self) -> RoundState {
        RoundState {
            current_item: self.current_item.clone(),
            score: self.score,
            remaining_seconds: self.timer.remaining_seconds(),
            finished: self.finished,
            pending_cue: self.pending_cue,
        }
    }

    // Marking and skipping are only valid while the countdown runs. Doing
    // either on a finished or cancelled round is a caller bug and is reported
    // as a domain error rather than silently ignored.
    fn ensure_active(&self) -> Result<(), Error> {
        if !self.timer.is_running() {
            return Err(Error::Domain(DomainError::RoundAlreadyFinished));
        }
        Ok(())
    }
}
