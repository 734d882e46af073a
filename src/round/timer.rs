use rust_fsm::StateMachine;

use crate::config::RoundSettings;
use crate::error::domain_error::DomainError;
use crate::error::Error;
use crate::round::timer_fsm::{TimerFsm, TimerFsmInput, TimerFsmState};

/// The round countdown as a pure state machine. It holds no clock of its own:
/// whoever owns the timer schedules the periodic `tick` calls, which keeps the
/// countdown testable and keeps cancellation decoupled from any runtime.
#[derive(Debug)]
pub struct CountdownTimer {
    fsm: StateMachine<TimerFsm>,
    remaining_seconds: u64,
    tick_interval_seconds: u64,
    panic_threshold_seconds: u64,
}

/// What a single delivered tick reported. `panic` is level-triggered: it is
/// true on every tick inside the panic window, not only when entering it.
#[derive(Clone, Debug, PartialEq)]
pub enum Tick {
    Running { remaining_seconds: u64, panic: bool },
    Expired,
}

impl CountdownTimer {
    pub fn start(settings: &RoundSettings) -> Result<Self, Error> {
        if settings.tick_interval_seconds == 0 {
            return Err(Error::Domain(DomainError::ZeroTickInterval));
        }
        if settings.total_seconds == 0 {
            return Err(Error::Domain(DomainError::ZeroTotalDuration));
        }

        let mut timer = CountdownTimer {
            fsm: StateMachine::default(),
            remaining_seconds: settings.total_seconds,
            tick_interval_seconds: settings.tick_interval_seconds,
            panic_threshold_seconds: settings.panic_threshold_seconds,
        };
        timer.process_input(&TimerFsmInput::Start)?;
        Ok(timer)
    }

    /// Applies one elapsed tick interval. Returns `None` once the countdown is
    /// no longer running, so a late tick after expiry or cancellation is inert.
    pub fn tick(&mut self) -> Option<Tick> {
        if self.fsm.state() != &TimerFsmState::Running {
            return None;
        }

        self.remaining_seconds = self
            .remaining_seconds
            .saturating_sub(self.tick_interval_seconds);

        // Tick and Expire are both defined transitions from Running.
        if self.remaining_seconds == 0 {
            let _ = self.fsm.consume(&TimerFsmInput::Expire);
            Some(Tick::Expired)
        } else {
            let _ = self.fsm.consume(&TimerFsmInput::Tick);
            Some(Tick::Running {
                remaining_seconds: self.remaining_seconds,
                panic: self.remaining_seconds <= self.panic_threshold_seconds,
            })
        }
    }

    /// Stops the countdown. Idempotent, and a no-op on an already finished
    /// countdown. After this returns, `tick` always yields `None`.
    pub fn cancel(&mut self) {
        match self.fsm.state() {
            TimerFsmState::Finished | TimerFsmState::Cancelled => {}
            _ => {
                let _ = self.fsm.consume(&TimerFsmInput::Cancel);
            }
        }
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn state(&self) -> &TimerFsmState {
        self.fsm.state()
    }

    pub fn is_running(&self) -> bool {
        self.fsm.state() == &TimerFsmState::Running
    }

    fn process_input(&mut self, input: &TimerFsmInput) -> Result<(), Error> {
        self.fsm.consume(input).map(|_| ()).map_err(|error| {
            Error::log_and_create_internal(&format!(
                "The timer fsm in state {:?} can't transition with an input {:?}. Error: '{error}'.",
                self.fsm.state(),
                input
            ))
        })
    }
}
