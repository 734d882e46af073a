use std::fmt;

use rust_fsm::state_machine;

/*
 * Idle
 * Running
 *    One tick per interval, counting the remaining seconds down
 *    Reaching zero finishes the countdown
 * Finished | Cancelled
 */
state_machine! {
    derive(Debug, Clone, PartialEq)
    pub TimerFsm(Idle)

    Idle => {
        Start => Running,
        Cancel => Cancelled,
    },
    Running => {
        Tick => Running,
        Expire => Finished,
        Cancel => Cancelled,
    }
}

impl fmt::Display for TimerFsmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
