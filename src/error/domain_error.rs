use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("The word list is empty, a round cannot be started without words.")]
    EmptyWordList,
    #[error("The round is over. Items can no longer be marked correct or skipped.")]
    RoundAlreadyFinished,
    #[error("The countdown tick interval cannot be zero seconds.")]
    ZeroTickInterval,
    #[error("The countdown total duration cannot be zero seconds.")]
    ZeroTotalDuration,
}
