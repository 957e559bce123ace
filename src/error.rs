use rand_distr::WeightedError;
use thiserror::Error;

use crate::state::State;

/// Errors that can occur when building a chain or generating sentences from it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("the corpus contains no words to start a sentence with")]
    EmptyCorpus,

    #[error("{reason} (got {value})")]
    InvalidArgument { value: i64, reason: &'static str },

    /// A state with no outgoing transitions was asked for a successor. Cannot happen with a chain
    /// built by [`ChainBuilder`](crate::ChainBuilder).
    #[error("no transitions recorded from state {0}")]
    MalformedState(State),

    #[error("failed to read corpus: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid transition weights: {0}")]
    Weights(#[from] WeightedError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
