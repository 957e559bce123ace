//! Random walks over a [`Chain`], from [`State::Start`] to [`State::End`].

use std::fmt;

use itertools::Itertools;
use log::trace;
use rand::Rng;

use crate::chain::Chain;
use crate::error::{Error, Result};
use crate::state::{State, StateRef, TokenRef};

/// How many sentences to generate, and how long they may get.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Request {
    pub sentences: usize,
    /// Maximum number of states in a sentence, `0` for no maximum.
    pub limit: usize,
}

impl Request {
    /// Validates user supplied counts.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `sentences < 1` or `limit < 0`.
    pub fn new(sentences: i64, limit: i64) -> Result<Self> {
        let sentences = match usize::try_from(sentences) {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(Error::InvalidArgument {
                    value: sentences,
                    reason: "the number of sentences must be positive",
                })
            }
        };
        let limit = usize::try_from(limit).map_err(|_| Error::InvalidArgument {
            value: limit,
            reason: "the maximum word count must be >= 0 (0 for no maximum)",
        })?;

        Ok(Self { sentences, limit })
    }
}

/// Samples sentences from a [`Chain`] using its own random number generator.
///
/// Any number of generators may share the same chain.
///
/// ```
/// # use markov_babble::{Chain, SentenceGenerator};
/// # use rand::rngs::StdRng;
/// # use rand::SeedableRng;
/// let chain = Chain::from_lines(["I am full of cats."]).unwrap();
/// let mut generator = SentenceGenerator::new(&chain, StdRng::seed_from_u64(3));
///
/// let sentence = generator.generate(0).unwrap();
/// assert_eq!(sentence.to_string(), "I am full of cats");
/// assert!(sentence.is_terminated());
///
/// // The end counts towards the limit
/// assert_eq!(generator.generate(3).unwrap().to_string(), "I am full");
/// ```
#[derive(Clone, Debug)]
pub struct SentenceGenerator<'c, R> {
    chain: &'c Chain,
    rng: R,
}

impl<'c, R: Rng> SentenceGenerator<'c, R> {
    pub fn new(chain: &'c Chain, rng: R) -> Self {
        Self { chain, rng }
    }

    pub fn chain(&self) -> &'c Chain {
        self.chain
    }

    fn step(&mut self, from: StateRef<'_>) -> Result<&'c State> {
        let chain = self.chain;
        let next = chain
            .next_state(&mut self.rng, from)
            .ok_or_else(|| Error::MalformedState(from.to_state()))?;
        trace!("{from} -> {next}");
        Ok(next)
    }

    /// Walks the chain from [`State::Start`] until [`State::End`] is sampled, or the sentence
    /// holds `limit` states. A `limit` of `0` means no limit.
    ///
    /// With no limit, this only returns once [`State::End`] is reached. That is certain for a
    /// chain built from a finite corpus, but may take long if the corpus loops a lot.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedState`] if a state without transitions is reached.
    pub fn generate(&mut self, limit: usize) -> Result<Sentence<'c>> {
        let mut current = self.step(StateRef::Start)?;
        let mut states = vec![current];

        while !current.is_end() && (limit == 0 || states.len() < limit) {
            current = self.step(current.as_ref())?;
            states.push(current);
        }

        Ok(Sentence { states })
    }

    /// Generates `n` sentences.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] before anything is sampled if `n` is `0`, otherwise the same as
    /// [`SentenceGenerator::generate()`].
    pub fn generate_n(&mut self, n: usize, limit: usize) -> Result<Vec<Sentence<'c>>> {
        if n < 1 {
            return Err(Error::InvalidArgument {
                value: 0,
                reason: "the number of sentences must be positive",
            });
        }
        self.sentences(limit).take(n).collect()
    }

    /// An endless supply of sentences.
    pub fn sentences(&mut self, limit: usize) -> Sentences<'_, 'c, R> {
        Sentences {
            generator: self,
            limit,
        }
    }
}

/// Iterator returned by [`SentenceGenerator::sentences()`]. Never returns `None`.
#[derive(Debug)]
pub struct Sentences<'g, 'c, R> {
    generator: &'g mut SentenceGenerator<'c, R>,
    limit: usize,
}

impl<'g, 'c, R: Rng> Iterator for Sentences<'g, 'c, R> {
    type Item = Result<Sentence<'c>>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generator.generate(self.limit))
    }
}

/// The states sampled by one walk, including [`State::End`] if it was reached.
///
/// Displays as its words joined by spaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sentence<'c> {
    states: Vec<&'c State>,
}

impl<'c> Sentence<'c> {
    pub fn states(&self) -> &[&'c State] {
        &self.states
    }

    /// The words of the sentence, without [`State::End`].
    pub fn words(&self) -> impl Iterator<Item = TokenRef<'c>> + '_ {
        self.states.iter().filter_map(|&s| s.word())
    }

    /// Number of sampled states, [`State::End`] included.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Whether the walk reached [`State::End`] rather than the limit.
    pub fn is_terminated(&self) -> bool {
        self.states.last().is_some_and(|s| s.is_end())
    }
}

impl fmt::Display for Sentence<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.words().format(" "))
    }
}
