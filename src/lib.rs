//! Dead simple sentence generation using markov chains.
//!
//! A [`Chain`] is a first order Markov chain over the words of a corpus: it looks at one word
//! and guesses the next one, weighted by how often that pair of words appeared in the corpus.
//! Every sentence starts at [`State::Start`] and walks the chain until it reaches
//! [`State::End`]. The randomness is built using a weighted distribution (see
//! [`rand_distr::weighted_alias::WeightedAliasIndex`]).
//!
//! Words are whatever lies between whitespace. A word ending in `.`, `!` or `?` ends a sentence;
//! that last character is dropped, and the next word is counted as a sentence start.
//!
//! ```
//! use markov_babble::{Chain, SentenceGenerator};
//! use rand::thread_rng;
//!
//! let text = "The cat sat on the mat. The dog sat on the cat!";
//! let chain = Chain::from_lines(text.lines()).unwrap();
//!
//! let mut generator = SentenceGenerator::new(&chain, thread_rng());
//! let sentence = generator.generate(0).unwrap();
//! assert!(sentence.to_string().starts_with("The "));
//! assert!(sentence.is_terminated());
//! ```
//!
//! # Features
//!
//! `markov-babble` comes with some features that you can disable (or enable) at will. They are:
//!
//! - `inline-more` - Forwards to the `hashbrown` feature of the same name. Enabled by default.

pub mod chain;
pub mod distribution;
pub mod error;
pub mod generate;
pub mod state;

pub use chain::{Chain, ChainBuilder};
pub use error::{Error, Result};
pub use generate::{Request, Sentence, SentenceGenerator};
pub use state::{State, StateRef, Token};
