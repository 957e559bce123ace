//! The nodes of a [`Chain`](crate::Chain) are [`State`]s: either one of the two sentinels
//! [`State::Start`] and [`State::End`], or a [`Token`] taken from the corpus.
//!
//! Tokens are produced by [`tokens()`], which splits a line on whitespace and strips at most one
//! trailing sentence terminator (`.`, `!` or `?`) from each piece. Nothing else is done to them;
//! `"Hello"` and `"hello"` are different tokens, and so are `"wow"` and `"wow!"`.

use std::fmt;
use std::hash::{Hash, Hasher};

use hashbrown::Equivalent;

/// Representation of a word in the corpus.
pub type Token = String;

/// A borrowed version of [`Token`]; if [`Token`] is [`String`], then [`TokenRef`] is `&str`.
pub type TokenRef<'a> = &'a str;

/// Characters that end a sentence when they are the last character of a token.
pub const TERMINATORS: [char; 3] = ['?', '!', '.'];

/// A node in the chain.
///
/// The sentinels are their own variants, so no word from the corpus can ever be mistaken for
/// one of them, not even an empty one.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum State {
    /// Where every sentence begins. Has no incoming transitions.
    Start,
    /// Where a sentence ends. Has no outgoing transitions.
    End,
    Word(Token),
}

/// A borrowed version of [`State`] that does not own its word. Like [`TokenRef`] to [`Token`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateRef<'a> {
    Start,
    End,
    Word(TokenRef<'a>),
}

impl State {
    pub fn as_ref(&self) -> StateRef<'_> {
        match self {
            Self::Start => StateRef::Start,
            Self::End => StateRef::End,
            Self::Word(w) => StateRef::Word(w),
        }
    }

    /// The word of this state, or `None` for the sentinels.
    pub fn word(&self) -> Option<TokenRef<'_>> {
        self.as_ref().word()
    }

    pub fn is_start(&self) -> bool {
        matches!(self, Self::Start)
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }
}

impl<'a> StateRef<'a> {
    pub fn word(self) -> Option<TokenRef<'a>> {
        match self {
            Self::Word(w) => Some(w),
            Self::Start | Self::End => None,
        }
    }

    pub fn to_state(self) -> State {
        State::from(self)
    }
}

// Hashing goes through `StateRef` so that a `StateRef` can be used to look up a `State` key
// without allocating.
impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_ref().hash(state);
    }
}

impl<'a> From<StateRef<'a>> for State {
    fn from(value: StateRef<'a>) -> Self {
        match value {
            StateRef::Start => Self::Start,
            StateRef::End => Self::End,
            StateRef::Word(w) => Self::Word(w.to_string()),
        }
    }
}

impl From<&str> for State {
    fn from(value: &str) -> Self {
        Self::Word(value.to_string())
    }
}

impl PartialEq<StateRef<'_>> for State {
    fn eq(&self, other: &StateRef<'_>) -> bool {
        self.as_ref() == *other
    }
}

impl Equivalent<State> for StateRef<'_> {
    fn equivalent(&self, key: &State) -> bool {
        key.eq(self)
    }
}

impl fmt::Display for StateRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("<start>"),
            Self::End => f.write_str("<end>"),
            Self::Word(w) => write!(f, "{w:?}"),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_ref().fmt(f)
    }
}

/// A raw piece of a line after its trailing terminator (if any) has been stripped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Normalized<'a> {
    pub word: TokenRef<'a>,
    /// Whether the raw piece ended with one of the [`TERMINATORS`].
    pub terminating: bool,
}

/// Strips exactly one trailing terminator from `raw`.
///
/// ```
/// # use markov_babble::state::{normalize, Normalized};
/// assert_eq!(normalize("cats."), Normalized { word: "cats", terminating: true });
/// assert_eq!(normalize("wow!!"), Normalized { word: "wow!", terminating: true });
/// assert_eq!(normalize("dogs"), Normalized { word: "dogs", terminating: false });
/// ```
pub fn normalize(raw: &str) -> Normalized<'_> {
    match raw.strip_suffix(TERMINATORS) {
        Some(word) => Normalized {
            word,
            terminating: true,
        },
        None => Normalized {
            word: raw,
            terminating: false,
        },
    }
}

/// Splits `line` on whitespace and normalizes every piece.
pub fn tokens(line: &str) -> impl Iterator<Item = Normalized<'_>> {
    line.split_whitespace().map(normalize)
}
