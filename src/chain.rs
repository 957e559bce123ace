//! See the top level crate documentation for information about the [`Chain`] type.

use std::io::BufRead;
use std::mem;

use hashbrown::HashMap;
use log::{debug, warn};
use rand::Rng;

use crate::distribution::{TransitionCounter, TransitionDistribution};
use crate::error::{Error, Result};
use crate::state::{normalize, tokens, Normalized, State, StateRef};

/// First order Markov chain over the words of a corpus, frozen after training.
///
/// Every state in the chain except [`State::End`] has at least one outgoing transition, and no
/// transition ever leads back to [`State::Start`].
///
/// ```
/// # use markov_babble::{Chain, State, StateRef};
/// # use rand::thread_rng;
/// let chain = Chain::from_lines(["I am full of cats."]).unwrap();
///
/// assert_eq!(
///     chain.next_state(&mut thread_rng(), StateRef::Word("of")),
///     Some(&State::from("cats"))
/// );
///
/// // The terminator is not part of the word
/// assert_eq!(
///     chain.next_state(&mut thread_rng(), StateRef::Word("cats")),
///     Some(&State::End)
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Chain {
    map: HashMap<State, TransitionDistribution>,
}

impl Chain {
    pub fn builder() -> ChainBuilder {
        ChainBuilder::new()
    }

    /// Builds a chain from lines of text in a single pass.
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cb = Self::builder();
        cb.feed_lines(lines);
        cb.build()
    }

    /// Builds a chain from everything `reader` yields, line by line.
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut cb = Self::builder();
        cb.feed_reader(reader)?;
        cb.build()
    }

    /// Randomly picks the state following `from`, weighted by how often each successor was seen.
    ///
    /// If the chain has no transitions from `from`, `None` is returned. This is always the case
    /// for [`StateRef::End`].
    pub fn next_state(&self, rng: &mut impl Rng, from: StateRef<'_>) -> Option<&State> {
        let dist = self.map.get(&from)?;
        Some(dist.sample(rng))
    }

    /// The outgoing transitions of `from`.
    pub fn transitions(&self, from: StateRef<'_>) -> Option<&TransitionDistribution> {
        self.map.get(&from)
    }

    /// How many times `to` followed `from` in the corpus.
    pub fn weight(&self, from: StateRef<'_>, to: StateRef<'_>) -> u64 {
        self.transitions(from).map_or(0, |d| d.weight(to))
    }

    /// Whether `from` has any outgoing transitions.
    pub fn contains(&self, from: StateRef<'_>) -> bool {
        self.map.contains_key(&from)
    }

    /// All states with outgoing transitions, in no particular order.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.map.keys()
    }

    /// Number of states with outgoing transitions.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Always `false` for a chain returned by [`ChainBuilder::build()`].
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// A chain without any states, which no builder can produce.
    #[cfg(test)]
    pub(crate) fn malformed() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

/// Builds a Chain by being fed lines and counting how often each word follows another.
///
/// A word ending with `.`, `!` or `?` ends a sentence: it gets a transition to [`State::End`], and
/// the next word is counted as following [`State::Start`].
#[derive(Clone, Debug)]
pub struct ChainBuilder {
    map: HashMap<State, TransitionCounter>,
    /// The state the next word will follow.
    prev: State,
    /// Sentences ended by a terminator, as opposed to the end of the corpus.
    terminated: usize,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            prev: State::Start,
            terminated: 0,
        }
    }

    /// Uses up the builder and creates a new chain.
    ///
    /// A sentence still open at the end of the corpus is ended at its last word.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyCorpus`] if the builder has not been fed any words.
    pub fn build(mut self) -> Result<Chain> {
        self.end_sentence();

        let starts = match self.map.get(&StateRef::Start) {
            Some(b) => b.len(),
            None => return Err(Error::EmptyCorpus),
        };
        if self.terminated == 0 {
            warn!("corpus has no sentence terminators, sentences only end at its last word");
        }

        let mut chain_map = HashMap::with_capacity(self.map.len());
        let mut transitions = 0;
        for (state, counter) in self.map {
            transitions += counter.len();
            chain_map.insert(state, counter.build()?);
        }
        debug!(
            "built chain with {} states, {transitions} transitions and {starts} start words",
            chain_map.len()
        );

        Ok(Chain { map: chain_map })
    }

    /// Add the occurrence of `to` following `from`.
    fn add_transition(&mut self, from: StateRef<'_>, to: StateRef<'_>) {
        match self.map.get_mut(&from) {
            Some(b) => {
                b.add(to);
            }
            None => {
                let mut b = TransitionCounter::new();
                b.add(to);
                self.map.insert(from.to_state(), b);
            }
        }
    }

    /// Ends the current sentence at the previous word, if there is one.
    fn end_sentence(&mut self) {
        if let State::Word(prev) = mem::replace(&mut self.prev, State::Start) {
            self.add_transition(StateRef::Word(&prev), StateRef::End);
        }
    }

    /// Feeds a single whitespace separated piece of text.
    ///
    /// A piece that is nothing but a terminator (a lone `"."`) adds no word, but still ends the
    /// current sentence.
    pub fn feed_token(&mut self, raw: &str) {
        self.feed_normalized(normalize(raw));
    }

    fn feed_normalized(&mut self, Normalized { word, terminating }: Normalized<'_>) {
        if word.is_empty() {
            if terminating {
                self.terminated += 1;
                self.end_sentence();
            }
            return;
        }

        let prev = mem::replace(&mut self.prev, State::Start);
        self.add_transition(prev.as_ref(), StateRef::Word(word));

        if terminating {
            self.terminated += 1;
            self.add_transition(StateRef::Word(word), StateRef::End);
        } else {
            self.prev = State::from(word);
        }
    }

    /// Feeds one line of text. Sentences may span lines.
    pub fn feed_line(&mut self, line: &str) {
        for token in tokens(line) {
            self.feed_normalized(token);
        }
    }

    pub fn feed_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.feed_line(line.as_ref());
        }
    }

    /// Feeds a whole text, line by line.
    pub fn feed_str(&mut self, content: &str) {
        self.feed_lines(content.lines());
    }

    /// Feeds everything `reader` yields, line by line.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if reading fails, or the input is not valid UTF-8. Lines read before the
    /// failure stay fed.
    pub fn feed_reader(&mut self, reader: impl BufRead) -> Result<()> {
        for line in reader.lines() {
            self.feed_line(&line?);
        }
        Ok(())
    }
}

impl Default for ChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::state::{State, StateRef};
    use crate::{Chain, Error};

    use crate::state::StateRef::{End, Start, Word};

    #[test]
    fn empty_chain_builder_fails() {
        assert!(matches!(Chain::builder().build(), Err(Error::EmptyCorpus)));
    }

    #[test]
    fn whitespace_only_corpus_fails() {
        assert!(matches!(
            Chain::from_lines(["", "   ", "\t\t"]),
            Err(Error::EmptyCorpus)
        ));
    }

    #[test]
    fn only_terminators_corpus_fails() {
        assert!(matches!(
            Chain::from_lines([". ! ?", "."]),
            Err(Error::EmptyCorpus)
        ));
    }

    #[test]
    fn counts_repeated_sentences() {
        let chain = Chain::from_lines(["A B. A C. A C."]).unwrap();

        assert_eq!(chain.weight(Start, Word("A")), 3);
        assert_eq!(chain.weight(Word("A"), Word("B")), 1);
        assert_eq!(chain.weight(Word("A"), Word("C")), 2);
        assert_eq!(chain.weight(Word("B"), End), 1);
        assert_eq!(chain.weight(Word("C"), End), 2);
        assert_eq!(chain.weight(Word("A"), End), 0);

        // Start, A, B and C
        assert_eq!(chain.len(), 4);
        assert_eq!(chain.transitions(Start).unwrap().len(), 1);
        assert!(!chain.contains(End));
    }

    #[test]
    fn sentences_span_lines() {
        let chain = Chain::from_lines(["I am", "full of", "cats."]).unwrap();
        assert_eq!(chain.weight(Word("am"), Word("full")), 1);
        assert_eq!(chain.weight(Word("of"), Word("cats")), 1);
        assert_eq!(chain.weight(Start, Word("full")), 0);
    }

    #[test]
    fn only_last_terminator_is_stripped() {
        let chain = Chain::from_lines(["wow!! such.. cats?"]).unwrap();
        assert_eq!(chain.weight(Start, Word("wow!")), 1);
        assert_eq!(chain.weight(Word("wow!"), End), 1);
        assert_eq!(chain.weight(Start, Word("such.")), 1);
        assert_eq!(chain.weight(Start, Word("cats")), 1);
    }

    #[test]
    fn lone_terminator_ends_sentence() {
        let chain = Chain::from_lines(["Hello world . Bye ."]).unwrap();
        assert_eq!(chain.weight(Word("world"), End), 1);
        assert_eq!(chain.weight(Start, Word("Bye")), 1);
        assert_eq!(chain.weight(Word("Bye"), End), 1);
        assert!(!chain.contains(Word("")));
        assert!(chain.states().all(|s| s.word() != Some("")));
    }

    #[test]
    fn unterminated_corpus_ends_at_last_word() {
        let chain = Chain::from_lines(["a b c"]).unwrap();
        assert_eq!(chain.weight(Word("c"), End), 1);
        assert_eq!(chain.weight(Word("b"), End), 0);
    }

    #[test]
    fn case_sensitive_words() {
        let chain = Chain::from_lines(["The cat. the dog."]).unwrap();
        assert_eq!(chain.weight(Start, Word("The")), 1);
        assert_eq!(chain.weight(Start, Word("the")), 1);
    }

    #[test]
    fn graph_shape() {
        let chain = Chain::from_lines([
            "Coach: How's it going, Norm?",
            "Norm:  Daddy's rich and Momma's good lookin'.",
            "                -- Cheers, Truce or Consequences",
            "",
            "Sam:   What's up, Norm?",
            "Norm:  My nipples.  It's freezing out there.",
            "                -- Cheers, Coach Returns to Action",
        ])
        .unwrap();

        assert!(chain.contains(Start));
        for state in chain.states() {
            assert!(!state.is_end());
            let dist = chain.transitions(state.as_ref()).unwrap();
            assert!(!dist.is_empty());
            for (target, weight) in dist.iter() {
                assert!(weight > 0);
                assert!(!target.is_start());
                assert!(target.is_end() || chain.contains(target.as_ref()));
            }
        }
    }

    #[test]
    fn feed_reader_reads_every_line() {
        let text = "one two.\nthree four.\n";
        let chain = Chain::from_reader(text.as_bytes()).unwrap();
        assert_eq!(chain.weight(Start, Word("one")), 1);
        assert_eq!(chain.weight(Start, Word("three")), 1);
    }

    #[test]
    fn feed_reader_rejects_invalid_utf8() {
        let bytes: &[u8] = &[b'h', b'i', 0xff, b'\n'];
        assert!(matches!(Chain::from_reader(bytes), Err(Error::Io(_))));
    }

    #[test]
    fn feed_str_matches_feed_lines() {
        let mut by_str = Chain::builder();
        by_str.feed_str("I am\nfull of cats.");
        let by_str = by_str.build().unwrap();
        let by_lines = Chain::from_lines(["I am", "full of cats."]).unwrap();

        for state in by_lines.states() {
            for (target, weight) in by_lines.transitions(state.as_ref()).unwrap().iter() {
                assert_eq!(by_str.weight(state.as_ref(), target.as_ref()), weight);
            }
        }
        assert_eq!(by_str.len(), by_lines.len());
    }

    #[test]
    fn next_state_unknown_is_none() {
        let chain = Chain::from_lines(["I am."]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(chain.next_state(&mut rng, Word("You")).is_none());
        assert!(chain.next_state(&mut rng, End).is_none());
        assert_eq!(chain.next_state(&mut rng, Start), Some(&State::from("I")));
    }
}
