//! [`TransitionDistribution`]s describe where a [`Chain`](crate::Chain) may go from a single
//! [`State`], and how often each target was observed in the corpus.

use hashbrown::HashMap;
use log::trace;
use rand::Rng;
use rand_distr::weighted_alias::WeightedAliasIndex;
use rand_distr::Distribution;

use crate::error::Result;
use crate::state::{State, StateRef};

/// The outgoing transitions of one state, frozen for sampling.
///
/// Targets are kept in the order they were first observed, so a seeded [`Rng`] always walks the
/// chain the same way.
#[derive(Clone, Debug)]
pub struct TransitionDistribution {
    /// Mappings of index in `targets` to their likelihood.
    dist: WeightedAliasIndex<u64>,
    targets: Vec<State>,
    /// How many times each target was observed. Parallel to `targets`.
    weights: Vec<u64>,
}

impl TransitionDistribution {
    pub fn builder() -> TransitionCounter {
        TransitionCounter::new()
    }

    /// Picks a target with probability `weight / total`.
    pub fn sample(&self, rng: &mut impl Rng) -> &State {
        let target = &self.targets[self.dist.sample(rng)];
        trace!("sampled {target} out of {} targets", self.targets.len());
        target
    }

    /// How many times `target` was observed, `0` if never.
    pub fn weight(&self, target: StateRef<'_>) -> u64 {
        self.iter()
            .find_map(|(t, w)| (*t == target).then_some(w))
            .unwrap_or(0)
    }

    /// Sum of all weights.
    pub fn total(&self) -> u64 {
        self.weights.iter().sum()
    }

    /// Every target with its weight, in order of first observation.
    pub fn iter(&self) -> impl Iterator<Item = (&State, u64)> {
        self.targets.iter().zip(self.weights.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Always `false` for distributions inside a built chain.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Builder for [`TransitionDistribution`]. Only supports counting another occurrence of a
/// target; use [`TransitionCounter::build()`] to freeze it.
#[derive(Clone, Debug)]
pub struct TransitionCounter {
    /// Position of each target in `targets`.
    index: HashMap<State, usize>,
    targets: Vec<State>,
    weights: Vec<u64>,
}

impl TransitionCounter {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            targets: Vec::new(),
            weights: Vec::new(),
        }
    }

    /// Add an occurrence of this target.
    pub fn add(&mut self, target: StateRef<'_>) {
        match self.index.get(&target) {
            Some(&i) => {
                self.weights[i] += 1;
            }
            None => {
                let state = target.to_state();
                self.index.insert(state.clone(), self.targets.len());
                self.targets.push(state);
                self.weights.push(1);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Creates a weighted distribution from the counted occurrences.
    ///
    /// # Errors
    ///
    /// [`Error::Weights`](crate::Error::Weights) if no target has been added.
    pub fn build(self) -> Result<TransitionDistribution> {
        let dist = WeightedAliasIndex::new(self.weights.clone())?;
        Ok(TransitionDistribution {
            dist,
            targets: self.targets,
            weights: self.weights,
        })
    }
}

impl Default for TransitionCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::Error;

    #[test]
    fn empty_counter_fails_to_build() {
        assert!(matches!(
            TransitionDistribution::builder().build(),
            Err(Error::Weights(_))
        ));
    }

    #[test]
    fn counts_in_first_seen_order() {
        let mut b = TransitionDistribution::builder();
        b.add(StateRef::Word("cat"));
        b.add(StateRef::End);
        b.add(StateRef::Word("cat"));
        b.add(StateRef::Word("dog"));
        b.add(StateRef::Word("cat"));
        let dist = b.build().unwrap();

        let seen: Vec<_> = dist.iter().map(|(s, w)| (s.clone(), w)).collect();
        assert_eq!(
            seen,
            vec![
                (State::from("cat"), 3),
                (State::End, 1),
                (State::from("dog"), 1)
            ]
        );
        assert_eq!(dist.total(), 5);
        assert_eq!(dist.weight(StateRef::Word("cat")), 3);
        assert_eq!(dist.weight(StateRef::Word("bird")), 0);
    }

    #[test]
    fn single_target_is_always_sampled() {
        let mut b = TransitionDistribution::builder();
        b.add(StateRef::Word("only"));
        let dist = b.build().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(dist.sample(&mut rng), &State::from("only"));
        }
    }

    #[test]
    fn sampling_follows_weights() {
        let mut b = TransitionDistribution::builder();
        for _ in 0..3 {
            b.add(StateRef::Word("often"));
        }
        b.add(StateRef::Word("rarely"));
        let dist = b.build().unwrap();

        let mut rng = StdRng::seed_from_u64(42);
        let often = (0..4000)
            .filter(|_| dist.sample(&mut rng) == &State::from("often"))
            .count();
        // Expect around 3000
        assert!((2800..3200).contains(&often), "got {often}");
    }
}
