use bit_set::BitSet;
use log::trace;
use rand::{rng, seq::IteratorRandom};

use crate::{automata::Automaton, Word};

/// The result of sampling from an automaton.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SampleResult {
    /// Found a word with the requested membership.
    Sampled(Word),
    /// There is no word to sample from.
    Empty,
    /// The maximum length was reached without finding a word.
    MaxDepth,
}

impl SampleResult {
    /// Returns the sampled word, if sampling was successful.
    pub fn into_word(self) -> Option<Word> {
        match self {
            SampleResult::Sampled(w) => Some(w),
            _ => None,
        }
    }

    /// Return true if sampling was successful and this result carries a word.
    pub fn success(&self) -> bool {
        matches!(self, SampleResult::Sampled(_))
    }
}

/// Tries to sample a word that is accepted by the automaton.
/// Randomly picks letters to follow until the set of reached states contains an accepting state, and returns the
/// word read so far. The function gives up once the word has `max` symbols.
///
/// If `comp` is set, the function samples a word that is not accepted instead, i.e., a word from the complement
/// of the language relative to the alphabet of the automaton.
///
/// The automaton is trimmed before sampling accepted words. Every letter the walk picks therefore keeps an
/// accepting state in reach, and [`SampleResult::Empty`] is only returned if the language is empty.
pub fn sample(aut: &Automaton, max: usize, comp: bool) -> SampleResult {
    let trimmed;
    let aut = if comp {
        aut
    } else {
        if aut.is_empty() {
            return SampleResult::Empty;
        }
        trimmed = aut.trim();
        &trimmed
    };

    let done = |states: &BitSet| {
        let accepting = !states.is_disjoint(aut.accepting());
        accepting != comp
    };

    let mut w = Word::empty();
    let mut states = aut.closure_of(aut.initial());
    loop {
        if done(&states) {
            return SampleResult::Sampled(w);
        }
        if w.len() >= max {
            return SampleResult::MaxDepth;
        }
        // Leaving the reachable states is only useful for words outside the language.
        let letter = aut
            .letters()
            .filter(|&a| {
                comp || states
                    .iter()
                    .any(|q| aut.targets(q, a).is_ok_and(|ts| !ts.is_empty()))
            })
            .choose(&mut rng());
        let Some(a) = letter else {
            return SampleResult::Empty;
        };
        if let Some(name) = aut.alphabet().name(a) {
            w.push(name);
        }
        states = aut.step(&states, a);
        trace!("sampled '{w}', reached {} states", states.len());
    }
}
