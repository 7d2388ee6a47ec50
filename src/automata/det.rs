//! Determinization of non-deterministic finite automata.
//! An automaton is deterministic if it has one initial state and for each state and each symbol exactly one transition.

use std::{collections::VecDeque, fmt::Display};

use bit_set::BitSet;
use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, trace};

use crate::error::AutomatonError;

use super::{Automaton, Builder, Kind, StateId, DEAD_STATE};

/// A set of states. Each set of states corresponds to a single state in a derived automaton.
/// Iteration is in ascending order, which makes the set its own canonical key.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct StateSet(BitSet);

impl StateSet {
    /// Creates a new empty state set.
    pub(crate) fn new() -> Self {
        Self(BitSet::default())
    }

    /// Inserts a state into the set. Returns true if the state was not present.
    pub(crate) fn insert(&mut self, state: StateId) -> bool {
        self.0.insert(state)
    }

    /// Returns an iterator over the state IDs in the set, in ascending order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.0.iter()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extends the set with the elements of another set.
    pub(crate) fn extend(&mut self, other: &StateSet) {
        self.0.union_with(&other.0);
    }

    /// Returns the display name of the composite state: the member names joined by commas.
    pub(crate) fn name(&self, aut: &Automaton) -> String {
        if self.is_empty() {
            return DEAD_STATE.to_string();
        }
        self.iter()
            .map(|q| aut.state_name(q).unwrap_or_default())
            .join(",")
    }

    pub(crate) fn is_accepting(&self, aut: &Automaton) -> bool {
        !self.0.is_disjoint(aut.accepting())
    }
}

impl From<BitSet> for StateSet {
    fn from(set: BitSet) -> Self {
        StateSet(set)
    }
}

impl Display for StateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.iter().join(", "))
    }
}

/// Determinizes an automaton without epsilon transitions.
/// The result is a deterministic automaton recognizing the same language as the input.
///
/// Fails with a precondition error if the automaton has epsilon transitions; remove them first.
pub fn determinize(nfa: &Automaton) -> Result<Automaton, AutomatonError> {
    if nfa.kind() == Kind::Epsilon {
        return Err(AutomatonError::Precondition(
            "subset construction requires an automaton without epsilon transitions",
        ));
    }
    Ok(subset_construction(nfa))
}

/// The subset construction.
///
/// Composite states are discovered breadth-first, symbols are scanned in ascending order, and new composite
/// states are numbered in the order they are discovered. The numbering is therefore reproducible.
/// The empty composite is the dead state; it loops to itself on every symbol.
/// The number of states of the result is bounded by the number of reachable composite states, which is
/// exponential in the number of input states in the worst case.
pub(crate) fn subset_construction(nfa: &Automaton) -> Automaton {
    debug_assert!(nfa.epsilon().is_none());
    let letters = nfa.letters().collect_vec();

    // Maps a set of input states to a state of the result
    let mut state_map: IndexMap<StateSet, StateId> = IndexMap::new();
    let mut queue: VecDeque<StateSet> = VecDeque::new();
    let mut edges: Vec<(StateId, usize, StateId)> = Vec::new();

    let initial = StateSet::from(nfa.initial().clone());
    state_map.insert(initial.clone(), 0);
    queue.push_back(initial);

    while let Some(set) = queue.pop_front() {
        let source = state_map[&set];
        for (i, &a) in letters.iter().enumerate() {
            let mut next = StateSet::new();
            for q in set.iter() {
                for &p in &nfa.delta[q][a] {
                    next.insert(p);
                }
            }
            let len = state_map.len();
            let target = *state_map.entry(next.clone()).or_insert_with(|| {
                trace!("discovered composite state {next} as {len}");
                queue.push_back(next.clone());
                len
            });
            edges.push((source, i, target));
        }
    }

    let mut builder = Builder::with_alphabet(Kind::Deterministic, nfa.letter_alphabet());
    for (set, _) in state_map.iter() {
        let q = builder.add_state(set.name(nfa));
        if set.is_accepting(nfa) {
            builder.add_final(q);
        }
    }
    builder.add_initial(0);
    for (q, a, p) in edges {
        builder.add_transition(q, a, p);
    }
    debug!(
        "subset construction: {} states to {} states",
        nfa.num_states(),
        builder.num_states()
    );
    builder.finish()
}
