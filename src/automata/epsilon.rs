//! Removal of epsilon transitions.
//!
//! The reduction works on composite states, like the subset construction: every state of the result is the
//! epsilon closure of a set of input states. The closures of single input states are computed once per call
//! and cached.

use std::collections::VecDeque;

use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, trace};

use super::{det::StateSet, Automaton, Builder, Kind, StateId};

/// Caches the epsilon closures of single states for the duration of one reduction.
struct Closures<'a> {
    aut: &'a Automaton,
    cache: Vec<Option<StateSet>>,
}

impl<'a> Closures<'a> {
    fn new(aut: &'a Automaton) -> Self {
        Self {
            aut,
            cache: vec![None; aut.num_states()],
        }
    }

    /// Returns the epsilon closure of the state, computing it breadth-first on first use.
    fn of(&mut self, state: StateId) -> &StateSet {
        let aut = self.aut;
        self.cache[state].get_or_insert_with(|| {
            let mut closure = StateSet::new();
            closure.insert(state);
            if let Some(eps) = aut.epsilon() {
                let mut queue = VecDeque::from([state]);
                while let Some(q) = queue.pop_front() {
                    for &p in &aut.delta[q][eps] {
                        if closure.insert(p) {
                            queue.push_back(p);
                        }
                    }
                }
            }
            closure
        })
    }
}

/// Removes the epsilon transitions of an automaton.
///
/// The result accepts the same language, has the same letters and no epsilon symbol.
/// It is in general still non-deterministic and is not minimized.
/// A composite state without successors on a letter simply has no transition on it.
/// If the automaton has no epsilon symbol, a copy is returned.
pub fn remove_epsilons(aut: &Automaton) -> Automaton {
    if aut.epsilon().is_none() {
        return aut.clone();
    }
    let mut closures = Closures::new(aut);
    let letters = aut.letters().collect_vec();

    let mut state_map: IndexMap<StateSet, StateId> = IndexMap::new();
    let mut queue: VecDeque<StateSet> = VecDeque::new();
    let mut edges: Vec<(StateId, usize, StateId)> = Vec::new();

    let mut initial = StateSet::new();
    for q in aut.initial().iter() {
        initial.extend(closures.of(q));
    }
    state_map.insert(initial.clone(), 0);
    queue.push_back(initial);

    while let Some(set) = queue.pop_front() {
        let source = state_map[&set];
        for (i, &a) in letters.iter().enumerate() {
            let mut next = StateSet::new();
            for q in set.iter() {
                for &t in &aut.delta[q][a] {
                    next.extend(closures.of(t));
                }
            }
            if next.is_empty() {
                continue;
            }
            let len = state_map.len();
            let target = *state_map.entry(next.clone()).or_insert_with(|| {
                trace!("discovered closure {next} as {len}");
                queue.push_back(next.clone());
                len
            });
            edges.push((source, i, target));
        }
    }

    let mut builder = Builder::with_alphabet(Kind::Nondeterministic, aut.letter_alphabet());
    for (set, _) in state_map.iter() {
        let q = builder.add_state(set.name(aut));
        if set.is_accepting(aut) {
            builder.add_final(q);
        }
    }
    builder.add_initial(0);
    for (q, a, p) in edges {
        builder.add_transition(q, a, p);
    }
    debug!(
        "epsilon removal: {} states to {} states",
        aut.num_states(),
        builder.num_states()
    );
    builder.finish()
}
