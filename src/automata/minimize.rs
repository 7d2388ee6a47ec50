//! Minimization of deterministic automata.
//!
//! Unreachable states are dropped first. The remaining states are then partitioned by Moore's refinement:
//! starting from the split into accepting and non-accepting states, every state gets the signature
//! (own class, classes of its successors in alphabet order) and states with equal signatures form the classes of
//! the next round. The refinement stops as soon as a round does not increase the number of classes.

use std::collections::{HashMap, VecDeque};

use bit_set::BitSet;
use log::{debug, trace};
use smallvec::SmallVec;

use crate::error::AutomatonError;

use super::{Automaton, Builder, Kind, StateId};

type Signature = SmallVec<[usize; 8]>;

/// Minimizes a deterministic automaton.
/// Returns the minimal automaton accepting the same language and whether it has fewer states than the input.
///
/// Fails with a precondition error if the automaton is not deterministic.
pub fn minimize(dfa: &Automaton) -> Result<(Automaton, bool), AutomatonError> {
    if dfa.kind() != Kind::Deterministic {
        return Err(AutomatonError::Precondition(
            "minimization requires a deterministic automaton",
        ));
    }
    Ok(refine(dfa))
}

/// Returns the states reachable from the initial state, in ascending order.
fn reachable_states(dfa: &Automaton) -> Vec<StateId> {
    let mut seen = BitSet::with_capacity(dfa.num_states());
    let mut queue = VecDeque::new();
    for q in dfa.initial().iter() {
        seen.insert(q);
        queue.push_back(q);
    }
    while let Some(q) = queue.pop_front() {
        for ts in &dfa.delta[q] {
            for &p in ts {
                if seen.insert(p) {
                    queue.push_back(p);
                }
            }
        }
    }
    seen.iter().collect()
}

/// Moore's partition refinement on the reachable part of a deterministic automaton.
pub(crate) fn refine(dfa: &Automaton) -> (Automaton, bool) {
    debug_assert!(dfa.is_det());
    let alive = reachable_states(dfa);
    let num_letters = dfa.alphabet().len();

    // Maps the original state index to its position among the surviving states
    let mut position = vec![usize::MAX; dfa.num_states()];
    for (i, &q) in alive.iter().enumerate() {
        position[q] = i;
    }
    let successor = |i: usize, a: usize| position[dfa.delta[alive[i]][a][0]];

    let mut class: Vec<usize> = alive.iter().map(|&q| dfa.is_final(q) as usize).collect();
    let mut old_count = class.iter().collect::<std::collections::HashSet<_>>().len();
    let mut ids: HashMap<Signature, usize> = HashMap::new();
    let mut iteration = 0;

    loop {
        ids.clear();
        let mut next = Vec::with_capacity(alive.len());
        for i in 0..alive.len() {
            let mut signature = Signature::with_capacity(num_letters + 1);
            signature.push(class[i]);
            signature.extend((0..num_letters).map(|a| class[successor(i, a)]));
            trace!("state {} signature {:?}", alive[i], signature);

            let new_id = ids.len();
            next.push(*ids.entry(signature).or_insert(new_id));
        }
        iteration += 1;
        class = next;
        debug!("refinement round {iteration}: {} classes", ids.len());
        if ids.len() == old_count {
            break;
        }
        old_count = ids.len();
    }

    // One state per class, named after its first member
    let num_classes = ids.len();
    let mut representative = vec![usize::MAX; num_classes];
    for (i, &c) in class.iter().enumerate() {
        if representative[c] == usize::MAX {
            representative[c] = i;
        }
    }

    let mut builder = Builder::with_alphabet(Kind::Deterministic, dfa.alphabet().clone());
    for &i in &representative {
        builder.add_state(dfa.state_names()[alive[i]].clone());
    }
    for (i, &q) in alive.iter().enumerate() {
        if dfa.is_final(q) {
            builder.add_final(class[i]);
        }
        if dfa.is_initial(q) {
            builder.add_initial(class[i]);
        }
    }
    for (c, &i) in representative.iter().enumerate() {
        for a in 0..num_letters {
            builder.add_transition(c, a, class[successor(i, a)]);
        }
    }

    let reduced = num_classes < dfa.num_states();
    debug!(
        "minimization: {} states to {} states after {iteration} rounds",
        dfa.num_states(),
        num_classes
    );
    (builder.finish(), reduced)
}
