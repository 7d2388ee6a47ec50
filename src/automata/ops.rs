//! Language operations on automata.
//!
//! The boolean operations are computed by a product construction over the minimal deterministic automata of
//! both operands. The product state is a pair of states, one per operand, and runs over the union of both
//! alphabets. If one operand does not know a symbol, its component falls into an implicit dead state, written
//! `None`, that never accepts and is never left.
//! Concatenation and Kleene star are computed directly on the operands and introduce epsilon transitions.

use std::collections::VecDeque;

use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, trace};

use super::{Automaton, Builder, Kind, StateId, DEAD_STATE};

/// The acceptance condition of a product automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Product {
    /// Both operands accept.
    Intersection,
    /// At least one operand accepts.
    Union,
    /// The first operand accepts and the second does not.
    Difference,
    /// Exactly one operand accepts.
    SymmetricDifference,
}

impl Product {
    fn accepts(self, left: bool, right: bool) -> bool {
        match self {
            Product::Intersection => left && right,
            Product::Union => left || right,
            Product::Difference => left && !right,
            Product::SymmetricDifference => left != right,
        }
    }
}

type Pair = (Option<StateId>, Option<StateId>);

/// Computes the product automaton of both operands under the given acceptance condition.
/// The result is a complete deterministic automaton over the union of both alphabets, the first operand's
/// symbols first. It is not minimized.
pub fn product(left: &Automaton, right: &Automaton, mode: Product) -> Automaton {
    let (l, r) = (left.reduce(), right.reduce());
    let alphabet = l.alphabet().union(r.alphabet());

    // For every symbol of the result, the corresponding symbol of each operand
    let symbols = alphabet
        .iter()
        .map(|s| (l.letter_index(s), r.letter_index(s)))
        .collect_vec();
    let step = |aut: &Automaton, state: Option<StateId>, symbol: Option<usize>| match (state, symbol) {
        (Some(q), Some(a)) => aut.delta[q][a].first().copied(),
        _ => None,
    };

    let mut state_map: IndexMap<Pair, StateId> = IndexMap::new();
    let mut queue: VecDeque<Pair> = VecDeque::new();
    let mut edges: Vec<(StateId, usize, StateId)> = Vec::new();

    let initial = (l.initial().iter().next(), r.initial().iter().next());
    state_map.insert(initial, 0);
    queue.push_back(initial);

    while let Some(pair @ (p, q)) = queue.pop_front() {
        let source = state_map[&pair];
        for (i, &(la, ra)) in symbols.iter().enumerate() {
            let next = (step(&l, p, la), step(&r, q, ra));
            let len = state_map.len();
            let target = *state_map.entry(next).or_insert_with(|| {
                trace!("discovered pair {next:?} as {len}");
                queue.push_back(next);
                len
            });
            edges.push((source, i, target));
        }
    }

    let name = |aut: &Automaton, state: Option<StateId>| {
        state
            .and_then(|q| aut.state_name(q))
            .unwrap_or(DEAD_STATE)
            .to_string()
    };
    let is_final = |aut: &Automaton, state: Option<StateId>| state.is_some_and(|q| aut.is_final(q));

    let mut builder = Builder::with_alphabet(Kind::Deterministic, alphabet);
    for &(p, q) in state_map.keys() {
        let s = builder.add_state(format!("({},{})", name(&l, p), name(&r, q)));
        if mode.accepts(is_final(&l, p), is_final(&r, q)) {
            builder.add_final(s);
        }
    }
    builder.add_initial(0);
    for (s, a, t) in edges {
        builder.add_transition(s, a, t);
    }
    debug!(
        "{mode:?} product of {} and {} states has {} states",
        l.num_states(),
        r.num_states(),
        builder.num_states()
    );
    builder.finish()
}

/// Returns a deterministic automaton accepting the words accepted by both automata.
pub fn intersection(left: &Automaton, right: &Automaton) -> Automaton {
    product(left, right, Product::Intersection)
}

/// Returns a deterministic automaton accepting the words accepted by either automaton.
pub fn union(left: &Automaton, right: &Automaton) -> Automaton {
    product(left, right, Product::Union)
}

/// Returns a deterministic automaton accepting the words accepted by `left` but not by `right`.
pub fn difference(left: &Automaton, right: &Automaton) -> Automaton {
    product(left, right, Product::Difference)
}

/// Returns true if both automata accept the same words.
pub fn equivalent(left: &Automaton, right: &Automaton) -> bool {
    product(left, right, Product::SymmetricDifference).is_empty()
}

/// Computes the complement of an automaton relative to its own alphabet.
/// The automaton is reduced to its minimal deterministic form and the accepting states are swapped.
pub fn complement(aut: &Automaton) -> Automaton {
    let mut dfa = aut.reduce();
    dfa.finals = dfa.states().filter(|q| !dfa.finals.contains(*q)).collect();
    dfa
}

/// Returns an epsilon automaton accepting the concatenation of both languages.
///
/// The states of `right` follow the states of `left`, every accepting state of `left` gets an epsilon
/// transition to every initial state of `right`.
pub fn concatenation(left: &Automaton, right: &Automaton) -> Automaton {
    let mut builder = Builder::new(Kind::Epsilon);
    let l_off = builder.merge(left);
    let r_off = builder.merge(right);
    for f in left.accepting().iter() {
        for i in right.initial().iter() {
            builder.add_epsilon(f + l_off, i + r_off);
        }
    }
    for q in left.initial().iter() {
        builder.add_initial(q + l_off);
    }
    for q in right.accepting().iter() {
        builder.add_final(q + r_off);
    }
    builder.finish()
}

/// Returns an epsilon automaton accepting the Kleene star of the language.
///
/// A new state is the only initial and the only accepting state. It has epsilon transitions to the initial
/// states of the automaton, and every accepting state has an epsilon transition back to it.
pub fn star(aut: &Automaton) -> Automaton {
    let mut builder = Builder::new(Kind::Epsilon);
    let start = builder.add_state("start");
    let off = builder.merge(aut);
    for q in aut.initial().iter() {
        builder.add_epsilon(start, q + off);
    }
    for q in aut.accepting().iter() {
        builder.add_epsilon(q + off, start);
    }
    builder.add_initial(start);
    builder.add_final(start);
    builder.finish()
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;
    use test_log::test;

    use super::*;
    use crate::automata::generate::divisibility;
    use crate::automata::tests::{words_upto, SmallEnfa};
    use crate::Word;

    fn re(input: &str) -> Automaton {
        Automaton::from_regex(input).unwrap()
    }

    /// Returns all ways to split the word into a prefix and a suffix.
    fn splits(w: &Word) -> Vec<(Word, Word)> {
        let symbols = w.iter().collect_vec();
        (0..=symbols.len())
            .map(|i| {
                (
                    Word::from_symbols(symbols[..i].iter().copied()),
                    Word::from_symbols(symbols[i..].iter().copied()),
                )
            })
            .collect()
    }

    /// Decides membership in the Kleene star of the language by trying every first factor.
    fn in_star(aut: &Automaton, w: &Word) -> bool {
        w.is_empty()
            || splits(w)
                .into_iter()
                .skip(1)
                .any(|(u, v)| aut.accepts(&u) && in_star(aut, &v))
    }

    #[test]
    fn test_intersection_of_divisibility() {
        let two = divisibility(2, 10).unwrap();
        let three = divisibility(3, 10).unwrap();
        let six = intersection(&two, &three);
        assert!(six.is_det());
        assert!(six.accepts(&"12".into()));
        assert!(six.accepts(&"126".into()));
        assert!(!six.accepts(&"13".into()));
        assert!(!six.accepts(&"14".into()));
        assert!(!six.accepts(&"15".into()));
        assert!(six.equivalent(&divisibility(6, 10).unwrap()));
    }

    #[test]
    fn test_union_over_different_alphabets() {
        let a = re("a*");
        let b = re("b*");
        let u = union(&a, &b);
        assert_eq!(u.alphabet().iter().collect_vec(), vec!["a", "b"]);
        assert!(u.accepts(&"aaa".into()));
        assert!(u.accepts(&"bb".into()));
        assert!(u.accepts(&"".into()));
        assert!(!u.accepts(&"ab".into()));
        assert!(u.state_names().iter().any(|s| s.contains(DEAD_STATE)));
    }

    #[test]
    fn test_intersection_over_different_alphabets() {
        let i = intersection(&re("a*"), &re("b*"));
        assert!(i.accepts(&"".into()));
        assert!(!i.accepts(&"a".into()));
        assert!(!i.accepts(&"b".into()));
    }

    #[test]
    fn test_difference() {
        let d = difference(&re("(a+b)*"), &re("a*"));
        assert!(d.accepts(&"b".into()));
        assert!(d.accepts(&"aab".into()));
        assert!(!d.accepts(&"aa".into()));
        assert!(!d.accepts(&"".into()));
    }

    #[test]
    fn test_complement() {
        let c = complement(&re("ab"));
        assert!(c.is_det());
        assert!(!c.accepts(&"ab".into()));
        assert!(c.accepts(&"".into()));
        assert!(c.accepts(&"abab".into()));
        assert!(c.accepts(&"ba".into()));
        // symbols outside the alphabet are never accepted
        assert!(!c.accepts(&"c".into()));
    }

    #[test]
    fn test_equivalent() {
        assert!(equivalent(&re("(a+b)*"), &re("(a*b*)*")));
        assert!(equivalent(&re("a(ba)*"), &re("(ab)*a")));
        assert!(!equivalent(&re("a*"), &re("a*b")));
        assert!(!equivalent(&re("a"), &re("∅")));
        assert!(equivalent(&re("∅"), &re("a∅")));
    }

    #[test]
    fn test_concatenation() {
        let c = concatenation(&re("ab"), &re("c*"));
        assert_eq!(c.kind(), Kind::Epsilon);
        assert_eq!(c.alphabet().iter().collect_vec(), vec!["a", "b", "c", "ε"]);
        assert!(c.accepts(&"ab".into()));
        assert!(c.accepts(&"abccc".into()));
        assert!(!c.accepts(&"c".into()));
        assert_eq!(c.num_states(), re("ab").num_states() + re("c*").num_states());
    }

    #[test]
    fn test_star_of_word() {
        let s = star(&re("aab"));
        assert!(s.accepts(&"aabaab".into()));
        assert!(s.accepts(&"".into()));
        assert!(!s.accepts(&"aaba".into()));
        assert_eq!(s.initial().len(), 1);
        assert_eq!(s.accepting().len(), 1);
    }

    #[quickcheck]
    fn product_laws(a: SmallEnfa, b: SmallEnfa) -> bool {
        let (a, b) = (a.0, b.0);
        let inter = intersection(&a, &b);
        let uni = union(&a, &b);
        let diff = difference(&a, &b);
        words_upto(4).iter().all(|w| {
            let (x, y) = (a.accepts(w), b.accepts(w));
            inter.accepts(w) == (x && y) && uni.accepts(w) == (x || y) && diff.accepts(w) == (x && !y)
        })
    }

    #[quickcheck]
    fn concatenation_law(a: SmallEnfa, b: SmallEnfa) -> bool {
        let (a, b) = (a.0, b.0);
        let cat = concatenation(&a, &b);
        words_upto(4).iter().all(|w| {
            let expected = splits(w)
                .iter()
                .any(|(u, v)| a.accepts(u) && b.accepts(v));
            cat.accepts(w) == expected
        })
    }

    #[quickcheck]
    fn star_law(a: SmallEnfa) -> bool {
        let s = star(&a.0);
        words_upto(4).iter().all(|w| s.accepts(w) == in_star(&a.0, w))
    }

    #[quickcheck]
    fn complement_is_involution(a: SmallEnfa) -> bool {
        let c = complement(&a.0);
        equivalent(&complement(&c), &a.0)
            && words_upto(4).iter().all(|w| c.accepts(w) != a.0.accepts(w))
    }

    #[quickcheck]
    fn union_is_commutative(a: SmallEnfa, b: SmallEnfa) -> bool {
        equivalent(&union(&a.0, &b.0), &union(&b.0, &a.0))
    }
}
