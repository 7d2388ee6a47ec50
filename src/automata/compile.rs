//! Compilation of regular expressions into epsilon automata.
//!
//! Each subexpression is translated into a fragment with one entry and one exit state. Fragments are glued
//! together with epsilon transitions, so the result is a [`Kind::Epsilon`] automaton.

use log::debug;

use crate::re::Regex;

use super::{Automaton, Builder, Kind, StateId};

/// Compiles the given regex into an epsilon automaton accepting exactly its language.
///
/// Every subexpression becomes a fragment with a single start and a single accept state, all fragments live in
/// the same builder. The alphabet of the result consists of the symbols of the regex in order of their first
/// occurrence, followed by the epsilon symbol.
/// The result is neither trim nor minimal.
pub fn compile(re: &Regex) -> Automaton {
    let mut thompson = Thompson {
        builder: Builder::with_alphabet(Kind::Epsilon, re.alphabet()),
    };
    let Fragment { start, accept } = thompson.compile_rec(re);
    let mut builder = thompson.builder;
    builder.add_initial(start);
    builder.add_final(accept);
    debug!("compiled '{re}' into {} states", builder.num_states());
    builder.finish()
}

/// A partial automaton with one entry and one exit.
#[derive(Debug, Clone, Copy)]
struct Fragment {
    start: StateId,
    accept: StateId,
}

struct Thompson {
    builder: Builder,
}

impl Thompson {
    fn new_state(&mut self) -> StateId {
        let n = self.builder.num_states();
        self.builder.add_state(format!("q{n}"))
    }

    fn compile_rec(&mut self, re: &Regex) -> Fragment {
        match re {
            Regex::Empty => self.none(),
            Regex::Epsilon => self.epsilon(),
            Regex::Symbol(s) => self.symbol(s),
            Regex::Union(l, r) => {
                let l = self.compile_rec(l);
                let r = self.compile_rec(r);
                self.union(l, r)
            }
            Regex::Concat(l, r) => {
                let l = self.compile_rec(l);
                let r = self.compile_rec(r);
                self.builder.add_epsilon(l.accept, r.start);
                Fragment {
                    start: l.start,
                    accept: r.accept,
                }
            }
            Regex::Star(r) => {
                let inner = self.compile_rec(r);
                self.star(inner)
            }
        }
    }

    /// Two unconnected states, the accept state is unreachable.
    fn none(&mut self) -> Fragment {
        let start = self.new_state();
        let accept = self.new_state();
        Fragment { start, accept }
    }

    /// A single state that is both start and accept.
    fn epsilon(&mut self) -> Fragment {
        let q = self.new_state();
        Fragment {
            start: q,
            accept: q,
        }
    }

    fn symbol(&mut self, name: &str) -> Fragment {
        let start = self.new_state();
        let accept = self.new_state();
        // The alphabet is collected from the same regex, so every symbol is present
        if let Some(a) = self.builder.alphabet().index_of(name) {
            self.builder.add_transition(start, a, accept);
        }
        Fragment { start, accept }
    }

    fn union(&mut self, l: Fragment, r: Fragment) -> Fragment {
        let start = self.new_state();
        let accept = self.new_state();
        self.builder.add_epsilon(start, l.start);
        self.builder.add_epsilon(start, r.start);
        self.builder.add_epsilon(l.accept, accept);
        self.builder.add_epsilon(r.accept, accept);
        Fragment { start, accept }
    }

    /// New start and accept states. The start enters the inner fragment and skips to the accept state,
    /// the inner accept state loops back to the start.
    fn star(&mut self, inner: Fragment) -> Fragment {
        let start = self.new_state();
        let accept = self.new_state();
        self.builder.add_epsilon(start, inner.start);
        self.builder.add_epsilon(inner.accept, start);
        self.builder.add_epsilon(start, accept);
        Fragment { start, accept }
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::{re::parse, Word};

    fn compiled(input: &str) -> Automaton {
        compile(&parse(input).unwrap())
    }

    #[test]
    fn test_compile_symbol() {
        let nfa = compiled("a");
        assert_eq!(nfa.kind(), Kind::Epsilon);
        assert_eq!(nfa.num_states(), 2);
        assert_eq!(nfa.state_names(), &["q0", "q1"]);
        assert!(nfa.accepts(&"a".into()));
        assert!(!nfa.accepts(&"".into()));
        assert!(!nfa.accepts(&"aa".into()));
    }

    #[test]
    fn test_compile_alphabet_order() {
        let nfa = compiled("ba*+c");
        assert_eq!(
            nfa.alphabet().iter().collect::<Vec<_>>(),
            vec!["b", "a", "c", "ε"]
        );
        assert_eq!(nfa.epsilon(), Some(3));
    }

    #[test]
    fn test_compile_epsilon() {
        let nfa = compiled("ε");
        assert_eq!(nfa.num_states(), 1);
        assert!(nfa.accepts(&"".into()));
        assert!(!nfa.accepts(&"a".into()));
    }

    #[test]
    fn test_compile_empty() {
        let nfa = compiled("∅");
        assert_eq!(nfa.num_states(), 2);
        assert!(nfa.is_empty());
        assert!(!nfa.accepts(&"".into()));
    }

    #[test]
    fn test_compile_union_star() {
        let nfa = compiled("ab*+ba*");
        assert!(nfa.accepts(&"abbbb".into()));
        assert!(nfa.accepts(&"b".into()));
        assert!(nfa.accepts(&"baa".into()));
        assert!(!nfa.accepts(&"aba".into()));
        assert!(!nfa.accepts(&"".into()));
    }

    #[test]
    fn test_compile_star_accepts_repetitions() {
        let nfa = compiled("(ab)*");
        assert!(nfa.accepts(&"".into()));
        assert!(nfa.accepts(&"ababab".into()));
        assert!(!nfa.accepts(&"aba".into()));
    }

    /// `a*b*` accepts every `a^n b^m` and nothing with an `a` after a `b`.
    #[quickcheck]
    fn compile_a_star_b_star(n: u8, m: u8) -> bool {
        let nfa = compiled("a*b*");
        let (n, m) = (n as usize % 6, m as usize % 6);
        let mut w = Word::empty();
        for _ in 0..n {
            w.push("a");
        }
        for _ in 0..m {
            w.push("b");
        }
        let mut extended = w.clone();
        extended.push("a");
        nfa.accepts(&w) && (m == 0 || !nfa.accepts(&extended))
    }
}
