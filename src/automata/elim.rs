//! Conversion of automata into regular expressions by state elimination.

use log::{debug, trace};

use crate::re::Regex;

use super::Automaton;

/// Returns a regular expression accepting the language of the automaton.
///
/// The automaton is reduced to its minimal deterministic form first. Every state becomes a node of a graph
/// whose edges are labeled with regular expressions, extended by a fresh start node with epsilon edges to the
/// initial state and a fresh accept node with epsilon edges from every accepting state.
/// The original states are then eliminated one by one, in ascending index order. Eliminating `r` replaces the
/// label of every edge `p -> q` by `label(p,q) + label(p,r) label(r,r)* label(r,q)`.
/// Once all of them are gone, the label from the start node to the accept node is the result.
///
/// The result is language equivalent to the automaton but is not in any canonical form.
pub fn to_regex(aut: &Automaton) -> Regex {
    let dfa = aut.reduce();
    let n = dfa.num_states();
    let (start, accept) = (n, n + 1);

    let mut label = vec![vec![Regex::Empty; n + 2]; n + 2];
    for a in dfa.letters() {
        let symbol = dfa.alphabet().name(a).unwrap_or_default();
        for p in dfa.states() {
            for &q in &dfa.delta[p][a] {
                let prev = std::mem::replace(&mut label[p][q], Regex::Empty);
                label[p][q] = prev.union(Regex::symbol(symbol));
            }
        }
    }
    for q in dfa.initial().iter() {
        label[start][q] = Regex::Epsilon;
    }
    for q in dfa.accepting().iter() {
        label[q][accept] = Regex::Epsilon;
    }

    for r in 0..n {
        let loop_star = label[r][r].clone().star();
        // Nodes that are still part of the graph, apart from r itself
        let remaining = || (r + 1..n + 2);
        for p in remaining() {
            if label[p][r].is_empty_set() {
                continue;
            }
            for q in remaining() {
                if label[r][q].is_empty_set() {
                    continue;
                }
                let through = label[p][r]
                    .clone()
                    .concat(loop_star.clone())
                    .concat(label[r][q].clone());
                let prev = std::mem::replace(&mut label[p][q], Regex::Empty);
                label[p][q] = prev.union(through);
            }
        }
        trace!("eliminated state {r}, start to accept is {}", label[start][accept]);
    }

    let re = std::mem::replace(&mut label[start][accept], Regex::Empty);
    debug!("state elimination over {n} states produced {re}");
    re
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;
    use test_log::test;

    use super::*;
    use crate::automata::tests::{words_upto, SmallEnfa};
    use crate::automata::{compile, generate};
    use crate::re::parse;
    use crate::Word;

    fn roundtrip(input: &str) -> (Automaton, Automaton) {
        let original = compile(&parse(input).unwrap());
        let re = to_regex(&original);
        let back = compile(&parse(&re.to_string()).unwrap());
        (original, back)
    }

    #[test]
    fn test_single_symbol() {
        let nfa = Automaton::from_regex("a").unwrap();
        assert_eq!(to_regex(&nfa), Regex::symbol("a"));
    }

    #[test]
    fn test_star() {
        let nfa = Automaton::from_regex("a*").unwrap();
        let re = to_regex(&nfa);
        assert!(re.nullable());
        let back = compile(&re);
        assert!(back.accepts(&"aaaa".into()));
        assert!(back.equivalent(&nfa));
    }

    #[test]
    fn test_empty_language() {
        let nfa = Automaton::from_regex("∅").unwrap();
        let re = to_regex(&nfa);
        assert_eq!(re, Regex::Empty);
        assert_eq!(re.to_string(), "∅");
    }

    #[test]
    fn test_empty_word() {
        let nfa = Automaton::from_regex("ε").unwrap();
        assert_eq!(to_regex(&nfa), Regex::Epsilon);
    }

    #[test]
    fn test_roundtrip_examples() {
        for input in ["ab*+ba*", "(a+b)*abb", "a(ba)*+b", "(ab+ba)*", "a*b*c*"] {
            let (original, back) = roundtrip(input);
            assert!(original.equivalent(&back), "{input}");
        }
    }

    #[test]
    fn test_divisibility_roundtrip() {
        let dfa = generate::divisibility(3, 2).unwrap();
        let re = to_regex(&dfa);
        let back = compile(&parse(&re.to_string()).unwrap());
        assert!(back.equivalent(&dfa));
    }

    #[test]
    fn test_roundtrip_keyword_letters() {
        for input in ["e p s", "(e+p)*p s", "s(ep)*s", "e ps+eps", "(e p s)*"] {
            let (original, back) = roundtrip(input);
            assert!(original.equivalent(&back), "{input}");
        }
        let (original, back) = roundtrip("e p s");
        assert!(back.accepts(&"eps".into()));
        assert!(!back.accepts(&Word::empty()));
        assert!(original.accepts(&"eps".into()));
    }

    /// Unions of two words over `{e, p, s}` survive the trip through the textual form.
    #[quickcheck]
    fn keyword_letters_survive_roundtrip(xs: Vec<u8>, ys: Vec<u8>) -> bool {
        let spell = |bytes: &[u8]| {
            bytes
                .iter()
                .take(8)
                .map(|b| ["e", "p", "s"][*b as usize % 3])
                .collect::<Vec<_>>()
                .join(" ")
        };
        let input = format!("({})+({})", spell(&xs), spell(&ys));
        let (original, back) = roundtrip(&input);
        original.equivalent(&back)
    }

    #[quickcheck]
    fn to_regex_preserves_language(aut: SmallEnfa) -> bool {
        let re = to_regex(&aut.0);
        let back = compile(&parse(&re.to_string()).unwrap());
        words_upto(5).iter().all(|w| aut.0.accepts(w) == back.accepts(w))
    }
}
