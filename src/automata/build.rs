//! Construction of automata.
//!
//! A [`Builder`] is an isolated arena in which a new automaton is assembled state by state.
//! Once finished, the builder is turned into an immutable [`Automaton`].
//! The [`Definition`] type describes an automaton by names, as it comes from files or user input,
//! and is validated while being converted.

use std::collections::HashMap;

use bit_set::BitSet;
use smallvec::SmallVec;

use crate::{
    alphabet::{is_epsilon_name, Alphabet, EPSILON},
    error::AutomatonError,
};

use super::{Automaton, Kind, StateId, SymbolId, Targets};

/// Incrementally builds an automaton.
///
/// The builder keeps the letters and the epsilon transitions apart. When the automaton is finished,
/// the epsilon symbol of an epsilon automaton is appended as the last symbol of the alphabet.
#[derive(Debug, Clone)]
pub struct Builder {
    kind: Kind,
    states: Vec<String>,
    names: HashMap<String, StateId>,
    alphabet: Alphabet,
    delta: Vec<Vec<Targets>>,
    epsilons: Vec<Targets>,
    initial: BitSet,
    finals: BitSet,
}

fn insert_sorted(targets: &mut Targets, state: StateId) {
    if let Err(pos) = targets.binary_search(&state) {
        targets.insert(pos, state);
    }
}

impl Builder {
    /// Creates a builder for an automaton of the given kind with an empty alphabet.
    pub fn new(kind: Kind) -> Self {
        Self::with_alphabet(kind, Alphabet::empty())
    }

    /// Creates a builder with the given letters.
    /// The alphabet must not contain the epsilon symbol, epsilon transitions are added with [`Builder::add_epsilon`].
    pub fn with_alphabet(kind: Kind, alphabet: Alphabet) -> Self {
        debug_assert!(alphabet.iter().all(|s| !is_epsilon_name(s)));
        Self {
            kind,
            states: Vec::new(),
            names: HashMap::new(),
            alphabet,
            delta: Vec::new(),
            epsilons: Vec::new(),
            initial: BitSet::new(),
            finals: BitSet::new(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Returns true if a state with the given name exists.
    pub fn has_state(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Adds a new state and returns its index.
    /// If the name is already taken, primes are appended until it is unique.
    pub fn add_state(&mut self, name: impl Into<String>) -> StateId {
        let mut name = name.into();
        while self.names.contains_key(&name) {
            name.push('\'');
        }
        let id = self.states.len();
        self.names.insert(name.clone(), id);
        self.states.push(name);
        self.delta.push(vec![Targets::new(); self.alphabet.len()]);
        self.epsilons.push(Targets::new());
        id
    }

    /// Adds a letter to the alphabet and returns its index.
    /// If the letter exists, its index is returned. Epsilon names are rejected.
    pub fn add_symbol(&mut self, name: impl Into<String>) -> Result<SymbolId, AutomatonError> {
        let name = name.into();
        if is_epsilon_name(&name) {
            return Err(AutomatonError::EpsilonNotAllowed);
        }
        if let Some(a) = self.alphabet.index_of(&name) {
            return Ok(a);
        }
        let a = self.alphabet.insert(name);
        for row in self.delta.iter_mut() {
            row.push(Targets::new());
        }
        Ok(a)
    }

    /// Marks a state as initial.
    ///
    /// Panics if the state does not exist.
    pub fn add_initial(&mut self, state: StateId) {
        assert!(state < self.states.len(), "state {state} does not exist");
        self.initial.insert(state);
    }

    /// Marks a state as accepting.
    ///
    /// Panics if the state does not exist.
    pub fn add_final(&mut self, state: StateId) {
        assert!(state < self.states.len(), "state {state} does not exist");
        self.finals.insert(state);
    }

    /// Adds a transition on a letter.
    ///
    /// Panics if one of the states or the symbol does not exist.
    pub fn add_transition(&mut self, from: StateId, symbol: SymbolId, to: StateId) {
        assert!(to < self.states.len(), "state {to} does not exist");
        insert_sorted(&mut self.delta[from][symbol], to);
    }

    /// Adds an epsilon transition.
    ///
    /// Panics if the builder is not building an epsilon automaton or a state does not exist.
    pub fn add_epsilon(&mut self, from: StateId, to: StateId) {
        assert!(
            self.kind == Kind::Epsilon,
            "cannot add epsilon transitions to {}",
            self.kind
        );
        assert!(to < self.states.len(), "state {to} does not exist");
        insert_sorted(&mut self.epsilons[from], to);
    }

    /// Adds a transition on a letter, or an epsilon transition if the label is `None`.
    pub fn add_labeled(&mut self, from: StateId, label: Option<SymbolId>, to: StateId) {
        match label {
            Some(a) => self.add_transition(from, a, to),
            None => self.add_epsilon(from, to),
        }
    }

    /// Copies all states and transitions of the given automaton into this builder.
    /// The symbols of the other automaton are matched by name; missing letters are added.
    /// Initial and accepting states are not copied.
    /// Returns the offset of the copied states, state `q` of `other` becomes `q + offset`.
    pub(crate) fn merge(&mut self, other: &Automaton) -> StateId {
        let offset = self.states.len();
        for name in other.state_names() {
            self.add_state(name.clone());
        }
        let mut symbols = Vec::with_capacity(other.alphabet().len());
        for a in 0..other.alphabet().len() {
            let label = if Some(a) == other.epsilon() {
                None
            } else {
                other
                    .alphabet()
                    .name(a)
                    .and_then(|name| self.add_symbol(name).ok())
            };
            symbols.push(label);
        }
        for (q, a, p) in other.transitions() {
            self.add_labeled(q + offset, symbols[a], p + offset);
        }
        offset
    }

    /// Checks the invariants of the automaton kind.
    fn validate(&self) -> Result<(), AutomatonError> {
        if self.initial.is_empty() {
            return Err(AutomatonError::NoInitialState);
        }
        if self.kind == Kind::Deterministic {
            if self.initial.len() != 1 {
                return Err(AutomatonError::MultipleInitialStates(self.initial.len()));
            }
            for (q, row) in self.delta.iter().enumerate() {
                for (a, ts) in row.iter().enumerate() {
                    if ts.len() != 1 {
                        return Err(AutomatonError::NotDeterministic {
                            state: self.states[q].clone(),
                            symbol: self.alphabet.name(a).unwrap_or_default().to_string(),
                            targets: ts.len(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Validates the invariants of the automaton kind and returns the finished automaton.
    pub fn build(self) -> Result<Automaton, AutomatonError> {
        self.validate()?;
        Ok(self.finish())
    }

    /// Returns the finished automaton without validation.
    /// Only for constructions whose output satisfies the invariants of its kind; checked in debug builds.
    pub(crate) fn finish(self) -> Automaton {
        debug_assert!(self.validate().is_ok(), "{:?}", self.validate());
        let Builder {
            kind,
            states,
            mut alphabet,
            mut delta,
            epsilons,
            initial,
            finals,
            ..
        } = self;
        let epsilon = if kind == Kind::Epsilon {
            let eps = alphabet.insert(EPSILON);
            for (row, eps_targets) in delta.iter_mut().zip(epsilons) {
                row.push(eps_targets);
            }
            Some(eps)
        } else {
            None
        };
        Automaton {
            kind,
            states,
            alphabet,
            epsilon,
            delta,
            initial,
            finals,
        }
    }
}

/// A name based description of an automaton, the four canonical tables.
/// Each transition is a `(source, symbol, target)` triple of names. A state with several successors on the same
/// symbol has several triples. The symbol `ε` (or `eps`) labels epsilon transitions of epsilon automata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definition {
    pub kind: Kind,
    pub states: Vec<String>,
    pub alphabet: Vec<String>,
    pub transitions: Vec<(String, String, String)>,
    pub initial: Vec<String>,
    pub accepting: Vec<String>,
}

pub(super) fn from_definition(def: &Definition) -> Result<Automaton, AutomatonError> {
    let mut builder = Builder::new(def.kind);
    for name in &def.states {
        if builder.has_state(name) {
            return Err(AutomatonError::DuplicateState(name.clone()));
        }
        builder.add_state(name.clone());
    }
    for name in &def.alphabet {
        if is_epsilon_name(name) {
            if def.kind != Kind::Epsilon {
                return Err(AutomatonError::EpsilonNotAllowed);
            }
            continue;
        }
        if builder.alphabet().contains(name) {
            return Err(AutomatonError::DuplicateSymbol(name.clone()));
        }
        builder.add_symbol(name.clone())?;
    }

    let state = |name: &String| {
        builder
            .names
            .get(name)
            .copied()
            .ok_or_else(|| AutomatonError::UnknownState(name.clone()))
    };
    let mut edges = Vec::with_capacity(def.transitions.len());
    for (from, symbol, to) in &def.transitions {
        let label = if is_epsilon_name(symbol) {
            if def.kind != Kind::Epsilon {
                return Err(AutomatonError::EpsilonNotAllowed);
            }
            None
        } else {
            let a = builder
                .alphabet()
                .index_of(symbol)
                .ok_or_else(|| AutomatonError::UnknownSymbol(symbol.clone()))?;
            Some(a)
        };
        edges.push((state(from)?, label, state(to)?));
    }
    let initial = def.initial.iter().map(state).collect::<Result<SmallVec<[StateId; 2]>, _>>()?;
    let accepting = def.accepting.iter().map(state).collect::<Result<Vec<_>, _>>()?;

    for (from, label, to) in edges {
        builder.add_labeled(from, label, to);
    }
    for q in initial {
        builder.add_initial(q);
    }
    for q in accepting {
        builder.add_final(q);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    fn edge(from: &str, symbol: &str, to: &str) -> (String, String, String) {
        (from.to_string(), symbol.to_string(), to.to_string())
    }

    fn even_as() -> Definition {
        Definition {
            kind: Kind::Deterministic,
            states: strings(&["even", "odd"]),
            alphabet: strings(&["a", "b"]),
            transitions: vec![
                edge("even", "a", "odd"),
                edge("even", "b", "even"),
                edge("odd", "a", "even"),
                edge("odd", "b", "odd"),
            ],
            initial: strings(&["even"]),
            accepting: strings(&["even"]),
        }
    }

    #[test]
    fn test_from_definition_dfa() {
        let dfa = Automaton::from_definition(&even_as()).unwrap();
        assert!(dfa.is_det());
        assert_eq!(dfa.num_states(), 2);
        assert!(dfa.accepts(&"abab".into()));
        assert!(!dfa.accepts(&"ab".into()));
    }

    #[test]
    fn test_unknown_state() {
        let mut def = even_as();
        def.transitions.push(edge("even", "a", "nowhere"));
        assert_eq!(
            Automaton::from_definition(&def),
            Err(AutomatonError::UnknownState("nowhere".into()))
        );
    }

    #[test]
    fn test_unknown_symbol() {
        let mut def = even_as();
        def.transitions.push(edge("even", "c", "odd"));
        assert_eq!(
            Automaton::from_definition(&def),
            Err(AutomatonError::UnknownSymbol("c".into()))
        );
    }

    #[test]
    fn test_duplicate_names() {
        let mut def = even_as();
        def.states.push("odd".into());
        assert_eq!(
            Automaton::from_definition(&def),
            Err(AutomatonError::DuplicateState("odd".into()))
        );
        let mut def = even_as();
        def.alphabet.push("a".into());
        assert_eq!(
            Automaton::from_definition(&def),
            Err(AutomatonError::DuplicateSymbol("a".into()))
        );
    }

    #[test]
    fn test_incomplete_dfa_rejected() {
        let mut def = even_as();
        def.transitions.pop();
        assert!(matches!(
            Automaton::from_definition(&def),
            Err(AutomatonError::NotDeterministic { targets: 0, .. })
        ));
    }

    #[test]
    fn test_missing_initial() {
        let mut def = even_as();
        def.initial.clear();
        assert_eq!(
            Automaton::from_definition(&def),
            Err(AutomatonError::NoInitialState)
        );
    }

    #[test]
    fn test_dfa_with_two_initial_states() {
        let mut def = even_as();
        def.initial.push("odd".into());
        assert_eq!(
            Automaton::from_definition(&def),
            Err(AutomatonError::MultipleInitialStates(2))
        );
        // fine for an NFA
        def.kind = Kind::Nondeterministic;
        let nfa = Automaton::from_definition(&def).unwrap();
        assert!(nfa.accepts(&"a".into()));
    }

    #[test]
    fn test_epsilon_only_in_epsilon_automata() {
        let mut def = even_as();
        def.kind = Kind::Nondeterministic;
        def.transitions.push(edge("even", "ε", "odd"));
        assert_eq!(
            Automaton::from_definition(&def),
            Err(AutomatonError::EpsilonNotAllowed)
        );

        def.kind = Kind::Epsilon;
        def.alphabet.push("eps".into());
        let enfa = Automaton::from_definition(&def).unwrap();
        assert_eq!(enfa.epsilon(), Some(2));
        assert_eq!(enfa.alphabet().name(2), Some("ε"));
        // even --ε--> odd, so "a" can end in even
        assert!(enfa.accepts(&"a".into()));
        assert!(enfa.accepts(&"".into()));
    }

    #[test]
    fn test_builder_uniquifies_names() {
        let mut b = Builder::new(Kind::Nondeterministic);
        let q0 = b.add_state("q");
        let q1 = b.add_state("q");
        b.add_initial(q0);
        let a = b.finish();
        assert_eq!(a.state_name(q0), Some("q"));
        assert_eq!(a.state_name(q1), Some("q'"));
    }

    #[test]
    fn test_add_symbol_grows_rows() {
        let mut b = Builder::new(Kind::Nondeterministic);
        let q0 = b.add_state("q0");
        let a = b.add_symbol("a").unwrap();
        let c = b.add_symbol("c").unwrap();
        assert_eq!(b.add_symbol("a").unwrap(), a);
        assert_eq!(b.add_symbol("ε"), Err(AutomatonError::EpsilonNotAllowed));
        b.add_transition(q0, c, q0);
        b.add_initial(q0);
        b.add_final(q0);
        let aut = b.build().unwrap();
        assert!(aut.accepts(&"cc".into()));
        assert!(!aut.accepts(&"a".into()));
    }
}
