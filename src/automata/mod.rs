//! Finite automata over named symbols.
//!
//! All variants of finite automata share one representation, [`Automaton`], tagged with a [`Kind`].
//! The kind decides which algorithms apply: deterministic automata can be minimized, non-deterministic ones
//! determinized, and epsilon automata first need their epsilon transitions removed.
//! Every algorithm returns a new automaton and never modifies its input.

mod build;
mod compile;
pub mod det;
mod elim;
pub mod epsilon;
pub mod generate;
pub mod minimize;
pub mod ops;

use std::collections::VecDeque;
use std::fmt::Display;

use bit_set::BitSet;
use itertools::Itertools;
use log::debug;
use smallvec::SmallVec;

use crate::{
    alphabet::{is_epsilon_name, Alphabet},
    error::AutomatonError,
    re::Regex,
    Word,
};

pub use build::{Builder, Definition};
pub use compile::compile;
pub use elim::to_regex;

/// Every state in an automaton is identified by its index.
pub type StateId = usize;

/// Every symbol of an alphabet is identified by its index.
pub type SymbolId = usize;

/// The set of targets of a single (state, symbol) pair, sorted ascending and without duplicates.
pub type Targets = SmallVec<[StateId; 2]>;

/// Display name of the dead state introduced by the subset construction.
pub const DEAD_STATE: &str = "∅";

/// The capability of an automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Kind {
    /// Exactly one initial state and exactly one target per state and symbol.
    Deterministic,
    /// Any number of targets per state and symbol, no epsilon transitions.
    #[default]
    Nondeterministic,
    /// Like [`Kind::Nondeterministic`] but with a designated epsilon symbol.
    Epsilon,
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Deterministic => write!(f, "DFA"),
            Kind::Nondeterministic => write!(f, "NFA"),
            Kind::Epsilon => write!(f, "ε-NFA"),
        }
    }
}

/// A finite automaton.
///
/// States and symbols carry display names but are identified by their dense indices.
/// The transition table is total: every (state, symbol) pair has a, possibly empty, set of targets.
/// Automata are built with a [`Builder`] and are immutable afterwards, except for renaming states and symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    kind: Kind,
    states: Vec<String>,
    alphabet: Alphabet,
    /// Index of the epsilon symbol, only set for [`Kind::Epsilon`].
    epsilon: Option<SymbolId>,
    /// Indexed by state, then by symbol.
    delta: Vec<Vec<Targets>>,
    initial: BitSet,
    finals: BitSet,
}

impl Automaton {
    /// Builds an automaton from an explicit, name based definition.
    pub fn from_definition(def: &Definition) -> Result<Self, AutomatonError> {
        build::from_definition(def)
    }

    /// Parses the regular expression and compiles it into an epsilon automaton.
    pub fn from_regex(input: &str) -> Result<Self, AutomatonError> {
        let re = crate::re::parse(input)?;
        Ok(compile(&re))
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns true if the automaton is tagged deterministic.
    pub fn is_det(&self) -> bool {
        self.kind == Kind::Deterministic
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Returns an iterator over the state indices.
    pub fn states(&self) -> impl Iterator<Item = StateId> {
        0..self.states.len()
    }

    /// Returns the display names of the states, in index order.
    pub fn state_names(&self) -> &[String] {
        &self.states
    }

    pub fn state_name(&self, state: StateId) -> Option<&str> {
        self.states.get(state).map(String::as_str)
    }

    pub fn state_index(&self, name: &str) -> Option<StateId> {
        self.states.iter().position(|s| s == name)
    }

    /// Returns the full alphabet, including the epsilon symbol for epsilon automata.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Returns the index of the epsilon symbol, if the automaton has one.
    pub fn epsilon(&self) -> Option<SymbolId> {
        self.epsilon
    }

    /// Returns the indices of all symbols except epsilon, in ascending order.
    pub fn letters(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.alphabet.len()).filter(move |a| Some(*a) != self.epsilon)
    }

    /// Resolves a symbol name to its index. The epsilon symbol is not a letter and is never resolved.
    pub fn letter_index(&self, name: &str) -> Option<SymbolId> {
        self.alphabet
            .index_of(name)
            .filter(|a| Some(*a) != self.epsilon)
    }

    /// Returns the targets of the given state on the given symbol.
    pub fn targets(&self, state: StateId, symbol: SymbolId) -> Result<&[StateId], AutomatonError> {
        let row = self
            .delta
            .get(state)
            .ok_or(AutomatonError::StateNotFound(state))?;
        row.get(symbol)
            .map(|t| t.as_slice())
            .ok_or(AutomatonError::SymbolNotFound(symbol))
    }

    /// Returns an iterator over all transitions as `(source, symbol, target)` triples.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, SymbolId, StateId)> + '_ {
        self.delta.iter().enumerate().flat_map(|(q, row)| {
            row.iter()
                .enumerate()
                .flat_map(move |(a, ts)| ts.iter().map(move |p| (q, a, *p)))
        })
    }

    pub fn initial(&self) -> &BitSet {
        &self.initial
    }

    pub fn accepting(&self) -> &BitSet {
        &self.finals
    }

    pub fn is_initial(&self, state: StateId) -> bool {
        self.initial.contains(state)
    }

    /// Returns if a state is accepting. Invalid indices are not accepting.
    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(state)
    }

    /// Returns the set of states reachable from `state` using zero or more epsilon transitions.
    pub fn epsilon_closure(&self, state: StateId) -> Result<BitSet, AutomatonError> {
        if state >= self.states.len() {
            return Err(AutomatonError::StateNotFound(state));
        }
        let mut start = BitSet::with_capacity(self.states.len());
        start.insert(state);
        Ok(self.closure_of(&start))
    }

    /// Extends the set of states by everything reachable through epsilon transitions.
    pub(crate) fn closure_of(&self, states: &BitSet) -> BitSet {
        let Some(eps) = self.epsilon else {
            return states.clone();
        };
        let mut closure = states.clone();
        let mut queue: VecDeque<StateId> = states.iter().collect();
        while let Some(q) = queue.pop_front() {
            for &p in &self.delta[q][eps] {
                if closure.insert(p) {
                    queue.push_back(p);
                }
            }
        }
        closure
    }

    /// Consumes a letter from every state in the set and returns the epsilon closed set of successors.
    pub(crate) fn step(&self, states: &BitSet, symbol: SymbolId) -> BitSet {
        let mut next = BitSet::with_capacity(self.states.len());
        for q in states.iter() {
            for &p in &self.delta[q][symbol] {
                next.insert(p);
            }
        }
        self.closure_of(&next)
    }

    /// Returns the set of states reached after consuming the word.
    /// A symbol that is not a letter of the alphabet empties the set.
    pub fn run(&self, word: &Word) -> BitSet {
        let mut live = self.closure_of(&self.initial);
        for symbol in word.iter() {
            if live.is_empty() {
                break;
            }
            match self.letter_index(symbol) {
                Some(a) => live = self.step(&live, a),
                None => return BitSet::new(),
            }
        }
        live
    }

    /// Returns if the automaton accepts the given word.
    pub fn accepts(&self, word: &Word) -> bool {
        !self.run(word).is_disjoint(&self.finals)
    }

    /// Returns the states reachable from the initial states, following transitions on any symbol including epsilon.
    pub fn reachable(&self) -> BitSet {
        let mut seen = self.initial.clone();
        let mut queue: VecDeque<StateId> = self.initial.iter().collect();
        while let Some(q) = queue.pop_front() {
            for ts in &self.delta[q] {
                for &p in ts {
                    if seen.insert(p) {
                        queue.push_back(p);
                    }
                }
            }
        }
        seen
    }

    /// Returns the states from which an accepting state can be reached.
    fn coreachable(&self) -> BitSet {
        let mut preds: Vec<Vec<StateId>> = vec![Vec::new(); self.states.len()];
        for (q, _, p) in self.transitions() {
            preds[p].push(q);
        }
        let mut seen = self.finals.clone();
        let mut queue: VecDeque<StateId> = self.finals.iter().collect();
        while let Some(p) = queue.pop_front() {
            for &q in &preds[p] {
                if seen.insert(q) {
                    queue.push_back(q);
                }
            }
        }
        seen
    }

    /// Returns true if the automaton accepts no word at all.
    pub fn is_empty(&self) -> bool {
        self.reachable().is_disjoint(&self.finals)
    }

    /// Removes all states that are not reachable from an initial state or cannot reach an accepting state.
    /// Initial states are always kept so that the result is a valid automaton, even for the empty language.
    /// Trimming a deterministic automaton can make it partial, in which case the result is tagged non-deterministic.
    pub fn trim(&self) -> Automaton {
        let mut useful = self.reachable();
        useful.intersect_with(&self.coreachable());
        useful.union_with(&self.initial);

        if useful.len() == self.states.len() {
            return self.clone();
        }

        let kind = match self.kind {
            Kind::Deterministic => Kind::Nondeterministic,
            k => k,
        };
        let mut builder = Builder::with_alphabet(kind, self.letter_alphabet());
        let mut old_to_new = vec![None; self.states.len()];
        for q in useful.iter() {
            old_to_new[q] = Some(builder.add_state(self.states[q].clone()));
        }
        for q in useful.iter() {
            let Some(nq) = old_to_new[q] else { continue };
            if self.is_initial(q) {
                builder.add_initial(nq);
            }
            if self.is_final(q) {
                builder.add_final(nq);
            }
        }
        for (q, a, p) in self.transitions() {
            if let (Some(nq), Some(np)) = (old_to_new[q], old_to_new[p]) {
                builder.add_labeled(nq, self.map_symbol(a), np);
            }
        }
        debug!(
            "trimmed automaton from {} to {} states",
            self.states.len(),
            builder.num_states()
        );
        builder.finish()
    }

    /// Returns the alphabet without the epsilon symbol.
    pub(crate) fn letter_alphabet(&self) -> Alphabet {
        self.letters()
            .filter_map(|a| self.alphabet.name(a))
            .collect()
    }

    /// Maps a symbol index of this automaton to the builder label that preserves it in an automaton
    /// whose letter alphabet starts with this automaton's letters.
    fn map_symbol(&self, a: SymbolId) -> Option<SymbolId> {
        match self.epsilon {
            Some(eps) if a == eps => None,
            Some(eps) if a > eps => Some(a - 1),
            _ => Some(a),
        }
    }

    /// Renames a state.
    /// Returns false and does nothing if no state is named `from`, if `from` and `to` are the same,
    /// or if another state is already named `to`.
    pub fn rename_state(&mut self, from: &str, to: &str) -> bool {
        if from == to || self.state_index(to).is_some() {
            return false;
        }
        match self.state_index(from) {
            Some(q) => {
                self.states[q] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Renames a letter of the alphabet.
    /// Returns false and does nothing if no letter is named `from`, if `from` and `to` are the same,
    /// if another symbol is already named `to`, or if `to` is a name reserved for epsilon.
    /// The epsilon symbol itself cannot be renamed.
    pub fn rename_letter(&mut self, from: &str, to: &str) -> bool {
        if from == to || is_epsilon_name(to) {
            return false;
        }
        match self.letter_index(from) {
            Some(a) => self.alphabet.rename(a, to),
            None => false,
        }
    }

    /// Determinizes the automaton.
    /// Fails if the automaton has epsilon transitions, see [`Automaton::remove_epsilons`].
    pub fn determinize(&self) -> Result<Automaton, AutomatonError> {
        det::determinize(self)
    }

    /// Removes epsilon transitions. The result accepts the same language and has no epsilon symbol.
    pub fn remove_epsilons(&self) -> Automaton {
        epsilon::remove_epsilons(self)
    }

    /// Minimizes a deterministic automaton.
    /// Returns the minimal automaton and whether any state was removed.
    pub fn minimize(&self) -> Result<(Automaton, bool), AutomatonError> {
        minimize::minimize(self)
    }

    /// Returns the minimal deterministic automaton accepting the same language.
    /// Runs epsilon removal if needed, then subset construction, then minimization.
    pub fn reduce(&self) -> Automaton {
        let dfa = match self.kind {
            Kind::Deterministic => self.clone(),
            Kind::Nondeterministic => det::subset_construction(self),
            Kind::Epsilon => det::subset_construction(&epsilon::remove_epsilons(self)),
        };
        let (min, _) = minimize::refine(&dfa);
        min
    }

    /// Converts the automaton into a regular expression accepting the same language.
    pub fn to_regex(&self) -> Regex {
        to_regex(self)
    }

    pub fn union(&self, other: &Automaton) -> Automaton {
        ops::union(self, other)
    }

    pub fn intersection(&self, other: &Automaton) -> Automaton {
        ops::intersection(self, other)
    }

    pub fn difference(&self, other: &Automaton) -> Automaton {
        ops::difference(self, other)
    }

    pub fn concatenation(&self, other: &Automaton) -> Automaton {
        ops::concatenation(self, other)
    }

    pub fn kleene(&self) -> Automaton {
        ops::star(self)
    }

    pub fn complement(&self) -> Automaton {
        ops::complement(self)
    }

    /// Returns true if both automata accept the same language.
    pub fn equivalent(&self, other: &Automaton) -> bool {
        ops::equivalent(self, other)
    }
}

impl Display for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} {{", self.kind)?;
        writeln!(f, "\tAlphabet: {}", self.alphabet)?;
        writeln!(f, "\tStates:")?;
        for (q, row) in self.delta.iter().enumerate() {
            write!(f, "\t\t{}: ", self.states[q])?;
            for (a, ts) in row.iter().enumerate() {
                if ts.is_empty() {
                    continue;
                }
                let name = self.alphabet.name(a).unwrap_or("?");
                let targets = ts.iter().map(|p| self.states[*p].as_str()).join(",");
                write!(f, "{name} -> {{{targets}}}, ")?;
            }
            writeln!(f)?;
        }
        let names = |set: &BitSet| set.iter().map(|q| self.states[q].as_str()).join(", ");
        writeln!(f, "\tInitial: {{{}}}", names(&self.initial))?;
        writeln!(f, "\tFinals: {{{}}}", names(&self.finals))?;
        writeln!(f, "}}")
    }
}
