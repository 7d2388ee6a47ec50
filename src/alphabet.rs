//! Alphabets of named symbols.
//!
//! An alphabet is an ordered set of unique symbol names. The position of a symbol in the alphabet is its identity,
//! the automata refer to symbols by that index only. Epsilon automata carry one additional symbol that stands for
//! the empty word, see [`EPSILON`].

use std::fmt::Display;

use indexmap::IndexSet;
use itertools::Itertools;

use crate::automata::SymbolId;

/// The display name of the symbol that denotes the empty word.
pub const EPSILON: &str = "ε";

/// Returns true if the name denotes the empty word.
/// Both `ε` and the ASCII spelling `eps` are recognized.
pub fn is_epsilon_name(name: &str) -> bool {
    name == EPSILON || name == "eps"
}

/// An ordered set of symbol names.
/// Symbols are identified by their insertion index.
#[derive(Debug, Clone, Default, Eq)]
pub struct Alphabet {
    symbols: IndexSet<String>,
}

/// Alphabets are equal if they hold the same symbols at the same indices.
impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Alphabet {
    /// Creates an empty alphabet.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Inserts a symbol and returns its index.
    /// If the symbol is already present, the existing index is returned.
    pub fn insert(&mut self, name: impl Into<String>) -> SymbolId {
        self.symbols.insert_full(name.into()).0
    }

    /// Returns the index of the symbol with the given name, if present.
    pub fn index_of(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get_index_of(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains(name)
    }

    /// Returns the name of the symbol with the given index.
    pub fn name(&self, id: SymbolId) -> Option<&str> {
        self.symbols.get_index(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterates over the symbol names in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.symbols.iter().map(String::as_str)
    }

    /// Returns the union of both alphabets.
    /// The symbols of `self` keep their indices, the symbols only in `other` are appended in their order.
    pub fn union(&self, other: &Alphabet) -> Alphabet {
        let mut res = self.clone();
        for s in other.iter() {
            res.insert(s);
        }
        res
    }

    /// Renames the symbol at the given index.
    /// Returns false and leaves the alphabet unchanged if the index is invalid or the new name is taken by another symbol.
    pub(crate) fn rename(&mut self, id: SymbolId, to: &str) -> bool {
        if id >= self.symbols.len() || self.contains(to) {
            return false;
        }
        let mut names: Vec<String> = self.symbols.drain(..).collect();
        names[id] = to.to_string();
        self.symbols = names.into_iter().collect();
        true
    }
}

impl<S: Into<String>> FromIterator<S> for Alphabet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut alph = Alphabet::empty();
        for s in iter {
            alph.insert(s);
        }
        alph
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.iter().join(", "))
    }
}
