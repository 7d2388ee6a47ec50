//! Finite automata over named symbols and their conversion to and from regular expressions.
//!
//! The crate provides deterministic, non-deterministic and epsilon automata in one representation,
//! [`Automaton`], together with the classic algorithms on them: subset construction, epsilon removal,
//! minimization, compilation of regular expressions, state elimination, and the product constructions for
//! the boolean operations.
//!
//! # Examples
//! ```
//! use regaut::Automaton;
//!
//! let nfa = Automaton::from_regex("ab*+ba*").unwrap();
//! assert!(nfa.accepts(&"abbbb".into()));
//! assert!(!nfa.accepts(&"aba".into()));
//!
//! let dfa = nfa.reduce();
//! assert!(dfa.is_det());
//! assert!(dfa.equivalent(&nfa));
//! ```

pub mod alphabet;
pub mod automata;
pub mod error;
pub mod re;
#[cfg(feature = "sampling")]
pub mod sampling;

use std::{fmt::Display, ops::Index};

use itertools::Itertools;
use quickcheck::Arbitrary;

pub use automata::{Automaton, Builder, Definition, Kind};
pub use error::{AutomatonError, ParseError, ParseErrorKind};
pub use re::Regex;

/// A word, i.e., a finite sequence of symbols.
/// Symbols are referred to by name, a word can therefore be checked against automata over different alphabets.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Word(Vec<String>);

impl Word {
    /// The empty word.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Creates a word from the given symbol names.
    ///
    /// # Examples
    /// ```
    /// use regaut::Word;
    /// let w = Word::from_symbols(["if", "then", "else"]);
    /// assert_eq!(w.len(), 3);
    /// assert_eq!(w.to_string(), "if then else");
    /// ```
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(symbols.into_iter().map(Into::into).collect())
    }

    /// Returns the number of symbols in the word.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the symbol names of the word.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    /// Appends a symbol to the end of the word.
    pub fn push(&mut self, symbol: impl Into<String>) {
        self.0.push(symbol.into());
    }

    /// Appends another word to the end of this word.
    pub fn append(&mut self, other: &Word) {
        self.0.extend(other.0.iter().cloned());
    }
}

/// Every character of the string is one symbol.
///
/// # Examples
/// ```
/// use regaut::Word;
/// let w = Word::from("123");
/// assert_eq!(w, Word::from_symbols(["1", "2", "3"]));
/// ```
impl From<&str> for Word {
    fn from(s: &str) -> Self {
        Self(s.chars().map(String::from).collect())
    }
}

impl Index<usize> for Word {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Single character symbols are written without separators, otherwise the symbols are separated by spaces.
impl Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.iter().all(|s| s.chars().count() == 1) {
            write!(f, "{}", self.0.concat())
        } else {
            write!(f, "{}", self.0.iter().join(" "))
        }
    }
}

impl Arbitrary for Word {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let len = usize::arbitrary(g) % 8;
        let symbols = std::iter::repeat_with(|| {
            g.choose(&["a", "b", "c"])
                .copied()
                .unwrap_or("a")
                .to_string()
        })
        .take(len)
        .collect();
        Word(symbols)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(Word))
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn test_from_str_splits_characters() {
        let w = Word::from("aεb");
        assert_eq!(w.len(), 3);
        assert_eq!(&w[1], "ε");
        assert_eq!(w.iter().collect_vec(), vec!["a", "ε", "b"]);
    }

    #[test]
    fn test_empty_word() {
        let w = Word::from("");
        assert!(w.is_empty());
        assert_eq!(w, Word::empty());
        assert_eq!(w.to_string(), "");
    }

    #[test]
    fn test_push_and_append() {
        let mut w = Word::from("ab");
        w.push("c");
        w.append(&Word::from_symbols(["d", "e"]));
        assert_eq!(w.to_string(), "abcde");
        w.push("ff");
        assert_eq!(w.to_string(), "a b c d e ff");
    }

    #[quickcheck]
    fn append_adds_lengths(a: Word, b: Word) -> bool {
        let mut c = a.clone();
        c.append(&b);
        c.len() == a.len() + b.len() && c.iter().take(a.len()).eq(a.iter())
    }
}
