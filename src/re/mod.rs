//! Regular Expressions
//!
//! A regular expression is an owned tree over the symbols of an alphabet, built once and never modified.
//! The constructors [`Regex::union`], [`Regex::concat`] and [`Regex::star`] simplify trivial terms on the fly:
//!
//! - `∅` is neutral for union and absorbing for concatenation,
//! - `ε` is neutral for concatenation,
//! - `∅*` and `ε*` are `ε`, and `r**` is `r*`,
//! - `r + r` is `r`.
//!
//! The textual syntax is described in [`parse`].

mod parse;

use std::fmt::Display;

use smallvec::SmallVec;

use crate::alphabet::{Alphabet, EPSILON};

pub use parse::{parse, parse_with, ParseOptions};

/// Display form of the empty language.
pub const EMPTY_SET: &str = "∅";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Regex {
    /// The empty language `∅`.
    Empty,
    /// The language containing only the empty word `ε`.
    Epsilon,
    /// A single symbol of the alphabet.
    Symbol(String),
    Union(Box<Regex>, Box<Regex>),
    Concat(Box<Regex>, Box<Regex>),
    Star(Box<Regex>),
}

impl Regex {
    pub fn symbol(name: impl Into<String>) -> Self {
        Regex::Symbol(name.into())
    }

    /// Returns the union of both expressions.
    pub fn union(self, other: Regex) -> Regex {
        match (self, other) {
            (Regex::Empty, r) | (r, Regex::Empty) => r,
            (l, r) if l == r => l,
            (l, r) => Regex::Union(Box::new(l), Box::new(r)),
        }
    }

    /// Returns the concatenation of both expressions.
    pub fn concat(self, other: Regex) -> Regex {
        match (self, other) {
            (Regex::Empty, _) | (_, Regex::Empty) => Regex::Empty,
            (Regex::Epsilon, r) | (r, Regex::Epsilon) => r,
            (l, r) => Regex::Concat(Box::new(l), Box::new(r)),
        }
    }

    /// Returns the Kleene star of the expression.
    pub fn star(self) -> Regex {
        match self {
            Regex::Empty | Regex::Epsilon => Regex::Epsilon,
            r @ Regex::Star(_) => r,
            r => Regex::Star(Box::new(r)),
        }
    }

    /// Returns true if the expression denotes the empty language.
    /// Thanks to the simplifying constructors this is only the case for `∅` itself, unless the tree was built by hand.
    pub fn is_empty_set(&self) -> bool {
        match self {
            Regex::Empty => true,
            Regex::Epsilon | Regex::Symbol(_) | Regex::Star(_) => false,
            Regex::Union(l, r) => l.is_empty_set() && r.is_empty_set(),
            Regex::Concat(l, r) => l.is_empty_set() || r.is_empty_set(),
        }
    }

    /// Returns whether the expression accepts the empty word.
    pub fn nullable(&self) -> bool {
        match self {
            Regex::Empty | Regex::Symbol(_) => false,
            Regex::Epsilon | Regex::Star(_) => true,
            Regex::Union(l, r) => l.nullable() || r.nullable(),
            Regex::Concat(l, r) => l.nullable() && r.nullable(),
        }
    }

    /// Returns the symbols occurring in the expression, in order of first occurrence.
    pub fn alphabet(&self) -> Alphabet {
        let mut alph = Alphabet::empty();
        let mut stack: SmallVec<[&Regex; 16]> = SmallVec::new();
        stack.push(self);
        while let Some(r) = stack.pop() {
            match r {
                Regex::Symbol(s) => {
                    alph.insert(s.as_str());
                }
                Regex::Union(l, r) | Regex::Concat(l, r) => {
                    // right first so that the left operand is visited first
                    stack.push(r);
                    stack.push(l);
                }
                Regex::Star(r) => stack.push(r),
                Regex::Empty | Regex::Epsilon => {}
            }
        }
        alph
    }

    /// Binding strength used to decide where parentheses are needed.
    fn precedence(&self) -> u8 {
        match self {
            Regex::Union(..) => 0,
            Regex::Concat(..) => 1,
            Regex::Star(_) => 2,
            Regex::Empty | Regex::Epsilon | Regex::Symbol(_) => 3,
        }
    }

    fn fmt_operand(&self, f: &mut std::fmt::Formatter<'_>, min: u8) -> std::fmt::Result {
        write!(f, "{}", self.operand_string(min))
    }

    fn operand_string(&self, min: u8) -> String {
        if self.precedence() < min {
            format!("({self})")
        } else {
            self.to_string()
        }
    }
}

/// Returns true if writing `right` directly after `left` spells the `eps` keyword across the boundary.
/// Neither side contains the keyword on its own, so only the last two and first two characters matter.
fn spells_keyword(left: &str, right: &str) -> bool {
    let tail: Vec<char> = left.chars().rev().take(2).collect();
    let window: String = tail
        .into_iter()
        .rev()
        .chain(right.chars().take(2))
        .collect();
    window.contains("eps")
}

impl Display for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Regex::Empty => write!(f, "{EMPTY_SET}"),
            Regex::Epsilon => write!(f, "{EPSILON}"),
            Regex::Symbol(s) => write!(f, "{s}"),
            Regex::Union(l, r) => {
                l.fmt_operand(f, 0)?;
                write!(f, "+")?;
                r.fmt_operand(f, 0)
            }
            Regex::Concat(l, r) => {
                let (l, r) = (l.operand_string(1), r.operand_string(1));
                // whitespace is skipped by the parser but breaks up the keyword
                let sep = if spells_keyword(&l, &r) { " " } else { "" };
                write!(f, "{l}{sep}{r}")
            }
            Regex::Star(r) => {
                r.fmt_operand(f, 3)?;
                write!(f, "*")
            }
        }
    }
}
