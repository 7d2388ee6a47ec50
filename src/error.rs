//! Errors returned by automaton construction, the algorithms, and the regex parser.

use thiserror::Error;

use crate::automata::{StateId, SymbolId};

/// The reason a regular expression could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// An operator appears where an operand is expected, e.g. a leading `*`.
    UnexpectedOperator,
    /// A `)` without a matching `(`.
    UnmatchedClose,
    /// A `(` that is never closed and auto-closing is disabled.
    UnclosedParen,
    /// One side of a union or concatenation is empty, e.g. `a+`.
    EmptyOperand,
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErrorKind::UnexpectedOperator => write!(f, "unexpected operator"),
            ParseErrorKind::UnmatchedClose => write!(f, "unmatched ')'"),
            ParseErrorKind::UnclosedParen => write!(f, "unclosed '('"),
            ParseErrorKind::EmptyOperand => write!(f, "missing operand"),
        }
    }
}

/// A malformed regular expression.
/// The position is the character offset into the input at which the problem was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at position {position}")]
pub struct ParseError {
    pub position: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self { position, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    #[error("unknown state '{0}'")]
    UnknownState(String),

    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),

    #[error("state not found: {0}")]
    StateNotFound(StateId),

    #[error("symbol not found: {0}")]
    SymbolNotFound(SymbolId),

    #[error("duplicate state name '{0}'")]
    DuplicateState(String),

    #[error("duplicate symbol name '{0}'")]
    DuplicateSymbol(String),

    #[error("automaton has no initial state")]
    NoInitialState,

    /// A deterministic automaton needs exactly one target per (state, symbol) pair and one initial state.
    #[error("not deterministic: state '{state}' has {targets} targets on '{symbol}'")]
    NotDeterministic {
        state: String,
        symbol: String,
        targets: usize,
    },

    #[error("deterministic automaton must have exactly one initial state, found {0}")]
    MultipleInitialStates(usize),

    #[error("epsilon transitions are only allowed in epsilon automata")]
    EpsilonNotAllowed,

    /// An algorithm was invoked on an automaton of the wrong kind.
    #[error("precondition violated: {0}")]
    Precondition(&'static str),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
