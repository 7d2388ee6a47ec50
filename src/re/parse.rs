//! Parser for the textual syntax of regular expressions.
//!
//! The syntax is deliberately small:
//!
//! - every character other than `+ * ( ) ε ∅` and whitespace is a symbol,
//! - `+` is union, juxtaposition is concatenation, postfix `*` is the Kleene star,
//! - `ε`, the keyword `eps`, the empty input and `()` denote the empty word,
//! - `∅` denotes the empty language,
//! - whitespace is ignored.
//!
//! The star binds tightest, then concatenation, then union. Both binary operators are left associative.
//!
//! Parsing runs in two phases. The input is first turned into a token sequence in which concatenation is an
//! explicit operator and parentheses are balanced. The sequence is then split top-down at the operator with the
//! lowest precedence outside of any parentheses.

use log::trace;

use crate::error::{ParseError, ParseErrorKind};

use super::Regex;

/// Options of the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Close parentheses that are still open at the end of the input instead of failing.
    pub auto_close_parens: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            auto_close_parens: true,
        }
    }
}

impl ParseOptions {
    /// Options that reject every malformed input.
    pub fn strict() -> Self {
        Self {
            auto_close_parens: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tok {
    Symbol(char),
    Epsilon,
    Empty,
    Union,
    Concat,
    Star,
    Open,
    Close,
}

impl Tok {
    /// Tokens after which an operand has ended.
    fn ends_operand(self) -> bool {
        matches!(
            self,
            Tok::Symbol(_) | Tok::Epsilon | Tok::Empty | Tok::Close | Tok::Star
        )
    }

    /// Tokens with which an operand can begin.
    fn starts_operand(self) -> bool {
        matches!(self, Tok::Symbol(_) | Tok::Epsilon | Tok::Empty | Tok::Open)
    }
}

/// A token and the character offset at which it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token {
    tok: Tok,
    pos: usize,
}

/// Parses a regular expression with the default options.
pub fn parse(input: &str) -> Result<Regex, ParseError> {
    parse_with(input, ParseOptions::default())
}

/// Parses a regular expression.
pub fn parse_with(input: &str, options: ParseOptions) -> Result<Regex, ParseError> {
    let tokens = normalize(input, options)?;
    if tokens.is_empty() {
        return Ok(Regex::Epsilon);
    }
    let re = split(&tokens)?;
    trace!("parsed '{input}' as {re}");
    Ok(re)
}

/// Tokenizes the input, makes concatenation explicit and balances the parentheses.
fn normalize(input: &str, options: ParseOptions) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens: Vec<Token> = Vec::with_capacity(chars.len() * 2);
    let mut open: Vec<usize> = Vec::new();

    let mut i = 0;
    while i < chars.len() {
        let pos = i;
        let c = chars[i];
        i += 1;
        let tok = match c {
            c if c.is_whitespace() => continue,
            '+' => Tok::Union,
            '*' => Tok::Star,
            '(' => {
                open.push(pos);
                Tok::Open
            }
            ')' => {
                if open.pop().is_none() {
                    return Err(ParseError::new(ParseErrorKind::UnmatchedClose, pos));
                }
                Tok::Close
            }
            'ε' => Tok::Epsilon,
            '∅' => Tok::Empty,
            'e' if chars[pos..].starts_with(&['e', 'p', 's']) => {
                i += 2;
                Tok::Epsilon
            }
            c => Tok::Symbol(c),
        };
        if let Some(prev) = tokens.last() {
            if prev.tok.ends_operand() && tok.starts_operand() {
                tokens.push(Token {
                    tok: Tok::Concat,
                    pos,
                });
            }
        }
        tokens.push(Token { tok, pos });
    }

    if let Some(&first_open) = open.first() {
        if !options.auto_close_parens {
            return Err(ParseError::new(ParseErrorKind::UnclosedParen, first_open));
        }
        for _ in 0..open.len() {
            tokens.push(Token {
                tok: Tok::Close,
                pos: chars.len(),
            });
        }
    }
    Ok(tokens)
}

/// Returns the index of the last token at parenthesis depth 0 that satisfies the predicate.
fn last_at_top(tokens: &[Token], pred: impl Fn(Tok) -> bool) -> Option<usize> {
    let mut depth = 0usize;
    for (i, t) in tokens.iter().enumerate().rev() {
        match t.tok {
            Tok::Close => depth += 1,
            Tok::Open => depth = depth.saturating_sub(1),
            tok if depth == 0 && pred(tok) => return Some(i),
            _ => {}
        }
    }
    None
}

/// Parses an operand of a binary operator at `pos`, which must not be empty.
fn operand(tokens: &[Token], pos: usize) -> Result<Regex, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::new(ParseErrorKind::EmptyOperand, pos));
    }
    split(tokens)
}

/// Parses a non-empty, balanced token sequence.
fn split(tokens: &[Token]) -> Result<Regex, ParseError> {
    debug_assert!(!tokens.is_empty());

    if let Some(i) = last_at_top(tokens, |t| t == Tok::Union) {
        let pos = tokens[i].pos;
        let left = operand(&tokens[..i], pos)?;
        let right = operand(&tokens[i + 1..], pos)?;
        return Ok(left.union(right));
    }
    if let Some(i) = last_at_top(tokens, |t| t == Tok::Concat) {
        let pos = tokens[i].pos;
        let left = operand(&tokens[..i], pos)?;
        let right = operand(&tokens[i + 1..], pos)?;
        return Ok(left.concat(right));
    }

    let last = tokens[tokens.len() - 1];
    match (tokens[0].tok, last.tok) {
        (_, Tok::Star) => {
            let rest = &tokens[..tokens.len() - 1];
            if rest.is_empty() {
                return Err(ParseError::new(ParseErrorKind::UnexpectedOperator, last.pos));
            }
            Ok(split(rest)?.star())
        }
        (Tok::Open, Tok::Close) => {
            // Without operators at depth 0 the outer parentheses enclose everything.
            let inner = &tokens[1..tokens.len() - 1];
            if inner.is_empty() {
                Ok(Regex::Epsilon)
            } else {
                split(inner)
            }
        }
        (Tok::Symbol(c), _) if tokens.len() == 1 => Ok(Regex::Symbol(c.to_string())),
        (Tok::Epsilon, _) if tokens.len() == 1 => Ok(Regex::Epsilon),
        (Tok::Empty, _) if tokens.len() == 1 => Ok(Regex::Empty),
        _ => Err(ParseError::new(
            ParseErrorKind::UnexpectedOperator,
            tokens[0].pos,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Regex {
        Regex::symbol(s)
    }

    fn err(input: &str) -> ParseError {
        parse(input).unwrap_err()
    }

    #[test]
    fn test_parse_symbol() {
        assert_eq!(parse("a").unwrap(), sym("a"));
        assert_eq!(parse("  a ").unwrap(), sym("a"));
    }

    #[test]
    fn test_parse_precedence() {
        // ab*+ba* is (a(b*))+(b(a*))
        let expected = sym("a")
            .concat(sym("b").star())
            .union(sym("b").concat(sym("a").star()));
        assert_eq!(parse("ab*+ba*").unwrap(), expected);
        assert_eq!(parse("a b* + b a*").unwrap(), expected);
    }

    #[test]
    fn test_parse_left_associative() {
        assert_eq!(
            parse("abc").unwrap(),
            sym("a").concat(sym("b")).concat(sym("c"))
        );
        assert_eq!(
            parse("a+b+c").unwrap(),
            sym("a").union(sym("b")).union(sym("c"))
        );
    }

    #[test]
    fn test_parse_groups() {
        assert_eq!(
            parse("(a+b)*c").unwrap(),
            sym("a").union(sym("b")).star().concat(sym("c"))
        );
        assert_eq!(parse("((a))").unwrap(), sym("a"));
        assert_eq!(parse("(ab)(c)").unwrap().to_string(), "abc");
    }

    #[test]
    fn test_parse_epsilon_and_empty() {
        assert_eq!(parse("").unwrap(), Regex::Epsilon);
        assert_eq!(parse("()").unwrap(), Regex::Epsilon);
        assert_eq!(parse("ε").unwrap(), Regex::Epsilon);
        assert_eq!(parse("eps").unwrap(), Regex::Epsilon);
        assert_eq!(parse("a+eps").unwrap(), sym("a").union(Regex::Epsilon));
        assert_eq!(parse("∅").unwrap(), Regex::Empty);
        assert_eq!(parse("a∅").unwrap(), Regex::Empty);
        // 'e' alone is a symbol
        assert_eq!(parse("ep").unwrap(), sym("e").concat(sym("p")));
        // the keyword must be written without spaces
        assert_eq!(
            parse("ep s").unwrap(),
            sym("e").concat(sym("p")).concat(sym("s"))
        );
    }

    #[test]
    fn test_parse_double_star() {
        assert_eq!(parse("a**").unwrap(), sym("a").star());
    }

    #[test]
    fn test_parse_auto_close() {
        assert_eq!(parse("(a+b").unwrap(), sym("a").union(sym("b")));
        assert_eq!(parse("((a").unwrap(), sym("a"));
        assert_eq!(
            parse_with("x(a+b", ParseOptions::strict()),
            Err(ParseError::new(ParseErrorKind::UnclosedParen, 1))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(err("*a"), ParseError::new(ParseErrorKind::UnexpectedOperator, 0));
        assert_eq!(err("a+*"), ParseError::new(ParseErrorKind::UnexpectedOperator, 2));
        assert_eq!(err("(*)"), ParseError::new(ParseErrorKind::UnexpectedOperator, 1));
        assert_eq!(err("a)"), ParseError::new(ParseErrorKind::UnmatchedClose, 1));
        assert_eq!(err("a+"), ParseError::new(ParseErrorKind::EmptyOperand, 1));
        assert_eq!(err("+a"), ParseError::new(ParseErrorKind::EmptyOperand, 0));
        assert_eq!(err("a++b"), ParseError::new(ParseErrorKind::EmptyOperand, 1));
        assert_eq!(err("(+)"), ParseError::new(ParseErrorKind::EmptyOperand, 1));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(err("a)").to_string(), "unmatched ')' at position 1");
    }

    #[test]
    fn test_display_reparses() {
        for input in ["ab*+ba*", "(a+b)*c", "a(b+c)*", "(ab)*+ε", "∅", "a*b*"] {
            let re = parse(input).unwrap();
            assert_eq!(parse(&re.to_string()).unwrap(), re, "{input}");
        }
    }
}
