//! Generators for families of deterministic automata.

use crate::{alphabet::Alphabet, error::AutomatonError};

use super::{Automaton, Builder, Kind};

/// Returns the name of a digit in the given base.
/// Digits up to base 36 are single characters (`0-9`, then `a-z`), larger digits are written in decimal.
fn digit_name(digit: u32, base: u32) -> String {
    if base <= 36 {
        std::char::from_digit(digit, base)
            .map(String::from)
            .unwrap_or_else(|| digit.to_string())
    } else {
        digit.to_string()
    }
}

/// Builds the automaton accepting the numbers in base `base`, most significant digit first, that are divisible by `modulus`.
///
/// State `r` stands for the residue `r` of the digits read so far, reading digit `d` leads to `(base * r + d) mod modulus`.
/// The empty word is read as zero and is accepted.
pub fn divisibility(modulus: u32, base: u32) -> Result<Automaton, AutomatonError> {
    if modulus == 0 {
        return Err(AutomatonError::InvalidParameter(
            "modulus must be positive".into(),
        ));
    }
    if base < 2 {
        return Err(AutomatonError::InvalidParameter(
            "base must be at least 2".into(),
        ));
    }
    let alphabet: Alphabet = (0..base).map(|d| digit_name(d, base)).collect();
    let mut builder = Builder::with_alphabet(Kind::Deterministic, alphabet);
    for r in 0..modulus {
        builder.add_state(r.to_string());
    }
    let (m, b) = (modulus as u64, base as u64);
    for r in 0..m {
        for d in 0..b {
            let next = (b * r + d) % m;
            builder.add_transition(r as usize, d as usize, next as usize);
        }
    }
    builder.add_initial(0);
    builder.add_final(0);
    builder.build()
}

/// Builds the automaton accepting the words over the alphabet whose length is divisible by `modulus`.
pub fn length_divisibility<S: AsRef<str>>(alphabet: &[S], modulus: usize) -> Result<Automaton, AutomatonError> {
    if modulus == 0 {
        return Err(AutomatonError::InvalidParameter(
            "modulus must be positive".into(),
        ));
    }
    let mut builder = Builder::new(Kind::Deterministic);
    for s in alphabet {
        let s = s.as_ref();
        if builder.alphabet().contains(s) {
            return Err(AutomatonError::DuplicateSymbol(s.to_string()));
        }
        builder.add_symbol(s)?;
    }
    for r in 0..modulus {
        builder.add_state(r.to_string());
    }
    for r in 0..modulus {
        for a in 0..alphabet.len() {
            builder.add_transition(r, a, (r + 1) % modulus);
        }
    }
    builder.add_initial(0);
    builder.add_final(0);
    builder.build()
}
