//! Reads the textual form produced by [`Polynomial`]'s `Display` implementation.
//!
//! The grammar is deliberately loose about whitespace: spaces may appear
//! anywhere, including between a coefficient and `x`, around `^`, and inside
//! the exponent. Any sequence of terms is accepted, in any order and with
//! repeated exponents; the result is canonicalized afterwards.

use std::str::FromStr;

use log::debug;
use log::trace;
use num_traits::One;

use super::decimal::Decimal;
use super::polynomial::Polynomial;
use super::term::Term;
use crate::error::PolynomialError;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum State {
    OutsideTerm,
    SignSeen,
    ReadingCoefficient,
    ReadingVariableMarker,
    ReadingExponent,
}

impl State {
    fn has_pending_term(self) -> bool {
        matches!(
            self,
            Self::ReadingCoefficient | Self::ReadingVariableMarker | Self::ReadingExponent
        )
    }
}

/// The pieces of the term currently being read.
#[derive(Debug, Default)]
struct PendingTerm {
    is_negative: bool,
    coefficient: String,
    exponent: String,
    has_variable: bool,
}

impl PendingTerm {
    /// Missing coefficients default to 1. Missing exponents default to 1 if an
    /// `x` or `^` was seen, and to 0 otherwise.
    fn take(&mut self) -> Result<Term, PolynomialError> {
        let pending = std::mem::take(self);

        let magnitude = match pending.coefficient.as_str() {
            "" => Decimal::one(),
            digits => digits.parse()?,
        };
        let coefficient = if pending.is_negative {
            -magnitude
        } else {
            magnitude
        };

        let exponent = match (pending.exponent.as_str(), pending.has_variable) {
            ("", true) => 1,
            ("", false) => 0,
            (digits, _) => {
                let invalid_term = || PolynomialError::InvalidTerm {
                    coefficient: coefficient.to_string(),
                    exponent: digits.to_string(),
                };
                let exponent: Decimal = digits.parse().map_err(|_| invalid_term())?;
                u32::try_from(&exponent).map_err(|_| invalid_term())?
            }
        };

        let term = Term::new(coefficient, exponent);
        trace!("parsed term {term:?}");
        Ok(term)
    }
}

/// Splits `text` into its terms, without merging or sorting them.
///
/// # Errors
///
/// - [`PolynomialError::InvalidCharacter`] for any symbol other than digits,
///   `.`, `x`, `^`, `+`, `-`, and spaces, as well as for a trailing sign.
/// - [`PolynomialError::InvalidNumber`] for a malformed coefficient like `1.2.3`.
/// - [`PolynomialError::InvalidTerm`] for a fractional exponent like `x^1.5`.
pub fn parse_terms(text: &str) -> Result<Vec<Term>, PolynomialError> {
    let mut terms = vec![];
    let mut pending = PendingTerm::default();
    let mut state = State::OutsideTerm;
    let mut last_sign = None;

    for (position, character) in text.char_indices() {
        state = match (character, state) {
            (' ', state) => state,
            ('+' | '-', state) => {
                if state.has_pending_term() {
                    terms.push(pending.take()?);
                }
                pending.is_negative = character == '-';
                last_sign = Some((character, position));
                State::SignSeen
            }
            (
                '0'..='9' | '.',
                State::OutsideTerm | State::SignSeen | State::ReadingCoefficient,
            ) => {
                pending.coefficient.push(character);
                State::ReadingCoefficient
            }
            ('0'..='9' | '.', State::ReadingVariableMarker | State::ReadingExponent) => {
                pending.exponent.push(character);
                State::ReadingExponent
            }
            ('x' | '^', _) => {
                pending.has_variable = true;
                State::ReadingVariableMarker
            }
            (character, _) => {
                return Err(PolynomialError::InvalidCharacter {
                    character,
                    position,
                });
            }
        };
    }

    match state {
        State::SignSeen => {
            let (character, position) = last_sign.unwrap_or(('+', 0));
            return Err(PolynomialError::InvalidCharacter {
                character,
                position,
            });
        }
        state if state.has_pending_term() => terms.push(pending.take()?),
        _ => (),
    }

    debug!("parsed {} term(s) from {text:?}", terms.len());
    Ok(terms)
}

impl FromStr for Polynomial {
    type Err = PolynomialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_terms(s).map(Self::canonicalize)
    }
}
