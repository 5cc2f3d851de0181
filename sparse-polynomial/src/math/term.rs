use std::fmt;
use std::fmt::Formatter;
use std::ops::Neg;

use num_traits::One;
use num_traits::Zero;
use serde::Deserialize;
use serde::Serialize;

use super::decimal::Decimal;
use super::scalar::Scalar;
use crate::error::PolynomialError;

/// The monomial `coefficient · x^exponent`.
///
/// Two terms are equal if both their coefficients and their exponents are
/// equal. Within a [`Polynomial`](super::polynomial::Polynomial), terms are
/// ordered by exponent only, see [`Term::by_descending_exponent`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    pub coefficient: Decimal,
    pub exponent: u32,
}

impl Term {
    pub fn new(coefficient: Decimal, exponent: u32) -> Self {
        Self {
            coefficient,
            exponent,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.coefficient.is_zero()
    }

    /// Comparator putting the term of higher exponent first.
    pub fn by_descending_exponent(&self, other: &Self) -> std::cmp::Ordering {
        other.exponent.cmp(&self.exponent)
    }

    pub fn evaluate(&self, x: &Decimal) -> Decimal {
        &self.coefficient * &x.pow(self.exponent)
    }

    /// The product of two terms, or `None` if the exponents add up to more
    /// than [`u32::MAX`].
    pub fn checked_mul(&self, rhs: &Self) -> Option<Self> {
        let exponent = self.exponent.checked_add(rhs.exponent)?;
        Some(Self::new(&self.coefficient * &rhs.coefficient, exponent))
    }

    /// Writes the term without its sign: `x`, `3x`, `x^2`, `1.5x^4`, or just the
    /// magnitude for a constant term.
    pub(crate) fn fmt_unsigned(&self, f: &mut Formatter) -> fmt::Result {
        let magnitude = self.coefficient.abs();
        let is_unit = magnitude.is_one();
        match self.exponent {
            0 => write!(f, "{magnitude}"),
            1 if is_unit => write!(f, "x"),
            1 => write!(f, "{magnitude}x"),
            e if is_unit => write!(f, "x^{e}"),
            e => write!(f, "{magnitude}x^{e}"),
        }
    }
}

impl Neg for &Term {
    type Output = Term;

    fn neg(self) -> Term {
        Term::new(-&self.coefficient, self.exponent)
    }
}


/// A term as handed in by a caller. Neither part has been validated yet; in
/// particular, the exponent might be negative or fractional.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTerm {
    pub coefficient: Scalar,
    pub exponent: Scalar,
}

impl<C, E> From<(C, E)> for RawTerm
where
    C: Into<Scalar>,
    E: Into<Scalar>,
{
    fn from((coefficient, exponent): (C, E)) -> Self {
        Self {
            coefficient: coefficient.into(),
            exponent: exponent.into(),
        }
    }
}

impl From<Term> for RawTerm {
    fn from(term: Term) -> Self {
        (term.coefficient, term.exponent).into()
    }
}

impl TryFrom<RawTerm> for Term {
    type Error = PolynomialError;

    fn try_from(raw: RawTerm) -> Result<Self, Self::Error> {
        let invalid_term = || PolynomialError::InvalidTerm {
            coefficient: raw.coefficient.to_string(),
            exponent: raw.exponent.to_string(),
        };

        let coefficient = Decimal::try_from(raw.coefficient.clone()).map_err(|_| invalid_term())?;
        let exponent = Decimal::try_from(raw.exponent.clone()).map_err(|_| invalid_term())?;
        let exponent = u32::try_from(&exponent).map_err(|_| invalid_term())?;

        Ok(Self::new(coefficient, exponent))
    }
}
