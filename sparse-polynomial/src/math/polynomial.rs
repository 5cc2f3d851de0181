use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::iter::Product;
use std::iter::Sum;
use std::ops::Add;
use std::ops::AddAssign;
use std::ops::Div;
use std::ops::Mul;
use std::ops::MulAssign;
use std::ops::Neg;
use std::ops::Rem;
use std::ops::Sub;
use std::ops::SubAssign;

use arbitrary::Arbitrary;
use arbitrary::Unstructured;
use itertools::EitherOrBoth;
use itertools::Itertools;
use log::debug;
use log::trace;
use num_traits::One;
use num_traits::Zero;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::Error as _;

use super::decimal::Decimal;
use super::scalar::Scalar;
use super::term::RawTerm;
use super::term::Term;
use crate::config;
use crate::error::PolynomialError;

/// The inputs a [`Polynomial`] can be built from, see [`Polynomial::try_new`].
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// A constant polynomial.
    Scalar(Scalar),

    /// Any number of terms, possibly unordered, with repeated exponents, or with
    /// zero coefficients.
    RawTerms(Vec<RawTerm>),

    /// The textual form produced by [`Polynomial`]'s `Display` implementation.
    Text(String),
}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Scalar(s) => write!(f, "scalar {s}"),
            Self::RawTerms(terms) => {
                let terms = terms
                    .iter()
                    .map(|t| format!("({}, {})", t.coefficient, t.exponent))
                    .join(", ");
                write!(f, "terms [{terms}]")
            }
            Self::Text(text) => write!(f, "text {text:?}"),
        }
    }
}

/// A univariate polynomial with exact [decimal](Decimal) coefficients, in sparse
/// form.
///
/// The terms are canonical at all times:
/// - no two terms share an exponent,
/// - no coefficient is zero, except for the zero polynomial, which consists of
///   exactly the one term `0·x^0`, and
/// - the terms are sorted by strictly decreasing exponent.
///
/// Polynomials are immutable values; every operation returns a new polynomial.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Polynomial {
    terms: Vec<Term>,
}

impl Polynomial {
    /// Merges terms of equal exponent, drops terms with zero coefficient, and
    /// sorts the remaining terms by decreasing exponent. This is the only place
    /// where polynomials are made.
    pub fn canonicalize(terms: impl IntoIterator<Item = Term>) -> Self {
        let mut coefficients: BTreeMap<u32, Decimal> = BTreeMap::new();
        for term in terms {
            let coefficient = coefficients.entry(term.exponent).or_default();
            *coefficient = &*coefficient + &term.coefficient;
        }

        let canonical_terms = coefficients
            .into_iter()
            .rev()
            .filter(|(_, coefficient)| !coefficient.is_zero())
            .map(|(exponent, coefficient)| Term::new(coefficient, exponent))
            .collect_vec();

        if canonical_terms.is_empty() {
            return Self::zero();
        }
        Self {
            terms: canonical_terms,
        }
    }

    /// Validates every raw term, then [canonicalizes](Self::canonicalize).
    ///
    /// # Errors
    ///
    /// [`PolynomialError::InvalidTerm`] if any exponent is negative or not an
    /// integer, or any coefficient is not a finite number.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sparse_polynomial::prelude::*;
    /// let poly = Polynomial::from_terms([(1, 2), (-3, 2), (1, 3), (1, 0)]).unwrap();
    /// assert_eq!("x^3 - 2x^2 + 1", poly.to_string());
    /// assert!(Polynomial::from_terms([(1, -2)]).is_err());
    /// ```
    pub fn from_terms<I, T>(raw_terms: I) -> Result<Self, PolynomialError>
    where
        I: IntoIterator<Item = T>,
        T: Into<RawTerm>,
    {
        let terms = raw_terms
            .into_iter()
            .map(|raw| Term::try_from(Into::<RawTerm>::into(raw)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::canonicalize(terms))
    }

    /// The constant polynomial `value`.
    ///
    /// # Errors
    ///
    /// [`PolynomialError::InvalidArgument`] if `value` is not a finite number.
    pub fn from_scalar(value: impl Into<Scalar>) -> Result<Self, PolynomialError> {
        let constant = Decimal::try_from(value.into())?;
        Ok(Self::from_constant(constant))
    }

    pub fn from_constant(constant: Decimal) -> Self {
        Self::canonicalize([Term::new(constant, 0)])
    }

    /// Builds a polynomial from any [`Source`].
    ///
    /// # Errors
    ///
    /// [`PolynomialError::InvalidArgument`] naming the offending input if it
    /// cannot be turned into a polynomial. Use [`from_scalar`](Self::from_scalar),
    /// [`from_terms`](Self::from_terms), or [`str::parse`] to learn the precise
    /// cause.
    pub fn try_new(source: Source) -> Result<Self, PolynomialError> {
        let polynomial = match &source {
            Source::Scalar(scalar) => Self::from_scalar(scalar.clone()),
            Source::RawTerms(terms) => Self::from_terms(terms.iter().cloned()),
            Source::Text(text) => text.parse(),
        };

        polynomial.map_err(|_| {
            PolynomialError::InvalidArgument(format!("cannot build a polynomial from {source}"))
        })
    }

    /// The canonical terms, highest exponent first.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// The number of terms, counting the zero polynomial's single term.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    fn leading_term(&self) -> &Term {
        // canonical polynomials always have at least one term
        &self.terms[0]
    }

    /// The exponent of the first term. The zero polynomial reports 0.
    pub fn leading_exponent(&self) -> u32 {
        self.leading_term().exponent
    }

    /// The coefficient of the first term. Zero if (and only if) `self`
    /// [is zero](Self::is_zero).
    pub fn leading_coefficient(&self) -> &Decimal {
        &self.leading_term().coefficient
    }

    /// `None` for the zero polynomial, otherwise the [leading exponent].
    ///
    /// [leading exponent]: Self::leading_exponent
    pub fn degree(&self) -> Option<u32> {
        (!self.is_zero()).then(|| self.leading_exponent())
    }

    /// The coefficient of `x^exponent`, which is zero if there is no such term.
    pub fn coefficient(&self, exponent: u32) -> Decimal {
        self.terms
            .iter()
            .find(|term| term.exponent == exponent)
            .map(|term| term.coefficient.clone())
            .unwrap_or_default()
    }

    /// Like [`coefficient`](Self::coefficient), for an exponent of any numeric
    /// type.
    ///
    /// # Errors
    ///
    /// [`PolynomialError::InvalidArgument`] if `exponent` is not a non-negative
    /// integer.
    pub fn coefficient_at(&self, exponent: impl Into<Scalar>) -> Result<Decimal, PolynomialError> {
        let exponent = exponent.into();
        let invalid = || {
            PolynomialError::InvalidArgument(format!(
                "exponent {exponent} is not a non-negative integer"
            ))
        };

        let exponent_value = Decimal::try_from(exponent.clone()).map_err(|_| invalid())?;
        if exponent_value.is_negative() || !exponent_value.is_integer() {
            return Err(invalid());
        }

        // no term has an exponent beyond u32::MAX
        let coefficient = u32::try_from(&exponent_value)
            .map(|e| self.coefficient(e))
            .unwrap_or_default();
        Ok(coefficient)
    }

    /// Evaluate the polynomial in `x`.
    ///
    /// # Errors
    ///
    /// [`PolynomialError::InvalidArgument`] if `x` is not a finite number.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sparse_polynomial::prelude::*;
    /// let poly: Polynomial = "x^3 - 2x^2 + 1".parse().unwrap();
    /// assert_eq!(Decimal::from(0), poly.evaluate(1).unwrap());
    /// assert_eq!("0.625".parse::<Decimal>().unwrap(), poly.evaluate(0.5).unwrap());
    /// assert!(poly.evaluate(f64::NAN).is_err());
    /// ```
    pub fn evaluate(&self, x: impl Into<Scalar>) -> Result<Decimal, PolynomialError> {
        let x = Decimal::try_from(x.into())?;
        Ok(self.terms.iter().map(|term| term.evaluate(&x)).sum())
    }

    #[must_use]
    pub fn negate(&self) -> Self {
        let terms = self.terms.iter().map(Neg::neg).collect();
        Self { terms }
    }

    /// Merges the two (descending) term sequences in one pass.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let merged = self
            .terms
            .iter()
            .merge_join_by(&other.terms, |l, r| l.by_descending_exponent(r))
            .map(|pair| match pair {
                EitherOrBoth::Both(l, r) => {
                    Term::new(&l.coefficient + &r.coefficient, l.exponent)
                }
                EitherOrBoth::Left(t) | EitherOrBoth::Right(t) => t.clone(),
            });

        Self::canonicalize(merged)
    }

    #[must_use]
    pub fn subtract(&self, other: &Self) -> Self {
        self.add(&other.negate())
    }

    /// Every term of `self` times every term of `other`.
    ///
    /// # Panics
    ///
    /// Panics if the product has a term of degree beyond [`u32::MAX`]. See
    /// [`checked_mul`](Self::checked_mul) for the fallible version.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        self.checked_mul(other).expect("product exponents should fit in u32")
    }

    /// Like [`multiply`](Self::multiply), but fails instead of panicking.
    ///
    /// # Errors
    ///
    /// [`PolynomialError::ExponentOverflow`] if the exponents of two terms add
    /// up to more than [`u32::MAX`].
    pub fn checked_mul(&self, other: &Self) -> Result<Self, PolynomialError> {
        let products = self
            .terms
            .iter()
            .cartesian_product(&other.terms)
            .map(|(l, r)| {
                l.checked_mul(r).ok_or(PolynomialError::ExponentOverflow {
                    left: l.exponent,
                    right: r.exponent,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::canonicalize(products))
    }

    #[must_use]
    pub fn scalar_mul(&self, scalar: &Decimal) -> Self {
        let terms = self
            .terms
            .iter()
            .map(|term| Term::new(&term.coefficient * scalar, term.exponent));
        Self::canonicalize(terms)
    }

    /// # Panics
    ///
    /// Panics if the power has a degree beyond [`u32::MAX`]. See
    /// [`checked_pow`](Self::checked_pow) for the fallible version.
    #[must_use]
    pub fn pow(&self, exponent: u32) -> Self {
        self.checked_pow(exponent).expect("exponent of the power should fit in u32")
    }

    /// Repeated squaring.
    ///
    /// # Errors
    ///
    /// [`PolynomialError::ExponentOverflow`] if the power has a degree beyond
    /// [`u32::MAX`].
    pub fn checked_pow(&self, mut exponent: u32) -> Result<Self, PolynomialError> {
        let mut accumulator = Self::one();
        let mut square = self.clone();
        while exponent > 0 {
            if exponent & 1 == 1 {
                accumulator = accumulator.checked_mul(&square)?;
            }
            exponent >>= 1;
            if exponent > 0 {
                square = square.checked_mul(&square)?;
            }
        }

        Ok(accumulator)
    }

    #[must_use]
    pub fn formal_derivative(&self) -> Self {
        let terms = self
            .terms
            .iter()
            .filter(|term| term.exponent > 0)
            .map(|term| {
                let factor = Decimal::from(term.exponent);
                Term::new(&term.coefficient * &factor, term.exponent - 1)
            });

        Self::canonicalize(terms)
    }

    /// Polynomial long division. Returns `(quotient, remainder)` such that
    /// `self == quotient * divisor + remainder`.
    ///
    /// The quotient's coefficients are exact whenever they terminate within the
    /// [configured precision](crate::config::set_division_precision). The
    /// equation above holds exactly in any case, since the remainder is
    /// computed from the quotient.
    ///
    /// The precision is configured per thread, so a non-terminating quotient
    /// can differ between threads with different settings. Use
    /// [`div_rem_with_precision`](Self::div_rem_with_precision) to pin it.
    ///
    /// The dividend is expanded into a dense buffer of
    /// `self.leading_exponent() + 1` coefficients. Sparse dividends of very
    /// high degree, like `x^4000000000`, need memory in proportion to that
    /// degree.
    ///
    /// # Errors
    ///
    /// [`PolynomialError::DivisionByZeroPolynomial`] if `divisor` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sparse_polynomial::prelude::*;
    /// let dividend: Polynomial = "x^3 - 2x^2 + 1".parse().unwrap();
    /// let divisor: Polynomial = "2x^2 + 1.2".parse().unwrap();
    /// let (quotient, remainder) = dividend.div_rem(&divisor).unwrap();
    /// assert_eq!("0.5x - 1", quotient.to_string());
    /// assert_eq!("- 0.6x + 2.2", remainder.to_string());
    /// ```
    pub fn div_rem(&self, divisor: &Self) -> Result<(Self, Self), PolynomialError> {
        self.div_rem_with_precision(divisor, config::division_precision())
    }

    /// Like [`div_rem`](Self::div_rem), keeping `precision` significant digits
    /// of non-terminating quotient coefficients regardless of the
    /// [configuration](crate::config). A `precision` of 0 is treated as 1.
    ///
    /// # Errors
    ///
    /// [`PolynomialError::DivisionByZeroPolynomial`] if `divisor` is zero.
    pub fn div_rem_with_precision(
        &self,
        divisor: &Self,
        precision: usize,
    ) -> Result<(Self, Self), PolynomialError> {
        let quotient = self.checked_div_with_precision(divisor, precision)?;
        let remainder = self.subtract(&quotient.multiply(divisor));

        Ok((quotient, remainder))
    }

    /// The quotient of [polynomial long division](Self::div_rem), using the
    /// thread's [configured precision](crate::config::set_division_precision).
    ///
    /// # Errors
    ///
    /// [`PolynomialError::DivisionByZeroPolynomial`] if `divisor` is zero.
    pub fn checked_div(&self, divisor: &Self) -> Result<Self, PolynomialError> {
        self.checked_div_with_precision(divisor, config::division_precision())
    }

    /// The quotient of [polynomial long division](Self::div_rem_with_precision)
    /// with an explicit precision.
    ///
    /// # Errors
    ///
    /// [`PolynomialError::DivisionByZeroPolynomial`] if `divisor` is zero.
    pub fn checked_div_with_precision(
        &self,
        divisor: &Self,
        precision: usize,
    ) -> Result<Self, PolynomialError> {
        if divisor.is_zero() {
            return Err(PolynomialError::DivisionByZeroPolynomial);
        }

        let dividend_exponent = self.leading_exponent();
        let divisor_exponent = divisor.leading_exponent();
        let divisor_coefficient = divisor.leading_coefficient();
        debug!("dividing polynomial of degree {dividend_exponent} by one of degree {divisor_exponent}");

        if dividend_exponent < divisor_exponent {
            return Ok(Self::zero());
        }

        // dense working copy of the dividend, indexed by exponent
        let mut remainder = vec![Decimal::zero(); dividend_exponent as usize + 1];
        for term in &self.terms {
            remainder[term.exponent as usize] = term.coefficient.clone();
        }

        let mut quotient_terms = vec![];
        for exponent in (divisor_exponent..=dividend_exponent).rev() {
            let coefficient = remainder[exponent as usize]
                .checked_div(divisor_coefficient, precision)
                .ok_or(PolynomialError::DivisionByZeroPolynomial)?;
            if coefficient.is_zero() {
                continue;
            }

            let shift = exponent - divisor_exponent;
            for term in &divisor.terms {
                let index = (term.exponent + shift) as usize;
                remainder[index] = &remainder[index] - &(&coefficient * &term.coefficient);
            }

            trace!("quotient term {coefficient}·x^{shift}");
            quotient_terms.push(Term::new(coefficient, shift));
        }

        Ok(Self::canonicalize(quotient_terms))
    }

    /// The remainder of [polynomial long division](Self::div_rem).
    ///
    /// # Errors
    ///
    /// [`PolynomialError::DivisionByZeroPolynomial`] if `divisor` is zero.
    pub fn checked_rem(&self, divisor: &Self) -> Result<Self, PolynomialError> {
        let (_, remainder) = self.div_rem(divisor)?;
        Ok(remainder)
    }
}

impl Zero for Polynomial {
    fn zero() -> Self {
        Self {
            terms: vec![Term::new(Decimal::zero(), 0)],
        }
    }

    fn is_zero(&self) -> bool {
        self.leading_coefficient().is_zero()
    }
}

impl One for Polynomial {
    fn one() -> Self {
        Self::from_constant(Decimal::one())
    }

    fn is_one(&self) -> bool {
        self.leading_exponent() == 0 && self.leading_coefficient().is_one()
    }
}

impl Default for Polynomial {
    fn default() -> Self {
        Self::zero()
    }
}

impl Debug for Polynomial {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Polynomial")
            .field("terms", &self.terms)
            .finish()
    }
}

impl Display for Polynomial {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        for (i, term) in self.terms.iter().enumerate() {
            match (i, term.coefficient.is_negative()) {
                (0, false) => (),
                (0, true) => write!(f, "- ")?,
                (_, false) => write!(f, " + ")?,
                (_, true) => write!(f, " - ")?,
            }
            term.fmt_unsigned(f)?;
        }

        Ok(())
    }
}

impl From<Decimal> for Polynomial {
    fn from(constant: Decimal) -> Self {
        Self::from_constant(constant)
    }
}

impl From<Term> for Polynomial {
    fn from(term: Term) -> Self {
        Self::canonicalize([term])
    }
}

impl TryFrom<Source> for Polynomial {
    type Error = PolynomialError;

    fn try_from(source: Source) -> Result<Self, Self::Error> {
        Self::try_new(source)
    }
}

impl Neg for Polynomial {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        self.negate()
    }
}

impl Add for Polynomial {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Polynomial::add(&self, &other)
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, other: Self) -> Polynomial {
        Polynomial::add(self, other)
    }
}

impl AddAssign for Polynomial {
    fn add_assign(&mut self, rhs: Self) {
        *self = Polynomial::add(self, &rhs);
    }
}

impl Sub for Polynomial {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.subtract(&other)
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;

    fn sub(self, other: Self) -> Polynomial {
        self.subtract(other)
    }
}

impl SubAssign for Polynomial {
    fn sub_assign(&mut self, rhs: Self) {
        *self = self.subtract(&rhs);
    }
}

/// # Panics
///
/// Panics if the product has a term of degree beyond [`u32::MAX`]. See
/// [`Polynomial::checked_mul`] for the fallible version.
impl Mul for Polynomial {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        self.multiply(&other)
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, other: Self) -> Polynomial {
        self.multiply(other)
    }
}

impl Mul<Decimal> for Polynomial {
    type Output = Self;

    fn mul(self, scalar: Decimal) -> Self {
        self.scalar_mul(&scalar)
    }
}

impl MulAssign for Polynomial {
    fn mul_assign(&mut self, rhs: Self) {
        *self = self.multiply(&rhs);
    }
}

/// # Panics
///
/// Panics if the divisor is zero. See [`Polynomial::checked_div`] for the
/// fallible version.
impl Div for Polynomial {
    type Output = Self;

    fn div(self, other: Self) -> Self {
        &self / &other
    }
}

impl Div for &Polynomial {
    type Output = Polynomial;

    fn div(self, other: Self) -> Polynomial {
        self.checked_div(other).expect("divisor should be non-zero")
    }
}

/// # Panics
///
/// Panics if the divisor is zero. See [`Polynomial::checked_rem`] for the
/// fallible version.
impl Rem for Polynomial {
    type Output = Self;

    fn rem(self, other: Self) -> Self {
        &self % &other
    }
}

impl Rem for &Polynomial {
    type Output = Polynomial;

    fn rem(self, other: Self) -> Polynomial {
        self.checked_rem(other).expect("divisor should be non-zero")
    }
}

impl Sum for Polynomial {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, p| acc + p)
    }
}

impl Product for Polynomial {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::one(), |acc, p| acc * p)
    }
}

impl Polynomial {
    /// Bounds for randomly generated polynomials. The exponent bound keeps the
    /// dense buffer of long division small.
    const ARBITRARY_MAX_NUM_TERMS: usize = 8;
    const ARBITRARY_MAX_EXPONENT: u32 = 16;
}

impl<'a> Arbitrary<'a> for Polynomial {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let num_terms = u.int_in_range(0..=Self::ARBITRARY_MAX_NUM_TERMS)?;
        let mut terms = Vec::with_capacity(num_terms);
        for _ in 0..num_terms {
            let coefficient = u.arbitrary()?;
            let exponent = u.int_in_range(0..=Self::ARBITRARY_MAX_EXPONENT)?;
            terms.push(Term::new(coefficient, exponent));
        }

        Ok(Self::canonicalize(terms))
    }
}

impl Serialize for Polynomial {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Polynomial {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = String::deserialize(deserializer)?;
        repr.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use proptest::prelude::*;
    use proptest_arbitrary_interop::arb;
    use test_strategy::proptest;

    use super::*;

    impl proptest::arbitrary::Arbitrary for Polynomial {
        type Parameters = ();

        fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
            arb().boxed()
        }

        type Strategy = BoxedStrategy<Self>;
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn poly(s: &str) -> Polynomial {
        s.parse().unwrap()
    }

    fn is_canonical(p: &Polynomial) -> bool {
        if p.is_zero() {
            return p.terms() == [Term::new(Decimal::zero(), 0)];
        }
        let strictly_descending = p
            .terms()
            .iter()
            .tuple_windows()
            .all(|(l, r)| l.exponent > r.exponent);
        let all_non_zero = p.terms().iter().all(|t| !t.is_zero());
        strictly_descending && all_non_zero
    }

    #[test]
    fn polynomial_can_be_debug_printed() {
        let polynomial = poly("x^2 + 1");
        println!("{polynomial:?}");
    }

    #[test]
    fn default_polynomial_is_zero_and_displays_as_zero() {
        let zero = Polynomial::default();
        assert!(zero.is_zero());
        assert_eq!("0", zero.to_string());
        assert_eq!(1, zero.len());
        assert_eq!(0, zero.leading_exponent());
        assert_eq!(None, zero.degree());
    }

    #[test]
    fn polynomial_display_test() {
        let from_terms = |terms: &[(&str, u32)]| {
            Polynomial::canonicalize(terms.iter().map(|&(c, e)| Term::new(dec(c), e)))
        };

        assert_eq!("0", from_terms(&[]).to_string());
        assert_eq!("0", from_terms(&[("0", 5), ("0.0", 0)]).to_string());
        assert_eq!("1", from_terms(&[("1", 0)]).to_string());
        assert_eq!("- 1", from_terms(&[("-1", 0)]).to_string());
        assert_eq!("x", from_terms(&[("1", 1)]).to_string());
        assert_eq!("- x", from_terms(&[("-1", 1)]).to_string());
        assert_eq!("2x + 1", from_terms(&[("1", 0), ("2.0", 1)]).to_string());
        assert_eq!("x^3 - x", from_terms(&[("-1", 1), ("1", 3)]).to_string());
        assert_eq!("- 3.2x^7 + 0.5", from_terms(&[("-3.20", 7), ("0.5", 0)]).to_string());
        assert_eq!("x^2 - 1.5", from_terms(&[("1", 2), ("-1.5", 0)]).to_string());
    }

    #[test]
    fn canonicalization_merges_prunes_and_sorts() {
        let p = Polynomial::from_terms([(1, 2), (-3, 2), (1, 3), (1, 0)]).unwrap();
        let expected = [
            Term::new(1.into(), 3),
            Term::new((-2).into(), 2),
            Term::new(1.into(), 0),
        ];
        assert_eq!(expected, p.terms());

        let cancelling = Polynomial::from_terms([(2, 4), (-2, 4), (0, 9)]).unwrap();
        assert_eq!(Polynomial::zero(), cancelling);
        assert_eq!([Term::new(Decimal::zero(), 0)], cancelling.terms());
    }

    #[test]
    fn construction_from_invalid_raw_terms_fails() {
        let negative_exponent = Polynomial::from_terms([(1, 2), (1, -1)]).unwrap_err();
        assert!(matches!(negative_exponent, PolynomialError::InvalidTerm { .. }));

        let fractional_exponent = Polynomial::from_terms([(1.0, 1.5)]).unwrap_err();
        assert!(matches!(fractional_exponent, PolynomialError::InvalidTerm { .. }));
    }

    #[test]
    fn construction_from_scalar() {
        assert_eq!(poly("7"), Polynomial::from_scalar(7).unwrap());
        assert_eq!(poly("1.2"), Polynomial::from_scalar(1.2).unwrap());
        assert_eq!(Polynomial::zero(), Polynomial::from_scalar(0).unwrap());

        let err = Polynomial::from_scalar(f64::NAN).unwrap_err();
        assert!(matches!(err, PolynomialError::InvalidArgument(_)));
    }

    #[test]
    fn construction_from_source_wraps_failures_as_invalid_argument() {
        let scalar = Source::Scalar(Scalar::from(3));
        assert_eq!(poly("3"), Polynomial::try_new(scalar).unwrap());

        let terms = Source::RawTerms(vec![(2, 2).into(), (1.2, 0).into()]);
        assert_eq!(poly("2x^2 + 1.2"), Polynomial::try_from(terms).unwrap());

        let text = Source::Text("x - 1".to_string());
        assert_eq!(poly("x - 1"), Polynomial::try_new(text).unwrap());

        let bad_sources = [
            Source::Scalar(Scalar::from(f64::INFINITY)),
            Source::RawTerms(vec![(1, -3).into()]),
            Source::Text("x + y".to_string()),
        ];
        for source in bad_sources {
            let description = source.to_string();
            let Err(PolynomialError::InvalidArgument(message)) = Polynomial::try_new(source) else {
                panic!("expected invalid argument");
            };
            assert!(message.contains(&description));
        }
    }

    #[test]
    fn queries_on_hardcoded_polynomial() {
        let p = poly("x^3 - 2x^2 + 1");
        assert_eq!(3, p.leading_exponent());
        assert_eq!(Some(3), p.degree());
        assert_eq!(Decimal::one(), *p.leading_coefficient());
        assert_eq!(Decimal::one(), p.coefficient(3));
        assert_eq!(Decimal::from(-2), p.coefficient(2));
        assert_eq!(Decimal::zero(), p.coefficient(1));
        assert_eq!(Decimal::zero(), p.coefficient(100));
        assert_eq!(Ok(Decimal::from(-2)), p.coefficient_at(2.0));
        assert_eq!(Decimal::zero(), p.evaluate(1).unwrap());
        assert_eq!(Decimal::from(10), p.evaluate(3).unwrap());
    }

    #[test]
    fn coefficient_lookup_with_invalid_exponent_fails() {
        let p = poly("x^3 - 2x^2 + 1");
        for exponent in [Scalar::from(-1), Scalar::from(1.5), Scalar::from(f64::NAN)] {
            let err = p.coefficient_at(exponent).unwrap_err();
            assert!(matches!(err, PolynomialError::InvalidArgument(_)));
        }
    }

    #[test]
    fn coefficient_lookup_beyond_largest_exponent_is_zero() {
        let p = poly("x + 1");
        assert_eq!(Ok(Decimal::zero()), p.coefficient_at(1u64 << 40));
        assert_eq!(Ok(Decimal::zero()), p.coefficient_at(u128::MAX));
        assert_eq!(Ok(Decimal::one()), p.coefficient_at(1u64));
    }

    #[test]
    fn arithmetic_on_hardcoded_polynomials() {
        let b = poly("x^3 - 2x^2 + 1");
        let c = Polynomial::from_terms([RawTerm::from((2, 2)), RawTerm::from((1.2, 0))]).unwrap();

        assert_eq!("x^3 + 2.2", (&b + &c).to_string());
        assert_eq!("x^3 - 4x^2 - 0.2", (&b - &c).to_string());
        assert_eq!("- x^3 + 2x^2 - 1", (-&b).to_string());
        assert_eq!("2x^5 - 4x^4 + 1.2x^3 - 0.4x^2 + 1.2", (&b * &c).to_string());
    }

    #[test]
    fn division_on_hardcoded_polynomials() {
        let b = poly("x^3 - 2x^2 + 1");
        let c = poly("2x^2 + 1.2");

        assert_eq!(b, &(&b * &c) / &c);
        assert_eq!(Polynomial::zero(), &(&b * &c) % &c);
        assert_eq!("0.5x - 1", (&b / &c).to_string());
        assert_eq!("- 0.6x + 2.2", (&b % &c).to_string());
    }

    #[test]
    fn dividing_by_polynomial_of_higher_degree_gives_zero_quotient() {
        let small = poly("3x + 1");
        let large = poly("x^4 - x");
        let (quotient, remainder) = small.div_rem(&large).unwrap();
        assert_eq!(Polynomial::zero(), quotient);
        assert_eq!(small, remainder);
    }

    #[test]
    fn dividing_by_divisor_without_constant_term() {
        // the divisor's leading exponent, not its position in the term list, drives indexing
        let dividend = poly("x^5 + 3x^3 - x^2 + 4");
        let divisor = poly("x^3 - 2x");
        let (quotient, remainder) = dividend.div_rem(&divisor).unwrap();
        assert_eq!("x^2 + 5", quotient.to_string());
        assert_eq!("- x^2 + 10x + 4", remainder.to_string());
    }

    #[test]
    fn division_by_zero_polynomial_fails() {
        let p = poly("x + 1");
        let zero = Polynomial::zero();
        assert_eq!(Err(PolynomialError::DivisionByZeroPolynomial), p.checked_div(&zero));
        assert_eq!(Err(PolynomialError::DivisionByZeroPolynomial), p.checked_rem(&zero));
        assert!(p.div_rem(&zero).is_err());
    }

    #[test]
    #[should_panic(expected = "divisor should be non-zero")]
    fn division_operator_panics_on_zero_divisor() {
        let _ = poly("x") / Polynomial::zero();
    }

    #[test]
    fn non_terminating_quotient_still_satisfies_division_law() {
        let p = poly("x^2 + 1");
        let q = poly("3x + 1");
        let (quotient, remainder) = p.div_rem(&q).unwrap();
        assert_eq!(dec("0.3333333333333333333333333333"), quotient.coefficient(1));
        assert_eq!(p, quotient * q + remainder);
    }

    #[test]
    fn division_with_explicit_precision() {
        let p = poly("x^2 + 1");
        let q = poly("3x + 1");

        let (quotient, remainder) = p.div_rem_with_precision(&q, 5).unwrap();
        assert_eq!(dec("0.33333"), quotient.coefficient(1));
        assert_eq!(p, quotient * q.clone() + remainder);

        let coarsest = p.checked_div_with_precision(&q, 0).unwrap();
        assert_eq!(dec("0.3"), coarsest.coefficient(1));

        let exact = poly("2x^5 - 4x^4 + 1.2x^3 - 0.4x^2 + 1.2");
        let divisor = poly("2x^2 + 1.2");
        assert_eq!(poly("x^3 - 2x^2 + 1"), exact.checked_div_with_precision(&divisor, 3).unwrap());
    }

    #[test]
    fn product_with_exponent_beyond_u32_fails() {
        let p = Polynomial::from_terms([(1, 3_000_000_000u32)]).unwrap();
        let overflow = PolynomialError::ExponentOverflow {
            left: 3_000_000_000,
            right: 3_000_000_000,
        };
        assert_eq!(Err(overflow), p.checked_mul(&p));
        assert!(matches!(
            p.checked_pow(2),
            Err(PolynomialError::ExponentOverflow { .. })
        ));

        let fits = Polynomial::from_terms([(2, 1_000_000_000u32), (1, 0u32)]).unwrap();
        let square = fits.checked_mul(&fits).unwrap();
        assert_eq!("4x^2000000000 + 4x^1000000000 + 1", square.to_string());
        assert_eq!(Ok(Polynomial::zero()), Polynomial::zero().checked_mul(&p));
    }

    #[test]
    #[should_panic(expected = "product exponents should fit in u32")]
    fn multiplication_operator_panics_on_exponent_overflow() {
        let p = Polynomial::from(Term::new(Decimal::one(), u32::MAX));
        let _ = &p * &poly("x");
    }

    #[test]
    fn power_and_derivative_on_hardcoded_polynomial() {
        let p = poly("x + 1");
        assert_eq!(poly("x^3 + 3x^2 + 3x + 1"), p.pow(3));
        assert_eq!(Polynomial::one(), p.pow(0));
        assert_eq!(poly("3x^2 + 6x + 3"), p.pow(3).formal_derivative());
        assert_eq!(Polynomial::zero(), poly("5").formal_derivative());
    }

    #[test]
    fn scalar_multiplication() {
        let p = poly("x^2 - 0.5");
        assert_eq!(poly("3x^2 - 1.5"), p.clone() * Decimal::from(3));
        assert_eq!(Polynomial::zero(), p.scalar_mul(&Decimal::zero()));
    }

    #[test]
    fn sum_and_product_of_polynomials() {
        let ps = [poly("x"), poly("x - 1"), poly("2")];
        assert_eq!(poly("2x + 1"), ps.iter().cloned().sum::<Polynomial>());
        assert_eq!(poly("2x^2 - 2x"), ps.into_iter().product::<Polynomial>());
    }

    #[test]
    fn assigning_operators_agree_with_binary_operators() {
        let a = poly("x^2 + x");
        let b = poly("x - 3");

        let mut sum = a.clone();
        sum += b.clone();
        assert_eq!(&a + &b, sum);

        let mut difference = a.clone();
        difference -= b.clone();
        assert_eq!(&a - &b, difference);

        let mut product = a.clone();
        product *= b.clone();
        assert_eq!(&a * &b, product);
    }

    #[test]
    fn serialization_uses_textual_form() {
        let p = poly("x^3 - 2x^2 + 1");
        assert_eq!(r#""x^3 - 2x^2 + 1""#, serde_json::to_string(&p).unwrap());
        assert!(serde_json::from_str::<Polynomial>(r#""x + y""#).is_err());
    }

    #[proptest]
    fn arbitrary_polynomials_are_canonical(p: Polynomial) {
        prop_assert!(is_canonical(&p));
    }

    #[proptest]
    fn results_of_arithmetic_are_canonical(a: Polynomial, b: Polynomial) {
        prop_assert!(is_canonical(&(&a + &b)));
        prop_assert!(is_canonical(&(&a - &b)));
        prop_assert!(is_canonical(&(&a * &b)));
        prop_assert!(is_canonical(&-&a));
    }

    #[proptest]
    fn display_then_parse_is_identity(p: Polynomial) {
        prop_assert_eq!(p.clone(), p.to_string().parse::<Polynomial>()?);
    }

    #[proptest]
    fn serialization_and_deserialization_to_and_from_json_is_identity(p: Polynomial) {
        let serialized = serde_json::to_string(&p).unwrap();
        let deserialized: Polynomial = serde_json::from_str(&serialized).unwrap();
        prop_assert_eq!(p, deserialized);
    }

    #[proptest]
    fn polynomial_zero_is_neutral_element_for_addition(a: Polynomial) {
        prop_assert_eq!(a.clone() + Polynomial::zero(), a.clone());
        prop_assert_eq!(Polynomial::zero() + a.clone(), a);
    }

    #[proptest]
    fn polynomial_one_is_neutral_element_for_multiplication(a: Polynomial) {
        prop_assert_eq!(a.clone() * Polynomial::one(), a.clone());
        prop_assert_eq!(Polynomial::one() * a.clone(), a);
    }

    #[proptest]
    fn multiplication_by_zero_is_zero(a: Polynomial) {
        prop_assert_eq!(Polynomial::zero(), a.clone() * Polynomial::zero());
        prop_assert_eq!(Polynomial::zero(), Polynomial::zero() * a);
    }

    #[proptest]
    fn adding_the_negation_gives_zero(a: Polynomial) {
        prop_assert_eq!(Polynomial::zero(), &a + &a.negate());
        prop_assert_eq!(Polynomial::zero(), &a - &a);
    }

    #[proptest]
    fn polynomial_addition_is_commutative(a: Polynomial, b: Polynomial) {
        prop_assert_eq!(&a + &b, &b + &a);
    }

    #[proptest]
    fn polynomial_multiplication_is_commutative(a: Polynomial, b: Polynomial) {
        prop_assert_eq!(&a * &b, &b * &a);
    }

    #[proptest]
    fn polynomial_multiplication_is_distributive(a: Polynomial, b: Polynomial, c: Polynomial) {
        prop_assert_eq!(&(&a + &b) * &c, &(&a * &c) + &(&b * &c));
    }

    #[proptest]
    fn quotient_times_divisor_plus_remainder_is_dividend(
        a: Polynomial,
        #[filter(!#b.is_zero())] b: Polynomial,
    ) {
        let (quotient, remainder) = a.div_rem(&b)?;
        prop_assert_eq!(a, &(&quotient * &b) + &remainder);
    }

    #[proptest]
    fn polynomial_division_removes_common_factors(
        a: Polynomial,
        #[filter(!#b.is_zero())] b: Polynomial,
    ) {
        prop_assert_eq!(a.clone(), &(&a * &b) / &b);
        prop_assert_eq!(Polynomial::zero(), &(&a * &b) % &b);
    }

    #[proptest]
    fn evaluation_is_a_ring_homomorphism(a: Polynomial, b: Polynomial, x: Decimal) {
        let a_x = a.evaluate(&x)?;
        let b_x = b.evaluate(&x)?;
        prop_assert_eq!(&a_x + &b_x, (&a + &b).evaluate(&x)?);
        prop_assert_eq!(&a_x * &b_x, (&a * &b).evaluate(&x)?);
    }

    #[proptest]
    fn leading_exponent_of_product_is_sum_of_leading_exponents(
        #[filter(!#a.is_zero())] a: Polynomial,
        #[filter(!#b.is_zero())] b: Polynomial,
    ) {
        let product = &a * &b;
        prop_assert_eq!(
            a.leading_exponent() + b.leading_exponent(),
            product.leading_exponent()
        );
    }

    #[proptest]
    fn derivative_of_product_follows_product_rule(a: Polynomial, b: Polynomial) {
        let lhs = (&a * &b).formal_derivative();
        let rhs = &(&a.formal_derivative() * &b) + &(&a * &b.formal_derivative());
        prop_assert_eq!(lhs, rhs);
    }
}
