use std::cmp::Ordering;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::iter::Product;
use std::iter::Sum;
use std::ops::Add;
use std::ops::Mul;
use std::ops::Neg;
use std::ops::Sub;
use std::str::FromStr;

use arbitrary::Arbitrary;
use arbitrary::Unstructured;
use num_bigint::BigInt;
use num_bigint::BigUint;
use num_bigint::Sign;
use num_traits::One;
use num_traits::Signed;
use num_traits::ToPrimitive;
use num_traits::Zero;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::Error as _;

use crate::error::PolynomialError;

/// An exact decimal number `mantissa · 10^(-scale)` of arbitrary precision.
///
/// Addition, subtraction and multiplication are exact. Division is exact
/// whenever the quotient terminates within the requested number of
/// significant digits, see [`Decimal::checked_div`].
///
/// The representation is kept canonical: the mantissa carries no trailing zero
/// digits unless the scale is zero. Two `Decimal`s are therefore equal if and
/// only if their fields are equal.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: BigInt,
    scale: u32,
}

fn ten_to_the(power: u32) -> BigUint {
    BigUint::from(10u32).pow(power)
}

fn num_digits(value: &BigUint) -> i64 {
    value.to_str_radix(10).len() as i64
}

/// Drop the lowest `dropped_digits` decimal digits of `value`, rounding half to
/// even. `sticky` signals that `value` was already truncated and the true value
/// lies strictly above it.
fn round_half_even(value: BigUint, dropped_digits: u32, sticky: bool) -> BigUint {
    let divisor = ten_to_the(dropped_digits);
    let kept = &value / &divisor;
    let twice_dropped = (&value % &divisor) * 2u32;

    let round_up = match twice_dropped.cmp(&divisor) {
        Ordering::Less => false,
        Ordering::Greater => true,
        Ordering::Equal => sticky || (&kept % 2u32).is_one(),
    };

    if round_up { kept + 1u32 } else { kept }
}

impl Decimal {
    pub fn new(mantissa: BigInt, scale: u32) -> Self {
        Self { mantissa, scale }.normalized()
    }

    /// Like [`new`](Self::new), but a negative scale multiplies the mantissa by
    /// the corresponding power of ten.
    fn from_signed_scale(mantissa: BigInt, scale: i64) -> Self {
        match u32::try_from(scale) {
            Ok(scale) => Self::new(mantissa, scale),
            Err(_) => {
                let shift = u32::try_from(scale.unsigned_abs()).unwrap_or(u32::MAX);
                Self::new(mantissa * BigInt::from(ten_to_the(shift)), 0)
            }
        }
    }

    fn normalized(mut self) -> Self {
        if self.mantissa.is_zero() {
            self.scale = 0;
            return self;
        }

        let ten = BigInt::from(10);
        while self.scale > 0 && (&self.mantissa % &ten).is_zero() {
            self.mantissa = &self.mantissa / &ten;
            self.scale -= 1;
        }
        self
    }

    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    /// The number of digits after the decimal point.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    pub fn is_integer(&self) -> bool {
        self.scale == 0
    }

    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            mantissa: self.mantissa.abs(),
            scale: self.scale,
        }
    }

    #[must_use]
    pub fn pow(&self, exponent: u32) -> Self {
        Self::new(self.mantissa.pow(exponent), self.scale * exponent)
    }

    /// Both mantissas, brought to the common scale, which is also returned.
    fn aligned(&self, other: &Self) -> (BigInt, BigInt, u32) {
        let scale = self.scale.max(other.scale);
        let lift = |d: &Self| &d.mantissa * BigInt::from(ten_to_the(scale - d.scale));
        (lift(self), lift(other), scale)
    }

    /// Divide `self` by `rhs`, keeping at most `precision` significant digits.
    /// Quotients that terminate within that many digits are exact; all others
    /// are rounded half to even. `None` if `rhs` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sparse_polynomial::prelude::*;
    /// let one: Decimal = 1.into();
    /// let three: Decimal = 3.into();
    /// let two: Decimal = 2.into();
    /// assert_eq!("0.5", one.checked_div(&two, 28).unwrap().to_string());
    /// assert_eq!("0.3333", one.checked_div(&three, 4).unwrap().to_string());
    /// assert_eq!(None, one.checked_div(&Decimal::from(0), 28));
    /// ```
    pub fn checked_div(&self, rhs: &Self, precision: usize) -> Option<Self> {
        if rhs.is_zero() {
            return None;
        }
        if self.is_zero() {
            return Some(Self::zero());
        }

        let precision = i64::try_from(precision.max(1)).unwrap_or(i64::MAX);
        let numerator = self.mantissa.magnitude();
        let denominator = rhs.mantissa.magnitude();

        // one digit more than needed, so that rounding always has something to work on
        let shift = precision + 1 - (num_digits(numerator) - num_digits(denominator));
        let shift_power = ten_to_the(u32::try_from(shift.unsigned_abs()).unwrap_or(u32::MAX));
        let (numerator, denominator) = if shift >= 0 {
            (numerator * shift_power, denominator.clone())
        } else {
            (numerator.clone(), denominator * shift_power)
        };

        let mut quotient = &numerator / &denominator;
        let is_truncated = !(&numerator % &denominator).is_zero();
        let mut scale = shift + i64::from(self.scale) - i64::from(rhs.scale);

        let excess_digits = num_digits(&quotient) - precision;
        if excess_digits > 0 {
            let excess_digits = u32::try_from(excess_digits).unwrap_or(u32::MAX);
            quotient = round_half_even(quotient, excess_digits, is_truncated);
            scale -= i64::from(excess_digits);
        }

        let sign = if self.is_negative() == rhs.is_negative() {
            Sign::Plus
        } else {
            Sign::Minus
        };
        Some(Self::from_signed_scale(
            BigInt::from_biguint(sign, quotient),
            scale,
        ))
    }
}

impl Zero for Decimal {
    fn zero() -> Self {
        Self {
            mantissa: BigInt::zero(),
            scale: 0,
        }
    }

    fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }
}

impl One for Decimal {
    fn one() -> Self {
        Self {
            mantissa: BigInt::one(),
            scale: 0,
        }
    }

    fn is_one(&self) -> bool {
        self.scale == 0 && self.mantissa.is_one()
    }
}

impl Default for Decimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (lhs, rhs, _) = self.aligned(other);
        lhs.cmp(&rhs)
    }
}

impl Add<&Decimal> for &Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Decimal {
        let (lhs, rhs, scale) = self.aligned(rhs);
        Decimal::new(lhs + rhs, scale)
    }
}

impl Add for Decimal {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        &self + &rhs
    }
}

impl Sub<&Decimal> for &Decimal {
    type Output = Decimal;

    fn sub(self, rhs: &Decimal) -> Decimal {
        let (lhs, rhs, scale) = self.aligned(rhs);
        Decimal::new(lhs - rhs, scale)
    }
}

impl Sub for Decimal {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        &self - &rhs
    }
}

impl Mul<&Decimal> for &Decimal {
    type Output = Decimal;

    fn mul(self, rhs: &Decimal) -> Decimal {
        Decimal::new(&self.mantissa * &rhs.mantissa, self.scale + rhs.scale)
    }
}

impl Mul for Decimal {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        &self * &rhs
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal {
            mantissa: -&self.mantissa,
            scale: self.scale,
        }
    }
}

impl Neg for Decimal {
    type Output = Self;

    fn neg(self) -> Self {
        -&self
    }
}

impl Sum for Decimal {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, d| acc + d)
    }
}

impl Product for Decimal {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::one(), |acc, d| acc * d)
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-")?;
        }

        let digits = self.mantissa.magnitude().to_str_radix(10);
        let scale = self.scale as usize;
        if scale == 0 {
            write!(f, "{digits}")
        } else if digits.len() > scale {
            let (integral, fractional) = digits.split_at(digits.len() - scale);
            write!(f, "{integral}.{fractional}")
        } else {
            let leading_zeros = "0".repeat(scale - digits.len());
            write!(f, "0.{leading_zeros}{digits}")
        }
    }
}

impl Debug for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({self})")
    }
}

impl FromStr for Decimal {
    type Err = PolynomialError;

    /// Parses plain positional notation: an optional sign, decimal digits, and
    /// at most one decimal point. Either side of the point may be empty, but
    /// not both.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PolynomialError::InvalidNumber(s.to_string());

        let (is_negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (integral, fractional) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if integral.is_empty() && fractional.is_empty() {
            return Err(invalid());
        }
        if !integral
            .chars()
            .chain(fractional.chars())
            .all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let digits = format!("{integral}{fractional}");
        let magnitude = BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
        let scale = u32::try_from(fractional.len()).map_err(|_| invalid())?;
        let sign = if is_negative { Sign::Minus } else { Sign::Plus };

        Ok(Self::new(BigInt::from_biguint(sign, magnitude), scale))
    }
}

impl TryFrom<f64> for Decimal {
    type Error = PolynomialError;

    /// Converts through the shortest decimal string that round-trips to `value`,
    /// so `0.1_f64` becomes exactly `0.1`.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(PolynomialError::InvalidArgument(format!(
                "{value} is not a finite number"
            )));
        }
        value.to_string().parse()
    }
}

impl TryFrom<&Decimal> for u32 {
    type Error = PolynomialError;

    fn try_from(value: &Decimal) -> Result<Self, Self::Error> {
        if !value.is_integer() {
            return Err(PolynomialError::InvalidArgument(format!(
                "{value} is not an integer"
            )));
        }
        value.mantissa.to_u32().ok_or_else(|| {
            PolynomialError::InvalidArgument(format!("{value} is out of range for u32"))
        })
    }
}

impl From<BigInt> for Decimal {
    fn from(value: BigInt) -> Self {
        Self {
            mantissa: value,
            scale: 0,
        }
    }
}

macro_rules! impl_from_primitive_integer {
    ($($t:ty),+ $(,)?) => {$(
        impl From<$t> for Decimal {
            fn from(value: $t) -> Self {
                BigInt::from(value).into()
            }
        }
    )+};
}

impl_from_primitive_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl<'a> Arbitrary<'a> for Decimal {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let mantissa: i32 = u.arbitrary()?;
        let scale = u.int_in_range(0..=4)?;
        Ok(Self::new(mantissa.into(), scale))
    }
}

impl Serialize for Decimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = String::deserialize(deserializer)?;
        repr.parse().map_err(D::Error::custom)
    }
}
