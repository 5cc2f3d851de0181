use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use num_bigint::BigInt;

use super::decimal::Decimal;
use crate::error::PolynomialError;

/// A number as handed in by a caller, before it is brought into the exact
/// decimal domain of the polynomial's coefficients.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Integer(BigInt),
    Float(f64),
    Decimal(Decimal),
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Decimal(d) => write!(f, "{d}"),
        }
    }
}

impl TryFrom<Scalar> for Decimal {
    type Error = PolynomialError;

    fn try_from(scalar: Scalar) -> Result<Self, Self::Error> {
        match scalar {
            Scalar::Integer(i) => Ok(i.into()),
            Scalar::Float(x) => x.try_into(),
            Scalar::Decimal(d) => Ok(d),
        }
    }
}

impl From<Decimal> for Scalar {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<&Decimal> for Scalar {
    fn from(value: &Decimal) -> Self {
        Self::Decimal(value.clone())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<BigInt> for Scalar {
    fn from(value: BigInt) -> Self {
        Self::Integer(value)
    }
}

macro_rules! impl_from_primitive_integer {
    ($($t:ty),+ $(,)?) => {$(
        impl From<$t> for Scalar {
            fn from(value: $t) -> Self {
                Self::Integer(value.into())
            }
        }
    )+};
}

impl_from_primitive_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
