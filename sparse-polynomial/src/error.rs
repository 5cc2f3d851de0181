use thiserror::Error;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum PolynomialError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid term ({coefficient}, {exponent}): exponent must be a non-negative integer")]
    InvalidTerm {
        coefficient: String,
        exponent: String,
    },

    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("product of x^{left} and x^{right} has an exponent beyond u32::MAX")]
    ExponentOverflow { left: u32, right: u32 },

    #[error("division by the zero polynomial")]
    DivisionByZeroPolynomial,
}
