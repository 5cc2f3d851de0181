pub use num_traits::One;
pub use num_traits::Zero;

pub use crate::error::PolynomialError;
pub use crate::math::decimal::Decimal;
pub use crate::math::parser::parse_terms;
pub use crate::math::polynomial::Polynomial;
pub use crate::math::polynomial::Source;
pub use crate::math::scalar::Scalar;
pub use crate::math::term::RawTerm;
pub use crate::math::term::Term;
