use num_bigint::BigInt;
use rand::Rng;

use super::decimal::Decimal;
use super::polynomial::Polynomial;
use super::term::Term;

/// Generate a random polynomial from `num_terms` terms using [`rand::rng()`].
///
/// Coefficients have up to three decimal places. Terms whose exponents collide
/// are merged, so the result can have fewer than `num_terms` terms.
pub fn random_polynomial(num_terms: usize, max_exponent: u32) -> Polynomial {
    let mut rng = rand::rng();
    let terms = (0..num_terms)
        .map(|_| {
            let mantissa: i64 = rng.random_range(-1_000_000..=1_000_000);
            let scale = rng.random_range(0..=3);
            let exponent = rng.random_range(0..=max_exponent);
            Term::new(Decimal::new(BigInt::from(mantissa), scale), exponent)
        })
        .collect::<Vec<_>>();

    Polynomial::canonicalize(terms)
}
