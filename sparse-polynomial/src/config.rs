//! This module contains various configuration options. In general, the
//! configuration options impact the results of inexact operations only. The
//! default configuration is sane and should be what most users want.
//!
//! Most configuration options can also be set via environment variables.
//! Generally, the environment variables take precedence over the options set
//! in this module.

use std::cell::RefCell;

use arbitrary::Arbitrary;

thread_local! {
    static CONFIG: RefCell<Config> = RefCell::new(Config::new());
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Arbitrary)]
struct Config {
    pub division_precision: DivisionPrecision,
}

impl Config {
    fn new() -> Self {
        let division_precision = DivisionPrecision::new(None);

        Self { division_precision }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Arbitrary)]
struct DivisionPrecision(usize);

impl DivisionPrecision {
    const ENV_VAR: &'static str = "SPARSE_POLYNOMIAL_DIVISION_PRECISION";
    const DEFAULT: usize = 28;
    const MINIMUM: usize = 1;

    /// Creates a new `DivisionPrecision` with the given value.
    /// Respects the precedence of the environment variable if set. Uses the
    /// default if no value is provided.
    fn new(config_value: Option<usize>) -> Self {
        let precision = std::env::var(Self::ENV_VAR)
            .ok()
            .and_then(|s| s.parse().ok())
            .or(config_value)
            .unwrap_or(Self::DEFAULT)
            .max(Self::MINIMUM);

        Self(precision)
    }
}

/// Sets the number of significant decimal digits kept when dividing two
/// coefficients whose quotient does not terminate, for example `1 / 3`.
/// Quotients that terminate within this many digits are always exact.
///
/// Can also be set via the environment variable
/// `SPARSE_POLYNOMIAL_DIVISION_PRECISION`. The environment variable has higher
/// precedence than this function.
///
/// The default is 28. The minimum is always 1.
pub fn set_division_precision(precision: usize) {
    let precision = DivisionPrecision::new(Some(precision));
    CONFIG.with(|c| c.borrow_mut().division_precision = precision);
}

pub(crate) fn division_precision() -> usize {
    CONFIG.with(|c| c.borrow().division_precision).0
}
