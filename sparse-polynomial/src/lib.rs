#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![deny(clippy::shadow_unrelated)]
//! Sparse univariate polynomials with exact decimal coefficients.
//!
//! ```
//! # use sparse_polynomial::prelude::*;
//! let b = Polynomial::from_terms([(1, 2), (-3, 2), (1, 3), (1, 0)]).unwrap();
//! let c: Polynomial = "2x^2 + 1.2".parse().unwrap();
//!
//! assert_eq!("x^3 + 2.2", (&b + &c).to_string());
//! assert_eq!("2x^5 - 4x^4 + 1.2x^3 - 0.4x^2 + 1.2", (&b * &c).to_string());
//! assert_eq!(b, &(&b * &c) / &c);
//! ```

pub mod config;
pub mod error;
pub mod math;
pub mod prelude;
