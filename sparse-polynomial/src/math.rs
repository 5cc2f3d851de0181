pub mod decimal;
pub mod other;
pub mod parser;
pub mod polynomial;
pub mod scalar;
pub mod term;
