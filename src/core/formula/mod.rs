pub mod errors;
pub mod parser;
pub mod polynomial;

pub use errors::FormulaError;
pub use parser::parse_polynomial;
pub use polynomial::Polynomial;
