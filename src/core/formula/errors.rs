use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    #[error("formula is empty")]
    Empty,
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },
    #[error("unknown identifier '{name}' at position {position} (only 'z' and 'i' are allowed)")]
    UnknownIdentifier { name: String, position: usize },
    #[error("invalid number '{literal}' at position {position}")]
    InvalidNumber { literal: String, position: usize },
    #[error("unexpected '{found}' at position {position}")]
    UnexpectedToken { found: String, position: usize },
    #[error("unexpected end of formula")]
    UnexpectedEnd,
    #[error("exponent '{literal}' at position {position} must be a non-negative integer no larger than {max}")]
    InvalidExponent {
        literal: String,
        position: usize,
        max: u32,
    },
    #[error("divisor at position {position} must be a constant")]
    NonConstantDivisor { position: usize },
    #[error("division by zero at position {position}")]
    DivisionByZero { position: usize },
    #[error("polynomial degree {degree} exceeds the maximum of {max}")]
    DegreeTooHigh { degree: usize, max: usize },
    #[error("nesting deeper than {max} levels at position {position}")]
    NestingTooDeep { position: usize, max: usize },
    #[error("formula must depend on z")]
    Constant,
}
