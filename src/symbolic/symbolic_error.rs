//! Errors raised by the symbolic engine.
//!
//! Every fallible engine operation (parsing, integration, solving, numeric
//! evaluation) returns `Result<_, SymbolicError>`. The dispatcher treats any of
//! them as "this category did not match".

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SymbolicError {
    #[error("empty expression")]
    EmptyExpression,
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("unexpected token '{token}' at position {pos}")]
    UnexpectedToken { token: String, pos: usize },
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("expression nesting deeper than {0} levels")]
    TooDeep(usize),
    #[error("division by zero")]
    DivisionByZero,
    #[error("exponent out of range in {0}")]
    ExponentOverflow(String),
    #[error("expression has no finite value: {0}")]
    Undefined(String),
    #[error("cannot integrate {0}")]
    IntegrationNotSupported(String),
    #[error("cannot solve {0}")]
    EquationNotSupported(String),
}
