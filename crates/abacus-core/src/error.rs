//! Error taxonomy shared by the engines and the calculator state machine

use thiserror::Error;

/// Failures raised by the arithmetic and conversion engines.
///
/// All of these are local and recoverable. The calculator state machine turns
/// them into the `"Error"` display instead of propagating them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Cannot calculate square root of negative number")]
    NegativeRadicand,

    #[error("Cannot calculate logarithm of non-positive number")]
    NonPositiveLogarithand,

    #[error("Cannot calculate factorial of negative number")]
    NegativeFactorial,

    #[error("Cannot calculate factorial of non-integer")]
    NonIntegerFactorial,

    /// Inverse trig input outside `[-1, 1]`
    #[error("{function} is only defined on [-1, 1]")]
    DomainError { function: &'static str },

    /// The text could not be parsed or did not produce a finite number.
    /// Carries the underlying cause.
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    #[error("Invalid category: {0}")]
    UnknownCategory(String),

    #[error("Invalid unit: {0}")]
    UnknownUnit(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("No history entry at index {0}")]
    UnknownHistoryEntry(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_display_text() {
        assert_eq!(Error::DivisionByZero.to_string(), "Division by zero");
        assert_eq!(
            Error::InvalidExpression("Invalid result".to_string()).to_string(),
            "Invalid expression: Invalid result"
        );
        assert_eq!(
            Error::DomainError { function: "asin" }.to_string(),
            "asin is only defined on [-1, 1]"
        );
        assert_eq!(
            Error::UnknownHistoryEntry(3).to_string(),
            "No history entry at index 3"
        );
    }
}
