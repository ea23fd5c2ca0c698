//! Const evaluation errors

use vl_span::FileSpan;
use thiserror::Error;

/// Errors that can occur during const evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstError {
    /// Expression is not a constant expression
    #[error("expression is not a constant expression")]
    NonConstant {
        /// Location of the non-constant sub-expression
        span: FileSpan,
    },

    /// `/` or `%` with a zero divisor
    #[error("division by zero")]
    DivisionByZero {
        /// The division expression
        span: FileSpan,
    },

    /// Integer arithmetic left the `i64` range
    #[error("integer overflow in constant expression")]
    Overflow {
        /// The overflowing expression
        span: FileSpan,
    },

    /// Operator applied to operands it is not defined for
    #[error("invalid operation: {operation}")]
    InvalidOperation {
        /// Operator and operand kinds, e.g. `"abc" + int`
        operation: String,
        /// The offending expression
        span: FileSpan,
    },
}

impl ConstError {
    /// Returns the span where the error occurred
    #[must_use]
    pub fn span(&self) -> FileSpan {
        match self {
            Self::NonConstant { span }
            | Self::DivisionByZero { span }
            | Self::Overflow { span }
            | Self::InvalidOperation { span, .. } => *span,
        }
    }
}
