// ABOUTME: Error types for evaluation failures in the interpreter

use thiserror::Error;

/// Errors `eval` can return at the Rust level.
///
/// In ordinary operation the evaluator converts a fault into a
/// `Value::Error` and returns `Ok` with it, so a caller driving a REPL or
/// script never sees this type directly — it exists for internal call
/// boundaries and is surfaced to callers via `Value::Error`'s message,
/// which always matches one of the variants below.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),

    #[error("unknown operator: {operator}{right_type}")]
    UnknownPrefixOperator {
        operator: String,
        right_type: &'static str,
    },

    #[error("unknown operator: {left_type} {operator} {right_type}")]
    UnknownInfixOperator {
        left_type: &'static str,
        operator: String,
        right_type: &'static str,
    },

    #[error("type mismatch: {left_type} {operator} {right_type}")]
    TypeMismatch {
        left_type: &'static str,
        operator: String,
        right_type: &'static str,
    },

    #[error("not a function: {0}")]
    NotAFunction(&'static str),

    #[error("division by zero")]
    DivisionByZero,

    #[error("wrong number of arguments: want={want}, got={got}")]
    ArityMismatch { want: usize, got: usize },

    #[error("stack overflow")]
    StackOverflow,
}

impl EvalError {
    pub fn identifier_not_found(name: &str) -> Self {
        EvalError::IdentifierNotFound(name.to_string())
    }

    pub fn unknown_prefix_operator(operator: &str, right_type: &'static str) -> Self {
        EvalError::UnknownPrefixOperator {
            operator: operator.to_string(),
            right_type,
        }
    }

    pub fn unknown_infix_operator(
        left_type: &'static str,
        operator: &str,
        right_type: &'static str,
    ) -> Self {
        EvalError::UnknownInfixOperator {
            left_type,
            operator: operator.to_string(),
            right_type,
        }
    }

    pub fn type_mismatch(left_type: &'static str, operator: &str, right_type: &'static str) -> Self {
        EvalError::TypeMismatch {
            left_type,
            operator: operator.to_string(),
            right_type,
        }
    }

    pub fn not_a_function(type_name: &'static str) -> Self {
        EvalError::NotAFunction(type_name)
    }

    pub fn arity_mismatch(want: usize, got: usize) -> Self {
        EvalError::ArityMismatch { want, got }
    }
}
