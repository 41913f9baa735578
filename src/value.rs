// ABOUTME: Runtime Value types produced by the evaluator

use crate::ast::{BlockStatement, Identifier};
use crate::env::Environment;
use std::fmt;
use std::rc::Rc;

/// Runtime value produced by evaluating an AST node.
///
/// `ReturnValue` is an internal control-effect wrapper: it is produced only
/// by evaluating a `return` statement and is unwrapped at exactly two
/// boundaries (program top level, function-call application). It should
/// never be visible to anything outside `eval`.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Null,
    ReturnValue(Box<Value>),
    Error(String),
    Function {
        params: Vec<Identifier>,
        body: BlockStatement,
        env: Rc<Environment>,
    },
}

impl Value {
    /// The uppercase type tag used in error messages (`type mismatch: ...`)
    /// and elsewhere a type needs naming.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::Null => "NULL",
            Value::ReturnValue(_) => "RETURN_VALUE",
            Value::Error(_) => "ERROR",
            Value::Function { .. } => "FUNCTION",
        }
    }

    /// `null` and `false` are falsy; everything else (including integer `0`)
    /// is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
            Value::ReturnValue(inner) => write!(f, "{}", inner),
            Value::Error(msg) => write!(f, "ERROR: {}", msg),
            Value::Function { params, body, .. } => {
                let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
                write!(f, "fn({}) {}", params.join(", "), body)
            }
        }
    }
}

pub const TRUE: Value = Value::Boolean(true);
pub const FALSE: Value = Value::Boolean(false);
pub const NULL: Value = Value::Null;

/// Maps a native bool to the shared `TRUE`/`FALSE` singletons, so booleans
/// compare the same regardless of where they were produced.
pub fn native_bool_to_value(b: bool) -> Value {
    if b {
        TRUE
    } else {
        FALSE
    }
}
