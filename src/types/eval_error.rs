use thiserror::Error;

use super::Value;

/// Every way an evaluation can fail. None of these are fatal; the boundary
/// collapses all of them into "no result".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("property {0} not found")]
    PropertyNotFound(String),

    #[error("invalid op '{op}' on {operands}")]
    TypeMismatch { op: String, operands: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid call: {0}")]
    InvalidCall(String),

    #[error("{0} value cannot be converted to text")]
    NotCoercible(&'static str),

    #[error("malformed event: {0}")]
    MalformedEventJSON(String),

    #[error("numeric result out of range")]
    NumericOverflow,
}

pub type EvalResult<T> = Result<T, EvalError>;

impl EvalError {
    pub fn binary_mismatch(op: impl ToString, lhs: &Value, rhs: &Value) -> EvalError {
        EvalError::TypeMismatch {
            op: op.to_string(),
            operands: format!("{} and {}", lhs.as_type(), rhs.as_type()),
        }
    }

    pub fn unary_mismatch(op: impl ToString, operand: &Value) -> EvalError {
        EvalError::TypeMismatch {
            op: op.to_string(),
            operands: operand.as_type().to_owned(),
        }
    }

    pub fn invalid_call(msg: &str) -> EvalError {
        EvalError::InvalidCall(msg.to_owned())
    }

    pub fn type_string(&self) -> &'static str {
        use EvalError::*;

        match self {
            PropertyNotFound(_) => "PROPERTY_NOT_FOUND",
            TypeMismatch { .. } => "TYPE_MISMATCH",
            DivisionByZero => "DIVISION_BY_ZERO",
            InvalidCall(_) => "INVALID_CALL",
            NotCoercible(_) => "NOT_COERCIBLE",
            MalformedEventJSON(_) => "MALFORMED_EVENT_JSON",
            NumericOverflow => "NUMERIC_OVERFLOW",
        }
    }
}

impl From<serde_json::Error> for EvalError {
    fn from(err: serde_json::Error) -> Self {
        EvalError::MalformedEventJSON(err.to_string())
    }
}
