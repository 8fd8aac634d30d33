//! An evaluator for small user-authored formulas over JSON events.
//!
//! Expressions combine arithmetic, comparisons, a handful of builtin
//! functions and property lookups rooted at `event`, for example
//! `concat(event.properties.a, 'test')` or `round(event.properties.amount * 1.2, 2)`.
//! Each evaluation is a pure function of the parsed expression and one event.
//!
//! The basic example of how to use:
//! ```
//! use event_expression::{evaluate, Program, Value};
//!
//! assert_eq!(evaluate("1 + 2", "{}"), Some("3".to_owned()));
//!
//! // parse once, run against many events
//! let prog = Program::from_source("concat(event.properties.a, 'test')").unwrap();
//! let res = prog.eval_json(r#"{"properties": {"a": 123.12}}"#).unwrap();
//! assert_eq!(res, Value::from("123.12test"));
//!
//! // every failure collapses to None at this level
//! assert_eq!(evaluate("1 / 0", "{}"), None);
//! ```
//!
//! With the default `c_api` feature the same operations are exported over the
//! C ABI as `evaluate`, `free_evaluate`, `parse`, `evaluate_parsed` and
//! `free_parsed`.
mod bindings;
mod compiler;
mod context;
mod interp;
mod program;
mod types;

use tracing::debug;

pub use bindings::ResultBuffer;
#[cfg(feature = "c_api")]
pub use bindings::c_api;
pub use compiler::{
    grammar::{BinaryOp, Expr, UnaryOp, EVENT_ROOT},
    parser::{ExprParser, MAX_DEPTH, MAX_HEIGHT},
    source_location::SourceLocation,
    string_tokenizer::{tokenize, StringTokenizer},
    syntax_error::{LexError, ParseError, ParseResult, SyntaxError},
    tokenizer::{TokenWithLoc, Tokenizer, VecTokenizer},
    tokens::Token,
};
pub use context::{default_funcs::builtin_names, EventContext, FunctionDef, NativeFunction};
pub use interp::Interpreter;
pub use program::Program;
pub use types::{EvalError, EvalResult, Value};

// Some re-exports to allow a consistent use of serde
pub use serde;
pub use serde_json;

/// Parse `expression`, evaluate it against `event_json` and render the result.
///
/// Parse errors, evaluation errors and a `null` result all come back as
/// `None`; use [`Program`] to tell them apart.
pub fn evaluate(expression: &str, event_json: &str) -> Option<String> {
    let prog = match Program::from_source(expression) {
        Ok(prog) => prog,
        Err(err) => {
            debug!(%err, "parse failed");
            return None;
        }
    };

    match prog.eval_json(event_json) {
        Ok(val) => val.into_output(),
        Err(err) => {
            debug!(%err, kind = err.type_string(), "evaluation failed");
            None
        }
    }
}

/// Check that `expression` parses. Returns `None` when it does, otherwise a
/// message naming the source and what the parser expected.
pub fn validate(expression: &str) -> Option<String> {
    Program::from_source(expression)
        .err()
        .map(|err| format!("failed to parse '{}': {}", expression, err))
}
