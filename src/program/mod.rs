use std::sync::Arc;

use crate::{
    compiler::{
        grammar::Expr,
        parser::{parse_str, parse_tokens},
        syntax_error::ParseResult,
        tokenizer::TokenWithLoc,
    },
    interp::Interpreter,
    EvalResult, EventContext, Value,
};

/// A parsed expression, ready to run against any number of events.
///
/// The tree is immutable and shared, so clones are cheap and a `Program` can
/// be evaluated from several threads at once.
#[derive(Debug, Clone)]
pub struct Program {
    source: Arc<str>,
    ast: Arc<Expr>,
}

impl Program {
    pub fn from_source(source: &str) -> ParseResult<Program> {
        Ok(Program::new(source, parse_str(source)?))
    }

    /// Build from a stream produced by [`crate::tokenize`]; `source` is kept
    /// for error messages and [`Program::source`].
    pub fn from_tokens(source: &str, tokens: Vec<TokenWithLoc>) -> ParseResult<Program> {
        Ok(Program::new(source, parse_tokens(source, tokens)?))
    }

    fn new(source: &str, ast: Expr) -> Program {
        Program {
            source: Arc::from(source),
            ast: Arc::new(ast),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Expr {
        &self.ast
    }

    pub fn eval(&self, event: &EventContext) -> EvalResult<Value> {
        Interpreter::new(event).run(&self.ast)
    }

    /// Decode `event_json` and evaluate against it.
    pub fn eval_json(&self, event_json: &str) -> EvalResult<Value> {
        let event = EventContext::from_json(event_json)?;
        self.eval(&event)
    }

    #[cfg(feature = "ast_ser")]
    pub fn dumps_ast(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self.ast.as_ref())
    }
}
