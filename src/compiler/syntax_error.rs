use thiserror::Error;

use super::source_location::SourceLocation;

/// Failure to split the source into tokens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unexpected character '{found}' at {loc}")]
    InvalidCharacter { loc: SourceLocation, found: char },

    #[error("unterminated string literal starting at {loc}, expected closing {delimiter}")]
    UnterminatedString {
        loc: SourceLocation,
        delimiter: char,
    },

    #[error("malformed number '{text}' at {loc}, expected a finite decimal")]
    MalformedNumber { loc: SourceLocation, text: String },
}

impl LexError {
    pub fn loc(&self) -> SourceLocation {
        match self {
            LexError::InvalidCharacter { loc, .. }
            | LexError::UnterminatedString { loc, .. }
            | LexError::MalformedNumber { loc, .. } => *loc,
        }
    }
}

/// Token stream that does not form a valid expression.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("expected {expected}, found {found} at {loc}")]
pub struct SyntaxError {
    loc: SourceLocation,
    expected: String,
    found: String,
}

impl SyntaxError {
    pub fn new(loc: SourceLocation, expected: impl Into<String>, found: impl ToString) -> Self {
        SyntaxError {
            loc,
            expected: expected.into(),
            found: found.to_string(),
        }
    }

    pub fn loc(&self) -> SourceLocation {
        self.loc
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn found(&self) -> &str {
        &self.found
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl ParseError {
    pub fn loc(&self) -> SourceLocation {
        match self {
            ParseError::Lex(err) => err.loc(),
            ParseError::Syntax(err) => err.loc(),
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
