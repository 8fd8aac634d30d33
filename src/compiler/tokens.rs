use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Add,               // +
    Minus,             // -
    Multiply,          // *
    Divide,            // /
    Not,               // !
    Dot,               // .
    Comma,             // ,
    LParen,            // (
    RParen,            // )
    LessThan,          // <
    GreaterThan,       // >
    LessEqual,         // <=
    GreaterEqual,      // >=
    EqualEqual,        // ==
    NotEqual,          // !=
    OrOr,              // ||
    AndAnd,            // &&
    Null,              // 'null'
    BoolLit(bool),     // true | false
    NumberLit(f64),    // [0-9]+(\.[0-9]+)?
    StringLit(String), // ('|")[^'"]*('|")
    Ident(String),     // [_A-Za-z][_A-Za-z0-9]*
    Eof,
}

impl Token {
    /// Name usable as a property path segment.
    pub fn as_segment(&self) -> Option<&str> {
        match self {
            Token::Ident(name) => Some(name),
            Token::BoolLit(true) => Some("true"),
            Token::BoolLit(false) => Some("false"),
            Token::Null => Some("null"),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Add => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Multiply => write!(f, "'*'"),
            Token::Divide => write!(f, "'/'"),
            Token::Not => write!(f, "'!'"),
            Token::Dot => write!(f, "'.'"),
            Token::Comma => write!(f, "','"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LessThan => write!(f, "'<'"),
            Token::GreaterThan => write!(f, "'>'"),
            Token::LessEqual => write!(f, "'<='"),
            Token::GreaterEqual => write!(f, "'>='"),
            Token::EqualEqual => write!(f, "'=='"),
            Token::NotEqual => write!(f, "'!='"),
            Token::OrOr => write!(f, "'||'"),
            Token::AndAnd => write!(f, "'&&'"),
            Token::Null => write!(f, "null"),
            Token::BoolLit(b) => write!(f, "{}", b),
            Token::NumberLit(n) => write!(f, "number {}", n),
            Token::StringLit(s) => write!(f, "string '{}'", s),
            Token::Ident(name) => write!(f, "identifier '{}'", name),
            Token::Eof => write!(f, "end of input"),
        }
    }
}
