pub use super::syntax_error::LexError;
use super::{source_location::SourceLocation, tokens::Token};

#[derive(Debug, PartialEq, Clone)]
pub struct TokenWithLoc {
    pub token: Token,
    pub loc: SourceLocation,
}

/// Pull based token source consumed by the parser.
pub trait Tokenizer {
    fn peek(&mut self) -> Result<&TokenWithLoc, LexError>;
    fn next(&mut self) -> Result<TokenWithLoc, LexError>;
    fn location(&self) -> SourceLocation;
}

impl TokenWithLoc {
    pub fn new(token: Token, loc: SourceLocation) -> Self {
        TokenWithLoc { token, loc }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn loc(&self) -> SourceLocation {
        self.loc
    }

    pub fn into_token(self) -> Token {
        self.token
    }
}

/// Replays an already collected token stream, such as the output of
/// [`tokenize`](super::string_tokenizer::tokenize).
pub struct VecTokenizer {
    tokens: std::vec::IntoIter<TokenWithLoc>,
    current: Option<TokenWithLoc>,
    end: SourceLocation,
}

impl VecTokenizer {
    pub fn new(source: &str, tokens: Vec<TokenWithLoc>) -> VecTokenizer {
        let end = tokens
            .last()
            .map(|t| t.loc())
            .unwrap_or_else(|| SourceLocation::new(source.chars().count()));

        VecTokenizer {
            tokens: tokens.into_iter(),
            current: None,
            end,
        }
    }

    fn pull(&mut self) -> TokenWithLoc {
        let end = self.end;
        self.tokens
            .next()
            .unwrap_or_else(|| TokenWithLoc::new(Token::Eof, end))
    }
}

impl Tokenizer for VecTokenizer {
    fn peek(&mut self) -> Result<&TokenWithLoc, LexError> {
        let token = match self.current.take() {
            Some(token) => token,
            None => self.pull(),
        };

        Ok(self.current.insert(token))
    }

    fn next(&mut self) -> Result<TokenWithLoc, LexError> {
        Ok(match self.current.take() {
            Some(token) => token,
            None => self.pull(),
        })
    }

    fn location(&self) -> SourceLocation {
        match self.current {
            Some(ref token) => token.loc(),
            None => self.tokens.as_slice().first().map_or(self.end, |t| t.loc()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{TokenWithLoc, Tokenizer, VecTokenizer};
    use crate::compiler::{source_location::SourceLocation, tokens::Token};

    #[test]
    fn vec_tokenizer_pads_with_eof() {
        let mut tokenizer = VecTokenizer::new(
            "7",
            vec![TokenWithLoc::new(Token::NumberLit(7.0), SourceLocation::new(0))],
        );

        assert_eq!(tokenizer.peek().unwrap().token(), &Token::NumberLit(7.0));
        assert_eq!(tokenizer.next().unwrap().into_token(), Token::NumberLit(7.0));
        assert_eq!(tokenizer.next().unwrap().into_token(), Token::Eof);
        assert_eq!(tokenizer.next().unwrap().loc(), SourceLocation::new(0));
    }
}
