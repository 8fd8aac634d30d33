use tracing::trace;

use super::{
    source_location::SourceLocation,
    string_scanner::StringScanner,
    syntax_error::LexError,
    tokenizer::{TokenWithLoc, Tokenizer},
    tokens::Token,
};

pub struct StringTokenizer<'l> {
    scanner: StringScanner<'l>,

    current: Option<TokenWithLoc>,
}

impl<'l> StringTokenizer<'l> {
    pub fn with_input(input: &'l str) -> StringTokenizer<'l> {
        StringTokenizer {
            scanner: StringScanner::from_input(input),
            current: None,
        }
    }

    fn collect_next_token(&mut self) -> Result<TokenWithLoc, LexError> {
        while let Some(' ' | '\t' | '\n' | '\r') = self.scanner.peek() {
            self.scanner.next();
        }

        let token_start = self.scanner.location();

        let token = match self.scanner.next() {
            None => Token::Eof,
            Some(input_char) => match input_char {
                '+' => Token::Add,
                '-' => Token::Minus,
                '*' => Token::Multiply,
                '/' => Token::Divide,
                '.' => Token::Dot,
                ',' => Token::Comma,
                '(' => Token::LParen,
                ')' => Token::RParen,
                '!' => {
                    if self.scanner.next_if('=') {
                        Token::NotEqual
                    } else {
                        Token::Not
                    }
                }
                '<' => {
                    if self.scanner.next_if('=') {
                        Token::LessEqual
                    } else {
                        Token::LessThan
                    }
                }
                '>' => {
                    if self.scanner.next_if('=') {
                        Token::GreaterEqual
                    } else {
                        Token::GreaterThan
                    }
                }
                '=' | '|' | '&' => {
                    if self.scanner.next_if(input_char) {
                        match input_char {
                            '=' => Token::EqualEqual,
                            '|' => Token::OrOr,
                            _ => Token::AndAnd,
                        }
                    } else {
                        return Err(LexError::InvalidCharacter {
                            loc: token_start,
                            found: input_char,
                        });
                    }
                }
                '0'..='9' => self.parse_number(input_char, token_start)?,
                '\'' | '"' => self.parse_string_literal(input_char, token_start)?,
                '_' | 'A'..='Z' | 'a'..='z' => self.parse_keyword_or_ident(input_char),
                other => {
                    return Err(LexError::InvalidCharacter {
                        loc: token_start,
                        found: other,
                    })
                }
            },
        };

        trace!(?token, offset = token_start.offset(), "collected token");

        Ok(TokenWithLoc::new(token, token_start))
    }

    fn parse_string_literal(
        &mut self,
        delimiter: char,
        start: SourceLocation,
    ) -> Result<Token, LexError> {
        let mut working = String::new();

        loop {
            match self.scanner.next() {
                Some(c) if c == delimiter => return Ok(Token::StringLit(working)),
                Some(c) => working.push(c),
                None => {
                    return Err(LexError::UnterminatedString {
                        loc: start,
                        delimiter,
                    })
                }
            }
        }
    }

    fn parse_keyword_or_ident(&mut self, starting: char) -> Token {
        let mut working = starting.to_string();

        while let Some(next @ ('a'..='z' | 'A'..='Z' | '0'..='9' | '_')) = self.scanner.peek() {
            working.push(next);
            self.scanner.next();
        }

        match working.as_str() {
            "true" => Token::BoolLit(true),
            "false" => Token::BoolLit(false),
            "null" => Token::Null,
            _ => Token::Ident(working),
        }
    }

    fn parse_number(&mut self, starting: char, start: SourceLocation) -> Result<Token, LexError> {
        let mut working = starting.to_string();

        self.push_digits(&mut working);

        if self.scanner.next_if('.') {
            working.push('.');
            if !self.push_digits(&mut working) {
                return Err(LexError::MalformedNumber {
                    loc: start,
                    text: working,
                });
            }
        }

        match working.parse::<f64>() {
            Ok(val) if val.is_finite() => Ok(Token::NumberLit(val)),
            _ => Err(LexError::MalformedNumber {
                loc: start,
                text: working,
            }),
        }
    }

    /// Returns true when at least one digit was consumed.
    fn push_digits(&mut self, working: &mut String) -> bool {
        let mut any = false;
        while let Some(d @ '0'..='9') = self.scanner.peek() {
            working.push(d);
            self.scanner.next();
            any = true;
        }
        any
    }
}

impl Tokenizer for StringTokenizer<'_> {
    fn peek(&mut self) -> Result<&TokenWithLoc, LexError> {
        let token = match self.current.take() {
            Some(token) => token,
            None => self.collect_next_token()?,
        };

        Ok(self.current.insert(token))
    }

    fn next(&mut self) -> Result<TokenWithLoc, LexError> {
        match self.current.take() {
            Some(token) => Ok(token),
            None => self.collect_next_token(),
        }
    }

    fn location(&self) -> SourceLocation {
        self.scanner.location()
    }
}

/// Split `text` into tokens. The returned stream always ends with `Token::Eof`.
pub fn tokenize(text: &str) -> Result<Vec<TokenWithLoc>, LexError> {
    let mut tokenizer = StringTokenizer::with_input(text);
    let mut tokens = Vec::new();

    loop {
        let token = tokenizer.next()?;
        let done = token.token == Token::Eof;
        tokens.push(token);

        if done {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod test {
    use super::tokenize;
    use crate::compiler::{
        source_location::SourceLocation,
        syntax_error::LexError,
        tokenizer::{TokenWithLoc, Tokenizer},
        tokens::Token,
    };
    use crate::StringTokenizer;

    fn tokens_of(src: &str) -> Vec<Token> {
        tokenize(src)
            .unwrap()
            .into_iter()
            .map(|t| t.into_token())
            .collect()
    }

    #[test]
    fn tokens_locations() {
        let src = "foo + 3";

        let mut tokenizer = StringTokenizer::with_input(src);

        let t = tokenizer.next().unwrap();
        assert_eq!(
            t,
            TokenWithLoc::new(Token::Ident("foo".to_owned()), SourceLocation::new(0))
        );
        assert_eq!(
            tokenizer.next().unwrap(),
            TokenWithLoc::new(Token::Add, SourceLocation::new(4))
        );
        assert_eq!(
            tokenizer.next().unwrap(),
            TokenWithLoc::new(Token::NumberLit(3.0), SourceLocation::new(6))
        );
        assert_eq!(tokenizer.next().unwrap().into_token(), Token::Eof);
        assert_eq!(tokenizer.next().unwrap().into_token(), Token::Eof);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut tokenizer = StringTokenizer::with_input("1");

        assert_eq!(tokenizer.peek().unwrap().token(), &Token::NumberLit(1.0));
        assert_eq!(tokenizer.peek().unwrap().token(), &Token::NumberLit(1.0));
        assert_eq!(tokenizer.next().unwrap().into_token(), Token::NumberLit(1.0));
        assert_eq!(tokenizer.next().unwrap().into_token(), Token::Eof);
    }

    #[test]
    fn property_path_tokens() {
        assert_eq!(
            tokens_of("event.properties.a"),
            vec![
                Token::Ident("event".to_owned()),
                Token::Dot,
                Token::Ident("properties".to_owned()),
                Token::Dot,
                Token::Ident("a".to_owned()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn sign_is_an_operator() {
        assert_eq!(
            tokens_of("1-2.5"),
            vec![
                Token::NumberLit(1.0),
                Token::Minus,
                Token::NumberLit(2.5),
                Token::Eof
            ]
        );
    }

    #[test]
    fn operators() {
        assert_eq!(
            tokens_of("== != <= >= < > && || ! * /"),
            vec![
                Token::EqualEqual,
                Token::NotEqual,
                Token::LessEqual,
                Token::GreaterEqual,
                Token::LessThan,
                Token::GreaterThan,
                Token::AndAnd,
                Token::OrOr,
                Token::Not,
                Token::Multiply,
                Token::Divide,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn keywords() {
        assert_eq!(
            tokens_of("true false null nullable"),
            vec![
                Token::BoolLit(true),
                Token::BoolLit(false),
                Token::Null,
                Token::Ident("nullable".to_owned()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn string_literals_pass_through() {
        assert_eq!(
            tokens_of(r#"'a "b"' "it's" '\n'"#),
            vec![
                Token::StringLit("a \"b\"".to_owned()),
                Token::StringLit("it's".to_owned()),
                Token::StringLit("\\n".to_owned()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn string_literal_loc() {
        let src = "  \"this is a test string\"";

        let tokens = tokenize(src).unwrap();
        assert_eq!(
            tokens[0],
            TokenWithLoc::new(
                Token::StringLit("this is a test string".to_owned()),
                SourceLocation::new(2)
            )
        );
        assert_eq!(tokens[1].loc(), SourceLocation::new(src.len()));
    }

    #[test]
    fn unterminated_string() {
        assert_eq!(
            tokenize("concat('abc)").unwrap_err(),
            LexError::UnterminatedString {
                loc: SourceLocation::new(7),
                delimiter: '\''
            }
        );
        assert!(tokenize("'abc\"").is_err());
    }

    #[test]
    fn invalid_characters() {
        assert_eq!(
            tokenize("1 # 2").unwrap_err(),
            LexError::InvalidCharacter {
                loc: SourceLocation::new(2),
                found: '#'
            }
        );
        assert!(tokenize("a = b").is_err());
        assert!(tokenize("a & b").is_err());
        assert!(tokenize("a | b").is_err());
    }

    #[test]
    fn malformed_number() {
        assert_eq!(
            tokenize("1.").unwrap_err(),
            LexError::MalformedNumber {
                loc: SourceLocation::new(0),
                text: "1.".to_owned()
            }
        );
        assert!(matches!(
            tokenize(&"9".repeat(400)),
            Err(LexError::MalformedNumber { .. })
        ));
    }

    #[test]
    fn empty_input_is_just_eof() {
        assert_eq!(tokens_of("   "), vec![Token::Eof]);
    }
}
