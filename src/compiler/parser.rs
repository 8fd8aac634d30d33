use super::{
    grammar::{BinaryOp, Expr, UnaryOp, EVENT_ROOT},
    source_location::SourceLocation,
    string_tokenizer::StringTokenizer,
    syntax_error::{ParseResult, SyntaxError},
    tokenizer::{TokenWithLoc, Tokenizer, VecTokenizer},
    tokens::Token,
};
use crate::Value;

/// Deepest parser recursion (parens, unary operators, call arguments)
/// accepted from user input.
pub const MAX_DEPTH: usize = 128;

/// Tallest syntax tree accepted from user input. Flat operator chains grow
/// the tree without recursing in the parser, so they get a separate cap.
pub const MAX_HEIGHT: usize = 1024;

/// A parsed subtree together with its height.
type Node = (Expr, usize);

/// Recursive descent parser, one method per precedence level:
/// `||` < `&&` < comparison < additive < multiplicative < unary < primary.
pub struct ExprParser<'l> {
    tokenizer: &'l mut dyn Tokenizer,

    nesting: usize,
}

impl<'l> ExprParser<'l> {
    pub fn with_tokenizer(tokenizer: &'l mut dyn Tokenizer) -> Self {
        ExprParser {
            tokenizer,
            nesting: 0,
        }
    }

    /// Parse a complete expression; trailing tokens are an error.
    pub fn parse(mut self) -> ParseResult<Expr> {
        let (expr, _) = self.parse_expression()?;

        let next = self.tokenizer.next()?;
        if next.token != Token::Eof {
            return Err(SyntaxError::new(next.loc, "end of input", &next.token).into());
        }

        Ok(expr)
    }

    fn parse_expression(&mut self) -> ParseResult<Node> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> ParseResult<Node> {
        let mut lhs = self.parse_and()?;

        while let Some(op) = self.next_op(|t| match t {
            Token::OrOr => Some(BinaryOp::Or),
            _ => None,
        })? {
            let rhs = self.parse_and()?;
            lhs = self.combine(op, lhs, rhs)?;
        }

        Ok(lhs)
    }

    fn parse_and(&mut self) -> ParseResult<Node> {
        let mut lhs = self.parse_relation()?;

        while let Some(op) = self.next_op(|t| match t {
            Token::AndAnd => Some(BinaryOp::And),
            _ => None,
        })? {
            let rhs = self.parse_relation()?;
            lhs = self.combine(op, lhs, rhs)?;
        }

        Ok(lhs)
    }

    fn parse_relation(&mut self) -> ParseResult<Node> {
        let mut lhs = self.parse_addition()?;

        while let Some(op) = self.next_op(|t| match t {
            Token::EqualEqual => Some(BinaryOp::Eq),
            Token::NotEqual => Some(BinaryOp::Ne),
            Token::LessThan => Some(BinaryOp::Lt),
            Token::LessEqual => Some(BinaryOp::Le),
            Token::GreaterThan => Some(BinaryOp::Gt),
            Token::GreaterEqual => Some(BinaryOp::Ge),
            _ => None,
        })? {
            let rhs = self.parse_addition()?;
            lhs = self.combine(op, lhs, rhs)?;
        }

        Ok(lhs)
    }

    fn parse_addition(&mut self) -> ParseResult<Node> {
        let mut lhs = self.parse_multiplication()?;

        while let Some(op) = self.next_op(|t| match t {
            Token::Add => Some(BinaryOp::Add),
            Token::Minus => Some(BinaryOp::Sub),
            _ => None,
        })? {
            let rhs = self.parse_multiplication()?;
            lhs = self.combine(op, lhs, rhs)?;
        }

        Ok(lhs)
    }

    fn parse_multiplication(&mut self) -> ParseResult<Node> {
        let mut lhs = self.parse_unary()?;

        while let Some(op) = self.next_op(|t| match t {
            Token::Multiply => Some(BinaryOp::Mul),
            Token::Divide => Some(BinaryOp::Div),
            _ => None,
        })? {
            let rhs = self.parse_unary()?;
            lhs = self.combine(op, lhs, rhs)?;
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> ParseResult<Node> {
        let op = match self.tokenizer.peek()?.token() {
            Token::Minus => UnaryOp::Neg,
            Token::Not => UnaryOp::Not,
            _ => return self.parse_primary(),
        };
        let loc = self.tokenizer.next()?.loc();

        let (operand, depth) = self.nested(loc, |p| p.parse_unary())?;
        Ok((Expr::unary(op, operand), self.check_height(depth + 1, loc)?))
    }

    fn parse_primary(&mut self) -> ParseResult<Node> {
        let TokenWithLoc { token, loc } = self.tokenizer.next()?;

        match token {
            Token::NumberLit(n) => Ok((Expr::Literal(Value::Number(n)), 1)),
            Token::StringLit(s) => Ok((Expr::Literal(Value::String(s)), 1)),
            Token::BoolLit(b) => Ok((Expr::Literal(Value::Bool(b)), 1)),
            Token::Null => Ok((Expr::Literal(Value::Null), 1)),
            Token::LParen => {
                let inner = self.nested(loc, |p| p.parse_expression())?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            Token::Ident(name) => {
                if self.tokenizer.peek()?.token() == &Token::LParen {
                    self.tokenizer.next()?;
                    self.parse_call(name, loc)
                } else if name == EVENT_ROOT {
                    self.parse_property_path()
                } else {
                    Err(SyntaxError::new(
                        loc,
                        format!("function call or property path rooted at '{}'", EVENT_ROOT),
                        Token::Ident(name),
                    )
                    .into())
                }
            }
            other => Err(SyntaxError::new(loc, "expression", other).into()),
        }
    }

    /// Arguments of `name(...)`; the opening paren is already consumed.
    fn parse_call(&mut self, name: String, loc: SourceLocation) -> ParseResult<Node> {
        let mut args = Vec::new();
        let mut depth = 0;

        if self.tokenizer.peek()?.token() == &Token::RParen {
            self.tokenizer.next()?;
        } else {
            loop {
                let (arg, arg_depth) = self.nested(loc, |p| p.parse_expression())?;
                args.push(arg);
                depth = depth.max(arg_depth);

                let next = self.tokenizer.next()?;
                match next.token {
                    Token::Comma => continue,
                    Token::RParen => break,
                    other => {
                        return Err(SyntaxError::new(next.loc, "',' or ')'", other).into());
                    }
                }
            }
        }

        let depth = self.check_height(depth + 1, loc)?;
        Ok((Expr::FunctionCall { name, args }, depth))
    }

    /// Dot separated segments after the `event` root.
    fn parse_property_path(&mut self) -> ParseResult<Node> {
        let mut segments = Vec::new();

        while self.tokenizer.peek()?.token() == &Token::Dot {
            self.tokenizer.next()?;

            let next = self.tokenizer.next()?;
            match next.token.as_segment() {
                Some(segment) => segments.push(segment.to_owned()),
                None => {
                    return Err(SyntaxError::new(next.loc, "property name", next.token).into())
                }
            }
        }

        Ok((Expr::PropertyPath(segments), 1))
    }

    /// Consume the next token when `select` maps it to an operator.
    fn next_op<T>(&mut self, select: impl Fn(&Token) -> Option<T>) -> ParseResult<Option<T>> {
        match select(self.tokenizer.peek()?.token()) {
            Some(op) => {
                self.tokenizer.next()?;
                Ok(Some(op))
            }
            None => Ok(None),
        }
    }

    fn combine(&mut self, op: BinaryOp, lhs: Node, rhs: Node) -> ParseResult<Node> {
        let depth = lhs.1.max(rhs.1) + 1;
        let depth = self.check_height(depth, self.tokenizer.location())?;

        Ok((Expr::binary(op, lhs.0, rhs.0), depth))
    }

    fn expect(&mut self, expected: Token, description: &str) -> ParseResult<()> {
        let next = self.tokenizer.next()?;

        if next.token == expected {
            Ok(())
        } else {
            Err(SyntaxError::new(next.loc, description, next.token).into())
        }
    }

    fn nested<T>(
        &mut self,
        loc: SourceLocation,
        inner: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.nesting >= MAX_DEPTH {
            return Err(SyntaxError::new(
                loc,
                format!("expression nested at most {} levels deep", MAX_DEPTH),
                "deeper nesting",
            )
            .into());
        }

        self.nesting += 1;
        let res = inner(self);
        self.nesting -= 1;
        res
    }

    fn check_height(&self, height: usize, loc: SourceLocation) -> ParseResult<usize> {
        if height > MAX_HEIGHT {
            Err(SyntaxError::new(
                loc,
                format!("expression at most {} operations tall", MAX_HEIGHT),
                "a taller expression",
            )
            .into())
        } else {
            Ok(height)
        }
    }
}

/// Parse expression source text into its syntax tree.
pub fn parse_str(source: &str) -> ParseResult<Expr> {
    let mut tokenizer = StringTokenizer::with_input(source);
    ExprParser::with_tokenizer(&mut tokenizer).parse()
}

/// Parse an already tokenized stream.
pub fn parse_tokens(source: &str, tokens: Vec<TokenWithLoc>) -> ParseResult<Expr> {
    let mut tokenizer = VecTokenizer::new(source, tokens);
    ExprParser::with_tokenizer(&mut tokenizer).parse()
}
