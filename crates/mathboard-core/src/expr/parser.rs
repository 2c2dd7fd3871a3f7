use super::lexer::{tokenize, Spanned, Token};
use super::{BinaryOp, Expr, ParseError, UnaryOp};

/// Deepest nesting accepted, both for parser recursion and for the built tree.
const MAX_DEPTH: usize = 128;

/// Parse a math expression string into an expression tree.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.relational()?;

    match parser.peek_spanned() {
        None => Ok(expr),
        Some(Spanned { token: Token::RParen, pos }) => Err(ParseError::UnbalancedParen { pos: *pos }),
        Some(spanned) => Err(ParseError::UnexpectedToken {
            found: spanned.token.describe(),
            pos: spanned.pos,
        }),
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn peek_spanned(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    /// Source position of the next token, or of the last one at the end.
    fn here(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |s| s.pos)
    }

    /// Reject a node that would make the tree too deep to render.
    fn nest(&self, expr: Expr) -> Result<Expr, ParseError> {
        if expr.depth() > MAX_DEPTH {
            return Err(ParseError::TooDeep { pos: self.here() });
        }
        Ok(expr)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let spanned = self.tokens.get(self.pos).cloned();
        if spanned.is_some() {
            self.pos += 1;
        }
        spanned
    }

    fn relational(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.additive()?;
        loop {
            let op = match self.peek() {
                Some(Token::Eq) => BinaryOp::Eq,
                Some(Token::Ne) => BinaryOp::Ne,
                Some(Token::Lt) => BinaryOp::Lt,
                Some(Token::Gt) => BinaryOp::Gt,
                Some(Token::Le) => BinaryOp::Le,
                Some(Token::Ge) => BinaryOp::Ge,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.additive()?;
            lhs = self.nest(Expr::binary(op, lhs, rhs))?;
        }
    }

    fn additive(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.multiplicative()?;
            lhs = self.nest(Expr::binary(op, lhs, rhs))?;
        }
    }

    fn multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.implicit()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.implicit()?;
            lhs = self.nest(Expr::binary(op, lhs, rhs))?;
        }
    }

    /// Juxtaposition (`2x`, `3(x + 1)`) binds tighter than `*` and `/`.
    fn implicit(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;
        while matches!(self.peek(), Some(Token::Ident(_)) | Some(Token::LParen)) {
            let rhs = self.power()?;
            lhs = self.nest(Expr::binary(BinaryOp::ImplicitMul, lhs, rhs))?;
        }
        Ok(lhs)
    }

    /// Every recursive path (groups, calls, signs, exponents) passes through
    /// here, so this is where nesting is bounded.
    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep { pos: self.here() });
        }
        self.depth += 1;
        let result = self.signed();
        self.depth -= 1;
        result
    }

    fn signed(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            Some(Token::Minus) => UnaryOp::Neg,
            Some(Token::Plus) => UnaryOp::Plus,
            _ => return self.power(),
        };
        self.pos += 1;
        let operand = self.unary()?;
        self.nest(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn power(&mut self) -> Result<Expr, ParseError> {
        let base = self.postfix()?;
        if matches!(self.peek(), Some(Token::Caret)) {
            self.pos += 1;
            // Right-associative, and allows a signed exponent: 2^-1, a^b^c.
            let exponent = self.unary()?;
            return self.nest(Expr::binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;
        while matches!(self.peek(), Some(Token::Bang)) {
            self.pos += 1;
            expr = self.nest(Expr::Factorial(Box::new(expr)))?;
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let Some(spanned) = self.advance() else {
            return Err(ParseError::UnexpectedEnd);
        };

        match spanned.token {
            Token::Number(text) => Ok(Expr::Number(text)),
            Token::Ident(name) => {
                if matches!(self.peek(), Some(Token::LParen)) {
                    self.pos += 1;
                    let args = self.arguments(spanned.pos)?;
                    self.nest(Expr::Call { name, args })
                } else {
                    Ok(Expr::Symbol(name))
                }
            }
            Token::LParen => {
                let inner = self.relational()?;
                self.expect_close(spanned.pos)?;
                self.nest(Expr::Paren(Box::new(inner)))
            }
            other => Err(ParseError::UnexpectedToken {
                found: other.describe(),
                pos: spanned.pos,
            }),
        }
    }

    fn arguments(&mut self, open_pos: usize) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if matches!(self.peek(), Some(Token::RParen)) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.relational()?);
            if matches!(self.peek(), Some(Token::Comma)) {
                self.pos += 1;
                continue;
            }
            self.expect_close(open_pos)?;
            return Ok(args);
        }
    }

    fn expect_close(&mut self, open_pos: usize) -> Result<(), ParseError> {
        match self.advance() {
            Some(Spanned { token: Token::RParen, .. }) => Ok(()),
            None => Err(ParseError::UnbalancedParen { pos: open_pos }),
            Some(spanned) => Err(ParseError::UnexpectedToken {
                found: spanned.token.describe(),
                pos: spanned.pos,
            }),
        }
    }
}
