use rug::{Complex, Float};

use crate::core::formula::errors::FormulaError;
use crate::core::formula::polynomial::Polynomial;

/// Largest exponent accepted after `^`.
pub const MAX_EXPONENT: u32 = 64;

/// Intermediate results may grow past the final cap (e.g. `z^8 - z^8 + z`),
/// but not without bound.
const MAX_INTERMEDIATE_DEGREE: usize = 64;

/// Parentheses and unary signs open one level each.
pub const MAX_NESTING: usize = 128;

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Number(String),
    Z,
    I,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    position: usize,
}

impl Token {
    fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Number(literal) => literal.clone(),
            TokenKind::Z => "z".to_string(),
            TokenKind::I => "i".to_string(),
            TokenKind::Plus => "+".to_string(),
            TokenKind::Minus => "-".to_string(),
            TokenKind::Star => "*".to_string(),
            TokenKind::Slash => "/".to_string(),
            TokenKind::Caret => "^".to_string(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
        }
    }

    fn starts_primary(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Number(_) | TokenKind::Z | TokenKind::I | TokenKind::LParen
        )
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, FormulaError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let ch = chars[pos];

        if ch.is_whitespace() {
            pos += 1;
            continue;
        }

        let simple = match ch {
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            '^' => Some(TokenKind::Caret),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            _ => None,
        };

        if let Some(kind) = simple {
            tokens.push(Token { kind, position: pos });
            pos += 1;
            continue;
        }

        if ch.is_ascii_digit() || ch == '.' {
            let start = pos;
            while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
                pos += 1;
            }
            // scientific suffix, only when followed by digits
            if pos < chars.len() && (chars[pos] == 'e' || chars[pos] == 'E') {
                let mut look = pos + 1;
                if look < chars.len() && (chars[look] == '+' || chars[look] == '-') {
                    look += 1;
                }
                if look < chars.len() && chars[look].is_ascii_digit() {
                    pos = look;
                    while pos < chars.len() && chars[pos].is_ascii_digit() {
                        pos += 1;
                    }
                }
            }
            tokens.push(Token {
                kind: TokenKind::Number(chars[start..pos].iter().collect()),
                position: start,
            });
            continue;
        }

        if ch.is_alphabetic() {
            let start = pos;
            while pos < chars.len() && chars[pos].is_alphanumeric() {
                pos += 1;
            }
            // runs such as `iz` are implicit products of single-letter symbols
            if !chars[start..pos].iter().all(|&c| c == 'z' || c == 'i') {
                return Err(FormulaError::UnknownIdentifier {
                    name: chars[start..pos].iter().collect(),
                    position: start,
                });
            }
            for (offset, &c) in chars[start..pos].iter().enumerate() {
                let kind = if c == 'z' { TokenKind::Z } else { TokenKind::I };
                tokens.push(Token {
                    kind,
                    position: start + offset,
                });
            }
            continue;
        }

        return Err(FormulaError::UnexpectedCharacter { ch, position: pos });
    }

    Ok(tokens)
}

/// Recursive-descent parser producing an expanded polynomial.
///
/// ```text
/// expr    := term (('+' | '-') term)*
/// term    := unary (('*' | '/') unary | unary)*
/// unary   := ('+' | '-') unary | power
/// power   := primary ('^' integer)?
/// primary := number | 'z' | 'i' | '(' expr ')'
/// ```
struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
    prec: u32,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned();
        self.cursor += 1;
        token
    }

    fn nested<T>(
        &mut self,
        position: usize,
        parse: impl FnOnce(&mut Self) -> Result<T, FormulaError>,
    ) -> Result<T, FormulaError> {
        if self.depth >= MAX_NESTING {
            return Err(FormulaError::NestingTooDeep {
                position,
                max: MAX_NESTING,
            });
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn expr(&mut self) -> Result<Polynomial, FormulaError> {
        let mut acc = self.term()?;

        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Plus => {
                    self.cursor += 1;
                    acc = acc.add(&self.term()?);
                }
                TokenKind::Minus => {
                    self.cursor += 1;
                    acc = acc.sub(&self.term()?);
                }
                _ => break,
            }
        }

        Ok(acc)
    }

    fn term(&mut self) -> Result<Polynomial, FormulaError> {
        let mut acc = self.unary()?;

        while let Some(token) = self.peek().cloned() {
            match token.kind {
                TokenKind::Star => {
                    self.cursor += 1;
                    let rhs = self.unary()?;
                    acc = checked_mul(&acc, &rhs)?;
                }
                TokenKind::Slash => {
                    self.cursor += 1;
                    let rhs = self.unary()?;
                    acc = divide(&acc, &rhs, token.position)?;
                }
                _ if token.starts_primary() => {
                    let rhs = self.unary()?;
                    acc = checked_mul(&acc, &rhs)?;
                }
                _ => break,
            }
        }

        Ok(acc)
    }

    fn unary(&mut self) -> Result<Polynomial, FormulaError> {
        match self.peek().map(|t| (&t.kind, t.position)) {
            Some((TokenKind::Minus, position)) => {
                self.cursor += 1;
                Ok(self.nested(position, Self::unary)?.neg())
            }
            Some((TokenKind::Plus, position)) => {
                self.cursor += 1;
                self.nested(position, Self::unary)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Polynomial, FormulaError> {
        let base = self.primary()?;

        if !matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Caret)) {
            return Ok(base);
        }
        self.cursor += 1;

        let token = self.next().ok_or(FormulaError::UnexpectedEnd)?;
        let TokenKind::Number(literal) = &token.kind else {
            return Err(FormulaError::UnexpectedToken {
                found: token.describe(),
                position: token.position,
            });
        };

        let exponent = literal
            .parse::<u32>()
            .ok()
            .filter(|&e| e <= MAX_EXPONENT)
            .ok_or_else(|| FormulaError::InvalidExponent {
                literal: literal.clone(),
                position: token.position,
                max: MAX_EXPONENT,
            })?;

        if base.degree() * exponent as usize > MAX_INTERMEDIATE_DEGREE {
            return Err(FormulaError::DegreeTooHigh {
                degree: base.degree() * exponent as usize,
                max: MAX_INTERMEDIATE_DEGREE,
            });
        }

        Ok(base.pow(exponent))
    }

    fn primary(&mut self) -> Result<Polynomial, FormulaError> {
        let token = self.next().ok_or(FormulaError::UnexpectedEnd)?;

        match &token.kind {
            TokenKind::Number(literal) => {
                let parsed = Float::parse(literal).map_err(|_| FormulaError::InvalidNumber {
                    literal: literal.clone(),
                    position: token.position,
                })?;
                let value = Float::with_val(self.prec, parsed);
                Ok(Polynomial::constant(Complex::with_val(
                    self.prec,
                    (value, 0),
                )))
            }
            TokenKind::Z => Ok(Polynomial::identity(self.prec)),
            TokenKind::I => Ok(Polynomial::constant(Complex::with_val(self.prec, (0, 1)))),
            TokenKind::LParen => {
                let inner = self.nested(token.position, Self::expr)?;
                match self.next() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(FormulaError::UnexpectedToken {
                        found: other.describe(),
                        position: other.position,
                    }),
                    None => Err(FormulaError::UnexpectedEnd),
                }
            }
            _ => Err(FormulaError::UnexpectedToken {
                found: token.describe(),
                position: token.position,
            }),
        }
    }
}

fn checked_mul(lhs: &Polynomial, rhs: &Polynomial) -> Result<Polynomial, FormulaError> {
    let degree = lhs.degree() + rhs.degree();
    if degree > MAX_INTERMEDIATE_DEGREE {
        return Err(FormulaError::DegreeTooHigh {
            degree,
            max: MAX_INTERMEDIATE_DEGREE,
        });
    }

    Ok(lhs.mul(rhs))
}

fn divide(lhs: &Polynomial, rhs: &Polynomial, position: usize) -> Result<Polynomial, FormulaError> {
    if !rhs.is_constant() {
        return Err(FormulaError::NonConstantDivisor { position });
    }
    if rhs.is_zero() {
        return Err(FormulaError::DivisionByZero { position });
    }

    Ok(lhs.div_scalar(&rhs.constant_term()))
}

/// Parses `text` into a polynomial at `prec` bits, rejecting constants and
/// anything above `max_degree`.
pub fn parse_polynomial(text: &str, prec: u32, max_degree: usize) -> Result<Polynomial, FormulaError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(FormulaError::Empty);
    }

    let mut parser = Parser {
        tokens,
        cursor: 0,
        prec,
        depth: 0,
    };

    let polynomial = parser.expr()?;

    if let Some(token) = parser.peek() {
        return Err(FormulaError::UnexpectedToken {
            found: token.describe(),
            position: token.position,
        });
    }

    if polynomial.is_constant() {
        return Err(FormulaError::Constant);
    }

    if polynomial.degree() > max_degree {
        return Err(FormulaError::DegreeTooHigh {
            degree: polynomial.degree(),
            max: max_degree,
        });
    }

    Ok(polynomial)
}
