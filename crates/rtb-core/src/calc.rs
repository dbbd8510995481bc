//! Arithmetic evaluator for untrusted chat input.
//!
//! Input goes through three stages: glyph normalization, an allow-list check,
//! and a recursive-descent parser over numbers, `+ - * /` and parentheses.
//! Nothing else is ever interpreted.

use crate::errors::EvalError;

/// Maximum parenthesis / unary-sign nesting accepted by the parser.
const MAX_DEPTH: usize = 64;

/// Evaluate an arithmetic expression typed by a user.
pub fn evaluate(raw: &str) -> Result<f64, EvalError> {
    let normalized = normalize(raw);

    if let Some(c) = normalized.chars().find(|c| !is_allowed(*c)) {
        return Err(EvalError::InvalidCharacter(c));
    }
    if !normalized.chars().any(is_operator) {
        return Err(EvalError::NotAnExpression);
    }

    let tokens = tokenize(&normalized)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if parser.pos != tokens.len() {
        return Err(EvalError::MalformedExpression);
    }
    if !value.is_finite() {
        return Err(EvalError::MalformedExpression);
    }
    // Avoid rendering "-0".
    Ok(if value == 0.0 { 0.0 } else { value })
}

/// Map look-alike glyphs and locale separators onto the canonical alphabet.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '×' | '✕' | '✖' | '·' | '⋅' | '∗' => '*',
            '÷' | ':' | '∕' => '/',
            '−' | '–' | '—' => '-',
            ',' => '.',
            '\t' | '\u{a0}' => ' ',
            other => other,
        })
        .collect()
}

/// Render an evaluation result: integers without a fraction, everything else
/// with at most 10 decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{value:.0}");
    }
    let s = format!("{value:.10}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.' | ' ')
}

fn is_operator(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/')
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Num(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        let tok = match b {
            b' ' => {
                i += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'0'..=b'9' | b'.' => {
                let start = i;
                let mut dots = 0usize;
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    if bytes[i] == b'.' {
                        dots += 1;
                    }
                    i += 1;
                }
                let lit = &input[start..i];
                if dots > 1 || lit == "." {
                    return Err(EvalError::MalformedExpression);
                }
                let n = lit
                    .parse::<f64>()
                    .map_err(|_| EvalError::MalformedExpression)?;
                tokens.push(Token::Num(n));
                continue;
            }
            _ => return Err(EvalError::MalformedExpression),
        };
        tokens.push(tok);
        i += 1;
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token> {
        let t = self.peek();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut acc = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            acc = if op == Token::Plus { acc + rhs } else { acc - rhs };
        }
        Ok(acc)
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<f64, EvalError> {
        let mut acc = self.factor()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            if op == Token::Star {
                acc *= rhs;
            } else {
                if rhs == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                acc /= rhs;
            }
        }
        Ok(acc)
    }

    // factor := ('+' | '-') factor | number | '(' expr ')'
    fn factor(&mut self) -> Result<f64, EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::MalformedExpression);
        }

        let value = match self.bump() {
            Some(Token::Num(n)) => n,
            Some(Token::Minus) => -self.factor()?,
            Some(Token::Plus) => self.factor()?,
            Some(Token::LParen) => {
                let inner = self.expr()?;
                if self.bump() != Some(Token::RParen) {
                    return Err(EvalError::MalformedExpression);
                }
                inner
            }
            _ => return Err(EvalError::MalformedExpression),
        };

        self.depth -= 1;
        Ok(value)
    }
}
