use super::Value;
use serde_yaml::Number;
use super::expression::{Expression, Filter, Helper};

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Token {
    Ident(String),
    Str(String),
    Number(Number),
    LParen,
    RParen,
    Comma,
    Pipe,
}

/// Tokenizes the inside of a `{{ ... }}` tag.
///
/// `input` starts right after the opening braces. Returns the tokens and the byte
/// offset just past the closing `}}`.
pub(super) fn tokenize(input: &str) -> Result<(Vec<Token>, usize), String> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '}' => {
                if let Some((_, '}')) = chars.peek() {
                    return Ok((tokens, idx + 2));
                }
                return Err(format!("unexpected '}}' at offset {}", idx));
            }
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            ',' => tokens.push(Token::Comma),
            '|' => tokens.push(Token::Pipe),
            '\'' | '"' => {
                let quote = c;
                let mut literal = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '\\' => {
                            if let Some((_, escaped)) = chars.next() {
                                literal.push(escaped);
                            }
                        }
                        c if c == quote => {
                            closed = true;
                            break;
                        }
                        c => literal.push(c),
                    }
                }
                if !closed {
                    return Err("unterminated string literal".to_string());
                }
                tokens.push(Token::Str(literal));
            }
            c if c.is_ascii_digit() || (c == '-' && matches!(chars.peek(), Some((_, d)) if d.is_ascii_digit())) =>
            {
                let mut literal = String::from(c);
                while let Some((_, d)) = chars.peek() {
                    if d.is_ascii_digit() || *d == '.' {
                        literal.push(*d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Number(parse_number(&literal)?));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::from(c);
                while let Some((_, d)) = chars.peek() {
                    if d.is_alphanumeric() || *d == '_' {
                        ident.push(*d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            other => return Err(format!("unexpected character '{}'", other)),
        }
    }

    Err("unterminated '{{' tag".to_string())
}

/// Recursive-descent parser over the tokens of a single tag.
pub(super) struct ExpressionParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl ExpressionParser {
    pub(super) fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parses the whole tag, rejecting trailing tokens.
    pub(super) fn parse(mut self) -> Result<Expression, String> {
        if self.tokens.is_empty() {
            return Err("empty expression".to_string());
        }
        let expr = self.parse_expression()?;
        if let Some(token) = self.tokens.get(self.pos) {
            return Err(format!("unexpected token {:?}", token));
        }
        Ok(expr)
    }

    fn parse_expression(&mut self) -> Result<Expression, String> {
        let mut expr = self.parse_primary()?;
        while self.eat(&Token::Pipe) {
            let name = match self.next() {
                Some(Token::Ident(name)) => name,
                other => return Err(format!("expected filter name, found {:?}", other)),
            };
            let filter = Filter::from_name(&name).ok_or_else(|| format!("unknown filter '{}'", name))?;
            let args = if self.eat(&Token::LParen) {
                self.parse_args()?
            } else {
                Vec::new()
            };
            check_arity(filter.name(), filter.arity(), args.len())?;
            expr = Expression::Filter {
                input: Box::new(expr),
                filter,
                args,
            };
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expression, String> {
        match self.next() {
            Some(Token::Str(s)) => Ok(Expression::Literal(Value::String(s))),
            Some(Token::Number(n)) => Ok(Expression::Literal(Value::Number(n))),
            Some(Token::LParen) => {
                let inner = self.parse_expression()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                if self.eat(&Token::LParen) {
                    let helper = Helper::from_name(&name)
                        .ok_or_else(|| format!("unknown function '{}'", name))?;
                    let args = self.parse_args()?;
                    check_arity(helper.name(), helper.arity(), args.len())?;
                    return Ok(Expression::Call { helper, args });
                }
                Ok(match name.as_str() {
                    "true" | "True" => Expression::Literal(Value::Bool(true)),
                    "false" | "False" => Expression::Literal(Value::Bool(false)),
                    "none" | "None" => Expression::Literal(Value::Null),
                    _ => Expression::Variable(name),
                })
            }
            other => Err(format!("unexpected token {:?}", other)),
        }
    }

    /// Parses a comma separated argument list. The opening parenthesis is already consumed.
    fn parse_args(&mut self) -> Result<Vec<Expression>, String> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(&Token::RParen)?;
            return Ok(args);
        }
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.tokens.get(self.pos) == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), String> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(format!(
                "expected {:?}, found {:?}",
                expected,
                self.tokens.get(self.pos)
            ))
        }
    }
}

fn check_arity(name: &str, (min, max): (usize, usize), found: usize) -> Result<(), String> {
    if found < min || found > max {
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{} to {}", min, max)
        };
        Err(format!(
            "'{}' takes {} argument(s), but received {}",
            name, expected, found
        ))
    } else {
        Ok(())
    }
}

/// Integers stay integers; only literals with a fractional part become floats.
fn parse_number(literal: &str) -> Result<Number, String> {
    let invalid = || format!("invalid number '{}'", literal);
    if literal.contains('.') {
        return literal.parse::<f64>().map(Number::from).map_err(|_| invalid());
    }
    literal
        .parse::<i64>()
        .map(Number::from)
        .or_else(|_| literal.parse::<u64>().map(Number::from))
        .map_err(|_| invalid())
}
