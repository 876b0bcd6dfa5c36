//! Recursive-descent parser: token sequence to [`Value`] tree.
//!
//! ```text
//! document := object EOF
//! object   := '{' (member (',' member)* ','?)? '}'
//! member   := (KEY | T | F | N) ':' value
//! array    := '[' (value (',' value)* ','?)? ']'
//! value    := object | array | STRING | NUMBER | T | F | N | CONSTRUCTOR
//! ```
//!
//! The parser fails fast: duplicate keys, trailing tokens after the root
//! object and nesting beyond [`DecodeOptions::max_depth`] are all errors, and
//! no partial tree is ever returned.

use crate::constructor::decode_constructor;
use crate::error::{FormatError, Result};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::options::DecodeOptions;
use crate::value::{Map, Number, Value};
use num_bigint::BigInt;

/// Decode DTXT text into a value tree using default limits.
///
/// The result is always a [`Value::Object`]: the root of a document must be
/// an object.
///
/// # Example
/// ```
/// use dtxt_core::{decode, Value};
///
/// let doc = decode("{name: `Sample`, count: 42, active: T}").unwrap();
/// assert_eq!(doc.get("name"), Some(&Value::from("Sample")));
/// assert_eq!(doc.get("count").and_then(Value::as_i64), Some(42));
/// ```
pub fn decode(text: &str) -> Result<Value> {
    decode_with(text, &DecodeOptions::default())
}

/// Decode DTXT text with explicit limits.
pub fn decode_with(text: &str, options: &DecodeOptions) -> Result<Value> {
    if let Some(limit) = options.max_input_len {
        if text.len() > limit {
            return Err(FormatError::InputTooLarge {
                len: text.len(),
                limit,
            });
        }
    }
    let tokens = tokenize(text)?;
    parse(&tokens, options)
}

/// Parse a token sequence produced by [`tokenize`] into a document.
pub fn parse(tokens: &[Token<'_>], options: &DecodeOptions) -> Result<Value> {
    Parser::new(tokens, options).parse_document()
}

struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn new(tokens: &'t [Token<'a>], options: &DecodeOptions) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            max_depth: options.max_depth,
        }
    }

    /// Current token; past the end of the slice this is a synthetic `Eof`.
    fn peek(&self) -> Token<'a> {
        match self.tokens.get(self.pos) {
            Some(tok) => *tok,
            None => Token {
                kind: TokenKind::Eof,
                lexeme: "",
                offset: self.tokens.last().map_or(0, |t| t.offset + t.lexeme.len()),
            },
        }
    }

    fn advance(&mut self) -> Token<'a> {
        let tok = self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token<'a>> {
        let tok = self.peek();
        if tok.kind != kind {
            return Err(FormatError::Expected {
                expected,
                found: tok.describe(),
                offset: tok.offset,
            });
        }
        Ok(self.advance())
    }

    fn enter(&mut self, offset: usize) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(FormatError::NestingTooDeep {
                limit: self.max_depth,
                offset,
            });
        }
        Ok(())
    }

    fn parse_document(&mut self) -> Result<Value> {
        let first = self.peek();
        if first.kind != TokenKind::BraceOpen {
            return Err(FormatError::RootNotObject {
                found: first.describe(),
                offset: first.offset,
            });
        }
        let root = self.parse_object()?;

        let next = self.peek();
        if next.kind != TokenKind::Eof {
            return Err(FormatError::TrailingData {
                found: next.describe(),
                offset: next.offset,
            });
        }
        Ok(root)
    }

    fn parse_value(&mut self) -> Result<Value> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::BraceOpen => self.parse_object(),
            TokenKind::BracketOpen => self.parse_array(),
            TokenKind::String => {
                self.advance();
                // The lexer guarantees both backticks are present.
                let inner = &tok.lexeme[1..tok.lexeme.len() - 1];
                Ok(Value::String(inner.to_string()))
            }
            TokenKind::Number => {
                self.advance();
                parse_number(tok.lexeme, tok.offset)
            }
            TokenKind::True => {
                self.advance();
                Ok(Value::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                Ok(Value::Bool(false))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Value::Null)
            }
            TokenKind::Constructor => {
                self.advance();
                decode_constructor(tok.lexeme, tok.offset)
            }
            _ => Err(FormatError::UnexpectedToken {
                found: tok.describe(),
                offset: tok.offset,
            }),
        }
    }

    fn parse_object(&mut self) -> Result<Value> {
        let open = self.expect(TokenKind::BraceOpen, "'{'")?;
        self.enter(open.offset)?;
        let mut map = Map::new();

        while self.peek().kind != TokenKind::BraceClose {
            let key = self.peek();
            if !matches!(
                key.kind,
                TokenKind::Key | TokenKind::True | TokenKind::False | TokenKind::Null
            ) {
                return Err(FormatError::ExpectedKey {
                    found: key.describe(),
                    offset: key.offset,
                });
            }
            self.advance();

            if map.contains_key(key.lexeme) {
                return Err(FormatError::DuplicateKey {
                    key: key.lexeme.to_string(),
                    offset: key.offset,
                });
            }

            self.expect(TokenKind::Colon, "':' after key")?;
            let value = self.parse_value()?;
            map.insert(key.lexeme.to_string(), value);

            let sep = self.peek();
            match sep.kind {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::BraceClose => {}
                _ => {
                    return Err(FormatError::Expected {
                        expected: "',' or '}' in object",
                        found: sep.describe(),
                        offset: sep.offset,
                    })
                }
            }
        }

        self.advance();
        self.depth -= 1;
        Ok(Value::Object(map))
    }

    fn parse_array(&mut self) -> Result<Value> {
        let open = self.expect(TokenKind::BracketOpen, "'['")?;
        self.enter(open.offset)?;
        let mut items = Vec::new();

        while self.peek().kind != TokenKind::BracketClose {
            items.push(self.parse_value()?);

            let sep = self.peek();
            match sep.kind {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::BracketClose => {}
                _ => {
                    return Err(FormatError::Expected {
                        expected: "',' or ']' in array",
                        found: sep.describe(),
                        offset: sep.offset,
                    })
                }
            }
        }

        self.advance();
        self.depth -= 1;
        Ok(Value::Array(items))
    }
}

/// Integral lexemes become `i64`, or `BigInt` when they overflow it; lexemes
/// with `.`, `e` or `E` become `f64`.
fn parse_number(lexeme: &str, offset: usize) -> Result<Value> {
    let out_of_range = || FormatError::NumberOutOfRange {
        lexeme: lexeme.to_string(),
        offset,
    };
    if lexeme.contains(['.', 'e', 'E']) {
        let f: f64 = lexeme.parse().map_err(|_| out_of_range())?;
        if !f.is_finite() {
            return Err(out_of_range());
        }
        return Ok(Value::Number(Number::Float(f)));
    }
    match lexeme.parse::<i64>() {
        Ok(n) => Ok(Value::Number(Number::Int(n))),
        Err(_) => lexeme
            .parse::<BigInt>()
            .map(Value::BigInt)
            .map_err(|_| out_of_range()),
    }
}
