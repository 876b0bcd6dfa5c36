//! DTXT lexer: converts source text into a flat token sequence.
//!
//! A single left-to-right pass over the input bytes. At each position the
//! longest alternative wins:
//!
//! - An identifier run followed by `(payload)` is one `Constructor` token; the
//!   payload may not contain parentheses or whitespace.
//! - An identifier run that is a complete number lexeme is a `Number`.
//! - The runs `T`, `F` and `N` alone are reserved words; any longer run
//!   (`True`, `Name`) is a `Key`.
//! - `//` comments and `[ \t\r\n]` whitespace produce no tokens.
//!
//! Every position inside the scanner sits on an ASCII byte, so slicing the
//! source `&str` at token boundaries never splits a UTF-8 sequence.

use crate::error::{FormatError, Result};
use std::fmt;

/// Token classes of the DTXT grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    String,
    Constructor,
    BraceOpen,
    BraceClose,
    BracketOpen,
    BracketClose,
    Colon,
    Comma,
    Number,
    True,
    False,
    Null,
    Key,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::String => "string",
            TokenKind::Constructor => "constructor",
            TokenKind::BraceOpen => "'{'",
            TokenKind::BraceClose => "'}'",
            TokenKind::BracketOpen => "'['",
            TokenKind::BracketClose => "']'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::Number => "number",
            TokenKind::True => "T",
            TokenKind::False => "F",
            TokenKind::Null => "N",
            TokenKind::Key => "key",
            TokenKind::Eof => "end of input",
        };
        f.write_str(name)
    }
}

/// One lexeme with its class and byte offset in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw source slice, including backticks for strings.
    pub lexeme: &'a str,
    pub offset: usize,
}

impl Token<'_> {
    /// Human-readable description for error messages, e.g. ``key `garbage` ``.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::String
            | TokenKind::Constructor
            | TokenKind::Number
            | TokenKind::Key => format!("{} `{}`", self.kind, self.lexeme),
            _ => self.kind.to_string(),
        }
    }
}

/// Tokenize DTXT source text.
///
/// The returned sequence always ends with a single `Eof` token positioned at
/// `text.len()`. Fails on the first character that starts no token.
pub fn tokenize(text: &str) -> Result<Vec<Token<'_>>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let kind = match bytes[pos] {
            b' ' | b'\t' | b'\r' | b'\n' => {
                pos += 1;
                continue;
            }
            b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                pos = skip_comment(bytes, pos);
                continue;
            }
            b'`' => {
                pos = scan_string(bytes, pos)
                    .ok_or(FormatError::UnterminatedString { offset: pos })?;
                TokenKind::String
            }
            b'{' => {
                pos += 1;
                TokenKind::BraceOpen
            }
            b'}' => {
                pos += 1;
                TokenKind::BraceClose
            }
            b'[' => {
                pos += 1;
                TokenKind::BracketOpen
            }
            b']' => {
                pos += 1;
                TokenKind::BracketClose
            }
            b':' => {
                pos += 1;
                TokenKind::Colon
            }
            b',' => {
                pos += 1;
                TokenKind::Comma
            }
            b'-' => {
                pos = scan_number(bytes, pos).ok_or(FormatError::UnexpectedChar {
                    ch: '-',
                    offset: pos,
                })?;
                TokenKind::Number
            }
            b if is_ident_byte(b) => {
                let ident_end = scan_ident(bytes, pos);
                if let Some(end) = scan_constructor_payload(bytes, ident_end) {
                    pos = end;
                    TokenKind::Constructor
                } else if let Some(end) = scan_number(bytes, pos) {
                    pos = end;
                    TokenKind::Number
                } else {
                    pos = ident_end;
                    match &text[start..pos] {
                        "T" => TokenKind::True,
                        "F" => TokenKind::False,
                        "N" => TokenKind::Null,
                        _ => TokenKind::Key,
                    }
                }
            }
            _ => {
                let ch = text[pos..]
                    .chars()
                    .next()
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                return Err(FormatError::UnexpectedChar { ch, offset: pos });
            }
        };
        tokens.push(Token {
            kind,
            lexeme: &text[start..pos],
            offset: start,
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        lexeme: "",
        offset: text.len(),
    });
    Ok(tokens)
}

/// True when `s` would lex as a single `Key`, `T`, `F` or `N` token, i.e. it can
/// be written as a bare object key.
pub(crate) fn is_bare_key(s: &str) -> bool {
    let bytes = s.as_bytes();
    !bytes.is_empty()
        && bytes.iter().all(|b| is_ident_byte(*b))
        && scan_number(bytes, 0) != Some(bytes.len())
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn scan_ident(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(|b| is_ident_byte(*b)) {
        pos += 1;
    }
    pos
}

fn scan_digits(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    pos
}

/// Skip `//` through the end of the line, leaving the newline for the caller.
fn skip_comment(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos] != b'\n' {
        pos += 1;
    }
    pos
}

/// Returns the position just past the closing backtick.
fn scan_string(bytes: &[u8], pos: usize) -> Option<usize> {
    bytes[pos + 1..]
        .iter()
        .position(|b| *b == b'`')
        .map(|len| pos + 1 + len + 1)
}

/// `ident_end` points just past the identifier. Returns the position past `)`
/// when a well-formed `(payload)` follows.
fn scan_constructor_payload(bytes: &[u8], ident_end: usize) -> Option<usize> {
    if bytes.get(ident_end) != Some(&b'(') {
        return None;
    }
    let mut pos = ident_end + 1;
    while let Some(&b) = bytes.get(pos) {
        match b {
            b')' => return Some(pos + 1),
            b'(' | b' ' | b'\t' | b'\r' | b'\n' => return None,
            _ => pos += 1,
        }
    }
    None
}

/// Match `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?` not followed by an
/// identifier byte. Returns the end position of the lexeme.
fn scan_number(bytes: &[u8], start: usize) -> Option<usize> {
    let mut pos = start;
    if bytes.get(pos) == Some(&b'-') {
        pos += 1;
    }
    match bytes.get(pos) {
        Some(b'0') => pos += 1,
        Some(b'1'..=b'9') => pos = scan_digits(bytes, pos + 1),
        _ => return None,
    }
    if bytes.get(pos) == Some(&b'.') && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit) {
        pos = scan_digits(bytes, pos + 1);
    }
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        if bytes.get(exp).is_some_and(u8::is_ascii_digit) {
            pos = scan_digits(bytes, exp);
        }
    }
    if bytes.get(pos).is_some_and(|b| is_ident_byte(*b)) {
        return None;
    }
    Some(pos)
}
