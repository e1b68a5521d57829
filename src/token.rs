//! Tokenizer: turns source text into a flat stream of [`Lex`] entries.
//!
//! Dispatch is a single pass over `(offset, char)` pairs with one character
//! of lookahead: push a lex entry, advance the pointer, repeat until end of
//! input. Reference-path and string-escape scanning are hand-written state
//! machines rather than independent regex-style lexemes, since both need to
//! track lookahead across several characters at once.

use crate::error::{SyntaxError, SyntaxErrorKind};
use std::iter::Peekable;
use std::str::CharIndices;

/// One path segment of a [`Token::Reference`] or [`Token::ListIndexReference`].
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Field(String),
    Index(i64),
}

/// An ordered reference path, plus whether it was marked global (`&!...`).
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePath {
    pub segments: Vec<Segment>,
    pub global: bool,
}

/// A single lexical token, tagged with the `(start, end)` byte range it was
/// read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Lex<T> {
    pub token: T,
    pub start: usize,
    pub end: usize,
}

impl<T> Lex<T> {
    pub fn new(token: T, start: usize, end: usize) -> Self {
        Self { token, start, end }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    EndOfStatement,
    Assignment,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Literal(String),
    Interpolation(String),
    BareWord(String),
    Reference(ReferencePath),
    ListIndexReference(ReferencePath),
}

const BAREWORD_TERMINATORS: [char; 5] = [':', ']', ',', ';', '}'];
const REFERENCE_TERMINATORS: [char; 6] = [';', ',', '{', '}', '[', ']'];

struct Scanner<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    fn next(&mut self) -> Option<(usize, char)> {
        self.chars.next()
    }

    /// Byte offset one past the last character the scanner has consumed.
    fn cursor(&mut self) -> usize {
        match self.peek() {
            Some((offset, _)) => offset,
            None => self.source.len(),
        }
    }
}

/// Tokenize a complete jsonmap program.
pub fn tokenize(source: &str) -> Result<Vec<Lex<Token>>, SyntaxError> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();

    while let Some((offset, ch)) = scanner.next() {
        if ch.is_whitespace() {
            continue;
        }

        match ch {
            ';' | ',' => tokens.push(Lex::new(Token::EndOfStatement, offset, offset + 1)),
            '{' => tokens.push(Lex::new(Token::LeftBrace, offset, offset + 1)),
            '}' => tokens.push(Lex::new(Token::RightBrace, offset, offset + 1)),
            '[' => tokens.push(Lex::new(Token::LeftBracket, offset, offset + 1)),
            ']' => tokens.push(Lex::new(Token::RightBracket, offset, offset + 1)),
            '=' | ':' => tokens.push(Lex::new(Token::Assignment, offset, offset + 1)),
            '"' => {
                let text = capture_escaped_string(&mut scanner, offset)?;
                let end = scanner.cursor();
                tokens.push(Lex::new(Token::Literal(text), offset, end));
            }
            '`' => {
                let text = capture_until(&mut scanner, '`', offset)?;
                let end = scanner.cursor();
                tokens.push(Lex::new(Token::Interpolation(text), offset, end));
            }
            '&' => {
                let reference_offset = scanner.cursor();
                let (path, is_list_index) = scan_reference(&mut scanner, reference_offset)?;
                let end = scanner.cursor();
                let token = if is_list_index {
                    Token::ListIndexReference(path)
                } else {
                    Token::Reference(path)
                };
                tokens.push(Lex::new(token, reference_offset, end));
            }
            _ => {
                let word = capture_bare_word(&mut scanner, ch);
                let end = scanner.cursor();
                tokens.push(Lex::new(Token::BareWord(word), offset, end));
            }
        }
    }

    Ok(tokens)
}

/// Capture a `"`-delimited string, decoding escape sequences, after the
/// opening quote has already been consumed.
fn capture_escaped_string(scanner: &mut Scanner, start: usize) -> Result<String, SyntaxError> {
    let mut out = String::new();
    loop {
        match scanner.next() {
            None => {
                return Err(SyntaxError::new(
                    start,
                    SyntaxErrorKind::UnexpectedEndOfInput,
                    "unterminated string literal",
                ))
            }
            Some((_, '"')) => return Ok(out),
            Some((offset, '\\')) => out.push(decode_escape(scanner, offset)?),
            Some((_, ch)) => out.push(ch),
        }
    }
}

fn decode_escape(scanner: &mut Scanner, backslash_offset: usize) -> Result<char, SyntaxError> {
    let (code_offset, code) = scanner.next().ok_or_else(|| {
        SyntaxError::new(
            backslash_offset,
            SyntaxErrorKind::UnexpectedEndOfInput,
            "unterminated escape sequence",
        )
    })?;

    match code {
        'b' => Ok('\u{8}'),
        'f' => Ok('\u{c}'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        't' => Ok('\t'),
        '"' => Ok('"'),
        '\\' => Ok('\\'),
        'x' => read_hex_escape(scanner, code_offset, 2),
        'u' => read_hex_escape(scanner, code_offset, 4),
        other => Err(SyntaxError::new(
            backslash_offset,
            SyntaxErrorKind::InvalidEscapeSequence,
            format!("invalid escape sequence '\\{}'", other),
        )),
    }
}

fn read_hex_escape(scanner: &mut Scanner, offset: usize, digits: usize) -> Result<char, SyntaxError> {
    let mut value: u32 = 0;
    for _ in 0..digits {
        let (_, digit) = scanner.next().ok_or_else(|| {
            SyntaxError::new(
                offset,
                SyntaxErrorKind::UnexpectedEndOfInput,
                "unterminated escape sequence",
            )
        })?;
        let digit_value = digit.to_digit(16).ok_or_else(|| {
            SyntaxError::new(
                offset,
                SyntaxErrorKind::InvalidEscapeSequence,
                format!("invalid hex digit '{}' in escape sequence", digit),
            )
        })?;
        value = value * 16 + digit_value;
    }
    char::from_u32(value).ok_or_else(|| {
        SyntaxError::new(
            offset,
            SyntaxErrorKind::InvalidEscapeSequence,
            format!("invalid unicode code point {:#x}", value),
        )
    })
}

/// Capture text up to (and consuming) the next occurrence of `delimiter`.
fn capture_until(scanner: &mut Scanner, delimiter: char, start: usize) -> Result<String, SyntaxError> {
    let mut out = String::new();
    loop {
        match scanner.next() {
            None => {
                return Err(SyntaxError::new(
                    start,
                    SyntaxErrorKind::UnexpectedEndOfInput,
                    "unterminated interpolation literal",
                ))
            }
            Some((_, ch)) if ch == delimiter => return Ok(out),
            Some((_, ch)) => out.push(ch),
        }
    }
}

fn capture_bare_word(scanner: &mut Scanner, first: char) -> String {
    let mut word = String::new();
    word.push(first);
    while let Some((_, ch)) = scanner.peek() {
        if ch.is_whitespace() || BAREWORD_TERMINATORS.contains(&ch) {
            break;
        }
        word.push(ch);
        scanner.next();
    }
    word
}

/// Scan a reference path after the leading `&` has been consumed. Returns the
/// path and whether it was a list-index reference (`&?...`).
fn scan_reference(
    scanner: &mut Scanner,
    reference_offset: usize,
) -> Result<(ReferencePath, bool), SyntaxError> {
    crate::logging::trace("scan_reference", crate::logging::Log::Default(reference_offset));
    let mut global = false;
    let mut is_list_index = false;

    if let Some((_, '!')) = scanner.peek() {
        global = true;
        scanner.next();
    }
    if let Some((_, '?')) = scanner.peek() {
        is_list_index = true;
        scanner.next();
    }
    if let Some((offset, '!')) = scanner.peek() {
        return Err(SyntaxError::new(
            offset,
            SyntaxErrorKind::IllegalGlobalMarker,
            "global marker '!' may only appear at the start of a reference",
        ));
    }

    let mut raw_segments: Vec<(usize, String)> = Vec::new();

    loop {
        match scanner.peek() {
            None => break,
            Some((_, ch)) if REFERENCE_TERMINATORS.contains(&ch) || ch.is_whitespace() => break,
            Some((_, '.')) => {
                scanner.next();
            }
            Some((offset, '"')) => {
                scanner.next();
                let text = capture_until(scanner, '"', offset)?;
                raw_segments.push((offset, text));
            }
            Some((offset, _)) => {
                let text = capture_unquoted_segment(scanner);
                raw_segments.push((offset, text));
            }
        }
    }

    let segments = if is_list_index {
        raw_segments
            .into_iter()
            .map(|(offset, text)| {
                text.parse::<i64>().map(Segment::Index).map_err(|_| {
                    SyntaxError::new(
                        offset,
                        SyntaxErrorKind::UnexpectedCharacter,
                        format!("expected an integer segment in list-index reference, found '{}'", text),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?
    } else {
        raw_segments
            .into_iter()
            .map(|(_, text)| Segment::Field(text))
            .collect()
    };

    if global && segments.is_empty() {
        return Err(SyntaxError::new(
            reference_offset,
            SyntaxErrorKind::IllegalGlobalMarker,
            "global reference must name a path",
        ));
    }

    Ok((ReferencePath { segments, global }, is_list_index))
}

fn capture_unquoted_segment(scanner: &mut Scanner) -> String {
    let mut segment = String::new();
    while let Some((_, ch)) = scanner.peek() {
        if ch == '.' || REFERENCE_TERMINATORS.contains(&ch) || ch.is_whitespace() {
            break;
        }
        segment.push(ch);
        scanner.next();
    }
    segment
}
