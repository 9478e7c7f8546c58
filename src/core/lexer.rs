//! Lexer for the realm's textual value encoding
//!
//! A `vm/qeval` reply looks like
//! `(slice[(&(struct{(1 uint64),("g1..." .uverse.address)} T) *T)] []*T)`.
//! Everything downstream works on the flat token stream produced here, so
//! text inside quotes can never be mistaken for structure.

use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Comma,
    /// Raw text between the quotes, escapes left as-is
    Quoted(&'a str),
    /// Any other run of non-space characters (`uint64`, `&`, `.uverse.address`)
    Word(&'a str),
}

/// A token plus its byte span in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub start: usize,
    pub end: usize,
}

impl<'a> Token<'a> {
    pub fn word(&self) -> Option<&'a str> {
        match self.kind {
            TokenKind::Word(w) => Some(w),
            _ => None,
        }
    }

    pub fn quoted(&self) -> Option<&'a str> {
        match self.kind {
            TokenKind::Quoted(q) => Some(q),
            _ => None,
        }
    }

    pub fn is_word(&self, expected: &str) -> bool {
        self.word() == Some(expected)
    }
}

fn punctuation(byte: u8) -> Option<TokenKind<'static>> {
    match byte {
        b'(' => Some(TokenKind::OpenParen),
        b')' => Some(TokenKind::CloseParen),
        b'[' => Some(TokenKind::OpenBracket),
        b']' => Some(TokenKind::CloseBracket),
        b'{' => Some(TokenKind::OpenBrace),
        b'}' => Some(TokenKind::CloseBrace),
        b',' => Some(TokenKind::Comma),
        _ => None,
    }
}

fn ends_word(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == b'"' || punctuation(byte).is_some()
}

/// Split `text` into tokens. Never fails: an unterminated quote swallows the
/// rest of the input as a single quoted token.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];

        if byte.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if let Some(kind) = punctuation(byte) {
            tokens.push(Token { kind, start: i, end: i + 1 });
            i += 1;
            continue;
        }

        if byte == b'"' {
            let start = i;
            i += 1;
            let body_start = i;
            while i < bytes.len() && bytes[i] != b'"' {
                if bytes[i] == b'\\' {
                    i += 1;
                }
                i += 1;
            }
            let body_end = i.min(bytes.len());
            i = (i + 1).min(bytes.len());
            tokens.push(Token {
                kind: TokenKind::Quoted(&text[body_start..body_end]),
                start,
                end: i,
            });
            continue;
        }

        let start = i;
        while i < bytes.len() && !ends_word(bytes[i]) {
            i += 1;
        }
        tokens.push(Token {
            kind: TokenKind::Word(&text[start..i]),
            start,
            end: i,
        });
    }

    tokens
}

/// Resolve backslash escapes in a quoted token's raw text.
///
/// Covers the escapes Go's `strconv.Quote` emits, including `\xNN`, octal,
/// `\uNNNN` and `\UNNNNNNNN`. An escape that does not decode is kept
/// verbatim, backslash included.
pub fn unquote(raw: &str) -> Cow<'_, str> {
    if !raw.contains('\\') {
        return Cow::Borrowed(raw);
    }

    // `\xNN` may produce bytes that are not UTF-8 on their own
    let mut out: Vec<u8> = Vec::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('\\') {
        out.extend_from_slice(rest[..pos].as_bytes());
        let escape = &rest[pos + 1..];
        let consumed = push_escape(&mut out, escape);
        rest = &escape[consumed..];
    }
    out.extend_from_slice(rest.as_bytes());

    Cow::Owned(String::from_utf8_lossy(&out).into_owned())
}

enum Unescaped {
    Byte(u8),
    Char(char),
}

/// Decode the escape at the start of `escape` (the text after a backslash)
/// into `out` and return how many bytes of `escape` it used
fn push_escape(out: &mut Vec<u8>, escape: &str) -> usize {
    let Some(c) = escape.chars().next() else {
        out.push(b'\\');
        return 0;
    };

    let parsed = match c {
        'a' => Some((Unescaped::Byte(0x07), 1)),
        'b' => Some((Unescaped::Byte(0x08), 1)),
        'f' => Some((Unescaped::Byte(0x0c), 1)),
        'n' => Some((Unescaped::Byte(b'\n'), 1)),
        'r' => Some((Unescaped::Byte(b'\r'), 1)),
        't' => Some((Unescaped::Byte(b'\t'), 1)),
        'v' => Some((Unescaped::Byte(0x0b), 1)),
        '\\' | '"' | '\'' => Some((Unescaped::Char(c), 1)),
        'x' => radix_digits(escape, 1, 2, 16).map(|v| (Unescaped::Byte(v as u8), 3)),
        'u' => radix_digits(escape, 1, 4, 16)
            .and_then(char::from_u32)
            .map(|ch| (Unescaped::Char(ch), 5)),
        'U' => radix_digits(escape, 1, 8, 16)
            .and_then(char::from_u32)
            .map(|ch| (Unescaped::Char(ch), 9)),
        '0'..='7' => radix_digits(escape, 0, 3, 8)
            .and_then(|v| u8::try_from(v).ok())
            .map(|v| (Unescaped::Byte(v), 3)),
        _ => None,
    };

    match parsed {
        Some((Unescaped::Byte(b), used)) => {
            out.push(b);
            used
        }
        Some((Unescaped::Char(ch), used)) => {
            let mut buf = [0u8; 4];
            out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            used
        }
        None => {
            out.push(b'\\');
            0
        }
    }
}

/// `len` digits of `radix` starting at byte `from`, or `None` if any is missing
fn radix_digits(text: &str, from: usize, len: usize, radix: u32) -> Option<u32> {
    let digits = text.get(from..from + len)?;
    if !digits.chars().all(|d| d.is_digit(radix)) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}
