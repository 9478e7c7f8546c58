//! Field decoders
//!
//! Pure pattern matchers that pull one typed value out of a field fragment
//! (or, for bounties, out of a whole record). A miss is never an error: it is
//! reported as [`Decoded::Missing`] or [`Decoded::Mismatch`] and the mapper
//! decides what zero value to use.

use std::borrow::Cow;

use super::lexer::{unquote, Token, TokenKind};
use super::scanner::Field;
use crate::models::types::ApplicationStatus;
use crate::utils::constants::{
    ADDRESS_LEN, ADDRESS_PREFIX, AMOUNT_FIELD_PREFIX, AMOUNT_KIND, BOOL_KIND, CLAIMED_FIELD,
    STATUS_KIND_SUFFIX,
};

/// Result of a single decode attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded<T> {
    Value(T),
    /// Nothing to decode: the fragment or token does not exist
    Missing,
    /// Something was there but did not have the expected shape
    Mismatch,
}

impl<T> Decoded<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        match self {
            Self::Value(v) => Decoded::Value(f(v)),
            Self::Missing => Decoded::Missing,
            Self::Mismatch => Decoded::Mismatch,
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.into_option().unwrap_or(default)
    }

    /// `Missing` when the fragment is absent, else `Value`/`Mismatch`
    fn attempt<'a>(field: Option<Field<'a>>, decode: impl FnOnce(Field<'a>) -> Option<T>) -> Self {
        match field {
            None => Self::Missing,
            Some(f) => decode(f).map_or(Self::Mismatch, Self::Value),
        }
    }
}

impl<T: Default> Decoded<T> {
    pub fn unwrap_or_default(self) -> T {
        self.into_option().unwrap_or_default()
    }
}

// ============================================
// Token-shape predicates
// ============================================

/// `g1` followed by 38 lowercase alphanumerics
pub fn is_address(s: &str) -> bool {
    s.len() == ADDRESS_LEN
        && s.starts_with(ADDRESS_PREFIX)
        && s[ADDRESS_PREFIX.len()..]
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

pub fn is_integer_kind(tag: &str) -> bool {
    matches!(
        tag,
        "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16" | "uint32"
            | "uint64"
    )
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn digit_prefix(s: &str) -> &str {
    let end = s.bytes().position(|b| !b.is_ascii_digit()).unwrap_or(s.len());
    &s[..end]
}

// ============================================
// Positional decoders (one fragment)
// ============================================

/// `<digits> <integer-kind>` at the start of the fragment
pub fn decode_uint(field: Option<Field<'_>>) -> Decoded<u64> {
    Decoded::attempt(field, |f| match f.tokens {
        [digits, tag, ..] if tag.word().is_some_and(is_integer_kind) => {
            digits.word().filter(|d| is_digits(d))?.parse().ok()
        }
        _ => None,
    })
}

/// First quoted token in the fragment that is address-shaped
pub fn decode_address(field: Option<Field<'_>>) -> Decoded<String> {
    Decoded::attempt(field, |f| {
        f.tokens
            .iter()
            .filter_map(Token::quoted)
            .find(|q| is_address(q))
            .map(str::to_string)
    })
}

/// First quoted token in the fragment, unescaped
pub fn decode_string(field: Option<Field<'_>>) -> Decoded<String> {
    Decoded::attempt(field, |f| {
        f.tokens
            .iter()
            .find_map(Token::quoted)
            .map(|q| unquote(q).into_owned())
    })
}

/// Leading enum code followed by an `ApplicationStatus` type tag.
///
/// A well-formed code outside the known table decodes to
/// [`ApplicationStatus::Unknown`]; a malformed fragment or any other tag is
/// a mismatch.
pub fn decode_status(field: Option<Field<'_>>) -> Decoded<ApplicationStatus> {
    Decoded::attempt(field, |f| match f.tokens {
        [code, tag, ..] if tag.word().is_some_and(|w| w.ends_with(STATUS_KIND_SUFFIX)) => code
            .word()
            .filter(|c| is_digits(c))
            .map(ApplicationStatus::from_code),
        _ => None,
    })
}

// ============================================
// Record-wide decoders (bounty payloads)
// ============================================

/// Quoted strings in order of appearance, unescaped
pub fn quoted_strings<'a>(tokens: &'a [Token<'a>]) -> impl Iterator<Item = Cow<'a, str>> + 'a {
    tokens.iter().filter_map(Token::quoted).map(unquote)
}

/// Address-shaped tokens in order of appearance, quoted or bare
pub fn addresses<'a>(tokens: &'a [Token<'a>]) -> impl Iterator<Item = &'a str> + 'a {
    tokens
        .iter()
        .filter_map(|t| match t.kind {
            TokenKind::Quoted(s) | TokenKind::Word(s) => Some(s),
            _ => None,
        })
        .filter(|s| is_address(s))
}

/// Amount as a decimal digit string.
///
/// Tries the positional `(<digits> int64)` group first, then the named
/// `Amount:<digits>` form.
pub fn decode_amount(tokens: &[Token<'_>]) -> Decoded<String> {
    let positional = tokens.windows(4).find_map(|w| match w {
        [open, digits, tag, close]
            if open.kind == TokenKind::OpenParen
                && close.kind == TokenKind::CloseParen
                && tag.is_word(AMOUNT_KIND) =>
        {
            digits.word().filter(|d| is_digits(d))
        }
        _ => None,
    });
    if let Some(amount) = positional {
        return Decoded::Value(amount.to_string());
    }

    let named = tokens
        .iter()
        .filter_map(Token::word)
        .find_map(|w| w.strip_prefix(AMOUNT_FIELD_PREFIX));
    match named.map(digit_prefix) {
        Some(digits) if !digits.is_empty() => Decoded::Value(digits.to_string()),
        Some(_) => Decoded::Mismatch,
        None => Decoded::Missing,
    }
}

/// True iff a `true bool` pair or a named `IsClaimed:true` is present
pub fn decode_claimed(tokens: &[Token<'_>]) -> bool {
    tokens
        .windows(2)
        .any(|w| w[0].is_word("true") && w[1].is_word(BOOL_KIND))
        || tokens.iter().any(|t| t.is_word(CLAIMED_FIELD))
}

/// First run of digits in the reply (`(3 uint64)` -> 3)
pub fn first_number(tokens: &[Token<'_>]) -> Decoded<u64> {
    let Some(word) = tokens
        .iter()
        .filter_map(Token::word)
        .find(|w| w.starts_with(|c: char| c.is_ascii_digit()))
    else {
        return Decoded::Missing;
    };
    digit_prefix(word)
        .parse()
        .map_or(Decoded::Mismatch, Decoded::Value)
}
