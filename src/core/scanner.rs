//! Sequence scanner and record splitter
//!
//! Finds the top-level `slice[ ... ]` of a reply by paren-depth counting and
//! cuts its body into `struct{ ... }` records and positional field fragments.

use super::lexer::{tokenize, Token, TokenKind};
use crate::utils::constants::{NIL_SENTINEL, RECORD_MARKER, SEQUENCE_MARKER};

/// A tokenized realm reply
#[derive(Debug, Clone)]
pub struct Payload<'a> {
    text: &'a str,
    tokens: Vec<Token<'a>>,
}

/// Outcome of looking for a sequence in a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sequence<'a> {
    /// Explicit `slice[]` marker or a leading `nil`
    Empty,
    /// No marker, or the marker never closes at depth zero
    Absent,
    Body(SequenceBody<'a>),
}

/// The region strictly between `slice[` and its matching `]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceBody<'a> {
    pub text: &'a str,
    pub tokens: &'a [Token<'a>],
}

/// One `struct{ ... }` unit, from its marker up to the next record marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub tokens: &'a [Token<'a>],
}

/// Tokens inside one top-level `( ... )` group of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub tokens: &'a [Token<'a>],
}

impl<'a> Payload<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            tokens: tokenize(text),
        }
    }

    pub fn tokens(&self) -> &[Token<'a>] {
        &self.tokens
    }

    /// True when the first token past any opening parens is `nil`
    pub fn is_nil(&self) -> bool {
        self.tokens
            .iter()
            .find(|t| t.kind != TokenKind::OpenParen)
            .is_some_and(|t| t.is_word(NIL_SENTINEL))
    }

    /// True when a bare `nil` appears anywhere outside quoted text
    pub fn mentions_nil(&self) -> bool {
        self.tokens.iter().any(|t| t.is_word(NIL_SENTINEL))
    }

    /// Locate the first sequence and return its body.
    ///
    /// Depth rises on `(` and falls on `)`; the sequence closes at the first
    /// `]` seen at depth zero. Brackets at depth > 0 belong to nested values.
    pub fn sequence(&self) -> Sequence<'_> {
        if self.is_nil() {
            return Sequence::Empty;
        }

        let Some(open) = find_marker(&self.tokens, SEQUENCE_MARKER, TokenKind::OpenBracket) else {
            return Sequence::Absent;
        };

        let rest = &self.tokens[open + 1..];
        if rest.first().map(|t| t.kind) == Some(TokenKind::CloseBracket) {
            return Sequence::Empty;
        }

        let mut depth: i64 = 0;
        for (offset, token) in rest.iter().enumerate() {
            match token.kind {
                TokenKind::OpenParen => depth += 1,
                TokenKind::CloseParen => depth -= 1,
                TokenKind::CloseBracket if depth == 0 => {
                    return Sequence::Body(SequenceBody {
                        text: &self.text[self.tokens[open].end..token.start],
                        tokens: &rest[..offset],
                    });
                }
                _ => {}
            }
        }

        Sequence::Absent
    }
}

impl<'a> SequenceBody<'a> {
    pub fn records(&self) -> Vec<Record<'a>> {
        split_records(self.tokens)
    }
}

/// Index of the token right after `word`, if that token has kind `next`
fn find_marker(tokens: &[Token<'_>], word: &str, next: TokenKind<'_>) -> Option<usize> {
    tokens
        .windows(2)
        .position(|pair| pair[0].is_word(word) && pair[1].kind == next)
        .map(|i| i + 1)
}

fn is_record_marker(tokens: &[Token<'_>], at: usize) -> bool {
    tokens[at].is_word(RECORD_MARKER)
        && tokens.get(at + 1).map(|t| t.kind) == Some(TokenKind::OpenBrace)
}

/// Cut a sequence body at every `struct{` that is not nested inside another
/// record's braces. Whatever precedes the first marker is wrapper noise and
/// is dropped.
pub fn split_records<'a>(tokens: &'a [Token<'a>]) -> Vec<Record<'a>> {
    let mut starts = Vec::new();
    let mut brace_depth: usize = 0;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::OpenBrace => brace_depth += 1,
            TokenKind::CloseBrace => brace_depth = brace_depth.saturating_sub(1),
            TokenKind::Word(_) if brace_depth == 0 && is_record_marker(tokens, i) => {
                starts.push(i)
            }
            _ => {}
        }
    }

    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(tokens.len());
            Record {
                tokens: &tokens[start..end],
            }
        })
        .collect()
}

impl<'a> Record<'a> {
    /// Positional field fragments of the record's brace body.
    ///
    /// Each fragment is the token run inside one top-level paren group, so the
    /// first and last fields look exactly like the inner ones. A group left
    /// open at the end of the record still yields its partial contents.
    pub fn fields(&self) -> Vec<Field<'a>> {
        let body = self.tokens.get(2..).unwrap_or(&[]);
        let mut fields = Vec::new();
        let mut depth: usize = 0;
        let mut field_start = 0;

        for (i, token) in body.iter().enumerate() {
            match (depth, token.kind) {
                (0, TokenKind::CloseBrace) => return fields,
                (0, TokenKind::OpenParen) => {
                    depth = 1;
                    field_start = i + 1;
                }
                (0, _) => {}
                (_, TokenKind::OpenParen) => depth += 1,
                (_, TokenKind::CloseParen) => {
                    depth -= 1;
                    if depth == 0 {
                        fields.push(Field {
                            tokens: &body[field_start..i],
                        });
                    }
                }
                _ => {}
            }
        }

        if depth > 0 {
            fields.push(Field {
                tokens: &body[field_start..],
            });
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP_TYPE: &str = "gno.land/r/greg007/gnobounty_v2.Application";

    fn body_text(text: &str) -> Option<String> {
        match Payload::new(text).sequence() {
            Sequence::Body(body) => Some(body.text.to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_sequence_body_extracted() {
        let text = "(slice[(1 int),(2 int)] []int)";
        assert_eq!(body_text(text).as_deref(), Some("(1 int),(2 int)"));
    }

    #[test]
    fn test_bracket_inside_parens_does_not_close() {
        let text = "(slice[(&(struct{(slice[(\"x\" string)] []string)} T) *T)] []*T)";
        assert_eq!(
            body_text(text).as_deref(),
            Some("(&(struct{(slice[(\"x\" string)] []string)} T) *T)")
        );
    }

    #[test]
    fn test_bracket_inside_quotes_does_not_close() {
        let text = r#"(slice[("a]b" string)] []string)"#;
        assert_eq!(body_text(text).as_deref(), Some(r#"("a]b" string)"#));
    }

    #[test]
    fn test_empty_marker_short_circuits() {
        let text = format!("(slice[] []*{})", APP_TYPE);
        assert_eq!(Payload::new(&text).sequence(), Sequence::Empty);
    }

    #[test]
    fn test_nil_prefix_short_circuits() {
        let text = format!("(nil []*{})", APP_TYPE);
        let payload = Payload::new(&text);
        assert!(payload.is_nil());
        assert_eq!(payload.sequence(), Sequence::Empty);
    }

    #[test]
    fn test_missing_or_unclosed_marker_is_absent() {
        assert_eq!(Payload::new("(3 uint64)").sequence(), Sequence::Absent);
        assert_eq!(Payload::new("(slice[(1 int)").sequence(), Sequence::Absent);
    }

    #[test]
    fn test_nil_inside_quotes_is_not_a_sentinel() {
        let payload = Payload::new(r#"(struct{("nil" string)} T)"#);
        assert!(!payload.is_nil());
        assert!(!payload.mentions_nil());
        assert!(Payload::new("(nil *T)").mentions_nil());
    }

    #[test]
    fn test_records_and_fields() {
        let text = "(slice[(&(struct{(1 uint64),(\"a\" string)} T) *T),\
                    (&(struct{(2 uint64),(\"b\" string),(0 S)} T) *T)] []*T)";
        let payload = Payload::new(text);
        let Sequence::Body(body) = payload.sequence() else {
            panic!("expected a sequence body");
        };

        let records = body.records();
        assert_eq!(records.len(), 2);

        let first = records[0].fields();
        assert_eq!(first.len(), 2);
        assert!(first[0].tokens[0].is_word("1"));
        assert_eq!(first[1].tokens[0].quoted(), Some("a"));

        let second = records[1].fields();
        assert_eq!(second.len(), 3);
        assert!(second[2].tokens[0].is_word("0"));
        assert!(second[2].tokens[1].is_word("S"));
    }

    #[test]
    fn test_nested_struct_stays_in_its_field() {
        let text = "(slice[(struct{(1 uint64),(struct{(5 int64)} time.Time),(7 int)} T)] []T)";
        let payload = Payload::new(text);
        let Sequence::Body(body) = payload.sequence() else {
            panic!("expected a sequence body");
        };

        let records = body.records();
        assert_eq!(records.len(), 1);
        let fields = records[0].fields();
        assert_eq!(fields.len(), 3);
        assert!(fields[2].tokens[0].is_word("7"));
    }

    #[test]
    fn test_leading_noise_is_dropped() {
        let payload = Payload::new("(&(junk 1) struct{(1 int)})");
        let records = split_records(payload.tokens());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields().len(), 1);
    }
}
