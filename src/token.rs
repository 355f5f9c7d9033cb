//! Word-boundary tokenization shared by the specification and the matcher.
//!
//! Text is split on Unicode word boundaries (UAX #29). Whitespace runs are
//! dropped; words and punctuation are kept as separate tokens, so `"AD"` is
//! never a token inside `"Advisory"` while `"Comp-A"` stays three tokens.
//!
//! UAX #29 keeps a word together across `'`, `’` and `:` (`"AD's"`,
//! `"AD:Users"`). Those segments are split again at each such character,
//! which becomes a token of its own.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    /// Lowercased token text
    pub folded: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

fn is_word_joiner(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}' | ':')
}

pub(crate) fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (start, segment) in text.split_word_bound_indices() {
        if segment.chars().all(char::is_whitespace) {
            continue;
        }
        split_segment(&mut tokens, start, segment);
    }
    tokens
}

/// Pushes `segment` as tokens, broken at each word-joining character.
fn split_segment(tokens: &mut Vec<Token>, start: usize, segment: &str) {
    let mut piece_start = 0;
    for (offset, c) in segment.char_indices() {
        if !is_word_joiner(c) {
            continue;
        }
        let joiner_end = offset + c.len_utf8();
        push_piece(tokens, start, segment, piece_start..offset);
        push_piece(tokens, start, segment, offset..joiner_end);
        piece_start = joiner_end;
    }
    push_piece(tokens, start, segment, piece_start..segment.len());
}

fn push_piece(tokens: &mut Vec<Token>, start: usize, segment: &str, piece: Range<usize>) {
    if piece.is_empty() {
        return;
    }
    tokens.push(Token {
        folded: segment[piece.clone()].to_lowercase(),
        start: start + piece.start,
        end: start + piece.end,
    });
}

/// Folded token texts of a phrase, for dictionary keys.
pub(crate) fn phrase_tokens(phrase: &str) -> Vec<String> {
    tokenize(phrase).into_iter().map(|token| token.folded).collect()
}

/// Case-insensitive lookup key for a component name: its folded tokens
/// joined by single spaces. Two names share a key exactly when they match
/// the same text.
pub(crate) fn fold_key(name: &str) -> String {
    phrase_tokens(name).join(" ")
}

/// Splits a key built by [`fold_key`] back into its tokens.
pub(crate) fn key_tokens(key: &str) -> impl Iterator<Item = &str> {
    key.split(' ').filter(|token| !token.is_empty())
}
