//! Lexical token model and token stream access.
//!
//! Tokens are produced by an external lexer/parser and consumed read-only.
//! The stream keeps hidden (whitespace/comment) tokens interleaved with
//! on-channel tokens so that newline counting and whitespace reconstruction
//! can see the original spacing.

use compact_str::CompactString;
use serde::Serialize;

/// Integer vocabulary id assigned to a token by the external lexer.
pub type TokenType = i32;

/// Vocabulary id of the end-of-stream marker.
pub const EOF: TokenType = -1;

/// Which channel a token was emitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Tokens the parser sees.
    Default,
    /// Whitespace and comments, invisible to the parser.
    Hidden,
}

/// An immutable lexical unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Vocabulary id.
    pub token_type: TokenType,
    /// Channel this token was emitted on.
    pub channel: Channel,
    /// 1-based source line of the token's first character.
    pub line: u32,
    /// 0-based column of the token's first character.
    pub column: u32,
    /// Matched text.
    pub text: CompactString,
    /// Position in the token stream, hidden tokens included.
    pub index: usize,
    /// Byte offset of the token's first character in the file.
    pub start_offset: usize,
}

impl Token {
    /// Column one past the token's last character.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn end_column(&self) -> u32 {
        self.column + self.text.len() as u32
    }

    /// Byte offset of the token's last character (inclusive).
    ///
    /// For an empty token this collapses onto `start_offset`.
    #[must_use]
    pub fn stop_offset(&self) -> usize {
        self.start_offset + self.text.len().saturating_sub(1)
    }

    /// True for on-channel tokens that are not the end-of-stream marker.
    #[must_use]
    pub fn is_real(&self) -> bool {
        self.channel == Channel::Default && self.token_type != EOF
    }
}

/// Ordered token stream for one document.
///
/// By convention the stream ends with an on-channel token of type [`EOF`],
/// so look-ahead past the last real token is always defined.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Wrap an already-ordered token vector.
    ///
    /// Token `index` fields must match their positions in the vector.
    #[must_use]
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        debug_assert!(tokens.iter().enumerate().all(|(i, t)| t.index == i));
        Self { tokens }
    }

    /// Number of tokens, hidden and EOF included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when the stream holds no tokens at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at stream position `i`.
    ///
    /// # Panics
    ///
    /// Panics when `i` is out of bounds; stream positions come from the
    /// stream itself, so a miss is a programming error.
    #[must_use]
    pub fn get(&self, i: usize) -> &Token {
        &self.tokens[i]
    }

    /// All tokens in stream order.
    #[must_use]
    pub fn all(&self) -> &[Token] {
        &self.tokens
    }

    /// On-channel, non-EOF tokens in stream order.
    #[must_use]
    pub fn real_tokens(&self) -> Vec<&Token> {
        self.tokens.iter().filter(|t| t.is_real()).collect()
    }

    /// Maximal run of hidden tokens immediately before stream position `i`,
    /// in source order. Empty when the preceding token is on-channel.
    #[must_use]
    pub fn hidden_tokens_to_left(&self, i: usize) -> &[Token] {
        let mut start = i;
        while start > 0 && self.tokens[start - 1].channel == Channel::Hidden {
            start -= 1;
        }
        &self.tokens[start..i]
    }

    /// `n`-th on-channel token strictly before stream position `i`.
    #[must_use]
    pub fn look_behind(&self, i: usize, n: usize) -> Option<&Token> {
        debug_assert!(n > 0);
        let mut remaining = n;
        for t in self.tokens[..i.min(self.tokens.len())].iter().rev() {
            if t.channel == Channel::Default {
                remaining -= 1;
                if remaining == 0 {
                    return Some(t);
                }
            }
        }
        None
    }

    /// `n`-th on-channel token strictly after stream position `i`.
    ///
    /// Clamps to the final (EOF) token when the stream runs out.
    #[must_use]
    pub fn look_ahead(&self, i: usize, n: usize) -> Option<&Token> {
        debug_assert!(n > 0);
        let mut remaining = n;
        for t in self.tokens.get(i + 1..).unwrap_or_default() {
            if t.channel == Channel::Default {
                remaining -= 1;
                if remaining == 0 {
                    return Some(t);
                }
            }
        }
        self.tokens.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(index: usize, token_type: TokenType, channel: Channel) -> Token {
        Token {
            token_type,
            channel,
            line: 1,
            column: index as u32,
            text: CompactString::from("x"),
            index,
            start_offset: index,
        }
    }

    #[test]
    fn real_tokens_skip_hidden_and_eof() {
        let stream = TokenStream::from_tokens(vec![
            tok(0, 10, Channel::Default),
            tok(1, 90, Channel::Hidden),
            tok(2, 11, Channel::Default),
            tok(3, EOF, Channel::Default),
        ]);
        let real: Vec<usize> = stream.real_tokens().iter().map(|t| t.index).collect();
        assert_eq!(real, vec![0, 2]);
    }

    #[test]
    fn look_behind_skips_hidden() {
        let stream = TokenStream::from_tokens(vec![
            tok(0, 10, Channel::Default),
            tok(1, 90, Channel::Hidden),
            tok(2, 91, Channel::Hidden),
            tok(3, 11, Channel::Default),
        ]);
        assert_eq!(stream.look_behind(3, 1).map(|t| t.index), Some(0));
        assert!(stream.look_behind(3, 2).is_none());
    }

    #[test]
    fn look_ahead_clamps_to_eof() {
        let stream = TokenStream::from_tokens(vec![
            tok(0, 10, Channel::Default),
            tok(1, EOF, Channel::Default),
        ]);
        assert_eq!(stream.look_ahead(0, 1).map(|t| t.token_type), Some(EOF));
        assert_eq!(stream.look_ahead(1, 1).map(|t| t.token_type), Some(EOF));
    }

    #[test]
    fn hidden_run_is_contiguous() {
        let stream = TokenStream::from_tokens(vec![
            tok(0, 10, Channel::Default),
            tok(1, 90, Channel::Hidden),
            tok(2, 91, Channel::Hidden),
            tok(3, 11, Channel::Default),
        ]);
        let run: Vec<usize> = stream
            .hidden_tokens_to_left(3)
            .iter()
            .map(|t| t.index)
            .collect();
        assert_eq!(run, vec![1, 2]);
        assert!(stream.hidden_tokens_to_left(1).is_empty());
    }
}
