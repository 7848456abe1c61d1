//! Builders for hand-constructing documents in tests.

use compact_str::CompactString;

use crate::token::{Channel, Token, TokenStream, TokenType, EOF};
use crate::tree::{Document, NodeId, TreeBuilder};

/// Builds a [`Document`] token by token.
///
/// Byte offsets accumulate automatically across on-channel and hidden
/// tokens, so ancestor widths come out consistent without spelling offsets
/// in every test. [`DocBuilder::build`] appends the trailing EOF token.
#[derive(Debug, Default)]
pub struct DocBuilder {
    tokens: Vec<Token>,
    tree: TreeBuilder,
    offset: usize,
}

impl DocBuilder {
    /// Fresh builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an on-channel token; returns its stream index.
    pub fn token(&mut self, token_type: TokenType, text: &str, line: u32, column: u32) -> usize {
        self.push(token_type, Channel::Default, text, line, column)
    }

    /// Append a hidden (whitespace/comment) token; returns its stream index.
    pub fn hidden(&mut self, text: &str, line: u32, column: u32) -> usize {
        self.push(90, Channel::Hidden, text, line, column)
    }

    fn push(
        &mut self,
        token_type: TokenType,
        channel: Channel,
        text: &str,
        line: u32,
        column: u32,
    ) -> usize {
        let index = self.tokens.len();
        self.tokens.push(Token {
            token_type,
            channel,
            line,
            column,
            text: CompactString::from(text),
            index,
            start_offset: self.offset,
        });
        self.offset += text.len();
        index
    }

    /// Add a leaf node for the token at `token_index`.
    pub fn leaf(&mut self, token_index: usize) -> NodeId {
        self.tree.leaf(token_index)
    }

    /// Append an on-channel token and its leaf node in one step.
    pub fn terminal(&mut self, token_type: TokenType, text: &str, line: u32, column: u32) -> NodeId {
        let index = self.token(token_type, text, line, column);
        self.leaf(index)
    }

    /// Add a rule node over `children`.
    pub fn rule(&mut self, rule_index: i32, children: Vec<NodeId>) -> NodeId {
        self.tree.rule(rule_index, children)
    }

    /// Seal the document with `root`, appending the EOF token.
    #[must_use]
    pub fn build(mut self, root: NodeId, tab_size: u32) -> Document {
        let (line, column) = self
            .tokens
            .last()
            .map_or((1, 0), |t| (t.line, t.end_column()));
        let index = self.tokens.len();
        self.tokens.push(Token {
            token_type: EOF,
            channel: Channel::Default,
            line,
            column,
            text: CompactString::default(),
            index,
            start_offset: self.offset,
        });
        Document {
            tokens: TokenStream::from_tokens(self.tokens),
            tree: self.tree.build(root),
            tab_size,
        }
    }
}
