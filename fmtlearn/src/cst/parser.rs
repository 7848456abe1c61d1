//! Tree-sitter based document ingestion for Python source.
//!
//! Adapts a tree-sitter parse into the token-stream/arena shape the
//! extractor consumes: grammar kind ids become token types and rule
//! indices, comments move to the hidden channel, and the whitespace
//! between tokens is resynthesized as hidden tokens so newline counting
//! sees the original spacing.

use compact_str::CompactString;
use thiserror::Error;
use tree_sitter::{Node, Parser, Point};

use crate::token::{Channel, Token, TokenStream, EOF};
use crate::tree::{Document, NodeId, TreeBuilder};

/// Error during document ingestion.
#[derive(Debug, Error)]
pub enum CstError {
    /// Failed to configure the tree-sitter parser.
    #[error("failed to create CST parser: {0}")]
    ParserCreation(String),
    /// tree-sitter returned no tree for the source.
    #[error("failed to parse source as Python")]
    ParseFailed,
}

/// Parse Python `source` into a [`Document`] with the given tab size.
pub fn parse_document(source: &str, tab_size: u32) -> Result<Document, CstError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| CstError::ParserCreation(e.to_string()))?;

    let tree = parser.parse(source, None).ok_or(CstError::ParseFailed)?;
    let root = tree.root_node();

    let mut ingest = Ingest {
        source,
        tokens: Vec::new(),
        builder: TreeBuilder::new(),
        last_end_byte: 0,
        last_end_point: Point { row: 0, column: 0 },
    };
    let tree_root = match ingest.walk(root) {
        Some(id) => id,
        // Empty or comment-only file: a childless root rule.
        None => ingest.builder.rule(i32::from(root.kind_id()), vec![]),
    };
    ingest.flush_gap(source.len());
    ingest.push_eof(source);

    Ok(Document {
        tokens: TokenStream::from_tokens(ingest.tokens),
        tree: ingest.builder.build(tree_root),
        tab_size,
    })
}

struct Ingest<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    builder: TreeBuilder,
    last_end_byte: usize,
    last_end_point: Point,
}

impl Ingest<'_> {
    /// Depth-first conversion; returns the arena node for `node`, or `None`
    /// for comments, zero-width leaves, and subtrees with no real tokens.
    fn walk(&mut self, node: Node<'_>) -> Option<NodeId> {
        if node.child_count() == 0 {
            if node.start_byte() == node.end_byte() {
                // Zero-width (missing) node.
                return None;
            }
            self.flush_gap(node.start_byte());
            let channel = if node.kind() == "comment" {
                Channel::Hidden
            } else {
                Channel::Default
            };
            let token_index = self.push_token(
                i32::from(node.kind_id()),
                channel,
                node.start_byte(),
                node.end_byte(),
                node.start_position(),
            );
            self.last_end_byte = node.end_byte();
            self.last_end_point = node.end_position();
            match channel {
                Channel::Default => Some(self.builder.leaf(token_index)),
                Channel::Hidden => None,
            }
        } else {
            let mut cursor = node.walk();
            let child_nodes: Vec<Node<'_>> = node.children(&mut cursor).collect();
            let mut children = Vec::new();
            for child in child_nodes {
                if let Some(id) = self.walk(child) {
                    children.push(id);
                }
            }
            if children.is_empty() {
                return None;
            }
            Some(self.builder.rule(i32::from(node.kind_id()), children))
        }
    }

    /// Synthesize a hidden whitespace token for the gap before `start`.
    fn flush_gap(&mut self, start: usize) {
        if start > self.last_end_byte {
            let (from, point) = (self.last_end_byte, self.last_end_point);
            self.push_token(WS_TYPE, Channel::Hidden, from, start, point);
            self.last_end_byte = start;
        }
    }

    fn push_token(
        &mut self,
        token_type: i32,
        channel: Channel,
        start: usize,
        end: usize,
        at: Point,
    ) -> usize {
        let index = self.tokens.len();
        #[allow(clippy::cast_possible_truncation)]
        self.tokens.push(Token {
            token_type,
            channel,
            line: at.row as u32 + 1,
            column: at.column as u32,
            text: CompactString::from(&self.source[start..end]),
            index,
            start_offset: start,
        });
        index
    }

    fn push_eof(&mut self, source: &str) {
        let at = end_point_of(source);
        let index = self.tokens.len();
        #[allow(clippy::cast_possible_truncation)]
        self.tokens.push(Token {
            token_type: EOF,
            channel: Channel::Default,
            line: at.row as u32 + 1,
            column: at.column as u32,
            text: CompactString::default(),
            index,
            start_offset: source.len(),
        });
    }
}

/// Synthesized whitespace tokens are outside the grammar's kind-id space.
const WS_TYPE: i32 = -2;

fn end_point_of(source: &str) -> Point {
    let row = source.bytes().filter(|&b| b == b'\n').count();
    let column = source.len() - source.rfind('\n').map_or(0, |p| p + 1);
    Point { row, column }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_interleave_hidden_whitespace() {
        let doc = parse_document("x = 1\n", 4).unwrap();
        let rebuilt: String = doc
            .tokens
            .all()
            .iter()
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(rebuilt, "x = 1\n");
    }

    #[test]
    fn comments_are_hidden() {
        let doc = parse_document("x = 1  # note\ny = 2\n", 4).unwrap();
        let hidden_comment = doc
            .tokens
            .all()
            .iter()
            .find(|t| t.text.starts_with('#'))
            .unwrap();
        assert_eq!(hidden_comment.channel, Channel::Hidden);
        // Comments do not appear as tree leaves.
        let indexed: Vec<usize> = doc
            .tree
            .leaves()
            .iter()
            .filter_map(|&l| doc.tree.token_index(l))
            .collect();
        assert!(!indexed.contains(&hidden_comment.index));
    }

    #[test]
    fn stream_ends_with_eof() {
        let doc = parse_document("x = 1", 4).unwrap();
        let last = doc.tokens.get(doc.tokens.len() - 1);
        assert_eq!(last.token_type, EOF);
        assert_eq!(last.channel, Channel::Default);
    }

    #[test]
    fn positions_are_one_based_lines() {
        let doc = parse_document("x = 1\ny = 2\n", 4).unwrap();
        let y = doc
            .tokens
            .all()
            .iter()
            .find(|t| t.text == "y")
            .unwrap();
        assert_eq!(y.line, 2);
        assert_eq!(y.column, 0);
    }

    #[test]
    fn empty_source_builds_empty_document() {
        let doc = parse_document("", 4).unwrap();
        // Just the EOF token; extraction over it yields nothing.
        assert_eq!(doc.tokens.len(), 1);
        assert!(doc.tokens.real_tokens().is_empty());
    }
}
