//! Vertical-alignment detection.
//!
//! Decides whether a token starting a new line sits at its column because
//! it lines up with a token on the previous line (argument-list
//! continuation and the like) rather than because of ordinary block
//! indentation, and names the rule node anchored at the aligned token.

use crate::token::{Channel, Token, TokenStream};
use crate::tree::{NodeId, ParseTree};

/// On-channel tokens of the line immediately above the token at `tok_index`,
/// in source order. Empty when that token sits on the first populated line.
#[must_use]
pub fn tokens_on_previous_line(tokens: &TokenStream, tok_index: usize) -> Vec<&Token> {
    let cur_line = tokens.get(tok_index).line;

    // Nearest strictly-lower line among on-channel tokens.
    let mut prev_line = 0;
    let mut scan_from = tok_index;
    for i in (0..tok_index).rev() {
        let t = tokens.get(i);
        if t.channel == Channel::Default && t.line < cur_line {
            prev_line = t.line;
            scan_from = i;
            break;
        }
    }
    if prev_line == 0 {
        return Vec::new();
    }

    let mut online = Vec::new();
    for i in (0..=scan_from).rev() {
        let t = tokens.get(i);
        if t.line < prev_line {
            break;
        }
        if t.channel == Channel::Default && t.line == prev_line {
            online.push(t);
        }
    }
    online.reverse();
    online
}

/// First token of `line_tokens` whose start column equals the start column
/// of `left_edge`.
#[must_use]
pub fn find_aligned_token<'a>(line_tokens: &[&'a Token], left_edge: &Token) -> Option<&'a Token> {
    line_tokens
        .iter()
        .find(|t| t.column == left_edge.column)
        .copied()
}

/// Smallest rule node anchored at the token the current token aligns with,
/// or `None` when the column is better explained by indentation.
///
/// The alignment hypothesis is rejected when the previous line is empty,
/// no token there shares the column, the match is the previous line's
/// first token (that is left-edge indentation), or the column sits an
/// exact positive multiple of `tab_size` beyond the previous line's first
/// token (conventional tab-stop indentation). Otherwise the smallest rule
/// enclosing both tokens confirms alignment only if it starts at the
/// matched token.
#[must_use]
pub fn alignment_ancestor(
    tree: &ParseTree,
    tokens: &TokenStream,
    tok_index: usize,
    tab_size: u32,
) -> Option<NodeId> {
    let line_tokens = tokens_on_previous_line(tokens, tok_index);
    let first = *line_tokens.first()?;
    let cur = tokens.get(tok_index);
    let aligned = find_aligned_token(&line_tokens, cur)?;
    let prev = tokens.look_behind(tok_index, 1)?;

    let prev_indent = first.column;
    let cur_indent = cur.column;
    let tabbed = cur_indent > prev_indent
        && tab_size > 0
        && (cur_indent - prev_indent) % tab_size == 0;
    let preceding_nl = cur.line > prev.line;

    if !preceding_nl || aligned.index == first.index || tabbed {
        return None;
    }

    let common = tree.smallest_rule_enclosing(aligned.index, cur.index);
    (tree.start_token_index(common) == aligned.index).then_some(common)
}
