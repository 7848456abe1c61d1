//! Per-token feature-vector and layout-label computation.
//!
//! One extractor instance owns one pass over one document: it lazily
//! builds the token-to-leaf index on first use, then walks the real tokens
//! in stream order assembling a 14-slot context vector and four layout
//! labels for each. Instances are not shareable across threads; parallel
//! corpora get one extractor per document (see [`extract_documents`]).

use rayon::prelude::*;
use serde::Serialize;

use crate::alignment::alignment_ancestor;
use crate::index::TreeIndex;
use crate::schema::{FeatureVector, IDX_INFO_CHARPOS, IDX_INFO_LINE, IDX_TYPE};
use crate::token::{Token, EOF};
use crate::tree::{Document, NodeId};

/// Feature vectors and layout labels for one document, index-aligned with
/// the sequence of real tokens from the third onward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Observations {
    /// 14-slot context vectors.
    pub features: Vec<FeatureVector>,
    /// Newlines to inject before each token.
    pub inject_newlines: Vec<u32>,
    /// Whitespace to inject before each token when no newline is injected.
    /// Unclamped: malformed overlapping spans may drive this negative.
    pub inject_ws: Vec<i32>,
    /// Column difference from the previous line's first token.
    pub indent: Vec<i32>,
    /// Steps from the token's leaf up to its alignment ancestor, 0 when no
    /// alignment was detected.
    pub align_depth: Vec<u32>,
}

/// Type of the current token, from slot [`IDX_TYPE`].
#[must_use]
pub fn current_token_type(features: &FeatureVector) -> i32 {
    features[IDX_TYPE]
}

/// Source line recorded in a vector's informational slots.
#[must_use]
pub fn info_line(features: &FeatureVector) -> i32 {
    features[IDX_INFO_LINE]
}

/// Source column recorded in a vector's informational slots.
#[must_use]
pub fn info_charpos(features: &FeatureVector) -> i32 {
    features[IDX_INFO_CHARPOS]
}

/// One extraction pass over one document.
#[derive(Debug)]
pub struct FeatureExtractor<'d> {
    doc: &'d Document,
    tab_size: u32,
    index: Option<TreeIndex>,
    first_token_on_line: Option<usize>,
    features: Vec<FeatureVector>,
    inject_newlines: Vec<u32>,
    inject_ws: Vec<i32>,
    indent: Vec<i32>,
    align_depth: Vec<u32>,
}

impl<'d> FeatureExtractor<'d> {
    /// Extractor over `doc`, using the document's tab size.
    #[must_use]
    pub fn new(doc: &'d Document) -> Self {
        Self {
            doc,
            tab_size: doc.tab_size,
            index: None,
            first_token_on_line: None,
            features: Vec::new(),
            inject_newlines: Vec::new(),
            inject_ws: Vec::new(),
            indent: Vec::new(),
            align_depth: Vec::new(),
        }
    }

    /// Process every real token from the third onward.
    ///
    /// The first two real tokens are skipped because the two-token
    /// look-behind window is undefined for them.
    pub fn extract(&mut self) {
        let stream_indexes: Vec<usize> = self
            .doc
            .tokens
            .real_tokens()
            .iter()
            .map(|t| t.index)
            .collect();
        for &i in stream_indexes.iter().skip(2) {
            self.process_token(i);
        }
    }

    /// Compute the vector and labels for the token at stream position `i`.
    ///
    /// EOF produces nothing. Builds the tree index on the first call.
    ///
    /// # Panics
    ///
    /// Panics when a queried on-channel token is missing from the tree
    /// index, or when `i` has no on-channel predecessor; both violate the
    /// caller's invariants rather than describing recoverable states.
    pub fn process_token(&mut self, i: usize) {
        let doc = self.doc;
        let index = self
            .index
            .get_or_insert_with(|| TreeIndex::build(&doc.tree));

        let cur = doc.tokens.get(i);
        if cur.token_type == EOF {
            return;
        }
        let prev = on_channel_before(doc, i, 1);

        let features = node_features(index, doc, i);

        // How many lines to inject: newlines in the hidden text between
        // the previous and current token.
        let mut preceding_nl = 0u32;
        if cur.line > prev.line {
            for t in doc.tokens.hidden_tokens_to_left(i) {
                preceding_nl += count_newlines(&t.text);
            }
        }
        self.inject_newlines.push(preceding_nl);

        let mut column_delta = 0i32;
        let mut ws = 0i32;
        let mut levels = 0u32;
        if preceding_nl > 0 {
            if let Some(first) = self.first_token_on_line {
                column_delta = i32_col(cur.column) - i32_col(doc.tokens.get(first).column);
            }
            self.first_token_on_line = Some(i);

            if let Some(anchor) = alignment_ancestor(&doc.tree, &doc.tokens, i, self.tab_size) {
                let cur_leaf = leaf_or_panic(index, i);
                levels = doc
                    .tree
                    .ancestors_of(cur_leaf)
                    .position(|a| a == anchor)
                    .map_or(0, |p| u32::try_from(p).unwrap_or(0));
            }
        } else {
            ws = i32_col(cur.column) - (i32_col(prev.column) + i32_len(prev.text.len()));
        }

        self.indent.push(column_delta);
        self.inject_ws.push(ws);
        self.align_depth.push(levels);
        self.features.push(features);
    }

    /// Feature vectors accumulated so far.
    #[must_use]
    pub fn features(&self) -> &[FeatureVector] {
        &self.features
    }

    /// Newline counts accumulated so far.
    #[must_use]
    pub fn inject_newlines(&self) -> &[u32] {
        &self.inject_newlines
    }

    /// Whitespace counts accumulated so far.
    #[must_use]
    pub fn inject_ws(&self) -> &[i32] {
        &self.inject_ws
    }

    /// Indent deltas accumulated so far.
    #[must_use]
    pub fn indent(&self) -> &[i32] {
        &self.indent
    }

    /// Alignment depths accumulated so far.
    #[must_use]
    pub fn align_depth(&self) -> &[u32] {
        &self.align_depth
    }

    /// Consume the extractor, yielding its parallel outputs.
    #[must_use]
    pub fn into_observations(self) -> Observations {
        Observations {
            features: self.features,
            inject_newlines: self.inject_newlines,
            inject_ws: self.inject_ws,
            indent: self.indent,
            align_depth: self.align_depth,
        }
    }
}

/// Assemble the 14-slot vector for the token at stream position `i`.
///
/// # Panics
///
/// Panics when the previous token is missing from the tree index or `i`
/// has no on-channel predecessor (invariant violations).
#[must_use]
pub fn node_features(index: &TreeIndex, doc: &Document, i: usize) -> FeatureVector {
    let tokens = &doc.tokens;
    let cur = tokens.get(i);

    // 4-token window with the current token in third position.
    let prev = on_channel_before(doc, i, 1);
    let prev2_type = tokens.look_behind(i, 2).map_or(EOF, |t| t.token_type);
    let next_type = tokens.look_ahead(i, 1).map_or(EOF, |t| t.token_type);

    // Context of the previous token.
    let prev_leaf = leaf_or_panic(index, prev.index);
    let prev_parent = doc.tree.parent(prev_leaf);
    let prev_rule = prev_parent.and_then(|p| doc.tree.rule_index(p)).unwrap_or(-1);
    let prev_ancestor =
        prev_parent.and_then(|p| doc.tree.earliest_ancestor_stopping_at(p, prev.index));
    let (prev_anc_rule, prev_anc_width) = ancestor_rule_and_width(doc, prev_ancestor);

    // Context of the current token.
    let cur_leaf = leaf_or_panic(index, i);
    let cur_parent = doc.tree.parent(cur_leaf);
    let cur_rule = cur_parent.and_then(|p| doc.tree.rule_index(p)).unwrap_or(-1);
    let cur_ancestor = cur_parent.and_then(|p| doc.tree.earliest_ancestor_starting_at(p, i));
    let (anc_rule, anc_width) = ancestor_rule_and_width(doc, cur_ancestor);

    let prev_end_col = i32_col(prev.column) + i32_len(prev.text.len());

    [
        prev2_type,
        prev.token_type,
        prev_rule,
        prev_end_col,
        prev_anc_rule,
        prev_anc_width,
        cur.token_type,
        cur_rule,
        anc_rule,
        anc_width,
        next_type,
        // info
        0, // file placeholder
        i32_col(cur.line),
        i32_col(cur.column),
    ]
}

/// Extract every document, one extractor per document.
///
/// Documents are independent, so the corpus is processed in parallel;
/// output order matches input order.
#[must_use]
pub fn extract_documents(docs: &[Document]) -> Vec<Observations> {
    docs.par_iter()
        .map(|doc| {
            let mut extractor = FeatureExtractor::new(doc);
            extractor.extract();
            extractor.into_observations()
        })
        .collect()
}

/// Rule index and character width of an ancestor, or `(-1, -1)`.
fn ancestor_rule_and_width(doc: &Document, ancestor: Option<NodeId>) -> (i32, i32) {
    match ancestor {
        Some(id) => {
            let start = doc.tokens.get(doc.tree.start_token_index(id));
            let stop = doc.tokens.get(doc.tree.stop_token_index(id));
            let width = i32_len(stop.stop_offset()) - i32_len(start.start_offset) + 1;
            (doc.tree.rule_index(id).unwrap_or(-1), width)
        }
        None => (-1, -1),
    }
}

#[allow(clippy::panic)]
fn leaf_or_panic(index: &TreeIndex, token_index: usize) -> NodeId {
    index
        .leaf_for(token_index)
        .unwrap_or_else(|| panic!("token {token_index} missing from tree index"))
}

#[allow(clippy::panic)]
fn on_channel_before(doc: &Document, i: usize, n: usize) -> &Token {
    doc.tokens
        .look_behind(i, n)
        .unwrap_or_else(|| panic!("token {i} has no on-channel predecessor at depth {n}"))
}

#[allow(clippy::cast_possible_truncation)]
fn count_newlines(text: &str) -> u32 {
    text.bytes().filter(|&b| b == b'\n').count() as u32
}

#[allow(clippy::cast_possible_wrap)]
fn i32_col(v: u32) -> i32 {
    v as i32
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn i32_len(v: usize) -> i32 {
    v as i32
}
