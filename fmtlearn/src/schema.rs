//! Static description of the feature-vector layout.
//!
//! Fixed-shape configuration, not runtime state: the slot order, the
//! semantic kind of each slot, and the per-slot mismatch costs the
//! external nearest-neighbor classifier uses to bound its distance metric.

use serde::Serialize;

/// Number of slots in a feature vector.
pub const NUM_FEATURES: usize = 14;

/// One per-token context vector, in the slot order of the `IDX_*` constants.
pub type FeatureVector = [i32; NUM_FEATURES];

/// Type of the token two positions back.
pub const IDX_PREV2_TYPE: usize = 0;
/// Type of the previous token.
pub const IDX_PREV_TYPE: usize = 1;
/// Rule index of the previous token's immediate enclosing rule.
pub const IDX_PREV_RULE: usize = 2;
/// Previous token's end column.
pub const IDX_PREV_END_COLUMN: usize = 3;
/// Rule index of the previous token's outermost stopping ancestor.
pub const IDX_PREV_EARLIEST_ANCESTOR: usize = 4;
/// Width in characters of that ancestor.
pub const IDX_PREV_ANCESTOR_WIDTH: usize = 5;
/// Type of the current token.
pub const IDX_TYPE: usize = 6;
/// Rule index of the current token's immediate enclosing rule.
pub const IDX_RULE: usize = 7;
/// Rule index of the current token's outermost starting ancestor.
pub const IDX_EARLIEST_ANCESTOR: usize = 8;
/// Width in characters of that ancestor.
pub const IDX_ANCESTOR_WIDTH: usize = 9;
/// Type of the next token.
pub const IDX_NEXT_TYPE: usize = 10;
/// Source file placeholder (always 0 here).
pub const IDX_INFO_FILE: usize = 11;
/// Source line of the current token.
pub const IDX_INFO_LINE: usize = 12;
/// Source column of the current token.
pub const IDX_INFO_CHARPOS: usize = 13;

/// Semantic category of a feature slot, with its display width for the
/// debug renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Token-type slot, rendered through the vocabulary.
    Token,
    /// Rule-index slot, rendered through the rule-name table.
    Rule,
    /// Plain integer slot.
    Int,
    /// Informational file id, not compared.
    InfoFile,
    /// Informational source line, not compared.
    InfoLine,
    /// Informational source column, not compared.
    InfoCharPos,
}

impl FeatureKind {
    /// Column width the debug renderer allots to slots of this kind.
    #[must_use]
    pub const fn display_width(self) -> usize {
        match self {
            Self::Token => 12,
            Self::Rule => 14,
            Self::Int => 7,
            Self::InfoFile => 8,
            Self::InfoLine | Self::InfoCharPos => 4,
        }
    }
}

/// Static metadata for one feature slot.
#[derive(Debug, Clone, Copy)]
pub struct FeatureMeta {
    /// Semantic category.
    pub kind: FeatureKind,
    /// Two header rows for the debug renderer.
    pub header: [&'static str; 2],
    /// How much one differing slot may contribute to the classifier's
    /// distance; 0 for slots the classifier never compares.
    pub mismatch_cost: u32,
}

const fn meta(kind: FeatureKind, header: [&'static str; 2], mismatch_cost: u32) -> FeatureMeta {
    FeatureMeta {
        kind,
        header,
        mismatch_cost,
    }
}

/// Slot metadata in vector order.
pub const FEATURES: [FeatureMeta; NUM_FEATURES] = [
    meta(FeatureKind::Token, ["", "LT(-2)"], 1),
    meta(FeatureKind::Token, ["", "LT(-1)"], 2),
    meta(FeatureKind::Rule, ["LT(-1)", "rule"], 2),
    meta(FeatureKind::Int, ["LT(-1)", "end col"], 0),
    meta(FeatureKind::Rule, ["LT(-1)", "right ancestor"], 3),
    meta(FeatureKind::Int, ["ancest.", "width"], 0),
    meta(FeatureKind::Token, ["", "LT(1)"], 2),
    meta(FeatureKind::Rule, ["LT(1)", "rule"], 2),
    meta(FeatureKind::Rule, ["LT(1)", "left ancestor"], 3),
    meta(FeatureKind::Int, ["ancest.", "width"], 0),
    meta(FeatureKind::Token, ["", "LT(2)"], 2),
    meta(FeatureKind::InfoFile, ["", "file"], 0),
    meta(FeatureKind::InfoLine, ["", "line"], 0),
    meta(FeatureKind::InfoCharPos, ["char", "pos"], 0),
];

const fn sum_mismatch_costs() -> u32 {
    let mut n = 0;
    let mut i = 0;
    while i < NUM_FEATURES {
        n += FEATURES[i].mismatch_cost;
        i += 1;
    }
    n
}

/// Upper bound on the L0 distance between any two feature vectors; the
/// classifier relies on this equaling the sum of all mismatch costs.
pub const MAX_L0_DISTANCE_COUNT: u32 = sum_mismatch_costs();

/// Context-difference threshold the classifier applies when deciding
/// whether two vectors describe comparable contexts.
pub const MAX_CONTEXT_DIFF_THRESHOLD: f64 = 0.10;
