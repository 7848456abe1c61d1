//! Core library of fmtlearn, a code-formatter-by-example tool.
//!
//! Given a source file already parsed into a concrete syntax tree and its
//! token stream, this library produces, for every real token, a
//! fixed-width numeric context vector plus parallel layout labels
//! (newline count, injected whitespace, indentation delta, and
//! vertical-alignment depth). A nearest-neighbor model consumes these to
//! learn and predict how to lay out unformatted code; the parser, the
//! classifier, and the final re-rendering live outside this crate.

// Allow common complexity warnings - these are intentional design choices
#![allow(clippy::similar_names, clippy::items_after_statements)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module for vertical-alignment detection.
/// Decides whether a new line's column aligns with a previous-line token.
pub mod alignment;

/// Module for ancestor analysis over the parse-tree arena.
pub mod ancestry;

/// Module for loading configuration.
pub mod config;

/// Module for building documents from real Python source via tree-sitter.
#[cfg(feature = "cst")]
pub mod cst;

/// Module containing the feature extractor.
/// This assembles per-token context vectors and layout labels.
pub mod features;

/// Module containing the token-to-leaf tree index.
pub mod index;

/// Module for fixed-width textual rendering of feature vectors.
pub mod render;

/// Module defining the static feature-slot schema and mismatch costs.
pub mod schema;

/// Module containing test utilities.
/// This helps in constructing documents for extractor and detector tests.
pub mod test_utils;

/// Module defining the token model and token stream.
pub mod token;

/// Module defining the arena parse tree and per-file document.
pub mod tree;
