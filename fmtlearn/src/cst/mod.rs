//! Building documents from real source via tree-sitter.

mod parser;

pub use parser::{parse_document, CstError};
