//! Fixed-width textual rendering of feature vectors, for inspection only.
//!
//! Token-type and rule-index slots go through an externally supplied
//! [`Vocabulary`]; integer slots render right-justified, blank on the −1
//! sentinel. Nothing here carries a computational contract.

use crate::schema::{FeatureKind, FeatureVector, FEATURES, IDX_TYPE};
use crate::token::{Token, TokenStream, TokenType};

/// External name lookups for token types and grammar rules.
pub trait Vocabulary {
    /// Display name for a token type.
    fn token_name(&self, token_type: TokenType) -> String;
    /// Display name for a grammar rule index.
    fn rule_name(&self, rule_index: i32) -> String;
}

/// Render one vector as a single fixed-width row.
#[must_use]
pub fn render_vector(features: &FeatureVector, vocab: &dyn Vocabulary) -> String {
    let mut buf = String::new();
    for (i, meta) in FEATURES.iter().enumerate() {
        if i > 0 {
            buf.push(' ');
        }
        if i == IDX_TYPE {
            // Separate the previous-token group from the current one.
            buf.push_str("| ");
        }
        let width = meta.kind.display_width();
        match meta.kind {
            FeatureKind::Token => {
                let name = vocab.token_name(features[i]);
                let cell = center(&abbreviate_middle(&name, width), width);
                push_right(&mut buf, &cell, width);
            }
            FeatureKind::Rule => {
                if features[i] >= 0 {
                    let name = vocab.rule_name(features[i]);
                    push_right(&mut buf, &abbreviate_middle(&name, width), width);
                } else {
                    push_blank(&mut buf, width);
                }
            }
            FeatureKind::Int | FeatureKind::InfoLine | FeatureKind::InfoCharPos => {
                if features[i] >= 0 {
                    push_right(&mut buf, &features[i].to_string(), width);
                } else {
                    push_blank(&mut buf, width);
                }
            }
            FeatureKind::InfoFile => push_blank(&mut buf, width),
        }
    }
    buf
}

/// Three header rows: two label rows and an `=` separator.
#[must_use]
pub fn header() -> String {
    let mut buf = String::new();
    for row in 0..2 {
        for (i, meta) in FEATURES.iter().enumerate() {
            if i > 0 {
                buf.push(' ');
            }
            if i == IDX_TYPE {
                buf.push_str("| ");
            }
            let width = meta.kind.display_width();
            buf.push_str(&center(meta.header[row], width));
        }
        buf.push('\n');
    }
    for (i, meta) in FEATURES.iter().enumerate() {
        if i > 0 {
            buf.push(' ');
        }
        if i == IDX_TYPE {
            buf.push_str("| ");
        }
        buf.push_str(&"=".repeat(meta.kind.display_width()));
    }
    buf.push('\n');
    buf
}

/// Header plus one row per vector.
#[must_use]
pub fn render_table(rows: &[FeatureVector], vocab: &dyn Vocabulary) -> String {
    let mut buf = header();
    for row in rows {
        buf.push_str(&render_vector(row, vocab));
        buf.push('\n');
    }
    buf
}

/// Sketch of a detected alignment: the previous line with an arrow over
/// the anchor column, then the current token at its column.
#[must_use]
pub fn alignment_sketch(
    tokens: &TokenStream,
    cur: &Token,
    line_tokens: &[&Token],
    aligned: &Token,
) -> String {
    let Some(first) = line_tokens.first() else {
        return String::new();
    };
    let pad = (aligned.column.saturating_sub(first.column)) as usize;
    let mut buf = String::new();
    buf.push_str(&" ".repeat(pad));
    buf.push_str("\u{2193}\n");
    let last_index = line_tokens[line_tokens.len() - 1].index;
    for j in first.index..=last_index {
        buf.push_str(&tokens.get(j).text);
    }
    buf.push('\n');
    buf.push_str(&" ".repeat(pad));
    buf.push_str(&cur.text);
    buf.push('\n');
    buf
}

/// Shorten `s` to `width` by replacing the middle with `*`.
fn abbreviate_middle(s: &str, width: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if width < 3 || chars.len() <= width {
        return s.to_owned();
    }
    let target = width - 1;
    let head = target / 2 + target % 2;
    let tail = target / 2;
    let mut out: String = chars[..head].iter().collect();
    out.push('*');
    out.extend(&chars[chars.len() - tail..]);
    out
}

/// Center `s` in a field of `width`, extra padding on the right.
fn center(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.to_owned();
    }
    let pads = width - len;
    let left = pads / 2;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(pads - left))
}

fn push_right(buf: &mut String, s: &str, width: usize) {
    let len = s.chars().count();
    if len < width {
        buf.push_str(&" ".repeat(width - len));
    }
    buf.push_str(s);
}

fn push_blank(buf: &mut String, width: usize) {
    buf.push_str(&" ".repeat(width));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviate_keeps_short_names() {
        assert_eq!(abbreviate_middle("if", 12), "if");
    }

    #[test]
    fn abbreviate_replaces_middle() {
        assert_eq!(abbreviate_middle("abcdef", 4), "ab*f");
    }

    #[test]
    fn center_pads_right_heavy() {
        assert_eq!(center("ab", 5), " ab  ");
        assert_eq!(center("abcde", 3), "abcde");
    }
}
