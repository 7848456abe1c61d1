//! Tests for the fixed-width debug renderer.

use fmtlearn::alignment::{find_aligned_token, tokens_on_previous_line};
use fmtlearn::render::{alignment_sketch, header, render_table, render_vector, Vocabulary};
use fmtlearn::schema::{FeatureVector, NUM_FEATURES};
use fmtlearn::test_utils::DocBuilder;
use fmtlearn::token::TokenType;

struct TestVocab;

impl Vocabulary for TestVocab {
    fn token_name(&self, token_type: TokenType) -> String {
        format!("T{token_type}")
    }

    fn rule_name(&self, rule_index: i32) -> String {
        format!("rule{rule_index}")
    }
}

fn vector(fill: i32) -> FeatureVector {
    [fill; NUM_FEATURES]
}

#[test]
fn header_has_two_label_rows_and_separator() {
    let h = header();
    let lines: Vec<&str> = h.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[2].chars().all(|c| c == '=' || c == ' ' || c == '|'));
    // All three rows line up.
    assert_eq!(lines[0].len(), lines[1].len());
    assert_eq!(lines[1].len(), lines[2].len());
}

#[test]
fn rows_share_the_header_width() {
    let h = header();
    let row = render_vector(&vector(3), &TestVocab);
    assert_eq!(row.len(), h.lines().next().unwrap().len());
}

#[test]
fn sentinel_slots_render_blank() {
    let row = render_vector(&vector(-1), &TestVocab);
    // Rule and integer slots go blank on -1; token slots still render a
    // vocabulary name.
    assert!(row.contains("T-1"));
    // Rule and integer slots go blank, leaving only token names and the
    // group separator.
    let stripped = row.replace("T-1", "");
    assert!(stripped.chars().all(|c| c == ' ' || c == '|'));
}

#[test]
fn table_renders_header_then_rows() {
    let rows = vec![vector(1), vector(2)];
    let table = render_table(&rows, &TestVocab);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[3].contains("T1"));
    assert!(lines[4].contains("T2"));
}

#[test]
fn group_separator_splits_previous_from_current() {
    let row = render_vector(&vector(0), &TestVocab);
    assert_eq!(row.matches('|').count(), 1);
}

#[test]
fn alignment_sketch_marks_anchor_column() {
    // xs = [aa,
    //       bb]
    let mut b = DocBuilder::new();
    let l_xs = b.terminal(10, "xs", 1, 0);
    b.hidden(" ", 1, 2);
    let l_eq = b.terminal(11, "=", 1, 3);
    b.hidden(" ", 1, 4);
    let l_ob = b.terminal(11, "[", 1, 5);
    let l_aa = b.terminal(10, "aa", 1, 6);
    let l_comma = b.terminal(11, ",", 1, 8);
    b.hidden("\n      ", 1, 9);
    let l_bb = b.terminal(10, "bb", 2, 6);
    let l_cb = b.terminal(11, "]", 2, 8);
    let root = b.rule(
        0,
        vec![l_xs, l_eq, l_ob, l_aa, l_comma, l_bb, l_cb],
    );
    let doc = b.build(root, 4);

    // `bb` is stream index 8; its previous line is the whole first line.
    let line = tokens_on_previous_line(&doc.tokens, 8);
    let bb = doc.tokens.get(8);
    let aligned = find_aligned_token(&line, bb).unwrap();

    let sketch = alignment_sketch(&doc.tokens, bb, &line, aligned);
    assert_eq!(sketch, "      \u{2193}\nxs = [aa,\n      bb\n");
}
