// tests/parser_tests.rs

use pretty_assertions::assert_eq;
use synrules::ast::Tree;
use synrules::{parse, parse_one, SourceContext, SynRulesError};

fn parse_all(text: &str) -> Vec<Tree> {
    parse(text, SourceContext::inline(text)).unwrap()
}

fn parse_err(text: &str) -> SynRulesError {
    parse(text, SourceContext::inline(text)).unwrap_err()
}

// ---
// Reader
// ---

#[test]
fn test_parse_nested_form() {
    let forms = parse_all("(define (f x) (g [x] {y}))");
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].pretty(), "(define (f x) (g (x) (y)))");
}

#[test]
fn test_atoms_keep_their_text() {
    let forms = parse_all("(\"str\" 1.5e3 #t 'q ... a->b)");
    let atoms: Vec<_> = forms[0]
        .as_list()
        .unwrap()
        .iter()
        .map(|tree| tree.as_atom().unwrap().to_string())
        .collect();
    assert_eq!(atoms, ["\"str\"", "1.5e3", "#t", "'q", "...", "a->b"]);
}

#[test]
fn test_whitespace_is_insignificant() {
    assert_eq!(parse_all("(a\n\t b   (c))"), parse_all("(a b (c))"));
}

#[test]
fn test_top_level_atoms_and_lists() {
    let forms = parse_all("a (b) () c");
    assert_eq!(
        forms,
        vec![
            Tree::atom("a"),
            Tree::list([Tree::atom("b")]),
            Tree::empty(),
            Tree::atom("c"),
        ]
    );
}

#[test]
fn test_empty_source_has_no_forms() {
    assert!(parse_all("").is_empty());
    assert!(parse_all("  \n ").is_empty());
}

#[test]
fn test_parse_one_rejects_multiple_forms() {
    let err = parse_one("(a) (b)", SourceContext::inline("(a) (b)")).unwrap_err();
    assert!(matches!(err, SynRulesError::ParseCount { found: 2, .. }));
}

#[test]
fn test_parse_one_rejects_empty_source() {
    let err = parse_one("", SourceContext::inline("")).unwrap_err();
    assert!(matches!(err, SynRulesError::ParseCount { found: 0, .. }));
}

// ---
// Delimiter errors
// ---

#[test]
fn test_missing_close_is_reported() {
    match parse_err("(let ((x 1)") {
        SynRulesError::ParseUnbalanced { message, .. } => assert_eq!(message, "missing closing ')'"),
        other => panic!("expected ParseUnbalanced, got {:?}", other),
    }
}

#[test]
fn test_extra_close_is_reported() {
    match parse_err("(a))") {
        SynRulesError::ParseUnbalanced { message, .. } => assert_eq!(message, "unexpected closing ')'"),
        other => panic!("expected ParseUnbalanced, got {:?}", other),
    }
}

#[test]
fn test_mismatched_brackets_are_reported() {
    match parse_err("(a [b)]") {
        SynRulesError::ParseUnbalanced { message, .. } => assert_eq!(message, "'[' closed by ')'"),
        other => panic!("expected ParseUnbalanced, got {:?}", other),
    }
}

// ---
// Writer
// ---

#[test]
fn test_writer_uses_canonical_layout() {
    let forms = parse_all("(  a   [b  c]  ()  )");
    assert_eq!(forms[0].pretty(), "(a (b c) ())");
}

#[test]
fn test_writer_and_reader_are_inverse() {
    for text in ["x", "()", "(a (b (c ())) d)", "((lambda (x y) (+ x y) (foo)) 1 2)"] {
        let tree = parse_one(text, SourceContext::inline(text)).unwrap();
        let written = tree.pretty();
        assert_eq!(written, text);
        assert_eq!(parse_one(&written, SourceContext::inline(written.as_str())).unwrap(), tree);
    }
}

#[test]
fn test_wrapped_output_reads_back_identically() {
    let text = "(define-syntax my-let (syntax-rules () ((_ ((v e) ...) b ...) ((lambda (v ...) b ...) e ...))))";
    let tree = parse_one(text, SourceContext::inline(text)).unwrap();
    for width in [1, 10, 30, 200] {
        let wrapped = tree.pretty_width(width);
        let reread = parse_one(&wrapped, SourceContext::inline(wrapped.as_str())).unwrap();
        assert_eq!(reread, tree, "width {}", width);
    }
    assert_eq!(tree.pretty_width(200), text);
}
