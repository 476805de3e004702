//! synrules parser.
//!
//! Converts source text into `Tree`s using the pest grammar in `grammar.pest`.

use pest::{error::Error, iterators::Pair, Parser};
use pest_derive::Parser;

use crate::ast::Tree;
use crate::errors::{to_source_span, SourceContext, SynRulesError};

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct FormParser;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse source text into zero or more top-level forms.
///
/// ```rust
/// use synrules::syntax::parse;
/// use synrules::SourceContext;
/// let forms = parse("(a [b] {c}) d", SourceContext::inline("")).unwrap();
/// assert_eq!(forms.len(), 2);
/// assert_eq!(forms[0].pretty(), "(a (b) (c))");
/// ```
pub fn parse(source_text: &str, source_context: SourceContext) -> Result<Vec<Tree>, SynRulesError> {
    Ok(parse_spanned(source_text, &source_context)?
        .into_iter()
        .map(|(tree, _)| tree)
        .collect())
}

/// Parse source text that must contain exactly one form.
pub fn parse_one(source_text: &str, source_context: SourceContext) -> Result<Tree, SynRulesError> {
    let mut forms = parse_spanned(source_text, &source_context)?;
    match forms.len() {
        1 => Ok(forms.remove(0).0),
        0 => Err(SynRulesError::ParseCount {
            found: 0,
            src: source_context.to_named_source(),
            span: to_source_span(0, source_text.len()),
        }),
        found => {
            let (start, end) = forms[1].1;
            Err(SynRulesError::ParseCount {
                found,
                src: source_context.to_named_source(),
                span: to_source_span(start, end),
            })
        }
    }
}

// ============================================================================
// TREE BUILDERS
// ============================================================================

type Spanned = (Tree, (usize, usize));

fn parse_spanned(source_text: &str, source: &SourceContext) -> Result<Vec<Spanned>, SynRulesError> {
    if source_text.trim().is_empty() {
        return Ok(vec![]);
    }

    let mut pairs = FormParser::parse(Rule::program, source_text)
        .map_err(|e| convert_parse_error(e, source_text, source))?;
    let Some(program) = pairs.next() else {
        return Ok(vec![]);
    };

    program
        .into_inner()
        .filter(|p| p.as_rule() != Rule::EOI)
        .map(|p| {
            let span = (p.as_span().start(), p.as_span().end());
            build_tree(p, source).map(|tree| (tree, span))
        })
        .collect()
}

fn build_tree(pair: Pair<Rule>, source: &SourceContext) -> Result<Tree, SynRulesError> {
    match pair.as_rule() {
        Rule::atom => Ok(Tree::atom(pair.as_str())),
        Rule::list => {
            let children: Result<Vec<_>, _> =
                pair.into_inner().map(|p| build_tree(p, source)).collect();
            Ok(Tree::List(children?))
        }
        rule => Err(SynRulesError::ParseMalformed {
            construct: format!("form (unsupported rule {:?})", rule),
            src: source.to_named_source(),
            span: to_source_span(pair.as_span().start(), pair.as_span().end()),
            help: None,
        }),
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

struct Unbalanced {
    start: usize,
    end: usize,
    message: String,
    label: String,
    help: Option<String>,
}

fn closer_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

// Atoms cannot fail to parse, so every syntax error is a delimiter problem.
fn find_unbalanced(text: &str) -> Option<Unbalanced> {
    let mut open: Vec<(usize, char)> = Vec::new();
    for (pos, ch) in text.char_indices() {
        match ch {
            '(' | '[' | '{' => open.push((pos, ch)),
            ')' | ']' | '}' => match open.pop() {
                None => {
                    return Some(Unbalanced {
                        start: pos,
                        end: pos + 1,
                        message: format!("unexpected closing '{}'", ch),
                        label: "nothing to close here".to_string(),
                        help: Some("remove the extra delimiter".to_string()),
                    })
                }
                Some((_, opener)) if closer_for(opener) != ch => {
                    return Some(Unbalanced {
                        start: pos,
                        end: pos + 1,
                        message: format!("'{}' closed by '{}'", opener, ch),
                        label: format!("expected '{}'", closer_for(opener)),
                        help: None,
                    })
                }
                Some(_) => {}
            },
            _ => {}
        }
    }
    open.pop().map(|(pos, opener)| Unbalanced {
        start: pos,
        end: pos + 1,
        message: format!("missing closing '{}'", closer_for(opener)),
        label: "opened here".to_string(),
        help: Some(format!("add '{}' to close this list", closer_for(opener))),
    })
}

fn convert_parse_error(error: Error<Rule>, text: &str, source: &SourceContext) -> SynRulesError {
    if let Some(found) = find_unbalanced(text) {
        return SynRulesError::ParseUnbalanced {
            message: found.message,
            label: found.label,
            src: source.to_named_source(),
            span: to_source_span(found.start, found.end),
            help: found.help,
        };
    }

    let (start, end) = match error.location {
        pest::error::InputLocation::Pos(pos) => (pos, pos),
        pest::error::InputLocation::Span((start, end)) => (start, end),
    };
    SynRulesError::ParseMalformed {
        construct: "form".to_string(),
        src: source.to_named_source(),
        span: to_source_span(start, end),
        help: Some(error.variant.message().to_string()),
    }
}

/// Test helper: parses exactly one form or panics.
#[cfg(test)]
pub(crate) fn read(source_text: &str) -> Tree {
    parse_one(source_text, SourceContext::inline(source_text)).expect("test source must parse")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(text: &str) -> SourceContext {
        SourceContext::from_file("test", text)
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("", ctx("")).unwrap().is_empty());
        assert!(parse("  \n\t ", ctx("")).unwrap().is_empty());
    }

    #[test]
    fn test_atoms_are_opaque() {
        let forms = parse(r#"42 "str" #t a.b ... ;x"#, ctx("")).unwrap();
        let tokens: Vec<_> = forms.iter().filter_map(Tree::as_atom).collect();
        assert_eq!(tokens, ["42", "\"str\"", "#t", "a.b", "...", ";x"]);
    }

    #[test]
    fn test_bracket_kinds_build_lists() {
        assert_eq!(read("[a {b} (c)]"), read("(a (b) (c))"));
    }

    #[test]
    fn test_atoms_end_at_delimiters() {
        assert_eq!(read("(a(b)c)").pretty(), "(a (b) c)");
    }

    #[test]
    fn test_unclosed_list_fails() {
        let err = parse("(a (b c)", ctx("(a (b c)")).unwrap_err();
        assert!(
            matches!(err, SynRulesError::ParseUnbalanced { ref message, .. } if message == "missing closing ')'")
        );
    }

    #[test]
    fn test_mismatched_closer_fails() {
        let err = parse("(a b]", ctx("(a b]")).unwrap_err();
        assert!(
            matches!(err, SynRulesError::ParseUnbalanced { ref message, .. } if message == "'(' closed by ']'")
        );
    }

    #[test]
    fn test_stray_closer_fails() {
        let err = parse("a)", ctx("a)")).unwrap_err();
        assert!(matches!(err, SynRulesError::ParseUnbalanced { .. }));
    }

    #[test]
    fn test_parse_one_counts_forms() {
        assert!(matches!(
            parse_one("", ctx("")),
            Err(SynRulesError::ParseCount { found: 0, .. })
        ));
        assert!(matches!(
            parse_one("(a) (b)", ctx("(a) (b)")),
            Err(SynRulesError::ParseCount { found: 2, .. })
        ));
        assert_eq!(parse_one(" (a) ", ctx(" (a) ")).unwrap(), read("(a)"));
    }
}
