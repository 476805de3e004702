//! Pattern matcher.
//!
//! Walks a pattern and a form left to right, head then tail, threading a
//! persistent `Bindings` through every step. The first failing sub-match ends
//! the attempt and the partially built bindings are dropped with it.

use crate::ast::{Token, Tree};
use crate::macros::error::MatchError;
use crate::macros::types::{Bindings, LiteralSet, MatchConfig, TrailingPolicy};

/// Matches `form` against `pattern` with the default settings.
///
/// # Examples
///
/// ```rust
/// use synrules::ast::Tree;
/// use synrules::macros::{match_pattern, LiteralSet};
/// let pattern = Tree::list([Tree::atom("v"), Tree::atom("...")]);
/// let form = Tree::list([Tree::atom("a"), Tree::atom("b")]);
/// let bindings = match_pattern(&form, &LiteralSet::new(), &pattern).unwrap();
/// assert_eq!(bindings.get("v").map(|forms| forms.len()), Some(2));
/// ```
pub fn match_pattern(
    form: &Tree,
    literals: &LiteralSet,
    pattern: &Tree,
) -> Result<Bindings, MatchError> {
    Matcher::new(literals, &MatchConfig::default()).match_form(form, pattern)
}

/// A matcher bound to one literal set and one configuration.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    literals: &'a LiteralSet,
    config: &'a MatchConfig,
}

impl<'a> Matcher<'a> {
    pub fn new(literals: &'a LiteralSet, config: &'a MatchConfig) -> Self {
        Matcher { literals, config }
    }

    /// Matches a whole form, starting from empty bindings.
    pub fn match_form(&self, form: &Tree, pattern: &Tree) -> Result<Bindings, MatchError> {
        self.match_tree(form, pattern, Bindings::new())
    }

    /// Matches a macro call against a rule pattern. With `ignore_keyword` set,
    /// the head of both is skipped and never bound.
    pub fn match_rule(&self, form: &Tree, pattern: &Tree) -> Result<Bindings, MatchError> {
        if !self.config.ignore_keyword {
            return self.match_form(form, pattern);
        }
        match (form, pattern) {
            (Tree::List(forms), Tree::List(patterns)) if !forms.is_empty() && !patterns.is_empty() => {
                self.match_seq(&forms[1..], &patterns[1..], Bindings::new())
            }
            _ => Err(MatchError::StructuralMismatch {
                reason: "keyword position needs a non-empty list",
                pattern: pattern.clone(),
                form: form.clone(),
            }),
        }
    }

    fn match_tree(
        &self,
        form: &Tree,
        pattern: &Tree,
        bindings: Bindings,
    ) -> Result<Bindings, MatchError> {
        match (pattern, form) {
            (Tree::Atom(token), _) => self.match_atom(form, token, bindings),
            (Tree::List(patterns), Tree::List(forms)) => self.match_seq(forms, patterns, bindings),
            (Tree::List(patterns), Tree::Atom(_)) => {
                if patterns.is_empty() && self.config.trailing == TrailingPolicy::Lenient {
                    Ok(bindings)
                } else {
                    Err(MatchError::StructuralMismatch {
                        reason: "list pattern met an atom",
                        pattern: pattern.clone(),
                        form: form.clone(),
                    })
                }
            }
        }
    }

    fn match_atom(
        &self,
        form: &Tree,
        token: &Token,
        bindings: Bindings,
    ) -> Result<Bindings, MatchError> {
        if !self.literals.contains(token) {
            return Ok(bindings.capture(token.clone(), form.clone()));
        }
        match form {
            Tree::Atom(found) if found == token => Ok(bindings),
            _ => Err(MatchError::LiteralMismatch {
                expected: token.clone(),
                found: form.clone(),
            }),
        }
    }

    // Head/tail walk over the list spine. Iterative so long lists don't grow the stack.
    fn match_seq(
        &self,
        forms: &[Tree],
        patterns: &[Tree],
        mut bindings: Bindings,
    ) -> Result<Bindings, MatchError> {
        let mut forms = forms;
        let mut patterns = patterns;
        loop {
            match patterns {
                [] => {
                    if forms.is_empty() || self.config.trailing == TrailingPolicy::Lenient {
                        return Ok(bindings);
                    }
                    return Err(MatchError::structural(
                        "form has elements past the end of the pattern",
                        patterns,
                        forms,
                    ));
                }
                [repeated, marker, rest @ ..] if self.config.is_ellipsis(marker) => {
                    bindings = self.declare_repeated(repeated, bindings);
                    for form in forms {
                        bindings = self.match_tree(form, repeated, bindings)?;
                    }
                    forms = &[];
                    patterns = rest;
                }
                [head, rest @ ..] => {
                    let Some((form, form_rest)) = forms.split_first() else {
                        return Err(MatchError::structural(
                            "form ran out before the pattern",
                            patterns,
                            forms,
                        ));
                    };
                    bindings = self.match_tree(form, head, bindings)?;
                    forms = form_rest;
                    patterns = rest;
                }
            }
        }
    }

    // Every variable under an ellipsis gets an entry, even if it repeats zero times.
    fn declare_repeated(&self, repeated: &Tree, bindings: Bindings) -> Bindings {
        let mut bindings = bindings;
        repeated.for_each_atom(&mut |token| {
            if !self.literals.contains(token) && **token != *self.config.ellipsis {
                bindings = std::mem::take(&mut bindings).declare_repeated(token.clone());
            }
        });
        bindings
    }
}
