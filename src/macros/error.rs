//! Error kinds for matching, expansion and dispatch.
//!
//! `MatchError` only lives for one match attempt: the dispatcher logs it and
//! moves on to the next rule. `ExpandError` is a template-authoring error.
//! `DispatchError` is what a caller of the dispatcher sees.

use thiserror::Error;

use crate::ast::{Token, Tree};

/// Why a form failed to match a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// A literal in the pattern met a different form.
    #[error("expected literal '{expected}', found {found}")]
    LiteralMismatch { expected: Token, found: Tree },

    /// The form's shape does not fit the pattern's shape.
    #[error("{reason}: pattern {pattern}, form {form}")]
    StructuralMismatch {
        reason: &'static str,
        pattern: Tree,
        form: Tree,
    },
}

impl MatchError {
    pub(crate) fn structural(reason: &'static str, pattern: &[Tree], form: &[Tree]) -> Self {
        MatchError::StructuralMismatch {
            reason,
            pattern: Tree::list(pattern.iter().cloned()),
            form: Tree::list(form.iter().cloned()),
        }
    }
}

/// A template that cannot be expanded with the bindings it was given.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    /// An ellipsis sub-template references no bound pattern variable, so there
    /// is nothing to repeat over.
    #[error("ellipsis template {template} references no bound pattern variable")]
    UnboundEllipsisVariable { template: Tree },

    /// Two variables driving the same ellipsis captured different numbers of forms.
    #[error(
        "ellipsis template {template} repeats '{first}' {first_len} times but '{other}' {other_len} times"
    )]
    EllipsisLengthMismatch {
        template: Tree,
        first: Token,
        first_len: usize,
        other: Token,
        other_len: usize,
    },

    /// A repeated variable that matched zero forms was used outside an ellipsis.
    #[error("pattern variable '{var}' captured no forms and is used outside an ellipsis")]
    EmptyCapture { var: Token },
}

/// Outcome of a dispatch that produced no tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("no rule matched {form} ({tried} rules tried)")]
    NoRuleMatched { form: Tree, tried: usize },

    #[error("rule {rule} matched but its template failed: {source}")]
    Expand {
        rule: usize,
        #[source]
        source: ExpandError,
    },

    #[error("no macro named '{name}'")]
    UnknownMacro { name: String, known: Vec<String> },

    /// A table lookup needs `(name arg ...)` with an atom in head position.
    #[error("{form} is not a macro call")]
    NotAMacroCall { form: Tree },
}
