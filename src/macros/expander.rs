//! Template expander.
//!
//! Substitutes pattern variables into a template and unrolls ellipsis groups.
//! Atoms that are not bound are copied through as literal output text; the
//! expander never consults the literal set.
//!
//! ## Ellipsis groups
//!
//! For `sub ...` the expander collects the variables referenced in `sub` that
//! were captured under an ellipsis and expands `sub` once per capture, with each
//! such variable narrowed to its i-th form. All driving variables must have the
//! same number of captures. When `sub` references no repeated variable, the
//! bound variables it does reference drive the repetition with their full
//! capture sequences (so `(m x x)` / `(x ...)` yields both captures).

use crate::ast::{Token, Tree};
use crate::macros::error::ExpandError;
use crate::macros::types::{Bindings, MatchConfig};

/// Expands `template` with the default ellipsis marker.
///
/// # Examples
///
/// ```rust
/// use synrules::ast::Tree;
/// use synrules::macros::{expand_template, Bindings};
/// let bindings = Bindings::new().capture("x".into(), Tree::atom("42"));
/// let template = Tree::list([Tree::atom("quote"), Tree::atom("x")]);
/// let out = expand_template(&bindings, &template).unwrap();
/// assert_eq!(out.pretty(), "(quote 42)");
/// ```
pub fn expand_template(bindings: &Bindings, template: &Tree) -> Result<Tree, ExpandError> {
    Expander::new(&MatchConfig::default()).expand(bindings, template)
}

#[derive(Debug, Clone, Copy)]
pub struct Expander<'a> {
    config: &'a MatchConfig,
}

impl<'a> Expander<'a> {
    pub fn new(config: &'a MatchConfig) -> Self {
        Expander { config }
    }

    pub fn expand(&self, bindings: &Bindings, template: &Tree) -> Result<Tree, ExpandError> {
        match template {
            Tree::Atom(token) => substitute_atom(bindings, token, template),
            Tree::List(items) => self.expand_seq(bindings, items).map(Tree::List),
        }
    }

    fn expand_seq(&self, bindings: &Bindings, items: &[Tree]) -> Result<Vec<Tree>, ExpandError> {
        let mut out = Vec::with_capacity(items.len());
        let mut rest = items;
        loop {
            match rest {
                [] => return Ok(out),
                [repeated, marker, tail @ ..] if self.config.is_ellipsis(marker) => {
                    out.extend(self.expand_repeated(bindings, repeated)?);
                    rest = tail;
                }
                [head, tail @ ..] => {
                    out.push(self.expand(bindings, head)?);
                    rest = tail;
                }
            }
        }
    }

    fn expand_repeated(&self, bindings: &Bindings, repeated: &Tree) -> Result<Vec<Tree>, ExpandError> {
        let drivers = driving_variables(bindings, repeated);
        let Some((first, first_forms)) = drivers.first() else {
            return Err(ExpandError::UnboundEllipsisVariable {
                template: repeated.clone(),
            });
        };

        let count = first_forms.len();
        if let Some((other, other_forms)) = drivers.iter().find(|(_, forms)| forms.len() != count) {
            return Err(ExpandError::EllipsisLengthMismatch {
                template: repeated.clone(),
                first: first.clone(),
                first_len: count,
                other: other.clone(),
                other_len: other_forms.len(),
            });
        }

        (0..count)
            .map(|i| {
                let narrowed = drivers.iter().fold(bindings.clone(), |acc, (var, forms)| {
                    acc.with_single(var.clone(), forms[i].clone())
                });
                self.expand(&narrowed, repeated)
            })
            .collect()
    }
}

fn substitute_atom(bindings: &Bindings, token: &Token, template: &Tree) -> Result<Tree, ExpandError> {
    match bindings.get(token) {
        None => Ok(template.clone()),
        Some(forms) => forms
            .front()
            .cloned()
            .ok_or_else(|| ExpandError::EmptyCapture { var: token.clone() }),
    }
}

// Variables that drive one ellipsis group, in first-reference order, with their captures.
fn driving_variables(bindings: &Bindings, repeated: &Tree) -> Vec<(Token, Vec<Tree>)> {
    let mut referenced: Vec<&Token> = Vec::new();
    repeated.for_each_atom(&mut |token| {
        if bindings.contains(token) && !referenced.contains(&token) {
            referenced.push(token);
        }
    });

    let any_repeated = referenced.iter().any(|var| bindings.is_repeated(var));
    referenced
        .into_iter()
        .filter(|var| !any_repeated || bindings.is_repeated(var))
        .filter_map(|var| {
            let forms = bindings.get(var)?;
            Some((var.clone(), forms.iter().cloned().collect()))
        })
        .collect()
}
