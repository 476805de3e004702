//! Core macro types: literal sets, bindings, rules and match settings.
//!
//! This module has no dependencies on the other macro modules.

use im::{OrdMap, OrdSet, Vector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::ast::{Token, Tree};

/// The default ellipsis marker.
pub const DEFAULT_ELLIPSIS: &str = "...";

// ============================================================================
// LITERALS
// ============================================================================

/// Tokens that must appear verbatim in a form and are never bound as variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralSet(BTreeSet<Token>);

impl LiteralSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn insert(&mut self, token: impl Into<Token>) -> bool {
        self.0.insert(token.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|token| &**token)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Into<Token>> FromIterator<T> for LiteralSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        LiteralSet(iter.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// BINDINGS
// ============================================================================

/// Pattern variable environment produced by one successful match.
///
/// Each variable maps to the forms it captured, in encounter order. A variable
/// seen once outside any ellipsis holds exactly one form; a variable inside an
/// ellipsis sub-pattern is marked repeated and holds one form per repetition
/// (possibly none).
///
/// Bindings are persistent: `capture` and friends take `self` by value and
/// return the extended environment, and clones share structure.
///
/// # Examples
///
/// ```rust
/// use synrules::ast::Tree;
/// use synrules::macros::Bindings;
/// let bindings = Bindings::new()
///     .capture("x".into(), Tree::atom("1"))
///     .capture("x".into(), Tree::atom("2"));
/// assert_eq!(bindings.first("x"), Some(&Tree::atom("1")));
/// assert_eq!(bindings.get("x").map(|forms| forms.len()), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bindings {
    captures: OrdMap<Token, Vector<Tree>>,
    repeated: OrdSet<Token>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `form` to the captures of `var`.
    pub fn capture(mut self, var: Token, form: Tree) -> Self {
        let mut forms = self.captures.get(&var).cloned().unwrap_or_default();
        forms.push_back(form);
        self.captures.insert(var, forms);
        self
    }

    /// Marks `var` as captured under an ellipsis, creating an empty entry if absent.
    pub fn declare_repeated(mut self, var: Token) -> Self {
        if !self.captures.contains_key(&var) {
            self.captures.insert(var.clone(), Vector::new());
        }
        self.repeated.insert(var);
        self
    }

    /// Replaces the captures of `var` with the single form `form`.
    pub fn with_single(mut self, var: Token, form: Tree) -> Self {
        self.captures.insert(var, Vector::unit(form));
        self
    }

    pub fn get(&self, var: &str) -> Option<&Vector<Tree>> {
        self.captures.get(var)
    }

    /// The first form captured by `var`.
    pub fn first(&self, var: &str) -> Option<&Tree> {
        self.get(var).and_then(|forms| forms.front())
    }

    pub fn contains(&self, var: &str) -> bool {
        self.captures.contains_key(var)
    }

    pub fn is_repeated(&self, var: &str) -> bool {
        self.repeated.contains(var)
    }

    /// Variables and their captures, sorted by variable name.
    pub fn iter(&self) -> impl Iterator<Item = (&Token, &Vector<Tree>)> {
        self.captures.iter()
    }

    pub fn len(&self) -> usize {
        self.captures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }
}

impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (var, forms)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            if self.is_repeated(var) {
                write!(f, "{} ... =", var)?;
            } else {
                write!(f, "{} =", var)?;
            }
            for form in forms {
                write!(f, " {}", form)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// RULES AND SETTINGS
// ============================================================================

/// A pattern/template pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub pattern: Tree,
    pub template: Tree,
}

impl Rule {
    pub fn new(pattern: Tree, template: Tree) -> Self {
        Rule { pattern, template }
    }
}

/// What to do when a list pattern runs out while the form still has elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingPolicy {
    /// Unconsumed form elements are a structural mismatch.
    #[default]
    Strict,
    /// An exhausted pattern matches whatever is left of the form.
    Lenient,
}

/// Settings shared by the matcher and the expander.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    pub ellipsis: Token,
    pub trailing: TrailingPolicy,
    /// Skip the first element of the form and of every pattern.
    pub ignore_keyword: bool,
}

impl MatchConfig {
    pub fn is_ellipsis(&self, tree: &Tree) -> bool {
        tree.as_atom() == Some(&*self.ellipsis)
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            ellipsis: DEFAULT_ELLIPSIS.into(),
            trailing: TrailingPolicy::Strict,
            ignore_keyword: false,
        }
    }
}
