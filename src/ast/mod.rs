//! Tree model for s-expressions.
//!
//! A form is either an opaque atom token or an ordered list of forms. Trees are
//! immutable once built: every transform in the crate returns a new tree.

// ============================================================================
// IMPORTS
// ============================================================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;

mod pretty;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// An atom token. Shared so that cloning a tree never copies token text.
pub type Token = Arc<str>;

/// The universal value type: an atom or a list of trees.
///
/// Equality is structural; atoms compare by exact token text.
///
/// # Examples
///
/// ```rust
/// use synrules::ast::Tree;
/// let form = Tree::list([Tree::atom("+"), Tree::atom("x"), Tree::atom("y")]);
/// assert_eq!(form.pretty(), "(+ x y)");
/// assert_eq!(form.head(), Some(&Tree::atom("+")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tree {
    Atom(Token),
    List(Vec<Tree>),
}

// ============================================================================
// CONSTRUCTORS AND ACCESSORS
// ============================================================================

impl Tree {
    pub fn atom(token: impl Into<Token>) -> Self {
        Tree::Atom(token.into())
    }

    pub fn list(items: impl IntoIterator<Item = Tree>) -> Self {
        Tree::List(items.into_iter().collect())
    }

    /// The empty list `()`.
    pub fn empty() -> Self {
        Tree::List(Vec::new())
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Tree::Atom(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Tree::List(_))
    }

    /// Returns the token text if this is an atom.
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Tree::Atom(token) => Some(token),
            Tree::List(_) => None,
        }
    }

    /// Returns the elements if this is a list.
    pub fn as_list(&self) -> Option<&[Tree]> {
        match self {
            Tree::List(items) => Some(items),
            Tree::Atom(_) => None,
        }
    }

    /// First element of a non-empty list.
    pub fn head(&self) -> Option<&Tree> {
        self.as_list().and_then(|items| items.first())
    }

    /// Calls `visit` on every atom token in left-to-right order.
    pub fn for_each_atom<'a>(&'a self, visit: &mut impl FnMut(&'a Token)) {
        match self {
            Tree::Atom(token) => visit(token),
            Tree::List(items) => {
                for item in items {
                    item.for_each_atom(&mut *visit);
                }
            }
        }
    }
}

impl From<&str> for Tree {
    fn from(token: &str) -> Self {
        Tree::atom(token)
    }
}

impl From<Vec<Tree>> for Tree {
    fn from(items: Vec<Tree>) -> Self {
        Tree::List(items)
    }
}
