//! Form writer: renders trees back to text.
//!
//! The flat rendering is the canonical one (`(a (b c) ())`). The width-limited
//! layout breaks lists across lines but re-reads to the same tree.

use std::fmt;

use unicode_width::UnicodeWidthStr;

use super::Tree;

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tree::Atom(token) => f.write_str(token),
            Tree::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl Tree {
    /// Flat rendering: single spaces between elements, `()` for empty lists.
    pub fn pretty(&self) -> String {
        self.to_string()
    }

    /// Multi-line rendering that keeps each line within `width` columns
    /// where possible. Atoms are never split.
    ///
    /// ```rust
    /// use synrules::ast::Tree;
    /// let form = Tree::list([Tree::atom("f"), Tree::atom("argument-one"), Tree::atom("argument-two")]);
    /// assert_eq!(form.pretty_width(80), "(f argument-one argument-two)");
    /// assert_eq!(form.pretty_width(10), "(f\n argument-one\n argument-two)");
    /// ```
    pub fn pretty_width(&self, width: usize) -> String {
        let mut out = String::new();
        write_block(self, 0, width, &mut out);
        out
    }
}

fn write_block(tree: &Tree, indent: usize, width: usize, out: &mut String) {
    let flat = tree.pretty();
    let items = match tree {
        Tree::List(items) if indent + flat.width() > width && !items.is_empty() => items,
        _ => {
            out.push_str(&flat);
            return;
        }
    };

    out.push('(');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push('\n');
            out.extend(std::iter::repeat(' ').take(indent + 1));
        }
        write_block(item, indent + 1, width, out);
    }
    out.push(')');
}
