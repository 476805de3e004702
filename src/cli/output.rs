//! Handles all user-facing output for the CLI.
//!
//! Every function writes to a `WriteColor` so commands can print to a colour
//! terminal while tests capture plain text with `termcolor::Buffer`.

use std::io::{self, Write};

use difference::{Changeset, Difference};
use termcolor::{Color, ColorSpec, WriteColor};

use crate::ast::Tree;
use crate::macros::{Bindings, Expansion, Rule};

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Prints a tree flat, or width-limited when `width` is given.
pub fn print_tree<W: WriteColor>(out: &mut W, tree: &Tree, width: Option<usize>) -> io::Result<()> {
    match width {
        Some(width) => writeln!(out, "{}", tree.pretty_width(width)),
        None => writeln!(out, "{}", tree),
    }
}

/// Prints any serializable value as pretty JSON.
pub fn print_json<W: Write, T: serde::Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(out, "{}", json)
}

/// Prints bindings one variable per line.
pub fn print_bindings<W: WriteColor>(out: &mut W, bindings: &Bindings) -> io::Result<()> {
    if bindings.is_empty() {
        return writeln!(out, "(no bindings)");
    }
    writeln!(out, "{}", bindings)
}

/// Prints which rule fired, what it bound, and a line diff from input to output.
pub fn print_explanation<W: WriteColor>(
    out: &mut W,
    input: &Tree,
    rule: &Rule,
    expansion: &Expansion,
    width: usize,
) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    writeln!(out, "--- rule {}: {} ---", expansion.rule_index, rule.pattern)?;
    out.reset()?;
    print_bindings(out, &expansion.bindings)?;
    writeln!(out)?;

    let before = input.pretty_width(width);
    let after = expansion.output.pretty_width(width);
    let changeset = Changeset::new(&before, &after, "\n");
    print_diff(out, &changeset.diffs)?;
    out.reset()
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn print_diff<W: WriteColor>(out: &mut W, diffs: &[Difference]) -> io::Result<()> {
    for diff in diffs {
        match diff {
            Difference::Same(ref x) => {
                out.reset()?;
                for line in x.lines() {
                    writeln!(out, " {}", line)?;
                }
            }
            Difference::Add(ref x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                for line in x.lines() {
                    writeln!(out, "+{}", line)?;
                }
            }
            Difference::Rem(ref x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                for line in x.lines() {
                    writeln!(out, "-{}", line)?;
                }
            }
        }
    }
    Ok(())
}
