//! Rule dispatcher.
//!
//! Tries rules in order and expands the first one whose pattern matches.
//! Expansion is single-shot: the output is never fed back through the rules.

use tracing::{debug, trace};

use crate::ast::Tree;
use crate::macros::error::DispatchError;
use crate::macros::expander::Expander;
use crate::macros::matcher::Matcher;
use crate::macros::types::{Bindings, LiteralSet, MatchConfig, Rule};

/// Expands `form` with the first matching rule, using the default settings.
///
/// # Examples
///
/// ```rust
/// use synrules::ast::Tree;
/// use synrules::macros::{expand_macro, LiteralSet, Rule};
/// let rules = [Rule::new(
///     Tree::list([Tree::atom("swap"), Tree::atom("a"), Tree::atom("b")]),
///     Tree::list([Tree::atom("b"), Tree::atom("a")]),
/// )];
/// let form = Tree::list([Tree::atom("swap"), Tree::atom("1"), Tree::atom("2")]);
/// let out = expand_macro(&form, &LiteralSet::new(), &rules).unwrap();
/// assert_eq!(out.pretty(), "(2 1)");
/// ```
pub fn expand_macro(form: &Tree, literals: &LiteralSet, rules: &[Rule]) -> Result<Tree, DispatchError> {
    dispatch(form, literals, rules, &MatchConfig::default()).map(|expansion| expansion.output)
}

/// The result of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Zero-based index of the rule that fired.
    pub rule_index: usize,
    pub bindings: Bindings,
    pub output: Tree,
}

/// Tries each rule in order; the first match wins and later rules are never attempted.
pub fn dispatch(
    form: &Tree,
    literals: &LiteralSet,
    rules: &[Rule],
    config: &MatchConfig,
) -> Result<Expansion, DispatchError> {
    let matcher = Matcher::new(literals, config);
    for (rule_index, rule) in rules.iter().enumerate() {
        let bindings = match matcher.match_rule(form, &rule.pattern) {
            Ok(bindings) => bindings,
            Err(reason) => {
                trace!(rule = rule_index, %reason, "rule rejected");
                continue;
            }
        };

        debug!(rule = rule_index, form = %form, "rule matched");
        let output = Expander::new(config)
            .expand(&bindings, &rule.template)
            .map_err(|source| DispatchError::Expand {
                rule: rule_index,
                source,
            })?;
        return Ok(Expansion {
            rule_index,
            bindings,
            output,
        });
    }

    debug!(tried = rules.len(), form = %form, "no rule matched");
    Err(DispatchError::NoRuleMatched {
        form: form.clone(),
        tried: rules.len(),
    })
}
