//! A complete macro definition: literals, ordered rules and match settings.

use crate::ast::Tree;
use crate::macros::dispatch::{dispatch, Expansion};
use crate::macros::error::DispatchError;
use crate::macros::types::{LiteralSet, MatchConfig, Rule};

/// One `syntax-rules` definition.
///
/// # Examples
///
/// ```rust
/// use synrules::macros::{Rule, SyntaxRules, LiteralSet};
/// use synrules::syntax::parser::parse_one;
/// use synrules::SourceContext;
/// let read = |s: &str| parse_one(s, SourceContext::inline(s)).unwrap();
/// let rules = SyntaxRules::new(
///     LiteralSet::new(),
///     vec![Rule::new(read("(my-or a b)"), read("(if a a b)"))],
/// );
/// let out = rules.expand(&read("(my-or x y)")).unwrap();
/// assert_eq!(out.pretty(), "(if x x y)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxRules {
    pub literals: LiteralSet,
    pub rules: Vec<Rule>,
    pub config: MatchConfig,
}

impl SyntaxRules {
    pub fn new(literals: LiteralSet, rules: Vec<Rule>) -> Self {
        SyntaxRules {
            literals,
            rules,
            config: MatchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Expands `form` with the first matching rule.
    pub fn expand(&self, form: &Tree) -> Result<Tree, DispatchError> {
        self.try_rules(form).map(|expansion| expansion.output)
    }

    /// Like `expand`, but also reports which rule fired and what it bound.
    pub fn try_rules(&self, form: &Tree) -> Result<Expansion, DispatchError> {
        dispatch(form, &self.literals, &self.rules, &self.config)
    }
}
