//! Loads macro definitions from parsed forms and files.
//!
//! Accepted shapes:
//!
//! - `(syntax-rules (literal ...) (pattern template) ...)`
//! - `(define-syntax name (syntax-rules ...))`
//! - a bundle `(form (literal ...) (pattern template) ...)`, which pairs a form
//!   with the rules to expand it

use std::{fs, path::Path};

use tracing::debug;

use crate::ast::Tree;
use crate::errors::{SourceContext, SynRulesError};
use crate::macros::definition::SyntaxRules;
use crate::macros::dispatch::Expansion;
use crate::macros::error::DispatchError;
use crate::macros::registry::MacroTable;
use crate::macros::types::{LiteralSet, MatchConfig, Rule};
use crate::syntax::parser;

pub const SYNTAX_RULES: &str = "syntax-rules";
pub const DEFINE_SYNTAX: &str = "define-syntax";

/// Rules loaded from a definitions file: a single anonymous `syntax-rules`
/// form, or a table of named `define-syntax` forms.
#[derive(Debug, Clone)]
pub enum Definitions {
    Single(SyntaxRules),
    Table(MacroTable),
}

impl Definitions {
    pub fn try_rules(&self, form: &Tree) -> Result<Expansion, DispatchError> {
        match self {
            Definitions::Single(rules) => rules.try_rules(form),
            Definitions::Table(table) => table.try_rules(form),
        }
    }

    pub fn expand(&self, form: &Tree) -> Result<Tree, DispatchError> {
        self.try_rules(form).map(|expansion| expansion.output)
    }

    /// The definition that would handle `form`, if any.
    pub fn rules_for(&self, form: &Tree) -> Option<&SyntaxRules> {
        match self {
            Definitions::Single(rules) => Some(rules),
            Definitions::Table(table) => form
                .head()
                .and_then(Tree::as_atom)
                .and_then(|name| table.get(name)),
        }
    }
}

// =============================
// Public API for macro loading
// =============================

/// Builds `SyntaxRules` from `(syntax-rules (literal ...) clause ...)`.
pub fn syntax_rules_from_tree(tree: &Tree, config: &MatchConfig) -> Result<SyntaxRules, SynRulesError> {
    let items = tree
        .as_list()
        .filter(|items| items.first().and_then(Tree::as_atom) == Some(SYNTAX_RULES))
        .ok_or_else(|| {
            SynRulesError::invalid_definition(format!("expected ({} ...), found {}", SYNTAX_RULES, tree))
        })?;
    let literals = items.get(1).ok_or_else(|| SynRulesError::InvalidDefinition {
        reason: "syntax-rules has no literal list".to_string(),
        help: Some("use () when the macro has no literals".to_string()),
    })?;
    build_rules(literals, &items[2..], config)
}

/// Builds a named definition from `(define-syntax name (syntax-rules ...))`.
pub fn definition_from_tree(
    tree: &Tree,
    config: &MatchConfig,
) -> Result<(String, SyntaxRules), SynRulesError> {
    let Some([keyword, name, body]) = tree.as_list() else {
        return Err(SynRulesError::invalid_definition(format!(
            "expected ({} name (syntax-rules ...)), found {}",
            DEFINE_SYNTAX, tree
        )));
    };
    if keyword.as_atom() != Some(DEFINE_SYNTAX) {
        return Err(SynRulesError::invalid_definition(format!(
            "expected {}, found {}",
            DEFINE_SYNTAX, keyword
        )));
    }
    let name = name
        .as_atom()
        .ok_or_else(|| SynRulesError::invalid_definition(format!("macro name must be an atom, found {}", name)))?;
    Ok((name.to_string(), syntax_rules_from_tree(body, config)?))
}

/// Splits a bundle `(form (literal ...) clause ...)` into the form and its rules.
pub fn load_bundle(tree: &Tree, config: &MatchConfig) -> Result<(Tree, SyntaxRules), SynRulesError> {
    let items = tree.as_list().unwrap_or_default();
    let [form, literals, clauses @ ..] = items else {
        return Err(SynRulesError::InvalidDefinition {
            reason: format!("expected (form (literal ...) (pattern template) ...), found {}", tree),
            help: Some("a bundle needs at least the form and a literal list".to_string()),
        });
    };
    Ok((form.clone(), build_rules(literals, clauses, config)?))
}

/// Parses definitions from source text.
pub fn parse_definitions(
    source_text: &str,
    source: SourceContext,
    config: &MatchConfig,
) -> Result<Definitions, SynRulesError> {
    let forms = parser::parse(source_text, source)?;
    definitions_from_forms(&forms, config)
}

/// Loads definitions from a file.
pub fn load_definitions_from_file<P: AsRef<Path>>(
    path: P,
    config: &MatchConfig,
) -> Result<Definitions, SynRulesError> {
    let path = path.as_ref();
    let source_text = fs::read_to_string(path).map_err(|e| SynRulesError::io("read", path, e))?;
    let definitions = parse_definitions(
        &source_text,
        SourceContext::from_file(path.display().to_string(), source_text.as_str()),
        config,
    )?;
    debug!(path = %path.display(), "loaded macro definitions");
    Ok(definitions)
}

// =============================
// Internal parsing helpers
// =============================

fn definitions_from_forms(forms: &[Tree], config: &MatchConfig) -> Result<Definitions, SynRulesError> {
    if let [single] = forms {
        if single.head().and_then(Tree::as_atom) == Some(SYNTAX_RULES) {
            return Ok(Definitions::Single(syntax_rules_from_tree(single, config)?));
        }
    }
    if forms.is_empty() {
        return Err(SynRulesError::invalid_definition("no macro definitions found"));
    }

    let mut table = MacroTable::new();
    for form in forms {
        let (name, rules) = definition_from_tree(form, config)?;
        if table.contains(&name) {
            return Err(SynRulesError::InvalidDefinition {
                reason: format!("macro '{}' is defined more than once", name),
                help: Some("merge the clauses into one syntax-rules form".to_string()),
            });
        }
        table.register(name, rules);
    }
    Ok(Definitions::Table(table))
}

fn build_rules(literals: &Tree, clauses: &[Tree], config: &MatchConfig) -> Result<SyntaxRules, SynRulesError> {
    let literals = literal_set(literals, config)?;
    let rules = clauses
        .iter()
        .map(|clause| rule_from_clause(clause, config))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SyntaxRules::new(literals, rules).with_config(config.clone()))
}

/// Reads a literal list `(token ...)`. The ellipsis marker cannot be a literal.
pub fn literal_set(tree: &Tree, config: &MatchConfig) -> Result<LiteralSet, SynRulesError> {
    let items = tree
        .as_list()
        .ok_or_else(|| SynRulesError::invalid_definition(format!("literals must be a list, found {}", tree)))?;
    let mut literals = LiteralSet::new();
    for item in items {
        let token = item
            .as_atom()
            .ok_or_else(|| SynRulesError::invalid_definition(format!("literal must be an atom, found {}", item)))?;
        if token == &*config.ellipsis {
            return Err(SynRulesError::invalid_definition(format!(
                "the ellipsis marker '{}' cannot be a literal",
                token
            )));
        }
        literals.insert(token);
    }
    Ok(literals)
}

/// Rejects a repeated group that itself contains an ellipsis, such as
/// `((k v ...) ...)`. The matcher would flatten its captures.
pub fn check_pattern(pattern: &Tree, config: &MatchConfig) -> Result<(), SynRulesError> {
    match nested_ellipsis(pattern, config) {
        Some(group) => Err(SynRulesError::InvalidDefinition {
            reason: format!("nested ellipsis in pattern: {} {}", group, config.ellipsis),
            help: Some("only one level of repetition is supported in patterns".to_string()),
        }),
        None => Ok(()),
    }
}

fn nested_ellipsis<'a>(pattern: &'a Tree, config: &MatchConfig) -> Option<&'a Tree> {
    let items = pattern.as_list()?;
    for (i, item) in items.iter().enumerate() {
        let repeated = items.get(i + 1).is_some_and(|next| config.is_ellipsis(next));
        if repeated && contains_ellipsis(item, config) {
            return Some(item);
        }
        if let Some(group) = nested_ellipsis(item, config) {
            return Some(group);
        }
    }
    None
}

fn contains_ellipsis(tree: &Tree, config: &MatchConfig) -> bool {
    let mut found = false;
    tree.for_each_atom(&mut |token| found |= **token == *config.ellipsis);
    found
}

fn rule_from_clause(clause: &Tree, config: &MatchConfig) -> Result<Rule, SynRulesError> {
    match clause.as_list() {
        Some([pattern, template]) => {
            check_pattern(pattern, config)?;
            Ok(Rule::new(pattern.clone(), template.clone()))
        }
        _ => Err(SynRulesError::InvalidDefinition {
            reason: format!("rule must be (pattern template), found {}", clause),
            help: None,
        }),
    }
}
