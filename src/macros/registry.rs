//! Named macro table.
//!
//! Maps macro names to their `SyntaxRules` and dispatches a form by its head
//! atom. Lookup happens once per call; the result is not expanded again.

use std::collections::HashMap;

use crate::ast::Tree;
use crate::macros::definition::SyntaxRules;
use crate::macros::dispatch::Expansion;
use crate::macros::error::DispatchError;

#[derive(Debug, Clone, Default)]
pub struct MacroTable {
    macros: HashMap<String, SyntaxRules>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `rules` under `name`, returning the definition it replaced.
    pub fn register(&mut self, name: impl Into<String>, rules: SyntaxRules) -> Option<SyntaxRules> {
        self.macros.insert(name.into(), rules)
    }

    pub fn get(&self, name: &str) -> Option<&SyntaxRules> {
        self.macros.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    /// Macro names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.macros.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Expands a macro call `(name arg ...)` with the definition registered under `name`.
    pub fn expand(&self, form: &Tree) -> Result<Tree, DispatchError> {
        self.try_rules(form).map(|expansion| expansion.output)
    }

    pub fn try_rules(&self, form: &Tree) -> Result<Expansion, DispatchError> {
        let Some(name) = form.head().and_then(Tree::as_atom) else {
            return Err(DispatchError::NotAMacroCall { form: form.clone() });
        };
        let Some(rules) = self.macros.get(name) else {
            return Err(DispatchError::UnknownMacro {
                name: name.to_string(),
                known: self.names(),
            });
        };
        rules.try_rules(form)
    }
}
