//! # synrules Macro Expansion System
//!
//! A syntax-rules style expander: a form is matched against ordered
//! pattern/template rules and the first matching rule's template is
//! instantiated with the captured sub-forms.
//!
//! ## Core Principles
//!
//! - **Syntactic Only**: Macros operate solely on `Tree`s. No evaluation, no I/O.
//! - **Pure Transformation**: match, expand and dispatch are deterministic
//!   functions of their inputs; bindings never outlive one dispatch call.
//! - **Single-shot**: one rule application per call. Output that still looks
//!   like a macro call is returned as-is.
//! - **No hygiene**: template atoms are emitted verbatim, so variable capture is
//!   possible and intended.
//!
//! ## Layers
//!
//! - `types`: literal sets, bindings, rules, match settings
//! - `matcher`: form × pattern → bindings
//! - `expander`: bindings × template → form
//! - `dispatch`: first-match-wins over an ordered rule list
//! - `definition` / `registry`: named and anonymous rule sets
//! - `loader`: reading definitions from source

pub mod definition;
pub mod dispatch;
pub mod error;
pub mod expander;
pub mod loader;
pub mod matcher;
pub mod registry;
pub mod types;

pub use definition::SyntaxRules;
pub use dispatch::{dispatch, expand_macro, Expansion};
pub use error::{DispatchError, ExpandError, MatchError};
pub use expander::{expand_template, Expander};
pub use loader::{
    check_pattern, definition_from_tree, load_bundle, load_definitions_from_file, literal_set,
    parse_definitions, syntax_rules_from_tree, Definitions,
};
pub use matcher::{match_pattern, Matcher};
pub use registry::MacroTable;
pub use types::{Bindings, LiteralSet, MatchConfig, Rule, TrailingPolicy, DEFAULT_ELLIPSIS};
