//! synrules: a syntax-rules style pattern/template expander for s-expressions.
//!
//! ```rust
//! use synrules::{parse_one, SourceContext};
//! use synrules::macros::syntax_rules_from_tree;
//! use synrules::config::ExpanderConfig;
//!
//! let read = |s: &str| parse_one(s, SourceContext::inline(s)).unwrap();
//! let rules = syntax_rules_from_tree(
//!     &read("(syntax-rules () ((let ((var val) ...) body ...) ((lambda (var ...) body ...) val ...)))"),
//!     &ExpanderConfig::default().match_config(),
//! )
//! .unwrap();
//! let out = rules.expand(&read("(let ((x 1) (y 2)) (+ x y) (foo))")).unwrap();
//! assert_eq!(out.pretty(), "((lambda (x y) (+ x y) (foo)) 1 2)");
//! ```

pub use crate::errors::{SourceContext, SynRulesError};
pub use crate::syntax::{parse, parse_one};

pub mod ast;
pub mod cli;
pub mod config;
pub mod errors;
pub mod macros;
pub mod syntax;
