//! synrules error handling.
//!
//! `SynRulesError` is the single user-facing error type. It implements
//! `miette::Diagnostic`, so the CLI can render parse errors with the offending
//! source highlighted. Errors internal to one match attempt never reach this
//! type; see `macros::error`.

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::sync::Arc;
use thiserror::Error;

use crate::macros::error::{DispatchError, ExpandError};

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Names a piece of source text for error reporting.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context from real file content.
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Context for text that did not come from a file (command-line arguments, stdin).
    pub fn inline(content: impl Into<String>) -> Self {
        Self::from_file("<input>", content)
    }

    /// Convert to NamedSource for use with miette error reporting.
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

/// Converts a byte range into a miette span.
pub fn to_source_span(start: usize, end: usize) -> SourceSpan {
    SourceSpan::new(start.into(), end.saturating_sub(start))
}

// ============================================================================
// ERROR TYPE
// ============================================================================

#[derive(Error, Diagnostic, Debug)]
pub enum SynRulesError {
    #[error("Parse error: {message}")]
    #[diagnostic(code(synrules::parse::unbalanced))]
    ParseUnbalanced {
        message: String,
        label: String,
        #[source_code]
        src: Arc<NamedSource<String>>,
        #[label("{label}")]
        span: SourceSpan,
        #[help]
        help: Option<String>,
    },

    #[error("Parse error: malformed {construct}")]
    #[diagnostic(code(synrules::parse::malformed))]
    ParseMalformed {
        construct: String,
        #[source_code]
        src: Arc<NamedSource<String>>,
        #[label("malformed syntax")]
        span: SourceSpan,
        #[help]
        help: Option<String>,
    },

    #[error("Parse error: expected exactly one form, found {found}")]
    #[diagnostic(code(synrules::parse::count))]
    ParseCount {
        found: usize,
        #[source_code]
        src: Arc<NamedSource<String>>,
        #[label("unexpected form")]
        span: SourceSpan,
    },

    #[error("No rule matched {form} ({tried} rules tried)")]
    #[diagnostic(
        code(synrules::rules::no_match),
        help("check the form against each rule's pattern; literals must match exactly")
    )]
    NoRuleMatched { form: String, tried: usize },

    #[error("Form does not match pattern: {reason}")]
    #[diagnostic(code(synrules::rules::mismatch))]
    PatternMismatch { reason: String },

    #[error("Rule {rule} expansion failed: {source}")]
    #[diagnostic(code(synrules::rules::template))]
    Expand {
        rule: usize,
        #[source]
        source: ExpandError,
    },

    #[error("No macro named '{name}'")]
    #[diagnostic(code(synrules::rules::unknown_macro))]
    UnknownMacro {
        name: String,
        #[help]
        help: Option<String>,
    },

    #[error("Form {form} is not a macro call")]
    #[diagnostic(
        code(synrules::rules::not_a_call),
        help("definitions files with define-syntax expand forms shaped (name arg ...)")
    )]
    NotAMacroCall { form: String },

    #[error("Invalid macro definition: {reason}")]
    #[diagnostic(code(synrules::rules::definition))]
    InvalidDefinition {
        reason: String,
        #[help]
        help: Option<String>,
    },

    #[error("Failed to {operation} '{path}'")]
    #[diagnostic(code(synrules::io))]
    Io {
        operation: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(synrules::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl SynRulesError {
    pub fn invalid_definition(reason: impl Into<String>) -> Self {
        SynRulesError::InvalidDefinition {
            reason: reason.into(),
            help: None,
        }
    }

    pub fn io(operation: &str, path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        SynRulesError::Io {
            operation: operation.to_string(),
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

impl From<DispatchError> for SynRulesError {
    fn from(error: DispatchError) -> Self {
        match error {
            DispatchError::NoRuleMatched { form, tried } => SynRulesError::NoRuleMatched {
                form: form.pretty(),
                tried,
            },
            DispatchError::Expand { rule, source } => SynRulesError::Expand { rule, source },
            DispatchError::UnknownMacro { name, known } => SynRulesError::UnknownMacro {
                help: (!known.is_empty()).then(|| format!("defined macros: {}", known.join(", "))),
                name,
            },
            DispatchError::NotAMacroCall { form } => SynRulesError::NotAMacroCall { form: form.pretty() },
        }
    }
}
