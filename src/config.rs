//! Expander configuration.
//!
//! Loaded from an optional JSON file; command-line flags are applied on top.
//! Missing keys take their defaults.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::errors::SynRulesError;
use crate::macros::types::{MatchConfig, TrailingPolicy, DEFAULT_ELLIPSIS};

/// Default column limit for `--pretty` output.
pub const DEFAULT_WIDTH: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpanderConfig {
    /// Token marking the preceding pattern/template element as repeated.
    pub ellipsis: String,
    pub trailing: TrailingPolicy,
    /// Skip the macro keyword (first element) when matching.
    pub ignore_keyword: bool,
    /// Column limit for width-limited rendering.
    pub width: usize,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        ExpanderConfig {
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
            trailing: TrailingPolicy::Strict,
            ignore_keyword: false,
            width: DEFAULT_WIDTH,
        }
    }
}

impl ExpanderConfig {
    pub fn from_json_str(text: &str) -> Result<Self, SynRulesError> {
        let config: ExpanderConfig = serde_json::from_str(text).map_err(|e| SynRulesError::Config {
            message: e.to_string(),
            help: Some("keys: ellipsis, trailing (strict|lenient), ignore_keyword, width".to_string()),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SynRulesError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| SynRulesError::io("read config", path, e))?;
        Self::from_json_str(&text)
    }

    /// The ellipsis must be a single non-empty atom token.
    pub fn validate(&self) -> Result<(), SynRulesError> {
        let bad_char = |c: char| c.is_whitespace() || "()[]{}".contains(c);
        if self.ellipsis.is_empty() || self.ellipsis.chars().any(bad_char) {
            return Err(SynRulesError::Config {
                message: format!("ellipsis marker '{}' is not a valid atom", self.ellipsis),
                help: Some("use a token without whitespace or brackets, such as ...".to_string()),
            });
        }
        if self.width == 0 {
            return Err(SynRulesError::Config {
                message: "width must be at least 1".to_string(),
                help: None,
            });
        }
        Ok(())
    }

    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            ellipsis: self.ellipsis.as_str().into(),
            trailing: self.trailing,
            ignore_keyword: self.ignore_keyword,
        }
    }
}
