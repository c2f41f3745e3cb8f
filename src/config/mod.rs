//! Configuration module

pub mod loader;
pub mod presets;

pub use loader::Config;
pub use presets::Preset;

use serde::{Deserialize, Serialize};

use crate::rules::results::Level;

/// Raw configuration of one rule, as written in the config file.
///
/// `options` stays untyped until the rule is validated against its schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Registry name, e.g. `readme/exists`
    pub name: String,

    /// Level applied to every violation of the rule
    pub level: Level,

    /// Regexes naming the paths a rule must not report on.
    ///
    /// Patterns use `regex` crate syntax, without lookaround or
    /// backreferences, and are matched unanchored against each path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exceptions: Option<Vec<String>>,

    /// Rule-specific options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
}

impl RuleConfig {
    /// Create a rule configuration without options
    pub fn new(name: impl Into<String>, level: Level) -> Self {
        Self {
            name: name.into(),
            level,
            exceptions: None,
            options: None,
        }
    }

    /// Set the options
    pub fn with_options(mut self, options: serde_json::Value) -> Self {
        self.options = Some(options);
        self
    }
}
