//! Starter rule sets written by `init`

use serde_json::json;

use super::RuleConfig;
use crate::rules::results::Level;

/// Available presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// README and license only
    Minimal,
    /// Documentation, forbidden files and CI hygiene for public repositories
    OpenSource,
    /// Open source rules plus Python dependency ordering
    Python,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Minimal, Preset::OpenSource, Preset::Python];

    /// Get preset from name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "minimal" | "min" => Some(Self::Minimal),
            "opensource" | "open-source" | "oss" => Some(Self::OpenSource),
            "python" | "py" => Some(Self::Python),
            _ => None,
        }
    }

    /// Get the name of the preset
    pub fn name(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::OpenSource => "opensource",
            Self::Python => "python",
        }
    }

    /// Get a description of the preset
    pub fn description(&self) -> &'static str {
        match self {
            Self::Minimal => "README and license must be present",
            Self::OpenSource => "Documentation, forbidden files and workflow timeouts",
            Self::Python => "Open source rules plus sorted Python dependencies",
        }
    }

    /// Rules of the preset, in evaluation order
    pub fn rules(&self) -> Vec<RuleConfig> {
        let mut rules = vec![
            RuleConfig::new("readme/exists", Level::Error),
            RuleConfig::new("license/exists", Level::Error)
                .with_options(json!({"path": ["LICENSE", "LICENSE.md", "LICENSE.txt"]})),
        ];

        if *self == Self::Minimal {
            return rules;
        }

        rules.extend([
            RuleConfig::new("readme/has-section", Level::Warning)
                .with_options(json!({"section": "Installation"})),
            RuleConfig::new("readme/has-badges", Level::Warning),
            RuleConfig::new("file-forbidden", Level::Error)
                .with_options(json!({"path": [".env", ".DS_Store", "node_modules"], "type": "any"})),
            RuleConfig::new("github-actions/timeout-minutes", Level::Warning)
                .with_options(json!({"maximum": 60})),
        ]);

        if *self == Self::Python {
            rules.extend([
                RuleConfig::new("python/pyproject-dependencies-alphabetical-order", Level::Warning),
                RuleConfig::new(
                    "python/requirements-txt-dependencies-alphabetical-order",
                    Level::Warning,
                )
                .with_options(json!({"path": "requirements*.txt"})),
            ]);
        }

        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Preset::from_name("OSS"), Some(Preset::OpenSource));
        assert_eq!(Preset::from_name("py"), Some(Preset::Python));
        assert_eq!(Preset::from_name("enterprise"), None);
    }

    #[test]
    fn test_presets_extend_each_other() {
        let minimal = Preset::Minimal.rules();
        let opensource = Preset::OpenSource.rules();
        let python = Preset::Python.rules();

        assert_eq!(minimal.len(), 2);
        assert_eq!(&opensource[..2], &minimal[..]);
        assert_eq!(&python[..opensource.len()], &opensource[..]);
        assert!(python.len() > opensource.len());
    }

    #[test]
    fn test_names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(Preset::from_name(preset.name()), Some(preset));
            assert!(!preset.description().is_empty());
        }
    }
}
