//! Documentation rules

use lazy_static::lazy_static;
use regex::Regex;

use super::files;
use crate::cache::RuleContext;
use crate::rules::results::Violation;
use crate::rules::schema::{BadgeOptions, ContainsOptions, SectionOptions};

lazy_static! {
    /// `[![alt](image)](link)`
    static ref BADGE: Regex = Regex::new(r"\[!\[([^\]]*)\]\(([^)]+)\)\]\(([^)]+)\)").unwrap();
}

/// A linked image in markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub alt: String,
    pub image_url: String,
    pub link_url: String,
}

impl Badge {
    fn matches(&self, pattern: &Regex) -> bool {
        pattern.is_match(&self.alt)
            || pattern.is_match(&self.image_url)
            || pattern.is_match(&self.link_url)
    }
}

/// Extract badges in document order
pub fn find_badges(content: &str) -> Vec<Badge> {
    BADGE
        .captures_iter(content)
        .map(|caps| Badge {
            alt: caps[1].to_string(),
            image_url: caps[2].to_string(),
            link_url: caps[3].to_string(),
        })
        .collect()
}

pub async fn readme_has_badges(ctx: &RuleContext, options: &BadgeOptions) -> Vec<Violation> {
    let path = &options.path;
    let content = match ctx.get_file_text(path).await {
        Ok(content) => content,
        Err(e) => return vec![Violation::at(path.as_str(), e)],
    };

    let badges = find_badges(&content);
    let mut violations = Vec::new();

    if let Some(min) = options.min_count {
        if badges.len() < min as usize {
            violations.push(Violation::at(
                path.as_str(),
                format!(
                    "found {} badge(s), but expected at least {}",
                    badges.len(),
                    min
                ),
            ));
        }
    }

    for pattern in &options.patterns {
        if !badges.iter().any(|badge| badge.matches(&pattern.regex)) {
            violations.push(Violation::at(
                path.as_str(),
                format!("no badge found matching pattern \"{}\"", pattern.source),
            ));
        }
    }

    if options.min_count.is_none() && options.patterns.is_empty() && badges.is_empty() {
        violations.push(Violation::at(path.as_str(), "no badges found"));
    }

    violations
}

/// A section is a level-two heading with the given title
pub async fn readme_has_section(ctx: &RuleContext, options: &SectionOptions) -> Vec<Violation> {
    let contains = ContainsOptions {
        path: options.path.as_str().into(),
        contains: format!("## {}", options.section),
        case_sensitive: options.case_sensitive,
    };
    files::file_contains(ctx, &contains).await
}
