use crate::domain::model::{Artifact, RobotsRule};
use crate::domain::ports::Tool;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_optional_url, validate_required_field, FieldError, FieldErrors, Validate,
};
use serde::{Deserialize, Serialize};

pub const ROBOTS_FILE_NAME: &str = "robots.txt";

fn render_rule(rule: &RobotsRule) -> String {
    let mut content = format!("User-agent: {}\n", rule.user_agent);

    for path in &rule.allow {
        content.push_str(&format!("Allow: {}\n", path));
    }
    for path in &rule.disallow {
        content.push_str(&format!("Disallow: {}\n", path));
    }

    if let Some(delay) = rule.crawl_delay.filter(|d| *d > 0) {
        content.push_str(&format!("Crawl-delay: {}\n", delay));
    }

    if let Some(sitemap) = rule.sitemap.as_deref().filter(|s| !s.is_empty()) {
        content.push_str(&format!("\nSitemap: {}\n", sitemap));
    }

    content
}

/// One `User-agent` block per rule, blocks separated by a blank line.
pub fn generate_robots_txt(rules: &[RobotsRule]) -> String {
    rules
        .iter()
        .map(render_rule)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn generate_robots_txt_with_sitemap(rules: &[RobotsRule], sitemap_url: &str) -> String {
    format!("{}\n\nSitemap: {}", generate_robots_txt(rules), sitemap_url)
}

/// Robots editor input. `sitemap` is attached to the first rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotsFile {
    pub rules: Vec<RobotsRule>,
    pub sitemap: Option<String>,
}

impl RobotsFile {
    pub fn new(rules: Vec<RobotsRule>, sitemap: Option<String>) -> Self {
        Self { rules, sitemap }
    }

    /// The rules as written, with the sitemap URL moved onto the first rule.
    pub fn effective_rules(&self) -> Vec<RobotsRule> {
        let mut rules = self.rules.clone();
        if let (Some(sitemap), Some(first)) = (
            self.sitemap.as_deref().filter(|s| !s.trim().is_empty()),
            rules.first_mut(),
        ) {
            first.sitemap = Some(sitemap.to_string());
        }
        rules
    }
}

impl Validate for RobotsFile {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::new();
        if self.rules.is_empty() {
            errors.push(FieldError::new("rules", "Add at least one rule"));
        }
        for (i, rule) in self.rules.iter().enumerate() {
            errors
                .check(validate_required_field(
                    &format!("rules[{}].user_agent", i),
                    Some(&rule.user_agent),
                ))
                .check(validate_optional_url(
                    &format!("rules[{}].sitemap", i),
                    rule.sitemap.as_deref(),
                ));
        }
        errors.check(validate_optional_url("sitemap", self.sitemap.as_deref()));
        errors.into_vec()
    }
}

impl Tool for RobotsFile {
    fn name(&self) -> &'static str {
        "robots"
    }

    fn generate(&self) -> Result<Artifact> {
        Ok(Artifact::new(
            ROBOTS_FILE_NAME,
            "text/plain",
            generate_robots_txt(&self.effective_rules()),
        ))
    }
}
