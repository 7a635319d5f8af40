use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One `<meta>` element. Exactly one of `name`, `property`, `http_equiv` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_equiv: Option<String>,
    pub content: String,
}

impl MetaTag {
    pub fn name(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            property: None,
            http_equiv: None,
            content: content.into(),
        }
    }

    pub fn property(property: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: None,
            property: Some(property.into()),
            http_equiv: None,
            content: content.into(),
        }
    }

    pub fn http_equiv(http_equiv: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: None,
            property: None,
            http_equiv: Some(http_equiv.into()),
            content: content.into(),
        }
    }

    /// The `name`, `property` or `http-equiv` value, whichever is set.
    pub fn key(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.property.as_deref())
            .or(self.http_equiv.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwitterCardType {
    Summary,
    SummaryLargeImage,
    App,
    Player,
}

impl TwitterCardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::SummaryLargeImage => "summary_large_image",
            Self::App => "app",
            Self::Player => "player",
        }
    }

    pub fn needs_image(&self) -> bool {
        matches!(self, Self::Summary | Self::SummaryLargeImage)
    }
}

impl Default for TwitterCardType {
    fn default() -> Self {
        Self::SummaryLargeImage
    }
}

impl fmt::Display for TwitterCardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TwitterCardType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(Self::Summary),
            "summary_large_image" => Ok(Self::SummaryLargeImage),
            "app" => Ok(Self::App),
            "player" => Ok(Self::Player),
            other => Err(format!(
                "unknown twitter card type '{}' (expected summary, summary_large_image, app or player)",
                other
            )),
        }
    }
}

/// Page metadata entered into the meta tag generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub twitter_card: Option<TwitterCardType>,
    pub canonical: Option<String>,
    pub noindex: bool,
    pub nofollow: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown change frequency '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub change_frequency: Option<ChangeFrequency>,
    pub priority: Option<f32>,
}

impl SitemapEntry {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_change_frequency(mut self, frequency: ChangeFrequency) -> Self {
        self.change_frequency = Some(frequency);
        self
    }

    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_last_modified(mut self, at: DateTime<Utc>) -> Self {
        self.last_modified = Some(at);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotsRule {
    pub user_agent: String,
    pub allow: Vec<String>,
    pub disallow: Vec<String>,
    pub crawl_delay: Option<u32>,
    pub sitemap: Option<String>,
}

impl RobotsRule {
    pub fn for_agent(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoIssue {
    pub category: String,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl SeoIssue {
    fn new(severity: Severity, category: &str, message: impl Into<String>) -> Self {
        Self {
            category: category.to_string(),
            message: message.into(),
            severity,
            recommendation: None,
        }
    }

    pub fn critical(category: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Critical, category, message)
    }

    pub fn warning(category: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, category, message)
    }

    pub fn info(category: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, category, message)
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }
}

/// Score plus findings split into issues (critical), warnings and passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoScoreResult {
    pub score: u32,
    pub max_score: u32,
    pub percentage: u32,
    pub issues: Vec<SeoIssue>,
    pub warnings: Vec<SeoIssue>,
    pub passes: Vec<SeoIssue>,
}

impl SeoScoreResult {
    pub fn findings(&self) -> impl Iterator<Item = &SeoIssue> {
        self.issues
            .iter()
            .chain(self.warnings.iter())
            .chain(self.passes.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

impl Heading {
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub src: Option<String>,
    pub alt: Option<String>,
}

impl Image {
    pub fn new(src: impl Into<String>, alt: Option<&str>) -> Self {
        Self {
            src: Some(src.into()),
            alt: alt.map(str::to_string),
        }
    }
}

/// Page facts fed into the scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub headings: Vec<Heading>,
    pub images: Vec<Image>,
    pub url: Option<String>,
}

/// Generated output of one tool, ready to print or save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub content: String,
}

impl Artifact {
    pub fn new(file_name: impl Into<String>, mime_type: &'static str, content: String) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type,
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub url: String,
    pub score: u32,
    pub max_score: u32,
    pub percentage: u32,
    pub timestamp: DateTime<Utc>,
    /// True when produced by the demo auditor rather than real checks.
    pub simulated: bool,
    #[serde(rename = "criticalIssues")]
    pub issues: Vec<SeoIssue>,
    pub warnings: Vec<SeoIssue>,
    #[serde(rename = "passedChecks")]
    pub passes: Vec<SeoIssue>,
}

pub fn percentage(score: u32, max_score: u32) -> u32 {
    if max_score == 0 {
        return 0;
    }
    ((score as f64 / max_score as f64) * 100.0).round() as u32
}
