use crate::core::robots::RobotsFile;
use crate::core::sitemap::{Sitemap, SITEMAP_FILE_NAME};
use crate::core::social::{OpenGraphData, TwitterCardData};
use crate::core::structured_data::StructuredDataTool;
use crate::domain::model::{RobotsRule, SeoMetadata, SitemapEntry};
use crate::domain::ports::Tool;
use crate::utils::error::{Result, SeoError};
use crate::utils::validation::{validate_path, validate_url, FieldError, FieldErrors, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_OUTPUT_PATH: &str = "./seo-output";

/// A site file: one section per generator plus output and ping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site: SiteSection,
    #[serde(default)]
    pub output: OutputConfig,
    pub meta: Option<SeoMetadata>,
    pub sitemap: Option<SitemapConfig>,
    pub robots: Option<RobotsConfig>,
    pub open_graph: Option<OpenGraphData>,
    pub twitter: Option<TwitterCardData>,
    #[serde(default)]
    pub structured_data: Vec<StructuredDataTool>,
    pub ping: Option<PingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSection {
    pub name: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Defaults to `site.base_url`.
    pub base_url: Option<String>,
    /// Merge `entries` into a sitemap.xml already present in the output directory.
    pub merge_existing: bool,
    pub entries: Vec<SitemapEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotsConfig {
    pub rules: Vec<RobotsRule>,
    /// Defaults to `<base_url>/sitemap.xml` when a sitemap is configured.
    pub sitemap: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PingConfig {
    pub enabled: bool,
    pub google_endpoint: Option<String>,
    pub bing_endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl PingConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

fn env_var_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"))
}

fn prefixed(prefix: &str, errors: Vec<FieldError>) -> Vec<FieldError> {
    errors
        .into_iter()
        .map(|e| FieldError::new(format!("{}.{}", prefix, e.field), e.reason))
        .collect()
}

impl SiteConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SeoError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SeoError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        self.validate()
    }

    pub fn base_url(&self) -> &str {
        self.site.base_url.trim_end_matches('/')
    }

    pub fn output_path(&self) -> &str {
        &self.output.path
    }

    pub fn sitemap_url(&self) -> String {
        format!("{}/{}", self.base_url(), SITEMAP_FILE_NAME)
    }

    pub fn sitemap_tool(&self) -> Option<Sitemap> {
        self.sitemap.as_ref().map(|config| {
            let base_url = config
                .base_url
                .as_deref()
                .unwrap_or(self.base_url())
                .trim_end_matches('/');
            Sitemap::new(base_url, config.entries.clone())
        })
    }

    pub fn robots_tool(&self) -> Option<RobotsFile> {
        self.robots.as_ref().map(|config| {
            let sitemap = config
                .sitemap
                .clone()
                .or_else(|| self.sitemap.as_ref().map(|_| self.sitemap_url()));
            RobotsFile::new(config.rules.clone(), sitemap)
        })
    }

    pub fn merge_existing_sitemap(&self) -> bool {
        self.sitemap.as_ref().is_some_and(|s| s.merge_existing)
    }

    pub fn ping_enabled(&self) -> bool {
        self.ping.as_ref().is_some_and(|p| p.enabled)
    }

    /// Every configured generator except the sitemap, in output order.
    pub fn page_tools(&self) -> Vec<&dyn Tool> {
        let mut tools: Vec<&dyn Tool> = Vec::new();
        if let Some(meta) = &self.meta {
            tools.push(meta);
        }
        if let Some(open_graph) = &self.open_graph {
            tools.push(open_graph);
        }
        if let Some(twitter) = &self.twitter {
            tools.push(twitter);
        }
        tools
    }
}

impl Validate for SiteConfig {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::new();
        errors.check(validate_url("site.base_url", Some(&self.site.base_url)));
        if let Err(e) = validate_path("output.path", &self.output.path) {
            errors.push(FieldError::new("output.path", e.to_string()));
        }

        if let Some(meta) = &self.meta {
            errors.extend(prefixed("meta", meta.field_errors()));
        }
        if let Some(sitemap) = self.sitemap_tool() {
            // An empty entry list is fine when merging into an existing sitemap.
            let sitemap_errors = sitemap
                .field_errors()
                .into_iter()
                .filter(|e| !(self.merge_existing_sitemap() && e.field == "entries"))
                .collect();
            errors.extend(prefixed("sitemap", sitemap_errors));
        }
        if let Some(robots) = self.robots_tool() {
            errors.extend(prefixed("robots", robots.field_errors()));
        }
        if let Some(open_graph) = &self.open_graph {
            errors.extend(prefixed("open_graph", open_graph.field_errors()));
        }
        if let Some(twitter) = &self.twitter {
            errors.extend(prefixed("twitter", twitter.field_errors()));
        }
        for (i, schema) in self.structured_data.iter().enumerate() {
            errors.extend(prefixed(
                &format!("structured_data[{}]", i),
                schema.field_errors(),
            ));
        }
        errors.into_vec()
    }
}
