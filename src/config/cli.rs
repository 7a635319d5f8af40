use crate::config::toml_config::DEFAULT_OUTPUT_PATH;
use crate::core::structured_data::SchemaType;
use crate::core::social::OgType;
use crate::domain::model::{ChangeFrequency, TwitterCardType};
use crate::utils::error::SeoError;
use crate::utils::validation::{validate_path, FieldError, Validate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "seo-tools")]
#[command(version, about = "SEO generators, scoring and audits for ScaleSite projects")]
pub struct CliConfig {
    /// Directory used by --save
    #[arg(long, global = true, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    /// Write the result to the output directory instead of stdout
    #[arg(long, global = true)]
    pub save: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate page meta tags
    Meta(MetaArgs),
    /// Generate sitemap.xml
    Sitemap(SitemapArgs),
    /// Generate robots.txt
    Robots(RobotsArgs),
    /// Generate Open Graph tags
    OpenGraph(OpenGraphArgs),
    /// Generate Twitter Card tags
    Twitter(TwitterArgs),
    /// Generate schema.org JSON-LD
    Schema(SchemaArgs),
    /// Score an HTML page (0-100)
    Score(PageSource),
    /// Detailed on-page analysis with keyword density and readability
    Analyze(AnalyzeArgs),
    /// Audit a live URL
    Audit(AuditArgs),
    /// Most frequent keywords of a text or HTML file
    Keywords(KeywordsArgs),
    /// URL slug for a title
    Slug { text: String },
    /// Build a canonical URL without tracking parameters
    Canonical(CanonicalArgs),
    /// Check a JSON-LD document
    ValidateSchema { file: PathBuf },
    /// Notify Google and Bing about a sitemap
    Ping { sitemap_url: String },
}

#[derive(Debug, Clone, Args)]
pub struct MetaArgs {
    /// JSON or TOML file with the full metadata; flags override its values
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Derive description and keywords from this HTML or text file
    #[arg(long, conflicts_with = "input")]
    pub auto_from: Option<PathBuf>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub keywords: Option<String>,
    #[arg(long)]
    pub og_title: Option<String>,
    #[arg(long)]
    pub og_description: Option<String>,
    #[arg(long)]
    pub og_image: Option<String>,
    #[arg(long)]
    pub twitter_card: Option<TwitterCardType>,
    #[arg(long)]
    pub canonical: Option<String>,
    #[arg(long)]
    pub noindex: bool,
    #[arg(long)]
    pub nofollow: bool,
}

#[derive(Debug, Clone, Args)]
pub struct SitemapArgs {
    #[arg(long)]
    pub base_url: String,
    /// Page as `path[,priority[,changefreq]]`, repeatable
    #[arg(long = "url")]
    pub urls: Vec<String>,
    #[arg(long)]
    pub changefreq: Option<ChangeFrequency>,
    #[arg(long)]
    pub priority: Option<f32>,
    /// Stamp every entry with the current time as lastmod
    #[arg(long)]
    pub lastmod_now: bool,
    /// Existing sitemap.xml to merge the new URLs into
    #[arg(long)]
    pub merge: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct RobotsArgs {
    /// JSON or TOML file with several rules; replaces the single-rule flags
    #[arg(long)]
    pub input: Option<PathBuf>,
    #[arg(long, default_value = "*")]
    pub user_agent: String,
    #[arg(long)]
    pub allow: Vec<String>,
    #[arg(long)]
    pub disallow: Vec<String>,
    #[arg(long)]
    pub crawl_delay: Option<u32>,
    #[arg(long)]
    pub sitemap: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct OpenGraphArgs {
    #[arg(long)]
    pub input: Option<PathBuf>,
    #[arg(long = "type")]
    pub og_type: Option<OgType>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub image: Option<String>,
    #[arg(long)]
    pub image_alt: Option<String>,
    #[arg(long)]
    pub site_name: Option<String>,
    #[arg(long)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct TwitterArgs {
    #[arg(long)]
    pub input: Option<PathBuf>,
    #[arg(long)]
    pub card: Option<TwitterCardType>,
    #[arg(long)]
    pub site: Option<String>,
    #[arg(long)]
    pub creator: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub image: Option<String>,
    #[arg(long)]
    pub image_alt: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct SchemaArgs {
    #[arg(long = "type")]
    pub schema_type: SchemaType,
    /// JSON or TOML file with the form fields (snake_case names)
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Wrap the JSON in a <script type="application/ld+json"> element
    #[arg(long)]
    pub script: bool,
}

#[derive(Debug, Clone, Args)]
pub struct PageSource {
    /// Local HTML file
    #[arg(required_unless_present = "url", conflicts_with = "url")]
    pub file: Option<PathBuf>,
    /// Fetch the page instead of reading a file
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub source: PageSource,
    /// Keyword to measure density for, repeatable
    #[arg(long = "keyword")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct AuditArgs {
    pub url: String,
    /// Run the randomized demo audit instead of fetching the page
    #[arg(long)]
    pub simulate: bool,
    #[arg(long, requires = "simulate")]
    pub seed: Option<u64>,
    /// Multiplier for the demo audit step delays
    #[arg(long, default_value_t = 1.0, requires = "simulate")]
    pub delay_scale: f64,
    #[arg(long, default_value_t = 30)]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Args)]
pub struct KeywordsArgs {
    pub file: PathBuf,
    #[arg(long, default_value_t = 2)]
    pub min_frequency: usize,
}

#[derive(Debug, Clone, Args)]
pub struct CanonicalArgs {
    #[arg(long)]
    pub base: String,
    #[arg(long, default_value = "/")]
    pub path: String,
    /// Query parameter as `key=value`, repeatable
    #[arg(long = "param", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,
}

fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

impl Validate for CliConfig {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.save {
            if let Err(e) = validate_path("output_path", &self.output_path) {
                let reason = match e {
                    SeoError::InvalidConfigValueError { reason, .. } => reason,
                    other => other.to_string(),
                };
                errors.push(FieldError::new("output_path", reason));
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meta_command() {
        let config = CliConfig::parse_from([
            "seo-tools",
            "meta",
            "--title",
            "Home",
            "--description",
            "Welcome",
            "--twitter-card",
            "summary",
            "--noindex",
        ]);
        match config.command {
            Command::Meta(args) => {
                assert_eq!(args.title.as_deref(), Some("Home"));
                assert_eq!(args.twitter_card, Some(TwitterCardType::Summary));
                assert!(args.noindex);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let config = CliConfig::parse_from([
            "seo-tools",
            "robots",
            "--disallow",
            "/admin",
            "--save",
            "--output-path",
            "./public",
        ]);
        assert!(config.save);
        assert_eq!(config.output_path, "./public");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_canonical_params() {
        let config = CliConfig::parse_from([
            "seo-tools",
            "canonical",
            "--base",
            "https://x.com",
            "--param",
            "page=2",
        ]);
        match config.command {
            Command::Canonical(args) => {
                assert_eq!(args.params, vec![("page".to_string(), "2".to_string())]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(parse_key_value("novalue").is_err());
    }

    #[test]
    fn test_schema_type_and_page_source() {
        let config = CliConfig::parse_from(["seo-tools", "schema", "--type", "WebSite"]);
        assert!(matches!(
            config.command,
            Command::Schema(SchemaArgs {
                schema_type: SchemaType::WebSite,
                ..
            })
        ));

        assert!(CliConfig::try_parse_from(["seo-tools", "score"]).is_err());
        assert!(CliConfig::try_parse_from(["seo-tools", "score", "--url", "https://x.com"]).is_ok());
    }
}
