//! Site audits: a real single-page auditor and the dashboard's demo auditor.

use crate::core::analyzer::extract_meta_tags_from_html;
use crate::domain::model::{percentage, AuditReport, SeoIssue, Severity};
use crate::domain::ports::Fetcher;
use crate::utils::error::{Result, SeoError};
use crate::utils::validation::validate_url;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scraper::{Html, Selector};
use std::sync::OnceLock;
use std::time::Duration;

pub const AUDIT_MAX_SCORE: u32 = 100;

fn h1_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("h1").expect("valid h1 selector"))
}

fn img_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("img").expect("valid img selector"))
}

fn canonical_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| {
        Selector::parse("link[rel='canonical']").expect("valid canonical selector")
    })
}

/// Accumulates points and findings for one report.
#[derive(Debug, Default)]
struct ReportBuilder {
    score: u32,
    issues: Vec<SeoIssue>,
    warnings: Vec<SeoIssue>,
    passes: Vec<SeoIssue>,
}

impl ReportBuilder {
    fn add(&mut self, points: u32, finding: SeoIssue) -> &mut Self {
        self.score += points;
        match finding.severity {
            Severity::Critical => self.issues.push(finding),
            Severity::Warning => self.warnings.push(finding),
            Severity::Info => self.passes.push(finding),
        }
        self
    }

    fn build(self, url: &str, simulated: bool) -> AuditReport {
        let score = self.score.min(AUDIT_MAX_SCORE);
        AuditReport {
            url: url.to_string(),
            score,
            max_score: AUDIT_MAX_SCORE,
            percentage: percentage(score, AUDIT_MAX_SCORE),
            timestamp: Utc::now(),
            simulated,
            issues: self.issues,
            warnings: self.warnings,
            passes: self.passes,
        }
    }
}

fn ensure_auditable(url: &str) -> Result<()> {
    validate_url("url", Some(url)).map_err(|e| SeoError::InvalidUrl {
        url: url.to_string(),
        reason: e.reason,
    })
}

impl AuditReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// `seo-audit-<epoch millis>.json`
    pub fn file_name(&self) -> String {
        format!("seo-audit-{}.json", self.timestamp.timestamp_millis())
    }
}

/// Runs the on-page checks against an already fetched document.
pub fn audit_html(url: &str, html: &str) -> AuditReport {
    let meta = extract_meta_tags_from_html(html);
    let doc = Html::parse_document(html);
    let mut report = ReportBuilder::default();

    if url.starts_with("https://") {
        report.add(10, SeoIssue::info("Security", "Website uses HTTPS"));
    } else {
        report.add(
            0,
            SeoIssue::critical("Security", "Website does not use HTTPS")
                .with_recommendation("Install an SSL certificate"),
        );
    }

    match meta.title.as_deref().map(|t| t.chars().count()) {
        Some(len) if (50..=60).contains(&len) => {
            report.add(15, SeoIssue::info("Meta Tags", "Title length is optimal"));
        }
        Some(len) => {
            report.add(
                8,
                SeoIssue::warning(
                    "Meta Tags",
                    format!("Title is {} characters (optimal: 50-60)", len),
                )
                .with_recommendation("Adjust title length to 50-60 characters"),
            );
        }
        None => {
            report.add(
                0,
                SeoIssue::critical("Meta Tags", "Missing title tag")
                    .with_recommendation("Add a title tag to your page"),
            );
        }
    }

    match meta.description.as_deref().map(|d| d.chars().count()) {
        Some(len) if (150..=160).contains(&len) => {
            report.add(
                15,
                SeoIssue::info("Meta Tags", "Meta description length is optimal"),
            );
        }
        Some(len) => {
            report.add(
                8,
                SeoIssue::warning(
                    "Meta Tags",
                    format!("Description is {} characters (optimal: 150-160)", len),
                )
                .with_recommendation("Adjust description length to 150-160 characters"),
            );
        }
        None => {
            report.add(
                0,
                SeoIssue::critical("Meta Tags", "Missing meta description")
                    .with_recommendation("Add a meta description to your page"),
            );
        }
    }

    if meta.og_title.is_some() && meta.og_description.is_some() {
        report.add(10, SeoIssue::info("Open Graph", "Open Graph tags are present"));
    } else {
        report.add(
            5,
            SeoIssue::warning("Open Graph", "Missing or incomplete Open Graph tags")
                .with_recommendation(
                    "Add complete Open Graph tags for better social media sharing",
                ),
        );
    }

    if meta.twitter_card.is_some() {
        report.add(10, SeoIssue::info("Twitter Card", "Twitter Card is configured"));
    } else {
        report.add(
            5,
            SeoIssue::warning("Twitter Card", "Missing Twitter Card")
                .with_recommendation("Add Twitter Card meta tags for better Twitter sharing"),
        );
    }

    match doc.select(h1_selector()).count() {
        0 => {
            report.add(
                0,
                SeoIssue::critical("Content", "Missing H1 heading")
                    .with_recommendation("Add one H1 heading to your page"),
            );
        }
        1 => {
            report.add(10, SeoIssue::info("Content", "Page has exactly one H1 heading"));
        }
        count => {
            report.add(
                5,
                SeoIssue::warning("Content", format!("Page has {} H1 headings", count))
                    .with_recommendation("Use only one H1 heading per page"),
            );
        }
    }

    let images: Vec<_> = doc.select(img_selector()).collect();
    if !images.is_empty() {
        let with_alt = images
            .iter()
            .filter(|img| img.value().attr("alt").is_some())
            .count();
        let ratio = with_alt as f64 / images.len() as f64;

        if with_alt == images.len() {
            report.add(10, SeoIssue::info("Accessibility", "All images have alt text"));
        } else if ratio >= 0.8 {
            report.add(
                7,
                SeoIssue::warning(
                    "Accessibility",
                    format!("{}% of images have alt text", (ratio * 100.0).round() as u32),
                )
                .with_recommendation("Add alt text to remaining images"),
            );
        } else {
            report.add(
                3,
                SeoIssue::critical("Accessibility", "Many images are missing alt text")
                    .with_recommendation("Add descriptive alt text to all images"),
            );
        }
    }

    if doc.select(canonical_selector()).next().is_some() {
        report.add(10, SeoIssue::info("Technical SEO", "Canonical URL is set"));
    } else {
        report.add(
            5,
            SeoIssue::warning("Technical SEO", "Missing canonical URL").with_recommendation(
                "Add a canonical link to prevent duplicate content issues",
            ),
        );
    }

    report.build(url, false)
}

/// Fetches a page and audits its markup.
pub struct HtmlAuditor<F: Fetcher> {
    fetcher: F,
}

impl<F: Fetcher> HtmlAuditor<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Rejects malformed URLs; fetch failures become a zero-score report.
    pub async fn audit(&self, url: &str) -> Result<AuditReport> {
        ensure_auditable(url)?;
        tracing::info!("Auditing {}", url);

        let failure = match self.fetcher.fetch(url).await {
            Ok(page) if (200..400).contains(&page.status) => {
                let report = audit_html(url, &page.html);
                tracing::info!(
                    "Audit of {} finished: {}/{}",
                    url,
                    report.score,
                    report.max_score
                );
                return Ok(report);
            }
            Ok(page) => format!("HTTP status {}", page.status),
            Err(e) => e.to_string(),
        };

        tracing::warn!("Audit of {} failed: {}", url, failure);
        let mut report = ReportBuilder::default();
        report.add(
            0,
            SeoIssue::critical("General", format!("Failed to audit URL: {}", failure)),
        );
        Ok(report.build(url, false))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditStep {
    pub check: &'static str,
    pub delay_ms: u64,
}

pub const AUDIT_STEPS: [AuditStep; 8] = [
    AuditStep { check: "SSL", delay_ms: 500 },
    AuditStep { check: "Meta Tags", delay_ms: 800 },
    AuditStep { check: "Performance", delay_ms: 1200 },
    AuditStep { check: "Mobile", delay_ms: 1000 },
    AuditStep { check: "Headings", delay_ms: 600 },
    AuditStep { check: "Images", delay_ms: 700 },
    AuditStep { check: "Links", delay_ms: 500 },
    AuditStep { check: "Speed", delay_ms: 900 },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuditProgress {
    pub step: usize,
    pub total: usize,
    pub check: &'static str,
    pub percent: f64,
}

/// Demo auditor that only looks at the URL scheme and rolls dice for
/// everything else. Reports are flagged `simulated`.
#[derive(Debug, Clone)]
pub struct SimulatedAuditor {
    seed: Option<u64>,
    delay_scale: f64,
}

impl Default for SimulatedAuditor {
    fn default() -> Self {
        Self {
            seed: None,
            delay_scale: 1.0,
        }
    }
}

impl SimulatedAuditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Multiplies every step delay; `0.0` runs without waiting.
    pub fn with_delay_scale(mut self, scale: f64) -> Self {
        self.delay_scale = scale.max(0.0);
        self
    }

    pub async fn audit<P>(&self, url: &str, mut progress: P) -> Result<AuditReport>
    where
        P: FnMut(AuditProgress) + Send,
    {
        if url.trim().is_empty() {
            return Err(SeoError::InvalidUrl {
                url: url.to_string(),
                reason: "URL cannot be empty".to_string(),
            });
        }
        ensure_auditable(url)?;
        tracing::info!("Running simulated audit for {}", url);

        let total = AUDIT_STEPS.len();
        for (i, step) in AUDIT_STEPS.iter().enumerate() {
            let delay = (step.delay_ms as f64 * self.delay_scale) as u64;
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            tracing::debug!("Simulated check '{}' done", step.check);
            progress(AuditProgress {
                step: i + 1,
                total,
                check: step.check,
                percent: (i + 1) as f64 / total as f64 * 100.0,
            });
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(simulate_checks(url, &mut rng))
    }
}

fn simulate_checks<R: Rng>(url: &str, rng: &mut R) -> AuditReport {
    let mut report = ReportBuilder::default();

    if url.starts_with("https://") {
        report.add(15, SeoIssue::info("SSL/HTTPS", "SSL certificate is valid"));
    } else {
        report.add(
            0,
            SeoIssue::critical("SSL/HTTPS", "Website is not using HTTPS").with_recommendation(
                "Install an SSL certificate to secure your website and improve search rankings",
            ),
        );
    }

    let performance: u32 = rng.gen_range(50..80);
    let message = format!("Performance score is {}/100", performance);
    if performance < 60 {
        report.add(
            5,
            SeoIssue::warning("Performance", message)
                .with_recommendation("Optimize images, minify CSS/JS, and enable compression"),
        );
    } else {
        report.add(
            10,
            SeoIssue::warning("Performance", message)
                .with_recommendation("Further optimization can improve user experience"),
        );
    }

    if rng.gen::<f64>() > 0.3 {
        report.add(15, SeoIssue::info("Mobile", "Website is mobile-friendly"));
    } else {
        report.add(
            0,
            SeoIssue::critical("Mobile", "Website is not mobile-friendly").with_recommendation(
                "Implement responsive design and optimize for mobile devices",
            ),
        );
    }

    if rng.gen::<f64>() > 0.4 {
        report.add(10, SeoIssue::info("Meta Tags", "Meta tags are properly configured"));
    } else {
        report.add(
            5,
            SeoIssue::warning("Meta Tags", "Missing or incomplete meta tags")
                .with_recommendation("Add title, description, and Open Graph tags to all pages"),
        );
    }

    if rng.gen::<f64>() > 0.3 {
        report.add(10, SeoIssue::info("Headings", "Proper heading structure found"));
    } else {
        report.add(
            5,
            SeoIssue::warning("Headings", "Heading structure could be improved")
                .with_recommendation("Use H1 for main title, H2-H6 for subheadings in hierarchy"),
        );
    }

    if rng.gen::<f64>() > 0.4 {
        report.add(10, SeoIssue::info("Images", "Images have alt text"));
    } else {
        report.add(
            5,
            SeoIssue::warning("Images", "Some images missing alt text").with_recommendation(
                "Add descriptive alt text to all images for accessibility and SEO",
            ),
        );
    }

    if rng.gen::<f64>() > 0.8 {
        report.add(
            5,
            SeoIssue::warning("Links", "Some broken links found")
                .with_recommendation("Fix broken internal and external links"),
        );
    } else {
        report.add(10, SeoIssue::info("Links", "No broken links detected"));
    }

    let load_ms: u32 = rng.gen_range(1000..4000);
    let seconds = (load_ms as f64 / 1000.0).round() as u32;
    if load_ms < 2000 {
        report.add(
            15,
            SeoIssue::info("Speed", format!("Page load time: {}s (Good)", seconds)),
        );
    } else {
        report.add(
            8,
            SeoIssue::warning(
                "Speed",
                format!("Page load time: {}s (Needs improvement)", seconds),
            )
            .with_recommendation("Optimize images and reduce server response time"),
        );
    }

    report.build(url, true)
}
