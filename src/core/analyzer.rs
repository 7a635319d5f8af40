//! On-page analysis of fetched or pasted HTML.

use crate::core::text::strip_html;
use crate::domain::model::{Heading, Image, ScoreInput};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

macro_rules! selector {
    ($css:literal) => {{
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        SELECTOR.get_or_init(|| Selector::parse($css).expect("valid CSS selector"))
    }};
}

const AVG_SYLLABLES_PER_WORD: f64 = 1.5;

fn script_or_style() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script[^>]*>.*?</script>|<style[^>]*>.*?</style>")
            .expect("valid script/style regex")
    })
}

/// Head tags relevant to SEO, as found in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub twitter_card: Option<String>,
    pub canonical: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn first_attr(doc: &Html, selector: &Selector, attr: &str) -> Option<String> {
    doc.select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .and_then(non_empty)
}

fn element_text(el: ElementRef<'_>) -> String {
    let raw = el.text().collect::<Vec<_>>().join(" ");
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn extract_title(doc: &Html) -> Option<String> {
    doc.select(selector!("title"))
        .next()
        .map(element_text)
        .and_then(|t| non_empty(&t))
}

fn extract_meta(doc: &Html) -> ExtractedMeta {
    ExtractedMeta {
        title: extract_title(doc),
        description: first_attr(doc, selector!("meta[name='description']"), "content"),
        og_title: first_attr(doc, selector!("meta[property='og:title']"), "content"),
        og_description: first_attr(doc, selector!("meta[property='og:description']"), "content"),
        og_image: first_attr(doc, selector!("meta[property='og:image']"), "content"),
        twitter_card: first_attr(doc, selector!("meta[name='twitter:card']"), "content"),
        canonical: first_attr(doc, selector!("link[rel='canonical']"), "href"),
    }
}

pub fn extract_meta_tags_from_html(html: &str) -> ExtractedMeta {
    extract_meta(&Html::parse_document(html))
}

/// Document text without scripts, styles or markup.
pub fn visible_text(html: &str) -> String {
    strip_html(&script_or_style().replace_all(html, " "))
}

fn extract_headings(doc: &Html) -> Vec<Heading> {
    doc.select(selector!("h1, h2, h3, h4, h5, h6"))
        .filter_map(|el| {
            let level = el.value().name().trim_start_matches('h').parse::<u8>().ok()?;
            Some(Heading::new(level, element_text(el)))
        })
        .collect()
}

fn extract_images(doc: &Html) -> Vec<Image> {
    doc.select(selector!("img"))
        .map(|el| Image {
            src: el.value().attr("src").map(str::to_string),
            alt: el.value().attr("alt").map(str::to_string),
        })
        .collect()
}

/// Builds scorer input from a full HTML document.
pub fn extract_score_input(html: &str) -> ScoreInput {
    let doc = Html::parse_document(html);
    let meta = extract_meta(&doc);
    let content = visible_text(html);

    ScoreInput {
        title: meta.title,
        description: meta.description,
        content: non_empty(&content),
        headings: extract_headings(&doc),
        images: extract_images(&doc),
        url: meta.canonical,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Good,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthCheck {
    pub content: String,
    pub length: usize,
    pub status: CheckStatus,
    pub message: String,
}

impl LengthCheck {
    fn new(content: Option<String>, min: usize, max: usize, hint: &str) -> Self {
        let content = content.unwrap_or_default();
        let length = content.chars().count();
        let in_band = (min..=max).contains(&length);
        let status = if in_band {
            CheckStatus::Good
        } else if length > 0 {
            CheckStatus::Warning
        } else {
            CheckStatus::Error
        };

        Self {
            content,
            length,
            status,
            message: if in_band { "Good length" } else { hint }.to_string(),
        }
    }

    fn in_band(&self) -> bool {
        self.status == CheckStatus::Good
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCounts {
    pub h1: usize,
    pub h2: usize,
    pub h3: usize,
    pub h4: usize,
    pub h5: usize,
    pub h6: usize,
}

impl HeadingCounts {
    fn from_headings(headings: &[Heading]) -> Self {
        let mut counts = Self::default();
        for heading in headings {
            match heading.level {
                1 => counts.h1 += 1,
                2 => counts.h2 += 1,
                3 => counts.h3 += 1,
                4 => counts.h4 += 1,
                5 => counts.h5 += 1,
                6 => counts.h6 += 1,
                _ => {}
            }
        }
        counts
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDensity {
    pub keyword: String,
    /// Percentage of words containing the keyword.
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageAnalysis {
    pub title: LengthCheck,
    pub meta_description: LengthCheck,
    pub headings: HeadingCounts,
    pub word_count: usize,
    pub readability_score: i64,
    pub keyword_density: Vec<KeywordDensity>,
    pub recommendations: Vec<String>,
    pub score: u32,
}

/// Simplified Flesch reading ease with a fixed syllable estimate.
pub fn readability_score(text: &str) -> f64 {
    let words = text.split_whitespace().count();
    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count()
        .max(1);
    let words_per_sentence = words as f64 / sentences as f64;
    206.835 - 1.015 * words_per_sentence - 84.6 * AVG_SYLLABLES_PER_WORD
}

fn keyword_density(words: &[String], keywords: &[String]) -> Vec<KeywordDensity> {
    keywords
        .iter()
        .map(|keyword| {
            let needle = keyword.to_lowercase();
            let density = if words.is_empty() {
                0.0
            } else {
                let hits = words.iter().filter(|w| w.contains(&needle)).count();
                hits as f64 / words.len() as f64 * 100.0
            };
            KeywordDensity {
                keyword: keyword.clone(),
                density,
            }
        })
        .collect()
}

pub fn analyze_html(html: &str, keywords: &[String]) -> PageAnalysis {
    let doc = Html::parse_document(html);
    let meta = extract_meta(&doc);
    let headings = HeadingCounts::from_headings(&extract_headings(&doc));

    let text = visible_text(html);
    let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
    let word_count = words.len();
    let readability = readability_score(&text);

    let title = LengthCheck::new(meta.title, 30, 60, "Aim for 50-60 characters");
    let meta_description =
        LengthCheck::new(meta.description, 120, 160, "Aim for 150-160 characters");

    let mut recommendations = Vec::new();
    if title.length < 30 {
        recommendations.push("Title tag is too short. Aim for 50-60 characters.".to_string());
    } else if title.length > 60 {
        recommendations.push("Title tag is too long. Keep it under 60 characters.".to_string());
    }
    if meta_description.length < 120 {
        recommendations
            .push("Meta description is too short. Aim for 150-160 characters.".to_string());
    } else if meta_description.length > 160 {
        recommendations
            .push("Meta description is too long. Keep it under 160 characters.".to_string());
    }
    match headings.h1 {
        0 => recommendations.push("Missing H1 heading. Add one for better SEO.".to_string()),
        1 => {}
        _ => recommendations
            .push("Multiple H1 headings found. Use only one H1 per page.".to_string()),
    }
    if word_count < 300 {
        recommendations.push("Content is too short. Aim for at least 300 words.".to_string());
    }

    let mut score: i32 = 100;
    if !title.in_band() {
        score -= 10;
    }
    if !meta_description.in_band() {
        score -= 10;
    }
    if headings.h1 != 1 {
        score -= 15;
    }
    if word_count < 300 {
        score -= 20;
    }
    if readability < 30.0 {
        score -= 10;
    }

    PageAnalysis {
        title,
        meta_description,
        headings,
        word_count,
        readability_score: readability.round() as i64,
        keyword_density: keyword_density(&words, keywords),
        recommendations,
        score: score.max(0) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!doctype html>
<html>
<head>
  <title>ScaleSite | Web Design</title>
  <meta name="description" content="Websites for growing teams.">
  <meta property="og:title" content="ScaleSite">
  <meta property="og:image" content="https://scalesite.app/og.png">
  <meta name="twitter:card" content="summary">
  <link rel="canonical" href="https://scalesite.app/">
  <style>body { color: red; }</style>
  <script>var tracking = "ignore me";</script>
</head>
<body>
  <h1>Web design that scales</h1>
  <h2>Services</h2>
  <h2>Pricing</h2>
  <p>We build fast websites. Design and SEO go together!</p>
  <img src="/hero.png" alt="Hero">
  <img src="/team.png">
</body>
</html>"#;

    #[test]
    fn test_extract_meta_tags() {
        let meta = extract_meta_tags_from_html(PAGE);
        assert_eq!(meta.title.as_deref(), Some("ScaleSite | Web Design"));
        assert_eq!(meta.description.as_deref(), Some("Websites for growing teams."));
        assert_eq!(meta.og_title.as_deref(), Some("ScaleSite"));
        assert!(meta.og_description.is_none());
        assert_eq!(meta.og_image.as_deref(), Some("https://scalesite.app/og.png"));
        assert_eq!(meta.twitter_card.as_deref(), Some("summary"));
        assert_eq!(meta.canonical.as_deref(), Some("https://scalesite.app/"));
    }

    #[test]
    fn test_extract_from_empty_document() {
        assert_eq!(extract_meta_tags_from_html(""), ExtractedMeta::default());
    }

    #[test]
    fn test_extract_score_input() {
        let input = extract_score_input(PAGE);
        assert_eq!(input.headings.len(), 3);
        assert_eq!(input.headings[0], Heading::new(1, "Web design that scales"));
        assert_eq!(input.images.len(), 2);
        assert_eq!(input.images[1].alt, None);

        let content = input.content.unwrap();
        assert!(content.contains("We build fast websites."));
        assert!(!content.contains("tracking"));
        assert!(!content.contains("color"));
    }

    #[test]
    fn test_readability_formula() {
        let score = readability_score("one two three four. five six seven eight.");
        assert!((score - (206.835 - 1.015 * 4.0 - 126.9)).abs() < 1e-9);
        assert!((readability_score("") - (206.835 - 126.9)).abs() < 1e-9);
    }

    #[test]
    fn test_analyze_short_page() {
        let analysis = analyze_html(PAGE, &["design".to_string(), "cloud".to_string()]);

        assert_eq!(analysis.title.status, CheckStatus::Warning);
        assert_eq!(analysis.meta_description.status, CheckStatus::Warning);
        assert_eq!(analysis.headings.h1, 1);
        assert_eq!(analysis.headings.h2, 2);
        assert_eq!(analysis.recommendations.len(), 3);
        // Title, description and content length deductions.
        assert_eq!(analysis.score, 60);

        let design = &analysis.keyword_density[0];
        assert!(design.density > 0.0);
        assert_eq!(analysis.keyword_density[1].density, 0.0);
    }

    #[test]
    fn test_analyze_empty_document() {
        let analysis = analyze_html("", &["seo".to_string()]);
        assert_eq!(analysis.word_count, 0);
        assert_eq!(analysis.title.status, CheckStatus::Error);
        assert_eq!(analysis.keyword_density[0].density, 0.0);
        assert_eq!(analysis.score, 45);
    }
}
