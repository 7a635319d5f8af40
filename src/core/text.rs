//! Text helpers shared by the generators: keywords, slugs and canonical URLs.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use url::Url;

/// Query parameters that never belong in a canonical URL.
pub const TRACKING_PARAMS: [&str; 7] = [
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
];

const MAX_KEYWORDS: usize = 10;

fn punctuation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_\s]").expect("valid punctuation regex"))
}

fn slug_forbidden() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9_\s-]").expect("valid slug regex"))
}

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

fn dash_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-+").expect("valid dash regex"))
}

fn html_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag regex"))
}

/// Most frequent words longer than three characters, at most ten.
///
/// Ties keep the order in which the words first appear.
pub fn extract_keywords(text: &str, min_frequency: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = punctuation().replace_all(&lowered, "");

    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for word in cleaned.split_whitespace().filter(|w| w.chars().count() > 3) {
        match positions.get(word) {
            Some(&i) => counts[i].1 += 1,
            None => {
                positions.insert(word, counts.len());
                counts.push((word.to_string(), 1));
            }
        }
    }

    counts.retain(|(_, count)| *count >= min_frequency);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(word, _)| word)
        .collect()
}

pub fn generate_slug(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept = slug_forbidden().replace_all(&lowered, "");
    let dashed = whitespace_run().replace_all(kept.trim(), "-");
    dash_run()
        .replace_all(&dashed, "-")
        .trim_matches('-')
        .to_string()
}

/// Removes markup and collapses whitespace.
pub fn strip_html(text: &str) -> String {
    let without_tags = html_tag().replace_all(text, " ");
    whitespace_run()
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}

/// Resolves `path` against `base_url`, applies `params` and drops tracking parameters.
///
/// Falls back to plain concatenation when `base_url` is not a URL.
pub fn generate_canonical_url(base_url: &str, path: &str, params: &[(&str, &str)]) -> String {
    let mut url = match Url::parse(base_url).and_then(|base| base.join(path)) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Canonical URL fallback for '{}': {}", path, e);
            return if path.starts_with("http") {
                path.to_string()
            } else {
                format!("{}{}", base_url, path)
            };
        }
    };

    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    for (key, value) in params {
        match pairs.iter().position(|(k, _)| k.as_str() == *key) {
            Some(first) => {
                pairs[first].1 = value.to_string();
                let mut index = 0;
                pairs.retain(|(k, _)| {
                    let keep = index == first || k.as_str() != *key;
                    index += 1;
                    keep
                });
            }
            None => pairs.push((key.to_string(), value.to_string())),
        }
    }
    pairs.retain(|(k, _)| !TRACKING_PARAMS.contains(&k.as_str()));

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs.iter());
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_keywords_orders_by_frequency() {
        let text = "Rust builds fast tools. Fast tools, fast builds! Rust rust RUST tools.";
        let keywords = extract_keywords(text, 2);
        assert_eq!(keywords, vec!["rust", "fast", "tools", "builds"]);
    }

    #[test]
    fn test_extract_keywords_skips_short_words_and_caps_at_ten() {
        let text = (0..12)
            .map(|i| format!("word{i} word{i} the and"))
            .collect::<Vec<_>>()
            .join(" ");
        let keywords = extract_keywords(&text, 2);
        assert_eq!(keywords.len(), 10);
        assert!(!keywords.contains(&"the".to_string()));
        assert_eq!(keywords[0], "word0");
    }

    #[test]
    fn test_generate_slug() {
        assert_eq!(generate_slug("Hello World!"), "hello-world");
        assert_eq!(generate_slug("  SEO -- Tools & Tips  "), "seo-tools-tips");
        assert_eq!(generate_slug("web_design 2024"), "web_design-2024");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>web</b>\n\n world</p>"), "Hello web world");
    }

    #[test]
    fn test_canonical_strips_tracking_params() {
        let url = generate_canonical_url(
            "https://scalesite.app",
            "/pricing?utm_source=newsletter&plan=pro&gclid=abc",
            &[],
        );
        assert_eq!(url, "https://scalesite.app/pricing?plan=pro");
    }

    #[test]
    fn test_canonical_sets_params() {
        let url = generate_canonical_url(
            "https://scalesite.app/",
            "blog?page=1&page=2",
            &[("page", "3"), ("lang", "de")],
        );
        assert_eq!(url, "https://scalesite.app/blog?page=3&lang=de");
    }

    #[test]
    fn test_canonical_without_query_has_no_question_mark() {
        let url = generate_canonical_url("https://scalesite.app", "/about?fbclid=1", &[]);
        assert_eq!(url, "https://scalesite.app/about");
    }

    #[test]
    fn test_canonical_falls_back_on_invalid_base() {
        assert_eq!(generate_canonical_url("not a url", "/about", &[]), "not a url/about");
        assert_eq!(
            generate_canonical_url("not a url", "https://x.com/a", &[]),
            "https://x.com/a"
        );
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("mailto:team@example.com"));
        assert!(!is_valid_url("example.com"));
    }
}
