//! XML sitemap generation, parsing and merging.

use crate::core::markup::escape_xml;
use crate::domain::model::{Artifact, ChangeFrequency, SitemapEntry};
use crate::domain::ports::Tool;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_range, validate_required_field, validate_url, FieldError, FieldErrors, Validate,
};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
pub const SITEMAP_FILE_NAME: &str = "sitemap.xml";

/// Prefixes `base_url` unless `url` is already absolute.
pub fn absolutize(url: &str, base_url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("{}{}", base_url, url)
    }
}

pub fn generate_sitemap(entries: &[SitemapEntry], base_url: &str) -> String {
    let urlset = entries
        .iter()
        .map(|entry| {
            let mut xml = String::from("  <url>\n");
            xml.push_str(&format!(
                "    <loc>{}</loc>\n",
                escape_xml(&absolutize(&entry.url, base_url))
            ));
            if let Some(modified) = entry.last_modified {
                xml.push_str(&format!(
                    "    <lastmod>{}</lastmod>\n",
                    modified.to_rfc3339_opts(SecondsFormat::Millis, true)
                ));
            }
            if let Some(frequency) = entry.change_frequency {
                xml.push_str(&format!("    <changefreq>{}</changefreq>\n", frequency));
            }
            if let Some(priority) = entry.priority {
                xml.push_str(&format!(
                    "    <priority>{:.1}</priority>\n",
                    (priority * 10.0).round() / 10.0
                ));
            }
            xml.push_str("  </url>");
            xml
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"{}\">\n{}\n</urlset>",
        SITEMAP_NAMESPACE, urlset
    )
}

#[derive(Clone, Copy)]
enum UrlField {
    Loc,
    LastMod,
    ChangeFreq,
    Priority,
}

fn parse_lastmod(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|at| at.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|at| at.and_utc())
        })
}

/// Reads the `<url>` entries of an existing sitemap. Unknown or malformed
/// optional fields are skipped; entries without `<loc>` are dropped.
pub fn parse_sitemap(xml: &str) -> Result<Vec<SitemapEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<SitemapEntry> = None;
    let mut field: Option<UrlField> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                field = match e.local_name().as_ref() {
                    b"url" => {
                        current = Some(SitemapEntry::default());
                        None
                    }
                    b"loc" => Some(UrlField::Loc),
                    b"lastmod" => Some(UrlField::LastMod),
                    b"changefreq" => Some(UrlField::ChangeFreq),
                    b"priority" => Some(UrlField::Priority),
                    _ => None,
                };
            }
            Event::Text(text) => {
                if let (Some(entry), Some(field)) = (current.as_mut(), field) {
                    let value = text.unescape()?;
                    let value = value.trim();
                    match field {
                        UrlField::Loc => entry.url = value.to_string(),
                        UrlField::LastMod => entry.last_modified = parse_lastmod(value),
                        UrlField::ChangeFreq => {
                            entry.change_frequency = value.parse::<ChangeFrequency>().ok()
                        }
                        UrlField::Priority => entry.priority = value.parse::<f32>().ok(),
                    }
                }
            }
            Event::End(e) => {
                if e.local_name().as_ref() == b"url" {
                    match current.take() {
                        Some(entry) if !entry.url.is_empty() => entries.push(entry),
                        Some(_) => tracing::warn!("Skipping sitemap entry without <loc>"),
                        None => {}
                    }
                }
                field = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    tracing::debug!("Parsed {} sitemap entries", entries.len());
    Ok(entries)
}

/// Replaces the entry with the same URL (keeping fields the new entry leaves
/// unset) or appends the new entry.
pub fn add_to_sitemap(existing: &[SitemapEntry], new_entry: SitemapEntry) -> Vec<SitemapEntry> {
    let mut entries = existing.to_vec();
    match entries.iter_mut().find(|e| e.url == new_entry.url) {
        Some(entry) => {
            if new_entry.last_modified.is_some() {
                entry.last_modified = new_entry.last_modified;
            }
            if new_entry.change_frequency.is_some() {
                entry.change_frequency = new_entry.change_frequency;
            }
            if new_entry.priority.is_some() {
                entry.priority = new_entry.priority;
            }
        }
        None => entries.push(new_entry),
    }
    entries
}

/// Folds `new_entries` into `existing`, resolving relative URLs against
/// `base_url` so they match the absolute URLs of a parsed sitemap.
pub fn merge_entries(
    existing: Vec<SitemapEntry>,
    new_entries: Vec<SitemapEntry>,
    base_url: &str,
) -> Vec<SitemapEntry> {
    new_entries.into_iter().fold(existing, |entries, mut entry| {
        entry.url = absolutize(&entry.url, base_url);
        add_to_sitemap(&entries, entry)
    })
}

/// Sitemap generator input: base URL plus the page list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sitemap {
    pub base_url: String,
    pub entries: Vec<SitemapEntry>,
}

impl Sitemap {
    pub fn new(base_url: impl Into<String>, entries: Vec<SitemapEntry>) -> Self {
        Self {
            base_url: base_url.into(),
            entries,
        }
    }
}

impl Validate for Sitemap {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::new();
        errors.check(validate_url("base_url", Some(&self.base_url)));

        if self.entries.is_empty() {
            errors.push(FieldError::new("entries", "Add at least one URL"));
        }

        for (i, entry) in self.entries.iter().enumerate() {
            let field = format!("entries[{}].url", i);
            if let Err(e) = validate_required_field(&field, Some(&entry.url)) {
                errors.push(e);
            } else if entry.url.starts_with("http") {
                errors.check(validate_url(&field, Some(&entry.url)));
            } else if !entry.url.starts_with('/') {
                errors.push(FieldError::new(
                    field,
                    "Relative URLs must start with '/'",
                ));
            }

            if let Some(priority) = entry.priority {
                errors.check(validate_range(
                    &format!("entries[{}].priority", i),
                    priority,
                    0.0,
                    1.0,
                ));
            }
        }
        errors.into_vec()
    }
}

impl Tool for Sitemap {
    fn name(&self) -> &'static str {
        "sitemap"
    }

    fn generate(&self) -> Result<Artifact> {
        Ok(Artifact::new(
            SITEMAP_FILE_NAME,
            "application/xml",
            generate_sitemap(&self.entries, &self.base_url),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generate_full_entry() {
        let modified = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let entries = vec![SitemapEntry::new("/")
            .with_last_modified(modified)
            .with_change_frequency(ChangeFrequency::Weekly)
            .with_priority(1.0)];

        let xml = generate_sitemap(&entries, "https://scalesite.app");
        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
  <url>\n\
    <loc>https://scalesite.app/</loc>\n\
    <lastmod>2024-01-15T10:30:00.000Z</lastmod>\n\
    <changefreq>weekly</changefreq>\n\
    <priority>1.0</priority>\n\
  </url>\n\
</urlset>";
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_priority_rounds_half_up() {
        let entries = vec![
            SitemapEntry::new("/a").with_priority(0.25),
            SitemapEntry::new("/b").with_priority(0.75),
            SitemapEntry::new("/c").with_priority(0.8),
        ];
        let xml = generate_sitemap(&entries, "https://scalesite.app");
        assert!(xml.contains("<priority>0.3</priority>"));
        assert!(xml.contains("<priority>0.8</priority>"));
        assert!(!xml.contains("<priority>0.2</priority>"));
    }

    #[test]
    fn test_absolute_urls_are_kept() {
        let entries = vec![SitemapEntry::new("https://blog.scalesite.app/post")];
        let xml = generate_sitemap(&entries, "https://scalesite.app");
        assert!(xml.contains("<loc>https://blog.scalesite.app/post</loc>"));
    }

    #[test]
    fn test_loc_is_escaped() {
        let entries = vec![SitemapEntry::new("/search?q=<seo>&lang='de'")];
        let xml = generate_sitemap(&entries, "https://x.com");
        assert!(xml.contains(
            "<loc>https://x.com/search?q=&lt;seo&gt;&amp;lang=&apos;de&apos;</loc>"
        ));
    }

    #[test]
    fn test_parse_roundtrip_unescapes() {
        let entries = vec![
            SitemapEntry::new("/a?b=1&c=\"2\"").with_priority(0.8),
            SitemapEntry::new("/team").with_change_frequency(ChangeFrequency::Monthly),
        ];
        let xml = generate_sitemap(&entries, "https://x.com");
        let parsed = parse_sitemap(&xml).unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].url, "https://x.com/a?b=1&c=\"2\"");
        assert_eq!(parsed[0].priority, Some(0.8));
        assert_eq!(parsed[1].change_frequency, Some(ChangeFrequency::Monthly));
    }

    #[test]
    fn test_parse_accepts_plain_dates() {
        let xml = r#"<urlset><url><loc>https://x.com/</loc><lastmod>2023-05-01</lastmod></url></urlset>"#;
        let parsed = parse_sitemap(xml).unwrap();
        assert_eq!(
            parsed[0].last_modified,
            Some(Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_add_to_sitemap_merges_existing() {
        let existing = vec![SitemapEntry::new("/")
            .with_priority(1.0)
            .with_change_frequency(ChangeFrequency::Daily)];

        let updated = add_to_sitemap(&existing, SitemapEntry::new("/").with_priority(0.9));
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].priority, Some(0.9));
        assert_eq!(updated[0].change_frequency, Some(ChangeFrequency::Daily));

        let appended = add_to_sitemap(&updated, SitemapEntry::new("/blog"));
        assert_eq!(appended.len(), 2);
        assert_eq!(appended[1].url, "/blog");
    }

    #[test]
    fn test_merge_entries_matches_relative_urls() {
        let existing = vec![SitemapEntry::new("https://x.com/").with_priority(1.0)];
        let merged = merge_entries(
            existing,
            vec![
                SitemapEntry::new("/").with_change_frequency(ChangeFrequency::Daily),
                SitemapEntry::new("/kontakt"),
            ],
            "https://x.com",
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].priority, Some(1.0));
        assert_eq!(merged[0].change_frequency, Some(ChangeFrequency::Daily));
        assert_eq!(merged[1].url, "https://x.com/kontakt");
    }

    #[test]
    fn test_validation() {
        let sitemap = Sitemap::new(
            "scalesite.app",
            vec![
                SitemapEntry::new("about"),
                SitemapEntry::new("/pricing").with_priority(2.0),
                SitemapEntry::new(""),
                SitemapEntry::new("/nan").with_priority(f32::NAN),
                SitemapEntry::new("/inf").with_priority(f32::INFINITY),
            ],
        );
        let fields: Vec<String> = sitemap.field_errors().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "base_url",
                "entries[0].url",
                "entries[1].priority",
                "entries[2].url",
                "entries[3].priority",
                "entries[4].priority"
            ]
        );
    }
}
