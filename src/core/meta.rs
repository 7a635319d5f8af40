//! HTML meta tag generation for a single page.

use crate::core::markup::{escape_xml, render_meta_tags};
use crate::core::present;
use crate::core::text::{extract_keywords, strip_html};
use crate::domain::model::{Artifact, MetaTag, SeoMetadata, TwitterCardType};
use crate::domain::ports::Tool;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_optional_url, validate_required_field, FieldError, FieldErrors, Validate,
};

const AUTO_DESCRIPTION_CHARS: usize = 157;
const AUTO_KEYWORD_MIN_FREQUENCY: usize = 3;

pub fn generate_meta_tags(metadata: &SeoMetadata) -> Vec<MetaTag> {
    let mut tags = vec![
        MetaTag::name("title", &metadata.title),
        MetaTag::name("description", &metadata.description),
    ];

    if let Some(keywords) = present(&metadata.keywords) {
        tags.push(MetaTag::name("keywords", keywords));
    }

    let og_title = present(&metadata.og_title);
    let og_description = present(&metadata.og_description);
    let og_image = present(&metadata.og_image);

    if let Some(title) = og_title {
        tags.push(MetaTag::property("og:title", title));
    }
    if let Some(description) = og_description {
        tags.push(MetaTag::property("og:description", description));
    }
    if let Some(image) = og_image {
        tags.push(MetaTag::property("og:image", image));
    }
    tags.push(MetaTag::property("og:type", "website"));

    if let Some(card) = metadata.twitter_card {
        tags.push(MetaTag::name("twitter:card", card.as_str()));
        tags.push(MetaTag::name(
            "twitter:title",
            og_title.unwrap_or(metadata.title.as_str()),
        ));
        tags.push(MetaTag::name(
            "twitter:description",
            og_description.unwrap_or(metadata.description.as_str()),
        ));
        if let Some(image) = og_image {
            tags.push(MetaTag::name("twitter:image", image));
        }
    }

    let mut robots = Vec::new();
    if metadata.noindex {
        robots.push("noindex");
    }
    if metadata.nofollow {
        robots.push("nofollow");
    }
    if !robots.is_empty() {
        tags.push(MetaTag::name("robots", robots.join(", ")));
    }

    tags
}

/// `<title>`, the meta tags and a canonical link, ready for a page `<head>`.
pub fn render_head(metadata: &SeoMetadata) -> String {
    let mut lines = vec![format!("<title>{}</title>", escape_xml(&metadata.title))];
    lines.push(render_meta_tags(&generate_meta_tags(metadata)));
    if let Some(canonical) = present(&metadata.canonical) {
        lines.push(format!(
            r#"<link rel="canonical" href="{}" />"#,
            escape_xml(canonical)
        ));
    }
    lines.join("\n")
}

/// Derives metadata from page content: description, keywords and social defaults.
pub fn auto_generate_meta_tags(
    title: Option<&str>,
    content: Option<&str>,
    url: Option<&str>,
) -> SeoMetadata {
    let title = title.map(str::trim).unwrap_or_default().to_string();

    let (description, keywords) = match content {
        Some(text) if !text.trim().is_empty() => {
            let clean = strip_html(text);
            let mut description: String = clean.chars().take(AUTO_DESCRIPTION_CHARS).collect();
            if clean.chars().count() > AUTO_DESCRIPTION_CHARS {
                description.push_str("...");
            }
            let keywords = extract_keywords(&clean, AUTO_KEYWORD_MIN_FREQUENCY).join(", ");
            (description, keywords)
        }
        _ => (String::new(), String::new()),
    };

    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

    SeoMetadata {
        og_title: non_empty(&title),
        og_description: non_empty(&description),
        keywords: non_empty(&keywords),
        title,
        description,
        og_image: None,
        twitter_card: Some(TwitterCardType::SummaryLargeImage),
        canonical: url.and_then(non_empty),
        noindex: false,
        nofollow: false,
    }
}

impl Validate for SeoMetadata {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::new();
        errors
            .check(validate_required_field("title", Some(&self.title)))
            .check(validate_required_field("description", Some(&self.description)))
            .check(validate_optional_url("og_image", self.og_image.as_deref()))
            .check(validate_optional_url("canonical", self.canonical.as_deref()));
        errors.into_vec()
    }
}

impl Tool for SeoMetadata {
    fn name(&self) -> &'static str {
        "meta-tags"
    }

    fn generate(&self) -> Result<Artifact> {
        Ok(Artifact::new("meta-tags.html", "text/html", render_head(self)))
    }
}
