//! Open Graph and Twitter Card tags.

use crate::core::markup::render_meta_tags;
use crate::core::present;
use crate::domain::model::{Artifact, MetaTag, TwitterCardType};
use crate::domain::ports::Tool;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_max_length, validate_optional_url, validate_required_field, validate_url, FieldError,
    FieldErrors, Validate,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const OG_TITLE_MAX_LENGTH: usize = 95;
pub const OG_DESCRIPTION_MAX_LENGTH: usize = 200;
pub const TWITTER_TITLE_MAX_LENGTH: usize = 70;
pub const TWITTER_DESCRIPTION_MAX_LENGTH: usize = 200;
pub const DEFAULT_OG_LOCALE: &str = "de_DE";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OgType {
    #[default]
    Website,
    Article,
    Book,
    Profile,
}

impl OgType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Article => "article",
            Self::Book => "book",
            Self::Profile => "profile",
        }
    }
}

impl fmt::Display for OgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OgType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "website" => Ok(Self::Website),
            "article" => Ok(Self::Article),
            "book" => Ok(Self::Book),
            "profile" => Ok(Self::Profile),
            other => Err(format!("unknown Open Graph type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenGraphData {
    pub og_type: OgType,
    pub title: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub image_alt: Option<String>,
    pub image_width: Option<String>,
    pub image_height: Option<String>,
    pub site_name: Option<String>,
    pub locale: Option<String>,
    pub alternate_locale: Option<String>,
    pub determiner: Option<String>,
    pub audio: Option<String>,
    pub video: Option<String>,

    pub article_published_time: Option<String>,
    pub article_modified_time: Option<String>,
    pub article_expiration_time: Option<String>,
    pub article_author: Option<String>,
    pub article_section: Option<String>,
    pub article_tags: Vec<String>,

    pub book_author: Option<String>,
    pub book_isbn: Option<String>,
    pub book_release_date: Option<String>,
    pub book_tags: Vec<String>,

    pub profile_first_name: Option<String>,
    pub profile_last_name: Option<String>,
    pub profile_username: Option<String>,
    pub profile_gender: Option<String>,
}

impl Default for OpenGraphData {
    fn default() -> Self {
        Self {
            og_type: OgType::Website,
            title: String::new(),
            url: None,
            description: None,
            image: None,
            image_alt: None,
            image_width: None,
            image_height: None,
            site_name: None,
            locale: Some(DEFAULT_OG_LOCALE.to_string()),
            alternate_locale: None,
            determiner: None,
            audio: None,
            video: None,
            article_published_time: None,
            article_modified_time: None,
            article_expiration_time: None,
            article_author: None,
            article_section: None,
            article_tags: Vec::new(),
            book_author: None,
            book_isbn: None,
            book_release_date: None,
            book_tags: Vec::new(),
            profile_first_name: None,
            profile_last_name: None,
            profile_username: None,
            profile_gender: None,
        }
    }
}

fn push_property(tags: &mut Vec<MetaTag>, property: &str, value: &Option<String>) {
    if let Some(value) = present(value) {
        tags.push(MetaTag::property(property, value));
    }
}

fn push_name(tags: &mut Vec<MetaTag>, name: &str, value: &Option<String>) {
    if let Some(value) = present(value) {
        tags.push(MetaTag::name(name, value));
    }
}

fn push_property_list(tags: &mut Vec<MetaTag>, property: &str, values: &[String]) {
    for value in values.iter().filter(|v| !v.trim().is_empty()) {
        tags.push(MetaTag::property(property, value));
    }
}

pub fn generate_open_graph_tags(data: &OpenGraphData) -> Vec<MetaTag> {
    let mut tags = Vec::new();

    if !data.title.trim().is_empty() {
        tags.push(MetaTag::property("og:title", &data.title));
    }
    tags.push(MetaTag::property("og:type", data.og_type.as_str()));
    push_property(&mut tags, "og:url", &data.url);
    if present(&data.image).is_some() {
        push_property(&mut tags, "og:image", &data.image);
        push_property(&mut tags, "og:image:alt", &data.image_alt);
        push_property(&mut tags, "og:image:width", &data.image_width);
        push_property(&mut tags, "og:image:height", &data.image_height);
    }
    push_property(&mut tags, "og:description", &data.description);
    push_property(&mut tags, "og:site_name", &data.site_name);
    push_property(&mut tags, "og:locale", &data.locale);
    push_property(&mut tags, "og:locale:alternate", &data.alternate_locale);
    push_property(&mut tags, "og:determiner", &data.determiner);
    push_property(&mut tags, "og:audio", &data.audio);
    push_property(&mut tags, "og:video", &data.video);

    match data.og_type {
        OgType::Article => {
            push_property(&mut tags, "article:author", &data.article_author);
            push_property(&mut tags, "article:published_time", &data.article_published_time);
            push_property(&mut tags, "article:modified_time", &data.article_modified_time);
            push_property(&mut tags, "article:expiration_time", &data.article_expiration_time);
            push_property(&mut tags, "article:section", &data.article_section);
            push_property_list(&mut tags, "article:tag", &data.article_tags);
        }
        OgType::Book => {
            push_property(&mut tags, "book:author", &data.book_author);
            push_property(&mut tags, "book:isbn", &data.book_isbn);
            push_property(&mut tags, "book:release_date", &data.book_release_date);
            push_property_list(&mut tags, "book:tag", &data.book_tags);
        }
        OgType::Profile => {
            push_property(&mut tags, "profile:first_name", &data.profile_first_name);
            push_property(&mut tags, "profile:last_name", &data.profile_last_name);
            push_property(&mut tags, "profile:username", &data.profile_username);
            push_property(&mut tags, "profile:gender", &data.profile_gender);
        }
        OgType::Website => {}
    }

    tags
}

impl Validate for OpenGraphData {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::new();
        errors
            .check(validate_required_field("title", Some(&self.title)))
            .check(validate_max_length("title", Some(&self.title), OG_TITLE_MAX_LENGTH))
            .check(validate_url("url", self.url.as_deref()))
            .check(validate_url("image", self.image.as_deref()))
            .check(validate_required_field("description", self.description.as_deref()))
            .check(validate_max_length(
                "description",
                self.description.as_deref(),
                OG_DESCRIPTION_MAX_LENGTH,
            ));
        errors.into_vec()
    }
}

impl Tool for OpenGraphData {
    fn name(&self) -> &'static str {
        "open-graph"
    }

    fn generate(&self) -> Result<Artifact> {
        Ok(Artifact::new(
            "open-graph.html",
            "text/html",
            render_meta_tags(&generate_open_graph_tags(self)),
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitterCardData {
    pub card_type: TwitterCardType,
    pub site: Option<String>,
    pub site_id: Option<String>,
    pub creator: Option<String>,
    pub creator_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub image_alt: Option<String>,

    pub player: Option<String>,
    pub player_width: Option<String>,
    pub player_height: Option<String>,
    pub player_stream: Option<String>,

    pub app_country: Option<String>,
    pub iphone_name: Option<String>,
    pub iphone_id: Option<String>,
    pub iphone_url: Option<String>,
    pub ipad_name: Option<String>,
    pub ipad_id: Option<String>,
    pub ipad_url: Option<String>,
    pub googleplay_name: Option<String>,
    pub googleplay_id: Option<String>,
    pub googleplay_url: Option<String>,
}

pub fn generate_twitter_card_tags(data: &TwitterCardData) -> Vec<MetaTag> {
    let mut tags = vec![MetaTag::name("twitter:card", data.card_type.as_str())];

    push_name(&mut tags, "twitter:site", &data.site);
    push_name(&mut tags, "twitter:site:id", &data.site_id);
    push_name(&mut tags, "twitter:creator", &data.creator);
    push_name(&mut tags, "twitter:creator:id", &data.creator_id);

    if !data.title.trim().is_empty() {
        tags.push(MetaTag::name("twitter:title", &data.title));
    }
    push_name(&mut tags, "twitter:description", &data.description);

    if present(&data.image).is_some() {
        push_name(&mut tags, "twitter:image", &data.image);
        push_name(&mut tags, "twitter:image:alt", &data.image_alt);
    }

    match data.card_type {
        TwitterCardType::Player => {
            push_name(&mut tags, "twitter:player", &data.player);
            push_name(&mut tags, "twitter:player:width", &data.player_width);
            push_name(&mut tags, "twitter:player:height", &data.player_height);
            push_name(&mut tags, "twitter:player:stream", &data.player_stream);
        }
        TwitterCardType::App => {
            push_name(&mut tags, "twitter:app:country", &data.app_country);
            push_name(&mut tags, "twitter:app:name:iphone", &data.iphone_name);
            push_name(&mut tags, "twitter:app:id:iphone", &data.iphone_id);
            push_name(&mut tags, "twitter:app:url:iphone", &data.iphone_url);
            push_name(&mut tags, "twitter:app:name:ipad", &data.ipad_name);
            push_name(&mut tags, "twitter:app:id:ipad", &data.ipad_id);
            push_name(&mut tags, "twitter:app:url:ipad", &data.ipad_url);
            push_name(&mut tags, "twitter:app:name:googleplay", &data.googleplay_name);
            push_name(&mut tags, "twitter:app:id:googleplay", &data.googleplay_id);
            push_name(&mut tags, "twitter:app:url:googleplay", &data.googleplay_url);
        }
        TwitterCardType::Summary | TwitterCardType::SummaryLargeImage => {}
    }

    tags
}

impl Validate for TwitterCardData {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::new();
        errors
            .check(validate_required_field("title", Some(&self.title)))
            .check(validate_max_length("title", Some(&self.title), TWITTER_TITLE_MAX_LENGTH))
            .check(validate_required_field("description", self.description.as_deref()))
            .check(validate_max_length(
                "description",
                self.description.as_deref(),
                TWITTER_DESCRIPTION_MAX_LENGTH,
            ));

        if self.card_type.needs_image() {
            errors
                .check(validate_url("image", self.image.as_deref()))
                .check(validate_required_field("image_alt", self.image_alt.as_deref()));
        } else {
            errors.check(validate_optional_url("image", self.image.as_deref()));
        }

        if self.card_type == TwitterCardType::Player {
            errors.check(validate_url("player", self.player.as_deref()));
        }
        errors.into_vec()
    }
}

impl Tool for TwitterCardData {
    fn name(&self) -> &'static str {
        "twitter-cards"
    }

    fn generate(&self) -> Result<Artifact> {
        Ok(Artifact::new(
            "twitter-cards.html",
            "text/html",
            render_meta_tags(&generate_twitter_card_tags(self)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(tags: &[MetaTag]) -> Vec<&str> {
        tags.iter().filter_map(MetaTag::key).collect()
    }

    #[test]
    fn test_open_graph_website() {
        let data = OpenGraphData {
            title: "ScaleSite".to_string(),
            url: Some("https://scalesite.app".to_string()),
            description: Some("Websites for growing teams".to_string()),
            article_author: Some("ignored for websites".to_string()),
            ..Default::default()
        };
        assert_eq!(
            keys(&generate_open_graph_tags(&data)),
            vec!["og:title", "og:type", "og:url", "og:description", "og:locale"]
        );
    }

    #[test]
    fn test_open_graph_article_tags() {
        let data = OpenGraphData {
            og_type: OgType::Article,
            title: "Launch".to_string(),
            image: Some("https://scalesite.app/launch.png".to_string()),
            image_alt: Some("Launch banner".to_string()),
            locale: None,
            article_author: Some("ScaleSite Team".to_string()),
            article_tags: vec!["seo".to_string(), " ".to_string(), "web".to_string()],
            ..Default::default()
        };
        let tags = generate_open_graph_tags(&data);
        assert_eq!(
            keys(&tags),
            vec![
                "og:title",
                "og:type",
                "og:image",
                "og:image:alt",
                "article:author",
                "article:tag",
                "article:tag"
            ]
        );
        assert_eq!(tags[1].content, "article");
    }

    #[test]
    fn test_open_graph_validation() {
        let data = OpenGraphData {
            url: Some("scalesite.app".to_string()),
            ..Default::default()
        };
        let fields: Vec<String> = data.field_errors().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["title", "url", "image", "description"]);
    }

    #[test]
    fn test_twitter_player_card() {
        let data = TwitterCardData {
            card_type: TwitterCardType::Player,
            site: Some("@scalesite".to_string()),
            title: "Demo".to_string(),
            player: Some("https://scalesite.app/player".to_string()),
            player_width: Some("480".to_string()),
            iphone_name: Some("ignored".to_string()),
            ..Default::default()
        };
        assert_eq!(
            keys(&generate_twitter_card_tags(&data)),
            vec![
                "twitter:card",
                "twitter:site",
                "twitter:title",
                "twitter:player",
                "twitter:player:width"
            ]
        );
    }

    #[test]
    fn test_twitter_app_card() {
        let data = TwitterCardData {
            card_type: TwitterCardType::App,
            title: "ScaleSite App".to_string(),
            iphone_id: Some("123".to_string()),
            googleplay_id: Some("app.scalesite".to_string()),
            ..Default::default()
        };
        let tags = generate_twitter_card_tags(&data);
        assert_eq!(
            keys(&tags),
            vec![
                "twitter:card",
                "twitter:title",
                "twitter:app:id:iphone",
                "twitter:app:id:googleplay"
            ]
        );
    }

    #[test]
    fn test_twitter_validation_depends_on_card_type() {
        let summary = TwitterCardData {
            title: "Home".to_string(),
            description: Some("Welcome".to_string()),
            ..Default::default()
        };
        let fields: Vec<String> = summary.field_errors().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["image", "image_alt"]);

        let player = TwitterCardData {
            card_type: TwitterCardType::Player,
            ..summary
        };
        let fields: Vec<String> = player.field_errors().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["player"]);
    }
}
