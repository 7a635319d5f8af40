pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::SiteConfig;

pub use adapters::{HttpFetcher, LocalStorage};
pub use core::{
    analyzer::{analyze_html, extract_meta_tags_from_html, extract_score_input},
    audit::{audit_html, HtmlAuditor, SimulatedAuditor},
    engine::SeoEngine,
    meta::{auto_generate_meta_tags, generate_meta_tags},
    ping::SearchEnginePinger,
    robots::{generate_robots_txt, generate_robots_txt_with_sitemap},
    score::calculate_seo_score,
    sitemap::{add_to_sitemap, generate_sitemap, parse_sitemap},
    social::{generate_open_graph_tags, generate_twitter_card_tags},
    structured_data::{generate_schema, validate_structured_data},
    text::{extract_keywords, generate_canonical_url, generate_slug},
};
pub use utils::error::{Result, SeoError};
