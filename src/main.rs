use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use scalesite_seo::config::cli::{
    AnalyzeArgs, AuditArgs, CanonicalArgs, Command, KeywordsArgs, MetaArgs, OpenGraphArgs,
    PageSource, RobotsArgs, SchemaArgs, SitemapArgs, TwitterArgs,
};
use scalesite_seo::core::analyzer::{extract_meta_tags_from_html, visible_text};
use scalesite_seo::core::audit::AuditProgress;
use scalesite_seo::core::robots::RobotsFile;
use scalesite_seo::core::sitemap::{merge_entries, Sitemap};
use scalesite_seo::core::social::{OpenGraphData, TwitterCardData};
use scalesite_seo::core::structured_data::{
    generate_schema, to_json_ld_script, SchemaFormData, StructuredDataTool,
};
use scalesite_seo::domain::model::{Artifact, RobotsRule, SeoMetadata, SitemapEntry};
use scalesite_seo::domain::ports::{Fetcher, Tool};
use scalesite_seo::utils::validation::{validate_url, FieldError, Validate};
use scalesite_seo::utils::{error::SeoError, logger};
use scalesite_seo::{
    analyze_html, auto_generate_meta_tags, calculate_seo_score,
    extract_keywords, extract_score_input, generate_canonical_url, generate_slug,
    parse_sitemap, validate_structured_data, CliConfig, HtmlAuditor, HttpFetcher,
    LocalStorage, SearchEnginePinger, SeoEngine, SimulatedAuditor,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_logger(config.verbose, config.log_json);
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    if let Err(err) = run(config).await {
        match err.downcast_ref::<SeoError>() {
            Some(e) => {
                tracing::error!(
                    "❌ {:#} (Category: {:?}, Severity: {:?})",
                    err,
                    e.category(),
                    e.severity()
                );
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
                std::process::exit(e.exit_code());
            }
            None => {
                tracing::error!("❌ {:#}", err);
                eprintln!("❌ {:#}", err);
                std::process::exit(1);
            }
        }
    }
}

async fn run(config: CliConfig) -> anyhow::Result<()> {
    let engine = SeoEngine::new(LocalStorage::new(config.output_path.clone()));

    let artifact = match config.command {
        Command::Meta(args) => engine.preview(&meta_tool(args)?)?,
        Command::Sitemap(args) => engine.preview(&sitemap_tool(args)?)?,
        Command::Robots(args) => engine.preview(&robots_tool(args)?)?,
        Command::OpenGraph(args) => engine.preview(&open_graph_tool(args)?)?,
        Command::Twitter(args) => engine.preview(&twitter_tool(args)?)?,
        Command::Schema(args) => schema_artifact(&engine, args)?,
        Command::Score(source) => {
            let (html, url) = load_page(&source).await?;
            let mut input = extract_score_input(&html);
            if input.url.is_none() {
                input.url = url;
            }
            let result = calculate_seo_score(&input);
            tracing::info!("SEO score: {}/{}", result.score, result.max_score);
            json_artifact("seo-score.json", &result)?
        }
        Command::Analyze(AnalyzeArgs { source, keywords }) => {
            let (html, _) = load_page(&source).await?;
            let analysis = analyze_html(&html, &keywords);
            tracing::info!("Page analysis score: {}", analysis.score);
            json_artifact("seo-analysis.json", &analysis)?
        }
        Command::Audit(args) => audit_artifact(args).await?,
        Command::Keywords(KeywordsArgs {
            file,
            min_frequency,
        }) => {
            let content = read_text(&file)?;
            let text = if content.contains('<') {
                visible_text(&content)
            } else {
                content
            };
            let keywords = extract_keywords(&text, min_frequency);
            Artifact::new("keywords.txt", "text/plain", keywords.join("\n"))
        }
        Command::Slug { text } => Artifact::new("slug.txt", "text/plain", generate_slug(&text)),
        Command::Canonical(CanonicalArgs { base, path, params }) => {
            let params: Vec<(&str, &str)> = params
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            let url = generate_canonical_url(&base, &path, &params);
            Artifact::new("canonical.txt", "text/plain", url)
        }
        Command::ValidateSchema { file } => {
            let json_ld = read_text(&file)?;
            let validation = validate_structured_data(&json_ld);
            if !validation.valid {
                for error in &validation.errors {
                    println!("❌ {}", error);
                }
                let errors = validation
                    .errors
                    .into_iter()
                    .map(|e| FieldError::new("json_ld", e))
                    .collect();
                return Err(SeoError::validation(errors).into());
            }
            println!("✅ Structured data is valid");
            return Ok(());
        }
        Command::Ping { sitemap_url } => {
            validate_url("sitemap_url", Some(sitemap_url.as_str()))
                .map_err(|e| SeoError::validation(vec![e]))?;
            let result = SearchEnginePinger::new().ping(&sitemap_url).await;
            println!("Google: {}", if result.google { "✅" } else { "❌" });
            println!("Bing:   {}", if result.bing { "✅" } else { "❌" });
            return Ok(());
        }
    };

    if config.save {
        let location = engine.export_artifact(&artifact).await?;
        println!("✅ Saved to {}", location);
    } else {
        println!("{}", artifact.content);
    }
    Ok(())
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .map_err(SeoError::IoError)
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Reads a generator input from JSON, or from TOML when the extension says so.
fn load_input<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = read_text(path)?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let value = if is_toml {
        toml::from_str(&content).map_err(|e| SeoError::ConfigValidationError {
            field: path.display().to_string(),
            message: format!("TOML parsing error: {}", e),
        })?
    } else {
        serde_json::from_str(&content)
            .map_err(SeoError::SerializationError)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?
    };
    Ok(value)
}

fn load_or_default<T: DeserializeOwned + Default>(input: Option<&Path>) -> anyhow::Result<T> {
    input.map_or_else(|| Ok(T::default()), load_input::<T>)
}

fn json_artifact<T: Serialize>(file_name: &str, value: &T) -> anyhow::Result<Artifact> {
    let content = serde_json::to_string_pretty(value).map_err(SeoError::SerializationError)?;
    Ok(Artifact::new(file_name, "application/json", content))
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn set_opt<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}

/// Fetched pages report their final URL so canonical-less pages still get one.
async fn load_page(source: &PageSource) -> anyhow::Result<(String, Option<String>)> {
    match (&source.file, &source.url) {
        (Some(file), _) => Ok((read_text(file)?, None)),
        (None, Some(url)) => {
            validate_url("url", Some(url.as_str())).map_err(|e| SeoError::validation(vec![e]))?;
            let page = HttpFetcher::new().fetch(url).await?;
            if !(200..400).contains(&page.status) {
                return Err(SeoError::audit(format!("{} returned HTTP {}", url, page.status)).into());
            }
            Ok((page.html, Some(page.url)))
        }
        (None, None) => Err(SeoError::MissingConfigError {
            field: "file or --url".to_string(),
        }
        .into()),
    }
}

fn meta_tool(args: MetaArgs) -> anyhow::Result<SeoMetadata> {
    let mut metadata = match &args.auto_from {
        Some(path) => {
            let html = read_text(path)?;
            let extracted = extract_meta_tags_from_html(&html);
            let title = args.title.clone().or(extracted.title);
            let canonical = args.canonical.clone().or(extracted.canonical);
            let text = visible_text(&html);
            tracing::info!("Deriving metadata from {}", path.display());
            auto_generate_meta_tags(title.as_deref(), Some(text.as_str()), canonical.as_deref())
        }
        None => load_or_default(args.input.as_deref())?,
    };

    set(&mut metadata.title, args.title);
    set(&mut metadata.description, args.description);
    set_opt(&mut metadata.keywords, args.keywords);
    set_opt(&mut metadata.og_title, args.og_title);
    set_opt(&mut metadata.og_description, args.og_description);
    set_opt(&mut metadata.og_image, args.og_image);
    set_opt(&mut metadata.twitter_card, args.twitter_card);
    set_opt(&mut metadata.canonical, args.canonical);
    metadata.noindex |= args.noindex;
    metadata.nofollow |= args.nofollow;
    Ok(metadata)
}

/// Parses `path[,priority[,changefreq]]`.
fn parse_url_spec(spec: &str, index: usize) -> Result<SitemapEntry, FieldError> {
    let field = format!("url[{}]", index);
    let mut parts = spec.split(',').map(str::trim);
    let mut entry = SitemapEntry::new(parts.next().unwrap_or_default());

    if let Some(priority) = parts.next().filter(|p| !p.is_empty()) {
        let priority = priority
            .parse::<f32>()
            .map_err(|_| FieldError::new(&field, format!("Invalid priority '{}'", priority)))?;
        entry = entry.with_priority(priority);
    }
    if let Some(frequency) = parts.next().filter(|f| !f.is_empty()) {
        entry = entry.with_change_frequency(
            frequency
                .parse()
                .map_err(|e: String| FieldError::new(&field, e))?,
        );
    }
    Ok(entry)
}

fn sitemap_tool(args: SitemapArgs) -> anyhow::Result<Sitemap> {
    let base_url = args.base_url.trim_end_matches('/').to_string();
    let now = Utc::now();

    let mut new_entries = Vec::with_capacity(args.urls.len());
    let mut errors = Vec::new();
    for (i, spec) in args.urls.iter().enumerate() {
        match parse_url_spec(spec, i) {
            Ok(mut entry) => {
                if entry.priority.is_none() {
                    entry.priority = args.priority;
                }
                if entry.change_frequency.is_none() {
                    entry.change_frequency = args.changefreq;
                }
                if args.lastmod_now {
                    entry.last_modified = Some(now);
                }
                new_entries.push(entry);
            }
            Err(e) => errors.push(e),
        }
    }
    if !errors.is_empty() {
        return Err(SeoError::validation(errors).into());
    }

    let entries = match &args.merge {
        Some(path) => {
            let existing = parse_sitemap(&read_text(path)?)?;
            tracing::info!(
                "Merging {} URLs into {} existing entries",
                new_entries.len(),
                existing.len()
            );
            merge_entries(existing, new_entries, &base_url)
        }
        None => new_entries,
    };

    Ok(Sitemap::new(base_url, entries))
}

fn robots_tool(args: RobotsArgs) -> anyhow::Result<RobotsFile> {
    if let Some(input) = &args.input {
        let mut robots: RobotsFile = load_input(input)?;
        set_opt(&mut robots.sitemap, args.sitemap);
        return Ok(robots);
    }

    let rule = RobotsRule {
        allow: args.allow,
        disallow: args.disallow,
        crawl_delay: args.crawl_delay,
        ..RobotsRule::for_agent(args.user_agent)
    };
    Ok(RobotsFile::new(vec![rule], args.sitemap))
}

fn open_graph_tool(args: OpenGraphArgs) -> anyhow::Result<OpenGraphData> {
    let mut data: OpenGraphData = load_or_default(args.input.as_deref())?;
    set(&mut data.og_type, args.og_type);
    set(&mut data.title, args.title);
    set_opt(&mut data.url, args.url);
    set_opt(&mut data.description, args.description);
    set_opt(&mut data.image, args.image);
    set_opt(&mut data.image_alt, args.image_alt);
    set_opt(&mut data.site_name, args.site_name);
    set_opt(&mut data.locale, args.locale);
    Ok(data)
}

fn twitter_tool(args: TwitterArgs) -> anyhow::Result<TwitterCardData> {
    let mut data: TwitterCardData = load_or_default(args.input.as_deref())?;
    set(&mut data.card_type, args.card);
    set(&mut data.title, args.title);
    set_opt(&mut data.site, args.site);
    set_opt(&mut data.creator, args.creator);
    set_opt(&mut data.description, args.description);
    set_opt(&mut data.image, args.image);
    set_opt(&mut data.image_alt, args.image_alt);
    Ok(data)
}

fn schema_artifact(
    engine: &SeoEngine<LocalStorage>,
    args: SchemaArgs,
) -> anyhow::Result<Artifact> {
    let data: SchemaFormData = load_or_default(args.input.as_deref())?;
    let tool = StructuredDataTool::new(args.schema_type, data);
    let artifact = engine.preview(&tool)?;

    if !args.script {
        return Ok(artifact);
    }
    let script = to_json_ld_script(&generate_schema(tool.schema_type, &tool.data))?;
    Ok(Artifact::new(
        format!("{}.html", tool.name()),
        "text/html",
        script,
    ))
}

fn print_progress(progress: AuditProgress) {
    eprintln!(
        "[{}/{}] {:<12} {:>5.1}%",
        progress.step, progress.total, progress.check, progress.percent
    );
}

async fn audit_artifact(args: AuditArgs) -> anyhow::Result<Artifact> {
    let report = if args.simulate {
        let mut auditor = SimulatedAuditor::new().with_delay_scale(args.delay_scale);
        if let Some(seed) = args.seed {
            auditor = auditor.with_seed(seed);
        }
        tracing::warn!("Running a simulated audit; results are random");
        auditor.audit(&args.url, print_progress).await?
    } else {
        let fetcher =
            HttpFetcher::new().with_timeout(Duration::from_secs(args.timeout_seconds));
        HtmlAuditor::new(fetcher).audit(&args.url).await?
    };

    tracing::info!(
        "📊 Audit score {}/{} ({}%): {} critical, {} warnings, {} passed",
        report.score,
        report.max_score,
        report.percentage,
        report.issues.len(),
        report.warnings.len(),
        report.passes.len()
    );
    Ok(Artifact::new(
        report.file_name(),
        "application/json",
        report.to_json()?,
    ))
}
