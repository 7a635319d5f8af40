use clap::Parser;
use scalesite_seo::core::sitemap::SITEMAP_FILE_NAME;
use scalesite_seo::core::structured_data::STRUCTURED_DATA_FILE_NAME;
use scalesite_seo::domain::ports::Tool;
use scalesite_seo::utils::error::SeoError;
use scalesite_seo::utils::logger;
use scalesite_seo::{LocalStorage, SearchEnginePinger, SeoEngine, SiteConfig};

#[derive(Parser)]
#[command(name = "site-seo")]
#[command(about = "Generate every SEO artifact of a site from one TOML file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "site-seo.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Validate and list the artifacts without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Skip the search engine ping even when the config enables it
    #[arg(long)]
    no_ping: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    logger::init_logger(args.verbose, args.log_json);

    tracing::info!("🚀 Starting site-seo");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let config = match SiteConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = config.validate_config() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        perform_dry_run(&config);
        return;
    }

    let engine = SeoEngine::new(LocalStorage::new(config.output_path()));

    match generate_site(&engine, &config).await {
        Ok(locations) => {
            tracing::info!("✅ Generated {} artifacts", locations.len());
            println!("✅ SEO artifacts generated:");
            for location in &locations {
                println!("  📄 {}", location);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    if config.ping_enabled() && config.sitemap.is_some() && !args.no_ping {
        ping_search_engines(&config).await;
    }
}

async fn generate_site(
    engine: &SeoEngine<LocalStorage>,
    config: &SiteConfig,
) -> Result<Vec<String>, SeoError> {
    let mut locations = engine.export_all(&config.page_tools()).await?;

    if let Some(sitemap) = config.sitemap_tool() {
        let sitemap = if config.merge_existing_sitemap() {
            engine.merge_sitemap(sitemap).await?
        } else {
            sitemap
        };
        locations.push(engine.export(&sitemap).await?);
    }

    if let Some(robots) = config.robots_tool() {
        locations.push(engine.export(&robots).await?);
    }

    let numbered = config.structured_data.len() > 1;
    for (i, schema) in config.structured_data.iter().enumerate() {
        let mut artifact = engine.preview(schema)?;
        if numbered {
            artifact.file_name =
                STRUCTURED_DATA_FILE_NAME.replace(".jsonld", &format!("-{}.jsonld", i + 1));
        }
        locations.push(engine.export_artifact(&artifact).await?);
    }

    Ok(locations)
}

async fn ping_search_engines(config: &SiteConfig) {
    let mut pinger = SearchEnginePinger::new();
    if let Some(ping) = &config.ping {
        if let (Some(google), Some(bing)) = (&ping.google_endpoint, &ping.bing_endpoint) {
            pinger = pinger.with_endpoints(google.as_str(), bing.as_str());
        }
        if let Some(timeout) = ping.timeout() {
            pinger = pinger.with_timeout(timeout);
        }
    }

    let sitemap_url = config.sitemap_url();
    let result = pinger.ping(&sitemap_url).await;
    println!("📡 Sitemap ping: {}", sitemap_url);
    println!("  Google: {}", if result.google { "✅" } else { "❌" });
    println!("  Bing:   {}", if result.bing { "✅" } else { "❌" });
}

fn display_config_summary(config: &SiteConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    if let Some(name) = &config.site.name {
        println!("  Site: {}", name);
    }
    println!("  Base URL: {}", config.base_url());
    println!("  Output: {}", config.output_path());

    let tools: Vec<&str> = config.page_tools().iter().map(|t| t.name()).collect();
    if !tools.is_empty() {
        println!("  Page tools: {}", tools.join(", "));
    }
    if let Some(sitemap) = &config.sitemap {
        println!(
            "  Sitemap: {} entries{}",
            sitemap.entries.len(),
            if sitemap.merge_existing { " (merge)" } else { "" }
        );
    }
    if let Some(robots) = &config.robots {
        println!("  Robots: {} rules", robots.rules.len());
    }
    if !config.structured_data.is_empty() {
        println!("  Structured data: {} schemas", config.structured_data.len());
    }
    println!(
        "  Ping: {}",
        if config.ping_enabled() && !args.no_ping { "enabled" } else { "disabled" }
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &SiteConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    let mut tools: Vec<&dyn Tool> = config.page_tools();
    let sitemap = config.sitemap_tool();
    let robots = config.robots_tool();
    if let Some(sitemap) = &sitemap {
        tools.push(sitemap);
    }
    if let Some(robots) = &robots {
        tools.push(robots);
    }
    for schema in &config.structured_data {
        tools.push(schema);
    }

    println!("💾 Artifacts that would be written to {}:", config.output_path());
    for tool in tools {
        match tool.generate() {
            Ok(artifact) => println!(
                "  ✅ {} ({}, {} bytes)",
                artifact.file_name,
                artifact.mime_type,
                artifact.content.len()
            ),
            Err(e) => println!("  ❌ {}: {}", tool.name(), e),
        }
    }

    if config.merge_existing_sitemap() {
        println!();
        println!("🔄 New sitemap entries will be merged into the existing {}", SITEMAP_FILE_NAME);
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
