use clap::Parser;
use maillist::config::toml_config::TomlConfig;
use maillist::utils::{logger, validation::Validate};
use maillist::{ColumnPipeline, EtlEngine, LocalStorage};

#[derive(Parser)]
#[command(name = "toml-maillist")]
#[command(about = "Email list extraction driven by a TOML pipeline file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "maillist.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - validate and show the configuration without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-driven extraction");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no processing will occur");
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    let storage = LocalStorage::new(".".to_string());
    let pipeline = ColumnPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Extraction completed successfully!");
            println!("📬 Email list saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!("❌ Extraction failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!(
        "📋 Pipeline: {} v{}",
        config.pipeline.name,
        config.pipeline.version
    );
    tracing::info!(
        "📑 Source: {} ({})",
        config.source.location,
        config.source.r#type
    );
    tracing::info!("📬 Column: {}", config.extract.column);
    tracing::info!("📁 Output: {}", config.load.output_path);
}
