//! Voisinage photo analyzer
//!
//! Analyze an item photo and print the listing draft as JSON.
//!
//! Usage:
//!   cargo run --bin voisinage-analyze -- analyze photo.jpg
//!   cargo run --bin voisinage-analyze -- --config analysis.toml --json-mode analyze photo.jpg
//!   cargo run --bin voisinage-analyze -- score "Perceuse Bosch" "Très peu servi"
//!   cargo run --bin voisinage-analyze -- health
//!
//! Environment: OPENAI_API_KEY, OPENAI_BASE_URL, VOISINAGE_VISION_MODEL,
//! VOISINAGE_RETRY_MAX, RUST_LOG (default: voisinage=info).

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voisinage_inference::{
    cancellation_pair, score_text, AnalysisConfig, Error, ItemAnalyzer, VisionAnalyzer,
};

#[derive(Debug, Parser)]
#[command(name = "voisinage-analyze")]
#[command(author, version, about = "Draft an item listing from a photo")]
#[command(propagate_version = true)]
struct Cli {
    /// Analysis config file (default: ~/.config/voisinage/analysis.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Vision model override
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Request structured JSON output from the provider
    #[arg(long, global = true)]
    json_mode: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a photo and print the result
    Analyze {
        /// Image file (JPEG, PNG, WebP or GIF)
        image: PathBuf,
    },

    /// Only run keyword category scoring on text
    Score {
        title: String,

        #[arg(default_value = "")]
        description: String,
    },

    /// Check that the vision endpoint answers
    Health,
}

fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "voisinage=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AnalysisConfig::load().context("loading analysis config")?,
    };
    if let Some(model) = &cli.model {
        config.vision.model = model.clone();
    }
    if cli.json_mode {
        config.vision.json_mode = true;
    }
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if let Commands::Score { title, description } = &cli.command {
        let result = score_text(title, description);
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&cli)?;
    let analyzer = VisionAnalyzer::new(config)?;

    let image = match cli.command {
        Commands::Health => {
            let healthy = analyzer.health_check().await?;
            println!("{}", if healthy { "ok" } else { "unavailable" });
            return Ok(if healthy {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
        Commands::Analyze { image } => image,
        Commands::Score { .. } => return Ok(ExitCode::SUCCESS),
    };

    let bytes =
        std::fs::read(&image).with_context(|| format!("reading image {}", image.display()))?;

    let (handle, cancel) = cancellation_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!(subsystem = "cli", "Interrupted, cancelling analysis");
            handle.cancel();
        }
    });

    match analyzer.analyze_image_with_cancel(&bytes, &cancel).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err @ Error::Cancelled) => {
            eprintln!("{}", err.user_message());
            Ok(ExitCode::from(130))
        }
        Err(err) => {
            eprintln!("{}", err.user_message());
            Err(err.into())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
