use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use dupecheck::checker::{DuplicateChecker, QuestionPair};
use dupecheck::config::Config;
use dupecheck::model::download::{ensure_artifact, fetch_optional, ArtifactSource};

/// dupecheck: tell whether two questions ask the same thing.
///
/// Serves a pretrained duplicate-question classifier over HTTP, or runs it
/// directly from the terminal.
#[derive(Parser)]
#[command(name = "dupecheck", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the model and start the HTTP API
    Serve {
        /// Port to listen on (default: 5000)
        #[arg(long, default_value = "5000")]
        port: u16,

        /// Address to bind (default: 127.0.0.1)
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },

    /// Download the model and feature builder from MODEL_URL / FEATURES_URL
    DownloadModel,

    /// Check a single question pair from the terminal
    Check {
        /// First question
        q1: String,

        /// Second question
        q2: String,
    },

    /// Show artifact locations and configuration
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("dupecheck=info,tower_http=info")
            }),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            info!("Loading model artifacts...");
            let checker = DuplicateChecker::load(&config).await;
            if !checker.model_loaded() || !checker.helper_loaded() {
                // Keep serving: /api/health reports what's missing and
                // /api/check answers with a 500 until it's fixed.
                tracing::warn!(
                    model_loaded = checker.model_loaded(),
                    helper_loaded = checker.helper_loaded(),
                    "Starting with unloaded components"
                );
            }
            let state = dupecheck::web::AppState::new(config, checker);
            dupecheck::web::run_server(state, port, &bind).await?;
        }

        Commands::DownloadModel => {
            let config = Config::load()?;

            println!("Downloading model artifacts...");

            println!("\nModel:");
            download_one(
                &config.model_path,
                config.model_url.as_deref(),
                "MODEL_URL",
                true,
            )
            .await?;

            println!("\nFeature builder:");
            download_one(
                &config.features_path,
                config.features_url.as_deref(),
                "FEATURES_URL",
                false,
            )
            .await?;

            println!("\n{}", "Artifacts ready.".bold());
            println!("You can now run `dupecheck serve` or `dupecheck check <q1> <q2>`.");
        }

        Commands::Check { q1, q2 } => {
            let config = Config::load()?;
            let pair = QuestionPair::new(&q1, &q2)?;
            let checker = DuplicateChecker::load(&config).await;
            let result = checker.check(pair).await?;
            dupecheck::output::terminal::display_check_result(&result);
        }

        Commands::Status => {
            let config = Config::load()?;
            dupecheck::status::show(&config);
        }
    }

    Ok(())
}

/// Fetch one artifact if it's missing, reporting what happened.
///
/// A required artifact with neither a file nor a URL is an error; an
/// optional one is skipped.
async fn download_one(
    path: &std::path::Path,
    url: Option<&str>,
    url_var: &str,
    required: bool,
) -> Result<()> {
    println!("  Destination: {}", path.display());

    let outcome = if required {
        if url.is_none() && !path.exists() {
            anyhow::bail!("{url_var} not set and {} does not exist", path.display());
        }
        Some(ensure_artifact(path, url, true).await?)
    } else {
        fetch_optional(path, url, true).await?
    };

    match outcome {
        Some(ArtifactSource::Local) => println!("  {} (already exists)", path.display()),
        Some(ArtifactSource::Downloaded) => println!("  {}", "Downloaded.".green()),
        None => println!("  {}", format!("skipped ({url_var} not set)").dimmed()),
    }
    Ok(())
}
