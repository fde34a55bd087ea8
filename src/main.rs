use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wallpaper_generator::ai::PollinationsClient;
use wallpaper_generator::app::{App, SavedImage};
use wallpaper_generator::models::{Config, Provider};

#[derive(Debug, Parser)]
#[command(name = "wallpaper-generator")]
#[command(about = "Generate phone wallpapers from a text prompt")]
struct CliArgs {
    /// Backend to use, overriding WALLPAPER_PROVIDER (pollinations or gemini).
    #[arg(long, global = true, value_parser = parse_provider_arg)]
    provider: Option<Provider>,

    /// Root directory for session output, overriding OUTPUT_DIR.
    #[arg(long, global = true, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate new wallpapers.
    Generate {
        #[arg(value_name = "PROMPT")]
        prompt: String,
    },
    /// Create variations of an existing image.
    Remix {
        #[arg(value_name = "PROMPT")]
        prompt: String,
        /// Image file to use as the reference.
        #[arg(long, short, value_name = "FILE")]
        reference: PathBuf,
    },
    /// Print a Pollinations image URL without downloading it.
    Url {
        #[arg(value_name = "PROMPT")]
        prompt: String,
        #[arg(long)]
        seed: Option<u32>,
    },
}

fn parse_provider_arg(input: &str) -> std::result::Result<Provider, String> {
    input.parse().map_err(|e: wallpaper_generator::Error| e.to_string())
}

/// Environment configuration with command-line overrides applied.
fn load_config(
    provider: Option<Provider>,
    output_dir: Option<PathBuf>,
) -> wallpaper_generator::Result<Config> {
    let mut config = Config::from_lookup(|key| match (key, provider) {
        ("WALLPAPER_PROVIDER", Some(provider)) => Some(provider.as_str().to_string()),
        _ => std::env::var(key).ok(),
    })?;
    if let Some(output_dir) = output_dir {
        config.output_dir = output_dir;
    }
    Ok(config)
}

fn print_saved(saved: &[SavedImage]) {
    for image in saved {
        println!("{}", image.path.display());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wallpaper_generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();
    dotenvy::dotenv().ok();

    let (prompt, reference) = match args.command {
        Command::Url { prompt, seed } => {
            let seed = seed.unwrap_or_else(PollinationsClient::random_seed);
            let mut client = PollinationsClient::new();
            if let Ok(base_url) = std::env::var("POLLINATIONS_BASE_URL") {
                client = client.with_base_url(base_url);
            }
            println!("{}", client.image_url(&prompt, seed)?);
            return Ok(());
        }
        Command::Generate { prompt } => (prompt, None),
        Command::Remix { prompt, reference } => (prompt, Some(reference)),
    };

    let config = match load_config(args.provider, args.output_dir) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting wallpaper-generator ({} provider)", config.provider);

    let app = match App::new(&config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    let result = match reference {
        Some(reference) => app.remix(&prompt, &reference).await,
        None => app.generate(&prompt).await,
    };

    match result {
        Ok(saved) => {
            info!(
                "Saved {} wallpaper(s) to {}",
                saved.len(),
                app.output_dir().display()
            );
            print_saved(&saved);
            Ok(())
        }
        Err(e) => {
            error!("Generation failed: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
