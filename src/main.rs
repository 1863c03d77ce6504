//! Caprender - Captioned Video Render Pipeline Driver
//!
//! This is the main entry point for the caprender tool, which sequences an
//! external speech-to-text tool, a human transcript review, and the Remotion
//! renderer over a single input video.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use caprender::cli::Args;
use caprender::config::Config;
use caprender::pipeline::Pipeline;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        // Fatal errors are printed once, to standard output, with a marker
        println!("\u{2717} {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    setup_logging(args.verbose)?;

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("caprender.toml").exists() {
                info!("Found caprender.toml in current directory, loading...");
                Config::from_file("caprender.toml")?
            } else {
                Config::default()
            }
        }
    };

    let pipeline = Pipeline::new(config)?;
    let final_path = pipeline.run(args.template, args.skip_transcribe).await?;

    println!("\u{2714} Final output: {}", final_path.display());
    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".caprender").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // File appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "caprender.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
