#![allow(clippy::uninlined_format_args)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use profileprobe::errors::ProbeError;
use profileprobe::types::OutputFormat;
use profileprobe::webdriver_manager::GLOBAL_WEBDRIVER_MANAGER;

mod commands;

use commands::{BrowserArgs, ExtractorArgs};

const EXIT_SUCCESS: i32 = 0;

#[derive(Parser)]
#[command(name = "profileprobe")]
#[command(about = "Extract public profile attributes from social-media profile pages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a profile page
    Extract {
        /// Profile URL, or any URL containing the @handle
        url: String,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,

        /// Also write the record as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Save the rendered page markup here for debugging
        #[arg(long)]
        dump_page: Option<PathBuf>,

        #[command(flatten)]
        browser: BrowserArgs,

        #[command(flatten)]
        extractor: ExtractorArgs,
    },

    /// Print the canonical profile URL for a URL
    Normalize {
        url: String,

        /// Output format
        #[arg(short, long, default_value = "simple")]
        format: OutputFormat,
    },

    /// Serve GET /extract?url=... over HTTP
    #[cfg(feature = "server")]
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8000", env = "PROFILEPROBE_BIND")]
        bind: String,

        #[command(flatten)]
        browser: BrowserArgs,

        #[command(flatten)]
        extractor: ExtractorArgs,
    },
}

#[tokio::main]
async fn main() {
    let result = run().await;

    // Drivers started by this process go away with it
    GLOBAL_WEBDRIVER_MANAGER.stop_all();

    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(err) => {
            let probe_err: ProbeError = err.into();

            // JSON error on stdout for programmatic consumption
            let error_json = json!({
                "error": true,
                "message": probe_err.to_string(),
                "exit_code": probe_err.exit_code()
            });
            println!(
                "{}",
                serde_json::to_string(&error_json).unwrap_or_else(|_| "{}".to_string())
            );

            eprintln!("Error: {}", probe_err);
            std::process::exit(probe_err.exit_code());
        }
    }
}

async fn run() -> Result<()> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "profileprobe=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            url,
            format,
            output,
            dump_page,
            browser,
            extractor,
        } => {
            commands::extract::handle_extract(url, browser, extractor, format, output, dump_page)
                .await?
        }

        Commands::Normalize { url, format } => commands::normalize::handle_normalize(url, format)?,

        #[cfg(feature = "server")]
        Commands::Serve {
            bind,
            browser,
            extractor,
        } => commands::serve::handle_serve(bind, browser, extractor).await?,
    }

    Ok(())
}
