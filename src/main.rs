//! # PyLearn - Python exercises on the desktop
//!
//! Browse chapters and topics, write Python in the editor, run it on the
//! backend interpreter and ask for feedback.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run against the default backend (http://localhost:8000/api)
//! cargo run
//!
//! # Run against another backend
//! cargo run -- --api-url https://learn.example.org/api
//!
//! # Only check that the backend answers
//! cargo run -- --check
//!
//! # Write a config file with the current settings
//! cargo run -- --write-config
//! ```

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pylearn_client::ApiClient;
use pylearn_core::Config;
use pylearn_ui::{Flags, run};

/// PyLearn - Python exercises with remote execution and AI feedback
#[derive(Parser, Debug)]
#[command(name = "pylearn")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backend base URL; overrides PYLEARN_API_URL and the config file
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Check that the backend is reachable, then exit
    #[arg(long)]
    check: bool,

    /// Write the effective config to the config file, then exit
    #[arg(long)]
    write_config: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // RUST_LOG, when set, wins over -v.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true),
        )
        .with(filter)
        .init();

    tracing::info!("Starting PyLearn v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load().with_api_url(args.api_url);

    if args.write_config {
        let path = config.save()?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    if args.check {
        return check_backend(&config);
    }

    run(Flags { config }).map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

/// Calls `/health` once and reports the answer.
fn check_backend(config: &Config) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let client = ApiClient::with_timeout(
        config.api.base_url.clone(),
        Some(std::time::Duration::from_secs(
            config.api.request_timeout_secs.unwrap_or(10),
        )),
    );

    let health = runtime
        .block_on(client.health())
        .map_err(|e| anyhow::anyhow!("Backend at {} is not reachable: {}", client.base_url(), e))?;

    if !health.is_healthy() {
        anyhow::bail!(
            "Backend at {} reported status {:?}",
            client.base_url(),
            health.status
        );
    }

    println!("{} is up ({})", client.base_url(), health.service);
    Ok(())
}
