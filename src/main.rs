use anyhow::Result;
use clap::Parser;
use gmail_cleaner::auth;
use gmail_cleaner::cleaner::{Cleaner, CleanupPlan};
use gmail_cleaner::cli::Cli;
use gmail_cleaner::client::ProductionGmailClient;
use gmail_cleaner::config::{Config, ConfigPaths, FULL_SCOPE_ENV};
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        display_error(&e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Install default crypto provider for rustls
    // On non-Windows platforms, use aws-lc-rs; on Windows, use ring
    #[cfg(not(windows))]
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install default crypto provider"))?;

    #[cfg(windows)]
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install default crypto provider"))?;

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gmail_cleaner=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gmail_cleaner=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    let paths = ConfigPaths::resolve(cli.config_dir.as_deref())?;
    let config = Config::load(&paths.config_file).await?;

    // Everything the operator typed is validated before the first network call
    let plan = CleanupPlan::new(&cli.to_request(&config), &config.query)?;

    let full_scope_requested = std::env::var(FULL_SCOPE_ENV).map(|v| v == "true").unwrap_or(false);
    let scope = auth::select_scope(plan.mode, &config.auth, full_scope_requested);
    tracing::debug!("Requesting OAuth scope {}", scope);

    let hub = auth::initialize_gmail_hub(&paths.credentials, &paths.token_cache, scope).await?;
    if paths.token_cache.exists() {
        auth::secure_token_file(&paths.token_cache).await?;
    }

    let cleaner = Cleaner::new(ProductionGmailClient::new(hub, scope));
    cleaner.run(&plan).await?;

    Ok(())
}

/// Display error with its cause chain
fn display_error(error: &anyhow::Error) {
    eprintln!("Error: {}", error);

    for cause in error.chain().skip(1) {
        eprintln!("  Caused by: {}", cause);
    }
}
