//! Management command deleting inactive and expired verification tokens.
//!
//! Intended to be triggered externally (an operator, a cron entry); prints
//! progress lines to stdout and exits 0 on success.

use std::io;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vt_core::CleanupJob;
use vt_infra::{create_pool, MySqlTokenRepository};

#[derive(Parser, Debug)]
#[command(
    name = "clean-verification-tokens",
    about = "Delete inactive or expired verification tokens",
    version
)]
struct Args {
    /// MySQL connection string for the token store
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    let pool = create_pool(&args.database_url)
        .await
        .context("could not connect to the token database")?;
    let repository = Arc::new(MySqlTokenRepository::new(pool));

    let job = CleanupJob::new(repository);
    let report = job
        .run(&mut io::stdout())
        .await
        .context("verification token cleanup failed")?;

    info!(
        deleted = report.deleted,
        remaining = ?report.remaining,
        "verification token cleanup finished"
    );

    Ok(())
}
