//! Bulk-create Gumroad product listings from a JSON catalog
//!
//! Usage:
//!     GUMROAD_ACCESS_TOKEN=<token> create-listings --file catalog/listings.json

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use gumroad_mcp::config::DEFAULT_API_BASE;
use gumroad_mcp::credentials::CredentialStore;
use gumroad_mcp::listings::{load_listings, publish_listings};
use gumroad_mcp::GumroadClient;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "create-listings")]
#[command(about = "Create Gumroad product listings from a JSON catalog")]
#[command(version)]
struct Args {
    /// Catalog file (JSON array of listings)
    #[arg(long, default_value = "catalog/listings.json")]
    file: PathBuf,

    /// Gumroad API access token (get one at https://app.gumroad.com/settings/advanced)
    #[arg(long, env = "GUMROAD_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Directory holding stored credentials (gumroad.json)
    #[arg(long, env = "GUMROAD_CREDS_DIR", default_value = "store_creds")]
    creds_dir: PathBuf,

    /// Gumroad API base URL
    #[arg(long, env = "GUMROAD_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Timeout for each API request, in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&args.log_level)))
        .with_target(false)
        .init();

    let token = CredentialStore::new(args.access_token.clone(), args.creds_dir.clone()).access_token()?;
    let listings = load_listings(&args.file)?;
    info!("Loaded {} listings from {}", listings.len(), args.file.display());

    let client = GumroadClient::new(
        args.api_base.trim_end_matches('/'),
        Duration::from_secs(args.timeout_secs),
    )?;
    let report = publish_listings(&client, &token, &listings).await;

    if report.is_success() {
        Ok(())
    } else {
        Err(format!("{} of {} listings failed", report.failed.len(), listings.len()).into())
    }
}
