//! Gumroad MCP Server — Main Entry Point

use clap::Parser;
use tracing::{info, debug};
use tracing_subscriber::{EnvFilter, fmt};

use gumroad_mcp::{credentials, server, Args, Config, Transport};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    info!("Starting Gumroad MCP Server v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_args(&args);
    credentials::ensure_dir(&config.creds_dir);
    if config.access_token.is_none() {
        info!(
            "GUMROAD_ACCESS_TOKEN not set; tools will read {}",
            config.creds_dir.join(credentials::CREDENTIALS_FILE).display()
        );
    }

    match config.transport {
        Transport::Http => server::serve_http(config).await,
        Transport::Stdio => server::serve_stdio(config).await,
    }
}

fn init_logging(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(false)
        .with_line_number(false);

    if let Some(log_file) = &args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)?;
        subscriber.with_writer(file).init();
    } else {
        // stdout carries the protocol in stdio mode
        subscriber.with_writer(std::io::stderr).init();
    }

    debug!("Logging initialized with level: {}", args.log_level);
    Ok(())
}
