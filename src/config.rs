//! Configuration for the gumroad-mcp server

use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use clap::{Parser, ValueEnum};

pub const DEFAULT_API_BASE: &str = "https://api.gumroad.com/v2";
pub const DEFAULT_PORT: u16 = 8000;

/// How the server talks to MCP clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// Streamable HTTP on --host/--port
    Http,
    /// stdin/stdout
    Stdio,
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "gumroad-mcp")]
#[command(about = "MCP server for managing products in a Gumroad store")]
#[command(version)]
pub struct Args {
    /// Transport to serve MCP over
    #[arg(long, value_enum, default_value_t = Transport::Http)]
    pub transport: Transport,

    /// Address to bind the HTTP server to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind the HTTP server to
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Gumroad API access token (falls back to the credentials directory)
    #[arg(long, env = "GUMROAD_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Gumroad API base URL
    #[arg(long, env = "GUMROAD_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Directory holding stored credentials (gumroad.json)
    #[arg(long, env = "GUMROAD_CREDS_DIR", default_value = "store_creds")]
    pub creds_dir: PathBuf,

    /// Comma-separated list of tools to enable (default: all)
    #[arg(long, env = "GUMROAD_ENABLED_TOOLS", value_delimiter = ',')]
    pub tools: Option<Vec<String>>,

    /// Hide tools that modify the store
    #[arg(long, env = "GUMROAD_READ_ONLY")]
    pub read_only: bool,

    /// Timeout for Gumroad API requests, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log file path (defaults to stderr)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub transport: Transport,
    pub host: String,
    pub port: u16,
    pub access_token: Option<String>,
    pub api_base: String,
    pub creds_dir: PathBuf,
    pub enabled_tools: Option<HashSet<String>>,
    pub read_only: bool,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_args(args: &Args) -> Self {
        let enabled_tools = args.tools.as_ref().map(|names| {
            names
                .iter()
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .collect()
        });

        Self {
            transport: args.transport,
            host: args.host.clone(),
            port: args.port,
            access_token: args.access_token.clone().filter(|t| !t.trim().is_empty()),
            api_base: args.api_base.trim_end_matches('/').to_string(),
            creds_dir: args.creds_dir.clone(),
            enabled_tools,
            read_only: args.read_only,
            request_timeout: Duration::from_secs(args.timeout_secs),
        }
    }

    /// Socket address for the HTTP transport
    pub fn bind_address(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transport: Transport::Http,
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            access_token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            creds_dir: PathBuf::from("store_creds"),
            enabled_tools: None,
            read_only: false,
            request_timeout: Duration::from_secs(30),
        }
    }
}
