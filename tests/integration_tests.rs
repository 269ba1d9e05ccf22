//! Integration tests for gumroad-mcp server

use gumroad_mcp::{Args, Config, GumroadError, GumroadToolHandler, Transport};
use gumroad_mcp::config::DEFAULT_API_BASE;
use gumroad_mcp::registry::{ToolFilter, WRITE_TOOLS};
use clap::Parser;
use rmcp::ServerHandler;

// --- Handler creation ---

#[test]
fn test_handler_creation() {
    let config = Config::default();
    let _handler = GumroadToolHandler::new(config).unwrap();
}

#[test]
fn test_handler_with_full_config() {
    let config = Config {
        transport: Transport::Stdio,
        host: "127.0.0.1".to_string(),
        port: 9100,
        access_token: Some("secret".to_string()),
        api_base: "http://localhost:4000/v2".to_string(),
        creds_dir: "/tmp/creds".into(),
        enabled_tools: Some(["list_products".to_string()].into_iter().collect()),
        read_only: true,
        request_timeout: std::time::Duration::from_secs(5),
    };
    let handler = GumroadToolHandler::new(config).unwrap();
    assert_eq!(handler.enabled_tools(), vec!["list_products"]);
}

#[test]
fn test_get_info_lists_tools() {
    let handler = GumroadToolHandler::new(Config::default()).unwrap();
    let instructions = handler.get_info().instructions.unwrap();
    for tool in ["list_products", "get_product", "create_product", "update_product", "delete_product"] {
        assert!(instructions.contains(tool), "missing {}", tool);
    }
}

// --- Config ---

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.transport, Transport::Http);
    assert_eq!(config.port, 8000);
    assert_eq!(config.api_base, DEFAULT_API_BASE);
    assert_eq!(config.creds_dir, std::path::PathBuf::from("store_creds"));
    assert!(config.access_token.is_none());
    assert_eq!(config.bind_address().unwrap().to_string(), "0.0.0.0:8000");
}

#[test]
fn test_config_from_args() {
    let args = Args::parse_from([
        "gumroad-mcp",
        "--host", "127.0.0.1",
        "--port", "8080",
        "--access-token", "tok",
        "--api-base", "http://localhost:3000/v2/",
        "--creds-dir", "/app/store_creds",
        "--tools", "list_products, get_product,,",
    ]);
    let config = Config::from_args(&args);
    assert_eq!(config.bind_address().unwrap().to_string(), "127.0.0.1:8080");
    assert_eq!(config.access_token.as_deref(), Some("tok"));
    assert_eq!(config.api_base, "http://localhost:3000/v2");
    assert_eq!(config.creds_dir, std::path::PathBuf::from("/app/store_creds"));

    let enabled = config.enabled_tools.unwrap();
    assert_eq!(enabled.len(), 2);
    assert!(enabled.contains("get_product"));
}

#[test]
fn test_config_blank_token_is_none() {
    let args = Args::parse_from(["gumroad-mcp", "--access-token", "  "]);
    let config = Config::from_args(&args);
    assert!(config.access_token.is_none());
}

// --- Filtering ---

#[test]
fn test_read_only_filter_keeps_reads() {
    let filter = ToolFilter::new(None, true);
    let removed = filter.tools_to_remove(["list_products", "get_product"].into_iter());
    assert!(removed.is_empty());
    assert_eq!(WRITE_TOOLS.len(), 3);
}

// --- Error types ---

#[test]
fn test_error_display() {
    let err = GumroadError::Api("Invalid product".to_string());
    assert_eq!(err.to_string(), "Gumroad API error: Invalid product");

    let err = GumroadError::HttpStatus { status: 500, body: "boom".to_string() };
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("boom"));

    let err = GumroadError::MissingToken("/app/store_creds/gumroad.json".into());
    assert!(err.to_string().contains("/app/store_creds/gumroad.json"));
}
