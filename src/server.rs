//! MCP transports
//!
//! HTTP mode mounts the streamable-HTTP MCP service at `/mcp` next to a
//! `/health` probe used by the container health check. Each MCP session gets
//! its own handler; all of them share one Gumroad client.

use axum::{routing::get, Router};
use rmcp::{
    transport::{
        stdio,
        streamable_http_server::{session::local::LocalSessionManager, StreamableHttpService},
    },
    ServiceExt,
};
use tracing::{error, info};

use crate::config::Config;
use crate::gumroad_client::GumroadClient;
use crate::tools::GumroadToolHandler;

pub const MCP_PATH: &str = "/mcp";
pub const HEALTH_PATH: &str = "/health";

async fn health() -> &'static str {
    "ok"
}

/// Build the HTTP router serving MCP and the health probe
pub fn router(config: Config, client: GumroadClient) -> Router {
    let service = StreamableHttpService::new(
        move || Ok(GumroadToolHandler::with_client(config.clone(), client.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    Router::new()
        .route(HEALTH_PATH, get(health))
        .nest_service(MCP_PATH, service)
}

pub async fn serve_http(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.bind_address()?;
    let client = GumroadClient::new(config.api_base.clone(), config.request_timeout)?;
    let app = router(config, client);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}{}", listener.local_addr()?, MCP_PATH);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

pub async fn serve_stdio(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let service = GumroadToolHandler::new(config)?
        .serve(stdio()).await.inspect_err(|e| {
            error!("Serving error: {:?}", e);
        })?;

    service.waiting().await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_health_endpoint() {
        let client = GumroadClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let app = router(Config::default(), client);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let body = reqwest::get(format!("http://{}{}", addr, HEALTH_PATH))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "ok");
    }

    /// JSON-RPC messages carried in an SSE response body
    fn sse_messages(body: &str) -> Vec<serde_json::Value> {
        body.lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .filter_map(|data| serde_json::from_str(data.trim()).ok())
            .collect()
    }

    async fn post_mcp(
        http: &reqwest::Client,
        url: &str,
        session: Option<&str>,
        message: serde_json::Value,
    ) -> reqwest::Response {
        let mut request = http
            .post(url)
            .header("accept", "application/json, text/event-stream")
            .json(&message);
        if let Some(id) = session {
            request = request.header("mcp-session-id", id);
        }
        request.send().await.unwrap()
    }

    #[tokio::test]
    async fn test_mcp_tools_list_respects_read_only() {
        let client = GumroadClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let config = Config {
            read_only: true,
            ..Config::default()
        };
        let app = router(config, client);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let url = format!("http://{}{}", addr, MCP_PATH);
        let http = reqwest::Client::new();

        let response = post_mcp(&http, &url, None, serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "gumroad-mcp-tests", "version": "0.1.0"}
            }
        }))
        .await;
        assert!(response.status().is_success());
        let session = response
            .headers()
            .get("mcp-session-id")
            .expect("session id header")
            .to_str()
            .unwrap()
            .to_string();
        let init = sse_messages(&response.text().await.unwrap());
        assert!(init.iter().any(|m| m["id"] == 1 && m["result"]["capabilities"]["tools"].is_object()));

        let response = post_mcp(&http, &url, Some(&session), serde_json::json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        }))
        .await;
        assert!(response.status().is_success());

        let response = post_mcp(&http, &url, Some(&session), serde_json::json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/list"
        }))
        .await;
        assert!(response.status().is_success());

        let messages = sse_messages(&response.text().await.unwrap());
        let result = messages
            .iter()
            .find(|m| m["id"] == 2)
            .expect("tools/list response");
        let mut names: Vec<&str> = result["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|tool| tool["name"].as_str())
            .collect();
        names.sort();
        assert_eq!(names, vec!["get_product", "list_products"]);
    }
}
