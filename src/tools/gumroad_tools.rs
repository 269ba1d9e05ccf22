//! RMCP 0.3.2 implementation of the Gumroad store tools
//!
//! Provides 5 tools for listing, inspecting, creating, updating and deleting
//! products. Results are plain text meant to be read back to the user.

use rmcp::{
    tool, tool_router, tool_handler, ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::*,
    ErrorData as McpError,
    service::RequestContext,
    RoleServer,
};
use tracing::info;
use std::future::Future;

use super::types::*;
use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::error::GumroadError;
use crate::gumroad_client::{GumroadClient, NewProduct, Product, ProductUpdate};
use crate::registry::ToolFilter;

/// Gumroad tool handler
#[derive(Clone)]
pub struct GumroadToolHandler {
    tool_router: ToolRouter<GumroadToolHandler>,
    config: Config,
    client: GumroadClient,
    credentials: CredentialStore,
}

impl GumroadToolHandler {
    pub fn new(config: Config) -> Result<Self, GumroadError> {
        let client = GumroadClient::new(config.api_base.clone(), config.request_timeout)?;
        Ok(Self::with_client(config, client))
    }

    /// Build a handler around an existing client (sessions share its connection pool)
    pub fn with_client(config: Config, client: GumroadClient) -> Self {
        let mut tool_router = Self::tool_router();
        ToolFilter::from_config(&config).apply(&mut tool_router);

        let credentials = CredentialStore::new(config.access_token.clone(), config.creds_dir.clone());

        Self {
            tool_router,
            config,
            client,
            credentials,
        }
    }

    /// Names of the tools exposed after filtering, sorted
    pub fn enabled_tools(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        names
    }

    fn access_token(&self) -> Result<String, McpError> {
        self.credentials.access_token().map_err(make_error)
    }
}

fn make_error(err: GumroadError) -> McpError {
    McpError::internal_error(err.to_string(), None)
}

/// `$X.YY` from cents, or `Free` for zero
pub fn format_price(cents: i64) -> String {
    if cents == 0 {
        "Free".to_string()
    } else {
        format!("${:.2}", cents as f64 / 100.0)
    }
}

fn format_revenue(cents: f64) -> String {
    format!("${:.2}", cents / 100.0)
}

pub fn format_product_list(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products found in your Gumroad store.".to_string();
    }

    let mut result = format!("Found {} product(s) in your Gumroad store:\n\n", products.len());
    for (i, product) in products.iter().enumerate() {
        result.push_str(&format!(
            "{}. {}\n\
             \x20  ID: {}\n\
             \x20  Price: {}\n\
             \x20  URL: {}\n\
             \x20  Published: {}\n\
             \x20  Sales count: {}\n\
             \x20  Sales revenue: {}\n\n",
            i + 1,
            product.name.as_deref().unwrap_or("Untitled"),
            product.id.as_deref().unwrap_or("N/A"),
            format_price(product.price),
            product.display_url(),
            product.published.unwrap_or(false),
            product.sales_count,
            format_revenue(product.sales_usd_cents),
        ));
    }
    result
}

pub fn format_product_details(product: &Product) -> String {
    let mut result = format!(
        "Product Details:\n\n\
         Name: {}\n\
         ID: {}\n\
         Description: {}\n\
         Price: {}\n\
         Currency: {}\n\
         URL: {}\n\
         Published: {}\n\
         Customizable price: {}\n\
         Sales count: {}\n\
         Sales revenue: {}\n",
        product.name.as_deref().unwrap_or("Untitled"),
        product.id.as_deref().unwrap_or("N/A"),
        product.description.as_deref().unwrap_or("No description"),
        format_price(product.price),
        product.currency.as_deref().unwrap_or("usd"),
        product.display_url(),
        product.published.unwrap_or(false),
        product.customizable_price.unwrap_or(false),
        product.sales_count,
        format_revenue(product.sales_usd_cents),
    );

    if !product.variants.is_empty() {
        result.push_str(&format!("Variants: {}\n", product.variants.len()));
    }
    result
}

#[tool_router]
impl GumroadToolHandler {
    #[tool(description = "List all products in your Gumroad store, including name, ID, price, URL, publish status and sales.")]
    async fn list_products(&self) -> Result<CallToolResult, McpError> {
        let token = self.access_token()?;
        info!("[list_products] Fetching all Gumroad products");

        let products = self.client.list_products(&token).await.map_err(make_error)?;

        info!("[list_products] Successfully retrieved {} products", products.len());
        Ok(CallToolResult::success(vec![Content::text(format_product_list(&products))]))
    }

    #[tool(description = "Get details of a single Gumroad product by its ID")]
    async fn get_product(&self, Parameters(args): Parameters<GetProductArgs>) -> Result<CallToolResult, McpError> {
        let token = self.access_token()?;
        info!("[get_product] Fetching product: {}", args.product_id);

        let product = self.client.get_product(&token, &args.product_id)
            .await.map_err(make_error)?;

        info!("[get_product] Successfully retrieved product: {}", args.product_id);
        Ok(CallToolResult::success(vec![Content::text(format_product_details(&product))]))
    }

    #[tool(description = "Create a new product in your Gumroad store. Price is in cents (500 = $5.00); use 0 for free products.")]
    async fn create_product(&self, Parameters(args): Parameters<CreateProductArgs>) -> Result<CallToolResult, McpError> {
        let token = self.access_token()?;
        info!("[create_product] Creating product: {}", args.name);

        let new_product = NewProduct {
            name: args.name,
            price: args.price,
            description: args.description,
            url: args.url,
        };
        let product = self.client.create_product(&token, &new_product)
            .await.map_err(make_error)?;

        let message = format!(
            "Product created successfully!\n\n\
             Name: {}\n\
             ID: {}\n\
             Price: {}\n\
             URL: {}\n\
             Published: {}\n",
            product.name.as_deref().unwrap_or(&new_product.name),
            product.id.as_deref().unwrap_or("N/A"),
            format_price(product.price),
            product.display_url(),
            product.published.unwrap_or(false),
        );

        info!("[create_product] Successfully created product: {}", product.id.as_deref().unwrap_or("unknown"));
        Ok(CallToolResult::success(vec![Content::text(message)]))
    }

    #[tool(description = "Update an existing Gumroad product's name, description or price (in cents)")]
    async fn update_product(&self, Parameters(args): Parameters<UpdateProductArgs>) -> Result<CallToolResult, McpError> {
        let update = ProductUpdate {
            product_id: args.product_id,
            name: args.name,
            description: args.description,
            price: args.price,
        };

        if update.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "No fields to update. Provide at least one of: name, description, or price.",
            )]));
        }

        let token = self.access_token()?;
        info!("[update_product] Updating product: {}", update.product_id);

        let product = self.client.update_product(&token, &update)
            .await.map_err(make_error)?;

        let message = format!(
            "Product updated successfully!\n\n\
             Name: {}\n\
             ID: {}\n\
             Description: {}\n\
             Price: {}\n\
             URL: {}\n",
            product.name.as_deref().unwrap_or("Untitled"),
            product.id.as_deref().unwrap_or(&update.product_id),
            product.description.as_deref().unwrap_or("No description"),
            format_price(product.price),
            product.display_url(),
        );

        info!("[update_product] Successfully updated product: {}", update.product_id);
        Ok(CallToolResult::success(vec![Content::text(message)]))
    }

    #[tool(description = "Delete a product from your Gumroad store")]
    async fn delete_product(&self, Parameters(args): Parameters<DeleteProductArgs>) -> Result<CallToolResult, McpError> {
        let token = self.access_token()?;
        info!("[delete_product] Deleting product: {}", args.product_id);

        self.client.delete_product(&token, &args.product_id)
            .await.map_err(make_error)?;

        info!("[delete_product] Successfully deleted product: {}", args.product_id);
        Ok(CallToolResult::success(vec![Content::text(format!(
            "Product '{}' has been successfully deleted.", args.product_id
        ))]))
    }
}

#[tool_handler]
impl ServerHandler for GumroadToolHandler {
    fn get_info(&self) -> ServerInfo {
        let tools = self.enabled_tools();
        let mode = if self.config.read_only { " (read-only)" } else { "" };
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(format!(
                "Gumroad MCP Server - manage products in a Gumroad store{}. \
                 {} tools available: {}.",
                mode,
                tools.len(),
                tools.join(", "),
            )),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        info!("Gumroad MCP server initialized with {} tools", self.enabled_tools().len());
        Ok(self.get_info())
    }
}
