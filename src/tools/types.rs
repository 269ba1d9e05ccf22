//! Type definitions for Gumroad MCP tools

use serde::Deserialize;
use schemars::JsonSchema;

// ============================================================================
// get_product
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetProductArgs {
    /// The unique identifier of the product
    pub product_id: String,
}

// ============================================================================
// create_product
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateProductArgs {
    /// The name of the product
    pub name: String,
    /// Price in cents (e.g., 500 = $5.00). Use 0 for free products.
    pub price: i64,
    /// Optional product description
    #[serde(default)]
    pub description: Option<String>,
    /// Optional custom URL slug for the product
    #[serde(default)]
    pub url: Option<String>,
}

// ============================================================================
// update_product
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateProductArgs {
    /// The unique identifier of the product to update
    pub product_id: String,
    /// New name for the product
    #[serde(default)]
    pub name: Option<String>,
    /// New description for the product
    #[serde(default)]
    pub description: Option<String>,
    /// New price in cents (e.g., 500 = $5.00)
    #[serde(default)]
    pub price: Option<i64>,
}

// ============================================================================
// delete_product
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteProductArgs {
    /// The unique identifier of the product to delete
    pub product_id: String,
}
