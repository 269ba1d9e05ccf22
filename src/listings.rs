//! Bulk product listing creation
//!
//! Reads a JSON catalog and creates each entry as a Gumroad product, in order.
//! A failed entry is logged and skipped so the rest of the catalog still goes out.

use serde::Deserialize;
use std::path::Path;
use tracing::{error, info};

use crate::error::Result;
use crate::gumroad_client::{GumroadClient, NewProduct, Product};
use crate::tools::format_price;

/// One catalog entry
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    pub name: String,
    /// Price in cents
    #[serde(default)]
    pub price: i64,
    /// HTML description shown on the product page
    #[serde(default)]
    pub description: String,
    pub url_slug: String,
    /// Google Drive file the product content comes from (informational)
    #[serde(default)]
    pub drive_file_id: Option<String>,
}

impl Listing {
    pub fn to_new_product(&self) -> NewProduct {
        NewProduct {
            name: self.name.clone(),
            price: self.price,
            description: Some(self.description.clone()),
            url: Some(self.url_slug.clone()),
        }
    }
}

#[derive(Debug, Default)]
pub struct PublishReport {
    pub created: Vec<Product>,
    /// Listing name and error message
    pub failed: Vec<(String, String)>,
}

impl PublishReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub fn load_listings(path: &Path) -> Result<Vec<Listing>> {
    let contents = std::fs::read_to_string(path)?;
    let listings: Vec<Listing> = serde_json::from_str(&contents)?;
    Ok(listings)
}

pub async fn publish_listings(client: &GumroadClient, token: &str, listings: &[Listing]) -> PublishReport {
    info!("Creating {} Gumroad product listings", listings.len());

    let mut report = PublishReport::default();
    for listing in listings {
        info!("Creating: {}", listing.name);
        match client.create_product(token, &listing.to_new_product()).await {
            Ok(product) => {
                info!(
                    "  ✓ Created | ID: {} | Price: {} | URL: {}",
                    product.id.as_deref().unwrap_or("N/A"),
                    format_price(product.price),
                    product.display_url(),
                );
                report.created.push(product);
            }
            Err(e) => {
                error!("  ✗ Failed to create '{}': {}", listing.name, e);
                report.failed.push((listing.name.clone(), e.to_string()));
            }
        }
    }

    info!("Done. {} created, {} failed", report.created.len(), report.failed.len());
    report
}
