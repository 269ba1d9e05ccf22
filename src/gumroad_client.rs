//! Gumroad REST API client (v2)
//!
//! Every endpoint returns a JSON envelope with a `success` flag. Requests are
//! authenticated with an `access_token` parameter: query string for GET/DELETE,
//! form body for POST/PUT.

use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{GumroadError, Result};

/// A product as returned by the Gumroad API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Product {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Price in cents
    #[serde(default, deserialize_with = "lenient_i64")]
    pub price: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub short_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
    #[serde(default)]
    pub customizable_price: Option<bool>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub sales_count: i64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sales_usd_cents: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub variants: Vec<Value>,
}

impl Product {
    /// Public link, preferring the short form
    pub fn display_url(&self) -> &str {
        self.short_url
            .as_deref()
            .or(self.url.as_deref())
            .unwrap_or("N/A")
    }
}

/// Response wrapper shared by all endpoints
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub product: Option<Product>,
    #[serde(default)]
    pub products: Option<Vec<Product>>,
}

/// Fields for a new product
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    /// Price in cents; 0 for free products
    pub price: i64,
    pub description: Option<String>,
    /// Custom URL slug
    pub url: Option<String>,
}

/// Partial update of an existing product
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub product_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.price.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct GumroadClient {
    http: Client,
    api_base: String,
}

impl GumroadClient {
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gumroad-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.into(),
        })
    }

    pub async fn list_products(&self, token: &str) -> Result<Vec<Product>> {
        let url = self.endpoint(&["products"])?;
        let envelope = self
            .send(self.http.get(url).query(&[("access_token", token)]))
            .await?;
        Ok(envelope.products.unwrap_or_default())
    }

    pub async fn get_product(&self, token: &str, product_id: &str) -> Result<Product> {
        let url = self.endpoint(&["products", product_id])?;
        let envelope = self
            .send(self.http.get(url).query(&[("access_token", token)]))
            .await?;
        Ok(envelope.product.unwrap_or_default())
    }

    pub async fn create_product(&self, token: &str, product: &NewProduct) -> Result<Product> {
        let mut form = vec![
            ("access_token", token.to_string()),
            ("name", product.name.clone()),
            ("price", product.price.to_string()),
        ];
        if let Some(description) = product.description.as_ref().filter(|d| !d.is_empty()) {
            form.push(("description", description.clone()));
        }
        if let Some(url) = product.url.as_ref().filter(|u| !u.is_empty()) {
            form.push(("url", url.clone()));
        }

        let url = self.endpoint(&["products"])?;
        let envelope = self.send(self.http.post(url).form(&form)).await?;
        Ok(envelope.product.unwrap_or_default())
    }

    pub async fn update_product(&self, token: &str, update: &ProductUpdate) -> Result<Product> {
        let mut form = vec![("access_token", token.to_string())];
        if let Some(name) = &update.name {
            form.push(("name", name.clone()));
        }
        if let Some(description) = &update.description {
            form.push(("description", description.clone()));
        }
        if let Some(price) = update.price {
            form.push(("price", price.to_string()));
        }

        let url = self.endpoint(&["products", &update.product_id])?;
        let envelope = self.send(self.http.put(url).form(&form)).await?;
        Ok(envelope.product.unwrap_or_default())
    }

    pub async fn delete_product(&self, token: &str, product_id: &str) -> Result<()> {
        let url = self.endpoint(&["products", product_id])?;
        self.send(self.http.delete(url).query(&[("access_token", token)]))
            .await?;
        Ok(())
    }

    /// Build `<api_base>/<segments...>` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| GumroadError::InvalidUrl(format!("{}: {}", self.api_base, e)))?;
        url.path_segments_mut()
            .map_err(|_| GumroadError::InvalidUrl(self.api_base.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<ApiEnvelope> {
        let response = request.send().await?;
        let status = response.status();
        debug!("Gumroad {} -> {}", response.url().path(), status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GumroadError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ApiEnvelope = response.json().await?;
        if !envelope.success {
            return Err(GumroadError::Api(
                envelope.message.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }
        Ok(envelope)
    }
}

// Gumroad reports counters as numbers or numeric strings depending on the endpoint.

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn lenient_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_f64(deserializer).map(|v| v.round() as i64)
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}
