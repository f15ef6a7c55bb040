//! Remote catalog source over a PostgREST-style HTTP API.
//!
//! The remote service exposes one `products` resource: list (ordered newest
//! first), insert-returning-representation, update by id, delete by id.
//! Absence of remote configuration is a valid state handled by the
//! repository, not by this client.

use async_trait::async_trait;
use fernhill_core::ProductId;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use crate::config::RemoteCatalogConfig;
use crate::error::Result;

use super::product::{Product, ProductDraft, ProductPatch};
use super::source::CatalogSource;

/// Errors from the remote catalog service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP request failed (connection, DNS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success status.
    #[error("Remote catalog returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Rate limited by the service.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The response body could not be parsed.
    #[error("Response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A mutation succeeded but returned no representation.
    #[error("Remote catalog returned no record for {0}")]
    MissingRepresentation(&'static str),
}

/// Client for the remote catalog REST service.
pub struct RemoteCatalogSource {
    client: reqwest::Client,
    endpoint: String,
    service_key: String,
}

impl RemoteCatalogSource {
    /// Create a new remote catalog client.
    #[must_use]
    pub fn new(config: &RemoteCatalogConfig) -> Self {
        let endpoint = format!("{}/products", config.base_url.trim_end_matches('/'));
        Self {
            client: reqwest::Client::new(),
            endpoint,
            service_key: config.service_key.expose_secret().to_string(),
        }
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=representation")
    }

    /// Send a request and decode the JSON body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> std::result::Result<T, RemoteError> {
        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(RemoteError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Remote catalog returned non-success status"
            );
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse remote catalog response"
                );
                Err(RemoteError::Parse(e))
            }
        }
    }

    async fn send_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: &B,
    ) -> std::result::Result<T, RemoteError> {
        self.send(self.request(method, url).json(body)).await
    }
}

#[async_trait]
impl CatalogSource for RemoteCatalogSource {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Product>> {
        let url = format!("{}?select=*&order=created_at.desc", self.endpoint);
        let products: Vec<Product> = self.send(self.request(reqwest::Method::GET, &url)).await?;
        Ok(products)
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn insert(&self, draft: ProductDraft) -> Result<Product> {
        let rows: Vec<Product> = self
            .send_json(reqwest::Method::POST, &self.endpoint, &draft)
            .await?;
        let product = rows
            .into_iter()
            .next()
            .ok_or(RemoteError::MissingRepresentation("insert"))?;
        Ok(product)
    }

    #[instrument(skip(self, patch), fields(id = %id))]
    async fn update(&self, id: &ProductId, patch: ProductPatch) -> Result<Option<Product>> {
        let url = format!("{}?id=eq.{id}", self.endpoint);
        let rows: Vec<Product> = self
            .send_json(reqwest::Method::PATCH, &url, &patch)
            .await?;
        // An empty representation means no row matched: not-found, not error.
        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: &ProductId) -> Result<bool> {
        let url = format!("{}?id=eq.{id}", self.endpoint);
        let rows: Vec<Product> = self.send(self.request(reqwest::Method::DELETE, &url)).await?;
        Ok(!rows.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn endpoint_strips_trailing_slash() {
        let source = RemoteCatalogSource::new(&RemoteCatalogConfig {
            base_url: "https://catalog.example.com/rest/v1/".to_string(),
            service_key: SecretString::from("key"),
        });
        assert_eq!(source.endpoint, "https://catalog.example.com/rest/v1/products");
    }

    #[test]
    fn remote_error_display() {
        let err = RemoteError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Remote catalog returned HTTP 503: unavailable"
        );

        let err = RemoteError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }
}
