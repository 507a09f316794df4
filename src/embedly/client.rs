// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Embedly HTTP client
//!
//! Builds request URLs, issues GETs against the Embedly hosts and normalizes
//! the JSON responses.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use super::config::EmbedlyConfig;
use super::endpoint::{redact_key, EndpointKind, RequestParameters};
use super::types::{
    normalize_payload, parse_service_error, DisplaySize, EmbedlyError, ResultPayload,
};

/// Operations exposed by the Embedly service
///
/// Implemented by [`EmbedlyClient`]; front ends take `&dyn EmbedlyApi` so
/// they can be driven by a mock in tests.
#[async_trait]
pub trait EmbedlyApi: Send + Sync {
    /// Fetch oEmbed data for up to ten URLs
    ///
    /// # Arguments
    /// * `urls` - Target URLs (duplicates are ignored)
    /// * `params` - Extra query parameters, overriding endpoint defaults
    /// * `image_width` - Ask the service for images of this width
    async fn embed(
        &self,
        urls: &[Url],
        params: &RequestParameters,
        image_width: Option<u32>,
    ) -> Result<ResultPayload, EmbedlyError>;

    /// Extract article data for up to ten URLs
    async fn extract(
        &self,
        urls: &[Url],
        params: &RequestParameters,
        image_width: Option<u32>,
    ) -> Result<ResultPayload, EmbedlyError>;

    /// Crop the image at `url` to `size`
    async fn display_crop(
        &self,
        url: &Url,
        size: DisplaySize,
    ) -> Result<ResultPayload, EmbedlyError>;

    /// Resize the image at `url` to `width`
    async fn display_resize(&self, url: &Url, width: u32) -> Result<ResultPayload, EmbedlyError>;

    /// Call an arbitrary endpoint on the metadata API host
    async fn custom(
        &self,
        path: &str,
        urls: &[Url],
        params: &RequestParameters,
    ) -> Result<ResultPayload, EmbedlyError>;

    /// Build the request URL for an endpoint without sending it
    fn request_url(
        &self,
        endpoint: &EndpointKind,
        urls: &[Url],
        params: &RequestParameters,
    ) -> Result<String, EmbedlyError>;
}

/// Embedly API client
///
/// Cheap to clone: clones share the configuration and the pooled HTTP client.
#[derive(Clone)]
pub struct EmbedlyClient {
    config: Arc<EmbedlyConfig>,
    client: Client,
}

impl EmbedlyClient {
    /// Create a new client
    ///
    /// Fails if the configuration does not validate, most notably when no
    /// API key is set. No request can be made without one.
    pub fn new(config: EmbedlyConfig) -> Result<Self, EmbedlyError> {
        config
            .validate()
            .map_err(|reason| EmbedlyError::Config { reason })?;

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        debug!(
            "Embedly client ready (api: {}, display: {})",
            config.api_url, config.display_url
        );

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Create a client from `EMBEDLY_*` environment variables
    pub fn from_env() -> Result<Self, EmbedlyError> {
        Self::new(EmbedlyConfig::from_env())
    }

    /// Get the configuration
    pub fn config(&self) -> &EmbedlyConfig {
        &self.config
    }

    /// Build and send a request for any endpoint
    pub async fn execute(
        &self,
        endpoint: &EndpointKind,
        urls: &[Url],
        params: Option<&RequestParameters>,
    ) -> Result<ResultPayload, EmbedlyError> {
        let request_url = endpoint.build_url(&self.config, urls, params)?;
        self.fetch(&request_url).await
    }

    /// Run a request in the background and hand the outcome to `callback`
    ///
    /// Must be called from within a Tokio runtime; without one this returns
    /// [`EmbedlyError::Config`] and the callback is never scheduled.
    ///
    /// The URL is built up front, so a request over the URL limit fails here
    /// as well. Otherwise the callback runs exactly once on the spawned task,
    /// whatever the outcome.
    pub fn dispatch<F>(
        &self,
        endpoint: EndpointKind,
        urls: &[Url],
        params: Option<&RequestParameters>,
        callback: F,
    ) -> Result<JoinHandle<()>, EmbedlyError>
    where
        F: FnOnce(Result<ResultPayload, EmbedlyError>) + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|e| EmbedlyError::Config {
            reason: format!("no tokio runtime: {}", e),
        })?;
        let request_url = endpoint.build_url(&self.config, urls, params)?;
        let client = self.clone();

        debug!("Dispatching {} request", endpoint.path());

        Ok(runtime.spawn(async move {
            let result = client.fetch(&request_url).await;
            callback(result);
        }))
    }

    /// GET a built request URL and parse the response
    async fn fetch(&self, request_url: &str) -> Result<ResultPayload, EmbedlyError> {
        debug!("Embedly GET {}", redact_key(request_url));
        let start = Instant::now();

        let response = self.client.get(request_url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            if let Some(message) = parse_service_error(&body) {
                warn!("Embedly returned error {}: {}", status.as_u16(), message);
                return Err(EmbedlyError::ServiceError {
                    status: status.as_u16(),
                    message,
                });
            }

            return Err(EmbedlyError::HttpStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        if body.is_empty() {
            return Err(EmbedlyError::InvalidRequest);
        }

        let json: Value = serde_json::from_slice(&body)?;
        let payload = normalize_payload(json);

        info!(
            "Embedly request complete: {} results in {}ms",
            payload.len(),
            start.elapsed().as_millis()
        );

        Ok(payload)
    }
}

fn require_urls(urls: &[Url]) -> Result<(), EmbedlyError> {
    if urls.is_empty() {
        return Err(EmbedlyError::NoUrls);
    }
    Ok(())
}

fn require_positive(name: &str, value: u32) -> Result<(), EmbedlyError> {
    if value == 0 {
        return Err(EmbedlyError::InvalidParameter {
            reason: format!("{} must be greater than 0", name),
        });
    }
    Ok(())
}

#[async_trait]
impl EmbedlyApi for EmbedlyClient {
    async fn embed(
        &self,
        urls: &[Url],
        params: &RequestParameters,
        image_width: Option<u32>,
    ) -> Result<ResultPayload, EmbedlyError> {
        require_urls(urls)?;
        self.execute(&EndpointKind::Embed { image_width }, urls, Some(params))
            .await
    }

    async fn extract(
        &self,
        urls: &[Url],
        params: &RequestParameters,
        image_width: Option<u32>,
    ) -> Result<ResultPayload, EmbedlyError> {
        require_urls(urls)?;
        self.execute(&EndpointKind::Extract { image_width }, urls, Some(params))
            .await
    }

    async fn display_crop(
        &self,
        url: &Url,
        size: DisplaySize,
    ) -> Result<ResultPayload, EmbedlyError> {
        require_positive("width", size.width)?;
        require_positive("height", size.height)?;
        self.execute(
            &EndpointKind::DisplayCrop { size },
            std::slice::from_ref(url),
            None,
        )
        .await
    }

    async fn display_resize(&self, url: &Url, width: u32) -> Result<ResultPayload, EmbedlyError> {
        require_positive("width", width)?;
        self.execute(
            &EndpointKind::DisplayResize { width },
            std::slice::from_ref(url),
            None,
        )
        .await
    }

    async fn custom(
        &self,
        path: &str,
        urls: &[Url],
        params: &RequestParameters,
    ) -> Result<ResultPayload, EmbedlyError> {
        if path.trim_matches('/').is_empty() {
            return Err(EmbedlyError::InvalidParameter {
                reason: "endpoint path is empty".to_string(),
            });
        }
        if path.contains(['?', '#']) {
            return Err(EmbedlyError::InvalidParameter {
                reason: format!("endpoint path must not contain '?' or '#': {}", path),
            });
        }
        require_urls(urls)?;

        let endpoint = EndpointKind::Custom {
            path: path.to_string(),
            params: params.clone(),
        };
        self.execute(&endpoint, urls, None).await
    }

    fn request_url(
        &self,
        endpoint: &EndpointKind,
        urls: &[Url],
        params: &RequestParameters,
    ) -> Result<String, EmbedlyError> {
        endpoint.build_url(&self.config, urls, Some(params))
    }
}
