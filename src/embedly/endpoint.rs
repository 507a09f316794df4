// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Endpoint selection and request URL construction

use std::collections::{BTreeMap, HashSet};
use url::Url;

use super::config::EmbedlyConfig;
use super::types::{DisplaySize, EmbedlyError, MAX_URLS_PER_REQUEST};

/// Query parameters keyed by name
///
/// Serialized in key order, but the service does not care about order and
/// callers should not rely on it either.
pub type RequestParameters = BTreeMap<String, String>;

const PARAM_KEY: &str = "key";
const PARAM_URL: &str = "url";
const PARAM_URLS: &str = "urls";

/// One of the supported Embedly operations with its own parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointKind {
    /// oEmbed lookup, optionally asking for images of a given width
    Embed { image_width: Option<u32> },
    /// Article extraction, optionally asking for images of a given width
    Extract { image_width: Option<u32> },
    /// Crop an image to an exact size
    DisplayCrop { size: DisplaySize },
    /// Resize an image to a width
    DisplayResize { width: u32 },
    /// Any other endpoint on the metadata API host
    Custom {
        path: String,
        params: RequestParameters,
    },
}

impl EndpointKind {
    /// Parameters implied by the endpoint itself
    pub fn default_params(&self) -> RequestParameters {
        let mut params = RequestParameters::new();

        match self {
            Self::Embed { image_width } | Self::Extract { image_width } => {
                if let Some(width) = image_width {
                    params.insert("image_width".to_string(), width.to_string());
                }
            }
            Self::DisplayCrop { size } => {
                params.insert("width".to_string(), size.width.to_string());
                params.insert("height".to_string(), size.height.to_string());
            }
            Self::DisplayResize { width } => {
                params.insert("width".to_string(), width.to_string());
            }
            Self::Custom { params: extra, .. } => {
                params.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }

        params
    }

    /// Path of the endpoint relative to its host
    pub fn path(&self) -> &str {
        match self {
            Self::Embed { .. } => "oembed",
            Self::Extract { .. } => "extract",
            Self::DisplayCrop { .. } => "display/crop",
            Self::DisplayResize { .. } => "display/resize",
            Self::Custom { path, .. } => path.trim_start_matches('/'),
        }
    }

    /// Whether the endpoint lives on the display API host
    pub fn is_display(&self) -> bool {
        matches!(self, Self::DisplayCrop { .. } | Self::DisplayResize { .. })
    }

    /// Fully qualified endpoint URL without query string
    pub fn endpoint_url(&self, config: &EmbedlyConfig) -> String {
        let base = if self.is_display() {
            &config.display_url
        } else {
            &config.api_url
        };

        format!("{}/{}", base.trim_end_matches('/'), self.path())
    }

    /// Merge defaults, caller overrides, the API key and the target URLs
    ///
    /// Caller values win over endpoint defaults. The key and the URL list
    /// always win over caller values. A multi-URL `urls` value is stored
    /// already encoded (each URL escaped, joined by literal commas).
    pub fn build_params(
        &self,
        api_key: &str,
        urls: &[Url],
        extra: Option<&RequestParameters>,
    ) -> Result<RequestParameters, EmbedlyError> {
        let unique = dedup_urls(urls);
        if unique.len() > MAX_URLS_PER_REQUEST {
            return Err(EmbedlyError::ExceedsMaximumUrls {
                count: unique.len(),
                max: MAX_URLS_PER_REQUEST,
            });
        }

        let mut params = self.default_params();
        if let Some(extra) = extra {
            params.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        params.remove(PARAM_URL);
        params.remove(PARAM_URLS);
        params.insert(PARAM_KEY.to_string(), api_key.to_string());

        match unique.as_slice() {
            [] => {}
            [single] => {
                params.insert(PARAM_URL.to_string(), single.as_str().to_string());
            }
            many => {
                let joined = many
                    .iter()
                    .map(|u| encode_query_value(u.as_str()))
                    .collect::<Vec<_>>()
                    .join(",");
                params.insert(PARAM_URLS.to_string(), joined);
            }
        }

        Ok(params)
    }

    /// Build the complete, percent-encoded request URL
    ///
    /// Fails with [`EmbedlyError::ExceedsMaximumUrls`] before anything is
    /// sent when more than ten distinct URLs are given.
    pub fn build_url(
        &self,
        config: &EmbedlyConfig,
        urls: &[Url],
        extra: Option<&RequestParameters>,
    ) -> Result<String, EmbedlyError> {
        let params = self.build_params(&config.api_key, urls, extra)?;
        Ok(format!(
            "{}?{}",
            self.endpoint_url(config),
            serialize_query(&params)
        ))
    }
}

/// Remove duplicate URLs, keeping the first occurrence of each
pub fn dedup_urls(urls: &[Url]) -> Vec<&Url> {
    let mut seen = HashSet::new();
    urls.iter().filter(|u| seen.insert(u.as_str())).collect()
}

/// Percent-encode a single query parameter value
pub fn encode_query_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Serialize parameters as `name=value` pairs joined by `&`
fn serialize_query(params: &RequestParameters) -> String {
    params
        .iter()
        .map(|(name, value)| {
            if name == PARAM_URLS {
                // already encoded entry by entry
                format!("{}={}", encode_query_value(name), value)
            } else {
                format!("{}={}", encode_query_value(name), encode_query_value(value))
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Replace the API key in a built URL for logging
pub fn redact_key(request_url: &str) -> String {
    let Some((base, query)) = request_url.split_once('?') else {
        return request_url.to_string();
    };

    let query = query
        .split('&')
        .map(|pair| {
            if pair.starts_with("key=") {
                "key=***"
            } else {
                pair
            }
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", base, query)
}
