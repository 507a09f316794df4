// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for Embedly requests and responses

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Maximum number of distinct URLs the service accepts in one request
pub const MAX_URLS_PER_REQUEST: usize = 10;

/// A single JSON object returned by the service
pub type EmbedlyObject = Map<String, Value>;

/// Parsed response: one object per requested URL
///
/// The service answers a single-URL request with one object and a
/// multi-URL request with an array; both are normalized into a list.
pub type ResultPayload = Vec<EmbedlyObject>;

/// Target dimensions for the display crop endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl DisplaySize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Errors that can occur during Embedly operations
#[derive(Debug, Error)]
pub enum EmbedlyError {
    /// More distinct URLs than the service accepts
    #[error("Request exceeds maximum of {max} URLs (got {count})")]
    ExceedsMaximumUrls {
        /// Number of distinct URLs requested
        count: usize,
        /// Service limit
        max: usize,
    },

    /// The service answered successfully but with an empty body
    #[error("Invalid request: empty response body")]
    InvalidRequest,

    /// Structured error reported by the service in its JSON body
    #[error("Embedly error ({status}): {message}")]
    ServiceError {
        /// HTTP status code
        status: u16,
        /// Value of the `error_message` field
        message: String,
    },

    /// Non-success status without a structured error body
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Transport-level failure (connect, TLS, timeout, ...)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Malformed JSON in the response body
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Operation called without any target URL
    #[error("At least one URL is required")]
    NoUrls,

    /// A required operation input is out of range
    #[error("Invalid parameter: {reason}")]
    InvalidParameter {
        /// Reason the parameter is invalid
        reason: String,
    },

    /// Client configuration is unusable
    #[error("Invalid configuration: {reason}")]
    Config {
        /// Reason the configuration is invalid
        reason: String,
    },
}

/// Error body shape returned by the service
#[derive(Debug, Deserialize)]
pub(crate) struct ServiceErrorBody {
    pub error_message: Option<String>,
}

/// Extract the `error_message` field from an error response body, if any
pub(crate) fn parse_service_error(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ServiceErrorBody>(body)
        .ok()
        .and_then(|b| b.error_message)
}

/// Normalize a parsed response body into a result list
///
/// Objects become a one-element list and arrays of objects are kept as-is.
/// Anything else, including an array with any non-object element, yields an
/// empty list.
pub(crate) fn normalize_payload(json: Value) -> ResultPayload {
    match json {
        Value::Object(obj) => vec![obj],
        // all-or-nothing: a mixed array is not a list of results
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(obj) => Some(obj),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}
