// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Embedly API client
//!
//! Client-side binding to the Embedly content-embedding service:
//! - oEmbed and extract lookups against the metadata API host
//! - Crop and resize requests against the display API host
//! - Custom endpoints on the metadata API host
//!
//! Every request is a single GET whose query string carries the API key and
//! the target URL(s). Responses are normalized into a list of JSON objects.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod types;

// Re-export commonly used types
pub use client::{EmbedlyApi, EmbedlyClient};
pub use config::EmbedlyConfig;
pub use endpoint::{EndpointKind, RequestParameters};
pub use types::{DisplaySize, EmbedlyError, ResultPayload, MAX_URLS_PER_REQUEST};
