// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod embedly;

// Re-export main types
pub use embedly::{
    DisplaySize, EmbedlyApi, EmbedlyClient, EmbedlyConfig, EmbedlyError, EndpointKind,
    RequestParameters, ResultPayload,
};
