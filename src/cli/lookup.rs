// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::{Args, ValueEnum};
use tracing::info;
use url::Url;

use crate::embedly::endpoint::redact_key;
use crate::embedly::{DisplaySize, EmbedlyApi, EndpointKind, RequestParameters, ResultPayload};

/// Arguments for embed and extract commands
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// URLs to look up (at most 10 distinct)
    #[arg(required = true)]
    pub urls: Vec<Url>,

    /// Ask for images of this width
    #[arg(long)]
    pub image_width: Option<u32>,

    /// Extra query parameter as name=value (repeatable)
    #[arg(long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

/// Arguments for the crop command
#[derive(Args, Debug)]
pub struct CropArgs {
    /// Image URL
    pub url: Url,

    /// Target width in pixels
    #[arg(long)]
    pub width: u32,

    /// Target height in pixels
    #[arg(long)]
    pub height: u32,
}

/// Arguments for the resize command
#[derive(Args, Debug)]
pub struct ResizeArgs {
    /// Image URL
    pub url: Url,

    /// Target width in pixels
    #[arg(long)]
    pub width: u32,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointArg {
    Embed,
    Extract,
    Crop,
    Resize,
}

/// Arguments for the url command
#[derive(Args, Debug)]
pub struct UrlArgs {
    /// Endpoint to build the URL for
    #[arg(value_enum)]
    pub endpoint: EndpointArg,

    /// Target URLs
    #[arg(required = true)]
    pub urls: Vec<Url>,

    /// Image width (embed/extract) or display width (crop/resize)
    #[arg(long)]
    pub width: Option<u32>,

    /// Display height (crop)
    #[arg(long)]
    pub height: Option<u32>,

    /// Extra query parameter as name=value (repeatable)
    #[arg(long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Print the API key instead of redacting it
    #[arg(long)]
    pub show_key: bool,
}

/// Parse a `name=value` pair
fn parse_param(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid parameter '{}': expected name=value", s))?;
    if name.is_empty() {
        return Err(format!("invalid parameter '{}': empty name", s));
    }
    Ok((name.to_string(), value.to_string()))
}

fn to_params(pairs: Vec<(String, String)>) -> RequestParameters {
    pairs.into_iter().collect()
}

fn render(payload: &ResultPayload) -> Result<String> {
    Ok(serde_json::to_string_pretty(payload)?)
}

/// Fetch oEmbed data
pub async fn embed(args: LookupArgs, api: &dyn EmbedlyApi) -> Result<String> {
    let params = to_params(args.params);
    let payload = api.embed(&args.urls, &params, args.image_width).await?;
    info!("Received {} embed results", payload.len());
    render(&payload)
}

/// Fetch extract data
pub async fn extract(args: LookupArgs, api: &dyn EmbedlyApi) -> Result<String> {
    let params = to_params(args.params);
    let payload = api.extract(&args.urls, &params, args.image_width).await?;
    info!("Received {} extract results", payload.len());
    render(&payload)
}

/// Crop an image
pub async fn crop(args: CropArgs, api: &dyn EmbedlyApi) -> Result<String> {
    let size = DisplaySize::new(args.width, args.height);
    let payload = api.display_crop(&args.url, size).await?;
    render(&payload)
}

/// Resize an image
pub async fn resize(args: ResizeArgs, api: &dyn EmbedlyApi) -> Result<String> {
    let payload = api.display_resize(&args.url, args.width).await?;
    render(&payload)
}

/// Build a request URL without sending it
pub fn request_url(args: UrlArgs, api: &dyn EmbedlyApi) -> Result<String> {
    let endpoint = match args.endpoint {
        EndpointArg::Embed => EndpointKind::Embed {
            image_width: args.width,
        },
        EndpointArg::Extract => EndpointKind::Extract {
            image_width: args.width,
        },
        EndpointArg::Crop => EndpointKind::DisplayCrop {
            size: DisplaySize::new(
                args.width.ok_or_else(|| anyhow::anyhow!("crop requires --width"))?,
                args.height.ok_or_else(|| anyhow::anyhow!("crop requires --height"))?,
            ),
        },
        EndpointArg::Resize => EndpointKind::DisplayResize {
            width: args.width.ok_or_else(|| anyhow::anyhow!("resize requires --width"))?,
        },
    };

    let params = to_params(args.params);
    let built = api.request_url(&endpoint, &args.urls, &params)?;

    if args.show_key {
        return Ok(built);
    }

    Ok(redact_key(&built))
}
