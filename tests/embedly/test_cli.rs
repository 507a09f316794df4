// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use async_trait::async_trait;
use clap::Parser;
use embedly_client::cli::{execute, Cli};
use embedly_client::{
    DisplaySize, EmbedlyApi, EmbedlyClient, EmbedlyConfig, EmbedlyError, EndpointKind,
    RequestParameters, ResultPayload,
};
use mockall::mock;
use serde_json::json;
use url::Url;

mock! {
    pub Api {}

    #[async_trait]
    impl EmbedlyApi for Api {
        async fn embed(
            &self,
            urls: &[Url],
            params: &RequestParameters,
            image_width: Option<u32>,
        ) -> Result<ResultPayload, EmbedlyError>;

        async fn extract(
            &self,
            urls: &[Url],
            params: &RequestParameters,
            image_width: Option<u32>,
        ) -> Result<ResultPayload, EmbedlyError>;

        async fn display_crop(
            &self,
            url: &Url,
            size: DisplaySize,
        ) -> Result<ResultPayload, EmbedlyError>;

        async fn display_resize(&self, url: &Url, width: u32) -> Result<ResultPayload, EmbedlyError>;

        async fn custom(
            &self,
            path: &str,
            urls: &[Url],
            params: &RequestParameters,
        ) -> Result<ResultPayload, EmbedlyError>;

        fn request_url(
            &self,
            endpoint: &EndpointKind,
            urls: &[Url],
            params: &RequestParameters,
        ) -> Result<String, EmbedlyError>;
    }
}

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["embedly-cli", "--api-key", "test-key"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

fn object(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    value.as_object().unwrap().clone()
}

#[tokio::test]
async fn test_embed_command_passes_arguments() {
    let mut api = MockApi::new();
    api.expect_embed()
        .withf(|urls, params, image_width| {
            urls.len() == 2
                && params.get("maxwidth").map(String::as_str) == Some("500")
                && *image_width == Some(300)
        })
        .times(1)
        .returning(|_, _, _| Ok(vec![object(json!({"title": "Example"}))]));

    let cli = parse(&[
        "embed",
        "https://example.com/1",
        "https://example.com/2",
        "--image-width",
        "300",
        "--param",
        "maxwidth=500",
    ]);

    let output = execute(cli.command, &api).await.unwrap();
    let printed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(printed, json!([{"title": "Example"}]));
}

#[tokio::test]
async fn test_extract_command_surfaces_errors() {
    let mut api = MockApi::new();
    api.expect_extract().times(1).returning(|_, _, _| {
        Err(EmbedlyError::ServiceError {
            status: 401,
            message: "bad key".to_string(),
        })
    });

    let cli = parse(&["extract", "https://example.com/"]);
    let error = execute(cli.command, &api).await.unwrap_err();
    assert!(error.to_string().contains("bad key"));
}

#[tokio::test]
async fn test_crop_command() {
    let mut api = MockApi::new();
    api.expect_display_crop()
        .withf(|url, size| {
            url.as_str() == "https://example.com/a.png" && *size == DisplaySize::new(64, 32)
        })
        .times(1)
        .returning(|_, _| Ok(vec![]));

    let cli = parse(&[
        "crop",
        "https://example.com/a.png",
        "--width",
        "64",
        "--height",
        "32",
    ]);

    let output = execute(cli.command, &api).await.unwrap();
    assert_eq!(output.trim(), "[]");
}

#[tokio::test]
async fn test_resize_command() {
    let mut api = MockApi::new();
    api.expect_display_resize()
        .withf(|_, width| *width == 120)
        .times(1)
        .returning(|_, _| Ok(vec![object(json!({"width": 120}))]));

    let cli = parse(&["resize", "https://example.com/a.png", "--width", "120"]);
    let output = execute(cli.command, &api).await.unwrap();
    assert!(output.contains("120"));
}

#[tokio::test]
async fn test_url_command_redacts_key() {
    let client = EmbedlyClient::new(EmbedlyConfig::new("super-secret")).unwrap();

    let cli = parse(&[
        "url",
        "crop",
        "https://example.com/a.png",
        "--width",
        "10",
        "--height",
        "20",
    ]);

    let output = execute(cli.command, &client).await.unwrap();
    assert!(output.starts_with("http://i.embed.ly/1/display/crop?"));
    assert!(output.contains("key=***"));
    assert!(!output.contains("super-secret"));
    assert!(output.contains("height=20"));
}

#[tokio::test]
async fn test_url_command_show_key() {
    let client = EmbedlyClient::new(EmbedlyConfig::new("visible")).unwrap();

    let cli = parse(&["url", "embed", "https://example.com/", "--show-key"]);
    let output = execute(cli.command, &client).await.unwrap();
    assert!(output.contains("key=visible"));
}

#[tokio::test]
async fn test_url_command_crop_needs_height() {
    let api = MockApi::new();

    let cli = parse(&["url", "crop", "https://example.com/a.png", "--width", "10"]);
    let error = execute(cli.command, &api).await.unwrap_err();
    assert!(error.to_string().contains("--height"));
}
