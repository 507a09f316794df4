// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use embedly_client::{EmbedlyError, EndpointKind};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

use super::support::{client_for, spawn_server, url};

#[tokio::test]
async fn test_dispatch_delivers_result_once() {
    let app = Router::new().route("/oembed", get(|| async { Json(json!({"title": "Example"})) }));
    let client = client_for(&spawn_server(app).await);

    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = oneshot::channel();

    let counter = calls.clone();
    let handle = client
        .dispatch(
            EndpointKind::Embed { image_width: None },
            &[url("https://example.com/")],
            None,
            move |result| {
                counter.fetch_add(1, Ordering::SeqCst);
                let _ = tx.send(result);
            },
        )
        .unwrap();

    handle.await.unwrap();

    let payload = rx.await.unwrap().unwrap();
    assert_eq!(payload.len(), 1);
    assert_eq!(payload[0]["title"], json!("Example"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_dispatch_delivers_errors() {
    let app = Router::new().route(
        "/display/resize",
        get(|| async { (StatusCode::BAD_REQUEST, r#"{"error_message": "invalid width"}"#) }),
    );
    let client = client_for(&spawn_server(app).await);

    let (tx, rx) = oneshot::channel();
    let handle = client
        .dispatch(
            EndpointKind::DisplayResize { width: 5000 },
            &[url("https://example.com/a.png")],
            None,
            move |result| {
                let _ = tx.send(result);
            },
        )
        .unwrap();

    handle.await.unwrap();

    match rx.await.unwrap() {
        Err(EmbedlyError::ServiceError { message, .. }) => assert_eq!(message, "invalid width"),
        other => panic!("expected service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrent_dispatches_are_independent() {
    let app = Router::new().route("/extract", get(|| async { Json(json!([{"n": 1}])) }));
    let client = client_for(&spawn_server(app).await);

    let calls = Arc::new(AtomicUsize::new(0));
    let mut handles = Vec::new();

    for i in 0..5 {
        let counter = calls.clone();
        let handle = client
            .dispatch(
                EndpointKind::Extract { image_width: None },
                &[url(&format!("https://example.com/{}", i))],
                None,
                move |result| {
                    assert!(result.is_ok());
                    counter.fetch_add(1, Ordering::SeqCst);
                },
            )
            .unwrap();
        handles.push(handle);
    }

    for handle in futures::future::join_all(handles).await {
        handle.unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 5);
}
