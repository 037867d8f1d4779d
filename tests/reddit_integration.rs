//! Integration tests for the Reddit engagement source
//!
//! Runs `RedditSource` against a local axum server speaking the same JSON.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use upvibe::core::{EngagementSource, RedditSource};
use upvibe::types::{Credentials, MonitorError, SeenComments};

#[derive(Default)]
struct Hits {
    tokens: AtomicUsize,
    threads: AtomicUsize,
}

async fn token(State(hits): State<Arc<Hits>>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    hits.tokens.fetch_add(1, Ordering::SeqCst);
    // base64("id:secret")
    let authorized = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "Basic aWQ6c2VjcmV0")
        .unwrap_or(false);

    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": 401 })));
    }
    (StatusCode::OK, Json(json!({ "access_token": "test-token", "token_type": "bearer", "expires_in": 3600 })))
}

async fn thread(
    State(hits): State<Arc<Hits>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    hits.threads.fetch_add(1, Ordering::SeqCst);
    let bearer = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if bearer != Some("Bearer test-token") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": 401 })));
    }
    if id != "gxvdih" {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": 404 })));
    }

    let reply = json!({ "kind": "t1", "data": {
        "id": "c3", "author": "carol", "body": "a KNOT reply", "replies": ""
    }});
    (StatusCode::OK, Json(json!([
        { "kind": "Listing", "data": { "children": [
            { "kind": "t3", "data": { "title": "Rate my setup", "score": 42 } }
        ]}},
        { "kind": "Listing", "data": { "children": [
            { "kind": "t1", "data": {
                "id": "c1", "author": "alice", "body": "first!",
                "replies": { "kind": "Listing", "data": { "children": [reply] } }
            }},
            { "kind": "t1", "data": { "id": "c2", "author": null, "body": "[removed]", "replies": "" } },
            { "kind": "more", "data": { "count": 3, "children": ["c9"] } }
        ]}}
    ])))
}

async fn spawn_server() -> (String, Arc<Hits>) {
    let hits = Arc::new(Hits::default());
    let app = Router::new()
        .route("/api/v1/access_token", post(token))
        .route("/comments/:id", get(thread))
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), hits)
}

fn credentials(secret: &str) -> Credentials {
    Credentials {
        client_id: "id".into(),
        client_secret: secret.into(),
        user_agent: "upvibe-tests/1.0".into(),
        server_url: "ws://localhost:12345".into(),
    }
}

async fn source(secret: &str) -> (RedditSource, Arc<Hits>) {
    let (base, hits) = spawn_server().await;
    let source = RedditSource::with_endpoints(credentials(secret), &base, &base).unwrap();
    (source, hits)
}

#[tokio::test]
async fn test_fetch_flattens_comment_tree() {
    let (source, _) = source("secret").await;

    let comments = source.fetch_new_comments("gxvdih", &SeenComments::new()).await.unwrap();
    let ids: Vec<&str> = comments.iter().map(|c| c.id.as_str()).collect();

    assert_eq!(ids, vec!["c1", "c2", "c3"]);
    assert_eq!(comments[1].author, None);
    assert_eq!(comments[2].body, "a KNOT reply");
}

#[tokio::test]
async fn test_seen_comments_excluded() {
    let (source, _) = source("secret").await;
    let mut seen = SeenComments::new();
    seen.insert("c1");
    seen.insert("c3");

    let comments = source.fetch_new_comments("gxvdih", &seen).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].id, "c2");
}

#[tokio::test]
async fn test_score_comes_from_latest_fetch() {
    let (source, hits) = source("secret").await;

    source.fetch_new_comments("gxvdih", &SeenComments::new()).await.unwrap();
    assert_eq!(source.fetch_score("gxvdih").await.unwrap(), 42);
    assert_eq!(hits.threads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_score_fetched_when_nothing_cached() {
    let (source, hits) = source("secret").await;

    assert_eq!(source.fetch_score("gxvdih").await.unwrap(), 42);
    assert_eq!(source.thread_title("gxvdih").await.unwrap(), "Rate my setup");
    assert_eq!(hits.threads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_token_reused_between_requests() {
    let (source, hits) = source("secret").await;

    for _ in 0..3 {
        source.fetch_new_comments("gxvdih", &SeenComments::new()).await.unwrap();
    }
    assert_eq!(hits.tokens.load(Ordering::SeqCst), 1);
    assert_eq!(hits.threads.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_unknown_thread_is_transient_error() {
    let (source, _) = source("secret").await;

    let err = source.fetch_new_comments("nope", &SeenComments::new()).await.unwrap_err();
    assert!(matches!(err, MonitorError::SourceFetch(_)));
    assert!(!err.is_fatal());
}

#[tokio::test]
async fn test_rejected_credentials_are_transient() {
    let (source, hits) = source("wrong").await;

    let err = source.fetch_new_comments("gxvdih", &SeenComments::new()).await.unwrap_err();
    assert!(matches!(err, MonitorError::SourceFetch(_)));
    assert_eq!(hits.threads.load(Ordering::SeqCst), 0);
}
