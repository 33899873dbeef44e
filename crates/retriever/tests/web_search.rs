use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use canonical::{tokenize, CanonicalizeConfig, Token};
use retriever::{CandidateRetriever, RetrievalError, RetryConfig, WebSearchConfig, WebSearchRetriever};
use serde_json::json;

#[derive(Clone, Default)]
struct FakeSearch {
    base: Arc<Mutex<String>>,
    seen: Arc<Mutex<Vec<HashMap<String, String>>>>,
    search_calls: Arc<Mutex<u32>>,
}

async fn search(
    State(state): State<FakeSearch>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    *state.search_calls.lock().unwrap() += 1;
    if params.get("q").map(String::as_str) == Some("flaky") {
        return (StatusCode::SERVICE_UNAVAILABLE, "try later").into_response();
    }
    if params.get("q").map(String::as_str) == Some("secret query")
        && headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("s3cret")
    {
        return (StatusCode::UNAUTHORIZED, "missing key").into_response();
    }
    state.seen.lock().unwrap().push(params);
    let base = state.base.lock().unwrap().clone();
    Json(json!({
        "results": [
            {"url": format!("{base}/page/one"), "snippet": "snippet one"},
            {"url": "https://www.youtube.com/watch?v=abc", "snippet": "video"},
            {"url": format!("{base}/missing"), "snippet": "snippet for missing page"},
        ]
    }))
    .into_response()
}

async fn page_one() -> Html<&'static str> {
    Html("<html><body><p>The fetched page paragraph text.</p></body></html>")
}

async fn spawn_fake() -> (SocketAddr, FakeSearch) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = FakeSearch::default();
    *state.base.lock().unwrap() = format!("http://{addr}");
    let app = Router::new()
        .route("/search", get(search))
        .route("/page/one", get(page_one))
        .with_state(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

fn config(addr: SocketAddr) -> WebSearchConfig {
    WebSearchConfig {
        search_url: Some(format!("http://{addr}/search")),
        retry: RetryConfig::default()
            .with_max_retries(1)
            .with_base_delay(Duration::from_millis(1))
            .with_jitter(false),
        ..Default::default()
    }
}

fn query(text: &str) -> Vec<Token> {
    tokenize(text, &CanonicalizeConfig::default())
}

#[tokio::test]
async fn fetches_pages_filters_hosts_and_falls_back_to_snippets() {
    let (addr, state) = spawn_fake().await;
    let retriever = WebSearchRetriever::new(config(addr)).unwrap();

    let found = retriever.retrieve(&query("The Fetched page"), 5).await.unwrap();

    assert_eq!(found.len(), 2);
    assert!(found[0].source.ends_with("/page/one"));
    assert!(found[0].text.contains("fetched page paragraph text"));
    assert_eq!(found[0].rank, 0);
    assert!(found[1].source.ends_with("/missing"));
    assert_eq!(found[1].text, "snippet for missing page");
    assert_eq!(found[1].rank, 1);
    assert!(found.iter().all(|c| !c.source.contains("youtube")));

    let seen = state.seen.lock().unwrap();
    assert_eq!(seen[0].get("q").map(String::as_str), Some("the fetched page"));
    assert_eq!(seen[0].get("num").map(String::as_str), Some("5"));
}

#[tokio::test]
async fn snippets_only_when_page_fetch_disabled() {
    let (addr, _) = spawn_fake().await;
    let retriever = WebSearchRetriever::new(WebSearchConfig {
        fetch_pages: false,
        ..config(addr)
    })
    .unwrap();

    let found = retriever.retrieve(&query("anything"), 1).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].text, "snippet one");
}

#[tokio::test]
async fn api_key_header_is_sent() {
    let (addr, _) = spawn_fake().await;

    let without_key = WebSearchRetriever::new(config(addr)).unwrap();
    let err = without_key
        .retrieve(&query("secret query"), 3)
        .await
        .unwrap_err();
    assert!(matches!(err, RetrievalError::Unavailable(_)));

    let with_key = WebSearchRetriever::new(WebSearchConfig {
        api_key: Some("s3cret".into()),
        ..config(addr)
    })
    .unwrap();
    assert!(!with_key.retrieve(&query("secret query"), 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn server_errors_are_retried_then_reported_unavailable() {
    let (addr, state) = spawn_fake().await;
    let retriever = WebSearchRetriever::new(config(addr)).unwrap();

    let err = retriever.retrieve(&query("flaky"), 3).await.unwrap_err();
    assert!(matches!(err, RetrievalError::Unavailable(_)));
    assert_eq!(*state.search_calls.lock().unwrap(), 2);
}

#[tokio::test]
async fn unreachable_endpoint_is_unavailable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let retriever = WebSearchRetriever::new(config(addr)).unwrap();
    let err = retriever.retrieve(&query("hello"), 3).await.unwrap_err();
    assert!(matches!(err, RetrievalError::Unavailable(_)));
}

#[tokio::test]
async fn empty_query_skips_the_network() {
    let (addr, state) = spawn_fake().await;
    let retriever = WebSearchRetriever::new(config(addr)).unwrap();
    assert!(retriever.retrieve(&[], 5).await.unwrap().is_empty());
    assert_eq!(*state.search_calls.lock().unwrap(), 0);
}
