#![allow(dead_code)]

//! In-process stand-in for `json-server --watch db.json` serving `/blogs`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Default)]
pub struct MockState {
    pub posts: Vec<Value>,
    /// Bodies received by POST and PUT, in arrival order.
    pub received: Vec<Value>,
    /// When set, the next request answers with this status instead.
    pub fail_next: Option<StatusCode>,
    /// When false, list responses omit `x-total-count`.
    pub send_total: bool,
}

pub type Shared = Arc<Mutex<MockState>>;

pub struct MockBlogs {
    pub base_url: String,
    pub state: Shared,
}

impl MockBlogs {
    pub fn fail_next(&self, status: StatusCode) {
        self.state.lock().unwrap().fail_next = Some(status);
    }

    pub fn received(&self) -> Vec<Value> {
        self.state.lock().unwrap().received.clone()
    }

    pub fn post_count(&self) -> usize {
        self.state.lock().unwrap().posts.len()
    }

    pub fn config(&self) -> blog_proto::Config {
        let mut config = blog_proto::Config::default();
        config.api.base_url = self.base_url.clone();
        config
    }
}

/// `n` posts, ids 1..=n, dated one day apart starting 2024-01-01.
pub fn seed_posts(n: usize) -> Vec<Value> {
    (1..=n)
        .map(|i| {
            json!({
                "id": i,
                "title": format!("Post number {i}"),
                "author": if i % 2 == 0 { "Ada Lovelace" } else { "Grace Hopper" },
                "date": format!("2024-01-{:02}T09:00:00.000Z", (i - 1) % 28 + 1),
                "profile": "images/default.jpeg",
                "content": if i % 5 == 0 {
                    format!("Learning react the hard way, part {i}")
                } else {
                    format!("Plain body text for post {i}")
                },
            })
        })
        .collect()
}

pub async fn start(posts: Vec<Value>) -> MockBlogs {
    let state: Shared = Arc::new(Mutex::new(MockState {
        posts,
        send_total: true,
        ..Default::default()
    }));

    let app = Router::new()
        .route("/blogs", get(list).post(create))
        .route("/blogs/:id", get(fetch).put(replace).delete(remove))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("mock server addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBlogs {
        base_url: format!("http://{addr}"),
        state,
    }
}

fn take_failure(state: &Shared) -> Option<Response> {
    let status = state.lock().unwrap().fail_next.take()?;
    Some((status, Json(json!({}))).into_response())
}

fn id_matches(post: &Value, id: &str) -> bool {
    match &post["id"] {
        Value::Number(n) => n.to_string() == id,
        Value::String(s) => s == id,
        _ => false,
    }
}

fn matches_text(post: &Value, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    post.as_object()
        .map(|obj| {
            obj.values()
                .filter_map(Value::as_str)
                .any(|v| v.to_lowercase().contains(&needle))
        })
        .unwrap_or(false)
}

async fn list(State(state): State<Shared>, Query(params): Query<HashMap<String, String>>) -> Response {
    if let Some(r) = take_failure(&state) {
        return r;
    }
    let guard = state.lock().unwrap();
    let mut rows: Vec<Value> = guard
        .posts
        .iter()
        .filter(|p| params.get("q").map_or(true, |q| matches_text(p, q)))
        .cloned()
        .collect();

    if let Some(field) = params.get("_sort") {
        rows.sort_by(|a, b| {
            let a = a[field.as_str()].as_str().unwrap_or_default();
            let b = b[field.as_str()].as_str().unwrap_or_default();
            a.cmp(b)
        });
        if params.get("_order").map(String::as_str) == Some("desc") {
            rows.reverse();
        }
    }

    let total = rows.len();
    let page: usize = params.get("_page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: usize = params
        .get("_limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(total.max(1));
    let start = (page.saturating_sub(1)) * limit;
    let slice: Vec<Value> = rows.into_iter().skip(start).take(limit).collect();

    let mut headers = HeaderMap::new();
    if guard.send_total {
        headers.insert("x-total-count", HeaderValue::from(total));
    }
    (headers, Json(Value::Array(slice))).into_response()
}

async fn fetch(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    if let Some(r) = take_failure(&state) {
        return r;
    }
    let guard = state.lock().unwrap();
    match guard.posts.iter().find(|p| id_matches(p, &id)) {
        Some(post) => Json(post.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn create(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    if let Some(r) = take_failure(&state) {
        return r;
    }
    let mut guard = state.lock().unwrap();
    guard.received.push(body.clone());
    let next_id = guard
        .posts
        .iter()
        .filter_map(|p| p["id"].as_u64())
        .max()
        .unwrap_or(0)
        + 1;
    let mut created = body;
    created["id"] = json!(next_id);
    guard.posts.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn replace(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(r) = take_failure(&state) {
        return r;
    }
    let mut guard = state.lock().unwrap();
    guard.received.push(body.clone());
    let Some(slot) = guard.posts.iter_mut().find(|p| id_matches(p, &id)) else {
        return (StatusCode::NOT_FOUND, Json(json!({}))).into_response();
    };
    let original_id = slot["id"].clone();
    let mut updated = body;
    updated["id"] = original_id;
    *slot = updated.clone();
    Json(updated).into_response()
}

async fn remove(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    if let Some(r) = take_failure(&state) {
        return r;
    }
    let mut guard = state.lock().unwrap();
    let before = guard.posts.len();
    guard.posts.retain(|p| !id_matches(p, &id));
    if guard.posts.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({}))).into_response();
    }
    Json(json!({})).into_response()
}
