//! In-process fake of the school backend. Every request is recorded; routes
//! answer with canned responses registered by the test.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use schoolbook::storage::{MemoryStorage, Storage, StorageError, TOKEN_KEY};
use schoolbook::{ApiClient, SchoolContext, SessionStore};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Logged {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone)]
pub struct Canned {
    status: StatusCode,
    content_type: Option<&'static str>,
    body: String,
    delay: Option<Duration>,
}

impl Canned {
    pub fn json(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: Some("application/json"),
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn text(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: Some("text/plain;charset=UTF-8"),
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            status: StatusCode::OK,
            content_type: None,
            body: String::new(),
            delay: None,
        }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Clone, Default)]
struct Fake {
    routes: Arc<Mutex<HashMap<(Method, String), Canned>>>,
    log: Arc<Mutex<Vec<Logged>>>,
}

async fn handle(
    State(fake): State<Fake>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    fake.log.lock().unwrap().push(Logged {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(String::from),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body: serde_json::from_slice(&body).ok(),
    });

    let canned = fake
        .routes
        .lock()
        .unwrap()
        .get(&(method, uri.path().to_string()))
        .cloned();
    let Some(canned) = canned else {
        return (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json".to_string())],
            json!({"message": "Not found"}).to_string(),
        )
            .into_response();
    };

    if let Some(delay) = canned.delay {
        tokio::time::sleep(delay).await;
    }
    match canned.content_type {
        Some(content_type) => (
            canned.status,
            [(header::CONTENT_TYPE, content_type.to_string())],
            canned.body,
        )
            .into_response(),
        None => (canned.status, canned.body).into_response(),
    }
}

pub struct Backend {
    pub url: String,
    fake: Fake,
}

impl Backend {
    pub async fn start() -> Self {
        let fake = Fake::default();
        let app = Router::new().fallback(handle).with_state(fake.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            url: format!("http://{}", addr),
            fake,
        }
    }

    pub fn route(&self, method: Method, path: &str, canned: Canned) -> &Self {
        self.fake
            .routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), canned);
        self
    }

    pub fn get(&self, path: &str, body: Value) -> &Self {
        self.route(Method::GET, path, Canned::json(body))
    }

    pub fn log(&self) -> Vec<Logged> {
        self.fake.log.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.log().into_iter().map(|l| l.path).collect()
    }

    pub fn clear_log(&self) {
        self.fake.log.lock().unwrap().clear();
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<Logged> {
        self.log()
            .into_iter()
            .filter(|l| l.method == method && l.path == path)
            .collect()
    }
}

/// Counts how many times the token entry was actually removed
#[derive(Default)]
pub struct CountingStorage {
    inner: MemoryStorage,
    pub token_removals: AtomicUsize,
}

impl Storage for CountingStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if key == TOKEN_KEY && self.inner.get(key).is_some() {
            self.token_removals.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.remove(key)
    }
}

pub fn mint(sub: &str, user_id: Option<i64>, role: Option<&str>, exp_in_secs: i64) -> String {
    let mut claims = json!({
        "sub": sub,
        "exp": chrono::Utc::now().timestamp() + exp_in_secs,
    });
    if let Some(id) = user_id {
        claims["userId"] = json!(id);
    }
    if let Some(role) = role {
        claims["role"] = json!(role);
    }
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-side-secret")).unwrap()
}

pub fn context(url: &str, storage: Arc<dyn Storage>) -> (Arc<SessionStore>, SchoolContext) {
    let sessions = Arc::new(SessionStore::new(storage));
    let ctx = SchoolContext::new(ApiClient::new(url, sessions.clone()));
    (sessions, ctx)
}

/// A context already logged in with a freshly minted token
pub fn logged_in(
    url: &str,
    username: &str,
    user_id: Option<i64>,
    role: &str,
) -> (Arc<SessionStore>, SchoolContext) {
    let (sessions, ctx) = context(url, Arc::new(MemoryStorage::new()));
    let token = mint(username, user_id, Some(role), 3600);
    let session = schoolbook::Session::from_token(&token, username).unwrap();
    sessions.persist(session).unwrap();
    (sessions, ctx)
}
