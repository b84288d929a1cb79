//! Every backend call goes through [`ApiClient`]: bearer token in, uniform
//! error mapping out. There are no retries; failures reach the caller as-is.

use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::session::{SessionStore, TokenError};
use crate::storage::StorageError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
const LOGIN_PATH: &str = "/auth/login";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unauthorized - Please login")]
    Unauthorized,
    /// Non-2xx answer; `message` is what the server said
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("Failed to decode token: {0}")]
    InvalidToken(#[from] TokenError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// A successful response body
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Text(String),
    Json(serde_json::Value),
}

impl Body {
    pub fn into_json<T: DeserializeOwned>(self) -> ApiResult<T> {
        let value = match self {
            Body::Empty => serde_json::Value::Null,
            Body::Text(text) => serde_json::Value::String(text),
            Body::Json(value) => value,
        };
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Arc<SessionStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Send one request and classify the response body
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> ApiResult<Body> {
        let (builder, token) = self.prepare(method.clone(), path, query, body);
        tracing::debug!("{} {}", method, path);

        let response = builder.send().await?;
        let status = response.status();
        let content_type = content_type(response.headers());

        if !status.is_success() {
            return Err(self.failure(path, token.as_deref(), status, &content_type, response).await);
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Body::Empty);
        }
        if content_type.contains("text/plain") {
            return Ok(Body::Text(text));
        }
        match serde_json::from_str(&text) {
            Ok(value) => Ok(Body::Json(value)),
            Err(_) if !content_type.contains("json") => Ok(Body::Text(text)),
            Err(e) => Err(ApiError::Decode(e.to_string())),
        }
    }

    /// Fetch a binary attachment (spreadsheet exports)
    pub async fn download(&self, path: &str) -> ApiResult<Vec<u8>> {
        let (builder, token) = self.prepare(Method::GET, path, &[], None);
        tracing::debug!("GET {} (download)", path);

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let content_type = content_type(response.headers());
            return Err(self.failure(path, token.as_deref(), status, &content_type, response).await);
        }
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(Method::GET, path, &[], None).await?.into_json()
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ApiResult<T> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.send(Method::POST, path, &[], Some(body)).await?.into_json()
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ApiResult<T> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.send(Method::PUT, path, &[], Some(body)).await?.into_json()
    }

    pub async fn put_query<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        self.send(Method::PUT, path, query, None).await?.into_json()
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    fn prepare(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> (RequestBuilder, Option<String>) {
        let token = self.session.token();
        let mut builder = self.http.request(method, format!("{}{}", self.base_url, path));

        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(token) = &token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = body {
            // .json() also sets the content type
            builder = builder.json(&body);
        }
        (builder, token)
    }

    async fn failure(
        &self,
        path: &str,
        token: Option<&str>,
        status: StatusCode,
        content_type: &str,
        response: Response,
    ) -> ApiError {
        let is_login = path.starts_with(LOGIN_PATH);

        if status == StatusCode::UNAUTHORIZED && !is_login {
            if let Some(token) = token {
                if self.session.clear_if_current(token) {
                    tracing::warn!("Session rejected by server on {}, logged out", path);
                }
            }
            return ApiError::Unauthorized;
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message(status, content_type, &text, is_login);
        tracing::warn!("{} {} failed: {}", status.as_u16(), path, message);
        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Pick the message to show for a failed request: a JSON `message`/`error`
/// field, the plain-text body, or `Error: <status>`.
fn error_message(status: StatusCode, content_type: &str, text: &str, is_login: bool) -> String {
    let text = text.trim();

    if !content_type.contains("text/plain") {
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(text) {
            for field in ["message", "error"] {
                if let Some(serde_json::Value::String(message)) = map.get(field) {
                    if !message.is_empty() {
                        return message.clone();
                    }
                }
            }
            return format!("Error: {}", status.as_u16());
        }
    }

    if !text.is_empty() {
        return text.to_string();
    }
    if content_type.contains("text/plain") {
        return if is_login { "Invalid credentials" } else { "Request failed" }.to_string();
    }
    format!("Error: {}", status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_json_fields() {
        let status = StatusCode::BAD_REQUEST;
        assert_eq!(
            error_message(status, "application/json", r#"{"message":"Grade must be between 1 and 10"}"#, false),
            "Grade must be between 1 and 10"
        );
        assert_eq!(
            error_message(status, "application/json", r#"{"error":"Bad Request","status":400}"#, false),
            "Bad Request"
        );
        assert_eq!(
            error_message(status, "application/json", r#"{"status":400}"#, false),
            "Error: 400"
        );
    }

    #[test]
    fn test_error_message_plain_text_and_fallbacks() {
        let status = StatusCode::CONFLICT;
        assert_eq!(
            error_message(status, "text/plain;charset=UTF-8", "Registration code already used", false),
            "Registration code already used"
        );
        assert_eq!(error_message(status, "text/plain", "", true), "Invalid credentials");
        assert_eq!(error_message(status, "text/plain", "", false), "Request failed");
        assert_eq!(error_message(status, "", "", false), "Error: 409");
        assert_eq!(error_message(status, "text/html", "Conflict", false), "Conflict");
    }

    #[test]
    fn test_body_into_json() {
        let body = Body::Json(serde_json::json!({"id": 1, "name": "Fizică"}));
        let course: shared::Course = body.into_json().unwrap();
        assert_eq!(course.name, "Fizică");

        let empty: Option<shared::Course> = Body::Empty.into_json().unwrap();
        assert!(empty.is_none());

        let text: String = Body::Text("jwt".to_string()).into_json().unwrap();
        assert_eq!(text, "jwt");

        let err = Body::Text("oops".to_string()).into_json::<shared::Course>();
        assert!(matches!(err, Err(ApiError::Decode(_))));
    }
}
