use reqwest::Method;
use shared::{LoginRequest, RegisterRequest, RegisterWithCodeRequest};

use crate::http::{ApiClient, ApiError, ApiResult, Body};

#[derive(Clone, Copy)]
pub struct AuthApi<'a>(pub(crate) &'a ApiClient);

impl AuthApi<'_> {
    /// Returns the raw bearer token; the endpoint answers in plain text
    pub async fn login(self, username: &str, password: &str) -> ApiResult<String> {
        let body = serde_json::to_value(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
        .map_err(|e| ApiError::Decode(e.to_string()))?;

        match self.0.send(Method::POST, "/auth/login", &[], Some(body)).await? {
            Body::Text(token) => Ok(token.trim().to_string()),
            Body::Json(serde_json::Value::String(token)) => Ok(token),
            Body::Json(serde_json::Value::Object(map)) => map
                .get("token")
                .and_then(|t| t.as_str())
                .map(String::from)
                .ok_or_else(|| ApiError::Decode("login response has no token".to_string())),
            other => Err(ApiError::Decode(format!("unexpected login response: {:?}", other))),
        }
    }

    pub async fn register(self, request: &RegisterRequest) -> ApiResult<serde_json::Value> {
        self.0.post("/users/register", request).await
    }

    pub async fn register_with_code(self, request: &RegisterWithCodeRequest) -> ApiResult<serde_json::Value> {
        self.0.post("/users/register-code", request).await
    }
}
