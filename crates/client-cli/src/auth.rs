//! Login and self-registration. Neither returns an error to the caller:
//! every failure ends up as a message in [`LoginOutcome::Failure`].

use serde::Serialize;

use crate::context::SchoolContext;
use crate::forms::SignUpForm;
use crate::http::{ApiClient, ApiResult};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoginOutcome {
    Success { session: Session },
    Failure { message: String },
}

impl LoginOutcome {
    fn failure(message: impl Into<String>) -> Self {
        LoginOutcome::Failure {
            message: message.into(),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            LoginOutcome::Success { session } => Some(session),
            LoginOutcome::Failure { .. } => None,
        }
    }
}

/// Exchange credentials for a token, persist the session, then run the
/// role-scoped load for it
pub async fn login(ctx: &SchoolContext, username: &str, password: &str) -> LoginOutcome {
    match authenticate(ctx.api(), username, password).await {
        Ok(session) => {
            tracing::info!(user = %session.username, role = %session.role, "Logged in");
            ctx.refresh().await;
            LoginOutcome::Success { session }
        }
        Err(e) => {
            tracing::debug!("Login failed for {}: {}", username, e);
            LoginOutcome::failure(e.to_string())
        }
    }
}

async fn authenticate(api: &ApiClient, username: &str, password: &str) -> ApiResult<Session> {
    let token = api.auth().login(username, password).await?;
    let session = Session::from_token(&token, username)?;
    api.session().persist(session.clone())?;
    Ok(session)
}

/// Claim an existing student/teacher/parent record with its registration
/// code, then log in with the new account
pub async fn register_with_code(ctx: &SchoolContext, form: &SignUpForm) -> LoginOutcome {
    let request = match form.validate() {
        Ok(request) => request,
        Err(e) => return LoginOutcome::failure(e.to_string()),
    };

    if let Err(e) = ctx.api().auth().register_with_code(&request).await {
        tracing::debug!("Registration failed for {}: {}", request.username, e);
        return LoginOutcome::failure(e.to_string());
    }
    tracing::info!(user = %request.username, "Registered with code");

    match login(ctx, &request.username, &request.password).await {
        success @ LoginOutcome::Success { .. } => success,
        LoginOutcome::Failure { .. } => {
            LoginOutcome::failure("Registration successful! Please log in.")
        }
    }
}
