//! Client for the school management backend: session handling, a typed
//! HTTP layer per resource, and the role-scoped data context the terminal
//! pages read from.

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod forms;
pub mod http;
pub mod menu;
pub mod session;
pub mod storage;

pub use context::SchoolContext;
pub use http::{ApiClient, ApiError, ApiResult};
pub use session::{Session, SessionStore};
