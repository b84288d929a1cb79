//! Session store: the bearer token plus the identity decoded from it.
//!
//! The token's signature is never checked here. The backend that issued it
//! is the one that verifies it on every request; the client only reads the
//! role, subject and expiry out of the payload.

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use shared::Role;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::storage::{Storage, StorageError, LEGACY_USER_KEY, TOKEN_KEY, USER_KEY};

/// Claims the backend puts in its tokens
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl Claims {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.exp {
            Some(exp) => exp <= now.timestamp(),
            None => true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Role(#[from] shared::UnknownRole),
}

/// Read the payload of a JWT without verifying it
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<Claims>(token.trim(), &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

/// The persisted `user` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub user_id: Option<i64>,
    pub username: String,
    pub role: Role,
}

/// The legacy `schoolUser` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LegacyUser {
    name: String,
    role: Role,
    username: String,
    avatar: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(skip)]
    pub token: String,
    pub user_id: Option<i64>,
    pub username: String,
    pub role: Role,
    pub display_name: String,
    pub avatar: String,
}

impl Session {
    fn new(token: String, user: StoredUser) -> Self {
        Self {
            display_name: user.role.display_name(&user.username),
            avatar: user.role.avatar().to_string(),
            token,
            user_id: user.user_id,
            username: user.username,
            role: user.role,
        }
    }

    /// Build a session from a freshly issued token. A token without a role
    /// claim is treated as an administrator's.
    pub fn from_token(token: &str, username: &str) -> Result<Self, TokenError> {
        let claims = decode_claims(token)?;
        let role = match claims.role.as_deref() {
            Some(role) => role.parse::<Role>()?,
            None => Role::Admin,
        };
        let user = StoredUser {
            user_id: claims.user_id,
            username: claims.sub.unwrap_or_else(|| username.to_string()),
            role,
        };
        Ok(Self::new(token.trim().to_string(), user))
    }

    pub fn stored_user(&self) -> StoredUser {
        StoredUser {
            user_id: self.user_id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// Owns the persisted session. Handed to the HTTP layer and the data
/// context instead of each of them reading storage on its own.
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    current: Mutex<Option<Session>>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            current: Mutex::new(None),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY)
    }

    fn slot(&self) -> MutexGuard<'_, Option<Session>> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn current(&self) -> Option<Session> {
        self.slot().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// Startup: bring back a persisted session unless its token has expired
    /// or the stored entries cannot be read. Either failure silently clears
    /// storage.
    pub fn restore(&self, now: DateTime<Utc>) -> Option<Session> {
        let (Some(token), Some(user)) = (self.storage.get(TOKEN_KEY), self.storage.get(USER_KEY)) else {
            return None;
        };

        let user: StoredUser = match serde_json::from_str(&user) {
            Ok(user) => user,
            Err(e) => {
                tracing::debug!("Stored user entry is unreadable: {}", e);
                self.clear();
                return None;
            }
        };

        match decode_claims(&token) {
            Ok(claims) if !claims.is_expired(now) => {
                let session = Session::new(token, user);
                *self.slot() = Some(session.clone());
                tracing::debug!("Restored session for {}", session.username);
                Some(session)
            }
            Ok(_) => {
                tracing::info!("Stored session has expired, logging out");
                self.clear();
                None
            }
            Err(e) => {
                tracing::debug!("Stored token is unreadable: {}", e);
                self.clear();
                None
            }
        }
    }

    pub fn persist(&self, session: Session) -> Result<(), StorageError> {
        let user = serde_json::to_string(&session.stored_user())?;
        let legacy = serde_json::to_string(&LegacyUser {
            name: session.display_name.clone(),
            role: session.role,
            username: session.username.clone(),
            avatar: session.avatar.clone(),
        })?;

        self.storage.set(TOKEN_KEY, &session.token)?;
        self.storage.set(USER_KEY, &user)?;
        self.storage.set(LEGACY_USER_KEY, &legacy)?;

        *self.slot() = Some(session);
        Ok(())
    }

    pub fn clear(&self) {
        let mut current = self.slot();
        self.clear_locked(&mut current);
    }

    /// Drop the session if `token` is still the stored one. Returns whether
    /// anything was cleared, so a burst of rejected requests clears once.
    pub fn clear_if_current(&self, token: &str) -> bool {
        let mut current = self.slot();
        if self.storage.get(TOKEN_KEY).as_deref() != Some(token) {
            return false;
        }
        self.clear_locked(&mut current);
        true
    }

    fn clear_locked(&self, current: &mut Option<Session>) {
        *current = None;
        for key in [TOKEN_KEY, USER_KEY, LEGACY_USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!("Failed to remove {} from storage: {}", key, e);
            }
        }
    }
}
