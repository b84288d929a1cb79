//! The data-orchestration context: loads what the current role may see and
//! funnels every write through the resource APIs so the cache stays in step
//! with the backend.

mod loader;
mod mutations;
mod policy;
mod state;
mod stats;

pub use mutations::Outcome;
pub use policy::{Resource, SyncPolicy};
pub use state::{Degraded, Profile, SchoolState};
pub use stats::{DashboardStats, RecentGrade};

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, RwLockReadGuard};

use crate::http::ApiClient;

pub struct SchoolContext {
    api: ApiClient,
    state: RwLock<SchoolState>,
    /// Bumped by every load and by logout; a load whose number is no longer
    /// current drops its results
    generation: AtomicU64,
    /// Bumped by logout only; writes started before it leave the cache alone
    epoch: AtomicU64,
}

/// The session a write was issued under
pub(crate) struct Ticket {
    epoch: u64,
    token: Option<String>,
}

impl SchoolContext {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RwLock::new(SchoolState::default()),
            generation: AtomicU64::new(0),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn state(&self) -> RwLockReadGuard<'_, SchoolState> {
        self.state.read().await
    }

    pub async fn snapshot(&self) -> SchoolState {
        self.state.read().await.clone()
    }

    /// Run the role-scoped load for the current session. Returns false when
    /// there is no session or the result was superseded while in flight.
    pub async fn refresh(&self) -> bool {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(session) = self.api.session().current() else {
            let mut state = self.state.write().await;
            if self.generation.load(Ordering::SeqCst) == generation {
                *state = SchoolState::default();
            }
            return false;
        };

        let loaded = loader::load(&self.api, &session).await;

        let mut state = self.state.write().await;
        let still_current = self.generation.load(Ordering::SeqCst) == generation
            && self.api.session().current().map(|s| s.token) == Some(session.token);
        if !still_current {
            tracing::debug!("Discarding superseded load (generation {})", generation);
            // A 401 during the load ended the session
            if self.api.session().current().is_none() {
                *state = SchoolState::default();
            }
            return false;
        }
        *state = loaded;
        true
    }

    pub(crate) fn ticket(&self) -> Ticket {
        Ticket {
            epoch: self.epoch.load(Ordering::SeqCst),
            token: self.api.session().token(),
        }
    }

    /// True while the session that issued `ticket` is still the live one
    pub(crate) fn is_live(&self, ticket: &Ticket) -> bool {
        ticket.token.is_some()
            && self.epoch.load(Ordering::SeqCst) == ticket.epoch
            && self.api.session().token() == ticket.token
    }

    /// Forget the session and everything loaded under it
    pub async fn logout(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.api.session().clear();
        *self.state.write().await = SchoolState::default();
        tracing::info!("Logged out");
    }
}
