//! Process-wide session state
//!
//! Holds the current auth token and its derived flag behind an explicit lock,
//! and persists the token to a durable slot under the data directory so a
//! login survives process restarts. The store is injected (via `Arc`) into the
//! transport client and into every command that needs to know whether the
//! user is authenticated.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::RwLock;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::data_paths::DataPaths;

/// File name of the durable token slot inside the auth directory
const SESSION_FILE: &str = "session.json";

/// Current authentication state.
///
/// Invariant: `is_authenticated == token.is_some()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub is_authenticated: bool,
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

/// Shared store for the session, with a watch channel that fires whenever the
/// session is cleared (user logout or a 401 from the backend). Long-running
/// commands subscribe to it as their login boundary.
pub struct SessionStore {
    state: RwLock<Session>,
    slot: Option<PathBuf>,
    logout_tx: watch::Sender<u64>,
}

impl SessionStore {
    /// Create a store with no durable slot (tests, ephemeral use)
    pub fn in_memory() -> Self {
        let (logout_tx, _) = watch::channel(0);
        Self {
            state: RwLock::new(Session::default()),
            slot: None,
            logout_tx,
        }
    }

    /// Open the store backed by the durable slot under `auth/`, restoring a
    /// previously saved token if one exists
    pub fn open(data_paths: &DataPaths) -> Self {
        let slot = data_paths.auth().join(SESSION_FILE);
        let state = match std::fs::read_to_string(&slot) {
            Ok(raw) => match serde_json::from_str::<StoredSession>(&raw) {
                Ok(stored) => {
                    debug!("Restored session token from {}", slot.display());
                    Session {
                        token: Some(stored.token),
                        is_authenticated: true,
                    }
                }
                Err(e) => {
                    warn!("Ignoring malformed session file {}: {}", slot.display(), e);
                    Session::default()
                }
            },
            Err(_) => Session::default(),
        };

        let (logout_tx, _) = watch::channel(0);
        Self {
            state: RwLock::new(state),
            slot: Some(slot),
            logout_tx,
        }
    }

    /// Store a freshly issued token (successful login)
    pub fn login(&self, token: impl Into<String>) {
        let token = token.into();
        {
            let mut state = self.state.write().expect("session lock poisoned");
            state.token = Some(token.clone());
            state.is_authenticated = true;
        }
        self.persist(&token);
        info!("Session established");
    }

    /// User-initiated logout
    pub fn logout(&self) {
        self.clear();
        info!("Logged out");
    }

    /// Forced clear after the backend rejected the token (401)
    pub fn expire(&self) {
        self.clear();
        warn!("Session expired, redirecting to login");
    }

    /// Snapshot of the current session
    pub fn current(&self) -> Session {
        self.state.read().expect("session lock poisoned").clone()
    }

    /// The current token, if any
    pub fn token(&self) -> Option<String> {
        self.state
            .read()
            .expect("session lock poisoned")
            .token
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .expect("session lock poisoned")
            .is_authenticated
    }

    /// Subscribe to session-cleared events. The value bumps once per clear;
    /// `changed().await` resolves on the next logout or expiry.
    pub fn watch_logout(&self) -> watch::Receiver<u64> {
        self.logout_tx.subscribe()
    }

    fn clear(&self) {
        {
            let mut state = self.state.write().expect("session lock poisoned");
            state.token = None;
            state.is_authenticated = false;
        }
        if let Some(slot) = &self.slot {
            if slot.exists() {
                if let Err(e) = std::fs::remove_file(slot) {
                    warn!("Failed to remove session file {}: {}", slot.display(), e);
                }
            }
        }
        self.logout_tx.send_modify(|n| *n += 1);
    }

    fn persist(&self, token: &str) {
        let Some(slot) = &self.slot else { return };
        let stored = StoredSession {
            token: token.to_string(),
        };
        let write = serde_json::to_string(&stored)
            .map_err(anyhow::Error::from)
            .and_then(|json| std::fs::write(slot, json).map_err(anyhow::Error::from));
        if let Err(e) = write {
            warn!("Failed to persist session to {}: {}", slot.display(), e);
        }
    }
}
