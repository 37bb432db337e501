//! Session tracking
//!
//! Holds the current auth state for the lifetime of the process and tells
//! subscribers whenever it changes. The tracked value always equals the most
//! recently set session; there is no merging and no history.
//!
//! The authenticated session is also persisted to disk so a restart picks up
//! where the user left off, mirroring what the hosted SDK does with browser
//! storage.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use crate::models::{AuthenticatedSession, Session};

type Listener = Box<dyn Fn(&Session) + Send + Sync>;

/// Handle returned by [`SessionTracker::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Tracks the current session and notifies subscribers on change
pub struct SessionTracker {
    current: RwLock<Session>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_id: AtomicU64,
    store_path: Option<PathBuf>,
}

impl SessionTracker {
    /// Create a tracker starting in the signed-out state.
    ///
    /// When `store_path` is set, authenticated sessions are persisted there
    /// as JSON and the file is removed on sign-out.
    pub fn new(store_path: Option<PathBuf>) -> Self {
        Self {
            current: RwLock::new(Session::Anonymous),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            store_path,
        }
    }

    /// The currently tracked session
    pub fn current(&self) -> Session {
        self.current
            .read()
            .map(|s| s.clone())
            .unwrap_or(Session::Anonymous)
    }

    /// Replace the tracked session and notify subscribers.
    ///
    /// Last write wins; subscribers run synchronously on the caller's
    /// execution context.
    pub fn set(&self, session: Session) {
        if let Ok(mut current) = self.current.write() {
            *current = session.clone();
        }

        if let Some(path) = &self.store_path {
            persist(path, &session);
        }

        if let Ok(listeners) = self.listeners.lock() {
            for (_, listener) in listeners.iter() {
                listener(&session);
            }
        }
    }

    /// Register a change listener; fires on every subsequent `set`
    pub fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push((id, listener));
        }
        SubscriptionId(id)
    }

    /// Remove a previously registered listener
    pub fn unsubscribe(&self, id: SubscriptionId) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.retain(|(listener_id, _)| *listener_id != id.0);
        }
    }
}

/// Write or remove the persisted session to match `session`
fn persist(path: &Path, session: &Session) {
    match session {
        Session::Authenticated(auth) => {
            if let Some(parent) = path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    tracing::warn!("Failed to create session store directory: {}", e);
                    return;
                }
            }
            match serde_json::to_string_pretty(auth) {
                Ok(json) => {
                    if let Err(e) = std::fs::write(path, json) {
                        tracing::warn!("Failed to persist session: {}", e);
                    }
                }
                Err(e) => tracing::warn!("Failed to serialize session: {}", e),
            }
        }
        Session::Anonymous => {
            if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to clear persisted session: {}", e);
                }
            }
        }
    }
}

/// Read a previously persisted session, if any.
///
/// Missing or unreadable files just mean nobody is signed in.
pub fn load_persisted(path: &Path) -> Option<AuthenticatedSession> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!("Discarding unreadable persisted session: {}", e);
            None
        }
    }
}

/// Get the default session store path
pub fn default_store_path() -> PathBuf {
    let data_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("petbook").join("session.json")
}
