use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::AuthResponse;
use crate::error::{ClientError, Result};
use crate::models::{AccountKind, Profile};

/// Storage key of the session record
pub const SESSION_KEY: &str = "userInfo";

/// Token plus the account it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(flatten)]
    pub profile: Profile,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.profile.id
    }

    pub fn kind(&self) -> AccountKind {
        self.profile.kind()
    }

    pub fn is_company(&self) -> bool {
        self.kind() == AccountKind::Company
    }
}

impl From<AuthResponse> for Session {
    fn from(res: AuthResponse) -> Self {
        Self {
            token: res.token,
            profile: res.user,
        }
    }
}

/// Current session, shared by reference with every controller that needs it.
///
/// Writes go through [`SessionStore::login`], which also persists the record
/// to a small JSON key/value file. Readers either call [`SessionStore::current`]
/// or [`SessionStore::subscribe`] to be told about changes.
#[derive(Debug)]
pub struct SessionStore {
    path: Option<PathBuf>,
    tx: watch::Sender<Option<Session>>,
}

impl SessionStore {
    /// Open the store backed by `path`, restoring any saved session.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let restored = match read_record(&path) {
            Ok(session) => session,
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {}", path.display(), e);
                None
            }
        };
        if let Some(session) = &restored {
            info!("Restored session for {}", session.profile.display_name());
        }

        let (tx, _) = watch::channel(restored);
        Self { path: Some(path), tx }
    }

    /// Store that never touches disk
    pub fn in_memory() -> Self {
        let (tx, _) = watch::channel(None);
        Self { path: None, tx }
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.tx.borrow().as_ref().map(|s| s.token.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }

    /// Install `session` and persist it. Used after login, registration and
    /// profile updates.
    pub fn login(&self, session: Session) -> Result<()> {
        if let Some(path) = &self.path {
            write_record(path, Some(&session))?;
        }
        debug!("Session set for account {}", session.id());
        self.tx.send_replace(Some(session));
        Ok(())
    }

    /// Drop the in-memory session. The persisted record stays until
    /// [`SessionStore::forget`] is called.
    pub fn logout(&self) {
        self.tx.send_replace(None);
    }

    /// Remove the persisted record
    pub fn forget(&self) -> Result<()> {
        if let Some(path) = &self.path {
            write_record(path, None)?;
        }
        Ok(())
    }

    /// The current session, or `Unauthorized` with `action` in the message
    pub fn require(&self, action: &str) -> Result<Session> {
        self.current()
            .ok_or_else(|| ClientError::Unauthorized(format!("log in to {}", action)))
    }
}

fn read_map(path: &Path) -> Result<Map<String, Value>> {
    if !path.exists() {
        return Ok(Map::new());
    }
    let text = std::fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Ok(Map::new());
    }
    serde_json::from_str(&text).map_err(|e| ClientError::Storage(e.to_string()))
}

fn read_record(path: &Path) -> Result<Option<Session>> {
    let mut map = read_map(path)?;
    match map.remove(SESSION_KEY) {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ClientError::Storage(e.to_string())),
        None => Ok(None),
    }
}

fn write_record(path: &Path, session: Option<&Session>) -> Result<()> {
    // Keep whatever else lives in the file
    let mut map = read_map(path).unwrap_or_default();
    match session {
        Some(session) => {
            let value = serde_json::to_value(session).map_err(|e| ClientError::Storage(e.to_string()))?;
            map.insert(SESSION_KEY.to_string(), value);
        }
        None => {
            map.remove(SESSION_KEY);
        }
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&map).map_err(|e| ClientError::Storage(e.to_string()))?;
    std::fs::write(path, json)?;
    Ok(())
}
