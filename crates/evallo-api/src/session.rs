//! Credential sessions and token persistence.
//!
//! The [`ApiClient`](crate::ApiClient) asks its [`Session`] for a bearer
//! credential on every request, so a token stored after the client was
//! built is picked up by the next call.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};

/// A source of bearer credentials, consulted once per request.
pub trait Session: Send + Sync {
    /// Returns the current credential, or `None` when signed out.
    fn credential(&self) -> Option<String>;
}

/// Client-side storage the URL bootstrap writes the login token into.
pub trait CredentialStore: Send + Sync {
    /// Persists a freshly issued token, replacing any previous one.
    fn store_credential(&self, token: &str) -> ApiResult<()>;

    /// Returns the persisted token, if any.
    fn stored_credential(&self) -> Option<String>;
}

/// An in-memory session, mostly useful for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySession {
    token: RwLock<Option<String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session already holding a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    /// Replaces the token.
    pub fn set(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    /// Signs out.
    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Session for MemorySession {
    fn credential(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CredentialStore for MemorySession {
    fn store_credential(&self, token: &str) -> ApiResult<()> {
        self.set(token);
        Ok(())
    }

    fn stored_credential(&self) -> Option<String> {
        self.credential()
    }
}

/// A persisted login token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    /// The bearer token issued by the login flow.
    pub token: String,
    /// When the token was written.
    pub stored_at: DateTime<Utc>,
}

impl StoredToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            stored_at: Utc::now(),
        }
    }
}

/// File-backed token storage.
///
/// The token is kept as JSON in the user's data directory and cached in
/// memory; every write goes through a temporary file and a rename.
#[derive(Debug)]
pub struct TokenStore {
    path: PathBuf,
    token: RwLock<Option<StoredToken>>,
}

impl TokenStore {
    /// Creates a store at the given path without touching the disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            token: RwLock::new(None),
        }
    }

    /// Creates a store and loads any token already on disk.
    pub fn open(path: impl Into<PathBuf>) -> ApiResult<Self> {
        let store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    /// Loads the token from disk into memory.
    ///
    /// Returns `Ok(false)` when no token file exists.
    pub fn load(&self) -> ApiResult<bool> {
        if !self.path.exists() {
            debug!("no token file at {:?}", self.path);
            return Ok(false);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            ApiError::configuration(format!("failed to read token file: {}", e)).with_source(e)
        })?;
        let token: StoredToken = serde_json::from_str(&content).map_err(|e| {
            ApiError::configuration(format!("failed to parse token file: {}", e)).with_source(e)
        })?;

        debug!("loaded token from {:?}", self.path);
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
        Ok(true)
    }

    fn save(&self, token: &StoredToken) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ApiError::configuration(format!("failed to create token directory: {}", e))
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(token)
            .map_err(|e| ApiError::configuration(format!("failed to serialize token: {}", e)))?;
        let mut file = private_file(&temp_path).map_err(|e| {
            ApiError::configuration(format!("failed to create token file: {}", e))
        })?;
        file.write_all(content.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| ApiError::configuration(format!("failed to write token file: {}", e)))?;
        drop(file);
        fs::rename(&temp_path, &self.path).map_err(|e| {
            ApiError::configuration(format!("failed to rename token file: {}", e))
        })?;

        debug!("saved token to {:?}", self.path);
        Ok(())
    }

    /// Returns the current token, if any.
    pub fn get(&self) -> Option<StoredToken> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stores a new token on disk and in memory.
    pub fn set(&self, token: impl Into<String>) -> ApiResult<()> {
        let token = StoredToken::new(token);
        self.save(&token)?;
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
        Ok(())
    }

    /// Removes the token from memory and disk.
    pub fn clear(&self) -> ApiResult<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                ApiError::configuration(format!("failed to remove token file: {}", e))
            })?;
            info!("cleared token at {:?}", self.path);
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

/// Opens `path` for writing, readable by the owner only.
///
/// The mode is set at creation and reapplied in case the file already
/// existed with looser permissions.
fn private_file(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    Ok(file)
}

impl Session for TokenStore {
    fn credential(&self) -> Option<String> {
        self.get().map(|t| t.token)
    }
}

impl CredentialStore for TokenStore {
    fn store_credential(&self, token: &str) -> ApiResult<()> {
        self.set(token)
    }

    fn stored_credential(&self) -> Option<String> {
        self.credential()
    }
}
