//! Session store: the single authenticated principal, with a durable copy
//! so a restart does not force a new login.
//!
//! The durable copy is read once by [`SessionStore::initialize`] and written
//! through on every change. Token expiry is not tracked here; a rejected
//! token surfaces as an ordinary backend error on the next request.

pub mod storage;

use crate::error::{AppError, AppResult};
use crate::models::Principal;

pub use storage::{FileStorage, MemoryStorage, SessionStorage};

pub struct SessionStore<S: SessionStorage> {
    storage: S,
    principal: Option<Principal>,
    initialized: bool,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Create an uninitialized store; call [`initialize`](Self::initialize)
    /// before reading identity.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            principal: None,
            initialized: false,
        }
    }

    /// Rehydrate from the durable copy. Runs once; later calls are no-ops.
    ///
    /// A missing, unreadable or malformed copy leaves the session
    /// unauthenticated.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        let raw = match self.storage.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                tracing::error!("Could not read stored session: {}", e);
                return;
            }
        };

        match serde_json::from_str::<Principal>(&raw) {
            Ok(principal) => {
                tracing::debug!(username = %principal.username, "Session restored");
                self.principal = Some(principal);
            }
            Err(e) => {
                tracing::warn!("Ignoring malformed stored session: {}", e);
            }
        }
    }

    /// Replace the principal wholesale and persist it. On a storage failure
    /// the in-memory principal is left unchanged.
    pub fn set_principal(&mut self, principal: Principal) -> AppResult<()> {
        let raw = serde_json::to_string(&principal)
            .map_err(|e| AppError::Storage(format!("Failed to serialize session: {}", e)))?;
        self.storage.write(&raw)?;
        tracing::info!(username = %principal.username, user_type = %principal.user_type, "Session started");
        self.principal = Some(principal);
        Ok(())
    }

    /// Log out: forget the principal and delete the durable copy.
    /// Navigating away is the caller's job.
    pub fn clear(&mut self) -> AppResult<()> {
        self.storage.remove()?;
        if let Some(previous) = self.principal.take() {
            tracing::info!(username = %previous.username, "Session cleared");
        }
        Ok(())
    }

    pub fn current(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Current username, or [`AppError::Unauthenticated`]
    pub fn require_username(&self) -> AppResult<&str> {
        self.principal
            .as_ref()
            .map(|p| p.username.as_str())
            .ok_or(AppError::Unauthenticated)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
