//! Session Store
//!
//! Holds the current authenticated identity. Reads are synchronous and
//! served from memory; durable storage is consulted once, on cold start.
//!
//! Persisted state that cannot be read back as a valid [`Session`] is purged
//! and reported as "no session". It never yields a role.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use platform::http::IdTokenSource;
use platform::storage::{DurableStore, StorageError};

use crate::application::config::AuthConfig;
use crate::domain::entity::session::Session;

enum Cache {
    /// Durable storage not read yet
    Cold,
    Warm(Option<Session>),
}

/// Session store service
pub struct SessionStore<S>
where
    S: DurableStore,
{
    storage: S,
    key: String,
    expiry_skew: Duration,
    cache: RwLock<Cache>,
}

impl<S> SessionStore<S>
where
    S: DurableStore,
{
    pub fn new(storage: S, config: &AuthConfig) -> Self {
        Self {
            storage,
            key: config.session_key(),
            expiry_skew: config.expiry_skew_chrono(),
            cache: RwLock::new(Cache::Cold),
        }
    }

    /// Current session, if any
    pub fn get_session(&self) -> Option<Session> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Cache::Warm(session) = &*cache {
                return session.clone();
            }
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        match &*cache {
            Cache::Warm(session) => session.clone(),
            Cache::Cold => match self.load_persisted() {
                Ok(session) => {
                    *cache = Cache::Warm(session.clone());
                    session
                }
                // Stay cold so the next read retries the storage.
                Err(e) => {
                    tracing::warn!(error = %e, "Persisted session unreadable, treating as signed out");
                    None
                }
            },
        }
    }

    /// Replace the current session and persist it
    ///
    /// The in-memory session is replaced even if persisting fails.
    pub fn set_session(&self, session: Session) {
        match serde_json::to_string(&session) {
            Ok(json) => {
                if let Err(e) = self.storage.set(&self.key, &json) {
                    tracing::warn!(error = %e, "Failed to persist session");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize session"),
        }

        tracing::debug!(subject = %session.subject_id, role = %session.role, "Session stored");
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = Cache::Warm(Some(session));
    }

    /// Drop the session from memory and durable storage
    pub fn clear_session(&self) {
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = Cache::Warm(None);

        if let Err(e) = self.storage.remove(&self.key) {
            tracing::warn!(error = %e, "Failed to remove persisted session");
        }
        tracing::debug!("Session cleared");
    }

    /// Session that is present and not within `skew` of expiry
    pub fn active_session(&self, now: DateTime<Utc>, skew: Duration) -> Option<Session> {
        self.get_session().filter(|s| !s.is_expired(now, skew))
    }

    /// Cold read; `Err` only for storage failures that may clear up
    fn load_persisted(&self) -> Result<Option<Session>, StorageError> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(None),
            Err(StorageError::Corrupt(reason)) => {
                tracing::warn!(reason = %reason, "Corrupt session storage, treating as signed out");
                self.purge();
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let session = match serde_json::from_str::<Session>(&raw) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed persisted session, treating as signed out");
                self.purge();
                return Ok(None);
            }
        };

        if let Err(reason) = session.validate() {
            tracing::warn!(reason, "Invalid persisted session, treating as signed out");
            self.purge();
            return Ok(None);
        }

        tracing::info!(subject = %session.subject_id, role = %session.role, "Session restored");
        Ok(Some(session))
    }

    fn purge(&self) {
        if let Err(e) = self.storage.remove(&self.key) {
            tracing::warn!(error = %e, "Failed to purge persisted session");
        }
    }
}

impl<S> IdTokenSource for SessionStore<S>
where
    S: DurableStore,
{
    fn id_token(&self) -> Option<String> {
        self.active_session(Utc::now(), self.expiry_skew)
            .map(|s| s.bearer().to_string())
    }
}
