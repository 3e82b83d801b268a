//! Per-storage session identity.
//!
//! A token is generated on first use, persisted, and reused for the life of
//! its storage. There is no expiry and no rotation. When the storage is
//! unusable the process keeps an ephemeral token instead.

use crate::errors::{AppError, AppResult};
use crate::utils::ids::{is_session_token, session_token};
use crate::utils::time::Clock;
use parking_lot::Mutex;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

/// Where the session token lives between runs.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> AppResult<Option<String>>;
    fn save(&self, token: &str) -> AppResult<()>;
}

/// One token per file; the file holds the bare token.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> AppResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(s) => {
                let token = s.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::SessionStorage(format!(
                "cannot read {}: {e}",
                self.path.display()
            ))),
        }
    }

    fn save(&self, token: &str) -> AppResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::SessionStorage(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        fs::write(&self.path, token).map_err(|e| {
            AppError::SessionStorage(format!("cannot write {}: {e}", self.path.display()))
        })
    }
}

/// Storage scoped to one value; used for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    slot: Mutex<Option<String>>,
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> AppResult<Option<String>> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, token: &str) -> AppResult<()> {
        *self.slot.lock() = Some(token.to_string());
        Ok(())
    }
}

/// The resolved session token, cheap to clone and thread into the recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    token: Arc<str>,
    durable: bool,
}

impl SessionContext {
    /// A token that only lives as long as this process.
    pub fn ephemeral(clock: &dyn Clock) -> Self {
        Self {
            token: Arc::from(session_token(clock.now_millis())),
            durable: false,
        }
    }

    /// Context for a token known up front.
    pub fn fixed(token: impl Into<String>) -> Self {
        Self {
            token: Arc::from(token.into()),
            durable: true,
        }
    }

    pub fn get_session_id(&self) -> &str {
        &self.token
    }

    /// Whether the token was read from or written to durable storage.
    pub fn is_durable(&self) -> bool {
        self.durable
    }
}

/// Lazily resolves and then caches the session token of a storage scope.
pub struct SessionIdentity {
    storage: Box<dyn SessionStorage>,
    clock: Arc<dyn Clock>,
    resolved: OnceLock<SessionContext>,
}

impl SessionIdentity {
    pub fn new(storage: Box<dyn SessionStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            resolved: OnceLock::new(),
        }
    }

    /// First call loads or creates the token; later calls return the same one.
    pub fn context(&self) -> &SessionContext {
        self.resolved
            .get_or_init(|| Self::resolve(self.storage.as_ref(), self.clock.as_ref()))
    }

    pub fn get_session_id(&self) -> String {
        self.context().get_session_id().to_string()
    }

    /// Read the stored token, or create and persist a new one.
    /// Storage failures never escape: they produce an ephemeral token.
    pub fn resolve(storage: &dyn SessionStorage, clock: &dyn Clock) -> SessionContext {
        match storage.load() {
            Ok(Some(token)) if is_session_token(&token) => {
                return SessionContext {
                    token: Arc::from(token),
                    durable: true,
                };
            }
            Ok(Some(token)) => {
                tracing::warn!(token = %token, "stored session token is malformed, replacing it");
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "session storage unreadable, using an ephemeral session");
                return SessionContext::ephemeral(clock);
            }
        }

        let fresh = SessionContext::ephemeral(clock);
        match storage.save(fresh.get_session_id()) {
            Ok(()) => {
                tracing::debug!(session_id = fresh.get_session_id(), "new session created");
                SessionContext {
                    durable: true,
                    ..fresh
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "session storage not writable, using an ephemeral session");
                fresh
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::ManualClock;

    struct BrokenStorage;

    impl SessionStorage for BrokenStorage {
        fn load(&self) -> AppResult<Option<String>> {
            Err(AppError::SessionStorage("quota exceeded".into()))
        }
        fn save(&self, _token: &str) -> AppResult<()> {
            Err(AppError::SessionStorage("quota exceeded".into()))
        }
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(ManualClock::new(1_700_000_000_000))
    }

    #[test]
    fn repeated_calls_return_the_same_token() {
        let identity = SessionIdentity::new(Box::new(MemorySessionStorage::default()), clock());
        let first = identity.get_session_id();
        assert!(first.starts_with("session_1700000000000_"));
        assert_eq!(identity.get_session_id(), first);
        assert!(identity.context().is_durable());
    }

    #[test]
    fn token_survives_a_new_identity_on_the_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session_id");

        let a = SessionIdentity::new(Box::new(FileSessionStorage::new(&path)), clock()).get_session_id();
        let b = SessionIdentity::new(Box::new(FileSessionStorage::new(&path)), clock()).get_session_id();
        assert_eq!(a, b);
        assert_eq!(fs::read_to_string(&path).unwrap(), a);
    }

    #[test]
    fn broken_storage_falls_back_to_an_ephemeral_token() {
        let identity = SessionIdentity::new(Box::new(BrokenStorage), clock());
        let token = identity.get_session_id();
        assert!(is_session_token(&token));
        assert!(!identity.context().is_durable());
        assert_eq!(identity.get_session_id(), token);
    }

    #[test]
    fn malformed_stored_token_is_replaced() {
        let storage = MemorySessionStorage::default();
        storage.save("garbage").unwrap();
        let ctx = SessionIdentity::resolve(&storage, clock().as_ref());
        assert!(is_session_token(ctx.get_session_id()));
        assert_eq!(storage.load().unwrap().as_deref(), Some(ctx.get_session_id()));
    }
}
