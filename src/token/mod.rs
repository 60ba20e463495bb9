//! Bearer token persistence.
//!
//! The token is written to two backends at once: a durable copy and a
//! short-lived cookie copy. Reads prefer the durable copy, then the cookie,
//! then the value held in memory for this process.

pub mod backend;
pub mod cookie;
pub mod file;

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::Duration;

pub use backend::{MemoryBackend, TokenBackend, TokenError};
pub use cookie::CookieBackend;
pub use file::FileBackend;

use crate::config::SessionConfig;

#[derive(Debug, Default)]
struct Slots {
    memory: MemoryBackend,
    durable: Option<Box<dyn TokenBackend>>,
    transient: Option<Box<dyn TokenBackend>>,
}

impl Slots {
    /// Read order: durable, then cookie, then memory.
    fn chain(&self) -> Vec<&dyn TokenBackend> {
        let mut chain: Vec<&dyn TokenBackend> = Vec::with_capacity(3);
        for backend in [&self.durable, &self.transient].into_iter().flatten() {
            chain.push(&**backend);
        }
        chain.push(&self.memory);
        chain
    }
}

/// Shared handle to the current bearer token. Clones share the same slots.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    slots: Arc<Mutex<Slots>>,
}

impl TokenStore {
    /// Store with no persistence at all; the token lives as long as the process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_backends(durable: Box<dyn TokenBackend>, transient: Box<dyn TokenBackend>) -> Self {
        let store = Self {
            slots: Arc::new(Mutex::new(Slots {
                memory: MemoryBackend::new(),
                durable: Some(durable),
                transient: Some(transient),
            })),
        };

        // Pick up whatever a previous run left behind.
        if let Some(token) = store.get() {
            store.remember(&token);
        }
        store
    }

    /// File-backed durable copy plus a cookie copy with the given lifetime, both in `dir`.
    pub fn persistent(dir: &Path, cookie_ttl: Duration) -> Self {
        Self::with_backends(
            Box::new(FileBackend::in_dir(dir)),
            Box::new(CookieBackend::in_dir(dir, cookie_ttl)),
        )
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        match &config.token_dir {
            Some(dir) => Self::persistent(dir, Duration::hours(config.cookie_ttl_hours)),
            None => Self::in_memory(),
        }
    }

    pub fn get(&self) -> Option<String> {
        let slots = self.lock();

        for backend in slots.chain() {
            match backend.load() {
                Ok(Some(token)) => return Some(token),
                Ok(None) => {}
                Err(e) => tracing::error!("reading token from {} store failed: {}", backend.name(), e),
            }
        }
        None
    }

    pub fn set(&self, token: &str) {
        let slots = self.lock();

        for backend in slots.chain() {
            if let Err(e) = backend.store(token) {
                tracing::error!("writing token to {} store failed: {}", backend.name(), e);
            }
        }
    }

    pub fn clear(&self) {
        let slots = self.lock();

        for backend in slots.chain() {
            if let Err(e) = backend.remove() {
                tracing::error!("removing token from {} store failed: {}", backend.name(), e);
            }
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.lock().durable.is_some()
    }

    fn remember(&self, token: &str) {
        if let Err(e) = self.lock().memory.store(token) {
            tracing::error!("writing token to memory store failed: {}", e);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("psych-token-store-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn set_get_clear_round_trip() {
        let store = TokenStore::in_memory();
        assert!(store.get().is_none());

        store.set("t");
        assert_eq!(store.get().as_deref(), Some("t"));

        store.clear();
        assert!(store.get().is_none());
    }

    #[test]
    fn clones_share_the_token() {
        let store = TokenStore::in_memory();
        let other = store.clone();

        store.set("shared");
        assert_eq!(other.get().as_deref(), Some("shared"));

        other.clear();
        assert!(store.get().is_none());
    }

    #[test]
    fn set_writes_both_copies_and_clear_removes_both() {
        let dir = scratch_dir("both");
        let store = TokenStore::persistent(&dir, Duration::days(1));

        store.set("abc");
        assert_eq!(FileBackend::in_dir(&dir).load().unwrap().as_deref(), Some("abc"));
        assert_eq!(CookieBackend::one_day(&dir).load().unwrap().as_deref(), Some("abc"));

        store.clear();
        assert!(FileBackend::in_dir(&dir).load().unwrap().is_none());
        assert!(CookieBackend::one_day(&dir).load().unwrap().is_none());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn falls_back_to_cookie_when_durable_copy_is_gone() {
        let dir = scratch_dir("fallback");
        let store = TokenStore::persistent(&dir, Duration::days(1));
        store.set("from-cookie");

        FileBackend::in_dir(&dir).remove().unwrap();

        let reloaded = TokenStore::persistent(&dir, Duration::days(1));
        assert_eq!(reloaded.get().as_deref(), Some("from-cookie"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn memory_copy_outlives_removed_files() {
        let dir = scratch_dir("memory");
        let store = TokenStore::persistent(&dir, Duration::days(1));
        store.set("held");

        FileBackend::in_dir(&dir).remove().unwrap();
        CookieBackend::one_day(&dir).remove().unwrap();
        assert_eq!(store.get().as_deref(), Some("held"));

        store.clear();
        assert!(store.get().is_none());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn survives_reload_from_durable_copy() {
        let dir = scratch_dir("reload");
        TokenStore::persistent(&dir, Duration::days(1)).set("persisted");

        let reloaded = TokenStore::persistent(&dir, Duration::days(1));
        assert!(reloaded.is_persistent());
        assert_eq!(reloaded.get().as_deref(), Some("persisted"));

        let _ = fs::remove_dir_all(&dir);
    }
}
