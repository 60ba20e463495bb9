use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token storage is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// A place a bearer token can be kept between runs.
pub trait TokenBackend: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;

    fn load(&self) -> Result<Option<String>, TokenError>;

    fn store(&self, token: &str) -> Result<(), TokenError>;

    fn remove(&self) -> Result<(), TokenError>;
}

/// Process-lifetime backend, used when no storage directory is available.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    value: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn load(&self) -> Result<Option<String>, TokenError> {
        Ok(self.value.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn store(&self, token: &str) -> Result<(), TokenError> {
        *self.value.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), TokenError> {
        *self.value.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend_round_trip() {
        let backend = MemoryBackend::new();
        assert!(backend.load().unwrap().is_none());

        backend.store("abc").unwrap();
        assert_eq!(backend.load().unwrap().as_deref(), Some("abc"));

        backend.remove().unwrap();
        assert!(backend.load().unwrap().is_none());
    }
}
