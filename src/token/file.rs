use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::backend::{TokenBackend, TokenError};

pub const DURABLE_FILE_NAME: &str = "auth_token.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    auth_token: String,
}

/// Durable token copy, kept as a small JSON file (the "local storage" copy).
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(DURABLE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenBackend for FileBackend {
    fn name(&self) -> &'static str {
        "durable"
    }

    fn load(&self) -> Result<Option<String>, TokenError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let stored: StoredToken = serde_json::from_str(&content)?;
        if stored.auth_token.is_empty() {
            return Ok(None);
        }
        Ok(Some(stored.auth_token))
    }

    fn store(&self, token: &str) -> Result<(), TokenError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(&StoredToken {
            auth_token: token.to_string(),
        })?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), TokenError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
