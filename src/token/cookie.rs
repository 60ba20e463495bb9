use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::backend::{TokenBackend, TokenError};

pub const COOKIE_FILE_NAME: &str = "auth_token.cookie";

#[derive(Debug, Serialize, Deserialize)]
struct CookieRecord {
    name: String,
    value: String,
    same_site: String,
    expires_at: DateTime<Utc>,
}

/// Short-lived token copy with a fixed expiry, written alongside the durable one.
#[derive(Debug, Clone)]
pub struct CookieBackend {
    path: PathBuf,
    ttl: Duration,
}

impl CookieBackend {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            ttl,
        }
    }

    pub fn in_dir(dir: &Path, ttl: Duration) -> Self {
        Self::new(dir.join(COOKIE_FILE_NAME), ttl)
    }

    /// One-day cookie, matching the browser session cookie.
    pub fn one_day(dir: &Path) -> Self {
        Self::in_dir(dir, Duration::days(1))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn read_record(&self) -> Result<Option<CookieRecord>, TokenError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

impl TokenBackend for CookieBackend {
    fn name(&self) -> &'static str {
        "cookie"
    }

    fn load(&self) -> Result<Option<String>, TokenError> {
        let Some(record) = self.read_record()? else {
            return Ok(None);
        };

        if record.expires_at <= Utc::now() {
            tracing::debug!("auth cookie expired at {}, purging", record.expires_at);
            self.remove()?;
            return Ok(None);
        }

        Ok(Some(record.value).filter(|v| !v.is_empty()))
    }

    fn store(&self, token: &str) -> Result<(), TokenError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let record = CookieRecord {
            name: "auth_token".to_string(),
            value: token.to_string(),
            same_site: "Lax".to_string(),
            expires_at: Utc::now() + self.ttl,
        };
        fs::write(&self.path, serde_json::to_string_pretty(&record)?)?;
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
