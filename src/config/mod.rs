use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://mi-backend-api.liendoalejandro94.workers.dev/api";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the persisted token copies. `None` keeps the token in memory only.
    pub token_dir: Option<PathBuf>,
    pub cookie_ttl_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub default_filter: String,
    pub log_requests: bool,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    /// Config pointing at an explicit base URL with in-memory token storage.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Self::development();
        config.api.base_url = base_url.into();
        config.session.token_dir = None;
        config
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("PSYCH_API_URL") {
            if !v.trim().is_empty() {
                self.api.base_url = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("PSYCH_API_TIMEOUT_SECS") {
            self.api.timeout_secs = v.parse().unwrap_or(self.api.timeout_secs);
        }

        // Session overrides
        if let Ok(v) = env::var("PSYCH_TOKEN_DIR") {
            self.session.token_dir = match v.trim() {
                "" | "memory" => None,
                dir => Some(PathBuf::from(dir)),
            };
        }
        if let Ok(v) = env::var("PSYCH_COOKIE_TTL_HOURS") {
            self.session.cookie_ttl_hours = v.parse().unwrap_or(self.session.cookie_ttl_hours);
        }

        // Logging overrides
        if let Ok(v) = env::var("PSYCH_LOG_REQUESTS") {
            self.logging.log_requests = v.parse().unwrap_or(self.logging.log_requests);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:8787/api".to_string(),
                timeout_secs: 30,
                user_agent: format!("psych-client/{}", env!("CARGO_PKG_VERSION")),
            },
            session: SessionConfig {
                token_dir: default_token_dir(),
                cookie_ttl_hours: 24,
            },
            logging: LoggingConfig {
                default_filter: "psych_client=debug,info".to_string(),
                log_requests: true,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                timeout_secs: 30,
                user_agent: format!("psych-client/{}", env!("CARGO_PKG_VERSION")),
            },
            session: SessionConfig {
                token_dir: default_token_dir(),
                cookie_ttl_hours: 24,
            },
            logging: LoggingConfig {
                default_filter: "psych_client=info,warn".to_string(),
                log_requests: true,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                timeout_secs: 30,
                user_agent: format!("psych-client/{}", env!("CARGO_PKG_VERSION")),
            },
            session: SessionConfig {
                token_dir: default_token_dir(),
                cookie_ttl_hours: 24,
            },
            logging: LoggingConfig {
                default_filter: "warn".to_string(),
                log_requests: false,
            },
        }
    }
}

fn default_token_dir() -> Option<PathBuf> {
    env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join("psych"))
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}
