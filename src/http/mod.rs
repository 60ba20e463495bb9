//! Single outbound gateway to the remote API.
//!
//! Every call goes through [`HttpClient::send`], which attaches the bearer
//! token, resets the session on 401, and folds every failure into
//! [`ClientError`].

pub mod request;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

pub use request::RequestSpec;

use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult, CONNECTION_ERROR_MESSAGE};
use crate::navigation::{Navigator, Route};
use crate::token::TokenStore;

type UnauthorizedListener = Box<dyn Fn() + Send + Sync>;

/// Error body shape shared by all unsuccessful responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    tokens: TokenStore,
    navigator: Arc<dyn Navigator>,
    unauthorized_listeners: RwLock<Vec<UnauthorizedListener>>,
    log_requests: bool,
}

impl HttpClient {
    pub fn new(config: &ApiConfig, tokens: TokenStore, navigator: Arc<dyn Navigator>) -> ClientResult<Self> {
        Self::with_timeout(config, config.timeout(), tokens, navigator)
    }

    pub fn with_timeout(
        config: &ApiConfig,
        timeout: Duration,
        tokens: TokenStore,
        navigator: Arc<dyn Navigator>,
    ) -> ClientResult<Self> {
        // Validate once so per-request URL building only fails on bad paths.
        let base = Url::parse(&config.base_url)?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ClientError::connection(format!("No se pudo crear el cliente HTTP: {}", e)))?;

        Ok(Self {
            client,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            tokens,
            navigator,
            unauthorized_listeners: RwLock::new(Vec::new()),
            log_requests: true,
        })
    }

    pub fn log_requests(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Register a callback fired after a 401 has cleared the token store.
    pub fn on_unauthorized<F>(&self, listener: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.unauthorized_listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Box::new(listener));
    }

    pub fn url_for(&self, path: &str, query: &[(String, String)]) -> ClientResult<Url> {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    pub async fn send<T: DeserializeOwned>(&self, spec: RequestSpec) -> ClientResult<T> {
        let url = self.url_for(&spec.path, &spec.query)?;
        if self.log_requests {
            tracing::debug!("{} {}", spec.method, url);
        }

        let mut builder = self.client.request(spec.method.clone(), url);
        if let Some(token) = self.tokens.get() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &spec.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let message = response.bytes().await.ok().and_then(|body| body_message(&body));
            self.reset_session(&spec);
            return Err(ClientError::Unauthorized(message));
        }

        let bytes = response.bytes().await?;

        if !status.is_success() {
            let err = remote_error(status, &bytes);
            tracing::debug!("{} {} failed with {}: {}", spec.method, spec.path, status, err);
            return Err(err);
        }

        // 204 and friends still have to satisfy the caller's envelope type.
        let body: &[u8] = if bytes.is_empty() { br#"{"success":true}"# } else { &bytes };
        Ok(serde_json::from_slice(body)?)
    }

    fn reset_session(&self, spec: &RequestSpec) {
        tracing::warn!("{} {} answered 401, clearing session", spec.method, spec.path);
        self.tokens.clear();

        for listener in self
            .unauthorized_listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
        {
            listener();
        }

        self.navigator.navigate(Route::Login);
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("log_requests", &self.log_requests)
            .finish()
    }
}

/// `error` first, then `message`, ignoring empty strings.
fn body_message(body: &[u8]) -> Option<String> {
    let parsed = serde_json::from_slice::<ErrorBody>(body).ok()?;
    [parsed.error, parsed.message]
        .into_iter()
        .flatten()
        .find(|msg| !msg.is_empty())
}

/// Surface the remote message when there is one, otherwise a generic connection error.
fn remote_error(status: StatusCode, body: &[u8]) -> ClientError {
    match body_message(body) {
        Some(msg) => ClientError::Remote(msg),
        None => {
            tracing::debug!("unreadable error body for status {}", status);
            ClientError::connection(CONNECTION_ERROR_MESSAGE)
        }
    }
}
