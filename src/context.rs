use std::sync::Arc;

use crate::api::{ApiClient, QueryParams, Resource};
use crate::config::AppConfig;
use crate::error::ClientResult;
use crate::hooks::{CreateMutation, DeleteMutation, ItemQuery, ListQuery, UpdateMutation};
use crate::navigation::Navigator;
use crate::session::Session;
use crate::token::TokenStore;

/// Everything the client needs, built once at startup and passed around explicitly.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub tokens: TokenStore,
    pub api: Arc<ApiClient>,
    pub session: Session,
}

impl AppContext {
    pub fn init(config: &AppConfig, navigator: Arc<dyn Navigator>) -> ClientResult<Self> {
        let tokens = TokenStore::from_config(&config.session);
        Self::with_tokens(config, tokens, navigator)
    }

    pub fn with_tokens(config: &AppConfig, tokens: TokenStore, navigator: Arc<dyn Navigator>) -> ClientResult<Self> {
        let api = Arc::new(ApiClient::from_config(config, tokens.clone(), Arc::clone(&navigator))?);
        let session = Session::start(Arc::clone(&api), navigator);

        tracing::debug!(
            "client ready against {} (persistent tokens: {})",
            api.http().base_url(),
            tokens.is_persistent()
        );

        Ok(Self { tokens, api, session })
    }

    pub fn list<R: Resource>(&self, params: QueryParams) -> ListQuery<R> {
        ListQuery::new(Arc::clone(&self.api), params)
    }

    pub fn item<R: Resource>(&self, id: impl Into<String>) -> ItemQuery<R> {
        ItemQuery::new(Arc::clone(&self.api), id)
    }

    pub fn create<R: Resource>(&self) -> CreateMutation<R> {
        CreateMutation::new(Arc::clone(&self.api))
    }

    pub fn update<R: Resource>(&self) -> UpdateMutation<R> {
        UpdateMutation::new(Arc::clone(&self.api))
    }

    pub fn delete<R: Resource>(&self) -> DeleteMutation<R> {
        DeleteMutation::new(Arc::clone(&self.api))
    }
}
