use std::sync::Arc;

use super::HookCell;
use crate::api::{ApiClient, Resource};
use crate::error::ClientResult;

#[derive(Debug, Clone, PartialEq)]
pub struct ItemState<R> {
    pub data: Option<R>,
    pub loading: bool,
    pub error: Option<String>,
}

/// A single record looked up by id.
#[derive(Debug)]
pub struct ItemQuery<R: Resource> {
    api: Arc<ApiClient>,
    id: String,
    cell: Arc<HookCell<Option<R>>>,
}

impl<R: Resource> Clone for ItemQuery<R> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            id: self.id.clone(),
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<R: Resource> ItemQuery<R> {
    pub fn new(api: Arc<ApiClient>, id: impl Into<String>) -> Self {
        Self {
            api,
            id: id.into(),
            cell: HookCell::new(None),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> ItemState<R> {
        let (data, loading, error) = self.cell.snapshot();
        ItemState { data, loading, error }
    }

    /// No-op returning `Ok(None)` while the id is empty.
    pub async fn fetch(&self) -> ClientResult<Option<R>> {
        if self.id.trim().is_empty() {
            return Ok(None);
        }

        let fallback = format!("Error al cargar {}", R::LABEL);
        let ticket = self.cell.begin();

        let result = self
            .api
            .resource::<R>()
            .get(&self.id)
            .await
            .and_then(|response| response.into_result(&fallback));

        match result {
            Ok(item) => {
                let returned = item.clone();
                ticket.succeed(move |data| *data = item);
                Ok(returned)
            }
            Err(e) => {
                ticket.fail(e.to_string());
                Err(e)
            }
        }
    }

    pub fn detach(&self) {
        self.cell.detach();
    }
}
