use std::sync::Arc;

use super::HookCell;
use crate::api::{ApiClient, Pagination, QueryParams, Resource};
use crate::error::ClientResult;

#[derive(Debug, Clone, PartialEq)]
pub struct ListState<R> {
    pub data: Vec<R>,
    pub loading: bool,
    pub error: Option<String>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone)]
struct ListData<R> {
    items: Vec<R>,
    pagination: Pagination,
}

/// Paginated collection of one resource.
#[derive(Debug)]
pub struct ListQuery<R: Resource> {
    api: Arc<ApiClient>,
    params: QueryParams,
    cell: Arc<HookCell<ListData<R>>>,
}

impl<R: Resource> Clone for ListQuery<R> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            params: self.params.clone(),
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<R: Resource> ListQuery<R> {
    pub fn new(api: Arc<ApiClient>, params: QueryParams) -> Self {
        Self {
            api,
            params,
            cell: HookCell::new(ListData {
                items: Vec::new(),
                pagination: Pagination::default(),
            }),
        }
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn state(&self) -> ListState<R> {
        let (data, loading, error) = self.cell.snapshot();
        ListState {
            data: data.items,
            loading,
            error,
            pagination: data.pagination,
        }
    }

    pub async fn refetch(&self) -> ClientResult<Vec<R>> {
        self.fetch(&QueryParams::default()).await
    }

    /// Fetch with `overrides` layered on top of the hook's own parameters.
    pub async fn fetch(&self, overrides: &QueryParams) -> ClientResult<Vec<R>> {
        let params = self.params.merged_with(overrides);
        let fallback = format!("Error al cargar {}", R::LABEL_PLURAL);
        let ticket = self.cell.begin();

        let result = self
            .api
            .resource::<R>()
            .list(&params)
            .await
            .and_then(|response| {
                let pagination = response.pagination;
                let items = response.into_result(&fallback)?.unwrap_or_default();
                Ok((items, pagination))
            });

        match result {
            Ok((items, pagination)) => {
                let returned = items.clone();
                ticket.succeed(move |data| {
                    data.items = items;
                    if let Some(pagination) = pagination {
                        data.pagination = pagination;
                    }
                });
                Ok(returned)
            }
            Err(e) => {
                ticket.fail(e.to_string());
                Err(e)
            }
        }
    }

    /// Stop applying responses; calls already running finish unobserved.
    pub fn detach(&self) {
        self.cell.detach();
    }
}
