use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::envelope::ApiResponse;
use super::query::QueryParams;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpClient, RequestSpec};

/// A remote entity type exposed through the standard CRUD endpoints.
pub trait Resource: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    /// Collection path relative to the API base, e.g. `/patients`.
    const PATH: &'static str;
    const SINGULAR: &'static str;
    const PLURAL: &'static str;
    /// Spanish nouns used in user-facing messages.
    const LABEL: &'static str;
    const LABEL_PLURAL: &'static str;

    fn id(&self) -> &str;
}

/// CRUD calls for one resource type.
pub struct ResourceApi<'a, R: Resource> {
    http: &'a HttpClient,
    _resource: PhantomData<R>,
}

impl<'a, R: Resource> ResourceApi<'a, R> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self {
            http,
            _resource: PhantomData,
        }
    }

    pub async fn list(&self, params: &QueryParams) -> ClientResult<ApiResponse<Vec<R>>> {
        self.http
            .send(RequestSpec::get(R::PATH).query(params.to_pairs()))
            .await
    }

    pub async fn get(&self, id: &str) -> ClientResult<ApiResponse<R>> {
        self.http.send(RequestSpec::get(item_path::<R>(id)?)).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> ClientResult<ApiResponse<R>> {
        self.http.send(RequestSpec::post(R::PATH).json(body)?).await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, body: &B) -> ClientResult<ApiResponse<R>> {
        self.http
            .send(RequestSpec::put(item_path::<R>(id)?).json(body)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<ApiResponse<Value>> {
        self.http.send(RequestSpec::delete(item_path::<R>(id)?)).await
    }
}

fn item_path<R: Resource>(id: &str) -> ClientResult<String> {
    Ok(format!("{}/{}", R::PATH, validate_id(R::LABEL, id)?))
}

/// Trimmed id, safe to paste into a URL path as one segment. Rejects dot
/// segments and anything the URL parser treats as a delimiter or escape
/// (`%2e%2e` normalises to `..`).
pub(crate) fn validate_id<'a>(label: &str, id: &'a str) -> ClientResult<&'a str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ClientError::validation("id", format!("El id de {} es obligatorio", label)));
    }

    let unsafe_char = |c: char| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control();
    if id == "." || id == ".." || id.chars().any(unsafe_char) {
        return Err(ClientError::validation("id", format!("Id de {} inválido: '{}'", label, id)));
    }
    Ok(id)
}
