use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;

use super::HookCell;
use crate::api::{ApiClient, Resource};
use crate::error::ClientResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationState {
    pub loading: bool,
    pub error: Option<String>,
}

/// Shared plumbing for the three mutation hooks; holds no data.
#[derive(Debug)]
struct Mutation<R> {
    api: Arc<ApiClient>,
    cell: Arc<HookCell<()>>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for Mutation<R> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            cell: Arc::clone(&self.cell),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> Mutation<R> {
    fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            cell: HookCell::new(()),
            _resource: PhantomData,
        }
    }

    fn state(&self) -> MutationState {
        let (_, loading, error) = self.cell.snapshot();
        MutationState { loading, error }
    }

    async fn track<T, F>(&self, call: F) -> ClientResult<T>
    where
        F: std::future::Future<Output = ClientResult<T>>,
    {
        let ticket = self.cell.begin();
        let result = call.await;
        match &result {
            Ok(_) => ticket.succeed(|_| {}),
            Err(e) => ticket.fail(e.to_string()),
        }
        result
    }
}

macro_rules! mutation_hook {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name<R: Resource> {
            inner: Mutation<R>,
        }

        impl<R: Resource> Clone for $name<R> {
            fn clone(&self) -> Self {
                Self { inner: self.inner.clone() }
            }
        }

        impl<R: Resource> $name<R> {
            pub fn new(api: Arc<ApiClient>) -> Self {
                Self { inner: Mutation::new(api) }
            }

            pub fn state(&self) -> MutationState {
                self.inner.state()
            }

            pub fn detach(&self) {
                self.inner.cell.detach();
            }
        }
    };
}

mutation_hook!(
    /// Creates a record and hands the created copy back.
    CreateMutation
);
mutation_hook!(UpdateMutation);
mutation_hook!(DeleteMutation);

impl<R: Resource> CreateMutation<R> {
    pub async fn run<B: Serialize + ?Sized>(&self, body: &B) -> ClientResult<Option<R>> {
        let fallback = format!("Error al crear {}", R::LABEL);
        let api = &self.inner.api;
        self.inner
            .track(async { api.resource::<R>().create(body).await?.into_result(&fallback) })
            .await
    }
}

impl<R: Resource> UpdateMutation<R> {
    pub async fn run<B: Serialize + ?Sized>(&self, id: &str, body: &B) -> ClientResult<Option<R>> {
        let fallback = format!("Error al actualizar {}", R::LABEL);
        let api = &self.inner.api;
        self.inner
            .track(async { api.resource::<R>().update(id, body).await?.into_result(&fallback) })
            .await
    }
}

impl<R: Resource> DeleteMutation<R> {
    pub async fn run(&self, id: &str) -> ClientResult<()> {
        let fallback = format!("Error al eliminar {}", R::LABEL);
        let api = &self.inner.api;
        self.inner
            .track(async { api.resource::<R>().delete(id).await?.into_result(&fallback).map(|_| ()) })
            .await
    }
}
