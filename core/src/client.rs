//! Async resource operations over a `Transport`.
//!
//! # Design
//! `ResourceClient` borrows a `Resource` descriptor and a transport and runs
//! `build_*`, `execute`, `parse_*` for each call. It keeps no state between
//! calls: concurrent requests are independent, nothing is retried, and a
//! failure surfaces unchanged to the caller.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::envelope::Paginated;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, MultipartForm};
use crate::query::ListQuery;
use crate::resource::Resource;
use crate::transport::Transport;

/// The uniform list/get/create/update/remove surface of one resource.
pub struct ResourceClient<'a, T: ?Sized, L, D, C, U> {
    resource: &'a Resource<L, D, C, U>,
    transport: &'a T,
}

impl<'a, T: ?Sized, L, D, C, U> Clone for ResourceClient<'a, T, L, D, C, U> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: ?Sized, L, D, C, U> Copy for ResourceClient<'a, T, L, D, C, U> {}

impl<'a, T, L, D, C, U> ResourceClient<'a, T, L, D, C, U>
where
    T: Transport + ?Sized,
{
    pub fn new(resource: &'a Resource<L, D, C, U>, transport: &'a T) -> Self {
        Self {
            resource,
            transport,
        }
    }

    pub fn resource(&self) -> &'a Resource<L, D, C, U> {
        self.resource
    }

    pub fn transport(&self) -> &'a T {
        self.transport
    }

    /// Execute a request built outside the standard five operations, e.g. a
    /// sub-resource upload.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport.execute(request).await
    }

    #[tracing::instrument(skip(self), fields(resource = self.resource.path()))]
    pub async fn remove(&self, id: u64) -> Result<(), ApiError> {
        let request = self.resource.build_delete(id)?;
        let response = self.send(request).await?;
        self.resource.parse_delete(response)
    }
}

impl<'a, T, L, D, C, U> ResourceClient<'a, T, L, D, C, U>
where
    T: Transport + ?Sized,
    L: DeserializeOwned,
{
    #[tracing::instrument(skip(self, query), fields(resource = self.resource.path(), page = query.page))]
    pub async fn list(&self, query: &ListQuery) -> Result<Paginated<L>, ApiError> {
        let request = self.resource.build_list(query)?;
        let response = self.send(request).await?;
        let page = self.resource.parse_list(response)?;
        tracing::debug!(items = page.data.len(), total = page.meta.total, "listed");
        Ok(page)
    }
}

impl<'a, T, L, D, C, U> ResourceClient<'a, T, L, D, C, U>
where
    T: Transport + ?Sized,
    D: DeserializeOwned,
{
    #[tracing::instrument(skip(self), fields(resource = self.resource.path()))]
    pub async fn get(&self, id: u64) -> Result<D, ApiError> {
        let request = self.resource.build_get(id)?;
        let response = self.send(request).await?;
        self.resource.parse_get(response)
    }

    #[tracing::instrument(skip(self, form), fields(resource = self.resource.path()))]
    pub async fn create_multipart(&self, form: MultipartForm) -> Result<D, ApiError> {
        let request = self.resource.build_create_multipart(form);
        let response = self.send(request).await?;
        self.resource.parse_create(response)
    }

    #[tracing::instrument(skip(self, form), fields(resource = self.resource.path()))]
    pub async fn update_multipart(&self, id: u64, form: MultipartForm) -> Result<D, ApiError> {
        let request = self.resource.build_update_multipart(id, form)?;
        let response = self.send(request).await?;
        self.resource.parse_update(response)
    }
}

impl<'a, T, L, D, C, U> ResourceClient<'a, T, L, D, C, U>
where
    T: Transport + ?Sized,
    D: DeserializeOwned,
    C: Serialize + Sync,
{
    #[tracing::instrument(skip(self, input), fields(resource = self.resource.path()))]
    pub async fn create(&self, input: &C) -> Result<D, ApiError> {
        let request = self.resource.build_create(input)?;
        let response = self.send(request).await?;
        self.resource.parse_create(response)
    }
}

impl<'a, T, L, D, C, U> ResourceClient<'a, T, L, D, C, U>
where
    T: Transport + ?Sized,
    D: DeserializeOwned,
    U: Serialize + Sync,
{
    #[tracing::instrument(skip(self, input), fields(resource = self.resource.path()))]
    pub async fn update(&self, id: u64, input: &U) -> Result<D, ApiError> {
        let request = self.resource.build_update(id, input)?;
        let response = self.send(request).await?;
        self.resource.parse_update(response)
    }
}
