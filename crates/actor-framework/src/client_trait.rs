//! # ActorClient Trait
//!
//! Common interface for resource-specific clients: default `get`, `delete` and
//! `list` built on top of a generic `ResourceClient`, with framework errors
//! mapped into the resource's own error type.
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit standard operations.
///
/// # Example
///
/// ```rust
/// use actor_framework::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Depot { id: u32 }
/// #[derive(Debug)] struct DepotCreate;
/// #[derive(Debug)] struct DepotUpdate;
/// #[derive(Debug)] enum DepotAction {}
/// #[derive(Debug, thiserror::Error)] #[error("{0}")] struct DepotError(String);
///
/// #[async_trait]
/// impl ActorEntity for Depot {
///     type Id = u32; type Create = DepotCreate; type Update = DepotUpdate;
///     type Action = DepotAction; type ActionResult = (); type Context = (); type Error = DepotError;
///     fn from_create_params(id: u32, _: DepotCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
///     async fn on_update(&mut self, _: DepotUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, a: DepotAction, _: &()) -> Result<(), Self::Error> { match a {} }
/// }
///
/// struct DepotClient { inner: ResourceClient<Depot> }
///
/// #[async_trait]
/// impl ActorClient<Depot> for DepotClient {
///     type Error = DepotError;
///     fn inner(&self) -> &ResourceClient<Depot> { &self.inner }
///     fn map_error(e: FrameworkError) -> DepotError { DepotError(e.to_string()) }
/// }
///
/// // get(), delete() and list() come for free.
/// async fn usage(client: DepotClient) {
///     let _ = client.get(1).await;
///     let _ = client.list().await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Delete an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }

    /// Every stored entity, in unspecified order.
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().find(|_| true).await.map_err(Self::map_error)
    }
}
