//! # Generic Actor Server
//!
//! `ResourceActor` owns the entity store for one resource type and processes
//! requests sequentially, so the store needs no locking.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// This is the "server" half: it owns the `store` and the receiving end of
/// the channel. Every `ResourceActor` runs in its own Tokio task and handles
/// one message at a time, so hooks get exclusive `&mut` access to the entity
/// they run against.
///
/// # Usage Pattern
///
/// 1. **Create**: `ResourceActor::new()` returns the actor and its client.
/// 2. **Wire**: pass dependencies (other clients) into `actor.run(context)`.
/// 3. **Run**: spawn the run loop in a background task.
///
/// ```rust
/// use actor_framework::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Crate { id: u32, weight_kg: u32 }
/// #[derive(Debug)] struct CrateCreate { weight_kg: u32 }
/// #[derive(Debug)] struct CrateUpdate;
/// #[derive(Debug)] enum CrateAction {}
/// #[derive(Debug, thiserror::Error)] #[error("crate error")] struct CrateError;
///
/// #[async_trait]
/// impl ActorEntity for Crate {
///     type Id = u32;
///     type Create = CrateCreate;
///     type Update = CrateUpdate;
///     type Action = CrateAction;
///     type ActionResult = ();
///     type Context = ();
///     type Error = CrateError;
///
///     fn from_create_params(id: u32, p: CrateCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id, weight_kg: p.weight_kg })
///     }
///     async fn on_update(&mut self, _: CrateUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, a: CrateAction, _: &()) -> Result<(), Self::Error> { match a {} }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Crate>::new(10);
///     tokio::spawn(actor.run(()));
///
///     client.create(CrateCreate { weight_kg: 40 }).await.unwrap();
///     client.create(CrateCreate { weight_kg: 5 }).await.unwrap();
///     let heavy = client.find(|c: &Crate| c.weight_kg > 10).await.unwrap();
///     assert_eq!(heavy.len(), 1);
/// }
/// ```
///
/// # Operations
///
/// * **Create**: next counter value → `T::Id`, `from_create_params`,
///   conflict check against the store, `on_create`, insert.
/// * **Get**: clone of the stored entity, or `None`.
/// * **Update**: `on_update` on the stored entity, returns the new state.
/// * **Delete**: `on_delete`, then removal.
/// * **Action**: `handle_action` on the stored entity.
/// * **Find**: clones of every entity matching the predicate. Order is
///   unspecified; callers sort if they care.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` bounds the request channel; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id: 1,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until the channel closes.
    ///
    /// The `context` is handed to every entity hook.
    pub async fn run(mut self, context: T::Context) {
        // e.g. "Delivery" instead of "kisansetu_tracking::model::delivery::Delivery"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::Id::from(self.next_id);
                    self.next_id += 1;

                    let mut item = match T::from_create_params(id.clone(), params) {
                        Ok(item) => item,
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                    };

                    if let Some((existing_id, _)) =
                        self.store.iter().find(|(_, existing)| item.conflicts_with(existing))
                    {
                        warn!(entity_type, %existing_id, "Create conflicts with existing item");
                        let _ = respond_to
                            .send(Err(FrameworkError::Conflict(existing_id.to_string())));
                        continue;
                    }

                    if let Err(e) = item.on_create(&context).await {
                        warn!(entity_type, error = %e, "on_create failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.store.insert(id.clone(), item);
                    info!(entity_type, %id, size = self.store.len(), "Created");
                    let _ = respond_to.send(Ok(id));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    if let Some(item) = self.store.get_mut(&id) {
                        if let Err(e) = item.on_update(update, &context).await {
                            warn!(entity_type, %id, error = %e, "Update failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                        info!(entity_type, %id, "Updated");
                        let _ = respond_to.send(Ok(item.clone()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    if let Some(item) = self.store.get(&id) {
                        if let Err(e) = item.on_delete(&context).await {
                            warn!(entity_type, %id, error = %e, "on_delete failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                        self.store.remove(&id);
                        info!(entity_type, %id, size = self.store.len(), "Deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    if let Some(item) = self.store.get_mut(&id) {
                        let result = item
                            .handle_action(action, &context)
                            .await
                            .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                        match &result {
                            Ok(_) => info!(entity_type, %id, "Action ok"),
                            Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                        }
                        let _ = respond_to.send(result);
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Find {
                    predicate,
                    respond_to,
                } => {
                    let matches: Vec<T> = self
                        .store
                        .values()
                        .filter(|item| predicate(item))
                        .cloned()
                        .collect();
                    debug!(entity_type, matched = matches.len(), "Find");
                    let _ = respond_to.send(Ok(matches));
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}
