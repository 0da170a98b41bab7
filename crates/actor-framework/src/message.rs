//! # Generic Messages
//!
//! Messages exchanged between `ResourceClient` and `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use std::fmt;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Filter evaluated inside the actor against every stored entity.
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Internal message type sent to the actor to request operations.
///
/// The variants map to CRUD (Create, Get, Update, Delete), a custom `Action`
/// for resource-specific logic, and `Find` for queries over the whole store
/// (e.g. "deliveries for order X", "available partners").
///
/// The enum is generic over `T: ActorEntity` and uses its associated types,
/// so a `DeliveryCreate` can never be sent to a partner actor.
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Find {
        predicate: Predicate<T>,
        respond_to: Response<Vec<T>>,
    },
}

impl<T: ActorEntity> fmt::Debug for ResourceRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceRequest::Create { params, .. } => {
                f.debug_struct("Create").field("params", params).finish()
            }
            ResourceRequest::Get { id, .. } => f.debug_struct("Get").field("id", id).finish(),
            ResourceRequest::Update { id, update, .. } => f
                .debug_struct("Update")
                .field("id", id)
                .field("update", update)
                .finish(),
            ResourceRequest::Delete { id, .. } => {
                f.debug_struct("Delete").field("id", id).finish()
            }
            ResourceRequest::Action { id, action, .. } => f
                .debug_struct("Action")
                .field("id", id)
                .field("action", action)
                .finish(),
            ResourceRequest::Find { .. } => f.debug_struct("Find").finish_non_exhaustive(),
        }
    }
}
