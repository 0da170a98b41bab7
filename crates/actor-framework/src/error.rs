//! # Framework Errors
//!
//! Errors raised by the actor plumbing itself. Entity hooks report their own
//! typed errors, which travel boxed inside [`FrameworkError::EntityError`] and
//! can be recovered with [`FrameworkError::entity_error`].

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A new entity collided with an existing one (see `ActorEntity::conflicts_with`).
    #[error("Conflicts with existing item: {0}")]
    Conflict(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Borrows the entity's own error if this is an `EntityError` of type `E`.
    ///
    /// Clients use this to hand callers the typed error the entity produced
    /// instead of a stringly wrapped one.
    pub fn entity_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            FrameworkError::EntityError(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// True when the actor task is gone and no request can be served.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FrameworkError::ActorClosed | FrameworkError::ActorDropped)
    }
}
