//! Dependency-injection seam: handler identity tokens and the resolver contract.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::short_type_name;

/// Identifies a handler type to a [`Container`].
///
/// Issued when a handler is bound into a request or event map and presented
/// back to the container at dispatch time. The token carries the handler's
/// `TypeId` plus its short type name for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId {
    id: TypeId,
    name: &'static str,
}

impl HandlerId {
    /// The id of a concrete handler type.
    pub fn of<H: 'static>() -> Self {
        Self {
            id: TypeId::of::<H>(),
            name: short_type_name(std::any::type_name::<H>()),
        }
    }

    /// Short type name of the handler this id refers to.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Error type for container resolution.
#[derive(Debug)]
pub enum ResolveError {
    /// Nothing registered for the requested handler type.
    NotRegistered(&'static str),
    /// The container produced an instance of a different type.
    InstanceMismatch(&'static str),
    /// Container-specific failure.
    Failed(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NotRegistered(name) => {
                write!(f, "no registration for handler type {}", name)
            }
            ResolveError::InstanceMismatch(name) => {
                write!(f, "container produced an instance that is not a {}", name)
            }
            ResolveError::Failed(e) => write!(f, "container failure: {}", e),
        }
    }
}

impl Error for ResolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ResolveError::Failed(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

/// Resolves a handler type to a live handler instance.
///
/// The dispatchers never cache what `resolve` returns: one fresh resolution
/// per handler per dispatch. Scoping, sharing, and lifetimes are the
/// container's concern; a container that wants to reuse state hands out
/// handlers that hold it internally.
///
/// Resolution may suspend (a container is free to do I/O to build an
/// instance) and may fail with a [`ResolveError`].
#[async_trait]
pub trait Container: Send + Sync {
    /// Produce an instance of the identified handler type.
    async fn resolve(&self, handler: HandlerId) -> Result<Box<dyn Any + Send + Sync>, ResolveError>;
}

// Shared containers resolve through the inner container, so the same one can
// back both a request mediator and an event emitter.
#[async_trait]
impl<C: Container + ?Sized> Container for Arc<C> {
    async fn resolve(&self, handler: HandlerId) -> Result<Box<dyn Any + Send + Sync>, ResolveError> {
        (**self).resolve(handler).await
    }
}

type Factory = Box<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;

/// In-memory [`Container`] backed by registered factory closures.
///
/// ## Example
///
/// ```ignore
/// let container = FactoryContainer::new()
///     .register(|| CreateUserHandler::new(user_store.clone()))
///     .register(|| NotifyHandler::new(mailer.clone()));
/// ```
#[derive(Default)]
pub struct FactoryContainer {
    factories: HashMap<HandlerId, Factory>,
}

impl FactoryContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for a handler type.
    ///
    /// Uses builder pattern — returns `self` for chaining. The factory runs
    /// once per dispatch that routes to this handler type.
    pub fn register<H>(mut self, factory: impl Fn() -> H + Send + Sync + 'static) -> Self
    where
        H: Send + Sync + 'static,
    {
        self.factories
            .insert(HandlerId::of::<H>(), Box::new(move || Box::new(factory())));
        self
    }
}

#[async_trait]
impl Container for FactoryContainer {
    async fn resolve(&self, handler: HandlerId) -> Result<Box<dyn Any + Send + Sync>, ResolveError> {
        match self.factories.get(&handler) {
            Some(factory) => Ok(factory()),
            None => Err(ResolveError::NotRegistered(handler.name())),
        }
    }
}
