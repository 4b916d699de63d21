//! Event routing map.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;

use super::event::Event;
use super::handler::EventHandler;
use crate::container::{HandlerId, ResolveError};
use crate::error::{DispatchError, HandlerError};
use crate::short_type_name;

/// Invokes a resolved handler instance against a type-erased event. Captured
/// at bind time, where the concrete event and handler types are still known.
type EventInvoke = dyn for<'a> Fn(
        Box<dyn Any + Send + Sync>,
        &'a dyn Event,
    ) -> BoxFuture<'a, Result<(), DispatchError>>
    + Send
    + Sync;

pub(crate) struct EventBinding {
    pub(crate) handler: HandlerId,
    pub(crate) invoke: Arc<EventInvoke>,
}

/// Maps each event type to an ordered set of handler types.
///
/// Built once at startup and read-only afterwards. Binding order is
/// invocation order, and unlike [`RequestMap`](crate::RequestMap), repeated
/// binds accumulate. An event type with no bindings is not an error.
#[derive(Default)]
pub struct EventMap {
    bindings: HashMap<TypeId, Vec<EventBinding>>,
}

impl EventMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler type to an event type's bindings.
    pub fn bind<E, H>(&mut self)
    where
        E: Event,
        H: EventHandler<E> + 'static,
    {
        self.bindings
            .entry(TypeId::of::<E>())
            .or_default()
            .push(EventBinding {
                handler: HandlerId::of::<H>(),
                invoke: Arc::new(invoke_handler::<E, H>),
            });
    }

    /// The ordered bindings for an event type; empty when none were bound.
    pub(crate) fn get(&self, event_type: TypeId) -> &[EventBinding] {
        self.bindings
            .get(&event_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn invoke_handler<'a, E, H>(
    instance: Box<dyn Any + Send + Sync>,
    event: &'a dyn Event,
) -> BoxFuture<'a, Result<(), DispatchError>>
where
    E: Event,
    H: EventHandler<E> + 'static,
{
    Box::pin(async move {
        let mut handler = instance.downcast::<H>().map_err(|_| {
            ResolveError::InstanceMismatch(short_type_name(std::any::type_name::<H>()))
        })?;
        let event = match event.as_any().downcast_ref::<E>() {
            Some(event) => event,
            None => {
                return Err(DispatchError::Handler(HandlerError::other(format!(
                    "event binding received an unexpected event type in place of {}",
                    short_type_name(std::any::type_name::<E>())
                ))))
            }
        };
        handler.handle(event).await.map_err(DispatchError::Handler)
    })
}
