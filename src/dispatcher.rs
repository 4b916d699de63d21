//! Request and event dispatchers.
//!
//! Dispatchers resolve a message to its handler(s) through the maps and the
//! container, and invoke them. They emit nothing themselves; forwarding
//! handler-produced events is the mediator's job.

use tracing::warn;

use crate::container::Container;
use crate::error::DispatchError;
use crate::events::{Event, EventMap};
use crate::middlewares::MiddlewareChain;
use crate::requests::{Request, RequestMap};
use crate::short_type_name;

/// What one request dispatch produced: the handler's response paired with the
/// events it recorded, in production order. Consumed once by the mediator.
pub struct DispatchResult<Resp> {
    pub response: Resp,
    pub events: Vec<Box<dyn Event>>,
}

/// Routes a request to its single bound handler.
pub struct RequestDispatcher<C> {
    request_map: RequestMap,
    container: C,
    middleware_chain: MiddlewareChain,
}

impl<C: Container> RequestDispatcher<C> {
    /// Create a dispatcher with an empty middleware chain.
    pub fn new(request_map: RequestMap, container: C) -> Self {
        Self {
            request_map,
            container,
            middleware_chain: MiddlewareChain::new(),
        }
    }

    /// Replace the middleware chain. Returns `self` for chaining.
    pub fn with_middleware_chain(mut self, chain: MiddlewareChain) -> Self {
        self.middleware_chain = chain;
        self
    }

    /// Dispatch a request to its bound handler.
    ///
    /// Fails with [`DispatchError::UnknownRequest`] when no handler is bound;
    /// the container is not consulted in that case. Container, middleware,
    /// and handler failures propagate unmodified.
    pub async fn dispatch<R: Request>(
        &self,
        request: R,
    ) -> Result<DispatchResult<R::Response>, DispatchError> {
        let request_name = short_type_name(std::any::type_name::<R>());
        let (handler, invoke) = self
            .request_map
            .get::<R>()
            .ok_or(DispatchError::UnknownRequest(request_name))?;
        let instance = self.container.resolve(handler).await?;
        (*invoke)(instance, request, &self.middleware_chain).await
    }
}

/// Routes an event to every handler bound to it, in binding order.
pub struct EventDispatcher<C> {
    event_map: EventMap,
    container: C,
}

impl<C: Container> EventDispatcher<C> {
    pub fn new(event_map: EventMap, container: C) -> Self {
        Self {
            event_map,
            container,
        }
    }

    /// Dispatch an event to its bound handlers, sequentially.
    ///
    /// An event with no bound handlers is logged and succeeds. A handler
    /// failure propagates immediately and aborts the handlers not yet run:
    /// no partial-failure isolation, no retry.
    pub async fn dispatch(&self, event: &dyn Event) -> Result<(), DispatchError> {
        let bindings = self.event_map.get(event.as_any().type_id());
        if bindings.is_empty() {
            warn!(event = event.name(), "no handlers bound for event");
            return Ok(());
        }
        for binding in bindings {
            let instance = self.container.resolve(binding.handler).await?;
            (*binding.invoke)(instance, event).await?;
        }
        Ok(())
    }
}
