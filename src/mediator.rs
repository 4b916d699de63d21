//! Caller-facing mediators.

use std::sync::Arc;

use crate::container::Container;
use crate::dispatcher::{EventDispatcher, RequestDispatcher};
use crate::error::DispatchError;
use crate::events::{Event, EventEmitter, EventMap};
use crate::middlewares::MiddlewareChain;
use crate::requests::{Request, RequestMap};

/// The command-side façade.
///
/// Sends a request through the [`RequestDispatcher`], then forwards every
/// event the handler recorded to the configured [`EventEmitter`]. The emitter
/// decides whether event handlers run inline, in the background, or behind a
/// broker; the caller sees the response only after the command handler itself
/// has finished.
///
/// ## Example
///
/// ```ignore
/// let mut request_map = RequestMap::new();
/// request_map.bind::<CreateUser, CreateUserHandler>();
///
/// let mediator = RequestMediator::new(request_map, container)
///     .with_event_emitter(emitter)
///     .with_middleware_chain(chain);
///
/// let created = mediator.send(CreateUser { name: "alice".into() }).await?;
/// ```
pub struct RequestMediator<C> {
    dispatcher: RequestDispatcher<C>,
    event_emitter: Option<Arc<dyn EventEmitter>>,
}

impl<C: Container> RequestMediator<C> {
    /// Create a mediator with no emitter and an empty middleware chain.
    pub fn new(request_map: RequestMap, container: C) -> Self {
        Self {
            dispatcher: RequestDispatcher::new(request_map, container),
            event_emitter: None,
        }
    }

    /// Forward recorded events to this emitter. Without one, recorded events
    /// are discarded silently.
    pub fn with_event_emitter(mut self, event_emitter: Arc<dyn EventEmitter>) -> Self {
        self.event_emitter = Some(event_emitter);
        self
    }

    /// Apply a middleware chain around request handling.
    pub fn with_middleware_chain(mut self, chain: MiddlewareChain) -> Self {
        self.dispatcher = self.dispatcher.with_middleware_chain(chain);
        self
    }

    /// Send a request and return its handler's response.
    ///
    /// Events the handler recorded are drained to the emitter before the
    /// response is returned, most recently produced first, each `emit`
    /// awaited before the next.
    pub async fn send<R: Request>(&self, request: R) -> Result<R::Response, DispatchError> {
        let result = self.dispatcher.dispatch(request).await?;

        if !result.events.is_empty() {
            self.send_events(result.events).await?;
        }

        Ok(result.response)
    }

    async fn send_events(&self, mut events: Vec<Box<dyn Event>>) -> Result<(), DispatchError> {
        let emitter = match &self.event_emitter {
            Some(emitter) => emitter,
            None => return Ok(()),
        };

        while let Some(event) = events.pop() {
            emitter.emit(event).await?;
        }
        Ok(())
    }
}

/// The event-side façade.
///
/// Sends an event through the [`EventDispatcher`] and nothing more: events
/// produced while handling other events are not captured or re-forwarded.
/// Only request handlers accumulate outgoing events in this design.
pub struct EventMediator<C> {
    dispatcher: EventDispatcher<C>,
}

impl<C: Container> EventMediator<C> {
    pub fn new(event_map: EventMap, container: C) -> Self {
        Self {
            dispatcher: EventDispatcher::new(event_map, container),
        }
    }

    /// Dispatch an event to its bound handlers.
    pub async fn send<E: Event>(&self, event: E) -> Result<(), DispatchError> {
        self.dispatcher.dispatch(&event).await
    }
}
