//! Construction-time wiring helpers.
//!
//! The mediators compose from maps, a container, a middleware chain, an
//! emitter, and a broker; these helpers wire the usual arrangement in one
//! call. Maps are populated through mapper closures so binding stays next to
//! the caller's handler definitions:
//!
//! ```ignore
//! let mediator = bootstrap::request_mediator(
//!     container,
//!     |requests| {
//!         requests.bind::<CreateUser, CreateUserHandler>();
//!     },
//!     |requests| {
//!         requests.bind::<GetUser, GetUserHandler>();
//!     },
//!     |events| {
//!         events.bind::<UserCreatedEvent, NotifyHandler>();
//!     },
//!     Vec::new(),
//!     None,
//! );
//! ```

use std::sync::Arc;

use crate::brokers::{DevnullMessageBroker, MessageBroker};
use crate::container::Container;
use crate::events::{BrokerEventEmitter, EventMap};
use crate::mediator::{EventMediator, RequestMediator};
use crate::middlewares::{LoggingMiddleware, Middleware, MiddlewareChain};
use crate::requests::RequestMap;

/// Wire a [`BrokerEventEmitter`]: local dispatch for domain events, the given
/// broker (devnull when `None`) for the rest.
pub fn event_emitter<C: Container>(
    container: C,
    domain_events_mapper: impl FnOnce(&mut EventMap),
    message_broker: Option<Arc<dyn MessageBroker>>,
) -> BrokerEventEmitter<C> {
    let mut event_map = EventMap::new();
    domain_events_mapper(&mut event_map);
    let message_broker = message_broker.unwrap_or_else(|| Arc::new(DevnullMessageBroker));
    BrokerEventEmitter::new(event_map, container, message_broker)
}

/// Wire a [`RequestMediator`] with command and query routes, domain event
/// routes for the emitter, and the caller's middlewares followed by
/// [`LoggingMiddleware`].
pub fn request_mediator<C>(
    container: C,
    commands_mapper: impl FnOnce(&mut RequestMap),
    queries_mapper: impl FnOnce(&mut RequestMap),
    domain_events_mapper: impl FnOnce(&mut EventMap),
    middlewares: Vec<Arc<dyn Middleware>>,
    message_broker: Option<Arc<dyn MessageBroker>>,
) -> RequestMediator<C>
where
    C: Container + Clone + 'static,
{
    let emitter = event_emitter(container.clone(), domain_events_mapper, message_broker);

    let mut request_map = RequestMap::new();
    commands_mapper(&mut request_map);
    queries_mapper(&mut request_map);

    let mut chain = MiddlewareChain::new();
    let mut middlewares = middlewares;
    middlewares.push(Arc::new(LoggingMiddleware::new()));
    chain.set(middlewares);

    RequestMediator::new(request_map, container)
        .with_event_emitter(Arc::new(emitter))
        .with_middleware_chain(chain)
}

/// Wire an [`EventMediator`] for externally submitted events.
pub fn event_mediator<C: Container>(
    container: C,
    events_mapper: impl FnOnce(&mut EventMap),
) -> EventMediator<C> {
    let mut event_map = EventMap::new();
    events_mapper(&mut event_map);
    EventMediator::new(event_map, container)
}
